//! Course context model.
//!
//! The read-only description of a course as produced by the course-proposal
//! parser: Learning Units with their topics and allotted hours, and the
//! assessment methods with their delivery hours. Field names on the wire
//! follow the course-proposal JSON (`Learning_Units`, `LU_Duration`, ...).

use chrono::NaiveDate;
use log::warn;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::duration::{parse_duration, Minutes};
use super::seed::SeedDay;
use crate::error::{PlannerError, Result};

/// Date format of the `Date` field, e.g. `02 Jun 2025`.
pub const COURSE_DATE_FORMAT: &str = "%d %b %Y";

static LU_PREFIX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s*LU\s*(\d+)").expect("static regex"));

static LU_ANYWHERE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(?:LU|Learning Unit)\s*(\d+)").expect("static regex"));

static TOPIC_PREFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^\s*Topic\s*(\d+)").expect("static regex"));

/// A course as described by its proposal.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CourseContext {
    /// Course title.
    #[serde(rename = "Course_Title", default)]
    pub title: String,
    /// First training day, as `"%d %b %Y"`.
    #[serde(rename = "Date", default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    /// Learning Units in delivery order.
    #[serde(rename = "Learning_Units", default)]
    pub learning_units: Vec<LearningUnit>,
    /// Assessment methods in delivery order.
    #[serde(rename = "Assessment_Methods_Details", default)]
    pub assessment_methods: Vec<AssessmentMethod>,
    /// Skeleton lesson plan from the upstream generator, if any.
    #[serde(rename = "lesson_plan", default, skip_serializing_if = "Vec::is_empty")]
    pub seed_plan: Vec<SeedDay>,
}

impl CourseContext {
    /// Creates an empty course.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }

    /// Parses a course context from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Sets the first training date (`"%d %b %Y"`).
    pub fn with_date(mut self, date: impl Into<String>) -> Self {
        self.date = Some(date.into());
        self
    }

    /// Adds a Learning Unit.
    pub fn with_learning_unit(mut self, unit: LearningUnit) -> Self {
        self.learning_units.push(unit);
        self
    }

    /// Adds an assessment method.
    pub fn with_assessment(mut self, method: AssessmentMethod) -> Self {
        self.assessment_methods.push(method);
        self
    }

    /// Sets the seed lesson plan.
    pub fn with_seed_plan(mut self, seed: Vec<SeedDay>) -> Self {
        self.seed_plan = seed;
        self
    }

    /// First training date, strictly parsed.
    pub fn parse_start_date(&self) -> Result<Option<NaiveDate>> {
        match self.date.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(raw) => NaiveDate::parse_from_str(raw, COURSE_DATE_FORMAT)
                .map(Some)
                .map_err(|_| PlannerError::InvalidDate(raw.to_string())),
        }
    }

    /// First training date; an unparseable date is logged and ignored.
    pub fn start_date(&self) -> Option<NaiveDate> {
        self.parse_start_date().unwrap_or_else(|e| {
            warn!("{e}; days will be undated");
            None
        })
    }

    /// Sum of all Learning Unit allotments.
    pub fn total_training_minutes(&self) -> Minutes {
        self.learning_units.iter().map(|lu| lu.duration_minutes()).sum()
    }

    /// Sum of all assessment method allotments.
    pub fn total_assessment_minutes(&self) -> Minutes {
        self.assessment_methods.iter().map(|m| m.minutes()).sum()
    }
}

/// A Learning Unit: a titled block of topics with an allotted duration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LearningUnit {
    /// Title, conventionally `"LU<n>: ..."`.
    #[serde(rename = "LU_Title", default)]
    pub title: String,
    /// Allotted time, e.g. `"3.5 hrs"`.
    #[serde(rename = "LU_Duration", default)]
    pub duration: String,
    /// Topics in delivery order.
    #[serde(rename = "Topics", default)]
    pub topics: Vec<Topic>,
    /// Instructional methods used across this unit.
    #[serde(rename = "Instructional_Methods", default)]
    pub instructional_methods: MethodList,
}

impl LearningUnit {
    /// Creates a Learning Unit.
    pub fn new(title: impl Into<String>, duration: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            duration: duration.into(),
            ..Default::default()
        }
    }

    /// Adds a topic.
    pub fn with_topic(mut self, topic: Topic) -> Self {
        self.topics.push(topic);
        self
    }

    /// Sets the instructional methods.
    pub fn with_methods<I, S>(mut self, methods: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.instructional_methods = MethodList::List(methods.into_iter().map(Into::into).collect());
        self
    }

    /// Allotted minutes (0 if the duration text is unparseable).
    pub fn duration_minutes(&self) -> Minutes {
        parse_duration(&self.duration)
    }

    /// The `n` of a `"LU<n>:"` title prefix.
    pub fn number(&self) -> Option<u32> {
        lu_number_prefix(&self.title)
    }
}

/// A topic within a Learning Unit.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Topic {
    /// Title, conventionally `"Topic <n>: ..."`.
    #[serde(rename = "Topic_Title", default)]
    pub title: String,
    /// Content bullet points.
    #[serde(rename = "Bullet_Points", default)]
    pub bullet_points: Vec<String>,
}

impl Topic {
    /// Creates a topic.
    pub fn new<I, S>(title: impl Into<String>, bullet_points: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            title: title.into(),
            bullet_points: bullet_points.into_iter().map(Into::into).collect(),
        }
    }

    /// The `n` of a `"Topic <n>"` title prefix.
    pub fn number(&self) -> Option<u32> {
        topic_number_prefix(&self.title)
    }
}

/// An assessment method delivered at the end of the course.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AssessmentMethod {
    /// Full method name, e.g. `"Case Study"`.
    #[serde(rename = "Assessment_Method", default)]
    pub name: String,
    /// Short code, e.g. `"CS"`.
    #[serde(rename = "Method_Abbreviation", default, skip_serializing_if = "Option::is_none")]
    pub abbreviation: Option<String>,
    /// Delivery time, e.g. `"1 hr"`.
    #[serde(rename = "Total_Delivery_Hours", default)]
    pub total_delivery_hours: String,
}

impl AssessmentMethod {
    /// Creates an assessment method.
    pub fn new(name: impl Into<String>, total_delivery_hours: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            abbreviation: None,
            total_delivery_hours: total_delivery_hours.into(),
        }
    }

    /// Sets the abbreviation.
    pub fn with_abbreviation(mut self, abbreviation: impl Into<String>) -> Self {
        self.abbreviation = Some(abbreviation.into());
        self
    }

    /// Configured delivery minutes.
    pub fn minutes(&self) -> Minutes {
        parse_duration(&self.total_delivery_hours)
    }
}

/// Instructional methods, written either as a list or a single string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MethodList {
    /// `["Lecture", "Case Study"]`
    List(Vec<String>),
    /// `"Lecture, Case Study"`
    Text(String),
}

impl Default for MethodList {
    fn default() -> Self {
        MethodList::List(Vec::new())
    }
}

impl MethodList {
    /// Comma-joined form.
    pub fn joined(&self) -> String {
        match self {
            MethodList::List(items) => items
                .iter()
                .map(|s| s.trim())
                .filter(|s| !s.is_empty())
                .collect::<Vec<_>>()
                .join(", "),
            MethodList::Text(text) => text.trim().to_string(),
        }
    }

    /// Whether no usable method is recorded (empty or `N/A`).
    pub fn is_blank(&self) -> bool {
        let joined = self.joined();
        joined.is_empty() || joined.eq_ignore_ascii_case("n/a")
    }
}

/// `n` from a title starting with `"LU<n>"`.
pub fn lu_number_prefix(title: &str) -> Option<u32> {
    LU_PREFIX.captures(title).and_then(|c| c[1].parse().ok())
}

/// `n` from the first `"LU<n>"` / `"Learning Unit <n>"` anywhere in a title.
pub fn lu_number_anywhere(title: &str) -> Option<u32> {
    LU_ANYWHERE.captures(title).and_then(|c| c[1].parse().ok())
}

/// `n` from a title starting with `"Topic <n>"`.
pub fn topic_number_prefix(title: &str) -> Option<u32> {
    TOPIC_PREFIX.captures(title).and_then(|c| c[1].parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "Date": "02 Jun 2025",
        "Course_Title": "Conflict Management",
        "Learning_Units": [
            {
                "LU_Title": "LU1: Identify Conflicts",
                "LU_Duration": "3.5 hrs",
                "Topics": [
                    {"Topic_Title": "Topic 1: Identify Conflicts (K1, A1)", "Bullet_Points": ["a", "b"]}
                ],
                "Instructional_Methods": ["Lecture", "Case Study"]
            },
            {
                "LU_Title": "LU2: Resolve Conflicts",
                "LU_Duration": "2 hrs",
                "Topics": [],
                "Instructional_Methods": "Role Play"
            }
        ],
        "Assessment_Methods_Details": [
            {"Assessment_Method": "Case Study", "Method_Abbreviation": "CS", "Total_Delivery_Hours": "1 hr", "Retention_Period": "3 years"}
        ],
        "UEN": "ignored"
    }"#;

    #[test]
    fn test_parse_course_json() {
        let course = CourseContext::from_json(SAMPLE).unwrap();
        assert_eq!(course.title, "Conflict Management");
        assert_eq!(course.learning_units.len(), 2);
        assert_eq!(course.learning_units[0].duration_minutes(), 210);
        assert_eq!(course.learning_units[0].topics[0].number(), Some(1));
        assert_eq!(course.learning_units[0].number(), Some(1));
        assert_eq!(
            course.learning_units[0].instructional_methods.joined(),
            "Lecture, Case Study"
        );
        assert_eq!(course.learning_units[1].instructional_methods.joined(), "Role Play");
        assert_eq!(course.assessment_methods[0].minutes(), 60);
        assert_eq!(course.assessment_methods[0].abbreviation.as_deref(), Some("CS"));
        assert_eq!(course.total_training_minutes(), 330);
        assert_eq!(course.total_assessment_minutes(), 60);
        assert!(course.seed_plan.is_empty());
    }

    #[test]
    fn test_start_date() {
        let course = CourseContext::new("c").with_date("02 Jun 2025");
        assert_eq!(course.start_date(), NaiveDate::from_ymd_opt(2025, 6, 2));

        let bad = CourseContext::new("c").with_date("June 2nd");
        assert!(matches!(bad.parse_start_date(), Err(PlannerError::InvalidDate(_))));
        assert_eq!(bad.start_date(), None);

        assert_eq!(CourseContext::new("c").start_date(), None);
    }

    #[test]
    fn test_invalid_json() {
        assert!(matches!(
            CourseContext::from_json("{\"Learning_Units\": 3}"),
            Err(PlannerError::Json(_))
        ));
    }

    #[test]
    fn test_number_extraction() {
        assert_eq!(lu_number_prefix("LU12: Advanced"), Some(12));
        assert_eq!(lu_number_prefix("Activity: LU1: x"), None);
        assert_eq!(lu_number_anywhere("Activity: LU3: Practice"), Some(3));
        assert_eq!(lu_number_anywhere("Recap of Learning Unit 2"), Some(2));
        assert_eq!(topic_number_prefix("topic 4: Review"), Some(4));
        assert_eq!(topic_number_prefix("Lunch Break"), None);
    }

    #[test]
    fn test_method_list_blank() {
        assert!(MethodList::default().is_blank());
        assert!(MethodList::Text("N/A".into()).is_blank());
        assert!(!MethodList::List(vec!["Lecture".into()]).is_blank());
    }
}
