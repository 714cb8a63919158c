//! Planner configuration.
//!
//! Everything the day assembler treats as a constant (clock frame, slot
//! lengths, the topic/activity split, fixed slot wording, fallback delivery
//! metadata) lives here and can be overridden from TOML. Every field is
//! optional; missing fields keep their defaults.
//!
//! ```toml
//! topic_share = 0.8
//! bullet_split = "proportional"
//!
//! [day]
//! day_start = "0900"
//! day_end = "1800"
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{PlannerError, Result};
use crate::models::{BulletSplit, DayTemplate, SessionMeta};

/// Complete planner configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    /// Clock frame of a training day.
    pub day: DayTemplate,
    /// Share of a Learning Unit given to its topics; the rest is activity.
    pub topic_share: f64,
    /// Bullet division when a session is split across windows.
    pub bullet_split: BulletSplit,
    /// Wording of fixed slots.
    pub labels: SlotLabels,
    /// Delivery metadata used when the seed plan has no match.
    pub fallback: FallbackMeta,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            day: DayTemplate::default(),
            topic_share: 0.85,
            bullet_split: BulletSplit::Half,
            labels: SlotLabels::default(),
            fallback: FallbackMeta::default(),
        }
    }
}

/// Titles, bullets and resources of the fixed slots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SlotLabels {
    /// Title of day 1's attendance and introduction slot.
    pub first_day_attendance_title: String,
    /// Bullets of day 1's attendance slot.
    pub first_day_attendance_bullets: Vec<String>,
    /// Title of the attendance slot on later days.
    pub attendance_title: String,
    /// Resources of every attendance slot.
    pub attendance_resources: String,
    /// Lunch slot title.
    pub lunch_title: String,
    /// Tea break slot title.
    pub tea_break_title: String,
    /// Tea break resources.
    pub tea_break_resources: String,
    /// Title of the closing recap.
    pub recap_title: String,
    /// Bullets of the closing recap.
    pub recap_bullets: Vec<String>,
    /// Instructional methods of the closing recap.
    pub recap_methods: String,
    /// Resources of the closing recap.
    pub recap_resources: String,
    /// Title of the final-day feedback slot.
    pub feedback_title: String,
    /// Resources of the final-day feedback slot.
    pub feedback_resources: String,
    /// Prepended to each assessment method name.
    pub assessment_prefix: String,
    /// Instructional methods of assessment slots.
    pub assessment_methods: String,
    /// Resources of assessment slots.
    pub assessment_resources: String,
}

impl Default for SlotLabels {
    fn default() -> Self {
        Self {
            first_day_attendance_title: "Digital Attendance and Introduction to the Course".into(),
            first_day_attendance_bullets: vec![
                "Trainer Introduction".into(),
                "Learner Introduction".into(),
                "Overview of Course Structure".into(),
            ],
            attendance_title: "Digital Attendance (AM)".into(),
            attendance_resources: "QR Attendance, Attendance Sheet".into(),
            lunch_title: "Lunch Break".into(),
            tea_break_title: "Tea Break".into(),
            tea_break_resources: "Refreshments".into(),
            recap_title: "Recap All Contents and Close".into(),
            recap_bullets: vec!["Summary of key learning points".into(), "Q&A".into()],
            recap_methods: "Classroom Didactic Questioning, Practical Performance (PP)".into(),
            recap_resources: "Slide pages, TV, Whiteboard, Wi-Fi".into(),
            feedback_title: "Course Feedback and TRAQOM Survey".into(),
            feedback_resources: "Feedback Forms, Survey Links".into(),
            assessment_prefix: "Final Assessment: ".into(),
            assessment_methods: "Assessment".into(),
            assessment_resources: "Assessment Plan".into(),
        }
    }
}

/// Default delivery metadata for topics and activities.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FallbackMeta {
    /// Used for topics.
    pub topic: SessionMeta,
    /// Used for activities.
    pub activity: SessionMeta,
}

impl Default for FallbackMeta {
    fn default() -> Self {
        Self {
            topic: SessionMeta::new(
                "Lecture, Didactic Questioning",
                "Slide pages, TV, Whiteboard, Wi-Fi",
                "Refer to some online references in Google Classroom LMS",
            ),
            activity: SessionMeta::new(
                "Demonstration, Practical Performance Practice",
                "Slide pages, TV, Wi-Fi",
                "Refer to some online practices in Google Classroom LMS",
            ),
        }
    }
}

impl PlannerConfig {
    /// Parses and validates configuration from a TOML string.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: PlannerConfig = toml::from_str(content)
            .map_err(|e| PlannerError::Config(format!("Failed to parse config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Loads and validates configuration from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&content)
    }

    /// Checks that the day frame is coherent.
    ///
    /// Slot lengths and clock times must sit on the 5-minute grid, the
    /// morning and afternoon windows must be non-empty on every day, and
    /// `topic_share` must be within `(0, 1]`.
    pub fn validate(&self) -> Result<()> {
        if !(self.topic_share > 0.0 && self.topic_share <= 1.0) {
            return Err(PlannerError::Config(format!(
                "topic_share must be in (0, 1], got {}",
                self.topic_share
            )));
        }

        let day = &self.day;
        let slots = [
            ("first_day_attendance_minutes", day.first_day_attendance_minutes),
            ("attendance_minutes", day.attendance_minutes),
            ("lunch_minutes", day.lunch_minutes),
            ("tea_break_minutes", day.tea_break_minutes),
            ("recap_minutes", day.recap_minutes),
            ("feedback_minutes", day.feedback_minutes),
        ];
        for (name, minutes) in slots {
            if minutes < 0 || minutes % 5 != 0 {
                return Err(PlannerError::Config(format!(
                    "{name} must be a non-negative multiple of 5, got {minutes}"
                )));
            }
        }

        for (name, clock) in [
            ("day_start", day.day_start),
            ("lunch_start", day.lunch_start),
            ("day_end", day.day_end),
        ] {
            if clock.minutes_since_midnight() % 5 != 0 {
                return Err(PlannerError::Config(format!(
                    "{name} must sit on the 5-minute grid, got {clock}"
                )));
            }
        }

        for first_day in [true, false] {
            if day.morning_window(first_day).minutes() == 0 {
                return Err(PlannerError::Config(
                    "morning block is empty: attendance runs into lunch".into(),
                ));
            }
        }
        if day.afternoon_window().minutes() == 0 {
            return Err(PlannerError::Config(
                "afternoon block is empty: lunch runs into the recap".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ClockTime;

    #[test]
    fn test_default_is_valid() {
        let config = PlannerConfig::default();
        assert!(config.validate().is_ok());
        assert!((config.topic_share - 0.85).abs() < 1e-12);
        assert_eq!(config.bullet_split, BulletSplit::Half);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = PlannerConfig::from_toml_str(
            r#"
            topic_share = 0.8
            bullet_split = "proportional"

            [day]
            day_start = "0900"
            lunch_minutes = 60

            [labels]
            tea_break_title = "Afternoon Break"
            "#,
        )
        .unwrap();

        assert!((config.topic_share - 0.8).abs() < 1e-12);
        assert_eq!(config.bullet_split, BulletSplit::Proportional);
        assert_eq!(config.day.day_start, ClockTime::hm(9, 0));
        assert_eq!(config.day.lunch_minutes, 60);
        assert_eq!(config.day.day_end, ClockTime::hm(18, 30));
        assert_eq!(config.labels.tea_break_title, "Afternoon Break");
        assert_eq!(config.labels.lunch_title, "Lunch Break");
    }

    #[test]
    fn test_empty_toml() {
        assert_eq!(PlannerConfig::from_toml_str("").unwrap(), PlannerConfig::default());
    }

    #[test]
    fn test_rejects_bad_share() {
        let err = PlannerConfig::from_toml_str("topic_share = 1.5").unwrap_err();
        assert!(matches!(err, PlannerError::Config(_)));
    }

    #[test]
    fn test_rejects_off_grid_slot() {
        let err = PlannerConfig::from_toml_str("[day]\nlunch_minutes = 42").unwrap_err();
        assert!(err.to_string().contains("lunch_minutes"));
    }

    #[test]
    fn test_rejects_collapsed_morning() {
        let err = PlannerConfig::from_toml_str("[day]\nlunch_start = \"0940\"").unwrap_err();
        assert!(err.to_string().contains("morning"));
    }

    #[test]
    fn test_rejects_off_grid_clock() {
        let err = PlannerConfig::from_toml_str("[day]\nday_start = \"0932\"").unwrap_err();
        assert!(err.to_string().contains("day_start"));
    }

    #[test]
    fn test_rejects_bad_clock() {
        assert!(PlannerConfig::from_toml_str("[day]\nday_start = \"9am\"").is_err());
    }

    #[test]
    fn test_missing_file() {
        let err = PlannerConfig::from_file("/nonexistent/planner.toml").unwrap_err();
        assert!(matches!(err, PlannerError::Io(_)));
    }
}
