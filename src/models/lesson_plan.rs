//! Lesson plan (solution) model.
//!
//! A lesson plan is the assembled multi-day timetable: each day is a
//! gap-free sequence of slots, some carrying course content and some fixed
//! (attendance, breaks, recap, feedback, assessments).
//!
//! [`RenderedLessonPlan`] is the document-facing form with separate
//! `starttime` / `endtime` / `duration` strings, produced by
//! [`crate::postprocess::add_start_end_duration`].

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::duration::Minutes;
use super::session::{Session, SessionKind};
use super::time::{ClockTime, TimeRange};

/// Classification of a lesson-plan slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SlotKind {
    /// Digital attendance (and introduction on day 1).
    Attendance,
    /// Topic content.
    Topic,
    /// Learning Unit activity.
    Activity,
    /// Lunch break.
    LunchBreak,
    /// Afternoon tea break.
    TeaBreak,
    /// Closing recap of a non-final day.
    Recap,
    /// Course feedback / TRAQOM survey.
    Feedback,
    /// Final assessment.
    Assessment,
}

impl SlotKind {
    /// Whether this slot carries Learning Unit content.
    pub fn is_content(self) -> bool {
        matches!(self, SlotKind::Topic | SlotKind::Activity)
    }

    /// Whether this slot is a break.
    pub fn is_break(self) -> bool {
        matches!(self, SlotKind::LunchBreak | SlotKind::TeaBreak)
    }

    /// Best-effort classification from a free-text title.
    pub fn classify(title: &str) -> Self {
        let lower = title.trim().to_lowercase();
        if lower.contains("lunch") {
            SlotKind::LunchBreak
        } else if lower.contains("break") {
            SlotKind::TeaBreak
        } else if lower.starts_with("final assessment") {
            SlotKind::Assessment
        } else if lower.contains("traqom") || lower.contains("course feedback") {
            SlotKind::Feedback
        } else if lower.contains("recap") {
            SlotKind::Recap
        } else if lower.contains("attendance") {
            SlotKind::Attendance
        } else if lower.starts_with("activity") {
            SlotKind::Activity
        } else {
            SlotKind::Topic
        }
    }
}

impl From<SessionKind> for SlotKind {
    fn from(kind: SessionKind) -> Self {
        match kind {
            SessionKind::Topic => SlotKind::Topic,
            SessionKind::Activity => SlotKind::Activity,
        }
    }
}

/// One timed slot in a day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionEntry {
    /// Clock interval.
    pub time: TimeRange,
    /// Slot classification.
    pub kind: SlotKind,
    /// Display title.
    pub title: String,
    /// Bullet points delivered in this slot.
    pub bullet_points: Vec<String>,
    /// Comma-separated instructional methods.
    pub instructional_methods: String,
    /// Comma-separated resources.
    pub resources: String,
    /// Reference line.
    pub reference_line: String,
    /// Originating Learning Unit index for content slots.
    pub learning_unit: Option<usize>,
}

impl SessionEntry {
    /// Creates a fixed (non-content) slot.
    pub fn fixed(
        kind: SlotKind,
        time: TimeRange,
        title: impl Into<String>,
        instructional_methods: impl Into<String>,
        resources: impl Into<String>,
    ) -> Self {
        Self {
            time,
            kind,
            title: title.into(),
            bullet_points: Vec::new(),
            instructional_methods: instructional_methods.into(),
            resources: resources.into(),
            reference_line: String::new(),
            learning_unit: None,
        }
    }

    /// Creates a content slot delivering `session` in `time`.
    pub fn from_session(session: &Session, time: TimeRange) -> Self {
        Self {
            time,
            kind: session.kind.into(),
            title: session.title.clone(),
            bullet_points: session.bullet_points.clone(),
            instructional_methods: session.meta.instructional_methods.clone(),
            resources: session.meta.resources.clone(),
            reference_line: session.meta.reference_line.clone(),
            learning_unit: Some(session.learning_unit),
        }
    }

    /// Sets bullet points.
    pub fn with_bullets<I, S>(mut self, bullets: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.bullet_points = bullets.into_iter().map(Into::into).collect();
        self
    }

    /// Slot length in minutes.
    #[inline]
    pub fn minutes(&self) -> Minutes {
        self.time.minutes()
    }

    /// Combined `"0930hrs - 0945hrs (15 mins)"` label.
    pub fn time_label(&self) -> String {
        self.time.to_string()
    }
}

/// One training day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Day {
    /// 1-based day number.
    pub number: usize,
    /// Calendar date, when the course start date is known.
    pub date: Option<NaiveDate>,
    /// Slots in time order.
    pub sessions: Vec<SessionEntry>,
}

impl Day {
    /// Creates an empty day.
    pub fn new(number: usize, date: Option<NaiveDate>) -> Self {
        Self {
            number,
            date,
            sessions: Vec::new(),
        }
    }

    /// `"Day N"` label.
    pub fn label(&self) -> String {
        format!("Day {}", self.number)
    }

    /// Appends a slot.
    pub fn push(&mut self, entry: SessionEntry) {
        self.sessions.push(entry);
    }

    /// End of the last slot.
    pub fn end_time(&self) -> Option<ClockTime> {
        self.sessions.last().map(|s| s.time.end)
    }

    /// Sum of all slot lengths.
    pub fn total_minutes(&self) -> Minutes {
        self.sessions.iter().map(SessionEntry::minutes).sum()
    }

    /// Sum of slot lengths of the given kind.
    pub fn minutes_of(&self, kind: SlotKind) -> Minutes {
        self.sessions
            .iter()
            .filter(|s| s.kind == kind)
            .map(SessionEntry::minutes)
            .sum()
    }
}

/// A complete multi-day lesson plan.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LessonPlan {
    /// Days in order.
    pub days: Vec<Day>,
}

impl LessonPlan {
    /// Creates a plan from days.
    pub fn new(days: Vec<Day>) -> Self {
        Self { days }
    }

    /// Number of days.
    pub fn day_count(&self) -> usize {
        self.days.len()
    }

    /// Total number of slots.
    pub fn session_count(&self) -> usize {
        self.days.iter().map(|d| d.sessions.len()).sum()
    }

    /// Final day.
    pub fn last_day(&self) -> Option<&Day> {
        self.days.last()
    }

    /// All slots across all days.
    pub fn sessions(&self) -> impl Iterator<Item = &SessionEntry> {
        self.days.iter().flat_map(|d| d.sessions.iter())
    }

    /// Mutable access to all slots across all days.
    pub fn sessions_mut(&mut self) -> impl Iterator<Item = &mut SessionEntry> {
        self.days.iter_mut().flat_map(|d| d.sessions.iter_mut())
    }
}

/// Document-facing session record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderedSession {
    /// `"HHMM"`.
    pub starttime: String,
    /// `"HHMM"`.
    pub endtime: String,
    /// `"Xh Ymin"`.
    pub duration: String,
    /// Slot title.
    pub instruction_title: String,
    /// Bullet points delivered in the slot.
    pub bullet_points: Vec<String>,
    /// Comma-separated instructional methods.
    #[serde(rename = "Instructional_Methods")]
    pub instructional_methods: String,
    /// Comma-separated resources.
    #[serde(rename = "Resources")]
    pub resources: String,
    /// Reference line shown under the slot.
    pub reference_line: String,
}

/// Document-facing day record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderedDay {
    /// `"Day N"`.
    #[serde(rename = "Day")]
    pub day: String,
    /// `"%d %b %Y"`, when known.
    #[serde(rename = "Date", default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    /// Slots in clock order.
    #[serde(rename = "Sessions")]
    pub sessions: Vec<RenderedSession>,
}

/// Document-facing lesson plan.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderedLessonPlan {
    /// Days in course order.
    pub lesson_plan: Vec<RenderedDay>,
}

impl RenderedLessonPlan {
    /// Serializes to pretty JSON.
    pub fn to_json(&self) -> crate::error::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SessionMeta;

    #[test]
    fn test_classify() {
        assert_eq!(SlotKind::classify("Lunch Break"), SlotKind::LunchBreak);
        assert_eq!(SlotKind::classify("Afternoon Break"), SlotKind::TeaBreak);
        assert_eq!(SlotKind::classify("Tea Break"), SlotKind::TeaBreak);
        assert_eq!(
            SlotKind::classify("Final Assessment: Case Study (CS)"),
            SlotKind::Assessment
        );
        assert_eq!(
            SlotKind::classify("Course Feedback and TRAQOM Survey"),
            SlotKind::Feedback
        );
        assert_eq!(SlotKind::classify("Recap All Contents and Close"), SlotKind::Recap);
        assert_eq!(SlotKind::classify("Digital Attendance (AM)"), SlotKind::Attendance);
        assert_eq!(
            SlotKind::classify("Activity: Case Study on Conflict Resolution"),
            SlotKind::Activity
        );
        assert_eq!(SlotKind::classify("Topic 2: Strategies"), SlotKind::Topic);
    }

    #[test]
    fn test_entry_from_session() {
        let session = Session::topic(
            "Topic 1: Intro",
            60,
            vec!["a".into()],
            SessionMeta::new("Lecture", "Slides", "Refer"),
            2,
        );
        let entry =
            SessionEntry::from_session(&session, TimeRange::starting_at(ClockTime::hm(9, 45), 60));
        assert_eq!(entry.kind, SlotKind::Topic);
        assert_eq!(entry.minutes(), 60);
        assert_eq!(entry.learning_unit, Some(2));
        assert_eq!(entry.time_label(), "0945hrs - 1045hrs (60 mins)");
    }

    #[test]
    fn test_day_totals() {
        let mut day = Day::new(2, None);
        day.push(SessionEntry::fixed(
            SlotKind::Attendance,
            TimeRange::starting_at(ClockTime::hm(9, 30), 10),
            "Digital Attendance (AM)",
            "N/A",
            "QR Attendance",
        ));
        day.push(SessionEntry::fixed(
            SlotKind::LunchBreak,
            TimeRange::starting_at(ClockTime::hm(9, 40), 45),
            "Lunch Break",
            "N/A",
            "N/A",
        ));
        assert_eq!(day.label(), "Day 2");
        assert_eq!(day.total_minutes(), 55);
        assert_eq!(day.minutes_of(SlotKind::LunchBreak), 45);
        assert_eq!(day.end_time(), Some(ClockTime::hm(10, 25)));
    }
}
