//! Seed lesson plan from the upstream timetable generator.
//!
//! The generator emits a skeleton `{Day, Sessions: [{Time, instruction_title,
//! ...}]}` whose timings are not trusted. The planner re-derives all timing
//! and only borrows delivery metadata from it; validation can also convert
//! the skeleton into a typed [`LessonPlan`] to check it.

use log::warn;
use serde::{Deserialize, Serialize};

use super::duration::Minutes;
use super::lesson_plan::{Day, LessonPlan, SessionEntry, SlotKind};
use super::time::TimeRange;
use crate::error::Result;

/// Wrapper matching `{"lesson_plan": [...]}` documents.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SeedLessonPlan {
    /// Generated days in order.
    #[serde(default)]
    pub lesson_plan: Vec<SeedDay>,
}

impl SeedLessonPlan {
    /// Parses a seed document from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// One generated day.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SeedDay {
    /// Day label, e.g. `"Day 1"`.
    #[serde(rename = "Day", default)]
    pub day: String,
    /// Generated sessions in clock order.
    #[serde(rename = "Sessions", default)]
    pub sessions: Vec<SeedSession>,
}

/// One generated session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SeedSession {
    /// `"0930hrs - 0945hrs (15 mins)"`.
    #[serde(rename = "Time", default)]
    pub time: String,
    /// Session title; keys the method catalog.
    #[serde(default)]
    pub instruction_title: String,
    /// Generated bullet points.
    #[serde(default)]
    pub bullet_points: Vec<String>,
    /// Comma-separated methods, if the generator gave any.
    #[serde(rename = "Instructional_Methods", default)]
    pub instructional_methods: Option<String>,
    /// Comma-separated resources, if the generator gave any.
    #[serde(rename = "Resources", default)]
    pub resources: Option<String>,
    /// Reference line, if the generator gave one.
    #[serde(default)]
    pub reference_line: Option<String>,
}

impl SeedSession {
    /// Creates a seed session.
    pub fn new(time: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            time: time.into(),
            instruction_title: title.into(),
            ..Default::default()
        }
    }

    /// Sets the delivery metadata.
    pub fn with_meta(
        mut self,
        instructional_methods: impl Into<String>,
        resources: impl Into<String>,
        reference_line: impl Into<String>,
    ) -> Self {
        self.instructional_methods = Some(instructional_methods.into());
        self.resources = Some(resources.into());
        self.reference_line = Some(reference_line.into());
        self
    }

    /// Parsed time range and the stated `(N mins)` length.
    pub fn time_range(&self) -> Result<(TimeRange, Option<Minutes>)> {
        TimeRange::parse_stated(&self.time)
    }

    fn to_entry(&self) -> Result<SessionEntry> {
        let (time, _) = self.time_range()?;
        let kind = SlotKind::classify(&self.instruction_title);
        let mut entry = SessionEntry::fixed(
            kind,
            time,
            self.instruction_title.trim(),
            self.instructional_methods.clone().unwrap_or_default(),
            self.resources.clone().unwrap_or_default(),
        )
        .with_bullets(self.bullet_points.iter().cloned());
        entry.reference_line = self.reference_line.clone().unwrap_or_default();
        Ok(entry)
    }
}

/// Converts a seed skeleton into a typed plan.
///
/// Sessions whose `Time` does not parse are logged and skipped. Days are
/// numbered by position.
pub fn seed_to_lesson_plan(seed: &[SeedDay]) -> LessonPlan {
    let days = seed
        .iter()
        .enumerate()
        .map(|(idx, seed_day)| {
            let mut day = Day::new(idx + 1, None);
            for session in &seed_day.sessions {
                match session.to_entry() {
                    Ok(entry) => day.push(entry),
                    Err(e) => warn!(
                        "{}: skipping seed session '{}': {e}",
                        seed_day.day, session.instruction_title
                    ),
                }
            }
            day
        })
        .collect();
    LessonPlan::new(days)
}
