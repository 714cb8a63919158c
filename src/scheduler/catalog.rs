//! Delivery-metadata catalog.
//!
//! Maps topics and activities to the instructional methods, resources and
//! reference line the upstream timetable generator chose for them. Lookups
//! are keyed, not fuzzy:
//!
//! 1. Topics by topic number (`"Topic 3: ..."` → `Topic(3)`), else by the
//!    exact case-folded title.
//! 2. Activities by Learning Unit number (`"Activity: LU2: ..."` →
//!    `Activity(2)`), else the first activity seen in the seed.
//! 3. Otherwise the configured fallback.
//!
//! When a key appears more than once in the seed, the first occurrence wins.

use std::collections::HashMap;

use log::debug;

use crate::config::FallbackMeta;
use crate::models::{
    lu_number_anywhere, topic_number_prefix, LearningUnit, SeedDay, SeedSession, SessionMeta,
    SlotKind, Topic,
};

/// Lookup key of a catalog entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CatalogKey {
    /// Topic number.
    Topic(u32),
    /// Learning Unit number of an activity.
    Activity(u32),
    /// Case-folded title of an unnumbered topic.
    Title(String),
}

impl CatalogKey {
    fn for_title(title: &str) -> Self {
        Self::Title(title.trim().to_lowercase())
    }
}

/// Keyed delivery metadata borrowed from a seed lesson plan.
#[derive(Debug, Clone, Default)]
pub struct MethodCatalog {
    entries: HashMap<CatalogKey, SessionMeta>,
    first_activity: Option<SessionMeta>,
    fallback: FallbackMeta,
}

impl MethodCatalog {
    /// Creates an empty catalog answering only with `fallback`.
    pub fn new(fallback: FallbackMeta) -> Self {
        Self {
            entries: HashMap::new(),
            first_activity: None,
            fallback,
        }
    }

    /// Builds a catalog from the content sessions of a seed plan.
    pub fn from_seed(seed: &[SeedDay], fallback: FallbackMeta) -> Self {
        let mut catalog = Self::new(fallback);
        for session in seed.iter().flat_map(|d| d.sessions.iter()) {
            catalog.insert_seed(session);
        }
        debug!("Method catalog built with {} keyed entries", catalog.len());
        catalog
    }

    /// Records a seed session. Fixed slots (breaks, attendance, ...) are ignored.
    pub fn insert_seed(&mut self, session: &SeedSession) {
        let title = session.instruction_title.trim();
        if title.is_empty() {
            return;
        }
        match SlotKind::classify(title) {
            SlotKind::Topic => {
                let key = topic_number_prefix(title)
                    .map(CatalogKey::Topic)
                    .unwrap_or_else(|| CatalogKey::for_title(title));
                let meta = self.merge(session, &self.fallback.topic);
                self.entries.entry(key).or_insert(meta);
            }
            SlotKind::Activity => {
                let meta = self.merge(session, &self.fallback.activity);
                if self.first_activity.is_none() {
                    self.first_activity = Some(meta.clone());
                }
                if let Some(lu) = lu_number_anywhere(title) {
                    self.entries.entry(CatalogKey::Activity(lu)).or_insert(meta);
                }
            }
            _ => {}
        }
    }

    /// Metadata for a topic.
    pub fn topic_meta(&self, topic: &Topic) -> SessionMeta {
        let key = topic
            .number()
            .map(CatalogKey::Topic)
            .unwrap_or_else(|| CatalogKey::for_title(&topic.title));
        self.entries
            .get(&key)
            .cloned()
            .unwrap_or_else(|| self.fallback.topic.clone())
    }

    /// Metadata for the activity closing a Learning Unit.
    pub fn activity_meta(&self, unit: &LearningUnit) -> SessionMeta {
        unit.number()
            .and_then(|n| self.entries.get(&CatalogKey::Activity(n)))
            .or(self.first_activity.as_ref())
            .cloned()
            .unwrap_or_else(|| self.fallback.activity.clone())
    }

    /// Fallback for content with no topic of its own.
    pub fn default_topic_meta(&self) -> SessionMeta {
        self.fallback.topic.clone()
    }

    /// Number of keyed entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no keyed entry was recorded.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn merge(&self, session: &SeedSession, fallback: &SessionMeta) -> SessionMeta {
        let pick = |value: &Option<String>, default: &str| match value.as_deref().map(str::trim) {
            Some(v) if !v.is_empty() => v.to_string(),
            _ => default.to_string(),
        };
        SessionMeta::new(
            pick(&session.instructional_methods, &fallback.instructional_methods),
            pick(&session.resources, &fallback.resources),
            pick(&session.reference_line, &fallback.reference_line),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seed() -> Vec<SeedDay> {
        vec![SeedDay {
            day: "Day 1".into(),
            sessions: vec![
                SeedSession::new("0930hrs - 0945hrs (15 mins)", "Digital Attendance and Introduction to the Course")
                    .with_meta("N/A", "QR Attendance", ""),
                SeedSession::new("0945hrs - 1040hrs (55 mins)", "Topic 1: Identify Conflicts (K1, A1, A6)")
                    .with_meta("Lecture, Group Discussion", "Slide page 1-5", "Refer to references"),
                SeedSession::new("1040hrs - 1140hrs (60 mins)", "Activity: Peer Sharing on Conflict Identification")
                    .with_meta("Peer Sharing", "N/A", "Refer to discussion"),
                SeedSession::new("1140hrs - 1200hrs (20 mins)", "Topic 1: Identify Conflicts (Cont.)")
                    .with_meta("Lecture", "Slide page 6-10", "Other"),
                SeedSession::new("1245hrs - 1345hrs (60 mins)", "Activity: LU2: Case Study")
                    .with_meta("Case Study", "", "Refer to case studies"),
                SeedSession::new("1345hrs - 1445hrs (60 mins)", "Wrap-up Discussion"),
            ],
        }]
    }

    #[test]
    fn test_topic_lookup_by_number() {
        let catalog = MethodCatalog::from_seed(&seed(), FallbackMeta::default());
        let topic = Topic::new("Topic 1: Identify Conflicts (K1, A1, A6)", Vec::<String>::new());
        let meta = catalog.topic_meta(&topic);
        // First occurrence wins over the "(Cont.)" session
        assert_eq!(meta.instructional_methods, "Lecture, Group Discussion");
        assert_eq!(meta.resources, "Slide page 1-5");
    }

    #[test]
    fn test_topic_lookup_by_title() {
        let catalog = MethodCatalog::from_seed(&seed(), FallbackMeta::default());
        let meta = catalog.topic_meta(&Topic::new("wrap-up discussion", Vec::<String>::new()));
        // Seed session had no metadata: fallback fields fill in
        assert_eq!(meta, FallbackMeta::default().topic);
    }

    #[test]
    fn test_topic_fallback() {
        let catalog = MethodCatalog::from_seed(&seed(), FallbackMeta::default());
        let meta = catalog.topic_meta(&Topic::new("Topic 9: Unknown", Vec::<String>::new()));
        assert_eq!(meta.instructional_methods, "Lecture, Didactic Questioning");
    }

    #[test]
    fn test_activity_lookup() {
        let catalog = MethodCatalog::from_seed(&seed(), FallbackMeta::default());

        let lu2 = LearningUnit::new("LU2: Conflict Resolution Strategies", "3.5 hrs");
        let meta = catalog.activity_meta(&lu2);
        assert_eq!(meta.instructional_methods, "Case Study");
        // Empty resources fall back
        assert_eq!(meta.resources, "Slide pages, TV, Wi-Fi");

        let lu1 = LearningUnit::new("LU1: Identify Conflicts", "3.5 hrs");
        assert_eq!(catalog.activity_meta(&lu1).instructional_methods, "Peer Sharing");
    }

    #[test]
    fn test_empty_catalog() {
        let catalog = MethodCatalog::new(FallbackMeta::default());
        assert!(catalog.is_empty());
        let lu = LearningUnit::new("LU1: X", "1 hr");
        assert_eq!(
            catalog.activity_meta(&lu).instructional_methods,
            "Demonstration, Practical Performance Practice"
        );
    }
}
