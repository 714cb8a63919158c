//! Session queue and its builder.
//!
//! # Algorithm
//!
//! Each Learning Unit is flattened into one session per topic followed by a
//! single activity session:
//!
//! 1. `topic_total = floor5(floor(lu_minutes × topic_share))`
//! 2. `activity = floor5(lu_minutes − topic_total)`; the sub-5 rounding
//!    remainder is folded back into `topic_total`.
//! 3. `topic_total` is dealt out in 5-minute units, one more unit to the
//!    leading topics when it does not divide evenly; the last topic also
//!    takes the final sub-5 remainder. The Learning Unit's minutes are
//!    therefore conserved exactly.
//! 4. When there are more topics than 5-minute units, activity minutes are
//!    lent to the topics first. A topic still below one unit is merged into
//!    the topic before it, bullets included, so no topic is dropped.
//!
//! A Learning Unit without topics contributes one topic-kind session named
//! after the unit itself.

use std::collections::VecDeque;

use log::{debug, warn};

use super::catalog::MethodCatalog;
use crate::config::PlannerConfig;
use crate::models::{
    floor_to_grid, CourseContext, LearningUnit, Minutes, Session, GRID_MINUTES,
};

/// FIFO of pending sessions with push-front for carried remainders.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionQueue {
    items: VecDeque<Session>,
}

impl SessionQueue {
    /// Creates an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a session.
    pub fn push_back(&mut self, session: Session) {
        self.items.push_back(session);
    }

    /// Puts a session at the head so it is scheduled next.
    pub fn push_front(&mut self, session: Session) {
        self.items.push_front(session);
    }

    /// Removes and returns the head.
    pub fn pop_front(&mut self) -> Option<Session> {
        self.items.pop_front()
    }

    /// Head session.
    pub fn front(&self) -> Option<&Session> {
        self.items.front()
    }

    /// Number of queued sessions.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether nothing is queued.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Sum of queued minutes.
    pub fn total_minutes(&self) -> Minutes {
        self.items.iter().map(|s| s.duration).sum()
    }

    /// Iterates queued sessions from the head.
    pub fn iter(&self) -> impl Iterator<Item = &Session> {
        self.items.iter()
    }

    /// Drops every queued session.
    pub fn clear(&mut self) {
        self.items.clear();
    }
}

impl FromIterator<Session> for SessionQueue {
    fn from_iter<I: IntoIterator<Item = Session>>(iter: I) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}

/// Splits a Learning Unit's minutes into `(topic_total, activity)`.
pub fn split_learning_unit(total: Minutes, topic_share: f64) -> (Minutes, Minutes) {
    let total = total.max(0);
    let topic_total = floor_to_grid((total as f64 * topic_share).floor() as Minutes);
    let activity = floor_to_grid(total - topic_total);
    (total - activity, activity)
}

/// Deals `topic_total` minutes out to `count` topics.
pub fn allot_topic_minutes(topic_total: Minutes, count: usize) -> Vec<Minutes> {
    if count == 0 {
        return Vec::new();
    }
    let units = topic_total.max(0) / GRID_MINUTES;
    let tail = topic_total.max(0) % GRID_MINUTES;
    let n = count as Minutes;

    let mut minutes: Vec<Minutes> = (0..n)
        .map(|i| (units / n + Minutes::from(i < units % n)) * GRID_MINUTES)
        .collect();
    if let Some(last) = minutes.last_mut() {
        *last += tail;
    }
    minutes
}

/// Flattens the course into the pending session queue.
pub fn build_session_queue(
    course: &CourseContext,
    catalog: &MethodCatalog,
    config: &PlannerConfig,
) -> SessionQueue {
    let mut queue = SessionQueue::new();

    for (index, unit) in course.learning_units.iter().enumerate() {
        let total = unit.duration_minutes();
        if total <= 0 {
            warn!(
                "Learning Unit '{}' has no usable duration ('{}'); skipped",
                unit.title, unit.duration
            );
            continue;
        }

        let (topic_total, activity) = split_learning_unit(total, config.topic_share);
        let (topic_total, activity) = lend_activity_minutes(topic_total, activity, unit.topics.len());
        debug!(
            "{}: {} min -> topics {} min, activity {} min",
            unit.title, total, topic_total, activity
        );

        enqueue_topics(&mut queue, unit, index, topic_total, catalog);

        if activity > 0 {
            queue.push_back(Session::activity(
                format!("Activity: {}", unit.title),
                activity,
                catalog.activity_meta(unit),
                index,
            ));
        }
    }

    queue
}

fn enqueue_topics(
    queue: &mut SessionQueue,
    unit: &LearningUnit,
    index: usize,
    topic_total: Minutes,
    catalog: &MethodCatalog,
) {
    if unit.topics.is_empty() {
        warn!("Learning Unit '{}' has no topics; scheduling it as one block", unit.title);
        if topic_total > 0 {
            queue.push_back(Session::topic(
                unit.title.clone(),
                topic_total,
                Vec::new(),
                catalog.default_topic_meta(),
                index,
            ));
        }
        return;
    }

    // Topics left without a full grid unit are taught inside the one before
    let allotment = allot_topic_minutes(topic_total, unit.topics.len());
    let mut pending: Option<Session> = None;
    for (topic, minutes) in unit.topics.iter().zip(allotment) {
        let session = Session::topic(
            topic.title.clone(),
            minutes,
            topic.bullet_points.clone(),
            catalog.topic_meta(topic),
            index,
        );
        pending = match pending.take() {
            Some(prev) if minutes < GRID_MINUTES => {
                warn!(
                    "Topic '{}' gets {} min; delivered within '{}'",
                    topic.title, minutes, prev.title
                );
                Some(prev.absorbing(session))
            }
            Some(prev) => {
                queue.push_back(prev);
                Some(session)
            }
            None => Some(session),
        };
    }
    if let Some(last) = pending {
        queue.push_back(last);
    }
}

/// Moves activity minutes to the topics until each topic has a grid unit.
fn lend_activity_minutes(topic_total: Minutes, activity: Minutes, topics: usize) -> (Minutes, Minutes) {
    let short = topics as Minutes - topic_total / GRID_MINUTES;
    if short <= 0 || activity <= 0 {
        return (topic_total, activity);
    }
    let lent = (short * GRID_MINUTES).min(activity);
    debug!("Lending {} activity min to {} topics", lent, topics);
    (topic_total + lent, activity - lent)
}
