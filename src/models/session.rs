//! Session (queue item) model.
//!
//! A session is a pending piece of course content waiting in the scheduling
//! queue: one topic, or the trailing activity of a Learning Unit. Sessions
//! are value records. Splitting one across a window boundary produces two
//! new records (delivered part and remainder) and leaves the original intact.

use serde::{Deserialize, Serialize};

use super::duration::Minutes;

/// What a session delivers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SessionKind {
    /// Lecture content for one topic.
    Topic,
    /// Practical activity closing a Learning Unit.
    Activity,
}

/// How bullet points are divided when a session is split.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BulletSplit {
    /// First `len / 2` bullets go to the delivered part.
    #[default]
    Half,
    /// Delivered part gets `max(1, len * delivered / duration)` bullets.
    Proportional,
}

impl BulletSplit {
    /// Number of bullets the delivered part takes.
    pub fn delivered_count(self, bullets: usize, delivered: Minutes, duration: Minutes) -> usize {
        if bullets == 0 {
            return 0;
        }
        match self {
            BulletSplit::Half => bullets / 2,
            BulletSplit::Proportional => {
                let share = if duration > 0 {
                    (bullets as i64 * delivered / duration).max(0) as usize
                } else {
                    0
                };
                share.max(1).min(bullets)
            }
        }
    }
}

/// Delivery metadata attached to a session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionMeta {
    /// Comma-separated instructional methods.
    pub instructional_methods: String,
    /// Comma-separated resources.
    pub resources: String,
    /// Reference line shown under the session.
    pub reference_line: String,
}

impl SessionMeta {
    /// Creates delivery metadata.
    pub fn new(
        instructional_methods: impl Into<String>,
        resources: impl Into<String>,
        reference_line: impl Into<String>,
    ) -> Self {
        Self {
            instructional_methods: instructional_methods.into(),
            resources: resources.into(),
            reference_line: reference_line.into(),
        }
    }
}

/// A pending unit of content in the scheduling queue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Topic or activity.
    pub kind: SessionKind,
    /// Display title.
    pub title: String,
    /// Minutes still to deliver.
    pub duration: Minutes,
    /// Bullet points still to deliver.
    pub bullet_points: Vec<String>,
    /// Methods, resources and reference line.
    pub meta: SessionMeta,
    /// Index of the originating Learning Unit in the course.
    pub learning_unit: usize,
}

impl Session {
    /// Creates a topic session.
    pub fn topic(
        title: impl Into<String>,
        duration: Minutes,
        bullet_points: Vec<String>,
        meta: SessionMeta,
        learning_unit: usize,
    ) -> Self {
        Self {
            kind: SessionKind::Topic,
            title: title.into(),
            duration,
            bullet_points,
            meta,
            learning_unit,
        }
    }

    /// Creates an activity session (no bullet points).
    pub fn activity(
        title: impl Into<String>,
        duration: Minutes,
        meta: SessionMeta,
        learning_unit: usize,
    ) -> Self {
        Self {
            kind: SessionKind::Activity,
            title: title.into(),
            duration,
            bullet_points: Vec::new(),
            meta,
            learning_unit,
        }
    }

    /// Same session with a different duration.
    pub fn with_duration(&self, duration: Minutes) -> Self {
        Self {
            duration,
            ..self.clone()
        }
    }

    /// Same session with `minutes` more, delivering `bullets` ahead of its own.
    pub fn carrying(self, minutes: Minutes, bullets: Vec<String>) -> Self {
        let mut bullet_points = bullets;
        bullet_points.extend(self.bullet_points);
        Self {
            duration: self.duration + minutes,
            bullet_points,
            ..self
        }
    }

    /// Same session taking over the time and bullets of `next`.
    pub fn absorbing(mut self, next: Session) -> Self {
        self.duration += next.duration;
        self.bullet_points.extend(next.bullet_points);
        self
    }

    /// Splits off the first `delivered` minutes.
    ///
    /// Returns `(delivered_part, remainder)`. Bullets are divided by
    /// `policy`; the two parts never share a bullet.
    pub fn split(&self, delivered: Minutes, policy: BulletSplit) -> (Self, Self) {
        let count = policy.delivered_count(self.bullet_points.len(), delivered, self.duration);
        let (head, tail) = self.bullet_points.split_at(count);

        let delivered_part = Self {
            duration: delivered,
            bullet_points: head.to_vec(),
            ..self.clone()
        };
        let remainder = Self {
            duration: self.duration - delivered,
            bullet_points: tail.to_vec(),
            ..self.clone()
        };
        (delivered_part, remainder)
    }
}
