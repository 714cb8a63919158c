//! Block scheduler.
//!
//! Fills one clock window of a day from the head of the session queue.
//!
//! # Algorithm
//!
//! While time remains and the queue is non-empty:
//!
//! 1. Pop the head and round its duration down to the 5-minute grid.
//! 2. If it fits, emit it whole. A sub-5-minute rounding remainder is folded
//!    into the next queued session. A head shorter than the grid hands over
//!    its bullets along with its minutes.
//! 3. Otherwise emit the part that fits (the remaining window rounded down
//!    to the grid) with its share of bullets, and push the remainder back to
//!    the head of the queue for the next window.
//!
//! The tea-break variant reserves its break out of the first emitted session
//! longer than the break, and places the break right after it. This happens
//! at most once per call.

use log::{debug, warn};

use super::queue::SessionQueue;
use crate::models::{
    floor_to_grid, round_to_nearest_5, BulletSplit, ClockTime, Day, Minutes, RoundDirection,
    SessionEntry, SlotKind, TimeRange, GRID_MINUTES,
};

/// Break carved out of the first afternoon session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeaBreak {
    /// Break length.
    pub minutes: Minutes,
    /// Slot title.
    pub title: String,
    /// Slot resources.
    pub resources: String,
}

impl TeaBreak {
    /// Creates a tea break description.
    pub fn new(minutes: Minutes, title: impl Into<String>, resources: impl Into<String>) -> Self {
        Self {
            minutes,
            title: title.into(),
            resources: resources.into(),
        }
    }
}

/// Schedules queued sessions into `[start, end)`.
///
/// Returns the time reached: `end` when the queue outlasts the window,
/// earlier when the queue runs dry.
///
/// # Example
/// ```
/// use u_timetable::models::{ClockTime, Day, Session, SessionMeta, BulletSplit};
/// use u_timetable::scheduler::{schedule_block, SessionQueue};
///
/// let mut queue = SessionQueue::new();
/// queue.push_back(Session::topic("Topic 1: Intro", 90, vec![], SessionMeta::default(), 0));
///
/// let mut day = Day::new(1, None);
/// let end = schedule_block(
///     &mut day,
///     &mut queue,
///     ClockTime::hm(9, 45),
///     ClockTime::hm(12, 0),
///     BulletSplit::Half,
/// );
/// assert_eq!(end, ClockTime::hm(11, 15));
/// assert!(queue.is_empty());
/// ```
pub fn schedule_block(
    day: &mut Day,
    queue: &mut SessionQueue,
    start: ClockTime,
    end: ClockTime,
    split: BulletSplit,
) -> ClockTime {
    fill_window(day, queue, start, end, split, None)
}

/// [`schedule_block`] with a tea break after the first session.
pub fn schedule_block_with_tea_break(
    day: &mut Day,
    queue: &mut SessionQueue,
    start: ClockTime,
    end: ClockTime,
    split: BulletSplit,
    tea: &TeaBreak,
) -> ClockTime {
    fill_window(day, queue, start, end, split, Some(tea))
}

fn fill_window(
    day: &mut Day,
    queue: &mut SessionQueue,
    start: ClockTime,
    end: ClockTime,
    split: BulletSplit,
    mut tea: Option<&TeaBreak>,
) -> ClockTime {
    let mut current = start;

    while current < end {
        let Some(head) = queue.pop_front() else {
            break;
        };

        if head.duration < GRID_MINUTES {
            carry_forward(day, queue, head.duration, head.bullet_points, &head.title);
            continue;
        }

        let remaining = floor_to_grid(current.minutes_until(end));
        if remaining < GRID_MINUTES {
            queue.push_front(head);
            break;
        }

        let (budget, leftover) = round_to_nearest_5(head.duration, RoundDirection::Down);

        let delivered = if budget <= remaining {
            if leftover > 0 {
                carry_forward(day, queue, leftover, Vec::new(), &head.title);
            }
            head.with_duration(budget)
        } else {
            let (part, rest) = head.split(remaining, split);
            debug!(
                "Split '{}' at {}: {} min now, {} min carried",
                head.title, current, part.duration, rest.duration
            );
            queue.push_front(rest);
            part
        };

        let mut slot = delivered.duration;
        let reserved = match tea {
            Some(t) if slot > t.minutes => {
                slot -= t.minutes;
                tea = None;
                Some(t)
            }
            _ => None,
        };

        let range = TimeRange::starting_at(current, slot);
        day.push(SessionEntry::from_session(&delivered, range));
        current = range.end;

        if let Some(t) = reserved {
            debug!("{} at {}", t.title, current);
            let range = TimeRange::starting_at(current, t.minutes);
            day.push(SessionEntry::fixed(
                SlotKind::TeaBreak,
                range,
                t.title.clone(),
                "N/A",
                t.resources.clone(),
            ));
            current = range.end;
        }
    }

    current
}

/// Folds sub-grid minutes and their bullets into the next queued session.
///
/// With nothing left to carry into, the minutes are dropped and the bullets
/// join the last content slot of the day.
fn carry_forward(day: &mut Day, queue: &mut SessionQueue, minutes: Minutes, bullets: Vec<String>, title: &str) {
    if let Some(next) = queue.pop_front() {
        debug!("Carrying {} min of '{}' into '{}'", minutes, title, next.title);
        queue.push_front(next.carrying(minutes, bullets));
        return;
    }

    warn!("Dropping {} min left over from '{}'", minutes, title);
    if bullets.is_empty() {
        return;
    }
    match day.sessions.iter_mut().rev().find(|s| s.kind.is_content()) {
        Some(last) => last.bullet_points.extend(bullets),
        None => warn!("No slot left for {} bullets of '{}'", bullets.len(), title),
    }
}
