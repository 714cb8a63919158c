//! Teaching-day calendar.
//!
//! A training day is a fixed frame of clock windows:
//!
//! ```text
//! 0930 ─ attendance ─ morning block ─ 1200 ─ lunch ─ 1245 ─ afternoon block ─ 1825 ─ recap ─ 1830
//! ```
//!
//! Content is only ever scheduled inside the morning and afternoon blocks.
//! The fixed slots (attendance, lunch, recap) have their own lengths.
//!
//! # Time Model
//! Windows are half-open `[start, end)` intervals of [`ClockTime`].

use serde::{Deserialize, Serialize};

use super::duration::Minutes;
use super::time::{ClockTime, TimeRange};

/// A clock interval `[start, end)` available for scheduling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeWindow {
    /// Window start (inclusive).
    pub start: ClockTime,
    /// Window end (exclusive).
    pub end: ClockTime,
}

impl TimeWindow {
    /// Creates a new time window.
    pub fn new(start: ClockTime, end: ClockTime) -> Self {
        Self { start, end }
    }

    /// Length of this window in minutes.
    #[inline]
    pub fn minutes(&self) -> Minutes {
        self.start.minutes_until(self.end).max(0)
    }

    /// Whether a time falls within this window.
    #[inline]
    pub fn contains(&self, time: ClockTime) -> bool {
        time >= self.start && time < self.end
    }

    /// Whether two windows overlap.
    pub fn overlaps(&self, other: &Self) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// Minutes left in the window from `from` (0 when past the end).
    pub fn remaining_from(&self, from: ClockTime) -> Minutes {
        from.max(self.start).minutes_until(self.end).max(0)
    }
}

impl From<TimeWindow> for TimeRange {
    fn from(w: TimeWindow) -> Self {
        TimeRange::new(w.start, w.end)
    }
}

/// Fixed frame of a training day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DayTemplate {
    /// First slot of the day.
    pub day_start: ClockTime,
    /// Attendance and course introduction on day 1.
    pub first_day_attendance_minutes: Minutes,
    /// Morning attendance on later days.
    pub attendance_minutes: Minutes,
    /// Lunch start (end of the morning block).
    pub lunch_start: ClockTime,
    /// Lunch length.
    pub lunch_minutes: Minutes,
    /// Tea break taken after the first afternoon session.
    pub tea_break_minutes: Minutes,
    /// Closing recap on days that are not the last.
    pub recap_minutes: Minutes,
    /// Feedback survey before the final assessments.
    pub feedback_minutes: Minutes,
    /// End of the teaching day.
    pub day_end: ClockTime,
}

impl Default for DayTemplate {
    fn default() -> Self {
        Self {
            day_start: ClockTime::hm(9, 30),
            first_day_attendance_minutes: 15,
            attendance_minutes: 10,
            lunch_start: ClockTime::hm(12, 0),
            lunch_minutes: 45,
            tea_break_minutes: 5,
            recap_minutes: 5,
            feedback_minutes: 5,
            day_end: ClockTime::hm(18, 30),
        }
    }
}

impl DayTemplate {
    /// Attendance slot opening the given day.
    pub fn attendance_window(&self, first_day: bool) -> TimeWindow {
        let minutes = if first_day {
            self.first_day_attendance_minutes
        } else {
            self.attendance_minutes
        };
        TimeWindow::new(self.day_start, self.day_start.add_minutes(minutes))
    }

    /// Content block between attendance and lunch.
    pub fn morning_window(&self, first_day: bool) -> TimeWindow {
        TimeWindow::new(self.attendance_window(first_day).end, self.lunch_start)
    }

    /// Lunch break.
    pub fn lunch_window(&self) -> TimeWindow {
        TimeWindow::new(self.lunch_start, self.lunch_start.add_minutes(self.lunch_minutes))
    }

    /// Content block between lunch and the closing recap.
    pub fn afternoon_window(&self) -> TimeWindow {
        TimeWindow::new(self.lunch_window().end, self.recap_window().start)
    }

    /// Closing recap slot.
    pub fn recap_window(&self) -> TimeWindow {
        TimeWindow::new(self.day_end.add_minutes(-self.recap_minutes), self.day_end)
    }

    /// Total length of a full day.
    pub fn full_day_minutes(&self) -> Minutes {
        self.day_start.minutes_until(self.day_end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_time_window() {
        let w = TimeWindow::new(ClockTime::hm(9, 45), ClockTime::hm(12, 0));
        assert_eq!(w.minutes(), 135);
        assert!(w.contains(ClockTime::hm(9, 45)));
        assert!(w.contains(ClockTime::hm(11, 59)));
        assert!(!w.contains(ClockTime::hm(12, 0))); // exclusive end
        assert_eq!(w.remaining_from(ClockTime::hm(11, 40)), 20);
        assert_eq!(w.remaining_from(ClockTime::hm(12, 30)), 0);
        assert_eq!(w.remaining_from(ClockTime::hm(9, 0)), 135);
    }

    #[test]
    fn test_time_window_overlap() {
        let a = TimeWindow::new(ClockTime::hm(9, 0), ClockTime::hm(10, 0));
        let b = TimeWindow::new(ClockTime::hm(9, 30), ClockTime::hm(11, 0));
        let c = TimeWindow::new(ClockTime::hm(10, 0), ClockTime::hm(11, 0));
        assert!(a.overlaps(&b));
        assert!(!a.overlaps(&c)); // touching
    }

    #[test]
    fn test_default_day_frame() {
        let day = DayTemplate::default();
        assert_eq!(day.full_day_minutes(), 540);
        assert_eq!(day.attendance_window(true).minutes(), 15);
        assert_eq!(day.morning_window(true).minutes(), 135);
        assert_eq!(day.morning_window(false).minutes(), 140);
        assert_eq!(day.lunch_window().end, ClockTime::hm(12, 45));
        assert_eq!(day.afternoon_window().minutes(), 340);
        assert_eq!(day.recap_window().start, ClockTime::hm(18, 25));
    }
}
