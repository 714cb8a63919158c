//! Minute-granularity durations.
//!
//! Every schedulable length in a lesson plan is a whole number of minutes,
//! and content slots are aligned to a 5-minute grid. This module holds the
//! grid rounding plus the `"X hr"` / `"X min"` text forms used by course
//! documents.
//!
//! # Rounding
//! Rounding uses floor semantics (`div_euclid`), so the leftover of a
//! downward rounding is always in `0..5`, including for negative input.

use log::warn;

/// A length of time in whole minutes.
pub type Minutes = i64;

/// Grid size for all content slots.
pub const GRID_MINUTES: Minutes = 5;

/// Direction for [`round_to_nearest_5`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundDirection {
    /// Largest multiple of 5 not above the input.
    Down,
    /// Smallest multiple of 5 not below the input.
    Up,
}

/// Rounds a duration to a multiple of 5 minutes.
///
/// Returns `(rounded, leftover)` where `leftover = |duration - rounded|`.
///
/// # Example
/// ```
/// use u_timetable::models::{round_to_nearest_5, RoundDirection};
///
/// assert_eq!(round_to_nearest_5(178, RoundDirection::Down), (175, 3));
/// assert_eq!(round_to_nearest_5(178, RoundDirection::Up), (180, 2));
/// ```
pub fn round_to_nearest_5(duration: Minutes, direction: RoundDirection) -> (Minutes, Minutes) {
    match direction {
        RoundDirection::Down => {
            let rounded = duration.div_euclid(GRID_MINUTES) * GRID_MINUTES;
            (rounded, duration - rounded)
        }
        RoundDirection::Up => {
            let rounded = (duration + GRID_MINUTES - 1).div_euclid(GRID_MINUTES) * GRID_MINUTES;
            (rounded, rounded - duration)
        }
    }
}

/// Shorthand for downward rounding, discarding the leftover.
#[inline]
pub fn floor_to_grid(duration: Minutes) -> Minutes {
    round_to_nearest_5(duration, RoundDirection::Down).0
}

/// Parses `"3.5 hrs"`, `"1 hr"`, `"45 mins"` into minutes.
///
/// Strings containing `hr` are read as hours, strings containing `min` as
/// minutes. Anything else, or a missing leading number, yields `0`.
pub fn parse_duration(text: &str) -> Minutes {
    let lower = text.trim().to_ascii_lowercase();
    let scale = if lower.contains("hr") {
        60.0
    } else if lower.contains("min") {
        1.0
    } else {
        return 0;
    };

    let number: String = lower
        .chars()
        .take_while(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    match number.parse::<f64>() {
        Ok(value) => (value * scale) as Minutes,
        Err(_) => {
            warn!("Unparseable duration '{text}', treating as 0 minutes");
            0
        }
    }
}

/// Formats minutes as `"1h 30min"`, `"2h"` or `"45min"`.
///
/// Negative input formats as `"0min"`.
pub fn format_duration(minutes: Minutes) -> String {
    if minutes <= 0 {
        return "0min".to_string();
    }
    let hours = minutes / 60;
    let mins = minutes % 60;
    match (hours, mins) {
        (0, m) => format!("{m}min"),
        (h, 0) => format!("{h}h"),
        (h, m) => format!("{h}h {m}min"),
    }
}
