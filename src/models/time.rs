//! Time-of-day values and their `"HHMMhrs"` text form.
//!
//! Lesson plans speak in 24-hour clock strings such as `"0930hrs"` and
//! ranges such as `"0930hrs - 0945hrs (15 mins)"`. All arithmetic happens on
//! [`ClockTime`]; the regex parsing lives only in the `FromStr` impls here.

use std::fmt;
use std::str::FromStr;

use chrono::{Duration, NaiveTime, Timelike};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::duration::Minutes;
use crate::error::{PlannerError, Result};

static ANNOTATION: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s*\(.*?\)").expect("static regex"));

static RANGE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^\s*(\d{4})(?:\s*hrs)?\s*-\s*(\d{4})(?:\s*hrs)?\s*(?:\(([^)]*)\))?")
        .expect("static regex")
});

static HOURS_PART: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)(\d+)\s*(?:hrs?|h\b)").expect("static regex"));

static MINUTES_PART: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)(\d+)\s*min").expect("static regex"));

/// A time of day with minute granularity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ClockTime(NaiveTime);

impl ClockTime {
    /// Creates a clock time from hour and minute.
    ///
    /// Out-of-range components clamp to midnight.
    pub fn hm(hour: u32, minute: u32) -> Self {
        Self(NaiveTime::from_hms_opt(hour, minute, 0).unwrap_or(NaiveTime::MIN))
    }

    /// Hour component (0..24).
    pub fn hour(&self) -> u32 {
        self.0.hour()
    }

    /// Minute component (0..60).
    pub fn minute(&self) -> u32 {
        self.0.minute()
    }

    /// Minutes elapsed since midnight.
    pub fn minutes_since_midnight(&self) -> Minutes {
        Minutes::from(self.hour() * 60 + self.minute())
    }

    /// Returns this time shifted by `minutes` (may be negative).
    pub fn add_minutes(self, minutes: Minutes) -> Self {
        Self(self.0 + Duration::minutes(minutes))
    }

    /// Minutes from `self` until `later` (negative if `later` is earlier).
    pub fn minutes_until(self, later: ClockTime) -> Minutes {
        (later.0 - self.0).num_minutes()
    }

    /// Compact `"HHMM"` form used by rendered lesson plans.
    pub fn hhmm(&self) -> String {
        self.0.format("%H%M").to_string()
    }
}

impl fmt::Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}hrs", self.0.format("%H%M"))
    }
}

impl FromStr for ClockTime {
    type Err = PlannerError;

    /// Accepts `"0935"`, `"0935hrs"`, `"09:35"`, and the start of a range
    /// such as `"0935hrs - 1000hrs (25 mins)"`.
    fn from_str(s: &str) -> Result<Self> {
        let clean = ANNOTATION.replace_all(s, "");
        let start = clean.split('-').next().unwrap_or_default();
        let start = start.trim().trim_end_matches("hrs").trim();
        NaiveTime::parse_from_str(start, "%H%M")
            .or_else(|_| NaiveTime::parse_from_str(start, "%H:%M"))
            .map(Self)
            .map_err(|_| PlannerError::InvalidTime(s.to_string()))
    }
}

impl Serialize for ClockTime {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.hhmm())
    }
}

impl<'de> Deserialize<'de> for ClockTime {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Parses a `"HHMMhrs"` string, ignoring any parenthesised annotation.
pub fn parse_time(text: &str) -> Result<ClockTime> {
    text.parse()
}

/// Formats a clock time as `"HHMMhrs"`.
pub fn format_time(time: ClockTime) -> String {
    time.to_string()
}

/// A clock interval `[start, end)` as written in a lesson plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeRange {
    /// Interval start (inclusive).
    pub start: ClockTime,
    /// Interval end (exclusive).
    pub end: ClockTime,
}

impl TimeRange {
    /// Creates a new range.
    pub fn new(start: ClockTime, end: ClockTime) -> Self {
        Self { start, end }
    }

    /// Creates a range of `minutes` starting at `start`.
    pub fn starting_at(start: ClockTime, minutes: Minutes) -> Self {
        Self::new(start, start.add_minutes(minutes))
    }

    /// Length of the range in minutes.
    #[inline]
    pub fn minutes(&self) -> Minutes {
        self.start.minutes_until(self.end)
    }

    /// Parses a range together with its stated `(N mins)` annotation.
    ///
    /// The annotation is optional and may read `"5 mins"`, `"1 hr"` or
    /// `"2hr 30min"`. A stated length that disagrees with the clock span is
    /// returned as-is so callers can report it.
    pub fn parse_stated(text: &str) -> Result<(Self, Option<Minutes>)> {
        let caps = RANGE
            .captures(text)
            .ok_or_else(|| PlannerError::InvalidTime(text.to_string()))?;
        let start: ClockTime = caps[1].parse()?;
        let end: ClockTime = caps[2].parse()?;
        let stated = caps.get(3).and_then(|m| parse_annotation(m.as_str()));
        Ok((Self::new(start, end), stated))
    }
}

impl fmt::Display for TimeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {} ({} mins)", self.start, self.end, self.minutes())
    }
}

impl FromStr for TimeRange {
    type Err = PlannerError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse_stated(s).map(|(range, _)| range)
    }
}

fn parse_annotation(text: &str) -> Option<Minutes> {
    let hours = HOURS_PART
        .captures(text)
        .and_then(|c| c[1].parse::<Minutes>().ok());
    let minutes = MINUTES_PART
        .captures(text)
        .and_then(|c| c[1].parse::<Minutes>().ok());
    match (hours, minutes) {
        (None, None) => None,
        (h, m) => Some(h.unwrap_or(0) * 60 + m.unwrap_or(0)),
    }
}
