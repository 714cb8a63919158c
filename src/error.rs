//! Error types for the timetabling edges.
//!
//! The scheduling core is infallible: malformed durations degrade to zero
//! and missing metadata falls back to defaults. Only text/file boundaries
//! (JSON ingest, TOML configuration, strict time parsing) return errors.

use thiserror::Error;

/// Result type for fallible timetable operations.
pub type Result<T> = std::result::Result<T, PlannerError>;

/// Errors raised at the input/output boundaries of the planner.
#[derive(Error, Debug)]
pub enum PlannerError {
    /// Course context or seed lesson plan was not valid JSON.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Planner configuration could not be read or parsed.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Configuration file could not be read.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A clock time or time range string was malformed.
    #[error("Invalid time: {0}")]
    InvalidTime(String),

    /// A course date string was malformed.
    #[error("Invalid date: {0}")]
    InvalidDate(String),
}
