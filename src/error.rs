//! Error types for calkeep.

use thiserror::Error;

/// Errors that can occur while keeping the calendar.
#[derive(Error, Debug)]
pub enum CalKeepError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Authorization error: {0}")]
    Authorization(String),

    #[error("Calendar '{0}' no longer exists remotely")]
    CalendarGone(String),

    #[error("Google Calendar API error: {0}")]
    Api(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for CalKeepError {
    fn from(err: serde_json::Error) -> Self {
        CalKeepError::Serialization(err.to_string())
    }
}

/// Result type alias for calkeep operations.
pub type CalKeepResult<T> = Result<T, CalKeepError>;
