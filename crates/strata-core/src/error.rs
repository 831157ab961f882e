//! Error types for the Strata schedule compiler.

use chrono::NaiveDateTime;
use thiserror::Error;

/// Main error type for Strata operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ScheduleError {
    /// The deck lacks the sections needed to build a schedule.
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// A keyword names an entity that was never declared.
    #[error("{kind}: {name} does not exist")]
    Reference { kind: &'static str, name: String },

    /// Positional access past the end of a collection.
    #[error("Index {index} out of range for {what} of size {size}")]
    Range {
        what: &'static str,
        index: usize,
        size: usize,
    },

    /// A token or value outside the accepted vocabulary.
    #[error("Invalid value: {message}")]
    Value { message: String },

    /// Deck input does not have the shape a keyword handler expects.
    #[error("Invalid deck at {location}: {message}")]
    InvalidDeck { location: String, message: String },

    /// Time points were appended out of order.
    #[error("Times added must be in strictly increasing order: {next} does not follow {previous}")]
    NonMonotonicTime {
        previous: NaiveDateTime,
        next: NaiveDateTime,
    },

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl ScheduleError {
    /// Error for a well that was never introduced through WELSPECS.
    pub fn unknown_well(name: impl Into<String>) -> Self {
        ScheduleError::Reference {
            kind: "Well",
            name: name.into(),
        }
    }

    /// Error for malformed deck content at `location`.
    pub fn invalid_deck(location: impl Into<String>, message: impl Into<String>) -> Self {
        ScheduleError::InvalidDeck {
            location: location.into(),
            message: message.into(),
        }
    }

    /// Error for a value that does not belong to its vocabulary.
    pub fn invalid_value(message: impl Into<String>) -> Self {
        ScheduleError::Value {
            message: message.into(),
        }
    }

    /// Prefix the location of a deck error with the keyword it was raised in.
    pub fn within(self, keyword: &str) -> Self {
        match self {
            ScheduleError::InvalidDeck { location, message } if !location.starts_with(keyword) => {
                ScheduleError::InvalidDeck {
                    location: format!("{} {}", keyword, location),
                    message,
                }
            }
            other => other,
        }
    }

    /// Returns true if this error stems from the deck's content rather than its structure.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            ScheduleError::Value { .. }
                | ScheduleError::InvalidDeck { .. }
                | ScheduleError::NonMonotonicTime { .. }
        )
    }

    /// Returns the name of the unresolved reference, if any.
    pub fn unresolved_name(&self) -> Option<&str> {
        match self {
            ScheduleError::Reference { name, .. } => Some(name),
            _ => None,
        }
    }
}

/// Convenience Result type for Strata operations.
pub type Result<T> = std::result::Result<T, ScheduleError>;

impl From<serde_json::Error> for ScheduleError {
    fn from(err: serde_json::Error) -> Self {
        ScheduleError::SerializationError(err.to_string())
    }
}
