//! Error types for event loading and scale construction.
//!
//! `EventError` keeps the two failure kinds callers must distinguish apart:
//! a bad scale domain (`Configuration`) and an event source that cannot be
//! read (`DataUnavailable`). Neither is ever downgraded to an empty result.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum EventError {
    /// Invalid scale domain or channel selection
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// The event source for a sample is missing, unreadable or malformed
    #[error("Event data unavailable for '{source_id}': {message}")]
    DataUnavailable { source_id: String, message: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl EventError {
    /// Create a Configuration error with a message
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create a DataUnavailable error for a sample or path
    pub fn data_unavailable(source_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::DataUnavailable {
            source_id: source_id.into(),
            message: message.into(),
        }
    }

    /// Whether this error means the event data could not be obtained.
    ///
    /// Low-level I/O and parse failures count as unavailable data.
    pub fn is_data_unavailable(&self) -> bool {
        !matches!(self, Self::Configuration { .. })
    }
}

pub type Result<T> = std::result::Result<T, EventError>;
