//! Error types for gate operations.
//!
//! This module defines `GateError`, the error type for gate evaluation, population
//! filtering and the population cache. It uses `thiserror` for convenient error
//! construction and implements standard error traits for integration with error
//! handling libraries.

use cytogate_events::EventError;
use std::error::Error as StdError;
use std::path::PathBuf;
use thiserror::Error;

/// Custom error type for gate operations.
///
/// `Configuration` and `DataUnavailable` abort a computation and reach the caller.
/// `CacheWrite` is produced by population caches; the population filter logs it and
/// still returns its result.
#[derive(Debug, Error)]
pub enum GateError {
    /// Missing required parameter/channel
    #[error("Missing parameter '{parameter}' in context: {context}")]
    MissingParameter { parameter: String, context: String },

    /// Invalid scale domain or inconsistent inputs
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// Event data for a sample could not be obtained
    #[error("Event data unavailable for '{source_id}': {message}")]
    DataUnavailable { source_id: String, message: String },

    /// Persisting a population failed
    #[error("Failed to write population cache {}: {message}", .path.display())]
    CacheWrite { path: PathBuf, message: String },

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Generic error with context (for wrapping other errors)
    #[error("{message}")]
    Other {
        message: String,
        #[source]
        source: Option<Box<dyn StdError + Send + Sync>>,
    },
}

impl GateError {
    /// Create a MissingParameter error
    pub fn missing_parameter(parameter: impl Into<String>, context: impl Into<String>) -> Self {
        Self::MissingParameter {
            parameter: parameter.into(),
            context: context.into(),
        }
    }

    /// Create a Configuration error with a message
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create a DataUnavailable error
    pub fn data_unavailable(source_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::DataUnavailable {
            source_id: source_id.into(),
            message: message.into(),
        }
    }

    /// Create a CacheWrite error for a cache entry path
    pub fn cache_write(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::CacheWrite {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Whether the error only affects caching, never the computed result
    pub fn is_cache_write(&self) -> bool {
        matches!(self, Self::CacheWrite { .. })
    }

    /// Add context to an error
    pub fn with_context(self, context: impl Into<String>) -> Self {
        match self {
            Self::MissingParameter {
                parameter,
                context: ctx,
            } => Self::MissingParameter {
                parameter,
                context: format!("{}: {}", context.into(), ctx),
            },
            Self::Configuration { message } => Self::Configuration {
                message: format!("{}: {}", context.into(), message),
            },
            Self::DataUnavailable { source_id, message } => Self::DataUnavailable {
                source_id,
                message: format!("{}: {}", context.into(), message),
            },
            Self::CacheWrite { path, message } => Self::CacheWrite {
                path,
                message: format!("{}: {}", context.into(), message),
            },
            Self::Serialization(e) => Self::Other {
                message: format!("{}: {}", context.into(), e),
                source: Some(Box::new(e)),
            },
            Self::Other { message, source } => Self::Other {
                message: format!("{}: {}", context.into(), message),
                source,
            },
        }
    }
}

// Scale and loading failures keep their kind across the crate boundary
impl From<EventError> for GateError {
    fn from(err: EventError) -> Self {
        match err {
            EventError::Configuration { message } => Self::Configuration { message },
            EventError::DataUnavailable { source_id, message } => {
                Self::DataUnavailable { source_id, message }
            }
            other => Self::DataUnavailable {
                source_id: String::new(),
                message: other.to_string(),
            },
        }
    }
}

// Type alias for Result using GateError
pub type Result<T> = std::result::Result<T, GateError>;
