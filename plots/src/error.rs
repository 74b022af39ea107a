//! Error types for density maps, rasterization and image encoding.

use crate::options::{AxisOptionsBuilderError, BasePlotOptionsBuilderError, DensityPlotOptionsBuilderError};
use cytogate_events::EventError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PlotError {
    /// Invalid plot size, axis range or channel selection
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// Options could not be built
    #[error("Invalid plot options: {message}")]
    Builder { message: String },

    /// PNG encoding failed
    #[error("Image encoding error: {0}")]
    Encoding(#[from] image::ImageError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl PlotError {
    /// Create a Configuration error with a message
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }
}

// Every scale failure is a bad axis domain
impl From<EventError> for PlotError {
    fn from(err: EventError) -> Self {
        match err {
            EventError::Configuration { message } => Self::Configuration { message },
            other => Self::Configuration {
                message: other.to_string(),
            },
        }
    }
}

macro_rules! impl_from_builder_error {
    ($($builder_error:ty),*) => {
        $(
            impl From<$builder_error> for PlotError {
                fn from(err: $builder_error) -> Self {
                    Self::Builder {
                        message: err.to_string(),
                    }
                }
            }
        )*
    };
}

impl_from_builder_error!(
    AxisOptionsBuilderError,
    BasePlotOptionsBuilderError,
    DensityPlotOptionsBuilderError
);

pub type Result<T> = std::result::Result<T, PlotError>;
