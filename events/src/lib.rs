//! # cytogate-events
//!
//! Event data and coordinate transforms shared by gating and rendering.
//!
//! ## Overview
//!
//! - [`EventMatrix`]: one row per detected cell, one column per channel
//! - [`ChannelStatistics`]: per-channel `min`, `max` and smallest positive value
//! - [`ScaleSpec`] and [`Viewport`]: linear and logarithmic data/pixel maps
//! - [`EventSource`]: loads samples, with [`FileEventSource`] and its injected
//!   [`EventCache`] for CSV and JSON exports
//!
//! ## Quick Start
//!
//! ```rust
//! use cytogate_events::*;
//! use std::sync::Arc;
//!
//! # fn example() -> Result<(), EventError> {
//! let matrix = EventMatrix::from_rows(
//!     vec![Arc::from("FSC-A"), Arc::from("CD3")],
//!     vec![vec![120.0, 0.0], vec![340.0, 52.5]],
//! )?;
//! let stats = matrix.statistics();
//!
//! let viewport = Viewport::for_plot(
//!     400.0,
//!     400.0,
//!     ScaleKind::Linear,
//!     &stats[0],
//!     ScaleKind::Logarithmic,
//!     &stats[1],
//! )?;
//! let (px, py) = viewport.forward(matrix.point(1, 0, 1));
//! assert_eq!((px, py), (400.0, 0.0));
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```

use std::sync::Arc;

pub mod error;
pub mod matrix;
pub mod scale;
pub mod source;
pub mod statistics;

pub use error::{EventError, Result as EventResult};
pub use matrix::{EventMatrix, LoadedSample};
pub use scale::{ScaleKind, ScaleSpec, Viewport, round2};
pub use source::{
    EventCache, EventSource, FileEventSource, check_sample_id, read_csv, read_json,
};
pub use statistics::ChannelStatistics;

/// Channel (parameter) name, shared cheaply between matrices and options
pub type ChannelName = Arc<str>;

/// Identifier of a sample as known to the event source
pub type SampleId = Arc<str>;
