//! # cytogate-gates
//!
//! Polygon gating of cytometry events.
//!
//! This library decides which events of a sample survive an ordered list of
//! user-drawn gates, and caches the resulting populations on disk.
//!
//! ## Overview
//!
//! - **Gate model**: [`Gate`] records as delivered by a [`GateCatalogue`]
//! - **Gate evaluation**: [`PreparedGate`] converts a pixel-space polygon to data
//!   space and classifies events, including zero-channel inclusion bands
//! - **Population filtering**: [`filter_population`] ANDs every polygon gate
//! - **Caching**: [`PopulationFilter`] consults a [`PopulationCache`] keyed by the
//!   sorted gate ids before loading any event data
//!
//! ## Quick Start
//!
//! ```rust
//! use cytogate_events::EventMatrix;
//! use cytogate_gates::*;
//! use std::sync::Arc;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let matrix = EventMatrix::from_rows(
//!     vec![Arc::from("x"), Arc::from("y")],
//!     vec![vec![0.0, 200.0], vec![50.0, 50.0], vec![60.0, 40.0], vec![200.0, 0.0]],
//! )?;
//! let stats = matrix.statistics();
//!
//! // Lower-left quarter of a 400 x 400 plot, y growing downwards
//! let gate = Gate::polygon(
//!     "low",
//!     0,
//!     1,
//!     vec![(0.0, 200.0), (200.0, 200.0), (200.0, 400.0), (0.0, 400.0)],
//! );
//! let retained = filter_population(&matrix, &stats, &[gate])?;
//! assert_eq!(retained.as_slice(), &[1, 2]);
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```
//!
//! ## Error Handling
//!
//! The library uses [`GateError`] for all error conditions. Most operations return
//! [`Result<T, GateError>`](GateResult).

pub mod catalogue;
pub mod error;
pub mod filtering;
pub mod polygon;
pub mod types;


/// Error types for gate operations
pub use error::{GateError, Result as GateResult};

/// Population filtering and caching
pub use filtering::{
    FilePopulationCache, MemoryPopulationCache, Population, PopulationCache, PopulationCacheKey,
    PopulationFilter, filter_population, prepare_gates,
};

/// Gate evaluation
pub use polygon::{Containment, PreparedGate, point_in_polygon};

/// Gate catalogues
pub use catalogue::{GateCatalogue, JsonGateCatalogue};

/// Core gate types and structures
pub use types::{DEFAULT_PLOT_SIZE, Gate, GateType, RetainedSet};
