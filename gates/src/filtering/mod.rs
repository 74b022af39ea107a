//! Population derivation: applying an ordered gate list to a sample's events.
//!
//! This module provides:
//! - **filter_population**: the pure AND-filter over an event matrix
//! - **PopulationFilter**: loads samples and consults a [`PopulationCache`] first
//! - **Caching support**: trait-based caching for derived populations
//!
//! # Complexity
//!
//! O(events x polygon gates x polygon edges). Each gate is prepared once per
//! call (vertices converted to data space) and events are tested in index order,
//! stopping at the first gate that rejects them.

use crate::error::{GateError, Result};
use crate::polygon::PreparedGate;
use crate::types::{Gate, RetainedSet};
use cytogate_events::{ChannelStatistics, EventMatrix, EventSource};
use std::sync::Arc;
use tracing::{debug, warn};

pub mod cache;
pub use cache::{FilePopulationCache, MemoryPopulationCache, PopulationCache, PopulationCacheKey};

/// Prepare the polygon gates of a list, skipping every other gate type
pub fn prepare_gates(gates: &[Gate], statistics: &[ChannelStatistics]) -> Result<Vec<PreparedGate>> {
    gates
        .iter()
        .filter(|gate| {
            if gate.gate_type.is_polygon() {
                true
            } else {
                debug!(
                    "Skipping {} gate '{}': only polygon gates filter events",
                    gate.gate_type,
                    gate.display_name()
                );
                false
            }
        })
        .map(|gate| PreparedGate::from_statistics(gate, statistics))
        .collect()
}

/// Indices of the events inside every polygon gate.
///
/// Gates are prepared from `statistics` (one entry per matrix channel) and the
/// gate's plot frame. With no polygon gates every event is retained.
///
/// # Errors
/// - `GateError::Configuration` if `statistics` does not match the matrix, or a
///   gate's scale domain is invalid
/// - `GateError::MissingParameter` if a gate names a channel the matrix lacks
pub fn filter_population(
    matrix: &EventMatrix,
    statistics: &[ChannelStatistics],
    gates: &[Gate],
) -> Result<RetainedSet> {
    if statistics.len() != matrix.n_channels() {
        return Err(GateError::configuration(format!(
            "{} channel statistics for a matrix with {} channels",
            statistics.len(),
            matrix.n_channels()
        )));
    }

    let prepared = prepare_gates(gates, statistics)?;
    let retained: Vec<usize> = (0..matrix.n_events())
        .filter(|&event| {
            prepared
                .iter()
                .all(|gate| gate.contains(matrix.point(event, gate.x_index(), gate.y_index())))
        })
        .collect();

    debug!(
        "Retained {} of {} events through {} polygon gates",
        retained.len(),
        matrix.n_events(),
        prepared.len()
    );
    Ok(RetainedSet::from_ascending(retained))
}

/// A population and where it came from.
#[derive(Debug, Clone)]
pub struct Population {
    pub key: PopulationCacheKey,
    pub retained: Arc<RetainedSet>,
    pub from_cache: bool,
}

/// Derives populations for samples, consulting a cache before any event data.
///
/// A cache hit is returned without touching the event source. A miss loads
/// the sample, filters it and writes the result back; a failed write is
/// logged and the population is still returned.
///
/// # Example
///
/// ```rust,no_run
/// use cytogate_events::{EventCache, FileEventSource};
/// use cytogate_gates::{FilePopulationCache, Gate, PopulationFilter};
/// use std::sync::Arc;
///
/// # fn example() -> Result<(), cytogate_gates::GateError> {
/// let source = FileEventSource::new("data/events", Arc::new(EventCache::new()));
/// let filter = PopulationFilter::new(source, FilePopulationCache::new("data/populations"));
///
/// let gates = vec![Gate::polygon(
///     "lymphocytes",
///     0,
///     1,
///     vec![(40.0, 40.0), (360.0, 40.0), (360.0, 360.0), (40.0, 360.0)],
/// )];
/// let population = filter.population("sample-01", &gates)?;
/// println!("{} events retained", population.retained.len());
/// # Ok(())
/// # }
/// ```
pub struct PopulationFilter<S, C> {
    source: S,
    cache: C,
}

impl<S, C> PopulationFilter<S, C>
where
    S: EventSource,
    C: PopulationCache,
{
    pub fn new(source: S, cache: C) -> Self {
        Self { source, cache }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn cache(&self) -> &C {
        &self.cache
    }

    /// The population of `sample_id` through `gates`.
    ///
    /// # Errors
    /// - `GateError::DataUnavailable` if the sample cannot be loaded (nothing is cached)
    /// - any error of [`filter_population`]
    pub fn population(&self, sample_id: &str, gates: &[Gate]) -> Result<Population> {
        let key = PopulationCacheKey::for_gates(sample_id, gates);

        if let Some(retained) = self.cache.get(&key) {
            debug!(
                "Population cache hit for {} ({} gates): {} events",
                sample_id,
                key.gate_ids.len(),
                retained.len()
            );
            return Ok(Population {
                key,
                retained,
                from_cache: true,
            });
        }

        debug!("Population cache miss for {}", sample_id);
        let sample = self.source.load(sample_id)?;
        let retained = Arc::new(filter_population(&sample.matrix, &sample.statistics, gates)?);

        if let Err(e) = self.cache.put(&key, retained.clone()) {
            warn!("{}", e);
        }

        Ok(Population {
            key,
            retained,
            from_cache: false,
        })
    }
}
