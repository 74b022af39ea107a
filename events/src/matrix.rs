use crate::error::{EventError, Result};
use crate::statistics::ChannelStatistics;
use crate::{ChannelName, SampleId};
use ndarray::{Array2, ArrayView1, Axis};
use std::sync::Arc;

/// Per-event measurements: one row per detected cell, one column per channel.
///
/// The matrix is immutable once built. Computations borrow it for their
/// duration and never write back.
#[derive(Clone, Debug, PartialEq)]
pub struct EventMatrix {
    data: Array2<f64>,
    channels: Vec<ChannelName>,
}

impl EventMatrix {
    /// Build a matrix from an `events x channels` array and its channel names.
    ///
    /// # Errors
    /// Returns `EventError::Configuration` if the number of names does not match
    /// the number of columns.
    pub fn new(data: Array2<f64>, channels: Vec<ChannelName>) -> Result<Self> {
        if data.ncols() != channels.len() {
            return Err(EventError::configuration(format!(
                "{} channel names for {} columns",
                channels.len(),
                data.ncols()
            )));
        }
        Ok(Self { data, channels })
    }

    /// Build a matrix from event rows.
    ///
    /// # Errors
    /// Returns `EventError::DataUnavailable` naming the first row whose width
    /// differs from the channel count.
    pub fn from_rows(channels: Vec<ChannelName>, rows: Vec<Vec<f64>>) -> Result<Self> {
        let width = channels.len();
        if let Some((idx, row)) = rows.iter().enumerate().find(|(_, r)| r.len() != width) {
            return Err(EventError::data_unavailable(
                "event rows",
                format!(
                    "row {} has {} values but there are {} channels",
                    idx,
                    row.len(),
                    width
                ),
            ));
        }

        let n_events = rows.len();
        let flat: Vec<f64> = rows.into_iter().flatten().collect();
        let data = Array2::from_shape_vec((n_events, width), flat)
            .map_err(|e| EventError::data_unavailable("event rows", e.to_string()))?;
        Self::new(data, channels)
    }

    #[must_use]
    pub fn n_events(&self) -> usize {
        self.data.nrows()
    }

    #[must_use]
    pub fn n_channels(&self) -> usize {
        self.data.ncols()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.n_events() == 0
    }

    pub fn channels(&self) -> &[ChannelName] {
        &self.channels
    }

    /// Position of a channel by name
    pub fn channel_index(&self, name: &str) -> Option<usize> {
        self.channels.iter().position(|c| c.as_ref() == name)
    }

    /// A single measurement. Panics if either index is out of bounds.
    #[inline]
    pub fn value(&self, event: usize, channel: usize) -> f64 {
        self.data[[event, channel]]
    }

    /// The `(x, y)` projection of one event onto two channels
    #[inline]
    pub fn point(&self, event: usize, x_channel: usize, y_channel: usize) -> (f64, f64) {
        (
            self.data[[event, x_channel]],
            self.data[[event, y_channel]],
        )
    }

    pub fn column(&self, channel: usize) -> ArrayView1<'_, f64> {
        self.data.column(channel)
    }

    /// Get two channels as (x, y) pairs for plotting.
    ///
    /// With `retained`, only those event indices are projected, in the given
    /// order; otherwise every event is.
    ///
    /// # Errors
    /// Returns `EventError::Configuration` if a channel or event index is out of range.
    pub fn xy_pairs(
        &self,
        x_channel: usize,
        y_channel: usize,
        retained: Option<&[usize]>,
    ) -> Result<Vec<(f64, f64)>> {
        self.check_channel(x_channel)?;
        self.check_channel(y_channel)?;

        match retained {
            None => Ok((0..self.n_events())
                .map(|i| self.point(i, x_channel, y_channel))
                .collect()),
            Some(indices) => indices
                .iter()
                .map(|&i| {
                    if i < self.n_events() {
                        Ok(self.point(i, x_channel, y_channel))
                    } else {
                        Err(EventError::configuration(format!(
                            "event index {} out of range for {} events",
                            i,
                            self.n_events()
                        )))
                    }
                })
                .collect(),
        }
    }

    /// Compute `ChannelStatistics` for every channel, in channel order
    pub fn statistics(&self) -> Vec<ChannelStatistics> {
        self.data
            .axis_iter(Axis(1))
            .map(|column| ChannelStatistics::from_values(column.iter().copied()))
            .collect()
    }

    pub fn check_channel(&self, channel: usize) -> Result<()> {
        if channel < self.n_channels() {
            Ok(())
        } else {
            Err(EventError::configuration(format!(
                "channel index {} out of range for {} channels",
                channel,
                self.n_channels()
            )))
        }
    }
}

/// An event matrix together with the statistics computed for it at load time.
#[derive(Clone, Debug)]
pub struct LoadedSample {
    pub sample_id: SampleId,
    pub matrix: EventMatrix,
    pub statistics: Vec<ChannelStatistics>,
}

impl LoadedSample {
    /// Wrap a matrix, computing its channel statistics
    pub fn new(sample_id: impl Into<SampleId>, matrix: EventMatrix) -> Self {
        let statistics = matrix.statistics();
        Self {
            sample_id: sample_id.into(),
            matrix,
            statistics,
        }
    }

    pub fn shared(self) -> Arc<Self> {
        Arc::new(self)
    }
}
