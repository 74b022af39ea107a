use crate::error::{GateError, Result};
use cytogate_events::ScaleKind;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use strum_macros::{Display, EnumString};

/// Pixel size of the plot a gate is drawn on when the catalogue does not say
pub const DEFAULT_PLOT_SIZE: f64 = 400.0;

fn default_plot_size() -> f64 {
    DEFAULT_PLOT_SIZE
}

/// The kind of region a gate describes.
///
/// Only polygon gates are evaluated; the other kinds pass every event through.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum GateType {
    #[default]
    Polygon,
    Rectangle,
    Ellipse,
    #[serde(other)]
    Other,
}

impl GateType {
    pub fn is_polygon(&self) -> bool {
        matches!(self, Self::Polygon)
    }
}

/// A user-drawn gate on a two-channel projection.
///
/// The polygon and both zero cutoffs are in the pixel space of the plot the
/// gate was drawn on (`plot_width` x `plot_height`, y growing downwards). They
/// are converted to data space through the gate's own scales before any event
/// is tested; see [`PreparedGate`](crate::PreparedGate).
///
/// Gates are immutable snapshots: nothing in this crate modifies one.
///
/// # Example
///
/// ```rust
/// use cytogate_gates::Gate;
/// use cytogate_events::ScaleKind;
///
/// let gate = Gate::polygon(
///     "cd3-pos",
///     0,
///     1,
///     vec![(10.0, 10.0), (390.0, 10.0), (390.0, 390.0), (10.0, 390.0)],
/// )
/// .with_name("CD3+")
/// .with_scales(ScaleKind::Linear, ScaleKind::Logarithmic)
/// .with_x_zero_cutoff(10.0, 390.0)
/// .with_zero_inclusion(true, false);
///
/// assert!(gate.gate_type.is_polygon());
/// assert_eq!(gate.x_zero_cutoff, Some((10.0, 390.0)));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Gate {
    pub id: Arc<str>,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type", default)]
    pub gate_type: GateType,
    pub x_parameter_index: usize,
    pub y_parameter_index: usize,
    #[serde(default)]
    pub x_scale_kind: ScaleKind,
    #[serde(default)]
    pub y_scale_kind: ScaleKind,
    /// Ordered vertices in plot pixels
    #[serde(default)]
    pub polygon_vertices: Vec<(f64, f64)>,
    /// Band of y pixels in which events with `x == 0` are kept
    pub x_zero_cutoff: Option<(f64, f64)>,
    /// Band of x pixels in which events with `y == 0` are kept
    pub y_zero_cutoff: Option<(f64, f64)>,
    #[serde(default)]
    pub include_x_channel_zeroes: bool,
    #[serde(default)]
    pub include_y_channel_zeroes: bool,
    #[serde(default = "default_plot_size")]
    pub plot_width: f64,
    #[serde(default = "default_plot_size")]
    pub plot_height: f64,
}

impl Gate {
    /// Create a polygon gate on a pair of channels with linear scales, no zero
    /// bands and the default plot frame.
    pub fn polygon(
        id: impl Into<Arc<str>>,
        x_parameter_index: usize,
        y_parameter_index: usize,
        vertices: Vec<(f64, f64)>,
    ) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            gate_type: GateType::Polygon,
            x_parameter_index,
            y_parameter_index,
            x_scale_kind: ScaleKind::Linear,
            y_scale_kind: ScaleKind::Linear,
            polygon_vertices: vertices,
            x_zero_cutoff: None,
            y_zero_cutoff: None,
            include_x_channel_zeroes: false,
            include_y_channel_zeroes: false,
            plot_width: DEFAULT_PLOT_SIZE,
            plot_height: DEFAULT_PLOT_SIZE,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_type(mut self, gate_type: GateType) -> Self {
        self.gate_type = gate_type;
        self
    }

    pub fn with_scales(mut self, x: ScaleKind, y: ScaleKind) -> Self {
        self.x_scale_kind = x;
        self.y_scale_kind = y;
        self
    }

    pub fn with_x_zero_cutoff(mut self, low: f64, high: f64) -> Self {
        self.x_zero_cutoff = Some((low, high));
        self
    }

    pub fn with_y_zero_cutoff(mut self, low: f64, high: f64) -> Self {
        self.y_zero_cutoff = Some((low, high));
        self
    }

    pub fn with_zero_inclusion(mut self, x_channel: bool, y_channel: bool) -> Self {
        self.include_x_channel_zeroes = x_channel;
        self.include_y_channel_zeroes = y_channel;
        self
    }

    /// Set the pixel size of the plot the gate was drawn on
    pub fn with_plot_frame(mut self, width: f64, height: f64) -> Self {
        self.plot_width = width;
        self.plot_height = height;
        self
    }

    /// A label for logs: the name when there is one, otherwise the id
    pub fn display_name(&self) -> &str {
        if self.name.is_empty() {
            &self.id
        } else {
            &self.name
        }
    }
}

/// Indices of the events that passed every gate, strictly increasing.
///
/// Serialises as a plain JSON array, which is the population cache file format.
/// Deserialising rejects arrays that are unsorted or contain duplicates.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<usize>", into = "Vec<usize>")]
pub struct RetainedSet(Vec<usize>);

impl RetainedSet {
    /// Wrap indices that must already be strictly increasing.
    ///
    /// # Errors
    /// Returns `GateError::Configuration` naming the first out-of-order position.
    pub fn from_sorted(indices: Vec<usize>) -> Result<Self> {
        if let Some(pos) = indices.windows(2).position(|w| w[0] >= w[1]) {
            return Err(GateError::configuration(format!(
                "retained indices must be strictly increasing: {} then {} at position {}",
                indices[pos],
                indices[pos + 1],
                pos + 1
            )));
        }
        Ok(Self(indices))
    }

    /// Build from indices in any order, dropping duplicates
    pub fn from_indices(indices: impl IntoIterator<Item = usize>) -> Self {
        let mut indices: Vec<usize> = indices.into_iter().collect();
        indices.sort_unstable();
        indices.dedup();
        Self(indices)
    }

    /// Every event of an `n_events` matrix
    pub fn all(n_events: usize) -> Self {
        Self((0..n_events).collect())
    }

    // Callers guarantee ascending order (e.g. a filter over `0..n`)
    pub(crate) fn from_ascending(indices: Vec<usize>) -> Self {
        debug_assert!(indices.windows(2).all(|w| w[0] < w[1]));
        Self(indices)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[usize] {
        &self.0
    }

    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.0.iter().copied()
    }

    pub fn contains(&self, index: usize) -> bool {
        self.0.binary_search(&index).is_ok()
    }

    /// Check that every index addresses an event of an `n_events` matrix
    pub fn check_bounds(&self, n_events: usize) -> Result<()> {
        match self.0.last() {
            Some(&last) if last >= n_events => Err(GateError::configuration(format!(
                "retained index {last} out of range for {n_events} events"
            ))),
            _ => Ok(()),
        }
    }

    pub fn into_vec(self) -> Vec<usize> {
        self.0
    }
}

impl TryFrom<Vec<usize>> for RetainedSet {
    type Error = GateError;

    fn try_from(indices: Vec<usize>) -> Result<Self> {
        Self::from_sorted(indices)
    }
}

impl From<RetainedSet> for Vec<usize> {
    fn from(set: RetainedSet) -> Self {
        set.0
    }
}
