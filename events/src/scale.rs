use crate::error::{EventError, Result};
use crate::statistics::ChannelStatistics;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

/// How a channel is laid out along a plot axis.
///
/// Fluorescence channels are usually shown on a logarithmic axis, scatter and
/// time on a linear one. Parsing accepts `linear`, `log` and `logarithmic`
/// in any case.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[strum(ascii_case_insensitive)]
pub enum ScaleKind {
    #[default]
    #[serde(rename = "linear")]
    #[strum(to_string = "linear")]
    Linear,
    #[serde(rename = "log", alias = "logarithmic")]
    #[strum(to_string = "log", serialize = "logarithmic")]
    Logarithmic,
}

/// Round to the two decimal places used for cutoff comparisons in data space.
#[inline]
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// A bidirectional map between a data range and a pixel range.
///
/// `forward` takes a data value to a pixel coordinate and `inverse` takes it
/// back. The pixel range may run backwards (`(height, 0.0)`) for screen y axes.
///
/// Logarithmic scales map `ln(value)` affinely, so their data range must start
/// at a strictly positive floor (a channel's `positive_min`). Non-positive
/// values have no logarithm; `forward` pins them to the floor's pixel, which
/// is the protected zero region of the axis.
///
/// # Example
///
/// ```rust
/// use cytogate_events::{ScaleKind, ScaleSpec};
///
/// let scale = ScaleSpec::new(ScaleKind::Logarithmic, (1.0, 1000.0), (0.0, 300.0))?;
/// assert_eq!(scale.forward(1000.0), 300.0);
/// assert_eq!(scale.forward(1.0), 0.0);
/// assert_eq!(scale.invert_rounded(scale.forward(42.0)), 42.0);
/// # Ok::<(), cytogate_events::EventError>(())
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct ScaleSpec {
    kind: ScaleKind,
    data_range: (f64, f64),
    pixel_range: (f64, f64),
}

impl ScaleSpec {
    /// Create a scale, validating its domain.
    ///
    /// # Errors
    /// Returns `EventError::Configuration` if:
    /// - any bound is not finite
    /// - a logarithmic scale has a non-positive floor
    /// - a logarithmic scale has `min >= max`
    pub fn new(kind: ScaleKind, data_range: (f64, f64), pixel_range: (f64, f64)) -> Result<Self> {
        let (lo, hi) = data_range;
        if !lo.is_finite() || !hi.is_finite() {
            return Err(EventError::configuration(format!(
                "{kind} scale data range must be finite: [{lo}, {hi}]"
            )));
        }
        if !pixel_range.0.is_finite() || !pixel_range.1.is_finite() {
            return Err(EventError::configuration(format!(
                "{kind} scale pixel range must be finite: [{}, {}]",
                pixel_range.0, pixel_range.1
            )));
        }
        if kind == ScaleKind::Logarithmic {
            if lo <= 0.0 {
                return Err(EventError::configuration(format!(
                    "log scale floor must be strictly positive, got {lo}"
                )));
            }
            if lo >= hi {
                return Err(EventError::configuration(format!(
                    "log scale requires min < max, got [{lo}, {hi}]"
                )));
            }
        }

        Ok(Self {
            kind,
            data_range,
            pixel_range,
        })
    }

    pub fn linear(data_range: (f64, f64), pixel_range: (f64, f64)) -> Result<Self> {
        Self::new(ScaleKind::Linear, data_range, pixel_range)
    }

    pub fn logarithmic(data_range: (f64, f64), pixel_range: (f64, f64)) -> Result<Self> {
        Self::new(ScaleKind::Logarithmic, data_range, pixel_range)
    }

    /// Build the scale for a channel: `[min, max]` when linear,
    /// `[positive_min, max]` when logarithmic.
    ///
    /// # Errors
    /// Returns `EventError::Configuration` if a logarithmic scale is requested for a
    /// channel without any strictly positive value, or the domain is otherwise invalid.
    pub fn for_channel(
        kind: ScaleKind,
        stats: &ChannelStatistics,
        pixel_range: (f64, f64),
    ) -> Result<Self> {
        let data_range = match kind {
            ScaleKind::Linear => (stats.min, stats.max),
            ScaleKind::Logarithmic => {
                let floor = stats.positive_min.ok_or_else(|| {
                    EventError::configuration(
                        "log scale requested for a channel with no positive values",
                    )
                })?;
                (floor, stats.max)
            }
        };
        Self::new(kind, data_range, pixel_range)
    }

    pub fn kind(&self) -> ScaleKind {
        self.kind
    }

    pub fn data_range(&self) -> (f64, f64) {
        self.data_range
    }

    pub fn pixel_range(&self) -> (f64, f64) {
        self.pixel_range
    }

    /// Data bounds in the space the affine map works in (`ln` for log scales)
    #[inline]
    fn domain_bounds(&self) -> (f64, f64) {
        match self.kind {
            ScaleKind::Linear => self.data_range,
            ScaleKind::Logarithmic => (self.data_range.0.ln(), self.data_range.1.ln()),
        }
    }

    /// Map a data value to a pixel coordinate
    pub fn forward(&self, value: f64) -> f64 {
        let (p0, p1) = self.pixel_range;
        let (d0, d1) = self.domain_bounds();
        let span = d1 - d0;
        if span == 0.0 {
            return p0;
        }

        let domain_value = match self.kind {
            ScaleKind::Linear => value,
            ScaleKind::Logarithmic if value <= 0.0 => return p0,
            ScaleKind::Logarithmic => value.ln(),
        };

        p0 + (domain_value - d0) / span * (p1 - p0)
    }

    /// Map a pixel coordinate back to a data value
    pub fn inverse(&self, pixel: f64) -> f64 {
        let (p0, p1) = self.pixel_range;
        let pixel_span = p1 - p0;
        if pixel_span == 0.0 {
            return self.data_range.0;
        }

        let (d0, d1) = self.domain_bounds();
        let domain_value = d0 + (pixel - p0) / pixel_span * (d1 - d0);
        match self.kind {
            ScaleKind::Linear => domain_value,
            ScaleKind::Logarithmic => domain_value.exp(),
        }
    }

    /// `inverse` rounded to two decimal places
    #[inline]
    pub fn invert_rounded(&self, pixel: f64) -> f64 {
        round2(self.inverse(pixel))
    }
}

/// An x and a y scale that together place events on a plot.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Viewport {
    pub x: ScaleSpec,
    pub y: ScaleSpec,
}

impl Viewport {
    pub fn new(x: ScaleSpec, y: ScaleSpec) -> Self {
        Self { x, y }
    }

    /// Scales for a `width` x `height` plot in screen orientation:
    /// x runs `0..width`, y runs `height..0` so larger values sit higher up.
    pub fn for_plot(
        width: f64,
        height: f64,
        x_kind: ScaleKind,
        x_stats: &ChannelStatistics,
        y_kind: ScaleKind,
        y_stats: &ChannelStatistics,
    ) -> Result<Self> {
        Ok(Self {
            x: ScaleSpec::for_channel(x_kind, x_stats, (0.0, width))?,
            y: ScaleSpec::for_channel(y_kind, y_stats, (height, 0.0))?,
        })
    }

    #[inline]
    pub fn forward(&self, (x, y): (f64, f64)) -> (f64, f64) {
        (self.x.forward(x), self.y.forward(y))
    }

    #[inline]
    pub fn inverse(&self, (px, py): (f64, f64)) -> (f64, f64) {
        (self.x.inverse(px), self.y.inverse(py))
    }
}
