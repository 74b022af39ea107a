//! Plot geometry: where the scatter body and the zero margins sit.

use crate::error::Result;
use crate::options::AxisOptions;
use cytogate_events::{ScaleSpec, Viewport};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

/// Fraction of the shorter plot side given to each cytof zero margin
pub const CYTOF_MARGIN_FRACTION: f64 = 0.07;

/// Instrument family the plot is drawn for.
///
/// Mass cytometry (`Cytof`) data has many events at exactly zero on a
/// channel. Those get one-dimensional histograms in a left and a bottom margin
/// instead of being lost on the axis floor.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum InstrumentMode {
    #[default]
    Standard,
    Cytof,
}

impl InstrumentMode {
    pub fn has_zero_margins(&self) -> bool {
        matches!(self, Self::Cytof)
    }
}

/// Pixel layout of a plot.
///
/// In cytof mode a margin of `round(min(width, height) * 0.07)` pixels is taken
/// from the left and the bottom; the scatter body fills the rest, anchored at
/// the top right. In standard mode the margin is zero.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PlotLayout {
    pub width: u32,
    pub height: u32,
    pub mode: InstrumentMode,
    pub margin: u32,
}

impl PlotLayout {
    pub fn new(width: u32, height: u32, mode: InstrumentMode) -> Self {
        let margin = if mode.has_zero_margins() {
            (width.min(height) as f64 * CYTOF_MARGIN_FRACTION).round() as u32
        } else {
            0
        };
        Self {
            width,
            height,
            mode,
            margin,
        }
    }

    #[inline]
    pub fn scatter_width(&self) -> u32 {
        self.width - self.margin
    }

    #[inline]
    pub fn scatter_height(&self) -> u32 {
        self.height - self.margin
    }

    /// Scales placing data onto the scatter body: x runs `0..scatter_width`,
    /// y runs `scatter_height..0`.
    ///
    /// # Errors
    /// Returns `PlotError::Configuration` if an axis range is not a valid scale
    /// domain (non-finite bounds, or a log range that does not start above zero).
    pub fn viewport(&self, x_axis: &AxisOptions, y_axis: &AxisOptions) -> Result<Viewport> {
        let x = ScaleSpec::new(
            x_axis.scale,
            (*x_axis.range.start(), *x_axis.range.end()),
            (0.0, self.scatter_width() as f64),
        )?;
        let y = ScaleSpec::new(
            y_axis.scale,
            (*y_axis.range.start(), *y_axis.range.end()),
            (self.scatter_height() as f64, 0.0),
        )?;
        Ok(Viewport::new(x, y))
    }
}
