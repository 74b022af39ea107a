use crate::layout::InstrumentMode;
use crate::options::{AxisOptions, BasePlotOptions, PlotOptions};
use derive_builder::Builder;
use rustc_hash::FxHasher;
use std::hash::{Hash, Hasher};

/// Options for density plots
///
/// Configuration for creating density plots, including base layout options,
/// axis configurations, and the instrument mode that decides whether zero
/// margins are drawn.
///
/// # Example
///
/// ```rust
/// use cytogate_plots::layout::InstrumentMode;
/// use cytogate_plots::options::{BasePlotOptions, DensityPlotOptions};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let options = DensityPlotOptions::new()
///     .base(BasePlotOptions::new().width(800u32).height(600u32).build()?)
///     .instrument_mode(InstrumentMode::Cytof)
///     .build()?;
/// assert_eq!(options.fingerprint().len(), 16);
/// # Ok(())
/// # }
/// ```
#[derive(Builder, Clone, Debug, PartialEq)]
#[builder(setter(into, strip_option), default)]
pub struct DensityPlotOptions {
    /// Base plot options (layout, dimensions, etc.)
    #[builder(default)]
    pub base: BasePlotOptions,

    /// X-axis configuration
    #[builder(default)]
    pub x_axis: AxisOptions,

    /// Y-axis configuration
    #[builder(default)]
    pub y_axis: AxisOptions,

    /// Standard scatter or scatter with cytof zero margins
    #[builder(default)]
    pub instrument_mode: InstrumentMode,
}

impl Default for DensityPlotOptions {
    fn default() -> Self {
        Self {
            base: BasePlotOptions::default(),
            x_axis: AxisOptions::default(),
            y_axis: AxisOptions::default(),
            instrument_mode: InstrumentMode::Standard,
        }
    }
}

impl PlotOptions for DensityPlotOptions {
    fn base(&self) -> &BasePlotOptions {
        &self.base
    }
}

impl DensityPlotOptions {
    /// Create a new builder for DensityPlotOptions
    pub fn new() -> DensityPlotOptionsBuilder {
        DensityPlotOptionsBuilder::default()
    }

    /// 16 hex digit digest of everything that affects the rendered pixels.
    ///
    /// Titles and axis labels are not drawn and do not take part.
    pub fn fingerprint(&self) -> String {
        let mut hasher = FxHasher::default();
        self.base.width.hash(&mut hasher);
        self.base.height.hash(&mut hasher);
        self.base.background.hash(&mut hasher);
        self.instrument_mode.hash(&mut hasher);
        for axis in [&self.x_axis, &self.y_axis] {
            (axis.parameter_index as u64).hash(&mut hasher);
            axis.scale.hash(&mut hasher);
            axis.range.start().to_bits().hash(&mut hasher);
            axis.range.end().to_bits().hash(&mut hasher);
        }
        format!("{:016x}", hasher.finish())
    }
}
