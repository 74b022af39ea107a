use crate::PlotRange;
use cytogate_events::ScaleKind;
use derive_builder::Builder;

/// Options for configuring a plot axis
///
/// Selects the channel shown on the axis, its scale and the data range mapped
/// onto the plot. A logarithmic range must start above zero; use the channel's
/// smallest positive value (see
/// [`density_options_from_statistics`](crate::helpers::density_options_from_statistics)).
///
/// # Example
///
/// ```rust
/// use cytogate_plots::options::AxisOptions;
/// use cytogate_events::ScaleKind;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let axis = AxisOptions::new()
///     .parameter_index(3usize)
///     .range(1.0..=262_144.0)
///     .scale(ScaleKind::Logarithmic)
///     .label("CD3")
///     .build()?;
/// assert_eq!(axis.label.as_deref(), Some("CD3"));
/// # Ok(())
/// # }
/// ```
#[derive(Builder, Clone, Debug, PartialEq)]
#[builder(setter(into, strip_option), default)]
pub struct AxisOptions {
    /// Column of the event matrix shown on this axis
    pub parameter_index: usize,

    /// Data range for this axis
    #[builder(default = "0f64..=200_000f64")]
    pub range: PlotRange,

    /// Linear or logarithmic placement
    pub scale: ScaleKind,

    /// Optional axis label
    pub label: Option<String>,
}

impl Default for AxisOptions {
    fn default() -> Self {
        Self {
            parameter_index: 0,
            range: 0f64..=200_000f64,
            scale: ScaleKind::Linear,
            label: None,
        }
    }
}

impl AxisOptions {
    /// Create a new builder for AxisOptions
    pub fn new() -> AxisOptionsBuilder {
        AxisOptionsBuilder::default()
    }
}
