//! Helpers for building plot options from channel statistics.

use crate::error::{PlotError, Result};
use crate::options::{AxisOptions, DensityPlotOptions, DensityPlotOptionsBuilder};
use crate::PlotRange;
use cytogate_events::{ChannelStatistics, ScaleKind};

/// Axis range covering a channel.
///
/// Linear axes span `min..=max`. Log axes start at the smallest positive value,
/// since zero and negative values have no logarithm, and need it below `max`.
pub fn axis_range(stats: &ChannelStatistics, scale: ScaleKind) -> Result<PlotRange> {
    match scale {
        ScaleKind::Linear => Ok(stats.min..=stats.max),
        ScaleKind::Logarithmic => match stats.positive_min {
            Some(floor) if stats.supports_log_scale() => Ok(floor..=stats.max),
            _ => Err(PlotError::configuration(
                "log axis needs a channel with at least two distinct positive values",
            )),
        },
    }
}

/// Axis options for channel `index`, ranged over its statistics
pub fn axis_from_statistics(
    stats: &[ChannelStatistics],
    index: usize,
    scale: ScaleKind,
) -> Result<AxisOptions> {
    let channel = stats.get(index).ok_or_else(|| {
        PlotError::configuration(format!(
            "channel index {} out of range ({} channels)",
            index,
            stats.len()
        ))
    })?;
    let range = axis_range(channel, scale)?;
    Ok(AxisOptions::new()
        .parameter_index(index)
        .range(range)
        .scale(scale)
        .build()?)
}

/// Start a density plot options builder with both axes set from channel statistics.
///
/// The returned builder still takes the base options and instrument mode.
///
/// # Example
///
/// ```rust
/// use cytogate_events::{ChannelStatistics, ScaleKind};
/// use cytogate_plots::helpers::density_options_from_statistics;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let stats = vec![
///     ChannelStatistics::from_values([0.0, 5.0, 100.0]),
///     ChannelStatistics::from_values([-3.0, 40.0]),
/// ];
/// let options = density_options_from_statistics(&stats, 0, 1, ScaleKind::Logarithmic, ScaleKind::Linear)?
///     .build()?;
/// assert_eq!(options.x_axis.range, 5.0..=100.0);
/// assert_eq!(options.y_axis.range, -3.0..=40.0);
/// # Ok(())
/// # }
/// ```
pub fn density_options_from_statistics(
    stats: &[ChannelStatistics],
    x_index: usize,
    y_index: usize,
    x_scale: ScaleKind,
    y_scale: ScaleKind,
) -> Result<DensityPlotOptionsBuilder> {
    let x_axis = axis_from_statistics(stats, x_index, x_scale)?;
    let y_axis = axis_from_statistics(stats, y_index, y_scale)?;
    let mut builder = DensityPlotOptions::new();
    builder.x_axis(x_axis).y_axis(y_axis);
    Ok(builder)
}
