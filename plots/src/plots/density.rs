use crate::density_calc::DensityMapBuilder;
use crate::error::{PlotError, Result};
use crate::layout::PlotLayout;
use crate::options::{DensityPlotOptions, PlotOptions};
use crate::plots::traits::Plot;
use crate::raster::{PixelBuffer, Rasterizer};
use crate::render::RenderConfig;
use tracing::debug;

/// Density plot implementation
///
/// Bins `(x, y)` data pairs into scatter pixels, colours each event's disc by
/// the density of its pixel and, for cytof plots, adds the zero margins.
///
/// # Example
///
/// ```rust
/// use cytogate_plots::{DensityPlot, DensityPlotOptions, Plot};
/// use cytogate_plots::options::{AxisOptions, BasePlotOptions};
/// use cytogate_plots::render::RenderConfig;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let axis = AxisOptions::new().range(0.0..=1000.0).build()?;
/// let options = DensityPlotOptions::new()
///     .base(BasePlotOptions::new().width(200u32).height(100u32).build()?)
///     .x_axis(axis.clone())
///     .y_axis(axis)
///     .build()?;
/// let data = vec![(100.0, 200.0), (150.0, 250.0)];
/// let mut render_config = RenderConfig::default();
/// let pixels = DensityPlot::new().render(data, &options, &mut render_config)?;
/// assert_eq!((pixels.width(), pixels.height()), (200, 100));
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Copy, Debug, Default)]
pub struct DensityPlot;

impl DensityPlot {
    /// Create a new DensityPlot instance
    pub fn new() -> Self {
        Self
    }
}

impl Plot for DensityPlot {
    type Options = DensityPlotOptions;
    type Data = Vec<(f64, f64)>;

    fn render(
        &self,
        data: Self::Data,
        options: &Self::Options,
        render_config: &mut RenderConfig,
    ) -> Result<PixelBuffer> {
        let base = options.base();
        if base.width == 0 || base.height == 0 {
            return Err(PlotError::configuration(format!(
                "plot size must be positive, got {}x{}",
                base.width, base.height
            )));
        }

        let layout = PlotLayout::new(base.width, base.height, options.instrument_mode);
        let viewport = layout.viewport(&options.x_axis, &options.y_axis)?;

        let density_start = std::time::Instant::now();
        let density = DensityMapBuilder::new(base.width, base.height).build(
            &data,
            &viewport,
            options.instrument_mode,
        );
        debug!("Density calculation: {:?}", density_start.elapsed());

        let draw_start = std::time::Instant::now();
        let pixels = Rasterizer::new(base.background).render(&density, render_config)?;
        debug!("Rasterization: {:?}", draw_start.elapsed());

        Ok(pixels)
    }
}
