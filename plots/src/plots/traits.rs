use crate::error::Result;
use crate::options::PlotOptions;
use crate::raster::PixelBuffer;
use crate::render::RenderConfig;

/// Trait for plot types
///
/// Each plot type specifies its own options type and data type and renders
/// to an RGBA [`PixelBuffer`]; encoding is left to the caller.
///
/// # Example
///
/// ```rust
/// use cytogate_plots::colormap::WHITE;
/// use cytogate_plots::error::Result;
/// use cytogate_plots::options::{BasePlotOptions, PlotOptions};
/// use cytogate_plots::plots::traits::Plot;
/// use cytogate_plots::raster::PixelBuffer;
/// use cytogate_plots::render::RenderConfig;
///
/// struct BlankOptions {
///     base: BasePlotOptions,
/// }
///
/// impl PlotOptions for BlankOptions {
///     fn base(&self) -> &BasePlotOptions { &self.base }
/// }
///
/// struct BlankPlot;
///
/// impl Plot for BlankPlot {
///     type Options = BlankOptions;
///     type Data = ();
///
///     fn render(
///         &self,
///         _data: Self::Data,
///         options: &Self::Options,
///         _render_config: &mut RenderConfig,
///     ) -> Result<PixelBuffer> {
///         let base = options.base();
///         Ok(PixelBuffer::new(base.width, base.height, WHITE))
///     }
/// }
/// ```
pub trait Plot {
    /// The options type for this plot
    type Options: PlotOptions;

    /// The data type this plot accepts
    type Data;

    /// Render the plot with the given data and options
    ///
    /// # Arguments
    ///
    /// * `data` - The data to plot
    /// * `options` - Plot-specific options
    /// * `render_config` - Rendering configuration (progress callbacks, etc.)
    fn render(
        &self,
        data: Self::Data,
        options: &Self::Options,
        render_config: &mut RenderConfig,
    ) -> Result<PixelBuffer>;
}
