//! # cytogate-plots
//!
//! Density plots of cytometry events, rendered to RGBA pixels.
//!
//! ## Overview
//!
//! - `options`: Plot configuration types using the builder pattern
//! - `layout`: Scatter body and cytof zero margin geometry
//! - `density_calc`: Per-pixel event counts and zero histograms
//! - `raster`: Disc rasterization, margin composition and PNG encoding
//! - `colormap`: Blue to red heat colouring
//! - `plots`: The [`Plot`] trait and [`DensityPlot`]
//! - `render`: Progress reporting
//! - `helpers`: Options from channel statistics
//!
//! ## Basic Usage
//!
//! ```rust
//! use cytogate_plots::{DensityPlot, DensityPlotOptions, InstrumentMode, Plot};
//! use cytogate_plots::options::{AxisOptions, BasePlotOptions};
//! use cytogate_plots::render::RenderConfig;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let axis = AxisOptions::new().range(0.0..=400.0).build()?;
//! let options = DensityPlotOptions::new()
//!     .base(BasePlotOptions::new().width(400u32).height(400u32).build()?)
//!     .x_axis(axis.clone())
//!     .y_axis(axis)
//!     .instrument_mode(InstrumentMode::Cytof)
//!     .build()?;
//! let data = vec![(0.0, 0.0), (0.0, 120.0), (80.0, 0.0), (200.0, 200.0)];
//! let pixels = DensityPlot::new().render(data, &options, &mut RenderConfig::default())?;
//! let png = pixels.to_png()?;
//! assert!(png.starts_with(&[0x89, b'P', b'N', b'G']));
//! # Ok(())
//! # }
//! ```

pub mod colormap;
pub mod density_calc;
pub mod error;
pub mod helpers;
pub mod layout;
pub mod options;
pub mod plots;
pub mod raster;
pub mod render;

#[cfg(test)]
mod tests;

// Re-export commonly used types
pub use colormap::{Rgba, heat_color};
pub use density_calc::{DensityMap, DensityMapBuilder};
pub use error::{PlotError, Result as PlotResult};
pub use layout::{InstrumentMode, PlotLayout};
pub use options::{AxisOptions, BasePlotOptions, DensityPlotOptions, PlotOptions};
pub use plots::{DensityPlot, Plot};
pub use raster::{PixelBuffer, Rasterizer, disc_radius};
pub use render::{ProgressCallback, ProgressInfo, RenderConfig};

// Type aliases
pub type PlotRange = std::ops::RangeInclusive<f64>;
