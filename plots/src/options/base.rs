use crate::colormap::{Rgba, WHITE};
use derive_builder::Builder;

/// Base plot options containing layout and display settings
///
/// These options are common to all plot types and control the size and
/// background of the rendered image.
///
/// # Example
///
/// ```rust
/// use cytogate_plots::options::BasePlotOptions;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let base = BasePlotOptions::new()
///     .width(800u32)
///     .height(600u32)
///     .title("CD3 vs CD8")
///     .build()?;
/// assert_eq!(base.background, [255, 255, 255, 255]);
///
/// assert!(BasePlotOptions::new().width(0u32).build().is_err());
/// # Ok(())
/// # }
/// ```
#[derive(Builder, Clone, Debug, PartialEq)]
#[builder(setter(into, strip_option), default, build_fn(validate = "Self::validate"))]
pub struct BasePlotOptions {
    /// Plot width in pixels
    #[builder(default = "400")]
    pub width: u32,

    /// Plot height in pixels
    #[builder(default = "400")]
    pub height: u32,

    /// Colour of pixels no event is drawn on
    #[builder(default = "WHITE")]
    pub background: Rgba,

    /// Plot title
    #[builder(default = "\"Density Plot\".to_string()")]
    pub title: String,
}

impl Default for BasePlotOptions {
    fn default() -> Self {
        Self {
            width: 400,
            height: 400,
            background: WHITE,
            title: "Density Plot".to_string(),
        }
    }
}

impl BasePlotOptions {
    /// Create a new builder for BasePlotOptions
    pub fn new() -> BasePlotOptionsBuilder {
        BasePlotOptionsBuilder::default()
    }
}

impl BasePlotOptionsBuilder {
    fn validate(&self) -> Result<(), String> {
        if self.width == Some(0) || self.height == Some(0) {
            return Err("plot width and height must be at least one pixel".to_string());
        }
        Ok(())
    }
}
