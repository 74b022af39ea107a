//! Rasterizing density maps into RGBA pixel buffers.

use crate::colormap::{Rgba, heat_color};
use crate::density_calc::DensityMap;
use crate::error::{PlotError, Result};
use crate::render::{ProgressInfo, RenderConfig};
use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder};
use std::path::Path;
use tracing::debug;

/// Discs drawn between progress reports
const PROGRESS_CHUNK: usize = 1000;

/// A packed RGBA8 image, row-major with the origin at the top left.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl PixelBuffer {
    /// A `width` x `height` buffer filled with one colour
    pub fn new(width: u32, height: u32, fill: Rgba) -> Self {
        let data = fill.repeat(width as usize * height as usize);
        Self {
            width,
            height,
            data,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Raw RGBA bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }

    #[inline]
    fn offset(&self, x: u32, y: u32) -> Option<usize> {
        (x < self.width && y < self.height)
            .then(|| (y as usize * self.width as usize + x as usize) * 4)
    }

    pub fn get_pixel(&self, x: u32, y: u32) -> Option<Rgba> {
        let i = self.offset(x, y)?;
        let mut pixel = [0u8; 4];
        pixel.copy_from_slice(&self.data[i..i + 4]);
        Some(pixel)
    }

    /// Set one pixel; coordinates outside the buffer are ignored
    #[inline]
    pub fn put_pixel(&mut self, x: u32, y: u32, color: Rgba) {
        if let Some(i) = self.offset(x, y) {
            self.data[i..i + 4].copy_from_slice(&color);
        }
    }

    /// Paint a filled disc centred on `(cx, cy)`.
    ///
    /// The `2r x 2r` box around the centre is scanned and a pixel at offset
    /// `(dx, dy)` is painted iff `dx² + dy² < r²`. Pixels outside the buffer are
    /// clipped.
    pub fn draw_disc(&mut self, cx: i64, cy: i64, radius: i64, color: Rgba) {
        let r2 = radius * radius;
        for dy in -radius..radius {
            for dx in -radius..radius {
                if dx * dx + dy * dy >= r2 {
                    continue;
                }
                let (x, y) = (cx + dx, cy + dy);
                if x >= 0 && y >= 0 {
                    self.put_pixel(x as u32, y as u32, color);
                }
            }
        }
    }

    /// Encode as PNG (lossless, alpha kept)
    pub fn to_png(&self) -> Result<Vec<u8>> {
        let mut bytes = Vec::new();
        PngEncoder::new(&mut bytes).write_image(
            &self.data,
            self.width,
            self.height,
            ExtendedColorType::Rgba8,
        )?;
        Ok(bytes)
    }

    /// Encode as PNG and write to `path`
    pub fn save_png(&self, path: &Path) -> Result<()> {
        std::fs::write(path, self.to_png()?)?;
        Ok(())
    }
}

/// Disc radius for a plot: `round((width + height) / 1000)`, at least one pixel
pub fn disc_radius(width: u32, height: u32) -> i64 {
    ((f64::from(width) + f64::from(height)) / 1000.0).round().max(1.0) as i64
}

/// Turns a [`DensityMap`] into a [`PixelBuffer`] of the full plot size.
#[derive(Clone, Copy, Debug)]
pub struct Rasterizer {
    background: Rgba,
}

impl Rasterizer {
    pub fn new(background: Rgba) -> Self {
        Self { background }
    }

    /// Render the scatter body and, in cytof mode, the zero margins.
    ///
    /// Every mapped event gets a disc coloured by the density of its cell
    /// relative to `max_density`. Discs are drawn in `density.points` order and
    /// a later disc overwrites an earlier one where they overlap.
    pub fn render(&self, density: &DensityMap, render_config: &mut RenderConfig) -> Result<PixelBuffer> {
        let layout = density.layout;
        if layout.width == 0 || layout.height == 0 {
            return Err(PlotError::configuration(format!(
                "cannot rasterize a {}x{} plot",
                layout.width, layout.height
            )));
        }

        let scatter = self.render_scatter(density, render_config);
        if layout.margin == 0 {
            return Ok(scatter);
        }
        Ok(self.compose_margins(density, &scatter))
    }

    /// Discs over the scatter body only
    pub fn render_scatter(&self, density: &DensityMap, render_config: &mut RenderConfig) -> PixelBuffer {
        let mut buffer = PixelBuffer::new(density.width as u32, density.height as u32, self.background);
        let radius = disc_radius(density.layout.width, density.layout.height);
        let total = density.points.len();

        for (drawn, &(col, row)) in density.points.iter().enumerate() {
            let color = heat_color(density.normalized(row, col));
            buffer.draw_disc(col as i64, row as i64, radius, color);

            let discs_drawn = drawn + 1;
            if discs_drawn % PROGRESS_CHUNK == 0 || discs_drawn == total {
                render_config.report_progress(ProgressInfo {
                    percent: discs_drawn as f32 / total as f32 * 100.0,
                    discs_drawn,
                });
            }
        }

        debug!(
            "Rasterized {} discs of radius {} on {}x{}",
            total,
            radius,
            buffer.width(),
            buffer.height()
        );
        buffer
    }

    /// Compose the full cytof image from the scatter raster and the zero margins.
    ///
    /// Every output pixel belongs to exactly one region:
    /// - corner (`x < margin`, `y >= height - margin`): `double_channel_zeroes`
    /// - left margin (`x < margin`, `y < height - margin`): `zero_density_x[y]`
    /// - bottom margin (`x >= margin`, `y >= height - margin`): `zero_density_y[x - margin]`
    /// - scatter body: scatter pixel `(x - margin, y)`
    ///
    /// Margin colours are normalised by the largest margin count; buckets with
    /// no events keep the background.
    pub fn compose_margins(&self, density: &DensityMap, scatter: &PixelBuffer) -> PixelBuffer {
        let layout = density.layout;
        let margin = layout.margin;
        let body_height = layout.scatter_height();
        let max_margin = density.max_margin_density();

        let margin_color = |count: u32| -> Rgba {
            if count == 0 || max_margin == 0 {
                self.background
            } else {
                heat_color(count as f64 / max_margin as f64)
            }
        };
        let bucket = |values: &Option<Vec<u32>>, index: u32| -> u32 {
            values
                .as_ref()
                .and_then(|v| v.get(index as usize).copied())
                .unwrap_or(0)
        };

        let corner = margin_color(density.double_channel_zeroes);
        let mut out = PixelBuffer::new(layout.width, layout.height, self.background);
        for y in 0..layout.height {
            for x in 0..layout.width {
                let color = match (x < margin, y >= body_height) {
                    (true, true) => corner,
                    (true, false) => margin_color(bucket(&density.zero_density_x, y)),
                    (false, true) => margin_color(bucket(&density.zero_density_y, x - margin)),
                    (false, false) => match scatter.get_pixel(x - margin, y) {
                        Some(pixel) => pixel,
                        None => self.background,
                    },
                };
                out.put_pixel(x, y, color);
            }
        }
        out
    }
}
