use crate::layout::{InstrumentMode, PlotLayout};
use cytogate_events::Viewport;
use tracing::debug;

/// Event counts per scatter pixel, plus the zero-channel histograms of cytof plots.
///
/// `counts` is row-major over the scatter body (`width` x `height`, row 0 at the
/// top). `points` holds the cell of every mapped event in input order, which is
/// the order discs are drawn in.
///
/// In cytof mode each zero event lands in exactly one margin bucket:
/// - `x == 0 && y == 0`: `double_channel_zeroes`
/// - `x == 0` only: `zero_density_x[row]`
/// - `y == 0` only: `zero_density_y[col]`
///
/// Zero events still count in the scatter grid like any other event.
#[derive(Clone, Debug, PartialEq)]
pub struct DensityMap {
    pub layout: PlotLayout,
    pub width: usize,
    pub height: usize,
    pub counts: Vec<u32>,
    pub max_density: u32,
    pub points: Vec<(usize, usize)>,
    pub zero_density_x: Option<Vec<u32>>,
    pub zero_density_y: Option<Vec<u32>>,
    pub double_channel_zeroes: u32,
}

impl DensityMap {
    /// Count at a scatter cell
    #[inline]
    pub fn count(&self, row: usize, col: usize) -> u32 {
        self.counts[row * self.width + col]
    }

    /// Sum of all scatter cells
    pub fn total(&self) -> u64 {
        self.counts.iter().map(|&c| c as u64).sum()
    }

    /// Largest count over both margins and the double-zero corner
    pub fn max_margin_density(&self) -> u32 {
        let x = self.zero_density_x.iter().flatten().copied().max().unwrap_or(0);
        let y = self.zero_density_y.iter().flatten().copied().max().unwrap_or(0);
        x.max(y).max(self.double_channel_zeroes)
    }

    /// Count normalised by `max_density`, in `[0, 1]`
    #[inline]
    pub fn normalized(&self, row: usize, col: usize) -> f64 {
        if self.max_density == 0 {
            0.0
        } else {
            self.count(row, col) as f64 / self.max_density as f64
        }
    }
}

/// Bins data-space points into a [`DensityMap`] for a plot of a given size.
///
/// # Example
///
/// ```rust
/// use cytogate_events::ScaleKind;
/// use cytogate_plots::density_calc::DensityMapBuilder;
/// use cytogate_plots::layout::{InstrumentMode, PlotLayout};
/// use cytogate_plots::options::AxisOptions;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let axis = AxisOptions::new().range(0.0..=100.0).build()?;
/// let layout = PlotLayout::new(100, 100, InstrumentMode::Standard);
/// let viewport = layout.viewport(&axis, &axis)?;
///
/// let map = DensityMapBuilder::new(100, 100).build(
///     &[(10.0, 10.0), (10.0, 10.0), (90.0, 50.0)],
///     &viewport,
///     InstrumentMode::Standard,
/// );
/// assert_eq!(map.max_density, 2);
/// assert_eq!(map.count(90, 10), 2);
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Copy, Debug)]
pub struct DensityMapBuilder {
    width: u32,
    height: u32,
}

impl DensityMapBuilder {
    /// Builder for a `width` x `height` plot, margins included
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Count `points` into a density map.
    ///
    /// `viewport` must map onto the scatter body of the plot's layout (see
    /// [`PlotLayout::viewport`]). Pixel coordinates are rounded and clamped into
    /// the grid, so every point is counted exactly once.
    pub fn build(
        &self,
        points: &[(f64, f64)],
        viewport: &Viewport,
        mode: InstrumentMode,
    ) -> DensityMap {
        let layout = PlotLayout::new(self.width, self.height, mode);
        let width = layout.scatter_width() as usize;
        let height = layout.scatter_height() as usize;
        let with_margins = mode.has_zero_margins();

        let mut counts = vec![0u32; width * height];
        let mut max_density = 0u32;
        let mut cells = Vec::with_capacity(points.len());
        let mut zero_x = with_margins.then(|| vec![0u32; height]);
        let mut zero_y = with_margins.then(|| vec![0u32; width]);
        let mut double_zeroes = 0u32;

        if width > 0 && height > 0 {
            for &(x, y) in points {
                let (px, py) = viewport.forward((x, y));
                let col = to_cell(px, width);
                let row = to_cell(py, height);

                let count = &mut counts[row * width + col];
                *count += 1;
                max_density = max_density.max(*count);
                cells.push((col, row));

                if with_margins {
                    match (x == 0.0, y == 0.0) {
                        (true, true) => double_zeroes += 1,
                        (true, false) => {
                            if let Some(zx) = zero_x.as_mut() {
                                zx[row] += 1;
                            }
                        }
                        (false, true) => {
                            if let Some(zy) = zero_y.as_mut() {
                                zy[col] += 1;
                            }
                        }
                        (false, false) => {}
                    }
                }
            }
        }

        debug!(
            "Density map {}x{}: {} points, max density {}, {} double zeroes",
            width,
            height,
            cells.len(),
            max_density,
            double_zeroes
        );

        DensityMap {
            layout,
            width,
            height,
            counts,
            max_density,
            points: cells,
            zero_density_x: zero_x,
            zero_density_y: zero_y,
            double_channel_zeroes: double_zeroes,
        }
    }
}

#[inline]
fn to_cell(pixel: f64, size: usize) -> usize {
    (pixel.round() as isize).clamp(0, size as isize - 1) as usize
}
