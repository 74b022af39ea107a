pub mod density;
pub mod traits;

pub use density::DensityPlot;
pub use traits::Plot;
