pub mod progress;

pub use progress::{ProgressCallback, ProgressInfo};

use tracing::warn;

/// Configuration for plot rendering
///
/// Lets applications observe rasterization without the library depending on
/// any particular UI or runtime.
#[derive(Default)]
pub struct RenderConfig {
    /// Optional progress callback, called every thousand discs and once at
    /// the end of the scatter pass.
    pub progress: Option<ProgressCallback>,
}

impl RenderConfig {
    /// Create a new RenderConfig with no callbacks
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_progress(progress: ProgressCallback) -> Self {
        Self {
            progress: Some(progress),
        }
    }

    /// Call the progress callback if present
    pub fn report_progress(&mut self, info: ProgressInfo) {
        if let Some(ref mut callback) = self.progress {
            if let Err(e) = callback(info) {
                warn!("Failed to report render progress: {}", e);
            }
        }
    }
}
