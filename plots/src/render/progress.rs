/// Information about plot rendering progress
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProgressInfo {
    /// Progress percentage (0.0 to 100.0)
    pub percent: f32,
    /// Discs drawn so far
    pub discs_drawn: usize,
}

/// Callback function type for reporting plot rendering progress
///
/// The callback receives progress information and returns a result.
/// Errors from the callback are logged but do not stop rendering.
pub type ProgressCallback =
    Box<dyn FnMut(ProgressInfo) -> Result<(), Box<dyn std::error::Error + Send + Sync>> + Send>;
