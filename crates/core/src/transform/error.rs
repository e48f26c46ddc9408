//! Error types for the transform module.

use thiserror::Error;

/// Errors that can occur during media transformation.
#[derive(Debug, Error)]
pub enum TransformError {
    /// FFmpeg binary was not found at the configured path.
    #[error("FFmpeg not found at: {path}")]
    FfmpegNotFound { path: String },

    /// FFprobe binary was not found at the configured path.
    #[error("FFprobe not found at: {path}")]
    FfprobeNotFound { path: String },

    /// FFmpeg exited with a failure status.
    #[error("Transformation failed: {reason}")]
    TransformFailed { reason: String },

    /// The operation exceeded the configured timeout.
    #[error("Transformation timed out after {timeout_secs} seconds")]
    Timeout { timeout_secs: u64 },

    /// Underlying I/O error.
    #[error("Transform I/O error: {0}")]
    Io(#[from] std::io::Error),
}
