//! Trait definitions for the transform module.

use async_trait::async_trait;

use super::error::TransformError;
use super::types::FrameCapture;

/// A transformer that derives uploadable artifacts from a video recording.
#[async_trait]
pub trait MediaTransformer: Send + Sync {
    /// Returns the name of this transformer implementation.
    fn name(&self) -> &str;

    /// Extract the audio track of a video recording as mp3 bytes.
    async fn extract_audio(&self, recording: &[u8]) -> Result<Vec<u8>, TransformError>;

    /// Sample one JPEG frame per configured interval, starting at the
    /// first frame of the recording.
    async fn sample_frames(&self, recording: &[u8]) -> Result<Vec<FrameCapture>, TransformError>;

    /// Validates that the transformer is properly configured and ready.
    async fn validate(&self) -> Result<(), TransformError>;
}
