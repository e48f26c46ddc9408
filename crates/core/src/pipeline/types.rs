//! Types for the media pipeline.

use thiserror::Error;

use crate::blob_store::BlobStoreError;
use crate::provider::ProviderError;
use crate::store::StoreError;
use crate::transform::TransformError;

/// One notetaker job the pipeline is tracking.
#[derive(Debug, Clone)]
pub struct PipelineJob {
    /// Provider-issued notetaker id.
    pub job_id: String,
    /// Meeting URL the bot was sent to.
    pub meet_url: String,
    /// Whether the caller asked for video, enabling audio extraction and
    /// frame sampling when the recording actually is a video.
    pub video_requested: bool,
}

/// Errors that can occur while driving a job through the pipeline.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Blob(#[from] BlobStoreError),

    #[error(transparent)]
    Transform(#[from] TransformError),

    /// The provider reported a terminal failure state.
    #[error("Notetaker job ended in state: {0}")]
    JobFailed(String),

    /// A media download failed.
    #[error("Media download failed: {0}")]
    Download(String),

    /// The configured poll budget ran out before a terminal state.
    #[error("Gave up polling after {attempts} attempts")]
    PollBudgetExhausted { attempts: u32 },
}
