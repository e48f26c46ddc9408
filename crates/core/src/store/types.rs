//! Types for the result store.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Processing status of a notetaker job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    /// Media processed, uploaded, transcript attached.
    Ready,
    /// Polling or processing failed; see the error field.
    Failed,
    /// No result document yet (synthesized for API reads, never stored).
    Processing,
}

impl JobStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ready => "ready",
            Self::Failed => "failed",
            Self::Processing => "processing",
        }
    }
}

/// The result document for one notetaker job.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaResult {
    pub job_id: String,
    pub meet_url: String,
    pub status: JobStatus,
    /// Full transcript payload as downloaded from the provider.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transcript: Option<Value>,
    /// Public URL of the blob folder holding the processed media.
    #[serde(
        rename = "s3_folder_url",
        skip_serializing_if = "Option::is_none"
    )]
    pub folder_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub updated_at: DateTime<Utc>,
}

/// What an upsert writes. The store stamps `updated_at` itself.
#[derive(Debug, Clone)]
pub struct ResultUpdate {
    pub meet_url: String,
    pub status: JobStatus,
    pub transcript: Option<Value>,
    pub folder_url: Option<String>,
    pub error: Option<String>,
}

impl ResultUpdate {
    /// A successful outcome. The folder URL is present only when the job
    /// produced media to upload; transcript-only jobs carry neither.
    pub fn ready(meet_url: &str, transcript: Option<Value>, folder_url: Option<&str>) -> Self {
        Self {
            meet_url: meet_url.to_string(),
            status: JobStatus::Ready,
            transcript,
            folder_url: folder_url.map(str::to_string),
            error: None,
        }
    }

    /// A failed outcome carrying the error message shown to API callers.
    pub fn failed(meet_url: &str, error: &str) -> Self {
        Self {
            meet_url: meet_url.to_string(),
            status: JobStatus::Failed,
            transcript: None,
            folder_url: None,
            error: Some(error.to_string()),
        }
    }
}
