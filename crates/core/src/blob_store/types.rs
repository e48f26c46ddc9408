//! Types for the blob store.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Metadata for one stored object.
#[derive(Debug, Clone, Serialize)]
pub struct BlobObject {
    /// Slash-separated path relative to the store root.
    pub path: String,
    pub size_bytes: u64,
    pub modified_at: DateTime<Utc>,
}
