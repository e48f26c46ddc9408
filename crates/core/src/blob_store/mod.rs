//! Blob store - upload target for processed meeting media.
//!
//! Processed audio and screenshots land here under a per-job folder
//! (`recordings/{job_id}/`). The store also serves the listing and
//! deletion surface of the recordings API.

mod error;
mod fs;
mod types;

pub use error::BlobStoreError;
pub use fs::FsBlobStore;
pub use types::*;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Available blob store backends.
#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum BlobStoreBackend {
    #[default]
    Fs,
    // Future: S3, Gcs
}

/// A store for uploaded media objects addressed by slash-separated paths.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Returns the name of this blob store implementation.
    fn name(&self) -> &str;

    /// Upload an object, overwriting any existing object at the path.
    async fn put(
        &self,
        path: &str,
        bytes: &[u8],
        content_type: &str,
    ) -> Result<(), BlobStoreError>;

    /// List all objects whose path starts with the prefix.
    async fn list(&self, prefix: &str) -> Result<Vec<BlobObject>, BlobStoreError>;

    /// Delete every object under the prefix. Returns the number of objects
    /// removed; deleting a prefix with no objects is not an error.
    async fn delete_prefix(&self, prefix: &str) -> Result<u64, BlobStoreError>;

    /// Public URL for a single object.
    fn object_url(&self, path: &str) -> String;

    /// Public URL for a folder prefix (trailing slash preserved).
    fn folder_url(&self, prefix: &str) -> String;
}
