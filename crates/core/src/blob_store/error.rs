//! Error types for the blob store.

use thiserror::Error;

/// Errors that can occur in the blob store.
#[derive(Debug, Error)]
pub enum BlobStoreError {
    /// The object path is absolute, empty, or escapes the store root.
    #[error("Invalid object path: {0}")]
    InvalidPath(String),

    /// An underlying I/O operation failed.
    #[error("Blob store I/O error at {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl BlobStoreError {
    pub(crate) fn io(path: &str, source: std::io::Error) -> Self {
        Self::Io {
            path: path.to_string(),
            source,
        }
    }
}
