//! Result store - persistence for pipeline outcomes and dispatch markers.
//!
//! The store holds one document per notetaker job (written by the polling
//! pipeline, read by the API) plus a create-only set of dispatch records
//! the calendar dispatcher uses to guarantee one invite per event.

mod sqlite;
mod types;

pub use sqlite::SqliteResultStore;
pub use types::*;

use chrono::{DateTime, Utc};
use thiserror::Error;

/// Errors that can occur in the result store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Underlying database error.
    #[error("store database error: {0}")]
    Database(String),

    /// A dispatch record already exists for this event.
    ///
    /// Inserting a dispatch record is create-only; hitting this means the
    /// check-then-act guard was raced or the caller has a logic error.
    #[error("dispatch record already exists for event: {0}")]
    DuplicateDispatch(String),

    /// Stored document could not be decoded.
    #[error("failed to decode stored record: {0}")]
    Corrupt(String),
}

/// Trait for result persistence.
pub trait ResultStore: Send + Sync {
    /// Insert or overwrite the result document for a job.
    ///
    /// Repeated calls with the same job id overwrite, never duplicate.
    fn upsert(&self, job_id: &str, update: ResultUpdate) -> Result<(), StoreError>;

    /// Get the result document for a job, if one has been written.
    fn get(&self, job_id: &str) -> Result<Option<MediaResult>, StoreError>;

    /// Delete the result document for a job. Returns the number of rows
    /// removed (0 or 1).
    fn delete(&self, job_id: &str) -> Result<u64, StoreError>;

    /// Record that a bot was dispatched for a calendar event (create-only).
    fn record_dispatch(
        &self,
        event_id: &str,
        job_id: &str,
        dispatched_at: DateTime<Utc>,
    ) -> Result<(), StoreError>;

    /// Whether a dispatch record exists for the event.
    fn has_dispatch(&self, event_id: &str) -> Result<bool, StoreError>;
}
