//! Types for the calendar dispatcher.

use serde::Serialize;
use thiserror::Error;

use crate::provider::ProviderError;
use crate::store::StoreError;

/// Errors that can occur during a calendar scan.
#[derive(Debug, Error)]
pub enum DispatcherError {
    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Snapshot of the dispatcher's runtime state.
#[derive(Debug, Clone, Default, Serialize)]
pub struct DispatcherStatus {
    pub running: bool,
    pub active_pipelines: usize,
}
