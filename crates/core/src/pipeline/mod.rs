//! Media pipeline - drives one notetaker job from invite to stored result.
//!
//! Each job gets its own background task that polls the provider until a
//! terminal state, downloads the media, transforms video recordings, and
//! uploads everything to the blob store. Every outcome ends with exactly
//! one result document in the store.

mod config;
mod runner;
mod types;

pub use config::PipelineConfig;
pub use runner::MediaPipeline;
pub use types::*;
