//! Media transformation - audio extraction and frame sampling.
//!
//! Video recordings are transformed before upload: the audio track is
//! extracted to mp3 and still frames are sampled at a fixed interval.
//! Audio-only recordings bypass this module entirely.

mod config;
mod error;
mod ffmpeg;
mod traits;
mod types;

pub use config::TransformConfig;
pub use error::TransformError;
pub use ffmpeg::FfmpegTransformer;
pub use traits::MediaTransformer;
pub use types::*;
