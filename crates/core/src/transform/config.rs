//! Configuration for the transform module.

use serde::{Deserialize, Serialize};

/// Configuration for the ffmpeg-based transformer.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TransformConfig {
    /// Path to the ffmpeg binary.
    #[serde(default = "default_ffmpeg_path")]
    pub ffmpeg_path: String,

    /// Path to the ffprobe binary.
    #[serde(default = "default_ffprobe_path")]
    pub ffprobe_path: String,

    /// Maximum seconds a single ffmpeg invocation may run.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Seconds between sampled screenshots.
    #[serde(default = "default_screenshot_interval_secs")]
    pub screenshot_interval_secs: u64,
}

impl Default for TransformConfig {
    fn default() -> Self {
        Self {
            ffmpeg_path: default_ffmpeg_path(),
            ffprobe_path: default_ffprobe_path(),
            timeout_secs: default_timeout_secs(),
            screenshot_interval_secs: default_screenshot_interval_secs(),
        }
    }
}

fn default_ffmpeg_path() -> String {
    "ffmpeg".to_string()
}

fn default_ffprobe_path() -> String {
    "ffprobe".to_string()
}

fn default_timeout_secs() -> u64 {
    300
}

fn default_screenshot_interval_secs() -> u64 {
    10
}
