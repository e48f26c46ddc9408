//! Configuration for the media pipeline.

use serde::{Deserialize, Serialize};

/// Configuration for the media pipeline.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PipelineConfig {
    /// Seconds between provider state polls.
    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,

    /// Maximum number of polls before giving up. `None` polls until the
    /// provider reports a terminal state.
    #[serde(default)]
    pub max_poll_attempts: Option<u32>,

    /// Timeout in seconds for each media download.
    #[serde(default = "default_download_timeout_secs")]
    pub download_timeout_secs: u64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            poll_interval_secs: default_poll_interval_secs(),
            max_poll_attempts: None,
            download_timeout_secs: default_download_timeout_secs(),
        }
    }
}

fn default_poll_interval_secs() -> u64 {
    30
}

fn default_download_timeout_secs() -> u64 {
    120
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = PipelineConfig::default();
        assert_eq!(config.poll_interval_secs, 30);
        assert_eq!(config.max_poll_attempts, None);
        assert_eq!(config.download_timeout_secs, 120);
    }

    #[test]
    fn test_deserialize_partial() {
        let config: PipelineConfig = toml::from_str("max_poll_attempts = 5").unwrap();
        assert_eq!(config.max_poll_attempts, Some(5));
        assert_eq!(config.poll_interval_secs, 30);
    }
}
