//! Configuration for the calendar dispatcher.

use serde::{Deserialize, Serialize};

/// Configuration for the calendar dispatcher.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DispatcherConfig {
    /// Whether the dispatcher runs at all.
    #[serde(default)]
    pub enabled: bool,

    /// Seconds between calendar scans.
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,

    /// How far into the past each scan window reaches, in seconds.
    #[serde(default = "default_lookback_secs")]
    pub lookback_secs: u64,

    /// How far into the future each scan window reaches, in seconds.
    #[serde(default = "default_lookahead_secs")]
    pub lookahead_secs: u64,
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            interval_secs: default_interval_secs(),
            lookback_secs: default_lookback_secs(),
            lookahead_secs: default_lookahead_secs(),
        }
    }
}

fn default_interval_secs() -> u64 {
    60
}

fn default_lookback_secs() -> u64 {
    60
}

fn default_lookahead_secs() -> u64 {
    120
}
