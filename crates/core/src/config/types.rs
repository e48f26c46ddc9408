use serde::{Deserialize, Serialize};
use std::net::IpAddr;
use std::path::PathBuf;

use crate::blob_store::BlobStoreBackend;
use crate::dispatcher::DispatcherConfig;
use crate::pipeline::PipelineConfig;
use crate::transform::TransformConfig;

/// Root configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub provider: ProviderConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub blob_store: BlobStoreConfig,
    #[serde(default)]
    pub transform: TransformConfig,
    #[serde(default)]
    pub pipeline: PipelineConfig,
    #[serde(default)]
    pub dispatcher: DispatcherConfig,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: IpAddr,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> IpAddr {
    "0.0.0.0".parse().unwrap()
}

fn default_port() -> u16 {
    8080
}

/// Database configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_db_path")]
    pub path: PathBuf,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

fn default_db_path() -> PathBuf {
    PathBuf::from("scribe.db")
}

/// Meeting-bot provider configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ProviderConfig {
    /// Provider backend type
    pub backend: ProviderBackend,
    /// Nylas-specific configuration (required when backend = "nylas")
    #[serde(default)]
    pub nylas: Option<NylasConfig>,
}

/// Available meeting-bot provider backends
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ProviderBackend {
    Nylas,
    // Future: Recall, MeetingBaas
}

/// Nylas provider configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct NylasConfig {
    /// Nylas API base URL
    #[serde(default = "default_nylas_api_url")]
    pub api_url: String,
    /// Nylas API key
    pub api_key: String,
    /// Grant ID the notetaker and calendar operations are scoped to
    pub grant_id: String,
    /// Request timeout in seconds (default: 30)
    #[serde(default = "default_timeout")]
    pub timeout_secs: u32,
}

fn default_nylas_api_url() -> String {
    "https://api.us.nylas.com".to_string()
}

fn default_timeout() -> u32 {
    30
}

/// Blob store configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BlobStoreConfig {
    /// Blob store backend type
    #[serde(default)]
    pub backend: BlobStoreBackend,
    /// Filesystem backend configuration
    #[serde(default)]
    pub fs: FsBlobStoreConfig,
}

impl Default for BlobStoreConfig {
    fn default() -> Self {
        Self {
            backend: BlobStoreBackend::Fs,
            fs: FsBlobStoreConfig::default(),
        }
    }
}

/// Filesystem blob store configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FsBlobStoreConfig {
    /// Root directory all objects are stored under
    #[serde(default = "default_blob_root")]
    pub root_dir: PathBuf,
    /// Base URL used to build browseable object/folder URLs
    #[serde(default = "default_public_base_url")]
    pub public_base_url: String,
}

impl Default for FsBlobStoreConfig {
    fn default() -> Self {
        Self {
            root_dir: default_blob_root(),
            public_base_url: default_public_base_url(),
        }
    }
}

fn default_blob_root() -> PathBuf {
    PathBuf::from("blobs")
}

fn default_public_base_url() -> String {
    "http://localhost:8080/blobs".to_string()
}

/// Sanitized config for API responses (secrets redacted)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub provider: SanitizedProviderConfig,
    pub blob_store: BlobStoreConfig,
    pub pipeline: PipelineConfig,
    pub dispatcher: DispatcherConfig,
}

/// Sanitized provider config (API key redacted)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedProviderConfig {
    pub backend: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nylas: Option<SanitizedNylasConfig>,
}

/// Sanitized Nylas config (API key hidden)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedNylasConfig {
    pub api_url: String,
    pub grant_id: String,
    pub api_key_configured: bool,
    pub timeout_secs: u32,
}

impl From<&Config> for SanitizedConfig {
    fn from(config: &Config) -> Self {
        Self {
            server: config.server.clone(),
            database: config.database.clone(),
            provider: SanitizedProviderConfig {
                backend: match config.provider.backend {
                    ProviderBackend::Nylas => "nylas".to_string(),
                },
                nylas: config.provider.nylas.as_ref().map(|n| SanitizedNylasConfig {
                    api_url: n.api_url.clone(),
                    grant_id: n.grant_id.clone(),
                    api_key_configured: !n.api_key.is_empty(),
                    timeout_secs: n.timeout_secs,
                }),
            },
            blob_store: config.blob_store.clone(),
            pipeline: config.pipeline.clone(),
            dispatcher: config.dispatcher.clone(),
        }
    }
}
