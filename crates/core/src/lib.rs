pub mod blob_store;
pub mod config;
pub mod dispatcher;
pub mod pipeline;
pub mod provider;
pub mod store;
pub mod testing;
pub mod transform;

pub use blob_store::{BlobObject, BlobStore, BlobStoreBackend, FsBlobStore};
pub use config::{
    config_path, load_config, load_config_from_str, validate_config, Config, ConfigError,
    ProviderBackend,
    SanitizedConfig,
};
pub use dispatcher::{CalendarDispatcher, DispatcherConfig, DispatcherStatus};
pub use pipeline::{MediaPipeline, PipelineConfig, PipelineJob};
pub use provider::{MeetingSettings, NotetakerProvider, NotetakerState, NylasProvider};
pub use store::{JobStatus, MediaResult, ResultStore, ResultUpdate, SqliteResultStore};
pub use transform::{FfmpegTransformer, MediaTransformer, TransformConfig};
