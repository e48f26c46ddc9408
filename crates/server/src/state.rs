use std::sync::Arc;

use scribe_core::{
    BlobStore, CalendarDispatcher, Config, MediaPipeline, NotetakerProvider, ResultStore,
    SanitizedConfig,
};

/// Shared application state
pub struct AppState {
    config: Config,
    provider: Arc<dyn NotetakerProvider>,
    store: Arc<dyn ResultStore>,
    blobs: Arc<dyn BlobStore>,
    pipeline: Arc<MediaPipeline>,
    dispatcher: Option<Arc<CalendarDispatcher>>,
}

impl AppState {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        config: Config,
        provider: Arc<dyn NotetakerProvider>,
        store: Arc<dyn ResultStore>,
        blobs: Arc<dyn BlobStore>,
        pipeline: Arc<MediaPipeline>,
        dispatcher: Option<Arc<CalendarDispatcher>>,
    ) -> Self {
        Self {
            config,
            provider,
            store,
            blobs,
            pipeline,
            dispatcher,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn sanitized_config(&self) -> SanitizedConfig {
        SanitizedConfig::from(&self.config)
    }

    pub fn provider(&self) -> &dyn NotetakerProvider {
        self.provider.as_ref()
    }

    pub fn store(&self) -> &dyn ResultStore {
        self.store.as_ref()
    }

    pub fn blobs(&self) -> &dyn BlobStore {
        self.blobs.as_ref()
    }

    pub fn pipeline(&self) -> &Arc<MediaPipeline> {
        &self.pipeline
    }

    pub fn dispatcher(&self) -> Option<&Arc<CalendarDispatcher>> {
        self.dispatcher.as_ref()
    }
}
