use axum::{
    middleware as axum_middleware,
    routing::{delete, get, post},
    Router,
};
use std::sync::Arc;
use tower_http::services::ServeDir;

use scribe_core::BlobStoreBackend;

use super::{handlers, middleware, recordings, webhook};
use crate::state::AppState;

pub fn create_router(state: Arc<AppState>) -> Router {
    // API routes
    let api_routes = Router::new()
        // Health, config, metrics
        .route("/health", get(handlers::health))
        .route("/config", get(handlers::get_config))
        .route("/metrics", get(handlers::metrics))
        .route("/dispatcher/status", get(handlers::dispatcher_status))
        // Transcription jobs
        .route("/transcribe", post(recordings::transcribe))
        .route("/media/{job_id}", get(recordings::get_media))
        // Stored recordings
        .route("/recordings", get(recordings::list_recordings))
        .route("/recordings/{job_id}", delete(recordings::delete_recording))
        // Provider notifications
        .route("/webhook", post(webhook::receive))
        .with_state(state.clone());

    let mut router = Router::new().nest("/api/v1", api_routes);

    // The filesystem backend serves its objects directly, making the
    // folder and object URLs it hands out browseable.
    if state.config().blob_store.backend == BlobStoreBackend::Fs {
        let root_dir = state.config().blob_store.fs.root_dir.clone();
        router = router.nest_service("/blobs", ServeDir::new(root_dir));
    }

    router.layer(axum_middleware::from_fn(middleware::metrics_middleware))
}
