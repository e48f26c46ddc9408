use axum::{extract::State, Json};
use serde::Serialize;
use std::sync::Arc;

use scribe_core::SanitizedConfig;

use crate::metrics::{collect_dynamic_metrics, encode_metrics};
use crate::state::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}

pub async fn get_config(State(state): State<Arc<AppState>>) -> Json<SanitizedConfig> {
    Json(state.sanitized_config())
}

pub async fn metrics(State(state): State<Arc<AppState>>) -> String {
    collect_dynamic_metrics(&state).await;
    encode_metrics()
}

/// Dispatcher status response
#[derive(Serialize)]
pub struct DispatcherStatusResponse {
    pub enabled: bool,
    pub running: bool,
    pub active_pipelines: usize,
}

pub async fn dispatcher_status(
    State(state): State<Arc<AppState>>,
) -> Json<DispatcherStatusResponse> {
    match state.dispatcher() {
        Some(dispatcher) => {
            let status = dispatcher.status().await;
            Json(DispatcherStatusResponse {
                enabled: true,
                running: status.running,
                active_pipelines: status.active_pipelines,
            })
        }
        None => Json(DispatcherStatusResponse {
            enabled: false,
            running: false,
            active_pipelines: state.pipeline().active_count().await,
        }),
    }
}
