//! Recording and transcription API handlers.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{info, warn};

use scribe_core::{MeetingSettings, PipelineJob};

use crate::metrics::TRANSCRIBE_JOBS_TOTAL;
use crate::state::AppState;

// ============================================================================
// Request/Response Types
// ============================================================================

/// Request body for starting an on-demand transcription
#[derive(Debug, Deserialize)]
pub struct TranscribeBody {
    /// Meeting URL the notetaker should join
    pub meet_url: String,
}

/// Response for a started transcription job
#[derive(Debug, Serialize)]
pub struct TranscribeResponse {
    pub message: String,
    pub job_id: String,
}

/// One stored media object in a listing
#[derive(Debug, Serialize)]
pub struct RecordingEntry {
    pub filename: String,
    pub url: String,
    pub size_bytes: u64,
    pub last_modified: String,
}

/// Response for listing stored recordings
#[derive(Debug, Serialize)]
pub struct ListRecordingsResponse {
    pub recordings: Vec<RecordingEntry>,
}

/// Error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

fn internal_error(message: String) -> (StatusCode, Json<ErrorResponse>) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse { error: message }),
    )
}

// ============================================================================
// Handlers
// ============================================================================

/// Invite a notetaker into a meeting right now and start the pipeline.
pub async fn transcribe(
    State(state): State<Arc<AppState>>,
    Json(body): Json<TranscribeBody>,
) -> Result<(StatusCode, Json<TranscribeResponse>), impl IntoResponse> {
    if body.meet_url.trim().is_empty() {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: "meet_url must not be empty".to_string(),
            }),
        ));
    }

    // On-demand jobs record video so screenshots can be sampled.
    let settings = MeetingSettings::on_demand();
    let job_id = match state.provider().invite(&body.meet_url, &settings).await {
        Ok(job_id) => job_id,
        Err(e) => {
            warn!(error = %e, "Failed to invite notetaker");
            return Err((
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse {
                    error: e.to_string(),
                }),
            ));
        }
    };

    info!(job_id = %job_id, meet_url = %body.meet_url, "On-demand transcription started");
    TRANSCRIBE_JOBS_TOTAL.inc();

    state
        .pipeline()
        .spawn(PipelineJob {
            job_id: job_id.clone(),
            meet_url: body.meet_url,
            video_requested: true,
        })
        .await;

    Ok((
        StatusCode::ACCEPTED,
        Json(TranscribeResponse {
            message: "Transcription job started".to_string(),
            job_id,
        }),
    ))
}

/// Get the processing result for a job.
///
/// A job without a stored result reads as still processing, so callers
/// can poll this endpoint from the moment the job is accepted.
pub async fn get_media(
    State(state): State<Arc<AppState>>,
    Path(job_id): Path<String>,
) -> Result<Json<Value>, (StatusCode, Json<ErrorResponse>)> {
    match state.store().get(&job_id) {
        Ok(Some(result)) => {
            let mut value = serde_json::to_value(&result)
                .map_err(|e| internal_error(e.to_string()))?;
            if let Some(object) = value.as_object_mut() {
                object.remove("job_id");
            }
            Ok(Json(value))
        }
        Ok(None) => Ok(Json(json!({ "status": "processing" }))),
        Err(e) => Err(internal_error(e.to_string())),
    }
}

/// List every stored media object under the recordings prefix.
pub async fn list_recordings(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ListRecordingsResponse>, (StatusCode, Json<ErrorResponse>)> {
    let objects = state
        .blobs()
        .list("recordings")
        .await
        .map_err(|e| internal_error(e.to_string()))?;

    let recordings = objects
        .into_iter()
        .map(|object| RecordingEntry {
            url: state.blobs().object_url(&object.path),
            filename: object.path,
            size_bytes: object.size_bytes,
            last_modified: object.modified_at.to_rfc3339(),
        })
        .collect();

    Ok(Json(ListRecordingsResponse { recordings }))
}

/// Delete a job's stored media and its result document.
///
/// Blobs are removed before the result row; a failed blob deletion
/// leaves the result intact so the delete can be retried.
pub async fn delete_recording(
    State(state): State<Arc<AppState>>,
    Path(job_id): Path<String>,
) -> Result<Json<Value>, (StatusCode, Json<ErrorResponse>)> {
    match state.store().get(&job_id) {
        Ok(Some(_)) => {}
        Ok(None) => {
            return Err((
                StatusCode::NOT_FOUND,
                Json(ErrorResponse {
                    error: format!("No media found for job {}", job_id),
                }),
            ));
        }
        Err(e) => return Err(internal_error(e.to_string())),
    }

    let prefix = format!("recordings/{}", job_id);
    let deleted_objects = state
        .blobs()
        .delete_prefix(&prefix)
        .await
        .map_err(|e| internal_error(e.to_string()))?;

    state
        .store()
        .delete(&job_id)
        .map_err(|e| internal_error(e.to_string()))?;

    info!(job_id = %job_id, deleted_objects, "Recording deleted");

    Ok(Json(json!({
        "message": "Recording deleted",
        "deleted_objects": deleted_objects,
    })))
}
