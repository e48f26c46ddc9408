//! API integration tests running the router in-process with mocks.

mod common;

use axum::http::StatusCode;
use serde_json::json;

use common::TestFixture;
use scribe_core::provider::ProviderError;
use scribe_core::{BlobStore, JobStatus, ResultStore, ResultUpdate};

#[tokio::test]
async fn test_health() {
    let fixture = TestFixture::new();

    let response = fixture.get("/api/v1/health").await;
    assert_status!(response, StatusCode::OK);
    assert_eq!(response.body["status"], "ok");
}

#[tokio::test]
async fn test_config_redacts_api_key() {
    let fixture = TestFixture::new();

    let response = fixture.get("/api/v1/config").await;
    assert_status!(response, StatusCode::OK);

    assert_eq!(response.body["provider"]["backend"], "nylas");
    assert_eq!(response.body["provider"]["nylas"]["api_key_configured"], true);
    assert_eq!(response.body["provider"]["nylas"]["grant_id"], "grant-1");

    let serialized = serde_json::to_string(&response.body).unwrap();
    assert!(!serialized.contains("secret-key"));
}

#[tokio::test]
async fn test_metrics_endpoint() {
    let fixture = TestFixture::new();

    let (status, body) = fixture.get_text("/api/v1/metrics").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("scribe_pipeline_jobs_active"));
    assert!(body.contains("scribe_dispatcher_running"));
}

#[tokio::test]
async fn test_dispatcher_status() {
    let fixture = TestFixture::new();
    let response = fixture.get("/api/v1/dispatcher/status").await;
    assert_status!(response, StatusCode::OK);
    assert_eq!(response.body["enabled"], false);
    assert_eq!(response.body["running"], false);

    let fixture = TestFixture::with_dispatcher();
    let response = fixture.get("/api/v1/dispatcher/status").await;
    assert_status!(response, StatusCode::OK);
    assert_eq!(response.body["enabled"], true);
    assert_eq!(response.body["running"], false);
}

#[tokio::test]
async fn test_transcribe_accepted_with_video_settings() {
    let fixture = TestFixture::new();
    fixture.provider.push_invite(Ok("job-9".to_string()));

    let response = fixture
        .post(
            "/api/v1/transcribe",
            json!({ "meet_url": "https://meet.google.com/abc" }),
        )
        .await;

    assert_status!(response, StatusCode::ACCEPTED);
    assert_eq!(response.body["job_id"], "job-9");
    assert_eq!(response.body["message"], "Transcription job started");

    // On-demand invites enable video so screenshots can be sampled.
    let invites = fixture.provider.invites();
    assert_eq!(invites.len(), 1);
    assert_eq!(invites[0].0, "https://meet.google.com/abc");
    assert!(invites[0].1.video_recording);
    assert!(invites[0].1.audio_recording);
    assert!(!invites[0].1.diarization);
}

#[tokio::test]
async fn test_transcribe_empty_url_rejected() {
    let fixture = TestFixture::new();

    let response = fixture
        .post("/api/v1/transcribe", json!({ "meet_url": "  " }))
        .await;

    assert_status!(response, StatusCode::BAD_REQUEST);
    assert!(fixture.provider.invites().is_empty());
}

#[tokio::test]
async fn test_transcribe_provider_failure_returns_400() {
    let fixture = TestFixture::new();
    fixture
        .provider
        .push_invite(Err(ProviderError::ApiError("HTTP 402".to_string())));

    let response = fixture
        .post(
            "/api/v1/transcribe",
            json!({ "meet_url": "https://meet.google.com/abc" }),
        )
        .await;

    assert_status!(response, StatusCode::BAD_REQUEST);
    assert!(response.body["error"].as_str().unwrap().contains("402"));
}

#[tokio::test]
async fn test_media_absent_reads_processing() {
    let fixture = TestFixture::new();

    let response = fixture.get("/api/v1/media/unknown-job").await;
    assert_status!(response, StatusCode::OK);
    assert_eq!(response.body, json!({ "status": "processing" }));
}

#[tokio::test]
async fn test_media_ready_omits_job_id() {
    let fixture = TestFixture::new();
    fixture
        .store
        .upsert(
            "job-1",
            ResultUpdate::ready(
                "https://meet.google.com/abc",
                Some(json!({"entries": []})),
                Some("http://localhost:8080/blobs/recordings/job-1/"),
            ),
        )
        .unwrap();

    let response = fixture.get("/api/v1/media/job-1").await;
    assert_status!(response, StatusCode::OK);
    assert_eq!(response.body["status"], "ready");
    assert_eq!(response.body["meet_url"], "https://meet.google.com/abc");
    assert_eq!(
        response.body["s3_folder_url"],
        "http://localhost:8080/blobs/recordings/job-1/"
    );
    assert!(response.body.get("job_id").is_none());
}

#[tokio::test]
async fn test_media_failed_carries_error() {
    let fixture = TestFixture::new();
    fixture
        .store
        .upsert(
            "job-2",
            ResultUpdate::failed(
                "https://meet.google.com/abc",
                "Failed with state: media_error",
            ),
        )
        .unwrap();

    let response = fixture.get("/api/v1/media/job-2").await;
    assert_status!(response, StatusCode::OK);
    assert_eq!(response.body["status"], "failed");
    assert_eq!(response.body["error"], "Failed with state: media_error");
}

#[tokio::test]
async fn test_list_recordings() {
    let fixture = TestFixture::new();
    fixture
        .blobs
        .put("recordings/job-1/audio.mp3", b"audio", "audio/mpeg")
        .await
        .unwrap();
    fixture
        .blobs
        .put("recordings/job-1/screenshot_0s.jpg", b"jpeg", "image/jpeg")
        .await
        .unwrap();

    let response = fixture.get("/api/v1/recordings").await;
    assert_status!(response, StatusCode::OK);

    let recordings = response.body["recordings"].as_array().unwrap();
    assert_eq!(recordings.len(), 2);
    assert_eq!(recordings[0]["filename"], "recordings/job-1/audio.mp3");
    assert_eq!(
        recordings[0]["url"],
        "http://localhost:8080/blobs/recordings/job-1/audio.mp3"
    );
    assert_eq!(recordings[0]["size_bytes"], 5);
}

#[tokio::test]
async fn test_list_recordings_empty() {
    let fixture = TestFixture::new();

    let response = fixture.get("/api/v1/recordings").await;
    assert_status!(response, StatusCode::OK);
    assert_eq!(response.body["recordings"], json!([]));
}

#[tokio::test]
async fn test_delete_unknown_recording_returns_404() {
    let fixture = TestFixture::new();

    let response = fixture.delete("/api/v1/recordings/nope").await;
    assert_status!(response, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_recording_removes_blobs_and_result() {
    let fixture = TestFixture::new();
    fixture
        .store
        .upsert(
            "job-1",
            ResultUpdate::ready("https://meet.google.com/abc", None, Some("http://x/")),
        )
        .unwrap();
    fixture
        .blobs
        .put("recordings/job-1/audio.mp3", b"audio", "audio/mpeg")
        .await
        .unwrap();
    fixture
        .blobs
        .put("recordings/job-1/screenshot_0s.jpg", b"jpeg", "image/jpeg")
        .await
        .unwrap();

    let response = fixture.delete("/api/v1/recordings/job-1").await;
    assert_status!(response, StatusCode::OK);
    assert_eq!(response.body["deleted_objects"], 2);

    assert!(fixture.store.get("job-1").unwrap().is_none());
    assert_eq!(fixture.blobs.object_count(), 0);
}

#[tokio::test]
async fn test_delete_recording_blob_failure_keeps_result() {
    let fixture = TestFixture::new();
    fixture
        .store
        .upsert(
            "job-1",
            ResultUpdate::ready("https://meet.google.com/abc", None, Some("http://x/")),
        )
        .unwrap();
    fixture.blobs.set_fail_deletes(true);

    let response = fixture.delete("/api/v1/recordings/job-1").await;
    assert_status!(response, StatusCode::INTERNAL_SERVER_ERROR);

    // The result row survives so the delete can be retried.
    let result = fixture.store.get("job-1").unwrap().unwrap();
    assert_eq!(result.status, JobStatus::Ready);
}

#[tokio::test]
async fn test_webhook_acknowledged() {
    let fixture = TestFixture::new();

    let response = fixture
        .post(
            "/api/v1/webhook",
            json!({ "type": "notetaker.media", "data": { "id": "job-1" } }),
        )
        .await;

    assert_status!(response, StatusCode::OK);
    assert_eq!(response.body["status"], "received");
}

#[tokio::test]
async fn test_unknown_route_returns_404() {
    let fixture = TestFixture::new();

    let response = fixture.get("/api/v1/nope").await;
    assert_status!(response, StatusCode::NOT_FOUND);
}
