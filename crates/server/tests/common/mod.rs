//! Common test utilities for E2E testing with mocks.
//!
//! Provides a test fixture that builds an in-process server with mock
//! dependencies injected, so API behavior can be tested without a
//! provider account, ffmpeg, or external storage.

#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use scribe_core::{
    load_config_from_str, CalendarDispatcher, DispatcherConfig, MediaPipeline, NotetakerProvider,
    PipelineConfig, SqliteResultStore,
    testing::{MockBlobStore, MockProvider, MockTransformer},
};

/// Test fixture for E2E testing with mock dependencies.
///
/// Provides an in-process server with fully controllable mocks for:
/// - The notetaker provider (MockProvider)
/// - The blob store (MockBlobStore)
/// - The media transformer (MockTransformer)
pub struct TestFixture {
    /// The Axum router for testing
    pub router: Router,
    /// Mock provider - configure invites, job states and media
    pub provider: Arc<MockProvider>,
    /// In-memory result store
    pub store: Arc<SqliteResultStore>,
    /// Mock blob store - inspect uploads, inject failures
    pub blobs: Arc<MockBlobStore>,
    /// Mock transformer
    pub transformer: Arc<MockTransformer>,
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
}

const TEST_CONFIG: &str = r#"
[provider]
backend = "nylas"

[provider.nylas]
api_key = "secret-key"
grant_id = "grant-1"
"#;

impl TestFixture {
    /// Create a new test fixture without a dispatcher.
    pub fn new() -> Self {
        Self::build(false)
    }

    /// Create a test fixture with a (not started) dispatcher attached.
    pub fn with_dispatcher() -> Self {
        Self::build(true)
    }

    fn build(with_dispatcher: bool) -> Self {
        let config = load_config_from_str(TEST_CONFIG).expect("Failed to parse test config");

        let provider = Arc::new(MockProvider::new());
        let store = Arc::new(SqliteResultStore::in_memory().expect("Failed to create store"));
        let blobs = Arc::new(MockBlobStore::new("http://localhost:8080/blobs"));
        let transformer = Arc::new(MockTransformer::new());

        let dyn_provider: Arc<dyn NotetakerProvider> = provider.clone();
        let pipeline = Arc::new(
            MediaPipeline::new(
                PipelineConfig::default(),
                dyn_provider.clone(),
                store.clone(),
                blobs.clone(),
                transformer.clone(),
            )
            .expect("Failed to create pipeline"),
        );

        let dispatcher = with_dispatcher.then(|| {
            Arc::new(CalendarDispatcher::new(
                DispatcherConfig::default(),
                dyn_provider.clone(),
                store.clone(),
                pipeline.clone(),
            ))
        });

        let state = Arc::new(scribe_server::state::AppState::new(
            config,
            dyn_provider,
            store.clone(),
            blobs.clone(),
            pipeline,
            dispatcher,
        ));

        let router = scribe_server::api::create_router(state);

        Self {
            router,
            provider,
            store,
            blobs,
            transformer,
        }
    }

    /// Send a GET request to the test server.
    pub async fn get(&self, path: &str) -> TestResponse {
        self.request("GET", path, None).await
    }

    /// Send a GET request and return the raw body as text.
    pub async fn get_text(&self, path: &str) -> (StatusCode, String) {
        let request = Request::builder()
            .method("GET")
            .uri(path)
            .body(Body::empty())
            .unwrap();

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let body_bytes = response
            .into_body()
            .collect()
            .await
            .expect("Failed to collect body")
            .to_bytes();

        (status, String::from_utf8_lossy(&body_bytes).to_string())
    }

    /// Send a POST request with JSON body.
    pub async fn post(&self, path: &str, body: Value) -> TestResponse {
        self.request("POST", path, Some(body)).await
    }

    /// Send a DELETE request.
    pub async fn delete(&self, path: &str) -> TestResponse {
        self.request("DELETE", path, None).await
    }

    /// Send a request to the test server.
    async fn request(&self, method: &str, path: &str, body: Option<Value>) -> TestResponse {
        let mut request_builder = Request::builder().method(method).uri(path);

        let body = if let Some(json_body) = body {
            request_builder = request_builder.header("Content-Type", "application/json");
            Body::from(serde_json::to_vec(&json_body).unwrap())
        } else {
            Body::empty()
        };

        let request = request_builder.body(body).unwrap();

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let body_bytes = response
            .into_body()
            .collect()
            .await
            .expect("Failed to collect body")
            .to_bytes();

        let body: Value = if body_bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&body_bytes).unwrap_or(Value::Null)
        };

        TestResponse { status, body }
    }
}

/// Helper to assert a response has expected status.
#[macro_export]
macro_rules! assert_status {
    ($response:expr, $status:expr) => {
        assert_eq!(
            $response.status, $status,
            "Expected status {:?}, got {:?}. Body: {}",
            $status,
            $response.status,
            serde_json::to_string_pretty(&$response.body).unwrap_or_default()
        );
    };
}
