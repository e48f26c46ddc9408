//! Prometheus metrics for observability.
//!
//! This module provides metrics for monitoring the scribe server:
//! - HTTP request metrics (latency, counts, in-flight)
//! - Transcription job and webhook counters
//! - Dispatcher and pipeline status (collected dynamically)

use once_cell::sync::Lazy;
use prometheus::{
    self, Encoder, HistogramOpts, HistogramVec, IntCounter, IntCounterVec, IntGauge, Opts,
    Registry, TextEncoder,
};

/// Global metrics registry.
pub static REGISTRY: Lazy<Registry> = Lazy::new(|| {
    let registry = Registry::new();
    register_metrics(&registry);
    registry
});

// =============================================================================
// HTTP Request Metrics
// =============================================================================

/// HTTP request duration in seconds.
pub static HTTP_REQUEST_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    HistogramVec::new(
        HistogramOpts::new(
            "scribe_http_request_duration_seconds",
            "HTTP request duration in seconds",
        )
        .buckets(vec![
            0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0,
        ]),
        &["method", "path", "status"],
    )
    .unwrap()
});

/// HTTP requests total count.
pub static HTTP_REQUESTS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("scribe_http_requests_total", "Total HTTP requests"),
        &["method", "path", "status"],
    )
    .unwrap()
});

/// HTTP requests currently in flight.
pub static HTTP_REQUESTS_IN_FLIGHT: Lazy<IntGauge> = Lazy::new(|| {
    IntGauge::new(
        "scribe_http_requests_in_flight",
        "Number of HTTP requests currently being processed",
    )
    .unwrap()
});

// =============================================================================
// Job Metrics
// =============================================================================

/// On-demand transcription jobs accepted via the API.
pub static TRANSCRIBE_JOBS_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new(
        "scribe_transcribe_jobs_total",
        "Total on-demand transcription jobs accepted",
    )
    .unwrap()
});

/// Provider webhook notifications received.
pub static WEBHOOKS_RECEIVED_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new(
        "scribe_webhooks_received_total",
        "Total provider webhook notifications received",
    )
    .unwrap()
});

// =============================================================================
// Dispatcher and Pipeline Metrics (collected dynamically)
// =============================================================================

/// Dispatcher running state (1 = running, 0 = stopped).
pub static DISPATCHER_RUNNING: Lazy<IntGauge> = Lazy::new(|| {
    IntGauge::new(
        "scribe_dispatcher_running",
        "Whether the calendar dispatcher is running (1) or stopped (0)",
    )
    .unwrap()
});

/// Pipeline jobs currently being polled or processed.
pub static PIPELINE_JOBS_ACTIVE: Lazy<IntGauge> = Lazy::new(|| {
    IntGauge::new(
        "scribe_pipeline_jobs_active",
        "Number of active media pipeline jobs",
    )
    .unwrap()
});

// =============================================================================
// Registration
// =============================================================================

fn register_metrics(registry: &Registry) {
    registry
        .register(Box::new(HTTP_REQUEST_DURATION.clone()))
        .unwrap();
    registry
        .register(Box::new(HTTP_REQUESTS_TOTAL.clone()))
        .unwrap();
    registry
        .register(Box::new(HTTP_REQUESTS_IN_FLIGHT.clone()))
        .unwrap();
    registry
        .register(Box::new(TRANSCRIBE_JOBS_TOTAL.clone()))
        .unwrap();
    registry
        .register(Box::new(WEBHOOKS_RECEIVED_TOTAL.clone()))
        .unwrap();
    registry
        .register(Box::new(DISPATCHER_RUNNING.clone()))
        .unwrap();
    registry
        .register(Box::new(PIPELINE_JOBS_ACTIVE.clone()))
        .unwrap();
}

/// Encode all metrics as Prometheus text format.
pub fn encode_metrics() -> String {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    encoder.encode(&metric_families, &mut buffer).unwrap();
    String::from_utf8(buffer).unwrap()
}

/// Collect dynamic metrics from current application state.
///
/// Called before encoding metrics to update gauges with current values
/// from the dispatcher and pipeline.
pub async fn collect_dynamic_metrics(state: &crate::state::AppState) {
    match state.dispatcher() {
        Some(dispatcher) => {
            let status = dispatcher.status().await;
            DISPATCHER_RUNNING.set(if status.running { 1 } else { 0 });
        }
        None => DISPATCHER_RUNNING.set(0),
    }

    PIPELINE_JOBS_ACTIVE.set(state.pipeline().active_count().await as i64);
}

/// Normalize a path for metric labels (replace IDs with placeholders).
pub fn normalize_path(path: &str) -> String {
    for (prefix, normalized) in [
        ("/api/v1/media/", "/api/v1/media/{job_id}"),
        ("/api/v1/recordings/", "/api/v1/recordings/{job_id}"),
        ("/blobs/", "/blobs/{path}"),
    ] {
        if let Some(rest) = path.strip_prefix(prefix) {
            if !rest.is_empty() {
                return normalized.to_string();
            }
        }
    }
    path.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_path_job_id() {
        assert_eq!(
            normalize_path("/api/v1/media/notetaker-abc123"),
            "/api/v1/media/{job_id}"
        );
        assert_eq!(
            normalize_path("/api/v1/recordings/notetaker-abc123"),
            "/api/v1/recordings/{job_id}"
        );
    }

    #[test]
    fn test_normalize_path_blob() {
        assert_eq!(
            normalize_path("/blobs/recordings/abc/audio.mp3"),
            "/blobs/{path}"
        );
    }

    #[test]
    fn test_normalize_path_no_ids() {
        assert_eq!(normalize_path("/api/v1/health"), "/api/v1/health");
        assert_eq!(normalize_path("/api/v1/recordings"), "/api/v1/recordings");
    }

    #[test]
    fn test_encode_metrics_returns_prometheus_format() {
        // Access a metric so it appears in the output.
        HTTP_REQUESTS_TOTAL
            .with_label_values(&["GET", "/test", "200"])
            .inc();

        let output = encode_metrics();
        assert!(output.contains("scribe_http_requests_total"));
        assert!(output.contains("# HELP"));
        assert!(output.contains("# TYPE"));
    }

    #[test]
    fn test_registry_contains_all_metrics() {
        // Prometheus only outputs metrics that have been touched.
        HTTP_REQUEST_DURATION
            .with_label_values(&["GET", "/test", "200"])
            .observe(0.1);
        HTTP_REQUESTS_IN_FLIGHT.set(0);
        TRANSCRIBE_JOBS_TOTAL.inc();
        WEBHOOKS_RECEIVED_TOTAL.inc();
        DISPATCHER_RUNNING.set(0);
        PIPELINE_JOBS_ACTIVE.set(0);

        let output = encode_metrics();
        assert!(output.contains("scribe_http_request_duration_seconds"));
        assert!(output.contains("scribe_http_requests_in_flight"));
        assert!(output.contains("scribe_transcribe_jobs_total"));
        assert!(output.contains("scribe_webhooks_received_total"));
        assert!(output.contains("scribe_dispatcher_running"));
        assert!(output.contains("scribe_pipeline_jobs_active"));
    }
}
