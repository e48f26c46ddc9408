//! Provider webhook endpoint.
//!
//! The provider can be configured to notify this service about notetaker
//! state changes. Media is driven by polling, so notifications are only
//! acknowledged and logged for now.

use axum::Json;
use serde_json::{json, Value};
use tracing::info;

use crate::metrics::WEBHOOKS_RECEIVED_TOTAL;

pub async fn receive(Json(payload): Json<Value>) -> Json<Value> {
    WEBHOOKS_RECEIVED_TOTAL.inc();

    let event_type = payload
        .get("type")
        .and_then(Value::as_str)
        .unwrap_or("unknown");
    info!(event_type, "Provider webhook received");

    Json(json!({ "status": "received" }))
}
