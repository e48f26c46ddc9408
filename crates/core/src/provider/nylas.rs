//! Nylas notetaker provider implementation.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::config::NylasConfig;

use super::{
    CalendarEvent, MediaDescriptor, MeetingSettings, NotetakerProvider, NotetakerState,
    ProviderError, TimeWindow,
};

/// Nylas v3 API client scoped to a single grant.
pub struct NylasProvider {
    client: Client,
    config: NylasConfig,
}

impl NylasProvider {
    /// Create a new Nylas provider client.
    pub fn new(config: NylasConfig) -> Result<Self, ProviderError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs as u64))
            .build()
            .map_err(|e| ProviderError::ConnectionFailed(e.to_string()))?;

        Ok(Self { client, config })
    }

    /// Get the base URL without trailing slash.
    fn base_url(&self) -> &str {
        self.config.api_url.trim_end_matches('/')
    }

    fn grant_url(&self, suffix: &str) -> String {
        format!(
            "{}/v3/grants/{}{}",
            self.base_url(),
            self.config.grant_id,
            suffix
        )
    }

    /// Make an authenticated GET request and deserialize the response body.
    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, String)],
    ) -> Result<T, ProviderError> {
        let response = self
            .client
            .get(url)
            .bearer_auth(&self.config.api_key)
            .query(query)
            .send()
            .await
            .map_err(ProviderError::from_reqwest)?;

        Self::decode_response(response).await
    }

    /// Make an authenticated POST request with a JSON body.
    async fn post_json<T: serde::de::DeserializeOwned>(
        &self,
        url: &str,
        body: &impl Serialize,
    ) -> Result<T, ProviderError> {
        let response = self
            .client
            .post(url)
            .bearer_auth(&self.config.api_key)
            .json(body)
            .send()
            .await
            .map_err(ProviderError::from_reqwest)?;

        Self::decode_response(response).await
    }

    async fn decode_response<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, ProviderError> {
        let status = response.status();

        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(ProviderError::AuthenticationFailed(format!(
                "HTTP {}",
                status
            )));
        }
        if status == StatusCode::NOT_FOUND {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::NotFound(
                body.chars().take(200).collect::<String>(),
            ));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::ApiError(format!(
                "HTTP {}: {}",
                status,
                body.chars().take(200).collect::<String>()
            )));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| ProviderError::ParseError(e.to_string()))
    }
}

// =============================================================================
// Wire types (Nylas v3 response envelopes)
// =============================================================================

#[derive(Deserialize)]
struct Envelope<T> {
    data: T,
}

#[derive(Deserialize)]
struct NotetakerData {
    id: String,
    #[serde(default)]
    state: Option<String>,
}

#[derive(Deserialize)]
struct MediaData {
    #[serde(default)]
    transcript: Option<MediaLink>,
    #[serde(default)]
    recording: Option<MediaLink>,
}

#[derive(Deserialize)]
struct MediaLink {
    #[serde(default)]
    url: Option<String>,
}

#[derive(Deserialize)]
struct EventData {
    id: String,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    conferencing: Option<ConferencingData>,
}

#[derive(Deserialize)]
struct ConferencingData {
    #[serde(default)]
    details: Option<HashMap<String, Value>>,
}

#[derive(Serialize)]
struct InviteBody<'a> {
    meeting_link: &'a str,
    name: &'a str,
    meeting_settings: &'a MeetingSettings,
}

impl EventData {
    /// Resolve the join URL from the conferencing details, when present.
    fn join_url(&self) -> Option<String> {
        self.conferencing
            .as_ref()?
            .details
            .as_ref()?
            .get("url")?
            .as_str()
            .map(|s| s.to_string())
    }
}

#[async_trait]
impl NotetakerProvider for NylasProvider {
    fn name(&self) -> &str {
        "nylas"
    }

    async fn invite(
        &self,
        meeting_url: &str,
        settings: &MeetingSettings,
    ) -> Result<String, ProviderError> {
        let url = self.grant_url("/notetakers");
        let body = InviteBody {
            meeting_link: meeting_url,
            name: "Recording & Transcription Bot",
            meeting_settings: settings,
        };

        let envelope: Envelope<NotetakerData> = self.post_json(&url, &body).await?;
        debug!(notetaker_id = %envelope.data.id, "Notetaker invited");
        Ok(envelope.data.id)
    }

    async fn job_state(&self, job_id: &str) -> Result<NotetakerState, ProviderError> {
        let url = self.grant_url(&format!("/notetakers/{}", job_id));
        let envelope: Envelope<NotetakerData> = self.get_json(&url, &[]).await?;

        let state = envelope.data.state.ok_or_else(|| {
            ProviderError::ParseError("notetaker response missing state field".to_string())
        })?;

        Ok(NotetakerState::parse(&state))
    }

    async fn media_descriptor(&self, job_id: &str) -> Result<MediaDescriptor, ProviderError> {
        let url = self.grant_url(&format!("/notetakers/{}/media", job_id));
        let envelope: Envelope<MediaData> = self.get_json(&url, &[]).await?;

        Ok(MediaDescriptor {
            transcript_url: envelope.data.transcript.and_then(|t| t.url),
            recording_url: envelope.data.recording.and_then(|r| r.url),
        })
    }

    async fn list_events(&self, window: &TimeWindow) -> Result<Vec<CalendarEvent>, ProviderError> {
        let url = self.grant_url("/events");
        let query = [
            ("calendar_id", "primary".to_string()),
            ("start", window.start.timestamp().to_string()),
            ("end", window.end.timestamp().to_string()),
            ("expand_recurring", "true".to_string()),
        ];

        let envelope: Envelope<Vec<EventData>> = self.get_json(&url, &query).await?;

        Ok(envelope
            .data
            .into_iter()
            .map(|event| CalendarEvent {
                conferencing_url: event.join_url(),
                title: event.title.unwrap_or_default(),
                id: event.id,
            })
            .collect())
    }
}
