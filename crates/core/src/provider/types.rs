//! Types for the provider module.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle state of a notetaker job as reported by the provider.
///
/// Only the terminal-relevant states are modeled explicitly; every other
/// state the provider may report (joining, recording, processing, ...) is
/// carried as `Pending` and means "keep polling".
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotetakerState {
    /// Recording and transcript are ready to download.
    MediaAvailable,
    /// The bot never managed to join the meeting.
    FailedEntry,
    /// Media processing failed on the provider side.
    MediaError,
    /// Any intermediate state; the wire value is preserved for logging.
    Pending(String),
}

impl NotetakerState {
    /// Parse the provider's wire value.
    pub fn parse(value: &str) -> Self {
        match value {
            "media_available" => Self::MediaAvailable,
            "failed_entry" => Self::FailedEntry,
            "media_error" => Self::MediaError,
            other => Self::Pending(other.to_string()),
        }
    }

    /// Whether this state ends the poll loop with a provider-side failure.
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::FailedEntry | Self::MediaError)
    }
}

impl fmt::Display for NotetakerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MediaAvailable => write!(f, "media_available"),
            Self::FailedEntry => write!(f, "failed_entry"),
            Self::MediaError => write!(f, "media_error"),
            Self::Pending(s) => write!(f, "{}", s),
        }
    }
}

/// Recording settings passed along with an invite.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MeetingSettings {
    pub audio_recording: bool,
    pub video_recording: bool,
    pub transcription: bool,
    pub diarization: bool,
}

impl MeetingSettings {
    /// Settings used by the calendar dispatcher. Video is deliberately
    /// disabled for the automated path to control cost and bandwidth.
    pub fn automated() -> Self {
        Self {
            audio_recording: true,
            video_recording: false,
            transcription: true,
            diarization: true,
        }
    }

    /// Settings used for direct transcription requests.
    pub fn on_demand() -> Self {
        Self {
            audio_recording: true,
            video_recording: true,
            transcription: true,
            diarization: false,
        }
    }
}

/// Media download URLs for a finished notetaker job.
#[derive(Debug, Clone, Default)]
pub struct MediaDescriptor {
    pub transcript_url: Option<String>,
    pub recording_url: Option<String>,
}

/// A calendar event as returned by the provider's event listing.
#[derive(Debug, Clone)]
pub struct CalendarEvent {
    /// Provider-issued event identifier (stable across recurring expansion).
    pub id: String,
    pub title: String,
    /// Join URL from the event's conferencing details, when present.
    pub conferencing_url: Option<String>,
}

/// Half-open time window for event listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TimeWindow {
    /// Window around `now`: `lookback` seconds into the past through
    /// `lookahead` seconds into the future.
    pub fn around(now: DateTime<Utc>, lookback_secs: u64, lookahead_secs: u64) -> Self {
        Self {
            start: now - Duration::seconds(lookback_secs as i64),
            end: now + Duration::seconds(lookahead_secs as i64),
        }
    }
}
