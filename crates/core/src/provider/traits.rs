//! Trait definitions for the provider module.

use async_trait::async_trait;

use super::error::ProviderError;
use super::types::{
    CalendarEvent, MediaDescriptor, MeetingSettings, NotetakerState, TimeWindow,
};

/// A client for the remote meeting-bot scheduling/recording service.
#[async_trait]
pub trait NotetakerProvider: Send + Sync {
    /// Returns the name of this provider implementation.
    fn name(&self) -> &str;

    /// Invites a bot into the meeting and returns the provider-issued job id.
    async fn invite(
        &self,
        meeting_url: &str,
        settings: &MeetingSettings,
    ) -> Result<String, ProviderError>;

    /// Queries the current lifecycle state of a notetaker job.
    async fn job_state(&self, job_id: &str) -> Result<NotetakerState, ProviderError>;

    /// Fetches the media download URLs for a finished job.
    async fn media_descriptor(&self, job_id: &str) -> Result<MediaDescriptor, ProviderError>;

    /// Lists calendar events overlapping the window, with recurring
    /// events expanded into individual instances.
    async fn list_events(&self, window: &TimeWindow) -> Result<Vec<CalendarEvent>, ProviderError>;
}
