//! Mock notetaker provider for testing.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::provider::{
    CalendarEvent, MediaDescriptor, MeetingSettings, NotetakerProvider, NotetakerState,
    ProviderError, TimeWindow,
};

/// Mock implementation of the NotetakerProvider trait.
///
/// Scripted behavior for testing:
/// - Queue up state poll responses (each consumed by one `job_state` call)
/// - Queue up invite results, record every invite for assertions
/// - Set the events returned by calendar listing
#[derive(Default)]
pub struct MockProvider {
    states: Mutex<VecDeque<Result<NotetakerState, ProviderError>>>,
    invite_results: Mutex<VecDeque<Result<String, ProviderError>>>,
    invites: Mutex<Vec<(String, MeetingSettings)>>,
    invite_counter: Mutex<u32>,
    media: Mutex<Option<MediaDescriptor>>,
    events: Mutex<Vec<CalendarEvent>>,
    list_errors: Mutex<VecDeque<ProviderError>>,
}

impl MockProvider {
    /// Create a new mock provider.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue the response for the next `job_state` call.
    pub fn push_state(&self, state: Result<NotetakerState, ProviderError>) {
        self.states.lock().unwrap().push_back(state);
    }

    /// Queue the result for the next `invite` call. When the queue is
    /// empty, invites succeed with generated job ids.
    pub fn push_invite(&self, result: Result<String, ProviderError>) {
        self.invite_results.lock().unwrap().push_back(result);
    }

    /// Set the media descriptor returned for finished jobs.
    pub fn set_media(&self, descriptor: MediaDescriptor) {
        *self.media.lock().unwrap() = Some(descriptor);
    }

    /// Set the events returned by calendar listing.
    pub fn set_events(&self, events: Vec<CalendarEvent>) {
        *self.events.lock().unwrap() = events;
    }

    /// Queue an error for the next `list_events` call.
    pub fn push_list_error(&self, error: ProviderError) {
        self.list_errors.lock().unwrap().push_back(error);
    }

    /// All recorded invites as (meeting_url, settings) pairs.
    pub fn invites(&self) -> Vec<(String, MeetingSettings)> {
        self.invites.lock().unwrap().clone()
    }
}

#[async_trait]
impl NotetakerProvider for MockProvider {
    fn name(&self) -> &str {
        "mock"
    }

    async fn invite(
        &self,
        meeting_url: &str,
        settings: &MeetingSettings,
    ) -> Result<String, ProviderError> {
        self.invites
            .lock()
            .unwrap()
            .push((meeting_url.to_string(), settings.clone()));

        if let Some(result) = self.invite_results.lock().unwrap().pop_front() {
            return result;
        }

        let mut counter = self.invite_counter.lock().unwrap();
        *counter += 1;
        Ok(format!("mock-job-{}", counter))
    }

    async fn job_state(&self, job_id: &str) -> Result<NotetakerState, ProviderError> {
        self.states
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(ProviderError::NotFound(job_id.to_string())))
    }

    async fn media_descriptor(&self, _job_id: &str) -> Result<MediaDescriptor, ProviderError> {
        Ok(self.media.lock().unwrap().clone().unwrap_or_default())
    }

    async fn list_events(
        &self,
        _window: &TimeWindow,
    ) -> Result<Vec<CalendarEvent>, ProviderError> {
        if let Some(error) = self.list_errors.lock().unwrap().pop_front() {
            return Err(error);
        }
        Ok(self.events.lock().unwrap().clone())
    }
}
