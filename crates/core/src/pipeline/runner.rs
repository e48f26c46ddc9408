//! Media pipeline implementation.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::blob_store::BlobStore;
use crate::provider::{NotetakerProvider, NotetakerState};
use crate::store::{ResultStore, ResultUpdate};
use crate::transform::{MediaKind, MediaTransformer};

use super::config::PipelineConfig;
use super::types::{PipelineError, PipelineJob};

/// Drives invited notetaker jobs to a stored result, one background task
/// per job.
pub struct MediaPipeline {
    config: PipelineConfig,
    provider: Arc<dyn NotetakerProvider>,
    store: Arc<dyn ResultStore>,
    blobs: Arc<dyn BlobStore>,
    transformer: Arc<dyn MediaTransformer>,
    http: reqwest::Client,
    active_jobs: RwLock<HashMap<String, JoinHandle<()>>>,
}

impl MediaPipeline {
    /// Create a new pipeline.
    pub fn new(
        config: PipelineConfig,
        provider: Arc<dyn NotetakerProvider>,
        store: Arc<dyn ResultStore>,
        blobs: Arc<dyn BlobStore>,
        transformer: Arc<dyn MediaTransformer>,
    ) -> Result<Self, PipelineError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.download_timeout_secs))
            .build()
            .map_err(|e| PipelineError::Download(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self {
            config,
            provider,
            store,
            blobs,
            transformer,
            http,
            active_jobs: RwLock::new(HashMap::new()),
        })
    }

    /// Spawn a background task tracking the job. Fire-and-forget: the
    /// task records its outcome in the result store, never to the caller.
    pub async fn spawn(self: &Arc<Self>, job: PipelineJob) {
        let pipeline = Arc::clone(self);
        let job_id = job.job_id.clone();
        let task_job_id = job_id.clone();

        // Hold the registry lock across the spawn so the task's
        // self-removal cannot run before the handle is inserted.
        let mut jobs = self.active_jobs.write().await;
        let handle = tokio::spawn(async move {
            pipeline.run(job).await;
            pipeline.active_jobs.write().await.remove(&task_job_id);
        });
        jobs.insert(job_id, handle);
    }

    /// Number of jobs currently being tracked.
    pub async fn active_count(&self) -> usize {
        self.active_jobs.read().await.len()
    }

    /// Abort all tracked jobs.
    pub async fn shutdown(&self) {
        let mut jobs = self.active_jobs.write().await;
        for (job_id, handle) in jobs.drain() {
            debug!(job_id = %job_id, "Aborting pipeline job");
            handle.abort();
        }
    }

    /// Drive one job to completion. Every failure ends with a failed
    /// result document; the poll loop itself never leaks an error.
    pub async fn run(&self, job: PipelineJob) {
        info!(job_id = %job.job_id, meet_url = %job.meet_url, "Pipeline started");

        match self.poll_to_completion(&job).await {
            Ok(()) => {
                info!(job_id = %job.job_id, "Pipeline finished");
            }
            Err(e) => {
                warn!(job_id = %job.job_id, error = %e, "Pipeline failed");

                let message = match &e {
                    PipelineError::JobFailed(state) => format!("Failed with state: {}", state),
                    _ => "An exception occurred during polling.".to_string(),
                };

                let update = ResultUpdate::failed(&job.meet_url, &message);
                if let Err(store_err) = self.store.upsert(&job.job_id, update) {
                    error!(
                        job_id = %job.job_id,
                        error = %store_err,
                        "Failed to record pipeline failure"
                    );
                }
            }
        }
    }

    async fn poll_to_completion(&self, job: &PipelineJob) -> Result<(), PipelineError> {
        let mut attempts: u32 = 0;

        loop {
            let state = self.provider.job_state(&job.job_id).await?;

            match state {
                NotetakerState::MediaAvailable => {
                    debug!(job_id = %job.job_id, "Media available");
                    return self.process_media(job).await;
                }
                NotetakerState::FailedEntry | NotetakerState::MediaError => {
                    return Err(PipelineError::JobFailed(state.to_string()));
                }
                NotetakerState::Pending(ref wire) => {
                    debug!(job_id = %job.job_id, state = %wire, "Still pending");

                    attempts += 1;
                    if let Some(max) = self.config.max_poll_attempts {
                        if attempts >= max {
                            return Err(PipelineError::PollBudgetExhausted { attempts });
                        }
                    }

                    tokio::time::sleep(Duration::from_secs(self.config.poll_interval_secs)).await;
                }
            }
        }
    }

    async fn process_media(&self, job: &PipelineJob) -> Result<(), PipelineError> {
        let descriptor = self.provider.media_descriptor(&job.job_id).await?;

        let transcript = match &descriptor.transcript_url {
            Some(url) => Some(self.download_json(url).await?),
            None => None,
        };

        // The recording is optional: a transcript-only job still completes
        // as ready, it just has no uploaded media.
        let folder_url = match descriptor.recording_url.as_deref() {
            Some(url) => Some(self.upload_recording(job, url).await?),
            None => {
                debug!(job_id = %job.job_id, "No recording attached");
                None
            }
        };

        self.store.upsert(
            &job.job_id,
            ResultUpdate::ready(&job.meet_url, transcript, folder_url.as_deref()),
        )?;

        Ok(())
    }

    /// Download the recording, transform it per its media kind, and upload
    /// the outputs. Returns the public folder URL.
    async fn upload_recording(
        &self,
        job: &PipelineJob,
        recording_url: &str,
    ) -> Result<String, PipelineError> {
        let (recording, content_type) = self.download_bytes(recording_url).await?;
        let kind = MediaKind::from_content_type(&content_type);
        let folder = format!("recordings/{}", job.job_id);

        if job.video_requested && kind == MediaKind::Video {
            let audio = self.transformer.extract_audio(&recording).await?;
            self.blobs
                .put(&format!("{}/audio.mp3", folder), &audio, "audio/mpeg")
                .await?;

            let frames = self.transformer.sample_frames(&recording).await?;
            for frame in &frames {
                self.blobs
                    .put(
                        &format!("{}/screenshot_{}s.jpg", folder, frame.timestamp_secs),
                        &frame.image,
                        "image/jpeg",
                    )
                    .await?;
            }

            info!(
                job_id = %job.job_id,
                frames = frames.len(),
                "Video recording processed"
            );
        } else {
            // Audio and unclassified recordings upload as-is.
            let content_type = if content_type.is_empty() {
                "audio/mpeg"
            } else {
                content_type.as_str()
            };
            self.blobs
                .put(&format!("{}/audio.mp3", folder), &recording, content_type)
                .await?;
        }

        Ok(self.blobs.folder_url(&folder))
    }

    async fn download_json(&self, url: &str) -> Result<Value, PipelineError> {
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| PipelineError::Download(e.to_string()))?;

        if !response.status().is_success() {
            return Err(PipelineError::Download(format!(
                "HTTP {} from {}",
                response.status(),
                url
            )));
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| PipelineError::Download(e.to_string()))
    }

    async fn download_bytes(&self, url: &str) -> Result<(Vec<u8>, String), PipelineError> {
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| PipelineError::Download(e.to_string()))?;

        if !response.status().is_success() {
            return Err(PipelineError::Download(format!(
                "HTTP {} from {}",
                response.status(),
                url
            )));
        }

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_string();

        let bytes = response
            .bytes()
            .await
            .map_err(|e| PipelineError::Download(e.to_string()))?;

        Ok((bytes.to_vec(), content_type))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::ProviderError;
    use crate::store::{JobStatus, SqliteResultStore};
    use crate::testing::{MockBlobStore, MockProvider, MockTransformer};

    fn test_pipeline(
        provider: MockProvider,
        config: PipelineConfig,
    ) -> (Arc<MediaPipeline>, Arc<SqliteResultStore>) {
        let store = Arc::new(SqliteResultStore::in_memory().unwrap());
        let pipeline = MediaPipeline::new(
            config,
            Arc::new(provider),
            store.clone(),
            Arc::new(MockBlobStore::new("http://localhost:8080/blobs")),
            Arc::new(MockTransformer::new()),
        )
        .unwrap();
        (Arc::new(pipeline), store)
    }

    fn test_job(job_id: &str) -> PipelineJob {
        PipelineJob {
            job_id: job_id.to_string(),
            meet_url: "https://meet.google.com/xyz".to_string(),
            video_requested: true,
        }
    }

    #[tokio::test]
    async fn test_failed_entry_records_failed_result() {
        let provider = MockProvider::new();
        provider.push_state(Ok(NotetakerState::FailedEntry));

        let (pipeline, store) = test_pipeline(provider, PipelineConfig::default());
        pipeline.run(test_job("job-1")).await;

        let result = store.get("job-1").unwrap().unwrap();
        assert_eq!(result.status, JobStatus::Failed);
        assert_eq!(
            result.error.as_deref(),
            Some("Failed with state: failed_entry")
        );
    }

    #[tokio::test]
    async fn test_provider_error_records_generic_failure() {
        let provider = MockProvider::new();
        provider.push_state(Err(ProviderError::Timeout));

        let (pipeline, store) = test_pipeline(provider, PipelineConfig::default());
        pipeline.run(test_job("job-2")).await;

        let result = store.get("job-2").unwrap().unwrap();
        assert_eq!(result.status, JobStatus::Failed);
        assert_eq!(
            result.error.as_deref(),
            Some("An exception occurred during polling.")
        );
    }

    #[tokio::test]
    async fn test_poll_budget_exhaustion() {
        let provider = MockProvider::new();
        provider.push_state(Ok(NotetakerState::Pending("attending".to_string())));

        let config = PipelineConfig {
            max_poll_attempts: Some(1),
            ..PipelineConfig::default()
        };
        let (pipeline, store) = test_pipeline(provider, config);
        pipeline.run(test_job("job-3")).await;

        let result = store.get("job-3").unwrap().unwrap();
        assert_eq!(result.status, JobStatus::Failed);
        assert_eq!(
            result.error.as_deref(),
            Some("An exception occurred during polling.")
        );
    }

    #[tokio::test]
    async fn test_spawn_tracks_and_cleans_up() {
        let provider = MockProvider::new();
        provider.push_state(Ok(NotetakerState::MediaError));

        let (pipeline, store) = test_pipeline(provider, PipelineConfig::default());
        pipeline.spawn(test_job("job-4")).await;

        // Wait for the background task to finish and deregister itself.
        for _ in 0..50 {
            if pipeline.active_count().await == 0 {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        assert_eq!(pipeline.active_count().await, 0);

        let result = store.get("job-4").unwrap().unwrap();
        assert_eq!(
            result.error.as_deref(),
            Some("Failed with state: media_error")
        );
    }

    #[tokio::test]
    async fn test_fast_jobs_always_deregister() {
        let provider = MockProvider::new();
        for _ in 0..8 {
            provider.push_state(Ok(NotetakerState::MediaError));
        }

        // Jobs that fail on the first poll can finish before spawn
        // returns; none of them may linger in the registry.
        let (pipeline, _store) = test_pipeline(provider, PipelineConfig::default());
        for i in 0..8 {
            pipeline.spawn(test_job(&format!("job-{}", i))).await;
        }

        for _ in 0..100 {
            if pipeline.active_count().await == 0 {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        assert_eq!(pipeline.active_count().await, 0);
    }
}
