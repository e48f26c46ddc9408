//! Calendar dispatcher implementation.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use crate::pipeline::{MediaPipeline, PipelineJob};
use crate::provider::{MeetingSettings, NotetakerProvider, TimeWindow};
use crate::store::ResultStore;

use super::config::DispatcherConfig;
use super::types::{DispatcherError, DispatcherStatus};

/// The calendar dispatcher - scans upcoming events and invites bots.
pub struct CalendarDispatcher {
    config: DispatcherConfig,
    provider: Arc<dyn NotetakerProvider>,
    store: Arc<dyn ResultStore>,
    pipeline: Arc<MediaPipeline>,

    running: Arc<AtomicBool>,
    shutdown_tx: broadcast::Sender<()>,
}

impl CalendarDispatcher {
    /// Create a new dispatcher.
    pub fn new(
        config: DispatcherConfig,
        provider: Arc<dyn NotetakerProvider>,
        store: Arc<dyn ResultStore>,
        pipeline: Arc<MediaPipeline>,
    ) -> Self {
        let (shutdown_tx, _) = broadcast::channel(1);

        Self {
            config,
            provider,
            store,
            pipeline,
            running: Arc::new(AtomicBool::new(false)),
            shutdown_tx,
        }
    }

    /// Start the dispatcher (spawns the scan loop).
    pub fn start(self: &Arc<Self>) {
        if self.running.swap(true, Ordering::SeqCst) {
            warn!("Dispatcher already running");
            return;
        }

        info!(
            interval_secs = self.config.interval_secs,
            "Starting calendar dispatcher"
        );

        let dispatcher = Arc::clone(self);
        let mut shutdown_rx = self.shutdown_tx.subscribe();

        tokio::spawn(async move {
            info!("Dispatch loop started");
            // Scan first, sleep after: a meeting that started just before
            // boot would age out of the lookback window otherwise.
            loop {
                if !dispatcher.running.load(Ordering::Relaxed) {
                    break;
                }
                match dispatcher.run_scan().await {
                    Ok(count) if count > 0 => {
                        info!(dispatched = count, "Calendar scan dispatched bots");
                    }
                    Ok(_) => {}
                    Err(e) => {
                        warn!(error = %e, "Calendar scan failed");
                    }
                }

                tokio::select! {
                    _ = shutdown_rx.recv() => {
                        info!("Dispatch loop received shutdown signal");
                        break;
                    }
                    _ = tokio::time::sleep(Duration::from_secs(dispatcher.config.interval_secs)) => {}
                }
            }
            info!("Dispatch loop stopped");
        });
    }

    /// Stop the dispatcher gracefully.
    pub fn stop(&self) {
        if !self.running.swap(false, Ordering::SeqCst) {
            warn!("Dispatcher not running");
            return;
        }

        let _ = self.shutdown_tx.send(());
        info!("Calendar dispatcher stopped");
    }

    /// Get current dispatcher status.
    pub async fn status(&self) -> DispatcherStatus {
        DispatcherStatus {
            running: self.running.load(Ordering::Relaxed),
            active_pipelines: self.pipeline.active_count().await,
        }
    }

    /// Run one calendar scan: list events around now, invite a bot into
    /// every not-yet-dispatched event with a conferencing URL. Returns
    /// the number of bots dispatched.
    pub async fn run_scan(&self) -> Result<u32, DispatcherError> {
        let window = TimeWindow::around(
            Utc::now(),
            self.config.lookback_secs,
            self.config.lookahead_secs,
        );
        let events = self.provider.list_events(&window).await?;
        debug!(events = events.len(), "Calendar scan");

        let mut dispatched = 0;
        for event in events {
            let Some(meeting_url) = event.conferencing_url.as_deref() else {
                debug!(event_id = %event.id, "Event has no conferencing URL, skipping");
                continue;
            };

            if self.store.has_dispatch(&event.id)? {
                continue;
            }

            // The dispatch record is only written after a successful
            // invite, so a failed event is retried on the next scan.
            match self
                .provider
                .invite(meeting_url, &MeetingSettings::automated())
                .await
            {
                Ok(job_id) => {
                    if let Err(e) = self.store.record_dispatch(&event.id, &job_id, Utc::now()) {
                        warn!(
                            event_id = %event.id,
                            job_id = %job_id,
                            error = %e,
                            "Failed to record dispatch"
                        );
                        continue;
                    }

                    info!(
                        event_id = %event.id,
                        title = %event.title,
                        job_id = %job_id,
                        "Notetaker dispatched"
                    );

                    self.pipeline
                        .spawn(PipelineJob {
                            job_id,
                            meet_url: meeting_url.to_string(),
                            video_requested: false,
                        })
                        .await;
                    dispatched += 1;
                }
                Err(e) => {
                    warn!(
                        event_id = %event.id,
                        error = %e,
                        "Failed to invite notetaker"
                    );
                }
            }
        }

        Ok(dispatched)
    }
}
