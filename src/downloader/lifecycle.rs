//! Background services, API server, and shutdown coordination.

use crate::error::Result;
use crate::retention::RetentionSweeper;
use crate::types::Event;
use std::sync::Arc;
use std::sync::atomic::Ordering;
use std::time::Duration;

use super::MediaDownloader;

/// How long shutdown waits for in-flight jobs
const SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(30);

impl MediaDownloader {
    /// Start the retention sweeper background task
    ///
    /// The task stops when [`shutdown`](Self::shutdown) is called.
    pub fn start_retention_sweeper(&self) -> tokio::task::JoinHandle<()> {
        let sweeper = RetentionSweeper::new(
            self.store.clone(),
            self.config.download.download_dir.clone(),
            self.config.retention.max_age,
            self.config.retention.sweep_interval,
            self.event_tx.clone(),
        );
        sweeper.spawn(self.lifecycle.services.child_token())
    }

    /// Spawn the API server in a background task
    ///
    /// # Errors
    ///
    /// The returned handle resolves to an error if the server fails to bind or
    /// stops unexpectedly.
    pub fn spawn_api_server(self: &Arc<Self>) -> tokio::task::JoinHandle<Result<()>> {
        let downloader = self.clone();
        let config = self.config.clone();

        tokio::spawn(async move { crate::api::start_api_server(downloader, config).await })
    }

    /// Whether new submissions are still accepted
    pub fn is_accepting(&self) -> bool {
        self.lifecycle.accepting_new.load(Ordering::SeqCst)
    }

    /// Gracefully shut down the downloader
    ///
    /// 1. Stops accepting new submissions
    /// 2. Stops background services
    /// 3. Waits (up to 30 seconds) for in-flight jobs to reach a terminal state
    /// 4. Emits [`Event::Shutdown`]
    ///
    /// Jobs still running after the timeout are abandoned; their extractor
    /// processes are not killed.
    pub async fn shutdown(&self) -> Result<()> {
        tracing::info!("Initiating graceful shutdown");

        self.lifecycle.accepting_new.store(false, Ordering::SeqCst);
        tracing::info!("Stopped accepting new downloads");

        self.lifecycle.services.cancel();

        self.lifecycle.jobs.close();
        let in_flight = self.lifecycle.jobs.len();
        if in_flight > 0 {
            tracing::info!(in_flight, "Waiting for active downloads to finish");
        }

        match tokio::time::timeout(SHUTDOWN_TIMEOUT, self.lifecycle.jobs.wait()).await {
            Ok(()) => tracing::info!("All active downloads finished"),
            Err(_) => tracing::warn!(
                remaining = self.lifecycle.jobs.len(),
                "Timeout waiting for downloads to finish, proceeding with shutdown"
            ),
        }

        self.event_tx.send(Event::Shutdown).ok();
        tracing::info!("Shutdown complete");

        Ok(())
    }
}
