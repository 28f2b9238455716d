//! Job orchestration split into focused submodules.
//!
//! The `MediaDownloader` struct and its methods are organized by concern:
//! - [`args`] - Extractor command-line construction
//! - [`submit`] - Request validation and job launch
//! - [`monitor`] - Per-job event loop (progress, exit, output discovery)
//! - [`query`] - Progress snapshots and job listing
//! - [`metadata`] - Media info lookup through the extractor
//! - [`lifecycle`] - Background services, API server, and shutdown

mod args;
mod lifecycle;
mod metadata;
mod monitor;
mod query;
mod submit;

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
pub(crate) mod test_helpers;
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::process::{CommandRunner, ProcessRunner};
use crate::store::JobStore;
use crate::types::Event;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::AtomicBool;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;

/// Extractor binary searched for on PATH
pub const EXTRACTOR_BINARY: &str = "yt-dlp";

/// Capacity of the lifecycle event broadcast channel
const EVENT_CHANNEL_CAPACITY: usize = 1000;

/// Shutdown coordination shared by every clone of the downloader
#[derive(Clone)]
pub(crate) struct Lifecycle {
    /// Set to false once shutdown begins; submissions are then rejected
    pub(crate) accepting_new: Arc<AtomicBool>,
    /// Tracks in-flight job tasks so shutdown can wait for them
    pub(crate) jobs: TaskTracker,
    /// Cancels background services (retention sweeper)
    pub(crate) services: CancellationToken,
}

/// Main downloader instance (cloneable - all fields are shared handles)
#[derive(Clone)]
pub struct MediaDownloader {
    /// Job records
    pub(crate) store: JobStore,
    /// Configuration
    pub(crate) config: Arc<Config>,
    /// Resolved extractor executable
    pub(crate) extractor: Arc<PathBuf>,
    /// Launches extractor processes
    pub(crate) runner: Arc<dyn ProcessRunner>,
    /// Event broadcast channel sender (multiple subscribers supported)
    pub(crate) event_tx: tokio::sync::broadcast::Sender<Event>,
    /// Shutdown coordination
    pub(crate) lifecycle: Lifecycle,
}

impl MediaDownloader {
    /// Create a downloader that runs the real extractor
    ///
    /// Validates the configuration, creates the download directory, and
    /// resolves the extractor binary. A missing extractor is not fatal here:
    /// jobs will fail individually with "process launch failed".
    pub async fn new(config: Config) -> Result<Self> {
        Self::with_runner(config, Arc::new(CommandRunner::new())).await
    }

    /// Create a downloader with a custom process runner
    pub async fn with_runner(config: Config, runner: Arc<dyn ProcessRunner>) -> Result<Self> {
        config.validate()?;

        tokio::fs::create_dir_all(&config.download.download_dir)
            .await
            .map_err(|e| {
                Error::Io(std::io::Error::new(
                    e.kind(),
                    format!(
                        "Failed to create download directory '{}': {}",
                        config.download.download_dir.display(),
                        e
                    ),
                ))
            })?;

        let extractor = resolve_extractor(&config);
        tracing::info!(
            extractor = %extractor.display(),
            runner = runner.name(),
            download_dir = %config.download.download_dir.display(),
            "Media downloader initialized"
        );

        let (event_tx, _rx) = tokio::sync::broadcast::channel(EVENT_CHANNEL_CAPACITY);

        Ok(Self {
            store: JobStore::new(),
            config: Arc::new(config),
            extractor: Arc::new(extractor),
            runner,
            event_tx,
            lifecycle: Lifecycle {
                accepting_new: Arc::new(AtomicBool::new(true)),
                jobs: TaskTracker::new(),
                services: CancellationToken::new(),
            },
        })
    }

    /// Subscribe to job lifecycle events
    ///
    /// Each subscriber receives every event emitted after it subscribed.
    pub fn subscribe(&self) -> tokio::sync::broadcast::Receiver<Event> {
        self.event_tx.subscribe()
    }

    /// Get the current configuration
    pub fn get_config(&self) -> Arc<Config> {
        self.config.clone()
    }

    /// Handle to the job store
    pub fn store(&self) -> &JobStore {
        &self.store
    }

    /// Path of the extractor executable in use
    pub fn extractor_path(&self) -> &std::path::Path {
        &self.extractor
    }
}

/// Pick the extractor: explicit config path, then PATH lookup, then the bare name
fn resolve_extractor(config: &Config) -> PathBuf {
    if let Some(path) = &config.tools.extractor_path {
        return path.clone();
    }
    if config.tools.search_path {
        match which::which(EXTRACTOR_BINARY) {
            Ok(path) => return path,
            Err(e) => {
                tracing::warn!(binary = EXTRACTOR_BINARY, error = %e, "Extractor not found in PATH, downloads will fail to launch");
            }
        }
    }
    PathBuf::from(EXTRACTOR_BINARY)
}
