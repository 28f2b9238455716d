//! # media-dl
//!
//! Download job orchestrator for media URLs, driving an external extractor
//! (yt-dlp) as a child process.
//!
//! A submitted URL becomes a job: the extractor is launched immediately, its
//! output is parsed for progress, and on success the produced file is located
//! in the download directory. Jobs live in memory and are reclaimed (record and
//! file) by a retention sweeper once they exceed the configured age.
//!
//! ## Quick Start
//!
//! ```no_run
//! use media_dl::{Config, DownloadRequest, MediaDownloader};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let downloader = MediaDownloader::new(Config::default()).await?;
//!
//!     // Subscribe to events
//!     let mut events = downloader.subscribe();
//!     tokio::spawn(async move {
//!         while let Ok(event) = events.recv().await {
//!             println!("Event: {:?}", event);
//!         }
//!     });
//!
//!     let id = downloader
//!         .submit_download(DownloadRequest::video("https://example.com/watch?v=1", "best"))
//!         .await?;
//!     println!("{:?}", downloader.fetch_progress(id).await?);
//!
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]

/// REST API module
pub mod api;
/// Configuration types
pub mod config;
/// Job orchestration (decomposed into focused submodules)
pub mod downloader;
/// Error types
pub mod error;
/// Extractor metadata reduction
pub mod metadata;
/// External process execution
pub mod process;
/// Progress line parsing
pub mod progress;
/// Expired job cleanup
pub mod retention;
/// In-memory job records
pub mod store;
/// Core types and events
pub mod types;

// Re-export commonly used types
pub use config::Config;
pub use downloader::MediaDownloader;
pub use error::{ApiError, Error, ErrorDetail, JobFailure, Result, ToHttpStatus};
pub use process::{CommandRunner, ProcessEvent, ProcessHandle, ProcessRunner};
pub use retention::{RetentionSweeper, SweepReport};
pub use store::JobStore;
pub use types::{
    DownloadRequest, Event, FormatOption, Job, JobId, JobStatus, MediaInfo, MediaType,
    ProgressSnapshot,
};

/// Helper function to run the downloader with graceful signal handling.
///
/// Waits for a termination signal and then calls the downloader's `shutdown()` method.
///
/// - **Unix:** listens for SIGTERM and SIGINT, with fallbacks if signal registration fails.
/// - **Windows/other:** listens for Ctrl+C via `tokio::signal::ctrl_c()`.
///
/// # Example
///
/// ```no_run
/// use media_dl::{MediaDownloader, Config, run_with_shutdown};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let downloader = MediaDownloader::new(Config::default()).await?;
///     downloader.start_retention_sweeper();
///
///     run_with_shutdown(downloader).await?;
///
///     Ok(())
/// }
/// ```
pub async fn run_with_shutdown(downloader: MediaDownloader) -> Result<()> {
    wait_for_signal().await;
    downloader.shutdown().await
}

/// Resolve on the first SIGTERM or SIGINT
#[cfg(unix)]
async fn wait_for_signal() {
    use tokio::signal::unix::{SignalKind, signal};

    let received = match signal(SignalKind::terminate()) {
        Ok(mut sigterm) => tokio::select! {
            _ = sigterm.recv() => "SIGTERM",
            _ = tokio::signal::ctrl_c() => "SIGINT",
        },
        Err(e) => {
            tracing::warn!(error = %e, "SIGTERM handler unavailable, listening for SIGINT only");
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "SIGINT handler unavailable");
            }
            "SIGINT"
        }
    };
    tracing::info!(signal = received, "Shutdown requested");
}

#[cfg(not(unix))]
async fn wait_for_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Ctrl+C handler unavailable");
    }
    tracing::info!(signal = "ctrl-c", "Shutdown requested");
}
