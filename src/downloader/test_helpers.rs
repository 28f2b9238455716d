//! Shared test helpers for creating MediaDownloader instances in tests.

use crate::config::Config;
use crate::downloader::MediaDownloader;
use crate::process::scripted::{Script, ScriptedRunner};
use crate::types::{Event, Job, JobId};
use std::sync::Arc;
use std::time::Duration;
use tempfile::tempdir;

/// Settle delay used in tests (kept short so real-time tests stay fast)
pub(crate) const TEST_SETTLE_DELAY: Duration = Duration::from_millis(10);

/// Config rooted in `dir` with a short settle delay
pub(crate) fn test_config(dir: &tempfile::TempDir) -> Config {
    let mut config = Config::default();
    config.download.download_dir = dir.path().join("downloads");
    config.download.settle_delay = TEST_SETTLE_DELAY;
    config.tools.search_path = false;
    config
}

/// Helper to create a test downloader driven by a scripted runner.
/// Returns the downloader, the runner (for call inspection), and the tempdir
/// (which must be kept alive).
pub(crate) async fn create_test_downloader(
    script: Script,
) -> (MediaDownloader, Arc<ScriptedRunner>, tempfile::TempDir) {
    let temp_dir = tempdir().unwrap();
    let config = test_config(&temp_dir);
    let runner = Arc::new(ScriptedRunner::new(script));
    let downloader = MediaDownloader::with_runner(config, runner.clone())
        .await
        .unwrap();
    (downloader, runner, temp_dir)
}

/// Poll until the job is in a terminal state (real time, bounded)
pub(crate) async fn wait_for_terminal(downloader: &MediaDownloader, id: JobId) -> Job {
    let deadline = tokio::time::Instant::now() + Duration::from_secs(5);
    loop {
        let job = downloader.store.get(id).await.expect("job disappeared");
        if job.status.is_terminal() {
            return job;
        }
        assert!(
            tokio::time::Instant::now() < deadline,
            "job {} stuck in {}",
            id,
            job.status
        );
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
}

/// Wait for the next event matching `pred`, skipping others
pub(crate) async fn next_matching<F>(
    events: &mut tokio::sync::broadcast::Receiver<Event>,
    mut pred: F,
) -> Event
where
    F: FnMut(&Event) -> bool,
{
    tokio::time::timeout(Duration::from_secs(5), async {
        loop {
            let event = events.recv().await.unwrap();
            if pred(&event) {
                return event;
            }
        }
    })
    .await
    .expect("timed out waiting for event")
}

