//! Per-job event loop: progress, exit handling, and output discovery.

use super::MediaDownloader;
use crate::error::JobFailure;
use crate::process::{OutputStream, ProcessEvent, ProcessHandle};
use crate::progress::parse_progress;
use crate::types::{Event, JobId, JobStatus};
use std::io::ErrorKind;
use std::path::Path;

/// Suffixes of the extractor's in-flight files, never a finished artifact
const PARTIAL_SUFFIXES: [&str; 2] = [".part", ".ytdl"];

/// Find the finished artifact for `id` in `dir`
///
/// Matches regular files whose name starts with `<id>.`, skipping partial
/// downloads. When several candidates remain (e.g. a merge left its source
/// streams behind) the shortest name wins, ties broken lexicographically.
pub(crate) fn locate_output(dir: &Path, id: JobId) -> std::io::Result<Option<String>> {
    let prefix = format!("{}.", id);
    let mut best: Option<String> = None;

    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let Ok(name) = entry.file_name().into_string() else {
            continue;
        };
        if !name.starts_with(&prefix) || PARTIAL_SUFFIXES.iter().any(|s| name.ends_with(s)) {
            continue;
        }
        if !entry.file_type()?.is_file() {
            continue;
        }

        let better = match &best {
            None => true,
            Some(current) => (name.len(), &name) < (current.len(), current),
        };
        if better {
            best = Some(name);
        }
    }

    Ok(best)
}

impl MediaDownloader {
    /// Consume a job's process events until it reaches a terminal state
    pub(crate) async fn run_job(&self, id: JobId, mut handle: ProcessHandle) {
        while let Some(event) = handle.next_event().await {
            match event {
                ProcessEvent::Line { stream, line } => self.handle_output_line(id, stream, &line).await,
                ProcessEvent::FailedToStart { reason } => {
                    tracing::error!(job_id = %id, extractor = %self.extractor.display(), %reason, "Failed to launch extractor");
                    self.fail(id, JobFailure::LaunchFailed).await;
                }
                ProcessEvent::Exited { code: Some(0) } => self.finish(id).await,
                ProcessEvent::Exited { code } => {
                    tracing::warn!(job_id = %id, exit_code = ?code, "Extractor exited unsuccessfully");
                    self.fail(id, JobFailure::DownloadFailed).await;
                }
            }
        }
    }

    pub(super) async fn handle_output_line(&self, id: JobId, stream: OutputStream, line: &str) {
        if stream == OutputStream::Stderr {
            if line.contains("WARNING:") {
                tracing::warn!(job_id = %id, "extractor: {}", line);
            } else {
                tracing::debug!(job_id = %id, "extractor: {}", line);
            }
        } else {
            tracing::trace!(job_id = %id, "extractor: {}", line);
        }

        let Some(percent) = parse_progress(line) else {
            return;
        };
        let percent = percent.clamp(0.0, 100.0);

        let applied = self
            .store
            .update(id, |job| {
                if job.status == JobStatus::Downloading && percent > job.progress {
                    job.progress = percent;
                    true
                } else {
                    false
                }
            })
            .await
            .unwrap_or(false);

        if applied {
            self.event_tx.send(Event::Progress { id, percent }).ok();
        }
    }

    /// Successful exit: wait for the extractor's final rename, then find the file
    async fn finish(&self, id: JobId) {
        let advanced = self
            .store
            .update(id, |job| job.advance(JobStatus::Processing))
            .await
            .unwrap_or(false);
        if !advanced {
            tracing::debug!(job_id = %id, "Job no longer tracked, skipping output discovery");
            return;
        }
        self.event_tx.send(Event::Processing { id }).ok();

        tokio::time::sleep(self.config.download.settle_delay).await;

        let dir = self.config.download.download_dir.clone();
        let scan = tokio::task::spawn_blocking(move || locate_output(&dir, id))
            .await
            .unwrap_or_else(|e| Err(std::io::Error::other(e)));

        match scan {
            Ok(Some(name)) => self.complete(id, name).await,
            Ok(None) => {
                tracing::warn!(job_id = %id, dir = %self.config.download.download_dir.display(), "Extractor succeeded but produced no output file");
                self.fail(id, JobFailure::FileNotFound).await;
            }
            Err(e) => {
                tracing::error!(job_id = %id, error = %e, "Failed to scan download directory");
                self.fail(id, JobFailure::LocateFailed).await;
            }
        }
    }

    async fn complete(&self, id: JobId, name: String) {
        let applied = self
            .store
            .update(id, |job| {
                if job.advance(JobStatus::Completed) {
                    job.progress = 100.0;
                    job.file = Some(name.clone());
                    true
                } else {
                    false
                }
            })
            .await;

        match applied {
            Some(true) => {
                tracing::info!(job_id = %id, file = %name, "Download completed");
                self.event_tx.send(Event::Completed { id, file: name }).ok();
            }
            Some(false) => {}
            None => {
                // Record reclaimed mid-run: nothing will ever reference this file
                let path = self.config.download.download_dir.join(&name);
                match tokio::fs::remove_file(&path).await {
                    Ok(()) => tracing::info!(job_id = %id, path = %path.display(), "Removed output of reclaimed job"),
                    Err(e) if e.kind() == ErrorKind::NotFound => {}
                    Err(e) => tracing::warn!(job_id = %id, path = %path.display(), error = %e, "Failed to remove output of reclaimed job"),
                }
            }
        }
    }

    async fn fail(&self, id: JobId, failure: JobFailure) {
        let reason = failure.to_string();
        let applied = self
            .store
            .update(id, |job| {
                if job.advance(JobStatus::Error) {
                    job.error = Some(reason.clone());
                    true
                } else {
                    false
                }
            })
            .await
            .unwrap_or(false);

        if applied {
            tracing::info!(job_id = %id, error = %reason, "Download failed");
            self.event_tx.send(Event::Failed { id, error: reason }).ok();
        }
    }
}
