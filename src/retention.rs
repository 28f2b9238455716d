//! Retention sweeper
//!
//! Periodically removes jobs older than the retention window, deleting the
//! backing file before the record. Runs independently of request traffic and
//! survives per-record failures: a record whose file cannot be deleted is
//! logged and left for the next sweep.

use crate::store::JobStore;
use crate::types::{Event, Job, JobId};
use std::io::ErrorKind;
use std::path::PathBuf;
use std::time::Duration;
use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Outcome of one sweep
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SweepReport {
    /// Records looked at
    pub examined: usize,
    /// Records removed
    pub removed: usize,
    /// Expired records kept because cleanup failed
    pub failed: usize,
}

/// Removes expired jobs and their files
#[derive(Clone)]
pub struct RetentionSweeper {
    store: JobStore,
    download_dir: PathBuf,
    max_age: Duration,
    interval: Duration,
    event_tx: broadcast::Sender<Event>,
}

impl RetentionSweeper {
    /// Create a sweeper over `store`, deleting files under `download_dir`
    pub fn new(
        store: JobStore,
        download_dir: PathBuf,
        max_age: Duration,
        interval: Duration,
        event_tx: broadcast::Sender<Event>,
    ) -> Self {
        Self {
            store,
            download_dir,
            max_age,
            interval,
            event_tx,
        }
    }

    /// Run one pass over all records
    pub async fn sweep_once(&self) -> SweepReport {
        let jobs = self.store.list_all().await;
        let mut report = SweepReport {
            examined: jobs.len(),
            ..Default::default()
        };

        for (id, job) in jobs {
            if job.age() <= self.max_age {
                continue;
            }
            match self.reclaim(id, &job).await {
                Ok(()) => report.removed += 1,
                Err(e) => {
                    report.failed += 1;
                    warn!(job_id = %id, file = ?job.file, error = %e, "Failed to reclaim expired job, retrying next sweep");
                }
            }
        }

        if report.removed > 0 || report.failed > 0 {
            info!(
                examined = report.examined,
                removed = report.removed,
                failed = report.failed,
                "Retention sweep finished"
            );
        } else {
            debug!(examined = report.examined, "Retention sweep found nothing to remove");
        }

        report
    }

    /// Delete the job's file (if any), then its record
    async fn reclaim(&self, id: JobId, job: &Job) -> std::io::Result<()> {
        if let Some(name) = &job.file {
            let path = self.download_dir.join(name);
            match tokio::fs::remove_file(&path).await {
                Ok(()) => debug!(job_id = %id, path = %path.display(), "Deleted expired file"),
                Err(e) if e.kind() == ErrorKind::NotFound => {
                    debug!(job_id = %id, path = %path.display(), "Expired file already gone")
                }
                Err(e) => return Err(e),
            }
        }

        if self.store.delete(id).await.is_some() {
            self.event_tx.send(Event::Removed { id }).ok();
        }
        Ok(())
    }

    /// Run sweeps every `interval` until `cancel` fires
    ///
    /// The first sweep happens one interval after start.
    pub fn spawn(self, cancel: CancellationToken) -> tokio::task::JoinHandle<()> {
        tokio::spawn(async move {
            let start = tokio::time::Instant::now() + self.interval;
            let mut interval = tokio::time::interval_at(start, self.interval);
            interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

            info!(
                max_age_secs = self.max_age.as_secs(),
                interval_secs = self.interval.as_secs(),
                "Retention sweeper started"
            );

            loop {
                tokio::select! {
                    _ = interval.tick() => {
                        self.sweep_once().await;
                    }
                    _ = cancel.cancelled() => {
                        info!("Retention sweeper stopped");
                        break;
                    }
                }
            }
        })
    }
}
