//! In-memory job store
//!
//! The job map is the only shared mutable state in the crate. Every read and
//! write goes through [`JobStore`], which holds the lock for the duration of a
//! single operation and never across an await point, so callers cannot lose
//! updates or observe a half-applied mutation.

use crate::types::{Job, JobId};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Concurrency-safe map from job id to job record (cheap to clone)
#[derive(Clone, Debug, Default)]
pub struct JobStore {
    jobs: Arc<RwLock<HashMap<JobId, Job>>>,
}

impl JobStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a fresh record (status downloading, progress 0) and return its id
    pub async fn create(&self) -> JobId {
        let mut jobs = self.jobs.write().await;
        let mut id = JobId::new();
        while jobs.contains_key(&id) {
            id = JobId::new();
        }
        jobs.insert(id, Job::new(id));
        id
    }

    /// Snapshot of one record
    pub async fn get(&self, id: JobId) -> Option<Job> {
        self.jobs.read().await.get(&id).cloned()
    }

    /// Atomically mutate one record in place
    ///
    /// Returns `None` without calling `mutate` when the record does not exist
    /// (it may have been reclaimed while its process was still running).
    pub async fn update<F, R>(&self, id: JobId, mutate: F) -> Option<R>
    where
        F: FnOnce(&mut Job) -> R,
    {
        let mut jobs = self.jobs.write().await;
        jobs.get_mut(&id).map(mutate)
    }

    /// Remove a record, returning it if present
    pub async fn delete(&self, id: JobId) -> Option<Job> {
        self.jobs.write().await.remove(&id)
    }

    /// Snapshot of every record
    pub async fn list_all(&self) -> Vec<(JobId, Job)> {
        self.jobs
            .read()
            .await
            .iter()
            .map(|(id, job)| (*id, job.clone()))
            .collect()
    }

    /// Number of records
    pub async fn len(&self) -> usize {
        self.jobs.read().await.len()
    }

    /// Whether the store holds no records
    pub async fn is_empty(&self) -> bool {
        self.jobs.read().await.is_empty()
    }
}
