//! Progress snapshots and job listing.

use super::MediaDownloader;
use crate::error::{Error, Result};
use crate::types::{Job, JobId, ProgressSnapshot};

/// Public reference for a produced file: `<base>/files/<percent-encoded name>`
///
/// Without a base URL the reference is root-relative.
pub(crate) fn file_reference(base_url: Option<&str>, name: &str) -> String {
    let base = base_url.map(|b| b.trim_end_matches('/')).unwrap_or("");
    format!("{}/files/{}", base, urlencoding::encode(name))
}

impl MediaDownloader {
    /// Current state of one job
    ///
    /// # Errors
    ///
    /// [`Error::NotFound`] if the id was never issued or the job has been
    /// reclaimed by the retention sweeper.
    pub async fn fetch_progress(&self, id: JobId) -> Result<ProgressSnapshot> {
        let job = self
            .store
            .get(id)
            .await
            .ok_or_else(|| Error::NotFound(format!("job {}", id)))?;

        let file_url = job
            .file
            .as_deref()
            .map(|name| file_reference(self.config.api.public_base_url.as_deref(), name));

        Ok(ProgressSnapshot {
            status: job.status,
            progress: job.progress,
            file_url,
            error: job.error,
        })
    }

    /// Every tracked job, oldest first
    pub async fn list_jobs(&self) -> Vec<Job> {
        let mut jobs: Vec<Job> = self
            .store
            .list_all()
            .await
            .into_iter()
            .map(|(_, job)| job)
            .collect();
        jobs.sort_by(|a, b| a.created.cmp(&b.created).then(a.created_at.cmp(&b.created_at)));
        jobs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_without_base_is_root_relative() {
        assert_eq!(file_reference(None, "a.mp4"), "/files/a.mp4");
    }

    #[test]
    fn reference_trims_trailing_slash_from_base() {
        assert_eq!(
            file_reference(Some("https://media.example.com/"), "a.mp4"),
            "https://media.example.com/files/a.mp4"
        );
    }

    #[test]
    fn reference_percent_encodes_name() {
        assert_eq!(
            file_reference(Some("http://localhost:8080"), "my clip#1.mp4"),
            "http://localhost:8080/files/my%20clip%231.mp4"
        );
    }
}
