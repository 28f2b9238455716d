//! Request validation and job launch.

use super::MediaDownloader;
use super::args::{DEFAULT_AUDIO_FORMAT, DownloadPlan, build_download_args};
use crate::error::{Error, Result};
use crate::types::{DownloadRequest, Event, JobId};
use std::sync::atomic::Ordering;

/// Audio containers the extractor can convert to
const AUDIO_FORMATS: [&str; 8] = ["mp3", "m4a", "aac", "opus", "vorbis", "flac", "wav", "alac"];

/// Check that `url` is an absolute http(s) URL with a host
pub(crate) fn validate_url(url: &str) -> Result<String> {
    let trimmed = url.trim();
    let parsed = url::Url::parse(trimmed)
        .map_err(|e| Error::validation("url", format!("invalid URL '{}': {}", trimmed, e)))?;

    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(Error::validation(
            "url",
            format!("unsupported URL scheme '{}', expected http or https", parsed.scheme()),
        ));
    }
    if parsed.host_str().is_none_or(str::is_empty) {
        return Err(Error::validation("url", "URL has no host"));
    }

    Ok(trimmed.to_string())
}

/// Validate a request and fill in defaults
pub(crate) fn validate_request(request: DownloadRequest) -> Result<DownloadPlan> {
    let url = validate_url(&request.url)?;

    let format = request.format.trim();
    if format.is_empty() {
        return Err(Error::validation("format", "format selector must not be empty"));
    }

    let audio_format = match request.audio_format.as_deref().map(str::trim) {
        None | Some("") => DEFAULT_AUDIO_FORMAT.to_string(),
        Some(hint) => {
            let hint = hint.to_ascii_lowercase();
            if !AUDIO_FORMATS.contains(&hint.as_str()) {
                return Err(Error::validation(
                    "audio_format",
                    format!(
                        "unsupported audio format '{}', expected one of {}",
                        hint,
                        AUDIO_FORMATS.join(", ")
                    ),
                ));
            }
            hint
        }
    };

    Ok(DownloadPlan {
        url,
        format: format.to_string(),
        media_type: request.media_type.unwrap_or_default(),
        audio_format,
    })
}

impl MediaDownloader {
    /// Start a download job
    ///
    /// Returns as soon as the extractor launch has been requested. The job is
    /// immediately queryable in the downloading state; launch, exit, and
    /// output-discovery failures are recorded on the job rather than returned
    /// here.
    ///
    /// # Errors
    ///
    /// - [`Error::Validation`] for a malformed request (no job is created)
    /// - [`Error::ShuttingDown`] once [`shutdown`](Self::shutdown) has begun
    pub async fn submit_download(&self, request: DownloadRequest) -> Result<JobId> {
        if !self.lifecycle.accepting_new.load(Ordering::SeqCst) {
            return Err(Error::ShuttingDown);
        }

        let plan = validate_request(request)?;
        let id = self.store.create().await;
        let args = build_download_args(id, &plan, &self.config);

        tracing::info!(
            job_id = %id,
            url = %plan.url,
            format = %plan.format,
            media_type = ?plan.media_type,
            "Download job created"
        );
        tracing::debug!(job_id = %id, ?args, "Extractor arguments");

        self.event_tx
            .send(Event::Created {
                id,
                url: plan.url.clone(),
            })
            .ok();

        let handle = self.runner.run(&self.extractor, &args);
        let downloader = self.clone();
        self.lifecycle
            .jobs
            .spawn(async move { downloader.run_job(id, handle).await });

        Ok(id)
    }
}
