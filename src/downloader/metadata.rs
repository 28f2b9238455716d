//! Media info lookup through the extractor.

use super::MediaDownloader;
use super::submit::validate_url;
use crate::error::{Error, Result};
use crate::metadata::parse_media_info;
use crate::process::ProcessEvent;
use crate::types::MediaInfo;

impl MediaDownloader {
    /// Describe the media at `url` without downloading it
    ///
    /// Runs the extractor in metadata mode and reduces its JSON dump to a
    /// title, thumbnail, duration, platform, and a short list of offered
    /// format tiers. No job is created.
    ///
    /// # Errors
    ///
    /// - [`Error::Validation`] for a malformed URL
    /// - [`Error::ExternalTool`] if the extractor cannot start or exits non-zero
    /// - [`Error::Metadata`] if its output is not usable metadata
    pub async fn fetch_media_info(&self, url: &str) -> Result<MediaInfo> {
        let url = validate_url(url)?;
        let args = vec![
            "--dump-single-json".to_string(),
            "--no-playlist".to_string(),
            "--no-warnings".to_string(),
            "--".to_string(),
            url.clone(),
        ];

        tracing::debug!(%url, "Fetching media info");
        let (lines, terminal) = self.runner.run(&self.extractor, &args).collect_stdout().await;

        match terminal {
            ProcessEvent::Exited { code: Some(0) } => {}
            ProcessEvent::FailedToStart { reason } => {
                return Err(Error::ExternalTool(format!(
                    "failed to launch {}: {}",
                    self.extractor.display(),
                    reason
                )));
            }
            ProcessEvent::Exited { code } => {
                return Err(Error::ExternalTool(match code {
                    Some(code) => format!("extractor exited with code {} for {}", code, url),
                    None => format!("extractor was terminated while reading {}", url),
                }));
            }
            ProcessEvent::Line { .. } => {
                return Err(Error::ExternalTool("extractor output ended unexpectedly".into()));
            }
        }

        let info = parse_media_info(&lines.join("\n"))?;
        tracing::info!(%url, title = %info.title, formats = info.formats.len(), "Fetched media info");
        Ok(info)
    }
}
