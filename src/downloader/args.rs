//! Extractor command-line construction.

use crate::config::Config;
use crate::types::{JobId, MediaType};

/// Audio container used when an audio job names none
pub(crate) const DEFAULT_AUDIO_FORMAT: &str = "mp3";

/// Container merged video downloads are forced into
const MERGE_FORMAT: &str = "mp4";

/// Audio-only fallback appended to single-stream video selectors
const AUDIO_FALLBACK: &str = "+bestaudio/best";

/// Validated, normalized download parameters
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct DownloadPlan {
    pub(crate) url: String,
    pub(crate) format: String,
    pub(crate) media_type: MediaType,
    pub(crate) audio_format: String,
}

/// Video selector actually passed to the extractor
///
/// Selectors that already combine streams (`+`, `/`) or ask for "best" are
/// passed through. Anything else names a single stream, which may be
/// video-only, so best audio is merged in with a fallback to the best single
/// file.
pub(crate) fn effective_video_selector(selector: &str) -> String {
    if selector == "best" || selector.contains('+') || selector.contains('/') {
        selector.to_string()
    } else {
        format!("{}{}", selector, AUDIO_FALLBACK)
    }
}

/// Output template: `<download_dir>/<job id>.%(ext)s`
///
/// The extractor picks the final extension, so the file is found later by
/// scanning for the id prefix.
pub(crate) fn output_template(id: JobId, config: &Config) -> String {
    config
        .download
        .download_dir
        .join(format!("{}.%(ext)s", id))
        .to_string_lossy()
        .into_owned()
}

/// Full argument list for a download job
pub(crate) fn build_download_args(id: JobId, plan: &DownloadPlan, config: &Config) -> Vec<String> {
    let mut args: Vec<String> = Vec::with_capacity(16 + config.tools.extra_args.len());

    match plan.media_type {
        MediaType::Audio => {
            args.extend([
                "-f".to_string(),
                plan.format.clone(),
                "-x".to_string(),
                "--audio-format".to_string(),
                plan.audio_format.clone(),
                "--audio-quality".to_string(),
                "0".to_string(),
            ]);
        }
        MediaType::Video => {
            args.extend([
                "-f".to_string(),
                effective_video_selector(&plan.format),
                "--merge-output-format".to_string(),
                MERGE_FORMAT.to_string(),
            ]);
        }
    }

    args.extend([
        "--newline".to_string(),
        "--no-playlist".to_string(),
        "-o".to_string(),
        output_template(id, config),
    ]);
    args.extend(config.tools.extra_args.iter().cloned());
    args.push("--".to_string());
    args.push(plan.url.clone());

    args
}
