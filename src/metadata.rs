//! Extractor metadata parsing and quality tier selection
//!
//! The extractor's `--dump-single-json` output is large and loosely typed;
//! only the handful of fields needed to describe the media and decide which
//! quality tiers to offer are read here.

use crate::error::{Error, Result};
use crate::types::{FormatOption, MediaInfo};
use serde::Deserialize;

/// Nominal heights of the video tiers offered, best first
const VIDEO_TIERS: [u32; 6] = [2160, 1440, 1080, 720, 480, 360];

/// Subset of the extractor's JSON dump
#[derive(Debug, Deserialize)]
struct RawMetadata {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    thumbnail: Option<String>,
    #[serde(default)]
    duration: Option<f64>,
    #[serde(default)]
    extractor_key: Option<String>,
    #[serde(default)]
    extractor: Option<String>,
    #[serde(default)]
    formats: Vec<RawStream>,
}

/// One available stream
#[derive(Debug, Deserialize)]
struct RawStream {
    #[serde(default)]
    height: Option<u32>,
    #[serde(default)]
    vcodec: Option<String>,
}

impl RawStream {
    fn has_video(&self) -> bool {
        self.vcodec.as_deref() != Some("none")
    }
}

/// Parse the extractor's JSON dump into [`MediaInfo`]
pub fn parse_media_info(json: &str) -> Result<MediaInfo> {
    let raw: RawMetadata = serde_json::from_str(json)
        .map_err(|e| Error::Metadata(format!("extractor output is not valid metadata: {}", e)))?;

    let max_height = raw
        .formats
        .iter()
        .filter(|s| s.has_video())
        .filter_map(|s| s.height)
        .max();

    Ok(MediaInfo {
        title: raw.title.unwrap_or_else(|| "Untitled".to_string()),
        thumbnail: raw.thumbnail,
        duration: raw.duration,
        platform: raw.extractor_key.or(raw.extractor),
        formats: offered_formats(max_height),
    })
}

/// Quality tiers to offer given the tallest available video stream
///
/// A tier is offered when some stream's height meets or exceeds its nominal
/// height. Audio-only is always offered; "best" stands in when no video tier
/// qualifies (unknown heights or audio-only sources).
pub fn offered_formats(max_height: Option<u32>) -> Vec<FormatOption> {
    let mut formats: Vec<FormatOption> = VIDEO_TIERS
        .iter()
        .filter(|&&tier| max_height.is_some_and(|h| h >= tier))
        .map(|&tier| video_tier(tier))
        .collect();

    if formats.is_empty() {
        formats.push(FormatOption {
            id: "best".to_string(),
            label: "Best available".to_string(),
            ext: "mp4".to_string(),
            has_video: true,
            has_audio: true,
            resolution: None,
        });
    }

    formats.push(FormatOption {
        id: "bestaudio/best".to_string(),
        label: "Audio (MP3)".to_string(),
        ext: "mp3".to_string(),
        has_video: false,
        has_audio: true,
        resolution: None,
    });

    formats
}

fn video_tier(height: u32) -> FormatOption {
    FormatOption {
        id: format!(
            "bestvideo[height<={h}]+bestaudio/best[height<={h}]",
            h = height
        ),
        label: format!("{}p", height),
        ext: "mp4".to_string(),
        has_video: true,
        has_audio: true,
        resolution: Some(format!("{}p", height)),
    }
}
