//! Core types for media-dl

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::time::Instant;
use utoipa::ToSchema;
use uuid::Uuid;

/// Unique identifier for a download job
///
/// The hyphenated string form doubles as the output filename prefix, so it
/// must never be a prefix of another job's id.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
pub struct JobId(pub Uuid);

impl JobId {
    /// Generate a fresh random id
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for JobId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for JobId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.hyphenated())
    }
}

impl std::str::FromStr for JobId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// Job status
///
/// Variants are declared in lifecycle order; a job only ever moves to a
/// later variant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    /// Accepted but not started (reserved, never set by the orchestrator)
    Pending,
    /// Extractor process running
    Downloading,
    /// Process exited successfully, locating the output file
    Processing,
    /// Output file available
    Completed,
    /// Failed with error
    Error,
}

impl JobStatus {
    /// Whether the job has reached a final state
    pub fn is_terminal(self) -> bool {
        matches!(self, JobStatus::Completed | JobStatus::Error)
    }

    /// Whether moving from `self` to `next` respects forward-only ordering
    pub fn can_advance_to(self, next: JobStatus) -> bool {
        !self.is_terminal() && next > self
    }

    /// Lowercase name as used on the wire
    pub fn as_str(self) -> &'static str {
        match self {
            JobStatus::Pending => "pending",
            JobStatus::Downloading => "downloading",
            JobStatus::Processing => "processing",
            JobStatus::Completed => "completed",
            JobStatus::Error => "error",
        }
    }
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One tracked download attempt
#[derive(Clone, Debug, Serialize, ToSchema)]
pub struct Job {
    /// Job ID
    pub id: JobId,
    /// Current lifecycle status
    pub status: JobStatus,
    /// Completion percentage (0.0 to 100.0)
    pub progress: f32,
    /// Filename of the produced artifact, set only when completed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
    /// Failure reason, set only when status is error
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// When the job was created
    pub created_at: DateTime<Utc>,
    /// Monotonic creation instant, used for retention expiry
    #[serde(skip)]
    pub(crate) created: Instant,
}

impl Job {
    /// Fresh record in the downloading state
    pub fn new(id: JobId) -> Self {
        Self {
            id,
            status: JobStatus::Downloading,
            progress: 0.0,
            file: None,
            error: None,
            created_at: Utc::now(),
            created: Instant::now(),
        }
    }

    /// Time since the job was created
    pub fn age(&self) -> std::time::Duration {
        self.created.elapsed()
    }

    /// Move to `next` if the transition is forward, returning whether it applied
    pub(crate) fn advance(&mut self, next: JobStatus) -> bool {
        if self.status.can_advance_to(next) {
            self.status = next;
            true
        } else {
            false
        }
    }
}

/// Requested media kind
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    /// Video with audio merged in
    #[default]
    Video,
    /// Audio only, converted to the requested container
    Audio,
}

/// Parameters for a new download
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct DownloadRequest {
    /// Media page URL (http or https)
    pub url: String,
    /// Extractor format selector (e.g. "137", "bestvideo+bestaudio", "best")
    pub format: String,
    /// Media kind; video when omitted
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub media_type: Option<MediaType>,
    /// Audio container for audio jobs (default: mp3)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio_format: Option<String>,
}

impl DownloadRequest {
    /// Video request with the given selector
    pub fn video(url: impl Into<String>, format: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            format: format.into(),
            media_type: Some(MediaType::Video),
            audio_format: None,
        }
    }

    /// Audio request with the given selector and optional container
    pub fn audio(
        url: impl Into<String>,
        format: impl Into<String>,
        audio_format: Option<String>,
    ) -> Self {
        Self {
            url: url.into(),
            format: format.into(),
            media_type: Some(MediaType::Audio),
            audio_format,
        }
    }
}

/// Read-only projection of a job for progress polling
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ProgressSnapshot {
    /// Current status
    pub status: JobStatus,
    /// Completion percentage (100 once completed)
    pub progress: f32,
    /// Retrieval reference for the finished file
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_url: Option<String>,
    /// Failure reason
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// A selectable quality tier offered for a media URL
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct FormatOption {
    /// Selector to pass back as `format` when submitting
    pub id: String,
    /// Human label ("1080p", "Audio (MP3)")
    pub label: String,
    /// Container extension of the produced file
    pub ext: String,
    /// Whether the tier carries video
    pub has_video: bool,
    /// Whether the tier carries audio
    pub has_audio: bool,
    /// Nominal resolution tag, absent for audio-only tiers
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolution: Option<String>,
}

/// Metadata about a media URL as reported by the extractor
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct MediaInfo {
    /// Title
    pub title: String,
    /// Thumbnail URL
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
    /// Duration in seconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,
    /// Extractor/platform name (e.g. "Youtube")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub platform: Option<String>,
    /// Offered quality tiers, best first
    pub formats: Vec<FormatOption>,
}

/// Event emitted during a job's lifecycle
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    /// Job accepted and extractor launch requested
    Created {
        /// Job ID
        id: JobId,
        /// Source URL
        url: String,
    },

    /// Progress update parsed from extractor output
    Progress {
        /// Job ID
        id: JobId,
        /// Progress percentage (0.0 to 100.0)
        percent: f32,
    },

    /// Extractor exited successfully, locating output
    Processing {
        /// Job ID
        id: JobId,
    },

    /// Output file available
    Completed {
        /// Job ID
        id: JobId,
        /// Produced filename
        file: String,
    },

    /// Job failed
    Failed {
        /// Job ID
        id: JobId,
        /// Failure reason
        error: String,
    },

    /// Job reclaimed by the retention sweeper
    Removed {
        /// Job ID
        id: JobId,
    },

    /// Downloader is shutting down
    Shutdown,
}
