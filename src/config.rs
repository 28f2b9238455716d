//! Configuration types for media-dl

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::{net::SocketAddr, path::PathBuf, time::Duration};
use utoipa::ToSchema;

/// Download behavior configuration
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct DownloadConfig {
    /// Directory the extractor writes finished files into (default: "./downloads")
    #[serde(default = "default_download_dir")]
    pub download_dir: PathBuf,

    /// Pause after a successful exit before scanning for the output file (default: 1000 ms)
    #[serde(default = "default_settle_delay", with = "millis_serde")]
    #[schema(value_type = u64)]
    pub settle_delay: Duration,
}

impl Default for DownloadConfig {
    fn default() -> Self {
        Self {
            download_dir: default_download_dir(),
            settle_delay: default_settle_delay(),
        }
    }
}

/// External extractor configuration
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct ToolsConfig {
    /// Path to the extractor executable (auto-detected if None)
    #[serde(default)]
    pub extractor_path: Option<PathBuf>,

    /// Whether to search PATH for the extractor if no explicit path is set (default: true)
    #[serde(default = "default_true")]
    pub search_path: bool,

    /// Extra arguments passed to every download invocation, before the URL
    #[serde(default)]
    pub extra_args: Vec<String>,
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            extractor_path: None,
            search_path: true,
            extra_args: Vec::new(),
        }
    }
}

/// Retention of finished (and stale) jobs
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct RetentionConfig {
    /// How long a job and its file are kept after creation (default: 3600 seconds)
    #[serde(default = "default_max_age", with = "duration_serde")]
    #[schema(value_type = u64)]
    pub max_age: Duration,

    /// Period between retention sweeps (default: 600 seconds)
    #[serde(default = "default_sweep_interval", with = "duration_serde")]
    #[schema(value_type = u64)]
    pub sweep_interval: Duration,
}

impl Default for RetentionConfig {
    fn default() -> Self {
        Self {
            max_age: default_max_age(),
            sweep_interval: default_sweep_interval(),
        }
    }
}

/// REST API configuration
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiConfig {
    /// Address to bind to (default: 127.0.0.1:8080)
    #[serde(default = "default_bind_address")]
    #[schema(value_type = String)]
    pub bind_address: SocketAddr,

    /// Base URL prepended to file references (e.g. "https://dl.example.com").
    ///
    /// When unset, file references are server-relative (`/files/<name>`).
    #[serde(default)]
    pub public_base_url: Option<String>,

    /// Enable CORS for browser access (default: true)
    #[serde(default = "default_true")]
    pub cors_enabled: bool,

    /// Allowed CORS origins (default: ["*"])
    #[serde(default = "default_cors_origins")]
    pub cors_origins: Vec<String>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            public_base_url: None,
            cors_enabled: true,
            cors_origins: default_cors_origins(),
        }
    }
}

/// Main configuration for [`MediaDownloader`](crate::MediaDownloader)
#[derive(Clone, Debug, Default, Serialize, Deserialize, ToSchema)]
pub struct Config {
    /// Download directories and timing
    #[serde(default)]
    pub download: DownloadConfig,

    /// Extractor binary and arguments
    #[serde(default)]
    pub tools: ToolsConfig,

    /// Job retention window and sweep cadence
    #[serde(default)]
    pub retention: RetentionConfig,

    /// REST API settings
    #[serde(default)]
    pub api: ApiConfig,
}

impl Config {
    /// Download directory
    pub fn download_dir(&self) -> &PathBuf {
        &self.download.download_dir
    }

    /// Check settings that serde cannot reject on its own
    pub fn validate(&self) -> Result<()> {
        if self.retention.max_age.is_zero() {
            return Err(Error::Config {
                message: "retention window must be greater than zero".into(),
                key: Some("retention.max_age".into()),
            });
        }
        if self.retention.sweep_interval.is_zero() {
            return Err(Error::Config {
                message: "sweep interval must be greater than zero".into(),
                key: Some("retention.sweep_interval".into()),
            });
        }
        if let Some(base) = &self.api.public_base_url {
            let parsed = url::Url::parse(base).map_err(|e| Error::Config {
                message: format!("invalid public base URL '{}': {}", base, e),
                key: Some("api.public_base_url".into()),
            })?;
            if !matches!(parsed.scheme(), "http" | "https") {
                return Err(Error::Config {
                    message: format!("public base URL must be http or https, got '{}'", base),
                    key: Some("api.public_base_url".into()),
                });
            }
        }
        Ok(())
    }
}

// Default value functions
fn default_download_dir() -> PathBuf {
    PathBuf::from("downloads")
}

fn default_settle_delay() -> Duration {
    Duration::from_millis(1000)
}

fn default_max_age() -> Duration {
    Duration::from_secs(60 * 60)
}

fn default_sweep_interval() -> Duration {
    Duration::from_secs(10 * 60)
}

fn default_true() -> bool {
    true
}

fn default_bind_address() -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], 8080))
}

fn default_cors_origins() -> Vec<String> {
    vec!["*".into()]
}

// Duration as whole seconds
mod duration_serde {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(duration.as_secs())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = u64::deserialize(deserializer)?;
        Ok(Duration::from_secs(secs))
    }
}

// Duration as whole milliseconds
mod millis_serde {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(duration.as_millis() as u64)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let millis = u64::deserialize(deserializer)?;
        Ok(Duration::from_millis(millis))
    }
}
