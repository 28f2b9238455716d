//! Error types for media-dl
//!
//! Two layers of failure exist in this crate:
//! - [`Error`] is returned synchronously by library and API calls (validation,
//!   lookups, configuration, server startup).
//! - [`JobFailure`] describes why a running job ended in the error state. It is
//!   never returned from submission; it is recorded on the job and surfaces
//!   through progress queries.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

/// Result type alias for media-dl operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for media-dl
#[derive(Debug, Error)]
pub enum Error {
    /// Malformed request, rejected before any job is created
    #[error("validation error: {message}")]
    Validation {
        /// Human-readable description of the problem
        message: String,
        /// The request field that failed validation (e.g., "url")
        field: Option<String>,
    },

    /// Configuration error with context about which setting is invalid
    #[error("configuration error: {message}")]
    Config {
        /// Human-readable error message describing the configuration issue
        message: String,
        /// The configuration key that caused the error (e.g., "retention.max_age")
        key: Option<String>,
    },

    /// Job (or other resource) not found
    #[error("{0} not found")]
    NotFound(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// External extractor could not be run or exited unsuccessfully
    #[error("external tool error: {0}")]
    ExternalTool(String),

    /// Extractor produced metadata that could not be understood
    #[error("invalid metadata: {0}")]
    Metadata(String),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Shutdown in progress - not accepting new jobs
    #[error("shutdown in progress: not accepting new downloads")]
    ShuttingDown,

    /// API server error
    #[error("API server error: {0}")]
    ApiServerError(String),
}

impl Error {
    /// Build a validation error for a specific request field
    pub fn validation(field: &str, message: impl Into<String>) -> Self {
        Error::Validation {
            message: message.into(),
            field: Some(field.to_string()),
        }
    }
}

/// Reason a job ended in the error state
///
/// The `Display` text is exactly what clients see in the job's `error` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum JobFailure {
    /// The extractor process could not be started
    #[error("process launch failed")]
    LaunchFailed,

    /// The extractor process exited with a non-zero code (or was killed)
    #[error("download failed")]
    DownloadFailed,

    /// The process succeeded but no output file with the job's prefix exists
    #[error("file not found after download")]
    FileNotFound,

    /// The download directory could not be scanned
    #[error("failed to locate downloaded file")]
    LocateFailed,
}

/// API error response format
///
/// # Example JSON Response
///
/// ```json
/// {
///   "error": {
///     "code": "not_found",
///     "message": "job 3f2c... not found",
///     "details": { "resource": "job 3f2c..." }
///   }
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ApiError {
    /// The error details
    pub error: ErrorDetail,
}

/// Detailed error information for API responses
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ErrorDetail {
    /// Machine-readable error code (e.g., "not_found", "validation_error")
    pub code: String,

    /// Human-readable error message
    pub message: String,

    /// Optional additional context about the error
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ApiError {
    /// Create a new API error with code and message
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: ErrorDetail {
                code: code.into(),
                message: message.into(),
                details: None,
            },
        }
    }

    /// Create a "not found" error
    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::new("not_found", format!("{} not found", resource.into()))
    }

    /// Create a "validation error" error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new("validation_error", message)
    }
}

/// Convert errors to HTTP status codes for API responses
pub trait ToHttpStatus {
    /// Get the HTTP status code for this error
    fn status_code(&self) -> u16;

    /// Get the machine-readable error code
    fn error_code(&self) -> &str;
}

impl ToHttpStatus for Error {
    fn status_code(&self) -> u16 {
        match self {
            // 400 Bad Request - Client error (invalid input)
            Error::Validation { .. } => 400,
            Error::Config { .. } => 400,

            // 404 Not Found
            Error::NotFound(_) => 404,

            // 500 Internal Server Error - Server-side issues
            Error::Io(_) => 500,
            Error::Serialization(_) => 500,
            Error::ApiServerError(_) => 500,

            // 502 Bad Gateway - extractor answered with garbage
            Error::Metadata(_) => 502,

            // 503 Service Unavailable
            Error::ExternalTool(_) => 503,
            Error::ShuttingDown => 503,
        }
    }

    fn error_code(&self) -> &str {
        match self {
            Error::Validation { .. } => "validation_error",
            Error::Config { .. } => "config_error",
            Error::NotFound(_) => "not_found",
            Error::Io(_) => "io_error",
            Error::ExternalTool(_) => "external_tool_error",
            Error::Metadata(_) => "metadata_error",
            Error::Serialization(_) => "serialization_error",
            Error::ShuttingDown => "shutting_down",
            Error::ApiServerError(_) => "api_server_error",
        }
    }
}

impl From<Error> for ApiError {
    fn from(error: Error) -> Self {
        let code = error.error_code().to_string();
        let message = error.to_string();

        let details = match &error {
            Error::Validation {
                field: Some(field), ..
            } => Some(serde_json::json!({ "field": field })),
            Error::Config { key: Some(key), .. } => Some(serde_json::json!({ "key": key })),
            Error::NotFound(resource) => Some(serde_json::json!({ "resource": resource })),
            _ => None,
        };

        ApiError {
            error: ErrorDetail {
                code,
                message,
                details,
            },
        }
    }
}
