//! OpenAPI documentation and schema generation
//!
//! Defines the OpenAPI specification for the media-dl REST API using utoipa
//! for compile-time spec generation.

use utoipa::OpenApi;

/// OpenAPI documentation for the media-dl REST API
///
/// Served as JSON at `/openapi.json`.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "media-dl REST API",
        version = "0.1.0",
        description = "REST API for submitting media downloads, polling their progress, and fetching produced files",
        license(
            name = "MIT OR Apache-2.0"
        )
    ),
    servers(
        (url = "http://localhost:8080", description = "Local development server")
    ),
    paths(
        // Downloads
        crate::api::routes::submit_download,
        crate::api::routes::list_downloads,
        crate::api::routes::get_progress,

        // Media
        crate::api::routes::media_info,

        // System
        crate::api::routes::health_check,
        crate::api::routes::openapi_spec,
        crate::api::routes::event_stream,
    ),
    components(schemas(
        // Core types from types.rs
        crate::types::JobId,
        crate::types::JobStatus,
        crate::types::Job,
        crate::types::MediaType,
        crate::types::DownloadRequest,
        crate::types::ProgressSnapshot,
        crate::types::FormatOption,
        crate::types::MediaInfo,
        crate::types::Event,

        // Config types from config.rs
        crate::config::Config,
        crate::config::DownloadConfig,
        crate::config::ToolsConfig,
        crate::config::RetentionConfig,
        crate::config::ApiConfig,

        // API request/response types
        crate::api::routes::SubmitResponse,
        crate::api::routes::InfoQuery,

        // Error types from error.rs
        crate::error::ApiError,
        crate::error::ErrorDetail,
    )),
    tags(
        (name = "downloads", description = "Download job submission and progress"),
        (name = "media", description = "Media info lookup"),
        (name = "system", description = "Health, events, and API documentation")
    )
)]
pub struct ApiDoc;

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_lists_every_route() {
        let doc = ApiDoc::openapi();
        let paths: Vec<&str> = doc.paths.paths.keys().map(String::as_str).collect();

        for path in [
            "/downloads",
            "/downloads/{id}/progress",
            "/info",
            "/health",
            "/openapi.json",
            "/events",
        ] {
            assert!(paths.contains(&path), "missing {path}");
        }
    }

    #[test]
    fn document_serializes_to_json() {
        let json = ApiDoc::openapi().to_json().unwrap();
        assert!(json.contains("media-dl REST API"));
    }
}
