//! Download handlers: submission, listing, progress, and media info.

use super::{InfoQuery, SubmitResponse};
use crate::api::AppState;
use crate::error::Error;
use crate::types::{DownloadRequest, JobId};
use axum::{
    Json,
    extract::{Path, Query, State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};

/// POST /downloads - Submit a download job
#[utoipa::path(
    post,
    path = "/downloads",
    tag = "downloads",
    request_body = crate::types::DownloadRequest,
    responses(
        (status = 201, description = "Job created", body = SubmitResponse),
        (status = 400, description = "Invalid request", body = crate::error::ApiError),
        (status = 503, description = "Shutting down", body = crate::error::ApiError)
    )
)]
pub async fn submit_download(
    State(state): State<AppState>,
    body: Result<Json<DownloadRequest>, JsonRejection>,
) -> Response {
    let request = match body {
        Ok(Json(request)) => request,
        Err(rejection) => {
            return Error::Validation {
                message: rejection.body_text(),
                field: None,
            }
            .into_response();
        }
    };

    match state.downloader.submit_download(request).await {
        Ok(job_id) => (StatusCode::CREATED, Json(SubmitResponse { job_id })).into_response(),
        Err(e) => {
            tracing::debug!(error = %e, "Rejected download submission");
            e.into_response()
        }
    }
}

/// GET /downloads - List all jobs, oldest first
#[utoipa::path(
    get,
    path = "/downloads",
    tag = "downloads",
    responses(
        (status = 200, description = "All tracked jobs", body = Vec<crate::types::Job>)
    )
)]
pub async fn list_downloads(State(state): State<AppState>) -> impl IntoResponse {
    (StatusCode::OK, Json(state.downloader.list_jobs().await))
}

/// GET /downloads/:id/progress - Progress snapshot for one job
#[utoipa::path(
    get,
    path = "/downloads/{id}/progress",
    tag = "downloads",
    params(
        ("id" = String, Path, description = "Job ID")
    ),
    responses(
        (status = 200, description = "Current job state", body = crate::types::ProgressSnapshot),
        (status = 404, description = "Job not found", body = crate::error::ApiError)
    )
)]
pub async fn get_progress(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    // A malformed id can never have been issued
    let Ok(job_id) = id.parse::<JobId>() else {
        return Error::NotFound(format!("job {}", id)).into_response();
    };

    match state.downloader.fetch_progress(job_id).await {
        Ok(snapshot) => (StatusCode::OK, Json(snapshot)).into_response(),
        Err(e) => e.into_response(),
    }
}

/// GET /info - Describe media without downloading it
#[utoipa::path(
    get,
    path = "/info",
    tag = "media",
    params(InfoQuery),
    responses(
        (status = 200, description = "Media description and offered formats", body = crate::types::MediaInfo),
        (status = 400, description = "Invalid URL", body = crate::error::ApiError),
        (status = 502, description = "Unusable extractor output", body = crate::error::ApiError),
        (status = 503, description = "Extractor unavailable or failed", body = crate::error::ApiError)
    )
)]
pub async fn media_info(State(state): State<AppState>, Query(query): Query<InfoQuery>) -> Response {
    match state.downloader.fetch_media_info(&query.url).await {
        Ok(info) => (StatusCode::OK, Json(info)).into_response(),
        Err(e) => {
            tracing::warn!(url = %query.url, error = %e, "Media info lookup failed");
            e.into_response()
        }
    }
}
