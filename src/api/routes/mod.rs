//! Route handlers for the REST API
//!
//! Handlers are organized by domain:
//! - [`downloads`] - Job submission, listing, progress, and media info
//! - [`system`] - Health, events, OpenAPI

use crate::types::JobId;
use serde::{Deserialize, Serialize};

mod downloads;
mod system;

pub use downloads::*;
pub use system::*;

/// Response body for POST /downloads
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
pub struct SubmitResponse {
    /// ID of the created job
    pub job_id: JobId,
}

/// Query parameters for GET /info
#[derive(Debug, Deserialize, Serialize, utoipa::IntoParams, utoipa::ToSchema)]
#[into_params(parameter_in = Query)]
pub struct InfoQuery {
    /// Media page URL
    pub url: String,
}
