//! API error taxonomy and its mapping to HTTP responses

use super::response::ApiResponse;
use crate::compiler::CompileError;
use crate::models::{ObjectId, ProjectId};
use crate::store::{NameConflict, StoreError};
use crate::validation::ValidationError;
use serde_json::json;
use tracing::error;

/// Error returned by an API handler
///
/// Every variant except [`ApiError::Internal`] carries a message meant for the
/// client. Internal errors are logged and answered with a generic message.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Not authenticated")]
    Unauthenticated,
    #[error("Invalid HTTP method")]
    InvalidMethod,
    #[error("Project id={0} does not exist")]
    ProjectNotFound(ProjectId),
    #[error("Object id={0} does not exist")]
    ObjectNotFound(ObjectId),
    /// A path segment the route needs is absent
    #[error("Invalid {0}")]
    MissingPathSegment(&'static str),
    #[error("Missing request body")]
    MissingBody,
    #[error("Invalid request body: {0}")]
    InvalidBody(String),
    #[error("Missing `{0}` parameter")]
    MissingParameter(&'static str),
    #[error("Missing `{0}` attribute parameter")]
    MissingAttributeParameter(&'static str),
    #[error("Invalid `{field}` parameter: {reason}")]
    InvalidParameter { field: &'static str, reason: String },
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("{}", .0.message())]
    Duplicate(NameConflict),
    #[error("Internal server error")]
    Internal(String),
}

impl ApiError {
    /// HTTP status code of the error response
    pub fn status(&self) -> u16 {
        match self {
            ApiError::Unauthenticated => 401,
            ApiError::InvalidMethod => 405,
            ApiError::Internal(_) => 500,
            _ => 400,
        }
    }

    /// Convert into a `{"error": <message>}` response
    pub fn into_response(self) -> ApiResponse {
        if let ApiError::Internal(detail) = &self {
            error!("Request failed: {}", detail);
        }
        ApiResponse::json(self.status(), json!({ "error": self.to_string() }))
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::ProjectNotFound(id) => ApiError::ProjectNotFound(id),
            StoreError::ObjectNotFound(id) => ApiError::ObjectNotFound(id),
            StoreError::Duplicate(conflict) => ApiError::Duplicate(conflict),
            StoreError::Validation(e) => ApiError::Validation(e),
            err @ (StoreError::CorruptRecord { .. } | StoreError::Backend(_)) => {
                ApiError::Internal(err.to_string())
            }
        }
    }
}

impl From<CompileError> for ApiError {
    fn from(err: CompileError) -> Self {
        match err {
            CompileError::ProjectNotFound(id) => ApiError::ProjectNotFound(id),
            err => ApiError::Internal(err.to_string()),
        }
    }
}
