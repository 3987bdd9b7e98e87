//! API Error Handling
//!
//! Unified error types and conversion for API responses.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::service::pipe::PipeError;
use crate::service::version::VersionError;

/// API error type
#[derive(Debug)]
pub enum ApiError {
    NotFound(String),
    BadRequest(String),
    DatabaseError(sqlx::Error),
    StorageError(std::io::Error),
    InternalError(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::DatabaseError(err) => {
                tracing::error!("Database error: {:?}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
            ApiError::StorageError(err) => {
                tracing::error!("Archive storage error: {:?}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Failed to store archive".to_string(),
                )
            }
            ApiError::InternalError(msg) => {
                tracing::error!("Internal error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, msg)
            }
        };

        (status, Json(serde_json::json!({ "error": message }))).into_response()
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        ApiError::DatabaseError(err)
    }
}

impl From<PipeError> for ApiError {
    fn from(err: PipeError) -> Self {
        match err {
            PipeError::NotFound(id) => ApiError::NotFound(format!("Pipe {} not found", id)),
            PipeError::NameNotFound(name) => {
                ApiError::NotFound(format!("Pipe '{}' not found", name))
            }
            PipeError::VersionNotFound {
                pipe,
                version: Some(version),
            } => ApiError::NotFound(format!(
                "Version '{}' not found for pipe '{}'",
                version, pipe
            )),
            PipeError::VersionNotFound { pipe, version: None } => {
                ApiError::NotFound(format!("No versions found for pipe '{}'", pipe))
            }
            PipeError::NoAsset { pipe, version } => ApiError::NotFound(format!(
                "No asset available for pipe '{}' version '{}'",
                pipe, version
            )),
            PipeError::ValidationError(msg) => ApiError::BadRequest(msg),
            PipeError::DatabaseError(err) => ApiError::DatabaseError(err),
            PipeError::StorageError(err) => ApiError::StorageError(err),
        }
    }
}

impl From<VersionError> for ApiError {
    fn from(err: VersionError) -> Self {
        match err {
            VersionError::NotFound(id) => {
                ApiError::NotFound(format!("Version {} not found", id))
            }
            VersionError::PipeNotFound(id) => {
                ApiError::NotFound(format!("Pipe {} not found", id))
            }
            VersionError::PipeNameNotFound(name) => {
                ApiError::NotFound(format!("Pipe '{}' not found", name))
            }
            VersionError::VersionNotFound { pipe, version } => ApiError::NotFound(format!(
                "Version '{}' not found for pipe '{}'",
                version, pipe
            )),
            VersionError::NoVersions(pipe_id) => {
                ApiError::NotFound(format!("No versions found for pipe {}", pipe_id))
            }
            VersionError::ValidationError(msg) => ApiError::BadRequest(msg),
            VersionError::DatabaseError(err) => ApiError::DatabaseError(err),
        }
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
