//! Version API Handlers
//!
//! HTTP endpoints for version management.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use pipehub_core::domain::version::Version;
use pipehub_core::dto::ApiResponse;
use pipehub_core::dto::version::{CreateVersion, UpdateVersion, VersionListQuery, VersionPage};

use crate::api::AppState;
use crate::api::error::ApiResult;
use crate::service::version_service;

/// POST /versions
/// Create a version under an existing pipe
pub async fn create_version(
    State(state): State<AppState>,
    Json(req): Json<CreateVersion>,
) -> ApiResult<(StatusCode, Json<ApiResponse<Version>>)> {
    tracing::info!(
        "Creating version {} for pipe {}",
        req.version_number,
        req.pipe_id
    );

    let version = version_service::create_version(&state.pool, req).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_message(
            version,
            "Version created successfully",
        )),
    ))
}

/// GET /versions
/// List versions with pagination and optional pipe filter
pub async fn list_versions(
    State(state): State<AppState>,
    Query(query): Query<VersionListQuery>,
) -> ApiResult<Json<ApiResponse<VersionPage>>> {
    tracing::debug!("Listing versions: {:?}", query);

    let page = version_service::list_versions(&state.pool, &query).await?;

    Ok(Json(ApiResponse::ok(page)))
}

/// GET /versions/{id}
/// Get version by ID
pub async fn get_version(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<ApiResponse<Version>>> {
    tracing::debug!("Getting version: {}", id);

    let version = version_service::get_version(&state.pool, id).await?;

    Ok(Json(ApiResponse::ok(version)))
}

/// PUT /versions/{id}
/// Update a version
pub async fn update_version(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<UpdateVersion>,
) -> ApiResult<Json<ApiResponse<Version>>> {
    tracing::info!("Updating version: {}", id);

    let version = version_service::update_version(&state.pool, id, req).await?;

    Ok(Json(ApiResponse::ok(version)))
}

/// DELETE /versions/{id}
/// Delete a version
pub async fn delete_version(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<StatusCode> {
    tracing::info!("Deleting version: {}", id);

    version_service::delete_version(&state.pool, id).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// GET /versions/{name}/env-schema/{version}
/// Return the stored envSchema document for a pipe version, verbatim
pub async fn env_schema(
    State(state): State<AppState>,
    Path((name, version)): Path<(String, String)>,
) -> ApiResult<Json<serde_json::Value>> {
    tracing::debug!("Getting env schema for {} {}", name, version);

    let schema = version_service::env_schema(&state.pool, &name, &version).await?;

    Ok(Json(schema))
}
