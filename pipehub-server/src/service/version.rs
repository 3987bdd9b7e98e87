//! Version Service
//!
//! CRUD over versions with one added invariant: any operation that names a
//! pipe first confirms the pipe exists.

use pipehub_core::domain::version::Version;
use pipehub_core::dto::version::{CreateVersion, UpdateVersion, VersionListQuery, VersionPage};
use sqlx::PgPool;

use crate::repository::version_repository::{NewVersion, VersionFilter};
use crate::repository::{pipe_repository, version_repository};

/// Service error type
#[derive(Debug)]
pub enum VersionError {
    NotFound(i64),
    PipeNotFound(i64),
    PipeNameNotFound(String),
    VersionNotFound { pipe: String, version: String },
    NoVersions(i64),
    ValidationError(String),
    DatabaseError(sqlx::Error),
}

impl From<sqlx::Error> for VersionError {
    fn from(err: sqlx::Error) -> Self {
        VersionError::DatabaseError(err)
    }
}

pub type Result<T> = std::result::Result<T, VersionError>;

/// Create a new version under an existing pipe
pub async fn create_version(pool: &PgPool, req: CreateVersion) -> Result<Version> {
    if req.version_number.trim().is_empty() {
        return Err(VersionError::ValidationError(
            "Version number cannot be empty".to_string(),
        ));
    }

    // Verify pipe exists
    let _pipe = pipe_repository::find_by_id(pool, req.pipe_id)
        .await?
        .ok_or(VersionError::PipeNotFound(req.pipe_id))?;

    let version = version_repository::create(
        pool,
        NewVersion {
            pipe_id: req.pipe_id,
            version_number: req.version_number,
            asset_url: req.asset_url.unwrap_or_default(),
            env_schema: req.env_schema,
        },
    )
    .await?;

    tracing::info!(
        "Version created: {} for pipe: {}",
        version.id,
        version.pipe_id
    );

    Ok(version)
}

/// Get a version by ID
pub async fn get_version(pool: &PgPool, id: i64) -> Result<Version> {
    let version = version_repository::find_by_id(pool, id)
        .await?
        .ok_or(VersionError::NotFound(id))?;

    Ok(version)
}

/// List versions matching the query
pub async fn list_versions(pool: &PgPool, query: &VersionListQuery) -> Result<VersionPage> {
    // Verify the pipe exists when the listing is scoped to one
    if let Some(pipe_id) = query.pipe_id {
        let _pipe = pipe_repository::find_by_id(pool, pipe_id)
            .await?
            .ok_or(VersionError::PipeNotFound(pipe_id))?;
    }

    let filter = VersionFilter::new(query.pipe_id, query.page, query.limit);

    let items = version_repository::find_many(pool, &filter).await?;
    let total_count = version_repository::count(pool, &filter).await?;

    Ok(VersionPage {
        items,
        total_count,
        page: filter.page,
        limit: filter.limit,
        total_pages: super::total_pages(total_count, filter.limit),
    })
}

/// List all versions of a pipe
pub async fn list_for_pipe(pool: &PgPool, pipe_id: i64) -> Result<Vec<Version>> {
    // Verify pipe exists
    let _pipe = pipe_repository::find_by_id(pool, pipe_id)
        .await?
        .ok_or(VersionError::PipeNotFound(pipe_id))?;

    let versions = version_repository::find_by_pipe(pool, pipe_id).await?;
    Ok(versions)
}

/// Get the most recently created version of a pipe
pub async fn latest_for_pipe(pool: &PgPool, pipe_id: i64) -> Result<Version> {
    // Verify pipe exists
    let _pipe = pipe_repository::find_by_id(pool, pipe_id)
        .await?
        .ok_or(VersionError::PipeNotFound(pipe_id))?;

    let version = version_repository::find_latest(pool, pipe_id)
        .await?
        .ok_or(VersionError::NoVersions(pipe_id))?;

    Ok(version)
}

/// Update a version
pub async fn update_version(pool: &PgPool, id: i64, req: UpdateVersion) -> Result<Version> {
    if let Some(number) = &req.version_number {
        if number.trim().is_empty() {
            return Err(VersionError::ValidationError(
                "Version number cannot be empty".to_string(),
            ));
        }
    }

    let updated = version_repository::update(pool, id, req).await?;

    if !updated {
        return Err(VersionError::NotFound(id));
    }

    get_version(pool, id).await
}

/// Delete a version
pub async fn delete_version(pool: &PgPool, id: i64) -> Result<()> {
    let deleted = version_repository::delete(pool, id).await?;

    if !deleted {
        return Err(VersionError::NotFound(id));
    }

    tracing::info!("Version deleted: {}", id);

    Ok(())
}

/// Fetch the stored envSchema document for a pipe version, verbatim
pub async fn env_schema(
    pool: &PgPool,
    pipe_name: &str,
    version_number: &str,
) -> Result<serde_json::Value> {
    let pipe = pipe_repository::find_by_name(pool, pipe_name)
        .await?
        .ok_or_else(|| VersionError::PipeNameNotFound(pipe_name.to_string()))?;

    let version = version_repository::find_by_pipe_and_number(pool, pipe.id, version_number)
        .await?
        .ok_or_else(|| VersionError::VersionNotFound {
            pipe: pipe.name.clone(),
            version: version_number.to_string(),
        })?;

    Ok(version.env_schema)
}
