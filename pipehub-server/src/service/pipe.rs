//! Pipe Service
//!
//! Business logic for pipe management: the register-version upsert flow,
//! download resolution, and pipe CRUD.

use std::path::PathBuf;

use pipehub_core::domain::pipe::{Pipe, PipeWithVersions};
use pipehub_core::domain::version::Version;
use pipehub_core::dto::pipe::{
    CreatePipe, PipeListQuery, PipePage, RegisterVersion, RegisteredVersion, UpdatePipe,
};
use sqlx::PgPool;

use crate::repository::version_repository::NewVersion;
use crate::repository::{pipe_repository, version_repository};
use crate::storage::{ArchiveStore, StagedArchive, archive_file_name};

/// Service error type
#[derive(Debug)]
pub enum PipeError {
    NotFound(i64),
    NameNotFound(String),
    VersionNotFound {
        pipe: String,
        version: Option<String>,
    },
    NoAsset {
        pipe: String,
        version: String,
    },
    ValidationError(String),
    DatabaseError(sqlx::Error),
    StorageError(std::io::Error),
}

impl From<sqlx::Error> for PipeError {
    fn from(err: sqlx::Error) -> Self {
        PipeError::DatabaseError(err)
    }
}

pub type Result<T> = std::result::Result<T, PipeError>;

/// Register a version under a pipe name, creating the pipe when absent.
///
/// The archive, when one was uploaded, is committed to the store before
/// any database write; a commit failure aborts the whole operation. A
/// committed archive followed by a failed insert leaves the file behind
/// with no compensating delete.
pub async fn register_version(
    pool: &PgPool,
    store: &ArchiveStore,
    req: RegisterVersion,
    staged: Option<StagedArchive>,
) -> Result<RegisteredVersion> {
    if let Err(err) = validate_register_request(&req) {
        if let Some(staged) = staged {
            store.discard(staged).await;
        }
        return Err(err);
    }

    let asset_url = match staged {
        Some(staged) => {
            let file_name = archive_file_name(&req.name, &req.version_number);
            let stored = store
                .commit(staged, &file_name)
                .await
                .map_err(PipeError::StorageError)?;
            stored.url
        }
        None => String::new(),
    };

    let pipe = match pipe_repository::find_by_name(pool, &req.name).await? {
        Some(pipe) => pipe,
        None => {
            let pipe = pipe_repository::create(
                pool,
                CreatePipe {
                    name: req.name.clone(),
                    description: req.description.clone(),
                },
            )
            .await?;
            tracing::info!("Pipe created: {} ({})", pipe.name, pipe.id);
            pipe
        }
    };

    let version = version_repository::create(
        pool,
        NewVersion {
            pipe_id: pipe.id,
            version_number: req.version_number.clone(),
            asset_url,
            env_schema: req.env_schema,
        },
    )
    .await?;

    tracing::info!(
        "Version {} registered for pipe {} ({})",
        version.version_number,
        pipe.name,
        pipe.id
    );

    Ok(RegisteredVersion { pipe, version })
}

/// Resolve a download request to a version and its on-disk archive path.
///
/// Without an explicit version number the most recently created version is
/// picked. The filesystem is the source of truth for downloadability: a
/// version whose archive is missing on disk resolves to `NoAsset` even
/// though the row exists.
pub async fn resolve_download(
    pool: &PgPool,
    store: &ArchiveStore,
    name: &str,
    version_number: Option<&str>,
) -> Result<(Pipe, Version, PathBuf)> {
    let pipe = pipe_repository::find_by_name(pool, name)
        .await?
        .ok_or_else(|| PipeError::NameNotFound(name.to_string()))?;

    let version = match version_number {
        Some(number) => version_repository::find_by_pipe_and_number(pool, pipe.id, number)
            .await?
            .ok_or_else(|| PipeError::VersionNotFound {
                pipe: pipe.name.clone(),
                version: Some(number.to_string()),
            })?,
        None => version_repository::find_latest(pool, pipe.id)
            .await?
            .ok_or_else(|| PipeError::VersionNotFound {
                pipe: pipe.name.clone(),
                version: None,
            })?,
    };

    if !version.has_asset() {
        return Err(PipeError::NoAsset {
            pipe: pipe.name.clone(),
            version: version.version_number.clone(),
        });
    }

    let file_name = archive_file_name(&pipe.name, &version.version_number);
    if !store.exists(&file_name).await {
        return Err(PipeError::NoAsset {
            pipe: pipe.name.clone(),
            version: version.version_number.clone(),
        });
    }

    let path = store.resolve_path(&file_name);
    Ok((pipe, version, path))
}

/// Get a pipe by ID
pub async fn get_pipe(pool: &PgPool, id: i64) -> Result<Pipe> {
    let pipe = pipe_repository::find_by_id(pool, id)
        .await?
        .ok_or(PipeError::NotFound(id))?;

    Ok(pipe)
}

/// List pipes matching the query
pub async fn list_pipes(pool: &PgPool, query: &PipeListQuery) -> Result<PipePage<Pipe>> {
    let filter =
        pipe_repository::PipeFilter::new(query.search.clone(), query.page, query.limit);

    let pipes = pipe_repository::find_many(pool, &filter).await?;
    let total_count = pipe_repository::count(pool, &filter).await?;

    Ok(PipePage {
        pipes,
        total_count,
        page: filter.page,
        limit: filter.limit,
        total_pages: super::total_pages(total_count, filter.limit),
    })
}

/// List pipes with their versions nested
pub async fn list_pipes_with_versions(
    pool: &PgPool,
    query: &PipeListQuery,
) -> Result<PipePage<PipeWithVersions>> {
    let filter =
        pipe_repository::PipeFilter::new(query.search.clone(), query.page, query.limit);

    let pipes = pipe_repository::find_many_with_versions(pool, &filter).await?;
    let total_count = pipe_repository::count(pool, &filter).await?;

    Ok(PipePage {
        pipes,
        total_count,
        page: filter.page,
        limit: filter.limit,
        total_pages: super::total_pages(total_count, filter.limit),
    })
}

/// Update a pipe
pub async fn update_pipe(pool: &PgPool, id: i64, req: UpdatePipe) -> Result<Pipe> {
    if let Some(name) = &req.name {
        validate_pipe_name(name)?;
    }

    let updated = pipe_repository::update(pool, id, req).await?;

    if !updated {
        return Err(PipeError::NotFound(id));
    }

    get_pipe(pool, id).await
}

/// Delete a pipe. Its versions go with it via the schema cascade.
pub async fn delete_pipe(pool: &PgPool, id: i64) -> Result<()> {
    let deleted = pipe_repository::delete(pool, id).await?;

    if !deleted {
        return Err(PipeError::NotFound(id));
    }

    tracing::info!("Pipe deleted: {}", id);

    Ok(())
}

// =============================================================================
// Validation
// =============================================================================

fn validate_pipe_name(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(PipeError::ValidationError(
            "Pipe name cannot be empty".to_string(),
        ));
    }

    if name.len() > 255 {
        return Err(PipeError::ValidationError(
            "Pipe name is too long (max 255 characters)".to_string(),
        ));
    }

    // Names become part of on-disk archive file names
    if name.contains('/') || name.contains('\\') || name.contains("..") {
        return Err(PipeError::ValidationError(
            "Pipe name must not contain path separators".to_string(),
        ));
    }

    Ok(())
}

fn validate_register_request(req: &RegisterVersion) -> Result<()> {
    validate_pipe_name(&req.name)?;

    if req.version_number.trim().is_empty() {
        return Err(PipeError::ValidationError(
            "Version number cannot be empty".to_string(),
        ));
    }

    if req.version_number.len() > 100 {
        return Err(PipeError::ValidationError(
            "Version number is too long (max 100 characters)".to_string(),
        ));
    }

    if req.version_number.contains('/') || req.version_number.contains('\\') {
        return Err(PipeError::ValidationError(
            "Version number must not contain path separators".to_string(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(name: &str, version: &str) -> RegisterVersion {
        RegisterVersion {
            name: name.to_string(),
            version_number: version.to_string(),
            description: None,
            env_schema: serde_json::json!({}),
        }
    }

    #[test]
    fn test_validate_empty_name() {
        let result = validate_register_request(&request("", "1.0.0"));
        assert!(matches!(result, Err(PipeError::ValidationError(_))));
    }

    #[test]
    fn test_validate_overlong_name() {
        let result = validate_register_request(&request(&"a".repeat(256), "1.0.0"));
        assert!(matches!(result, Err(PipeError::ValidationError(_))));
    }

    #[test]
    fn test_validate_empty_version() {
        let result = validate_register_request(&request("acme", "  "));
        assert!(matches!(result, Err(PipeError::ValidationError(_))));
    }

    #[test]
    fn test_validate_rejects_path_separators() {
        let result = validate_register_request(&request("../etc", "1.0.0"));
        assert!(matches!(result, Err(PipeError::ValidationError(_))));

        let result = validate_register_request(&request("acme", "1.0/0"));
        assert!(matches!(result, Err(PipeError::ValidationError(_))));
    }

    #[test]
    fn test_validate_valid_request() {
        let result = validate_register_request(&request("acme", "1.0.0"));
        assert!(result.is_ok());
    }
}
