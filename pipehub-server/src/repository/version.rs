//! Version Repository
//!
//! Handles all database operations related to versions. Uniqueness of
//! (pipe_id, version_number) is enforced by the schema; violations
//! propagate as plain `sqlx::Error`.

use pipehub_core::domain::version::Version;
use pipehub_core::dto::version::UpdateVersion;
use sqlx::PgPool;

/// Listing filter for versions, optionally scoped to one pipe.
#[derive(Debug, Clone)]
pub struct VersionFilter {
    pub pipe_id: Option<i64>,
    pub page: i64,
    pub limit: i64,
}

impl VersionFilter {
    pub fn new(pipe_id: Option<i64>, page: Option<i64>, limit: Option<i64>) -> Self {
        Self {
            pipe_id,
            page: page.unwrap_or(1).max(1),
            limit: limit.unwrap_or(10).max(1),
        }
    }

    // Saturating: page and limit come straight from the query string
    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.limit)
    }
}

/// Fields of a new version row.
#[derive(Debug, Clone)]
pub struct NewVersion {
    pub pipe_id: i64,
    pub version_number: String,
    pub asset_url: String,
    pub env_schema: serde_json::Value,
}

/// Create a new version in the database
pub async fn create(pool: &PgPool, req: NewVersion) -> Result<Version, sqlx::Error> {
    let now = chrono::Utc::now();

    let row = sqlx::query_as::<_, VersionRow>(
        r#"
        INSERT INTO versions (pipe_id, version_number, asset_url, env_schema, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $5)
        RETURNING id, pipe_id, version_number, asset_url, env_schema, created_at, updated_at
        "#,
    )
    .bind(req.pipe_id)
    .bind(&req.version_number)
    .bind(&req.asset_url)
    .bind(&req.env_schema)
    .bind(now)
    .fetch_one(pool)
    .await?;

    Ok(row.into())
}

/// Find a version by ID
pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<Version>, sqlx::Error> {
    let row = sqlx::query_as::<_, VersionRow>(
        r#"
        SELECT id, pipe_id, version_number, asset_url, env_schema, created_at, updated_at
        FROM versions
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(|r| r.into()))
}

/// List all versions of a pipe, newest first
pub async fn find_by_pipe(pool: &PgPool, pipe_id: i64) -> Result<Vec<Version>, sqlx::Error> {
    let rows = sqlx::query_as::<_, VersionRow>(
        r#"
        SELECT id, pipe_id, version_number, asset_url, env_schema, created_at, updated_at
        FROM versions
        WHERE pipe_id = $1
        ORDER BY created_at DESC, id DESC
        "#,
    )
    .bind(pipe_id)
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(|r| r.into()).collect())
}

/// Find one version of a pipe by exact version number
pub async fn find_by_pipe_and_number(
    pool: &PgPool,
    pipe_id: i64,
    version_number: &str,
) -> Result<Option<Version>, sqlx::Error> {
    let row = sqlx::query_as::<_, VersionRow>(
        r#"
        SELECT id, pipe_id, version_number, asset_url, env_schema, created_at, updated_at
        FROM versions
        WHERE pipe_id = $1 AND version_number = $2
        "#,
    )
    .bind(pipe_id)
    .bind(version_number)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(|r| r.into()))
}

/// Find the most recently created version of a pipe.
/// Ties on created_at break by highest id.
pub async fn find_latest(pool: &PgPool, pipe_id: i64) -> Result<Option<Version>, sqlx::Error> {
    let row = sqlx::query_as::<_, VersionRow>(
        r#"
        SELECT id, pipe_id, version_number, asset_url, env_schema, created_at, updated_at
        FROM versions
        WHERE pipe_id = $1
        ORDER BY created_at DESC, id DESC
        LIMIT 1
        "#,
    )
    .bind(pipe_id)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(|r| r.into()))
}

/// List versions matching the filter, newest first
pub async fn find_many(pool: &PgPool, filter: &VersionFilter) -> Result<Vec<Version>, sqlx::Error> {
    let rows = sqlx::query_as::<_, VersionRow>(
        r#"
        SELECT id, pipe_id, version_number, asset_url, env_schema, created_at, updated_at
        FROM versions
        WHERE ($1::BIGINT IS NULL OR pipe_id = $1)
        ORDER BY created_at DESC, id DESC
        LIMIT $2 OFFSET $3
        "#,
    )
    .bind(filter.pipe_id)
    .bind(filter.limit)
    .bind(filter.offset())
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(|r| r.into()).collect())
}

/// Count versions matching the same predicate as `find_many`
pub async fn count(pool: &PgPool, filter: &VersionFilter) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar::<_, i64>(
        r#"
        SELECT COUNT(*)
        FROM versions
        WHERE ($1::BIGINT IS NULL OR pipe_id = $1)
        "#,
    )
    .bind(filter.pipe_id)
    .fetch_one(pool)
    .await
}

/// Update a version, merging provided fields
pub async fn update(pool: &PgPool, id: i64, req: UpdateVersion) -> Result<bool, sqlx::Error> {
    let now = chrono::Utc::now();

    let result = sqlx::query(
        r#"
        UPDATE versions
        SET version_number = COALESCE($1, version_number),
            asset_url = COALESCE($2, asset_url),
            env_schema = COALESCE($3, env_schema),
            updated_at = $4
        WHERE id = $5
        "#,
    )
    .bind(&req.version_number)
    .bind(&req.asset_url)
    .bind(&req.env_schema)
    .bind(now)
    .bind(id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// Delete a version by ID
pub async fn delete(pool: &PgPool, id: i64) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM versions WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

// =============================================================================
// Database Row Types
// =============================================================================

#[derive(sqlx::FromRow)]
struct VersionRow {
    id: i64,
    pipe_id: i64,
    version_number: String,
    asset_url: String,
    env_schema: serde_json::Value,
    created_at: chrono::DateTime<chrono::Utc>,
    updated_at: chrono::DateTime<chrono::Utc>,
}

impl From<VersionRow> for Version {
    fn from(row: VersionRow) -> Self {
        Version {
            id: row.id,
            pipe_id: row.pipe_id,
            version_number: row.version_number,
            asset_url: row.asset_url,
            env_schema: row.env_schema,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_defaults() {
        let filter = VersionFilter::new(None, None, None);
        assert_eq!(filter.page, 1);
        assert_eq!(filter.limit, 10);
        assert_eq!(filter.offset(), 0);
        assert!(filter.pipe_id.is_none());
    }

    #[test]
    fn test_filter_offset() {
        let filter = VersionFilter::new(Some(7), Some(4), Some(25));
        assert_eq!(filter.offset(), 75);
        assert_eq!(filter.pipe_id, Some(7));
    }

    #[test]
    fn test_filter_offset_saturates() {
        let filter = VersionFilter::new(None, Some(i64::MAX), Some(i64::MAX));
        assert_eq!(filter.offset(), i64::MAX);
    }
}
