//! Pipe Repository
//!
//! Handles all database operations related to pipes.

use pipehub_core::domain::pipe::{Pipe, PipeWithVersions};
use pipehub_core::domain::version::Version;
use pipehub_core::dto::pipe::{CreatePipe, UpdatePipe};
use sqlx::PgPool;

/// Listing filter passed uniformly to `find_many`, `count` and
/// `find_many_with_versions`. Page and limit are 1-indexed and clamped.
#[derive(Debug, Clone)]
pub struct PipeFilter {
    pub search: Option<String>,
    pub page: i64,
    pub limit: i64,
}

impl PipeFilter {
    pub fn new(search: Option<String>, page: Option<i64>, limit: Option<i64>) -> Self {
        Self {
            search: search.filter(|s| !s.is_empty()),
            page: page.unwrap_or(1).max(1),
            limit: limit.unwrap_or(10).max(1),
        }
    }

    // Saturating: page and limit come straight from the query string
    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.limit)
    }

    /// ILIKE pattern for case-insensitive substring search, or None when
    /// no search term was given.
    fn search_pattern(&self) -> Option<String> {
        self.search.as_ref().map(|s| format!("%{}%", s))
    }
}

/// Create a new pipe in the database
pub async fn create(pool: &PgPool, req: CreatePipe) -> Result<Pipe, sqlx::Error> {
    let now = chrono::Utc::now();

    let row = sqlx::query_as::<_, PipeRow>(
        r#"
        INSERT INTO pipes (name, description, created_at, updated_at)
        VALUES ($1, $2, $3, $3)
        RETURNING id, name, description, created_at, updated_at
        "#,
    )
    .bind(&req.name)
    .bind(&req.description)
    .bind(now)
    .fetch_one(pool)
    .await?;

    Ok(row.into())
}

/// Find a pipe by ID
pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<Pipe>, sqlx::Error> {
    let row = sqlx::query_as::<_, PipeRow>(
        r#"
        SELECT id, name, description, created_at, updated_at
        FROM pipes
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(|r| r.into()))
}

/// Find a pipe by its exact name
pub async fn find_by_name(pool: &PgPool, name: &str) -> Result<Option<Pipe>, sqlx::Error> {
    let row = sqlx::query_as::<_, PipeRow>(
        r#"
        SELECT id, name, description, created_at, updated_at
        FROM pipes
        WHERE name = $1
        "#,
    )
    .bind(name)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(|r| r.into()))
}

/// List pipes matching the filter, newest first
pub async fn find_many(pool: &PgPool, filter: &PipeFilter) -> Result<Vec<Pipe>, sqlx::Error> {
    let rows = sqlx::query_as::<_, PipeRow>(
        r#"
        SELECT id, name, description, created_at, updated_at
        FROM pipes
        WHERE ($1::TEXT IS NULL OR name ILIKE $1 OR description ILIKE $1)
        ORDER BY created_at DESC
        LIMIT $2 OFFSET $3
        "#,
    )
    .bind(filter.search_pattern())
    .bind(filter.limit)
    .bind(filter.offset())
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(|r| r.into()).collect())
}

/// Count pipes matching the same predicate as `find_many`
pub async fn count(pool: &PgPool, filter: &PipeFilter) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar::<_, i64>(
        r#"
        SELECT COUNT(*)
        FROM pipes
        WHERE ($1::TEXT IS NULL OR name ILIKE $1 OR description ILIKE $1)
        "#,
    )
    .bind(filter.search_pattern())
    .fetch_one(pool)
    .await
}

/// List pipes with their versions nested.
///
/// Fetches the full join result for the matching pipes, groups rows by
/// pipe id preserving arrival order, then slices the grouped list by
/// page and limit. Pagination happens at the pipe level, not the row
/// level, so the query deliberately over-fetches.
pub async fn find_many_with_versions(
    pool: &PgPool,
    filter: &PipeFilter,
) -> Result<Vec<PipeWithVersions>, sqlx::Error> {
    let rows = sqlx::query_as::<_, PipeVersionRow>(
        r#"
        SELECT p.id, p.name, p.description, p.created_at, p.updated_at,
               v.id AS version_id, v.version_number, v.asset_url, v.env_schema,
               v.created_at AS version_created_at, v.updated_at AS version_updated_at
        FROM pipes p
        LEFT JOIN versions v ON v.pipe_id = p.id
        WHERE ($1::TEXT IS NULL OR p.name ILIKE $1 OR p.description ILIKE $1)
        ORDER BY p.created_at DESC, p.id DESC, v.created_at DESC
        "#,
    )
    .bind(filter.search_pattern())
    .fetch_all(pool)
    .await?;

    let grouped = group_rows(rows);
    Ok(page_slice(grouped, filter.page, filter.limit))
}

/// Update a pipe, merging provided fields
pub async fn update(pool: &PgPool, id: i64, req: UpdatePipe) -> Result<bool, sqlx::Error> {
    let now = chrono::Utc::now();

    let result = sqlx::query(
        r#"
        UPDATE pipes
        SET name = COALESCE($1, name),
            description = COALESCE($2, description),
            updated_at = $3
        WHERE id = $4
        "#,
    )
    .bind(&req.name)
    .bind(&req.description)
    .bind(now)
    .bind(id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// Delete a pipe by ID. Versions go with it via the schema cascade.
pub async fn delete(pool: &PgPool, id: i64) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM pipes WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

// =============================================================================
// Database Row Types
// =============================================================================

#[derive(sqlx::FromRow)]
struct PipeRow {
    id: i64,
    name: String,
    description: Option<String>,
    created_at: chrono::DateTime<chrono::Utc>,
    updated_at: chrono::DateTime<chrono::Utc>,
}

impl From<PipeRow> for Pipe {
    fn from(row: PipeRow) -> Self {
        Pipe {
            id: row.id,
            name: row.name,
            description: row.description,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// One row of the pipes-with-versions join. Version columns are null for
/// pipes without any version.
#[derive(sqlx::FromRow)]
struct PipeVersionRow {
    id: i64,
    name: String,
    description: Option<String>,
    created_at: chrono::DateTime<chrono::Utc>,
    updated_at: chrono::DateTime<chrono::Utc>,
    version_id: Option<i64>,
    version_number: Option<String>,
    asset_url: Option<String>,
    env_schema: Option<serde_json::Value>,
    version_created_at: Option<chrono::DateTime<chrono::Utc>>,
    version_updated_at: Option<chrono::DateTime<chrono::Utc>>,
}

impl PipeVersionRow {
    fn pipe(&self) -> Pipe {
        Pipe {
            id: self.id,
            name: self.name.clone(),
            description: self.description.clone(),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }

    fn version(&self) -> Option<Version> {
        let version_id = self.version_id?;
        Some(Version {
            id: version_id,
            pipe_id: self.id,
            version_number: self.version_number.clone().unwrap_or_default(),
            asset_url: self.asset_url.clone().unwrap_or_default(),
            env_schema: self
                .env_schema
                .clone()
                .unwrap_or(serde_json::Value::Null),
            created_at: self.version_created_at.unwrap_or(self.created_at),
            updated_at: self.version_updated_at.unwrap_or(self.updated_at),
        })
    }
}

/// Group joined rows by pipe id, preserving the order rows arrived in.
fn group_rows(rows: Vec<PipeVersionRow>) -> Vec<PipeWithVersions> {
    let mut grouped: Vec<PipeWithVersions> = Vec::new();

    for row in rows {
        let version = row.version();

        match grouped.last_mut() {
            Some(last) if last.pipe.id == row.id => {
                if let Some(version) = version {
                    last.versions.push(version);
                }
            }
            _ => {
                grouped.push(PipeWithVersions {
                    pipe: row.pipe(),
                    versions: version.into_iter().collect(),
                });
            }
        }
    }

    grouped
}

/// Slice a grouped listing by 1-indexed page and limit.
fn page_slice(grouped: Vec<PipeWithVersions>, page: i64, limit: i64) -> Vec<PipeWithVersions> {
    let offset = (page - 1).saturating_mul(limit).max(0) as usize;
    grouped
        .into_iter()
        .skip(offset)
        .take(limit.max(0) as usize)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(pipe_id: i64, version_id: Option<i64>) -> PipeVersionRow {
        let now = chrono::Utc::now();
        PipeVersionRow {
            id: pipe_id,
            name: format!("pipe-{}", pipe_id),
            description: None,
            created_at: now,
            updated_at: now,
            version_id,
            version_number: version_id.map(|v| format!("1.0.{}", v)),
            asset_url: version_id.map(|_| String::new()),
            env_schema: version_id.map(|_| serde_json::json!({})),
            version_created_at: version_id.map(|_| now),
            version_updated_at: version_id.map(|_| now),
        }
    }

    #[test]
    fn test_filter_defaults() {
        let filter = PipeFilter::new(None, None, None);
        assert_eq!(filter.page, 1);
        assert_eq!(filter.limit, 10);
        assert_eq!(filter.offset(), 0);
        assert!(filter.search_pattern().is_none());
    }

    #[test]
    fn test_filter_clamps_and_offsets() {
        let filter = PipeFilter::new(Some("foo".to_string()), Some(3), Some(20));
        assert_eq!(filter.offset(), 40);
        assert_eq!(filter.search_pattern().unwrap(), "%foo%");

        let clamped = PipeFilter::new(Some(String::new()), Some(0), Some(-5));
        assert_eq!(clamped.page, 1);
        assert_eq!(clamped.limit, 1);
        assert!(clamped.search.is_none());
    }

    #[test]
    fn test_filter_offset_saturates() {
        let filter = PipeFilter::new(None, Some(i64::MAX), Some(i64::MAX));
        assert_eq!(filter.offset(), i64::MAX);
    }

    #[test]
    fn test_group_rows_preserves_arrival_order() {
        let rows = vec![
            row(2, Some(21)),
            row(2, Some(20)),
            row(1, Some(10)),
            row(3, None),
        ];

        let grouped = group_rows(rows);
        assert_eq!(grouped.len(), 3);
        assert_eq!(grouped[0].pipe.id, 2);
        assert_eq!(grouped[0].versions.len(), 2);
        assert_eq!(grouped[0].versions[0].id, 21);
        assert_eq!(grouped[1].pipe.id, 1);
        assert_eq!(grouped[1].versions.len(), 1);
        assert_eq!(grouped[2].pipe.id, 3);
        assert!(grouped[2].versions.is_empty());
    }

    #[test]
    fn test_page_slice_groups_not_rows() {
        let rows: Vec<PipeVersionRow> = (1..=5)
            .flat_map(|pipe_id| vec![row(pipe_id, Some(pipe_id * 10)), row(pipe_id, Some(pipe_id * 10 + 1))])
            .collect();

        let grouped = group_rows(rows);
        assert_eq!(grouped.len(), 5);

        let page = page_slice(grouped, 2, 2);
        assert_eq!(page.len(), 2);
        assert_eq!(page[0].pipe.id, 3);
        assert_eq!(page[1].pipe.id, 4);
    }

    #[test]
    fn test_page_slice_past_end_is_empty() {
        let grouped = group_rows(vec![row(1, None)]);
        assert!(page_slice(grouped, 5, 10).is_empty());
    }
}
