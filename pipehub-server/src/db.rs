use sqlx::{PgPool, postgres::PgPoolOptions};
use std::time::Duration;

pub async fn create_pool(database_url: &str) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .acquire_timeout(Duration::from_secs(5))
        .connect(database_url)
        .await
}

pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::Error> {
    // Create pipes table. `name` carries the upsert key and is declared
    // unique so concurrent registrations cannot create duplicate pipes.
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS pipes (
            id BIGSERIAL PRIMARY KEY,
            name VARCHAR(255) NOT NULL UNIQUE,
            description TEXT,
            created_at TIMESTAMPTZ NOT NULL,
            updated_at TIMESTAMPTZ NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    // Create versions table. Version numbers are unique per pipe, not
    // globally; deleting a pipe cascades to its versions.
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS versions (
            id BIGSERIAL PRIMARY KEY,
            pipe_id BIGINT NOT NULL REFERENCES pipes(id) ON DELETE CASCADE,
            version_number VARCHAR(100) NOT NULL,
            asset_url TEXT NOT NULL DEFAULT '',
            env_schema JSONB NOT NULL DEFAULT '{}',
            created_at TIMESTAMPTZ NOT NULL,
            updated_at TIMESTAMPTZ NOT NULL,
            UNIQUE (pipe_id, version_number)
        )
        "#,
    )
    .execute(pool)
    .await?;

    // Create indexes for better query performance
    sqlx::query("CREATE INDEX IF NOT EXISTS idx_pipes_created_at ON pipes(created_at DESC)")
        .execute(pool)
        .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_versions_pipe_id ON versions(pipe_id)")
        .execute(pool)
        .await?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_versions_created_at ON versions(pipe_id, created_at DESC)",
    )
    .execute(pool)
    .await?;

    tracing::info!("Database migrations completed successfully");
    Ok(())
}
