use std::time::Duration;

use anyhow::Context;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use tracing::info;

/// DDL for the single table backing the to-do API. `id` comes from a sequence so values
/// are never handed out twice, even after the row they belonged to is deleted.
pub const TASKS_TABLE_DDL: &str = r#"
CREATE TABLE IF NOT EXISTS tasks (
    id SERIAL PRIMARY KEY,
    task VARCHAR(256) NOT NULL
)
"#;

/// Builds a connection pool for the PostgreSQL database at [db_url]. Connections are
/// established eagerly so a bad URL fails at startup rather than on the first request.
pub async fn connect_sqlx(db_url: &str) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(20)
        .acquire_timeout(Duration::from_secs(2))
        .connect(db_url)
        .await
}

/// Creates the tables the application needs if they don't already exist
pub async fn create_schema(pool: &PgPool) -> Result<(), anyhow::Error> {
    sqlx::query(TASKS_TABLE_DDL)
        .execute(pool)
        .await
        .context("creating the tasks table")?;
    info!("Database schema is ready");

    Ok(())
}
