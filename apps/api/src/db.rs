use anyhow::{Context, Result};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing::info;

const SCHEMA: [&str; 3] = [
    r#"
    CREATE TABLE IF NOT EXISTS resume_jobs (
        id BIGSERIAL PRIMARY KEY,
        job_id VARCHAR(64) NOT NULL UNIQUE,
        filename VARCHAR(512) NOT NULL,
        status VARCHAR(32) NOT NULL,
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        completed_at TIMESTAMPTZ,
        error_message TEXT,
        candidate_name VARCHAR(256),
        candidate_email VARCHAR(256),
        extracted_json JSONB
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_resume_jobs_status ON resume_jobs (status)",
    "CREATE INDEX IF NOT EXISTS idx_resume_jobs_created_at ON resume_jobs (created_at DESC)",
];

/// Creates and returns a PostgreSQL connection pool.
pub async fn create_pool(database_url: &str) -> Result<PgPool> {
    info!("Connecting to PostgreSQL...");

    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(database_url)
        .await?;

    info!("PostgreSQL connection pool established");
    Ok(pool)
}

/// Creates the job table and its indexes if they do not exist yet.
pub async fn ensure_schema(pool: &PgPool) -> Result<()> {
    for statement in SCHEMA {
        sqlx::query(statement)
            .execute(pool)
            .await
            .context("Failed to apply resume_jobs schema")?;
    }

    info!("resume_jobs schema ready");
    Ok(())
}
