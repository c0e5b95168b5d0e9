use async_trait::async_trait;
use sqlx::types::Json;
use sqlx::PgPool;
use tracing::{info, warn};

use crate::jobs::repository::{JobRepository, RepositoryError, StatusCounts};
use crate::models::job::{ExtractionJob, JobStatus, ResumeJobRow};
use crate::models::resume::Resume;

const JOB_COLUMNS: &str =
    "job_id, filename, status, created_at, completed_at, error_message, extracted_json";

/// Listings skip the extracted payload.
const SUMMARY_COLUMNS: &str = "job_id, filename, status, created_at, completed_at, error_message, \
     NULL::jsonb AS extracted_json";

/// PostgreSQL-backed job store over the `resume_jobs` table.
#[derive(Clone)]
pub struct PgJobRepository {
    pool: PgPool,
}

impl PgJobRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl TryFrom<ResumeJobRow> for ExtractionJob {
    type Error = RepositoryError;

    fn try_from(row: ResumeJobRow) -> Result<Self, Self::Error> {
        let status: JobStatus = row
            .status
            .parse()
            .map_err(RepositoryError::InvalidRecord)?;

        let extracted_data = match row.extracted_json {
            Some(Json(value)) => match serde_json::from_value::<Resume>(value) {
                Ok(resume) => Some(resume),
                Err(e) => {
                    warn!("Stored resume data for job {} is unreadable: {e}", row.job_id);
                    None
                }
            },
            None => None,
        };

        Ok(ExtractionJob {
            job_id: row.job_id,
            filename: row.filename,
            status,
            created_at: row.created_at,
            completed_at: row.completed_at,
            error_message: row.error_message,
            extracted_data,
        })
    }
}

fn ensure_updated(job_id: &str, rows_affected: u64) -> Result<(), RepositoryError> {
    if rows_affected == 0 {
        return Err(RepositoryError::NotFound(job_id.to_string()));
    }
    Ok(())
}

#[async_trait]
impl JobRepository for PgJobRepository {
    async fn create(&self, job_id: &str, filename: &str) -> Result<ExtractionJob, RepositoryError> {
        let query = format!(
            "INSERT INTO resume_jobs (job_id, filename, status) VALUES ($1, $2, $3) \
             RETURNING {JOB_COLUMNS}"
        );

        let row = sqlx::query_as::<_, ResumeJobRow>(&query)
            .bind(job_id)
            .bind(filename)
            .bind(JobStatus::Pending.as_str())
            .fetch_one(&self.pool)
            .await
            .map_err(|e| match e {
                sqlx::Error::Database(ref db) if db.is_unique_violation() => {
                    RepositoryError::Conflict(job_id.to_string())
                }
                other => RepositoryError::Database(other),
            })?;

        info!("Created extraction job {job_id} for file {filename}");
        row.try_into()
    }

    async fn get(&self, job_id: &str) -> Result<Option<ExtractionJob>, RepositoryError> {
        let query = format!("SELECT {JOB_COLUMNS} FROM resume_jobs WHERE job_id = $1");

        let row = sqlx::query_as::<_, ResumeJobRow>(&query)
            .bind(job_id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(ExtractionJob::try_from).transpose()
    }

    async fn list(&self, limit: usize, offset: usize) -> Result<Vec<ExtractionJob>, RepositoryError> {
        let query = format!(
            "SELECT {SUMMARY_COLUMNS} FROM resume_jobs \
             ORDER BY created_at DESC, id DESC LIMIT $1 OFFSET $2"
        );

        let rows = sqlx::query_as::<_, ResumeJobRow>(&query)
            .bind(limit as i64)
            .bind(offset as i64)
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(ExtractionJob::try_from).collect()
    }

    async fn mark_processing(&self, job_id: &str) -> Result<(), RepositoryError> {
        let result = sqlx::query("UPDATE resume_jobs SET status = $2 WHERE job_id = $1")
            .bind(job_id)
            .bind(JobStatus::Processing.as_str())
            .execute(&self.pool)
            .await?;

        ensure_updated(job_id, result.rows_affected())
    }

    async fn mark_success(&self, job_id: &str, resume: &Resume) -> Result<(), RepositoryError> {
        let payload = serde_json::to_value(resume)?;

        let result = sqlx::query(
            r#"
            UPDATE resume_jobs
            SET status = $2,
                completed_at = NOW(),
                error_message = NULL,
                candidate_name = $3,
                candidate_email = $4,
                extracted_json = $5
            WHERE job_id = $1
            "#,
        )
        .bind(job_id)
        .bind(JobStatus::Success.as_str())
        .bind(&resume.name)
        .bind(&resume.email)
        .bind(Json(payload))
        .execute(&self.pool)
        .await?;

        ensure_updated(job_id, result.rows_affected())
    }

    async fn mark_error(&self, job_id: &str, message: &str) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            "UPDATE resume_jobs SET status = $2, completed_at = NOW(), error_message = $3 \
             WHERE job_id = $1",
        )
        .bind(job_id)
        .bind(JobStatus::Error.as_str())
        .bind(message)
        .execute(&self.pool)
        .await?;

        ensure_updated(job_id, result.rows_affected())
    }

    async fn delete(&self, job_id: &str) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM resume_jobs WHERE job_id = $1")
            .bind(job_id)
            .execute(&self.pool)
            .await?;

        let removed = result.rows_affected() > 0;
        if removed {
            info!("Deleted job {job_id}");
        }
        Ok(removed)
    }

    async fn status_counts(&self) -> Result<StatusCounts, RepositoryError> {
        let rows: Vec<(String, i64)> =
            sqlx::query_as("SELECT status, COUNT(*) FROM resume_jobs GROUP BY status")
                .fetch_all(&self.pool)
                .await?;

        let mut counts = StatusCounts::default();
        for (status, count) in rows {
            let status: JobStatus = status.parse().map_err(RepositoryError::InvalidRecord)?;
            counts.record(status, count.max(0) as u64);
        }
        Ok(counts)
    }

    fn backend(&self) -> &'static str {
        "postgres"
    }
}
