use async_trait::async_trait;
use thiserror::Error;

use crate::models::job::{ExtractionJob, JobStatus};
use crate::models::resume::Resume;

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("Job {0} not found")]
    NotFound(String),

    #[error("Job {0} already exists")]
    Conflict(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid stored record: {0}")]
    InvalidRecord(String),
}

/// Number of jobs per status, for health reporting.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusCounts {
    pub total: u64,
    pub pending: u64,
    pub processing: u64,
    pub success: u64,
    pub error: u64,
}

impl StatusCounts {
    pub fn record(&mut self, status: JobStatus, count: u64) {
        self.total += count;
        match status {
            JobStatus::Pending => self.pending += count,
            JobStatus::Processing => self.processing += count,
            JobStatus::Success => self.success += count,
            JobStatus::Error => self.error += count,
        }
    }
}

/// Storage for extraction jobs. Injected into handlers through `AppState`;
/// the backing store is chosen once at startup.
#[async_trait]
pub trait JobRepository: Send + Sync {
    /// Inserts a new PENDING job.
    async fn create(&self, job_id: &str, filename: &str) -> Result<ExtractionJob, RepositoryError>;

    async fn get(&self, job_id: &str) -> Result<Option<ExtractionJob>, RepositoryError>;

    /// Newest first.
    async fn list(&self, limit: usize, offset: usize) -> Result<Vec<ExtractionJob>, RepositoryError>;

    async fn mark_processing(&self, job_id: &str) -> Result<(), RepositoryError>;

    async fn mark_success(&self, job_id: &str, resume: &Resume) -> Result<(), RepositoryError>;

    async fn mark_error(&self, job_id: &str, message: &str) -> Result<(), RepositoryError>;

    /// Returns whether a job was removed.
    async fn delete(&self, job_id: &str) -> Result<bool, RepositoryError>;

    async fn status_counts(&self) -> Result<StatusCounts, RepositoryError>;

    /// Label of the backing store ("postgres", "memory").
    fn backend(&self) -> &'static str;
}
