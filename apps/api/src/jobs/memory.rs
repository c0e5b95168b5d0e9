use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use tracing::info;

use crate::jobs::repository::{JobRepository, RepositoryError, StatusCounts};
use crate::models::job::{ExtractionJob, JobStatus};
use crate::models::resume::Resume;

/// Process-local job store, used when no database is configured and in tests.
#[derive(Default)]
pub struct InMemoryJobRepository {
    jobs: RwLock<HashMap<String, (u64, ExtractionJob)>>,
    sequence: AtomicU64,
}

impl InMemoryJobRepository {
    pub fn new() -> Self {
        Self::default()
    }

    async fn update<F>(&self, job_id: &str, apply: F) -> Result<(), RepositoryError>
    where
        F: FnOnce(&mut ExtractionJob) + Send,
    {
        let mut jobs = self.jobs.write().await;
        let (_, job) = jobs
            .get_mut(job_id)
            .ok_or_else(|| RepositoryError::NotFound(job_id.to_string()))?;
        apply(job);
        Ok(())
    }
}

#[async_trait]
impl JobRepository for InMemoryJobRepository {
    async fn create(&self, job_id: &str, filename: &str) -> Result<ExtractionJob, RepositoryError> {
        let mut jobs = self.jobs.write().await;
        if jobs.contains_key(job_id) {
            return Err(RepositoryError::Conflict(job_id.to_string()));
        }

        let job = ExtractionJob::pending(job_id.to_string(), filename.to_string());
        let seq = self.sequence.fetch_add(1, Ordering::Relaxed);
        jobs.insert(job_id.to_string(), (seq, job.clone()));

        info!("Created in-memory extraction job {job_id} for file {filename}");
        Ok(job)
    }

    async fn get(&self, job_id: &str) -> Result<Option<ExtractionJob>, RepositoryError> {
        Ok(self.jobs.read().await.get(job_id).map(|(_, job)| job.clone()))
    }

    async fn list(&self, limit: usize, offset: usize) -> Result<Vec<ExtractionJob>, RepositoryError> {
        let jobs = self.jobs.read().await;
        let mut all: Vec<&(u64, ExtractionJob)> = jobs.values().collect();
        all.sort_by(|(seq_a, a), (seq_b, b)| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| seq_b.cmp(seq_a))
        });

        Ok(all
            .into_iter()
            .skip(offset)
            .take(limit)
            .map(|(_, job)| job.clone())
            .collect())
    }

    async fn mark_processing(&self, job_id: &str) -> Result<(), RepositoryError> {
        self.update(job_id, |job| job.status = JobStatus::Processing)
            .await
    }

    async fn mark_success(&self, job_id: &str, resume: &Resume) -> Result<(), RepositoryError> {
        let resume = resume.clone();
        self.update(job_id, move |job| {
            job.status = JobStatus::Success;
            job.completed_at = Some(Utc::now());
            job.error_message = None;
            job.extracted_data = Some(resume);
        })
        .await
    }

    async fn mark_error(&self, job_id: &str, message: &str) -> Result<(), RepositoryError> {
        let message = message.to_string();
        self.update(job_id, move |job| {
            job.status = JobStatus::Error;
            job.completed_at = Some(Utc::now());
            job.error_message = Some(message);
        })
        .await
    }

    async fn delete(&self, job_id: &str) -> Result<bool, RepositoryError> {
        let removed = self.jobs.write().await.remove(job_id).is_some();
        if removed {
            info!("Deleted in-memory job {job_id}");
        }
        Ok(removed)
    }

    async fn status_counts(&self) -> Result<StatusCounts, RepositoryError> {
        let jobs = self.jobs.read().await;
        let mut counts = StatusCounts::default();
        for (_, job) in jobs.values() {
            counts.record(job.status, 1);
        }
        Ok(counts)
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}
