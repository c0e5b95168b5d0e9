use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use tracing::{error, info};

use crate::extraction::{ExtractionError, ResumeExtractor};
use crate::jobs::repository::{JobRepository, RepositoryError};
use crate::models::job::JobStatus;

/// Drives one job from PENDING to SUCCESS or ERROR. Returns the final status.
pub async fn run_extraction(
    jobs: &dyn JobRepository,
    extractor: &dyn ResumeExtractor,
    job_id: &str,
    filename: &str,
    content: Bytes,
    timeout: Duration,
) -> Result<JobStatus, RepositoryError> {
    jobs.mark_processing(job_id).await?;
    info!("Starting extraction for job {job_id}");

    let outcome = match tokio::time::timeout(timeout, extractor.extract(filename, content)).await {
        Ok(result) => result,
        Err(_) => Err(ExtractionError::Timeout(timeout.as_secs())),
    };

    match outcome {
        Ok(resume) => {
            jobs.mark_success(job_id, &resume).await?;
            info!("Successfully extracted data for job {job_id}");
            Ok(JobStatus::Success)
        }
        Err(e) => {
            error!("Extraction failed for job {job_id}: {e}");
            jobs.mark_error(job_id, &e.to_string()).await?;
            Ok(JobStatus::Error)
        }
    }
}

/// Runs [`run_extraction`] on a background task; repository failures are logged.
pub fn spawn_extraction(
    jobs: Arc<dyn JobRepository>,
    extractor: Arc<dyn ResumeExtractor>,
    job_id: String,
    filename: String,
    content: Bytes,
    timeout: Duration,
) {
    tokio::spawn(async move {
        if let Err(e) = run_extraction(
            jobs.as_ref(),
            extractor.as_ref(),
            &job_id,
            &filename,
            content,
            timeout,
        )
        .await
        {
            error!("Could not record extraction outcome for job {job_id}: {e}");
        }
    });
}
