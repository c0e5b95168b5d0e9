//! Batch screening: resolve identifiers, screen, filter, rank.
//!
//! Lookups run one at a time in caller order, each bounded by a timeout. A
//! failed, slow, missing or unfinished record is logged and skipped; it never
//! fails the batch. Ranking happens once every identifier has been handled.

use std::time::Duration;

use async_trait::async_trait;
use tracing::{info, warn};

use crate::jobs::repository::{JobRepository, RepositoryError};
use crate::models::job::ExtractionJob;
use crate::models::screening::{ScreeningCriteria, ScreeningResult};
use crate::screening::scorer::Screener;

/// Resolves a job identifier to its extraction record.
#[async_trait]
pub trait ResumeLookup: Send + Sync {
    async fn lookup(&self, job_id: &str) -> Result<Option<ExtractionJob>, RepositoryError>;
}

#[async_trait]
impl ResumeLookup for dyn JobRepository {
    async fn lookup(&self, job_id: &str) -> Result<Option<ExtractionJob>, RepositoryError> {
        self.get(job_id).await
    }
}

/// Screens every resolvable identifier and returns results ranked by overall score.
///
/// Ties keep the order in which identifiers were supplied.
pub async fn batch_screen<L>(
    lookup: &L,
    screener: &Screener,
    job_ids: &[String],
    criteria: &ScreeningCriteria,
    include_unqualified: bool,
    lookup_timeout: Duration,
) -> Vec<ScreeningResult>
where
    L: ResumeLookup + ?Sized,
{
    let mut results = Vec::with_capacity(job_ids.len());

    for job_id in job_ids {
        let job = match tokio::time::timeout(lookup_timeout, lookup.lookup(job_id)).await {
            Ok(Ok(Some(job))) => job,
            Ok(Ok(None)) => {
                warn!("Skipping {job_id}: job not found");
                continue;
            }
            Ok(Err(e)) => {
                warn!("Skipping {job_id}: lookup failed: {e}");
                continue;
            }
            Err(_) => {
                warn!(
                    "Skipping {job_id}: lookup timed out after {}ms",
                    lookup_timeout.as_millis()
                );
                continue;
            }
        };

        let Some(resume) = job.completed_resume() else {
            warn!("Skipping {job_id}: extraction status is {}", job.status);
            continue;
        };

        let result = screener.screen_resume(resume, criteria);
        if include_unqualified || result.qualified {
            results.push(result);
        }
    }

    results.sort_by(|a, b| b.overall_score.total_cmp(&a.overall_score));

    info!(
        "Batch screening finished: {} requested, {} returned",
        job_ids.len(),
        results.len()
    );
    results
}
