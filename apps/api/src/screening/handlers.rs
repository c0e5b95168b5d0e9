use axum::{extract::State, Json};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::screening::{ScreeningCriteria, ScreeningResult};
use crate::screening::batch::batch_screen;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct BatchScreeningRequest {
    pub job_ids: Vec<String>,
    #[serde(default)]
    pub criteria: ScreeningCriteria,
    #[serde(default)]
    pub include_unqualified: bool,
}

#[derive(Debug, Serialize)]
pub struct BatchScreeningResponse {
    pub screening_id: String,
    /// Number of job ids requested, not the number that could be screened.
    pub total_resumes: usize,
    pub qualified_count: usize,
    pub results: Vec<ScreeningResult>,
    pub screening_criteria: ScreeningCriteria,
    pub completed_at: DateTime<Utc>,
}

/// POST /api/v1/screen-resumes
pub async fn handle_screen_resumes(
    State(state): State<AppState>,
    Json(req): Json<BatchScreeningRequest>,
) -> Result<Json<BatchScreeningResponse>, AppError> {
    if req.job_ids.is_empty() {
        return Err(AppError::Validation("No job IDs provided".to_string()));
    }

    let screening_id = Uuid::new_v4().to_string();
    info!(
        "Screening {} resumes (screening {screening_id})",
        req.job_ids.len()
    );

    let results = batch_screen(
        state.jobs.as_ref(),
        &state.screener,
        &req.job_ids,
        &req.criteria,
        req.include_unqualified,
        state.lookup_timeout(),
    )
    .await;

    Ok(Json(BatchScreeningResponse {
        screening_id,
        total_resumes: req.job_ids.len(),
        qualified_count: results.iter().filter(|r| r.qualified).count(),
        results,
        screening_criteria: req.criteria,
        completed_at: Utc::now(),
    }))
}
