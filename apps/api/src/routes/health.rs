use axum::{extract::State, Json};
use chrono::Utc;
use serde_json::{json, Value};
use tracing::warn;

use crate::state::AppState;

/// GET /health
/// Reports job store reachability and job counts; `degraded` when the store cannot be queried.
pub async fn health_handler(State(state): State<AppState>) -> Json<Value> {
    let (status, store_status, jobs) = match state.jobs.status_counts().await {
        Ok(counts) => (
            "healthy",
            "healthy",
            json!({
                "total": counts.total,
                "pending": counts.pending,
                "processing": counts.processing,
                "success": counts.success,
                "error": counts.error,
            }),
        ),
        Err(e) => {
            warn!("Health check could not query job store: {e}");
            ("degraded", "unhealthy", Value::Null)
        }
    };

    Json(json!({
        "status": status,
        "timestamp": Utc::now(),
        "version": env!("CARGO_PKG_VERSION"),
        "job_store": state.jobs.backend(),
        "dependencies": {
            "job_store": store_status,
            "extraction_agent": state.extractor.agent_name(),
            "experience_estimator": state.screener.estimator_name(),
        },
        "jobs": jobs,
    }))
}

/// GET /
pub async fn root_handler() -> Json<Value> {
    Json(json!({
        "message": "Resume Screening API",
        "version": env!("CARGO_PKG_VERSION"),
        "health_url": "/health",
        "status": "online"
    }))
}
