use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;

use crate::models::resume::Resume;

/// Lifecycle of an extraction job. Serialized as the upper-case labels clients already use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum JobStatus {
    Pending,
    Processing,
    Success,
    Error,
}

impl JobStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Pending => "PENDING",
            JobStatus::Processing => "PROCESSING",
            JobStatus::Success => "SUCCESS",
            JobStatus::Error => "ERROR",
        }
    }

    /// Coarse progress percentage reported by the status endpoint.
    pub fn progress(&self) -> u8 {
        match self {
            JobStatus::Pending => 0,
            JobStatus::Processing => 50,
            JobStatus::Success | JobStatus::Error => 100,
        }
    }
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for JobStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "PENDING" => Ok(JobStatus::Pending),
            "PROCESSING" => Ok(JobStatus::Processing),
            "SUCCESS" => Ok(JobStatus::Success),
            "ERROR" => Ok(JobStatus::Error),
            _ => Err(format!("Invalid job status: {s}")),
        }
    }
}

/// An uploaded resume and whatever the extraction provider has produced for it so far.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionJob {
    pub job_id: String,
    pub filename: String,
    pub status: JobStatus,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    pub error_message: Option<String>,
    pub extracted_data: Option<Resume>,
}

impl ExtractionJob {
    pub fn pending(job_id: String, filename: String) -> Self {
        Self {
            job_id,
            filename,
            status: JobStatus::Pending,
            created_at: Utc::now(),
            completed_at: None,
            error_message: None,
            extracted_data: None,
        }
    }

    /// The extracted resume, only when extraction finished successfully.
    pub fn completed_resume(&self) -> Option<&Resume> {
        match self.status {
            JobStatus::Success => self.extracted_data.as_ref(),
            _ => None,
        }
    }
}

/// Row shape of the `resume_jobs` table.
#[derive(Debug, Clone, FromRow)]
pub struct ResumeJobRow {
    pub job_id: String,
    pub filename: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    pub error_message: Option<String>,
    pub extracted_json: Option<Json<serde_json::Value>>,
}
