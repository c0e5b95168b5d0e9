use axum::{
    extract::{Multipart, Path, Query, State},
    Json,
};
use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{info, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::extraction::pipeline::spawn_extraction;
use crate::jobs::uploads::MAX_BULK_FILES;
use crate::models::job::{ExtractionJob, JobStatus};
use crate::models::resume::Resume;
use crate::state::AppState;

const DEFAULT_PAGE_SIZE: i64 = 20;
const MAX_PAGE_SIZE: i64 = 100;

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub job_id: String,
    pub filename: String,
    pub file_size: usize,
    pub upload_time: DateTime<Utc>,
    pub status: JobStatus,
}

#[derive(Debug, Serialize)]
pub struct UploadFailure {
    pub filename: String,
    pub error: String,
}

#[derive(Debug, Serialize)]
pub struct BulkUploadResponse {
    pub total_files: usize,
    pub successful_uploads: usize,
    pub failed_uploads: usize,
    pub job_ids: Vec<String>,
    pub errors: Vec<UploadFailure>,
}

#[derive(Debug, Deserialize)]
pub struct ExtractionRequest {
    pub job_id: String,
}

#[derive(Debug, Serialize)]
pub struct ExtractionResponse {
    pub job_id: String,
    pub status: JobStatus,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extracted_data: Option<Resume>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_details: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct JobStatusResponse {
    pub job_id: String,
    pub filename: String,
    pub status: JobStatus,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    pub progress: u8,
}

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub page: Option<i64>,
    pub page_size: Option<i64>,
    pub status: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ResumeListResponse {
    pub total_count: usize,
    pub page: usize,
    pub page_size: usize,
    pub total_pages: usize,
    pub resumes: Vec<ExtractionJob>,
}

struct UploadedFile {
    filename: Option<String>,
    content: Bytes,
}

impl UploadedFile {
    fn display_name(&self) -> String {
        self.filename.clone().unwrap_or_else(|| "unknown".to_string())
    }
}

/// Reads every multipart field called `field_name`.
async fn read_files(multipart: &mut Multipart, field_name: &str) -> Result<Vec<UploadedFile>, AppError> {
    let mut files = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid multipart body: {e}")))?
    {
        if field.name() != Some(field_name) {
            continue;
        }

        let filename = field.file_name().map(str::to_string);
        let content = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(format!("File validation failed: {e}")))?;

        files.push(UploadedFile { filename, content });
    }

    Ok(files)
}

/// Validates the file, records a PENDING job and starts extraction in the background.
async fn accept_upload(state: &AppState, file: UploadedFile) -> Result<UploadResponse, AppError> {
    state
        .config
        .upload
        .validate(file.filename.as_deref(), file.content.len())
        .map_err(AppError::Validation)?;

    let filename = file.display_name();
    let file_size = file.content.len();
    let job_id = Uuid::new_v4().to_string();

    let job = state.jobs.create(&job_id, &filename).await?;

    spawn_extraction(
        state.jobs.clone(),
        state.extractor.clone(),
        job_id.clone(),
        filename.clone(),
        file.content,
        state.extraction_timeout(),
    );

    info!("Accepted upload {filename} ({file_size} bytes) as job {job_id}");

    Ok(UploadResponse {
        job_id,
        filename,
        file_size,
        upload_time: job.created_at,
        status: job.status,
    })
}

async fn find_job(state: &AppState, job_id: &str) -> Result<ExtractionJob, AppError> {
    state
        .jobs
        .get(job_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Job not found".to_string()))
}

/// POST /api/v1/upload-resume
pub async fn handle_upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, AppError> {
    let file = read_files(&mut multipart, "file")
        .await?
        .into_iter()
        .next()
        .ok_or_else(|| AppError::Validation("No file provided".to_string()))?;

    Ok(Json(accept_upload(&state, file).await?))
}

/// POST /api/v1/bulk-upload
pub async fn handle_bulk_upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<BulkUploadResponse>, AppError> {
    let files = read_files(&mut multipart, "files").await?;

    if files.is_empty() {
        return Err(AppError::Validation("No files provided".to_string()));
    }
    if files.len() > MAX_BULK_FILES {
        return Err(AppError::Validation(format!(
            "Too many files. Maximum {MAX_BULK_FILES} files allowed."
        )));
    }

    let total_files = files.len();
    let mut job_ids = Vec::new();
    let mut errors = Vec::new();

    for file in files {
        let filename = file.display_name();
        match accept_upload(&state, file).await {
            Ok(upload) => job_ids.push(upload.job_id),
            Err(e) => {
                let error = match e {
                    AppError::Validation(msg) | AppError::NotFound(msg) => msg,
                    other => other.to_string(),
                };
                warn!("Bulk upload rejected {filename}: {error}");
                errors.push(UploadFailure { filename, error });
            }
        }
    }

    Ok(Json(BulkUploadResponse {
        total_files,
        successful_uploads: job_ids.len(),
        failed_uploads: errors.len(),
        job_ids,
        errors,
    }))
}

/// POST /api/v1/extract-resume-data
pub async fn handle_extraction_status(
    State(state): State<AppState>,
    Json(req): Json<ExtractionRequest>,
) -> Result<Json<ExtractionResponse>, AppError> {
    let job = find_job(&state, &req.job_id).await?;

    let response = match job.status {
        JobStatus::Success => ExtractionResponse {
            job_id: job.job_id,
            status: job.status,
            message: "Extraction completed successfully".to_string(),
            extracted_data: job.extracted_data,
            error_details: None,
        },
        JobStatus::Error => ExtractionResponse {
            job_id: job.job_id,
            status: job.status,
            message: "Extraction failed".to_string(),
            extracted_data: None,
            error_details: job.error_message,
        },
        status => ExtractionResponse {
            job_id: job.job_id,
            status,
            message: format!("Extraction is {}", status.as_str().to_lowercase()),
            extracted_data: None,
            error_details: None,
        },
    };

    Ok(Json(response))
}

/// GET /api/v1/resume/:job_id
pub async fn handle_job_status(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
) -> Result<Json<JobStatusResponse>, AppError> {
    let job = find_job(&state, &job_id).await?;

    Ok(Json(JobStatusResponse {
        progress: job.status.progress(),
        job_id: job.job_id,
        filename: job.filename,
        status: job.status,
        created_at: job.created_at,
        completed_at: job.completed_at,
    }))
}

/// GET /api/v1/resume/:job_id/data
pub async fn handle_job_data(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
) -> Result<Json<Resume>, AppError> {
    let job = find_job(&state, &job_id).await?;

    if job.status != JobStatus::Success {
        return Err(AppError::Validation(format!(
            "Data not available. Job status: {}",
            job.status
        )));
    }

    job.extracted_data
        .map(Json)
        .ok_or_else(|| AppError::NotFound("No extracted data available".to_string()))
}

/// DELETE /api/v1/resume/:job_id
pub async fn handle_delete_job(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
) -> Result<Json<Value>, AppError> {
    if !state.jobs.delete(&job_id).await? {
        return Err(AppError::NotFound("Job not found".to_string()));
    }

    Ok(Json(json!({
        "message": format!("Resume {job_id} deleted successfully")
    })))
}

/// GET /api/v1/resumes
///
/// Fetches one row past the page to learn whether another page exists, so
/// `total_count` is a lower bound rather than an exact count.
pub async fn handle_list_jobs(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<ResumeListResponse>, AppError> {
    let page = query.page.unwrap_or(1);
    let page_size = query.page_size.unwrap_or(DEFAULT_PAGE_SIZE);

    if page < 1 {
        return Err(AppError::Validation("page must be at least 1".to_string()));
    }
    if !(1..=MAX_PAGE_SIZE).contains(&page_size) {
        return Err(AppError::Validation(format!(
            "page_size must be between 1 and {MAX_PAGE_SIZE}"
        )));
    }

    let status_filter = query
        .status
        .as_deref()
        .filter(|s| !s.trim().is_empty())
        .map(str::parse::<JobStatus>)
        .transpose()
        .map_err(AppError::Validation)?;

    let (page, page_size) = (page as usize, page_size as usize);
    let offset = (page - 1)
        .checked_mul(page_size)
        .filter(|offset| {
            offset
                .checked_add(page_size + 1)
                .is_some_and(|end| i64::try_from(end).is_ok())
        })
        .ok_or_else(|| AppError::Validation("page is too large".to_string()))?;

    let mut jobs = state.jobs.list(page_size + 1, offset).await?;
    if let Some(status) = status_filter {
        jobs.retain(|job| job.status == status);
    }

    let has_more = jobs.len() > page_size;
    jobs.truncate(page_size);

    let total_count = jobs.len() + offset + usize::from(has_more);
    let total_pages = total_count.div_ceil(page_size);

    Ok(Json(ResumeListResponse {
        total_count,
        page,
        page_size,
        total_pages,
        resumes: jobs,
    }))
}
