pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::jobs::handlers;
use crate::jobs::uploads::MAX_BULK_FILES;
use crate::screening::handlers::handle_screen_resumes;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let body_limit = state
        .config
        .upload
        .max_file_size
        .saturating_mul(MAX_BULK_FILES);

    Router::new()
        .route("/", get(health::root_handler))
        .route("/health", get(health::health_handler))
        // Upload & extraction
        .route("/api/v1/upload-resume", post(handlers::handle_upload))
        .route("/api/v1/bulk-upload", post(handlers::handle_bulk_upload))
        .route(
            "/api/v1/extract-resume-data",
            post(handlers::handle_extraction_status),
        )
        // Jobs
        .route(
            "/api/v1/resume/:job_id",
            get(handlers::handle_job_status).delete(handlers::handle_delete_job),
        )
        .route("/api/v1/resume/:job_id/data", get(handlers::handle_job_data))
        .route("/api/v1/resumes", get(handlers::handle_list_jobs))
        // Screening
        .route("/api/v1/screen-resumes", post(handle_screen_resumes))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Arc;

    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::{header, Method, Request, StatusCode};
    use bytes::Bytes;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use crate::config::Config;
    use crate::extraction::{ExtractionError, ResumeExtractor};
    use crate::jobs::memory::InMemoryJobRepository;
    use crate::jobs::repository::JobRepository;
    use crate::models::resume::{Resume, TechnicalSkills};
    use crate::screening::scorer::Screener;

    struct NoDataExtractor;

    #[async_trait]
    impl ResumeExtractor for NoDataExtractor {
        async fn extract(&self, _filename: &str, _content: Bytes) -> Result<Resume, ExtractionError> {
            Err(ExtractionError::NoData)
        }

        fn agent_name(&self) -> &str {
            "stub"
        }
    }

    fn test_state() -> (AppState, Arc<InMemoryJobRepository>) {
        let vars = HashMap::from([
            ("EXTRACTION_API_URL", "http://localhost:9"),
            ("EXTRACTION_API_KEY", "test-key"),
            ("MAX_FILE_SIZE", "1024"),
        ]);
        let config = Config::from_lookup(|key| vars.get(key).map(|v| v.to_string())).unwrap();
        let repo = Arc::new(InMemoryJobRepository::new());

        let state = AppState {
            jobs: repo.clone(),
            extractor: Arc::new(NoDataExtractor),
            screener: Arc::new(Screener::default()),
            config,
        };
        (state, repo)
    }

    fn rustacean(name: &str, skills: &[&str]) -> Resume {
        Resume {
            name: name.to_string(),
            email: format!("{}@example.com", name.to_lowercase()),
            links: vec![],
            experience: vec![],
            education: vec![],
            technical_skills: TechnicalSkills {
                programming_languages: skills.iter().map(|s| s.to_string()).collect(),
                frameworks: vec![],
                skills: vec![],
            },
            key_accomplishments: String::new(),
        }
    }

    async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value = if body.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&body).unwrap()
        };
        (status, value)
    }

    fn get_request(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn multipart_upload(uri: &str, field: &str, filename: &str, content: &str) -> Request<Body> {
        let body = format!(
            "--BOUNDARY\r\n\
             Content-Disposition: form-data; name=\"{field}\"; filename=\"{filename}\"\r\n\
             Content-Type: application/octet-stream\r\n\r\n\
             {content}\r\n\
             --BOUNDARY--\r\n"
        );
        Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header(header::CONTENT_TYPE, "multipart/form-data; boundary=BOUNDARY")
            .body(Body::from(body))
            .unwrap()
    }

    #[tokio::test]
    async fn test_health_reports_memory_store() {
        let (state, repo) = test_state();
        repo.create("job-1", "a.pdf").await.unwrap();

        let (status, body) = send(build_router(state), get_request("/health")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["job_store"], "memory");
        assert_eq!(body["jobs"]["pending"], 1);
    }

    #[tokio::test]
    async fn test_unknown_job_is_404() {
        let (state, _) = test_state();
        let app = build_router(state);

        let (status, body) = send(app.clone(), get_request("/api/v1/resume/nope")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["code"], "NOT_FOUND");

        let delete = Request::builder()
            .method(Method::DELETE)
            .uri("/api/v1/resume/nope")
            .body(Body::empty())
            .unwrap();
        let (status, _) = send(app, delete).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_data_of_pending_job_is_400() {
        let (state, repo) = test_state();
        repo.create("job-1", "a.pdf").await.unwrap();

        let (status, body) = send(build_router(state), get_request("/api/v1/resume/job-1/data")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["message"], "Data not available. Job status: PENDING");
    }

    #[tokio::test]
    async fn test_extraction_status_messages() {
        let (state, repo) = test_state();
        repo.create("job-1", "a.pdf").await.unwrap();
        repo.mark_error("job-1", "No data could be extracted from the file")
            .await
            .unwrap();

        let (status, body) = send(
            build_router(state),
            post_json("/api/v1/extract-resume-data", json!({"job_id": "job-1"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ERROR");
        assert_eq!(body["message"], "Extraction failed");
        assert_eq!(body["error_details"], "No data could be extracted from the file");
    }

    #[tokio::test]
    async fn test_empty_batch_is_rejected() {
        let (state, _) = test_state();
        let (status, body) = send(
            build_router(state),
            post_json("/api/v1/screen-resumes", json!({"job_ids": []})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["message"], "No job IDs provided");
    }

    #[tokio::test]
    async fn test_batch_screening_round_trip() {
        let (state, repo) = test_state();
        for (id, resume) in [
            ("strong", rustacean("Ferris", &["Rust", "Go"])),
            ("weak", rustacean("Gopher", &["Go"])),
        ] {
            repo.create(id, "cv.pdf").await.unwrap();
            repo.mark_success(id, &resume).await.unwrap();
        }
        repo.create("pending", "cv.pdf").await.unwrap();

        let request = post_json(
            "/api/v1/screen-resumes",
            json!({
                "job_ids": ["weak", "missing", "pending", "strong"],
                "criteria": {"required_skills": ["rust"]},
                "include_unqualified": true
            }),
        );
        let (status, body) = send(build_router(state), request).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["total_resumes"], 4);
        let results = body["results"].as_array().unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0]["candidate_name"], "Ferris");
        assert_eq!(results[0]["matched_required_skills"], json!(["rust"]));
        assert_eq!(results[1]["missing_required_skills"], json!(["rust"]));
        assert_eq!(body["screening_criteria"]["required_skills"], json!(["rust"]));
    }

    #[tokio::test]
    async fn test_list_validates_paging() {
        let (state, repo) = test_state();
        for i in 0..3 {
            repo.create(&format!("job-{i}"), "cv.pdf").await.unwrap();
        }
        let app = build_router(state);

        let (status, _) = send(app.clone(), get_request("/api/v1/resumes?page=0")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        let (status, _) = send(app.clone(), get_request("/api/v1/resumes?page_size=101")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, body) = send(app, get_request("/api/v1/resumes?page=1&page_size=2")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["resumes"].as_array().unwrap().len(), 2);
        assert_eq!(body["total_count"], 3);
        assert_eq!(body["total_pages"], 2);
    }

    #[tokio::test]
    async fn test_list_rejects_page_beyond_addressable_range() {
        let (state, _) = test_state();
        let (status, body) = send(
            build_router(state),
            get_request("/api/v1/resumes?page=9223372036854775807&page_size=100"),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["message"], "page is too large");
    }

    #[tokio::test]
    async fn test_upload_creates_pending_job() {
        let (state, repo) = test_state();
        let (status, body) = send(
            build_router(state),
            multipart_upload("/api/v1/upload-resume", "file", "cv.txt", "Jane Doe"),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "PENDING");
        assert_eq!(body["file_size"], 8);
        let job_id = body["job_id"].as_str().unwrap();
        assert!(repo.get(job_id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_upload_with_bad_extension_is_rejected() {
        let (state, _) = test_state();
        let (status, body) = send(
            build_router(state),
            multipart_upload("/api/v1/upload-resume", "file", "cv.exe", "MZ"),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        let message = body["error"]["message"].as_str().unwrap();
        assert!(message.starts_with("File validation failed: File extension .exe not allowed"));
    }

    #[tokio::test]
    async fn test_bulk_upload_reports_per_file_errors() {
        let (state, _) = test_state();
        let body = "--BOUNDARY\r\n\
             Content-Disposition: form-data; name=\"files\"; filename=\"a.pdf\"\r\n\r\n\
             one\r\n\
             --BOUNDARY\r\n\
             Content-Disposition: form-data; name=\"files\"; filename=\"b.png\"\r\n\r\n\
             two\r\n\
             --BOUNDARY--\r\n";
        let request = Request::builder()
            .method(Method::POST)
            .uri("/api/v1/bulk-upload")
            .header(header::CONTENT_TYPE, "multipart/form-data; boundary=BOUNDARY")
            .body(Body::from(body))
            .unwrap();

        let (status, body) = send(build_router(state), request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["total_files"], 2);
        assert_eq!(body["successful_uploads"], 1);
        assert_eq!(body["errors"][0]["filename"], "b.png");
    }
}
