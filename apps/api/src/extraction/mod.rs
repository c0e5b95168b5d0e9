//! Client for the third-party document-extraction provider.
//!
//! The provider receives the raw resume file and returns structured JSON
//! matching [`Resume`]. Everything else in the service talks to it through
//! the [`ResumeExtractor`] trait.

pub mod pipeline;

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, warn};

use crate::jobs::uploads::mime_type_for;
use crate::models::resume::Resume;

const MAX_RETRIES: u32 = 3;
const REQUEST_TIMEOUT_SECS: u64 = 120;

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Extraction API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("No data could be extracted from the file")]
    NoData,

    #[error("Data validation failed: {0}")]
    Validation(String),

    #[error("Extraction timed out after {0}s")]
    Timeout(u64),
}

#[async_trait]
pub trait ResumeExtractor: Send + Sync {
    async fn extract(&self, filename: &str, content: Bytes) -> Result<Resume, ExtractionError>;

    /// Name of the extraction agent/schema requested from the provider.
    fn agent_name(&self) -> &str;
}

#[derive(Debug, Deserialize)]
struct ExtractResponse {
    #[serde(default)]
    data: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct ProviderError {
    #[serde(alias = "detail")]
    message: String,
}

/// Turns the provider's `data` payload into a [`Resume`].
pub fn parse_payload(data: Option<serde_json::Value>) -> Result<Resume, ExtractionError> {
    let data = match data {
        None | Some(serde_json::Value::Null) => return Err(ExtractionError::NoData),
        Some(serde_json::Value::Object(map)) if map.is_empty() => {
            return Err(ExtractionError::NoData)
        }
        Some(value) => value,
    };

    serde_json::from_value(data).map_err(|e| ExtractionError::Validation(e.to_string()))
}

/// Posts documents to `{base_url}/extract` as multipart form data.
#[derive(Clone)]
pub struct HttpResumeExtractor {
    client: Client,
    base_url: String,
    api_key: String,
    agent: String,
}

impl HttpResumeExtractor {
    pub fn new(base_url: &str, api_key: String, agent: String) -> Result<Self, ExtractionError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            agent,
        })
    }

    fn form(&self, filename: &str, content: &Bytes) -> Result<Form, ExtractionError> {
        let part = Part::bytes(content.to_vec())
            .file_name(filename.to_string())
            .mime_str(mime_type_for(filename))?;

        Ok(Form::new()
            .part("file", part)
            .text("agent", self.agent.clone()))
    }
}

#[async_trait]
impl ResumeExtractor for HttpResumeExtractor {
    /// Retries on 429 and 5xx with exponential backoff (1s, 2s).
    async fn extract(&self, filename: &str, content: Bytes) -> Result<Resume, ExtractionError> {
        let url = format!("{}/extract", self.base_url);
        let mut last_error: Option<ExtractionError> = None;

        for attempt in 0..MAX_RETRIES {
            if attempt > 0 {
                let delay = Duration::from_millis(1000 * (1 << (attempt - 1)));
                warn!(
                    "Extraction attempt {} for {} failed, retrying after {}ms...",
                    attempt,
                    filename,
                    delay.as_millis()
                );
                tokio::time::sleep(delay).await;
            }

            let response = self
                .client
                .post(&url)
                .bearer_auth(&self.api_key)
                .multipart(self.form(filename, &content)?)
                .send()
                .await;

            let response = match response {
                Ok(r) => r,
                Err(e) => {
                    last_error = Some(ExtractionError::Http(e));
                    continue;
                }
            };

            let status = response.status();

            if status.as_u16() == 429 || status.is_server_error() {
                let body = response.text().await.unwrap_or_default();
                warn!("Extraction API returned {}: {}", status, body);
                last_error = Some(ExtractionError::Api {
                    status: status.as_u16(),
                    message: body,
                });
                continue;
            }

            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                let message = serde_json::from_str::<ProviderError>(&body)
                    .map(|e| e.message)
                    .unwrap_or(body);
                return Err(ExtractionError::Api {
                    status: status.as_u16(),
                    message,
                });
            }

            let payload: ExtractResponse = response.json().await?;
            debug!("Extraction API responded for {filename}");
            return parse_payload(payload.data);
        }

        Err(last_error.unwrap_or(ExtractionError::Api {
            status: 0,
            message: format!("Extraction failed after {MAX_RETRIES} attempts"),
        }))
    }

    fn agent_name(&self) -> &str {
        &self.agent
    }
}
