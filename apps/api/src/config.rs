use std::collections::HashMap;
use std::str::FromStr;

use anyhow::{bail, Context, Result};

use crate::jobs::uploads::UploadRules;
use crate::screening::experience::EstimatorKind;
use crate::screening::scorer::ScoringWeights;

const DEFAULT_MAX_FILE_SIZE: usize = 10 * 1024 * 1024;
const DEFAULT_EXTENSIONS: &str = ".pdf,.docx,.doc,.txt";

/// Which job store backs the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobStoreKind {
    Postgres,
    Memory,
}

impl FromStr for JobStoreKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(JobStoreKind::Postgres),
            "memory" | "in_memory" => Ok(JobStoreKind::Memory),
            other => Err(format!("Unknown job store: {other}")),
        }
    }
}

/// Application configuration loaded from environment variables.
/// Startup fails if required variables are missing or malformed.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: Option<String>,
    pub job_store: JobStoreKind,
    pub extraction_api_url: String,
    pub extraction_api_key: String,
    pub extraction_agent_name: String,
    pub extraction_timeout_secs: u64,
    pub lookup_timeout_secs: u64,
    pub upload: UploadRules,
    pub weights: ScoringWeights,
    pub estimator: EstimatorKind,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup, so parsing can be exercised without touching the process env.
    pub fn from_lookup<F>(get: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = get("DATABASE_URL").filter(|url| !url.trim().is_empty());

        let job_store = match get("JOB_STORE") {
            Some(raw) => raw.parse::<JobStoreKind>().map_err(anyhow::Error::msg)?,
            None if database_url.is_some() => JobStoreKind::Postgres,
            None => JobStoreKind::Memory,
        };
        if job_store == JobStoreKind::Postgres && database_url.is_none() {
            bail!("JOB_STORE=postgres requires DATABASE_URL");
        }

        let estimator = match get("EXPERIENCE_ESTIMATOR") {
            Some(raw) => raw.parse::<EstimatorKind>().map_err(anyhow::Error::msg)?,
            None => EstimatorKind::default(),
        };

        let max_file_size: usize = parse_or(&get, "MAX_FILE_SIZE", DEFAULT_MAX_FILE_SIZE)?;
        if max_file_size == 0 {
            bail!("MAX_FILE_SIZE must be positive");
        }

        Ok(Config {
            database_url,
            job_store,
            extraction_api_url: require(&get, "EXTRACTION_API_URL")?,
            extraction_api_key: require(&get, "EXTRACTION_API_KEY")?,
            extraction_agent_name: get("EXTRACTION_AGENT_NAME")
                .unwrap_or_else(|| "resume-screening".to_string()),
            extraction_timeout_secs: parse_or(&get, "EXTRACTION_TIMEOUT_SECS", 300)?,
            lookup_timeout_secs: parse_or(&get, "LOOKUP_TIMEOUT_SECS", 10)?,
            upload: UploadRules {
                allowed_extensions: parse_extensions(
                    &get("ALLOWED_FILE_EXTENSIONS").unwrap_or_else(|| DEFAULT_EXTENSIONS.to_string()),
                )?,
                max_file_size,
            },
            weights: parse_weights(&get)?,
            estimator,
            port: parse_or(&get, "PORT", 8000)?,
            rust_log: get("RUST_LOG").unwrap_or_else(|| "info".to_string()),
        })
    }
}

/// Comma-separated list; entries are lower-cased and given a leading dot.
pub fn parse_extensions(raw: &str) -> Result<Vec<String>> {
    let extensions: Vec<String> = raw
        .split(',')
        .map(|ext| ext.trim().to_lowercase())
        .filter(|ext| !ext.is_empty())
        .map(|ext| {
            if ext.starts_with('.') {
                ext
            } else {
                format!(".{ext}")
            }
        })
        .collect();

    if extensions.is_empty() {
        bail!("ALLOWED_FILE_EXTENSIONS cannot be empty");
    }
    Ok(extensions)
}

fn parse_weights<F>(get: &F) -> Result<ScoringWeights>
where
    F: Fn(&str) -> Option<String>,
{
    let defaults = ScoringWeights::default();
    let weights = ScoringWeights {
        skills: parse_or(get, "SCORING_WEIGHT_SKILLS", defaults.skills)?,
        experience: parse_or(get, "SCORING_WEIGHT_EXPERIENCE", defaults.experience)?,
        education: parse_or(get, "SCORING_WEIGHT_EDUCATION", defaults.education)?,
        accomplishments: parse_or(get, "SCORING_WEIGHT_ACCOMPLISHMENTS", defaults.accomplishments)?,
    };

    let named = HashMap::from([
        ("SCORING_WEIGHT_SKILLS", weights.skills),
        ("SCORING_WEIGHT_EXPERIENCE", weights.experience),
        ("SCORING_WEIGHT_EDUCATION", weights.education),
        ("SCORING_WEIGHT_ACCOMPLISHMENTS", weights.accomplishments),
    ]);
    for (key, value) in named {
        if !value.is_finite() || value < 0.0 {
            bail!("{key} must be a non-negative number, got {value}");
        }
    }

    Ok(weights)
}

fn parse_or<F, T>(get: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match get(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("{key} has an invalid value '{raw}'")),
        None => Ok(default),
    }
}

fn require<F>(get: &F, key: &str) -> Result<String>
where
    F: Fn(&str) -> Option<String>,
{
    get(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}
