mod config;
mod db;
mod errors;
mod extraction;
mod jobs;
mod models;
mod routes;
mod screening;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::{Config, JobStoreKind};
use crate::db::{create_pool, ensure_schema};
use crate::extraction::HttpResumeExtractor;
use crate::jobs::memory::InMemoryJobRepository;
use crate::jobs::postgres::PgJobRepository;
use crate::jobs::repository::JobRepository;
use crate::routes::build_router;
use crate::screening::scorer::Screener;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Resume Screener API v{}", env!("CARGO_PKG_VERSION"));

    let jobs = build_job_store(&config).await?;
    info!("Job store: {}", jobs.backend());

    let extractor = HttpResumeExtractor::new(
        &config.extraction_api_url,
        config.extraction_api_key.clone(),
        config.extraction_agent_name.clone(),
    )
    .context("Failed to build extraction client")?;
    info!(
        "Extraction client initialized (agent: {})",
        config.extraction_agent_name
    );

    let screener = Screener::new(config.weights, config.estimator.build());
    info!(
        "Screener initialized (weights: {:?}, experience estimator: {})",
        screener.weights(),
        screener.estimator_name()
    );

    let state = AppState {
        jobs,
        extractor: Arc::new(extractor),
        screener: Arc::new(screener),
        config: config.clone(),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn build_job_store(config: &Config) -> Result<Arc<dyn JobRepository>> {
    match (config.job_store, config.database_url.as_deref()) {
        (JobStoreKind::Postgres, Some(url)) => {
            let pool = create_pool(url).await?;
            ensure_schema(&pool).await?;
            Ok(Arc::new(PgJobRepository::new(pool)))
        }
        (JobStoreKind::Postgres, None) => anyhow::bail!("JOB_STORE=postgres requires DATABASE_URL"),
        (JobStoreKind::Memory, _) => Ok(Arc::new(InMemoryJobRepository::new())),
    }
}
