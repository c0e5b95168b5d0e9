use std::sync::Arc;
use std::time::Duration;

use crate::config::Config;
use crate::extraction::ResumeExtractor;
use crate::jobs::repository::JobRepository;
use crate::screening::scorer::Screener;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Job store chosen at startup (PostgreSQL or in-memory).
    pub jobs: Arc<dyn JobRepository>,
    pub extractor: Arc<dyn ResumeExtractor>,
    pub screener: Arc<Screener>,
    pub config: Config,
}

impl AppState {
    pub fn extraction_timeout(&self) -> Duration {
        Duration::from_secs(self.config.extraction_timeout_secs)
    }

    pub fn lookup_timeout(&self) -> Duration {
        Duration::from_secs(self.config.lookup_timeout_secs)
    }
}
