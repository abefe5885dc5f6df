use std::sync::Arc;

use crate::analysis::Analyzer;
use crate::config::Config;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    /// Holds the similarity strategy selected at startup; read-only afterwards.
    pub analyzer: Arc<Analyzer>,
}

impl AppState {
    pub fn new(config: Config, analyzer: Analyzer) -> Self {
        Self {
            config: Arc::new(config),
            analyzer: Arc::new(analyzer),
        }
    }
}
