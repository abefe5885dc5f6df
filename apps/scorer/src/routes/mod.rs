pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    http::HeaderValue,
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tracing::warn;

use crate::analysis::handlers;
use crate::config::Config;
use crate::state::AppState;

/// Room for form fields and multipart framing on top of the two documents.
const MULTIPART_OVERHEAD: usize = 1024 * 1024;

pub fn build_router(state: AppState) -> Router {
    // resume and JD file may both be at the per-file limit
    let body_limit = state.config.max_file_size.saturating_mul(2) + MULTIPART_OVERHEAD;

    Router::new()
        .route("/health", get(health::health_handler))
        .route(
            "/api/v1/scoring/health",
            get(health::scoring_health_handler),
        )
        .route(
            "/api/v1/scoring/model-info",
            get(handlers::handle_model_info),
        )
        .route("/api/v1/scoring/analyze", post(handlers::handle_analyze))
        .route(
            "/api/v1/scoring/analyze-sync",
            post(handlers::handle_analyze_sync),
        )
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}

/// `*` allows any origin; otherwise only the listed origins.
pub fn cors_layer(config: &Config) -> CorsLayer {
    if config.allows_any_origin() {
        return CorsLayer::permissive();
    }
    let origins: Vec<HeaderValue> = config
        .cors_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin '{origin}'");
                None
            }
        })
        .collect();
    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(Any)
        .allow_headers(Any)
}
