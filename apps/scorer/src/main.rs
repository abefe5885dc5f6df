mod analysis;
mod config;
mod errors;
mod extraction;
mod models;
mod routes;
mod scoring;
mod similarity;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::analysis::Analyzer;
use crate::config::Config;
use crate::routes::{build_router, cors_layer};
use crate::similarity::SimilarityEngine;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails fast on malformed env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting ATS scorer v{}", env!("CARGO_PKG_VERSION"));
    info!(
        "Scoring weights: keyword_match={} skills={} experience={} education={} formatting={}",
        config.weights.keyword_match,
        config.weights.skills,
        config.weights.experience,
        config.weights.education,
        config.weights.formatting
    );

    // Select the embedding strategy once; it never changes afterwards
    let similarity = SimilarityEngine::load(&config).await;
    let model_info = similarity.model_info();
    info!(
        "Similarity backend: {} ({}, dimension {})",
        model_info.status, model_info.model_name, model_info.embedding_dimension
    );

    let analyzer = Analyzer::new(&config, similarity);
    let cors = cors_layer(&config);
    let port = config.port;
    let state = AppState::new(config, analyzer);

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    let addr: SocketAddr = format!("0.0.0.0:{port}").parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
