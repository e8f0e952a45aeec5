mod chat;
mod config;
mod errors;
mod llm_client;
mod routes;
mod search;
mod state;
mod store;

use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::http::HeaderValue;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::llm_client::LlmClient;
use crate::routes::build_router;
use crate::search::importer::setup_collection;
use crate::state::AppState;
use crate::store::typesense::TypesenseClient;

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

    info!("Starting AI-Powered Job Search API v{}", env!("CARGO_PKG_VERSION"));

    // One store client and one LLM client for the whole process
    let store = TypesenseClient::new(&config.typesense)
        .context("Failed to build Typesense client")?;
    info!(
        "Typesense client initialized ({}, collection '{}')",
        config.typesense.base_url(),
        config.typesense.collection
    );

    let llm = LlmClient::new(
        config.openai_api_key.clone(),
        config.openai_base_url.clone(),
        config.openai_model.clone(),
    )
    .context("Failed to build LLM client")?;
    info!("LLM client initialized (model: {})", llm.model());

    // Create and populate the collection on first start
    match setup_collection(&store, Path::new(&config.data_file), &config.columns).await {
        Ok(outcome) => info!("Collection setup: {:?}", outcome),
        Err(e) => error!("Collection setup failed, serving anyway: {e}"),
    }

    let cors = build_cors(&config.cors_origins);

    let state = AppState {
        store: Arc::new(store),
        llm: Arc::new(llm),
        config: config.clone(),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// CORS for the configured frontend origins. Unparsable origins are skipped.
fn build_cors(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|o| {
            o.parse::<HeaderValue>()
                .inspect_err(|_| warn!("Ignoring invalid CORS origin '{o}'"))
                .ok()
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(Any)
        .allow_headers(Any)
}
