//! Hybrid Scan Server
//!
//! HTTP boundary for the hybrid fusion decision engine.
//!
//! # Routes
//!
//! ```text
//! GET  /health                  liveness + loaded model count
//! GET  /api/v1/config           active weights, thresholds, cut points, models
//! POST /api/v1/scan             fuse branch scores, explain, log
//! GET  /api/v1/logs             recent detection log rows
//! GET  /api/v1/logs/:id/report  report for a stored scan
//! POST /api/v1/report           report for a posted scan result
//! ```

mod config;
mod models;
mod handlers;
mod error;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use axum::{
    Router,
    routing::{get, post},
};
use tower_http::{
    cors::{CorsLayer, Any},
    trace::TraceLayer,
    compression::CompressionLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use hybrid_scan_core::{
    DecisionAssembler, DetectionConfig, HistoryStore, ModelRegistry, SqliteHistoryStore,
};

pub use error::{AppError, AppResult};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = config::Config::from_env();

    init_tracing(&config);

    tracing::info!("Hybrid Scan Server starting...");
    tracing::info!("Models: {}", config.models_dir.display());
    tracing::info!("History: {}", config.history_db.display());

    let detection = DetectionConfig::from_env().context("Invalid detection policy")?;
    let registry = ModelRegistry::load_dir(&config.models_dir)
        .with_context(|| format!("Failed to load models from {}", config.models_dir.display()))?;
    let assembler = DecisionAssembler::new(Arc::new(registry), detection)
        .context("Failed to build decision assembler")?;

    let history = SqliteHistoryStore::open(&config.history_db)
        .context("Failed to open detection log")?;

    let state = AppState {
        assembler: Arc::new(assembler),
        history: Arc::new(history),
        config: config.clone(),
    };

    let app = create_router(state);

    let ip = config.host.parse().context("Invalid HOST")?;
    let addr = SocketAddr::new(ip, config.port);
    tracing::info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}

fn init_tracing(config: &config::Config) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "hybrid_scan_server=debug,hybrid_scan_core=info,tower_http=debug".into());

    if config.is_production() {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub assembler: Arc<DecisionAssembler>,
    pub history: Arc<dyn HistoryStore>,
    pub config: config::Config,
}

/// Create the main router with all routes
fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health::check))
        .route("/api/v1/config", get(handlers::config::get))
        .route("/api/v1/scan", post(handlers::scan::scan))
        .route("/api/v1/logs", get(handlers::history::list))
        .route("/api/v1/logs/:id/report", get(handlers::history::report))
        .route("/api/v1/report", post(handlers::reports::generate))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any)
        )
        .with_state(state)
}
