//! Border lookup server for the map UI.
//!
//! Loads the country border dataset in the background and answers
//! click-to-country resolution, the country list and border geometry.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use axum::{
    routing::{get, post},
    Router,
};
use clap::Parser;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use gazetteer::config::Config;
use gazetteer::{BorderHandle, CodeOverrides, DatasetSource};

mod handlers;
use handlers::{
    border_handler, countries_handler, health_handler, reload_handler, resolve_handler,
};

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

#[derive(Parser, Debug)]
#[command(name = "serve")]
#[command(about = "Country border lookup server")]
struct Args {
    /// TOML config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Listen address (overrides config)
    #[arg(short, long)]
    listen: Option<String>,

    /// Border dataset path or URL (overrides config)
    #[arg(long)]
    dataset: Option<String>,
}

/// Application state shared across handlers
pub struct AppState {
    pub borders: BorderHandle,
    pub source: DatasetSource,
    pub overrides: CodeOverrides,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let args = Args::parse();
    let config = Config::load_or_default(args.config.as_ref())?;

    let listen = args.listen.unwrap_or_else(|| config.server.listen.clone());
    let source = match &args.dataset {
        Some(dataset) => DatasetSource::parse(dataset),
        None => config.dataset_source(),
    };

    info!("Gazetteer Border Server");

    let state = Arc::new(AppState {
        borders: BorderHandle::new(),
        source,
        overrides: config.code_overrides(),
    });

    // Load in the background; clicks get `not_ready` until this finishes
    let loader = Arc::clone(&state);
    tokio::spawn(async move {
        if loader
            .borders
            .reload(&loader.source, &loader.overrides)
            .await
            .is_err()
        {
            warn!("Map-click resolution disabled until POST /v1/borders/reload succeeds");
        }
    });

    // Build router
    let app = Router::new()
        .route("/health", get(health_handler))
        .route("/v1/resolve", get(resolve_handler))
        .route("/v1/countries", get(countries_handler))
        .route("/v1/countries/{code}/border", get(border_handler))
        .route("/v1/borders/reload", post(reload_handler))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    info!("Starting server on {}", listen);

    let listener = tokio::net::TcpListener::bind(&listen).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
