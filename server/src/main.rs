//! Parlo Content Server - serves the content library over HTTP.
//!
//! The server holds the active library snapshot in memory and exposes read
//! endpoints for clients plus an operator endpoint that hot-reloads the
//! content directory through the parlo-content pipeline.

mod auth;
mod config;
mod error;
mod handlers;
mod prompts;
mod routes;

use crate::config::Config;
use crate::prompts::PromptCache;
use axum::Router;
use parlo_content::{ReloadCoordinator, SnapshotStore, ValidatorOptions};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<SnapshotStore>,
    pub coordinator: Arc<ReloadCoordinator>,
    pub config: Arc<Config>,
    pub prompts: Arc<PromptCache>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "parlo_server=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = Config::from_env()?;

    tracing::info!("Starting Parlo Server on {}:{}", config.host, config.port);

    // Build application state
    let store = Arc::new(SnapshotStore::new());
    let prompts = Arc::new(PromptCache::new(&config.prompt_dir));

    let options = ValidatorOptions {
        strict_tag_limit: config.strict_tag_limit,
    };
    let hook_cache = Arc::clone(&prompts);
    let coordinator = Arc::new(
        ReloadCoordinator::new(&config.content_dir, Arc::clone(&store))
            .with_options(options)
            .on_invalidate(move || hook_cache.invalidate()),
    );

    // Load content once at boot. A bad root is not fatal: the server comes
    // up on the empty generation-zero library and operators reload later.
    let boot = Arc::clone(&coordinator);
    match tokio::task::spawn_blocking(move || boot.reload()).await? {
        Ok(report) => tracing::info!(
            books = report.books_loaded,
            courses = report.courses_loaded,
            decks = report.decks_loaded,
            errors = report.errors.len(),
            "initial content load complete"
        ),
        Err(e) => tracing::error!("initial content load failed: {e}; serving empty library"),
    }

    let state = AppState {
        store,
        coordinator,
        config: Arc::new(config.clone()),
        prompts,
    };

    // Build router
    let app = Router::new()
        .merge(routes::create_routes())
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state);

    // Start server
    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
