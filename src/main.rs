// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Workout Map Log API Server
//!
//! Backs the map page: restores the stored workout log, takes the location
//! fix, and serves the page event API.

use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use workout_map_log::{config::Config, db::FileStore, AppState};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize structured JSON logging
    init_logging();

    // Load configuration from environment
    let config = Config::from_env()?;
    tracing::info!(port = config.port, "Starting Workout Map Log API");

    // Storage substrate
    let store = Arc::new(FileStore::new(&config.storage_dir));
    tracing::info!(dir = %config.storage_dir.display(), "Using file storage");

    let state = Arc::new(AppState::new(config.clone(), store));

    // Restore the stored log, then take the location fix
    if let Err(e) = state.start().await {
        tracing::warn!(error = %e, "Map not ready at startup");
    }

    // Build router
    let app = workout_map_log::routes::create_router(state);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Initialize structured JSON logging.
fn init_logging() {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("workout_map_log=debug".parse().unwrap())
                .add_directive("info".parse().unwrap()),
        )
        .with(format)
        .init();
}
