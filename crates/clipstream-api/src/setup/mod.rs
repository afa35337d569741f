//! Application setup and initialization
//!
//! This module contains all application initialization logic extracted from main.rs
//! for better organization and testability.

pub mod routes;
pub mod server;

use crate::state::AppState;
use anyhow::{Context, Result};
use clipstream_core::Config;
use std::sync::Arc;

/// Initialize the entire application
pub async fn initialize_app(config: Config) -> Result<(Arc<AppState>, axum::Router)> {
    // Validate configuration first - fail fast on misconfiguration
    config
        .validate()
        .context("Configuration validation failed")?;

    crate::telemetry::init_telemetry();

    tracing::info!("Configuration loaded and validated successfully");

    if config.cdn_private_key().is_none() || config.cdn_public_key().is_none() {
        tracing::warn!(
            "CDN keys are not configured; upload authorization requests will fail until CDN_PRIVATE_KEY and CDN_PUBLIC_KEY are set"
        );
    }

    // Setup database (init-once pool, runs migrations)
    let pool = clipstream_db::connect_once(&config).await?;

    let state = Arc::new(AppState::new(pool, config.clone()));

    // Setup routes
    let router = routes::setup_routes(&config, state.clone()).await?;

    Ok((state, router))
}
