//! Database pool initialization.
//!
//! The pool is established at most once per process and reused: `connect_once`
//! is backed by a `tokio::sync::OnceCell`, so concurrent callers during startup
//! all receive the same pool and the connection/migration work runs exactly
//! once.

use anyhow::{Context, Result};
use clipstream_core::Config;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::path::Path;
use std::time::Duration;
use tokio::sync::OnceCell;

static POOL: OnceCell<PgPool> = OnceCell::const_new();

/// Connect to Postgres and run pending migrations, initializing the
/// process-wide pool on first call. Subsequent calls return the same pool.
pub async fn connect_once(config: &Config) -> Result<PgPool> {
    let pool = POOL
        .get_or_try_init(|| async { setup_pool(config).await })
        .await?;
    Ok(pool.clone())
}

async fn setup_pool(config: &Config) -> Result<PgPool> {
    tracing::info!("Connecting to database...");
    let pool = PgPoolOptions::new()
        .max_connections(config.db_max_connections())
        .acquire_timeout(Duration::from_secs(config.db_timeout_seconds()))
        .idle_timeout(Duration::from_secs(600))
        .max_lifetime(Duration::from_secs(1800))
        .connect(config.database_url())
        .await?;

    tracing::info!(
        max_connections = config.db_max_connections(),
        "Database connected successfully"
    );

    // Run pending migrations on startup (path: workspace migrations/ from crate root)
    let migrations_dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../migrations");
    let migrator = sqlx::migrate::Migrator::new(migrations_dir)
        .await
        .context("Failed to load migrations")?;
    migrator
        .run(&pool)
        .await
        .context("Failed to run database migrations")?;
    tracing::info!("Database migrations applied");

    Ok(pool)
}
