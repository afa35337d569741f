//! Application state shared across handlers.

use clipstream_core::Config;
use clipstream_db::{UserRepository, VideoRepository};
use sqlx::PgPool;

/// Main application state: pool, repositories, and configuration.
#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub users: UserRepository,
    pub videos: VideoRepository,
    pub config: Config,
    pub is_production: bool,
}

impl AppState {
    pub fn new(pool: PgPool, config: Config) -> Self {
        let is_production = config.is_production();
        Self {
            users: UserRepository::new(pool.clone()),
            videos: VideoRepository::new(pool.clone()),
            pool,
            config,
            is_production,
        }
    }
}

fn _assert_app_state_send_sync() {
    fn assert_send<T: Send>() {}
    fn assert_sync<T: Sync>() {}
    assert_send::<AppState>();
    assert_sync::<AppState>();
}
