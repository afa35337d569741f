//! Health check handlers.

use crate::state::AppState;
use axum::{http::StatusCode, response::IntoResponse, Json};
use std::sync::Arc;
use std::time::Duration;

#[derive(serde::Serialize)]
struct HealthCheckResponse {
    status: String,
    database: String,
}

/// Liveness plus a database ping.
pub async fn health_check(state: Arc<AppState>) -> impl IntoResponse {
    let database = match tokio::time::timeout(
        Duration::from_secs(5),
        sqlx::query("SELECT 1").execute(&state.pool),
    )
    .await
    {
        Ok(Ok(_)) => "healthy".to_string(),
        Ok(Err(e)) => format!("unhealthy: {}", e),
        Err(_) => "timeout".to_string(),
    };

    let healthy = database == "healthy";
    let status = if healthy { "ok" } else { "degraded" };

    let code = if healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        code,
        Json(HealthCheckResponse {
            status: status.to_string(),
            database,
        }),
    )
}
