use crate::auth::upload_token;
use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;
use axum::{extract::State, response::IntoResponse, Json};
use clipstream_core::models::UploadAuth;
use clipstream_core::{AppError, Config};
use std::sync::Arc;

/// Issue an authorization for one direct-to-CDN upload
#[utoipa::path(
    get,
    path = "/api/v0/upload/auth",
    tag = "uploads",
    responses(
        (status = 200, description = "Upload authorization issued", body = UploadAuth),
        (status = 500, description = "CDN keys not configured", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state), fields(operation = "issue_upload_auth"))]
pub async fn issue_upload_auth(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpAppError> {
    let auth = issue_from_config(&state.config)?;

    tracing::debug!(expire = auth.expire, "Issued upload authorization");

    Ok(Json(auth))
}

/// Issue an authorization from configuration; stateless apart from reading the
/// CDN keys, which are checked at request time.
pub(crate) fn issue_from_config(config: &Config) -> Result<UploadAuth, AppError> {
    let private_key = config
        .cdn_private_key()
        .ok_or_else(|| AppError::Configuration("CDN_PRIVATE_KEY is not set".to_string()))?;

    // Clients also need the public key configured on their side; refusing here
    // keeps a half-configured deployment from issuing unusable tokens.
    config
        .cdn_public_key()
        .ok_or_else(|| AppError::Configuration("CDN_PUBLIC_KEY is not set".to_string()))?;

    upload_token::issue(private_key, config.upload_token_ttl_secs())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clipstream_core::{BaseConfig, ErrorMetadata, ServiceConfig};

    fn test_config(private_key: Option<&str>, public_key: Option<&str>) -> Config {
        Config(Box::new(ServiceConfig {
            base: BaseConfig {
                server_port: 4100,
                cors_origins: vec!["*".to_string()],
                db_max_connections: 5,
                db_timeout_seconds: 5,
                environment: "test".to_string(),
            },
            database_url: "postgresql://localhost/clipstream_test".to_string(),
            cdn_private_key: private_key.map(|s| s.to_string()),
            cdn_public_key: public_key.map(|s| s.to_string()),
            cdn_upload_url: "https://upload.example.com/files".to_string(),
            upload_token_ttl_secs: 2400,
            max_video_size_bytes: 100 * 1024 * 1024,
            max_image_size_bytes: 5 * 1024 * 1024,
            video_allowed_content_types: vec!["video/mp4".to_string()],
            image_allowed_content_types: vec!["image/jpeg".to_string()],
            upload_timeout_secs: 300,
        }))
    }

    #[test]
    fn issues_auth_when_keys_configured() {
        let config = test_config(Some("private_key"), Some("public_key"));
        let auth = issue_from_config(&config).unwrap();

        assert_eq!(auth.token.len(), 40);
        assert_eq!(auth.signature.len(), 64);
        assert!(auth.expire > chrono::Utc::now().timestamp());
        assert!(auth.expire <= chrono::Utc::now().timestamp() + 2400);
    }

    #[test]
    fn missing_private_key_is_configuration_error() {
        let config = test_config(None, Some("public_key"));
        let err = issue_from_config(&config).unwrap_err();

        assert_eq!(err.error_code(), "CONFIGURATION_ERROR");
        assert_eq!(err.http_status_code(), 500);
    }

    #[test]
    fn missing_public_key_is_configuration_error() {
        let config = test_config(Some("private_key"), None);
        let err = issue_from_config(&config).unwrap_err();

        assert_eq!(err.error_code(), "CONFIGURATION_ERROR");
    }
}
