use crate::auth::password;
use crate::error::{ErrorResponse, HttpAppError, ValidatedJson};
use crate::state::AppState;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use clipstream_core::models::{RegisterRequest, RegisterResponse};
use clipstream_core::AppError;
use std::sync::Arc;
use validator::Validate;

/// Register a new user
#[utoipa::path(
    post,
    path = "/api/v0/auth/register",
    tag = "auth",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User registered", body = RegisterResponse),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 409, description = "Email already registered", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, request), fields(operation = "register_user"))]
pub async fn register(
    State(state): State<Arc<AppState>>,
    ValidatedJson(request): ValidatedJson<RegisterRequest>,
) -> Result<impl IntoResponse, HttpAppError> {
    request.validate().map_err(AppError::from)?;

    // Early duplicate check for a friendly error; the unique index on
    // users.email remains the final arbiter under concurrent registration.
    if state.users.email_exists(&request.email).await? {
        return Err(HttpAppError::from(AppError::Conflict(
            "A user with this email already exists".to_string(),
        )));
    }

    // Hash before constructing the record; the plaintext never reaches the
    // repository or the logs.
    let password_hash = password::hash_password(&request.password)?;

    let user = state
        .users
        .create(request.name, request.email, password_hash)
        .await?;

    tracing::info!(user_id = %user.id, "User registered");

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            message: "User registered successfully".to_string(),
        }),
    ))
}
