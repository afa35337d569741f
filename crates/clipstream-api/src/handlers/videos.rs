use crate::error::{ErrorResponse, HttpAppError, ValidatedJson};
use crate::state::AppState;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use clipstream_core::models::{CreateVideoRequest, VideoResponse};
use clipstream_core::AppError;
use std::sync::Arc;
use validator::Validate;

/// Create a video metadata record
#[utoipa::path(
    post,
    path = "/api/v0/videos",
    tag = "videos",
    request_body = CreateVideoRequest,
    responses(
        (status = 201, description = "Video record created", body = VideoResponse),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[tracing::instrument(
    skip(state, request),
    fields(operation = "create_video")
)]
pub async fn create_video(
    State(state): State<Arc<AppState>>,
    ValidatedJson(request): ValidatedJson<CreateVideoRequest>,
) -> Result<impl IntoResponse, HttpAppError> {
    // Validation rejects before any storage access.
    request.validate().map_err(AppError::from)?;

    let video = state
        .videos
        .create(
            request.title,
            request.description,
            request.video_url,
            request.thumbnail_url,
            request.controls,
            request.transformation,
        )
        .await?;

    tracing::info!(video_id = %video.id, "Video record created");

    Ok((StatusCode::CREATED, Json(VideoResponse::from(video))))
}

/// List all videos in insertion order
#[utoipa::path(
    get,
    path = "/api/v0/videos",
    tag = "videos",
    responses(
        (status = 200, description = "All video records", body = [VideoResponse]),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state), fields(operation = "list_videos"))]
pub async fn list_videos(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpAppError> {
    let videos = state.videos.list().await?;

    let responses: Vec<VideoResponse> = videos.into_iter().map(VideoResponse::from).collect();
    Ok(Json(responses))
}
