//! OpenAPI documentation.

use utoipa::OpenApi;

use crate::error;
use crate::handlers;
use clipstream_core::models;

pub fn get_openapi_spec() -> utoipa::openapi::OpenApi {
    ApiDoc::openapi()
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Clipstream API",
        version = "0.1.0",
        description = "Video-sharing API (v0): registration, direct-to-CDN upload authorization, and video metadata. All endpoints are versioned under /api/v0/."
    ),
    paths(
        handlers::register::register,
        handlers::upload_auth::issue_upload_auth,
        handlers::videos::create_video,
        handlers::videos::list_videos,
    ),
    components(schemas(
        models::user::RegisterRequest,
        models::user::RegisterResponse,
        models::upload_auth::UploadAuth,
        models::video::CreateVideoRequest,
        models::video::VideoResponse,
        models::video::VideoTransformation,
        error::ErrorResponse,
    )),
    tags(
        (name = "auth", description = "User registration"),
        (name = "uploads", description = "Direct-to-CDN upload authorization"),
        (name = "videos", description = "Video metadata and feed")
    )
)]
struct ApiDoc;
