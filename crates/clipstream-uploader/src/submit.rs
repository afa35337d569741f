//! Submission orchestration: two concurrent uploads, one metadata create.
//!
//! The video and thumbnail each run as their own task with their own
//! authorization, policy check, and progress feed. The metadata record is
//! created exactly once, and only after both uploads reached Succeeded; a
//! failed or cancelled leg means no record is written.

use std::path::PathBuf;

use clipstream_core::models::{CreateVideoRequest, VideoResponse, VideoTransformation};
use clipstream_core::{AppError, UploadPolicy};
use tokio_util::sync::CancellationToken;

use crate::upload::{content_type_for_path, ProgressFn, UploadRequest, Uploader};
use crate::{ApiClient, UploaderSettings};

/// One video submission: the two local files plus descriptive fields.
#[derive(Debug, Clone)]
pub struct VideoSubmission {
    pub title: String,
    pub description: String,
    pub video_path: PathBuf,
    pub thumbnail_path: PathBuf,
    pub controls: bool,
    pub transformation: VideoTransformation,
}

fn request_for(
    path: PathBuf,
    folder: String,
    policy: UploadPolicy,
) -> Result<UploadRequest, AppError> {
    let content_type = content_type_for_path(&path)
        .ok_or_else(|| {
            AppError::InvalidInput(format!(
                "Cannot determine content type for {}",
                path.display()
            ))
        })?
        .to_string();

    Ok(UploadRequest {
        path,
        content_type,
        folder,
        policy,
    })
}

/// Upload video and thumbnail concurrently, then persist the metadata record.
pub async fn submit_video(
    api: &ApiClient,
    settings: &UploaderSettings,
    submission: VideoSubmission,
    cancel: CancellationToken,
    video_progress: Option<ProgressFn>,
    thumbnail_progress: Option<ProgressFn>,
) -> Result<VideoResponse, AppError> {
    let video_request = request_for(
        submission.video_path,
        format!("{}/videos", settings.folder),
        UploadPolicy::video(),
    )?;
    let thumbnail_request = request_for(
        submission.thumbnail_path,
        format!("{}/thumbnails", settings.folder),
        UploadPolicy::image(),
    )?;

    let mut video_uploader = Uploader::new(api.clone(), settings);
    if let Some(f) = video_progress {
        video_uploader = video_uploader.with_progress(f);
    }
    let mut thumbnail_uploader = Uploader::new(api.clone(), settings);
    if let Some(f) = thumbnail_progress {
        thumbnail_uploader = thumbnail_uploader.with_progress(f);
    }

    let video_task = tokio::spawn({
        let cancel = cancel.child_token();
        async move { video_uploader.upload(&video_request, cancel).await }
    });
    let thumbnail_task = tokio::spawn({
        let cancel = cancel.child_token();
        async move { thumbnail_uploader.upload(&thumbnail_request, cancel).await }
    });

    let (video_join, thumbnail_join) = tokio::join!(video_task, thumbnail_task);

    let video_file = video_join
        .map_err(|e| AppError::Internal(format!("Video upload task failed: {}", e)))??;
    let thumbnail_file = thumbnail_join
        .map_err(|e| AppError::Internal(format!("Thumbnail upload task failed: {}", e)))??;

    // Single serialization point: both uploads resolved, write the record once.
    let request = CreateVideoRequest {
        title: submission.title,
        description: submission.description,
        video_url: video_file.url,
        thumbnail_url: thumbnail_file.url,
        controls: submission.controls,
        transformation: submission.transformation,
    };

    api.create_video(&request).await.map_err(AppError::from)
}
