use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// Playback transformation applied by the CDN when serving the video.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema, Validate)]
pub struct VideoTransformation {
    #[validate(range(min = 1, message = "Width must be at least 1 pixel"))]
    pub width: i32,
    #[validate(range(min = 1, message = "Height must be at least 1 pixel"))]
    pub height: i32,
    /// 1..=100; omitted means the CDN default
    #[validate(range(min = 1, max = 100, message = "Quality must be between 1 and 100"))]
    pub quality: Option<i16>,
}

impl Default for VideoTransformation {
    fn default() -> Self {
        // Portrait reel dimensions, matching the upload form.
        Self {
            width: 1080,
            height: 1920,
            quality: None,
        }
    }
}

/// Video metadata record.
///
/// Both URLs point at completed CDN uploads; the record only exists once both
/// uploads resolved, and is immutable afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Video {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub video_url: String,
    pub thumbnail_url: String,
    pub controls: bool,
    pub transformation: VideoTransformation,
    pub created_at: DateTime<Utc>,
}

/// Flat database row for a video; transformation columns are folded into
/// [`VideoTransformation`] when converting to the domain model.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct VideoRow {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub video_url: String,
    pub thumbnail_url: String,
    pub controls: bool,
    pub transform_width: i32,
    pub transform_height: i32,
    pub transform_quality: Option<i16>,
    pub created_at: DateTime<Utc>,
}

impl From<VideoRow> for Video {
    fn from(row: VideoRow) -> Self {
        Video {
            id: row.id,
            title: row.title,
            description: row.description,
            video_url: row.video_url,
            thumbnail_url: row.thumbnail_url,
            controls: row.controls,
            transformation: VideoTransformation {
                width: row.transform_width,
                height: row.transform_height,
                quality: row.transform_quality,
            },
            created_at: row.created_at,
        }
    }
}

fn default_controls() -> bool {
    true
}

/// Request to create a video record after both uploads completed.
#[derive(Debug, Serialize, Deserialize, ToSchema, Validate)]
pub struct CreateVideoRequest {
    #[validate(length(
        min = 3,
        max = 100,
        message = "Title must be between 3 and 100 characters"
    ))]
    pub title: String,
    #[validate(length(
        min = 10,
        max = 5000,
        message = "Description must be between 10 and 5000 characters"
    ))]
    pub description: String,
    /// Fully-resolved CDN URL of the uploaded video
    #[validate(length(min = 1, message = "Video URL is required"))]
    #[validate(url(message = "Video URL must be a valid URL"))]
    pub video_url: String,
    /// Fully-resolved CDN URL of the uploaded thumbnail
    #[validate(length(min = 1, message = "Thumbnail URL is required"))]
    #[validate(url(message = "Thumbnail URL must be a valid URL"))]
    pub thumbnail_url: String,
    #[serde(default = "default_controls")]
    pub controls: bool,
    #[serde(default)]
    #[validate(nested)]
    pub transformation: VideoTransformation,
}

/// Video record returned by the API.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct VideoResponse {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub video_url: String,
    pub thumbnail_url: String,
    pub controls: bool,
    pub transformation: VideoTransformation,
    pub created_at: DateTime<Utc>,
}

impl From<Video> for VideoResponse {
    fn from(video: Video) -> Self {
        VideoResponse {
            id: video.id,
            title: video.title,
            description: video.description,
            video_url: video.video_url,
            thumbnail_url: video.thumbnail_url,
            controls: video.controls,
            transformation: video.transformation,
            created_at: video.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    fn valid_request() -> CreateVideoRequest {
        CreateVideoRequest {
            title: "My first clip".to_string(),
            description: "A short description of the clip.".to_string(),
            video_url: "https://cdn.example.com/clips/1718_video.mp4".to_string(),
            thumbnail_url: "https://cdn.example.com/clips/1718_thumb.jpg".to_string(),
            controls: true,
            transformation: VideoTransformation::default(),
        }
    }

    #[test]
    fn test_create_request_valid() {
        assert!(valid_request().validate().is_ok());
    }

    #[test]
    fn test_create_request_rejects_short_title() {
        let mut req = valid_request();
        req.title = "ab".to_string();
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_create_request_rejects_short_description() {
        let mut req = valid_request();
        req.description = "too short".to_string();
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_create_request_rejects_empty_urls() {
        let mut req = valid_request();
        req.video_url = String::new();
        assert!(req.validate().is_err());

        let mut req = valid_request();
        req.thumbnail_url = String::new();
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_create_request_rejects_out_of_range_quality() {
        let mut req = valid_request();
        req.transformation.quality = Some(0);
        assert!(req.validate().is_err());

        req.transformation.quality = Some(101);
        assert!(req.validate().is_err());

        req.transformation.quality = Some(100);
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_create_request_defaults() {
        let json = serde_json::json!({
            "title": "My first clip",
            "description": "A short description of the clip.",
            "video_url": "https://cdn.example.com/v.mp4",
            "thumbnail_url": "https://cdn.example.com/t.jpg"
        });
        let req: CreateVideoRequest = serde_json::from_value(json).expect("deserialize");
        assert!(req.controls);
        assert_eq!(req.transformation, VideoTransformation::default());
        assert_eq!(req.transformation.width, 1080);
        assert_eq!(req.transformation.height, 1920);
        assert_eq!(req.transformation.quality, None);
    }

    #[test]
    fn test_video_from_row_folds_transformation() {
        let row = VideoRow {
            id: Uuid::new_v4(),
            title: "Clip".to_string(),
            description: "Description of the clip.".to_string(),
            video_url: "https://cdn.example.com/v.mp4".to_string(),
            thumbnail_url: "https://cdn.example.com/t.jpg".to_string(),
            controls: false,
            transform_width: 640,
            transform_height: 360,
            transform_quality: Some(80),
            created_at: Utc::now(),
        };

        let video = Video::from(row.clone());
        assert_eq!(video.id, row.id);
        assert!(!video.controls);
        assert_eq!(video.transformation.width, 640);
        assert_eq!(video.transformation.height, 360);
        assert_eq!(video.transformation.quality, Some(80));
    }
}
