//! Video repository: metadata record creation and feed listing.

use clipstream_core::models::{Video, VideoRow, VideoTransformation};
use clipstream_core::AppError;
use sqlx::{PgPool, Postgres};
use uuid::Uuid;

#[derive(Clone)]
pub struct VideoRepository {
    pool: PgPool,
}

impl VideoRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert exactly one video record and return it. The insert is a single
    /// statement, so a failure leaves no partial record behind.
    #[tracing::instrument(
        skip(self, title, description, video_url, thumbnail_url, transformation),
        fields(db.table = "videos", db.operation = "insert")
    )]
    pub async fn create(
        &self,
        title: String,
        description: String,
        video_url: String,
        thumbnail_url: String,
        controls: bool,
        transformation: VideoTransformation,
    ) -> Result<Video, AppError> {
        let id = Uuid::new_v4();

        let row = sqlx::query_as::<Postgres, VideoRow>(
            r#"
            INSERT INTO videos (
                id, title, description, video_url, thumbnail_url, controls,
                transform_width, transform_height, transform_quality
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING id, title, description, video_url, thumbnail_url, controls,
                      transform_width, transform_height, transform_quality, created_at
            "#,
        )
        .bind(id)
        .bind(title)
        .bind(description)
        .bind(video_url)
        .bind(thumbnail_url)
        .bind(controls)
        .bind(transformation.width)
        .bind(transformation.height)
        .bind(transformation.quality)
        .fetch_one(&self.pool)
        .await?;

        Ok(Video::from(row))
    }

    /// List all videos in insertion order.
    #[tracing::instrument(skip(self), fields(db.table = "videos", db.operation = "select"))]
    pub async fn list(&self) -> Result<Vec<Video>, AppError> {
        let rows = sqlx::query_as::<Postgres, VideoRow>(
            r#"
            SELECT id, title, description, video_url, thumbnail_url, controls,
                   transform_width, transform_height, transform_quality, created_at
            FROM videos
            ORDER BY created_at ASC, id ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Video::from).collect())
    }
}
