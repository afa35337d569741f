//! Domain methods for the Clipstream API client.
//!
//! Request and response types come from `clipstream_core::models`.

use crate::{api_prefix, ApiClient};
use anyhow::Result;
use clipstream_core::models::{
    CreateVideoRequest, RegisterRequest, RegisterResponse, UploadAuth, VideoResponse,
};

impl ApiClient {
    /// Register a new user.
    pub async fn register(
        &self,
        name: Option<&str>,
        email: &str,
        password: &str,
    ) -> Result<RegisterResponse> {
        let body = RegisterRequest {
            name: name.map(|s| s.to_string()),
            email: email.to_string(),
            password: password.to_string(),
        };
        self.post_json(&format!("{}/auth/register", api_prefix()), &body)
            .await
    }

    /// Fetch a fresh authorization for one direct-to-CDN upload.
    pub async fn upload_auth(&self) -> Result<UploadAuth> {
        self.get(&format!("{}/upload/auth", api_prefix()), &[])
            .await
    }

    /// Create a video metadata record once both uploads completed.
    pub async fn create_video(&self, request: &CreateVideoRequest) -> Result<VideoResponse> {
        self.post_json(&format!("{}/videos", api_prefix()), request)
            .await
    }

    /// List all videos in insertion order.
    pub async fn list_videos(&self) -> Result<Vec<VideoResponse>> {
        self.get(&format!("{}/videos", api_prefix()), &[]).await
    }
}
