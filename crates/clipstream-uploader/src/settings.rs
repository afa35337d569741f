//! Uploader-side configuration read from the environment.

use anyhow::Result;
use std::time::Duration;

const UPLOAD_TIMEOUT_SECS: u64 = 300;

/// CDN destination and transfer settings for the upload client.
#[derive(Clone, Debug)]
pub struct UploaderSettings {
    /// CDN multipart upload endpoint
    pub cdn_upload_url: String,
    /// Public key identifying the CDN account; sent with every upload
    pub cdn_public_key: String,
    /// Destination folder tag at the CDN
    pub folder: String,
    /// Upper bound for one transfer
    pub upload_timeout: Duration,
}

impl UploaderSettings {
    pub fn from_env() -> Result<Self> {
        let cdn_upload_url = std::env::var("CDN_UPLOAD_URL")
            .unwrap_or_else(|_| "https://upload.imagekit.io/api/v1/files/upload".to_string());

        let cdn_public_key = std::env::var("CDN_PUBLIC_KEY")
            .map_err(|_| anyhow::anyhow!("CDN_PUBLIC_KEY must be set for uploads"))?;

        let folder =
            std::env::var("CLIPSTREAM_UPLOAD_FOLDER").unwrap_or_else(|_| "clipstream".to_string());

        let upload_timeout = Duration::from_secs(
            std::env::var("UPLOAD_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(UPLOAD_TIMEOUT_SECS),
        );

        Ok(Self {
            cdn_upload_url,
            cdn_public_key,
            folder,
            upload_timeout,
        })
    }
}
