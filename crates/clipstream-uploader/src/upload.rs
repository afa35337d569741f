//! Direct-to-CDN upload engine.
//!
//! One [`Uploader`] drives one file through the upload state machine:
//! policy check, authorization fetch, streamed multipart transfer with
//! progress accounting, and a single terminal state. Two uploaders running
//! concurrently share nothing but the API client's connection pool.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use clipstream_core::models::{UploadAuth, UploadedFile};
use clipstream_core::policy::sanitize_filename;
use clipstream_core::{AppError, UploadPolicy};
use futures::StreamExt;
use tokio::fs::File;
use tokio::sync::watch;
use tokio_util::io::ReaderStream;
use tokio_util::sync::CancellationToken;

use crate::progress::{ProgressMeter, UploadState};
use crate::{ApiClient, UploaderSettings};

/// Progress observer invoked with each new percentage.
pub type ProgressFn = Arc<dyn Fn(u8) + Send + Sync>;

/// One file to upload: local path, declared MIME type, destination folder,
/// and the policy it must satisfy.
#[derive(Debug, Clone)]
pub struct UploadRequest {
    pub path: PathBuf,
    pub content_type: String,
    pub folder: String,
    pub policy: UploadPolicy,
}

/// Uploads a single file directly to the CDN.
pub struct Uploader {
    api: ApiClient,
    cdn_upload_url: String,
    cdn_public_key: String,
    timeout: Duration,
    state_tx: watch::Sender<UploadState>,
    on_progress: Option<ProgressFn>,
}

impl Uploader {
    pub fn new(api: ApiClient, settings: &UploaderSettings) -> Self {
        let (state_tx, _) = watch::channel(UploadState::Idle);
        Self {
            api,
            cdn_upload_url: settings.cdn_upload_url.clone(),
            cdn_public_key: settings.cdn_public_key.clone(),
            timeout: settings.upload_timeout,
            state_tx,
            on_progress: None,
        }
    }

    /// Install a progress callback; called with each new percentage in [0,100].
    pub fn with_progress(mut self, on_progress: ProgressFn) -> Self {
        self.on_progress = Some(on_progress);
        self
    }

    /// Subscribe to state transitions for this upload.
    pub fn state(&self) -> watch::Receiver<UploadState> {
        self.state_tx.subscribe()
    }

    /// Run the upload to completion, cancellation, or failure.
    ///
    /// Exactly one terminal state is published: Succeeded with the public URL,
    /// Cancelled when `cancel` fired, Failed otherwise.
    pub async fn upload(
        &self,
        request: &UploadRequest,
        cancel: CancellationToken,
    ) -> Result<UploadedFile, AppError> {
        let result = self.run(request, &cancel).await;

        match &result {
            Ok(file) => {
                self.state_tx
                    .send_replace(UploadState::Succeeded(file.url.clone()));
            }
            Err(_) if cancel.is_cancelled() => {
                self.state_tx.send_replace(UploadState::Cancelled);
            }
            Err(err) => {
                self.state_tx
                    .send_replace(UploadState::Failed(err.to_string()));
            }
        }

        result
    }

    async fn run(
        &self,
        request: &UploadRequest,
        cancel: &CancellationToken,
    ) -> Result<UploadedFile, AppError> {
        // Policy is enforced before any network traffic: an oversized or
        // mistyped file never reaches the token endpoint or the CDN.
        let metadata = tokio::fs::metadata(&request.path).await.map_err(|e| {
            AppError::InvalidInput(format!(
                "Cannot read file {}: {}",
                request.path.display(),
                e
            ))
        })?;
        let file_size = metadata.len();
        request.policy.check(file_size as usize, &request.content_type)?;

        self.state_tx.send_replace(UploadState::RequestingAuth);
        let auth = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                return Err(AppError::Upload("upload cancelled".to_string()));
            }
            auth = self.api.upload_auth() => auth.map_err(|e| {
                AppError::Upload(format!("failed to obtain upload authorization: {}", e))
            })?,
        };

        self.state_tx.send_replace(UploadState::Uploading(0));

        let file_name = unique_filename(&request.path)?;
        let form = self.build_form(request, &auth, &file_name, file_size).await?;

        tracing::debug!(
            file = %request.path.display(),
            file_name = %file_name,
            size = file_size,
            folder = %request.folder,
            "Starting CDN transfer"
        );

        let send = self
            .api
            .client()
            .post(&self.cdn_upload_url)
            .multipart(form)
            .timeout(self.timeout)
            .send();

        // Dropping the in-flight request on cancellation aborts the transfer
        // and releases the connection.
        let response = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                return Err(AppError::Upload("upload cancelled".to_string()));
            }
            res = send => res.map_err(map_transfer_error)?,
        };

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(AppError::Upload(format!(
                "CDN upload failed with status {}: {}",
                status, body
            )));
        }

        let uploaded: UploadedFile = response
            .json()
            .await
            .map_err(|e| AppError::Upload(format!("Failed to parse CDN response: {}", e)))?;

        self.report_progress(100);

        tracing::info!(url = %uploaded.url, file_id = %uploaded.file_id, "Upload completed");

        Ok(uploaded)
    }

    async fn build_form(
        &self,
        request: &UploadRequest,
        auth: &UploadAuth,
        file_name: &str,
        file_size: u64,
    ) -> Result<reqwest::multipart::Form, AppError> {
        let file = File::open(&request.path).await.map_err(|e| {
            AppError::InvalidInput(format!(
                "Cannot open file {}: {}",
                request.path.display(),
                e
            ))
        })?;

        let meter = Arc::new(ProgressMeter::new(file_size));
        let state_tx = self.state_tx.clone();
        let on_progress = self.on_progress.clone();

        // Count bytes as the transport pulls them; hold transfer progress at
        // 99 so 100 is only ever reported once the CDN confirmed the upload.
        let stream = ReaderStream::new(file).map(move |chunk| {
            if let Ok(ref bytes) = chunk {
                if let Some(pct) = meter.record(bytes.len() as u64) {
                    let pct = pct.min(99);
                    state_tx.send_replace(UploadState::Uploading(pct));
                    if let Some(ref f) = on_progress {
                        f(pct);
                    }
                }
            }
            chunk
        });

        let body = reqwest::Body::wrap_stream(stream);
        let part = reqwest::multipart::Part::stream_with_length(body, file_size)
            .file_name(file_name.to_string())
            .mime_str(&request.content_type)
            .map_err(|e| AppError::InvalidInput(format!("Invalid content type: {}", e)))?;

        let form = reqwest::multipart::Form::new()
            .text("fileName", file_name.to_string())
            .text("folder", request.folder.clone())
            .text("publicKey", self.cdn_public_key.clone())
            .text("token", auth.token.clone())
            .text("signature", auth.signature.clone())
            .text("expire", auth.expire.to_string())
            .part("file", part);

        Ok(form)
    }

    fn report_progress(&self, pct: u8) {
        self.state_tx.send_replace(UploadState::Uploading(pct));
        if let Some(ref f) = self.on_progress {
            f(pct);
        }
    }
}

fn map_transfer_error(err: reqwest::Error) -> AppError {
    if err.is_timeout() {
        AppError::Upload(format!("upload timed out: {}", err))
    } else {
        AppError::Upload(format!("network error during upload: {}", err))
    }
}

/// Collision-resistant filename: millisecond timestamp prefix plus the
/// sanitized original name.
pub fn unique_filename(path: &Path) -> Result<String, AppError> {
    let original = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("file");
    let sanitized = sanitize_filename(original)?;

    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_err(|e| AppError::Internal(format!("System clock before Unix epoch: {}", e)))?
        .as_millis();

    Ok(format!("{}_{}", millis, sanitized))
}

/// Guess the MIME type from the file extension (for CLI convenience).
pub fn content_type_for_path(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_lowercase();
    match ext.as_str() {
        "mp4" => Some("video/mp4"),
        "mov" => Some("video/quicktime"),
        "avi" => Some("video/x-msvideo"),
        "wmv" => Some("video/x-ms-wmv"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        "png" => Some("image/png"),
        "webp" => Some("image/webp"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clipstream_core::policy::MediaKind;
    use std::io::Write;

    fn test_settings() -> UploaderSettings {
        UploaderSettings {
            // Port 9 (discard) is never served; any attempt to reach it fails fast.
            cdn_upload_url: "http://127.0.0.1:9/upload".to_string(),
            cdn_public_key: "public_test_key".to_string(),
            folder: "clipstream-test".to_string(),
            upload_timeout: Duration::from_secs(5),
        }
    }

    fn test_uploader() -> Uploader {
        let api = ApiClient::new("http://127.0.0.1:9".to_string()).unwrap();
        Uploader::new(api, &test_settings())
    }

    fn temp_file_with_bytes(len: usize) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(&vec![0u8; len]).unwrap();
        file.flush().unwrap();
        file
    }

    #[tokio::test]
    async fn oversized_file_is_rejected_before_any_network_call() {
        let file = temp_file_with_bytes(2048);
        let uploader = test_uploader();
        let request = UploadRequest {
            path: file.path().to_path_buf(),
            content_type: "video/mp4".to_string(),
            folder: "clipstream-test".to_string(),
            // 1 KB cap stands in for the 100 MB production limit.
            policy: UploadPolicy::new(MediaKind::Video, 1024, vec!["video/mp4".to_string()]),
        };

        let err = uploader
            .upload(&request, CancellationToken::new())
            .await
            .unwrap_err();

        // A network attempt against the dead endpoint would surface as
        // Upload; PayloadTooLarge proves the transfer never started.
        match err {
            AppError::PayloadTooLarge(_) => {}
            other => panic!("Expected PayloadTooLarge, got {:?}", other),
        }
        assert!(matches!(
            *uploader.state().borrow(),
            UploadState::Failed(_)
        ));
    }

    #[tokio::test]
    async fn wrong_content_type_is_rejected_before_any_network_call() {
        let file = temp_file_with_bytes(16);
        let uploader = test_uploader();
        let request = UploadRequest {
            path: file.path().to_path_buf(),
            content_type: "application/octet-stream".to_string(),
            folder: "clipstream-test".to_string(),
            policy: UploadPolicy::video(),
        };

        let err = uploader
            .upload(&request, CancellationToken::new())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn cancelled_upload_ends_in_cancelled_state() {
        let file = temp_file_with_bytes(16);
        let uploader = test_uploader();
        let request = UploadRequest {
            path: file.path().to_path_buf(),
            content_type: "video/mp4".to_string(),
            folder: "clipstream-test".to_string(),
            policy: UploadPolicy::video(),
        };

        let cancel = CancellationToken::new();
        cancel.cancel();

        let err = uploader.upload(&request, cancel).await.unwrap_err();
        assert!(matches!(err, AppError::Upload(_)));
        assert_eq!(*uploader.state().borrow(), UploadState::Cancelled);
    }

    #[tokio::test]
    async fn unreachable_cdn_ends_in_failed_state() {
        let file = temp_file_with_bytes(16);
        let uploader = test_uploader();
        let request = UploadRequest {
            path: file.path().to_path_buf(),
            content_type: "video/mp4".to_string(),
            folder: "clipstream-test".to_string(),
            policy: UploadPolicy::video(),
        };

        let err = uploader
            .upload(&request, CancellationToken::new())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Upload(_)));
        assert!(matches!(
            *uploader.state().borrow(),
            UploadState::Failed(_)
        ));
    }

    #[test]
    fn unique_filename_is_timestamp_prefixed() {
        let name = unique_filename(Path::new("/tmp/my clip.mp4")).unwrap();
        let (prefix, rest) = name.split_once('_').unwrap();
        assert!(prefix.chars().all(|c| c.is_ascii_digit()));
        assert!(prefix.len() >= 13); // millisecond precision
        assert_eq!(rest, "my_clip.mp4");
    }

    #[test]
    fn content_type_inference() {
        assert_eq!(
            content_type_for_path(Path::new("a.mp4")),
            Some("video/mp4")
        );
        assert_eq!(
            content_type_for_path(Path::new("a.JPG")),
            Some("image/jpeg")
        );
        assert_eq!(
            content_type_for_path(Path::new("a.webp")),
            Some("image/webp")
        );
        assert_eq!(content_type_for_path(Path::new("a.exe")), None);
        assert_eq!(content_type_for_path(Path::new("noext")), None);
    }
}
