//! Upload policy: size and MIME-type limits checked before any network call.

use crate::AppError;

/// Kind of media being uploaded; selects the policy limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Video,
    Image,
}

impl MediaKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaKind::Video => "video",
            MediaKind::Image => "image",
        }
    }
}

/// Size and content-type limits for one media kind.
#[derive(Debug, Clone)]
pub struct UploadPolicy {
    pub kind: MediaKind,
    pub max_size_bytes: usize,
    pub allowed_content_types: Vec<String>,
}

impl UploadPolicy {
    pub fn new(kind: MediaKind, max_size_bytes: usize, allowed_content_types: Vec<String>) -> Self {
        Self {
            kind,
            max_size_bytes,
            allowed_content_types,
        }
    }

    /// Default video policy: 100 MB, common container formats.
    pub fn video() -> Self {
        Self::new(
            MediaKind::Video,
            100 * 1024 * 1024,
            ["video/mp4", "video/quicktime", "video/x-msvideo", "video/x-ms-wmv"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        )
    }

    /// Default image policy: 5 MB, web image formats.
    pub fn image() -> Self {
        Self::new(
            MediaKind::Image,
            5 * 1024 * 1024,
            ["image/jpeg", "image/png", "image/webp"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        )
    }

    /// Validate declared size and MIME type against this policy.
    pub fn check(&self, file_size: usize, content_type: &str) -> Result<(), AppError> {
        validate_file_size(file_size, self.max_size_bytes)?;
        validate_content_type(content_type, &self.allowed_content_types)?;
        Ok(())
    }
}

/// Validate file size
pub fn validate_file_size(file_size: usize, max_size: usize) -> Result<(), AppError> {
    if file_size > max_size {
        return Err(AppError::PayloadTooLarge(format!(
            "File size exceeds maximum allowed size of {} MB",
            max_size / 1024 / 1024
        )));
    }
    Ok(())
}

/// Normalize MIME type by stripping parameters (e.g. "video/mp4; codecs=avc1" -> "video/mp4").
fn normalize_mime_type(content_type: &str) -> &str {
    content_type
        .split(';')
        .next()
        .map(|s| s.trim())
        .unwrap_or(content_type)
}

/// Validate content type against allowlist. Compares normalized MIME type only (no parameter bypass).
pub fn validate_content_type(content_type: &str, allowed_types: &[String]) -> Result<(), AppError> {
    let normalized = normalize_mime_type(content_type).to_lowercase();
    if !allowed_types.iter().any(|ct| normalized == ct.to_lowercase()) {
        return Err(AppError::InvalidInput(format!(
            "Invalid content type '{}'. Allowed types: {}",
            normalized,
            allowed_types.join(", ")
        )));
    }
    Ok(())
}

/// Sanitize filename to prevent path traversal and invalid characters.
/// Returns an error if the filename contains path traversal attempts.
pub fn sanitize_filename(filename: &str) -> Result<String, AppError> {
    const MAX_FILENAME_LENGTH: usize = 255;

    let path = std::path::Path::new(filename);
    let filename_only = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or(filename);

    if filename_only.contains("..") {
        return Err(AppError::InvalidInput(
            "Filename contains invalid path traversal".to_string(),
        ));
    }

    let sanitized: String = filename_only
        .chars()
        .take(MAX_FILENAME_LENGTH)
        .map(|c| {
            if c.is_alphanumeric() || c == '.' || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();

    if sanitized.trim().is_empty() || sanitized.len() < 3 {
        return Ok("file".to_string());
    }

    Ok(sanitized)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn video_policy_rejects_oversize_before_network() {
        let policy = UploadPolicy::video();
        let oversize = 101 * 1024 * 1024;
        let err = policy.check(oversize, "video/mp4").unwrap_err();
        match err {
            AppError::PayloadTooLarge(msg) => assert!(msg.contains("100")),
            other => panic!("Expected PayloadTooLarge, got {:?}", other),
        }
    }

    #[test]
    fn video_policy_accepts_at_limit() {
        let policy = UploadPolicy::video();
        assert!(policy.check(100 * 1024 * 1024, "video/mp4").is_ok());
    }

    #[test]
    fn image_policy_rejects_oversize() {
        let policy = UploadPolicy::image();
        assert!(policy.check(5 * 1024 * 1024 + 1, "image/png").is_err());
        assert!(policy.check(5 * 1024 * 1024, "image/png").is_ok());
    }

    #[test]
    fn policy_rejects_unknown_content_type() {
        let policy = UploadPolicy::video();
        let err = policy.check(1024, "application/octet-stream").unwrap_err();
        match err {
            AppError::InvalidInput(msg) => assert!(msg.contains("video/mp4")),
            other => panic!("Expected InvalidInput, got {:?}", other),
        }
    }

    #[test]
    fn content_type_parameters_do_not_bypass_allowlist() {
        let policy = UploadPolicy::video();
        assert!(policy.check(1024, "video/mp4; codecs=avc1").is_ok());
        assert!(policy
            .check(1024, "application/json; profile=video/mp4")
            .is_err());
    }

    #[test]
    fn sanitize_filename_rejects_path_traversal() {
        assert!(sanitize_filename("..").is_err());
        assert!(sanitize_filename("foo/../bar").is_err());
        assert!(sanitize_filename("....").is_err());
    }

    #[test]
    fn sanitize_filename_accepts_valid_names() {
        assert_eq!(sanitize_filename("clip.mp4").unwrap(), "clip.mp4");
        assert_eq!(sanitize_filename("my-clip_1.mov").unwrap(), "my-clip_1.mov");
    }

    #[test]
    fn sanitize_filename_replaces_special_characters() {
        assert_eq!(
            sanitize_filename("summer holiday!.mp4").unwrap(),
            "summer_holiday_.mp4"
        );
    }
}
