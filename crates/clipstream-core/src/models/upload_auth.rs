use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Authorization for one direct-to-CDN upload session.
///
/// Ephemeral: issued on request, never persisted, valid until `expire`
/// (epoch seconds). `signature` is an HMAC-SHA256 over the token followed by
/// the expiry, keyed by the server-held CDN private key.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UploadAuth {
    /// Fresh random value, 40 hex characters (160 bits)
    pub token: String,
    /// Hex-encoded HMAC-SHA256 signature
    pub signature: String,
    /// Expiry as Unix epoch seconds
    pub expire: i64,
}

/// Result of a completed CDN upload.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UploadedFile {
    /// Public URL of the stored file
    pub url: String,
    /// CDN-assigned file identifier
    #[serde(rename = "fileId")]
    pub file_id: String,
    /// Stored filename
    pub name: String,
}
