//! Upload-token issuance and verification.
//!
//! A token authorizes exactly one direct-to-CDN upload session: a fresh
//! 160-bit random value, an epoch-seconds expiry, and a hex HMAC-SHA256
//! signature over the token concatenated with the expiry, keyed by the CDN
//! private key. The private key never leaves the server.

use chrono::Utc;
use clipstream_core::models::UploadAuth;
use clipstream_core::AppError;
use hmac::{Hmac, Mac};
use sha2::Sha256;
use subtle::ConstantTimeEq;

type HmacSha256 = Hmac<Sha256>;

const TOKEN_BYTES: usize = 20;

/// Generate a fresh random upload token (40 hex chars).
pub fn generate_token() -> String {
    use rand::Rng;

    let mut rng = rand::rng();
    let random_bytes: Vec<u8> = (0..TOKEN_BYTES).map(|_| rng.random()).collect();
    hex::encode(random_bytes)
}

/// Sign the token concatenated with the expiry using the CDN private key.
pub fn sign(private_key: &str, token: &str, expire: i64) -> Result<String, AppError> {
    let mut mac = HmacSha256::new_from_slice(private_key.as_bytes())
        .map_err(|e| AppError::Internal(format!("Failed to initialize HMAC: {}", e)))?;
    mac.update(token.as_bytes());
    mac.update(expire.to_string().as_bytes());
    Ok(hex::encode(mac.finalize().into_bytes()))
}

/// Issue a new upload authorization valid for `ttl_secs` from now.
pub fn issue(private_key: &str, ttl_secs: i64) -> Result<UploadAuth, AppError> {
    let token = generate_token();
    let expire = Utc::now().timestamp() + ttl_secs;
    let signature = sign(private_key, &token, expire)?;

    Ok(UploadAuth {
        token,
        signature,
        expire,
    })
}

/// Verify an authorization: signature must match under the issuing key
/// (constant-time comparison) and the expiry must be in the future.
pub fn verify(private_key: &str, auth: &UploadAuth, now_epoch_secs: i64) -> Result<bool, AppError> {
    if auth.expire <= now_epoch_secs {
        return Ok(false);
    }

    let expected = sign(private_key, &auth.token, auth.expire)?;
    let expected_bytes = hex::decode(&expected)
        .map_err(|e| AppError::Internal(format!("Failed to decode signature: {}", e)))?;
    let Ok(actual_bytes) = hex::decode(&auth.signature) else {
        return Ok(false);
    };

    if expected_bytes.len() != actual_bytes.len() {
        return Ok(false);
    }

    Ok(expected_bytes.ct_eq(&actual_bytes).into())
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEY: &str = "private_test_key";

    #[test]
    fn test_generate_token_length_and_charset() {
        let token = generate_token();
        assert_eq!(token.len(), TOKEN_BYTES * 2);
        assert!(token.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_tokens_are_unique() {
        let a = generate_token();
        let b = generate_token();
        assert_ne!(a, b);
    }

    #[test]
    fn test_sign_is_deterministic() {
        let sig1 = sign(KEY, "abc", 1000).unwrap();
        let sig2 = sign(KEY, "abc", 1000).unwrap();
        assert_eq!(sig1, sig2);
        assert_eq!(sig1.len(), 64); // hex-encoded SHA-256 output
    }

    #[test]
    fn test_issue_and_verify() {
        let auth = issue(KEY, 2400).unwrap();
        let now = Utc::now().timestamp();

        assert!(auth.expire > now);
        assert!(verify(KEY, &auth, now).unwrap());
    }

    #[test]
    fn test_verify_rejects_wrong_key() {
        let auth = issue(KEY, 2400).unwrap();
        let now = Utc::now().timestamp();
        assert!(!verify("another_key", &auth, now).unwrap());
    }

    #[test]
    fn test_verify_rejects_tampered_token() {
        let mut auth = issue(KEY, 2400).unwrap();
        auth.token = generate_token();
        let now = Utc::now().timestamp();
        assert!(!verify(KEY, &auth, now).unwrap());
    }

    #[test]
    fn test_verify_rejects_expired() {
        let auth = issue(KEY, 2400).unwrap();
        assert!(!verify(KEY, &auth, auth.expire).unwrap());
        assert!(!verify(KEY, &auth, auth.expire + 1).unwrap());
    }

    #[test]
    fn test_verify_rejects_non_hex_signature() {
        let mut auth = issue(KEY, 2400).unwrap();
        auth.signature = "not hex at all".to_string();
        let now = Utc::now().timestamp();
        assert!(!verify(KEY, &auth, now).unwrap());
    }
}
