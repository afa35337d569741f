//! Password hashing helpers (bcrypt).
//!
//! Hashing is an explicit step the registration handler calls before
//! constructing the database record; there is no implicit persistence hook.

use clipstream_core::AppError;

/// Hash a plaintext password for storage.
pub fn hash_password(password: &str) -> Result<String, AppError> {
    bcrypt::hash(password, bcrypt::DEFAULT_COST)
        .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))
}

/// Verify a submitted password against a stored hash (used by the external
/// credential-verification collaborator at login).
pub fn verify_password(password: &str, hash: &str) -> Result<bool, AppError> {
    bcrypt::verify(password, hash)
        .map_err(|e| AppError::Internal(format!("Failed to verify password: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cost_factor_meets_minimum() {
        assert!(bcrypt::DEFAULT_COST >= 10);
    }

    #[test]
    fn test_hash_never_equals_plaintext() {
        let password = "secret1secret1";
        let hash = hash_password(password).unwrap();
        assert_ne!(hash, password);
        assert!(hash.starts_with("$2"));
    }

    #[test]
    fn test_hash_and_verify_roundtrip() {
        let password = "correct horse battery staple";
        let hash = hash_password(password).unwrap();

        assert!(verify_password(password, &hash).unwrap());
        assert!(!verify_password("wrong password", &hash).unwrap());
    }

    #[test]
    fn test_hashes_are_salted() {
        let password = "secret1secret1";
        let first = hash_password(password).unwrap();
        let second = hash_password(password).unwrap();
        assert_ne!(first, second);
    }
}
