use crate::error::AppError;
use bcrypt::{hash, verify};

/// Work factor for bcrypt. Low enough for interactive login, high enough to
/// make offline brute force expensive.
const BCRYPT_COST: u32 = 8;

pub fn hash_password(password: &str) -> Result<String, AppError> {
    hash(password, BCRYPT_COST)
        .map_err(|e| AppError::Internal(format!("failed to hash password: {}", e)))
}

/// Constant-time verification of a plaintext password against a stored
/// digest. A malformed digest counts as a mismatch rather than an error, so
/// a corrupted record can never authenticate anyone.
pub fn verify_password(password: &str, digest: &str) -> bool {
    verify(password, digest).unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_hashing_and_verification() {
        let password = "test_password123";
        let digest = hash_password(password).unwrap();

        assert!(verify_password(password, &digest));
        assert!(!verify_password("wrong_password", &digest));
    }

    #[test]
    fn test_digests_are_salted() {
        let password = "same_plaintext";
        let first = hash_password(password).unwrap();
        let second = hash_password(password).unwrap();

        // Different salts, different digests, both verify.
        assert_ne!(first, second);
        assert!(verify_password(password, &first));
        assert!(verify_password(password, &second));
    }

    #[test]
    fn test_verify_with_malformed_digest() {
        assert!(!verify_password("test_password123", "not-a-bcrypt-digest"));
        assert!(!verify_password("test_password123", ""));
    }
}
