//! services/api/src/password.rs
//!
//! Argon2 password hashing shared by the bootstrap admin, registration, and
//! login verification.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

use crate::error::ApiError;

/// Hashes a plaintext password with a fresh random salt.
pub fn hash(plain: &str) -> Result<String, ApiError> {
    let salt = SaltString::generate(&mut OsRng);
    let hashed = Argon2::default()
        .hash_password(plain.as_bytes(), &salt)
        .map_err(|e| ApiError::Internal(format!("Failed to hash password: {e}")))?;
    Ok(hashed.to_string())
}

/// Verifies a plaintext password against a stored hash.
///
/// An unparseable stored hash verifies as false rather than erroring; the
/// caller treats it the same as a wrong password.
pub fn verify(plain: &str, stored_hash: &str) -> bool {
    match PasswordHash::new(stored_hash) {
        Ok(parsed) => Argon2::default()
            .verify_password(plain.as_bytes(), &parsed)
            .is_ok(),
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_then_verify_round_trip() {
        let hashed = hash("admin123").unwrap();
        assert!(verify("admin123", &hashed));
        assert!(!verify("admin124", &hashed));
    }

    #[test]
    fn garbage_stored_hash_never_verifies() {
        assert!(!verify("anything", "not-a-phc-string"));
    }
}
