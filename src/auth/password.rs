//! Password hashing at the signup/login boundary.
//!
//! The hashing algorithm is an external concern; this module only exposes
//! the hash/verify contract the handlers rely on.

use argon2::Argon2;
use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};

use super::AuthError;

/// Hashes a password for storage.
///
/// # Errors
///
/// Returns [`AuthError::Hashing`] if the hasher fails.
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|error| AuthError::Hashing(error.to_string()))
}

/// Verifies a password against a stored hash.
///
/// An unparseable stored hash counts as a mismatch rather than an error so
/// that login failures are uniform regardless of cause.
#[must_use]
pub fn verify_password(password: &str, passhash: &str) -> bool {
    PasswordHash::new(passhash)
        .map(|parsed| {
            Argon2::default()
                .verify_password(password.as_bytes(), &parsed)
                .is_ok()
        })
        .unwrap_or(false)
}
