//! Bearer token issuance and validation.
//!
//! Tokens are HS256 JWTs signed with the symmetric key from configuration.
//! Validation checks the signature, `exp` and `nbf` against wall-clock time
//! with **zero leeway** — a token is rejected the instant it expires and
//! until the instant it becomes valid.

use chrono::{Duration, Utc};
use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode,
    errors::ErrorKind,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::AuthError;

/// How long an issued token remains valid.
pub const TOKEN_LIFETIME: Duration = Duration::hours(1);

/// Claims embedded in an access token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessClaims {
    /// Subject: the authenticated user id.
    pub sub: Uuid,
    /// Expiration time (seconds since epoch).
    pub exp: i64,
    /// Not-before time (seconds since epoch).
    pub nbf: i64,
    /// Issued-at time (seconds since epoch).
    pub iat: i64,
}

/// Issues a signed access token for the given user.
///
/// # Errors
///
/// Returns [`AuthError::Hashing`] if signing fails (this only happens with
/// a malformed key).
pub fn issue_token(user_id: Uuid, key: &[u8]) -> Result<String, AuthError> {
    let now = Utc::now();
    let claims = AccessClaims {
        sub: user_id,
        exp: (now + TOKEN_LIFETIME).timestamp(),
        nbf: now.timestamp(),
        iat: now.timestamp(),
    };

    encode(&Header::new(Algorithm::HS256), &claims, &EncodingKey::from_secret(key))
        .map_err(|error| AuthError::Hashing(error.to_string()))
}

/// Validates a bearer token and extracts the embedded user id.
///
/// # Errors
///
/// - [`AuthError::BadSignature`] when the signature does not verify
/// - [`AuthError::Expired`] when `exp` is in the past
/// - [`AuthError::NotYetValid`] when `nbf` is in the future
/// - [`AuthError::Malformed`] for anything that does not parse as a JWT
pub fn validate_token(token: &str, key: &[u8]) -> Result<Uuid, AuthError> {
    let mut validation = Validation::new(Algorithm::HS256);
    // No clock-skew tolerance; bounds are compared exactly.
    validation.leeway = 0;
    validation.validate_nbf = true;

    let data = decode::<AccessClaims>(token, &DecodingKey::from_secret(key), &validation)
        .map_err(|error| match error.kind() {
            ErrorKind::InvalidSignature => AuthError::BadSignature,
            ErrorKind::ExpiredSignature => AuthError::Expired,
            ErrorKind::ImmatureSignature => AuthError::NotYetValid,
            other => AuthError::Malformed(format!("{other:?}")),
        })?;

    Ok(data.claims.sub)
}
