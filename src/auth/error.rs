//! Authentication error types.

use thiserror::Error;

/// Reasons a credential can be rejected.
///
/// Every variant maps to HTTP 401; the variants exist so callers and tests
/// can dispatch on the kind of failure rather than on message text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    /// No `Authorization: Bearer` header was present.
    #[error("missing bearer credential")]
    MissingCredential,

    /// The token could not be parsed at all.
    #[error("malformed token: {0}")]
    Malformed(String),

    /// The token parsed but its signature did not verify.
    #[error("token signature did not verify")]
    BadSignature,

    /// The `exp` claim is in the past.
    #[error("token expired")]
    Expired,

    /// The `nbf` claim is in the future.
    #[error("token not yet valid")]
    NotYetValid,

    /// Username/password pair did not match a stored credential.
    #[error("invalid username or password")]
    BadCredentials,

    /// The password hasher itself failed.
    #[error("credential hashing failed: {0}")]
    Hashing(String),
}
