//! Authentication: bearer token validation and credential hashing.
//!
//! The token validator is stateless — a token is valid for its whole
//! lifetime once issued, and expiry/not-before are compared against
//! wall-clock time with zero leeway. There is no revocation list; if one
//! were ever needed it would be an additional pipeline stage, not a change
//! to the validator's contract.

mod error;
mod password;
mod token;

pub use error::AuthError;
pub use password::{hash_password, verify_password};
pub use token::{AccessClaims, TOKEN_LIFETIME, issue_token, validate_token};
