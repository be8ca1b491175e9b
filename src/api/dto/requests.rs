//! Inbound request payloads.

use rust_decimal::Decimal;
use serde::Deserialize;
use uuid::Uuid;

use crate::domain::{Currency, ServiceKind};

/// Body of `POST /auth/signup`.
#[derive(Debug, Clone, Deserialize)]
pub struct SignUpRequest {
    /// Desired unique login name.
    pub username: String,
    /// Plain-text password; hashed before storage.
    pub password: String,
    /// Display name.
    pub fullname: String,
}

/// Body of `POST /auth/login`.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    /// Login name.
    pub username: String,
    /// Plain-text password.
    pub password: String,
}

/// Body of `PUT /user`. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateUserRequest {
    /// New login name.
    pub username: Option<String>,
    /// New display name.
    pub fullname: Option<String>,
    /// New plain-text password; hashed before storage.
    pub password: Option<String>,
}

/// Body of `POST /service`.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateServiceRequest {
    /// Product category.
    pub kind: ServiceKind,
    /// Account currency.
    pub currency: Currency,
    /// Opening balance, as a decimal string.
    pub init_balance: Decimal,
}

/// Body of `POST /transaction`.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateTransactionRequest {
    /// Posting currency.
    pub currency: Currency,
    /// Posted amount, as a decimal string.
    pub amount: Decimal,
    /// Debited service id.
    pub source: Uuid,
    /// Credited service id.
    pub destination: Uuid,
}

/// Query parameters shared by every listing route.
///
/// The cursor is the id of the last entity of the previous page; omitting
/// it starts from the beginning.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct PaginationParams {
    /// Resume-after id from the previous page.
    pub cursor: Option<Uuid>,
}
