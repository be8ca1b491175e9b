//! Outbound response payloads.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

use crate::domain::{
    Clearance, Currency, Service, ServiceKind, ServiceState, Transaction, TransactionState, User,
};

/// Body of a successful login: the bearer token to present on later calls.
#[derive(Debug, Clone, Serialize)]
pub struct TokenResponse {
    /// Signed access token.
    pub token: String,
}

/// Body returned when a resource is created and only its id matters.
#[derive(Debug, Clone, Serialize)]
pub struct CreatedResponse {
    /// Identifier of the created resource.
    pub id: Uuid,
}

/// Public projection of a user. The password hash never leaves the server.
#[derive(Debug, Clone, Serialize)]
pub struct UserResponse {
    /// Unique identifier.
    pub id: Uuid,
    /// Authorization tier.
    pub clearance: Clearance,
    /// Login name.
    pub username: String,
    /// Display name.
    pub fullname: String,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            clearance: user.clearance,
            username: user.username,
            fullname: user.fullname,
        }
    }
}

/// Wire projection of a service.
#[derive(Debug, Clone, Serialize)]
pub struct ServiceResponse {
    /// Unique identifier; also the pagination cursor value.
    pub id: Uuid,
    /// Product category.
    pub kind: ServiceKind,
    /// Lifecycle state.
    pub state: ServiceState,
    /// Account currency.
    pub currency: Currency,
    /// Opening balance, serialized as a decimal string.
    pub init_balance: Decimal,
    /// Current balance, serialized as a decimal string.
    pub balance: Decimal,
}

impl From<Service> for ServiceResponse {
    fn from(service: Service) -> Self {
        Self {
            id: service.id,
            kind: service.kind,
            state: service.state,
            currency: service.currency,
            init_balance: service.init_balance,
            balance: service.balance,
        }
    }
}

/// Wire projection of a transaction.
#[derive(Debug, Clone, Serialize)]
pub struct TransactionResponse {
    /// Unique identifier; also the pagination cursor value.
    pub id: Uuid,
    /// Lifecycle state.
    pub state: TransactionState,
    /// When the posting was accepted.
    pub time: DateTime<Utc>,
    /// Posting currency.
    pub currency: Currency,
    /// Posted amount, serialized as a decimal string.
    pub amount: Decimal,
    /// Debited service id.
    pub source: Uuid,
    /// Credited service id.
    pub destination: Uuid,
}

impl From<Transaction> for TransactionResponse {
    fn from(transaction: Transaction) -> Self {
        Self {
            id: transaction.id,
            state: transaction.state,
            time: transaction.time,
            currency: transaction.currency,
            amount: transaction.amount,
            source: transaction.source,
            destination: transaction.destination,
        }
    }
}
