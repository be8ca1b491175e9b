//! Transaction (ledger posting) entity.

use std::fmt;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Currency;

/// Lifecycle state of a transaction.
///
/// A posting is created pending and may settle or be reversed; a settled
/// posting may still be reversed. Reversed is terminal. The amount and
/// endpoint services never change after creation — state is the only
/// mutable field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionState {
    /// Accepted but not yet settled.
    Pending = 0,
    /// Applied to both endpoint services.
    Settled = 1,
    /// Backed out; terminal.
    Reversed = 2,
}

impl TransactionState {
    /// Returns the storage representation of this state.
    #[must_use]
    pub const fn as_i16(self) -> i16 {
        self as i16
    }

    /// Decodes a state from its storage representation.
    #[must_use]
    pub const fn from_i16(value: i16) -> Option<Self> {
        match value {
            0 => Some(Self::Pending),
            1 => Some(Self::Settled),
            2 => Some(Self::Reversed),
            _ => None,
        }
    }

    /// Returns `true` if the lifecycle may move from `self` to `next`.
    #[must_use]
    pub fn can_transition_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::Settled | Self::Reversed) | (Self::Settled, Self::Reversed)
        )
    }
}

impl fmt::Display for TransactionState {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => write!(formatter, "pending"),
            Self::Settled => write!(formatter, "settled"),
            Self::Reversed => write!(formatter, "reversed"),
        }
    }
}

/// A ledger posting between two services.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transaction {
    /// Opaque unique identifier; also the pagination key.
    pub id: Uuid,
    /// Lifecycle state.
    pub state: TransactionState,
    /// When the posting was accepted.
    pub time: DateTime<Utc>,
    /// Posting currency.
    pub currency: Currency,
    /// Posted amount.
    pub amount: Decimal,
    /// Debited service.
    pub source: Uuid,
    /// Credited service.
    pub destination: Uuid,
}

impl Transaction {
    /// Creates a new pending posting between the given services.
    #[must_use]
    pub fn post(currency: Currency, amount: Decimal, source: Uuid, destination: Uuid) -> Self {
        Self {
            id: Uuid::new_v4(),
            state: TransactionState::Pending,
            time: Utc::now(),
            currency,
            amount,
            source,
            destination,
        }
    }

    /// Returns `true` if the given service is one of this posting's endpoints.
    ///
    /// Used by the ownership gate: a caller owns a transaction if they own
    /// either the source or the destination service.
    #[must_use]
    pub fn touches(&self, service_id: Uuid) -> bool {
        self.source == service_id || self.destination == service_id
    }
}
