//! Service (bank account) entity.

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Currency;

/// The product category of a service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceKind {
    /// Interest-bearing savings account.
    Savings = 0,
    /// Day-to-day checking account.
    Checking = 1,
    /// Credit line.
    Credit = 2,
}

impl ServiceKind {
    /// Returns the storage representation of this kind.
    #[must_use]
    pub const fn as_i16(self) -> i16 {
        self as i16
    }

    /// Decodes a kind from its storage representation.
    #[must_use]
    pub const fn from_i16(value: i16) -> Option<Self> {
        match value {
            0 => Some(Self::Savings),
            1 => Some(Self::Checking),
            2 => Some(Self::Credit),
            _ => None,
        }
    }
}

/// Lifecycle state of a service.
///
/// States are ordered and transitions only move forward: an active service
/// may be suspended or closed, a suspended one closed, and a closed service
/// is terminal — it is never reopened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceState {
    /// Operating normally.
    Active = 0,
    /// Temporarily blocked from new postings.
    Suspended = 1,
    /// Permanently closed.
    Closed = 2,
}

impl ServiceState {
    /// Returns the storage representation of this state.
    #[must_use]
    pub const fn as_i16(self) -> i16 {
        self as i16
    }

    /// Decodes a state from its storage representation.
    #[must_use]
    pub const fn from_i16(value: i16) -> Option<Self> {
        match value {
            0 => Some(Self::Active),
            1 => Some(Self::Suspended),
            2 => Some(Self::Closed),
            _ => None,
        }
    }

    /// Returns `true` if the lifecycle may move from `self` to `next`.
    #[must_use]
    pub fn can_transition_to(self, next: Self) -> bool {
        next > self
    }
}

impl fmt::Display for ServiceState {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Active => write!(formatter, "active"),
            Self::Suspended => write!(formatter, "suspended"),
            Self::Closed => write!(formatter, "closed"),
        }
    }
}

/// A monetary account.
///
/// Owned by zero or more users through the `user_service` link table; the
/// link is the sole ownership fact consulted by the ownership gate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Service {
    /// Opaque unique identifier; also the pagination key.
    pub id: Uuid,
    /// Product category.
    pub kind: ServiceKind,
    /// Lifecycle state; transitions forward only.
    pub state: ServiceState,
    /// Permission flag bits (interpretation belongs to settlement, not here).
    pub permissions: i16,
    /// Account currency.
    pub currency: Currency,
    /// Balance at opening.
    pub init_balance: Decimal,
    /// Current balance.
    pub balance: Decimal,
}

impl Service {
    /// Opens a new active service with the given opening balance.
    #[must_use]
    pub fn open(kind: ServiceKind, currency: Currency, init_balance: Decimal) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            state: ServiceState::Active,
            permissions: 0,
            currency,
            init_balance,
            balance: init_balance,
        }
    }
}
