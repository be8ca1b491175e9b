//! User entity and clearance tiers.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Ordered clearance tier used for coarse-grained authorization.
///
/// Tiers form a total order: `Customer < Teller < Admin`. The clearance gate
/// compares tiers with `>=`, so any tier passes a check against itself or a
/// lower requirement. Clearance is assigned administratively; a profile
/// update can never change it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Clearance {
    /// Regular account holder; may only act on owned services.
    Customer = 0,
    /// Bank staff; may read any service or transaction.
    Teller = 1,
    /// Administrator; full access including user listing.
    Admin = 2,
}

impl Clearance {
    /// Returns the storage representation of this tier.
    #[must_use]
    pub const fn as_i16(self) -> i16 {
        self as i16
    }

    /// Decodes a tier from its storage representation.
    #[must_use]
    pub const fn from_i16(value: i16) -> Option<Self> {
        match value {
            0 => Some(Self::Customer),
            1 => Some(Self::Teller),
            2 => Some(Self::Admin),
            _ => None,
        }
    }

    /// Returns `true` if this tier satisfies the given minimum requirement.
    #[must_use]
    pub fn satisfies(self, required: Self) -> bool {
        self >= required
    }
}

impl fmt::Display for Clearance {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Customer => write!(formatter, "customer"),
            Self::Teller => write!(formatter, "teller"),
            Self::Admin => write!(formatter, "admin"),
        }
    }
}

/// An authenticated principal.
///
/// Created at signup with [`Clearance::Customer`]; profile updates may change
/// the username, full name or password hash but never the clearance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    /// Opaque unique identifier.
    pub id: Uuid,
    /// Authorization tier.
    pub clearance: Clearance,
    /// Unique login name.
    pub username: String,
    /// Password hash (opaque to this crate; produced by the credential hasher).
    pub passhash: String,
    /// Display name.
    pub fullname: String,
}

impl User {
    /// Creates a new user at the lowest clearance tier.
    #[must_use]
    pub fn sign_up(username: String, passhash: String, fullname: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            clearance: Clearance::Customer,
            username,
            passhash,
            fullname,
        }
    }
}
