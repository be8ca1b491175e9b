//! Domain layer: ledger entities and their invariants.
//!
//! This module contains the entities persisted by the ledger store:
//!
//! - **User**: an authenticated principal with an ordered clearance tier
//! - **Service**: a monetary account with a forward-only lifecycle
//! - **Transaction**: an immutable ledger posting between two services
//!
//! Entities enforce their own invariants (clearance ordering, legal state
//! transitions); everything else — visibility, pagination, persistence — is
//! handled by the store and middleware layers on top of these types.

mod currency;
mod service;
mod transaction;
mod user;

pub use currency::{Currency, CurrencyParseError};
pub use service::{Service, ServiceKind, ServiceState};
pub use transaction::{Transaction, TransactionState};
pub use user::{Clearance, User};
