//! Ledger store: persistence contract and keyset-paginated access.
//!
//! All multi-row reads share one query discipline: filter `id > cursor`,
//! order ascending by id, limit to [`PAGE_SIZE`] rows. Because ids are
//! immutable primary keys, feeding the last id of one page back as the next
//! cursor visits every row exactly once with no gaps or duplicates, even
//! while unrelated columns are being updated.
//!
//! Listing operations return an [`EntityStream`]: a lazy, request-scoped
//! stream bounded by the page size. Dropping the stream — after a full
//! drain, an early stop, or a mid-stream decode failure — releases the
//! underlying connection; consumers never manage that resource explicitly.

mod error;
mod memory;
mod postgres;

use async_trait::async_trait;
use futures::stream::BoxStream;
use uuid::Uuid;

use crate::domain::{Service, ServiceState, Transaction, TransactionState, User};

pub use error::StoreError;
pub use memory::InMemoryLedgerStore;
pub use postgres::PgLedgerStore;

/// Maximum number of rows a single listing call returns.
pub const PAGE_SIZE: i64 = 10;

/// A lazy page of entities.
///
/// Finite per call (bounded by [`PAGE_SIZE`]); a row that fails to decode is
/// yielded as an error in place of an entity and the consumer decides
/// whether to stop.
pub type EntityStream<T> = BoxStream<'static, Result<T, StoreError>>;

/// Partial update to a user's profile.
///
/// `None` fields are left untouched. Clearance is deliberately absent: it is
/// administratively assigned and never changed through a profile update.
#[derive(Debug, Clone, Default)]
pub struct UserProfileUpdate {
    /// New login name, if changing.
    pub username: Option<String>,
    /// New display name, if changing.
    pub fullname: Option<String>,
    /// New password hash, if changing.
    pub passhash: Option<String>,
}

/// Durable storage for users, services, transactions and ownership links.
///
/// Implemented by [`PgLedgerStore`] for production and
/// [`InMemoryLedgerStore`] for tests and demo mode. No method retries
/// internally; a failed call surfaces immediately.
#[async_trait]
pub trait LedgerStore: Send + Sync {
    // --- users -----------------------------------------------------------

    /// Persists a new user.
    async fn create_user(&self, user: &User) -> Result<(), StoreError>;

    /// Looks up a user by id.
    async fn find_user(&self, id: Uuid) -> Result<User, StoreError>;

    /// Looks up a user by unique username.
    async fn find_user_by_username(&self, username: &str) -> Result<User, StoreError>;

    /// Applies a partial profile update. Never touches clearance.
    async fn update_user_profile(
        &self,
        id: Uuid,
        patch: &UserProfileUpdate,
    ) -> Result<(), StoreError>;

    /// Removes a user and their ownership links. Linked services remain.
    async fn delete_user(&self, id: Uuid) -> Result<(), StoreError>;

    /// Lists users in ascending id order, starting after `cursor`.
    async fn list_users(&self, cursor: Option<Uuid>) -> Result<EntityStream<User>, StoreError>;

    // --- services --------------------------------------------------------

    /// Persists a new service.
    async fn create_service(&self, service: &Service) -> Result<(), StoreError>;

    /// Looks up a service by id.
    async fn find_service(&self, id: Uuid) -> Result<Service, StoreError>;

    /// Lists all services in ascending id order, starting after `cursor`.
    async fn list_services(
        &self,
        cursor: Option<Uuid>,
    ) -> Result<EntityStream<Service>, StoreError>;

    /// Lists the services linked to a user, ascending by service id.
    async fn list_services_for_user(
        &self,
        user_id: Uuid,
        cursor: Option<Uuid>,
    ) -> Result<EntityStream<Service>, StoreError>;

    /// Moves a service to a new lifecycle state.
    ///
    /// Fails with [`StoreError::Conflict`] when the affected-row count is
    /// not exactly one.
    async fn update_service_state(
        &self,
        id: Uuid,
        new_state: ServiceState,
    ) -> Result<(), StoreError>;

    /// Records an ownership link between a user and a service.
    async fn link_service_to_user(&self, service_id: Uuid, user_id: Uuid)
    -> Result<(), StoreError>;

    /// Returns whether an ownership link exists.
    async fn user_owns_service(&self, user_id: Uuid, service_id: Uuid)
    -> Result<bool, StoreError>;

    // --- transactions ----------------------------------------------------

    /// Persists a new transaction.
    async fn create_transaction(&self, transaction: &Transaction) -> Result<(), StoreError>;

    /// Looks up a transaction by id.
    async fn find_transaction(&self, id: Uuid) -> Result<Transaction, StoreError>;

    /// Lists all transactions in ascending id order, starting after `cursor`.
    async fn list_transactions(
        &self,
        cursor: Option<Uuid>,
    ) -> Result<EntityStream<Transaction>, StoreError>;

    /// Lists the transactions touching a service (as source or destination),
    /// ascending by transaction id.
    async fn list_transactions_for_service(
        &self,
        service_id: Uuid,
        cursor: Option<Uuid>,
    ) -> Result<EntityStream<Transaction>, StoreError>;

    /// Moves a transaction to a new lifecycle state.
    ///
    /// Fails with [`StoreError::Conflict`] when the affected-row count is
    /// not exactly one.
    async fn update_transaction_state(
        &self,
        id: Uuid,
        new_state: TransactionState,
    ) -> Result<(), StoreError>;
}
