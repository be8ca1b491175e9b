//! In-memory ledger store for tests and demo mode.
//!
//! Entities live in `BTreeMap`s keyed by uuid, which orders keys the same
//! way Postgres orders a uuid column (bytewise ascending), so keyset
//! pagination behaves identically across both implementations.

use std::collections::{BTreeMap, BTreeSet};
use std::ops::Bound::{Excluded, Unbounded};
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use futures::stream;
use uuid::Uuid;

use crate::domain::{Service, ServiceState, Transaction, TransactionState, User};

use super::{EntityStream, LedgerStore, PAGE_SIZE, StoreError, UserProfileUpdate};

#[derive(Debug, Default)]
struct Inner {
    users: BTreeMap<Uuid, User>,
    services: BTreeMap<Uuid, Service>,
    transactions: BTreeMap<Uuid, Transaction>,
    links: BTreeSet<(Uuid, Uuid)>, // (user_id, service_id)
}

/// Ledger store held entirely in process memory.
#[derive(Debug, Clone, Default)]
pub struct InMemoryLedgerStore {
    inner: Arc<RwLock<Inner>>,
}

impl InMemoryLedgerStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn page<T: Clone>(map: &BTreeMap<Uuid, T>, cursor: Option<Uuid>) -> Vec<Result<T, StoreError>> {
        Self::page_filtered(map, cursor, |_| true)
    }

    fn page_filtered<T: Clone>(
        map: &BTreeMap<Uuid, T>,
        cursor: Option<Uuid>,
        keep: impl Fn(&T) -> bool,
    ) -> Vec<Result<T, StoreError>> {
        let after = cursor.unwrap_or_else(Uuid::nil);
        map.range((Excluded(after), Unbounded))
            .filter(|(_, value)| keep(value))
            .take(usize::try_from(PAGE_SIZE).unwrap_or(usize::MAX))
            .map(|(_, value)| Ok(value.clone()))
            .collect()
    }

    fn lock_poisoned() -> StoreError {
        StoreError::Decode("store lock poisoned".to_string())
    }
}

#[async_trait]
impl LedgerStore for InMemoryLedgerStore {
    // --- users -----------------------------------------------------------

    async fn create_user(&self, user: &User) -> Result<(), StoreError> {
        let mut inner = self.inner.write().map_err(|_| Self::lock_poisoned())?;
        inner.users.insert(user.id, user.clone());
        Ok(())
    }

    async fn find_user(&self, id: Uuid) -> Result<User, StoreError> {
        let inner = self.inner.read().map_err(|_| Self::lock_poisoned())?;
        inner.users.get(&id).cloned().ok_or(StoreError::NotFound)
    }

    async fn find_user_by_username(&self, username: &str) -> Result<User, StoreError> {
        let inner = self.inner.read().map_err(|_| Self::lock_poisoned())?;
        inner
            .users
            .values()
            .find(|user| user.username == username)
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    async fn update_user_profile(
        &self,
        id: Uuid,
        patch: &UserProfileUpdate,
    ) -> Result<(), StoreError> {
        let mut inner = self.inner.write().map_err(|_| Self::lock_poisoned())?;
        let user = inner.users.get_mut(&id).ok_or(StoreError::NotFound)?;
        if let Some(username) = &patch.username {
            user.username.clone_from(username);
        }
        if let Some(fullname) = &patch.fullname {
            user.fullname.clone_from(fullname);
        }
        if let Some(passhash) = &patch.passhash {
            user.passhash.clone_from(passhash);
        }
        Ok(())
    }

    async fn delete_user(&self, id: Uuid) -> Result<(), StoreError> {
        let mut inner = self.inner.write().map_err(|_| Self::lock_poisoned())?;
        inner.users.remove(&id).ok_or(StoreError::NotFound)?;
        inner.links.retain(|(user_id, _)| *user_id != id);
        Ok(())
    }

    async fn list_users(&self, cursor: Option<Uuid>) -> Result<EntityStream<User>, StoreError> {
        let inner = self.inner.read().map_err(|_| Self::lock_poisoned())?;
        Ok(Box::pin(stream::iter(Self::page(&inner.users, cursor))))
    }

    // --- services --------------------------------------------------------

    async fn create_service(&self, service: &Service) -> Result<(), StoreError> {
        let mut inner = self.inner.write().map_err(|_| Self::lock_poisoned())?;
        inner.services.insert(service.id, service.clone());
        Ok(())
    }

    async fn find_service(&self, id: Uuid) -> Result<Service, StoreError> {
        let inner = self.inner.read().map_err(|_| Self::lock_poisoned())?;
        inner.services.get(&id).cloned().ok_or(StoreError::NotFound)
    }

    async fn list_services(
        &self,
        cursor: Option<Uuid>,
    ) -> Result<EntityStream<Service>, StoreError> {
        let inner = self.inner.read().map_err(|_| Self::lock_poisoned())?;
        Ok(Box::pin(stream::iter(Self::page(&inner.services, cursor))))
    }

    async fn list_services_for_user(
        &self,
        user_id: Uuid,
        cursor: Option<Uuid>,
    ) -> Result<EntityStream<Service>, StoreError> {
        let inner = self.inner.read().map_err(|_| Self::lock_poisoned())?;
        let links = &inner.links;
        let page = Self::page_filtered(&inner.services, cursor, |service| {
            links.contains(&(user_id, service.id))
        });
        Ok(Box::pin(stream::iter(page)))
    }

    async fn update_service_state(
        &self,
        id: Uuid,
        new_state: ServiceState,
    ) -> Result<(), StoreError> {
        let mut inner = self.inner.write().map_err(|_| Self::lock_poisoned())?;
        match inner.services.get_mut(&id) {
            Some(service) => {
                service.state = new_state;
                Ok(())
            }
            None => Err(StoreError::Conflict { rows: 0 }),
        }
    }

    async fn link_service_to_user(
        &self,
        service_id: Uuid,
        user_id: Uuid,
    ) -> Result<(), StoreError> {
        let mut inner = self.inner.write().map_err(|_| Self::lock_poisoned())?;
        inner.links.insert((user_id, service_id));
        Ok(())
    }

    async fn user_owns_service(
        &self,
        user_id: Uuid,
        service_id: Uuid,
    ) -> Result<bool, StoreError> {
        let inner = self.inner.read().map_err(|_| Self::lock_poisoned())?;
        Ok(inner.links.contains(&(user_id, service_id)))
    }

    // --- transactions ----------------------------------------------------

    async fn create_transaction(&self, transaction: &Transaction) -> Result<(), StoreError> {
        let mut inner = self.inner.write().map_err(|_| Self::lock_poisoned())?;
        inner.transactions.insert(transaction.id, transaction.clone());
        Ok(())
    }

    async fn find_transaction(&self, id: Uuid) -> Result<Transaction, StoreError> {
        let inner = self.inner.read().map_err(|_| Self::lock_poisoned())?;
        inner
            .transactions
            .get(&id)
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    async fn list_transactions(
        &self,
        cursor: Option<Uuid>,
    ) -> Result<EntityStream<Transaction>, StoreError> {
        let inner = self.inner.read().map_err(|_| Self::lock_poisoned())?;
        Ok(Box::pin(stream::iter(Self::page(
            &inner.transactions,
            cursor,
        ))))
    }

    async fn list_transactions_for_service(
        &self,
        service_id: Uuid,
        cursor: Option<Uuid>,
    ) -> Result<EntityStream<Transaction>, StoreError> {
        let inner = self.inner.read().map_err(|_| Self::lock_poisoned())?;
        let page = Self::page_filtered(&inner.transactions, cursor, |transaction| {
            transaction.touches(service_id)
        });
        Ok(Box::pin(stream::iter(page)))
    }

    async fn update_transaction_state(
        &self,
        id: Uuid,
        new_state: TransactionState,
    ) -> Result<(), StoreError> {
        let mut inner = self.inner.write().map_err(|_| Self::lock_poisoned())?;
        match inner.transactions.get_mut(&id) {
            Some(transaction) => {
                transaction.state = new_state;
                Ok(())
            }
            None => Err(StoreError::Conflict { rows: 0 }),
        }
    }
}
