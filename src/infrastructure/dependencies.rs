//! Dependency injection container.
//!
//! `AppDependencies` is the explicit server context object constructed once
//! at startup and cloned into every request task as axum state. The store
//! sits behind a trait object so production (Postgres) and tests
//! (in-memory) share the exact same pipeline and handlers.

use std::sync::Arc;

use crate::store::LedgerStore;

use super::config::AppConfig;

/// Application dependency container.
///
/// Cloning is cheap: the store is behind an `Arc` and the config is small.
#[derive(Clone)]
pub struct AppDependencies {
    config: AppConfig,
    store: Arc<dyn LedgerStore>,
}

impl AppDependencies {
    /// Creates a new container.
    #[must_use]
    pub fn new(config: AppConfig, store: Arc<dyn LedgerStore>) -> Self {
        Self { config, store }
    }

    /// Returns a reference to the application configuration.
    #[must_use]
    pub const fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Returns a reference to the ledger store.
    #[must_use]
    pub fn store(&self) -> &Arc<dyn LedgerStore> {
        &self.store
    }

    /// Returns the bearer token signing key.
    #[must_use]
    pub fn token_key(&self) -> &[u8] {
        self.config.token_key.as_bytes()
    }

    /// Returns the maximum accepted request body size in bytes.
    #[must_use]
    pub const fn upload_limit(&self) -> u64 {
        self.config.upload_limit
    }
}

impl std::fmt::Debug for AppDependencies {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter
            .debug_struct("AppDependencies")
            .field("config", &"<AppConfig>")
            .field("store", &"<dyn LedgerStore>")
            .finish()
    }
}
