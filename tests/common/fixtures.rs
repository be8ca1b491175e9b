//! Test application and data factories.

use std::sync::Arc;

use axum::Router;
use ledger_api::api::create_router;
use ledger_api::auth::{hash_password, issue_token};
use ledger_api::domain::{Clearance, Currency, Service, ServiceKind, Transaction, User};
use ledger_api::infrastructure::{AppConfig, AppDependencies};
use ledger_api::store::{InMemoryLedgerStore, LedgerStore};
use rust_decimal::Decimal;
use uuid::Uuid;

/// Matches the key in [`AppConfig::default`], which the test app runs with.
pub const TOKEN_KEY: &[u8] = b"insecure-development-key";

/// Password every seeded user is given.
pub const PASSWORD: &str = "hunter2";

/// The router under test plus a handle on its backing store for seeding.
pub struct TestApp {
    pub router: Router,
    pub store: Arc<InMemoryLedgerStore>,
}

impl TestApp {
    pub fn new() -> Self {
        let store = Arc::new(InMemoryLedgerStore::new());
        let dependencies = AppDependencies::new(AppConfig::default(), store.clone());
        Self {
            router: create_router(dependencies),
            store,
        }
    }
}

/// Seeds a user at the given clearance and returns it with a valid token.
pub async fn seed_user(app: &TestApp, clearance: Clearance) -> (User, String) {
    let user = User {
        id: Uuid::new_v4(),
        clearance,
        username: format!("user-{}", Uuid::new_v4()),
        passhash: hash_password(PASSWORD).unwrap(),
        fullname: "Seeded User".to_owned(),
    };
    app.store.create_user(&user).await.unwrap();

    let token = issue_token(user.id, TOKEN_KEY).unwrap();
    (user, token)
}

/// Seeds an active JPY service, optionally linked to an owner.
pub async fn seed_service(app: &TestApp, owner: Option<Uuid>) -> Service {
    let service = Service::open(ServiceKind::Checking, Currency::JPY, Decimal::from(10_000));
    app.store.create_service(&service).await.unwrap();
    if let Some(owner) = owner {
        app.store
            .link_service_to_user(service.id, owner)
            .await
            .unwrap();
    }
    service
}

/// Seeds a pending JPY transaction between the given services.
pub async fn seed_transaction(app: &TestApp, source: Uuid, destination: Uuid) -> Transaction {
    let transaction = Transaction::post(Currency::JPY, Decimal::from(500), source, destination);
    app.store.create_transaction(&transaction).await.unwrap();
    transaction
}
