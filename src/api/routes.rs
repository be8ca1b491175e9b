//! Route table.
//!
//! Each route declares its pipeline as a stage slice, so the full protection
//! of every endpoint is readable in one place. Where two methods on the same
//! path need different pipelines, their method routers are merged.

use axum::Router;
use axum::routing::{delete, get, post};

use crate::domain::Clearance;
use crate::infrastructure::AppDependencies;

use super::handlers::{auth, health_check, service, transaction, user};
use super::middleware::{OwnershipKind, Stage, compose};

/// Builds the application router with every route behind its pipeline.
#[must_use]
pub fn create_router(dependencies: AppDependencies) -> Router {
    let limit = dependencies.upload_limit();

    let open = [Stage::Logger, Stage::UploadLimit(limit)];
    let authed = [Stage::Logger, Stage::UploadLimit(limit), Stage::Auth];
    let teller = [
        Stage::Logger,
        Stage::UploadLimit(limit),
        Stage::Auth,
        Stage::Clearance(Clearance::Teller),
    ];
    let admin = [
        Stage::Logger,
        Stage::UploadLimit(limit),
        Stage::Auth,
        Stage::Clearance(Clearance::Admin),
    ];
    let teller_or_service_owner = [
        Stage::Logger,
        Stage::UploadLimit(limit),
        Stage::Auth,
        Stage::ClearanceOrOwnership(Clearance::Teller, OwnershipKind::Service),
    ];
    let teller_or_transaction_owner = [
        Stage::Logger,
        Stage::UploadLimit(limit),
        Stage::Auth,
        Stage::ClearanceOrOwnership(Clearance::Teller, OwnershipKind::Transaction),
    ];

    let deps = &dependencies;
    Router::new()
        .route("/health", get(health_check))
        .route("/auth/signup", compose(&open, post(auth::sign_up), deps))
        .route("/auth/login", compose(&open, post(auth::login), deps))
        .route(
            "/user",
            compose(
                &authed,
                get(user::get_self)
                    .put(user::update_self)
                    .delete(user::delete_self),
                deps,
            ),
        )
        .route("/user/all", compose(&admin, get(user::list_users), deps))
        .route(
            "/service",
            compose(&authed, post(service::create_service), deps)
                .merge(compose(&teller, get(service::list_services), deps)),
        )
        .route(
            "/service/mine",
            compose(&authed, get(service::list_my_services), deps),
        )
        .route(
            "/service/{id}",
            compose(
                &teller_or_service_owner,
                get(service::get_service).delete(service::close_service),
                deps,
            ),
        )
        .route(
            "/service/{id}/transaction",
            compose(
                &teller_or_service_owner,
                get(transaction::list_service_transactions),
                deps,
            ),
        )
        .route(
            "/transaction",
            compose(&authed, post(transaction::create_transaction), deps)
                .merge(compose(&teller, get(transaction::list_transactions), deps)),
        )
        .route(
            "/transaction/{id}",
            compose(
                &teller_or_transaction_owner,
                get(transaction::get_transaction),
                deps,
            )
            .merge(compose(
                &teller,
                delete(transaction::reverse_transaction),
                deps,
            )),
        )
        .with_state(dependencies)
}
