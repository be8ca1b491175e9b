//! Pipeline behavior: authentication, clearance gates, body-size limit and
//! short-circuiting.

use crate::common::*;
use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use futures::TryStreamExt;
use ledger_api::api::handlers::service;
use ledger_api::api::middleware::{OwnershipKind, Stage, compose};
use ledger_api::auth::issue_token;
use ledger_api::domain::Clearance;
use ledger_api::infrastructure::{AppConfig, AppDependencies};
use ledger_api::store::LedgerStore;
use rstest::rstest;
use serde_json::json;
use uuid::Uuid;

#[rstest]
#[tokio::test]
async fn protected_route_rejects_missing_token() {
    let app = TestApp::new();

    let response = send(&app.router, get("/user", None)).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[rstest]
#[tokio::test]
async fn protected_route_rejects_foreign_token() {
    let app = TestApp::new();
    let token = issue_token(Uuid::new_v4(), b"some-other-key").unwrap();

    let response = send(&app.router, get("/user", Some(&token))).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[rstest]
#[tokio::test]
async fn token_for_deleted_user_is_rejected() {
    let app = TestApp::new();
    // Valid signature, but the subject resolves to no stored user.
    let token = issue_token(Uuid::new_v4(), TOKEN_KEY).unwrap();

    let response = send(&app.router, get("/user/all", Some(&token))).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[rstest]
#[tokio::test]
async fn oversized_body_is_rejected_before_authentication() {
    let app = TestApp::new();
    let request = Request::builder()
        .method("POST")
        .uri("/auth/signup")
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::CONTENT_LENGTH, "5000")
        .body(Body::empty())
        .unwrap();

    let response = send(&app.router, request).await;

    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
}

#[rstest]
#[tokio::test]
async fn failed_authentication_short_circuits_the_handler() {
    let app = TestApp::new();
    let source = seed_service(&app, None).await;
    let destination = seed_service(&app, None).await;
    let body = json!({
        "currency": "JPY",
        "amount": "500",
        "source": source.id,
        "destination": destination.id,
    });

    let response = send(
        &app.router,
        json_request("POST", "/transaction", Some("garbage"), &body),
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let stored: Vec<_> = app
        .store
        .list_transactions(None)
        .await
        .unwrap()
        .try_collect()
        .await
        .unwrap();
    assert!(stored.is_empty());
}

/// A route gated by ownership alone: no clearance tier bypasses the link
/// check here, unlike the combinator the production routes use.
fn ownership_only_router(app: &TestApp) -> Router {
    let dependencies = AppDependencies::new(AppConfig::default(), app.store.clone());
    let stages = [
        Stage::Auth,
        Stage::Ownership(OwnershipKind::Service),
    ];
    Router::new()
        .route(
            "/service/{id}",
            compose(&stages, axum::routing::get(service::get_service), &dependencies),
        )
        .with_state(dependencies)
}

#[rstest]
#[tokio::test]
async fn ownership_stage_passes_owners_and_rejects_everyone_else() {
    let app = TestApp::new();
    let router = ownership_only_router(&app);
    let (owner, owner_token) = seed_user(&app, Clearance::Customer).await;
    let (_, stranger_token) = seed_user(&app, Clearance::Customer).await;
    let (_, teller_token) = seed_user(&app, Clearance::Teller).await;
    let owned = seed_service(&app, Some(owner.id)).await;
    let path = format!("/service/{}", owned.id);

    let as_owner = send(&router, get(&path, Some(&owner_token))).await;
    let as_stranger = send(&router, get(&path, Some(&stranger_token))).await;
    let as_teller = send(&router, get(&path, Some(&teller_token))).await;

    assert_eq!(as_owner.status(), StatusCode::OK);
    assert_eq!(as_stranger.status(), StatusCode::FORBIDDEN);
    // Without the clearance combinator, tier grants no bypass.
    assert_eq!(as_teller.status(), StatusCode::FORBIDDEN);
}

#[rstest]
#[case(Clearance::Customer, StatusCode::FORBIDDEN)]
#[case(Clearance::Teller, StatusCode::FORBIDDEN)]
#[case(Clearance::Admin, StatusCode::OK)]
#[tokio::test]
async fn user_listing_requires_admin_clearance(
    #[case] clearance: Clearance,
    #[case] expected: StatusCode,
) {
    let app = TestApp::new();
    let (_, token) = seed_user(&app, clearance).await;

    let response = send(&app.router, get("/user/all", Some(&token))).await;

    assert_eq!(response.status(), expected);
}

#[rstest]
#[case(Clearance::Customer, StatusCode::FORBIDDEN)]
#[case(Clearance::Teller, StatusCode::OK)]
#[case(Clearance::Admin, StatusCode::OK)]
#[tokio::test]
async fn service_listing_requires_teller_clearance(
    #[case] clearance: Clearance,
    #[case] expected: StatusCode,
) {
    let app = TestApp::new();
    let (_, token) = seed_user(&app, clearance).await;

    let response = send(&app.router, get("/service", Some(&token))).await;

    assert_eq!(response.status(), expected);
}
