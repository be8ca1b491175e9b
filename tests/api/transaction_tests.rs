//! Transaction routes: posting, endpoint validation, ownership via either
//! endpoint and reversal.

use crate::common::*;
use axum::http::StatusCode;
use ledger_api::domain::Clearance;
use rstest::rstest;
use serde_json::json;
use uuid::Uuid;

#[rstest]
#[tokio::test]
async fn posting_between_existing_services_succeeds() {
    let app = TestApp::new();
    let (_, token) = seed_user(&app, Clearance::Customer).await;
    let source = seed_service(&app, None).await;
    let destination = seed_service(&app, None).await;
    let body = json!({
        "currency": "JPY",
        "amount": "500",
        "source": source.id,
        "destination": destination.id,
    });

    let response = send(&app.router, json_request("POST", "/transaction", Some(&token), &body)).await;

    assert_eq!(response.status(), StatusCode::CREATED);
    assert!(json_body(response).await["id"].is_string());
}

#[rstest]
#[tokio::test]
async fn posting_to_unknown_service_is_rejected() {
    let app = TestApp::new();
    let (_, token) = seed_user(&app, Clearance::Customer).await;
    let source = seed_service(&app, None).await;
    let body = json!({
        "currency": "JPY",
        "amount": "500",
        "source": source.id,
        "destination": Uuid::new_v4(),
    });

    let response = send(&app.router, json_request("POST", "/transaction", Some(&token), &body)).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[rstest]
#[case("0")]
#[case("-500")]
#[tokio::test]
async fn non_positive_amount_is_rejected(#[case] amount: &str) {
    let app = TestApp::new();
    let (_, token) = seed_user(&app, Clearance::Customer).await;
    let source = seed_service(&app, None).await;
    let destination = seed_service(&app, None).await;
    let body = json!({
        "currency": "JPY",
        "amount": amount,
        "source": source.id,
        "destination": destination.id,
    });

    let response = send(&app.router, json_request("POST", "/transaction", Some(&token), &body)).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[rstest]
#[tokio::test]
async fn currency_mismatch_is_rejected() {
    let app = TestApp::new();
    let (_, token) = seed_user(&app, Clearance::Customer).await;
    // Seeded services are JPY accounts.
    let source = seed_service(&app, None).await;
    let destination = seed_service(&app, None).await;
    let body = json!({
        "currency": "USD",
        "amount": "500",
        "source": source.id,
        "destination": destination.id,
    });

    let response = send(&app.router, json_request("POST", "/transaction", Some(&token), &body)).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[rstest]
#[tokio::test]
async fn owning_either_endpoint_grants_read_access() {
    let app = TestApp::new();
    let (source_owner, source_token) = seed_user(&app, Clearance::Customer).await;
    let (destination_owner, destination_token) = seed_user(&app, Clearance::Customer).await;
    let (_, outsider_token) = seed_user(&app, Clearance::Customer).await;
    let source = seed_service(&app, Some(source_owner.id)).await;
    let destination = seed_service(&app, Some(destination_owner.id)).await;
    let transaction = seed_transaction(&app, source.id, destination.id).await;
    let path = format!("/transaction/{}", transaction.id);

    let by_source = send(&app.router, get(&path, Some(&source_token))).await;
    let by_destination = send(&app.router, get(&path, Some(&destination_token))).await;
    let by_outsider = send(&app.router, get(&path, Some(&outsider_token))).await;

    assert_eq!(by_source.status(), StatusCode::OK);
    assert_eq!(by_destination.status(), StatusCode::OK);
    assert_eq!(by_outsider.status(), StatusCode::FORBIDDEN);
}

#[rstest]
#[tokio::test]
async fn service_transaction_listing_covers_both_directions() {
    let app = TestApp::new();
    let (owner, token) = seed_user(&app, Clearance::Customer).await;
    let mine = seed_service(&app, Some(owner.id)).await;
    let other = seed_service(&app, None).await;
    let outgoing = seed_transaction(&app, mine.id, other.id).await;
    let incoming = seed_transaction(&app, other.id, mine.id).await;
    seed_transaction(&app, other.id, other.id).await;

    let response = send(
        &app.router,
        get(&format!("/service/{}/transaction", mine.id), Some(&token)),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let ids: Vec<String> = ndjson_lines(response)
        .await
        .iter()
        .map(|line| line["id"].as_str().unwrap().to_owned())
        .collect();
    assert_eq!(ids.len(), 2);
    assert!(ids.contains(&outgoing.id.to_string()));
    assert!(ids.contains(&incoming.id.to_string()));
}

#[rstest]
#[tokio::test]
async fn teller_reverses_a_pending_transaction_once() {
    let app = TestApp::new();
    let (_, token) = seed_user(&app, Clearance::Teller).await;
    let source = seed_service(&app, None).await;
    let destination = seed_service(&app, None).await;
    let transaction = seed_transaction(&app, source.id, destination.id).await;
    let path = format!("/transaction/{}", transaction.id);

    let first = send(&app.router, delete(&path, Some(&token))).await;
    assert_eq!(first.status(), StatusCode::OK);
    assert_eq!(json_body(first).await["state"], "reversed");

    // Reversed is terminal.
    let second = send(&app.router, delete(&path, Some(&token))).await;
    assert_eq!(second.status(), StatusCode::BAD_REQUEST);
}

#[rstest]
#[tokio::test]
async fn customer_cannot_reverse_even_an_owned_transaction() {
    let app = TestApp::new();
    let (owner, token) = seed_user(&app, Clearance::Customer).await;
    let source = seed_service(&app, Some(owner.id)).await;
    let destination = seed_service(&app, None).await;
    let transaction = seed_transaction(&app, source.id, destination.id).await;

    let response = send(
        &app.router,
        delete(&format!("/transaction/{}", transaction.id), Some(&token)),
    )
    .await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[rstest]
#[tokio::test]
async fn unknown_transaction_is_denied_for_customers_and_missing_for_tellers() {
    let app = TestApp::new();
    let (_, customer_token) = seed_user(&app, Clearance::Customer).await;
    let (_, teller_token) = seed_user(&app, Clearance::Teller).await;
    let path = format!("/transaction/{}", Uuid::new_v4());

    let as_customer = send(&app.router, get(&path, Some(&customer_token))).await;
    let as_teller = send(&app.router, get(&path, Some(&teller_token))).await;

    assert_eq!(as_customer.status(), StatusCode::FORBIDDEN);
    assert_eq!(as_teller.status(), StatusCode::NOT_FOUND);
}
