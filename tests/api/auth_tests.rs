//! Signup and login flows.

use crate::common::*;
use axum::http::StatusCode;
use rstest::rstest;
use serde_json::json;

#[rstest]
#[tokio::test]
async fn signup_creates_a_customer_tier_user() {
    let app = TestApp::new();
    let body = json!({
        "username": "alice",
        "password": "hunter2",
        "fullname": "Alice Doe",
    });

    let response = send(&app.router, json_request("POST", "/auth/signup", None, &body)).await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let body = json_body(response).await;
    assert_eq!(body["clearance"], "customer");
    assert_eq!(body["username"], "alice");
    assert!(body.get("passhash").is_none());
}

#[rstest]
#[case(json!({"username": "", "password": "hunter2", "fullname": "A"}))]
#[case(json!({"username": "alice", "password": "", "fullname": "A"}))]
#[tokio::test]
async fn signup_rejects_empty_credentials(#[case] body: serde_json::Value) {
    let app = TestApp::new();

    let response = send(&app.router, json_request("POST", "/auth/signup", None, &body)).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[rstest]
#[tokio::test]
async fn signup_rejects_taken_username() {
    let app = TestApp::new();
    let body = json!({
        "username": "alice",
        "password": "hunter2",
        "fullname": "Alice Doe",
    });

    let first = send(&app.router, json_request("POST", "/auth/signup", None, &body)).await;
    let second = send(&app.router, json_request("POST", "/auth/signup", None, &body)).await;

    assert_eq!(first.status(), StatusCode::CREATED);
    assert_eq!(second.status(), StatusCode::BAD_REQUEST);
}

#[rstest]
#[tokio::test]
async fn login_issues_a_usable_token() {
    let app = TestApp::new();
    let (user, _) = seed_user(&app, ledger_api::domain::Clearance::Customer).await;
    let body = json!({"username": user.username, "password": PASSWORD});

    let response = send(&app.router, json_request("POST", "/auth/login", None, &body)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let token = json_body(response).await["token"].as_str().unwrap().to_owned();

    let profile = send(&app.router, get("/user", Some(&token))).await;
    assert_eq!(profile.status(), StatusCode::OK);
    assert_eq!(json_body(profile).await["username"], user.username.as_str());
}

#[rstest]
#[tokio::test]
async fn login_rejects_wrong_password() {
    let app = TestApp::new();
    let (user, _) = seed_user(&app, ledger_api::domain::Clearance::Customer).await;
    let body = json!({"username": user.username, "password": "wrong"});

    let response = send(&app.router, json_request("POST", "/auth/login", None, &body)).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[rstest]
#[tokio::test]
async fn login_rejects_unknown_user() {
    let app = TestApp::new();
    let body = json!({"username": "nobody", "password": "hunter2"});

    let response = send(&app.router, json_request("POST", "/auth/login", None, &body)).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
