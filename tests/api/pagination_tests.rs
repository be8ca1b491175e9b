//! Keyset pagination over the listing routes.
//!
//! Feeding the last id of one page back as the next cursor must visit every
//! row exactly once, in ascending id order, with pages capped at ten rows.

use std::collections::BTreeSet;

use crate::common::*;
use axum::http::StatusCode;
use ledger_api::domain::Clearance;
use rstest::rstest;

async fn fetch_page(app: &TestApp, token: &str, cursor: Option<&str>) -> Vec<String> {
    let path = cursor.map_or_else(
        || "/service".to_owned(),
        |cursor| format!("/service?cursor={cursor}"),
    );
    let response = send(&app.router, get(&path, Some(token))).await;
    assert_eq!(response.status(), StatusCode::OK);

    ndjson_lines(response)
        .await
        .iter()
        .map(|line| line["id"].as_str().unwrap().to_owned())
        .collect()
}

#[rstest]
#[tokio::test]
async fn chained_cursors_visit_every_service_exactly_once() {
    let app = TestApp::new();
    let (_, token) = seed_user(&app, Clearance::Teller).await;
    let mut expected = BTreeSet::new();
    for _ in 0..25 {
        expected.insert(seed_service(&app, None).await.id.to_string());
    }

    let mut seen = Vec::new();
    let mut cursor: Option<String> = None;
    loop {
        let page = fetch_page(&app, &token, cursor.as_deref()).await;
        if page.is_empty() {
            break;
        }
        assert!(page.len() <= 10);
        cursor = page.last().cloned();
        seen.extend(page);
    }

    assert_eq!(seen.len(), 25);
    assert_eq!(seen.iter().cloned().collect::<BTreeSet<_>>(), expected);
    let mut sorted = seen.clone();
    sorted.sort();
    assert_eq!(seen, sorted, "pages must arrive in ascending id order");
}

#[rstest]
#[tokio::test]
async fn page_is_capped_at_ten_rows() {
    let app = TestApp::new();
    let (_, token) = seed_user(&app, Clearance::Teller).await;
    for _ in 0..12 {
        seed_service(&app, None).await;
    }

    let page = fetch_page(&app, &token, None).await;

    assert_eq!(page.len(), 10);
}

#[rstest]
#[tokio::test]
async fn owned_service_listing_pages_only_own_rows() {
    let app = TestApp::new();
    let (owner, token) = seed_user(&app, Clearance::Customer).await;
    for _ in 0..3 {
        seed_service(&app, Some(owner.id)).await;
    }
    for _ in 0..5 {
        seed_service(&app, None).await;
    }

    let response = send(&app.router, get("/service/mine", Some(&token))).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(ndjson_lines(response).await.len(), 3);
}

#[rstest]
#[tokio::test]
async fn cursor_past_the_end_yields_an_empty_page() {
    let app = TestApp::new();
    let (_, token) = seed_user(&app, Clearance::Teller).await;
    let only = seed_service(&app, None).await;

    let page = fetch_page(&app, &token, Some(&only.id.to_string())).await;

    assert!(page.is_empty());
}
