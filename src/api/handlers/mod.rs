//! Route handlers.
//!
//! Handlers run after the pipeline, so they assume an authenticated and
//! authorized caller and concern themselves only with input validation and
//! store calls. Listing handlers stream one page as newline-delimited JSON;
//! a row that fails mid-stream truncates the body, which the client detects
//! as a broken line.

pub mod auth;
pub mod service;
pub mod transaction;
pub mod user;

use axum::body::Body;
use axum::http::header;
use axum::response::{IntoResponse, Response};
use futures::{Stream, StreamExt};
use serde::Serialize;

use crate::store::StoreError;

/// Content type of streamed listing responses.
pub const NDJSON: &str = "application/x-ndjson";

/// Renders a page of entities as a newline-delimited JSON response.
///
/// The stream is consumed lazily by the transport; the first failed item
/// ends the body early.
pub(crate) fn ndjson_page<T, D, S>(stream: S) -> Response
where
    T: Into<D>,
    D: Serialize,
    S: Stream<Item = Result<T, StoreError>> + Send + 'static,
{
    let body = Body::from_stream(stream.map(|item| -> Result<String, StoreError> {
        let dto: D = item?.into();
        let mut line =
            serde_json::to_string(&dto).map_err(|error| StoreError::Decode(error.to_string()))?;
        line.push('\n');
        Ok(line)
    }));

    ([(header::CONTENT_TYPE, NDJSON)], body).into_response()
}

/// Liveness probe.
pub async fn health_check() -> &'static str {
    "OK"
}
