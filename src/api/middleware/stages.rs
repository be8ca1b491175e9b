//! Cross-cutting pipeline stages: request logging, body-size enforcement
//! and bearer-token authentication.

use std::net::SocketAddr;

use axum::extract::{ConnectInfo, Request, State};
use axum::http::HeaderMap;
use axum::http::header::{AUTHORIZATION, CONTENT_LENGTH};
use axum::middleware::Next;
use axum::response::Response;
use uuid::Uuid;

use crate::api::error::ApiError;
use crate::auth::{AuthError, validate_token};
use crate::infrastructure::AppDependencies;

use super::gates::AuthenticatedUser;

/// Logs the request line and declared body size, then always passes.
pub async fn log_request(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_owned();
    let origin = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map_or_else(|| "-".to_owned(), |info| info.0.to_string());
    let size = declared_body_size(request.headers());

    tracing::info!(%method, path, origin, size, "handling request");

    next.run(request).await
}

/// Rejects requests whose declared body size exceeds `limit` bytes.
///
/// The check reads `Content-Length` only; the body is never buffered here.
pub async fn enforce_upload_limit(
    limit: u64,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    if declared_body_size(request.headers()) > limit {
        return Err(ApiError::PayloadTooLarge { limit });
    }

    Ok(next.run(request).await)
}

/// Validates the `Authorization: Bearer` token and records the caller.
///
/// On success the caller's user id is attached to the request as an
/// [`AuthenticatedUser`] extension for downstream gates and handlers.
pub async fn authenticate(
    State(dependencies): State<AppDependencies>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = bearer_token(request.headers()).ok_or(AuthError::MissingCredential)?;
    let user_id = validate_token(token, dependencies.token_key())?;

    request.extensions_mut().insert(AuthenticatedUser(user_id));
    Ok(next.run(request).await)
}

/// Reads the caller identity attached by [`authenticate`].
///
/// A missing extension means the pipeline was assembled without the
/// authentication stage, which is a server bug, not a client fault.
pub fn caller_id(request: &Request) -> Result<Uuid, ApiError> {
    request
        .extensions()
        .get::<AuthenticatedUser>()
        .map(|caller| caller.0)
        .ok_or_else(|| ApiError::Internal("authentication stage did not run".to_owned()))
}

fn declared_body_size(headers: &HeaderMap) -> u64 {
    headers
        .get(CONTENT_LENGTH)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.parse().ok())
        .unwrap_or(0)
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
}
