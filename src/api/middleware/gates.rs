//! Authorization gates.
//!
//! Gates run after authentication and decide whether the caller may reach
//! the handler. Two facts matter: the caller's clearance (looked up fresh
//! from the store, never trusted from the token) and whether the caller
//! owns the resource named in the path.

use axum::extract::{Path, Request, State};
use axum::middleware::Next;
use axum::response::Response;
use uuid::Uuid;

use crate::api::error::ApiError;
use crate::domain::Clearance;
use crate::infrastructure::AppDependencies;
use crate::store::StoreError;

use super::stages::caller_id;

/// Caller identity attached to the request by the authentication stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthenticatedUser(pub Uuid);

/// Which kind of resource an ownership gate inspects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OwnershipKind {
    /// The path id names a service; ownership is a direct link.
    Service,
    /// The path id names a transaction; owning either endpoint service
    /// counts as owning the transaction.
    Transaction,
}

/// Passes when the caller's clearance meets `floor`.
pub async fn require_clearance(
    State(dependencies): State<AppDependencies>,
    floor: Clearance,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let caller = caller_id(&request)?;
    let caller = load_caller_clearance(&dependencies, caller).await?;

    if caller.satisfies(floor) {
        Ok(next.run(request).await)
    } else {
        Err(ApiError::Authorization)
    }
}

/// Passes when the caller owns the resource named in the path.
pub async fn require_ownership(
    State(dependencies): State<AppDependencies>,
    kind: OwnershipKind,
    Path(resource_id): Path<Uuid>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let caller = caller_id(&request)?;

    if owns_resource(&dependencies, caller, kind, resource_id).await? {
        Ok(next.run(request).await)
    } else {
        Err(ApiError::Authorization)
    }
}

/// Passes on sufficient clearance, falling back to an ownership check.
///
/// The clearance branch runs first so staff requests never pay for the
/// ownership lookup.
pub async fn require_clearance_or_ownership(
    State(dependencies): State<AppDependencies>,
    floor: Clearance,
    kind: OwnershipKind,
    Path(resource_id): Path<Uuid>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let caller = caller_id(&request)?;
    let clearance = load_caller_clearance(&dependencies, caller).await?;
    if clearance.satisfies(floor) {
        return Ok(next.run(request).await);
    }

    if owns_resource(&dependencies, caller, kind, resource_id).await? {
        Ok(next.run(request).await)
    } else {
        Err(ApiError::Authorization)
    }
}

async fn load_caller_clearance(
    dependencies: &AppDependencies,
    caller: Uuid,
) -> Result<Clearance, ApiError> {
    let user = dependencies.store().find_user(caller).await.map_err(|error| {
        // An authenticated id that resolves to no user is a stale token.
        if error.is_not_found() {
            ApiError::Authentication(crate::auth::AuthError::BadCredentials)
        } else {
            error.into()
        }
    })?;

    Ok(user.clearance)
}

async fn owns_resource(
    dependencies: &AppDependencies,
    caller: Uuid,
    kind: OwnershipKind,
    resource_id: Uuid,
) -> Result<bool, ApiError> {
    let store = dependencies.store();
    match kind {
        OwnershipKind::Service => Ok(store.user_owns_service(caller, resource_id).await?),
        OwnershipKind::Transaction => {
            let transaction = match store.find_transaction(resource_id).await {
                Ok(transaction) => transaction,
                // Unknown transaction: deny here, the handler's 404 never runs.
                Err(StoreError::NotFound) => return Ok(false),
                Err(error) => return Err(error.into()),
            };

            if store.user_owns_service(caller, transaction.source).await? {
                return Ok(true);
            }
            Ok(store.user_owns_service(caller, transaction.destination).await?)
        }
    }
}
