//! User profile routes.

use axum::Json;
use axum::extract::{Extension, Query, State};
use axum::response::Response;

use crate::api::dto::{PaginationParams, UpdateUserRequest, UserResponse};
use crate::api::error::ApiError;
use crate::api::middleware::AuthenticatedUser;
use crate::auth::hash_password;
use crate::domain::User;
use crate::infrastructure::AppDependencies;
use crate::store::UserProfileUpdate;

use super::ndjson_page;

/// `GET /user` — the caller's own profile.
pub async fn get_self(
    State(dependencies): State<AppDependencies>,
    Extension(AuthenticatedUser(caller)): Extension<AuthenticatedUser>,
) -> Result<Json<UserResponse>, ApiError> {
    let user = dependencies.store().find_user(caller).await?;

    Ok(Json(UserResponse::from(user)))
}

/// `PUT /user` — partial update of the caller's own profile.
///
/// Clearance is not part of the patch and cannot be changed here. Returns
/// the updated profile.
pub async fn update_self(
    State(dependencies): State<AppDependencies>,
    Extension(AuthenticatedUser(caller)): Extension<AuthenticatedUser>,
    Json(request): Json<UpdateUserRequest>,
) -> Result<Json<UserResponse>, ApiError> {
    if let Some(username) = &request.username
        && username.trim().is_empty()
    {
        return Err(ApiError::Validation("username must not be empty".to_owned()));
    }
    if let Some(password) = &request.password
        && password.is_empty()
    {
        return Err(ApiError::Validation("password must not be empty".to_owned()));
    }

    let passhash = match &request.password {
        Some(password) => Some(hash_password(password)?),
        None => None,
    };
    let patch = UserProfileUpdate {
        username: request.username,
        fullname: request.fullname,
        passhash,
    };

    let store = dependencies.store();
    store.update_user_profile(caller, &patch).await?;
    let updated = store.find_user(caller).await?;

    Ok(Json(UserResponse::from(updated)))
}

/// `DELETE /user` — removes the caller's own account.
///
/// Ownership links go with the user; linked services are left in place.
/// Tokens already issued for the id fail with 401 at the next gate.
pub async fn delete_self(
    State(dependencies): State<AppDependencies>,
    Extension(AuthenticatedUser(caller)): Extension<AuthenticatedUser>,
) -> Result<Json<UserResponse>, ApiError> {
    let store = dependencies.store();
    let user = store.find_user(caller).await?;
    store.delete_user(caller).await?;

    tracing::info!(user_id = %caller, "user deleted");
    Ok(Json(UserResponse::from(user)))
}

/// `GET /user/all` — one page of users, admin only.
pub async fn list_users(
    State(dependencies): State<AppDependencies>,
    Query(params): Query<PaginationParams>,
) -> Result<Response, ApiError> {
    let page = dependencies.store().list_users(params.cursor).await?;

    Ok(ndjson_page::<User, UserResponse, _>(page))
}
