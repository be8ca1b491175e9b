//! Signup and login.
//!
//! The only two routes that run without the authentication stage.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;

use crate::api::dto::{LoginRequest, SignUpRequest, TokenResponse, UserResponse};
use crate::api::error::ApiError;
use crate::auth::{AuthError, hash_password, issue_token, verify_password};
use crate::domain::User;
use crate::infrastructure::AppDependencies;
use crate::store::StoreError;

/// `POST /auth/signup` — registers a new customer-tier user.
pub async fn sign_up(
    State(dependencies): State<AppDependencies>,
    Json(request): Json<SignUpRequest>,
) -> Result<(StatusCode, Json<UserResponse>), ApiError> {
    if request.username.trim().is_empty() {
        return Err(ApiError::Validation("username must not be empty".to_owned()));
    }
    if request.password.is_empty() {
        return Err(ApiError::Validation("password must not be empty".to_owned()));
    }

    match dependencies
        .store()
        .find_user_by_username(&request.username)
        .await
    {
        Ok(_) => {
            return Err(ApiError::Validation("username already taken".to_owned()));
        }
        Err(StoreError::NotFound) => {}
        Err(error) => return Err(error.into()),
    }

    let passhash = hash_password(&request.password)?;
    let user = User::sign_up(request.username, passhash, request.fullname);
    dependencies.store().create_user(&user).await?;

    tracing::info!(user_id = %user.id, "user registered");
    Ok((StatusCode::CREATED, Json(UserResponse::from(user))))
}

/// `POST /auth/login` — exchanges credentials for a bearer token.
pub async fn login(
    State(dependencies): State<AppDependencies>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<TokenResponse>, ApiError> {
    if request.username.is_empty() || request.password.is_empty() {
        return Err(ApiError::Validation(
            "username and password must not be empty".to_owned(),
        ));
    }

    let user = match dependencies
        .store()
        .find_user_by_username(&request.username)
        .await
    {
        Ok(user) => user,
        Err(StoreError::NotFound) => {
            // Hash anyway so unknown users take as long as bad passwords.
            let _ = hash_password(&request.password);
            return Err(ApiError::Authentication(AuthError::BadCredentials));
        }
        Err(error) => return Err(error.into()),
    };

    if !verify_password(&request.password, &user.passhash) {
        return Err(ApiError::Authentication(AuthError::BadCredentials));
    }

    let token = issue_token(user.id, dependencies.token_key())?;
    Ok(Json(TokenResponse { token }))
}
