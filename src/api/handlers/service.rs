//! Service (account) routes.

use axum::extract::{Extension, Path, Query, State};
use axum::response::Response;
use axum::{Json, http::StatusCode};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::api::dto::{CreateServiceRequest, PaginationParams, ServiceResponse};
use crate::api::error::ApiError;
use crate::api::middleware::AuthenticatedUser;
use crate::domain::{Service, ServiceState};
use crate::infrastructure::AppDependencies;

use super::ndjson_page;

/// `POST /service` — opens a service and links it to the caller.
pub async fn create_service(
    State(dependencies): State<AppDependencies>,
    Extension(AuthenticatedUser(caller)): Extension<AuthenticatedUser>,
    Json(request): Json<CreateServiceRequest>,
) -> Result<(StatusCode, Json<ServiceResponse>), ApiError> {
    if request.init_balance < Decimal::ZERO {
        return Err(ApiError::Validation(
            "opening balance must not be negative".to_owned(),
        ));
    }

    let service = Service::open(request.kind, request.currency, request.init_balance);
    let store = dependencies.store();
    store.create_service(&service).await?;
    store.link_service_to_user(service.id, caller).await?;

    tracing::info!(service_id = %service.id, owner = %caller, "service opened");
    Ok((StatusCode::CREATED, Json(ServiceResponse::from(service))))
}

/// `GET /service/{id}` — one service.
pub async fn get_service(
    State(dependencies): State<AppDependencies>,
    Path(id): Path<Uuid>,
) -> Result<Json<ServiceResponse>, ApiError> {
    let service = dependencies.store().find_service(id).await?;

    Ok(Json(ServiceResponse::from(service)))
}

/// `GET /service` — one page of all services, teller and above.
pub async fn list_services(
    State(dependencies): State<AppDependencies>,
    Query(params): Query<PaginationParams>,
) -> Result<Response, ApiError> {
    let page = dependencies.store().list_services(params.cursor).await?;

    Ok(ndjson_page::<Service, ServiceResponse, _>(page))
}

/// `GET /service/mine` — one page of the caller's own services.
pub async fn list_my_services(
    State(dependencies): State<AppDependencies>,
    Extension(AuthenticatedUser(caller)): Extension<AuthenticatedUser>,
    Query(params): Query<PaginationParams>,
) -> Result<Response, ApiError> {
    let page = dependencies
        .store()
        .list_services_for_user(caller, params.cursor)
        .await?;

    Ok(ndjson_page::<Service, ServiceResponse, _>(page))
}

/// `DELETE /service/{id}` — closes a service.
///
/// Closing is a forward-only lifecycle transition; the row is kept.
pub async fn close_service(
    State(dependencies): State<AppDependencies>,
    Path(id): Path<Uuid>,
) -> Result<Json<ServiceResponse>, ApiError> {
    let store = dependencies.store();
    let mut service = store.find_service(id).await?;

    if !service.state.can_transition_to(ServiceState::Closed) {
        return Err(ApiError::Validation(format!(
            "service is already {}",
            service.state
        )));
    }

    store.update_service_state(id, ServiceState::Closed).await?;
    service.state = ServiceState::Closed;

    tracing::info!(service_id = %id, "service closed");
    Ok(Json(ServiceResponse::from(service)))
}
