//! Transaction (posting) routes.

use axum::extract::{Path, Query, State};
use axum::response::Response;
use axum::{Json, http::StatusCode};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::api::dto::{CreateTransactionRequest, CreatedResponse, PaginationParams,
    TransactionResponse};
use crate::api::error::ApiError;
use crate::domain::{Service, Transaction, TransactionState};
use crate::infrastructure::AppDependencies;
use crate::store::StoreError;

use super::ndjson_page;

/// `POST /transaction` — records a pending posting between two services.
///
/// Both endpoints must name existing services and the posting currency must
/// match both. Settlement (balance movement) happens elsewhere.
pub async fn create_transaction(
    State(dependencies): State<AppDependencies>,
    Json(request): Json<CreateTransactionRequest>,
) -> Result<(StatusCode, Json<CreatedResponse>), ApiError> {
    if request.amount <= Decimal::ZERO {
        return Err(ApiError::Validation("amount must be positive".to_owned()));
    }
    if request.source == request.destination {
        return Err(ApiError::Validation(
            "source and destination must differ".to_owned(),
        ));
    }

    let source = endpoint_service(&dependencies, request.source, "source").await?;
    let destination = endpoint_service(&dependencies, request.destination, "destination").await?;

    if source.currency != request.currency || destination.currency != request.currency {
        return Err(ApiError::Validation(
            "posting currency must match both services".to_owned(),
        ));
    }

    let transaction = Transaction::post(
        request.currency,
        request.amount,
        request.source,
        request.destination,
    );
    dependencies.store().create_transaction(&transaction).await?;

    tracing::info!(transaction_id = %transaction.id, "transaction posted");
    Ok((
        StatusCode::CREATED,
        Json(CreatedResponse { id: transaction.id }),
    ))
}

/// `GET /transaction/{id}` — one transaction.
pub async fn get_transaction(
    State(dependencies): State<AppDependencies>,
    Path(id): Path<Uuid>,
) -> Result<Json<TransactionResponse>, ApiError> {
    let transaction = dependencies.store().find_transaction(id).await?;

    Ok(Json(TransactionResponse::from(transaction)))
}

/// `GET /transaction` — one page of all transactions, teller and above.
pub async fn list_transactions(
    State(dependencies): State<AppDependencies>,
    Query(params): Query<PaginationParams>,
) -> Result<Response, ApiError> {
    let page = dependencies
        .store()
        .list_transactions(params.cursor)
        .await?;

    Ok(ndjson_page::<Transaction, TransactionResponse, _>(page))
}

/// `GET /service/{id}/transaction` — one page of postings touching a service.
pub async fn list_service_transactions(
    State(dependencies): State<AppDependencies>,
    Path(service_id): Path<Uuid>,
    Query(params): Query<PaginationParams>,
) -> Result<Response, ApiError> {
    let page = dependencies
        .store()
        .list_transactions_for_service(service_id, params.cursor)
        .await?;

    Ok(ndjson_page::<Transaction, TransactionResponse, _>(page))
}

/// `DELETE /transaction/{id}` — reverses a posting.
///
/// Reversal is a lifecycle transition, not a deletion; the row is kept.
pub async fn reverse_transaction(
    State(dependencies): State<AppDependencies>,
    Path(id): Path<Uuid>,
) -> Result<Json<TransactionResponse>, ApiError> {
    let store = dependencies.store();
    let mut transaction = store.find_transaction(id).await?;

    if !transaction
        .state
        .can_transition_to(TransactionState::Reversed)
    {
        return Err(ApiError::Validation(format!(
            "transaction is already {}",
            transaction.state
        )));
    }

    store
        .update_transaction_state(id, TransactionState::Reversed)
        .await?;
    transaction.state = TransactionState::Reversed;

    tracing::info!(transaction_id = %id, "transaction reversed");
    Ok(Json(TransactionResponse::from(transaction)))
}

async fn endpoint_service(
    dependencies: &AppDependencies,
    id: Uuid,
    role: &str,
) -> Result<Service, ApiError> {
    match dependencies.store().find_service(id).await {
        Ok(service) => Ok(service),
        Err(StoreError::NotFound) => Err(ApiError::Validation(format!(
            "{role} service {id} does not exist"
        ))),
        Err(error) => Err(error.into()),
    }
}
