//! Transaction HTTP handlers.
//!
//! - POST /api/v1/transactions/transfer - Move money between accounts
//! - GET /api/v1/transactions/{id} - Get transaction details

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use uuid::Uuid;

use crate::{
    error::AppError,
    models::transaction::{Transaction, TransferRequest},
    services::transaction_service,
    store::Store,
};

/// Transfer money between accounts.
///
/// # Request Body
///
/// ```json
/// {
///   "source_account_id": "550e8400-...",
///   "destination_account_id": "660e8400-...",
///   "amount": 1500.0
/// }
/// ```
///
/// # Response (201)
///
/// ```json
/// {
///   "id": "770e8400-...",
///   "account_id": "550e8400-...",
///   "kind": "OUTGOING",
///   "amount": 1500.0,
///   "created_at": "2025-12-21T16:00:00Z"
/// }
/// ```
///
/// # Atomicity
///
/// Both accounts and the transaction record are written in a single
/// database transaction. Either all succeed or nothing changes.
pub async fn create_transfer<S: Store>(
    State(store): State<S>,
    Json(request): Json<TransferRequest>,
) -> Result<(StatusCode, Json<Transaction>), AppError> {
    let transaction = transaction_service::transfer_funds(
        &store,
        request.source_account_id,
        request.destination_account_id,
        request.amount,
    )
    .await?;

    Ok((StatusCode::CREATED, Json(transaction)))
}

/// Get transaction by ID.
pub async fn get_transaction<S: Store>(
    State(store): State<S>,
    Path(transaction_id): Path<Uuid>,
) -> Result<Json<Transaction>, AppError> {
    let transaction = transaction_service::get_transaction(&store, transaction_id).await?;
    Ok(Json(transaction))
}
