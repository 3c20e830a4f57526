//! Account HTTP handlers.
//!
//! - POST /api/v1/accounts - Open an account
//! - GET /api/v1/accounts/{id} - Get account by ID

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use uuid::Uuid;

use crate::{
    error::AppError,
    models::account::{Account, NewAccount},
    services::account_service,
    store::Store,
};

/// Open a new account.
///
/// # Request Body
///
/// ```json
/// {
///   "status": "ACTIVE",
///   "balance": 5000.0
/// }
/// ```
///
/// # Response
///
/// - **201 Created**: the new account
/// - **400**: negative or non-finite opening balance
pub async fn create_account<S: Store>(
    State(store): State<S>,
    Json(request): Json<NewAccount>,
) -> Result<(StatusCode, Json<Account>), AppError> {
    let account = account_service::create_account(&store, &request).await?;
    Ok((StatusCode::CREATED, Json(account)))
}

/// Get a specific account by ID.
///
/// # Response
///
/// - **200 OK**: account details
/// - **404**: account not found
pub async fn get_account<S: Store>(
    State(store): State<S>,
    Path(account_id): Path<Uuid>,
) -> Result<Json<Account>, AppError> {
    let account = account_service::get_account(&store, account_id).await?;
    Ok(Json(account))
}
