//! Pocket HTTP handlers.
//!
//! - POST /api/v1/accounts/{id}/pockets - Create a pocket on the account
//! - GET /api/v1/accounts/{id}/pockets - List the account's pockets
//! - POST /api/v1/accounts/{id}/pockets/{pocket_id}/fund - Move money into a pocket

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use uuid::Uuid;

use crate::{
    error::AppError,
    models::pocket::{FundPocketRequest, NewPocket, Pocket},
    services::pocket_service,
    store::Store,
};

/// Create a pocket on an account.
///
/// # Request Body
///
/// ```json
/// {
///   "name": "Vacations",
///   "balance": 0.0  // optional, defaults to 0
/// }
/// ```
///
/// # Response
///
/// - **201 Created**: the persisted pocket, with its id
/// - **404**: account not found
/// - **400**: account not active, or duplicate pocket name
pub async fn create_pocket<S: Store>(
    State(store): State<S>,
    Path(account_id): Path<Uuid>,
    Json(request): Json<NewPocket>,
) -> Result<(StatusCode, Json<Pocket>), AppError> {
    let pocket = pocket_service::create_pocket(&store, account_id, &request).await?;
    Ok((StatusCode::CREATED, Json(pocket)))
}

/// List the pockets of an account, oldest first.
pub async fn list_pockets<S: Store>(
    State(store): State<S>,
    Path(account_id): Path<Uuid>,
) -> Result<Json<Vec<Pocket>>, AppError> {
    let pockets = pocket_service::list_pockets(&store, account_id).await?;
    Ok(Json(pockets))
}

/// Move money from the account into one of its pockets.
///
/// # Request Body
///
/// ```json
/// {
///   "amount": 1500.0
/// }
/// ```
///
/// # Response
///
/// - **200 OK**: the updated pocket
/// - **404**: account or pocket not found
/// - **400**: invalid amount, foreign pocket, or insufficient funds
pub async fn fund_pocket<S: Store>(
    State(store): State<S>,
    Path((account_id, pocket_id)): Path<(Uuid, Uuid)>,
    Json(request): Json<FundPocketRequest>,
) -> Result<Json<Pocket>, AppError> {
    let pocket = pocket_service::fund_pocket(&store, account_id, pocket_id, request.amount).await?;
    Ok(Json(pocket))
}
