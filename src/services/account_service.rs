//! Account service - opening and looking up accounts.

use uuid::Uuid;

use crate::{
    error::{AppError, Entity},
    models::account::{Account, NewAccount},
    services::{finish, validate_opening_balance},
    store::{AccountStore, Store},
};

/// Open a new account.
///
/// The opening balance must be finite and not negative.
pub async fn create_account<S: Store>(store: &S, new_account: &NewAccount) -> Result<Account, AppError> {
    validate_opening_balance(new_account.balance)?;

    let mut tx = store.begin().await?;
    let outcome = tx.insert_account(new_account).await;
    let account = finish(tx, outcome).await?;

    tracing::info!(account_id = %account.id, status = ?account.status, "Account opened");
    Ok(account)
}

/// Get an account by ID.
pub async fn get_account<S: Store>(store: &S, account_id: Uuid) -> Result<Account, AppError> {
    let mut tx = store.begin().await?;
    let outcome = tx
        .peek_account(account_id)
        .await
        .and_then(|account| account.ok_or(AppError::NotFound(Entity::Account)));
    finish(tx, outcome).await
}
