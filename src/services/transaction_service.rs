//! Transaction service - Core business logic for account-to-account transfers.
//!
//! This service handles:
//! - Amount and balance validation
//! - Atomic balance updates on both accounts
//! - Recording the OUTGOING transaction on the source account
//!
//! # Atomicity Guarantees
//!
//! Both balance updates and the transaction record are written in one unit
//! of work. A failure at any step, including the final insert, rolls back
//! every change.

use uuid::Uuid;

use crate::{
    error::{AppError, Entity, RuleViolation},
    models::transaction::{NewTransaction, Transaction},
    services::{credited, ensure_sufficient_funds, finish, validate_amount},
    store::{AccountStore, Store, TransactionStore, UnitOfWork},
};

/// Execute a transfer (move money between accounts).
///
/// # Process
///
/// 1. Validate the amount (before any store access)
/// 2. Lock both accounts in id order
/// 3. Check existence (source first), distinctness and source balance
/// 4. Debit the source, credit the destination
/// 5. Record the OUTGOING transaction and commit
///
/// # Errors
///
/// - `BusinessRule(invalid amount)`: Amount is not positive and finite
/// - `NotFound(source account)` / `NotFound(destination account)`
/// - `BusinessRule(same account)`: Source and destination are the same account
/// - `BusinessRule(insufficient funds)`: Source balance is below `amount`
/// - `BusinessRule(invalid amount)`: Destination balance would overflow
/// - `Database`: Store failure
pub async fn transfer_funds<S: Store>(
    store: &S,
    source_id: Uuid,
    destination_id: Uuid,
    amount: f64,
) -> Result<Transaction, AppError> {
    tracing::info!(%source_id, %destination_id, amount, "Starting transfer");

    validate_amount(amount)?;

    let mut tx = store.begin().await?;
    let outcome = move_between_accounts(&mut tx, source_id, destination_id, amount).await;
    let transaction = finish(tx, outcome).await?;

    tracing::info!(transaction_id = %transaction.id, "Transfer completed");
    Ok(transaction)
}

async fn move_between_accounts<U: UnitOfWork>(
    tx: &mut U,
    source_id: Uuid,
    destination_id: Uuid,
    amount: f64,
) -> Result<Transaction, AppError> {
    let accounts = tx.find_accounts(&[source_id, destination_id]).await?;

    let mut source = accounts
        .iter()
        .find(|account| account.id == source_id)
        .cloned()
        .ok_or(AppError::NotFound(Entity::SourceAccount))?;

    let mut destination = accounts
        .into_iter()
        .find(|account| account.id == destination_id)
        .ok_or(AppError::NotFound(Entity::DestinationAccount))?;

    if source_id == destination_id {
        return Err(RuleViolation::SameAccount.into());
    }

    ensure_sufficient_funds(source.balance, amount)?;

    destination.balance = credited(destination.balance, amount)?;
    source.balance -= amount;

    tx.save_account(&source).await?;
    tx.save_account(&destination).await?;

    tx.insert_transaction(&NewTransaction::outgoing(source_id, amount))
        .await
}

/// Get transaction by ID.
pub async fn get_transaction<S: Store>(
    store: &S,
    transaction_id: Uuid,
) -> Result<Transaction, AppError> {
    let mut tx = store.begin().await?;
    let outcome = tx
        .find_transaction(transaction_id)
        .await
        .and_then(|transaction| transaction.ok_or(AppError::NotFound(Entity::Transaction)));
    finish(tx, outcome).await
}
