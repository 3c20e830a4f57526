//! Pocket service - creating pockets and loading money into them.
//!
//! # Atomicity Guarantees
//!
//! Funding debits the account and credits the pocket inside one unit of
//! work. Either both balances change or neither does.

use uuid::Uuid;

use crate::{
    error::{AppError, Entity, RuleViolation},
    models::pocket::{NewPocket, Pocket},
    services::{credited, ensure_sufficient_funds, finish, validate_amount, validate_opening_balance},
    store::{AccountStore, PocketStore, Store, UnitOfWork},
};

/// Create a pocket on an account.
///
/// # Process
///
/// 1. Validate the opening balance (before any store access)
/// 2. Lock the account (must exist)
/// 3. Check that the account is active
/// 4. Check the account's pockets for the same name (case-sensitive)
/// 5. Insert the pocket and commit
///
/// # Errors
///
/// - `BusinessRule(invalid amount)`: Opening balance is negative or not finite
/// - `NotFound(account)`: Account doesn't exist
/// - `BusinessRule(account not active)`: Account is blocked
/// - `BusinessRule(duplicate pocket name)`: Name already used on this account
/// - `Database`: Store failure
pub async fn create_pocket<S: Store>(
    store: &S,
    account_id: Uuid,
    new_pocket: &NewPocket,
) -> Result<Pocket, AppError> {
    tracing::info!(%account_id, name = %new_pocket.name, "Creating pocket");

    validate_opening_balance(new_pocket.opening_balance())?;

    let mut tx = store.begin().await?;
    let outcome = insert_unique_pocket(&mut tx, account_id, new_pocket).await;
    let pocket = finish(tx, outcome).await?;

    tracing::info!(%account_id, pocket_id = %pocket.id, "Pocket created");
    Ok(pocket)
}

async fn insert_unique_pocket<U: UnitOfWork>(
    tx: &mut U,
    account_id: Uuid,
    new_pocket: &NewPocket,
) -> Result<Pocket, AppError> {
    let account = tx
        .find_account(account_id)
        .await?
        .ok_or(AppError::NotFound(Entity::Account))?;

    if !account.is_active() {
        return Err(RuleViolation::AccountNotActive.into());
    }

    let existing = tx.find_pockets_by_account(account_id).await?;
    if existing.iter().any(|pocket| pocket.name == new_pocket.name) {
        return Err(RuleViolation::DuplicatePocketName.into());
    }

    tx.insert_pocket(account_id, new_pocket).await
}

/// Move `amount` from an account's balance into one of its pockets.
///
/// # Process
///
/// 1. Validate the amount (before any store access)
/// 2. Lock the account, then the pocket
/// 3. Check pocket ownership and account balance
/// 4. Debit the account, credit the pocket, commit
///
/// # Errors
///
/// - `BusinessRule(invalid amount)`: Amount is not positive and finite
/// - `NotFound(account)` / `NotFound(pocket)`: Unknown identifier
/// - `BusinessRule(pocket does not belong to account)`
/// - `BusinessRule(insufficient funds)`: Account balance is below `amount`
/// - `BusinessRule(invalid amount)`: Pocket balance would overflow
/// - `Database`: Store failure
pub async fn fund_pocket<S: Store>(
    store: &S,
    account_id: Uuid,
    pocket_id: Uuid,
    amount: f64,
) -> Result<Pocket, AppError> {
    tracing::info!(%account_id, %pocket_id, amount, "Funding pocket");

    validate_amount(amount)?;

    let mut tx = store.begin().await?;
    let outcome = move_into_pocket(&mut tx, account_id, pocket_id, amount).await;
    let pocket = finish(tx, outcome).await?;

    tracing::info!(%account_id, %pocket_id, balance = pocket.balance, "Pocket funded");
    Ok(pocket)
}

async fn move_into_pocket<U: UnitOfWork>(
    tx: &mut U,
    account_id: Uuid,
    pocket_id: Uuid,
    amount: f64,
) -> Result<Pocket, AppError> {
    let mut account = tx
        .find_account(account_id)
        .await?
        .ok_or(AppError::NotFound(Entity::Account))?;

    let mut pocket = tx
        .find_pocket(pocket_id)
        .await?
        .ok_or(AppError::NotFound(Entity::Pocket))?;

    if pocket.account_id != account.id {
        return Err(RuleViolation::PocketNotOwned.into());
    }

    ensure_sufficient_funds(account.balance, amount)?;

    pocket.balance = credited(pocket.balance, amount)?;
    account.balance -= amount;

    tx.save_account(&account).await?;
    tx.save_pocket(&pocket).await
}

/// List the pockets of an account, oldest first.
pub async fn list_pockets<S: Store>(store: &S, account_id: Uuid) -> Result<Vec<Pocket>, AppError> {
    let mut tx = store.begin().await?;
    let outcome = pockets_of(&mut tx, account_id).await;
    finish(tx, outcome).await
}

async fn pockets_of<U: UnitOfWork>(tx: &mut U, account_id: Uuid) -> Result<Vec<Pocket>, AppError> {
    tx.peek_account(account_id)
        .await?
        .ok_or(AppError::NotFound(Entity::Account))?;
    tx.find_pockets_by_account(account_id).await
}
