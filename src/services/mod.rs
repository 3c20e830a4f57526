//! Business logic services.
//!
//! Services contain core business logic separated from HTTP handlers. Each
//! public operation opens its own unit of work, runs every read, check and
//! write through it, then commits on success or rolls back on any error.

use crate::{
    error::{AppError, RuleViolation},
    store::UnitOfWork,
};

pub mod account_service;
pub mod pocket_service;
pub mod transaction_service;

/// Amounts must be strictly positive and finite. NaN fails too.
///
/// Checked before a unit of work is opened.
pub(crate) fn validate_amount(amount: f64) -> Result<(), AppError> {
    if amount.is_finite() && amount > 0.0 {
        Ok(())
    } else {
        tracing::warn!(amount, "Request rejected: invalid amount");
        Err(RuleViolation::InvalidAmount.into())
    }
}

/// Opening balances may be zero but must be finite and not negative.
pub(crate) fn validate_opening_balance(balance: f64) -> Result<(), AppError> {
    if balance.is_finite() && balance >= 0.0 {
        Ok(())
    } else {
        tracing::warn!(balance, "Request rejected: invalid opening balance");
        Err(RuleViolation::InvalidAmount.into())
    }
}

/// Balance after crediting `amount`. A credit that overflows to infinity is
/// an invalid amount.
pub(crate) fn credited(balance: f64, amount: f64) -> Result<f64, RuleViolation> {
    let credited = balance + amount;
    if credited.is_finite() {
        Ok(credited)
    } else {
        Err(RuleViolation::InvalidAmount)
    }
}

/// A balance covers an amount when it is not strictly smaller.
pub(crate) fn ensure_sufficient_funds(balance: f64, amount: f64) -> Result<(), RuleViolation> {
    if balance < amount {
        Err(RuleViolation::InsufficientFunds)
    } else {
        Ok(())
    }
}

/// Close a unit of work according to the outcome of the work done in it.
///
/// A failed rollback is logged and the original error is returned.
pub(crate) async fn finish<U, T>(tx: U, outcome: Result<T, AppError>) -> Result<T, AppError>
where
    U: UnitOfWork,
    T: Send,
{
    match outcome {
        Ok(value) => {
            tx.commit().await?;
            Ok(value)
        }
        Err(err) => {
            if let AppError::BusinessRule(rule) = &err {
                tracing::warn!(%rule, "Request rejected");
            }
            if let Err(rollback_err) = tx.rollback().await {
                tracing::error!("Rollback failed: {:?}", rollback_err);
            }
            Err(err)
        }
    }
}
