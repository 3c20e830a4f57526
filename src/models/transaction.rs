//! Transaction data models and API request types.
//!
//! This module defines:
//! - `Transaction`: Database entity recording an outgoing transfer
//! - `NewTransaction`: Values the transfer operation hands to the store
//! - `TransferRequest`: Request body for account-to-account transfers

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Direction of a transaction relative to its account.
///
/// Maps to the Postgres enum type `transaction_kind`. Transfers record only
/// the outgoing leg on the source account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "transaction_kind", rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum TransactionKind {
    Outgoing,
}

/// Represents a transaction record from the database.
///
/// # Database Table
///
/// Maps to the `transactions` table. Records are immutable once written.
#[derive(Debug, Clone, PartialEq, sqlx::FromRow, Serialize)]
pub struct Transaction {
    pub id: Uuid,

    /// Source account of the transfer
    pub account_id: Uuid,

    pub kind: TransactionKind,

    /// Always positive and finite (enforced by CHECK constraint)
    pub amount: f64,

    /// When the transfer happened
    pub created_at: DateTime<Utc>,
}

/// A transaction that has not been persisted yet.
#[derive(Debug, Clone)]
pub struct NewTransaction {
    pub account_id: Uuid,
    pub kind: TransactionKind,
    pub amount: f64,
    pub created_at: DateTime<Utc>,
}

impl NewTransaction {
    /// Outgoing record for `account_id`, stamped with the current time.
    pub fn outgoing(account_id: Uuid, amount: f64) -> Self {
        Self {
            account_id,
            kind: TransactionKind::Outgoing,
            amount,
            created_at: Utc::now(),
        }
    }
}

/// Request to transfer money between accounts.
///
/// # JSON Example
///
/// ```json
/// {
///   "source_account_id": "550e8400-e29b-41d4-a716-446655440000",
///   "destination_account_id": "660e8400-e29b-41d4-a716-446655440001",
///   "amount": 1500.0
/// }
/// ```
///
/// # Atomicity Guarantee
///
/// Both balances and the transaction record are written in the same
/// database transaction.
#[derive(Debug, Deserialize)]
pub struct TransferRequest {
    pub source_account_id: Uuid,
    pub destination_account_id: Uuid,
    pub amount: f64,
}
