//! Account data models and API request types.
//!
//! This module defines:
//! - `Account`: Database entity representing an account
//! - `AccountStatus`: Whether an account accepts new pockets
//! - `NewAccount`: Request body for opening accounts

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lifecycle status of an account.
///
/// Maps to the Postgres enum type `account_status`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "account_status", rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum AccountStatus {
    #[default]
    Active,
    Blocked,
}

/// Represents an account record from the database.
///
/// # Database Table
///
/// Maps to the `accounts` table. Pockets reference their account through
/// `pockets.account_id`; the account itself holds no pocket list.
#[derive(Debug, Clone, PartialEq, sqlx::FromRow, Serialize)]
pub struct Account {
    /// Unique identifier for this account
    pub id: Uuid,

    /// Only `Active` accounts accept pocket creation
    pub status: AccountStatus,

    /// Current balance
    ///
    /// Never driven below zero by pocket funding or transfers.
    pub balance: f64,

    /// Timestamp when account was created
    pub created_at: DateTime<Utc>,

    /// Timestamp of last balance or status change
    pub updated_at: DateTime<Utc>,
}

impl Account {
    pub fn is_active(&self) -> bool {
        self.status == AccountStatus::Active
    }
}

/// Request body for opening a new account.
///
/// # JSON Example
///
/// ```json
/// {
///   "status": "ACTIVE",
///   "balance": 5000.0
/// }
/// ```
///
/// Both fields are optional: status defaults to `ACTIVE` and balance to 0.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewAccount {
    #[serde(default)]
    pub status: AccountStatus,

    #[serde(default)]
    pub balance: f64,
}
