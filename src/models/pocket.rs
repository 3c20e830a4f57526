//! Pocket data models and API request types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A named sub-balance owned by exactly one account.
///
/// # Database Table
///
/// Maps to the `pockets` table. `(account_id, name)` is unique.
#[derive(Debug, Clone, PartialEq, sqlx::FromRow, Serialize)]
pub struct Pocket {
    pub id: Uuid,

    /// Owning account
    pub account_id: Uuid,

    /// Case-sensitive, unique within the owning account
    pub name: String,

    pub balance: f64,

    pub created_at: DateTime<Utc>,
}

/// Request body for creating a pocket on an account.
///
/// # JSON Example
///
/// ```json
/// {
///   "name": "Vacations"
/// }
/// ```
///
/// An absent `balance` starts the pocket at zero.
#[derive(Debug, Clone, Deserialize)]
pub struct NewPocket {
    pub name: String,

    #[serde(default)]
    pub balance: Option<f64>,
}

impl NewPocket {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            balance: None,
        }
    }

    /// Opening balance, treating an absent value as zero.
    pub fn opening_balance(&self) -> f64 {
        self.balance.unwrap_or(0.0)
    }
}

/// Request body for moving money from an account into one of its pockets.
///
/// # JSON Example
///
/// ```json
/// {
///   "amount": 1500.0
/// }
/// ```
#[derive(Debug, Deserialize)]
pub struct FundPocketRequest {
    pub amount: f64,
}
