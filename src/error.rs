//! Error types and HTTP error response handling.
//!
//! Every operation fails with exactly one [`AppError`]. The two domain
//! categories are [`AppError::NotFound`] (an identifier does not resolve) and
//! [`AppError::BusinessRule`] (the entities exist but the request violates a
//! rule). Store failures travel as [`AppError::Database`].

use std::fmt;

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

/// The kind of entity a lookup failed to resolve.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entity {
    Account,
    Pocket,
    SourceAccount,
    DestinationAccount,
    Transaction,
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Entity::Account => "account",
            Entity::Pocket => "pocket",
            Entity::SourceAccount => "source account",
            Entity::DestinationAccount => "destination account",
            Entity::Transaction => "transaction",
        };
        f.write_str(name)
    }
}

/// A domain rule that rejected an otherwise well-formed request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum RuleViolation {
    #[error("account not active")]
    AccountNotActive,

    #[error("duplicate pocket name")]
    DuplicatePocketName,

    /// Amount is zero, negative, NaN or infinite.
    #[error("invalid amount")]
    InvalidAmount,

    #[error("pocket does not belong to account")]
    PocketNotOwned,

    /// Balance is strictly less than the requested amount.
    #[error("insufficient funds")]
    InsufficientFunds,

    #[error("same account")]
    SameAccount,
}

impl RuleViolation {
    /// Stable machine-readable code used in HTTP error bodies.
    pub fn code(&self) -> &'static str {
        match self {
            RuleViolation::AccountNotActive => "account_not_active",
            RuleViolation::DuplicatePocketName => "duplicate_pocket_name",
            RuleViolation::InvalidAmount => "invalid_amount",
            RuleViolation::PocketNotOwned => "pocket_not_owned",
            RuleViolation::InsufficientFunds => "insufficient_funds",
            RuleViolation::SameAccount => "same_account",
        }
    }
}

/// Application-wide error type.
///
/// # Error Categories
///
/// - **Resource Errors**: a referenced entity does not exist
/// - **Business Logic Errors**: operations that violate business rules
/// - **Database Errors**: any `sqlx::Error` raised by the store
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Returns HTTP 404 Not Found.
    #[error("{0} not found")]
    NotFound(Entity),

    /// Returns HTTP 400 Bad Request.
    #[error(transparent)]
    BusinessRule(#[from] RuleViolation),

    /// Returns HTTP 500 and hides the details from the client.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl AppError {
    /// The rule that rejected the request, if this is a business-rule error.
    pub fn rule(&self) -> Option<RuleViolation> {
        match self {
            AppError::BusinessRule(rule) => Some(*rule),
            _ => None,
        }
    }
}

/// Convert AppError into an HTTP response.
///
/// All errors return JSON in this format:
/// ```json
/// {
///   "error": {
///     "code": "insufficient_funds",
///     "message": "insufficient funds"
///   }
/// }
/// ```
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            AppError::NotFound(_) => (StatusCode::NOT_FOUND, "not_found", self.to_string()),
            AppError::BusinessRule(rule) => (StatusCode::BAD_REQUEST, rule.code(), rule.to_string()),
            AppError::Database(ref e) => {
                tracing::error!("Database error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "An internal error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}
