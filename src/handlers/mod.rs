//! HTTP request handlers (route handlers).
//!
//! Each handler extracts path and JSON input, calls one service operation
//! against the shared store and renders the result as JSON. Errors are
//! rendered by `AppError`'s `IntoResponse` implementation.

/// Account endpoints
pub mod accounts;
/// Service health endpoint
pub mod health;
/// Pocket creation, listing and funding endpoints
pub mod pockets;
/// Transfer endpoints
pub mod transactions;
