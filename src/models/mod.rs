//! Data models representing database entities and API request bodies.

/// Account model
pub mod account;
/// Pocket (named sub-balance) model
pub mod pocket;
/// Outgoing transfer record model
pub mod transaction;
