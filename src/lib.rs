//! Pocket and transfer service.
//!
//! Moves money from an account into one of its named pockets, and between
//! two accounts, each as a single all-or-nothing unit of work against a
//! relational store.
//!
//! - [`services`]: the operations (`create_pocket`, `fund_pocket`, `transfer_funds`, ...)
//! - [`store`]: the persistence contract and its Postgres and in-memory backends
//! - [`app`]: the JSON HTTP router over the operations

pub mod app;
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod models;
pub mod services;
pub mod store;
