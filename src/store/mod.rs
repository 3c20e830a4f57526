//! Persistence contract for accounts, pockets and transactions.
//!
//! All reads and writes go through a [`UnitOfWork`] opened with
//! [`Store::begin`]. A unit of work is all-or-nothing: nothing it writes is
//! visible to other units until [`UnitOfWork::commit`], and
//! [`UnitOfWork::rollback`] (or dropping it) discards every change.
//!
//! Two backends are provided:
//! - [`postgres::PgStore`]: one database transaction per unit of work, with
//!   `SELECT ... FOR UPDATE` row locks on every account and pocket it reads
//!   for writing. Read-only lookups take no locks.
//! - [`memory::MemoryStore`]: a process-local store used by tests and demos.

use std::future::Future;

use uuid::Uuid;

use crate::{
    error::AppError,
    models::{
        account::{Account, NewAccount},
        pocket::{NewPocket, Pocket},
        transaction::{NewTransaction, Transaction},
    },
};

pub mod memory;
pub mod postgres;

/// Account persistence.
pub trait AccountStore {
    fn insert_account(
        &mut self,
        account: &NewAccount,
    ) -> impl Future<Output = Result<Account, AppError>> + Send;

    /// Look up an account and lock it until the unit of work ends.
    fn find_account(
        &mut self,
        id: Uuid,
    ) -> impl Future<Output = Result<Option<Account>, AppError>> + Send;

    /// Look up an account without locking it, for read-only operations.
    fn peek_account(
        &mut self,
        id: Uuid,
    ) -> impl Future<Output = Result<Option<Account>, AppError>> + Send;

    /// Look up several accounts at once, locking them in ascending id order.
    ///
    /// Ids that do not resolve are simply absent from the result.
    fn find_accounts(
        &mut self,
        ids: &[Uuid],
    ) -> impl Future<Output = Result<Vec<Account>, AppError>> + Send;

    /// Persist the account's status and balance.
    fn save_account(
        &mut self,
        account: &Account,
    ) -> impl Future<Output = Result<Account, AppError>> + Send;
}

/// Pocket persistence.
pub trait PocketStore {
    /// Create a pocket on `account_id`.
    ///
    /// Fails with a duplicate-name rule violation when the account already
    /// has a pocket with the same name.
    fn insert_pocket(
        &mut self,
        account_id: Uuid,
        pocket: &NewPocket,
    ) -> impl Future<Output = Result<Pocket, AppError>> + Send;

    /// Look up a pocket and lock it until the unit of work ends.
    fn find_pocket(
        &mut self,
        id: Uuid,
    ) -> impl Future<Output = Result<Option<Pocket>, AppError>> + Send;

    /// All pockets of an account, oldest first.
    fn find_pockets_by_account(
        &mut self,
        account_id: Uuid,
    ) -> impl Future<Output = Result<Vec<Pocket>, AppError>> + Send;

    /// Persist the pocket's balance.
    fn save_pocket(
        &mut self,
        pocket: &Pocket,
    ) -> impl Future<Output = Result<Pocket, AppError>> + Send;
}

/// Transaction record persistence.
pub trait TransactionStore {
    fn insert_transaction(
        &mut self,
        transaction: &NewTransaction,
    ) -> impl Future<Output = Result<Transaction, AppError>> + Send;

    fn find_transaction(
        &mut self,
        id: Uuid,
    ) -> impl Future<Output = Result<Option<Transaction>, AppError>> + Send;
}

/// An open, atomic unit of work over all three stores.
pub trait UnitOfWork: AccountStore + PocketStore + TransactionStore + Send {
    /// Make every change of this unit visible at once.
    fn commit(self) -> impl Future<Output = Result<(), AppError>> + Send;

    /// Discard every change of this unit.
    fn rollback(self) -> impl Future<Output = Result<(), AppError>> + Send;
}

/// A backing store that hands out units of work.
pub trait Store: Clone + Send + Sync + 'static {
    type Tx: UnitOfWork;

    fn begin(&self) -> impl Future<Output = Result<Self::Tx, AppError>> + Send;

    /// Cheap connectivity check used by the health endpoint.
    fn ping(&self) -> impl Future<Output = Result<(), AppError>> + Send;
}
