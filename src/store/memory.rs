//! In-process store.
//!
//! A unit of work takes the store's async mutex for its whole lifetime and
//! works on a private copy of the state. `commit` swaps the copy in;
//! `rollback` or drop leaves the shared state untouched. Units are therefore
//! fully serialized.

use std::{collections::HashMap, sync::Arc};

use chrono::Utc;
use tokio::sync::{Mutex, OwnedMutexGuard};
use uuid::Uuid;

use crate::{
    error::{AppError, Entity, RuleViolation},
    models::{
        account::{Account, NewAccount},
        pocket::{NewPocket, Pocket},
        transaction::{NewTransaction, Transaction},
    },
    store::{AccountStore, PocketStore, Store, TransactionStore, UnitOfWork},
};

#[derive(Debug, Clone, Default)]
struct State {
    accounts: HashMap<Uuid, Account>,
    /// Creation order
    pockets: Vec<Pocket>,
    transactions: HashMap<Uuid, Transaction>,
    #[cfg(test)]
    fail_transaction_inserts: bool,
    #[cfg(test)]
    fail_pocket_saves: bool,
}

/// Store that keeps everything in memory behind a shared async mutex.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    state: Arc<Mutex<State>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every later `insert_transaction` fail like a broken connection.
    #[cfg(test)]
    pub(crate) async fn fail_transaction_inserts(&self) {
        self.state.lock().await.fail_transaction_inserts = true;
    }

    /// Make every later `save_pocket` fail like a broken connection.
    #[cfg(test)]
    pub(crate) async fn fail_pocket_saves(&self) {
        self.state.lock().await.fail_pocket_saves = true;
    }
}

impl Store for MemoryStore {
    type Tx = MemoryUnitOfWork;

    async fn begin(&self) -> Result<MemoryUnitOfWork, AppError> {
        let guard = self.state.clone().lock_owned().await;
        let working = guard.clone();
        Ok(MemoryUnitOfWork { guard, working })
    }

    async fn ping(&self) -> Result<(), AppError> {
        Ok(())
    }
}

pub struct MemoryUnitOfWork {
    guard: OwnedMutexGuard<State>,
    working: State,
}

impl AccountStore for MemoryUnitOfWork {
    async fn insert_account(&mut self, account: &NewAccount) -> Result<Account, AppError> {
        let now = Utc::now();
        let account = Account {
            id: Uuid::new_v4(),
            status: account.status,
            balance: account.balance,
            created_at: now,
            updated_at: now,
        };
        self.working.accounts.insert(account.id, account.clone());
        Ok(account)
    }

    async fn find_account(&mut self, id: Uuid) -> Result<Option<Account>, AppError> {
        Ok(self.working.accounts.get(&id).cloned())
    }

    async fn peek_account(&mut self, id: Uuid) -> Result<Option<Account>, AppError> {
        self.find_account(id).await
    }

    async fn find_accounts(&mut self, ids: &[Uuid]) -> Result<Vec<Account>, AppError> {
        let mut accounts: Vec<Account> = self
            .working
            .accounts
            .values()
            .filter(|account| ids.contains(&account.id))
            .cloned()
            .collect();
        accounts.sort_by_key(|account| account.id);
        Ok(accounts)
    }

    async fn save_account(&mut self, account: &Account) -> Result<Account, AppError> {
        let stored = self
            .working
            .accounts
            .get_mut(&account.id)
            .ok_or(AppError::Database(sqlx::Error::RowNotFound))?;
        stored.status = account.status;
        stored.balance = account.balance;
        stored.updated_at = Utc::now();
        Ok(stored.clone())
    }
}

impl PocketStore for MemoryUnitOfWork {
    async fn insert_pocket(
        &mut self,
        account_id: Uuid,
        pocket: &NewPocket,
    ) -> Result<Pocket, AppError> {
        if !self.working.accounts.contains_key(&account_id) {
            return Err(AppError::NotFound(Entity::Account));
        }
        if self
            .working
            .pockets
            .iter()
            .any(|p| p.account_id == account_id && p.name == pocket.name)
        {
            return Err(RuleViolation::DuplicatePocketName.into());
        }

        let pocket = Pocket {
            id: Uuid::new_v4(),
            account_id,
            name: pocket.name.clone(),
            balance: pocket.opening_balance(),
            created_at: Utc::now(),
        };
        self.working.pockets.push(pocket.clone());
        Ok(pocket)
    }

    async fn find_pocket(&mut self, id: Uuid) -> Result<Option<Pocket>, AppError> {
        Ok(self.working.pockets.iter().find(|p| p.id == id).cloned())
    }

    async fn find_pockets_by_account(&mut self, account_id: Uuid) -> Result<Vec<Pocket>, AppError> {
        Ok(self
            .working
            .pockets
            .iter()
            .filter(|p| p.account_id == account_id)
            .cloned()
            .collect())
    }

    async fn save_pocket(&mut self, pocket: &Pocket) -> Result<Pocket, AppError> {
        #[cfg(test)]
        if self.working.fail_pocket_saves {
            return Err(AppError::Database(sqlx::Error::Protocol(
                "injected failure".to_string(),
            )));
        }

        let stored = self
            .working
            .pockets
            .iter_mut()
            .find(|p| p.id == pocket.id)
            .ok_or(AppError::Database(sqlx::Error::RowNotFound))?;
        stored.balance = pocket.balance;
        Ok(stored.clone())
    }
}

impl TransactionStore for MemoryUnitOfWork {
    async fn insert_transaction(
        &mut self,
        transaction: &NewTransaction,
    ) -> Result<Transaction, AppError> {
        #[cfg(test)]
        if self.working.fail_transaction_inserts {
            return Err(AppError::Database(sqlx::Error::Protocol(
                "injected failure".to_string(),
            )));
        }

        let transaction = Transaction {
            id: Uuid::new_v4(),
            account_id: transaction.account_id,
            kind: transaction.kind,
            amount: transaction.amount,
            created_at: transaction.created_at,
        };
        self.working
            .transactions
            .insert(transaction.id, transaction.clone());
        Ok(transaction)
    }

    async fn find_transaction(&mut self, id: Uuid) -> Result<Option<Transaction>, AppError> {
        Ok(self.working.transactions.get(&id).cloned())
    }
}

impl UnitOfWork for MemoryUnitOfWork {
    async fn commit(self) -> Result<(), AppError> {
        let MemoryUnitOfWork { mut guard, working } = self;
        *guard = working;
        Ok(())
    }

    async fn rollback(self) -> Result<(), AppError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn committed_changes_are_visible_to_later_units() {
        let store = MemoryStore::new();

        let mut tx = store.begin().await.unwrap();
        let account = tx.insert_account(&NewAccount::default()).await.unwrap();
        tx.commit().await.unwrap();

        let mut tx = store.begin().await.unwrap();
        assert_eq!(tx.find_account(account.id).await.unwrap(), Some(account));
    }

    #[tokio::test]
    async fn rolled_back_changes_are_discarded() {
        let store = MemoryStore::new();

        let mut tx = store.begin().await.unwrap();
        let account = tx.insert_account(&NewAccount::default()).await.unwrap();
        tx.rollback().await.unwrap();

        let mut tx = store.begin().await.unwrap();
        assert_eq!(tx.find_account(account.id).await.unwrap(), None);
    }

    #[tokio::test]
    async fn dropped_unit_behaves_like_rollback() {
        let store = MemoryStore::new();

        let account_id = {
            let mut tx = store.begin().await.unwrap();
            tx.insert_account(&NewAccount::default()).await.unwrap().id
        };

        let mut tx = store.begin().await.unwrap();
        assert_eq!(tx.find_account(account_id).await.unwrap(), None);
    }

    #[tokio::test]
    async fn find_accounts_orders_by_id_and_skips_unknown_ids() {
        let store = MemoryStore::new();
        let mut tx = store.begin().await.unwrap();
        let a = tx.insert_account(&NewAccount::default()).await.unwrap();
        let b = tx.insert_account(&NewAccount::default()).await.unwrap();

        let found = tx.find_accounts(&[b.id, Uuid::new_v4(), a.id]).await.unwrap();

        let mut expected = vec![a.id, b.id];
        expected.sort();
        let ids: Vec<Uuid> = found.iter().map(|account| account.id).collect();
        assert_eq!(ids, expected);
    }

    #[tokio::test]
    async fn pocket_names_are_unique_per_account() {
        let store = MemoryStore::new();
        let mut tx = store.begin().await.unwrap();
        let account = tx.insert_account(&NewAccount::default()).await.unwrap();
        let other = tx.insert_account(&NewAccount::default()).await.unwrap();

        tx.insert_pocket(account.id, &NewPocket::named("Travel"))
            .await
            .unwrap();
        let duplicate = tx
            .insert_pocket(account.id, &NewPocket::named("Travel"))
            .await
            .unwrap_err();
        assert_eq!(duplicate.rule(), Some(RuleViolation::DuplicatePocketName));

        tx.insert_pocket(other.id, &NewPocket::named("Travel"))
            .await
            .unwrap();
        tx.insert_pocket(account.id, &NewPocket::named("travel"))
            .await
            .unwrap();

        let names: Vec<String> = tx
            .find_pockets_by_account(account.id)
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.name)
            .collect();
        assert_eq!(names, vec!["Travel", "travel"]);
    }
}
