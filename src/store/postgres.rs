//! PostgreSQL store.
//!
//! # Isolation
//!
//! Units of work run at the default READ COMMITTED level. Every account and
//! pocket row read for writing is locked with `FOR UPDATE`, so a second
//! unit touching the same row blocks until the first commits or rolls back
//! and then reads the committed post-state. Units over disjoint rows never
//! wait on each other. `peek_account` and the pocket listing take no locks.

use sqlx::{Postgres, Transaction as DbTransaction};
use uuid::Uuid;

use crate::{
    db::DbPool,
    error::{AppError, RuleViolation},
    models::{
        account::{Account, NewAccount},
        pocket::{NewPocket, Pocket},
        transaction::{NewTransaction, Transaction},
    },
    store::{AccountStore, PocketStore, Store, TransactionStore, UnitOfWork},
};

const ACCOUNT_COLUMNS: &str = "id, status, balance, created_at, updated_at";
const POCKET_COLUMNS: &str = "id, account_id, name, balance, created_at";

/// Store backed by a PostgreSQL connection pool.
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: DbPool,
}

impl PgStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

impl Store for PgStore {
    type Tx = PgUnitOfWork;

    async fn begin(&self) -> Result<PgUnitOfWork, AppError> {
        let tx = self.pool.begin().await?;
        Ok(PgUnitOfWork { tx })
    }

    async fn ping(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

/// One database transaction. Dropping it without commit rolls it back.
pub struct PgUnitOfWork {
    tx: DbTransaction<'static, Postgres>,
}

impl AccountStore for PgUnitOfWork {
    async fn insert_account(&mut self, account: &NewAccount) -> Result<Account, AppError> {
        let account = sqlx::query_as::<_, Account>(&format!(
            "INSERT INTO accounts (status, balance) VALUES ($1, $2) RETURNING {ACCOUNT_COLUMNS}"
        ))
        .bind(account.status)
        .bind(account.balance)
        .fetch_one(&mut *self.tx)
        .await?;

        Ok(account)
    }

    async fn find_account(&mut self, id: Uuid) -> Result<Option<Account>, AppError> {
        let account = sqlx::query_as::<_, Account>(&format!(
            "SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE id = $1 FOR UPDATE"
        ))
        .bind(id)
        .fetch_optional(&mut *self.tx)
        .await?;

        Ok(account)
    }

    async fn peek_account(&mut self, id: Uuid) -> Result<Option<Account>, AppError> {
        let account = sqlx::query_as::<_, Account>(&format!(
            "SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&mut *self.tx)
        .await?;

        Ok(account)
    }

    async fn find_accounts(&mut self, ids: &[Uuid]) -> Result<Vec<Account>, AppError> {
        // A single ordered lock statement keeps opposite transfers between
        // the same pair of accounts from deadlocking
        let accounts = sqlx::query_as::<_, Account>(&format!(
            "SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE id = ANY($1) ORDER BY id FOR UPDATE"
        ))
        .bind(ids)
        .fetch_all(&mut *self.tx)
        .await?;

        Ok(accounts)
    }

    async fn save_account(&mut self, account: &Account) -> Result<Account, AppError> {
        let account = sqlx::query_as::<_, Account>(&format!(
            r#"
            UPDATE accounts
            SET status = $1,
                balance = $2,
                updated_at = NOW()
            WHERE id = $3
            RETURNING {ACCOUNT_COLUMNS}
            "#
        ))
        .bind(account.status)
        .bind(account.balance)
        .bind(account.id)
        .fetch_one(&mut *self.tx)
        .await?;

        Ok(account)
    }
}

impl PocketStore for PgUnitOfWork {
    async fn insert_pocket(
        &mut self,
        account_id: Uuid,
        pocket: &NewPocket,
    ) -> Result<Pocket, AppError> {
        let inserted = sqlx::query_as::<_, Pocket>(&format!(
            "INSERT INTO pockets (account_id, name, balance) VALUES ($1, $2, $3) RETURNING {POCKET_COLUMNS}"
        ))
        .bind(account_id)
        .bind(&pocket.name)
        .bind(pocket.opening_balance())
        .fetch_one(&mut *self.tx)
        .await;

        match inserted {
            Ok(pocket) => Ok(pocket),
            Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
                Err(RuleViolation::DuplicatePocketName.into())
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn find_pocket(&mut self, id: Uuid) -> Result<Option<Pocket>, AppError> {
        let pocket = sqlx::query_as::<_, Pocket>(&format!(
            "SELECT {POCKET_COLUMNS} FROM pockets WHERE id = $1 FOR UPDATE"
        ))
        .bind(id)
        .fetch_optional(&mut *self.tx)
        .await?;

        Ok(pocket)
    }

    async fn find_pockets_by_account(&mut self, account_id: Uuid) -> Result<Vec<Pocket>, AppError> {
        let pockets = sqlx::query_as::<_, Pocket>(&format!(
            "SELECT {POCKET_COLUMNS} FROM pockets WHERE account_id = $1 ORDER BY created_at, id"
        ))
        .bind(account_id)
        .fetch_all(&mut *self.tx)
        .await?;

        Ok(pockets)
    }

    async fn save_pocket(&mut self, pocket: &Pocket) -> Result<Pocket, AppError> {
        let pocket = sqlx::query_as::<_, Pocket>(&format!(
            "UPDATE pockets SET balance = $1 WHERE id = $2 RETURNING {POCKET_COLUMNS}"
        ))
        .bind(pocket.balance)
        .bind(pocket.id)
        .fetch_one(&mut *self.tx)
        .await?;

        Ok(pocket)
    }
}

impl TransactionStore for PgUnitOfWork {
    async fn insert_transaction(
        &mut self,
        transaction: &NewTransaction,
    ) -> Result<Transaction, AppError> {
        let transaction = sqlx::query_as::<_, Transaction>(
            r#"
            INSERT INTO transactions (account_id, kind, amount, created_at)
            VALUES ($1, $2, $3, $4)
            RETURNING id, account_id, kind, amount, created_at
            "#,
        )
        .bind(transaction.account_id)
        .bind(transaction.kind)
        .bind(transaction.amount)
        .bind(transaction.created_at)
        .fetch_one(&mut *self.tx)
        .await?;

        Ok(transaction)
    }

    async fn find_transaction(&mut self, id: Uuid) -> Result<Option<Transaction>, AppError> {
        let transaction = sqlx::query_as::<_, Transaction>(
            "SELECT id, account_id, kind, amount, created_at FROM transactions WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&mut *self.tx)
        .await?;

        Ok(transaction)
    }
}

impl UnitOfWork for PgUnitOfWork {
    async fn commit(self) -> Result<(), AppError> {
        self.tx.commit().await?;
        Ok(())
    }

    async fn rollback(self) -> Result<(), AppError> {
        self.tx.rollback().await?;
        Ok(())
    }
}
