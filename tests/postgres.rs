//! Runs the operations against a real PostgreSQL database.
//!
//! `#[sqlx::test]` creates a fresh database per test and applies
//! `migrations/`. Run with `DATABASE_URL` set and `--ignored`.

use pocket_transfer_service::{
    error::{AppError, Entity, RuleViolation},
    models::{
        account::{AccountStatus, NewAccount},
        pocket::NewPocket,
        transaction::TransactionKind,
    },
    services::{account_service, pocket_service, transaction_service},
    store::postgres::PgStore,
};
use sqlx::PgPool;
use uuid::Uuid;

async fn open_account(store: &PgStore, status: AccountStatus, balance: f64) -> Uuid {
    account_service::create_account(store, &NewAccount { status, balance })
        .await
        .unwrap()
        .id
}

#[sqlx::test]
#[ignore = "requires DATABASE_URL"]
async fn pocket_funding_round_trip(pool: PgPool) {
    let store = PgStore::new(pool);
    let account_id = open_account(&store, AccountStatus::Active, 5000.0).await;
    let pocket = pocket_service::create_pocket(&store, account_id, &NewPocket::named("Vacations"))
        .await
        .unwrap();

    let funded = pocket_service::fund_pocket(&store, account_id, pocket.id, 1500.0)
        .await
        .unwrap();

    assert_eq!(funded.balance, 1500.0);
    let account = account_service::get_account(&store, account_id).await.unwrap();
    assert_eq!(account.balance, 3500.0);
}

#[sqlx::test]
#[ignore = "requires DATABASE_URL"]
async fn pocket_rules_are_enforced(pool: PgPool) {
    let store = PgStore::new(pool);
    let active = open_account(&store, AccountStatus::Active, 0.0).await;
    let blocked = open_account(&store, AccountStatus::Blocked, 0.0).await;

    pocket_service::create_pocket(&store, active, &NewPocket::named("Travel"))
        .await
        .unwrap();

    let duplicate = pocket_service::create_pocket(&store, active, &NewPocket::named("Travel"))
        .await
        .unwrap_err();
    assert_eq!(duplicate.rule(), Some(RuleViolation::DuplicatePocketName));

    let inactive = pocket_service::create_pocket(&store, blocked, &NewPocket::named("Travel"))
        .await
        .unwrap_err();
    assert_eq!(inactive.rule(), Some(RuleViolation::AccountNotActive));
}

#[sqlx::test]
#[ignore = "requires DATABASE_URL"]
async fn transfer_round_trip(pool: PgPool) {
    let store = PgStore::new(pool);
    let source = open_account(&store, AccountStatus::Active, 5000.0).await;
    let destination = open_account(&store, AccountStatus::Active, 5000.0).await;

    let transaction = transaction_service::transfer_funds(&store, source, destination, 1500.0)
        .await
        .unwrap();

    assert_eq!(transaction.kind, TransactionKind::Outgoing);
    assert_eq!(transaction.account_id, source);
    assert_eq!(
        transaction_service::get_transaction(&store, transaction.id)
            .await
            .unwrap(),
        transaction
    );
    let source_after = account_service::get_account(&store, source).await.unwrap();
    let destination_after = account_service::get_account(&store, destination).await.unwrap();
    assert_eq!(source_after.balance, 3500.0);
    assert_eq!(destination_after.balance, 6500.0);
}

#[sqlx::test]
#[ignore = "requires DATABASE_URL"]
async fn failed_transfer_leaves_rows_untouched(pool: PgPool) {
    let store = PgStore::new(pool);
    let source = open_account(&store, AccountStatus::Active, 100.0).await;

    let err = transaction_service::transfer_funds(&store, source, Uuid::new_v4(), 50.0)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(Entity::DestinationAccount)));

    let account = account_service::get_account(&store, source).await.unwrap();
    assert_eq!(account.balance, 100.0);
}

#[sqlx::test]
#[ignore = "requires DATABASE_URL"]
async fn opposite_concurrent_transfers_do_not_deadlock(pool: PgPool) {
    let store = PgStore::new(pool);
    let a = open_account(&store, AccountStatus::Active, 1000.0).await;
    let b = open_account(&store, AccountStatus::Active, 1000.0).await;

    let mut handles = Vec::new();
    for i in 0..10 {
        let store = store.clone();
        let (from, to) = if i % 2 == 0 { (a, b) } else { (b, a) };
        handles.push(tokio::spawn(async move {
            transaction_service::transfer_funds(&store, from, to, 50.0).await
        }));
    }
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    let total = account_service::get_account(&store, a).await.unwrap().balance
        + account_service::get_account(&store, b).await.unwrap().balance;
    assert_eq!(total, 2000.0);
}

#[sqlx::test]
#[ignore = "requires DATABASE_URL"]
async fn reads_do_not_wait_for_row_locks(pool: PgPool) {
    use pocket_transfer_service::store::{AccountStore, Store, UnitOfWork};
    use std::time::Duration;

    let store = PgStore::new(pool);
    let account_id = open_account(&store, AccountStatus::Active, 100.0).await;
    pocket_service::create_pocket(&store, account_id, &NewPocket::named("Travel"))
        .await
        .unwrap();

    let mut writer = store.begin().await.unwrap();
    writer.find_account(account_id).await.unwrap().unwrap();

    let account = tokio::time::timeout(
        Duration::from_secs(5),
        account_service::get_account(&store, account_id),
    )
    .await
    .expect("get_account blocked on a locked row")
    .unwrap();
    assert_eq!(account.balance, 100.0);

    let pockets = tokio::time::timeout(
        Duration::from_secs(5),
        pocket_service::list_pockets(&store, account_id),
    )
    .await
    .expect("list_pockets blocked on a locked row")
    .unwrap();
    assert_eq!(pockets.len(), 1);

    writer.rollback().await.unwrap();
}
