//! Integration tests for the storage-level trigger backstop.
//!
//! These go around the application layer on purpose: raw statements
//! against the writer verify that the store itself refuses invalid state,
//! even where the transaction engine would have rejected earlier.

mod common;

use common::{draft, entry, open_store, seed_account};
use sea_orm::{ConnectionTrait, DbBackend, Statement};

async fn exec_raw(
    test: &common::TestStore,
    sql: &str,
    values: Vec<sea_orm::Value>,
) -> Result<sea_orm::ExecResult, sea_orm::DbErr> {
    test.store
        .writer()
        .execute(Statement::from_sql_and_values(DbBackend::Sqlite, sql, values))
        .await
}

#[tokio::test]
async fn test_insert_into_finalized_transaction_rejected() {
    let test = open_store().await;
    seed_account(&test.store, "2020-alice", 2020, "USD").await;
    seed_account(&test.store, "2020-bob", 2020, "USD").await;

    let posted = test
        .store
        .transactions()
        .create(&draft(
            "transfer",
            vec![entry("2020-alice", 100, "USD"), entry("2020-bob", -100, "USD")],
        ))
        .await
        .expect("post");

    let err = exec_raw(
        &test,
        "INSERT INTO entries (transaction_id, account_id, amount, currency) VALUES (?, ?, ?, ?)",
        vec![posted.id.clone().into(), "2020-alice".into(), 1i64.into(), "USD".into()],
    )
    .await
    .expect_err("trigger must reject the insert");
    assert!(err.to_string().contains("finalized"));
}

#[tokio::test]
async fn test_update_and_delete_of_finalized_entries_rejected() {
    let test = open_store().await;
    seed_account(&test.store, "2020-alice", 2020, "USD").await;
    seed_account(&test.store, "2020-bob", 2020, "USD").await;

    let posted = test
        .store
        .transactions()
        .create(&draft(
            "transfer",
            vec![entry("2020-alice", 100, "USD"), entry("2020-bob", -100, "USD")],
        ))
        .await
        .expect("post");
    let entry_id = posted.entries[0].id;

    let err = exec_raw(
        &test,
        "UPDATE entries SET amount = amount + 1 WHERE id = ?",
        vec![entry_id.into()],
    )
    .await
    .expect_err("trigger must reject the update");
    assert!(err.to_string().contains("finalized"));

    let err = exec_raw(&test, "DELETE FROM entries WHERE id = ?", vec![entry_id.into()])
        .await
        .expect_err("trigger must reject the delete");
    assert!(err.to_string().contains("finalized"));
}

#[tokio::test]
async fn test_finalizing_unbalanced_transaction_rejected() {
    let test = open_store().await;
    seed_account(&test.store, "2020-alice", 2020, "USD").await;

    // Build the invalid state by hand: an unfinalized header with a single
    // one-sided entry.
    exec_raw(
        &test,
        "INSERT INTO transactions (id, description, finalized) VALUES (?, ?, 0)",
        vec!["txn-lopsided".into(), "smuggled".into()],
    )
    .await
    .expect("insert header");
    exec_raw(
        &test,
        "INSERT INTO entries (transaction_id, account_id, amount, currency) VALUES (?, ?, ?, ?)",
        vec!["txn-lopsided".into(), "2020-alice".into(), 100i64.into(), "USD".into()],
    )
    .await
    .expect("insert lone entry");

    let err = exec_raw(
        &test,
        "UPDATE transactions SET finalized = 1 WHERE id = ?",
        vec!["txn-lopsided".into()],
    )
    .await
    .expect_err("trigger must reject the finalize");
    assert!(err.to_string().contains("balance"));
}

#[tokio::test]
async fn test_currency_mismatch_rejected_at_storage_level() {
    let test = open_store().await;
    seed_account(&test.store, "2020-alice", 2020, "USD").await;

    exec_raw(
        &test,
        "INSERT INTO transactions (id, description, finalized) VALUES (?, ?, 0)",
        vec!["txn-mismatch".into(), "smuggled".into()],
    )
    .await
    .expect("insert header");

    let err = exec_raw(
        &test,
        "INSERT INTO entries (transaction_id, account_id, amount, currency) VALUES (?, ?, ?, ?)",
        vec!["txn-mismatch".into(), "2020-alice".into(), 100i64.into(), "EUR".into()],
    )
    .await
    .expect_err("trigger must reject the mismatch");
    assert!(err.to_string().contains("currency"));
}

#[tokio::test]
async fn test_wildcard_account_accepts_any_currency_at_storage_level() {
    let test = open_store().await;

    exec_raw(
        &test,
        "INSERT INTO transactions (id, description, finalized) VALUES (?, ?, 0)",
        vec!["txn-fx-raw".into(), "wildcard legs".into()],
    )
    .await
    .expect("insert header");

    // ~fx is seeded with the wildcard currency: any entry currency passes
    // trigger 5.
    for (amount, currency) in [(100i64, "USD"), (-100i64, "USD"), (85i64, "EUR"), (-85i64, "EUR")] {
        exec_raw(
            &test,
            "INSERT INTO entries (transaction_id, account_id, amount, currency) VALUES (?, ?, ?, ?)",
            vec!["txn-fx-raw".into(), "~fx".into(), amount.into(), currency.into()],
        )
        .await
        .expect("wildcard leg accepted");
    }

    exec_raw(
        &test,
        "UPDATE transactions SET finalized = 1 WHERE id = ?",
        vec!["txn-fx-raw".into()],
    )
    .await
    .expect("balanced per currency, finalize passes");
}
