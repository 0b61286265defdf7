//! Shared scaffolding for store integration tests.
#![allow(dead_code)]

use chrono::Utc;
use tempfile::TempDir;

use lariledger_core::chart::{category_for_code, Account};
use lariledger_core::ledger::{EntryInput, TransactionDraft};
use lariledger_db::Store;
use lariledger_shared::DatabaseConfig;

/// A store backed by a temp-dir database file; dropping it removes the
/// directory.
pub struct TestStore {
    pub store: Store,
    _dir: TempDir,
}

pub async fn open_store() -> TestStore {
    let dir = tempfile::tempdir().expect("create temp dir");
    let path = dir.path().join("ledger.db");
    let config = DatabaseConfig::new(path.to_str().expect("utf-8 temp path"));
    let store = Store::open(&config).await.expect("open store");
    TestStore { store, _dir: dir }
}

pub fn account(id: &str, code: i32, currency: &str) -> Account {
    Account {
        id: id.to_string(),
        name: format!("Test {id}"),
        code,
        category: category_for_code(code).expect("test account code"),
        currency: currency.to_string(),
        is_system: false,
        created_at: Utc::now(),
    }
}

pub async fn seed_account(store: &Store, id: &str, code: i32, currency: &str) -> Account {
    store
        .accounts()
        .create(&account(id, code, currency))
        .await
        .expect("seed account")
}

pub fn entry(account_id: &str, amount: i64, currency: &str) -> EntryInput {
    EntryInput {
        account_id: account_id.to_string(),
        amount,
        currency: currency.to_string(),
    }
}

pub fn draft(description: &str, entries: Vec<EntryInput>) -> TransactionDraft {
    TransactionDraft {
        id: None,
        description: description.to_string(),
        posted_at: None,
        entries,
    }
}
