//! Concurrency tests for the single-writer admission discipline.

mod common;

use common::{draft, entry, open_store, seed_account};
use lariledger_core::ledger::LedgerError;
use lariledger_core::settings::{CoaSetting, SettingName};
use lariledger_db::repositories::TransactionError;

/// Two admissions that would each, in isolation, drain a blocked account to
/// exactly zero can never both succeed: the projection reads inside the
/// writer's unit of work, and writes are serialized.
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_no_double_spend_on_blocked_account() {
    let test = open_store().await;
    seed_account(&test.store, "1020-ar", 1020, "USD").await;
    seed_account(&test.store, "2020-alice", 2020, "USD").await;

    test.store
        .settings()
        .upsert(&CoaSetting {
            code: 1020,
            setting: SettingName::BlockInverted,
            value: "1".to_string(),
        })
        .await
        .expect("enable blocking");

    test.store
        .transactions()
        .create(&draft(
            "fund",
            vec![entry("1020-ar", 100, "USD"), entry("2020-alice", -100, "USD")],
        ))
        .await
        .expect("fund");

    let spend = |label: &str| {
        let transactions = test.store.transactions();
        let candidate = draft(
            label,
            vec![entry("1020-ar", -100, "USD"), entry("2020-alice", 100, "USD")],
        );
        async move { transactions.create(&candidate).await }
    };

    let (first, second) = tokio::join!(spend("spend A"), spend("spend B"));

    let successes = [&first, &second].iter().filter(|r| r.is_ok()).count();
    assert_eq!(successes, 1, "exactly one drain may win: {first:?} / {second:?}");

    let loser = if first.is_err() { first } else { second };
    assert!(matches!(
        loser,
        Err(TransactionError::Ledger(LedgerError::InvertedBalance { .. }))
    ));

    let (balance, _) = test
        .store
        .reports()
        .account_balance("1020-ar")
        .await
        .expect("balance");
    assert_eq!(balance, 0);
}

/// Parallel independent admissions all land, and the per-account totals
/// agree with the sum of what was admitted.
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_parallel_deposits_serialize_cleanly() {
    let test = open_store().await;
    seed_account(&test.store, "<vault:usd>", 1010, "USD").await;
    seed_account(&test.store, "2020-alice", 2020, "USD").await;

    let mut handles = Vec::new();
    for i in 1..=10i64 {
        let transactions = test.store.transactions();
        handles.push(tokio::spawn(async move {
            let amount = i * 1_000;
            transactions
                .create(&draft(
                    &format!("deposit {i}"),
                    vec![entry("<vault:usd>", amount, "USD"), entry("2020-alice", -amount, "USD")],
                ))
                .await
        }));
    }

    for handle in handles {
        handle.await.expect("join").expect("every deposit admitted");
    }

    let (vault, _) = test
        .store
        .reports()
        .account_balance("<vault:usd>")
        .await
        .expect("balance");
    // 1k + 2k + ... + 10k
    assert_eq!(vault, 55_000);
}
