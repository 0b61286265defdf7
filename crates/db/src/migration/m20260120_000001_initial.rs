//! Initial database migration.
//!
//! Creates the four tables, their indexes, the five backstop triggers, and
//! seeds the system accounts. Idempotent on re-run: everything uses
//! `IF NOT EXISTS` / `INSERT OR IGNORE`.

use sea_orm::{DbBackend, Statement};
use sea_orm_migration::prelude::*;
use tracing::info;

use lariledger_core::chart::SYSTEM_ACCOUNTS;
use lariledger_shared::types::money::WILDCARD_CURRENCY;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        db.execute_unprepared(TABLES_SQL).await?;
        db.execute_unprepared(TRIGGERS_SQL).await?;

        // Seed system accounts. All are USD except the FX intermediary,
        // which is the sole holder of the wildcard currency.
        for account in SYSTEM_ACCOUNTS {
            let currency = if account.id == "~fx" { WILDCARD_CURRENCY } else { "USD" };
            db.execute(Statement::from_sql_and_values(
                DbBackend::Sqlite,
                "INSERT OR IGNORE INTO accounts (id, name, code, category, currency, is_system) \
                 VALUES (?, ?, ?, ?, ?, 1)",
                [
                    account.id.into(),
                    account.name.into(),
                    account.code.into(),
                    account.category.as_str().into(),
                    currency.into(),
                ],
            ))
            .await?;
        }
        info!(accounts = SYSTEM_ACCOUNTS.len(), "system accounts seeded");

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(DROP_ALL_SQL).await?;
        Ok(())
    }
}

const TABLES_SQL: &str = r"
CREATE TABLE IF NOT EXISTS accounts (
    id         TEXT PRIMARY KEY,
    name       TEXT NOT NULL,
    code       INTEGER NOT NULL,
    category   TEXT NOT NULL CHECK (category IN ('assets','liabilities','equity','revenue','expenses')),
    currency   TEXT NOT NULL DEFAULT 'USD',
    is_system  INTEGER NOT NULL DEFAULT 0,
    created_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ','now'))
);

CREATE INDEX IF NOT EXISTS idx_accounts_category ON accounts(category);
CREATE INDEX IF NOT EXISTS idx_accounts_code ON accounts(code);

CREATE TABLE IF NOT EXISTS transactions (
    id          TEXT PRIMARY KEY,
    description TEXT NOT NULL,
    finalized   INTEGER NOT NULL DEFAULT 0,
    posted_at   TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ','now'))
);

CREATE INDEX IF NOT EXISTS idx_transactions_posted ON transactions(posted_at);

CREATE TABLE IF NOT EXISTS entries (
    id             INTEGER PRIMARY KEY AUTOINCREMENT,
    transaction_id TEXT NOT NULL REFERENCES transactions(id),
    account_id     TEXT NOT NULL REFERENCES accounts(id),
    amount         INTEGER NOT NULL,
    currency       TEXT NOT NULL,
    created_at     TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ','now'))
);

CREATE INDEX IF NOT EXISTS idx_entries_txn ON entries(transaction_id);
CREATE INDEX IF NOT EXISTS idx_entries_account ON entries(account_id);

CREATE TABLE IF NOT EXISTS coa_settings (
    code    INTEGER NOT NULL,
    setting TEXT NOT NULL,
    value   TEXT NOT NULL,
    PRIMARY KEY (code, setting)
);
";

// The storage-level backstop: even a buggy admission path cannot persist
// invalid state past these.
const TRIGGERS_SQL: &str = r"
-- Finalizing an unbalanced transaction is rejected (per-currency check).
CREATE TRIGGER IF NOT EXISTS trg_check_balance
BEFORE UPDATE OF finalized ON transactions
WHEN NEW.finalized = 1
BEGIN
    SELECT CASE
        WHEN EXISTS (
            SELECT currency, SUM(amount) AS total
            FROM entries
            WHERE transaction_id = NEW.id
            GROUP BY currency
            HAVING total != 0
        )
        THEN RAISE(ABORT, 'transaction entries do not balance: per-currency sum != 0')
    END;
END;

-- Entries of a finalized transaction are immutable: no inserts...
CREATE TRIGGER IF NOT EXISTS trg_immutable_entries_insert
BEFORE INSERT ON entries
WHEN (SELECT finalized FROM transactions WHERE id = NEW.transaction_id) = 1
BEGIN
    SELECT RAISE(ABORT, 'cannot add entries to a finalized transaction');
END;

-- ...no updates...
CREATE TRIGGER IF NOT EXISTS trg_immutable_entries_update
BEFORE UPDATE ON entries
WHEN (SELECT finalized FROM transactions WHERE id = OLD.transaction_id) = 1
BEGIN
    SELECT RAISE(ABORT, 'cannot modify entries of a finalized transaction');
END;

-- ...no deletes.
CREATE TRIGGER IF NOT EXISTS trg_immutable_entries_delete
BEFORE DELETE ON entries
WHEN (SELECT finalized FROM transactions WHERE id = OLD.transaction_id) = 1
BEGIN
    SELECT RAISE(ABORT, 'cannot remove entries from a finalized transaction');
END;

-- Entry currency must match the account currency, wildcard excepted.
CREATE TRIGGER IF NOT EXISTS trg_entry_currency_match
BEFORE INSERT ON entries
WHEN (SELECT currency FROM accounts WHERE id = NEW.account_id) != '*'
    AND NEW.currency != (SELECT currency FROM accounts WHERE id = NEW.account_id)
BEGIN
    SELECT RAISE(ABORT, 'entry currency does not match account currency');
END;
";

const DROP_ALL_SQL: &str = r"
DROP TRIGGER IF EXISTS trg_entry_currency_match;
DROP TRIGGER IF EXISTS trg_immutable_entries_delete;
DROP TRIGGER IF EXISTS trg_immutable_entries_update;
DROP TRIGGER IF EXISTS trg_immutable_entries_insert;
DROP TRIGGER IF EXISTS trg_check_balance;

DROP TABLE IF EXISTS coa_settings;
DROP TABLE IF EXISTS entries;
DROP TABLE IF EXISTS transactions;
DROP TABLE IF EXISTS accounts;
";
