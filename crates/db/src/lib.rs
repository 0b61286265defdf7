//! SQLite store for the lariledger kernel.
//!
//! This crate provides:
//! - `SeaORM` entity definitions for the four tables
//! - The migration creating schema, indexes, triggers, and seed accounts
//! - Repository abstractions for data access
//!
//! The store follows a strict connection discipline: all mutating
//! operations serialize through a single-connection writer pool, while
//! reads go to a pool sized to the machine's core count. WAL journaling
//! lets readers proceed concurrently with the writer.

pub mod entities;
pub mod migration;
pub mod repositories;

pub use repositories::{
    AccountRepository, ReportRepository, SettingRepository, TransactionRepository,
};

use std::time::Duration;

use sea_orm::{DatabaseConnection, DbErr, RuntimeErr, SqlxSqliteConnector};
use sea_orm_migration::MigratorTrait;
use sqlx::sqlite::{
    SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous,
};
use tracing::info;

use lariledger_shared::DatabaseConfig;
use migration::Migrator;

/// The dual-pool SQLite store.
///
/// Cheap to clone; both handles are pooled connections.
#[derive(Debug, Clone)]
pub struct Store {
    writer: DatabaseConnection,
    reader: DatabaseConnection,
}

impl Store {
    /// Opens (creating if missing) the database file, applies pending
    /// migrations, and returns the store.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or a migration fails.
    pub async fn open(config: &DatabaseConfig) -> Result<Self, DbErr> {
        let writer = connect_pool(config, 1).await?;
        let reader = connect_pool(config, config.reader_pool_size()).await?;

        Migrator::up(&writer, None).await?;
        info!(path = %config.path, "ledger store ready");

        Ok(Self { writer, reader })
    }

    /// The single-connection writer handle.
    #[must_use]
    pub fn writer(&self) -> &DatabaseConnection {
        &self.writer
    }

    /// The reader pool handle.
    #[must_use]
    pub fn reader(&self) -> &DatabaseConnection {
        &self.reader
    }

    /// Account repository over this store.
    #[must_use]
    pub fn accounts(&self) -> AccountRepository {
        AccountRepository::new(self.writer.clone(), self.reader.clone())
    }

    /// Transaction repository over this store.
    #[must_use]
    pub fn transactions(&self) -> TransactionRepository {
        TransactionRepository::new(self.writer.clone(), self.reader.clone())
    }

    /// Settings repository over this store.
    #[must_use]
    pub fn settings(&self) -> SettingRepository {
        SettingRepository::new(self.writer.clone(), self.reader.clone())
    }

    /// Report repository over this store.
    #[must_use]
    pub fn reports(&self) -> ReportRepository {
        ReportRepository::new(self.reader.clone())
    }
}

/// Builds one pool against the database file.
///
/// Both pools share the same options: WAL journaling (readers proceed
/// concurrently with the writer), `synchronous = NORMAL`, foreign keys on,
/// and a bounded busy wait under contention.
async fn connect_pool(config: &DatabaseConfig, max_connections: u32) -> Result<DatabaseConnection, DbErr> {
    let options = SqliteConnectOptions::new()
        .filename(&config.path)
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .synchronous(SqliteSynchronous::Normal)
        .busy_timeout(Duration::from_secs(config.busy_timeout_secs))
        .foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(max_connections)
        .connect_with(options)
        .await
        .map_err(|e| DbErr::Conn(RuntimeErr::SqlxError(e)))?;

    Ok(SqlxSqliteConnector::from_sqlx_sqlite_pool(pool))
}
