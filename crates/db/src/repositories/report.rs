//! Report repository: read-side aggregation rows for the four reports.
//!
//! All queries read only through finalized transactions; an account with no
//! finalized entries sums to zero via the LEFT JOIN.

use sea_orm::{DatabaseConnection, DbBackend, DbErr, EntityTrait, FromQueryResult, Statement};

use lariledger_core::chart::{Category, ChartError};
use lariledger_core::reports::{AccountBalanceRow, CategoryCodeBalance};
use lariledger_shared::AppError;

use crate::entities::accounts;

/// Error types for report operations.
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    /// Account not found.
    #[error("account not found: {0}")]
    AccountNotFound(String),

    /// Database error.
    #[error("database error: {0}")]
    Database(#[from] DbErr),
}

impl From<ReportError> for AppError {
    fn from(err: ReportError) -> Self {
        match err {
            ReportError::AccountNotFound(_) => Self::NotFound(err.to_string()),
            ReportError::Database(e) => Self::Database(e.to_string()),
        }
    }
}

/// Report repository. Read-only; holds only a reader handle.
#[derive(Debug, Clone)]
pub struct ReportRepository {
    reader: DatabaseConnection,
}

impl ReportRepository {
    /// Creates a new report repository.
    #[must_use]
    pub const fn new(reader: DatabaseConnection) -> Self {
        Self { reader }
    }

    /// One account's finalized balance and its currency.
    ///
    /// # Errors
    ///
    /// Returns `AccountNotFound` when the account does not exist.
    pub async fn account_balance(&self, account_id: &str) -> Result<(i64, String), ReportError> {
        let account = accounts::Entity::find_by_id(account_id)
            .one(&self.reader)
            .await?
            .ok_or_else(|| ReportError::AccountNotFound(account_id.to_string()))?;

        #[derive(FromQueryResult)]
        struct BalanceRow {
            balance: i64,
        }

        let row = BalanceRow::find_by_statement(Statement::from_sql_and_values(
            DbBackend::Sqlite,
            "SELECT COALESCE(SUM(e.amount), 0) AS balance \
             FROM entries e \
             JOIN transactions t ON t.id = e.transaction_id \
             WHERE e.account_id = ? AND t.finalized = 1",
            [account_id.into()],
        ))
        .one(&self.reader)
        .await?;

        Ok((row.map_or(0, |r| r.balance), account.currency))
    }

    /// Per-account balance rows with non-zero balances, ordered by code.
    ///
    /// Input to the balance sheet and trial balance.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn balance_rows(&self) -> Result<Vec<AccountBalanceRow>, ReportError> {
        let rows = RawBalanceRow::find_by_statement(Statement::from_string(
            DbBackend::Sqlite,
            "SELECT a.id AS account_id, a.name AS account_name, a.category, a.currency, \
                    COALESCE(SUM(e.amount), 0) AS balance \
             FROM accounts a \
             LEFT JOIN entries e ON e.account_id = a.id \
             LEFT JOIN transactions t ON t.id = e.transaction_id AND t.finalized = 1 \
             GROUP BY a.id \
             HAVING balance != 0 \
             ORDER BY a.code",
        ))
        .all(&self.reader)
        .await?;

        rows.into_iter().map(RawBalanceRow::into_domain).collect()
    }

    /// Per-account balance rows for every account, zero balances included,
    /// ordered by code.
    ///
    /// Input to the open currency position, where a currency with a flat
    /// position still gets a row.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn position_rows(&self) -> Result<Vec<AccountBalanceRow>, ReportError> {
        let rows = RawBalanceRow::find_by_statement(Statement::from_string(
            DbBackend::Sqlite,
            "SELECT a.id AS account_id, a.name AS account_name, a.category, a.currency, \
                    COALESCE(SUM(e.amount), 0) AS balance \
             FROM accounts a \
             LEFT JOIN entries e ON e.account_id = a.id \
             LEFT JOIN transactions t ON t.id = e.transaction_id AND t.finalized = 1 \
             GROUP BY a.id \
             ORDER BY a.code",
        ))
        .all(&self.reader)
        .await?;

        rows.into_iter().map(RawBalanceRow::into_domain).collect()
    }

    /// Non-zero (category, code) balance groups: the single pass feeding
    /// the regulatory ratios.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn category_code_rows(&self) -> Result<Vec<CategoryCodeBalance>, ReportError> {
        #[derive(FromQueryResult)]
        struct RawRow {
            category: String,
            code: i32,
            balance: i64,
        }

        let rows = RawRow::find_by_statement(Statement::from_string(
            DbBackend::Sqlite,
            "SELECT a.category, a.code, COALESCE(SUM(e.amount), 0) AS balance \
             FROM accounts a \
             LEFT JOIN entries e ON e.account_id = a.id \
             LEFT JOIN transactions t ON t.id = e.transaction_id AND t.finalized = 1 \
             GROUP BY a.category, a.code \
             HAVING balance != 0",
        ))
        .all(&self.reader)
        .await?;

        rows.into_iter()
            .map(|row| {
                let category: Category = row
                    .category
                    .parse()
                    .map_err(|e: ChartError| DbErr::Custom(e.to_string()))?;
                Ok(CategoryCodeBalance {
                    category,
                    code: row.code,
                    balance: row.balance,
                })
            })
            .collect()
    }
}

#[derive(FromQueryResult)]
struct RawBalanceRow {
    account_id: String,
    account_name: String,
    category: String,
    currency: String,
    balance: i64,
}

impl RawBalanceRow {
    fn into_domain(self) -> Result<AccountBalanceRow, ReportError> {
        let category: Category = self
            .category
            .parse()
            .map_err(|e: ChartError| DbErr::Custom(e.to_string()))?;
        Ok(AccountBalanceRow {
            account_id: self.account_id,
            account_name: self.account_name,
            category,
            currency: self.currency,
            balance: self.balance,
        })
    }
}
