//! Transaction repository: the admission protocol and finalized reads.

use std::collections::HashMap;

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction, DbBackend, DbErr,
    EntityTrait, FromQueryResult, JoinType, QueryFilter, QueryOrder, QuerySelect, RelationTrait,
    Set, Statement, TransactionTrait,
};
use tracing::debug;
use uuid::Uuid;

use lariledger_core::chart::Category;
use lariledger_core::ledger::{
    validate_draft, Entry, LedgerError, Transaction, TransactionDraft,
};
use lariledger_core::settings::{default_settings, CodeSettings, EntryDirection, SettingName};
use lariledger_shared::types::money::WILDCARD_CURRENCY;
use lariledger_shared::types::pagination::Page;
use lariledger_shared::AppError;

use crate::entities::{accounts, coa_settings, entries, transactions};
use crate::repositories::{format_timestamp, parse_timestamp};

/// Error types for transaction operations.
#[derive(Debug, thiserror::Error)]
pub enum TransactionError {
    /// A domain rule rejected the transaction.
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    /// Database error, including trigger aborts.
    #[error("database error: {0}")]
    Database(#[from] DbErr),
}

impl From<TransactionError> for AppError {
    fn from(err: TransactionError) -> Self {
        match err {
            TransactionError::Ledger(e) => e.into(),
            TransactionError::Database(e) => Self::Database(e.to_string()),
        }
    }
}

/// Filter options for listing transactions.
#[derive(Debug, Clone, Default)]
pub struct TransactionFilter {
    /// Only transactions touching this account.
    pub account_id: Option<String>,
    /// Limit/offset window.
    pub page: Page,
}

/// What admission resolved about one referenced account.
struct ResolvedAccount {
    code: i32,
    category: Category,
    currency: String,
}

/// Transaction repository.
#[derive(Debug, Clone)]
pub struct TransactionRepository {
    writer: DatabaseConnection,
    reader: DatabaseConnection,
}

impl TransactionRepository {
    /// Creates a new transaction repository.
    #[must_use]
    pub const fn new(writer: DatabaseConnection, reader: DatabaseConnection) -> Self {
        Self { writer, reader }
    }

    /// Admits a candidate transaction.
    ///
    /// The two-phase protocol: validate the draft before touching the
    /// writer, then inside one unit of work resolve accounts, load per-code
    /// settings, insert the header unfinalized, enforce per-entry direction
    /// while inserting entries, enforce the inverted-balance projection per
    /// account, and finalize. The finalize update re-fires the store's
    /// balance trigger as an independent backstop. Any failure rolls the
    /// whole unit back; no rows persist.
    ///
    /// # Errors
    ///
    /// Returns `Ledger` for every admission rejection and `Database` for
    /// storage failures (trigger aborts included).
    pub async fn create(&self, draft: &TransactionDraft) -> Result<Transaction, TransactionError> {
        // Normalize, then reject malformed candidates without opening a
        // store-level write.
        validate_draft(draft)?;
        let id = match draft.id.as_deref() {
            Some(explicit) if !explicit.is_empty() => explicit.to_string(),
            _ => Uuid::now_v7().to_string(),
        };
        let posted_at = draft.posted_at.unwrap_or_else(Utc::now);

        let txn = self.writer.begin().await?;

        // Resolve every distinct referenced account.
        let mut resolved: HashMap<String, ResolvedAccount> = HashMap::new();
        for entry in &draft.entries {
            if resolved.contains_key(&entry.account_id) {
                continue;
            }
            let account = accounts::Entity::find_by_id(entry.account_id.as_str())
                .one(&txn)
                .await?
                .ok_or_else(|| LedgerError::AccountNotFound(entry.account_id.clone()))?;
            let category: Category = account
                .category
                .parse()
                .map_err(|e: lariledger_core::chart::ChartError| DbErr::Custom(e.to_string()))?;
            resolved.insert(
                entry.account_id.clone(),
                ResolvedAccount {
                    code: account.code,
                    category,
                    currency: account.currency,
                },
            );
        }

        // Load settings once per distinct code.
        let mut settings: HashMap<i32, CodeSettings> = HashMap::new();
        for account in resolved.values() {
            if settings.contains_key(&account.code) {
                continue;
            }
            settings.insert(account.code, load_code_settings(&txn, account.code).await?);
        }

        // Insert the header unfinalized.
        transactions::Entity::insert(transactions::ActiveModel {
            id: Set(id.clone()),
            description: Set(draft.description.clone()),
            finalized: Set(false),
            posted_at: Set(format_timestamp(&posted_at)),
        })
        .exec_without_returning(&txn)
        .await?;

        // Enforce per-entry direction, then insert each entry in order. The
        // currency-match trigger independently verifies the same rule.
        let mut inserted = Vec::with_capacity(draft.entries.len());
        for entry in &draft.entries {
            let account = &resolved[&entry.account_id];
            let code_settings = &settings[&account.code];

            match code_settings.entry_direction {
                EntryDirection::DebitOnly if entry.amount < 0 => {
                    debug!(account = %entry.account_id, code = account.code, "entry direction rejected");
                    return Err(LedgerError::DirectionViolation {
                        account_id: entry.account_id.clone(),
                        code: account.code,
                        direction: EntryDirection::DebitOnly,
                    }
                    .into());
                }
                EntryDirection::CreditOnly if entry.amount > 0 => {
                    debug!(account = %entry.account_id, code = account.code, "entry direction rejected");
                    return Err(LedgerError::DirectionViolation {
                        account_id: entry.account_id.clone(),
                        code: account.code,
                        direction: EntryDirection::CreditOnly,
                    }
                    .into());
                }
                _ => {}
            }

            if account.currency != WILDCARD_CURRENCY && account.currency != entry.currency {
                return Err(LedgerError::CurrencyMismatch {
                    account_id: entry.account_id.clone(),
                    account_currency: account.currency.clone(),
                    entry_currency: entry.currency.clone(),
                }
                .into());
            }

            let model = entries::ActiveModel {
                transaction_id: Set(id.clone()),
                account_id: Set(entry.account_id.clone()),
                amount: Set(entry.amount),
                currency: Set(entry.currency.clone()),
                ..Default::default()
            }
            .insert(&txn)
            .await?;
            inserted.push(to_entry(model)?);
        }

        // Inverted-balance projection per blocked account. Reading the
        // finalized balance inside the writer's unit of work means it
        // cannot race with another admission.
        for (account_id, account) in &resolved {
            let code_settings = &settings[&account.code];
            if !code_settings.block_inverted {
                continue;
            }

            let existing = finalized_balance(&txn, account_id).await?;
            let delta: i64 = draft
                .entries
                .iter()
                .filter(|e| &e.account_id == account_id)
                .map(|e| e.amount)
                .sum();
            let projected = existing + delta;

            let inverted = if account.category.is_debit_normal() {
                projected < 0
            } else {
                projected > 0
            };
            if inverted {
                debug!(account = %account_id, projected, "inverted balance rejected");
                return Err(LedgerError::InvertedBalance {
                    account_id: account_id.clone(),
                    code: account.code,
                    projected,
                }
                .into());
            }
        }

        // Finalize; the balance trigger re-verifies per-currency zero sum.
        transactions::ActiveModel {
            id: Set(id.clone()),
            finalized: Set(true),
            ..Default::default()
        }
        .update(&txn)
        .await?;

        txn.commit().await?;

        Ok(Transaction {
            id,
            description: draft.description.clone(),
            finalized: true,
            posted_at,
            entries: inserted,
        })
    }

    /// Fetches a transaction with its entries in stable insertion order.
    ///
    /// # Errors
    ///
    /// Returns `Ledger(TransactionNotFound)` when no such transaction
    /// exists.
    pub async fn get(&self, id: &str) -> Result<Transaction, TransactionError> {
        let model = transactions::Entity::find_by_id(id)
            .one(&self.reader)
            .await?
            .ok_or_else(|| LedgerError::TransactionNotFound(id.to_string()))?;

        let entries = self.entries_for_transaction(id).await?;
        to_transaction(model, entries)
    }

    /// Lists finalized transactions, newest first, optionally filtered to
    /// those touching one account.
    ///
    /// Only finalized transactions are ever listed; the finalized conjunct
    /// applies in both filter branches.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn list(&self, filter: &TransactionFilter) -> Result<Vec<Transaction>, TransactionError> {
        let mut query = transactions::Entity::find()
            .filter(transactions::Column::Finalized.eq(true))
            .order_by_desc(transactions::Column::PostedAt);

        if let Some(account_id) = &filter.account_id {
            query = query
                .join(JoinType::InnerJoin, transactions::Relation::Entries.def())
                .filter(entries::Column::AccountId.eq(account_id))
                .distinct();
        }

        if filter.page.is_bounded() {
            query = query.limit(filter.page.limit).offset(filter.page.offset);
        }

        let models = query.all(&self.reader).await?;
        let mut result = Vec::with_capacity(models.len());
        for model in models {
            let entries = self.entries_for_transaction(&model.id).await?;
            result.push(to_transaction(model, entries)?);
        }
        Ok(result)
    }

    /// Lists an account's entries from finalized transactions, newest
    /// first (descending entry ID).
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn list_entries_for_account(
        &self,
        account_id: &str,
        page: &Page,
    ) -> Result<Vec<Entry>, TransactionError> {
        let mut query = entries::Entity::find()
            .filter(entries::Column::AccountId.eq(account_id))
            .join(JoinType::InnerJoin, entries::Relation::Transactions.def())
            .filter(transactions::Column::Finalized.eq(true))
            .order_by_desc(entries::Column::Id);

        if page.is_bounded() {
            query = query.limit(page.limit).offset(page.offset);
        }

        let models = query.all(&self.reader).await?;
        models.into_iter().map(|m| to_entry(m).map_err(Into::into)).collect()
    }

    /// A transaction's entries ordered by their autoincrement ID.
    async fn entries_for_transaction(&self, id: &str) -> Result<Vec<Entry>, TransactionError> {
        let models = entries::Entity::find()
            .filter(entries::Column::TransactionId.eq(id))
            .order_by_asc(entries::Column::Id)
            .all(&self.reader)
            .await?;
        models.into_iter().map(|m| to_entry(m).map_err(Into::into)).collect()
    }
}

/// Loads the resolved settings for one code inside the admission unit.
async fn load_code_settings(
    txn: &DatabaseTransaction,
    code: i32,
) -> Result<CodeSettings, DbErr> {
    let mut resolved = default_settings(code);
    let rows = coa_settings::Entity::find()
        .filter(coa_settings::Column::Code.eq(code))
        .all(txn)
        .await?;
    for row in rows {
        if let Ok(name) = row.setting.parse::<SettingName>() {
            resolved.apply(name, &row.value);
        }
    }
    Ok(resolved)
}

/// Sum of the account's entries across finalized transactions only. The
/// current admission's own entries sit on an unfinalized header and are
/// excluded by construction.
async fn finalized_balance(txn: &DatabaseTransaction, account_id: &str) -> Result<i64, DbErr> {
    #[derive(FromQueryResult)]
    struct BalanceRow {
        balance: i64,
    }

    let row = BalanceRow::find_by_statement(Statement::from_sql_and_values(
        DbBackend::Sqlite,
        "SELECT COALESCE(SUM(e.amount), 0) AS balance \
         FROM entries e \
         JOIN transactions t ON t.id = e.transaction_id AND t.finalized = 1 \
         WHERE e.account_id = ?",
        [account_id.into()],
    ))
    .one(txn)
    .await?;

    Ok(row.map_or(0, |r| r.balance))
}

fn to_entry(model: entries::Model) -> Result<Entry, DbErr> {
    Ok(Entry {
        id: model.id,
        transaction_id: model.transaction_id,
        account_id: model.account_id,
        amount: model.amount,
        currency: model.currency,
        created_at: parse_timestamp(&model.created_at)?,
    })
}

fn to_transaction(
    model: transactions::Model,
    entries: Vec<Entry>,
) -> Result<Transaction, TransactionError> {
    Ok(Transaction {
        id: model.id,
        description: model.description,
        finalized: model.finalized,
        posted_at: parse_timestamp(&model.posted_at)?,
        entries,
    })
}
