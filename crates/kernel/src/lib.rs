//! The lariledger kernel façade.
//!
//! A single in-process surface over the store, consumed by transport
//! adapters (HTTP, CLI, TUI). The handle is cheap to clone and safe to
//! share across threads; every operation is async and cooperative with
//! respect to cancellation — dropping a call's future aborts the in-flight
//! storage operation and rolls back any open write unit, so the only
//! terminal states are "committed" and "not committed".

pub mod types;

use std::collections::HashMap;

use chrono::Utc;

use lariledger_core::chart::{
    all_chart_entries, category_for_code, lookup_chart_entry, Account, ChartEntry,
};
use lariledger_core::ledger::{Entry, EntryInput, Transaction, TransactionDraft};
use lariledger_core::reports::{
    BalanceSheet, OpenCurrencyPosition, RegulatoryRatios, ReportService, TrialBalance,
};
use lariledger_core::settings::{
    safe_direction, valid_direction, validate_setting_value, CoaSetting, CodeSettings,
    SettingName,
};
use lariledger_core::templates::{Template, TEMPLATES};
use lariledger_db::{
    AccountRepository, ReportRepository, SettingRepository, Store, TransactionRepository,
};
use lariledger_shared::types::money::format_minor;
use lariledger_shared::types::pagination::Page;
use lariledger_shared::{AppError, AppResult, DatabaseConfig};

pub use lariledger_db::repositories::{AccountFilter, TransactionFilter};
pub use types::{AccountBalance, NewAccount};

/// The ledger kernel handle.
///
/// Stateless beyond the store handles and the static chart and currency
/// tables.
#[derive(Debug, Clone)]
pub struct Ledger {
    accounts: AccountRepository,
    transactions: TransactionRepository,
    settings: SettingRepository,
    reports: ReportRepository,
}

impl Ledger {
    /// Opens the backing database (creating and migrating as needed) and
    /// returns the kernel handle.
    ///
    /// # Errors
    ///
    /// Returns `Database` if the store cannot be opened or migrated.
    pub async fn open(config: &DatabaseConfig) -> AppResult<Self> {
        let store = Store::open(config)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(Self::from_store(&store))
    }

    /// Builds the kernel handle over an already-open store.
    #[must_use]
    pub fn from_store(store: &Store) -> Self {
        Self {
            accounts: store.accounts(),
            transactions: store.transactions(),
            settings: store.settings(),
            reports: store.reports(),
        }
    }

    // ========== Accounts ==========

    /// Creates an account.
    ///
    /// Derives the category from the code when the caller omits it and
    /// defaults an empty currency to USD, then validates every account
    /// invariant.
    ///
    /// # Errors
    ///
    /// `Validation` for invariant violations, `Conflict` for a duplicate
    /// ID.
    pub async fn create_account(&self, new: NewAccount) -> AppResult<Account> {
        let currency = if new.currency.is_empty() {
            "USD".to_string()
        } else {
            new.currency
        };
        let category = match new.category {
            Some(category) => category,
            None => category_for_code(new.code)?,
        };

        let account = Account {
            id: new.id,
            name: new.name,
            code: new.code,
            category,
            currency,
            is_system: new.is_system,
            created_at: Utc::now(),
        };
        Ok(self.accounts.create(&account).await?)
    }

    /// Fetches an account by ID.
    ///
    /// # Errors
    ///
    /// `NotFound` when the account does not exist.
    pub async fn get_account(&self, id: &str) -> AppResult<Account> {
        Ok(self.accounts.get(id).await?)
    }

    /// Lists accounts matching the filter, ordered by code.
    ///
    /// # Errors
    ///
    /// `Database` on storage failure.
    pub async fn list_accounts(&self, filter: &AccountFilter) -> AppResult<Vec<Account>> {
        Ok(self.accounts.list(filter).await?)
    }

    /// Renames an account (display name only).
    ///
    /// # Errors
    ///
    /// `NotFound` for a missing account, `Validation` for an empty name.
    pub async fn rename_account(&self, id: &str, name: &str) -> AppResult<Account> {
        Ok(self.accounts.rename(id, name).await?)
    }

    /// Deletes an account with zero associated entries.
    ///
    /// # Errors
    ///
    /// `NotFound` for a missing account, `Validation` while entries still
    /// reference it.
    pub async fn delete_account(&self, id: &str) -> AppResult<()> {
        Ok(self.accounts.delete(id).await?)
    }

    /// An account's finalized balance with its display form.
    ///
    /// # Errors
    ///
    /// `NotFound` when the account does not exist.
    pub async fn account_balance(&self, id: &str) -> AppResult<AccountBalance> {
        let (balance, currency) = self.reports.account_balance(id).await?;
        Ok(AccountBalance {
            account_id: id.to_string(),
            balance,
            formatted: format_minor(balance, &currency),
            currency,
        })
    }

    /// An account's entries from finalized transactions, newest first.
    ///
    /// # Errors
    ///
    /// `Database` on storage failure.
    pub async fn list_account_entries(&self, id: &str, page: &Page) -> AppResult<Vec<Entry>> {
        Ok(self.transactions.list_entries_for_account(id, page).await?)
    }

    // ========== Transactions ==========

    /// Admits a candidate transaction through the two-phase protocol.
    ///
    /// On success the returned transaction is finalized and durably
    /// visible to all subsequent readers. On any rejection nothing
    /// persists.
    ///
    /// # Errors
    ///
    /// `Validation` for malformed candidates, `NotFound` for a missing
    /// account, `ConstraintViolation` for direction or inverted-balance
    /// rejections, `Database` for storage failures.
    pub async fn create_transaction(&self, draft: &TransactionDraft) -> AppResult<Transaction> {
        Ok(self.transactions.create(draft).await?)
    }

    /// Fetches a transaction with its entries in stable order.
    ///
    /// # Errors
    ///
    /// `NotFound` when the transaction does not exist.
    pub async fn get_transaction(&self, id: &str) -> AppResult<Transaction> {
        Ok(self.transactions.get(id).await?)
    }

    /// Lists finalized transactions, newest first.
    ///
    /// # Errors
    ///
    /// `Database` on storage failure.
    pub async fn list_transactions(
        &self,
        filter: &TransactionFilter,
    ) -> AppResult<Vec<Transaction>> {
        Ok(self.transactions.list(filter).await?)
    }

    // ========== Reports ==========

    /// The balance sheet over finalized state.
    ///
    /// # Errors
    ///
    /// `Database` on storage failure.
    pub async fn balance_sheet(&self) -> AppResult<BalanceSheet> {
        let rows = self.reports.balance_rows().await?;
        Ok(ReportService::balance_sheet(rows))
    }

    /// The trial balance over finalized state.
    ///
    /// # Errors
    ///
    /// `Database` on storage failure.
    pub async fn trial_balance(&self) -> AppResult<TrialBalance> {
        let rows = self.reports.balance_rows().await?;
        Ok(ReportService::trial_balance(rows))
    }

    /// The open currency position across real accounts.
    ///
    /// # Errors
    ///
    /// `Database` on storage failure.
    pub async fn open_currency_position(&self) -> AppResult<OpenCurrencyPosition> {
        let rows = self.reports.position_rows().await?;
        Ok(ReportService::open_currency_position(&rows))
    }

    /// The regulatory ratios over finalized state.
    ///
    /// # Errors
    ///
    /// `Database` on storage failure.
    pub async fn regulatory_ratios(&self) -> AppResult<RegulatoryRatios> {
        let rows = self.reports.category_code_rows().await?;
        Ok(ReportService::regulatory_ratios(&rows))
    }

    /// The ratios projected after applying the proposed entries, for
    /// pre-trade impact display.
    ///
    /// Resolves the referenced accounts, reads the current ratios, and
    /// applies the same bucketing used for stored balances.
    ///
    /// # Errors
    ///
    /// `NotFound` when a proposed entry references a missing account.
    pub async fn projected_ratios(&self, entries: &[EntryInput]) -> AppResult<RegulatoryRatios> {
        let current = self.regulatory_ratios().await?;

        let mut accounts: HashMap<String, Account> = HashMap::new();
        for entry in entries {
            if !accounts.contains_key(&entry.account_id) {
                let account = self.accounts.get(&entry.account_id).await?;
                accounts.insert(entry.account_id.clone(), account);
            }
        }

        Ok(ReportService::project_ratios(&current, entries, &accounts))
    }

    // ========== Chart ==========

    /// The predefined and system chart entries combined.
    #[must_use]
    pub fn chart_entries(&self) -> Vec<&'static ChartEntry> {
        all_chart_entries()
    }

    /// Looks up one chart entry by code.
    #[must_use]
    pub fn chart_entry(&self, code: i32) -> Option<&'static ChartEntry> {
        lookup_chart_entry(code)
    }

    /// The predefined transaction templates.
    #[must_use]
    pub fn templates(&self) -> &'static [Template] {
        TEMPLATES
    }

    // ========== Settings ==========

    /// Every stored setting row.
    ///
    /// # Errors
    ///
    /// `Database` on storage failure.
    pub async fn list_settings(&self) -> AppResult<Vec<CoaSetting>> {
        Ok(self.settings.list_all().await?)
    }

    /// The resolved settings for one code, defaults filled in.
    ///
    /// # Errors
    ///
    /// `Database` on storage failure.
    pub async fn code_settings(&self, code: i32) -> AppResult<CodeSettings> {
        Ok(self.settings.get_code_settings(code).await?)
    }

    /// Inserts or updates one setting.
    ///
    /// Enabling `BLOCK_NORMAL_INVERTED` atop a direction constraint that
    /// contradicts the code's normal balance would make every posting on
    /// the code inadmissible, so the safe direction is applied in the same
    /// call rather than left to the user.
    ///
    /// # Errors
    ///
    /// `Validation` for an unknown setting name, a bad value, or a code
    /// outside the chart range.
    pub async fn upsert_setting(
        &self,
        code: i32,
        setting: &str,
        value: &str,
    ) -> AppResult<CoaSetting> {
        let setting: SettingName = setting.parse().map_err(AppError::from)?;
        validate_setting_value(setting, value)?;
        let category = category_for_code(code)?;

        let row = CoaSetting {
            code,
            setting,
            value: value.to_string(),
        };
        self.settings.upsert(&row).await?;

        if setting == SettingName::BlockInverted && value == "1" {
            let resolved = self.settings.get_code_settings(code).await?;
            if !valid_direction(category, resolved.entry_direction) {
                let corrected = safe_direction(category);
                self.settings
                    .upsert(&CoaSetting {
                        code,
                        setting: SettingName::EntryDirection,
                        value: corrected.as_str().to_string(),
                    })
                    .await?;
            }
        }

        Ok(row)
    }

    /// Deletes one setting row; the code reverts to that setting's
    /// default.
    ///
    /// # Errors
    ///
    /// `Validation` for an unknown setting name.
    pub async fn delete_setting(&self, code: i32, setting: &str) -> AppResult<()> {
        let setting: SettingName = setting.parse().map_err(AppError::from)?;
        Ok(self.settings.delete(code, setting).await?)
    }
}
