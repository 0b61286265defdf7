//! Report types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::chart::Category;

/// One account's finalized balance as read from the store.
///
/// The input row shape shared by the balance sheet, trial balance, and open
/// currency position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountBalanceRow {
    /// Account ID.
    pub account_id: String,
    /// Account display name.
    pub account_name: String,
    /// Account category.
    pub category: Category,
    /// Account currency (may be the wildcard).
    pub currency: String,
    /// Signed sum of finalized entries, minor units.
    pub balance: i64,
}

/// One (category, code) group's finalized balance, for ratio computation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryCodeBalance {
    /// Account category.
    pub category: Category,
    /// Chart code.
    pub code: i32,
    /// Signed sum of finalized entries, minor units.
    pub balance: i64,
}

/// A single balance sheet line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceSheetLine {
    /// Account ID.
    pub account_id: String,
    /// Account display name.
    pub account_name: String,
    /// Signed balance in the account's own currency, minor units.
    pub balance: i64,
    /// The account's currency.
    pub currency: String,
}

/// The balance sheet report.
///
/// Section totals are in the reporting currency (GEL); liabilities and
/// equity are credit-normal and stored negative, so the accounting equation
/// reads `assets + liabilities + equity = 0`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceSheet {
    /// Asset lines, ordered by code.
    pub assets: Vec<BalanceSheetLine>,
    /// Liability lines, ordered by code.
    pub liabilities: Vec<BalanceSheetLine>,
    /// Equity lines, ordered by code.
    pub equity: Vec<BalanceSheetLine>,
    /// GEL total of asset balances.
    pub total_assets: i64,
    /// GEL total of liability balances (negative).
    pub total_liabilities: i64,
    /// GEL total of equity balances (negative).
    pub total_equity: i64,
    /// Whether the accounting equation holds.
    pub balanced: bool,
    /// When the report was generated (UTC).
    pub generated_at: DateTime<Utc>,
}

/// A single trial balance line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrialBalanceLine {
    /// Account ID.
    pub account_id: String,
    /// Account display name.
    pub account_name: String,
    /// Debit column (positive balances), minor units.
    pub debit: i64,
    /// Credit column (absolute value of negative balances), minor units.
    pub credit: i64,
    /// The account's currency.
    pub currency: String,
}

/// The trial balance report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrialBalance {
    /// Lines ordered by account code.
    pub lines: Vec<TrialBalanceLine>,
    /// Sum of the debit column.
    pub total_debit: i64,
    /// Sum of the credit column.
    pub total_credit: i64,
    /// Whether both columns agree.
    pub balanced: bool,
    /// When the report was generated (UTC).
    pub generated_at: DateTime<Utc>,
}

/// The bank's exposure in one currency across real accounts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrencyPosition {
    /// The currency.
    pub currency: String,
    /// Sum of asset-category balances (long side), minor units.
    pub assets: i64,
    /// Negated sum of liability-category balances (short side), minor units.
    pub liabilities: i64,
    /// Negated sum of equity-category balances, minor units.
    pub equity: i64,
    /// Raw signed sum of all balances in this currency.
    pub net: i64,
    /// The net converted to GEL minor units.
    pub gel_equivalent: i64,
}

/// The open currency position report.
///
/// Wildcard-currency accounts are excluded: they are booking intermediaries,
/// not real holdings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpenCurrencyPosition {
    /// Per-currency positions, sorted by currency code.
    pub positions: Vec<CurrencyPosition>,
    /// Sum of GEL equivalents across currencies.
    pub total_gel: i64,
    /// When the report was generated (UTC).
    pub generated_at: DateTime<Utc>,
}

/// The three prudential ratios with their inputs.
///
/// Percentages are display values; the four absolute figures are minor
/// units after sign normalization (equity and customer deposits are negated
/// from their credit-normal storage sign).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RegulatoryRatios {
    /// Equity / total assets, percent.
    pub capital_adequacy: f64,
    /// Equals the CAR: assets are unweighted.
    pub leverage_ratio: f64,
    /// Reserves / customer deposits, percent.
    pub reserve_ratio: f64,
    /// Normalized equity (positive), minor units.
    pub equity: i64,
    /// Total assets, minor units.
    pub total_assets: i64,
    /// Balance on code 1060, minor units.
    pub reserves: i64,
    /// Normalized balance on code 2020 (positive), minor units.
    pub customer_deposits: i64,
}
