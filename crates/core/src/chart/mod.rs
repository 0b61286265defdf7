//! Chart of accounts: categories, account records, and catalogues.
//!
//! Account codes determine IFRS categories (1xxx assets through 5xxx
//! expenses). System accounts carry a `~` ID prefix and are seeded by the
//! store. Correspondent accounts follow directional-arrow ID conventions:
//! `<bank:ccy>` at codes 1010/1060 (nostro side), `>bank:ccy<` at 2010
//! (vostro side).

pub mod error;

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use lariledger_shared::types::money::{valid_currency, WILDCARD_CURRENCY};
use serde::{Deserialize, Serialize};

pub use error::ChartError;

/// The five IFRS account categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// Resources the bank owns (1xxx).
    Assets,
    /// Obligations the bank owes (2xxx).
    Liabilities,
    /// Owners' stake (3xxx).
    Equity,
    /// Income earned (4xxx).
    Revenue,
    /// Costs incurred (5xxx).
    Expenses,
}

/// The signed direction that increases an account's balance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NormalBalance {
    /// Positive amounts increase the balance (assets, expenses).
    Debit,
    /// Negative amounts increase the balance (liabilities, equity, revenue).
    Credit,
}

impl Category {
    /// All categories, in chart order.
    pub const ALL: [Self; 5] = [
        Self::Assets,
        Self::Liabilities,
        Self::Equity,
        Self::Revenue,
        Self::Expenses,
    ];

    /// The canonical lowercase name used in storage and JSON.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Assets => "assets",
            Self::Liabilities => "liabilities",
            Self::Equity => "equity",
            Self::Revenue => "revenue",
            Self::Expenses => "expenses",
        }
    }

    /// Human-readable section label.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Assets => "Assets",
            Self::Liabilities => "Liabilities",
            Self::Equity => "Equity",
            Self::Revenue => "Revenue",
            Self::Expenses => "Expenses",
        }
    }

    /// Returns the normal balance side for this category.
    ///
    /// Assets and Expenses are debit-normal; Liabilities, Equity, and
    /// Revenue are credit-normal.
    #[must_use]
    pub const fn normal_balance(&self) -> NormalBalance {
        match self {
            Self::Assets | Self::Expenses => NormalBalance::Debit,
            _ => NormalBalance::Credit,
        }
    }

    /// Returns true if positive (debit) amounts increase this category.
    #[must_use]
    pub const fn is_debit_normal(&self) -> bool {
        matches!(self.normal_balance(), NormalBalance::Debit)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = ChartError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "assets" => Ok(Self::Assets),
            "liabilities" => Ok(Self::Liabilities),
            "equity" => Ok(Self::Equity),
            "revenue" => Ok(Self::Revenue),
            "expenses" => Ok(Self::Expenses),
            other => Err(ChartError::InvalidCategory(other.to_string())),
        }
    }
}

/// Derives the IFRS category from a 4-digit chart code.
///
/// # Errors
///
/// Returns `ChartError::InvalidCode` outside the 1000-5999 range.
pub fn category_for_code(code: i32) -> Result<Category, ChartError> {
    match code {
        1000..=1999 => Ok(Category::Assets),
        2000..=2999 => Ok(Category::Liabilities),
        3000..=3999 => Ok(Category::Equity),
        4000..=4999 => Ok(Category::Revenue),
        5000..=5999 => Ok(Category::Expenses),
        _ => Err(ChartError::InvalidCode(code)),
    }
}

/// Returns the inclusive code range for a category.
#[must_use]
pub const fn code_range(category: Category) -> (i32, i32) {
    match category {
        Category::Assets => (1000, 1999),
        Category::Liabilities => (2000, 2999),
        Category::Equity => (3000, 3999),
        Category::Revenue => (4000, 4999),
        Category::Expenses => (5000, 5999),
    }
}

/// A ledger account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    /// Opaque string ID, unique across the ledger.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Chart-of-accounts code (1000-5999).
    pub code: i32,
    /// IFRS category, determined by the code.
    pub category: Category,
    /// ISO-4217 code, or `*` on the FX intermediary.
    pub currency: String,
    /// True for `~`-prefixed internal accounts.
    pub is_system: bool,
    /// Creation timestamp (UTC).
    pub created_at: DateTime<Utc>,
}

impl Account {
    /// Checks all account invariants.
    ///
    /// Applied on create and on any rename-like mutation.
    ///
    /// # Errors
    ///
    /// Returns the first violated invariant.
    pub fn validate(&self) -> Result<(), ChartError> {
        if self.id.is_empty() {
            return Err(ChartError::InvalidAccountId);
        }

        let has_tilde = self.id.starts_with('~');
        if self.is_system && !has_tilde {
            return Err(ChartError::SystemAccountPrefix);
        }
        if !self.is_system && has_tilde {
            return Err(ChartError::NonSystemAccountTilde);
        }

        if self.name.is_empty() {
            return Err(ChartError::EmptyName);
        }

        // System accounts come from the internal registry and are exempt
        // from the standard chart rules, including the wildcard currency
        // restriction (only ~fx is seeded with it).
        if self.is_system {
            return Ok(());
        }

        if !(1000..=5999).contains(&self.code) {
            return Err(ChartError::InvalidCode(self.code));
        }

        let expected = category_for_code(self.code)?;
        if self.category != expected {
            return Err(ChartError::CodeCategoryMismatch {
                code: self.code,
                expected: expected.to_string(),
                got: self.category.to_string(),
            });
        }

        validate_correspondent_id(self.code, &self.id)?;

        if self.currency == WILDCARD_CURRENCY {
            return Err(ChartError::WildcardCurrencyReserved);
        }
        if !valid_currency(&self.currency) {
            return Err(ChartError::UnknownCurrency(self.currency.clone()));
        }

        Ok(())
    }
}

/// Checks that accounts at correspondent codes follow the directional arrow
/// naming convention: `<bank:ccy>` at 1010 and 1060, `>bank:ccy<` at 2010.
///
/// # Errors
///
/// Returns a correspondent-ID error when the shape does not match.
pub fn validate_correspondent_id(code: i32, id: &str) -> Result<(), ChartError> {
    match code {
        1010 | 1060 => {
            let inner = id.strip_prefix('<').and_then(|s| s.strip_suffix('>'));
            if !inner.is_some_and(is_correspondent_body) {
                return Err(ChartError::InvalidNostroId(code));
            }
        }
        2010 => {
            let inner = id.strip_prefix('>').and_then(|s| s.strip_suffix('<'));
            if !inner.is_some_and(is_correspondent_body) {
                return Err(ChartError::InvalidVostroId);
            }
        }
        _ => {}
    }
    Ok(())
}

/// `name:ccy` where name is `[a-zA-Z0-9_-]+` and ccy is three ASCII letters.
fn is_correspondent_body(body: &str) -> bool {
    let Some((name, ccy)) = body.split_once(':') else {
        return false;
    };
    !name.is_empty()
        && name
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'-')
        && ccy.len() == 3
        && ccy.bytes().all(|b| b.is_ascii_alphabetic())
}

/// A predefined entry in the IFRS chart of accounts.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ChartEntry {
    /// Chart-of-accounts code.
    pub code: i32,
    /// Suggested account ID.
    pub id: &'static str,
    /// Canonical name.
    pub name: &'static str,
    /// IFRS category.
    pub category: Category,
    /// What the account is for.
    pub description: &'static str,
    /// True for `~`-prefixed internal accounts.
    pub is_system: bool,
}

/// The minimal IFRS chart of accounts.
pub const PREDEFINED_ACCOUNTS: &[ChartEntry] = &[
    // Assets (1xxx)
    ChartEntry { code: 1010, id: "1010", name: "Nostro Accounts", category: Category::Assets, description: "Our accounts at correspondent banks", is_system: false },
    ChartEntry { code: 1020, id: "1020", name: "Accounts Receivable", category: Category::Assets, description: "Amounts owed to the entity by customers", is_system: false },
    ChartEntry { code: 1030, id: "1030", name: "Inventory", category: Category::Assets, description: "Goods held for sale", is_system: false },
    ChartEntry { code: 1040, id: "1040", name: "Prepaid Expenses", category: Category::Assets, description: "Payments made in advance for future expenses", is_system: false },
    ChartEntry { code: 1050, id: "1050", name: "Property, Plant & Equipment", category: Category::Assets, description: "Long-term tangible assets", is_system: false },
    ChartEntry { code: 1060, id: "1060", name: "Restricted Cash / Regulatory Reserves", category: Category::Assets, description: "Cash held at regulators or under restrictions", is_system: false },
    // Liabilities (2xxx)
    ChartEntry { code: 2010, id: "2010", name: "Vostro Accounts", category: Category::Liabilities, description: "Correspondent bank accounts held at us", is_system: false },
    ChartEntry { code: 2020, id: "2020", name: "Customer Accounts", category: Category::Liabilities, description: "Customer deposit and balance accounts", is_system: false },
    ChartEntry { code: 2030, id: "2030", name: "Accrued Expenses", category: Category::Liabilities, description: "Expenses incurred but not yet paid", is_system: false },
    ChartEntry { code: 2040, id: "2040", name: "Loans Payable", category: Category::Liabilities, description: "Outstanding loan obligations", is_system: false },
    // Equity (3xxx)
    ChartEntry { code: 3010, id: "3010", name: "Retained Earnings", category: Category::Equity, description: "Accumulated profits retained in the entity", is_system: false },
    ChartEntry { code: 3020, id: "3020", name: "Common Stock", category: Category::Equity, description: "Equity shares issued", is_system: false },
    // Revenue (4xxx)
    ChartEntry { code: 4010, id: "4010", name: "Service Revenue", category: Category::Revenue, description: "Income from services rendered", is_system: false },
    ChartEntry { code: 4020, id: "4020", name: "Interest Income", category: Category::Revenue, description: "Income earned from interest", is_system: false },
    // Expenses (5xxx)
    ChartEntry { code: 5010, id: "5010", name: "Operating Expenses", category: Category::Expenses, description: "General operating costs", is_system: false },
    ChartEntry { code: 5020, id: "5020", name: "Cost of Goods Sold", category: Category::Expenses, description: "Direct costs of goods sold", is_system: false },
    ChartEntry { code: 5030, id: "5030", name: "Salaries and Wages", category: Category::Expenses, description: "Employee compensation", is_system: false },
    ChartEntry { code: 5040, id: "5040", name: "Depreciation", category: Category::Expenses, description: "Allocation of asset costs over useful life", is_system: false },
];

/// Internal accounts created automatically on first migration.
///
/// All are USD except `~fx`, which carries the wildcard currency.
pub const SYSTEM_ACCOUNTS: &[ChartEntry] = &[
    ChartEntry { code: 1097, id: "~fx", name: "FX Conversion", category: Category::Assets, description: "Intermediary for cross-currency transactions", is_system: true },
    ChartEntry { code: 1098, id: "~settlement", name: "Settlement", category: Category::Assets, description: "Pending settlement with payment processors/banks", is_system: true },
    ChartEntry { code: 1099, id: "~suspense", name: "Suspense Account", category: Category::Assets, description: "Temporary holding for unclassified entries", is_system: true },
    ChartEntry { code: 2098, id: "~tax", name: "Tax Collected", category: Category::Liabilities, description: "Tax held on behalf of tax authorities (VAT/GST/sales tax)", is_system: true },
    ChartEntry { code: 2099, id: "~escrow", name: "Escrow", category: Category::Liabilities, description: "Funds held on behalf of third parties pending a condition", is_system: true },
    ChartEntry { code: 3099, id: "~capital", name: "Capital", category: Category::Equity, description: "Owner's capital contributions and withdrawals", is_system: true },
    ChartEntry { code: 4099, id: "~interest", name: "Interest Income", category: Category::Revenue, description: "Interest earned on customer balances or loans", is_system: true },
    ChartEntry { code: 4090, id: "~fees", name: "Fee Income", category: Category::Revenue, description: "Fee income from customer charges", is_system: true },
    ChartEntry { code: 5091, id: "~writeoff", name: "Write-offs", category: Category::Expenses, description: "Bad debt write-offs, failed payments, irrecoverable amounts", is_system: true },
];

/// Finds a chart entry by code, checking predefined then system accounts.
#[must_use]
pub fn lookup_chart_entry(code: i32) -> Option<&'static ChartEntry> {
    PREDEFINED_ACCOUNTS
        .iter()
        .chain(SYSTEM_ACCOUNTS.iter())
        .find(|e| e.code == code)
}

/// Returns the predefined and system chart entries combined.
#[must_use]
pub fn all_chart_entries() -> Vec<&'static ChartEntry> {
    PREDEFINED_ACCOUNTS.iter().chain(SYSTEM_ACCOUNTS.iter()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn account(id: &str, code: i32, category: Category, currency: &str) -> Account {
        Account {
            id: id.to_string(),
            name: "Test".to_string(),
            code,
            category,
            currency: currency.to_string(),
            is_system: false,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_category_for_code() {
        assert_eq!(category_for_code(1000).unwrap(), Category::Assets);
        assert_eq!(category_for_code(1999).unwrap(), Category::Assets);
        assert_eq!(category_for_code(2020).unwrap(), Category::Liabilities);
        assert_eq!(category_for_code(3010).unwrap(), Category::Equity);
        assert_eq!(category_for_code(4010).unwrap(), Category::Revenue);
        assert_eq!(category_for_code(5999).unwrap(), Category::Expenses);
        assert!(matches!(category_for_code(999), Err(ChartError::InvalidCode(999))));
        assert!(matches!(category_for_code(6000), Err(ChartError::InvalidCode(6000))));
    }

    #[test]
    fn test_normal_balance() {
        assert_eq!(Category::Assets.normal_balance(), NormalBalance::Debit);
        assert_eq!(Category::Expenses.normal_balance(), NormalBalance::Debit);
        assert_eq!(Category::Liabilities.normal_balance(), NormalBalance::Credit);
        assert_eq!(Category::Equity.normal_balance(), NormalBalance::Credit);
        assert_eq!(Category::Revenue.normal_balance(), NormalBalance::Credit);
    }

    #[test]
    fn test_category_round_trip() {
        for cat in Category::ALL {
            assert_eq!(cat.as_str().parse::<Category>().unwrap(), cat);
        }
        assert!("asset".parse::<Category>().is_err());
    }

    #[test]
    fn test_code_range() {
        assert_eq!(code_range(Category::Assets), (1000, 1999));
        assert_eq!(code_range(Category::Expenses), (5000, 5999));
    }

    #[test]
    fn test_validate_plain_account() {
        let acct = account("op-cash", 1020, Category::Assets, "USD");
        assert!(acct.validate().is_ok());
    }

    #[test]
    fn test_validate_code_category_mismatch() {
        let acct = account("x", 1020, Category::Liabilities, "USD");
        assert!(matches!(
            acct.validate(),
            Err(ChartError::CodeCategoryMismatch { code: 1020, .. })
        ));
    }

    #[test]
    fn test_validate_system_prefix_rules() {
        let mut acct = account("plain", 1020, Category::Assets, "USD");
        acct.is_system = true;
        assert!(matches!(acct.validate(), Err(ChartError::SystemAccountPrefix)));

        let acct = account("~sneaky", 1020, Category::Assets, "USD");
        assert!(matches!(acct.validate(), Err(ChartError::NonSystemAccountTilde)));
    }

    #[test]
    fn test_validate_wildcard_reserved() {
        let acct = account("fx2", 1020, Category::Assets, "*");
        assert!(matches!(acct.validate(), Err(ChartError::WildcardCurrencyReserved)));
    }

    #[test]
    fn test_validate_unknown_currency() {
        let acct = account("x", 1020, Category::Assets, "XXX");
        assert!(matches!(acct.validate(), Err(ChartError::UnknownCurrency(_))));
    }

    #[test]
    fn test_nostro_id_convention() {
        assert!(account("<jpmorgan:usd>", 1010, Category::Assets, "USD").validate().is_ok());
        assert!(account("<citi_ny-1:EUR>", 1010, Category::Assets, "EUR").validate().is_ok());
        assert!(matches!(
            account("jpmorgan", 1010, Category::Assets, "USD").validate(),
            Err(ChartError::InvalidNostroId(1010))
        ));
        assert!(matches!(
            account("<jpmorgan:us>", 1010, Category::Assets, "USD").validate(),
            Err(ChartError::InvalidNostroId(1010))
        ));
        // 1060 uses the same form.
        assert!(account("<nbg:gel>", 1060, Category::Assets, "GEL").validate().is_ok());
        assert!(matches!(
            account("reserves", 1060, Category::Assets, "GEL").validate(),
            Err(ChartError::InvalidNostroId(1060))
        ));
    }

    #[test]
    fn test_vostro_id_convention() {
        assert!(account(">hsbc:usd<", 2010, Category::Liabilities, "USD").validate().is_ok());
        assert!(matches!(
            account("<hsbc:usd>", 2010, Category::Liabilities, "USD").validate(),
            Err(ChartError::InvalidVostroId)
        ));
    }

    #[test]
    fn test_system_account_skips_chart_rules() {
        let mut acct = account("~fx", 1097, Category::Assets, "*");
        acct.is_system = true;
        assert!(acct.validate().is_ok());
    }

    #[test]
    fn test_lookup_chart_entry() {
        assert_eq!(lookup_chart_entry(1010).unwrap().name, "Nostro Accounts");
        assert_eq!(lookup_chart_entry(1097).unwrap().id, "~fx");
        assert!(lookup_chart_entry(9999).is_none());
    }

    #[test]
    fn test_catalogue_is_internally_consistent() {
        for entry in all_chart_entries() {
            assert_eq!(
                category_for_code(entry.code).unwrap(),
                entry.category,
                "catalogue code {} disagrees with its category",
                entry.code
            );
            assert_eq!(entry.is_system, entry.id.starts_with('~'));
        }
    }
}
