//! Request and response types of the façade surface.

use serde::{Deserialize, Serialize};

use lariledger_core::chart::Category;

/// Input for creating an account.
///
/// The category may be omitted and is then derived from the code; an empty
/// currency defaults to USD.
#[derive(Debug, Clone, Deserialize)]
pub struct NewAccount {
    /// Account ID (correspondent codes enforce their ID conventions).
    pub id: String,
    /// Display name.
    pub name: String,
    /// Chart-of-accounts code.
    pub code: i32,
    /// ISO-4217 currency code; empty means USD.
    #[serde(default)]
    pub currency: String,
    /// IFRS category; derived from the code when absent.
    #[serde(default)]
    pub category: Option<Category>,
    /// True for `~`-prefixed internal accounts.
    #[serde(default)]
    pub is_system: bool,
}

/// An account's finalized balance with its display form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccountBalance {
    /// The account.
    pub account_id: String,
    /// Signed balance in minor units.
    pub balance: i64,
    /// The account's currency.
    pub currency: String,
    /// The balance formatted for display.
    pub formatted: String,
}
