//! Chart-of-accounts error types.

use lariledger_shared::AppError;
use thiserror::Error;

/// Errors from account and chart validation.
#[derive(Debug, Error)]
pub enum ChartError {
    /// Account ID is empty.
    #[error("invalid account id")]
    InvalidAccountId,

    /// Account name is empty.
    #[error("account name is required")]
    EmptyName,

    /// Code is outside the 1000-5999 chart range.
    #[error("invalid account code: {0} (must be 1000-5999)")]
    InvalidCode(i32),

    /// Category string is not one of the five IFRS categories.
    #[error("invalid account category: {0}")]
    InvalidCategory(String),

    /// The code's derived category does not match the supplied category.
    #[error("account code does not match category: code {code} should be {expected}, got {got}")]
    CodeCategoryMismatch {
        /// The account code.
        code: i32,
        /// The category derived from the code.
        expected: String,
        /// The category that was supplied.
        got: String,
    },

    /// A system account's ID must begin with `~`.
    #[error("system accounts must be prefixed with ~")]
    SystemAccountPrefix,

    /// A non-system account's ID must not begin with `~`.
    #[error("non-system accounts cannot start with ~")]
    NonSystemAccountTilde,

    /// Nostro-style accounts must use the `<name:ccy>` ID convention.
    #[error("invalid correspondent id: accounts at code {0} must use <bank:ccy> format, e.g. <jpmorgan:usd>")]
    InvalidNostroId(i32),

    /// Vostro accounts must use the `>name:ccy<` ID convention.
    #[error("invalid correspondent id: vostro accounts (2010) must use >bank:ccy< format, e.g. >jpmorgan:usd<")]
    InvalidVostroId,

    /// The wildcard currency is reserved for the FX intermediary.
    #[error("wildcard currency is reserved for the FX intermediary system account")]
    WildcardCurrencyReserved,

    /// Currency code is not in the supported table.
    #[error("invalid or unsupported currency code: {0}")]
    UnknownCurrency(String),
}

impl From<ChartError> for AppError {
    fn from(err: ChartError) -> Self {
        Self::Validation(err.to_string())
    }
}
