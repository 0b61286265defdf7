//! Ledger error types for admission and state errors.

use lariledger_shared::AppError;
use thiserror::Error;

use crate::settings::EntryDirection;

/// Errors that can occur while admitting or reading transactions.
#[derive(Debug, Error)]
pub enum LedgerError {
    // ========== Validation ==========
    /// Transaction description is required.
    #[error("transaction description is required")]
    EmptyDescription,

    /// Double entry requires at least 2 entries.
    #[error("transaction must have at least 2 entries")]
    TooFewEntries,

    /// A currency group of the transaction's entries does not sum to zero.
    #[error("transaction entries do not balance: currency {currency} sums to {sum}")]
    Unbalanced {
        /// The currency whose entries do not net out.
        currency: String,
        /// The non-zero signed sum.
        sum: i64,
    },

    /// Entry currency does not match the account's currency.
    #[error("entry currency does not match account currency: account {account_id} is {account_currency}, entry is {entry_currency}")]
    CurrencyMismatch {
        /// The account the entry posts to.
        account_id: String,
        /// The account's currency.
        account_currency: String,
        /// The entry's currency.
        entry_currency: String,
    },

    // ========== Admission constraints ==========
    /// The entry's sign is rejected by the code's direction constraint.
    #[error("entry violates direction constraint: account {account_id} (code {code}) only allows {direction} entries")]
    DirectionViolation {
        /// The account the entry posts to.
        account_id: String,
        /// The account's chart code.
        code: i32,
        /// The direction constraint in force.
        direction: EntryDirection,
    },

    /// The transaction would push a blocked account past zero against its
    /// normal balance.
    #[error("transaction would create inverted balance: account {account_id} (code {code}) would have balance {projected}")]
    InvertedBalance {
        /// The account whose projection inverts.
        account_id: String,
        /// The account's chart code.
        code: i32,
        /// The projected post-transaction balance.
        projected: i64,
    },

    // ========== Lookup ==========
    /// A referenced account does not exist.
    #[error("account not found: {0}")]
    AccountNotFound(String),

    /// The transaction does not exist.
    #[error("transaction not found: {0}")]
    TransactionNotFound(String),
}

impl From<LedgerError> for AppError {
    fn from(err: LedgerError) -> Self {
        match &err {
            LedgerError::EmptyDescription
            | LedgerError::TooFewEntries
            | LedgerError::Unbalanced { .. }
            | LedgerError::CurrencyMismatch { .. } => Self::Validation(err.to_string()),
            LedgerError::DirectionViolation { .. } | LedgerError::InvertedBalance { .. } => {
                Self::ConstraintViolation(err.to_string())
            }
            LedgerError::AccountNotFound(_) | LedgerError::TransactionNotFound(_) => {
                Self::NotFound(err.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(AppError::from(LedgerError::EmptyDescription).status_code(), 400);
        assert_eq!(
            AppError::from(LedgerError::Unbalanced { currency: "USD".into(), sum: 5 }).status_code(),
            400
        );
        assert_eq!(
            AppError::from(LedgerError::DirectionViolation {
                account_id: "1060-a".into(),
                code: 1060,
                direction: EntryDirection::DebitOnly,
            })
            .status_code(),
            422
        );
        assert_eq!(
            AppError::from(LedgerError::InvertedBalance {
                account_id: "acct".into(),
                code: 1010,
                projected: -50,
            })
            .status_code(),
            422
        );
        assert_eq!(
            AppError::from(LedgerError::AccountNotFound("x".into())).status_code(),
            404
        );
    }

    #[test]
    fn test_display_names_the_offender() {
        let err = LedgerError::InvertedBalance {
            account_id: "<citi:usd>".into(),
            code: 1010,
            projected: -50,
        };
        let msg = err.to_string();
        assert!(msg.contains("<citi:usd>"));
        assert!(msg.contains("-50"));
    }
}
