//! Pure admission validation.
//!
//! These checks run before a store-level write is opened, so a malformed
//! candidate is rejected without touching the writer.

use std::collections::BTreeMap;

use super::error::LedgerError;
use super::types::TransactionDraft;

/// Validates a candidate transaction's intrinsic invariants: non-empty
/// description, at least 2 entries, and a zero sum for every currency
/// appearing in its entries.
///
/// Account-dependent checks (currency match, direction, inversion) need the
/// store and run inside the admission unit of work.
///
/// # Errors
///
/// Returns the first violated invariant.
pub fn validate_draft(draft: &TransactionDraft) -> Result<(), LedgerError> {
    if draft.description.is_empty() {
        return Err(LedgerError::EmptyDescription);
    }
    if draft.entries.len() < 2 {
        return Err(LedgerError::TooFewEntries);
    }

    let mut by_currency: BTreeMap<&str, i64> = BTreeMap::new();
    for entry in &draft.entries {
        *by_currency.entry(entry.currency.as_str()).or_default() += entry.amount;
    }
    for (currency, sum) in by_currency {
        if sum != 0 {
            return Err(LedgerError::Unbalanced {
                currency: currency.to_string(),
                sum,
            });
        }
    }

    Ok(())
}
