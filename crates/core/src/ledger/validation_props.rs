//! Property-based tests for admission validation.

use proptest::prelude::*;

use super::error::LedgerError;
use super::types::{EntryInput, TransactionDraft};
use super::validation::validate_draft;

const CURRENCIES: [&str; 3] = ["USD", "EUR", "GEL"];

fn currency_strategy() -> impl Strategy<Value = &'static str> {
    prop_oneof![Just(CURRENCIES[0]), Just(CURRENCIES[1]), Just(CURRENCIES[2])]
}

/// Strategy for a list of (currency, amount) legs that nets to zero in every
/// currency: each generated leg is mirrored by its negation.
fn balanced_legs() -> impl Strategy<Value = Vec<(&'static str, i64)>> {
    prop::collection::vec((currency_strategy(), 1i64..1_000_000_000), 1..8).prop_map(|halves| {
        let mut legs = Vec::with_capacity(halves.len() * 2);
        for (currency, amount) in halves {
            legs.push((currency, amount));
            legs.push((currency, -amount));
        }
        legs
    })
}

fn draft_from_legs(legs: Vec<(&'static str, i64)>) -> TransactionDraft {
    let entries = legs
        .into_iter()
        .enumerate()
        .map(|(i, (currency, amount))| EntryInput {
            account_id: format!("acct-{i}"),
            amount,
            currency: currency.to_string(),
        })
        .collect();
    TransactionDraft {
        id: None,
        description: "property".to_string(),
        posted_at: None,
        entries,
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Any transaction whose entries net to zero per currency validates.
    #[test]
    fn prop_balanced_drafts_validate(legs in balanced_legs()) {
        let draft = draft_from_legs(legs);
        prop_assert!(validate_draft(&draft).is_ok());
    }

    /// Perturbing any single entry of a balanced transaction by a non-zero
    /// delta makes validation fail with the perturbed entry's currency.
    #[test]
    fn prop_perturbed_drafts_reject(
        legs in balanced_legs(),
        index in any::<prop::sample::Index>(),
        delta in prop_oneof![-1_000i64..0, 1i64..1_000],
    ) {
        let mut draft = draft_from_legs(legs);
        let i = index.index(draft.entries.len());
        draft.entries[i].amount += delta;
        let expected = draft.entries[i].currency.clone();

        match validate_draft(&draft) {
            Err(LedgerError::Unbalanced { currency, sum }) => {
                prop_assert_eq!(currency, expected);
                prop_assert_eq!(sum, delta);
            }
            other => prop_assert!(false, "expected Unbalanced, got {:?}", other),
        }
    }

    /// Order of entries never affects the verdict.
    #[test]
    fn prop_validation_is_order_independent(legs in balanced_legs(), seed in any::<u64>()) {
        let draft = draft_from_legs(legs);
        let mut shuffled = draft.clone();
        // Cheap deterministic shuffle.
        let len = shuffled.entries.len();
        for i in 0..len {
            let j = (seed as usize).wrapping_mul(i + 1) % len;
            shuffled.entries.swap(i, j);
        }
        prop_assert_eq!(validate_draft(&draft).is_ok(), validate_draft(&shuffled).is_ok());
    }
}
