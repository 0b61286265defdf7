//! Transaction and entry domain types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single signed posting within a transaction.
///
/// Positive amounts are debits, negative amounts are credits, always in
/// minor units of `currency`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    /// Monotonic integer ID assigned by the store on insert.
    pub id: i64,
    /// The owning transaction.
    pub transaction_id: String,
    /// The account this entry posts to.
    pub account_id: String,
    /// Signed amount in minor units.
    pub amount: i64,
    /// Currency of the amount.
    pub currency: String,
    /// Insertion timestamp (UTC).
    pub created_at: DateTime<Utc>,
}

/// One proposed entry of a candidate transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryInput {
    /// The account to post to.
    pub account_id: String,
    /// Signed amount in minor units (positive debit, negative credit).
    pub amount: i64,
    /// Currency of the amount.
    pub currency: String,
}

/// A candidate transaction submitted for admission.
///
/// The ID and posting time are optional; admission assigns a fresh
/// time-sortable identifier and the current UTC time when absent.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TransactionDraft {
    /// Optional caller-supplied ID.
    #[serde(default)]
    pub id: Option<String>,
    /// What the transaction records. Must be non-empty.
    pub description: String,
    /// Optional posting time; current UTC when absent.
    #[serde(default)]
    pub posted_at: Option<DateTime<Utc>>,
    /// The proposed entries, in order.
    pub entries: Vec<EntryInput>,
}

/// A transaction as persisted.
///
/// Once `finalized` is true the transaction and its entries are immutable
/// forever; corrections are new reversing transactions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    /// Time-sortable 128-bit identifier as a string.
    pub id: String,
    /// What the transaction records.
    pub description: String,
    /// True once admission committed; never transitions back.
    pub finalized: bool,
    /// Posting time (UTC).
    pub posted_at: DateTime<Utc>,
    /// The entries, in stable insertion order.
    pub entries: Vec<Entry>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_json_shape() {
        let entry = Entry {
            id: 7,
            transaction_id: "txn-1".into(),
            account_id: "2020-alice".into(),
            amount: -50_000,
            currency: "USD".into(),
            created_at: Utc::now(),
        };
        let value = serde_json::to_value(&entry).unwrap();
        assert_eq!(value["id"], 7);
        assert_eq!(value["transaction_id"], "txn-1");
        assert_eq!(value["account_id"], "2020-alice");
        assert_eq!(value["amount"], -50_000);
        assert_eq!(value["currency"], "USD");
    }

    #[test]
    fn test_draft_deserializes_without_optional_fields() {
        let draft: TransactionDraft = serde_json::from_str(
            r#"{"description":"Customer deposit","entries":[{"account_id":"a","amount":1,"currency":"USD"}]}"#,
        )
        .unwrap();
        assert!(draft.id.is_none());
        assert!(draft.posted_at.is_none());
        assert_eq!(draft.entries.len(), 1);
    }
}
