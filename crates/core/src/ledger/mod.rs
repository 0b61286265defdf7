//! Transaction and entry domain types with admission validation.
//!
//! The pure half of the transaction engine: domain types, the error set,
//! and the validation that runs before a store-level write is opened. The
//! storeful half (the two-phase admission unit of work) lives in the db
//! crate and reuses these types.

pub mod error;
pub mod types;
pub mod validation;

#[cfg(test)]
mod validation_props;

pub use error::LedgerError;
pub use types::{Entry, EntryInput, Transaction, TransactionDraft};
pub use validation::validate_draft;
