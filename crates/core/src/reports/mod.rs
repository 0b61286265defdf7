//! Reporting projections over finalized ledger state.
//!
//! The store supplies per-account and per-(category, code) balance rows;
//! everything else — sectioning, GEL conversion, the balanced flag, currency
//! position bucketing, and the regulatory ratio arithmetic — is pure and
//! lives here. The projected-ratio calculator reuses the exact bucketing
//! applied to stored balances, so a pre-trade projection cannot drift from
//! the post-trade report.

pub mod service;
pub mod types;

pub use service::ReportService;
pub use types::{
    AccountBalanceRow, BalanceSheet, BalanceSheetLine, CategoryCodeBalance, CurrencyPosition,
    OpenCurrencyPosition, RegulatoryRatios, TrialBalance, TrialBalanceLine,
};
