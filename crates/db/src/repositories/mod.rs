//! Repository abstractions for data access.
//!
//! Repositories hold the writer and reader connection handles; every
//! mutating statement goes through the single-connection writer, every
//! query through the reader pool.

pub mod account;
pub mod report;
pub mod setting;
pub mod transaction;

pub use account::{AccountError, AccountFilter, AccountRepository};
pub use report::{ReportError, ReportRepository};
pub use setting::{SettingError, SettingRepository};
pub use transaction::{TransactionError, TransactionFilter, TransactionRepository};

use chrono::{DateTime, Utc};
use sea_orm::DbErr;

/// Timestamps persist as `YYYY-MM-DDTHH:MM:SS.fffZ` strings; fixed width
/// makes lexicographic order chronological.
pub(crate) fn format_timestamp(at: &DateTime<Utc>) -> String {
    at.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string()
}

pub(crate) fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, DbErr> {
    DateTime::parse_from_rfc3339(raw)
        .map(|at| at.with_timezone(&Utc))
        .map_err(|e| DbErr::Custom(format!("malformed stored timestamp {raw:?}: {e}")))
}
