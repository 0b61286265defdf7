//! `SeaORM` entity definitions.

pub mod accounts;
pub mod coa_settings;
pub mod entries;
pub mod transactions;
