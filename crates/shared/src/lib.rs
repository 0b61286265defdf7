//! Shared types, errors, and configuration for lariledger.
//!
//! This crate provides common types used across all other crates:
//! - Integer minor-unit money and the supported currency table
//! - Pagination types for list operations
//! - Application-wide error types
//! - Configuration management

pub mod config;
pub mod error;
pub mod types;

pub use config::{AppConfig, DatabaseConfig};
pub use error::{AppError, AppResult};
