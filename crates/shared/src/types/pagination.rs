//! Pagination types for list operations.

use serde::{Deserialize, Serialize};

/// Limit/offset window for list queries.
///
/// A zero limit means unbounded; the offset is only applied together with a
/// limit.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Page {
    /// Maximum number of items to return (0 = no limit).
    #[serde(default)]
    pub limit: u64,
    /// Number of items to skip.
    #[serde(default)]
    pub offset: u64,
}

impl Page {
    /// Creates a bounded page window.
    #[must_use]
    pub const fn new(limit: u64, offset: u64) -> Self {
        Self { limit, offset }
    }

    /// An unbounded window returning everything.
    #[must_use]
    pub const fn all() -> Self {
        Self { limit: 0, offset: 0 }
    }

    /// Returns true if a limit applies.
    #[must_use]
    pub const fn is_bounded(&self) -> bool {
        self.limit > 0
    }
}
