//! Per-code constraint settings.
//!
//! Each chart code can carry two settings: `BLOCK_NORMAL_INVERTED` ("0"/"1")
//! rejects transactions that would push a balance past zero against the
//! category's normal side, and `ENTRY_DIRECTION` (BOTH / DEBIT_ONLY /
//! CREDIT_ONLY) restricts the sign of individual entries. A code with no
//! rows uses the defaults. Settings take effect on the next admitted
//! transaction; finalized transactions are never re-validated.

use std::fmt;
use std::str::FromStr;

use lariledger_shared::AppError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::chart::Category;

/// Identifies a per-code setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SettingName {
    /// Block transactions that would invert the normal balance.
    #[serde(rename = "BLOCK_NORMAL_INVERTED")]
    BlockInverted,
    /// Restrict which entry directions are allowed.
    #[serde(rename = "ENTRY_DIRECTION")]
    EntryDirection,
}

impl SettingName {
    /// The stored string form.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::BlockInverted => "BLOCK_NORMAL_INVERTED",
            Self::EntryDirection => "ENTRY_DIRECTION",
        }
    }
}

impl fmt::Display for SettingName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SettingName {
    type Err = SettingsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "BLOCK_NORMAL_INVERTED" => Ok(Self::BlockInverted),
            "ENTRY_DIRECTION" => Ok(Self::EntryDirection),
            other => Err(SettingsError::UnknownSetting(other.to_string())),
        }
    }
}

/// Controls which entry directions a code admits.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EntryDirection {
    /// Debits and credits both allowed.
    #[default]
    Both,
    /// Only non-negative amounts allowed.
    DebitOnly,
    /// Only non-positive amounts allowed.
    CreditOnly,
}

impl EntryDirection {
    /// The stored string form.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Both => "BOTH",
            Self::DebitOnly => "DEBIT_ONLY",
            Self::CreditOnly => "CREDIT_ONLY",
        }
    }
}

impl fmt::Display for EntryDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntryDirection {
    type Err = SettingsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "BOTH" => Ok(Self::Both),
            "DEBIT_ONLY" => Ok(Self::DebitOnly),
            "CREDIT_ONLY" => Ok(Self::CreditOnly),
            other => Err(SettingsError::InvalidValue {
                setting: SettingName::EntryDirection,
                value: other.to_string(),
            }),
        }
    }
}

/// A single stored setting row for a chart code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoaSetting {
    /// The chart code the setting applies to.
    pub code: i32,
    /// Which setting.
    pub setting: SettingName,
    /// The stored value string.
    pub value: String,
}

/// The resolved settings for a chart code, with defaults filled in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeSettings {
    /// The chart code.
    pub code: i32,
    /// Whether inverted balances are blocked.
    pub block_inverted: bool,
    /// Which entry directions are allowed.
    pub entry_direction: EntryDirection,
}

/// Errors from settings parsing and validation.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// The setting name is not recognized.
    #[error("unknown setting: {0}")]
    UnknownSetting(String),

    /// The value is not valid for the setting.
    #[error("invalid value for {setting}: {value}")]
    InvalidValue {
        /// Which setting was being set.
        setting: SettingName,
        /// The rejected value.
        value: String,
    },
}

impl From<SettingsError> for AppError {
    fn from(err: SettingsError) -> Self {
        Self::Validation(err.to_string())
    }
}

/// Returns the default settings for a code with no stored rows.
#[must_use]
pub const fn default_settings(code: i32) -> CodeSettings {
    CodeSettings {
        code,
        block_inverted: false,
        entry_direction: EntryDirection::Both,
    }
}

impl CodeSettings {
    /// Overlays one stored setting row onto the resolved settings.
    ///
    /// Unknown values are ignored, matching the tolerant read path: stored
    /// rows are validated on write, not on read.
    pub fn apply(&mut self, setting: SettingName, value: &str) {
        match setting {
            SettingName::BlockInverted => self.block_inverted = value == "1",
            SettingName::EntryDirection => {
                if let Ok(direction) = value.parse() {
                    self.entry_direction = direction;
                }
            }
        }
    }
}

/// Validates a raw setting value for storage.
///
/// # Errors
///
/// Returns `SettingsError::InvalidValue` when the value is not one of the
/// allowed strings for the setting.
pub fn validate_setting_value(setting: SettingName, value: &str) -> Result<(), SettingsError> {
    let ok = match setting {
        SettingName::BlockInverted => value == "0" || value == "1",
        SettingName::EntryDirection => value.parse::<EntryDirection>().is_ok(),
    };
    if ok {
        Ok(())
    } else {
        Err(SettingsError::InvalidValue {
            setting,
            value: value.to_string(),
        })
    }
}

/// Whether a direction constraint is compatible with blocking inverted
/// balances on the given category.
///
/// BOTH is always compatible. A debit-normal category cannot combine
/// blocking with CREDIT_ONLY (the balance could only move against its
/// floor), and symmetrically for credit-normal with DEBIT_ONLY.
#[must_use]
pub const fn valid_direction(category: Category, direction: EntryDirection) -> bool {
    match direction {
        EntryDirection::Both => true,
        EntryDirection::DebitOnly => category.is_debit_normal(),
        EntryDirection::CreditOnly => !category.is_debit_normal(),
    }
}

/// The direction that can never invert the category's normal balance.
///
/// Callers enabling `BlockInverted` atop a contradictory direction apply
/// this before committing; it is not left to the user.
#[must_use]
pub const fn safe_direction(category: Category) -> EntryDirection {
    if category.is_debit_normal() {
        EntryDirection::DebitOnly
    } else {
        EntryDirection::CreditOnly
    }
}
