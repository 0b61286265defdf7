//! Integer minor-unit money and the supported currency table.
//!
//! CRITICAL: Never use floating-point on the posting path. Amounts are
//! signed `i64` minor units of a supported currency; positive is debit,
//! negative is credit. The only non-integer values in this module are the
//! fixed reporting rates, which are `Decimal` and used for GEL conversion
//! with truncation toward zero.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use thiserror::Error;

/// The reporting currency for balance-sheet totals and ratios.
pub const REPORTING_CURRENCY: &str = "GEL";

/// The reserved wildcard currency, permitted only on the FX intermediary
/// system account.
pub const WILDCARD_CURRENCY: &str = "*";

/// A supported currency with its minor-unit exponent.
///
/// One major unit equals 10^exponent minor units (100 cents per USD,
/// 1 yen per JPY).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurrencyDef {
    /// ISO 4217 currency code.
    pub code: &'static str,
    /// Full display name.
    pub name: &'static str,
    /// Decimal exponent: 2 for USD (100 cents), 0 for JPY.
    pub exponent: u32,
}

/// The closed, process-wide table of supported currencies.
pub const CURRENCIES: &[CurrencyDef] = &[
    CurrencyDef { code: "AUD", name: "Australian Dollar", exponent: 2 },
    CurrencyDef { code: "BRL", name: "Brazilian Real", exponent: 2 },
    CurrencyDef { code: "CAD", name: "Canadian Dollar", exponent: 2 },
    CurrencyDef { code: "CHF", name: "Swiss Franc", exponent: 2 },
    CurrencyDef { code: "CNY", name: "Chinese Yuan", exponent: 2 },
    CurrencyDef { code: "EUR", name: "Euro", exponent: 2 },
    CurrencyDef { code: "GBP", name: "Pound Sterling", exponent: 2 },
    CurrencyDef { code: "GEL", name: "Georgian Lari", exponent: 2 },
    CurrencyDef { code: "HKD", name: "Hong Kong Dollar", exponent: 2 },
    CurrencyDef { code: "INR", name: "Indian Rupee", exponent: 2 },
    CurrencyDef { code: "JPY", name: "Japanese Yen", exponent: 0 },
    CurrencyDef { code: "KRW", name: "South Korean Won", exponent: 0 },
    CurrencyDef { code: "NOK", name: "Norwegian Krone", exponent: 2 },
    CurrencyDef { code: "NZD", name: "New Zealand Dollar", exponent: 2 },
    CurrencyDef { code: "SEK", name: "Swedish Krona", exponent: 2 },
    CurrencyDef { code: "SGD", name: "Singapore Dollar", exponent: 2 },
    CurrencyDef { code: "USD", name: "US Dollar", exponent: 2 },
    CurrencyDef { code: "ZAR", name: "South African Rand", exponent: 2 },
];

/// Errors from money parsing and conversion.
#[derive(Debug, Error)]
pub enum MoneyError {
    /// The currency code is not in the supported table.
    #[error("invalid or unsupported currency code: {0}")]
    UnknownCurrency(String),

    /// The amount string could not be parsed.
    #[error("invalid amount: {0}")]
    InvalidAmount(String),
}

impl From<MoneyError> for crate::error::AppError {
    fn from(err: MoneyError) -> Self {
        Self::Validation(err.to_string())
    }
}

/// Looks up a currency definition by code.
#[must_use]
pub fn currency_def(code: &str) -> Option<&'static CurrencyDef> {
    CURRENCIES.iter().find(|c| c.code == code)
}

/// Returns true if the code is in the supported currency table.
///
/// The wildcard `*` is not a currency; it is validated separately at the
/// account layer.
#[must_use]
pub fn valid_currency(code: &str) -> bool {
    currency_def(code).is_some()
}

/// Returns the sorted list of supported currency codes.
#[must_use]
pub fn currency_codes() -> Vec<&'static str> {
    // CURRENCIES is kept sorted by code.
    CURRENCIES.iter().map(|c| c.code).collect()
}

/// Fixed rate from one major unit of `currency` to GEL.
///
/// Rates are a static reporting table; they are not market data and carry
/// no date dimension.
#[must_use]
pub fn gel_rate(currency: &str) -> Option<Decimal> {
    let rate = match currency {
        "AUD" => dec!(1.7840),
        "BRL" => dec!(0.4930),
        "CAD" => dec!(1.9760),
        "CHF" => dec!(3.0510),
        "CNY" => dec!(0.3745),
        "EUR" => dec!(2.9480),
        "GBP" => dec!(3.4320),
        "GEL" => Decimal::ONE,
        "HKD" => dec!(0.3478),
        "INR" => dec!(0.0324),
        "JPY" => dec!(0.0181),
        "KRW" => dec!(0.0020),
        "NOK" => dec!(0.2559),
        "NZD" => dec!(1.6420),
        "SEK" => dec!(0.2605),
        "SGD" => dec!(2.0180),
        "USD" => dec!(2.7150),
        "ZAR" => dec!(0.1503),
        _ => return None,
    };
    Some(rate)
}

/// Converts a decimal string like `"10.50"` to minor units (1050 for USD).
///
/// Accepts an optional leading `+` or `-`. The fractional part is padded or
/// truncated to the currency's exponent.
///
/// # Errors
///
/// Returns `MoneyError::UnknownCurrency` for a code outside the supported
/// table and `MoneyError::InvalidAmount` for a malformed amount string.
pub fn parse_minor(amount: &str, currency: &str) -> Result<i64, MoneyError> {
    let def = currency_def(currency)
        .ok_or_else(|| MoneyError::UnknownCurrency(currency.to_string()))?;

    let trimmed = amount.trim();
    let (negative, unsigned) = match trimmed.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, trimmed.strip_prefix('+').unwrap_or(trimmed)),
    };

    let (whole_part, frac_part) = match unsigned.split_once('.') {
        Some((whole, frac)) => (whole, frac),
        None => (unsigned, ""),
    };

    let whole: i64 = whole_part
        .parse()
        .map_err(|_| MoneyError::InvalidAmount(amount.to_string()))?;

    let multiplier = 10i64.pow(def.exponent);
    let mut result = whole * multiplier;

    if def.exponent > 0 && !frac_part.is_empty() {
        // Pad or truncate the fractional part to match the exponent.
        let mut frac_digits = frac_part.to_string();
        while frac_digits.len() < def.exponent as usize {
            frac_digits.push('0');
        }
        frac_digits.truncate(def.exponent as usize);
        let frac: i64 = frac_digits
            .parse()
            .map_err(|_| MoneyError::InvalidAmount(amount.to_string()))?;
        result += frac;
    }

    Ok(if negative { -result } else { result })
}

/// Converts minor units to a display string. E.g. 1050 USD -> `"10.50"`.
///
/// An unknown code falls back to `"{amount} {code}"` so display code can
/// never panic on stored data.
#[must_use]
pub fn format_minor(amount: i64, currency: &str) -> String {
    let Some(def) = currency_def(currency) else {
        return format!("{amount} {currency}");
    };

    if def.exponent == 0 {
        return amount.to_string();
    }

    let sign = if amount < 0 { "-" } else { "" };
    let abs = amount.unsigned_abs();
    let multiplier = 10u64.pow(def.exponent);
    let whole = abs / multiplier;
    let frac = abs % multiplier;

    format!("{sign}{whole}.{frac:0width$}", width = def.exponent as usize)
}

/// Converts minor units of `currency` to minor units of GEL using the fixed
/// rate table, truncating toward zero.
///
/// Used only on the reporting path. The wildcard `*` is not a valid input;
/// callers exclude wildcard-currency accounts before converting. Codes
/// outside the table convert to zero.
#[must_use]
pub fn to_gel(amount: i64, currency: &str) -> i64 {
    if currency == REPORTING_CURRENCY {
        return amount;
    }
    let (Some(def), Some(rate)) = (currency_def(currency), gel_rate(currency)) else {
        return 0;
    };

    // minor(ccy) -> major(ccy) -> major(GEL) -> minor(GEL), truncated.
    let gel_minor = Decimal::from(amount) * rate * Decimal::from(100)
        / Decimal::from(10i64.pow(def.exponent));
    gel_minor.trunc().to_i64().unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_minor_basic() {
        assert_eq!(parse_minor("10.50", "USD").unwrap(), 1050);
        assert_eq!(parse_minor("10", "USD").unwrap(), 1000);
        assert_eq!(parse_minor("0.05", "USD").unwrap(), 5);
        assert_eq!(parse_minor("1234", "JPY").unwrap(), 1234);
    }

    #[test]
    fn test_parse_minor_signs() {
        assert_eq!(parse_minor("-10.50", "USD").unwrap(), -1050);
        assert_eq!(parse_minor("+10.50", "USD").unwrap(), 1050);
        assert_eq!(parse_minor("-0.50", "USD").unwrap(), -50);
    }

    #[test]
    fn test_parse_minor_pads_and_truncates_fraction() {
        // "10.5" -> fraction padded to the exponent
        assert_eq!(parse_minor("10.5", "USD").unwrap(), 1050);
        // "10.509" -> fraction truncated to the exponent
        assert_eq!(parse_minor("10.509", "USD").unwrap(), 1050);
    }

    #[test]
    fn test_parse_minor_rejects_unknown_currency() {
        assert!(matches!(
            parse_minor("10.00", "XXX"),
            Err(MoneyError::UnknownCurrency(_))
        ));
        assert!(matches!(
            parse_minor("10.00", "*"),
            Err(MoneyError::UnknownCurrency(_))
        ));
    }

    #[test]
    fn test_parse_minor_rejects_garbage() {
        assert!(matches!(
            parse_minor("abc", "USD"),
            Err(MoneyError::InvalidAmount(_))
        ));
        assert!(matches!(
            parse_minor("10.x5", "USD"),
            Err(MoneyError::InvalidAmount(_))
        ));
    }

    #[test]
    fn test_format_minor() {
        assert_eq!(format_minor(1050, "USD"), "10.50");
        assert_eq!(format_minor(-1050, "USD"), "-10.50");
        assert_eq!(format_minor(5, "USD"), "0.05");
        assert_eq!(format_minor(1234, "JPY"), "1234");
        assert_eq!(format_minor(-1234, "JPY"), "-1234");
    }

    #[test]
    fn test_format_minor_unknown_currency_fallback() {
        assert_eq!(format_minor(42, "XXX"), "42 XXX");
    }

    #[test]
    fn test_to_gel_identity() {
        assert_eq!(to_gel(12345, "GEL"), 12345);
    }

    #[test]
    fn test_to_gel_two_exponent() {
        // 100.00 USD * 2.7150 = 271.50 GEL
        assert_eq!(to_gel(10000, "USD"), 27150);
        // Truncation toward zero, both signs.
        assert_eq!(to_gel(1, "USD"), 2);
        assert_eq!(to_gel(-1, "USD"), -2);
    }

    #[test]
    fn test_to_gel_zero_exponent() {
        // 1000 JPY * 0.0181 = 18.10 GEL = 1810 tetri
        assert_eq!(to_gel(1000, "JPY"), 1810);
    }

    #[test]
    fn test_to_gel_unknown_is_zero() {
        assert_eq!(to_gel(1000, "XXX"), 0);
    }

    #[test]
    fn test_currency_codes_sorted() {
        let codes = currency_codes();
        let mut sorted = codes.clone();
        sorted.sort_unstable();
        assert_eq!(codes, sorted);
        assert!(codes.contains(&"GEL"));
        assert!(codes.contains(&"USD"));
    }

    #[test]
    fn test_every_currency_has_a_rate() {
        for def in CURRENCIES {
            assert!(gel_rate(def.code).is_some(), "missing rate for {}", def.code);
        }
    }
}
