//! Fixed-point money formatting.
//!
//! Amounts travel as integer atomic units and are only ever turned into decimal text for
//! display. No rounding happens in either direction.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Number of implied fractional digits in an atomic-unit amount.
pub const DISPLAY_DECIMAL_POINT: usize = 12;

/// Atomic units per whole coin.
pub const COIN: u64 = 1_000_000_000_000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoneyParseError {
    Empty,
    MissingDecimalPoint,
    NonNumeric { text: String },
    WrongFractionDigits { found: usize },
    Overflow { text: String },
}

impl fmt::Display for MoneyParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "empty amount"),
            Self::MissingDecimalPoint => write!(f, "amount has no decimal point"),
            Self::NonNumeric { text } => write!(f, "amount is not numeric: {}", text),
            Self::WrongFractionDigits { found } => write!(
                f,
                "amount must have {} fractional digits, found {}",
                DISPLAY_DECIMAL_POINT, found
            ),
            Self::Overflow { text } => write!(f, "amount does not fit in 64 bits: {}", text),
        }
    }
}

impl std::error::Error for MoneyParseError {}

/// Renders `amount` atomic units as `<integer>.<12 digits>`.
///
/// ```
/// use boolberry_view::money::format_money;
/// assert_eq!(format_money(1000), "0.000000001000");
/// assert_eq!(format_money(10_111_100_000_000), "10.111100000000");
/// ```
pub fn format_money(amount: u64) -> String {
    let padded = format!("{:0>width$}", amount, width = DISPLAY_DECIMAL_POINT + 1);
    let split = padded.len() - DISPLAY_DECIMAL_POINT;
    format!("{}.{}", &padded[..split], &padded[split..])
}

/// Inverse of [`format_money`].
pub fn parse_money(text: &str) -> Result<u64, MoneyParseError> {
    if text.is_empty() {
        return Err(MoneyParseError::Empty);
    }
    let (integer, fraction) = text
        .split_once('.')
        .ok_or(MoneyParseError::MissingDecimalPoint)?;

    let all_digits = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
    if !all_digits(integer) || !all_digits(fraction) {
        return Err(MoneyParseError::NonNumeric {
            text: text.to_string(),
        });
    }
    if fraction.len() != DISPLAY_DECIMAL_POINT {
        return Err(MoneyParseError::WrongFractionDigits {
            found: fraction.len(),
        });
    }

    let overflow = || MoneyParseError::Overflow {
        text: text.to_string(),
    };
    let whole: u64 = integer.parse().map_err(|_| overflow())?;
    let frac: u64 = fraction.parse().map_err(|_| overflow())?;
    whole
        .checked_mul(COIN)
        .and_then(|v| v.checked_add(frac))
        .ok_or_else(overflow)
}

/// Atomic-unit amount as it appears on the bridge (a bare JSON integer).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MoneyAmount(pub u64);

impl MoneyAmount {
    pub fn atomic_units(self) -> u64 {
        self.0
    }
}

impl From<u64> for MoneyAmount {
    fn from(units: u64) -> Self {
        MoneyAmount(units)
    }
}

impl fmt::Display for MoneyAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_money(self.0))
    }
}

impl FromStr for MoneyAmount {
    type Err = MoneyParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_money(s).map(MoneyAmount)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_small_amounts() {
        assert_eq!(format_money(0), "0.000000000000");
        assert_eq!(format_money(1), "0.000000000001");
        assert_eq!(format_money(1000), "0.000000001000");
        assert_eq!(format_money(999_999_999_999), "0.999999999999");
    }

    #[test]
    fn test_format_whole_coins() {
        assert_eq!(format_money(COIN), "1.000000000000");
        assert_eq!(format_money(10_123_000_000_000), "10.123000000000");
        assert_eq!(format_money(u64::MAX), "18446744.073709551615");
    }

    #[test]
    fn test_parse_inverts_format() {
        for amount in [0, 1, 1000, COIN - 1, COIN, 10_111_100_000_000, u64::MAX] {
            assert_eq!(parse_money(&format_money(amount)), Ok(amount));
        }
    }

    #[test]
    fn test_parse_rejects_bad_input() {
        assert_eq!(parse_money(""), Err(MoneyParseError::Empty));
        assert_eq!(parse_money("12"), Err(MoneyParseError::MissingDecimalPoint));
        assert!(matches!(
            parse_money("1.5"),
            Err(MoneyParseError::WrongFractionDigits { found: 1 })
        ));
        assert!(matches!(parse_money("a.000000000000"), Err(MoneyParseError::NonNumeric { .. })));
        assert!(matches!(parse_money(".000000000000"), Err(MoneyParseError::NonNumeric { .. })));
        assert!(matches!(parse_money("-1.000000000000"), Err(MoneyParseError::NonNumeric { .. })));
        assert!(matches!(
            parse_money("18446744.073709551616"),
            Err(MoneyParseError::Overflow { .. })
        ));
    }

    #[test]
    fn test_money_amount_display_and_serde() {
        let amount: MoneyAmount = serde_json::from_str("1000").unwrap();
        assert_eq!(amount.to_string(), "0.000000001000");
        assert_eq!(serde_json::to_string(&amount).unwrap(), "1000");
        assert_eq!("1.000000000000".parse::<MoneyAmount>(), Ok(MoneyAmount(COIN)));
    }
}
