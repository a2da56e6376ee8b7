use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A money amount held as an integer number of cents.
///
/// Parsing rounds to the nearest cent, half away from zero, working on the
/// decimal text so that `12.345` becomes 1235 cents even though the nearest
/// `f64` sits just below it.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
    JsonSchema,
)]
#[serde(transparent)]
pub struct Amount(i64);

impl Amount {
    pub const ZERO: Amount = Amount(0);

    pub fn from_cents(cents: i64) -> Self {
        Self(cents)
    }

    pub fn cents(self) -> i64 {
        self.0
    }

    /// Parse a decimal dollars string such as `100`, `100.5` or `-12.345`.
    pub fn parse(text: &str) -> Option<Self> {
        let trimmed = text.trim();
        let (negative, digits) = match trimmed.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, trimmed.strip_prefix('+').unwrap_or(trimmed)),
        };
        let (whole, fraction) = digits.split_once('.').unwrap_or((digits, ""));
        if whole.is_empty() && fraction.is_empty() {
            return None;
        }
        if !whole.bytes().all(|b| b.is_ascii_digit()) || !fraction.bytes().all(|b| b.is_ascii_digit())
        {
            return None;
        }

        let whole_value: i64 = if whole.is_empty() { 0 } else { whole.parse().ok()? };
        let mut fraction_digits = fraction.bytes().map(|b| i64::from(b - b'0'));
        let tenths = fraction_digits.next().unwrap_or(0);
        let hundredths = fraction_digits.next().unwrap_or(0);
        let round_up = fraction_digits.next().is_some_and(|digit| digit >= 5);

        let mut cents = whole_value.checked_mul(100)?.checked_add(tenths * 10 + hundredths)?;
        if round_up {
            cents = cents.checked_add(1)?;
        }
        Some(Self(if negative { -cents } else { cents }))
    }

    /// Convert a floating point dollar value through its shortest decimal form.
    /// Non-finite or out-of-range values collapse to zero.
    pub fn from_f64(value: f64) -> Self {
        if !value.is_finite() {
            return Self::ZERO;
        }
        Self::parse(&value.to_string()).unwrap_or(Self::ZERO)
    }

    /// Parse a whole number of cents, e.g. the `0000012345` form used by
    /// cleared-check fields.
    pub fn parse_cents(text: &str) -> Option<Self> {
        let trimmed = text.trim();
        if trimmed.is_empty() || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        trimmed.parse().ok().map(Self)
    }

    pub fn plus_dollars(self, dollars: i64) -> Self {
        Self(self.0.saturating_add(dollars.saturating_mul(100)))
    }

    pub fn plus_cents(self, cents: i64) -> Self {
        Self(self.0.saturating_add(cents))
    }

    pub fn is_positive(self) -> bool {
        self.0 > 0
    }

    /// Cent count left-padded with zeros. The sign is dropped and values
    /// wider than `width` are kept whole.
    pub fn zero_padded(self, width: usize) -> String {
        format!("{:0width$}", self.0.unsigned_abs())
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(f, "{sign}{}.{:02}", abs / 100, abs % 100)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rounds_half_up_on_decimal_text() {
        assert_eq!(Amount::parse("12.345"), Some(Amount::from_cents(1235)));
        assert_eq!(Amount::parse("12.344"), Some(Amount::from_cents(1234)));
        assert_eq!(Amount::parse("0.995"), Some(Amount::from_cents(100)));
        assert_eq!(Amount::from_f64(12.345), Amount::from_cents(1235));
    }

    #[test]
    fn accepts_partial_forms() {
        assert_eq!(Amount::parse("100"), Some(Amount::from_cents(10000)));
        assert_eq!(Amount::parse(".5"), Some(Amount::from_cents(50)));
        assert_eq!(Amount::parse("7."), Some(Amount::from_cents(700)));
        assert_eq!(Amount::parse("-1.25"), Some(Amount::from_cents(-125)));
    }

    #[test]
    fn rejects_garbage() {
        assert_eq!(Amount::parse(""), None);
        assert_eq!(Amount::parse("."), None);
        assert_eq!(Amount::parse("12a"), None);
        assert_eq!(Amount::parse("1.2.3"), None);
        assert_eq!(Amount::from_f64(f64::NAN), Amount::ZERO);
    }

    #[test]
    fn displays_dollars_and_cents() {
        assert_eq!(Amount::from_cents(11000).to_string(), "110.00");
        assert_eq!(Amount::from_cents(-5).to_string(), "-0.05");
        assert_eq!(Amount::from_cents(1235).zero_padded(10), "0000001235");
    }
}
