use std::{
    fmt,
    iter::Sum,
    ops::{Add, AddAssign, Neg, Sub, SubAssign},
    str::FromStr,
};

use serde::{Deserialize, Deserializer, Serialize, Serializer, de};
use thiserror::Error;

/// Signed money amount represented as **integer cents**.
///
/// Every monetary value (balances, budgets, transaction amounts) goes through
/// this type so sums and differences stay exact.
///
/// On the wire the amount is a decimal string:
///
/// ```rust
/// use api_types::Money;
///
/// let amount: Money = "12.34".parse().unwrap();
/// assert_eq!(amount.cents(), 1234);
/// assert_eq!(amount.to_string(), "12.34");
/// assert!("12.345".parse::<Money>().is_err());
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct Money(i64);

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum MoneyParseError {
    #[error("empty amount")]
    Empty,
    #[error("not a decimal number")]
    Invalid,
    #[error("too many decimals")]
    TooManyDecimals,
    #[error("amount too large")]
    Overflow,
}

impl Money {
    pub const ZERO: Money = Money(0);

    /// Creates a new amount from integer cents.
    #[must_use]
    pub const fn new(cents: i64) -> Self {
        Self(cents)
    }

    /// Returns the raw value in cents.
    #[must_use]
    pub const fn cents(self) -> i64 {
        self.0
    }

    #[must_use]
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    #[must_use]
    pub const fn is_positive(self) -> bool {
        self.0 > 0
    }

    #[must_use]
    pub const fn is_negative(self) -> bool {
        self.0 < 0
    }

    /// Checked addition (returns `None` on overflow).
    #[must_use]
    pub fn checked_add(self, rhs: Money) -> Option<Money> {
        self.0.checked_add(rhs.0).map(Money)
    }

    /// Checked subtraction (returns `None` on overflow).
    #[must_use]
    pub fn checked_sub(self, rhs: Money) -> Option<Money> {
        self.0.checked_sub(rhs.0).map(Money)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        let units = abs / 100;
        let cents = abs % 100;
        write!(f, "{sign}{units}.{cents:02}")
    }
}

impl From<i64> for Money {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl From<Money> for i64 {
    fn from(value: Money) -> Self {
        value.0
    }
}

impl Add for Money {
    type Output = Money;

    fn add(self, rhs: Money) -> Self::Output {
        Money(self.0 + rhs.0)
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, rhs: Money) {
        self.0 += rhs.0;
    }
}

impl Sub for Money {
    type Output = Money;

    fn sub(self, rhs: Money) -> Self::Output {
        Money(self.0 - rhs.0)
    }
}

impl SubAssign for Money {
    fn sub_assign(&mut self, rhs: Money) {
        self.0 -= rhs.0;
    }
}

impl Neg for Money {
    type Output = Money;

    fn neg(self) -> Self::Output {
        Money(-self.0)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::ZERO, Add::add)
    }
}

impl FromStr for Money {
    type Err = MoneyParseError;

    /// Parses a decimal string into cents.
    ///
    /// Accepts `.` or `,` as decimal separator and an optional leading `+`/`-`.
    /// At most two fractional digits are allowed.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(MoneyParseError::Empty);
        }

        let (negative, rest) = if let Some(stripped) = trimmed.strip_prefix('-') {
            (true, stripped)
        } else if let Some(stripped) = trimmed.strip_prefix('+') {
            (false, stripped)
        } else {
            (false, trimmed)
        };

        if rest.is_empty() {
            return Err(MoneyParseError::Empty);
        }

        let rest = rest.replace(',', ".");
        let mut parts = rest.split('.');
        let units_str = parts.next().ok_or(MoneyParseError::Invalid)?;
        let cents_str = parts.next();

        if parts.next().is_some() {
            return Err(MoneyParseError::Invalid);
        }

        if units_str.is_empty() || !units_str.chars().all(|c| c.is_ascii_digit()) {
            return Err(MoneyParseError::Invalid);
        }

        let units: i64 = units_str.parse().map_err(|_| MoneyParseError::Overflow)?;

        let cents: i64 = match cents_str {
            None | Some("") => 0,
            Some(frac) => {
                if !frac.chars().all(|c| c.is_ascii_digit()) {
                    return Err(MoneyParseError::Invalid);
                }
                match frac.len() {
                    1 => frac.parse::<i64>().map_err(|_| MoneyParseError::Invalid)? * 10,
                    2 => frac.parse::<i64>().map_err(|_| MoneyParseError::Invalid)?,
                    _ => return Err(MoneyParseError::TooManyDecimals),
                }
            }
        };

        let total = units
            .checked_mul(100)
            .and_then(|v| v.checked_add(cents))
            .ok_or(MoneyParseError::Overflow)?;

        let signed = if negative {
            total.checked_neg().ok_or(MoneyParseError::Overflow)?
        } else {
            total
        };

        Ok(Money(signed))
    }
}

impl Serialize for Money {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

struct MoneyVisitor;

impl de::Visitor<'_> for MoneyVisitor {
    type Value = Money;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a decimal amount with at most two fractional digits")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Money, E> {
        v.parse().map_err(E::custom)
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Money, E> {
        v.checked_mul(100)
            .map(Money)
            .ok_or_else(|| E::custom(MoneyParseError::Overflow))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Money, E> {
        i64::try_from(v)
            .map_err(|_| E::custom(MoneyParseError::Overflow))
            .and_then(|v| self.visit_i64(v))
    }

    // Goes through the shortest decimal text of the float, so `12.34` is
    // exactly 1234 cents.
    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Money, E> {
        if !v.is_finite() {
            return Err(E::custom(MoneyParseError::Invalid));
        }
        self.visit_str(&v.to_string())
    }
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(MoneyVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_formats_two_decimals() {
        assert_eq!(Money::new(0).to_string(), "0.00");
        assert_eq!(Money::new(1).to_string(), "0.01");
        assert_eq!(Money::new(10).to_string(), "0.10");
        assert_eq!(Money::new(40_000).to_string(), "400.00");
        assert_eq!(Money::new(-5_000).to_string(), "-50.00");
    }

    #[test]
    fn parse_accepts_dot_or_comma() {
        assert_eq!("10".parse::<Money>().unwrap().cents(), 1000);
        assert_eq!("10.5".parse::<Money>().unwrap().cents(), 1050);
        assert_eq!("10,50".parse::<Money>().unwrap().cents(), 1050);
        assert_eq!("-0.01".parse::<Money>().unwrap().cents(), -1);
        assert_eq!("+1.00".parse::<Money>().unwrap().cents(), 100);
        assert_eq!("  2.30 ".parse::<Money>().unwrap().cents(), 230);
        assert_eq!("7.".parse::<Money>().unwrap().cents(), 700);
    }

    #[test]
    fn parse_rejects_garbage() {
        assert_eq!("".parse::<Money>(), Err(MoneyParseError::Empty));
        assert_eq!("-".parse::<Money>(), Err(MoneyParseError::Empty));
        assert_eq!("abc".parse::<Money>(), Err(MoneyParseError::Invalid));
        assert_eq!("1.2.3".parse::<Money>(), Err(MoneyParseError::Invalid));
        assert_eq!(".5".parse::<Money>(), Err(MoneyParseError::Invalid));
        assert_eq!(
            "12.345".parse::<Money>(),
            Err(MoneyParseError::TooManyDecimals)
        );
        assert_eq!(
            "99999999999999999999".parse::<Money>(),
            Err(MoneyParseError::Overflow)
        );
    }

    #[test]
    fn json_is_a_decimal_string() {
        let json = serde_json::to_string(&Money::new(-123_456)).unwrap();
        assert_eq!(json, "\"-1234.56\"");
    }

    #[test]
    fn json_accepts_strings_and_numbers() {
        let from_str: Money = serde_json::from_str("\"400.00\"").unwrap();
        let from_int: Money = serde_json::from_str("400").unwrap();
        let from_float: Money = serde_json::from_str("12.34").unwrap();
        assert_eq!(from_str.cents(), 40_000);
        assert_eq!(from_int.cents(), 40_000);
        assert_eq!(from_float.cents(), 1234);
        assert!(serde_json::from_str::<Money>("0.125").is_err());
        assert!(serde_json::from_str::<Money>("\"ten\"").is_err());
    }

    #[test]
    fn sum_is_exact() {
        let total: Money = ["0.10", "0.20", "0.30"]
            .iter()
            .map(|v| v.parse::<Money>().unwrap())
            .sum();
        assert_eq!(total, Money::new(60));
    }
}
