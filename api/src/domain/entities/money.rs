//! Money domain value
//!
//! Charges are held as integer minor units (cents) so fee arithmetic is exact.
//! Amounts travel over the wire as decimal strings such as `"17.00"`.

use std::fmt;
use std::ops::Add;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// An amount of money in minor units
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Money(i64);

impl Money {
    pub const ZERO: Money = Money(0);

    pub const fn from_cents(cents: i64) -> Self {
        Self(cents)
    }

    /// Whole currency units, e.g. `Money::from_units(5)` is `5.00`
    pub const fn from_units(units: i64) -> Self {
        Self(units.saturating_mul(100))
    }

    pub const fn cents(&self) -> i64 {
        self.0
    }

    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Multiply by a day count, saturating at the representable range
    pub const fn times(self, count: i64) -> Self {
        Self(self.0.saturating_mul(count))
    }
}

impl Add for Money {
    type Output = Money;

    fn add(self, rhs: Money) -> Money {
        Money(self.0.saturating_add(rhs.0))
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(f, "{}{}.{:02}", sign, abs / 100, abs % 100)
    }
}

impl FromStr for Money {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let (negative, digits) = match trimmed.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, trimmed),
        };
        let (whole, fraction) = digits.split_once('.').unwrap_or((digits, ""));

        if whole.is_empty() && fraction.is_empty() {
            return Err(format!("Invalid amount: '{}'", s));
        }
        if fraction.len() > 2 {
            return Err(format!(
                "Invalid amount: '{}' has more than two decimal places",
                s
            ));
        }
        if !whole.chars().chain(fraction.chars()).all(|c| c.is_ascii_digit()) {
            return Err(format!("Invalid amount: '{}'", s));
        }

        let whole: i64 = if whole.is_empty() {
            0
        } else {
            whole
                .parse()
                .map_err(|_| format!("Amount out of range: '{}'", s))?
        };
        let fraction: i64 = match fraction.len() {
            0 => 0,
            1 => fraction.parse::<i64>().map_err(|e| e.to_string())? * 10,
            _ => fraction.parse().map_err(|e: std::num::ParseIntError| e.to_string())?,
        };

        let cents = whole
            .checked_mul(100)
            .and_then(|c| c.checked_add(fraction))
            .ok_or_else(|| format!("Amount out of range: '{}'", s))?;

        Ok(Money(if negative { -cents } else { cents }))
    }
}

impl Serialize for Money {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Accepts `"2.50"`, `2.5` or `2`
#[derive(Deserialize)]
#[serde(untagged)]
enum MoneyRepr {
    Text(String),
    Integer(i64),
    Float(f64),
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match MoneyRepr::deserialize(deserializer)? {
            MoneyRepr::Text(text) => text.parse().map_err(serde::de::Error::custom),
            MoneyRepr::Integer(units) => units
                .checked_mul(100)
                .map(Money)
                .ok_or_else(|| serde::de::Error::custom("amount out of range")),
            MoneyRepr::Float(value) => {
                if !value.is_finite() {
                    return Err(serde::de::Error::custom("amount must be finite"));
                }
                // Round through the decimal string so 0.1 + 0.2 style noise is dropped
                format!("{:.2}", value)
                    .parse()
                    .map_err(serde::de::Error::custom)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn displays_two_decimal_places() {
        assert_eq!(Money::from_cents(1700).to_string(), "17.00");
        assert_eq!(Money::from_cents(205).to_string(), "2.05");
        assert_eq!(Money::from_cents(-50).to_string(), "-0.50");
        assert_eq!(Money::ZERO.to_string(), "0.00");
    }

    #[test]
    fn parses_decimal_strings() {
        assert_eq!("2.00".parse::<Money>().unwrap(), Money::from_cents(200));
        assert_eq!("2.5".parse::<Money>().unwrap(), Money::from_cents(250));
        assert_eq!("15".parse::<Money>().unwrap(), Money::from_units(15));
        assert_eq!(".75".parse::<Money>().unwrap(), Money::from_cents(75));
        assert_eq!("-1.25".parse::<Money>().unwrap(), Money::from_cents(-125));
    }

    #[test]
    fn rejects_malformed_amounts() {
        assert!("".parse::<Money>().is_err());
        assert!("1.234".parse::<Money>().is_err());
        assert!("abc".parse::<Money>().is_err());
        assert!("1.2.3".parse::<Money>().is_err());
    }

    #[test]
    fn times_multiplies_a_daily_rate() {
        assert_eq!(Money::from_units(5).times(3), Money::from_units(15));
        assert_eq!(Money::from_units(5).times(0), Money::ZERO);
    }

    #[test]
    fn deserializes_strings_and_numbers() {
        let from_text: Money = serde_json::from_str(r#""2.00""#).unwrap();
        let from_int: Money = serde_json::from_str("2").unwrap();
        let from_float: Money = serde_json::from_str("2.1").unwrap();
        assert_eq!(from_text, Money::from_cents(200));
        assert_eq!(from_int, Money::from_cents(200));
        assert_eq!(from_float, Money::from_cents(210));
    }

    #[test]
    fn serializes_as_decimal_string() {
        let json = serde_json::to_string(&Money::from_cents(1500)).unwrap();
        assert_eq!(json, r#""15.00""#);
    }
}
