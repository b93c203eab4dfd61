use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::ops::{Add, Sub};
use std::str::FromStr;
use thiserror::Error;

/// Currency amount as stored by the projects API.
///
/// The web forms post amounts as strings (`"budget": "1000"`) while computed
/// totals come back as numbers, so both shapes are accepted on input. Output
/// is always a JSON number.
#[derive(Debug, Clone, Copy, Default, PartialEq, PartialOrd)]
pub struct Amount(f64);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid amount: {input:?}")]
pub struct ParseAmountError {
    input: String,
}

impl Amount {
    pub const ZERO: Amount = Amount(0.0);

    pub fn new(value: f64) -> Self {
        Self(value)
    }

    pub fn value(self) -> f64 {
        self.0
    }

    pub fn is_negative(self) -> bool {
        self.0 < 0.0
    }
}

impl From<f64> for Amount {
    fn from(value: f64) -> Self {
        Self(value)
    }
}

impl From<i32> for Amount {
    fn from(value: i32) -> Self {
        Self(f64::from(value))
    }
}

impl Add for Amount {
    type Output = Amount;

    fn add(self, rhs: Amount) -> Amount {
        Amount(self.0 + rhs.0)
    }
}

impl Sub for Amount {
    type Output = Amount;

    fn sub(self, rhs: Amount) -> Amount {
        Amount(self.0 - rhs.0)
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Amount {
    type Err = ParseAmountError;

    /// Parses the longest numeric prefix, ignoring surrounding whitespace
    /// (`" 12.5abc"` is 12.5).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let prefix = &trimmed[..numeric_prefix_len(trimmed)];
        prefix
            .parse::<f64>()
            .ok()
            .filter(|value| value.is_finite())
            .map(Amount)
            .ok_or_else(|| ParseAmountError {
                input: s.to_string(),
            })
    }
}

fn numeric_prefix_len(s: &str) -> usize {
    let bytes = s.as_bytes();
    let digits_from = |mut i: usize| {
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        i
    };

    let mut end = 0;
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end = 1;
    }
    let int_end = digits_from(end);
    let mut mantissa_digits = int_end - end;
    end = int_end;

    if bytes.get(end) == Some(&b'.') {
        let frac_end = digits_from(end + 1);
        if frac_end > end + 1 {
            mantissa_digits += frac_end - end - 1;
            end = frac_end;
        }
    }
    if mantissa_digits == 0 {
        return 0;
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp = end + 1;
        if matches!(bytes.get(exp), Some(b'+' | b'-')) {
            exp += 1;
        }
        let exp_end = digits_from(exp);
        if exp_end > exp {
            end = exp_end;
        }
    }
    end
}

impl Serialize for Amount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.0)
    }
}

struct AmountVisitor;

impl<'de> Visitor<'de> for AmountVisitor {
    type Value = Amount;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a number or a numeric string")
    }

    fn visit_f64<E: de::Error>(self, value: f64) -> Result<Amount, E> {
        Ok(Amount(value))
    }

    fn visit_i64<E: de::Error>(self, value: i64) -> Result<Amount, E> {
        Ok(Amount(value as f64))
    }

    fn visit_u64<E: de::Error>(self, value: u64) -> Result<Amount, E> {
        Ok(Amount(value as f64))
    }

    fn visit_str<E: de::Error>(self, value: &str) -> Result<Amount, E> {
        value.parse().map_err(E::custom)
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(AmountVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_numeric_prefix() {
        assert_eq!("1000".parse::<Amount>().unwrap(), Amount::new(1000.0));
        assert_eq!(" 12.5abc".parse::<Amount>().unwrap(), Amount::new(12.5));
        assert_eq!("-3e2x".parse::<Amount>().unwrap(), Amount::new(-300.0));
        assert_eq!(".5".parse::<Amount>().unwrap(), Amount::new(0.5));
        assert_eq!("7.".parse::<Amount>().unwrap(), Amount::new(7.0));
        assert_eq!("2e".parse::<Amount>().unwrap(), Amount::new(2.0));
    }

    #[test]
    fn test_parse_rejects_non_numeric() {
        assert!("".parse::<Amount>().is_err());
        assert!("abc".parse::<Amount>().is_err());
        assert!("-".parse::<Amount>().is_err());
        assert!(".".parse::<Amount>().is_err());
    }

    #[test]
    fn test_deserialize_number_or_string() {
        let from_number: Amount = serde_json::from_str("400").unwrap();
        let from_float: Amount = serde_json::from_str("400.25").unwrap();
        let from_string: Amount = serde_json::from_str("\"1000\"").unwrap();

        assert_eq!(from_number, Amount::new(400.0));
        assert_eq!(from_float, Amount::new(400.25));
        assert_eq!(from_string, Amount::new(1000.0));
        assert!(serde_json::from_str::<Amount>("\"abc\"").is_err());
    }

    #[test]
    fn test_serializes_as_number() {
        let json = serde_json::to_value(Amount::new(900.0)).unwrap();
        assert_eq!(json.as_f64(), Some(900.0));
    }

    #[test]
    fn test_display_matches_form_output() {
        assert_eq!(Amount::new(1000.0).to_string(), "1000");
        assert_eq!(Amount::new(1000.5).to_string(), "1000.5");
    }

    #[test]
    fn test_arithmetic() {
        let total = Amount::from(400) + Amount::from(500);
        assert_eq!(total, Amount::new(900.0));
        assert_eq!(total - Amount::from(200), Amount::new(700.0));
        assert!(total > Amount::from(899));
    }
}
