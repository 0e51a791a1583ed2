//! Exact-decimal confidence scores.
//!
//! Both the scoring service output and the configured alert threshold are held as
//! `Confidence`, so the threshold comparison never mixes binary floats with decimals.

use core::fmt;
use core::str::FromStr;

use rust_decimal::Decimal;
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::InspectionError;

/// A confidence score in `[0, 1]`, stored as an exact decimal.
///
/// Ordering and equality are numeric (`0.50 == 0.5`); `Display` keeps the scale the
/// value was parsed with, so `"0.870"` renders back as `0.870`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Confidence(Decimal);

impl Confidence {
    pub const ZERO: Confidence = Confidence(Decimal::ZERO);
    pub const ONE: Confidence = Confidence(Decimal::ONE);

    pub fn new(value: Decimal) -> Result<Self, InspectionError> {
        if value < Decimal::ZERO || value > Decimal::ONE {
            return Err(InspectionError::input(format!(
                "confidence {value} is outside [0, 1]"
            )));
        }
        Ok(Self(value))
    }

    /// Parse decimal text (`"0.87"`).
    pub fn parse(text: &str) -> Result<Self, InspectionError> {
        let trimmed = text.trim();
        let value = Decimal::from_str(trimmed)
            .or_else(|_| Decimal::from_scientific(trimmed))
            .map_err(|e| InspectionError::input(format!("invalid confidence '{text}': {e}")))?;
        Self::new(value)
    }

    /// Convert a binary float through its shortest round-trip text form.
    ///
    /// `0.4f64` becomes exactly `0.4`, not `0.40000000000000002220446...`.
    pub fn from_f64(value: f64) -> Result<Self, InspectionError> {
        if !value.is_finite() {
            return Err(InspectionError::input(format!("confidence {value} is not finite")));
        }
        Self::parse(&value.to_string())
    }

    pub fn value(&self) -> Decimal {
        self.0
    }

    pub fn is_below(&self, threshold: &Confidence) -> bool {
        self.0 < threshold.0
    }
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl FromStr for Confidence {
    type Err = InspectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for Confidence {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for Confidence {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(ConfidenceVisitor)
    }
}

/// Accepts decimal text or a JSON number.
struct ConfidenceVisitor;

impl<'de> Visitor<'de> for ConfidenceVisitor {
    type Value = Confidence;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a decimal confidence in [0, 1], as a number or a string")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        Confidence::parse(v).map_err(E::custom)
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
        Confidence::from_f64(v).map_err(E::custom)
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
        Confidence::new(Decimal::from(v)).map_err(E::custom)
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
        Confidence::new(Decimal::from(v)).map_err(E::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_and_text_forms_agree() {
        let from_text: Confidence = serde_json::from_str("\"0.4\"").unwrap();
        let from_number: Confidence = serde_json::from_str("0.4").unwrap();
        assert_eq!(from_text, from_number);
        assert_eq!(from_number.to_string(), "0.4");
    }

    #[test]
    fn equality_ignores_scale_but_display_keeps_it() {
        let a = Confidence::parse("0.50").unwrap();
        let b = Confidence::parse("0.5").unwrap();
        assert_eq!(a, b);
        assert!(!a.is_below(&b));
        assert_eq!(a.to_string(), "0.50");
    }

    #[test]
    fn out_of_range_and_garbage_are_rejected() {
        assert!(Confidence::parse("1.01").is_err());
        assert!(Confidence::parse("-0.1").is_err());
        assert!(Confidence::parse("high").is_err());
        assert!(Confidence::from_f64(f64::NAN).is_err());
        assert!(serde_json::from_str::<Confidence>("true").is_err());
    }

    #[test]
    fn serializes_as_decimal_text() {
        let c = Confidence::parse("0.9983").unwrap();
        assert_eq!(serde_json::to_string(&c).unwrap(), "\"0.9983\"");
    }

    #[test]
    fn integer_bounds_are_accepted() {
        assert_eq!(serde_json::from_str::<Confidence>("1").unwrap().value(), Decimal::ONE);
        assert_eq!(serde_json::from_str::<Confidence>("0").unwrap().value(), Decimal::ZERO);
    }
}
