//! Lenient field types for job records
//!
//! Job records arrive from data-entry screens and spreadsheet imports, so
//! amounts show up as JSON numbers, numeric strings, blanks or free text.
//! [`Numeric`] keeps the distinction between a missing value and a malformed
//! one so callers can report it, while still evaluating both as zero.

use std::fmt;

use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize, Serializer};

/// A numeric field as it was supplied on the job record
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Numeric {
    /// Absent, `null` or blank
    #[default]
    Missing,
    /// A finite number
    Value(f64),
    /// Text that could not be read as a number
    Malformed(String),
}

impl Numeric {
    /// The parsed value, if any
    pub fn value(&self) -> Option<f64> {
        match self {
            Numeric::Value(v) => Some(*v),
            _ => None,
        }
    }

    /// The parsed value, or zero when missing or malformed
    pub fn or_zero(&self) -> f64 {
        self.value().unwrap_or(0.0)
    }

    /// The parsed value when it is strictly positive
    pub fn positive(&self) -> Option<f64> {
        self.value().filter(|v| *v > 0.0)
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Numeric::Missing)
    }

    pub fn is_malformed(&self) -> bool {
        matches!(self, Numeric::Malformed(_))
    }

    /// Parse free text the way the data-entry screens store it
    ///
    /// Thousands separators and surrounding whitespace are ignored.
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Numeric::Missing;
        }
        let cleaned: String = trimmed.chars().filter(|c| *c != ',').collect();
        match cleaned.parse::<f64>() {
            Ok(v) if v.is_finite() => Numeric::Value(v),
            _ => Numeric::Malformed(trimmed.to_string()),
        }
    }
}

impl From<f64> for Numeric {
    fn from(v: f64) -> Self {
        if v.is_finite() {
            Numeric::Value(v)
        } else {
            Numeric::Malformed(v.to_string())
        }
    }
}

impl fmt::Display for Numeric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Numeric::Missing => Ok(()),
            Numeric::Value(v) => write!(f, "{}", v),
            Numeric::Malformed(raw) => write!(f, "{}", raw),
        }
    }
}

impl Serialize for Numeric {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Numeric::Missing => serializer.serialize_none(),
            Numeric::Value(v) => serializer.serialize_f64(*v),
            Numeric::Malformed(raw) => serializer.serialize_str(raw),
        }
    }
}

struct NumericVisitor;

impl<'de> Visitor<'de> for NumericVisitor {
    type Value = Numeric;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a number, a numeric string or null")
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Numeric, E> {
        Ok(Numeric::from(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Numeric, E> {
        Ok(Numeric::Value(v as f64))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Numeric, E> {
        Ok(Numeric::Value(v as f64))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Numeric, E> {
        Ok(Numeric::parse(v))
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<Numeric, E> {
        Ok(Numeric::Malformed(v.to_string()))
    }

    fn visit_none<E: de::Error>(self) -> Result<Numeric, E> {
        Ok(Numeric::Missing)
    }

    fn visit_unit<E: de::Error>(self) -> Result<Numeric, E> {
        Ok(Numeric::Missing)
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<Numeric, D::Error> {
        deserializer.deserialize_any(NumericVisitor)
    }
}

impl<'de> Deserialize<'de> for Numeric {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(NumericVisitor)
    }
}

/// Yes/No flags stored either as booleans or as `"Yes"` / `"No"` strings
pub mod flag {
    use super::*;

    struct FlagVisitor;

    impl<'de> Visitor<'de> for FlagVisitor {
        type Value = bool;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("a boolean or a Yes/No string")
        }

        fn visit_bool<E: de::Error>(self, v: bool) -> Result<bool, E> {
            Ok(v)
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<bool, E> {
            Ok(v != 0)
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<bool, E> {
            Ok(v != 0)
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<bool, E> {
            Ok(matches!(
                v.trim().to_ascii_lowercase().as_str(),
                "yes" | "y" | "true" | "1"
            ))
        }

        fn visit_none<E: de::Error>(self) -> Result<bool, E> {
            Ok(false)
        }

        fn visit_unit<E: de::Error>(self) -> Result<bool, E> {
            Ok(false)
        }

        fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<bool, D::Error> {
            deserializer.deserialize_any(FlagVisitor)
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
        deserializer.deserialize_any(FlagVisitor)
    }
}
