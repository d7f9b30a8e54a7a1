// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Property types and typed property values.
//!
//! Vendor documents are loosely typed: booleans arrive as `"SET"`, numbers as
//! strings, enum tokens as anything. [`PropertyValue::coerce`] converts such raw
//! JSON into the type a descriptor declares.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ValueError;

/// Declared type of a bindable property.
///
/// # Examples
///
/// ```
/// use capmap_lib::types::PropertyType;
///
/// let ty: PropertyType = "integer".parse().unwrap();
/// assert_eq!(ty, PropertyType::Integer);
/// assert_eq!(PropertyType::Float.as_str(), "float");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PropertyType {
    /// True/false switch.
    #[serde(alias = "bool")]
    Boolean,
    /// Whole number.
    #[serde(alias = "int")]
    Integer,
    /// Decimal number.
    #[serde(alias = "number")]
    Float,
    /// Free text or enum token.
    #[default]
    String,
}

impl PropertyType {
    /// Returns the lowercase name used in descriptor files.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Boolean => "boolean",
            Self::Integer => "integer",
            Self::Float => "float",
            Self::String => "string",
        }
    }
}

impl fmt::Display for PropertyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PropertyType {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "boolean" | "bool" => Ok(Self::Boolean),
            "integer" | "int" => Ok(Self::Integer),
            "float" | "number" => Ok(Self::Float),
            "string" => Ok(Self::String),
            other => Err(ValueError::Conversion {
                expected: "property type".to_string(),
                actual: other.to_string(),
            }),
        }
    }
}

/// Tokens accepted as `true` when coercing text to a boolean.
const TRUE_TOKENS: &[&str] = &["true", "1", "on", "yes", "set", "enable", "power_on", "start"];

/// Tokens accepted as `false` when coercing text to a boolean.
const FALSE_TOKENS: &[&str] = &["false", "0", "off", "no", "unset", "disable", "power_off", "stop"];

/// A typed property value.
///
/// Serializes untagged, so it reads and writes as the plain JSON scalar.
///
/// # Examples
///
/// ```
/// use capmap_lib::types::{PropertyType, PropertyValue};
/// use serde_json::json;
///
/// let value = PropertyValue::coerce(&json!("SET"), PropertyType::Boolean).unwrap();
/// assert_eq!(value, PropertyValue::Bool(true));
///
/// let value = PropertyValue::coerce(&json!("42"), PropertyType::Integer).unwrap();
/// assert_eq!(value, PropertyValue::Integer(42));
/// assert_eq!(PropertyValue::Bool(false).canonical_token(), "false");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropertyValue {
    /// Boolean value.
    Bool(bool),
    /// Integer value.
    Integer(i64),
    /// Floating point value.
    Float(f64),
    /// Text value.
    String(String),
}

impl PropertyValue {
    /// Converts a JSON scalar into its natural property value.
    ///
    /// Returns `None` for `null`, arrays and objects.
    #[must_use]
    pub fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::Bool(b) => Some(Self::Bool(*b)),
            Value::Number(n) => n
                .as_i64()
                .map(Self::Integer)
                .or_else(|| n.as_f64().map(Self::Float)),
            Value::String(s) => Some(Self::String(s.clone())),
            _ => None,
        }
    }

    /// Converts a JSON scalar into a value of the requested type.
    ///
    /// # Errors
    ///
    /// Returns [`ValueError::Conversion`] when the value cannot be represented
    /// as `ty` (for example the text `"abc"` as an integer).
    pub fn coerce(value: &Value, ty: PropertyType) -> Result<Self, ValueError> {
        let natural = Self::from_json(value).ok_or_else(|| conversion_error(value, ty))?;
        natural.convert(ty)
    }

    /// Converts this value into the requested type.
    ///
    /// # Errors
    ///
    /// Returns [`ValueError::Conversion`] when no sensible conversion exists.
    #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
    pub fn convert(self, ty: PropertyType) -> Result<Self, ValueError> {
        let fail = |v: &Self| ValueError::Conversion {
            expected: ty.to_string(),
            actual: v.to_string(),
        };
        match (ty, self) {
            (PropertyType::Boolean, Self::Bool(b)) => Ok(Self::Bool(b)),
            (PropertyType::Boolean, Self::Integer(i)) => Ok(Self::Bool(i != 0)),
            (PropertyType::Boolean, Self::Float(f)) => Ok(Self::Bool(f != 0.0)),
            (PropertyType::Boolean, Self::String(s)) => {
                parse_bool_token(&s).map(Self::Bool).ok_or_else(|| fail(&Self::String(s)))
            }

            (PropertyType::Integer, Self::Bool(b)) => Ok(Self::Integer(i64::from(b))),
            (PropertyType::Integer, Self::Integer(i)) => Ok(Self::Integer(i)),
            (PropertyType::Integer, Self::Float(f)) if f.is_finite() => {
                Ok(Self::Integer(f.round() as i64))
            }
            (PropertyType::Integer, Self::String(s)) => {
                let trimmed = s.trim();
                trimmed
                    .parse::<i64>()
                    .ok()
                    .or_else(|| {
                        trimmed
                            .parse::<f64>()
                            .ok()
                            .filter(|f| f.is_finite())
                            .map(|f| f.round() as i64)
                    })
                    .map(Self::Integer)
                    .ok_or_else(|| fail(&Self::String(s)))
            }

            (PropertyType::Float, Self::Bool(b)) => Ok(Self::Float(if b { 1.0 } else { 0.0 })),
            (PropertyType::Float, Self::Integer(i)) => Ok(Self::Float(i as f64)),
            (PropertyType::Float, Self::Float(f)) => Ok(Self::Float(f)),
            (PropertyType::Float, Self::String(s)) => s
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|f| f.is_finite())
                .map(Self::Float)
                .ok_or_else(|| fail(&Self::String(s))),

            (PropertyType::String, value) => Ok(Self::String(value.canonical_token())),
            (_, value) => Err(fail(&value)),
        }
    }

    /// Returns the canonical string token for this value.
    ///
    /// Booleans become the literal `"true"`/`"false"`, numbers their decimal
    /// rendering, text is returned unchanged.
    #[must_use]
    pub fn canonical_token(&self) -> String {
        match self {
            Self::Bool(b) => b.to_string(),
            Self::Integer(i) => i.to_string(),
            Self::Float(f) => format_float(*f),
            Self::String(s) => s.clone(),
        }
    }

    /// Returns the value as a float, if it is numeric or numeric text.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
            Self::Integer(i) => Some(*i as f64),
            Self::Float(f) => Some(*f),
            Self::String(s) => s.trim().parse().ok(),
        }
    }

    /// Returns the value as a boolean, accepting the usual on/off tokens.
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            Self::Integer(i) => Some(*i != 0),
            Self::Float(f) => Some(*f != 0.0),
            Self::String(s) => parse_bool_token(s),
        }
    }

    /// Returns the type this value currently holds.
    #[must_use]
    pub const fn property_type(&self) -> PropertyType {
        match self {
            Self::Bool(_) => PropertyType::Boolean,
            Self::Integer(_) => PropertyType::Integer,
            Self::Float(_) => PropertyType::Float,
            Self::String(_) => PropertyType::String,
        }
    }

    /// Converts into a JSON scalar.
    #[must_use]
    pub fn to_json(&self) -> Value {
        match self {
            Self::Bool(b) => Value::Bool(*b),
            Self::Integer(i) => Value::from(*i),
            Self::Float(f) => serde_json::Number::from_f64(*f).map_or(Value::Null, Value::Number),
            Self::String(s) => Value::String(s.clone()),
        }
    }
}

impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.canonical_token())
    }
}

impl From<bool> for PropertyValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for PropertyValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<f64> for PropertyValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<&str> for PropertyValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for PropertyValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

/// Parses a boolean-ish token, case-insensitively.
#[must_use]
pub fn parse_bool_token(token: &str) -> Option<bool> {
    let lower = token.trim().to_ascii_lowercase();
    if TRUE_TOKENS.contains(&lower.as_str()) {
        Some(true)
    } else if FALSE_TOKENS.contains(&lower.as_str()) {
        Some(false)
    } else {
        None
    }
}

fn format_float(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{value:.0}")
    } else {
        value.to_string()
    }
}

fn conversion_error(value: &Value, ty: PropertyType) -> ValueError {
    ValueError::Conversion {
        expected: ty.to_string(),
        actual: value.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn property_type_parse_and_display() {
        assert_eq!("bool".parse::<PropertyType>().unwrap(), PropertyType::Boolean);
        assert_eq!("NUMBER".parse::<PropertyType>().unwrap(), PropertyType::Float);
        assert!("matrix".parse::<PropertyType>().is_err());
        assert_eq!(PropertyType::Integer.to_string(), "integer");
    }

    #[test]
    fn property_type_deserializes_with_aliases() {
        let ty: PropertyType = serde_json::from_value(json!("int")).unwrap();
        assert_eq!(ty, PropertyType::Integer);
    }

    #[test]
    fn coerce_booleans_from_tokens() {
        for token in ["SET", "on", "true", "1", "POWER_ON"] {
            assert_eq!(
                PropertyValue::coerce(&json!(token), PropertyType::Boolean).unwrap(),
                PropertyValue::Bool(true),
                "token {token}"
            );
        }
        for token in ["UNSET", "off", "false", "0", "POWER_OFF"] {
            assert_eq!(
                PropertyValue::coerce(&json!(token), PropertyType::Boolean).unwrap(),
                PropertyValue::Bool(false),
                "token {token}"
            );
        }
        assert!(PropertyValue::coerce(&json!("maybe"), PropertyType::Boolean).is_err());
    }

    #[test]
    fn coerce_numbers() {
        assert_eq!(
            PropertyValue::coerce(&json!(2.6), PropertyType::Integer).unwrap(),
            PropertyValue::Integer(3)
        );
        assert_eq!(
            PropertyValue::coerce(&json!("21.5"), PropertyType::Float).unwrap(),
            PropertyValue::Float(21.5)
        );
        assert_eq!(
            PropertyValue::coerce(&json!(true), PropertyType::Integer).unwrap(),
            PropertyValue::Integer(1)
        );
        assert!(PropertyValue::coerce(&json!("abc"), PropertyType::Integer).is_err());
        assert!(PropertyValue::coerce(&json!(null), PropertyType::Integer).is_err());
    }

    #[test]
    fn coerce_to_string_uses_canonical_token() {
        assert_eq!(
            PropertyValue::coerce(&json!(false), PropertyType::String).unwrap(),
            PropertyValue::String("false".to_string())
        );
        assert_eq!(
            PropertyValue::coerce(&json!(4.0), PropertyType::String).unwrap(),
            PropertyValue::String("4".to_string())
        );
    }

    #[test]
    fn canonical_tokens() {
        assert_eq!(PropertyValue::Bool(true).canonical_token(), "true");
        assert_eq!(PropertyValue::Bool(false).canonical_token(), "false");
        assert_eq!(PropertyValue::Float(1.5).canonical_token(), "1.5");
        assert_eq!(PropertyValue::Integer(-3).canonical_token(), "-3");
    }

    #[test]
    fn untagged_serde_round_trip() {
        let values: Vec<PropertyValue> = serde_json::from_value(json!([true, 3, 2.5, "x"])).unwrap();
        assert_eq!(
            values,
            vec![
                PropertyValue::Bool(true),
                PropertyValue::Integer(3),
                PropertyValue::Float(2.5),
                PropertyValue::String("x".to_string()),
            ]
        );
        assert_eq!(serde_json::to_value(&values).unwrap(), json!([true, 3, 2.5, "x"]));
    }

    #[test]
    fn to_json_and_accessors() {
        assert_eq!(PropertyValue::Integer(7).to_json(), json!(7));
        assert_eq!(PropertyValue::from("12").as_f64(), Some(12.0));
        assert_eq!(PropertyValue::from("off").as_bool(), Some(false));
        assert_eq!(PropertyValue::Float(0.5).property_type(), PropertyType::Float);
    }
}
