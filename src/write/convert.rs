// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Placeholder substitution in payload templates.

use std::fmt;
use std::str::FromStr;

use serde_json::{Map, Value};

use crate::error::ValueError;
use crate::types::{PropertyType, PropertyValue};

/// A placeholder token standing for the converted input value.
///
/// | Token | Result |
/// |-------|--------|
/// | `@bool` | JSON boolean |
/// | `@int` | JSON integer |
/// | `@float` | JSON number |
/// | `@string` | canonical text token |
/// | `@onoff` | `"ON"` / `"OFF"` |
/// | `@startstop` | `"START"` / `"STOP"` |
/// | `@power_on_off` | `"POWER_ON"` / `"POWER_OFF"` |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Placeholder {
    /// `@bool`.
    Bool,
    /// `@int`.
    Int,
    /// `@float`.
    Float,
    /// `@string`.
    String,
    /// `@onoff`.
    OnOff,
    /// `@startstop`.
    StartStop,
    /// `@power_on_off`.
    PowerOnOff,
}

impl Placeholder {
    /// The token text.
    #[must_use]
    pub const fn token(&self) -> &'static str {
        match self {
            Self::Bool => "@bool",
            Self::Int => "@int",
            Self::Float => "@float",
            Self::String => "@string",
            Self::OnOff => "@onoff",
            Self::StartStop => "@startstop",
            Self::PowerOnOff => "@power_on_off",
        }
    }

    /// Converts `value` as this placeholder demands.
    ///
    /// # Errors
    ///
    /// Returns [`ValueError::Conversion`] if the value does not fit.
    pub fn render(&self, value: &PropertyValue) -> Result<Value, ValueError> {
        let flag = |on: &str, off: &str| {
            value
                .as_bool()
                .map(|b| Value::String(if b { on } else { off }.to_string()))
                .ok_or_else(|| conversion(PropertyType::Boolean, value))
        };
        match self {
            Self::Bool => value
                .as_bool()
                .map(Value::Bool)
                .ok_or_else(|| conversion(PropertyType::Boolean, value)),
            Self::Int => Ok(value.clone().convert(PropertyType::Integer)?.to_json()),
            Self::Float => Ok(value.clone().convert(PropertyType::Float)?.to_json()),
            Self::String => Ok(Value::String(value.canonical_token())),
            Self::OnOff => flag("ON", "OFF"),
            Self::StartStop => flag("START", "STOP"),
            Self::PowerOnOff => flag("POWER_ON", "POWER_OFF"),
        }
    }
}

impl fmt::Display for Placeholder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

impl FromStr for Placeholder {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "@bool" => Ok(Self::Bool),
            "@int" => Ok(Self::Int),
            "@float" => Ok(Self::Float),
            "@string" => Ok(Self::String),
            "@onoff" => Ok(Self::OnOff),
            "@startstop" => Ok(Self::StartStop),
            "@power_on_off" => Ok(Self::PowerOnOff),
            other => Err(ValueError::UnknownPlaceholder(other.to_string())),
        }
    }
}

/// Replaces every placeholder string in `template` by the rendered value.
///
/// A string is a placeholder when it is `@` followed by lowercase letters and
/// underscores only; other strings are copied verbatim.
///
/// # Errors
///
/// Returns [`ValueError::UnknownPlaceholder`] for an unrecognized token and
/// [`ValueError::Conversion`] when the value does not fit a placeholder.
///
/// # Examples
///
/// ```
/// use capmap_lib::types::PropertyValue;
/// use capmap_lib::write::substitute;
/// use serde_json::json;
///
/// let payload = substitute(
///     &json!({"operation": {"airCleanOperationMode": "@power_on_off", "note": "a@b"}}),
///     &PropertyValue::Bool(true),
/// ).unwrap();
/// assert_eq!(payload, json!({"operation": {"airCleanOperationMode": "POWER_ON", "note": "a@b"}}));
/// ```
pub fn substitute(template: &Value, value: &PropertyValue) -> Result<Value, ValueError> {
    match template {
        Value::String(text) if is_placeholder(text) => text.parse::<Placeholder>()?.render(value),
        Value::Object(map) => map
            .iter()
            .map(|(key, child)| Ok((key.clone(), substitute(child, value)?)))
            .collect::<Result<Map<String, Value>, ValueError>>()
            .map(Value::Object),
        Value::Array(items) => items
            .iter()
            .map(|item| substitute(item, value))
            .collect::<Result<Vec<_>, _>>()
            .map(Value::Array),
        other => Ok(other.clone()),
    }
}

fn is_placeholder(text: &str) -> bool {
    text.strip_prefix('@').is_some_and(|rest| {
        !rest.is_empty() && rest.chars().all(|c| c.is_ascii_lowercase() || c == '_')
    })
}

fn conversion(expected: PropertyType, value: &PropertyValue) -> ValueError {
    ValueError::Conversion {
        expected: expected.to_string(),
        actual: value.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn renders_every_placeholder() {
        let on = PropertyValue::Bool(true);
        let cases = [
            ("@bool", json!(true)),
            ("@int", json!(1)),
            ("@float", json!(1.0)),
            ("@string", json!("true")),
            ("@onoff", json!("ON")),
            ("@startstop", json!("START")),
            ("@power_on_off", json!("POWER_ON")),
        ];
        for (token, expected) in cases {
            let placeholder: Placeholder = token.parse().unwrap();
            assert_eq!(placeholder.to_string(), token);
            assert_eq!(placeholder.render(&on).unwrap(), expected, "{token}");
        }
    }

    #[test]
    fn numbers_convert() {
        let value = PropertyValue::Float(21.5);
        assert_eq!(Placeholder::Int.render(&value).unwrap(), json!(22));
        assert_eq!(Placeholder::Float.render(&value).unwrap(), json!(21.5));
        assert_eq!(Placeholder::OnOff.render(&PropertyValue::Integer(0)).unwrap(), json!("OFF"));
    }

    #[test]
    fn errors() {
        let err = substitute(&json!({"a": "@nope"}), &PropertyValue::Bool(true)).unwrap_err();
        assert_eq!(err, ValueError::UnknownPlaceholder("@nope".to_string()));

        let err = Placeholder::Bool.render(&PropertyValue::from("maybe")).unwrap_err();
        assert!(matches!(err, ValueError::Conversion { .. }));
    }

    #[test]
    fn substitutes_nested_arrays() {
        let payload = substitute(
            &json!({"items": [{"v": "@int"}, "@Upper", 3]}),
            &PropertyValue::from("7"),
        )
        .unwrap();
        assert_eq!(payload, json!({"items": [{"v": 7}, "@Upper", 3]}));
    }
}
