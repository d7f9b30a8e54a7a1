// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Schema leaf interpretation and presentation inference.

use serde_json::{Map, Value};

use super::naming::unit_suffix;
use crate::schema::SchemaRange;
use crate::translate::EnumCaptions;
use crate::types::{EnumOption, Presentation, PropertyType, PropertyValue};

/// Schema type families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SchemaKind {
    /// `boolean`.
    Boolean,
    /// `range` or `number`.
    Number,
    /// `enum`.
    Enum,
    /// `string` or anything unrecognized.
    Text,
}

impl SchemaKind {
    fn parse(text: &str) -> Self {
        match text.to_ascii_lowercase().as_str() {
            "boolean" | "bool" => Self::Boolean,
            "range" | "number" | "integer" | "float" => Self::Number,
            "enum" => Self::Enum,
            _ => Self::Text,
        }
    }
}

/// The parts of a schema leaf discovery cares about.
#[derive(Debug, Clone, PartialEq)]
pub struct LeafSchema {
    /// Type family.
    pub kind: SchemaKind,
    /// Mode grants read access (or no mode is declared).
    pub readable: bool,
    /// Mode grants write access.
    pub writable: bool,
    /// Declared range, preferring the write range when writable.
    pub range: Option<SchemaRange>,
    /// Declared enum tokens, preferring the write list when writable.
    pub tokens: Vec<String>,
}

impl LeafSchema {
    /// Reads a schema leaf.
    #[must_use]
    pub fn parse(leaf: &Map<String, Value>) -> Self {
        let kind = leaf
            .get("type")
            .and_then(Value::as_str)
            .map_or(SchemaKind::Text, SchemaKind::parse);
        let modes: Vec<String> = match leaf.get("mode") {
            Some(Value::Array(items)) => items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_ascii_lowercase)
                .collect(),
            Some(Value::String(mode)) => vec![mode.to_ascii_lowercase()],
            _ => Vec::new(),
        };
        let readable = modes.is_empty() || modes.iter().any(|m| m.contains('r'));
        let writable = modes.iter().any(|m| m.contains('w'));

        let value = leaf.get("value");
        let sections: Vec<&Value> = {
            let (first, second) = if writable { ("w", "r") } else { ("r", "w") };
            [
                value.and_then(|v| v.get(first)),
                value.and_then(|v| v.get(second)),
                value,
            ]
            .into_iter()
            .flatten()
            .collect()
        };
        let range = sections.iter().find_map(|section| SchemaRange::from_json(section));
        let tokens = sections
            .iter()
            .find_map(|section| section.as_array())
            .map(|items| {
                items
                    .iter()
                    .filter_map(|item| match item {
                        Value::String(s) => Some(s.clone()),
                        Value::Number(n) => Some(n.to_string()),
                        _ => None,
                    })
                    .collect()
            })
            .unwrap_or_default();

        Self {
            kind,
            readable,
            writable,
            range,
            tokens,
        }
    }
}

/// Property type and presentation for a discovered leaf.
///
/// `writable` is the effective writability (after overrides).
#[must_use]
pub fn infer_presentation(
    property: &str,
    schema: &LeafSchema,
    writable: bool,
    captions: &EnumCaptions,
    language: &str,
) -> (PropertyType, Presentation) {
    match schema.kind {
        SchemaKind::Boolean => (
            PropertyType::Boolean,
            if writable {
                Presentation::switch()
            } else {
                Presentation::value()
            },
        ),
        SchemaKind::Number => number_presentation(property, schema, writable),
        SchemaKind::Enum => {
            let options: Vec<EnumOption> = schema
                .tokens
                .iter()
                .map(|token| {
                    EnumOption::new(
                        PropertyValue::String(token.clone()),
                        captions.caption(property, token, language),
                    )
                })
                .collect();
            let presentation = if writable {
                Presentation::buttons(options)
            } else {
                Presentation::value().with_options(options)
            };
            (PropertyType::String, presentation)
        }
        SchemaKind::Text => (PropertyType::String, Presentation::value()),
    }
}

fn number_presentation(
    property: &str,
    schema: &LeafSchema,
    writable: bool,
) -> (PropertyType, Presentation) {
    let (default_min, default_max) = heuristic_bounds(property);
    let declared = schema.range.clone().unwrap_or_default();
    let min = declared.min.unwrap_or(default_min);
    let max = declared.max.unwrap_or(default_max);
    let step = declared.step.filter(|s| *s > 0.0).unwrap_or(1.0);

    let integral = step.fract() == 0.0 && declared.is_integral();
    let ty = if integral {
        PropertyType::Integer
    } else {
        PropertyType::Float
    };

    let mut presentation = if writable {
        Presentation::slider(min, max, step)
    } else {
        Presentation::value()
    };
    if let Some(suffix) = unit_suffix(property) {
        presentation = presentation.with_suffix(suffix);
    }
    if !integral {
        presentation = presentation.with_digits(1);
    }
    (ty, presentation)
}

fn heuristic_bounds(property: &str) -> (f64, f64) {
    let lower = property.to_ascii_lowercase();
    if lower.contains("hour") {
        (0.0, 24.0)
    } else if lower.contains("minute") {
        (0.0, 59.0)
    } else {
        (0.0, 100.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PresentationKind;
    use serde_json::json;

    fn schema(value: Value) -> LeafSchema {
        LeafSchema::parse(value.as_object().unwrap())
    }

    #[test]
    fn parses_modes_and_sections() {
        let leaf = schema(json!({
            "type": "range", "mode": ["r", "w"],
            "value": {"r": {"min": 0, "max": 50}, "w": {"min": 16, "max": 30, "step": 0.5}}
        }));
        assert_eq!(leaf.kind, SchemaKind::Number);
        assert!(leaf.readable && leaf.writable);
        assert_eq!(leaf.range.as_ref().and_then(|r| r.max), Some(30.0));

        let read_only = schema(json!({"type": "enum", "mode": ["r"], "value": {"r": ["A", "B"]}}));
        assert!(!read_only.writable);
        assert_eq!(read_only.tokens, vec!["A", "B"]);

        let no_mode = schema(json!({"type": "boolean"}));
        assert!(no_mode.readable && !no_mode.writable);
    }

    #[test]
    fn fractional_range_becomes_float_slider() {
        let leaf = schema(json!({
            "type": "range", "mode": ["w"],
            "value": {"w": {"min": 16, "max": 30, "step": 0.5}}
        }));
        let (ty, p) = infer_presentation("targetTemperature", &leaf, true, &EnumCaptions::new(), "en");
        assert_eq!(ty, PropertyType::Float);
        assert_eq!(p.kind, PresentationKind::Slider);
        assert_eq!((p.min, p.max, p.step), (Some(16.0), Some(30.0), Some(0.5)));
        assert_eq!(p.suffix.as_deref(), Some(" °C"));
        assert_eq!(p.digits, Some(1));
    }

    #[test]
    fn unlabeled_timer_fields_use_heuristic_bounds() {
        let leaf = schema(json!({"type": "number", "mode": ["r"]}));
        let (ty, p) = infer_presentation("relativeMinuteToStop", &leaf, true, &EnumCaptions::new(), "en");
        assert_eq!(ty, PropertyType::Integer);
        assert_eq!((p.min, p.max), (Some(0.0), Some(59.0)));

        let (_, generic) = infer_presentation("windLevel", &leaf, true, &EnumCaptions::new(), "en");
        assert_eq!((generic.min, generic.max), (Some(0.0), Some(100.0)));

        let (_, display) = infer_presentation("windLevel", &leaf, false, &EnumCaptions::new(), "en");
        assert_eq!(display.kind, PresentationKind::Value);
    }

    #[test]
    fn enum_options_are_captioned() {
        let leaf = schema(json!({"type": "enum", "mode": ["r", "w"], "value": {"w": ["POWER_ON", "VERY_BAD"]}}));
        let (ty, p) = infer_presentation("airQuality", &leaf, true, &EnumCaptions::builtin(), "en");
        assert_eq!(ty, PropertyType::String);
        assert_eq!(p.kind, PresentationKind::Buttons);
        let captions: Vec<&str> = p.options.iter().map(|o| o.caption.as_str()).collect();
        assert_eq!(captions, vec!["On", "Very Bad"]);
    }

    #[test]
    fn booleans() {
        let leaf = schema(json!({"type": "boolean", "mode": ["r", "w"]}));
        let (ty, p) = infer_presentation("enabled", &leaf, true, &EnumCaptions::new(), "en");
        assert_eq!(ty, PropertyType::Boolean);
        assert_eq!(p.kind, PresentationKind::Switch);
    }
}
