// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Write specifications.
//!
//! A write spec is an optional static clamp plus exactly one strategy. The
//! strategies form a closed tagged union selected by the `kind` field:
//!
//! | `kind` | Strategy |
//! |--------|----------|
//! | `attribute` | [`AttributeWrite`] - one resource property |
//! | `enumMap` | [`EnumMapWrite`] - value token selects a fixed payload |
//! | `composite` | [`CompositeSpec`] - value decomposed into several paths |
//! | `arrayTemplate` | [`ArrayTemplateWrite`] - fields of one array element |
//! | `template` | [`TemplateWrite`] - payload skeleton with placeholders |
//! | `multiAttribute` | [`MultiAttributeWrite`] - several properties at once |
//! | `firstOf` | [`FirstOfWrite`] - first applicable alternative |

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::CompositeSpec;

/// Static numeric bounds applied before any strategy.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Clamp {
    /// Lower bound.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    /// Upper bound.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
}

impl Clamp {
    /// Applies the bounds.
    #[must_use]
    pub fn apply(&self, value: f64) -> f64 {
        let lower = self.min.map_or(value, |min| value.max(min));
        self.max.map_or(lower, |max| lower.min(max))
    }
}

/// A complete write spec.
///
/// ```
/// use capmap_lib::descriptor::{WriteSpec, WriteStrategy};
///
/// let spec: WriteSpec = serde_json::from_str(r#"{
///     "kind": "attribute",
///     "clamp": {"min": 0, "max": 19},
///     "resource": "timer",
///     "property": "relativeHourToStart"
/// }"#).unwrap();
///
/// assert!(matches!(spec.strategy, WriteStrategy::Attribute(_)));
/// assert_eq!(spec.target_paths(), vec!["timer.relativeHourToStart".to_string()]);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WriteSpec {
    /// Optional numeric clamp.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clamp: Option<Clamp>,
    /// The strategy.
    #[serde(flatten)]
    pub strategy: WriteStrategy,
}

impl WriteSpec {
    /// Wraps a strategy without a clamp.
    #[must_use]
    pub fn new(strategy: WriteStrategy) -> Self {
        Self {
            clamp: None,
            strategy,
        }
    }

    /// Sets the static clamp.
    #[must_use]
    pub fn with_clamp(mut self, min: Option<f64>, max: Option<f64>) -> Self {
        self.clamp = Some(Clamp { min, max });
        self
    }

    /// Profile paths this spec writes to, used for writability probing.
    #[must_use]
    pub fn target_paths(&self) -> Vec<String> {
        match &self.strategy {
            WriteStrategy::Attribute(attribute) => vec![attribute.path()],
            WriteStrategy::MultiAttribute(multi) => {
                multi.items.iter().map(AttributeWrite::path).collect()
            }
            WriteStrategy::Composite(composite) => composite.parts.values().cloned().collect(),
            WriteStrategy::ArrayTemplate(array) => vec![array.container.clone()],
            WriteStrategy::FirstOf(first_of) => first_of
                .options
                .iter()
                .flat_map(|option| option.write.target_paths())
                .collect(),
            WriteStrategy::EnumMap(_) | WriteStrategy::Template(_) => Vec::new(),
        }
    }
}

/// The write strategy variants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum WriteStrategy {
    /// Decompose one value into several paths.
    Composite(CompositeSpec),
    /// Select a fixed payload by the value's token.
    EnumMap(EnumMapWrite),
    /// Write fields of one predicate-selected array element.
    ArrayTemplate(ArrayTemplateWrite),
    /// Substitute the value into a payload skeleton.
    Template(TemplateWrite),
    /// Write one resource property.
    Attribute(AttributeWrite),
    /// Write several resource properties in one payload.
    MultiAttribute(MultiAttributeWrite),
    /// Use the first applicable alternative.
    FirstOf(FirstOfWrite),
}

impl WriteStrategy {
    /// Short strategy name for logging.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Composite(_) => "composite",
            Self::EnumMap(_) => "enumMap",
            Self::ArrayTemplate(_) => "arrayTemplate",
            Self::Template(_) => "template",
            Self::Attribute(_) => "attribute",
            Self::MultiAttribute(_) => "multiAttribute",
            Self::FirstOf(_) => "firstOf",
        }
    }
}

/// Token-to-payload table.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnumMapWrite {
    /// Canonical value token to payload.
    pub map: BTreeMap<String, Value>,
    /// Per-descriptor override of case-insensitive token matching.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub case_insensitive: Option<bool>,
}

/// Write into one element of a status array.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArrayTemplateWrite {
    /// Path of the array in the status tree (and in the payload).
    pub container: String,
    /// Field values identifying the element; copied into the payload element.
    #[serde(rename = "where", default)]
    pub predicate: Map<String, Value>,
    /// Field path to value template (placeholders allowed).
    pub set: BTreeMap<String, Value>,
}

/// Payload skeleton with placeholder tokens.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TemplateWrite {
    /// The skeleton.
    pub template: Value,
}

/// Write of a single resource property.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttributeWrite {
    /// Resource (top-level payload key).
    pub resource: String,
    /// Property within the resource; may be a dotted path.
    pub property: String,
    /// Constant fields added next to the property.
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub extra: Map<String, Value>,
    /// Clamp against the range the profile declares for this property.
    #[serde(default)]
    pub clamp_from_profile: bool,
    /// Per-item static clamp.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clamp: Option<Clamp>,
    /// Placeholder template for the value, such as `@onoff`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_template: Option<String>,
    /// Constant value written instead of the input (multi-attribute items).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
    /// Location name added to the resource object.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

impl AttributeWrite {
    /// Creates a plain attribute write.
    #[must_use]
    pub fn new(resource: impl Into<String>, property: impl Into<String>) -> Self {
        Self {
            resource: resource.into(),
            property: property.into(),
            ..Self::default()
        }
    }

    /// Enables clamping against the profile range.
    #[must_use]
    pub fn clamped_from_profile(mut self) -> Self {
        self.clamp_from_profile = true;
        self
    }

    /// Sets the location.
    #[must_use]
    pub fn at_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    /// Dotted `resource.property` path.
    #[must_use]
    pub fn path(&self) -> String {
        format!("{}.{}", self.resource, self.property)
    }
}

/// Several attribute writes merged into one payload.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MultiAttributeWrite {
    /// The items; each writes the shared input or its own constant `value`.
    pub items: Vec<AttributeWrite>,
}

/// Ordered alternatives.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FirstOfWrite {
    /// Alternatives in priority order.
    pub options: Vec<FirstOfOption>,
}

/// One alternative of a [`FirstOfWrite`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FirstOfOption {
    /// Gate: the option applies only if one of these profile keys is
    /// writable. Empty means no gate.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub when_writable: Vec<String>,
    /// The alternative write.
    pub write: WriteSpec,
}
