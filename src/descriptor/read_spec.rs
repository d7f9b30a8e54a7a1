// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Read specifications.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// How to resolve a property value from a flattened status.
///
/// Resolution order: value map over `sources`, array selector, composite,
/// then plain `sources` (optionally through `boolTokens`).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadSpec {
    /// Candidate status paths; the first populated one is read.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sources: Vec<String>,
    /// Raw token to property value translation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_map: Option<BTreeMap<String, Value>>,
    /// Per-descriptor override of case-insensitive value-map matching.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub case_insensitive: Option<bool>,
    /// Tokens meaning true/false.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bool_tokens: Option<BoolTokens>,
    /// Array element selection by predicate.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub array: Option<ArraySelector>,
    /// Combination of several status paths.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub composite: Option<CompositeSpec>,
}

impl ReadSpec {
    /// A spec reading the first populated source.
    #[must_use]
    pub fn sources<I, S>(sources: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            sources: sources.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// Sets the boolean token lists.
    #[must_use]
    pub fn with_bool_tokens(mut self, tokens: BoolTokens) -> Self {
        self.bool_tokens = Some(tokens);
        self
    }

    /// Sets the array selector.
    #[must_use]
    pub fn with_array(mut self, array: ArraySelector) -> Self {
        self.array = Some(array);
        self
    }

    /// Returns `true` if no read strategy is configured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sources.is_empty() && self.array.is_none() && self.composite.is_none()
    }
}

/// Token lists mapping raw values onto booleans.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BoolTokens {
    /// Tokens read as `true`.
    #[serde(rename = "true", default)]
    pub true_tokens: Vec<String>,
    /// Tokens read as `false`.
    #[serde(rename = "false", default)]
    pub false_tokens: Vec<String>,
}

impl BoolTokens {
    /// Creates a token pair such as `SET`/`UNSET`.
    #[must_use]
    pub fn pair(true_token: &str, false_token: &str) -> Self {
        Self {
            true_tokens: vec![true_token.to_string()],
            false_tokens: vec![false_token.to_string()],
        }
    }

    /// Matches a raw token case-insensitively.
    #[must_use]
    pub fn resolve(&self, token: &str) -> Option<bool> {
        let matches = |list: &[String]| list.iter().any(|t| t.eq_ignore_ascii_case(token));
        if matches(&self.true_tokens) {
            Some(true)
        } else if matches(&self.false_tokens) {
            Some(false)
        } else {
            None
        }
    }
}

/// Selects one element of a status array by field equality.
///
/// ```
/// use capmap_lib::descriptor::ArraySelector;
/// use serde_json::json;
///
/// let selector: ArraySelector = serde_json::from_value(json!({
///     "container": "temperature",
///     "where": {"locationName": "FREEZER"},
///     "path": "currentTemperature"
/// })).unwrap();
/// assert_eq!(selector.container, "temperature");
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArraySelector {
    /// Path of the array in the status tree.
    pub container: String,
    /// Field values the selected element must carry.
    #[serde(rename = "where", default)]
    pub predicate: Map<String, Value>,
    /// Path inside the selected element to read.
    #[serde(default)]
    pub path: String,
    /// Optional token translation of the read value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_map: Option<BTreeMap<String, Value>>,
    /// Optional boolean tokens for the read value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bool_tokens: Option<BoolTokens>,
}

/// Named combinators of composite values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Combinator {
    /// `hours * 60 + minutes`; parts `hours` and `minutes`.
    #[serde(rename = "hm_to_minutes")]
    HmToMinutes,
}

impl Combinator {
    /// Part names this combinator needs.
    #[must_use]
    pub const fn part_names(&self) -> &'static [&'static str] {
        match self {
            Self::HmToMinutes => &["hours", "minutes"],
        }
    }
}

/// A value combined from (or decomposed into) several named paths.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompositeSpec {
    /// Combinator name.
    pub combine: Combinator,
    /// Part name to path.
    pub parts: BTreeMap<String, String>,
}

impl CompositeSpec {
    /// Hours/minutes composite over the two given paths.
    #[must_use]
    pub fn hours_minutes(hours: &str, minutes: &str) -> Self {
        Self {
            combine: Combinator::HmToMinutes,
            parts: BTreeMap::from([
                ("hours".to_string(), hours.to_string()),
                ("minutes".to_string(), minutes.to_string()),
            ]),
        }
    }

    /// Path of a named part.
    #[must_use]
    pub fn part(&self, name: &str) -> Option<&str> {
        self.parts.get(name).map(String::as_str)
    }
}
