// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Catalog rules and their match conditions.

use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};

/// A match or exclude condition as written in the catalog.
///
/// All configured clauses must hold: `any` needs one substring, `all` needs
/// every substring, `regex` needs one pattern. A condition without clauses
/// matches nothing.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Condition {
    /// Substring OR.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub any: Vec<String>,
    /// Substring AND.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub all: Vec<String>,
    /// Case-insensitive pattern OR.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub regex: Vec<String>,
}

impl Condition {
    /// Returns `true` if no clause is configured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.any.is_empty() && self.all.is_empty() && self.regex.is_empty()
    }
}

/// One catalog rule as written in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Rule {
    /// Condition selecting the rule.
    #[serde(rename = "match", default)]
    pub matcher: Condition,
    /// Condition vetoing the rule.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exclude: Option<Condition>,
    /// Descriptor files contributed by the rule.
    #[serde(default)]
    pub files: Vec<String>,
}

/// A condition with lowercased substrings and compiled patterns.
#[derive(Debug, Clone)]
pub(crate) struct CompiledCondition {
    any: Vec<String>,
    all: Vec<String>,
    regex: Vec<Regex>,
}

impl CompiledCondition {
    fn compile(condition: &Condition) -> Result<Self, regex::Error> {
        let lower =
            |items: &[String]| -> Vec<String> { items.iter().map(|s| s.to_lowercase()).collect() };
        Ok(Self {
            any: lower(&condition.any),
            all: lower(&condition.all),
            regex: condition
                .regex
                .iter()
                .map(|pattern| RegexBuilder::new(pattern).case_insensitive(true).build())
                .collect::<Result<_, _>>()?,
        })
    }

    /// Tests one lowercased text.
    pub(crate) fn matches(&self, text: &str) -> bool {
        if self.any.is_empty() && self.all.is_empty() && self.regex.is_empty() {
            return false;
        }
        (self.any.is_empty() || self.any.iter().any(|s| text.contains(s.as_str())))
            && self.all.iter().all(|s| text.contains(s.as_str()))
            && (self.regex.is_empty() || self.regex.iter().any(|r| r.is_match(text)))
    }
}

/// A rule ready for evaluation.
///
/// A rule whose patterns fail to compile never matches.
#[derive(Debug, Clone)]
pub(crate) struct CompiledRule {
    matcher: Option<CompiledCondition>,
    exclude: Option<CompiledCondition>,
    pub(crate) files: Vec<String>,
}

impl CompiledRule {
    pub(crate) fn compile(index: usize, rule: &Rule) -> Self {
        let matcher = CompiledCondition::compile(&rule.matcher);
        let exclude = rule
            .exclude
            .as_ref()
            .map(CompiledCondition::compile)
            .transpose();
        match (matcher, exclude) {
            (Ok(matcher), Ok(exclude)) => Self {
                matcher: Some(matcher),
                exclude,
                files: rule.files.clone(),
            },
            (Err(e), _) | (_, Err(e)) => {
                tracing::warn!(rule = index, error = %e, "Invalid pattern, rule disabled");
                Self {
                    matcher: None,
                    exclude: None,
                    files: rule.files.clone(),
                }
            }
        }
    }

    /// Returns `true` if any text matches and no text is excluded.
    pub(crate) fn matches_any<S: AsRef<str>>(&self, texts: &[S]) -> bool {
        let Some(matcher) = &self.matcher else {
            return false;
        };
        let matched = texts.iter().any(|t| matcher.matches(t.as_ref()));
        let vetoed = self
            .exclude
            .as_ref()
            .is_some_and(|ex| texts.iter().any(|t| ex.matches(t.as_ref())));
        matched && !vetoed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn rule(value: serde_json::Value) -> CompiledRule {
        CompiledRule::compile(0, &serde_json::from_value(value).unwrap())
    }

    #[test]
    fn any_all_regex_clauses() {
        let any = rule(json!({"match": {"any": ["washer", "WASHTOWER"]}, "files": ["w"]}));
        assert!(any.matches_any(&["washtower"]));
        assert!(!any.matches_any(&["dryer"]));

        let all = rule(json!({"match": {"all": ["air", "purifier"]}, "files": ["p"]}));
        assert!(all.matches_any(&["air purifier fan"]));
        assert!(!all.matches_any(&["air conditioner"]));

        let regex = rule(json!({"match": {"regex": ["^REFRIG"]}, "files": ["r"]}));
        assert!(regex.matches_any(&["refrigerator"]));
        assert!(!regex.matches_any(&["kimchi refrigerator"]));
    }

    #[test]
    fn clauses_combine_with_and() {
        let r = rule(json!({"match": {"any": ["oven"], "regex": ["range"]}}));
        assert!(r.matches_any(&["oven range"]));
        assert!(!r.matches_any(&["oven"]));
    }

    #[test]
    fn exclude_vetoes() {
        let r = rule(json!({"match": {"any": ["washer"]}, "exclude": {"any": ["dryer"]}}));
        assert!(r.matches_any(&["washer"]));
        assert!(!r.matches_any(&["washer", "washer dryer"]));
    }

    #[test]
    fn invalid_regex_disables_rule() {
        let r = rule(json!({"match": {"any": ["washer"], "regex": ["("]}}));
        assert!(!r.matches_any(&["washer"]));
    }

    #[test]
    fn empty_condition_matches_nothing() {
        let r = rule(json!({"files": ["x"]}));
        assert!(!r.matches_any(&["anything"]));
        assert!(Condition::default().is_empty());
    }
}
