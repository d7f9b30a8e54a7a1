// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Two-pass rule resolution.

use serde_json::Value;

use super::rule::CompiledRule;
use crate::config::EngineConfig;

/// Which pass produced a [`Resolution`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MatchPass {
    /// A rule matched the device type.
    Strict,
    /// Rules matched the device type or the profile text.
    Fallback,
    /// No rule matched; the catalog fallback list was used.
    Default,
}

/// Selected descriptor files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    /// File names in rule order, without duplicates.
    pub files: Vec<String>,
    /// The deciding pass.
    pub pass: MatchPass,
}

/// Normalized spellings of a device type, in matching order.
///
/// The lowercased type and its vendor-stripped form, each also with `_`
/// replaced by a space, by `-`, and removed.
///
/// ```
/// use capmap_lib::EngineConfig;
/// use capmap_lib::catalog::device_type_candidates;
///
/// let candidates = device_type_candidates("DEVICE_AIR_PURIFIER", &EngineConfig::default());
/// assert_eq!(candidates[0], "device_air_purifier");
/// assert!(candidates.contains(&"air purifier".to_string()));
/// assert!(candidates.contains(&"airpurifier".to_string()));
/// ```
#[must_use]
pub fn device_type_candidates(device_type: &str, config: &EngineConfig) -> Vec<String> {
    let lower = device_type.trim().to_lowercase();
    let stripped = config.strip_vendor_prefix(&lower).to_string();

    let mut out: Vec<String> = Vec::new();
    for base in [lower.clone(), stripped] {
        for variant in [
            base.clone(),
            base.replace('_', " "),
            base.replace('_', "-"),
            base.replace('_', ""),
        ] {
            if !variant.is_empty() && !out.contains(&variant) {
                out.push(variant);
            }
        }
    }
    out
}

pub(super) fn resolve(
    rules: &[CompiledRule],
    fallback: &[String],
    device_type: &str,
    profile: &Value,
    config: &EngineConfig,
) -> Resolution {
    let candidates = device_type_candidates(device_type, config);

    for candidate in &candidates {
        if let Some((index, rule)) = rules
            .iter()
            .enumerate()
            .find(|(_, rule)| rule.matches_any(std::slice::from_ref(candidate)))
        {
            tracing::debug!(device_type, candidate = %candidate, rule = index, "Strict catalog match");
            return Resolution {
                files: dedupe(rule.files.iter()),
                pass: MatchPass::Strict,
            };
        }
    }

    let mut texts = candidates;
    if !profile.is_null() {
        texts.push(profile.to_string().to_lowercase());
    }
    let matched: Vec<&CompiledRule> = rules.iter().filter(|rule| rule.matches_any(&texts)).collect();
    if !matched.is_empty() {
        tracing::debug!(device_type, rules = matched.len(), "Fallback catalog match");
        return Resolution {
            files: dedupe(matched.iter().flat_map(|rule| rule.files.iter())),
            pass: MatchPass::Fallback,
        };
    }

    tracing::debug!(device_type, "No catalog rule matched, using fallback files");
    Resolution {
        files: dedupe(fallback.iter()),
        pass: MatchPass::Default,
    }
}

fn dedupe<'a>(files: impl Iterator<Item = &'a String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for file in files {
        if !out.contains(file) {
            out.push(file.clone());
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::super::Catalog;
    use super::*;
    use serde_json::json;

    fn catalog() -> Catalog {
        Catalog::from_json_str(
            r#"{
                "rules": [
                    {"match": {"any": ["washer"]}, "files": ["washer.json"]},
                    {"match": {"all": ["wash"]}, "files": ["generic_wash.json"]},
                    {"match": {"any": ["airconditioner", "air conditioner"]},
                     "exclude": {"any": ["system"]}, "files": ["ac.json"]},
                    {"match": {"any": ["targettemperature"]}, "files": ["thermo.json", "common.json"]},
                    {"match": {"regex": ["drying"]}, "files": ["dry.json", "common.json"]}
                ],
                "fallback": ["common.json"]
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn strict_pass_uses_first_matching_rule_only() {
        let profile = json!({"washerOperationMode": {"type": "enum"}});
        let resolution = catalog().resolve("washer", &profile, &EngineConfig::default());
        assert_eq!(resolution.pass, MatchPass::Strict);
        assert_eq!(resolution.files, vec!["washer.json"]);
    }

    #[test]
    fn separator_variants_match() {
        let resolution =
            catalog().resolve("DEVICE_AIR_CONDITIONER", &json!(null), &EngineConfig::default());
        assert_eq!(resolution.files, vec!["ac.json"]);
    }

    #[test]
    fn exclude_vetoes_strict_match() {
        let resolution = catalog().resolve(
            "SYSTEM_AIR_CONDITIONER",
            &json!(null),
            &EngineConfig::default(),
        );
        assert_eq!(resolution.pass, MatchPass::Default);
    }

    #[test]
    fn fallback_pass_unions_profile_matches() {
        let profile = json!({
            "temperature": {"targetTemperature": {"type": "range"}},
            "operation": {"dryingMode": {"type": "enum"}}
        });
        let resolution = catalog().resolve("DEHUMIDIFIER", &profile, &EngineConfig::default());
        assert_eq!(resolution.pass, MatchPass::Fallback);
        assert_eq!(resolution.files, vec!["thermo.json", "common.json", "dry.json"]);
    }

    #[test]
    fn default_list_when_nothing_matches() {
        let resolution = catalog().resolve("ROBOT_CLEANER", &json!({}), &EngineConfig::default());
        assert_eq!(resolution.pass, MatchPass::Default);
        assert_eq!(resolution.files, vec!["common.json"]);

        let empty = Catalog::empty().resolve("ROBOT_CLEANER", &json!({}), &EngineConfig::default());
        assert!(empty.files.is_empty());
    }
}
