// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Engine configuration.

use serde::{Deserialize, Serialize};

use crate::schema::WRAPPER_PREFIXES;

/// Tunables of the mapping engine.
///
/// Every field has a sensible default; hosts override only what differs for
/// their vendor.
///
/// # Examples
///
/// ```
/// use capmap_lib::EngineConfig;
///
/// let config = EngineConfig::builder()
///     .vendor_prefix("acme_")
///     .language("de")
///     .case_insensitive_enums(false)
///     .build();
///
/// assert!(config.vendor_prefixes.contains(&"acme_".to_string()));
/// assert!(config.is_default_location("main"));
/// assert!(!config.case_insensitive_enums);
///
/// let from_json: EngineConfig = serde_json::from_str(r#"{"language": "fr"}"#).unwrap();
/// assert_eq!(from_json.language, "fr");
/// assert!(from_json.case_insensitive_enums);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EngineConfig {
    /// Prefixes stripped from device types before catalog matching.
    pub vendor_prefixes: Vec<String>,
    /// Location names that do not prefix identifiers.
    pub default_locations: Vec<String>,
    /// Default for case-insensitive enum matching, per descriptor overridable.
    pub case_insensitive_enums: bool,
    /// Ordered envelope prefixes tried when probing the profile.
    pub wrapper_prefixes: Vec<String>,
    /// Caption language.
    pub language: String,
    /// `chrono` format string for event tracker timestamps.
    pub time_format: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            vendor_prefixes: vec!["device_".to_string(), "thinq_".to_string()],
            default_locations: vec!["MAIN".to_string(), String::new()],
            case_insensitive_enums: true,
            wrapper_prefixes: WRAPPER_PREFIXES.iter().map(ToString::to_string).collect(),
            language: "en".to_string(),
            time_format: "%Y-%m-%d %H:%M:%S".to_string(),
        }
    }
}

impl EngineConfig {
    /// Starts a builder from the defaults.
    #[must_use]
    pub fn builder() -> EngineConfigBuilder {
        EngineConfigBuilder::default()
    }

    /// Returns `true` if `location` is a default location.
    #[must_use]
    pub fn is_default_location(&self, location: &str) -> bool {
        self.default_locations
            .iter()
            .any(|d| d.eq_ignore_ascii_case(location.trim()))
    }

    /// Strips the first matching vendor prefix, case-insensitively.
    #[must_use]
    pub fn strip_vendor_prefix<'a>(&self, device_type: &'a str) -> &'a str {
        self.vendor_prefixes
            .iter()
            .filter(|prefix| !prefix.is_empty())
            .find_map(|prefix| {
                device_type
                    .get(..prefix.len())
                    .filter(|head| head.eq_ignore_ascii_case(prefix))
                    .map(|_| &device_type[prefix.len()..])
            })
            .unwrap_or(device_type)
    }
}

/// Builder for [`EngineConfig`].
#[derive(Debug, Default)]
pub struct EngineConfigBuilder {
    inner: EngineConfig,
}

impl EngineConfigBuilder {
    /// Adds a vendor prefix.
    #[must_use]
    pub fn vendor_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.inner.vendor_prefixes.push(prefix.into());
        self
    }

    /// Adds a default location name.
    #[must_use]
    pub fn default_location(mut self, location: impl Into<String>) -> Self {
        self.inner.default_locations.push(location.into());
        self
    }

    /// Sets the case-insensitive enum default.
    #[must_use]
    pub fn case_insensitive_enums(mut self, enabled: bool) -> Self {
        self.inner.case_insensitive_enums = enabled;
        self
    }

    /// Appends an envelope prefix to the probing list.
    #[must_use]
    pub fn wrapper_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.inner.wrapper_prefixes.push(prefix.into());
        self
    }

    /// Sets the caption language.
    #[must_use]
    pub fn language(mut self, language: impl Into<String>) -> Self {
        self.inner.language = language.into();
        self
    }

    /// Sets the event timestamp format.
    #[must_use]
    pub fn time_format(mut self, format: impl Into<String>) -> Self {
        self.inner.time_format = format.into();
        self
    }

    /// Builds the configuration.
    #[must_use]
    pub fn build(self) -> EngineConfig {
        self.inner
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.vendor_prefixes, vec!["device_", "thinq_"]);
        assert!(config.is_default_location("MAIN"));
        assert!(config.is_default_location(""));
        assert!(!config.is_default_location("SUB"));
        assert_eq!(config.wrapper_prefixes.len(), WRAPPER_PREFIXES.len());
        assert!(config.case_insensitive_enums);
    }

    #[test]
    fn strips_vendor_prefix() {
        let config = EngineConfig::default();
        assert_eq!(config.strip_vendor_prefix("DEVICE_WASHER"), "WASHER");
        assert_eq!(config.strip_vendor_prefix("thinq_dryer"), "dryer");
        assert_eq!(config.strip_vendor_prefix("washer"), "washer");
        assert_eq!(config.strip_vendor_prefix("dev"), "dev");
    }

    #[test]
    fn builder_and_partial_json() {
        let config = EngineConfig::builder()
            .default_location("CENTER")
            .wrapper_prefix("data.")
            .time_format("%H:%M")
            .build();
        assert!(config.is_default_location("center"));
        assert_eq!(config.wrapper_prefixes.last().map(String::as_str), Some("data."));
        assert_eq!(config.time_format, "%H:%M");

        let parsed: EngineConfig =
            serde_json::from_str(r#"{"defaultLocations": ["ZONE_A"]}"#).unwrap();
        assert!(parsed.is_default_location("ZONE_A"));
        assert!(!parsed.is_default_location("MAIN"));
        assert_eq!(parsed.language, "en");
    }
}
