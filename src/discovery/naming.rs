// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Identifiers, display names and unit suffixes of discovered properties.

use crate::config::EngineConfig;
use crate::translate::{NameTable, humanize, to_upper_snake};

/// Stable identifier: `[LOCATION_]RESOURCE_PROPERTY` in upper snake case.
///
/// Default locations (see [`EngineConfig::default_locations`]) are omitted.
///
/// ```
/// use capmap_lib::EngineConfig;
/// use capmap_lib::discovery::auto_ident;
///
/// let config = EngineConfig::default();
/// assert_eq!(auto_ident("runState", "currentState", None, &config), "RUN_STATE_CURRENT_STATE");
/// assert_eq!(auto_ident("operation", "enabled", Some("MAIN"), &config), "OPERATION_ENABLED");
/// assert_eq!(auto_ident("operation", "enabled", Some("SUB"), &config), "SUB_OPERATION_ENABLED");
/// ```
#[must_use]
pub fn auto_ident(
    resource: &str,
    property: &str,
    location: Option<&str>,
    config: &EngineConfig,
) -> String {
    let base = to_upper_snake(&crate::path::join(resource, property));
    match location.filter(|loc| !config.is_default_location(loc)) {
        Some(loc) => format!("{}_{base}", to_upper_snake(loc)),
        None => base,
    }
}

/// Display name from the name table, with a location suffix for
/// non-default locations.
#[must_use]
pub fn auto_name(
    names: &NameTable,
    resource: &str,
    property: &str,
    location: Option<&str>,
    config: &EngineConfig,
) -> String {
    let name = names.display_name(resource, property);
    match location.filter(|loc| !config.is_default_location(loc)) {
        Some(loc) => format!("{name} ({})", humanize(loc)),
        None => name,
    }
}

/// Unit suffix inferred from a property name.
#[must_use]
pub fn unit_suffix(property: &str) -> Option<&'static str> {
    let lower = property.to_ascii_lowercase();
    [
        ("temperature", " °C"),
        ("humidity", " %"),
        ("percent", " %"),
        ("hour", " h"),
        ("minute", " min"),
        ("second", " s"),
    ]
    .into_iter()
    .find(|(needle, _)| lower.contains(needle))
    .map(|(_, suffix)| suffix)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn idents_for_groups_and_locations() {
        let config = EngineConfig::default();
        assert_eq!(
            auto_ident("windDirection", "rotate.upDown", None, &config),
            "WIND_DIRECTION_ROTATE_UP_DOWN"
        );
        assert_eq!(
            auto_ident("temperature", "targetTemperature", Some("FRIDGE"), &config),
            "FRIDGE_TEMPERATURE_TARGET_TEMPERATURE"
        );
        assert_eq!(auto_ident("", "power", Some(""), &config), "POWER");
    }

    #[test]
    fn names_carry_location() {
        let config = EngineConfig::default();
        let names = NameTable::from_pairs([("targetTemperature", "Target temperature")]);
        assert_eq!(
            auto_name(&names, "temperature", "targetTemperature", Some("FREEZER"), &config),
            "Target temperature (Freezer)"
        );
        assert_eq!(
            auto_name(&names, "runState", "state", Some("MAIN"), &config),
            "Run State State"
        );
    }

    #[test]
    fn suffixes() {
        assert_eq!(unit_suffix("targetTemperature"), Some(" °C"));
        assert_eq!(unit_suffix("relativeHourToStart"), Some(" h"));
        assert_eq!(unit_suffix("remainMinute"), Some(" min"));
        assert_eq!(unit_suffix("targetHumidity"), Some(" %"));
        assert_eq!(unit_suffix("windStrength"), None);
    }
}
