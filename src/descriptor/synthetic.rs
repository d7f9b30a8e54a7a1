// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Always-present tracker descriptors.

use super::{Descriptor, DescriptorOrigin};
use crate::path::FlatMap;
use crate::schema::SchemaProbe;
use crate::types::{Presentation, PropertyType};

/// Identifier of the last reported device error.
pub const LAST_ERROR: &str = "LAST_ERROR";

/// Identifier of the last received push message.
pub const LAST_PUSH_MESSAGE: &str = "LAST_PUSH_MESSAGE";

/// Tracker descriptors for the sections the profile declares.
///
/// `LAST_ERROR` requires an `error` section, `LAST_PUSH_MESSAGE` a
/// `notification` section. Their values are fed by
/// [`EventTracker`](crate::events::EventTracker), not read from status.
/// Sections are probed through the given envelope `prefixes`.
#[must_use]
pub fn synthetic_descriptors(profile: &FlatMap, prefixes: &[String]) -> Vec<Descriptor> {
    let probe = SchemaProbe::with_prefixes(profile, prefixes);
    [
        ("error", LAST_ERROR, "Last error"),
        ("notification", LAST_PUSH_MESSAGE, "Last push message"),
    ]
    .into_iter()
    .filter(|(section, _, _)| probe.has_key(section))
    .map(|(_, ident, name)| {
        Descriptor::new(ident, name, PropertyType::String)
            .with_presentation(Presentation::value())
            .with_origin(DescriptorOrigin::Synthetic)
    })
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path::flatten;
    use crate::schema::WRAPPER_PREFIXES;
    use serde_json::json;

    fn prefixes() -> Vec<String> {
        WRAPPER_PREFIXES.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn follows_declared_sections() {
        let profile = flatten(&json!({
            "error": ["OE_ERROR", "DE_ERROR"],
            "notification": {"push": ["WASHING_IS_COMPLETE"]}
        }));
        let idents: Vec<String> = synthetic_descriptors(&profile, &prefixes())
            .into_iter()
            .map(|d| d.ident)
            .collect();
        assert_eq!(idents, vec![LAST_ERROR, LAST_PUSH_MESSAGE]);
    }

    #[test]
    fn wrapped_sections_are_found() {
        let profile = flatten(&json!({"property": [{"error": ["OE_ERROR"]}]}));
        let descriptors = synthetic_descriptors(&profile, &prefixes());
        assert_eq!(descriptors.len(), 1);
        assert_eq!(descriptors[0].origin, DescriptorOrigin::Synthetic);
    }

    #[test]
    fn configured_prefixes_are_used() {
        let profile = flatten(&json!({"envelope": {"notification": {"push": ["DONE"]}}}));
        assert!(synthetic_descriptors(&profile, &prefixes()).is_empty());

        let custom = vec!["envelope.".to_string()];
        let idents: Vec<String> = synthetic_descriptors(&profile, &custom)
            .into_iter()
            .map(|d| d.ident)
            .collect();
        assert_eq!(idents, vec![LAST_PUSH_MESSAGE]);
    }

    #[test]
    fn nothing_for_empty_profile() {
        assert!(synthetic_descriptors(&FlatMap::new(), &prefixes()).is_empty());
    }
}
