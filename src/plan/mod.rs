// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Property plans.
//!
//! A [`PropertyPlan`] is the ordered list of [`PlanEntry`] values a host
//! reconciles its bound properties against. Planning is a pure function of
//! the descriptor set, profile and status: the same inputs always produce
//! the same plan.
//!
//! # Examples
//!
//! ```
//! use capmap_lib::EngineConfig;
//! use capmap_lib::descriptor::{CreateRule, Descriptor, DescriptorSet, ReadSpec};
//! use capmap_lib::host::IdentityTranslator;
//! use capmap_lib::plan::PlanBuilder;
//! use capmap_lib::types::{PropertyType, PropertyValue};
//! use serde_json::json;
//!
//! let descriptors = DescriptorSet::merge(
//!     vec![
//!         Descriptor::new("STATE", "State", PropertyType::String)
//!             .with_read(ReadSpec::sources(["runState.currentState"])),
//!         Descriptor::new("DRYER", "Dryer", PropertyType::String)
//!             .with_create(CreateRule::ProfileHasAny(vec!["dryLevel".into()])),
//!     ],
//!     Vec::new(),
//!     Vec::new(),
//! );
//!
//! let config = EngineConfig::default();
//! let plan = PlanBuilder::new(&config, &IdentityTranslator).build(
//!     &descriptors,
//!     &json!({"runState": {"currentState": {"type": "enum"}}}),
//!     &json!({"runState": {"currentState": "RUNNING"}}),
//! );
//!
//! assert!(plan[0].should_create);
//! assert_eq!(plan[0].initial_value, Some(PropertyValue::from("RUNNING")));
//! assert!(!plan[1].should_create);
//! ```

mod conditions;

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::EngineConfig;
use crate::descriptor::{Descriptor, DescriptorSet, Lifecycle};
use crate::host::Translate;
use crate::path::flatten;
use crate::read::ValueReader;
use crate::types::{Presentation, PropertyType, PropertyValue};

pub use conditions::Conditions;

/// The planning decision for one descriptor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanEntry {
    /// Stable identifier.
    pub ident: String,
    /// Resolved type.
    #[serde(rename = "type")]
    pub property_type: PropertyType,
    /// Translated display name.
    pub name: String,
    /// Location of the property, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    /// Hidden from the default view.
    pub hidden: bool,
    /// Whether a missing property should be created.
    pub should_create: bool,
    /// Rendering hint with translated captions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub presentation: Option<Presentation>,
    /// Whether a control action is attached.
    pub enable_action: bool,
    /// Value to write right away, when the status has one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initial_value: Option<PropertyValue>,
    /// Moments at which the host re-attaches the action.
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub reassert_on: BTreeSet<Lifecycle>,
}

/// Ordered plan entries.
pub type PropertyPlan = Vec<PlanEntry>;

/// Builds property plans.
#[derive(Clone, Copy)]
pub struct PlanBuilder<'a> {
    config: &'a EngineConfig,
    translator: &'a dyn Translate,
}

impl std::fmt::Debug for PlanBuilder<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlanBuilder")
            .field("config", self.config)
            .finish_non_exhaustive()
    }
}

impl<'a> PlanBuilder<'a> {
    /// Creates a builder.
    #[must_use]
    pub fn new(config: &'a EngineConfig, translator: &'a dyn Translate) -> Self {
        Self { config, translator }
    }

    /// Plans every descriptor in set order.
    ///
    /// Malformed profile or status sections count as absent.
    #[must_use]
    pub fn build(&self, descriptors: &DescriptorSet, profile: &Value, status: &Value) -> PropertyPlan {
        let profile = flatten(profile);
        let status = flatten(status);
        let conditions = Conditions::new(&profile, &status, &self.config.wrapper_prefixes);
        let reader = ValueReader::new(&status, self.config);

        let plan: PropertyPlan = descriptors
            .iter()
            .map(|descriptor| self.entry(descriptor, &conditions, &reader))
            .collect();
        tracing::debug!(
            entries = plan.len(),
            created = plan.iter().filter(|e| e.should_create).count(),
            "Built property plan"
        );
        plan
    }

    fn entry(&self, descriptor: &Descriptor, conditions: &Conditions<'_>, reader: &ValueReader<'_>) -> PlanEntry {
        let should_create = conditions.should_create(&descriptor.create);
        let enable_action = conditions.action_enabled(descriptor);
        tracing::trace!(
            ident = %descriptor.ident,
            should_create,
            enable_action,
            "Planned descriptor"
        );

        PlanEntry {
            ident: descriptor.ident.clone(),
            property_type: descriptor.property_type,
            name: self.translator.translate(&descriptor.name),
            location: descriptor.location.clone(),
            hidden: descriptor.hidden,
            should_create,
            presentation: descriptor.presentation.clone().map(|mut presentation| {
                for option in &mut presentation.options {
                    option.caption = self.translator.translate(&option.caption);
                }
                presentation
            }),
            enable_action,
            initial_value: reader.read(descriptor),
            reassert_on: descriptor.action.reassert_on.clone(),
        }
    }
}
