// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The capability descriptor and its creation/action rules.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::{ReadSpec, WriteSpec};
use crate::types::{Presentation, PropertyType};

/// Where a descriptor came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DescriptorOrigin {
    /// Curated descriptor file selected by the catalog.
    #[default]
    Manual,
    /// Derived from the profile schema.
    Auto,
    /// Always-present tracker (last error, last push message).
    Synthetic,
}

/// One bindable property: how to create it, read it, write it and show it.
///
/// # Examples
///
/// ```
/// use capmap_lib::descriptor::{CreateRule, Descriptor};
/// use capmap_lib::types::PropertyType;
///
/// let descriptor: Descriptor = serde_json::from_str(r#"{
///     "ident": "REMAIN_TIME",
///     "name": "Remaining time",
///     "type": "integer",
///     "create": {"when": "statusHasAny", "keys": ["timer.remainHour"]},
///     "read": {"composite": {"combine": "hm_to_minutes",
///              "parts": {"hours": "timer.remainHour", "minutes": "timer.remainMinute"}}}
/// }"#).unwrap();
///
/// assert_eq!(descriptor.property_type, PropertyType::Integer);
/// assert!(matches!(descriptor.create, CreateRule::StatusHasAny(_)));
/// assert!(descriptor.write.is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Descriptor {
    /// Stable identifier, unique within one device instance.
    pub ident: String,
    /// Human label before translation.
    pub name: String,
    /// Declared property type.
    #[serde(rename = "type", default)]
    pub property_type: PropertyType,
    /// Location this property belongs to, for multi-location appliances.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    /// Hide the property from the host's default view.
    #[serde(default)]
    pub hidden: bool,
    /// When to instantiate the property.
    #[serde(default)]
    pub create: CreateRule,
    /// How to read the value out of a status snapshot.
    #[serde(default)]
    pub read: ReadSpec,
    /// How to build control payloads; `None` for read-only properties.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub write: Option<WriteSpec>,
    /// When to attach a control action.
    #[serde(default)]
    pub action: ActionSpec,
    /// Rendering hint.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub presentation: Option<Presentation>,
    /// Origin of this descriptor.
    #[serde(skip)]
    pub origin: DescriptorOrigin,
}

impl Descriptor {
    /// Creates a read-only, always-created descriptor.
    #[must_use]
    pub fn new(ident: impl Into<String>, name: impl Into<String>, ty: PropertyType) -> Self {
        Self {
            ident: ident.into(),
            name: name.into(),
            property_type: ty,
            location: None,
            hidden: false,
            create: CreateRule::Always,
            read: ReadSpec::default(),
            write: None,
            action: ActionSpec::default(),
            presentation: None,
            origin: DescriptorOrigin::Manual,
        }
    }

    /// Sets the creation rule.
    #[must_use]
    pub fn with_create(mut self, create: CreateRule) -> Self {
        self.create = create;
        self
    }

    /// Sets the read spec.
    #[must_use]
    pub fn with_read(mut self, read: ReadSpec) -> Self {
        self.read = read;
        self
    }

    /// Sets the write spec.
    #[must_use]
    pub fn with_write(mut self, write: WriteSpec) -> Self {
        self.write = Some(write);
        self
    }

    /// Sets the action spec.
    #[must_use]
    pub fn with_action(mut self, action: ActionSpec) -> Self {
        self.action = action;
        self
    }

    /// Sets the presentation hint.
    #[must_use]
    pub fn with_presentation(mut self, presentation: Presentation) -> Self {
        self.presentation = Some(presentation);
        self
    }

    /// Sets the location.
    #[must_use]
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    /// Sets the origin.
    #[must_use]
    pub fn with_origin(mut self, origin: DescriptorOrigin) -> Self {
        self.origin = origin;
        self
    }

    /// Keys whose writability enables the action.
    ///
    /// The explicit `writableKeys` list when given, otherwise the write
    /// spec's target paths.
    #[must_use]
    pub fn writable_keys(&self) -> Vec<String> {
        if !self.action.writable_keys.is_empty() {
            return self.action.writable_keys.clone();
        }
        self.write
            .as_ref()
            .map(WriteSpec::target_paths)
            .unwrap_or_default()
    }
}

/// When a descriptor becomes a property.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "when", content = "keys", rename_all = "camelCase")]
pub enum CreateRule {
    /// Always create.
    #[default]
    Always,
    /// Create when every key exists in the profile.
    #[serde(alias = "profile-has-all")]
    ProfileHasAll(Vec<String>),
    /// Create when any key exists (or is writable) in the profile.
    #[serde(alias = "profile-has-any")]
    ProfileHasAny(Vec<String>),
    /// Create when any key is present in the status.
    #[serde(alias = "status-has-any")]
    StatusHasAny(Vec<String>),
}

/// When a control action is attached to a property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EnableWhen {
    /// Never attach an action.
    #[default]
    Never,
    /// Always attach an action.
    Always,
    /// Attach when the profile declares any writable key.
    #[serde(alias = "profile-writable-any")]
    ProfileWritableAny,
}

/// Lifecycle moments at which the host re-attaches an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Lifecycle {
    /// When the property is first created.
    Create,
    /// When an existing property is updated by a planning pass.
    Update,
    /// When the profile is refreshed from the vendor.
    Refresh,
}

/// Action attachment rules.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionSpec {
    /// Enablement condition.
    #[serde(default)]
    pub enable_when: EnableWhen,
    /// Keys probed for writability; defaults to the write targets.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub writable_keys: Vec<String>,
    /// Moments at which the host should re-attach the action.
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub reassert_on: BTreeSet<Lifecycle>,
}

impl ActionSpec {
    /// An action enabled when any of `keys` is writable in the profile.
    #[must_use]
    pub fn writable_any<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            enable_when: EnableWhen::ProfileWritableAny,
            writable_keys: keys.into_iter().map(Into::into).collect(),
            reassert_on: BTreeSet::new(),
        }
    }

    /// An action that is always enabled.
    #[must_use]
    pub fn always() -> Self {
        Self {
            enable_when: EnableWhen::Always,
            ..Self::default()
        }
    }
}
