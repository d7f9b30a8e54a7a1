// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! `CapMap` Lib - capability mapping for appliance cloud profiles.
//!
//! This library turns the loosely structured, vendor-controlled profile of a
//! connected appliance into a declarative plan of typed, bindable properties,
//! reads their values out of status documents and synthesizes the nested
//! control payloads that change them.
//!
//! # Supported Features
//!
//! - **Catalog resolution**: device type → curated descriptor files, with a
//!   strict pass over the type name and a profile-wide fallback pass
//! - **Auto-discovery**: typed properties inferred from the profile schema,
//!   including multi-location appliances and timer fields
//! - **Planning**: creation, action enablement and initial values per
//!   descriptor, reconciled idempotently against a host property store
//! - **Reading**: direct paths, enum maps, boolean tokens, array selection by
//!   predicate and composite hour/minute values
//! - **Writing**: attribute, enum map, composite, array template, template,
//!   multi-attribute and first-of strategies, with range clamping and timer
//!   pairing
//!
//! # Quick Start
//!
//! ```
//! use capmap_lib::{CapabilityEngine, PropertyValue};
//! use capmap_lib::host::{MemoryHost, apply_plan};
//! use serde_json::json;
//!
//! let engine = CapabilityEngine::default();
//!
//! // No curated descriptors: everything comes from the profile schema
//! let profile = json!({"property": {
//!     "temperature": {"targetTemperature": {
//!         "type": "range", "mode": ["r", "w"],
//!         "value": {"w": {"min": 16, "max": 30, "step": 1}}
//!     }}
//! }});
//! let status = json!({"temperature": {"targetTemperature": 22}});
//!
//! let descriptors = engine.descriptors("DEVICE_AIR_CONDITIONER", &profile);
//! let plan = engine.plan(&descriptors, &profile, &status);
//!
//! let host = MemoryHost::new();
//! apply_plan(&host, &plan);
//! assert_eq!(
//!     host.get("TEMPERATURE_TARGET_TEMPERATURE").unwrap().value,
//!     Some(PropertyValue::Integer(22))
//! );
//!
//! // Out-of-range requests are clamped to the declared range
//! let payload = engine.build_payload(
//!     &descriptors, &profile, &status, &host,
//!     "TEMPERATURE_TARGET_TEMPERATURE", PropertyValue::Integer(35),
//! );
//! assert_eq!(payload, Some(json!({"temperature": {"targetTemperature": 30}})));
//! ```
//!
//! # Error Handling
//!
//! Mapping never fails: missing or malformed profile and status sections are
//! treated as absent. Only the loaders return [`Result`], and each has an
//! `*_or_default` companion that logs and degrades.
//!
//! # Logging
//!
//! Decisions are reported through [`tracing`] events (`debug` for catalog and
//! strategy choices, `trace` for path probing, `warn` for degraded loads). The
//! library never installs a subscriber.

pub mod catalog;
mod config;
pub mod descriptor;
pub mod discovery;
mod engine;
pub mod error;
pub mod events;
pub mod host;
pub mod path;
pub mod plan;
pub mod read;
pub mod schema;
pub mod state;
pub mod translate;
pub mod types;
pub mod write;

pub use catalog::{Catalog, MatchPass, Resolution};
pub use config::{EngineConfig, EngineConfigBuilder};
pub use descriptor::{Descriptor, DescriptorLibrary, DescriptorSet};
pub use engine::{CapabilityEngine, CapabilityEngineBuilder};
pub use error::{Error, LoadError, Result, ValueError};
pub use events::{EventKind, EventTracker};
pub use host::{MemoryHost, PropertyHost, Translate, apply_plan};
pub use plan::{PlanEntry, PropertyPlan};
pub use state::StatusSnapshot;
pub use types::{Presentation, PropertyType, PropertyValue};
pub use write::PayloadBuilder;
