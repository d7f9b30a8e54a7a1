// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Capability descriptors.
//!
//! A [`Descriptor`] binds one logical property to its creation condition,
//! read strategy, write strategy and presentation hint. Descriptors come from
//! three places, merged by [`DescriptorSet`] in this precedence:
//!
//! 1. curated descriptor files ([`DescriptorLibrary`]) selected by the catalog
//! 2. auto-discovery from the profile schema
//! 3. synthetic trackers ([`synthetic_descriptors`])
//!
//! # Examples
//!
//! ```
//! use capmap_lib::descriptor::DescriptorLibrary;
//!
//! let mut library = DescriptorLibrary::new();
//! library
//!     .add_json("washer", r#"[{"ident": "RUN_STATE", "name": "State",
//!                             "read": {"sources": ["runState.currentState"]}}]"#)
//!     .unwrap();
//!
//! let selected = library.select(&["washer.json".to_string()]);
//! assert_eq!(selected[0].ident, "RUN_STATE");
//! ```

mod library;
mod model;
mod read_spec;
mod store;
mod synthetic;
mod write_spec;

pub use library::DescriptorLibrary;
pub use model::{
    ActionSpec, CreateRule, Descriptor, DescriptorOrigin, EnableWhen, Lifecycle,
};
pub use read_spec::{ArraySelector, BoolTokens, Combinator, CompositeSpec, ReadSpec};
pub use store::DescriptorSet;
pub use synthetic::{LAST_ERROR, LAST_PUSH_MESSAGE, synthetic_descriptors};
pub use write_spec::{
    ArrayTemplateWrite, AttributeWrite, Clamp, EnumMapWrite, FirstOfOption, FirstOfWrite,
    MultiAttributeWrite, TemplateWrite, WriteSpec, WriteStrategy,
};
