// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Presentation hints handed to the host alongside each property.

use serde::{Deserialize, Serialize};

use super::PropertyValue;

/// How the host should render a property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PresentationKind {
    /// Read-only value display.
    #[default]
    Value,
    /// On/off switch.
    Switch,
    /// Numeric slider with a range.
    Slider,
    /// One button per enum option.
    Buttons,
}

/// One selectable option of an enum property.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnumOption {
    /// Raw value sent to and read from the device.
    pub value: PropertyValue,
    /// Display caption (pre-translation).
    pub caption: String,
}

impl EnumOption {
    /// Creates an option.
    #[must_use]
    pub fn new(value: impl Into<PropertyValue>, caption: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            caption: caption.into(),
        }
    }
}

/// Rendering hint for a property.
///
/// # Examples
///
/// ```
/// use capmap_lib::types::{Presentation, PresentationKind};
///
/// let slider = Presentation::slider(16.0, 30.0, 0.5).with_suffix(" °C").with_digits(1);
/// assert_eq!(slider.kind, PresentationKind::Slider);
/// assert_eq!(slider.suffix.as_deref(), Some(" °C"));
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Presentation {
    /// Rendering kind.
    #[serde(default)]
    pub kind: PresentationKind,
    /// Lower bound for sliders.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    /// Upper bound for sliders.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    /// Step size for sliders.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub step: Option<f64>,
    /// Options for buttons (and captions for enum value displays).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<EnumOption>,
    /// Unit suffix appended to the rendered value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suffix: Option<String>,
    /// Number of decimal digits to show.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub digits: Option<u8>,
}

impl Presentation {
    /// A plain value display.
    #[must_use]
    pub fn value() -> Self {
        Self::default()
    }

    /// An on/off switch.
    #[must_use]
    pub fn switch() -> Self {
        Self {
            kind: PresentationKind::Switch,
            ..Self::default()
        }
    }

    /// A slider over `min..=max`.
    #[must_use]
    pub fn slider(min: f64, max: f64, step: f64) -> Self {
        Self {
            kind: PresentationKind::Slider,
            min: Some(min),
            max: Some(max),
            step: Some(step),
            ..Self::default()
        }
    }

    /// A button row.
    #[must_use]
    pub fn buttons(options: Vec<EnumOption>) -> Self {
        Self {
            kind: PresentationKind::Buttons,
            options,
            ..Self::default()
        }
    }

    /// Sets the option list.
    #[must_use]
    pub fn with_options(mut self, options: Vec<EnumOption>) -> Self {
        self.options = options;
        self
    }

    /// Sets the unit suffix.
    #[must_use]
    pub fn with_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.suffix = Some(suffix.into());
        self
    }

    /// Sets the number of displayed decimal digits.
    #[must_use]
    pub fn with_digits(mut self, digits: u8) -> Self {
        self.digits = Some(digits);
        self
    }

    /// Returns `true` if the presentation offers a control surface.
    #[must_use]
    pub const fn is_control(&self) -> bool {
        matches!(
            self.kind,
            PresentationKind::Switch | PresentationKind::Slider | PresentationKind::Buttons
        )
    }
}
