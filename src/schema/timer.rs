// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Countdown-timer naming conventions.
//!
//! Timers are armed through an hour/minute pair such as
//! `relativeHourToStart` / `relativeMinuteToStart`. The device rejects a
//! command carrying only one half, and it reports the arming state through a
//! separate read-only flag such as `relativeStartTimer` (`SET`/`UNSET`).

use std::sync::LazyLock;

use regex::Regex;

static TIMER_FIELD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<pre>[a-z]*)(?P<unit>Hour|Minute)(?P<post>To[A-Z][A-Za-z]*)$")
        .expect("timer field pattern should compile")
});

static TIMER_FLAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(start|stop)timer$").expect("timer flag pattern should compile")
});

/// Half of an hour/minute timer pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimerUnit {
    /// The hour half.
    Hour,
    /// The minute half.
    Minute,
}

impl TimerUnit {
    const fn name(self) -> &'static str {
        match self {
            Self::Hour => "Hour",
            Self::Minute => "Minute",
        }
    }

    const fn other(self) -> Self {
        match self {
            Self::Hour => Self::Minute,
            Self::Minute => Self::Hour,
        }
    }
}

/// A property name recognized as one half of a timer pair.
///
/// ```
/// use capmap_lib::schema::{TimerField, TimerUnit};
///
/// let field = TimerField::parse("relativeHourToStart").unwrap();
/// assert_eq!(field.unit(), TimerUnit::Hour);
/// assert_eq!(field.sibling(), "relativeMinuteToStart");
/// assert!(TimerField::parse("remainHour").is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimerField {
    prefix: String,
    unit: TimerUnit,
    suffix: String,
}

impl TimerField {
    /// Parses the last segment of a property name.
    #[must_use]
    pub fn parse(property: &str) -> Option<Self> {
        let name = property.rsplit('.').next().unwrap_or(property);
        let captures = TIMER_FIELD.captures(name)?;
        let unit = match captures.name("unit")?.as_str() {
            "Hour" => TimerUnit::Hour,
            _ => TimerUnit::Minute,
        };
        Some(Self {
            prefix: captures.name("pre").map_or("", |m| m.as_str()).to_string(),
            unit,
            suffix: captures.name("post").map_or("", |m| m.as_str()).to_string(),
        })
    }

    /// Which half this is.
    #[must_use]
    pub const fn unit(&self) -> TimerUnit {
        self.unit
    }

    /// Name of the other half.
    #[must_use]
    pub fn sibling(&self) -> String {
        format!("{}{}{}", self.prefix, self.unit.other().name(), self.suffix)
    }
}

/// Returns `true` if `property` is one half of a timer pair.
#[must_use]
pub fn is_timer_field(property: &str) -> bool {
    TimerField::parse(property).is_some()
}

/// Returns `true` if `property` is a start/stop timer arming flag.
#[must_use]
pub fn is_timer_flag(property: &str) -> bool {
    TIMER_FLAG.is_match(property)
}
