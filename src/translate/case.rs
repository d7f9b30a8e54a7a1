// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Case conversion helpers.

/// Splits snake, kebab, dotted, spaced and camel-case text into words.
///
/// Acronym runs stay together (`"HVACMode"` → `["HVAC", "Mode"]`).
#[must_use]
pub fn split_words(text: &str) -> Vec<String> {
    let mut words = Vec::new();
    for chunk in text.split(|c: char| !c.is_alphanumeric()).filter(|c| !c.is_empty()) {
        let chars: Vec<char> = chunk.chars().collect();
        let mut current = String::new();
        for (i, &c) in chars.iter().enumerate() {
            let prev = i.checked_sub(1).map(|p| chars[p]);
            let next = chars.get(i + 1).copied();
            let boundary = match prev {
                Some(p) if c.is_uppercase() && p.is_lowercase() => true,
                Some(p) if c.is_uppercase() && p.is_uppercase() => {
                    next.is_some_and(char::is_lowercase)
                }
                Some(p) if c.is_ascii_digit() != p.is_ascii_digit() => true,
                _ => false,
            };
            if boundary && !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            current.push(c);
        }
        if !current.is_empty() {
            words.push(current);
        }
    }
    words
}

/// Turns an identifier or enum token into title-cased display text.
#[must_use]
pub fn humanize(text: &str) -> String {
    split_words(text)
        .iter()
        .map(|word| {
            let lower = word.to_lowercase();
            let mut chars = lower.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Converts text to `UPPER_SNAKE_CASE`.
#[must_use]
pub fn to_upper_snake(text: &str) -> String {
    split_words(text)
        .iter()
        .map(|word| word.to_uppercase())
        .collect::<Vec<_>>()
        .join("_")
}

/// Normalizes a key for table lookup: lowercase alphanumerics only.
#[must_use]
pub fn normalize_key(text: &str) -> String {
    text.chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|c| c.to_ascii_lowercase())
        .collect()
}
