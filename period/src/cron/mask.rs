// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Validation masks for individual cron fields.

use std::sync::OnceLock;

use regex::Regex;

/// A cron field validation mask.
///
/// - `base`: validates one atomic value. Base values can be combined with commas, used as
///   range bounds and as step values.
/// - `exclusive`: validates a standalone token that cannot be combined with anything else,
///   e.g. `L` for "last" which cannot be part of a range.
///
/// Masks are immutable. The full validation pattern is compiled on first use and shared by
/// every parser built on the same mask.
#[derive(Debug)]
pub struct FieldMask {
    base: &'static str,
    exclusive: Option<&'static str>,
    compiled: OnceLock<Regex>,
}

impl FieldMask {
    /// Create a mask from its regex fragments.
    #[must_use]
    pub const fn new(base: &'static str, exclusive: Option<&'static str>) -> Self {
        Self {
            base,
            exclusive,
            compiled: OnceLock::new(),
        }
    }

    /// The regex fragment matching a single admissible value.
    #[must_use]
    pub const fn base_mask(&self) -> &'static str {
        self.base
    }

    /// The regex fragment matching a standalone, non-combinable token.
    #[must_use]
    pub const fn exclusive_mask(&self) -> Option<&'static str> {
        self.exclusive
    }

    /// Build the anchored validation pattern for this mask.
    ///
    /// ```txt
    /// field  = first *("," term) / exclusive
    /// first  = ("*" / base ["-" base]) ["/" base]
    /// term   = ("*" / base ["-" base]) ["/" base ["-" base]]
    /// ```
    ///
    /// Only the terms after a comma accept a range as step, so `20-25/45-50` is rejected
    /// while `1,20-25/45-50` is accepted.
    #[must_use]
    pub fn pattern(&self) -> String {
        let b = self.base;
        let mut validator = format!(
            r"((\*|({b})(-({b}))?)(/({b}))?)(,((\*|({b})(-({b}))?)(/({b})(-({b}))?)?))*"
        );
        if let Some(exclusive) = self.exclusive {
            validator.push('|');
            validator.push_str(exclusive);
        }
        format!("^({validator})$")
    }

    /// The compiled validation pattern.
    pub(crate) fn regex(&self) -> &Regex {
        self.compiled.get_or_init(|| {
            tracing::trace!(base = self.base, "compiling field mask");
            // SAFETY: masks are built from static fragments known to form a valid pattern
            Regex::new(&self.pattern()).unwrap()
        })
    }
}

/// Validation masks for the well-known field kinds.
#[derive(Debug, Clone, Copy)]
pub struct WellKnownMasks;

impl WellKnownMasks {
    /// Seconds, `0` to `59`.
    #[must_use]
    pub fn seconds() -> &'static FieldMask {
        static MASK: FieldMask = FieldMask::new("[0-9]|[1-5][0-9]", None);
        &MASK
    }

    /// Minutes, `0` to `59`.
    #[must_use]
    pub fn minutes() -> &'static FieldMask {
        static MASK: FieldMask = FieldMask::new("[0-9]|[1-5][0-9]", None);
        &MASK
    }

    /// Hours, `0` to `23`.
    #[must_use]
    pub fn hours() -> &'static FieldMask {
        static MASK: FieldMask = FieldMask::new("[0-9]|1[0-9]|2[0-3]", None);
        &MASK
    }

    /// Days of the month, `1` to `31`, or the standalone `?` and `L`.
    #[must_use]
    pub fn month_days() -> &'static FieldMask {
        static MASK: FieldMask = FieldMask::new(r"[1-9]|1[0-9]|2[0-9]|3[0-1]", Some(r"\?|L"));
        &MASK
    }

    /// Months, `1` to `12`.
    #[must_use]
    pub fn months() -> &'static FieldMask {
        static MASK: FieldMask = FieldMask::new("[1-9]|1[0-2]", None);
        &MASK
    }

    /// Days of the week, `1` to `7` with an optional `#1`..`#5` or `L` suffix, or the
    /// standalone `?` and `L`.
    #[must_use]
    pub fn weekdays() -> &'static FieldMask {
        static MASK: FieldMask = FieldMask::new("[1-7]((#[1-5])|L)?", Some(r"\?|L"));
        &MASK
    }

    /// Years, any number of digits.
    #[must_use]
    pub fn years() -> &'static FieldMask {
        static MASK: FieldMask = FieldMask::new("[0-9]+", None);
        &MASK
    }
}

/// Some well-known range expressions.
#[derive(Debug, Clone, Copy)]
pub struct WellKnownRanges;

impl WellKnownRanges {
    /// Monday through Friday.
    pub const WEEKDAYS: &'static str = "1-5";
}
