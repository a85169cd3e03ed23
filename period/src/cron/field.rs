// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Individual cron fields.

use std::fmt::{self, Display};

use jiff::Timestamp;
use jiff::civil::Time;
use jiff::tz::TimeZone;

use crate::cron::mask::{FieldMask, WellKnownMasks};

/// Field positions in a cron expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display)]
#[strum(serialize_all = "snake_case")]
#[expect(missing_docs)]
pub enum FieldPosition {
    Seconds,
    Minutes,
    Hours,
    MonthDays,
    Months,
    Weekdays,
    Years,
}

impl FieldPosition {
    /// The validation mask associated with this position.
    #[must_use]
    pub fn mask(self) -> &'static FieldMask {
        match self {
            FieldPosition::Seconds => WellKnownMasks::seconds(),
            FieldPosition::Minutes => WellKnownMasks::minutes(),
            FieldPosition::Hours => WellKnownMasks::hours(),
            FieldPosition::MonthDays => WellKnownMasks::month_days(),
            FieldPosition::Months => WellKnownMasks::months(),
            FieldPosition::Weekdays => WellKnownMasks::weekdays(),
            FieldPosition::Years => WellKnownMasks::years(),
        }
    }

    /// The parser validating expressions at this position.
    #[must_use]
    pub fn parser(self) -> FieldParser {
        FieldParser::new(self.mask())
    }
}

/// Validates field expressions against a validation mask.
#[derive(Debug, Clone, Copy)]
pub struct FieldParser {
    mask: &'static FieldMask,
}

impl FieldParser {
    /// Create a parser for the given mask.
    #[must_use]
    pub const fn new(mask: &'static FieldMask) -> Self {
        Self { mask }
    }

    /// The validation mask of this parser.
    #[must_use]
    pub const fn mask(&self) -> &'static FieldMask {
        self.mask
    }

    /// Checks whether a field expression matches the validation mask.
    ///
    /// The check is purely syntactic: `24` is rejected for hours because the mask does not
    /// admit it, but the bounds of a range are never compared.
    #[must_use]
    pub fn validate(&self, expression: &str) -> bool {
        self.mask.regex().is_match(expression)
    }
}

/// A single cron field with its own expression.
#[derive(Debug, Clone)]
pub struct Field {
    expression: String,
    parser: FieldParser,
    position: FieldPosition,
}

impl Field {
    /// Create a field from its raw expression.
    pub fn new(expression: impl Into<String>, parser: FieldParser, position: FieldPosition) -> Self {
        Self {
            expression: expression.into(),
            parser,
            position,
        }
    }

    /// Create a field validated by the mask of its position.
    pub fn at(position: FieldPosition, expression: impl Into<String>) -> Self {
        Self::new(expression, position.parser(), position)
    }

    /// The raw expression, verbatim.
    #[must_use]
    pub fn expression(&self) -> &str {
        &self.expression
    }

    /// The position of this field.
    #[must_use]
    pub const fn position(&self) -> FieldPosition {
        self.position
    }

    /// The parser validating this field.
    #[must_use]
    pub const fn parser(&self) -> FieldParser {
        self.parser
    }

    /// Gets the value of the field, i.e. the text before a `/`, `#` or `L` marker. It may
    /// be a range or a list.
    ///
    /// Returns `None` when there is no value before the marker or when the value is the
    /// `*` wildcard.
    ///
    /// ```
    /// # use tempora_period::{Field, FieldPosition};
    /// assert_eq!(Field::at(FieldPosition::Weekdays, "1#3").value(), Some("1"));
    /// assert_eq!(Field::at(FieldPosition::Hours, "2/12").value(), Some("2"));
    /// assert_eq!(Field::at(FieldPosition::Hours, "*/4").value(), None);
    /// ```
    #[must_use]
    pub fn value(&self) -> Option<&str> {
        let end = self
            .expression
            .find(['/', '#', 'L'])
            .unwrap_or(self.expression.len());
        match self.expression.get(..end) {
            Some("" | "*") | None => None,
            Some(value) => Some(value),
        }
    }

    /// Gets the recurrence part of the field, i.e. the text after a `/` or a `#`. It may
    /// also be `L` for "last".
    ///
    /// ```
    /// # use tempora_period::{Field, FieldPosition};
    /// assert_eq!(Field::at(FieldPosition::Hours, "*/22").recurrence(), Some("22"));
    /// assert_eq!(Field::at(FieldPosition::Weekdays, "1#3").recurrence(), Some("3"));
    /// assert_eq!(Field::at(FieldPosition::Weekdays, "1L").recurrence(), Some("L"));
    /// assert_eq!(Field::at(FieldPosition::Hours, "12").recurrence(), None);
    /// ```
    #[must_use]
    pub fn recurrence(&self) -> Option<&str> {
        if let Some(i) = self.expression.rfind(['/', '#']) {
            return self.expression.get(i + 1..).filter(|a| !a.is_empty());
        }
        self.expression.contains('L').then_some("L")
    }

    /// Gets the value of a time field (minutes, hours) in the system time zone.
    ///
    /// See [`Field::localised_time_value_in`].
    #[must_use]
    pub fn localised_time_value(&self) -> String {
        self.localised_time_value_in(&TimeZone::system())
    }

    /// Gets the value of a time field (minutes, hours) in the given time zone.
    ///
    /// The numeric value is read as a UTC hour, or as a UTC minute of hour `0`, on the
    /// current date. Any other field, or any expression which is not a plain number, is
    /// returned verbatim.
    #[must_use]
    pub fn localised_time_value_in(&self, tz: &TimeZone) -> String {
        let localised = match (self.position, self.to_number()) {
            (FieldPosition::Hours, Some(hour)) => {
                utc_time_in(tz, hour, 0).map(|(hour, _)| hour.to_string())
            }
            (FieldPosition::Minutes, Some(minute)) => {
                utc_time_in(tz, 0, minute).map(|(_, minute)| minute.to_string())
            }
            _ => None,
        };
        localised.unwrap_or_else(|| self.expression.clone())
    }

    /// A field is valid when its expression matches the mask of its parser.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.parser.validate(&self.expression)
    }

    /// Returns true if the expression starts with the `*` wildcard.
    #[must_use]
    pub fn is_wildcard(&self) -> bool {
        self.expression.starts_with('*')
    }

    /// Returns true if the expression starts with `0`.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.expression.starts_with('0')
    }

    /// Checks if the expression is an integer, with no recurrence markers, no ranges and
    /// no lists.
    #[must_use]
    pub fn is_pure_numeric(&self) -> bool {
        !self.expression.is_empty() && self.expression.bytes().all(|b| b.is_ascii_digit())
    }

    /// Checks whether the expression matches exactly the given range expression.
    #[must_use]
    pub fn is_range(&self, range: &str) -> bool {
        self.expression == range
    }

    /// The expression as an integer, if it is a pure number.
    #[must_use]
    pub fn to_number(&self) -> Option<u32> {
        if !self.is_pure_numeric() {
            return None;
        }
        lexical::parse::<u32, _>(&self.expression).ok()
    }
}

impl Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.expression)
    }
}

/// Reads an UTC time of the current day as a local hour and minute.
pub(crate) fn utc_time_in(tz: &TimeZone, hour: u32, minute: u32) -> Option<(u8, u8)> {
    let hour = i8::try_from(hour).ok()?;
    let minute = i8::try_from(minute).ok()?;
    let time = Time::new(hour, minute, 0, 0)
        .inspect_err(|e| tracing::debug!(hour, minute, "time out of range: {e}"))
        .ok()?;
    let today = Timestamp::now().to_zoned(TimeZone::UTC).date();
    let utc = today.to_datetime(time).to_zoned(TimeZone::UTC).ok()?;
    let local = utc.with_time_zone(tz.clone());
    Some((
        u8::try_from(local.hour()).ok()?,
        u8::try_from(local.minute()).ok()?,
    ))
}

#[cfg(test)]
mod tests {
    use jiff::tz::offset;

    use super::*;

    fn validate(mask: &'static FieldMask, cases: &[(&str, bool)]) {
        let parser = FieldParser::new(mask);
        for (expr, expected) in cases {
            assert_eq!(
                parser.validate(expr),
                *expected,
                "validating {expr:?} against {}",
                mask.base_mask()
            );
        }
    }

    #[test]
    fn validates_seconds_and_minutes() {
        #[rustfmt::skip]
        let cases = [
            ("*", true),
            ("*/30", true),
            ("*/30-35", false),
            ("2/20", true),
            ("30/40-45", false),
            ("20-25/45", true),
            ("1/2/3", false),
            ("1,2,3", true),
            ("*,2,3", true),
            ("*,*,*", true),
            ("20-25/45,20-25/45,2,4", true),
            ("*-45", false),
            ("60", false),
            ("*/30-60", false),
            ("20-25/45-50", false),
            ("4/*", false),
            ("4-*", false),
            ("20-25/45,20-25/45,60", false),
        ];
        validate(WellKnownMasks::seconds(), &cases);
        validate(WellKnownMasks::minutes(), &cases);
    }

    #[test]
    fn accepts_range_as_step_after_comma() {
        let parser = FieldParser::new(WellKnownMasks::minutes());
        assert!(!parser.validate("20-25/45-50"));
        assert!(parser.validate("1,20-25/45-50"));
    }

    #[test]
    fn validates_hours() {
        #[rustfmt::skip]
        let cases = [
            ("*", true),
            ("0", true),
            ("23", true),
            ("24", false),
            ("*/30", false),
            ("*/12-24", false),
            ("1/2/3", false),
            ("2/23", true),
            ("2/24", false),
            ("*/12", true),
            ("1-12", true),
            ("20-23", true),
            ("20-24", false),
            ("1,2,3", true),
            ("1/12,2-3,*/4", true),
        ];
        validate(WellKnownMasks::hours(), &cases);
    }

    #[test]
    fn validates_months() {
        #[rustfmt::skip]
        let cases = [
            ("*", true),
            ("1", true),
            ("12", true),
            ("1-2", true),
            ("*/2", true),
            ("1/2/3", false),
            ("0", false),
            ("13", false),
            ("*/12-24", false),
            ("2/12", true),
            ("2-4/10", true),
            ("1,3,4", true),
            ("1/12,2-3,*/4", true),
        ];
        validate(WellKnownMasks::months(), &cases);
    }

    #[test]
    fn validates_month_days() {
        #[rustfmt::skip]
        let cases = [
            ("*", true),
            ("?", true),
            ("0", false),
            ("32", false),
            ("1/2/3", false),
            ("1", true),
            ("31", true),
            ("*/10", true),
            ("L", true),
            ("*/L", false),
            ("*/?", false),
            ("*,L", false),
            ("*,?", false),
            ("3#10", false),
            ("10L", false),
            ("1?", false),
        ];
        validate(WellKnownMasks::month_days(), &cases);
    }

    #[test]
    fn validates_weekdays() {
        #[rustfmt::skip]
        let cases = [
            ("*", true),
            ("?", true),
            ("0", false),
            ("1/2/3", false),
            ("8", false),
            ("1", true),
            ("7", true),
            ("*/7", true),
            ("L", true),
            ("*/L", false),
            ("*/?", false),
            ("*,L", false),
            ("*,?", false),
            ("3#2", true),
            ("3#6", false),
            ("8#2", false),
            ("5L", true),
            ("8L", false),
            ("1?", false),
        ];
        validate(WellKnownMasks::weekdays(), &cases);
    }

    #[test]
    fn validates_years() {
        let cases = [("*", true), ("2026", true), ("2026-2030", true), ("20x6", false)];
        validate(WellKnownMasks::years(), &cases);
    }

    #[test]
    fn gets_recurrence() {
        let parser = FieldParser::new(WellKnownMasks::weekdays());
        let cases = [
            ("1L", Some("L")),
            ("L", Some("L")),
            ("1#3", Some("3")),
            ("*/22", Some("22")),
            ("2/12", Some("12")),
            ("1-5", None),
            ("1#", None),
        ];
        for (expr, expected) in cases {
            // any position will do here
            let field = Field::new(expr, parser, FieldPosition::Minutes);
            assert_eq!(field.recurrence(), expected, "recurrence of {expr:?}");
        }
    }

    #[test]
    fn gets_value() {
        let cases = [
            ("*", None),
            ("*/4", None),
            ("L", None),
            ("1#3", Some("1")),
            ("5L", Some("5")),
            ("1-5", Some("1-5")),
            ("2/12", Some("2")),
            ("?", Some("?")),
        ];
        for (expr, expected) in cases {
            let field = Field::at(FieldPosition::Weekdays, expr);
            assert_eq!(field.value(), expected, "value of {expr:?}");
        }
    }

    #[test]
    fn classifies_expressions() {
        let field = Field::at(FieldPosition::Seconds, "0");
        assert!(field.is_zero());
        assert!(field.is_pure_numeric());
        assert!(!field.is_wildcard());
        assert_eq!(field.to_number(), Some(0));

        let field = Field::at(FieldPosition::Hours, "*/22");
        assert!(field.is_wildcard());
        assert!(!field.is_pure_numeric());
        assert_eq!(field.to_number(), None);

        let field = Field::at(FieldPosition::Weekdays, "1-5");
        assert!(field.is_range("1-5"));
        assert!(!field.is_range("1-6"));
        assert!(!field.is_pure_numeric());

        assert!(!Field::at(FieldPosition::Minutes, "").is_pure_numeric());
        assert!(!Field::at(FieldPosition::Minutes, "").is_valid());
    }

    #[test]
    fn localises_time_values() {
        let tz = TimeZone::fixed(offset(2));
        assert_eq!(Field::at(FieldPosition::Hours, "16").localised_time_value_in(&tz), "18");
        assert_eq!(Field::at(FieldPosition::Hours, "23").localised_time_value_in(&tz), "1");
        assert_eq!(Field::at(FieldPosition::Minutes, "30").localised_time_value_in(&tz), "30");
        assert_eq!(Field::at(FieldPosition::Hours, "*/4").localised_time_value_in(&tz), "*/4");
        assert_eq!(Field::at(FieldPosition::Weekdays, "3").localised_time_value_in(&tz), "3");

        let tz = TimeZone::fixed(jiff::tz::Offset::from_seconds(5 * 3600 + 1800).unwrap());
        assert_eq!(Field::at(FieldPosition::Minutes, "45").localised_time_value_in(&tz), "15");
        assert_eq!(Field::at(FieldPosition::Hours, "10").localised_time_value_in(&tz), "15");
    }

    #[test]
    fn keeps_out_of_range_time_values() {
        let tz = TimeZone::UTC;
        assert_eq!(Field::at(FieldPosition::Hours, "99").localised_time_value_in(&tz), "99");
    }
}
