// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Cron expressions, in the Unix and Quartz arrangements.

mod field;
mod generate;
mod mask;
mod schedule;

use std::str::FromStr;

use jiff::tz::TimeZone;

use crate::describe::{Locale, describe};
use crate::handler::{PeriodExpressionHandler, RecurrenceMagnitude, RecurrenceTime};

pub use crate::cron::field::{Field, FieldParser, FieldPosition};
pub use crate::cron::generate::{
    generate_daily_cron_expression, generate_hourly_cron_expression,
    generate_monthly_cron_expression, generate_weekly_cron_expression,
};
pub use crate::cron::mask::{FieldMask, WellKnownMasks, WellKnownRanges};
pub use crate::cron::schedule::Occurrences;

pub(crate) use crate::cron::field::utc_time_in;

/// Arrangement of the fields in a cron expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum Arrangement {
    /// Minute, hour, day of month, month, day of week.
    Unix,
    /// Second, minute, hour, day of month, month, day of week and an optional year.
    Quartz,
}

impl Arrangement {
    /// The field positions of this arrangement, in order. The years of the Quartz
    /// arrangement may be absent.
    #[must_use]
    pub const fn positions(self) -> &'static [FieldPosition] {
        use FieldPosition::{Hours, MonthDays, Minutes, Months, Seconds, Weekdays, Years};
        match self {
            Arrangement::Unix => &[Minutes, Hours, MonthDays, Months, Weekdays],
            Arrangement::Quartz => &[Seconds, Minutes, Hours, MonthDays, Months, Weekdays, Years],
        }
    }
}

/// Error raised when an expression cannot be split into cron fields.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CronParseError {
    /// The expression does not have 5, 6 or 7 parts.
    #[error("Illegal number of parts in expression: expected 5, 6 or 7, got {count}")]
    IllegalPartCount {
        /// Number of space separated parts found
        count: usize,
    },

    /// The parts do not fit the requested arrangement.
    #[error("Illegal number of parts for the {arrangement} arrangement: got {count}")]
    ArrangementMismatch {
        /// The requested arrangement
        arrangement: Arrangement,
        /// Number of parts provided
        count: usize,
    },
}

/// Parses string expressions and builds [`Cron`] objects.
#[derive(Debug, Clone, Copy)]
pub struct CronParser {
    arrangement: Arrangement,
}

impl CronParser {
    /// A parser with the Quartz arrangement (6 or 7 fields).
    #[must_use]
    pub const fn quartz() -> Self {
        Self {
            arrangement: Arrangement::Quartz,
        }
    }

    /// A parser with the Unix arrangement (5 fields).
    #[must_use]
    pub const fn unix() -> Self {
        Self {
            arrangement: Arrangement::Unix,
        }
    }

    /// The arrangement of this parser.
    #[must_use]
    pub const fn arrangement(&self) -> Arrangement {
        self.arrangement
    }

    /// Initialises all fields with individual expression parts, in order.
    ///
    /// ## Errors
    ///
    /// Fails when the number of parts does not fit the arrangement: exactly 5 for Unix,
    /// 6 or 7 for Quartz.
    pub fn parse_parts(&self, parts: &[&str]) -> Result<Cron, CronParseError> {
        let (seconds, rest, years) = match (self.arrangement, parts) {
            (Arrangement::Unix, [m, h, dom, mon, dow]) => (None, [m, h, dom, mon, dow], None),
            (Arrangement::Quartz, [s, m, h, dom, mon, dow]) => {
                (Some(s), [m, h, dom, mon, dow], None)
            }
            (Arrangement::Quartz, [s, m, h, dom, mon, dow, y]) => {
                (Some(s), [m, h, dom, mon, dow], Some(y))
            }
            _ => {
                return Err(CronParseError::ArrangementMismatch {
                    arrangement: self.arrangement,
                    count: parts.len(),
                });
            }
        };

        let [minutes, hours, month_days, months, weekdays] = rest;
        Ok(Cron {
            arrangement: self.arrangement,
            seconds: seconds.map(|a| Field::at(FieldPosition::Seconds, *a)),
            minutes: Field::at(FieldPosition::Minutes, *minutes),
            hours: Field::at(FieldPosition::Hours, *hours),
            month_days: Field::at(FieldPosition::MonthDays, *month_days),
            months: Field::at(FieldPosition::Months, *months),
            weekdays: Field::at(FieldPosition::Weekdays, *weekdays),
            years: years.map(|a| Field::at(FieldPosition::Years, *a)),
        })
    }

    /// Creates a [`Cron`] from a cron expression. The arrangement depends on the number of
    /// fields, separated by single spaces:
    ///
    /// - Unix (minute, hour, day of month, month, day of week) with 5 fields;
    /// - Quartz (second, minute, hour, day of month, month, day of week, year) with 6 or 7
    ///   fields, the year being absent with 6 fields.
    ///
    /// Fields are not validated here, see [`PeriodExpressionHandler::is_valid`].
    ///
    /// ## Errors
    ///
    /// Fails with [`CronParseError::IllegalPartCount`] for any other number of fields.
    pub fn parse(expression: &str) -> Result<Cron, CronParseError> {
        let parts: Vec<&str> = expression.split(' ').collect();
        let parser = match parts.len() {
            5 => Self::unix(),
            6 | 7 => Self::quartz(),
            count => {
                tracing::debug!(expression, count, "illegal number of cron parts");
                return Err(CronParseError::IllegalPartCount { count });
            }
        };
        parser.parse_parts(&parts)
    }
}

/// Checks whether an expression is a well-formed and valid cron expression.
#[must_use]
pub fn can_handle_expression(expression: &str) -> bool {
    CronParser::parse(expression).is_ok_and(|cron| cron.is_valid())
}

/// A cron expression.
#[derive(Debug, Clone)]
pub struct Cron {
    arrangement: Arrangement,
    seconds: Option<Field>,
    minutes: Field,
    hours: Field,
    month_days: Field,
    months: Field,
    weekdays: Field,
    years: Option<Field>,
}

impl Cron {
    /// The arrangement the expression was parsed with.
    #[must_use]
    pub const fn arrangement(&self) -> Arrangement {
        self.arrangement
    }

    /// All present fields, in positional order.
    pub fn fields(&self) -> impl Iterator<Item = &Field> {
        self.seconds
            .iter()
            .chain([
                &self.minutes,
                &self.hours,
                &self.month_days,
                &self.months,
                &self.weekdays,
            ])
            .chain(self.years.iter())
    }

    /// The field at the given position, if present.
    #[must_use]
    pub fn field(&self, position: FieldPosition) -> Option<&Field> {
        match position {
            FieldPosition::Seconds => self.seconds.as_ref(),
            FieldPosition::Minutes => Some(&self.minutes),
            FieldPosition::Hours => Some(&self.hours),
            FieldPosition::MonthDays => Some(&self.month_days),
            FieldPosition::Months => Some(&self.months),
            FieldPosition::Weekdays => Some(&self.weekdays),
            FieldPosition::Years => self.years.as_ref(),
        }
    }

    /// The full cron expression. Parsing it again yields the same fields.
    #[must_use]
    pub fn to_cron_expression(&self) -> String {
        self.fields()
            .map(Field::expression)
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// The cron expression with its time fields converted to the system time zone.
    #[must_use]
    pub fn to_localised_cron_expression(&self) -> String {
        self.to_localised_cron_expression_in(&TimeZone::system())
    }

    /// The cron expression with its time fields converted to the given time zone.
    #[must_use]
    pub fn to_localised_cron_expression_in(&self, tz: &TimeZone) -> String {
        self.localised_in(tz).to_cron_expression()
    }

    /// A copy of this expression with its time fields converted to the given time zone.
    #[must_use]
    pub fn localised_in(&self, tz: &TimeZone) -> Cron {
        let localise = |field: &Field| {
            Field::new(
                field.localised_time_value_in(tz),
                field.parser(),
                field.position(),
            )
        };
        Cron {
            arrangement: self.arrangement,
            seconds: self.seconds.as_ref().map(localise),
            minutes: localise(&self.minutes),
            hours: localise(&self.hours),
            month_days: localise(&self.month_days),
            months: localise(&self.months),
            weekdays: localise(&self.weekdays),
            years: self.years.as_ref().map(localise),
        }
    }

    /// Checks whether the expression is constrained to the working days, Monday to Friday.
    #[must_use]
    pub fn is_only_on_weekdays(&self) -> bool {
        self.weekdays.is_range(WellKnownRanges::WEEKDAYS)
    }

    /// Gets the value of the weekdays field.
    ///
    /// For `1#2`, returns `1`.
    #[must_use]
    pub fn weekly_recurrence(&self) -> Option<&str> {
        self.weekdays.value()
    }

    /// Gets the recurrence of the weekdays field.
    ///
    /// For `1#2`, returns `2`; for `1L`, returns `L`.
    #[must_use]
    pub fn monthly_recurrence(&self) -> Option<&str> {
        self.weekdays.recurrence()
    }

    /// The seconds field, absent in the Unix arrangement.
    #[must_use]
    pub const fn seconds(&self) -> Option<&Field> {
        self.seconds.as_ref()
    }

    /// The minutes field.
    #[must_use]
    pub const fn minutes(&self) -> &Field {
        &self.minutes
    }

    /// The hours field.
    #[must_use]
    pub const fn hours(&self) -> &Field {
        &self.hours
    }

    /// The days of the month field.
    #[must_use]
    pub const fn month_days(&self) -> &Field {
        &self.month_days
    }

    /// The months field.
    #[must_use]
    pub const fn months(&self) -> &Field {
        &self.months
    }

    /// The days of the week field.
    #[must_use]
    pub const fn weekdays(&self) -> &Field {
        &self.weekdays
    }

    /// The years field, absent in the Unix arrangement and in 6-field Quartz expressions.
    #[must_use]
    pub const fn years(&self) -> Option<&Field> {
        self.years.as_ref()
    }
}

impl FromStr for Cron {
    type Err = CronParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CronParser::parse(s)
    }
}

impl PeriodExpressionHandler for Cron {
    fn raw_expression(&self) -> String {
        self.to_cron_expression()
    }

    fn is_valid(&self) -> bool {
        self.fields().all(Field::is_valid)
    }

    fn is_ui_supported(&self) -> bool {
        self.is_valid()
            && self.seconds.as_ref().is_none_or(Field::is_zero)
            && self.minutes.is_pure_numeric()
            && (self.hours.is_pure_numeric() // e.g. '12'
                || (self.hours.recurrence().is_some() && self.hours.is_wildcard())) // e.g. '*/22'
            && self.month_days.is_wildcard()
            && self.months.is_wildcard()
    }

    fn to_human_readable_string_in(&self, locale: Locale, tz: &TimeZone) -> String {
        describe(&self.localised_in(tz), locale)
    }

    fn to_translatable_string_array_in(&self, locale: Locale, tz: &TimeZone) -> Vec<String> {
        vec![self.to_human_readable_string_in(locale, tz)]
    }

    fn recurrence_magnitude(&self) -> RecurrenceMagnitude {
        if self.monthly_recurrence().is_some() {
            RecurrenceMagnitude::Monthly
        } else if self.hours.recurrence().is_some() {
            RecurrenceMagnitude::Hourly
        } else if self.weekly_recurrence().is_some() && !self.is_only_on_weekdays() {
            RecurrenceMagnitude::Weekly
        } else {
            RecurrenceMagnitude::Daily
        }
    }

    fn recurrence_time_in(&self, tz: &TimeZone) -> RecurrenceTime {
        let hour = self.hours.to_number().unwrap_or(0);
        let minute = self.minutes.to_number().unwrap_or(0);
        match utc_time_in(tz, hour, minute) {
            Some((hour, minute)) => RecurrenceTime::new(hour, minute),
            None => RecurrenceTime::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use jiff::tz::offset;

    use super::*;

    #[test]
    fn parses_and_validates_expressions() {
        #[rustfmt::skip]
        let cases = [
            // (expression, valid, ui supported)
            ("* 2/22 * * * *",         true,  false),
            ("3 30 16 * * *",          true,  false),
            ("* 30 16 * * *",          true,  false),
            ("* 30 16 * * 1L",         true,  false),
            ("* 30 16 * * 1#3",        true,  false),
            ("0 30 16 * * *",          true,  true),
            ("0 30 16 * * 1L",         true,  true),
            ("0 30 16 * * 1#3",        true,  true),
            ("* * 16 * * 1#3",         true,  false),
            ("0 40 16 * * 1-5",        true,  true),
            ("3 2 */4 * * *",          true,  false),
            ("1-4 25,35,45 */4 * * *", true,  false),
            ("3 2 */4 * * 1L",         true,  false),
            ("3 2 */4 * * 1#3",        true,  false),
            ("3 2 */4 * * 1#6L",       false, false),
            ("2/22 * * * *",           true,  false),
            ("30 16 * * *",            true,  true),
            ("30 16 * * 1L",           true,  true),
            ("30 16 * * 1#3",          true,  true),
            ("* 16 * * 1#3",           true,  false),
            ("2 */4 * * *",            true,  true),
            ("25,35,45 */4 * * *",     true,  false),
            ("2 */4 * * 1L",           true,  true),
            ("2 */4 * * 1#3",          true,  true),
            ("2 */4 * * 1#6L",         false, false),
        ];
        for (expr, valid, ui_supported) in cases {
            let cron = CronParser::parse(expr).unwrap();
            assert_eq!(cron.to_cron_expression(), expr, "round trip of {expr:?}");
            assert_eq!(cron.is_valid(), valid, "validity of {expr:?}");
            assert_eq!(cron.is_ui_supported(), ui_supported, "ui support of {expr:?}");
        }
    }

    #[test]
    fn selects_arrangement_by_part_count() {
        let cron = CronParser::parse("30 16 * * *").unwrap();
        assert_eq!(cron.arrangement(), Arrangement::Unix);
        assert!(cron.seconds().is_none());
        assert!(cron.years().is_none());

        let cron = CronParser::parse("0 30 16 * * *").unwrap();
        assert_eq!(cron.arrangement(), Arrangement::Quartz);
        assert_eq!(cron.seconds().map(Field::expression), Some("0"));
        assert!(cron.years().is_none());

        let cron = CronParser::parse("0 30 16 * * * 2026").unwrap();
        assert_eq!(cron.years().map(Field::expression), Some("2026"));
        assert_eq!(cron.to_cron_expression(), "0 30 16 * * * 2026");
    }

    #[test]
    fn rejects_illegal_part_counts() {
        for (expr, count) in [
            ("", 1),
            ("* * * *", 4),
            ("0 0 0 * * * 2026 1", 8),
            ("not a valid expr", 4),
        ] {
            assert_eq!(
                CronParser::parse(expr).unwrap_err(),
                CronParseError::IllegalPartCount { count },
                "parsing {expr:?}"
            );
        }
    }

    #[test]
    fn keeps_empty_parts_from_double_spaces() {
        let cron = CronParser::parse("0  16 * * *").unwrap();
        assert_eq!(cron.to_cron_expression(), "0  16 * * *");
        assert!(!cron.is_valid());
    }

    #[test]
    fn parses_parts_for_arrangement() {
        let cron = CronParser::unix()
            .parse_parts(&["30", "16", "*", "*", "1-5"])
            .unwrap();
        assert!(cron.is_only_on_weekdays());

        let err = CronParser::unix()
            .parse_parts(&["0", "30", "16", "*", "*", "*"])
            .unwrap_err();
        assert_eq!(
            err,
            CronParseError::ArrangementMismatch {
                arrangement: Arrangement::Unix,
                count: 6
            }
        );
        assert!(CronParser::quartz().parse_parts(&["30", "16", "*", "*", "*"]).is_err());
    }

    #[test]
    fn checks_which_expressions_can_be_handled() {
        assert!(can_handle_expression("0 30 16 * * *"));
        assert!(can_handle_expression("2 */4 * * 1#3"));
        assert!(!can_handle_expression("3 2 */4 * * 1#6L"));
        assert!(!can_handle_expression("PT30M"));
        assert!(!can_handle_expression("not a valid expr"));
    }

    #[test]
    fn computes_recurrence_magnitude() {
        let cases = [
            ("0 30 16 * * *", RecurrenceMagnitude::Daily),
            ("0 30 16 * * 1-5", RecurrenceMagnitude::Daily),
            ("0 30 16 * * 3", RecurrenceMagnitude::Weekly),
            ("0 30 16 * * 1#3", RecurrenceMagnitude::Monthly),
            ("0 30 16 * * 1L", RecurrenceMagnitude::Monthly),
            ("0 30 */4 * * *", RecurrenceMagnitude::Hourly),
            ("0 30 */4 * * 1-5", RecurrenceMagnitude::Hourly),
        ];
        for (expr, expected) in cases {
            let cron = CronParser::parse(expr).unwrap();
            assert_eq!(cron.recurrence_magnitude(), expected, "magnitude of {expr:?}");
        }
    }

    #[test]
    fn reads_convenience_accessors() {
        let cron = CronParser::parse("0 30 16 * * 1#3").unwrap();
        assert_eq!(cron.weekly_recurrence(), Some("1"));
        assert_eq!(cron.monthly_recurrence(), Some("3"));
        assert!(!cron.is_only_on_weekdays());

        let cron = CronParser::parse("0 30 16 * * *").unwrap();
        assert_eq!(cron.weekly_recurrence(), None);
        assert_eq!(cron.monthly_recurrence(), None);
        assert_eq!(cron.field(FieldPosition::Hours).map(Field::expression), Some("16"));
        assert!(cron.field(FieldPosition::Years).is_none());
    }

    #[test]
    fn converts_recurrence_time() {
        let tz = TimeZone::fixed(offset(2));
        let cron = CronParser::parse("0 30 16 * * *").unwrap();
        assert_eq!(cron.recurrence_time_in(&tz), RecurrenceTime::new(18, 30));
        assert_eq!(cron.recurrence_time_in(&TimeZone::UTC), RecurrenceTime::new(16, 30));

        // hourly expressions have no hour, read as midnight UTC
        let cron = CronParser::parse("0 15 */4 * * *").unwrap();
        assert_eq!(cron.recurrence_time_in(&tz), RecurrenceTime::new(2, 15));

        let cron = CronParser::parse("0 30 23 * * *").unwrap();
        let tz = TimeZone::fixed(offset(-5));
        assert_eq!(cron.recurrence_time_in(&tz), RecurrenceTime::new(18, 30));
    }

    #[test]
    fn localises_expression() {
        let tz = TimeZone::fixed(offset(2));
        let cron = CronParser::parse("0 30 16 * * 1#3").unwrap();
        assert_eq!(cron.to_localised_cron_expression_in(&tz), "0 30 18 * * 1#3");
        assert_eq!(cron.to_cron_expression(), "0 30 16 * * 1#3");

        let cron = CronParser::parse("0 30 */4 * * *").unwrap();
        assert_eq!(cron.to_localised_cron_expression_in(&tz), "0 30 */4 * * *");
    }

    #[test]
    fn parses_from_str() {
        let cron: Cron = "30 16 * * 1-5".parse().unwrap();
        assert!(cron.is_only_on_weekdays());
        assert!("*".parse::<Cron>().is_err());
    }
}
