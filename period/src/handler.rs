// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! The query surface shared by every expression dialect, and the dispatcher choosing one.

use jiff::tz::TimeZone;
use serde::Serialize;

use crate::cron::{self, Cron, CronParser};
use crate::describe::Locale;
use crate::iso8601::Iso8601Period;

/// The coarse granularity of a recurrence.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, strum::Display, strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
#[expect(missing_docs)]
pub enum RecurrenceMagnitude {
    Minutely,
    Hourly,
    Daily,
    Weekly,
    Monthly,
}

/// A local time of day at which a recurrence fires.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub struct RecurrenceTime {
    /// Hour of the day, `0` to `23`
    pub hour: Option<u8>,
    /// Minute of the hour, `0` to `59`
    pub minute: Option<u8>,
}

impl RecurrenceTime {
    /// A recurrence time with both components known.
    #[must_use]
    pub const fn new(hour: u8, minute: u8) -> Self {
        Self {
            hour: Some(hour),
            minute: Some(minute),
        }
    }
}

/// The query surface shared by every kind of period expression.
pub trait PeriodExpressionHandler {
    /// The expression as written.
    fn raw_expression(&self) -> String;

    /// Whether the expression is well-formed for its kind.
    fn is_valid(&self) -> bool;

    /// Whether the expression is simple enough to be edited by a recurrence picker form.
    fn is_ui_supported(&self) -> bool;

    /// A sentence describing the expression, in the system time zone.
    fn to_human_readable_string(&self, locale: Locale) -> String {
        self.to_human_readable_string_in(locale, &TimeZone::system())
    }

    /// A sentence describing the expression, with times shown in the given time zone.
    fn to_human_readable_string_in(&self, locale: Locale, tz: &TimeZone) -> String;

    /// Tokens for external translation, in the system time zone.
    fn to_translatable_string_array(&self, locale: Locale) -> Vec<String> {
        self.to_translatable_string_array_in(locale, &TimeZone::system())
    }

    /// Tokens for external translation, with times shown in the given time zone.
    fn to_translatable_string_array_in(&self, locale: Locale, tz: &TimeZone) -> Vec<String>;

    /// The granularity of the recurrence.
    fn recurrence_magnitude(&self) -> RecurrenceMagnitude;

    /// The local time of day of the recurrence, in the system time zone.
    fn recurrence_time(&self) -> RecurrenceTime {
        self.recurrence_time_in(&TimeZone::system())
    }

    /// The local time of day of the recurrence, in the given time zone.
    fn recurrence_time_in(&self, tz: &TimeZone) -> RecurrenceTime;
}

/// A period expression of any supported kind.
#[derive(Debug, Clone)]
pub enum PeriodExpression {
    /// A cron expression
    Cron(Cron),
    /// An ISO 8601 duration
    Iso8601(Iso8601Period),
}

impl PeriodExpression {
    /// The kind of the expression, `cron` or `iso8601`.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            PeriodExpression::Cron(_) => "cron",
            PeriodExpression::Iso8601(_) => "iso8601",
        }
    }

    /// The cron expression, if this is one.
    #[must_use]
    pub const fn as_cron(&self) -> Option<&Cron> {
        match self {
            PeriodExpression::Cron(cron) => Some(cron),
            PeriodExpression::Iso8601(_) => None,
        }
    }

    /// The ISO 8601 duration, if this is one.
    #[must_use]
    pub const fn as_iso8601(&self) -> Option<&Iso8601Period> {
        match self {
            PeriodExpression::Iso8601(period) => Some(period),
            PeriodExpression::Cron(_) => None,
        }
    }

    fn inner(&self) -> &dyn PeriodExpressionHandler {
        match self {
            PeriodExpression::Cron(cron) => cron,
            PeriodExpression::Iso8601(period) => period,
        }
    }
}

impl PeriodExpressionHandler for PeriodExpression {
    fn raw_expression(&self) -> String {
        self.inner().raw_expression()
    }

    fn is_valid(&self) -> bool {
        self.inner().is_valid()
    }

    fn is_ui_supported(&self) -> bool {
        self.inner().is_ui_supported()
    }

    fn to_human_readable_string_in(&self, locale: Locale, tz: &TimeZone) -> String {
        self.inner().to_human_readable_string_in(locale, tz)
    }

    fn to_translatable_string_array_in(&self, locale: Locale, tz: &TimeZone) -> Vec<String> {
        self.inner().to_translatable_string_array_in(locale, tz)
    }

    fn recurrence_magnitude(&self) -> RecurrenceMagnitude {
        self.inner().recurrence_magnitude()
    }

    fn recurrence_time_in(&self, tz: &TimeZone) -> RecurrenceTime {
        self.inner().recurrence_time_in(tz)
    }
}

/// Picks the handler able to read an expression.
///
/// ISO 8601 durations are tried first, then cron expressions. Returns `None` for an absent
/// or empty input, or when no handler accepts it.
#[tracing::instrument(level = "debug")]
#[must_use]
pub fn handle(expression: Option<&str>) -> Option<PeriodExpression> {
    let expression = expression.filter(|a| !a.is_empty())?;

    if Iso8601Period::can_handle_expression(expression) {
        tracing::debug!("handled as an ISO 8601 duration");
        return Some(PeriodExpression::Iso8601(Iso8601Period::new(expression)));
    }

    if cron::can_handle_expression(expression) {
        tracing::debug!("handled as a cron expression");
        return CronParser::parse(expression).ok().map(PeriodExpression::Cron);
    }

    tracing::debug!("no handler for expression");
    None
}
