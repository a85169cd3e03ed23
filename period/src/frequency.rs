// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Cron expressions for scheduling frequencies anchored on a seed instant.

use jiff::Timestamp;
use jiff::tz::TimeZone;

use crate::cron;

/// How often a scheduled task repeats.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display, strum::EnumString, strum::VariantNames,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[expect(missing_docs)]
pub enum ScheduleFrequency {
    Hourly,
    Daily,
    Weekly,
    Monthly,
    Oneshot,
}

/// Errors raised when a schedule cannot be expressed as a cron expression.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScheduleError {
    /// The period expression is not recognised.
    #[error("Expression {expression} does not conform to ISO 8601 period expression format")]
    Invalid {
        /// The rejected expression
        expression: String,
    },

    /// The period is recognised but has no cron equivalent.
    #[error("Expression {expression} cannot be expressed as a cron expression")]
    Unsupported {
        /// The rejected expression
        expression: String,
    },

    /// The generated expression does not fit the bounds of its fields.
    #[error("Periodicity was specified outside of acceptable bounds: {expression}")]
    OutOfBounds {
        /// The generated, invalid expression
        expression: String,
    },
}

/// A Quartz cron expression repeating at the given frequency, at the time and day of the
/// seed instant read in UTC.
///
/// With an `interval`, the expression repeats every `interval` units:
///
/// | frequency | expression          | with interval `n`         |
/// |-----------|---------------------|---------------------------|
/// | hourly    | `0 m h * * *`       | `0 m */n * * *`           |
/// | daily     | `0 m h * * *`       | `0 m h * * */n` if `n > 1`|
/// | weekly    | `0 m h * * dow`     | `0 m h * * dow/7n` if `n ≥ 1` |
/// | monthly   | `0 m h dom * *`     | `0 m h dom */n *` if `n > 1` |
///
/// The day of the week is numbered from `1` for Monday. One-shot schedules have no
/// expression.
///
/// ## Errors
///
/// Fails with [`ScheduleError::OutOfBounds`] when the expression is not valid, e.g. for an
/// hourly interval above 23.
pub fn cron_expression_for(
    frequency: ScheduleFrequency,
    interval: Option<u32>,
    seed: Timestamp,
) -> Result<Option<String>, ScheduleError> {
    let seed = seed.to_zoned(TimeZone::UTC);
    let minute = seed.minute();
    let hour = seed.hour();
    let day = seed.day();
    let weekday = seed.weekday().to_monday_one_offset();

    let expression = match (frequency, interval) {
        (ScheduleFrequency::Hourly, Some(n)) => format!("0 {minute} */{n} * * *"),
        (ScheduleFrequency::Daily, Some(n)) if n > 1 => format!("0 {minute} {hour} * * */{n}"),
        (ScheduleFrequency::Weekly, Some(n)) if n >= 1 => {
            let days = u64::from(n) * 7;
            format!("0 {minute} {hour} * * {weekday}/{days}")
        }
        (ScheduleFrequency::Monthly, Some(n)) if n > 1 => {
            format!("0 {minute} {hour} {day} */{n} *")
        }
        (ScheduleFrequency::Hourly | ScheduleFrequency::Daily, _) => {
            format!("0 {minute} {hour} * * *")
        }
        (ScheduleFrequency::Weekly, _) => format!("0 {minute} {hour} * * {weekday}"),
        (ScheduleFrequency::Monthly, _) => format!("0 {minute} {hour} {day} * *"),
        (ScheduleFrequency::Oneshot, _) => return Ok(None),
    };

    if !cron::can_handle_expression(&expression) {
        tracing::debug!(%frequency, ?interval, %expression, "generated expression is out of bounds");
        return Err(ScheduleError::OutOfBounds { expression });
    }
    Ok(Some(expression))
}
