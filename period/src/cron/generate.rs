// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Quartz expressions for the recurrences offered by a schedule form.

use crate::cron::mask::WellKnownRanges;

/// Every `hour_interval` hours, at the given minute, optionally on weekdays only.
///
/// ```
/// # use tempora_period::generate_hourly_cron_expression;
/// assert_eq!(generate_hourly_cron_expression("4", "15", false), "0 15 */4 * * *");
/// assert_eq!(generate_hourly_cron_expression("4", "15", true), "0 15 */4 * * 1-5");
/// ```
#[must_use]
pub fn generate_hourly_cron_expression(
    hour_interval: &str,
    minute: &str,
    only_weekdays: bool,
) -> String {
    format!(
        "0 {minute} */{hour_interval} * * {}",
        weekdays_or_any(only_weekdays)
    )
}

/// Every day at the given time, optionally on weekdays only.
#[must_use]
pub fn generate_daily_cron_expression(hour: &str, minute: &str, only_weekdays: bool) -> String {
    format!("0 {minute} {hour} * * {}", weekdays_or_any(only_weekdays))
}

/// Every week on the given day (`1` for Monday to `7` for Sunday), at the given time.
#[must_use]
pub fn generate_weekly_cron_expression(day_of_week: &str, hour: &str, minute: &str) -> String {
    format!("0 {minute} {hour} * * {day_of_week}")
}

/// Every month on the given occurrence of a day of the week, at the given time.
///
/// Week `5` stands for the last occurrence in the month.
///
/// ```
/// # use tempora_period::generate_monthly_cron_expression;
/// assert_eq!(generate_monthly_cron_expression("3", "2", "16", "30"), "0 30 16 * * 2#3");
/// assert_eq!(generate_monthly_cron_expression("5", "2", "16", "30"), "0 30 16 * * 2L");
/// ```
#[must_use]
pub fn generate_monthly_cron_expression(
    week_of_month: &str,
    day_of_week: &str,
    hour: &str,
    minute: &str,
) -> String {
    match week_of_month {
        "5" => format!("0 {minute} {hour} * * {day_of_week}L"),
        _ => format!("0 {minute} {hour} * * {day_of_week}#{week_of_month}"),
    }
}

fn weekdays_or_any(only_weekdays: bool) -> &'static str {
    match only_weekdays {
        true => WellKnownRanges::WEEKDAYS,
        false => "*",
    }
}
