// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Integration tests for the expression dispatcher and the shared query surface.

use jiff::tz::{TimeZone, offset};
use tempora_period::{
    Locale, PeriodExpression, PeriodExpressionHandler, RecurrenceMagnitude, RecurrenceTime,
    generate_monthly_cron_expression, handle,
};

#[test]
fn test_handle_iso8601_period() {
    let expr = handle(Some("PT30M")).unwrap();
    assert!(matches!(expr, PeriodExpression::Iso8601(_)));
    assert_eq!(expr.recurrence_magnitude(), RecurrenceMagnitude::Minutely);
    assert_eq!(
        expr.to_translatable_string_array(Locale::En),
        ["every_fem_plural", "30", "minutes_plural"]
    );
    assert_eq!(expr.to_human_readable_string(Locale::Fr), "PT30M");
    assert_eq!(expr.recurrence_time(), RecurrenceTime::new(0, 0));
}

#[test]
fn test_handle_iso8601_period_with_long_amount() {
    let expr = handle(Some("P99999999999D")).unwrap();
    let PeriodExpression::Iso8601(period) = &expr else {
        panic!("expected an ISO 8601 period, got {expr:?}");
    };
    assert!(expr.is_valid());
    assert_eq!(period.recurrence_amount(), None);
    assert_eq!(expr.recurrence_magnitude(), RecurrenceMagnitude::Daily);
    assert_eq!(
        expr.to_translatable_string_array(Locale::En),
        ["every_masc_plural", "99999999999", "days_plural"]
    );
}

#[test]
fn test_handle_cron_expression() {
    let expr = handle(Some("0 30 16 * * *")).unwrap();
    let PeriodExpression::Cron(cron) = &expr else {
        panic!("expected a cron expression, got {expr:?}");
    };
    assert_eq!(cron.to_cron_expression(), "0 30 16 * * *");
    assert!(expr.is_valid());
    assert!(expr.is_ui_supported());
    assert_eq!(expr.recurrence_magnitude(), RecurrenceMagnitude::Daily);

    let tz = TimeZone::fixed(offset(-4));
    assert_eq!(expr.recurrence_time_in(&tz), RecurrenceTime::new(12, 30));
    assert_eq!(expr.to_human_readable_string_in(Locale::En, &tz), "At 12:30");
}

#[test]
fn test_handle_rejects_unknown_input() {
    for input in [
        None,
        Some(""),
        Some("not a valid expr"),
        Some("P30U"),
        Some("* * 24 * *"),
    ] {
        assert!(handle(input).is_none(), "{input:?}");
    }
}

#[test]
fn test_generated_monthly_last_occurrence() {
    let expr = generate_monthly_cron_expression("5", "1", "16", "30");
    assert_eq!(expr, "0 30 16 * * 1L");

    let handled = handle(Some(&expr)).unwrap();
    assert!(handled.is_ui_supported());
    assert_eq!(
        handled.recurrence_magnitude(),
        RecurrenceMagnitude::Monthly
    );
    assert_eq!(
        handled.to_human_readable_string_in(Locale::En, &TimeZone::UTC),
        "At 16:30, on the last Monday of the month"
    );
}
