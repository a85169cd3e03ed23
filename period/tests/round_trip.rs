// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Integration tests for parsing and serializing cron expressions.

use tempora_period::{CronParser, FieldPosition, PeriodExpressionHandler};

#[test]
fn test_round_trip_well_formed_expressions() {
    let expressions = [
        "30 16 * * *",
        "*/5 0-12 1,15 1-6/2 1-5",
        "0 30 16 * * 1#3",
        "0 30 16 ? * 1L",
        "0 0 12 L * ? 2026",
        "1-4 25,35,45 */4 * * *",
        // well-formed but invalid fields survive the round trip
        "99 99 99 99 99",
        "a b c d e f g",
        "0 30 16 * * 1#6L",
    ];
    for expr in expressions {
        let cron = CronParser::parse(expr).unwrap();
        assert_eq!(cron.to_cron_expression(), expr);
        let fields: Vec<_> = cron.fields().map(|a| a.expression()).collect();
        assert_eq!(fields, expr.split(' ').collect::<Vec<_>>());
    }
}

#[test]
fn test_validity_is_deterministic() {
    for expr in ["0 30 16 * * *", "0 30 16 * * 1#6L", "* * 24 * *"] {
        let cron = CronParser::parse(expr).unwrap();
        let first = cron.is_valid();
        for _ in 0..3 {
            assert_eq!(CronParser::parse(expr).unwrap().is_valid(), first);
        }
    }
}

#[test]
fn test_ui_support_implies_validity() {
    let expressions = [
        "0 30 16 * * *",
        "* 30 16 * * *",
        "0 30 16 * * 1#6L",
        "2 */4 * * 1#3",
        "2 */24 * * *",
        "0 30 16 1 * *",
        "30 16 * * 1-5",
    ];
    for expr in expressions {
        let cron = CronParser::parse(expr).unwrap();
        assert!(!cron.is_ui_supported() || cron.is_valid(), "{expr}");
    }
}

#[test]
fn test_mask_boundaries() {
    let cases = [
        (FieldPosition::Hours, "0", true),
        (FieldPosition::Hours, "23", true),
        (FieldPosition::Hours, "24", false),
        (FieldPosition::MonthDays, "0", false),
        (FieldPosition::MonthDays, "1", true),
        (FieldPosition::MonthDays, "31", true),
        (FieldPosition::MonthDays, "32", false),
        (FieldPosition::Weekdays, "0", false),
        (FieldPosition::Weekdays, "1", true),
        (FieldPosition::Weekdays, "7", true),
        (FieldPosition::Weekdays, "8", false),
        (FieldPosition::Months, "0", false),
        (FieldPosition::Months, "1", true),
        (FieldPosition::Months, "12", true),
        (FieldPosition::Months, "13", false),
        (FieldPosition::Hours, "2/24", false),
    ];
    for (position, expr, expected) in cases {
        assert_eq!(
            position.parser().validate(expr),
            expected,
            "{position} {expr:?}"
        );
    }
}

#[test]
fn test_exclusive_tokens_stand_alone() {
    for position in [FieldPosition::Weekdays, FieldPosition::MonthDays] {
        let parser = position.parser();
        assert!(parser.validate("L"), "{position}");
        assert!(parser.validate("?"), "{position}");
        for expr in ["*/L", "*,L", "1?", "L,1", "?-1"] {
            assert!(!parser.validate(expr), "{position} {expr:?}");
        }
    }
}
