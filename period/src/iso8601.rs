// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! A constrained subset of ISO 8601 durations used as recurrence periods.

use chumsky::extra::ParserExtra;
use chumsky::input::Input;
use chumsky::prelude::*;
use chumsky::span::SimpleSpan;
use jiff::civil::DateTime;
use jiff::tz::TimeZone;
use jiff::{SignedDuration, Span, Timestamp};

use crate::describe::Locale;
use crate::frequency::{ScheduleError, ScheduleFrequency, cron_expression_for};
use crate::handler::{PeriodExpressionHandler, RecurrenceMagnitude, RecurrenceTime};

/// The unit of a recurrence period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display)]
#[strum(serialize_all = "lowercase")]
#[expect(missing_docs)]
pub enum PeriodUnit {
    Minutes,
    Hours,
    Days,
    Weeks,
    Months,
}

impl PeriodUnit {
    /// The granularity of a recurrence in this unit.
    #[must_use]
    pub const fn magnitude(self) -> RecurrenceMagnitude {
        match self {
            PeriodUnit::Minutes => RecurrenceMagnitude::Minutely,
            PeriodUnit::Hours => RecurrenceMagnitude::Hourly,
            PeriodUnit::Days => RecurrenceMagnitude::Daily,
            PeriodUnit::Weeks => RecurrenceMagnitude::Weekly,
            PeriodUnit::Months => RecurrenceMagnitude::Monthly,
        }
    }

    /// The schedule frequency with the same unit, minutes have none.
    #[must_use]
    pub const fn frequency(self) -> Option<ScheduleFrequency> {
        match self {
            PeriodUnit::Minutes => None,
            PeriodUnit::Hours => Some(ScheduleFrequency::Hourly),
            PeriodUnit::Days => Some(ScheduleFrequency::Daily),
            PeriodUnit::Weeks => Some(ScheduleFrequency::Weekly),
            PeriodUnit::Months => Some(ScheduleFrequency::Monthly),
        }
    }

    const fn gender(self) -> &'static str {
        match self {
            PeriodUnit::Minutes | PeriodUnit::Hours | PeriodUnit::Weeks => "fem",
            PeriodUnit::Days | PeriodUnit::Months => "masc",
        }
    }

    /// Length in seconds, for the units with a fixed length in UTC.
    const fn fixed_seconds(self) -> Option<i64> {
        match self {
            PeriodUnit::Minutes => Some(60),
            PeriodUnit::Hours => Some(3_600),
            PeriodUnit::Days => Some(86_400),
            PeriodUnit::Weeks => Some(604_800),
            PeriodUnit::Months => None,
        }
    }
}

/// Format Definition:
///
/// ```txt
/// period      = "P" (date-period / time-period)
/// date-period = 1*DIGIT ("D" / "W" / "M")
/// time-period = "T" 1*DIGIT ("H" / "M")
/// ```
///
/// `M` stands for months before the `T` designator and for minutes after it. The amount is
/// kept as written, whatever its length.
pub(crate) fn period<'src, I, E>() -> impl Parser<'src, I, (String, PeriodUnit), E>
where
    I: Input<'src, Token = char, Span = SimpleSpan>,
    E: ParserExtra<'src, I>,
{
    // case-sensitive
    let date_unit = select! {
        'D' => PeriodUnit::Days,
        'W' => PeriodUnit::Weeks,
        'M' => PeriodUnit::Months,
    };
    let time_unit = select! {
        'H' => PeriodUnit::Hours,
        'M' => PeriodUnit::Minutes,
    };

    let date = digits().then(date_unit);
    let time = just('T').ignore_then(digits().then(time_unit));
    just('P').ignore_then(choice((date, time)))
}

/// The lenient form accepted when converting a period to a cron expression:
///
/// ```txt
/// schedule-period = "P" ["T"] 1*DIGIT ("H" / "D" / "W" / "M")
/// ```
///
/// `M` stands for minutes after the `T` designator and for months otherwise.
pub(crate) fn schedule_period<'src, I, E>() -> impl Parser<'src, I, (String, PeriodUnit), E>
where
    I: Input<'src, Token = char, Span = SimpleSpan>,
    E: ParserExtra<'src, I>,
{
    let unit = select! {
        'H' => Some(PeriodUnit::Hours),
        'D' => Some(PeriodUnit::Days),
        'W' => Some(PeriodUnit::Weeks),
        'M' => None,
    };

    just('P')
        .ignore_then(just('T').or_not())
        .then(digits())
        .then(unit)
        .map(|((time, digits), unit)| {
            let unit = unit.unwrap_or(match time {
                Some(_) => PeriodUnit::Minutes,
                None => PeriodUnit::Months,
            });
            (digits, unit)
        })
}

fn digits<'src, I, E>() -> impl Parser<'src, I, String, E> + Clone
where
    I: Input<'src, Token = char, Span = SimpleSpan>,
    E: ParserExtra<'src, I>,
{
    select! { c @ '0'..='9' => c }
        .repeated()
        .at_least(1)
        .collect::<String>()
}

fn parse(expression: &str) -> Result<Period, Vec<Rich<'_, char>>> {
    period::<'_, _, extra::Err<_>>()
        .parse(expression)
        .into_result()
        .map(Period::from)
}

fn parse_schedule(expression: &str) -> Result<Period, Vec<Rich<'_, char>>> {
    schedule_period::<'_, _, extra::Err<_>>()
        .parse(expression)
        .into_result()
        .map(Period::from)
}

/// An amount of units, the amount kept as written.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Period {
    digits: String,
    unit: PeriodUnit,
}

impl From<(String, PeriodUnit)> for Period {
    fn from((digits, unit): (String, PeriodUnit)) -> Self {
        Self { digits, unit }
    }
}

impl Period {
    /// `None` when the amount overflows `u32`.
    fn amount(&self) -> Option<u32> {
        lexical::parse(&self.digits).ok()
    }

    /// The amount without leading zeros.
    fn amount_text(&self) -> &str {
        match self.digits.trim_start_matches('0') {
            "" => "0",
            amount => amount,
        }
    }
}

/// A recurrence period written as an ISO 8601 duration: `P{n}D`, `P{n}W`, `P{n}M`,
/// `PT{n}H` or `PT{n}M`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Iso8601Period {
    raw: String,
    parsed: Option<Period>,
}

impl Iso8601Period {
    /// Reads a period expression. Unrecognised expressions are kept and reported as invalid.
    #[must_use]
    pub fn new(expression: impl Into<String>) -> Self {
        let raw = expression.into();
        let parsed = parse(&raw)
            .inspect_err(|errs| {
                for err in errs {
                    tracing::debug!(expression = %raw, "not an ISO 8601 period: {err}");
                }
            })
            .ok();
        Self { raw, parsed }
    }

    /// Checks whether the expression is a recognised period.
    #[must_use]
    pub fn can_handle_expression(expression: &str) -> bool {
        parse(expression).is_ok()
    }

    /// The number of units in the period, `None` when it is not recognised or when the
    /// amount does not fit in a `u32`.
    #[must_use]
    pub fn recurrence_amount(&self) -> Option<u32> {
        self.parsed.as_ref().and_then(Period::amount)
    }

    /// The unit of the period.
    #[must_use]
    pub fn unit(&self) -> Option<PeriodUnit> {
        self.parsed.as_ref().map(|a| a.unit)
    }

    /// The first occurrence strictly after `now`, stepping by the period from `seed`.
    ///
    /// Steps are taken on the UTC calendar, so adding a month keeps the day of the month
    /// when it exists and clamps to the end of shorter months. Returns `None` for an
    /// invalid or empty period, or when a step leaves the supported range of instants.
    #[must_use]
    pub fn next_occurrence(&self, seed: Timestamp, now: Timestamp) -> Option<Timestamp> {
        let period = self.parsed.as_ref()?;
        let unit = period.unit;
        let amount = period.amount()?;
        if amount == 0 {
            tracing::debug!(expression = %self.raw, "empty period has no next occurrence");
            return None;
        }
        if seed > now {
            return Some(seed);
        }

        match unit.fixed_seconds() {
            Some(length) => {
                let step = length.checked_mul(i64::from(amount))?;
                let behind = now.duration_since(seed).as_secs();
                let count = behind / step + 1;
                seed.checked_add(SignedDuration::from_secs(count.checked_mul(step)?))
                    .ok()
            }
            None => {
                let step = Span::new().try_months(i64::from(amount)).ok()?;
                let now = utc(now);
                let mut occurrence = utc(seed);
                while occurrence <= now {
                    occurrence = occurrence.checked_add(step).ok()?;
                }
                occurrence.to_zoned(TimeZone::UTC).ok().map(|a| a.timestamp())
            }
        }
    }

    /// A Quartz cron expression repeating this period from `seed`, read in UTC.
    ///
    /// The conversion is lenient: the `T` designator is optional and hours, days and weeks
    /// are accepted on either side of it, so `P10H` reads as ten hours. `M` stays minutes
    /// after `T` and months otherwise.
    ///
    /// ## Errors
    ///
    /// - [`ScheduleError::Invalid`] when the period is not recognised;
    /// - [`ScheduleError::Unsupported`] for minute periods;
    /// - [`ScheduleError::OutOfBounds`] when the amount does not fit the target field.
    pub fn to_cron_expression(&self, seed: Timestamp) -> Result<String, ScheduleError> {
        let period = parse_schedule(&self.raw).map_err(|_| ScheduleError::Invalid {
            expression: self.raw.clone(),
        })?;
        let unsupported = || ScheduleError::Unsupported {
            expression: self.raw.clone(),
        };
        let frequency = period.unit.frequency().ok_or_else(unsupported)?;
        let amount = period.amount().ok_or_else(|| ScheduleError::OutOfBounds {
            expression: self.raw.clone(),
        })?;
        cron_expression_for(frequency, Some(amount), seed)?.ok_or_else(unsupported)
    }
}

fn utc(timestamp: Timestamp) -> DateTime {
    timestamp.to_zoned(TimeZone::UTC).datetime()
}

impl PeriodExpressionHandler for Iso8601Period {
    fn raw_expression(&self) -> String {
        self.raw.clone()
    }

    fn is_valid(&self) -> bool {
        self.parsed.is_some()
    }

    fn is_ui_supported(&self) -> bool {
        false
    }

    fn to_human_readable_string_in(&self, _locale: Locale, _tz: &TimeZone) -> String {
        self.raw.clone()
    }

    /// Tokens for an external translation catalogue: a gendered `every` prefix, the amount
    /// when plural, then the unit, e.g. `["every_fem_plural", "2", "weeks_plural"]`.
    fn to_translatable_string_array_in(&self, _locale: Locale, _tz: &TimeZone) -> Vec<String> {
        let (amount, unit) = self
            .parsed
            .as_ref()
            .map_or(("1", PeriodUnit::Days), |a| (a.amount_text(), a.unit));
        let number = if amount == "1" { "singular" } else { "plural" };
        let prefix = format!("every_{}_{number}", unit.gender());
        let suffix = format!("{unit}_{number}");
        if amount == "1" {
            vec![prefix, suffix]
        } else {
            vec![prefix, amount.to_string(), suffix]
        }
    }

    fn recurrence_magnitude(&self) -> RecurrenceMagnitude {
        self.unit()
            .map_or(RecurrenceMagnitude::Daily, PeriodUnit::magnitude)
    }

    fn recurrence_time_in(&self, _tz: &TimeZone) -> RecurrenceTime {
        RecurrenceTime::new(0, 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_period() {
        use PeriodUnit::{Days, Hours, Minutes, Months, Weeks};

        #[rustfmt::skip]
        let success_cases = [
            ("P1D",           ("1", Days)),
            ("P10W",          ("10", Weeks)),
            ("P10M",          ("10", Months)),
            ("PT10H",         ("10", Hours)),
            ("PT1000H",       ("1000", Hours)),
            ("PT30M",         ("30", Minutes)),
            ("P0D",           ("0", Days)),
            ("P007D",         ("7", Days)),
            ("PT4294967296M", ("4294967296", Minutes)),
            ("P99999999999D", ("99999999999", Days)),
        ];
        for (src, expected) in success_cases {
            let period = parse(src).unwrap();
            assert_eq!((period.amount_text(), period.unit), expected, "Failed to parse: {src}");
        }

        let fail_cases = [
            "",
            "P",
            "PT",
            "P1",
            "P30U",
            "P1Y",
            "P10H",
            "PT1D",
            "PT1W",
            "P1DT1H",
            "p1d",
            "P-1D",
            " P1D",
            "P1D ",
            "non expression",
        ];
        for src in fail_cases {
            assert!(parse(src).is_err(), "Parse {src} should fail");
        }
    }

    #[test]
    fn parses_schedule_period() {
        use PeriodUnit::{Days, Hours, Minutes, Months, Weeks};

        #[rustfmt::skip]
        let success_cases = [
            ("P10H",  ("10", Hours)),
            ("PT10H", ("10", Hours)),
            ("P3D",   ("3", Days)),
            ("PT3D",  ("3", Days)),
            ("P1W",   ("1", Weeks)),
            ("P6M",   ("6", Months)),
            ("PT6M",  ("6", Minutes)),
        ];
        for (src, expected) in success_cases {
            let period = parse_schedule(src).unwrap();
            assert_eq!((period.amount_text(), period.unit), expected, "Failed to parse: {src}");
        }

        for src in ["", "P", "P1Y", "10H", "PTT1H", "P1H ", "p1h"] {
            assert!(parse_schedule(src).is_err(), "Parse {src} should fail");
        }
    }

    #[test]
    fn reads_amount_and_magnitude() {
        let cases = [
            ("PT30M", Some(30), RecurrenceMagnitude::Minutely),
            ("PT4H", Some(4), RecurrenceMagnitude::Hourly),
            ("P1D", Some(1), RecurrenceMagnitude::Daily),
            ("P2W", Some(2), RecurrenceMagnitude::Weekly),
            ("P3M", Some(3), RecurrenceMagnitude::Monthly),
            ("P1Y", None, RecurrenceMagnitude::Daily),
            ("P99999999999D", None, RecurrenceMagnitude::Daily),
        ];
        for (src, amount, magnitude) in cases {
            let period = Iso8601Period::new(src);
            assert_eq!(period.recurrence_amount(), amount, "amount of {src}");
            assert_eq!(period.recurrence_magnitude(), magnitude, "magnitude of {src}");
        }
    }

    #[test]
    fn is_never_ui_supported() {
        let period = Iso8601Period::new("P1D");
        assert!(period.is_valid());
        assert!(!period.is_ui_supported());
        assert_eq!(period.recurrence_time_in(&TimeZone::UTC), RecurrenceTime::new(0, 0));
        assert_eq!(period.to_human_readable_string_in(Locale::Fr, &TimeZone::UTC), "P1D");

        let period = Iso8601Period::new("P30U");
        assert!(!period.is_valid());
        assert!(!Iso8601Period::can_handle_expression("P30U"));
    }

    #[test]
    fn builds_translatable_tokens() {
        let cases: [(&str, &[&str]); 12] = [
            ("PT1M", &["every_fem_singular", "minutes_singular"]),
            ("PT30M", &["every_fem_plural", "30", "minutes_plural"]),
            ("PT1H", &["every_fem_singular", "hours_singular"]),
            ("PT4H", &["every_fem_plural", "4", "hours_plural"]),
            ("P1D", &["every_masc_singular", "days_singular"]),
            ("P3D", &["every_masc_plural", "3", "days_plural"]),
            ("P2W", &["every_fem_plural", "2", "weeks_plural"]),
            ("P1M", &["every_masc_singular", "months_singular"]),
            ("P0M", &["every_masc_plural", "0", "months_plural"]),
            ("P001D", &["every_masc_singular", "days_singular"]),
            ("P99999999999D", &["every_masc_plural", "99999999999", "days_plural"]),
            ("P1Y", &["every_masc_singular", "days_singular"]),
        ];
        for (src, expected) in cases {
            let tokens = Iso8601Period::new(src)
                .to_translatable_string_array_in(Locale::En, &TimeZone::UTC);
            assert_eq!(tokens, expected, "tokens of {src}");
        }
    }

    fn ts(s: &str) -> Timestamp {
        s.parse().unwrap()
    }

    #[test]
    fn finds_next_occurrence() {
        #[rustfmt::skip]
        let cases = [
            // (period, seed, now, expected)
            ("P1D", "2022-04-24T10:43:56Z", "2022-04-24T16:43:56Z", "2022-04-25T10:43:56Z"),
            ("P1D", "2022-04-24T10:43:56Z", "2022-04-24T04:34:01Z", "2022-04-24T10:43:56Z"),
            ("P1D", "2022-04-24T12:43:56+02:00", "2022-04-24T16:34:01+02:00", "2022-04-25T10:43:56Z"),
            ("PT1H", "2022-04-24T10:43:56Z", "2022-04-24T10:53:56Z", "2022-04-24T11:43:56Z"),
            ("PT1H", "2022-04-24T10:43:56Z", "2022-04-24T10:43:56Z", "2022-04-24T11:43:56Z"),
            ("PT1H", "2022-04-24T10:43:56Z", "2022-04-24T10:33:56Z", "2022-04-24T10:43:56Z"),
            ("PT15M", "2022-04-24T10:00:00Z", "2022-04-24T12:07:30Z", "2022-04-24T12:15:00Z"),
            ("P1W", "2022-04-24T10:43:56Z", "2022-04-30T10:53:56Z", "2022-05-01T10:43:56Z"),
            ("P1M", "2022-04-24T10:43:56Z", "2022-04-30T10:53:56Z", "2022-05-24T10:43:56Z"),
            ("P1M", "2022-01-30T10:43:56Z", "2022-01-31T10:53:56Z", "2022-02-28T10:43:56Z"),
            ("P1M", "2022-04-24T10:43:56Z", "2022-04-23T10:43:56Z", "2022-04-24T10:43:56Z"),
            ("P3M", "2022-01-15T00:00:00Z", "2022-12-01T00:00:00Z", "2023-01-15T00:00:00Z"),
        ];
        for (src, seed, now, expected) in cases {
            let period = Iso8601Period::new(src);
            assert_eq!(
                period.next_occurrence(ts(seed), ts(now)),
                Some(ts(expected)),
                "next occurrence of {src} from {seed} after {now}"
            );
        }
    }

    #[test]
    fn has_no_next_occurrence_when_empty_or_invalid() {
        let seed = ts("2022-04-24T10:43:56Z");
        let now = ts("2022-04-25T10:43:56Z");
        assert_eq!(Iso8601Period::new("P0D").next_occurrence(seed, now), None);
        assert_eq!(Iso8601Period::new("P1Y").next_occurrence(seed, now), None);
        assert_eq!(Iso8601Period::new("P99999999999D").next_occurrence(seed, now), None);
    }

    #[test]
    fn converts_to_cron_expression() {
        let seed = ts("2002-04-03T10:43:40Z");
        let cases = [
            ("P10H", "0 43 */10 * * *"),
            ("PT10H", "0 43 */10 * * *"),
            ("P3D", "0 43 10 * * */3"),
            ("PT3D", "0 43 10 * * */3"),
            ("P1W", "0 43 10 * * 3/7"),
            ("P6M", "0 43 10 3 */6 *"),
        ];
        for (src, expected) in cases {
            let period = Iso8601Period::new(src);
            assert_eq!(period.to_cron_expression(seed).unwrap(), expected, "{src}");
        }
    }

    #[test]
    fn rejects_cron_conversion() {
        let seed = ts("2002-04-03T10:43:40Z");
        for src in ["P1000H", "P1000D", "P1000W", "P1000M", "P99999999999D"] {
            let err = Iso8601Period::new(src).to_cron_expression(seed).unwrap_err();
            assert!(matches!(err, ScheduleError::OutOfBounds { .. }), "{src}: {err}");
        }

        let err = Iso8601Period::new("PT30M").to_cron_expression(seed).unwrap_err();
        assert!(matches!(err, ScheduleError::Unsupported { .. }));

        let err = Iso8601Period::new("P1Y").to_cron_expression(seed).unwrap_err();
        assert!(matches!(err, ScheduleError::Invalid { .. }));
    }
}
