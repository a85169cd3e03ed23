// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Occurrences of cron expressions.
//!
//! Matching is delegated to [`croner`], configured so that seconds are optional and
//! restrictions on the day of the month and on the day of the week must both hold. Days of
//! the week are numbered from `1` for Monday to `7` for Sunday. The year field, which
//! `croner` does not know about, is applied on top of its results.

use std::fmt;

use chrono::{DateTime, FixedOffset, Utc};
use jiff::civil::Date;
use jiff::tz::TimeZone;
use jiff::{SignedDuration, Timestamp, Zoned};

use crate::cron::Cron;
use crate::handler::PeriodExpressionHandler;

/// How far ahead occurrences are searched before giving up.
const HORIZON: SignedDuration = SignedDuration::from_hours(8 * 366 * 24);

impl Cron {
    /// The first instant strictly after `after` matched by the expression, evaluated in the
    /// given time zone.
    ///
    /// Returns `None` for an invalid expression, or when nothing matches within eight years.
    ///
    /// ```
    /// # use jiff::{Timestamp, tz::TimeZone};
    /// # use tempora_period::CronParser;
    /// let cron = CronParser::parse("0 30 16 * * 1#3").unwrap();
    /// let after: Timestamp = "2026-01-01T00:00:00Z".parse().unwrap();
    /// let next = cron.next_occurrence(after, &TimeZone::UTC).unwrap();
    /// assert_eq!(next.to_string(), "2026-01-19T16:30:00+00:00[UTC]");
    /// ```
    #[must_use]
    pub fn next_occurrence(&self, after: Timestamp, tz: &TimeZone) -> Option<Zoned> {
        Schedule::new(self)?.next_after(after, tz)
    }

    /// Iterates over the occurrences strictly after `after`, in the given time zone.
    #[must_use]
    pub fn occurrences(&self, after: Timestamp, tz: &TimeZone) -> Occurrences {
        Occurrences {
            schedule: Schedule::new(self),
            tz: tz.clone(),
            after,
        }
    }
}

/// Iterator over the occurrences of a cron expression, see [`Cron::occurrences`].
#[derive(Debug)]
pub struct Occurrences {
    schedule: Option<Schedule>,
    tz: TimeZone,
    after: Timestamp,
}

impl Iterator for Occurrences {
    type Item = Zoned;

    fn next(&mut self) -> Option<Self::Item> {
        let next = self.schedule.as_ref()?.next_after(self.after, &self.tz)?;
        self.after = next.timestamp();
        Some(next)
    }
}

/// A valid expression compiled for `croner`.
struct Schedule {
    expression: String,
    pattern: croner::Cron,
    years: Option<String>,
}

impl fmt::Debug for Schedule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Schedule")
            .field("expression", &self.expression)
            .field("years", &self.years)
            .finish_non_exhaustive()
    }
}

impl Schedule {
    fn new(cron: &Cron) -> Option<Self> {
        if !cron.is_valid() {
            tracing::debug!(expression = %cron.to_cron_expression(), "no occurrence for invalid expression");
            return None;
        }

        let mut parts: Vec<&str> = cron.seconds().map(|a| a.expression()).into_iter().collect();
        parts.extend(
            [cron.minutes(), cron.hours(), cron.month_days(), cron.months()].map(|a| a.expression()),
        );
        // a bare `L` is the last day of the week
        parts.push(match cron.weekdays().expression() {
            "L" => "7",
            weekdays => weekdays,
        });
        let expression = parts.join(" ");

        let pattern = croner::Cron::new(&expression)
            .with_seconds_optional()
            .with_dom_and_dow()
            .parse()
            .inspect_err(|e| tracing::debug!(%expression, "expression rejected by the scheduler: {e}"))
            .ok()?;

        let years = cron
            .years()
            .map(|a| a.expression())
            .filter(|a| !matches!(*a, "*" | "?"))
            .map(str::to_owned);

        Some(Self {
            expression,
            pattern,
            years,
        })
    }

    fn next_after(&self, after: Timestamp, tz: &TimeZone) -> Option<Zoned> {
        let limit = after.checked_add(HORIZON).ok()?;
        let mut cursor = after;
        loop {
            let next = self.find_after(cursor, tz)?;
            if next > limit {
                tracing::debug!(%after, "no occurrence within the search horizon");
                return None;
            }

            let zoned = next.to_zoned(tz.clone());
            match &self.years {
                Some(years) if !admits_year(years, zoned.year()) => {
                    // resume from the last second of the year
                    let next_year = Date::new(zoned.year().checked_add(1)?, 1, 1).ok()?;
                    cursor = next_year
                        .to_zoned(tz.clone())
                        .ok()?
                        .timestamp()
                        .checked_sub(SignedDuration::from_secs(1))
                        .ok()?;
                }
                _ => return Some(zoned),
            }
        }
    }

    fn find_after(&self, after: Timestamp, tz: &TimeZone) -> Option<Timestamp> {
        let start = DateTime::<Utc>::from_timestamp(after.as_second(), 0)?;
        let next = match Zone::new(tz, after)? {
            Zone::Named(zone) => self.find(&start.with_timezone(&zone)),
            Zone::Fixed(zone) => self.find(&start.with_timezone(&zone)),
        }?;
        Timestamp::from_second(next).ok()
    }

    fn find<Z: chrono::TimeZone>(&self, start: &DateTime<Z>) -> Option<i64> {
        self.pattern
            .find_next_occurrence(start, false)
            .inspect_err(|e| tracing::debug!(expression = %self.expression, "no next occurrence: {e}"))
            .ok()
            .map(|a| a.timestamp())
    }
}

/// The `chrono` counterpart of a time zone.
enum Zone {
    Named(chrono_tz::Tz),
    Fixed(FixedOffset),
}

impl Zone {
    /// Zones without a known name fall back to their offset at `at`.
    fn new(tz: &TimeZone, at: Timestamp) -> Option<Self> {
        if let Some(zone) = tz.iana_name().and_then(|a| a.parse().ok()) {
            return Some(Self::Named(zone));
        }
        let offset = tz.to_fixed_offset().unwrap_or_else(|_| tz.to_offset(at));
        FixedOffset::east_opt(offset.seconds()).map(Self::Fixed)
    }
}

/// Whether a year field (`*`, `a`, `a-b`, each with an optional `/step`, in a list) admits
/// the year.
fn admits_year(expression: &str, year: i16) -> bool {
    let Ok(year) = u32::try_from(year) else {
        return false;
    };
    expression.split(',').any(|item| {
        let (range, step) = item.split_once('/').map_or((item, None), |(a, b)| (a, Some(b)));
        let step = match step.map(|a| lexical::parse::<u32, _>(a)) {
            None => 1,
            Some(Ok(step)) if step > 0 => step,
            Some(_) => return false,
        };
        let bounds = match (range, range.split_once('-')) {
            ("*", _) => Some((0, u32::MAX)),
            (_, Some((a, b))) => lexical::parse(a).ok().zip(lexical::parse(b).ok()),
            (a, None) => lexical::parse(a)
                .ok()
                .map(|a| (a, if step > 1 { u32::MAX } else { a })),
        };
        bounds.is_some_and(|(start, end)| {
            (start..=end).contains(&year) && (year - start) % step == 0
        })
    })
}
