// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Human-readable descriptions of cron expressions.

use crate::cron::{Cron, Field};

/// A language in which expressions can be described.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, strum::Display, strum::VariantNames,
)]
#[strum(serialize_all = "lowercase")]
pub enum Locale {
    /// English
    #[default]
    En,
    /// French
    Fr,
}

impl Locale {
    /// Resolves a locale tag such as `fr`, `fr-FR` or `en_US`. Unknown languages fall back
    /// to English.
    ///
    /// ```
    /// # use tempora_period::Locale;
    /// assert_eq!(Locale::from_tag("fr_FR"), Locale::Fr);
    /// assert_eq!(Locale::from_tag("de"), Locale::En);
    /// ```
    #[must_use]
    pub fn from_tag(tag: &str) -> Self {
        let language = tag.split(['-', '_']).next().unwrap_or_default();
        if language.eq_ignore_ascii_case("fr") {
            Locale::Fr
        } else {
            Locale::En
        }
    }

    const fn vocabulary(self) -> &'static Vocabulary {
        match self {
            Locale::En => &ENGLISH,
            Locale::Fr => &FRENCH,
        }
    }
}

/// Phrases of one language. Placeholders in braces are filled by [`fill`].
struct Vocabulary {
    weekdays: [&'static str; 7],
    months: [&'static str; 12],
    ordinals: [&'static str; 5],
    and: &'static str,
    /// Singular and plural names of seconds, minutes and hours
    units: [(&'static str, &'static str); 3],
    /// Names of the fields, by position
    fields: [&'static str; 7],

    at_time: &'static str,
    every_minute: &'static str,
    every_n_minutes: &'static str,
    every_hour: &'static str,
    minute_past_every_hour: &'static str,
    minute_past_every_n_hours: &'static str,

    every_unit: &'static str,
    every_n_units: &'static str,
    every_n_units_from: &'static str,
    units_range: &'static str,
    at_unit: &'static str,
    at_units: &'static str,

    last_day_of_month: &'static str,
    on_day_of_month: &'static str,
    on_days_of_month: &'static str,
    days_range: &'static str,
    every_n_days: &'static str,
    every_n_days_from: &'static str,

    only_on: &'static str,
    weekday_range: &'static str,
    nth_weekday: &'static str,
    last_weekday: &'static str,
    every_n_weekdays: &'static str,

    only_in: &'static str,
    value_range: &'static str,
    every_n_months: &'static str,
    every_n_years: &'static str,
}

static ENGLISH: Vocabulary = Vocabulary {
    weekdays: [
        "Monday",
        "Tuesday",
        "Wednesday",
        "Thursday",
        "Friday",
        "Saturday",
        "Sunday",
    ],
    months: [
        "January",
        "February",
        "March",
        "April",
        "May",
        "June",
        "July",
        "August",
        "September",
        "October",
        "November",
        "December",
    ],
    ordinals: ["first", "second", "third", "fourth", "fifth"],
    and: "and",
    units: [
        ("second", "seconds"),
        ("minute", "minutes"),
        ("hour", "hours"),
    ],
    fields: [
        "second",
        "minute",
        "hour",
        "day of the month",
        "month",
        "day of the week",
        "year",
    ],

    at_time: "At {time}",
    every_minute: "Every minute",
    every_n_minutes: "Every {n} minutes",
    every_hour: "Every hour",
    minute_past_every_hour: "At minute {a} past every hour",
    minute_past_every_n_hours: "At minute {a} past every {n} hours",

    every_unit: "every {unit}",
    every_n_units: "every {n} {units}",
    every_n_units_from: "every {n} {units} starting at {unit} {a}",
    units_range: "{units} {a} through {b}",
    at_unit: "at {unit} {a}",
    at_units: "at {units} {list}",

    last_day_of_month: "on the last day of the month",
    on_day_of_month: "on day {a} of the month",
    on_days_of_month: "on days {list} of the month",
    days_range: "between day {a} and {b} of the month",
    every_n_days: "every {n} days",
    every_n_days_from: "every {n} days starting on day {a} of the month",

    only_on: "only on {list}",
    weekday_range: "{a} through {b}",
    nth_weekday: "on the {nth} {day} of the month",
    last_weekday: "on the last {day} of the month",
    every_n_weekdays: "every {n} days of the week",

    only_in: "only in {list}",
    value_range: "{a} through {b}",
    every_n_months: "every {n} months",
    every_n_years: "every {n} years",
};

static FRENCH: Vocabulary = Vocabulary {
    weekdays: [
        "lundi", "mardi", "mercredi", "jeudi", "vendredi", "samedi", "dimanche",
    ],
    months: [
        "janvier",
        "février",
        "mars",
        "avril",
        "mai",
        "juin",
        "juillet",
        "août",
        "septembre",
        "octobre",
        "novembre",
        "décembre",
    ],
    ordinals: ["premier", "deuxième", "troisième", "quatrième", "cinquième"],
    and: "et",
    units: [
        ("seconde", "secondes"),
        ("minute", "minutes"),
        ("heure", "heures"),
    ],
    fields: [
        "seconde",
        "minute",
        "heure",
        "jour du mois",
        "mois",
        "jour de la semaine",
        "année",
    ],

    at_time: "À {time}",
    every_minute: "Toutes les minutes",
    every_n_minutes: "Toutes les {n} minutes",
    every_hour: "Toutes les heures",
    minute_past_every_hour: "À la minute {a} de chaque heure",
    minute_past_every_n_hours: "À la minute {a}, toutes les {n} heures",

    every_unit: "chaque {unit}",
    every_n_units: "toutes les {n} {units}",
    every_n_units_from: "toutes les {n} {units} à partir de la {unit} {a}",
    units_range: "de la {unit} {a} à la {unit} {b}",
    at_unit: "à la {unit} {a}",
    at_units: "aux {units} {list}",

    last_day_of_month: "le dernier jour du mois",
    on_day_of_month: "le {a} du mois",
    on_days_of_month: "les {list} du mois",
    days_range: "du {a} au {b} du mois",
    every_n_days: "tous les {n} jours",
    every_n_days_from: "tous les {n} jours à partir du {a} du mois",

    only_on: "uniquement le {list}",
    weekday_range: "du {a} au {b}",
    nth_weekday: "le {nth} {day} du mois",
    last_weekday: "le dernier {day} du mois",
    every_n_weekdays: "tous les {n} jours de la semaine",

    only_in: "uniquement en {list}",
    value_range: "de {a} à {b}",
    every_n_months: "tous les {n} mois",
    every_n_years: "tous les {n} ans",
};

#[derive(Debug, Clone, Copy)]
enum Unit {
    Second,
    Minute,
    Hour,
}

impl Vocabulary {
    const fn unit(&self, unit: Unit) -> (&'static str, &'static str) {
        let [second, minute, hour] = self.units;
        match unit {
            Unit::Second => second,
            Unit::Minute => minute,
            Unit::Hour => hour,
        }
    }
}

/// Describes the fields of an expression as written, in the given language.
///
/// Time fields are read as they are; use
/// [`PeriodExpressionHandler::to_human_readable_string_in`](crate::PeriodExpressionHandler::to_human_readable_string_in)
/// to describe an expression in a time zone.
///
/// ```
/// # use tempora_period::{CronParser, Locale, describe::describe};
/// let cron = CronParser::parse("0 30 16 * * 1#3").unwrap();
/// assert_eq!(describe(&cron, Locale::En), "At 16:30, on the third Monday of the month");
/// ```
#[must_use]
pub fn describe(cron: &Cron, locale: Locale) -> String {
    let v = locale.vocabulary();
    let segments = [
        Some(time_of_day(v, cron)),
        month_days(v, cron.month_days()),
        weekdays(v, cron.weekdays()),
        months(v, cron.months()),
        cron.years().and_then(|a| years(v, a)),
    ];
    let sentence = segments.into_iter().flatten().collect::<Vec<_>>().join(", ");
    capitalize(&sentence)
}

fn time_of_day(v: &Vocabulary, cron: &Cron) -> String {
    let seconds = cron.seconds().map(Field::expression);
    let minutes = cron.minutes().expression();
    let hours = cron.hours().expression();
    let zero_seconds = seconds.is_none_or(|a| a == "0");

    match (number(minutes), number(hours), seconds.and_then(number)) {
        (Some(m), Some(h), _) if zero_seconds => {
            return fill(v.at_time, &[("time", &format!("{h:02}:{m:02}"))]);
        }
        (Some(m), Some(h), Some(s)) => {
            return fill(v.at_time, &[("time", &format!("{h:02}:{m:02}:{s:02}"))]);
        }
        _ => {}
    }

    if zero_seconds {
        match (minutes, hours) {
            ("*", "*") => return v.every_minute.to_owned(),
            ("0", "*") => return v.every_hour.to_owned(),
            (m, "*") => {
                if let Some(n) = m.strip_prefix("*/").and_then(number) {
                    return fill(v.every_n_minutes, &[("n", &n.to_string())]);
                }
                if let Some(m) = number(m) {
                    return fill(v.minute_past_every_hour, &[("a", &m.to_string())]);
                }
            }
            (m, h) => {
                if let (Some(m), Some(n)) = (number(m), h.strip_prefix("*/").and_then(number)) {
                    return fill(
                        v.minute_past_every_n_hours,
                        &[("a", &m.to_string()), ("n", &n.to_string())],
                    );
                }
            }
        }
    }

    let mut parts = Vec::with_capacity(3);
    if let Some(seconds) = seconds.filter(|_| !zero_seconds) {
        parts.push(time_field(v, seconds, Unit::Second));
    }
    parts.push(time_field(v, minutes, Unit::Minute));
    parts.push(time_field(v, hours, Unit::Hour));
    parts.join(", ")
}

fn time_field(v: &Vocabulary, expression: &str, unit: Unit) -> String {
    let (singular, plural) = v.unit(unit);
    if expression == "*" {
        return fill(v.every_unit, &[("unit", singular)]);
    }
    if let Some(values) = numbers(expression) {
        return match values.as_slice() {
            [a] => fill(v.at_unit, &[("unit", singular), ("a", a)]),
            _ => fill(v.at_units, &[("units", plural), ("list", &join(v, values))]),
        };
    }

    let items = expression
        .split(',')
        .map(|item| {
            let (range, step) = match item.split_once('/') {
                Some((range, step)) => (range, Some(step)),
                None => (item, None),
            };
            let stepped = step.map(|n| fill(v.every_n_units, &[("n", n), ("units", plural)]));
            match (range, range.split_once('-'), stepped) {
                ("*", _, Some(stepped)) => stepped,
                (_, Some((a, b)), stepped) => {
                    let text = fill(
                        v.units_range,
                        &[("unit", singular), ("units", plural), ("a", a), ("b", b)],
                    );
                    match stepped {
                        Some(stepped) => format!("{text}, {stepped}"),
                        None => text,
                    }
                }
                (a, None, Some(_)) => fill(
                    v.every_n_units_from,
                    &[
                        ("n", step.unwrap_or_default()),
                        ("unit", singular),
                        ("units", plural),
                        ("a", a),
                    ],
                ),
                (a, None, None) => fill(v.at_unit, &[("unit", singular), ("a", a)]),
            }
        })
        .collect();
    join(v, items)
}

fn month_days(v: &Vocabulary, field: &Field) -> Option<String> {
    let expression = field.expression();
    let text = match expression {
        "*" | "?" => return None,
        "L" => v.last_day_of_month.to_owned(),
        _ => {
            if let Some(values) = numbers(expression) {
                match values.as_slice() {
                    [a] => fill(v.on_day_of_month, &[("a", a)]),
                    _ => fill(v.on_days_of_month, &[("list", &join(v, values))]),
                }
            } else if let Some((a, b)) = range(expression) {
                fill(v.days_range, &[("a", a), ("b", b)])
            } else if let Some((start, n)) = step(expression) {
                match start {
                    "*" => fill(v.every_n_days, &[("n", n)]),
                    a => fill(v.every_n_days_from, &[("n", n), ("a", a)]),
                }
            } else {
                raw_field(v, field)
            }
        }
    };
    Some(text)
}

fn weekdays(v: &Vocabulary, field: &Field) -> Option<String> {
    let expression = field.expression();
    let day = |a: &str| name(&v.weekdays, a);
    let text = match expression {
        "*" | "?" => return None,
        "L" => fill(v.only_on, &[("list", v.weekdays[6])]),
        _ => {
            if let Some(values) = numbers(expression) {
                let names = values.iter().map(|a| day(a)).collect();
                fill(v.only_on, &[("list", &join(v, names))])
            } else if let Some(a) = expression.strip_suffix('L').filter(|a| number(a).is_some()) {
                fill(v.last_weekday, &[("day", &day(a))])
            } else if let Some((a, nth)) = expression.split_once('#') {
                let nth = number(nth)
                    .and_then(|k| v.ordinals.get(k.checked_sub(1)? as usize))
                    .copied()
                    .unwrap_or(nth);
                fill(v.nth_weekday, &[("nth", nth), ("day", &day(a))])
            } else if let Some((a, b)) = range(expression) {
                fill(v.weekday_range, &[("a", &day(a)), ("b", &day(b))])
            } else if let Some(("*", n)) = step(expression) {
                fill(v.every_n_weekdays, &[("n", n)])
            } else {
                raw_field(v, field)
            }
        }
    };
    Some(text)
}

fn months(v: &Vocabulary, field: &Field) -> Option<String> {
    let expression = field.expression();
    let month = |a: &str| name(&v.months, a);
    if expression == "*" {
        return None;
    }
    let text = if let Some(values) = numbers(expression) {
        let names = values.iter().map(|a| month(a)).collect();
        fill(v.only_in, &[("list", &join(v, names))])
    } else if let Some((a, b)) = range(expression) {
        fill(v.value_range, &[("a", &month(a)), ("b", &month(b))])
    } else if let Some(("*", n)) = step(expression) {
        fill(v.every_n_months, &[("n", n)])
    } else {
        raw_field(v, field)
    };
    Some(text)
}

fn years(v: &Vocabulary, field: &Field) -> Option<String> {
    let expression = field.expression();
    if expression == "*" {
        return None;
    }
    let text = if let Some(values) = numbers(expression) {
        fill(v.only_in, &[("list", &join(v, values))])
    } else if let Some((a, b)) = range(expression) {
        fill(v.value_range, &[("a", a), ("b", b)])
    } else if let Some(("*", n)) = step(expression) {
        fill(v.every_n_years, &[("n", n)])
    } else {
        raw_field(v, field)
    };
    Some(text)
}

fn raw_field(v: &Vocabulary, field: &Field) -> String {
    let index = field.position() as usize;
    let name = v.fields.get(index).copied().unwrap_or_default();
    format!("{name} {}", field.expression())
}

/// The name of a 1-based value, or the value itself when out of range.
fn name(names: &[&str], value: &str) -> String {
    number(value)
        .and_then(|n| names.get(n.checked_sub(1)? as usize))
        .map_or_else(|| value.to_owned(), |a| (*a).to_owned())
}

/// The items of a list made only of plain numbers.
fn numbers(expression: &str) -> Option<Vec<String>> {
    expression
        .split(',')
        .map(|a| number(a).map(|n| n.to_string()))
        .collect()
}

fn range(expression: &str) -> Option<(&str, &str)> {
    let (a, b) = expression.split_once('-')?;
    (number(a).is_some() && number(b).is_some()).then_some((a, b))
}

fn step(expression: &str) -> Option<(&str, &str)> {
    let (start, n) = expression.split_once('/')?;
    (number(n).is_some() && (start == "*" || number(start).is_some())).then_some((start, n))
}

fn number(text: &str) -> Option<u32> {
    if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    lexical::parse(text).ok()
}

fn join(v: &Vocabulary, mut items: Vec<String>) -> String {
    match items.pop() {
        None => String::new(),
        Some(last) if items.is_empty() => last,
        Some(last) => format!("{} {} {last}", items.join(", "), v.and),
    }
}

fn fill(template: &str, values: &[(&str, &str)]) -> String {
    values.iter().fold(template.to_owned(), |text, (key, value)| {
        text.replace(&format!("{{{key}}}"), value)
    })
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
