// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use std::{error::Error, io};

use clap::{Arg, ArgMatches, Command, arg, value_parser};
use serde::Serialize;
use tempora_period::{
    PeriodExpressionHandler, generate_daily_cron_expression, generate_hourly_cron_expression,
    generate_monthly_cron_expression, generate_weekly_cron_expression, handle,
};

use crate::arg::{CommonArgs, OutputFormat};
use crate::config::Config;
use crate::formatter::{Report, ReportFormatter};

/// The recurrences the expression builder offers, with times in UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recurrence {
    Hourly {
        every: u8,
        minute: u8,
        only_weekdays: bool,
    },
    Daily {
        hour: u8,
        minute: u8,
        only_weekdays: bool,
    },
    Weekly {
        day: u8,
        hour: u8,
        minute: u8,
    },
    Monthly {
        week: u8,
        day: u8,
        hour: u8,
        minute: u8,
    },
}

impl Recurrence {
    pub fn to_cron_expression(self) -> String {
        match self {
            Recurrence::Hourly {
                every,
                minute,
                only_weekdays,
            } => generate_hourly_cron_expression(
                &every.to_string(),
                &minute.to_string(),
                only_weekdays,
            ),
            Recurrence::Daily {
                hour,
                minute,
                only_weekdays,
            } => generate_daily_cron_expression(
                &hour.to_string(),
                &minute.to_string(),
                only_weekdays,
            ),
            Recurrence::Weekly { day, hour, minute } => generate_weekly_cron_expression(
                &day.to_string(),
                &hour.to_string(),
                &minute.to_string(),
            ),
            Recurrence::Monthly {
                week,
                day,
                hour,
                minute,
            } => generate_monthly_cron_expression(
                &week.to_string(),
                &day.to_string(),
                &hour.to_string(),
                &minute.to_string(),
            ),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct CmdGenerate {
    pub recurrence: Recurrence,
    pub output_format: Option<OutputFormat>,
}

impl CmdGenerate {
    pub const NAME: &str = "generate";

    pub fn command() -> Command {
        let common = |cmd: Command| cmd.arg(CommonArgs::output_format());
        Command::new(Self::NAME)
            .alias("gen")
            .about("Generate a cron expression for a common recurrence")
            .arg_required_else_help(true)
            .subcommand_required(true)
            .subcommand(common(
                Command::new("hourly")
                    .about("Every few hours, at the given minute")
                    .arg(
                        arg!(--every <HOURS> "Repeat every HOURS hours")
                            .value_parser(value_parser!(u8).range(1..=23))
                            .default_value("1"),
                    )
                    .arg(minute())
                    .arg(only_weekdays()),
            ))
            .subcommand(common(
                Command::new("daily")
                    .about("Every day at the given time")
                    .arg(hour())
                    .arg(minute())
                    .arg(only_weekdays()),
            ))
            .subcommand(common(
                Command::new("weekly")
                    .about("Every week on the given day, at the given time")
                    .arg(day())
                    .arg(hour())
                    .arg(minute()),
            ))
            .subcommand(common(
                Command::new("monthly")
                    .about("Every month on the given week and day, at the given time")
                    .arg(
                        arg!(--week <WEEK> "Week of the month, 5 for the last one")
                            .value_parser(value_parser!(u8).range(1..=5))
                            .default_value("1"),
                    )
                    .arg(day())
                    .arg(hour())
                    .arg(minute()),
            ))
    }

    pub fn from(matches: &ArgMatches) -> Self {
        let (name, matches) = matches.subcommand().expect("subcommand is required");
        let get = |id: &str| matches.get_one::<u8>(id).copied().unwrap_or_default();
        let recurrence = match name {
            "hourly" => Recurrence::Hourly {
                every: get("every"),
                minute: get("minute"),
                only_weekdays: matches.get_flag("only-weekdays"),
            },
            "daily" => Recurrence::Daily {
                hour: get("hour"),
                minute: get("minute"),
                only_weekdays: matches.get_flag("only-weekdays"),
            },
            "weekly" => Recurrence::Weekly {
                day: get("day"),
                hour: get("hour"),
                minute: get("minute"),
            },
            "monthly" => Recurrence::Monthly {
                week: get("week"),
                day: get("day"),
                hour: get("hour"),
                minute: get("minute"),
            },
            _ => unreachable!(),
        };

        Self {
            recurrence,
            output_format: CommonArgs::get_output_format(matches),
        }
    }

    pub fn run(self, config: &Config) -> Result<(), Box<dyn Error>> {
        tracing::debug!(?self, "generating cron expression...");
        self.write(&mut io::stdout(), config)
    }

    pub fn write(self, w: &mut impl io::Write, config: &Config) -> Result<(), Box<dyn Error>> {
        let expression = self.recurrence.to_cron_expression();
        let text = match handle(Some(&expression)) {
            Some(expr) => expr.to_human_readable_string_in(config.locale, &config.time_zone()?),
            None => return Err(format!("Generated an invalid expression: {expression}").into()),
        };

        let format = self.output_format.unwrap_or(config.output_format);
        ReportFormatter::new(format).write(w, &Generated { expression, text })
    }
}

fn hour() -> Arg {
    arg!(--hour <HOUR> "Hour of the day, in UTC")
        .value_parser(value_parser!(u8).range(0..=23))
        .default_value("0")
}

fn minute() -> Arg {
    arg!(--minute <MINUTE> "Minute of the hour")
        .value_parser(value_parser!(u8).range(0..=59))
        .default_value("0")
}

fn day() -> Arg {
    arg!(--day <DAY> "Day of the week, from 1 for Monday to 7 for Sunday")
        .value_parser(value_parser!(u8).range(1..=7))
        .default_value("1")
}

fn only_weekdays() -> Arg {
    arg!(--"only-weekdays" "Only from Monday to Friday")
}

#[derive(Debug, Serialize)]
struct Generated {
    expression: String,
    text: String,
}

impl Report for Generated {
    fn rows(&self) -> Vec<(String, String)> {
        vec![
            ("Expression".to_string(), self.expression.clone()),
            ("Text".to_string(), self.text.clone()),
        ]
    }
}
