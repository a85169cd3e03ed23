// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use std::{error::Error, io};

use clap::{ArgMatches, Command, arg, value_parser};
use jiff::{Timestamp, Zoned, tz::TimeZone};
use serde::Serialize;
use tempora_period::{PeriodExpression, PeriodExpressionHandler, handle};

use crate::arg::{CommonArgs, OutputFormat, parse_instant};
use crate::config::Config;
use crate::formatter::{Report, ReportFormatter};

#[derive(Debug, Clone)]
pub struct CmdNext {
    pub expression: String,
    pub count: usize,
    pub after: Option<String>,
    pub output_format: Option<OutputFormat>,
}

impl CmdNext {
    pub const NAME: &str = "next";

    pub fn command() -> Command {
        Command::new(Self::NAME)
            .about("List the next occurrences of an expression")
            .long_about(
                "\
List the next occurrences of an expression. Cron expressions are evaluated in UTC, \
ISO 8601 periods repeat from the starting instant. Occurrences are shown in the \
configured time zone.",
            )
            .arg(CommonArgs::expression())
            .arg(
                arg!(-n --count <COUNT> "Number of occurrences to list")
                    .value_parser(value_parser!(u16).range(1..))
                    .default_value("5"),
            )
            .arg(arg!(--after <DATETIME> "Start after this instant, defaults to now"))
            .arg(CommonArgs::output_format())
    }

    pub fn from(matches: &ArgMatches) -> Self {
        Self {
            expression: CommonArgs::get_expression(matches),
            count: matches.get_one::<u16>("count").copied().map_or(5, usize::from),
            after: matches.get_one("after").cloned(),
            output_format: CommonArgs::get_output_format(matches),
        }
    }

    pub fn run(self, config: &Config) -> Result<(), Box<dyn Error>> {
        tracing::debug!(?self, "listing occurrences...");
        self.write(&mut io::stdout(), config, Timestamp::now())
    }

    pub fn write(
        &self,
        w: &mut impl io::Write,
        config: &Config,
        now: Timestamp,
    ) -> Result<(), Box<dyn Error>> {
        let tz = config.time_zone()?;
        let after = match &self.after {
            Some(after) => parse_instant(after, &tz)?,
            None => now,
        };

        let occurrences = self.occurrences(after)?;
        if occurrences.is_empty() {
            return Err(format!("{} has no upcoming occurrence", self.expression).into());
        }

        let report = Schedule {
            expression: self.expression.clone(),
            time_zone: tz.iana_name().map(ToString::to_string),
            occurrences: occurrences
                .into_iter()
                .map(|a| a.to_zoned(tz.clone()))
                .collect(),
        };
        let format = self.output_format.unwrap_or(config.output_format);
        ReportFormatter::new(format).write(w, &report)
    }

    fn occurrences(&self, after: Timestamp) -> Result<Vec<Timestamp>, Box<dyn Error>> {
        let expr = handle(Some(&self.expression))
            .ok_or_else(|| format!("Unrecognised expression: {:?}", self.expression))?;
        if !expr.is_valid() {
            return Err(format!("Invalid expression: {:?}", self.expression).into());
        }

        let occurrences = match &expr {
            PeriodExpression::Cron(cron) => cron
                .occurrences(after, &TimeZone::UTC)
                .take(self.count)
                .map(|a| a.timestamp())
                .collect(),
            PeriodExpression::Iso8601(period) => {
                std::iter::successors(period.next_occurrence(after, after), |&prev| {
                    period.next_occurrence(after, prev)
                })
                .take(self.count)
                .collect()
            }
        };
        Ok(occurrences)
    }
}

#[derive(Debug, Serialize)]
struct Schedule {
    expression: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    time_zone: Option<String>,
    occurrences: Vec<Zoned>,
}

impl Report for Schedule {
    fn rows(&self) -> Vec<(String, String)> {
        self.occurrences
            .iter()
            .enumerate()
            .map(|(i, a)| {
                let when = a.strftime("%a %Y-%m-%d %H:%M:%S %:z").to_string();
                (format!("#{}", i + 1), when)
            })
            .collect()
    }
}
