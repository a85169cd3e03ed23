// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use std::{error::Error, io};

use clap::{ArgMatches, Command, arg, value_parser};
use jiff::Timestamp;
use serde::Serialize;
use tempora_period::{Iso8601Period, ScheduleFrequency, cron_expression_for};

use crate::arg::{CommonArgs, OutputFormat, parse_instant};
use crate::config::Config;
use crate::formatter::{Report, ReportFormatter, or_dash};

#[derive(Debug, Clone)]
pub struct CmdToCron {
    pub period: String,
    pub interval: Option<u32>,
    pub seed: Option<String>,
    pub output_format: Option<OutputFormat>,
}

impl CmdToCron {
    pub const NAME: &str = "to-cron";

    pub fn command() -> Command {
        Command::new(Self::NAME)
            .about("Convert an ISO 8601 period or a frequency to a cron expression")
            .long_about(
                "\
Convert an ISO 8601 period (PT4H, P3D, P1W, P6M) or a frequency name (hourly, daily, \
weekly, monthly, oneshot) to a Quartz cron expression. The time and day of the \
expression are those of the seed instant in UTC.",
            )
            .arg(arg!(period: <PERIOD> "The ISO 8601 period or frequency name"))
            .arg(
                arg!(--interval <N> "Repeat every N units, for a frequency name")
                    .value_parser(value_parser!(u32)),
            )
            .arg(arg!(--seed <DATETIME> "Anchor instant, defaults to now"))
            .arg(CommonArgs::output_format())
    }

    pub fn from(matches: &ArgMatches) -> Self {
        Self {
            period: matches
                .get_one::<String>("period")
                .expect("period is required")
                .clone(),
            interval: matches.get_one("interval").copied(),
            seed: matches.get_one("seed").cloned(),
            output_format: CommonArgs::get_output_format(matches),
        }
    }

    pub fn run(self, config: &Config) -> Result<(), Box<dyn Error>> {
        tracing::debug!(?self, "converting to cron expression...");
        self.write(&mut io::stdout(), config, Timestamp::now())
    }

    pub fn write(
        &self,
        w: &mut impl io::Write,
        config: &Config,
        now: Timestamp,
    ) -> Result<(), Box<dyn Error>> {
        let seed = match &self.seed {
            Some(seed) => parse_instant(seed, &config.time_zone()?)?,
            None => now,
        };
        let report = Conversion {
            period: self.period.clone(),
            seed,
            expression: self.convert(seed)?,
        };

        let format = self.output_format.unwrap_or(config.output_format);
        ReportFormatter::new(format).write(w, &report)
    }

    fn convert(&self, seed: Timestamp) -> Result<Option<String>, Box<dyn Error>> {
        if let Ok(frequency) = self.period.parse::<ScheduleFrequency>() {
            return Ok(cron_expression_for(frequency, self.interval, seed)?);
        }

        if self.interval.is_some() {
            tracing::warn!(period = %self.period, "interval is ignored for ISO 8601 periods");
        }
        let expression = Iso8601Period::new(self.period.as_str()).to_cron_expression(seed)?;
        Ok(Some(expression))
    }
}

#[derive(Debug, Serialize)]
struct Conversion {
    period: String,
    seed: Timestamp,
    /// `None` for one-shot schedules
    expression: Option<String>,
}

impl Report for Conversion {
    fn rows(&self) -> Vec<(String, String)> {
        vec![
            ("Period".to_string(), self.period.clone()),
            ("Seed".to_string(), self.seed.to_string()),
            ("Expression".to_string(), or_dash(self.expression.as_ref())),
        ]
    }
}
