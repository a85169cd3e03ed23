// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use std::{error::Error, io};

use clap::{ArgMatches, Command};
use colored::Colorize;
use jiff::tz::TimeZone;
use serde::Serialize;
use tempora_period::{
    Locale, PeriodExpressionHandler, RecurrenceMagnitude, RecurrenceTime, handle,
};

use crate::arg::{CommonArgs, OutputFormat};
use crate::config::Config;
use crate::formatter::{Report, ReportFormatter, or_dash};

#[derive(Debug, Clone)]
pub struct CmdDescribe {
    pub expression: String,
    pub output_format: Option<OutputFormat>,
}

impl CmdDescribe {
    pub const NAME: &str = "describe";

    pub fn command() -> Command {
        Command::new(Self::NAME)
            .alias("explain")
            .about("Describe a cron or ISO 8601 period expression")
            .arg(CommonArgs::expression())
            .arg(CommonArgs::output_format())
    }

    pub fn from(matches: &ArgMatches) -> Self {
        Self {
            expression: CommonArgs::get_expression(matches),
            output_format: CommonArgs::get_output_format(matches),
        }
    }

    pub fn run(self, config: &Config) -> Result<(), Box<dyn Error>> {
        tracing::debug!(?self, "describing expression...");
        self.write(&mut io::stdout(), config)
    }

    pub fn write(&self, w: &mut impl io::Write, config: &Config) -> Result<(), Box<dyn Error>> {
        let tz = config.time_zone()?;
        let report = Description::new(&self.expression, config.locale, &tz)
            .ok_or_else(|| format!("Unrecognised expression: {:?}", self.expression))?;

        let format = self.output_format.unwrap_or(config.output_format);
        ReportFormatter::new(format).write(w, &report)
    }
}

#[derive(Debug, Serialize)]
struct Description {
    expression: String,
    kind: &'static str,
    valid: bool,
    ui_supported: bool,
    magnitude: RecurrenceMagnitude,
    time: RecurrenceTime,
    #[serde(skip_serializing_if = "Option::is_none")]
    localised: Option<String>,
    text: String,
    tokens: Vec<String>,
}

impl Description {
    fn new(expression: &str, locale: Locale, tz: &TimeZone) -> Option<Self> {
        let expr = handle(Some(expression))?;
        Some(Self {
            expression: expr.raw_expression(),
            kind: expr.kind(),
            valid: expr.is_valid(),
            ui_supported: expr.is_ui_supported(),
            magnitude: expr.recurrence_magnitude(),
            time: expr.recurrence_time_in(tz),
            localised: expr.as_cron().map(|a| a.to_localised_cron_expression_in(tz)),
            text: expr.to_human_readable_string_in(locale, tz),
            tokens: expr.to_translatable_string_array_in(locale, tz),
        })
    }
}

impl Report for Description {
    fn rows(&self) -> Vec<(String, String)> {
        let yes_no = |flag: bool| {
            if flag {
                "yes".green().to_string()
            } else {
                "no".red().to_string()
            }
        };
        let time = format!(
            "{}:{}",
            or_dash(self.time.hour.map(|h| format!("{h:02}"))),
            or_dash(self.time.minute.map(|m| format!("{m:02}"))),
        );

        let mut rows = vec![
            ("Expression".to_string(), self.expression.clone()),
            ("Kind".to_string(), self.kind.to_string()),
            ("Valid".to_string(), yes_no(self.valid)),
            ("UI supported".to_string(), yes_no(self.ui_supported)),
            ("Magnitude".to_string(), self.magnitude.to_string()),
            ("Time".to_string(), time),
        ];
        if let Some(localised) = &self.localised {
            rows.push(("Localised".to_string(), localised.clone()));
        }
        rows.push(("Text".to_string(), self.text.italic().to_string()));
        rows.push(("Tokens".to_string(), self.tokens.join(" ")));
        rows
    }
}
