// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use std::{error::Error, io};

use clap::{ArgMatches, Command};
use colored::Colorize;
use serde::Serialize;
use tempora_period::{CronParser, PeriodExpressionHandler, handle};

use crate::arg::{CommonArgs, OutputFormat};
use crate::config::Config;
use crate::formatter::{Report, ReportFormatter};

#[derive(Debug, Clone)]
pub struct CmdValidate {
    pub expressions: Vec<String>,
    pub output_format: Option<OutputFormat>,
}

impl CmdValidate {
    pub const NAME: &str = "validate";

    pub fn command() -> Command {
        Command::new(Self::NAME)
            .alias("check")
            .about("Check whether expressions are valid, failing if any is not")
            .arg(CommonArgs::expressions())
            .arg(CommonArgs::output_format())
    }

    pub fn from(matches: &ArgMatches) -> Self {
        Self {
            expressions: CommonArgs::get_expressions(matches),
            output_format: CommonArgs::get_output_format(matches),
        }
    }

    pub fn run(self, config: &Config) -> Result<(), Box<dyn Error>> {
        tracing::debug!(?self, "validating expressions...");
        self.write(&mut io::stdout(), config)
    }

    pub fn write(&self, w: &mut impl io::Write, config: &Config) -> Result<(), Box<dyn Error>> {
        let report = Validation(self.expressions.iter().map(|a| Verdict::new(a)).collect());

        let format = self.output_format.unwrap_or(config.output_format);
        ReportFormatter::new(format).write(w, &report)?;

        match report.invalid_count() {
            0 => Ok(()),
            n => Err(format!("{n} of {} expressions are invalid", report.0.len()).into()),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(transparent)]
struct Validation(Vec<Verdict>);

impl Validation {
    fn invalid_count(&self) -> usize {
        self.0.iter().filter(|a| !a.valid).count()
    }
}

#[derive(Debug, Serialize)]
struct Verdict {
    expression: String,
    /// `None` when no dialect recognises the expression
    kind: Option<&'static str>,
    valid: bool,
}

impl Verdict {
    fn new(expression: &str) -> Self {
        let (kind, valid) = match handle(Some(expression)) {
            Some(expr) => (Some(expr.kind()), expr.is_valid()),
            // well-formed cron expressions with fields out of range
            None if CronParser::parse(expression).is_ok() => (Some("cron"), false),
            None => (None, false),
        };
        Self {
            expression: expression.to_string(),
            kind,
            valid,
        }
    }
}

impl Report for Validation {
    fn rows(&self) -> Vec<(String, String)> {
        self.0
            .iter()
            .map(|a| {
                let verdict = match (a.valid, a.kind) {
                    (true, _) => "valid".green().to_string(),
                    (false, Some(_)) => "invalid".red().to_string(),
                    (false, None) => "unrecognised".red().to_string(),
                };
                (a.expression.clone(), verdict)
            })
            .collect()
    }
}
