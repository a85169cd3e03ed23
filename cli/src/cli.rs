// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use std::{error::Error, ffi::OsString, io, path::PathBuf, process::ExitCode};

use clap::{ArgMatches, Command, ValueHint, arg, builder::styling, crate_version, value_parser};
use colored::Colorize;
use tracing_subscriber::EnvFilter;

use crate::cmd_describe::CmdDescribe;
use crate::cmd_generate::CmdGenerate;
use crate::cmd_generate_completion::CmdGenerateCompletion;
use crate::cmd_next::CmdNext;
use crate::cmd_to_cron::CmdToCron;
use crate::cmd_validate::CmdValidate;
use crate::config::{Config, ConfigOverrides, parse_config};

const APP_NAME: &str = "tempora";

/// Run the Tempora command-line interface.
pub async fn run() -> ExitCode {
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let result = match Cli::parse() {
        Ok(cli) => cli.run().await,
        Err(e) => Err(e),
    };
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {}", "Error:".red(), e);
            ExitCode::FAILURE
        }
    }
}

/// Command-line interface
#[derive(Debug)]
pub struct Cli {
    /// Path to the configuration file
    pub config: Option<PathBuf>,

    /// Global options overriding the configuration file
    pub overrides: ConfigOverrides,

    /// The command to execute
    pub command: Commands,
}

impl Cli {
    /// Create the command-line interface
    pub fn command() -> Command {
        const STYLES: styling::Styles = styling::Styles::styled()
            .header(styling::AnsiColor::Green.on_default().bold())
            .usage(styling::AnsiColor::Green.on_default().bold())
            .literal(styling::AnsiColor::Blue.on_default().bold())
            .placeholder(styling::AnsiColor::Cyan.on_default());

        Command::new(APP_NAME)
            .about("Inspect, generate and schedule cron and ISO 8601 recurrence expressions.")
            .author("Zexin Yuan <aim@yzx9.xyz>")
            .version(crate_version!())
            .styles(STYLES)
            .subcommand_required(true)
            .arg_required_else_help(true)
            .arg(
                arg!(-c --config [CONFIG] "Path to the configuration file")
                    .long_help(
                        "\
Path to the configuration file. Defaults to $XDG_CONFIG_HOME/tempora/config.toml on Linux and \
MacOS, %APPDATA%/tempora/config.toml on Windows. The TEMPORA_CONFIG environment variable is \
used when set.",
                    )
                    .global(true)
                    .value_parser(value_parser!(PathBuf))
                    .value_hint(ValueHint::FilePath),
            )
            .arg(
                arg!(--locale <LOCALE> "Language of descriptions, such as en or fr-FR")
                    .global(true),
            )
            .arg(
                arg!(--timezone <TZ> "IANA time zone used to display times")
                    .global(true),
            )
            .subcommand(CmdDescribe::command())
            .subcommand(CmdValidate::command())
            .subcommand(CmdGenerate::command())
            .subcommand(CmdNext::command())
            .subcommand(CmdToCron::command())
            .subcommand(CmdGenerateCompletion::command())
    }

    /// Parse the command-line arguments
    pub fn parse() -> Result<Self, Box<dyn Error>> {
        let commands = Self::command();
        let matches = commands.get_matches();
        Self::from(&matches)
    }

    /// Parse the specified arguments
    pub fn try_parse_from<I, T>(args: I) -> Result<Self, Box<dyn Error>>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let commands = Self::command();
        let matches = commands.try_get_matches_from(args)?;
        Self::from(&matches)
    }

    /// Create a CLI instance from the `ArgMatches`
    pub fn from(matches: &ArgMatches) -> Result<Self, Box<dyn Error>> {
        use Commands::*;
        let command = match matches.subcommand() {
            Some((CmdDescribe::NAME, matches)) => Describe(CmdDescribe::from(matches)),
            Some((CmdValidate::NAME, matches)) => Validate(CmdValidate::from(matches)),
            Some((CmdGenerate::NAME, matches)) => Generate(CmdGenerate::from(matches)),
            Some((CmdNext::NAME, matches)) => Next(CmdNext::from(matches)),
            Some((CmdToCron::NAME, matches)) => ToCron(CmdToCron::from(matches)),
            Some((CmdGenerateCompletion::NAME, matches)) => {
                GenerateCompletion(CmdGenerateCompletion::from(matches))
            }
            _ => return Err("A subcommand is required".into()),
        };

        Ok(Cli {
            config: matches.get_one("config").cloned(),
            overrides: ConfigOverrides {
                locale: matches.get_one("locale").cloned(),
                timezone: matches.get_one("timezone").cloned(),
            },
            command,
        })
    }

    /// Run the command
    pub async fn run(self) -> Result<(), Box<dyn Error>> {
        self.command.run(self.config, &self.overrides).await
    }
}

/// The commands available in the CLI
#[derive(Debug, Clone)]
pub enum Commands {
    /// Describe an expression
    Describe(CmdDescribe),

    /// Validate expressions
    Validate(CmdValidate),

    /// Generate a cron expression
    Generate(CmdGenerate),

    /// List upcoming occurrences
    Next(CmdNext),

    /// Convert a period to a cron expression
    ToCron(CmdToCron),

    /// Generate shell completion
    GenerateCompletion(CmdGenerateCompletion),
}

impl Commands {
    /// Run the command with the given configuration
    #[rustfmt::skip]
    pub async fn run(
        self,
        config: Option<PathBuf>,
        overrides: &ConfigOverrides,
    ) -> Result<(), Box<dyn Error>> {
        use Commands::*;
        match self {
            Describe(a) => Self::run_with(config, overrides, |x| a.run(x)).await,
            Validate(a) => Self::run_with(config, overrides, |x| a.run(x)).await,
            Generate(a) => Self::run_with(config, overrides, |x| a.run(x)).await,
            Next(a)     => Self::run_with(config, overrides, |x| a.run(x)).await,
            ToCron(a)   => Self::run_with(config, overrides, |x| a.run(x)).await,
            GenerateCompletion(a) => a.run(),
        }
    }

    async fn run_with<F>(
        config: Option<PathBuf>,
        overrides: &ConfigOverrides,
        f: F,
    ) -> Result<(), Box<dyn Error>>
    where
        F: FnOnce(&Config) -> Result<(), Box<dyn Error>>,
    {
        tracing::debug!("parsing configuration...");
        let config = parse_config(config).await?.with_overrides(overrides);
        f(&config)
    }
}
