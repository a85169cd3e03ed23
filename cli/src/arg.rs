// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use std::error::Error;

use clap::{Arg, ArgMatches, arg, value_parser};
use jiff::{Timestamp, civil::DateTime, tz::TimeZone};

/// The output format for commands
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Colored key/value table
    #[default]
    Table,
    /// JSON document
    Json,
}

#[derive(Debug, Clone, Copy)]
pub struct CommonArgs;

impl CommonArgs {
    pub fn expression() -> Arg {
        arg!(expression: <EXPR> "The cron or ISO 8601 period expression")
    }

    pub fn get_expression(matches: &ArgMatches) -> String {
        matches
            .get_one::<String>("expression")
            .expect("expression is required")
            .clone()
    }

    pub fn expressions() -> Arg {
        arg!(expression: <EXPR> "The cron or ISO 8601 period expressions").num_args(1..)
    }

    pub fn get_expressions(matches: &ArgMatches) -> Vec<String> {
        matches
            .get_many::<String>("expression")
            .expect("expression is required")
            .cloned()
            .collect()
    }

    /// No default value here, the configuration file provides one.
    pub fn output_format() -> Arg {
        arg!(--"output-format" <FORMAT> "Output format")
            .value_parser(value_parser!(OutputFormat))
    }

    pub fn get_output_format(matches: &ArgMatches) -> Option<OutputFormat> {
        matches.get_one("output-format").copied()
    }
}

/// Reads an instant given either with an offset (`2026-03-17T10:00:00Z`) or as a civil
/// date-time (`2026-03-17T10:00`) in the given time zone.
pub fn parse_instant(s: &str, tz: &TimeZone) -> Result<Timestamp, Box<dyn Error>> {
    if let Ok(ts) = s.parse::<Timestamp>() {
        return Ok(ts);
    }

    let dt = s
        .parse::<DateTime>()
        .map_err(|e| format!("Invalid date-time {s:?}: {e}"))?;
    Ok(dt.to_zoned(tz.clone())?.timestamp())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Command;
    use jiff::tz::offset;

    #[test]
    fn test_output_format_is_optional() {
        let cmd = Command::new("test").arg(CommonArgs::output_format());

        let matches = cmd.clone().try_get_matches_from(["test"]).unwrap();
        assert_eq!(CommonArgs::get_output_format(&matches), None);

        let matches = cmd
            .try_get_matches_from(["test", "--output-format", "json"])
            .unwrap();
        assert_eq!(
            CommonArgs::get_output_format(&matches),
            Some(OutputFormat::Json)
        );
    }

    #[test]
    fn test_parse_instant_with_offset() {
        let tz = TimeZone::fixed(offset(2));
        let ts = parse_instant("2026-03-17T10:00:00Z", &tz).unwrap();
        assert_eq!(ts, "2026-03-17T10:00:00Z".parse::<Timestamp>().unwrap());
    }

    #[test]
    fn test_parse_instant_in_time_zone() {
        let tz = TimeZone::fixed(offset(2));
        let ts = parse_instant("2026-03-17T10:00:00", &tz).unwrap();
        assert_eq!(ts, "2026-03-17T08:00:00Z".parse::<Timestamp>().unwrap());
    }

    #[test]
    fn test_parse_instant_rejects_garbage() {
        let err = parse_instant("tomorrow", &TimeZone::UTC).unwrap_err();
        assert!(err.to_string().contains("tomorrow"));
    }
}
