// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use std::{error::Error, path::PathBuf, str::FromStr};

use jiff::tz::TimeZone;
use tempora_period::Locale;
use tokio::fs;

use crate::arg::OutputFormat;

const APP_NAME: &str = "tempora";
const TEMPORA_CONFIG_ENV: &str = "TEMPORA_CONFIG";

/// Loads the configuration.
///
/// The file is looked up from the given path, then the `TEMPORA_CONFIG` environment
/// variable, then `$XDG_CONFIG_HOME/tempora/config.toml`. A missing default file yields
/// the default configuration, while an explicit path must be readable.
#[tracing::instrument]
pub async fn parse_config(path: Option<PathBuf>) -> Result<Config, Box<dyn Error>> {
    let path = if let Some(path) = path {
        path
    } else if let Ok(env_path) = std::env::var(TEMPORA_CONFIG_ENV) {
        PathBuf::from(env_path)
    } else {
        let config = match get_config_dir() {
            Ok(dir) => dir.join(APP_NAME).join("config.toml"),
            Err(e) => {
                tracing::warn!(%e, "using default configuration");
                return Ok(Config::default());
            }
        };
        if !config.exists() {
            tracing::debug!(path = %config.display(), "no config found, using defaults");
            return Ok(Config::default());
        }
        config
    };

    let raw = fs::read_to_string(&path)
        .await
        .map_err(|e| format!("Failed to read config file at {}: {}", path.display(), e))?
        .parse::<ConfigRaw>()
        .map_err(|e| format!("Failed to parse config file at {}: {}", path.display(), e))?;
    Ok(raw.into())
}

/// Configuration for the Tempora command-line interface.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
    /// Language of human-readable descriptions
    pub locale: Locale,

    /// IANA time zone name, the system time zone when absent
    pub timezone: Option<String>,

    /// Output format used when a command does not specify one
    pub output_format: OutputFormat,
}

impl Config {
    /// Resolves the configured time zone.
    pub fn time_zone(&self) -> Result<TimeZone, Box<dyn Error>> {
        match &self.timezone {
            Some(name) => {
                TimeZone::get(name).map_err(|e| format!("Unknown time zone {name}: {e}").into())
            }
            None => Ok(TimeZone::system()),
        }
    }

    /// Applies the command-line overrides on top of the file configuration.
    #[must_use]
    pub fn with_overrides(mut self, overrides: &ConfigOverrides) -> Self {
        if let Some(tag) = &overrides.locale {
            self.locale = Locale::from_tag(tag);
        }
        if let Some(timezone) = &overrides.timezone {
            self.timezone = Some(timezone.clone());
        }
        self
    }
}

/// Global options given on the command line, taking precedence over the file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigOverrides {
    /// Locale tag such as `fr` or `en-US`
    pub locale: Option<String>,

    /// IANA time zone name
    pub timezone: Option<String>,
}

#[derive(Debug, Default, serde::Deserialize)]
struct ConfigRaw {
    locale: Option<String>,
    timezone: Option<String>,
    output_format: Option<OutputFormat>,
}

impl FromStr for ConfigRaw {
    type Err = Box<dyn Error>;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(toml::from_str(s)?)
    }
}

impl From<ConfigRaw> for Config {
    fn from(raw: ConfigRaw) -> Self {
        Config {
            locale: raw.locale.as_deref().map(Locale::from_tag).unwrap_or_default(),
            timezone: raw.timezone,
            output_format: raw.output_format.unwrap_or_default(),
        }
    }
}

fn get_config_dir() -> Result<PathBuf, Box<dyn Error>> {
    #[cfg(unix)]
    let config_dir = xdg::BaseDirectories::new().get_config_home();
    #[cfg(not(unix))]
    let config_dir = dirs::config_dir();
    config_dir.ok_or_else(|| "User-specific home directory not found".into())
}
