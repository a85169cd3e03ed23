// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Command-line front end of the Tempora recurrence-expression engine.

mod arg;
mod cli;
mod cmd_describe;
mod cmd_generate;
mod cmd_generate_completion;
mod cmd_next;
mod cmd_to_cron;
mod cmd_validate;
mod config;
mod formatter;

pub use crate::arg::OutputFormat;
pub use crate::cli::{Cli, Commands, run};
pub use crate::config::{Config, ConfigOverrides, parse_config};
