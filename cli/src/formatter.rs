// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use std::{error::Error, io};

use colored::Colorize;
use serde::Serialize;

use crate::arg::OutputFormat;

/// Something a command prints, either as a key/value table or as JSON.
pub trait Report: Serialize {
    /// The rows of the table rendering, in display order.
    fn rows(&self) -> Vec<(String, String)>;
}

#[derive(Debug, Clone, Copy)]
pub struct ReportFormatter {
    format: OutputFormat,
    separator: &'static str,
}

impl ReportFormatter {
    pub fn new(format: OutputFormat) -> Self {
        Self {
            format,
            separator: "  ",
        }
    }

    pub fn write(&self, w: &mut impl io::Write, report: &impl Report) -> Result<(), Box<dyn Error>> {
        match self.format {
            OutputFormat::Json => {
                serde_json::to_writer_pretty(&mut *w, report)?;
                writeln!(w)?;
            }
            OutputFormat::Table => {
                let rows = report.rows();
                let width = rows.iter().map(|(key, _)| key.len()).max().unwrap_or(0);
                for (key, value) in rows {
                    let key = format!("{key:<width$}");
                    writeln!(w, "{}{}{}", key.bold(), self.separator, value)?;
                }
            }
        }
        Ok(())
    }
}

/// Renders an optional value, `-` when absent.
pub fn or_dash(value: Option<impl ToString>) -> String {
    value.map_or_else(|| "-".to_string(), |a| a.to_string())
}
