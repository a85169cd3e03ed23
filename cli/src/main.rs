// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Tempora - inspect, generate and schedule recurrence expressions

use std::process::ExitCode;

use tempora_cli::run;

#[tokio::main]
async fn main() -> ExitCode {
    run().await
}
