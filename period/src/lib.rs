// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Parse, validate and describe recurrence expressions.
//!
//! Two dialects are understood:
//!
//! - cron expressions, in the Unix (5 fields) or Quartz (6 or 7 fields) arrangement;
//! - a constrained subset of ISO 8601 durations (`P1D`, `P2W`, `P3M`, `PT4H`, `PT30M`).
//!
//! The [`handle`] dispatcher picks the dialect able to read a raw string and returns a
//! [`PeriodExpression`] exposing the shared query surface of [`PeriodExpressionHandler`].
//!
//! ```
//! use tempora_period::{PeriodExpressionHandler, RecurrenceMagnitude, handle};
//!
//! let expr = handle(Some("0 30 16 * * 1#3")).unwrap();
//! assert!(expr.is_valid());
//! assert!(expr.is_ui_supported());
//! assert_eq!(expr.recurrence_magnitude(), RecurrenceMagnitude::Monthly);
//!
//! assert!(handle(Some("not a valid expr")).is_none());
//! ```

#![warn(
    trivial_casts,
    trivial_numeric_casts,
    missing_copy_implementations,
    missing_debug_implementations,
    missing_docs,
    unsafe_code,
    unstable_features,
    unused_import_braces,
    unused_qualifications,
    clippy::dbg_macro,
    clippy::indexing_slicing,
    clippy::pedantic
)]
// Allow certain clippy lints that are too restrictive for this crate
#![allow(
    clippy::module_name_repetitions,
    clippy::similar_names,
    clippy::single_match_else,
    clippy::match_bool
)]

pub mod cron;
pub mod describe;
pub mod frequency;
mod handler;
pub mod iso8601;

pub use crate::cron::{
    Arrangement, Cron, CronParseError, CronParser, Field, FieldMask, FieldParser, FieldPosition,
    Occurrences, WellKnownMasks, WellKnownRanges, can_handle_expression,
    generate_daily_cron_expression, generate_hourly_cron_expression,
    generate_monthly_cron_expression, generate_weekly_cron_expression,
};
pub use crate::describe::Locale;
pub use crate::frequency::{ScheduleError, ScheduleFrequency, cron_expression_for};
pub use crate::handler::{
    PeriodExpression, PeriodExpressionHandler, RecurrenceMagnitude, RecurrenceTime, handle,
};
pub use crate::iso8601::{Iso8601Period, PeriodUnit};
