//! History assembly and range queries
//!
//! A category's history is the union of its dated files: one file, one
//! record. Files that can't be read are skipped with a warning so a single
//! corrupt snapshot never hides the rest of the series.

mod assembler;
mod range;

pub use assembler::{
    assemble_daily, assemble_monthly, read_daily_file, read_monthly_file, FileOutcome, SkipReason,
};
pub use range::{filter_daily, filter_monthly, parse_day_bound, parse_month_bound};
