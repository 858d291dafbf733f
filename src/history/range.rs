//! Inclusive range filters over assembled histories
//!
//! Pure functions: no I/O, no errors. A bound that doesn't parse yields an
//! empty result rather than a failure.

use crate::model::{has_four_digit_year, DailyObservation, MonthlyObservation};
use chrono::NaiveDate;

/// Parses a day bound written as `YYYY-MM-DD`
pub fn parse_day_bound(bound: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(bound.trim(), "%Y-%m-%d")
        .ok()
        .filter(has_four_digit_year)
}

/// Parses a month bound written as `YYYY-MM` into the first day of that month
pub fn parse_month_bound(bound: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(&format!("{}-01", bound.trim()), "%Y-%m-%d")
        .ok()
        .filter(has_four_digit_year)
}

/// Records with `lower <= date <= upper`, bounds as `YYYY-MM-DD`
///
/// Input order is preserved. Records whose `fecha` can't be read as a date
/// are never in range.
pub fn filter_daily(history: &[DailyObservation], lower: &str, upper: &str) -> Vec<DailyObservation> {
    let (Some(lower), Some(upper)) = (parse_day_bound(lower), parse_day_bound(upper)) else {
        tracing::debug!("Ignoring range with unparseable bounds ({:?}, {:?})", lower, upper);
        return Vec::new();
    };

    history
        .iter()
        .filter(|record| {
            record
                .date()
                .is_some_and(|date| lower <= date && date <= upper)
        })
        .cloned()
        .collect()
}

/// Months with `lower <= (anio, mes) <= upper`, bounds as `YYYY-MM`
///
/// Each record is placed on the first day of its month. The result is sorted
/// by `(anio, mes)`.
pub fn filter_monthly(
    history: &[MonthlyObservation],
    lower: &str,
    upper: &str,
) -> Vec<MonthlyObservation> {
    let (Some(lower), Some(upper)) = (parse_month_bound(lower), parse_month_bound(upper)) else {
        tracing::debug!("Ignoring range with unparseable bounds ({:?}, {:?})", lower, upper);
        return Vec::new();
    };

    let mut selected: Vec<MonthlyObservation> = history
        .iter()
        .filter(|record| {
            record
                .period_start()
                .is_some_and(|start| lower <= start && start <= upper)
        })
        .cloned()
        .collect();

    selected.sort_by_key(MonthlyObservation::period);
    selected
}
