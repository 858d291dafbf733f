//! Row selection and value parsing for the BCRA indicators table
//!
//! Each row of the table is `description | date | value`.

use crate::indices::IndexKind;
use crate::model::{DailyObservation, ObservationValue};
use crate::source::TableRow;

const MIN_CELLS: usize = 3;

/// Parses a value published with Spanish separators (`1.234,56`)
///
/// Thousands separators are dropped and the decimal comma becomes a point.
/// Text that still doesn't parse is kept verbatim as `ObservationValue::Text`.
pub fn parse_index_value(text: &str) -> ObservationValue {
    let normalized = text.trim().replace('.', "").replace(',', ".");
    match normalized.parse::<f64>() {
        Ok(value) if value.is_finite() => ObservationValue::Number(value),
        _ => ObservationValue::Text(text.to_string()),
    }
}

/// Returns true if a description cell belongs to `kind`
fn describes(description: &str, kind: IndexKind) -> bool {
    description.contains(kind.marker()) && description.contains(kind.code())
}

/// Picks the current observation for `kind` out of the table rows
///
/// The first row with at least three cells whose description contains both
/// the indicator's phrase and its short code wins. `None` if no row matches.
pub fn extract_observation(rows: &[TableRow], kind: IndexKind) -> Option<DailyObservation> {
    let row = rows
        .iter()
        .filter(|row| row.cells.len() >= MIN_CELLS)
        .find(|row| describes(&row.cells[0], kind))?;

    Some(
        DailyObservation::new(row.cells[1].clone(), parse_index_value(&row.cells[2]))
            .with_description(kind.description()),
    )
}
