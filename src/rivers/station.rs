//! Per-gauge row parsing
//!
//! Cell layout of a data row: `<th>` port name, then `<td>` cells for river,
//! height, variation, period, reading date/time and state.

use crate::rivers::state::StateTag;
use crate::source::TableRow;
use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

const MIN_DATA_CELLS: usize = 6;

/// Three-letter English month abbreviations used in reading timestamps
const MONTH_ABBREVIATIONS: [&str; 12] = [
    "JAN", "FEB", "MAR", "APR", "MAY", "JUN", "JUL", "AUG", "SEP", "OCT", "NOV", "DEC",
];

/// One gauge reading from the river heights table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiverStation {
    #[serde(rename = "nombre")]
    pub port_name: String,

    /// Absent in reports written by older scrapers; filled from the group on read
    #[serde(rename = "rio", default)]
    pub river_name: String,

    #[serde(rename = "altura_m")]
    pub height_m: Option<f64>,

    #[serde(rename = "variacion_m")]
    pub variation_m: Option<f64>,

    #[serde(rename = "periodo")]
    pub period: String,

    #[serde(rename = "fecha")]
    pub date: Option<NaiveDate>,

    /// Reading time as `HH:MM`
    #[serde(rename = "hora")]
    pub time: Option<String>,

    #[serde(rename = "estado")]
    pub state: StateTag,

    /// State text exactly as published
    #[serde(rename = "estado_raw", default)]
    pub state_raw: Option<String>,
}

impl RiverStation {
    /// Builds a station from a table row
    ///
    /// Returns `None` for rows without a header cell or with fewer than six
    /// data cells. Unparseable numbers and timestamps become `None` fields
    /// instead of rejecting the row.
    pub fn from_row(row: &TableRow) -> Option<Self> {
        let port_name = row.header.as_ref()?;
        if row.cells.len() < MIN_DATA_CELLS {
            return None;
        }

        let (date, time) = match parse_reading_time(&row.cells[4]) {
            Some((date, time)) => (Some(date), Some(time.format("%H:%M").to_string())),
            None => (None, None),
        };

        let state_raw = row.cells[5].trim();

        Some(Self {
            port_name: port_name.clone(),
            river_name: row.cells[0].clone(),
            height_m: parse_decimal(&row.cells[1]),
            variation_m: parse_decimal(&row.cells[2]),
            period: row.cells[3].clone(),
            date,
            time,
            state: StateTag::normalize(state_raw),
            state_raw: (!state_raw.is_empty()).then(|| state_raw.to_string()),
        })
    }
}

/// Parses a gauge number such as `"3,25"` or `"-0,04"`
///
/// `S/E`, `-` and empty text mean "no reading"; any other unparseable text
/// is also `None`.
pub fn parse_decimal(text: &str) -> Option<f64> {
    let text = text.trim();
    if matches!(text.to_uppercase().as_str(), "S/E" | "-" | "") {
        return None;
    }

    text.replace(',', ".")
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
}

/// Parses a reading timestamp in the form `DD/MON/YY - HHMM`
///
/// Two-digit years are in the 2000s. Returns `None` for anything malformed.
///
/// # Example
///
/// ```
/// use chrono::{NaiveDate, NaiveTime};
/// use indicadores::rivers::parse_reading_time;
///
/// let (date, time) = parse_reading_time("25/JAN/26 - 0900").unwrap();
/// assert_eq!(date, NaiveDate::from_ymd_opt(2026, 1, 25).unwrap());
/// assert_eq!(time, NaiveTime::from_hms_opt(9, 0, 0).unwrap());
/// ```
pub fn parse_reading_time(raw: &str) -> Option<(NaiveDate, NaiveTime)> {
    let (date_part, time_part) = raw.split_once('-')?;
    if time_part.contains('-') {
        return None;
    }

    let mut pieces = date_part.trim().split('/');
    let day = pieces.next()?.trim();
    let month = pieces.next()?.trim();
    let year = pieces.next()?.trim();
    if pieces.next().is_some() || year.len() != 2 {
        return None;
    }

    let day: u32 = day.parse().ok()?;
    let month = month_number(month)?;
    let year: i32 = year.parse().ok()?;
    let date = NaiveDate::from_ymd_opt(2000 + year, month, day)?;

    let digits: String = time_part.trim().chars().filter(|c| *c != ':').collect();
    if digits.len() != 4 || !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    let hour: u32 = digits[..2].parse().ok()?;
    let minute: u32 = digits[2..].parse().ok()?;
    let time = NaiveTime::from_hms_opt(hour, minute, 0)?;

    Some((date, time))
}

fn month_number(abbreviation: &str) -> Option<u32> {
    let upper = abbreviation.to_uppercase();
    MONTH_ABBREVIATIONS
        .iter()
        .position(|m| *m == upper)
        .map(|index| index as u32 + 1)
}
