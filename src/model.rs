//! Observation records shared by the adapters, the store and the query layer
//!
//! Field names follow the published JSON files (`fecha`, `valor`, `mes`, ...),
//! which are consumed by other tools and must not change.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Date layouts accepted for day-granular records, tried in order
const RECORD_DATE_FORMATS: [&str; 3] = ["%d/%m/%Y", "%Y-%m-%d", "%d-%m-%Y"];

/// Parses a record date written as `DD/MM/YYYY`, `YYYY-MM-DD` or `DD-MM-YYYY`
///
/// The year must have four digits: `%Y` alone would read `05/01/24` as year 24.
pub fn parse_record_date(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    RECORD_DATE_FORMATS
        .iter()
        .find_map(|format| {
            NaiveDate::parse_from_str(text, format)
                .ok()
                .filter(has_four_digit_year)
        })
}

/// Rejects dates whose `%Y` field was written with fewer than four digits
pub fn has_four_digit_year(date: &NaiveDate) -> bool {
    (1000..=9999).contains(&date.year())
}

/// Indicator value: numeric when the source text parsed, verbatim text otherwise
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ObservationValue {
    Number(f64),
    Text(String),
    /// Published as JSON `null`
    Missing,
}

impl ObservationValue {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(value) => Some(*value),
            Self::Text(_) | Self::Missing => None,
        }
    }
}

impl From<f64> for ObservationValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl fmt::Display for ObservationValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(value) => write!(f, "{}", value),
            Self::Text(text) => f.write_str(text),
            Self::Missing => f.write_str("null"),
        }
    }
}

/// One reading of a day-granular indicator (ICL, UVA, UVI)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyObservation {
    /// Date as published, usually `DD/MM/YYYY`
    pub fecha: String,

    pub valor: ObservationValue,

    /// Indicator label, present on freshly scraped UVA/UVI readings
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub descripcion: Option<String>,
}

impl DailyObservation {
    pub fn new(fecha: impl Into<String>, valor: impl Into<ObservationValue>) -> Self {
        Self {
            fecha: fecha.into(),
            valor: valor.into(),
            descripcion: None,
        }
    }

    pub fn with_description(mut self, descripcion: impl Into<String>) -> Self {
        self.descripcion = Some(descripcion.into());
        self
    }

    /// Calendar date of the reading, if `fecha` is in a known layout
    pub fn date(&self) -> Option<NaiveDate> {
        parse_record_date(&self.fecha)
    }
}

/// One month of the consumer price index, as assembled into history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyObservation {
    pub mes: u32,
    pub anio: i32,
    #[serde(default)]
    pub nombre_mes: Option<String>,
    pub valor: ObservationValue,
}

impl MonthlyObservation {
    /// First day of the observed month
    pub fn period_start(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.anio, self.mes, 1)
    }

    /// Sort key: `(year, month)`
    pub fn period(&self) -> (i32, u32) {
        (self.anio, self.mes)
    }
}

/// Current IPC snapshot element, with any extra published fields kept as-is
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IpcSnapshot {
    pub mes: u32,
    pub anio: i32,
    #[serde(default)]
    pub nombre_mes: Option<String>,
    pub indice_ipc: ObservationValue,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
