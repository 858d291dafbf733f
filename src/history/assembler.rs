//! History assembly from dated snapshot files
//!
//! Each history file holds an array whose first element is one record. Files
//! are read one by one; a file that can't be used is skipped with a logged
//! reason and never aborts the scan.

use crate::model::{DailyObservation, MonthlyObservation, ObservationValue};
use crate::store::{Category, DataStore};
use serde_json::Value;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

/// Why a history file contributed no record
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    Unreadable(String),
    InvalidJson(String),
    NotAnArray,
    EmptyArray,
    MissingField(&'static str),
    Undated(String),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unreadable(e) => write!(f, "unreadable: {}", e),
            Self::InvalidJson(e) => write!(f, "invalid JSON: {}", e),
            Self::NotAnArray => f.write_str("top level is not an array"),
            Self::EmptyArray => f.write_str("empty array"),
            Self::MissingField(field) => write!(f, "missing field '{}'", field),
            Self::Undated(fecha) => write!(f, "unrecognised date '{}'", fecha),
        }
    }
}

/// Result of reading one history file
#[derive(Debug, Clone, PartialEq)]
pub enum FileOutcome<T> {
    Record(T),
    Skipped(SkipReason),
}

impl<T> From<Result<T, SkipReason>> for FileOutcome<T> {
    fn from(result: Result<T, SkipReason>) -> Self {
        match result {
            Ok(record) => Self::Record(record),
            Err(reason) => Self::Skipped(reason),
        }
    }
}

/// Loads the first element of a history file
fn first_element(path: &Path) -> Result<Value, SkipReason> {
    let content = fs::read_to_string(path).map_err(|e| SkipReason::Unreadable(e.to_string()))?;
    let parsed: Value =
        serde_json::from_str(&content).map_err(|e| SkipReason::InvalidJson(e.to_string()))?;

    match parsed {
        Value::Array(items) => items.into_iter().next().ok_or(SkipReason::EmptyArray),
        _ => Err(SkipReason::NotAnArray),
    }
}

fn file_stem(path: &Path) -> &str {
    path.file_stem().and_then(|stem| stem.to_str()).unwrap_or("")
}

/// Numbers stay numeric, strings are kept as text, `null` is a missing value
///
/// An absent key or any other JSON type yields `None`.
fn observation_value(value: Option<&Value>) -> Option<ObservationValue> {
    match value? {
        Value::Number(number) => number.as_f64().map(ObservationValue::Number),
        Value::String(text) => Some(ObservationValue::Text(text.clone())),
        Value::Null => Some(ObservationValue::Missing),
        _ => None,
    }
}

/// Reads an integer published either as a JSON number or numeric text
fn integer_field(value: Option<&Value>) -> Option<i64> {
    match value? {
        Value::Number(number) => number.as_i64(),
        Value::String(text) => text.trim().parse().ok(),
        _ => None,
    }
}

/// Extracts a day-granular record (ICL, UVA, UVI)
///
/// `fecha` falls back to the file stem when absent or empty.
pub fn read_daily_file(path: &Path) -> FileOutcome<DailyObservation> {
    let extract = || -> Result<DailyObservation, SkipReason> {
        let item = first_element(path)?;

        let fecha = item
            .get("fecha")
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|fecha| !fecha.is_empty())
            .unwrap_or_else(|| file_stem(path))
            .to_string();

        let valor = observation_value(item.get("valor")).ok_or(SkipReason::MissingField("valor"))?;

        let observation = DailyObservation::new(fecha, valor);
        if observation.date().is_none() {
            return Err(SkipReason::Undated(observation.fecha));
        }
        Ok(observation)
    };

    extract().into()
}

/// Extracts a month-granular IPC record
///
/// `indice_ipc` (non-null) and `mes` are required. `anio` falls back to a leading
/// four-digit year in the file stem (`2024-03.json`).
pub fn read_monthly_file(path: &Path) -> FileOutcome<MonthlyObservation> {
    let extract = || -> Result<MonthlyObservation, SkipReason> {
        let item = first_element(path)?;

        let valor = observation_value(item.get("indice_ipc"))
            .filter(|valor| *valor != ObservationValue::Missing)
            .ok_or(SkipReason::MissingField("indice_ipc"))?;

        let mes = integer_field(item.get("mes"))
            .and_then(|mes| u32::try_from(mes).ok())
            .filter(|mes| (1..=12).contains(mes))
            .ok_or(SkipReason::MissingField("mes"))?;

        let anio = integer_field(item.get("anio"))
            .and_then(|anio| i32::try_from(anio).ok())
            .or_else(|| year_from_stem(file_stem(path)))
            .ok_or(SkipReason::MissingField("anio"))?;

        let nombre_mes = item
            .get("nombre_mes")
            .and_then(Value::as_str)
            .map(str::to_string);

        Ok(MonthlyObservation {
            mes,
            anio,
            nombre_mes,
            valor,
        })
    };

    extract().into()
}

fn year_from_stem(stem: &str) -> Option<i32> {
    let digits = stem.get(..4)?;
    if !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

/// Keeps the records, logging every skipped file
fn collect_records<T>(
    category: Category,
    files: Vec<PathBuf>,
    read: impl Fn(&Path) -> FileOutcome<T>,
) -> Vec<T> {
    let mut records = Vec::with_capacity(files.len());
    for path in files {
        match read(&path) {
            FileOutcome::Record(record) => records.push(record),
            FileOutcome::Skipped(reason) => {
                tracing::warn!("Skipping {} history file {}: {}", category, path.display(), reason)
            }
        }
    }
    records
}

/// Builds the chronological history of a day-granular category
///
/// Sorted ascending by calendar date; an absent directory gives an empty
/// history.
pub fn assemble_daily(store: &DataStore, category: Category) -> Vec<DailyObservation> {
    let files = store.history_files(category);
    let mut records = collect_records(category, files, read_daily_file);
    records.sort_by_key(|record| record.date());
    tracing::debug!("Assembled {} {} records", records.len(), category);
    records
}

/// Builds the IPC history, sorted ascending by `(anio, mes)`
pub fn assemble_monthly(store: &DataStore) -> Vec<MonthlyObservation> {
    let files = store.history_files(Category::Ipc);
    let mut records = collect_records(Category::Ipc, files, read_monthly_file);
    records.sort_by_key(MonthlyObservation::period);
    tracing::debug!("Assembled {} ipc records", records.len());
    records
}
