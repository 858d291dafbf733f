//! Read boundary over the data store
//!
//! Every call re-reads the files it needs. Results distinguish three cases:
//! - `Err(CategoryNotFound)`: the category has no `latest.json`
//! - `Ok(Lookup::NoData)`: the files exist but hold nothing usable
//! - `Ok(Lookup::Found(_))`: a populated result

mod fuels;

pub use fuels::{average_price, FuelRecord};

use crate::history::{assemble_daily, assemble_monthly, filter_daily, filter_monthly};
use crate::model::{DailyObservation, IpcSnapshot, MonthlyObservation};
use crate::rivers::{RiverGroup, RiversReport};
use crate::store::{Category, DataStore};
use crate::Result;
use serde_json::Value;
use std::fmt;

/// A populated result or an explicit absence of data
#[derive(Debug, Clone, PartialEq)]
pub enum Lookup<T> {
    Found(T),
    NoData,
}

impl<T> Lookup<T> {
    pub fn is_found(&self) -> bool {
        matches!(self, Self::Found(_))
    }

    pub fn into_option(self) -> Option<T> {
        match self {
            Self::Found(value) => Some(value),
            Self::NoData => None,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Lookup<U> {
        match self {
            Self::Found(value) => Lookup::Found(f(value)),
            Self::NoData => Lookup::NoData,
        }
    }
}

impl<T> From<Option<T>> for Lookup<T> {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::NoData, Self::Found)
    }
}

impl<T> Lookup<Vec<T>> {
    /// `NoData` for an empty sequence
    pub fn non_empty(items: Vec<T>) -> Self {
        if items.is_empty() {
            Self::NoData
        } else {
            Self::Found(items)
        }
    }
}

/// Day-granular series
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DailySeries {
    Icl,
    Uva,
    Uvi,
}

impl DailySeries {
    pub fn category(&self) -> Category {
        match self {
            Self::Icl => Category::Icl,
            Self::Uva => Category::Uva,
            Self::Uvi => Category::Uvi,
        }
    }

    pub fn from_category(category: Category) -> Option<Self> {
        match category {
            Category::Icl => Some(Self::Icl),
            Category::Uva => Some(Self::Uva),
            Category::Uvi => Some(Self::Uvi),
            Category::Combustibles | Category::Ipc | Category::Rios => None,
        }
    }
}

impl fmt::Display for DailySeries {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.category().fmt(f)
    }
}

/// Query service for all published categories
#[derive(Debug, Clone)]
pub struct Indicators {
    store: DataStore,
}

impl Indicators {
    pub fn new(store: DataStore) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &DataStore {
        &self.store
    }

    /// Current reading of a daily series
    pub fn current(&self, series: DailySeries) -> Result<Lookup<DailyObservation>> {
        let latest = self.store.read_latest::<DailyObservation>(series.category())?;
        Ok(Lookup::from(latest))
    }

    /// Full history of a daily series, ascending by date
    pub fn history(&self, series: DailySeries) -> Lookup<Vec<DailyObservation>> {
        Lookup::non_empty(assemble_daily(&self.store, series.category()))
    }

    /// History records within `[lower, upper]`, bounds as `YYYY-MM-DD`
    ///
    /// Unparseable bounds select nothing and give `NoData`.
    pub fn range(&self, series: DailySeries, lower: &str, upper: &str) -> Lookup<Vec<DailyObservation>> {
        let history = assemble_daily(&self.store, series.category());
        Lookup::non_empty(filter_daily(&history, lower, upper))
    }

    pub fn ipc_current(&self) -> Result<Lookup<IpcSnapshot>> {
        let latest = self.store.read_latest::<IpcSnapshot>(Category::Ipc)?;
        Ok(Lookup::from(latest))
    }

    /// IPC history, ascending by `(anio, mes)`
    pub fn ipc_history(&self) -> Lookup<Vec<MonthlyObservation>> {
        Lookup::non_empty(assemble_monthly(&self.store))
    }

    /// IPC months within `[lower, upper]`, bounds as `YYYY-MM`
    pub fn ipc_range(&self, lower: &str, upper: &str) -> Lookup<Vec<MonthlyObservation>> {
        let history = assemble_monthly(&self.store);
        Lookup::non_empty(filter_monthly(&history, lower, upper))
    }

    /// Latest river heights report
    pub fn rivers(&self) -> Result<Lookup<RiversReport>> {
        let mut latest = self.store.read_latest::<RiversReport>(Category::Rios)?;
        if let Some(report) = latest.as_mut() {
            report.fill_missing_fields();
        }
        Ok(Lookup::from(latest))
    }

    /// One river of the latest report, matched ignoring case and accents
    pub fn river(&self, name: &str) -> Result<Lookup<RiverGroup>> {
        let report = match self.rivers()? {
            Lookup::Found(report) => report,
            Lookup::NoData => return Ok(Lookup::NoData),
        };
        Ok(report.river(name).cloned().into())
    }

    /// Every record of the fuel price snapshot
    ///
    /// Elements that don't look like fuel records are skipped with a warning.
    pub fn fuels(&self) -> Result<Lookup<Vec<FuelRecord>>> {
        let elements = self.store.read_latest_array(Category::Combustibles)?;
        Ok(Lookup::non_empty(parse_fuel_records(elements)))
    }

    /// Fuel records of one province (case-insensitive)
    pub fn fuels_by_province(&self, province: &str) -> Result<Lookup<Vec<FuelRecord>>> {
        self.filtered_fuels(|record| record.in_province(province))
    }

    /// Fuel records of one company (case-insensitive)
    pub fn fuels_by_company(&self, company: &str) -> Result<Lookup<Vec<FuelRecord>>> {
        self.filtered_fuels(|record| record.from_company(company))
    }

    /// Average price of `fuel` in `province`, rounded to 2 decimals
    pub fn average_fuel_price(&self, province: &str, fuel: &str) -> Result<Lookup<f64>> {
        let records = self.fuels()?.into_option().unwrap_or_default();
        Ok(average_price(&records, province, fuel).into())
    }

    fn filtered_fuels(&self, keep: impl Fn(&FuelRecord) -> bool) -> Result<Lookup<Vec<FuelRecord>>> {
        let records = match self.fuels()? {
            Lookup::Found(records) => records,
            Lookup::NoData => return Ok(Lookup::NoData),
        };
        Ok(Lookup::non_empty(records.into_iter().filter(|record| keep(record)).collect()))
    }
}

fn parse_fuel_records(elements: Vec<Value>) -> Vec<FuelRecord> {
    elements
        .into_iter()
        .enumerate()
        .filter_map(|(index, element)| match serde_json::from_value(element) {
            Ok(record) => Some(record),
            Err(e) => {
                tracing::warn!("Skipping combustibles element {}: {}", index, e);
                None
            }
        })
        .collect()
}
