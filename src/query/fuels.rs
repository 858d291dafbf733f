use crate::text::normalize_key;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One element of the fuel price snapshot
///
/// Only the fields used for filtering are typed; everything else published
/// with the record is carried through unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FuelRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provincia: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub empresa: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub combustible: Option<String>,

    /// Price per product or station, values usually numeric
    #[serde(default)]
    pub precios: Map<String, Value>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl FuelRecord {
    pub fn in_province(&self, province: &str) -> bool {
        matches_lowercase(self.provincia.as_deref(), province)
    }

    pub fn from_company(&self, company: &str) -> bool {
        matches_lowercase(self.empresa.as_deref(), company)
    }

    /// Numeric entries of `precios`; strings and nulls are ignored
    pub fn numeric_prices(&self) -> impl Iterator<Item = f64> + '_ {
        self.precios.values().filter_map(Value::as_f64)
    }
}

fn matches_lowercase(field: Option<&str>, wanted: &str) -> bool {
    field.unwrap_or_default().to_lowercase() == wanted.to_lowercase()
}

/// Mean of every numeric price for `fuel` in `province`, rounded to 2 decimals
///
/// Province and fuel names are compared with accents folded, so
/// `"Cordoba"` matches `"Córdoba"` and `"nafta-super"` matches `"Nafta Super"`.
pub fn average_price(records: &[FuelRecord], province: &str, fuel: &str) -> Option<f64> {
    let province = normalize_key(province);
    let fuel = normalize_key(fuel);

    let prices: Vec<f64> = records
        .iter()
        .filter(|record| normalize_key(record.provincia.as_deref().unwrap_or_default()) == province)
        .filter(|record| normalize_key(record.combustible.as_deref().unwrap_or_default()) == fuel)
        .flat_map(FuelRecord::numeric_prices)
        .collect();

    if prices.is_empty() {
        return None;
    }
    let mean = prices.iter().sum::<f64>() / prices.len() as f64;
    Some((mean * 100.0).round() / 100.0)
}
