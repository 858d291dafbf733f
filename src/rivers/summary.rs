//! River grouping and per-river aggregation
//!
//! Stations are grouped by river name in first-seen order, and each group
//! gets a general state and summary statistics.

use crate::rivers::state::StateTag;
use crate::rivers::station::RiverStation;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Per-river counts and height statistics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiverSummary {
    #[serde(rename = "puertos_total")]
    pub station_count: usize,

    pub crece: usize,
    pub baja: usize,
    pub estac: usize,
    #[serde(rename = "s/e")]
    pub sin_estado: usize,
    #[serde(default)]
    pub desconocido: usize,

    /// Mean of the published heights, rounded to 2 decimals
    #[serde(rename = "altura_promedio_m")]
    pub mean_height_m: Option<f64>,

    #[serde(rename = "altura_max_m")]
    pub max_height_m: Option<f64>,

    #[serde(rename = "altura_min_m")]
    pub min_height_m: Option<f64>,
}

impl RiverSummary {
    /// Computes the summary for one river's stations
    ///
    /// Height statistics only consider stations with a numeric height and are
    /// `None` when no station has one.
    pub fn from_stations(stations: &[RiverStation]) -> Self {
        let count = |tag: StateTag| stations.iter().filter(|s| s.state == tag).count();

        let heights: Vec<f64> = stations.iter().filter_map(|s| s.height_m).collect();
        let (mean, max, min) = if heights.is_empty() {
            (None, None, None)
        } else {
            let sum: f64 = heights.iter().sum();
            let mean = round_2(sum / heights.len() as f64);
            let max = heights.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            let min = heights.iter().copied().fold(f64::INFINITY, f64::min);
            (Some(mean), Some(max), Some(min))
        };

        Self {
            station_count: stations.len(),
            crece: count(StateTag::Crece),
            baja: count(StateTag::Baja),
            estac: count(StateTag::Estac),
            sin_estado: count(StateTag::SinEstado),
            desconocido: count(StateTag::Desconocido),
            mean_height_m: mean,
            max_height_m: max,
            min_height_m: min,
        }
    }

    /// Number of stations carrying `tag`
    pub fn count(&self, tag: StateTag) -> usize {
        match tag {
            StateTag::Crece => self.crece,
            StateTag::Baja => self.baja,
            StateTag::Estac => self.estac,
            StateTag::SinEstado => self.sin_estado,
            StateTag::Desconocido => self.desconocido,
        }
    }
}

/// All stations of one river plus derived data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiverGroup {
    #[serde(rename = "nombre")]
    pub river_name: String,

    #[serde(rename = "estado_general")]
    pub general_state: StateTag,

    #[serde(rename = "puertos")]
    pub stations: Vec<RiverStation>,

    #[serde(rename = "resumen")]
    pub summary: RiverSummary,
}

impl RiverGroup {
    pub fn new(river_name: String, stations: Vec<RiverStation>) -> Self {
        let summary = RiverSummary::from_stations(&stations);
        let general_state = general_state(&summary);
        Self {
            river_name,
            general_state,
            stations,
            summary,
        }
    }
}

/// Classifies a river from its station counts
///
/// 1. More than half of the stations `s/e` → `SinEstado`
/// 2. Otherwise the most frequent of `baja`, `estac`, `crece`; ties go to the
///    earliest in that order
/// 3. No station in any of those three → `Desconocido`
pub fn general_state(summary: &RiverSummary) -> StateTag {
    if summary.station_count > 0 && summary.sin_estado * 2 > summary.station_count {
        return StateTag::SinEstado;
    }

    let mut best: Option<(StateTag, usize)> = None;
    for tag in StateTag::TREND_CANDIDATES {
        let count = summary.count(tag);
        if count == 0 {
            continue;
        }
        match best {
            Some((_, best_count)) if best_count >= count => {}
            _ => best = Some((tag, count)),
        }
    }

    best.map(|(tag, _)| tag).unwrap_or(StateTag::Desconocido)
}

/// Groups stations by river, keeping first-seen order of rivers and stations
pub fn group_by_river(stations: Vec<RiverStation>) -> Vec<RiverGroup> {
    let mut order: Vec<(String, Vec<RiverStation>)> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for station in stations {
        match index.get(&station.river_name) {
            Some(&position) => order[position].1.push(station),
            None => {
                index.insert(station.river_name.clone(), order.len());
                order.push((station.river_name.clone(), vec![station]));
            }
        }
    }

    order
        .into_iter()
        .map(|(river_name, stations)| RiverGroup::new(river_name, stations))
        .collect()
}

fn round_2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
