//! River observation adapter
//!
//! Turns the Prefectura Naval Argentina river heights page into a
//! `RiversReport`:
//! - Row parsing with malformed-row tolerance (`station`)
//! - Trend state normalization (`state`)
//! - Grouping by river, general state and summary statistics (`summary`)

mod state;
mod station;
mod summary;

pub use state::StateTag;
pub use station::{parse_decimal, parse_reading_time, RiverStation};
pub use summary::{general_state, group_by_river, RiverGroup, RiverSummary};

use crate::source::{first_table_rows, DocumentSource, TableSection};
use crate::text::normalize_key;
use crate::{IndicadoresError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Value of the `source` field in river reports
pub const RIVERS_SOURCE: &str = "prefectura_naval_argentina";

/// One scrape of the river heights table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiversReport {
    pub source: String,
    pub updated_at: DateTime<Utc>,
    #[serde(rename = "rios")]
    pub rivers: Vec<RiverGroup>,
}

impl RiversReport {
    pub fn new(rivers: Vec<RiverGroup>, updated_at: DateTime<Utc>) -> Self {
        Self {
            source: RIVERS_SOURCE.to_string(),
            updated_at,
            rivers,
        }
    }

    /// Finds a river by name, ignoring case and accents
    pub fn river(&self, name: &str) -> Option<&RiverGroup> {
        let wanted = normalize_key(name);
        self.rivers
            .iter()
            .find(|group| normalize_key(&group.river_name) == wanted)
    }

    /// Completes fields that reports from older scrapers leave out
    ///
    /// Stations get their group's river name and each summary recounts its
    /// `desconocido` stations.
    pub fn fill_missing_fields(&mut self) {
        for group in &mut self.rivers {
            for station in &mut group.stations {
                if station.river_name.is_empty() {
                    station.river_name = group.river_name.clone();
                }
            }
            group.summary.desconocido = group
                .stations
                .iter()
                .filter(|station| station.state == StateTag::Desconocido)
                .count();
        }
    }

    /// Total number of stations across all rivers
    pub fn station_count(&self) -> usize {
        self.rivers.iter().map(|group| group.stations.len()).sum()
    }
}

/// Parses the river heights page into river groups
///
/// Returns `None` when the document has no data table. Rows without a port
/// name or with fewer than six data cells are skipped.
pub fn parse_rivers_document(html: &str) -> Option<Vec<RiverGroup>> {
    let rows = first_table_rows(html, TableSection::Body)?;

    let mut stations = Vec::with_capacity(rows.len());
    for (position, row) in rows.iter().enumerate() {
        match RiverStation::from_row(row) {
            Some(station) => stations.push(station),
            None => tracing::debug!(
                "Skipping malformed river row {} ({} cells, header: {})",
                position,
                row.cells.len(),
                row.header.is_some()
            ),
        }
    }

    Some(group_by_river(stations))
}

/// Fetches and parses the river heights page
///
/// # Errors
///
/// - `Fetch` when the page cannot be retrieved
/// - `TableNotFound` when the page has no data table
/// - `EmptyTable` when the table has no usable station rows
pub async fn scrape_rivers<S: DocumentSource>(source: &S, url: &str) -> Result<RiversReport> {
    tracing::info!("Fetching river heights from {}", url);
    let html = source.fetch_document(url).await?;

    let rivers = parse_rivers_document(&html).ok_or_else(|| IndicadoresError::TableNotFound {
        url: url.to_string(),
    })?;

    let report = RiversReport::new(rivers, Utc::now());
    if report.station_count() == 0 {
        return Err(IndicadoresError::EmptyTable {
            url: url.to_string(),
        });
    }

    tracing::info!(
        "Parsed {} stations across {} rivers",
        report.station_count(),
        report.rivers.len()
    );

    Ok(report)
}
