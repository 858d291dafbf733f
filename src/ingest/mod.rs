//! Ingestion runs
//!
//! One run fetches one source page, turns it into records and writes them to
//! the store. A run either completes or fails as a whole: nothing is written
//! when the fetch or the table parse fails.

use crate::config::{Config, SourcesConfig};
use crate::history::assemble_daily;
use crate::indices::{merge_observation, scrape_index, IndexKind, MergeOutcome};
use crate::model::DailyObservation;
use crate::rivers::scrape_rivers;
use crate::source::{DocumentSource, FetchError, HttpFetcher};
use crate::store::{Category, DataStore};
use crate::Result;
use chrono::{NaiveDate, Utc};
use std::path::PathBuf;

/// Layout of dated history file stems
const STEM_FORMAT: &str = "%Y-%m-%d";

/// What an ingestion run wrote
#[derive(Debug, Clone, PartialEq)]
pub struct IngestReport {
    pub category: Category,
    /// Dated history file, when one was written
    pub history_file: Option<PathBuf>,
    pub latest_file: PathBuf,
    /// Records now in the published series, or stations for rivers
    pub records: usize,
}

/// Runs ingestions against a document source and a data store
pub struct Ingestor<S> {
    source: S,
    store: DataStore,
    sources: SourcesConfig,
}

impl Ingestor<HttpFetcher> {
    /// Creates an ingestor that fetches over HTTP as configured
    pub fn from_config(config: &Config) -> std::result::Result<Self, FetchError> {
        let fetcher = HttpFetcher::from_config(&config.fetch)?;
        Ok(Self::new(
            fetcher,
            DataStore::new(&config.storage.data_dir),
            config.sources.clone(),
        ))
    }
}

impl<S: DocumentSource> Ingestor<S> {
    pub fn new(source: S, store: DataStore, sources: SourcesConfig) -> Self {
        Self {
            source,
            store,
            sources,
        }
    }

    pub fn store(&self) -> &DataStore {
        &self.store
    }

    /// Scrapes the river heights page and publishes the report
    ///
    /// The report is written as `rios/<YYYY-MM-DD>.json`, dated by its
    /// `updated_at` in UTC, and as `rios/latest.json`.
    pub async fn rivers(&self) -> Result<IngestReport> {
        let report = scrape_rivers(&self.source, &self.sources.rios_url).await?;
        let stem = report.updated_at.format(STEM_FORMAT).to_string();

        let dated = self
            .store
            .write_snapshot(Category::Rios, &stem, std::slice::from_ref(&report))?;

        Ok(IngestReport {
            category: Category::Rios,
            history_file: Some(dated),
            latest_file: self.store.latest_path(Category::Rios),
            records: report.station_count(),
        })
    }

    /// Scrapes one BCRA index and merges it into that index's history
    ///
    /// # Arguments
    ///
    /// * `kind` - Which index row to read
    ///
    /// # Returns
    ///
    /// * `Ok(IngestReport)` - `latest.json` refreshed; `history_file` is set
    ///   only when the reading was new
    /// * `Err(IndicadoresError)` - Fetch, table or write failure
    pub async fn index(&self, kind: IndexKind) -> Result<IngestReport> {
        let category = kind.category();
        let observation = scrape_index(&self.source, &self.sources.bcra_url, kind).await?;

        let history = assemble_daily(&self.store, category);
        let (merged, outcome) = merge_observation(history, observation.clone());

        let history_file = match outcome {
            MergeOutcome::Appended => {
                let stem = stem_for(&observation, Utc::now().date_naive());
                let path = self
                    .store
                    .write_snapshot(category, &stem, std::slice::from_ref(&observation))?;
                Some(path)
            }
            MergeOutcome::AlreadyPresent => {
                self.store
                    .write_latest(category, std::slice::from_ref(&observation))?;
                None
            }
        };

        Ok(IngestReport {
            category,
            history_file,
            latest_file: self.store.latest_path(category),
            records: merged.len(),
        })
    }
}

/// File stem for a daily reading: its own date, or `today` when undated
fn stem_for(observation: &DailyObservation, today: NaiveDate) -> String {
    observation
        .date()
        .unwrap_or(today)
        .format(STEM_FORMAT)
        .to_string()
}
