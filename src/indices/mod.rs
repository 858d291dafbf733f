//! UVA/UVI index adapters
//!
//! Both indicators are published as rows of the BCRA main indicators table.
//! This module selects the right row, parses the Spanish-formatted value and
//! merges the reading into an append-only history.

mod extract;
mod merge;

pub use extract::{extract_observation, parse_index_value};
pub use merge::{merge_observation, MergeOutcome};

use crate::model::DailyObservation;
use crate::source::{first_table_rows, DocumentSource, TableSection};
use crate::store::Category;
use crate::{IndicadoresError, Result};
use std::fmt;

/// Indicators scraped from the BCRA table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IndexKind {
    /// Unidad de Valor Adquisitivo
    Uva,
    /// Unidad de Vivienda
    Uvi,
}

impl IndexKind {
    /// Phrase that distinguishes this indicator's row
    pub fn marker(&self) -> &'static str {
        match self {
            Self::Uva => "Unidad de Valor Adquisitivo",
            Self::Uvi => "Unidad de Vivienda",
        }
    }

    /// Short code that must also appear in the row description
    pub fn code(&self) -> &'static str {
        match self {
            Self::Uva => "UVA",
            Self::Uvi => "UVI",
        }
    }

    /// Label stored in `descripcion`
    pub fn description(&self) -> &'static str {
        match self {
            Self::Uva => "Unidad de Valor Adquisitivo (UVA)",
            Self::Uvi => "Unidad de Vivienda (UVI)",
        }
    }

    pub fn category(&self) -> Category {
        match self {
            Self::Uva => Category::Uva,
            Self::Uvi => Category::Uvi,
        }
    }
}

impl fmt::Display for IndexKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Fetches the indicators page and extracts the current reading for `kind`
///
/// # Errors
///
/// - `Fetch` when the page cannot be retrieved
/// - `TableNotFound` when the page has no table
/// - `IndicatorNotFound` when no row describes `kind`
pub async fn scrape_index<S: DocumentSource>(
    source: &S,
    url: &str,
    kind: IndexKind,
) -> Result<DailyObservation> {
    tracing::info!("Fetching {} from {}", kind, url);
    let html = source.fetch_document(url).await?;

    let rows = first_table_rows(&html, TableSection::All).ok_or_else(|| {
        IndicadoresError::TableNotFound {
            url: url.to_string(),
        }
    })?;

    let observation = extract_observation(&rows, kind).ok_or_else(|| {
        IndicadoresError::IndicatorNotFound {
            indicator: kind.code().to_string(),
        }
    })?;

    tracing::info!("{} {} = {}", kind, observation.fecha, observation.valor);
    Ok(observation)
}
