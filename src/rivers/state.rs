//! Flow-trend state of a river gauge
//!
//! Every raw state string published upstream maps to exactly one tag.
use serde::{Deserialize, Serialize};
use std::fmt;

/// Closed set of gauge trend states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StateTag {
    /// River level rising
    #[serde(rename = "crece")]
    Crece,

    /// River level falling
    #[serde(rename = "baja")]
    Baja,

    /// River level stable ("ESTACIONARIO")
    #[serde(rename = "estac")]
    Estac,

    /// Published explicitly as "sin estado" (S/E)
    #[serde(rename = "s/e")]
    SinEstado,

    /// Anything the source did not say in a recognised way
    #[serde(rename = "desconocido")]
    Desconocido,
}

impl StateTag {
    /// Tags that can win the per-river majority vote, in tie-break order
    pub const TREND_CANDIDATES: [StateTag; 3] = [Self::Baja, Self::Estac, Self::Crece];

    /// Maps raw state text to a tag
    ///
    /// Case-insensitive and whitespace tolerant:
    /// - `CRECE` → `Crece`, `BAJA` → `Baja` (exact)
    /// - anything starting with `ESTAC` → `Estac`
    /// - `S/E`, `SE` and spaced/dotted variants (`S / E`, `S.E.`, `S/E.`) → `SinEstado`
    /// - everything else, including empty text → `Desconocido`
    pub fn normalize(raw: &str) -> Self {
        let upper = raw.trim().to_uppercase();

        if upper == "CRECE" {
            return Self::Crece;
        }
        if upper == "BAJA" {
            return Self::Baja;
        }
        if upper.starts_with("ESTAC") {
            return Self::Estac;
        }

        let compact: String = upper
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '.')
            .collect();
        if compact == "S/E" || compact == "SE" {
            return Self::SinEstado;
        }

        Self::Desconocido
    }

    /// Serialized form, as written to snapshot files
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Crece => "crece",
            Self::Baja => "baja",
            Self::Estac => "estac",
            Self::SinEstado => "s/e",
            Self::Desconocido => "desconocido",
        }
    }

    /// Returns all tags
    pub fn all() -> [Self; 5] {
        [
            Self::Crece,
            Self::Baja,
            Self::Estac,
            Self::SinEstado,
            Self::Desconocido,
        ]
    }
}

impl fmt::Display for StateTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
