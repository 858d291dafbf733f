use std::fmt;
use std::str::FromStr;

/// Dataset published under its own directory of the data root
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Combustibles,
    Icl,
    Ipc,
    Uvi,
    Uva,
    Rios,
}

/// How records of a category are keyed in time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Granularity {
    /// One record per calendar day (`fecha`)
    Daily,
    /// One record per `(anio, mes)`
    Monthly,
    /// Whole-document snapshots without a history series
    Snapshot,
}

impl Category {
    /// Directory name under the data root
    pub fn dir_name(&self) -> &'static str {
        match self {
            Self::Combustibles => "combustibles",
            Self::Icl => "icl",
            Self::Ipc => "ipc",
            Self::Uvi => "uvi",
            Self::Uva => "uva",
            Self::Rios => "rios",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "combustibles" => Some(Self::Combustibles),
            "icl" => Some(Self::Icl),
            "ipc" => Some(Self::Ipc),
            "uvi" => Some(Self::Uvi),
            "uva" => Some(Self::Uva),
            "rios" => Some(Self::Rios),
            _ => None,
        }
    }

    pub fn granularity(&self) -> Granularity {
        match self {
            Self::Icl | Self::Uvi | Self::Uva => Granularity::Daily,
            Self::Ipc => Granularity::Monthly,
            Self::Combustibles | Self::Rios => Granularity::Snapshot,
        }
    }

    /// Returns all categories
    pub fn all() -> [Self; 6] {
        [
            Self::Combustibles,
            Self::Icl,
            Self::Ipc,
            Self::Uvi,
            Self::Uva,
            Self::Rios,
        ]
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.dir_name())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s).ok_or_else(|| {
            let known: Vec<&str> = Self::all().iter().map(|c| c.dir_name()).collect();
            format!("unknown category '{}' (expected one of: {})", s, known.join(", "))
        })
    }
}
