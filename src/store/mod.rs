//! Snapshot/history file store
//!
//! Layout under the data root, one directory per category:
//!
//! ```text
//! <data-dir>/<category>/latest.json      array; first element is the current snapshot
//! <data-dir>/<category>/<stem>.json      dated history files, same element shape
//! ```
//!
//! Files are immutable once written. Writes go to a temporary file that is
//! renamed into place, so readers see either the old or the new file.

mod category;

pub use category::{Category, Granularity};

use crate::{IndicadoresError, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

/// Name of the current-snapshot file in every category directory
pub const LATEST_FILE: &str = "latest.json";

/// Handle on a data root directory
///
/// Holds no cached state: every read goes to the file system.
#[derive(Debug, Clone)]
pub struct DataStore {
    root: PathBuf,
}

impl DataStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn category_dir(&self, category: Category) -> PathBuf {
        self.root.join(category.dir_name())
    }

    pub fn latest_path(&self, category: Category) -> PathBuf {
        self.category_dir(category).join(LATEST_FILE)
    }

    /// Reads the whole `latest.json` array
    ///
    /// # Errors
    ///
    /// - `CategoryNotFound` when the category has no `latest.json`
    /// - `Io`/`Json` when the file can't be read or isn't a JSON array
    pub fn read_latest_array(&self, category: Category) -> Result<Vec<Value>> {
        let path = self.latest_path(category);
        if !path.is_file() {
            return Err(IndicadoresError::CategoryNotFound {
                category: category.to_string(),
            });
        }

        let content = fs::read_to_string(&path)?;
        let records: Vec<Value> = serde_json::from_str(&content)?;
        Ok(records)
    }

    /// Reads the first element of `latest.json`
    ///
    /// Returns `Ok(None)` when the array is empty.
    pub fn read_latest<T: DeserializeOwned>(&self, category: Category) -> Result<Option<T>> {
        let first = self.read_latest_array(category)?.into_iter().next();
        match first {
            Some(value) => Ok(Some(serde_json::from_value(value)?)),
            None => Ok(None),
        }
    }

    /// Lists the dated history files of a category
    ///
    /// Every `*.json` except `latest.json`, sorted by file name. A missing
    /// directory yields an empty list.
    pub fn history_files(&self, category: Category) -> Vec<PathBuf> {
        let dir = self.category_dir(category);
        let entries = match fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(e) => {
                if dir.exists() {
                    tracing::warn!("Cannot list {}: {}", dir.display(), e);
                }
                return Vec::new();
            }
        };

        let mut files: Vec<PathBuf> = entries
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| is_history_file(path))
            .collect();
        files.sort();
        files
    }

    /// Writes `records` as the dated file `<stem>.json` and as `latest.json`
    ///
    /// Returns the path of the dated file.
    pub fn write_snapshot<T: Serialize>(
        &self,
        category: Category,
        stem: &str,
        records: &[T],
    ) -> Result<PathBuf> {
        validate_stem(stem)?;

        let dated = self.category_dir(category).join(format!("{}.json", stem));
        write_json_atomic(&dated, records)?;
        self.write_latest(category, records)?;

        tracing::info!("Wrote {} and {}", dated.display(), LATEST_FILE);
        Ok(dated)
    }

    /// Replaces `latest.json` only
    pub fn write_latest<T: Serialize>(&self, category: Category, records: &[T]) -> Result<()> {
        write_json_atomic(&self.latest_path(category), records)
    }
}

fn is_history_file(path: &Path) -> bool {
    path.is_file()
        && path.extension().and_then(|ext| ext.to_str()) == Some("json")
        && path.file_name().and_then(|name| name.to_str()) != Some(LATEST_FILE)
}

/// Rejects stems that would escape the category directory or clobber `latest.json`
fn validate_stem(stem: &str) -> Result<()> {
    let valid = !stem.is_empty()
        && stem != "latest"
        && !stem.starts_with('.')
        && stem
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');

    if valid {
        Ok(())
    } else {
        Err(IndicadoresError::InvalidSnapshotName(stem.to_string()))
    }
}

/// Serializes `value` to a sibling temp file, then renames it over `path`
fn write_json_atomic<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let tmp = path.with_extension("json.tmp");
    let content = serde_json::to_string_pretty(value)?;
    fs::write(&tmp, content)?;
    fs::rename(&tmp, path)?;
    Ok(())
}
