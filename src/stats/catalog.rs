use std::{collections::HashMap, fs, path::Path};

use compact_str::CompactString;

use super::TableStats;
use crate::error::{AppResult, file_read_error, stats_error};

/// Table statistics read from a local catalog file.
///
/// Keys are table references (`table`, `schema.table` or
/// `database.schema.table`) compared case-insensitively.
#[derive(Debug, Clone, Default)]
pub struct FileCatalog {
    tables: HashMap<CompactString, TableStats>
}

impl FileCatalog {
    /// Load a catalog, choosing the format from the file extension.
    ///
    /// # Notes
    ///
    /// - `.json` and `.toml` are parsed as such, everything else as YAML
    pub fn load(path: &Path) -> AppResult<Self> {
        let display = path.display().to_string();
        let content = fs::read_to_string(path).map_err(|e| file_read_error(&display, e))?;
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);
        let raw: HashMap<String, TableStats> = match extension.as_deref() {
            Some("json") => serde_json::from_str(&content)
                .map_err(|e| stats_error(format!("Invalid catalog '{}': {}", display, e)))?,
            Some("toml") => toml::from_str(&content)
                .map_err(|e| stats_error(format!("Invalid catalog '{}': {}", display, e)))?,
            _ => serde_yaml::from_str(&content)
                .map_err(|e| stats_error(format!("Invalid catalog '{}': {}", display, e)))?
        };
        Ok(Self::from_entries(raw))
    }

    pub fn from_entries<K: AsRef<str>>(entries: impl IntoIterator<Item = (K, TableStats)>) -> Self {
        Self {
            tables: entries
                .into_iter()
                .map(|(name, stats)| (name.as_ref().to_lowercase().into(), stats))
                .collect()
        }
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    /// Find statistics for a reference.
    ///
    /// An exact match wins. Otherwise a less qualified reference resolves to
    /// the single key that ends with `.<reference>`; ambiguous suffixes
    /// resolve to nothing.
    pub fn get(&self, reference: &str) -> Option<TableStats> {
        let wanted = reference.to_lowercase();
        if let Some(stats) = self.tables.get(wanted.as_str()) {
            return Some(*stats);
        }
        let suffix = format!(".{}", wanted);
        let mut matches = self
            .tables
            .iter()
            .filter(|(name, _)| name.ends_with(&suffix));
        match (matches.next(), matches.next()) {
            (Some((_, stats)), None) => Some(*stats),
            _ => None
        }
    }
}
