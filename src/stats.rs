//! Table statistics enrichment.
//!
//! Reports can list row counts and sizes of the tables a query references.
//! The statistics come from an external metadata collaborator that this crate
//! treats as opaque:
//!
//! | Source | Lookup |
//! |--------|--------|
//! | Catalog file | `.yaml`, `.yml`, `.json` or `.toml` map of reference to stats |
//! | Metadata service | `GET {base_url}/tables/{reference}` returning JSON |
//!
//! Enrichment never fails a report. Any lookup problem is logged as a warning
//! and the table is rendered as unavailable.
//!
//! # Example
//!
//! ```
//! use query_cost_estimator::stats::TableStats;
//!
//! let stats = TableStats {
//!     row_count: 1_000,
//!     bytes:     3 * 1024 * 1024 * 1024
//! };
//! assert_eq!(stats.size_gb(), 3.0);
//! ```

mod catalog;
mod remote;

use std::{path::PathBuf, sync::OnceLock, time::Duration};

pub use catalog::FileCatalog;
use compact_str::CompactString;
use indexmap::{IndexMap, IndexSet};
pub use remote::RemoteCatalog;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::{
    cache::{cache_stats, get_cached},
    config::{RetryConfig, StatsConfig}
};

const BYTES_PER_GB: f64 = 1024.0 * 1024.0 * 1024.0;

/// Row count and storage size of a table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableStats {
    #[serde(default)]
    pub row_count: u64,
    #[serde(default, alias = "size_bytes")]
    pub bytes:     u64
}

impl TableStats {
    /// Size in GiB rounded to two decimals
    pub fn size_gb(&self) -> f64 {
        (self.bytes as f64 / BYTES_PER_GB * 100.0).round() / 100.0
    }
}

/// Statistics for one reference, or the fact that none could be obtained.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum TableStatsEntry {
    Available(TableStats),
    Unavailable
}

/// Where table statistics are looked up.
#[derive(Debug, Clone)]
pub enum StatsSource {
    /// Local catalog file
    Catalog(PathBuf),
    /// HTTP metadata service
    Remote {
        base_url: String,
        timeout:  Duration,
        retry:    RetryConfig
    }
}

impl StatsSource {
    /// Pick a source from configuration; a catalog file wins over a URL.
    pub fn from_config(stats: &StatsConfig, retry: &RetryConfig) -> Option<Self> {
        if let Some(file) = &stats.file {
            return Some(Self::Catalog(file.clone()));
        }
        stats.url.as_ref().map(|url| Self::Remote {
            base_url: url.clone(),
            timeout:  Duration::from_secs(stats.timeout_secs),
            retry:    retry.clone()
        })
    }

    /// Stable identifier used to scope cached lookups
    pub fn id(&self) -> String {
        match self {
            Self::Catalog(path) => format!("file:{}", path.display()),
            Self::Remote {
                base_url, ..
            } => format!("url:{}", base_url)
        }
    }

    pub fn is_remote(&self) -> bool {
        matches!(self, Self::Remote { .. })
    }
}

/// Resolves table references against a [`StatsSource`].
///
/// A catalog file is read at most once per client; a remote source keeps
/// one HTTP client for all lookups.
pub struct StatsClient {
    source_id: String,
    backend:   Backend
}

enum Backend {
    Catalog {
        path:    PathBuf,
        catalog: OnceLock<Option<FileCatalog>>
    },
    Remote(RemoteCatalog)
}

impl StatsClient {
    pub fn new(source: StatsSource) -> Self {
        let source_id = source.id();
        let backend = match source {
            StatsSource::Catalog(path) => Backend::Catalog {
                path,
                catalog: OnceLock::new()
            },
            StatsSource::Remote {
                base_url,
                timeout,
                retry
            } => Backend::Remote(RemoteCatalog::new(base_url, timeout, retry))
        };
        Self {
            source_id,
            backend
        }
    }

    /// Look up every reference, degrading each failure to
    /// [`TableStatsEntry::Unavailable`].
    pub async fn lookup_all(
        &self,
        references: &IndexSet<CompactString>
    ) -> IndexMap<CompactString, TableStatsEntry> {
        let source_id = self.source_id.as_str();
        let mut entries = IndexMap::with_capacity(references.len());
        let mut missing = Vec::new();
        for reference in references {
            match get_cached(source_id, reference) {
                Some(stats) => {
                    debug!(table = %reference, "table statistics served from cache");
                    entries.insert(reference.clone(), TableStatsEntry::Available(stats));
                }
                None => {
                    entries.insert(reference.clone(), TableStatsEntry::Unavailable);
                    missing.push(reference.clone());
                }
            }
        }
        if missing.is_empty() {
            return entries;
        }

        match &self.backend {
            Backend::Catalog {
                path,
                catalog
            } => {
                let loaded = catalog.get_or_init(|| match FileCatalog::load(path) {
                    Ok(catalog) => Some(catalog),
                    Err(e) => {
                        warn!(
                            path = %path.display(),
                            error = %e.render_message(),
                            "could not load table statistics catalog"
                        );
                        None
                    }
                });
                if let Some(catalog) = loaded {
                    for reference in missing {
                        let found = catalog.get(&reference);
                        settle(source_id, reference, found, &mut entries);
                    }
                }
            }
            Backend::Remote(remote) => {
                for reference in missing {
                    match remote.fetch(&reference).await {
                        Ok(found) => settle(source_id, reference, found, &mut entries),
                        Err(e) => {
                            warn!(
                                table = %reference,
                                error = %e.render_message(),
                                "could not retrieve table statistics"
                            );
                        }
                    }
                }
            }
        }
        entries
    }
}

fn settle(
    source_id: &str,
    reference: CompactString,
    found: Option<TableStats>,
    entries: &mut IndexMap<CompactString, TableStatsEntry>
) {
    match found {
        Some(stats) => {
            cache_stats(source_id, &reference, stats);
            entries.insert(reference, TableStatsEntry::Available(stats));
        }
        None => {
            warn!(table = %reference, "no statistics found for table");
        }
    }
}
