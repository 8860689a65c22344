//! Bot catalog loading.
//!
//! The catalog is a directory of JSON files, one [`BotRecord`] per file. It is
//! read once at startup and never reloaded; the returned [`Catalog`] is
//! immutable and shared by reference for the rest of the session.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::error::CatalogError;
use crate::types::BotRecord;

/// Ordered, immutable collection of bots. Names are unique.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    bots: Vec<Arc<BotRecord>>,
}

impl Catalog {
    /// Builds a catalog from already-parsed records, rejecting duplicate names.
    pub fn from_records(records: Vec<BotRecord>) -> Result<Self, CatalogError> {
        let sourced = records
            .into_iter()
            .map(|bot| (PathBuf::from("<memory>"), bot))
            .collect();
        Self::from_sourced(sourced)
    }

    fn from_sourced(records: Vec<(PathBuf, BotRecord)>) -> Result<Self, CatalogError> {
        let mut seen = HashSet::new();
        let mut bots = Vec::with_capacity(records.len());
        for (path, bot) in records {
            if !seen.insert(bot.name.clone()) {
                return Err(CatalogError::DuplicateName { name: bot.name, path });
            }
            bots.push(Arc::new(bot));
        }
        Ok(Self { bots })
    }

    pub fn len(&self) -> usize {
        self.bots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bots.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Arc<BotRecord>> {
        self.bots.get(index)
    }

    pub fn find(&self, name: &str) -> Option<&Arc<BotRecord>> {
        self.bots.iter().find(|b| b.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<BotRecord>> {
        self.bots.iter()
    }
}

/// Loads every `*.json` file in `dir` as a [`BotRecord`], in file-name order.
///
/// Files with other extensions are skipped. An empty directory yields an empty
/// catalog.
///
/// # Errors
///
/// Returns [`CatalogError`] if the directory or a record cannot be read, a
/// record is not valid JSON for the record format, or two records share a name.
pub fn load_catalog(dir: &Path) -> Result<Catalog, CatalogError> {
    let entries = std::fs::read_dir(dir).map_err(|source| CatalogError::ReadDir {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut paths = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|source| CatalogError::ReadDir {
            path: dir.to_path_buf(),
            source,
        })?;
        let path = entry.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == "json") {
            paths.push(path);
        }
    }
    paths.sort();

    let mut records = Vec::with_capacity(paths.len());
    for path in paths {
        let raw = std::fs::read_to_string(&path).map_err(|source| CatalogError::ReadFile {
            path: path.clone(),
            source,
        })?;
        let bot: BotRecord = serde_json::from_str(&raw).map_err(|source| CatalogError::Parse {
            path: path.clone(),
            source,
        })?;
        records.push((path, bot));
    }

    let catalog = Catalog::from_sourced(records)?;
    tracing::info!(dir = %dir.display(), bots = catalog.len(), "catalog loaded");
    Ok(catalog)
}
