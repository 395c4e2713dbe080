//! Item identifier → detail page mapping and its JSON artifact.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ScrapeError;
use crate::util::write_atomic;

/// File name of the mapping artifact inside the output directory.
pub const MAPPING_FILE: &str = "dbMapping.json";

/// Detail page path for each resolved item, keyed by identifier.
///
/// Serialized as a JSON object with decimal-string keys.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResolvedPaths(BTreeMap<u32, String>);

impl ResolvedPaths {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a detail path for an item.
    ///
    /// Returns `Ok(true)` for a new identifier and `Ok(false)` when the same
    /// path was already recorded. A different path for a known identifier
    /// is [`ScrapeError::DuplicateIdentifier`].
    pub fn insert(
        &mut self,
        identifier: u32,
        path: impl Into<String>,
    ) -> Result<bool, ScrapeError> {
        let path = path.into();
        match self.0.get(&identifier) {
            Some(existing) if *existing == path => Ok(false),
            Some(existing) => Err(ScrapeError::DuplicateIdentifier {
                identifier,
                existing: existing.clone(),
                incoming: path,
            }),
            None => {
                self.0.insert(identifier, path);
                Ok(true)
            }
        }
    }

    pub fn get(&self, identifier: u32) -> Option<&str> {
        self.0.get(&identifier).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (u32, &str)> {
        self.0.iter().map(|(&id, path)| (id, path.as_str()))
    }
}

impl FromIterator<(u32, String)> for ResolvedPaths {
    fn from_iter<I: IntoIterator<Item = (u32, String)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

pub fn mapping_path(output_dir: &Path) -> PathBuf {
    output_dir.join(MAPPING_FILE)
}

/// Write the mapping to `dbMapping.json`, replacing any previous file.
pub async fn save_mapping(
    output_dir: &Path,
    paths: &ResolvedPaths,
) -> Result<PathBuf, ScrapeError> {
    let dest = mapping_path(output_dir);
    let json = serde_json::to_vec_pretty(paths)?;
    write_atomic(&dest, &json).await?;
    log::debug!("Wrote {} entries to {}", paths.len(), dest.display());
    Ok(dest)
}

/// Read `dbMapping.json` back from the output directory.
pub async fn load_mapping(output_dir: &Path) -> Result<ResolvedPaths, ScrapeError> {
    let contents = tokio::fs::read(mapping_path(output_dir)).await?;
    Ok(serde_json::from_slice(&contents)?)
}

#[cfg(test)]
#[path = "tests/mapping_tests.rs"]
mod tests;
