//! Name-keyed catalog of known items.
//!
//! The catalog is keyed by display name because that is the only thing the
//! remote listing exposes. When two items share a name the first one wins and
//! the later one is kept as a [`DuplicateName`] diagnostic.

use std::collections::HashMap;

/// A single named item from the game data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
    pub name: String,
    pub identifier: u32,
}

impl CatalogEntry {
    pub fn new(name: impl Into<String>, identifier: u32) -> Self {
        Self {
            name: name.into(),
            identifier,
        }
    }
}

/// An entry that was dropped because its name was already taken.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateName {
    pub name: String,
    /// Identifier of the entry that was kept.
    pub kept: u32,
    /// Identifier of the entry that was dropped.
    pub dropped: u32,
}

/// Name → identifier lookup built once at startup.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    by_name: HashMap<String, u32>,
    duplicates: Vec<DuplicateName>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a catalog from entries in import order.
    pub fn from_entries(entries: impl IntoIterator<Item = CatalogEntry>) -> Self {
        let mut catalog = Self::new();
        for entry in entries {
            catalog.insert(entry);
        }
        catalog
    }

    /// Insert an entry if its name is not yet known.
    ///
    /// Names are keyed without surrounding whitespace, matching how listing
    /// rows are read. Returns `false` (and records a diagnostic) when the
    /// name was already present. Blank names are ignored and also return
    /// `false`.
    pub fn insert(&mut self, entry: CatalogEntry) -> bool {
        let name = entry.name.trim();
        if name.is_empty() {
            return false;
        }

        if let Some(&kept) = self.by_name.get(name) {
            log::warn!(
                "Duplicate item name \"{}\" (keeping {}, skipping {})",
                name,
                kept,
                entry.identifier
            );
            self.duplicates.push(DuplicateName {
                name: name.to_string(),
                kept,
                dropped: entry.identifier,
            });
            return false;
        }

        self.by_name.insert(name.to_string(), entry.identifier);
        true
    }

    /// Look up the identifier for an exact display name.
    pub fn identifier(&self, name: &str) -> Option<u32> {
        self.by_name.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }

    /// Entries dropped during construction because of a name clash.
    pub fn duplicates(&self) -> &[DuplicateName] {
        &self.duplicates
    }
}

#[cfg(test)]
#[path = "tests/catalog_tests.rs"]
mod tests;
