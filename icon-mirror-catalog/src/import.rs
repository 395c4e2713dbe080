//! Item sheet CSV importer.
//!
//! Reads a CSV export of the game's item sheet and turns it into a
//! [`Catalog`]. Two layouts are accepted:
//!
//! - a plain export with a single header row (`#,Name,...`)
//! - the datamining layout, where the header row is preceded by an index row
//!   (`key,0,1,...`) and followed by a type row (`int32,str,...`)
//!
//! In both cases the header row is the first row whose first cell is `#`, and
//! data rows are the rows whose first cell is an unsigned integer.

use std::path::Path;

use crate::catalog::{Catalog, CatalogEntry};
use crate::error::CatalogError;

const ID_COLUMN: &str = "#";
const NAME_COLUMN: &str = "Name";
const SEARCH_CATEGORY_COLUMN: &str = "ItemSearchCategory";

/// Which rows of the item sheet to import.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ItemFilter {
    /// Every item with a non-blank name.
    #[default]
    All,
    /// Only items listed on the market board (non-zero search category).
    Marketable,
}

/// Column positions resolved from the header row.
#[derive(Debug, Clone, Copy)]
struct Columns {
    name: usize,
    search_category: Option<usize>,
}

impl Columns {
    fn from_header(record: &csv::StringRecord, filter: ItemFilter) -> Result<Self, CatalogError> {
        let position = |wanted: &str| record.iter().position(|h| h.trim() == wanted);

        let name = position(NAME_COLUMN).ok_or_else(|| CatalogError::missing_column(NAME_COLUMN))?;
        let search_category = position(SEARCH_CATEGORY_COLUMN);
        if filter == ItemFilter::Marketable && search_category.is_none() {
            return Err(CatalogError::missing_column(SEARCH_CATEGORY_COLUMN));
        }

        Ok(Self {
            name,
            search_category,
        })
    }
}

/// Import an item sheet export from disk.
pub fn import_item_sheet(path: &Path, filter: ItemFilter) -> Result<Catalog, CatalogError> {
    let contents = std::fs::read_to_string(path)?;
    let entries = parse_item_csv(&contents, filter)?;
    let catalog = Catalog::from_entries(entries);

    log::debug!(
        "Imported {} items from {} ({} duplicate names skipped)",
        catalog.len(),
        path.display(),
        catalog.duplicates().len()
    );
    Ok(catalog)
}

/// Parse item sheet CSV content into entries, in file order.
///
/// Duplicate names are not resolved here; see [`Catalog::from_entries`].
pub fn parse_item_csv(
    content: &str,
    filter: ItemFilter,
) -> Result<Vec<CatalogEntry>, CatalogError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(content.as_bytes());

    let mut columns: Option<Columns> = None;
    let mut entries = Vec::new();

    for result in reader.records() {
        let record = match result {
            Ok(r) => r,
            Err(e) => {
                log::warn!("Skipping malformed item sheet row: {e}");
                continue;
            }
        };

        let first = record.get(0).unwrap_or("").trim();

        let Some(cols) = columns else {
            if first == ID_COLUMN {
                columns = Some(Columns::from_header(&record, filter)?);
            }
            continue;
        };

        // Type rows, blank rows and anything else without a numeric key.
        let Ok(identifier) = first.parse::<u32>() else {
            continue;
        };

        let name = record.get(cols.name).unwrap_or("").trim();
        if name.is_empty() {
            continue;
        }

        if filter == ItemFilter::Marketable {
            let category = cols
                .search_category
                .and_then(|i| record.get(i))
                .and_then(|v| v.trim().parse::<u32>().ok())
                .unwrap_or(0);
            if category == 0 {
                continue;
            }
        }

        entries.push(CatalogEntry::new(name, identifier));
    }

    if columns.is_none() {
        return Err(CatalogError::MissingHeader);
    }

    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;

    const PLAIN: &str = "\
#,Name,ItemSearchCategory
1,Gil,0
2,Fire Shard,58
3,Water Shard,58
4,,0
";

    const DATAMINING: &str = "\
key,0,1,2
#,Singular,Name,ItemSearchCategory
int32,str,str,ItemSearchCategory
2,fire shard,Fire Shard,58
5,,Dated Bronze Sword,0
";

    #[test]
    fn test_plain_layout() {
        let entries = parse_item_csv(PLAIN, ItemFilter::All).unwrap();
        assert_eq!(
            entries,
            vec![
                CatalogEntry::new("Gil", 1),
                CatalogEntry::new("Fire Shard", 2),
                CatalogEntry::new("Water Shard", 3),
            ]
        );
    }

    #[test]
    fn test_datamining_layout_skips_type_row() {
        let entries = parse_item_csv(DATAMINING, ItemFilter::All).unwrap();
        assert_eq!(
            entries,
            vec![
                CatalogEntry::new("Fire Shard", 2),
                CatalogEntry::new("Dated Bronze Sword", 5),
            ]
        );
    }

    #[test]
    fn test_marketable_filter() {
        let entries = parse_item_csv(PLAIN, ItemFilter::Marketable).unwrap();
        let ids: Vec<u32> = entries.iter().map(|e| e.identifier).collect();
        assert_eq!(ids, vec![2, 3]);
    }

    #[test]
    fn test_marketable_requires_category_column() {
        let csv = "#,Name\n1,Fire Shard\n";
        let err = parse_item_csv(csv, ItemFilter::Marketable).unwrap_err();
        assert!(matches!(err, CatalogError::MissingColumn(ref c) if c == "ItemSearchCategory"));
        assert!(parse_item_csv(csv, ItemFilter::All).is_ok());
    }

    #[test]
    fn test_missing_header() {
        let err = parse_item_csv("1,Fire Shard\n", ItemFilter::All).unwrap_err();
        assert!(matches!(err, CatalogError::MissingHeader));
    }

    #[test]
    fn test_missing_name_column() {
        let err = parse_item_csv("#,Singular\n1,shard\n", ItemFilter::All).unwrap_err();
        assert!(matches!(err, CatalogError::MissingColumn(ref c) if c == "Name"));
    }

    #[test]
    fn test_padded_names_are_trimmed() {
        let csv = "#,Name\n2,Fire Shard \n3,  Water Shard\n";
        let entries = parse_item_csv(csv, ItemFilter::All).unwrap();
        assert_eq!(
            entries,
            vec![
                CatalogEntry::new("Fire Shard", 2),
                CatalogEntry::new("Water Shard", 3),
            ]
        );
    }

    #[test]
    fn test_quoted_names_with_commas() {
        let csv = "#,Name\n7,\"Hammer, Bronze\"\n";
        let entries = parse_item_csv(csv, ItemFilter::All).unwrap();
        assert_eq!(entries, vec![CatalogEntry::new("Hammer, Bronze", 7)]);
    }
}
