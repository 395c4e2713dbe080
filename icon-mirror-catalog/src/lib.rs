pub mod catalog;
pub mod error;
pub mod import;

pub use catalog::{Catalog, CatalogEntry, DuplicateName};
pub use error::CatalogError;
pub use import::{ItemFilter, import_item_sheet, parse_item_csv};
