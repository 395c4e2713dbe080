/// Errors that can occur while importing the item sheet.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("No header row found (expected a row starting with '#')")]
    MissingHeader,

    #[error("Column '{0}' not found in header row")]
    MissingColumn(String),
}

impl CatalogError {
    pub fn missing_column(name: impl Into<String>) -> Self {
        Self::MissingColumn(name.into())
    }
}
