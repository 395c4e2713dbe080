use icon_mirror_catalog::CatalogError;
use icon_mirror_scraper::ScrapeError;
use thiserror::Error;

/// Errors that end a CLI command with a non-zero exit code.
#[derive(Debug, Error)]
pub(crate) enum CliError {
    /// I/O error
    #[error("{0}")]
    Io(#[from] std::io::Error),

    /// Item sheet could not be imported
    #[error("Import failed: {0}")]
    Catalog(#[from] CatalogError),

    /// Resolution or settings failure
    #[error("{0}")]
    Scrape(#[from] ScrapeError),

    /// Runtime creation error
    #[error("Runtime error: {0}")]
    Runtime(String),

    /// The run was stopped with Ctrl-C
    #[error("Interrupted")]
    Interrupted,
}

impl CliError {
    pub(crate) fn runtime(msg: impl Into<String>) -> Self {
        Self::Runtime(msg.into())
    }
}
