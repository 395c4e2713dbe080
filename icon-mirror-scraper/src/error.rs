/// A page element the pipeline relies on could not be found or read.
///
/// The remote layout is assumed stable; each variant names the extraction
/// rule that failed so a layout change shows up as a specific error instead
/// of an empty result.
#[derive(Debug, thiserror::Error)]
pub enum StructureError {
    #[error("Invalid '{rule}' selector \"{selector}\": {message}")]
    InvalidSelector {
        rule: &'static str,
        selector: String,
        message: String,
    },

    #[error("Last page link not found on {url}")]
    MissingLastPageLink { url: String },

    #[error("Could not read a page number from \"{href}\"")]
    BadPageNumber { href: String },

    #[error("Results table not found.\nURL: {url}\nDocument:\n{document}")]
    MissingResultsTable { url: String, document: String },

    #[error("Row {row} on {url} has no detail link")]
    MissingRowLink { url: String, row: usize },

    #[error("Item image not found on {url}")]
    MissingImage { url: String },
}

/// Errors that can occur while resolving and downloading item icons.
#[derive(Debug, thiserror::Error)]
pub enum ScrapeError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Server returned HTTP {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("{what}: gave up after {} attempt(s){}", .attempts.len(), last_error_suffix(.attempts))]
    RetriesExhausted {
        what: String,
        attempts: Vec<ScrapeError>,
    },

    #[error(transparent)]
    Structure(#[from] StructureError),

    #[error("Item {identifier} found at both \"{existing}\" and \"{incoming}\"")]
    DuplicateIdentifier {
        identifier: u32,
        existing: String,
        incoming: String,
    },

    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Operation cancelled")]
    Cancelled,
}

impl ScrapeError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

fn last_error_suffix(attempts: &[ScrapeError]) -> String {
    match attempts.last() {
        Some(e) => format!(" (last error: {e})"),
        None => String::new(),
    }
}
