pub mod async_util;
pub mod client;
pub mod context;
pub mod download;
pub mod error;
pub mod mapping;
pub mod pages;
pub mod resolve;
pub mod retry;
pub mod selectors;
pub mod settings;
mod util;

pub use client::{Fetch, LodestoneClient, browser_headers};
pub use context::ScrapeContext;
pub use download::{
    DownloadEvent, DownloadFailure, DownloadOutcome, DownloadReport, download_images, image_path,
};
pub use error::{ScrapeError, StructureError};
pub use mapping::{MAPPING_FILE, ResolvedPaths, load_mapping, mapping_path, save_mapping};
pub use pages::resolve_page_count;
pub use resolve::{ResolveEvent, resolve_catalog};
pub use retry::with_retry;
pub use selectors::{CompiledSelectors, ListingRow, page_number_from_href};
pub use settings::{
    RetryPolicy, RetrySettings, Selectors, Settings, SiteSettings, load_settings, settings_path,
};
pub use tokio_util::sync::CancellationToken;
