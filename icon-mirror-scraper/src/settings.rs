//! Scraper settings (site location, selector contract, retry policies).
//!
//! Settings live in `~/.config/icon-mirror/settings.toml` unless a path is
//! given explicitly. Every key is optional; missing keys fall back to the
//! defaults for the Japanese Lodestone item database.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tokio::time::Duration;

use crate::error::ScrapeError;

/// Canonical path to the settings file: `~/.config/icon-mirror/settings.toml`.
pub fn settings_path() -> PathBuf {
    let config = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
    config.join("icon-mirror").join("settings.toml")
}

/// Load settings using a priority chain:
///
/// 1. Explicit path (if `Some`), which must exist
/// 2. `settings.toml` in the default location, if present
/// 3. Built-in defaults
pub fn load_settings(explicit: Option<&Path>) -> Result<Settings, ScrapeError> {
    let path = match explicit {
        Some(p) => p.to_path_buf(),
        None => {
            let default = settings_path();
            if !default.exists() {
                return Ok(Settings::default());
            }
            default
        }
    };

    let contents = std::fs::read_to_string(&path)?;
    let settings: Settings = toml::from_str(&contents)
        .map_err(|e| ScrapeError::config(format!("{}: {e}", path.display())))?;
    log::debug!("Loaded settings from {}", path.display());
    Ok(settings)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Maximum number of pages or items processed at once.
    pub workers: usize,
    pub site: SiteSettings,
    pub selectors: Selectors,
    pub retry: RetrySettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            workers: 8,
            site: SiteSettings::default(),
            selectors: Selectors::default(),
            retry: RetrySettings::default(),
        }
    }
}

impl Settings {
    /// Pretty-printed TOML, as written to the settings file.
    pub fn to_toml_string(&self) -> Result<String, ScrapeError> {
        toml::to_string_pretty(self).map_err(|e| ScrapeError::config(e.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteSettings {
    /// Scheme and host that detail paths are resolved against.
    pub origin: String,
    /// Path of the paginated search listing, relative to `origin`.
    pub listing_path: String,
}

impl Default for SiteSettings {
    fn default() -> Self {
        Self {
            origin: "https://jp.finalfantasyxiv.com".to_string(),
            listing_path: "/lodestone/playguide/db/item/".to_string(),
        }
    }
}

/// CSS selectors used to navigate listing and detail pages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Selectors {
    /// The body of the search results table on a listing page.
    pub results_table: String,
    /// One result row, relative to the results table.
    pub row: String,
    /// The detail link inside a row; its text is the item name.
    pub row_link: String,
    /// The "last page" anchor in the listing pager.
    pub last_page_link: String,
    /// The icon `<img>` on an item detail page.
    pub item_image: String,
}

impl Default for Selectors {
    fn default() -> Self {
        Self {
            results_table: "table.db-table > tbody".to_string(),
            row: "tr".to_string(),
            row_link: "a.db-table__txt--detail_link".to_string(),
            last_page_link: "ul.btn__pager a.btn__pager__next--all".to_string(),
            item_image: "div.db-view__item__icon img".to_string(),
        }
    }
}

/// Fixed-interval retry policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryPolicy {
    /// Seconds to wait before each retry (not before the first attempt).
    pub interval_secs: u64,
    pub max_attempts: u32,
}

impl RetryPolicy {
    pub const fn new(interval_secs: u64, max_attempts: u32) -> Self {
        Self {
            interval_secs,
            max_attempts,
        }
    }

    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(5, 100)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrySettings {
    /// First listing page, used to find the page count.
    pub page_count: RetryPolicy,
    pub listing: RetryPolicy,
    pub detail: RetryPolicy,
    pub image: RetryPolicy,
}

impl Default for RetrySettings {
    fn default() -> Self {
        Self {
            page_count: RetryPolicy::new(20, 100),
            listing: RetryPolicy::new(20, 100),
            detail: RetryPolicy::new(5, 100),
            image: RetryPolicy::new(5, 100),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_file_keeps_defaults() {
        let settings: Settings = toml::from_str(
            r#"
            workers = 2

            [retry.detail]
            max_attempts = 3
            "#,
        )
        .unwrap();

        assert_eq!(settings.workers, 2);
        assert_eq!(settings.retry.detail.max_attempts, 3);
        assert_eq!(settings.retry.detail.interval_secs, 5);
        assert_eq!(settings.retry.listing, RetryPolicy::new(20, 100));
        assert_eq!(settings.site, SiteSettings::default());
    }

    #[test]
    fn test_toml_round_trip() {
        let settings = Settings::default();
        let text = settings.to_toml_string().unwrap();
        let parsed: Settings = toml::from_str(&text).unwrap();
        assert_eq!(parsed, settings);
    }

    #[test]
    fn test_explicit_path_must_exist() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_settings(Some(&dir.path().join("missing.toml"))).unwrap_err();
        assert!(matches!(err, ScrapeError::Io(_)));
    }

    #[test]
    fn test_explicit_path_invalid_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.toml");
        std::fs::write(&path, "workers = \"many\"").unwrap();
        let err = load_settings(Some(&path)).unwrap_err();
        assert!(matches!(err, ScrapeError::Config(_)));
    }
}
