#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use icon_mirror_scraper::*;
use url::Url;

pub const ORIGIN: &str = "https://lodestone.test";
pub const LISTING_PATH: &str = "/db/item/";

/// In-memory site: URL → response body. Unknown URLs answer 404.
#[derive(Default)]
pub struct FakeSite {
    responses: HashMap<String, Vec<u8>>,
    requests: Mutex<Vec<String>>,
}

impl FakeSite {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, url: &str, body: impl Into<Vec<u8>>) -> Self {
        self.responses.insert(url.to_string(), body.into());
        self
    }

    pub fn with_listing_page(self, page: u32, html: String) -> Self {
        self.with(&listing_url(page), html)
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }

    pub fn request_count(&self, url: &str) -> usize {
        self.requests().iter().filter(|u| *u == url).count()
    }

    fn respond(&self, url: &Url) -> Result<Vec<u8>, ScrapeError> {
        self.requests.lock().unwrap().push(url.to_string());
        self.responses
            .get(url.as_str())
            .cloned()
            .ok_or_else(|| ScrapeError::Status {
                url: url.to_string(),
                status: 404,
            })
    }
}

impl Fetch for FakeSite {
    async fn get_text(&self, url: &Url) -> Result<String, ScrapeError> {
        let body = self.respond(url)?;
        Ok(String::from_utf8_lossy(&body).into_owned())
    }

    async fn get_bytes(&self, url: &Url) -> Result<Vec<u8>, ScrapeError> {
        self.respond(url)
    }
}

/// Wraps a [`FakeSite`], holding every request open for `delay` and
/// recording the most requests ever in flight at once.
pub struct PacedSite {
    site: FakeSite,
    delay: Duration,
    in_flight: AtomicUsize,
    peak: AtomicUsize,
}

impl PacedSite {
    pub fn new(site: FakeSite, delay: Duration) -> Self {
        Self {
            site,
            delay,
            in_flight: AtomicUsize::new(0),
            peak: AtomicUsize::new(0),
        }
    }

    pub fn peak_in_flight(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }

    async fn hold(&self) {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
        tokio::time::sleep(self.delay).await;
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
    }
}

impl Fetch for PacedSite {
    async fn get_text(&self, url: &Url) -> Result<String, ScrapeError> {
        self.hold().await;
        self.site.get_text(url).await
    }

    async fn get_bytes(&self, url: &Url) -> Result<Vec<u8>, ScrapeError> {
        self.hold().await;
        self.site.get_bytes(url).await
    }
}

pub fn listing_url(page: u32) -> String {
    format!("{ORIGIN}{LISTING_PATH}?page={page}")
}

pub fn detail_url(path: &str) -> String {
    format!("{ORIGIN}{path}")
}

/// Settings pointing at the fake site, with instant retries.
pub fn test_settings() -> Settings {
    let fast = RetryPolicy::new(0, 3);
    Settings {
        workers: 4,
        site: SiteSettings {
            origin: ORIGIN.to_string(),
            listing_path: LISTING_PATH.to_string(),
        },
        selectors: Selectors::default(),
        retry: RetrySettings {
            page_count: fast,
            listing: fast,
            detail: fast,
            image: fast,
        },
    }
}

pub fn context(site: FakeSite) -> ScrapeContext<FakeSite> {
    ScrapeContext::new(site, test_settings()).unwrap()
}

/// A listing page with the given `(name, detail path)` rows and a pager
/// whose last-page link points at `last_page`.
pub fn listing_html(last_page: u32, rows: &[(&str, &str)]) -> String {
    let rows: String = rows
        .iter()
        .map(|(name, path)| {
            format!(
                r#"<tr><td class="db-table__body--light">
                    <div class="db-table__link_txt">
                      <a href="{path}" class="db_popup db-table__txt--detail_link">{name}</a>
                    </div>
                  </td></tr>"#
            )
        })
        .collect();

    format!(
        r#"<html><body>
        <table class="db-table"><tbody>{rows}</tbody></table>
        <ul class="btn__pager">
          <li><a href="{LISTING_PATH}?page={last_page}" class="btn__pager__next--all">Last</a></li>
        </ul>
        </body></html>"#
    )
}

/// A detail page whose icon points at `image_src`.
pub fn detail_html(image_src: &str) -> String {
    format!(
        r#"<html><body>
        <div class="db-view__item__icon"><img src="{image_src}" width="128" height="128"></div>
        </body></html>"#
    )
}
