use std::future::Future;

use reqwest::header::{ACCEPT, ACCEPT_LANGUAGE, HeaderMap, HeaderValue, USER_AGENT};
use tokio::time::Duration;
use url::Url;

use crate::error::ScrapeError;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Lodestone rejects requests that don't look like they come from a browser.
const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/79.0.3945.117 Safari/537.36";
const BROWSER_ACCEPT: &str =
    "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8";
const BROWSER_ACCEPT_LANGUAGE: &str = "ja,en-US;q=0.7,en;q=0.3";

/// A single GET against the remote site, without retries.
///
/// Implemented by [`LodestoneClient`] for real traffic; tests substitute an
/// in-memory site.
pub trait Fetch: Send + Sync {
    /// Fetch a page as text.
    fn get_text(&self, url: &Url) -> impl Future<Output = Result<String, ScrapeError>> + Send;

    /// Fetch raw bytes (images).
    fn get_bytes(&self, url: &Url) -> impl Future<Output = Result<Vec<u8>, ScrapeError>> + Send;
}

/// The header set sent with every request.
pub fn browser_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(USER_AGENT, HeaderValue::from_static(BROWSER_USER_AGENT));
    headers.insert(ACCEPT, HeaderValue::from_static(BROWSER_ACCEPT));
    headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static(BROWSER_ACCEPT_LANGUAGE));
    headers
}

/// HTTP client for the Lodestone database pages and icon CDN.
#[derive(Debug, Clone)]
pub struct LodestoneClient {
    http: reqwest::Client,
}

impl LodestoneClient {
    pub fn new() -> Result<Self, ScrapeError> {
        let http = reqwest::Client::builder()
            .default_headers(browser_headers())
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self { http })
    }

    /// Send a GET, turning any non-2xx status into an error.
    async fn get(&self, url: &Url) -> Result<reqwest::Response, ScrapeError> {
        let resp = self.http.get(url.clone()).send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(ScrapeError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        Ok(resp)
    }
}

impl Fetch for LodestoneClient {
    async fn get_text(&self, url: &Url) -> Result<String, ScrapeError> {
        Ok(self.get(url).await?.text().await?)
    }

    async fn get_bytes(&self, url: &Url) -> Result<Vec<u8>, ScrapeError> {
        let bytes = self.get(url).await?.bytes().await?;
        Ok(bytes.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_browser_headers_are_fixed() {
        let a = browser_headers();
        let b = browser_headers();
        assert_eq!(a, b);
        assert!(a[USER_AGENT].to_str().unwrap().starts_with("Mozilla/5.0"));
        assert!(a.contains_key(ACCEPT));
        assert!(a.contains_key(ACCEPT_LANGUAGE));
    }

    #[test]
    fn test_client_builds() {
        assert!(LodestoneClient::new().is_ok());
    }
}
