use tokio_util::sync::CancellationToken;
use url::Url;

use crate::client::Fetch;
use crate::error::ScrapeError;
use crate::selectors::CompiledSelectors;
use crate::settings::Settings;

/// Everything the resolution and download phases share: the fetcher, the
/// settings, the compiled selector contract and the cancellation token.
pub struct ScrapeContext<F: Fetch> {
    fetcher: F,
    settings: Settings,
    selectors: CompiledSelectors,
    origin: Url,
    listing: Url,
    cancel: CancellationToken,
}

impl<F: Fetch> ScrapeContext<F> {
    /// Validate the site URLs and compile the selectors.
    pub fn new(fetcher: F, settings: Settings) -> Result<Self, ScrapeError> {
        let origin = Url::parse(&settings.site.origin)?;
        let listing = origin.join(&settings.site.listing_path)?;
        let selectors = CompiledSelectors::compile(&settings.selectors)?;

        Ok(Self {
            fetcher,
            settings,
            selectors,
            origin,
            listing,
            cancel: CancellationToken::new(),
        })
    }

    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn selectors(&self) -> &CompiledSelectors {
        &self.selectors
    }

    pub fn cancellation(&self) -> &CancellationToken {
        &self.cancel
    }

    /// Concurrency limit for both phases (at least one).
    pub fn workers(&self) -> usize {
        self.settings.workers.max(1)
    }

    /// URL of one page of the search listing.
    pub fn listing_url(&self, page: u32) -> Url {
        let mut url = self.listing.clone();
        url.query_pairs_mut().append_pair("page", &page.to_string());
        url
    }

    /// Absolute URL of an item detail page.
    pub fn detail_url(&self, path: &str) -> Result<Url, ScrapeError> {
        Ok(self.origin.join(path)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::LodestoneClient;
    use crate::settings::SiteSettings;

    fn context(site: SiteSettings) -> Result<ScrapeContext<LodestoneClient>, ScrapeError> {
        let settings = Settings {
            site,
            ..Settings::default()
        };
        ScrapeContext::new(LodestoneClient::new()?, settings)
    }

    #[test]
    fn test_listing_url() {
        let ctx = context(SiteSettings::default()).unwrap();
        assert_eq!(
            ctx.listing_url(12).as_str(),
            "https://jp.finalfantasyxiv.com/lodestone/playguide/db/item/?page=12"
        );
    }

    #[test]
    fn test_listing_url_keeps_existing_query() {
        let ctx = context(SiteSettings {
            listing_path: "/lodestone/playguide/db/item/?category2=7".to_string(),
            ..SiteSettings::default()
        })
        .unwrap();
        assert_eq!(
            ctx.listing_url(1).as_str(),
            "https://jp.finalfantasyxiv.com/lodestone/playguide/db/item/?category2=7&page=1"
        );
    }

    #[test]
    fn test_detail_url() {
        let ctx = context(SiteSettings::default()).unwrap();
        assert_eq!(
            ctx.detail_url("/lodestone/playguide/db/item/d1a2/").unwrap().as_str(),
            "https://jp.finalfantasyxiv.com/lodestone/playguide/db/item/d1a2/"
        );
    }

    #[test]
    fn test_invalid_origin() {
        let err = context(SiteSettings {
            origin: "not a url".to_string(),
            ..SiteSettings::default()
        })
        .err()
        .unwrap();
        assert!(matches!(err, ScrapeError::Url(_)));
    }

    #[test]
    fn test_workers_at_least_one() {
        let settings = Settings {
            workers: 0,
            ..Settings::default()
        };
        let ctx = ScrapeContext::new(LodestoneClient::new().unwrap(), settings).unwrap();
        assert_eq!(ctx.workers(), 1);
    }
}
