use crate::client::Fetch;
use crate::context::ScrapeContext;
use crate::error::ScrapeError;
use crate::retry::with_retry;
use crate::selectors::page_number_from_href;

/// Number of pages in the search listing, read from the first page's
/// "last page" link.
pub async fn resolve_page_count<F: Fetch>(ctx: &ScrapeContext<F>) -> Result<u32, ScrapeError> {
    let url = ctx.listing_url(1);
    let html = with_retry(
        ctx.settings().retry.page_count,
        ctx.cancellation(),
        "listing page 1",
        || ctx.fetcher().get_text(&url),
    )
    .await?;

    let href = ctx.selectors().last_page_href(&html, &url)?;
    let pages = page_number_from_href(&href, &url)?;
    log::debug!("Last page link {href} -> {pages} pages");
    Ok(pages)
}
