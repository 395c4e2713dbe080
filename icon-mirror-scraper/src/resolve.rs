//! Resolution phase: find the detail page of every known item by walking the
//! paginated search listing.

use futures::stream::{self, StreamExt, TryStreamExt};
use icon_mirror_catalog::Catalog;
use tokio::sync::mpsc;

use crate::client::Fetch;
use crate::context::ScrapeContext;
use crate::error::ScrapeError;
use crate::mapping::ResolvedPaths;
use crate::pages::resolve_page_count;
use crate::retry::with_retry;

/// Progress events emitted during resolution, consumed by the CLI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolveEvent {
    /// The listing page count is known; page work is about to start.
    PageCount { pages: u32 },
    /// One listing page has been processed.
    PageResolved { page: u32, rows: usize, matched: usize },
}

/// A listing row whose name matched a catalog entry.
#[derive(Debug, Clone)]
struct MatchedRow {
    identifier: u32,
    name: String,
    detail_path: String,
}

#[derive(Debug)]
struct PageMatches {
    page: u32,
    rows: usize,
    matches: Vec<MatchedRow>,
}

/// Map every catalog item that appears in the listing to its detail path.
///
/// Pages are processed concurrently (up to the configured worker count) and
/// their matches are merged by this function alone, so the mapping has a
/// single writer. The first page that fails (after retries, or on a missing
/// page element) aborts the whole phase and no partial mapping is returned.
pub async fn resolve_catalog<F: Fetch>(
    ctx: &ScrapeContext<F>,
    catalog: &Catalog,
    events: &mpsc::UnboundedSender<ResolveEvent>,
) -> Result<ResolvedPaths, ScrapeError> {
    let pages = resolve_page_count(ctx).await?;
    let _ = events.send(ResolveEvent::PageCount { pages });

    stream::iter(1..=pages)
        .map(|page| resolve_page(ctx, catalog, page))
        .buffer_unordered(ctx.workers())
        .try_fold(ResolvedPaths::new(), |mut paths, page| async move {
            for row in &page.matches {
                if !paths.insert(row.identifier, row.detail_path.as_str())? {
                    log::warn!(
                        "\"{}\" ({}) listed again on page {}",
                        row.name,
                        row.identifier,
                        page.page
                    );
                }
            }
            let _ = events.send(ResolveEvent::PageResolved {
                page: page.page,
                rows: page.rows,
                matched: page.matches.len(),
            });
            Ok::<_, ScrapeError>(paths)
        })
        .await
}

async fn resolve_page<F: Fetch>(
    ctx: &ScrapeContext<F>,
    catalog: &Catalog,
    page: u32,
) -> Result<PageMatches, ScrapeError> {
    let url = ctx.listing_url(page);
    let html = with_retry(
        ctx.settings().retry.listing,
        ctx.cancellation(),
        &format!("listing page {page}"),
        || ctx.fetcher().get_text(&url),
    )
    .await?;

    let rows = ctx.selectors().listing_rows(&html, &url)?;
    log::debug!("=> Page {page} ({} rows)", rows.len());

    let mut matches = Vec::new();
    for row in &rows {
        match catalog.identifier(&row.name) {
            Some(identifier) => {
                log::debug!("    => {}: {} (item {identifier})", row.name, row.detail_path);
                matches.push(MatchedRow {
                    identifier,
                    name: row.name.clone(),
                    detail_path: row.detail_path.clone(),
                });
            }
            None => {
                log::debug!("    => {}: {} (not in catalog)", row.name, row.detail_path);
            }
        }
    }

    Ok(PageMatches {
        page,
        rows: rows.len(),
        matches,
    })
}
