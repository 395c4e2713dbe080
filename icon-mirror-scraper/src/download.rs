//! Download phase: fetch the icon for every resolved item.
//!
//! Each item is independent. A failure is recorded in the report and the
//! batch carries on; the phase always finishes once every item has been
//! attempted.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

use futures::stream::{self, StreamExt};
use tokio::sync::mpsc;

use crate::client::Fetch;
use crate::context::ScrapeContext;
use crate::error::ScrapeError;
use crate::mapping::ResolvedPaths;
use crate::retry::with_retry;
use crate::util::write_atomic;

/// What happened to a single item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DownloadOutcome {
    /// The icon file was already on disk; nothing was fetched.
    AlreadyPresent,
    /// The icon was fetched and written.
    Downloaded { bytes: usize },
    /// The item could not be downloaded.
    Failed { reason: String },
}

impl DownloadOutcome {
    /// Why the item failed, or `None` if it is on disk.
    pub fn failure_reason(&self) -> Option<&str> {
        match self {
            Self::Failed { reason } => Some(reason),
            _ => None,
        }
    }
}

/// Progress events emitted during the download phase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DownloadEvent {
    /// The run is starting with `total` mapped items.
    Started { total: usize },
    /// One item finished. `processed` counts every finished item so far.
    Processed {
        identifier: u32,
        path: String,
        processed: usize,
        total: usize,
        outcome: DownloadOutcome,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadFailure {
    pub identifier: u32,
    pub path: String,
    pub reason: String,
}

/// Totals for one download run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DownloadReport {
    pub total: usize,
    pub downloaded: usize,
    pub already_present: usize,
    pub failures: Vec<DownloadFailure>,
}

impl DownloadReport {
    fn record(&mut self, identifier: u32, path: &str, outcome: DownloadOutcome) {
        match outcome {
            DownloadOutcome::AlreadyPresent => self.already_present += 1,
            DownloadOutcome::Downloaded { .. } => self.downloaded += 1,
            DownloadOutcome::Failed { reason } => self.failures.push(DownloadFailure {
                identifier,
                path: path.to_string(),
                reason,
            }),
        }
    }
}

/// Destination file for an item's icon.
pub fn image_path(output_dir: &Path, identifier: u32) -> PathBuf {
    output_dir.join(format!("{identifier}.png"))
}

/// Download the icon for every item in `paths` into `output_dir`.
pub async fn download_images<F: Fetch>(
    ctx: &ScrapeContext<F>,
    paths: &ResolvedPaths,
    output_dir: &Path,
    events: &mpsc::UnboundedSender<DownloadEvent>,
) -> DownloadReport {
    let total = paths.len();
    let processed = AtomicUsize::new(0);
    let _ = events.send(DownloadEvent::Started { total });

    let results: Vec<(u32, &str, DownloadOutcome)> = stream::iter(paths.iter())
        .map(|(identifier, path)| {
            let processed = &processed;
            async move {
                let outcome = match download_one(ctx, identifier, path, output_dir).await {
                    Ok(outcome) => outcome,
                    Err(e) => {
                        log::debug!("Item {identifier} ({path}) failed: {e}");
                        DownloadOutcome::Failed {
                            reason: e.to_string(),
                        }
                    }
                };

                let done = processed.fetch_add(1, Ordering::SeqCst) + 1;
                let _ = events.send(DownloadEvent::Processed {
                    identifier,
                    path: path.to_string(),
                    processed: done,
                    total,
                    outcome: outcome.clone(),
                });
                (identifier, path, outcome)
            }
        })
        .buffer_unordered(ctx.workers())
        .collect()
        .await;

    let mut report = DownloadReport {
        total,
        ..DownloadReport::default()
    };
    for (identifier, path, outcome) in results {
        report.record(identifier, path, outcome);
    }
    report.failures.sort_by_key(|f| f.identifier);
    report
}

async fn download_one<F: Fetch>(
    ctx: &ScrapeContext<F>,
    identifier: u32,
    path: &str,
    output_dir: &Path,
) -> Result<DownloadOutcome, ScrapeError> {
    let dest = image_path(output_dir, identifier);
    if tokio::fs::try_exists(&dest).await? {
        return Ok(DownloadOutcome::AlreadyPresent);
    }

    if ctx.cancellation().is_cancelled() {
        return Err(ScrapeError::Cancelled);
    }

    let retry = ctx.settings().retry;
    let detail_url = ctx.detail_url(path)?;
    let html = with_retry(
        retry.detail,
        ctx.cancellation(),
        &format!("item {identifier} detail page"),
        || ctx.fetcher().get_text(&detail_url),
    )
    .await?;

    let image_url = ctx.selectors().image_url(&html, &detail_url)?;
    let bytes = with_retry(
        retry.image,
        ctx.cancellation(),
        &format!("item {identifier} image"),
        || ctx.fetcher().get_bytes(&image_url),
    )
    .await?;

    write_atomic(&dest, &bytes).await?;
    Ok(DownloadOutcome::Downloaded { bytes: bytes.len() })
}
