use std::path::Path;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use owo_colors::OwoColorize;
use owo_colors::Stream::Stderr;
use tokio::sync::mpsc;

use icon_mirror_catalog::{Catalog, ItemFilter, import_item_sheet};
use icon_mirror_scraper::async_util::run_with_events;
use icon_mirror_scraper::{
    CancellationToken, DownloadEvent, DownloadReport, LodestoneClient, ResolveEvent,
    ResolvedPaths, ScrapeContext, ScrapeError, download_images, load_mapping, mapping_path,
    resolve_catalog, save_mapping,
};

use super::RunOptions;
use crate::error::CliError;

/// Full pipeline: import the item sheet, resolve detail pages, write
/// `dbMapping.json`, then download every icon.
pub(crate) fn run_mirror(
    opts: &RunOptions,
    filter: ItemFilter,
    data: &Path,
    output: &Path,
) -> Result<(), CliError> {
    let settings = opts.settings()?;
    std::fs::create_dir_all(output)?;

    let catalog = import_item_sheet(data, filter)?;
    log::info!(
        "{} {} items imported from {}",
        "\u{2714}".if_supports_color(Stderr, |t| t.green()),
        catalog.len(),
        data.display(),
    );
    if !catalog.duplicates().is_empty() {
        log::info!(
            "  {} {} duplicate names skipped (first occurrence kept)",
            "\u{26A0}".if_supports_color(Stderr, |t| t.yellow()),
            catalog.duplicates().len(),
        );
    }

    let rt = tokio::runtime::Runtime::new().map_err(|e| CliError::runtime(e.to_string()))?;
    rt.block_on(async {
        let cancel = watch_ctrl_c();
        let ctx = ScrapeContext::new(LodestoneClient::new()?, settings)?
            .with_cancellation(cancel.clone());

        let paths = resolve_with_progress(&ctx, &catalog, opts.quiet)
            .await
            .map_err(|e| interrupted_or(e, &cancel))?;
        log::info!(
            "{} {} of {} items found in the listing",
            "\u{2714}".if_supports_color(Stderr, |t| t.green()),
            paths.len(),
            catalog.len(),
        );

        let mapping = save_mapping(output, &paths).await?;
        log::info!(
            "{} Mapping written to {}",
            "\u{2714}".if_supports_color(Stderr, |t| t.green()),
            mapping.display(),
        );

        let report = download_with_progress(&ctx, &paths, output, opts.quiet).await;
        finish(&report, &cancel)
    })
}

/// Download phase only, driven by an existing `dbMapping.json`.
pub(crate) fn run_download(opts: &RunOptions, output: &Path) -> Result<(), CliError> {
    let settings = opts.settings()?;

    let rt = tokio::runtime::Runtime::new().map_err(|e| CliError::runtime(e.to_string()))?;
    rt.block_on(async {
        let paths = load_mapping(output).await?;
        log::info!(
            "{} {} items in {}",
            "\u{2714}".if_supports_color(Stderr, |t| t.green()),
            paths.len(),
            mapping_path(output).display(),
        );

        let cancel = watch_ctrl_c();
        let ctx = ScrapeContext::new(LodestoneClient::new()?, settings)?
            .with_cancellation(cancel.clone());

        let report = download_with_progress(&ctx, &paths, output, opts.quiet).await;
        finish(&report, &cancel)
    })
}

/// Cancel the returned token on the first Ctrl-C.
fn watch_ctrl_c() -> CancellationToken {
    let cancel = CancellationToken::new();
    let token = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            log::warn!("Interrupted, finishing in-flight work...");
            token.cancel();
        }
    });
    cancel
}

fn interrupted_or(e: ScrapeError, cancel: &CancellationToken) -> CliError {
    if e.is_cancelled() || cancel.is_cancelled() {
        CliError::Interrupted
    } else {
        e.into()
    }
}

fn progress_bar(quiet: bool, template: &str) -> ProgressBar {
    let pb = ProgressBar::new(0);
    if quiet {
        pb.set_draw_target(ProgressDrawTarget::hidden());
    }
    pb.set_style(
        ProgressStyle::with_template(template)
            .expect("static pattern")
            .progress_chars("=> "),
    );
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

async fn resolve_with_progress(
    ctx: &ScrapeContext<LodestoneClient>,
    catalog: &Catalog,
    quiet: bool,
) -> Result<ResolvedPaths, ScrapeError> {
    let pb = progress_bar(quiet, "  {spinner:.cyan} [{bar:30}] {pos}/{len} pages {msg}");
    pb.set_message("counting pages...");

    let (tx, mut rx) = mpsc::unbounded_channel();
    let result = run_with_events(resolve_catalog(ctx, catalog, &tx), &mut rx, |event| {
        match event {
            ResolveEvent::PageCount { pages } => {
                pb.set_length(u64::from(pages));
                pb.set_message("");
            }
            ResolveEvent::PageResolved { matched, .. } => {
                pb.inc(1);
                if matched > 0 {
                    pb.set_message(format!("(+{matched})"));
                }
            }
        }
    })
    .await;

    pb.finish_and_clear();
    result
}

async fn download_with_progress(
    ctx: &ScrapeContext<LodestoneClient>,
    paths: &ResolvedPaths,
    output: &Path,
    quiet: bool,
) -> DownloadReport {
    let pb = progress_bar(quiet, "  {spinner:.cyan} [{bar:30}] {pos}/{len} icons {msg}");

    let (tx, mut rx) = mpsc::unbounded_channel();
    let report = run_with_events(download_images(ctx, paths, output, &tx), &mut rx, |event| {
        match event {
            DownloadEvent::Started { total } => pb.set_length(total as u64),
            DownloadEvent::Processed {
                identifier,
                path,
                processed,
                outcome,
                ..
            } => {
                pb.set_position(processed as u64);
                if let Some(reason) = outcome.failure_reason() {
                    pb.suspend(|| {
                        log::error!(
                            "{} {identifier} ({path}): {reason}",
                            "\u{2718}".if_supports_color(Stderr, |t| t.red()),
                        );
                    });
                }
            }
        }
    })
    .await;

    pb.finish_and_clear();
    report
}

/// Print the download summary. Per-item failures do not fail the command.
fn finish(report: &DownloadReport, cancel: &CancellationToken) -> Result<(), CliError> {
    log::info!(
        "{} {} downloaded, {} already present",
        "\u{2714}".if_supports_color(Stderr, |t| t.green()),
        report.downloaded,
        report.already_present,
    );
    if !report.failures.is_empty() {
        log::info!(
            "{} {} failed",
            "\u{2718}".if_supports_color(Stderr, |t| t.red()),
            report.failures.len(),
        );
    }

    if cancel.is_cancelled() {
        return Err(CliError::Interrupted);
    }
    Ok(())
}
