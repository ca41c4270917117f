//! Feed run orchestration.
//!
//! ```text
//! scan → assemble (per candidate) → sort → render → publish
//! ```
//!
//! Per-artifact problems become [`Skipped`] entries and never stop the run.
//! Only a directory that cannot be listed or a feed that cannot be published
//! is fatal, and in both cases the previously published feed is left as is.

use crate::assemble::{ThumbnailMode, assemble_item};
use crate::config::FeedConfig;
use crate::feed::render_feed;
use crate::gateway::{AcquisitionGateway, FetchMode, GatewayError};
use crate::imaging::ImageTranscoder;
use crate::publish::{PublishError, publish};
use crate::scan::{ScanError, scan};
use crate::types::{FeedItem, Skipped, sort_items};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RunError {
    #[error("scan failed: {0}")]
    Scan(#[from] ScanError),
    #[error("publish failed: {0}")]
    Publish(#[from] PublishError),
}

/// Outcome of one feed run.
#[derive(Debug, Default)]
pub struct RunReport {
    /// Items in feed order (newest first).
    pub items: Vec<FeedItem>,
    pub skipped: Vec<Skipped>,
    /// Where the feed was written; `None` for dry runs.
    pub feed_path: Option<PathBuf>,
}

/// Outcome of acquisition followed by a feed run.
#[derive(Debug)]
pub struct SyncReport {
    pub mode: FetchMode,
    /// Set when the downloader failed; the feed was rebuilt anyway.
    pub acquisition_error: Option<GatewayError>,
    pub run: RunReport,
}

/// Scan and assemble every artifact, newest first.
pub fn collect_items(
    dir: &Path,
    config: &FeedConfig,
    thumbnails: ThumbnailMode<'_>,
) -> Result<RunReport, ScanError> {
    let scanned = scan(dir, config)?;
    let mut report = RunReport {
        skipped: scanned.skipped,
        ..RunReport::default()
    };

    for candidate in &scanned.candidates {
        match assemble_item(dir, candidate, config, thumbnails) {
            Ok(item) => report.items.push(item),
            Err(reason) => {
                tracing::warn!(file = %candidate.file_name, %reason, "skipping");
                report.skipped.push(Skipped {
                    file_name: candidate.file_name.clone(),
                    reason,
                });
            }
        }
    }

    sort_items(&mut report.items);
    Ok(report)
}

/// Rebuild and publish the feed from what is on disk.
pub fn build_feed(
    dir: &Path,
    config: &FeedConfig,
    transcoder: &dyn ImageTranscoder,
) -> Result<RunReport, RunError> {
    let mut report = collect_items(dir, config, ThumbnailMode::Normalize(transcoder))?;
    let xml = render_feed(config, &report.items);
    let path = dir.join(&config.channel.feed_file);
    publish(&path, &xml)?;
    tracing::info!(
        path = %path.display(),
        items = report.items.len(),
        skipped = report.skipped.len(),
        "feed published"
    );
    report.feed_path = Some(path);
    Ok(report)
}

/// Dry run: no thumbnail conversion, nothing written.
pub fn check(dir: &Path, config: &FeedConfig) -> Result<RunReport, ScanError> {
    collect_items(dir, config, ThumbnailMode::Inspect)
}

/// Fetch new media, then rebuild the feed regardless of how fetching went.
pub fn sync(
    dir: &Path,
    config: &FeedConfig,
    gateway: &dyn AcquisitionGateway,
    transcoder: &dyn ImageTranscoder,
) -> Result<SyncReport, RunError> {
    let acquisition = &config.acquisition;
    let mode = FetchMode::for_archive(&dir.join(&acquisition.archive_file), acquisition.window);

    let acquisition_error = match gateway.acquire(&config.channel.source, mode) {
        Ok(()) => None,
        Err(e) => {
            tracing::warn!(error = %e, "acquisition failed, rebuilding feed from disk");
            Some(e)
        }
    };

    let run = build_feed(dir, config, transcoder)?;
    Ok(SyncReport {
        mode,
        acquisition_error,
        run,
    })
}
