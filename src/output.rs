//! CLI output formatting for feed runs.
//!
//! # Information-First Display
//!
//! Output is **episode-centric, not file-centric**. Each episode leads with its
//! feed position and display title; the artifact file and thumbnail follow as
//! indented context lines so the listing reads as the feed's inventory while
//! still pointing back to files on disk.
//!
//! # Output Format
//!
//! ## Feed / Sync
//!
//! ```text
//! Acquisition: latest 15
//! Episodes
//! 001 Newest Talk
//!     Source: 2024-06-10 Newest Talk [a].mp3
//!     Thumbnail: 2024-06-10 Newest Talk [a].jpg
//! 002 Older Talk
//!     Source: 2024-05-01 Older Talk [b].mp3
//!
//! Skipped
//!     2024-05-02 Orphan [z].mp3: missing sidecar ./2024-05-02 Orphan [z].info.json
//!
//! Published 2 episodes (1 skipped) → ./cast.rss
//! ```
//!
//! ## Check
//!
//! Same listing, ending in `Feed would contain 2 episodes (1 skipped)`.
//!
//! # Architecture
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format functions
//! are pure: no I/O, no side effects.

use crate::pipeline::{RunReport, SyncReport};
use crate::types::{FeedItem, Skipped};

// ============================================================================
// Shared display helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// Truncate text to `max` characters, appending `...` if truncated.
fn truncate_desc(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}

fn plural(n: usize) -> &'static str {
    if n == 1 { "episode" } else { "episodes" }
}

/// Episode listing in feed order.
fn episode_lines(items: &[FeedItem]) -> Vec<String> {
    let mut lines = vec!["Episodes".to_string()];
    for (i, item) in items.iter().enumerate() {
        lines.push(format!("{} {}", format_index(i + 1), truncate_desc(&item.title, 70)));
        lines.push(format!("{}Source: {}", indent(1), item.enclosure.file_name));
        if let Some(thumb) = &item.thumbnail {
            lines.push(format!("{}Thumbnail: {}", indent(1), thumb));
        }
    }
    lines
}

fn skipped_lines(skipped: &[Skipped]) -> Vec<String> {
    if skipped.is_empty() {
        return Vec::new();
    }
    let mut lines = vec![String::new(), "Skipped".to_string()];
    for s in skipped {
        lines.push(format!("{}{}: {}", indent(1), s.file_name, s.reason));
    }
    lines
}

// ============================================================================
// feed
// ============================================================================

/// Format the result of a published feed run.
pub fn format_run_output(report: &RunReport) -> Vec<String> {
    let mut lines = episode_lines(&report.items);
    lines.extend(skipped_lines(&report.skipped));
    lines.push(String::new());

    let n = report.items.len();
    let summary = format!(
        "Published {} {} ({} skipped)",
        n,
        plural(n),
        report.skipped.len()
    );
    match &report.feed_path {
        Some(path) => lines.push(format!("{} \u{2192} {}", summary, path.display())),
        None => lines.push(summary),
    }
    lines
}

/// Print feed run output to stdout.
pub fn print_run_output(report: &RunReport) {
    for line in format_run_output(report) {
        println!("{}", line);
    }
}

// ============================================================================
// sync
// ============================================================================

/// Format acquisition status followed by the feed run.
pub fn format_sync_output(report: &SyncReport) -> Vec<String> {
    let mut lines = vec![format!("Acquisition: {}", report.mode)];
    if let Some(err) = &report.acquisition_error {
        lines.push(format!("{}failed: {}", indent(1), err));
    }
    lines.extend(format_run_output(&report.run));
    lines
}

pub fn print_sync_output(report: &SyncReport) {
    for line in format_sync_output(report) {
        println!("{}", line);
    }
}

// ============================================================================
// check
// ============================================================================

/// Format a dry run.
pub fn format_check_output(report: &RunReport) -> Vec<String> {
    let mut lines = episode_lines(&report.items);
    lines.extend(skipped_lines(&report.skipped));
    lines.push(String::new());
    let n = report.items.len();
    lines.push(format!(
        "Feed would contain {} {} ({} skipped)",
        n,
        plural(n),
        report.skipped.len()
    ));
    lines
}

pub fn print_check_output(report: &RunReport) {
    for line in format_check_output(report) {
        println!("{}", line);
    }
}
