//! Shared types passed between pipeline stages.
//!
//! The scanner produces [`Candidate`]s, the assembler turns them into
//! [`FeedItem`]s or [`Skipped`] entries, and the serializer renders items.

use serde::Serialize;
use std::path::PathBuf;

/// An audio artifact selected by the scanner, with its sidecar present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    /// Full file name, e.g. `2024-05-01 Talk [abc].mp3`.
    pub file_name: String,
    /// File name without the audio extension. Also the feed sort key.
    pub base_name: String,
    /// Size in bytes, used as the enclosure length.
    pub size: u64,
    /// Path of `<base_name>.info.json`.
    pub sidecar: PathBuf,
}

/// The downloadable media reference of a feed item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Enclosure {
    pub file_name: String,
    pub length: u64,
    pub mime_type: String,
}

/// A canonical feed item, ready for serialization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FeedItem {
    pub id: String,
    /// Title from the sidecar metadata, never from the file name.
    pub title: String,
    /// Base name of the artifact. Items sort on this, descending.
    pub sort_key: String,
    /// Date token from the file name, `YYYY-MM-DD`.
    pub date: String,
    /// `pubDate` value, e.g. `Wed, 1 May 2024 00:00:00 +0000`.
    pub pub_date: String,
    pub description: String,
    pub enclosure: Enclosure,
    /// File name of the normalized thumbnail, if one exists.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
    /// Duration in whole seconds, as rendered text.
    pub duration: String,
}

/// An artifact left out of the feed, with the reason.
#[derive(Debug)]
pub struct Skipped {
    pub file_name: String,
    pub reason: crate::assemble::SkipReason,
}

/// Sort items newest first: descending plain string order of the sort key.
pub fn sort_items(items: &mut [FeedItem]) {
    items.sort_by(|a, b| b.sort_key.cmp(&a.sort_key));
}
