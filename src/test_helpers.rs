//! Shared test utilities for the castfeed test suite.
//!
//! Builds artifact directories the way the downloader leaves them: an audio
//! file, an `.info.json` sidecar, and optionally a thumbnail.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let tmp = TempDir::new().unwrap();
//! write_episode(tmp.path(), &Episode::new("2024-05-01", "Talk", "abc"));
//! let report = scan(tmp.path(), &test_config()).unwrap();
//! ```

use std::path::Path;

use crate::config::FeedConfig;
use crate::types::FeedItem;

/// Stock config pointed at a recognizable base URL.
pub fn test_config() -> FeedConfig {
    let mut config = FeedConfig::default();
    config.channel.title = "Test Cast".to_string();
    config.channel.source = "https://www.youtube.com/@test/videos".to_string();
    config.channel.base_url = "https://example.org/pod".to_string();
    config
}

/// Thumbnail written next to an episode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Thumb {
    None,
    /// `<base>.webp`, needs normalizing.
    Source,
    /// `<base>.jpg`, already normalized.
    Standard,
}

/// One downloaded episode on disk.
#[derive(Debug, Clone)]
pub struct Episode {
    pub date: String,
    pub file_title: String,
    pub id: String,
    /// Title stored in the sidecar.
    pub title: String,
    pub description: String,
    pub duration: u64,
    pub audio: Vec<u8>,
    pub thumb: Thumb,
}

impl Episode {
    pub fn new(date: &str, title: &str, id: &str) -> Self {
        Self {
            date: date.to_string(),
            file_title: title.to_string(),
            id: id.to_string(),
            title: title.to_string(),
            description: format!("About {title}"),
            duration: 600,
            audio: b"ID3 fake audio".to_vec(),
            thumb: Thumb::None,
        }
    }

    pub fn base_name(&self) -> String {
        format!("{} {} [{}]", self.date, self.file_title, self.id)
    }

    pub fn file_name(&self) -> String {
        format!("{}.mp3", self.base_name())
    }
}

/// A single-line sidecar record.
pub fn sidecar_json(id: &str, title: &str, description: &str, duration: u64) -> String {
    serde_json::json!({
        "id": id,
        "title": title,
        "description": description,
        "duration": duration,
        "webpage_url": format!("https://www.youtube.com/watch?v={id}"),
    })
    .to_string()
}

/// Write an episode's audio, sidecar and thumbnail into `dir`.
pub fn write_episode(dir: &Path, ep: &Episode) {
    let base = ep.base_name();
    std::fs::write(dir.join(ep.file_name()), &ep.audio).unwrap();
    std::fs::write(
        dir.join(format!("{base}.info.json")),
        sidecar_json(&ep.id, &ep.title, &ep.description, ep.duration),
    )
    .unwrap();
    match ep.thumb {
        Thumb::None => {}
        Thumb::Source => std::fs::write(dir.join(format!("{base}.webp")), b"webp").unwrap(),
        Thumb::Standard => std::fs::write(dir.join(format!("{base}.jpg")), b"jpg").unwrap(),
    }
}

/// All item ids in feed order.
pub fn item_ids(items: &[FeedItem]) -> Vec<&str> {
    items.iter().map(|i| i.id.as_str()).collect()
}

/// Find an item by id. Panics if not found.
pub fn find_item<'a>(items: &'a [FeedItem], id: &str) -> &'a FeedItem {
    items.iter().find(|i| i.id == id).unwrap_or_else(|| {
        let ids = item_ids(items);
        panic!("item '{id}' not found. Available: {ids:?}")
    })
}
