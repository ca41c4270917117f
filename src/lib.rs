//! # castfeed
//!
//! Turns a directory of downloaded channel media into a podcast RSS feed.
//! The directory is the data source: every `<date> <title> [<id>].mp3` with an
//! `.info.json` sidecar becomes a feed item, thumbnails are normalized to JPEG
//! along the way, and the feed is republished atomically on every run.
//!
//! # Architecture: One Pass Over the Directory
//!
//! ```text
//! 0. Acquire   yt-dlp          →  poddir/        (optional, `sync` only)
//! 1. Scan      poddir/         →  candidates     (audio + sidecar pairs)
//! 2. Assemble  candidate       →  FeedItem       (name + metadata + thumbnail)
//! 3. Render    items           →  RSS text       (sorted newest first)
//! 4. Publish   RSS text        →  poddir/cast.rss (temp file + rename)
//! ```
//!
//! Nothing is cached between runs. The feed is rebuilt from what is on disk,
//! so a failed or interrupted run is repaired by running again.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`scan`] | Stage 1: lists the directory and pairs audio files with sidecars |
//! | [`assemble`] | Stage 2: builds one [`types::FeedItem`] or a skip reason |
//! | [`feed`] | Stage 3: RSS serialization with the feed's escaping rules |
//! | [`publish`] | Stage 4: atomic replacement of the feed file |
//! | [`pipeline`] | Runs the stages; `sync`, `build_feed` and `check` entry points |
//! | [`gateway`] | Downloader seam and the yt-dlp implementation |
//! | [`naming`] | `<date> <title> [<id>]` file name parser |
//! | [`metadata`] | Sidecar JSON loading with id-matched and whole-document modes |
//! | [`imaging`] | Thumbnail conversion: ffmpeg or in-process `image` |
//! | [`config`] | `castfeed.toml` loading, merging and validation |
//! | [`types`] | Types passed between stages |
//! | [`output`] | CLI output formatting |
//!
//! # Failure Model
//!
//! A problem with one artifact (no sidecar, unparsable name, bad JSON, failed
//! thumbnail) leaves that artifact out and is logged with `tracing`. Only an
//! unreadable directory or a failed publish aborts the run, and neither touches
//! the previously published feed.

pub mod assemble;
pub mod config;
pub mod feed;
pub mod gateway;
pub mod imaging;
pub mod metadata;
pub mod naming;
pub mod output;
pub mod pipeline;
pub mod publish;
pub mod scan;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
