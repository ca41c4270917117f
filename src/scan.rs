//! Artifact directory scanning.
//!
//! Stage 1 of the feed run. Lists the artifact directory (non-recursively),
//! selects audio files and pairs each with its metadata sidecar.
//!
//! ## Directory Layout
//!
//! ```text
//! poddir/
//! ├── castfeed.toml                          # Config (optional)
//! ├── dl-list.txt                            # yt-dlp download archive
//! ├── podthumb.jpg                           # Channel artwork
//! ├── cast.rss                               # Published feed
//! ├── 2024-05-01 My Talk [abc123].mp3        # Artifact
//! ├── 2024-05-01 My Talk [abc123].info.json  # Sidecar (required)
//! └── 2024-05-01 My Talk [abc123].webp       # Thumbnail (optional)
//! ```
//!
//! ## Output
//!
//! A [`ScanReport`] holding [`Candidate`]s sorted by file name, plus the
//! artifacts skipped here (missing sidecar, non-UTF-8 name). Only a failure to
//! list the directory itself is an error.

use crate::assemble::SkipReason;
use crate::config::FeedConfig;
use crate::types::{Candidate, Skipped};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Suffix of the metadata sidecar written next to every artifact.
pub const SIDECAR_SUFFIX: &str = ".info.json";

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("cannot list {0}: {1}")]
    ReadDir(PathBuf, #[source] std::io::Error),
}

/// Scanner output.
#[derive(Debug, Default)]
pub struct ScanReport {
    pub candidates: Vec<Candidate>,
    pub skipped: Vec<Skipped>,
}

pub fn scan(dir: &Path, config: &FeedConfig) -> Result<ScanReport, ScanError> {
    let suffix = format!(".{}", config.media.audio_extension);
    let mut report = ScanReport::default();

    let entries = fs::read_dir(dir).map_err(|e| ScanError::ReadDir(dir.to_path_buf(), e))?;
    let mut entries: Vec<fs::DirEntry> = entries
        .filter_map(|e| match e {
            Ok(entry) => Some(entry),
            Err(err) => {
                tracing::warn!(dir = %dir.display(), error = %err, "unreadable directory entry");
                None
            }
        })
        .collect();
    entries.sort_by_key(|e| e.file_name());

    for entry in entries {
        let os_name = entry.file_name();
        let Some(file_name) = os_name.to_str() else {
            if os_name.to_string_lossy().ends_with(&suffix) {
                tracing::warn!(name = ?os_name, "skipping artifact with non UTF-8 name");
                report.skipped.push(Skipped {
                    file_name: os_name.to_string_lossy().to_string(),
                    reason: SkipReason::NonUtf8Name,
                });
            }
            continue;
        };
        let Some(base_name) = file_name.strip_suffix(&suffix) else {
            continue;
        };
        let metadata = match fs::metadata(entry.path()) {
            Ok(m) if m.is_file() => m,
            Ok(_) => continue,
            Err(err) => {
                tracing::warn!(file = file_name, error = %err, "cannot stat artifact");
                report.skipped.push(Skipped {
                    file_name: file_name.to_string(),
                    reason: SkipReason::Unreadable(err.to_string()),
                });
                continue;
            }
        };

        let sidecar = dir.join(format!("{base_name}{SIDECAR_SUFFIX}"));
        if !sidecar.is_file() {
            tracing::warn!(file = file_name, "missing {}", sidecar.display());
            report.skipped.push(Skipped {
                file_name: file_name.to_string(),
                reason: SkipReason::MissingSidecar(sidecar),
            });
            continue;
        }

        report.candidates.push(Candidate {
            file_name: file_name.to_string(),
            base_name: base_name.to_string(),
            size: metadata.len(),
            sidecar,
        });
    }

    Ok(report)
}
