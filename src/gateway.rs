//! Media acquisition.
//!
//! Downloading is delegated to `yt-dlp`, which leaves artifacts in the
//! directory using the naming convention parsed by [`naming`](crate::naming).
//! The [`AcquisitionGateway`] trait keeps the feed run independent of the
//! downloader so tests can substitute a recording double.
//!
//! ## Fetch Mode
//!
//! The first sync walks the whole channel. Once yt-dlp's download archive
//! exists, only the most recent `window` uploads are re-checked:
//!
//! | Archive file | Mode |
//! |---|---|
//! | absent | [`FetchMode::FullSync`] |
//! | present | [`FetchMode::IncrementalWindow`] |

use crate::config::AcquisitionConfig;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use thiserror::Error;

/// Output template for artifacts: `<date> <title> [<id>].<ext>`.
pub const OUTPUT_TEMPLATE: &str =
    "%(release_date>%Y-%m-%d,upload_date>%Y-%m-%d)s %(title)s [%(id)s].%(ext)s";

/// Where the channel's own artwork lands.
pub const CHANNEL_THUMBNAIL_TEMPLATE: &str = "pl_thumbnail:podthumb.%(ext)s";

/// Suppresses the playlist-level info json.
pub const CHANNEL_INFOJSON_TEMPLATE: &str = "pl_infojson:";

#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("cannot run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
    #[error("{program} exited with {status}")]
    ExitStatus { program: String, status: String },
}

/// How much of the channel to walk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchMode {
    FullSync,
    /// Only the `depth` most recent uploads.
    IncrementalWindow { depth: u32 },
}

impl FetchMode {
    pub fn for_archive(archive: &Path, depth: u32) -> Self {
        if archive.is_file() {
            FetchMode::IncrementalWindow { depth }
        } else {
            FetchMode::FullSync
        }
    }
}

impl std::fmt::Display for FetchMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FetchMode::FullSync => write!(f, "full sync"),
            FetchMode::IncrementalWindow { depth } => write!(f, "latest {depth}"),
        }
    }
}

/// Fetches new media for a channel into the artifact directory.
pub trait AcquisitionGateway {
    fn acquire(&self, source: &str, mode: FetchMode) -> Result<(), GatewayError>;
}

/// Runs yt-dlp inside the artifact directory.
pub struct YtDlpGateway {
    dir: PathBuf,
    config: AcquisitionConfig,
}

impl YtDlpGateway {
    pub fn new(dir: impl Into<PathBuf>, config: &AcquisitionConfig) -> Self {
        Self {
            dir: dir.into(),
            config: config.clone(),
        }
    }

    fn args(&self, source: &str, mode: FetchMode) -> Vec<String> {
        let c = &self.config;
        let mut args: Vec<String> = vec![
            "-o".into(),
            OUTPUT_TEMPLATE.into(),
            "-o".into(),
            CHANNEL_THUMBNAIL_TEMPLATE.into(),
            "-o".into(),
            CHANNEL_INFOJSON_TEMPLATE.into(),
            "-f".into(),
            c.format.clone(),
            "-x".into(),
            "--audio-format".into(),
            c.audio_format.clone(),
            "--audio-quality".into(),
            c.audio_quality.clone(),
            "--write-info-json".into(),
            "--write-thumbnail".into(),
            "--match-filters".into(),
            "!is_live".into(),
            "--ignore-errors".into(),
            "--download-archive".into(),
            c.archive_file.clone(),
        ];
        if let FetchMode::IncrementalWindow { depth } = mode {
            args.extend([
                String::from("--playlist-start"),
                String::from("1"),
                String::from("--playlist-end"),
                depth.to_string(),
            ]);
        }
        args.push(source.to_string());
        args
    }
}

impl AcquisitionGateway for YtDlpGateway {
    fn acquire(&self, source: &str, mode: FetchMode) -> Result<(), GatewayError> {
        let program = &self.config.program;
        tracing::info!(%program, %source, %mode, dir = %self.dir.display(), "acquiring");
        let status = Command::new(program)
            .args(self.args(source, mode))
            .current_dir(&self.dir)
            .stdin(Stdio::null())
            .status()
            .map_err(|source| GatewayError::Spawn {
                program: program.clone(),
                source,
            })?;

        if status.success() {
            Ok(())
        } else {
            Err(GatewayError::ExitStatus {
                program: program.clone(),
                status: status.to_string(),
            })
        }
    }
}
