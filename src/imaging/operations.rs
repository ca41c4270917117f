//! Thumbnail normalization.
//!
//! The downloader writes thumbnails in whatever format the source serves
//! (usually WebP), which many podcast clients refuse. [`normalize_thumbnail`]
//! converts `<base>.<source-ext>` into `<base>.<standard-ext>` through an
//! [`ImageTranscoder`], then removes the source so the next run finds only the
//! standard form.

use super::backend::{BackendError, ImageTranscoder};
use super::params::TranscodeParams;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum NormalizeError {
    #[error("transcoder failed: {0}")]
    Transcoder(#[from] BackendError),
    #[error("transcoder reported success but {0} is missing")]
    MissingOutput(PathBuf),
}

/// Thumbnail file locations for one artifact base name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThumbnailPaths {
    /// `<base>.<source-ext>`, as written by the downloader.
    pub source: PathBuf,
    /// `<base>.<standard-ext>`, the form referenced by the feed.
    pub standard: PathBuf,
}

impl ThumbnailPaths {
    /// Build both paths by appending extensions to the base name. The base
    /// name may itself contain dots, so `Path::with_extension` is not used.
    pub fn new(dir: &Path, base_name: &str, source_ext: &str, standard_ext: &str) -> Self {
        Self {
            source: dir.join(format!("{base_name}.{source_ext}")),
            standard: dir.join(format!("{base_name}.{standard_ext}")),
        }
    }
}

/// Convert `source` to `output` and delete `source`.
///
/// Success requires the transcoder to succeed AND `output` to exist afterwards.
/// A failed deletion of the source is logged; the standard thumbnail is
/// already in place, so the next run simply converts it again.
pub fn normalize_thumbnail(
    transcoder: &dyn ImageTranscoder,
    source: &Path,
    output: &Path,
) -> Result<PathBuf, NormalizeError> {
    transcoder.transcode(&TranscodeParams {
        source: source.to_path_buf(),
        output: output.to_path_buf(),
    })?;

    if !output.is_file() {
        return Err(NormalizeError::MissingOutput(output.to_path_buf()));
    }

    if let Err(e) = std::fs::remove_file(source) {
        tracing::warn!(
            source = %source.display(),
            error = %e,
            "converted thumbnail but could not remove the original"
        );
    }
    Ok(output.to_path_buf())
}
