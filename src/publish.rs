//! Atomic feed publication.
//!
//! The feed is written to a temporary file in the destination directory,
//! flushed to disk, then renamed over the destination. A reader (web server,
//! podcast client) always sees either the previous complete document or the
//! new complete one.
//!
//! The replacement keeps the mode of the feed it replaces, and a first
//! publish gets `0644` (subject to the umask) so a web server running as
//! another user can read it.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::{Builder, NamedTempFile};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PublishError {
    #[error("cannot stage {path}: {source}")]
    Stage {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("cannot replace {path}: {source}")]
    Persist {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Replace `path` with `contents` atomically.
///
/// The temporary file lives next to `path` so the final rename never crosses
/// filesystems. On error it is removed when dropped and `path` is untouched.
pub fn publish(path: &Path, contents: &str) -> Result<(), PublishError> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let stage = |source| PublishError::Stage {
        path: path.to_path_buf(),
        source,
    };

    let mut tmp = staging_file(dir, path).map_err(stage)?;
    tmp.write_all(contents.as_bytes()).map_err(stage)?;
    tmp.as_file().sync_all().map_err(stage)?;

    tmp.persist(path).map_err(|e| PublishError::Persist {
        path: path.to_path_buf(),
        source: e.error,
    })?;
    tracing::debug!(path = %path.display(), bytes = contents.len(), "published");
    Ok(())
}

/// Temporary file in `dir` carrying the permissions `path` should end up with.
fn staging_file(dir: &Path, path: &Path) -> std::io::Result<NamedTempFile> {
    let mut builder = Builder::new();
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        builder.permissions(fs::Permissions::from_mode(0o644));
    }
    let tmp = builder.tempfile_in(dir)?;

    if let Ok(existing) = fs::metadata(path)
        && existing.is_file()
    {
        tmp.as_file().set_permissions(existing.permissions())?;
    }
    Ok(tmp)
}
