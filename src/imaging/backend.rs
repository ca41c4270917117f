//! Image transcoder trait and shared types.
//!
//! The [`ImageTranscoder`] trait is the one capability the feed pipeline needs
//! from an image tool: turn a source image into a single standard still image.
//!
//! Two implementations ship:
//! - [`FfmpegTranscoder`](super::ffmpeg::FfmpegTranscoder) shells out to `ffmpeg`.
//! - [`RustTranscoder`](super::rust_backend::RustTranscoder) decodes and
//!   re-encodes in-process with the `image` crate.

use super::params::TranscodeParams;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("{program} exited with {status}: {stderr}")]
    ExitStatus {
        program: String,
        status: String,
        stderr: String,
    },
    #[error("Processing failed: {0}")]
    ProcessingFailed(String),
}

/// Synchronous image conversion.
///
/// `Ok(())` means the tool reported success. Callers still verify the output
/// exists, since a tool can exit cleanly without writing anything.
pub trait ImageTranscoder {
    fn transcode(&self, params: &TranscodeParams) -> Result<(), BackendError>;
}
