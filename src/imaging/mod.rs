//! Thumbnail image conversion.
//!
//! | Piece | Role |
//! |---|---|
//! | [`ImageTranscoder`] | the capability: source image → single still image |
//! | [`FfmpegTranscoder`] | shells out to `ffmpeg` |
//! | [`RustTranscoder`] | in-process, `image` crate |
//! | [`normalize_thumbnail`] | transcode, verify output, delete source |
//!
//! The module is split into:
//! - **Parameters**: what to convert ([`TranscodeParams`], [`Quality`])
//! - **Backend**: [`ImageTranscoder`] trait and its implementations
//! - **Operations**: the normalization step the pipeline calls

pub mod backend;
pub mod ffmpeg;
pub mod operations;
mod params;
pub mod rust_backend;

use crate::config::{ThumbnailsConfig, TranscoderKind};

pub use backend::{BackendError, ImageTranscoder};
pub use ffmpeg::FfmpegTranscoder;
pub use operations::{NormalizeError, ThumbnailPaths, normalize_thumbnail};
pub use params::{Quality, TranscodeParams};
pub use rust_backend::RustTranscoder;

/// Build the transcoder selected in config.
pub fn transcoder_from_config(config: &ThumbnailsConfig) -> Box<dyn ImageTranscoder> {
    match config.transcoder {
        TranscoderKind::Ffmpeg => Box::new(FfmpegTranscoder::new(config.ffmpeg.clone())),
        TranscoderKind::Builtin => Box::new(RustTranscoder::new(Quality::new(config.jpeg_quality))),
    }
}
