//! In-process transcoder built on the `image` crate.
//!
//! | Step | Crate / function |
//! |---|---|
//! | Decode (WebP, JPEG, PNG) | `image::ImageReader` |
//! | Animated WebP | decoder yields the first frame |
//! | Encode → JPEG | `image::codecs::jpeg::JpegEncoder` |
//! | Encode → PNG | `image::codecs::png::PngEncoder` |

use super::backend::{BackendError, ImageTranscoder};
use super::params::{Quality, TranscodeParams};
use image::{DynamicImage, ImageReader};
use std::io::BufWriter;
use std::path::Path;

/// In-process transcoder built on the `image` crate.
pub struct RustTranscoder {
    quality: Quality,
}

impl RustTranscoder {
    pub fn new(quality: Quality) -> Self {
        Self { quality }
    }
}

impl Default for RustTranscoder {
    fn default() -> Self {
        Self::new(Quality::default())
    }
}

/// Load and decode an image from disk.
fn load_image(path: &Path) -> Result<DynamicImage, BackendError> {
    ImageReader::open(path)
        .map_err(BackendError::Io)?
        .with_guessed_format()
        .map_err(BackendError::Io)?
        .decode()
        .map_err(|e| {
            BackendError::ProcessingFailed(format!("Failed to decode {}: {}", path.display(), e))
        })
}

/// Save an image in the format selected by the output extension.
fn save_image(img: &DynamicImage, path: &Path, quality: Quality) -> Result<(), BackendError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    match ext.as_str() {
        "jpg" | "jpeg" => {
            let writer = BufWriter::new(std::fs::File::create(path)?);
            let encoder =
                image::codecs::jpeg::JpegEncoder::new_with_quality(writer, quality.value());
            // JPEG has no alpha channel
            DynamicImage::ImageRgb8(img.to_rgb8())
                .write_with_encoder(encoder)
                .map_err(|e| BackendError::ProcessingFailed(format!("JPEG encode failed: {e}")))
        }
        "png" => {
            let writer = BufWriter::new(std::fs::File::create(path)?);
            let encoder = image::codecs::png::PngEncoder::new(writer);
            img.write_with_encoder(encoder)
                .map_err(|e| BackendError::ProcessingFailed(format!("PNG encode failed: {e}")))
        }
        other => Err(BackendError::ProcessingFailed(format!(
            "Unsupported output format: {}",
            other
        ))),
    }
}

impl ImageTranscoder for RustTranscoder {
    fn transcode(&self, params: &TranscodeParams) -> Result<(), BackendError> {
        let img = load_image(&params.source)?;
        let result = save_image(&img, &params.output, self.quality);
        if result.is_err() && params.output.exists() {
            // The encoder may have failed after creating the file.
            if let Err(e) = std::fs::remove_file(&params.output) {
                tracing::warn!(
                    output = %params.output.display(),
                    error = %e,
                    "could not remove partial thumbnail"
                );
            }
        }
        result
    }
}
