//! Parameter types for image transcoding.
//!
//! These structs describe *what* to convert, not *how*. They are the interface
//! between [`operations`](super::operations) (which decides which thumbnail
//! needs converting) and the [`backend`](super::backend) (which does the work),
//! so a mock backend can stand in during tests.

use std::path::PathBuf;

/// Quality setting for lossy encoding (1-100).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quality(pub u8);

impl Quality {
    pub fn new(value: u8) -> Self {
        Self(value.clamp(1, 100))
    }

    pub fn value(self) -> u8 {
        self.0
    }
}

impl Default for Quality {
    fn default() -> Self {
        Self(90)
    }
}

/// Convert `source` into a single still image at `output`.
///
/// The output format follows the output extension.
#[derive(Debug, Clone, PartialEq)]
pub struct TranscodeParams {
    pub source: PathBuf,
    pub output: PathBuf,
}
