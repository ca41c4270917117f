//! ffmpeg-backed transcoder.
//!
//! Runs `ffmpeg -y -i <source> -update 1 -frames:v 1 <output>`, which writes a
//! single still frame in the format implied by the output extension. Animated
//! sources yield their first frame.

use super::backend::{BackendError, ImageTranscoder};
use super::params::TranscodeParams;
use std::ffi::OsString;
use std::process::{Command, Stdio};

/// Keep this much of ffmpeg's stderr in error messages.
const STDERR_TAIL: usize = 400;

pub struct FfmpegTranscoder {
    program: String,
}

impl FfmpegTranscoder {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    fn args(params: &TranscodeParams) -> Vec<OsString> {
        let mut args: Vec<OsString> = ["-y", "-hide_banner", "-loglevel", "error", "-i"]
            .iter()
            .map(OsString::from)
            .collect();
        args.push(params.source.as_os_str().to_owned());
        args.extend(["-update", "1", "-frames:v", "1"].iter().map(OsString::from));
        args.push(params.output.as_os_str().to_owned());
        args
    }
}

impl ImageTranscoder for FfmpegTranscoder {
    fn transcode(&self, params: &TranscodeParams) -> Result<(), BackendError> {
        tracing::debug!(
            program = %self.program,
            source = %params.source.display(),
            output = %params.output.display(),
            "running image transcoder"
        );
        let output = Command::new(&self.program)
            .args(Self::args(params))
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .output()?;

        if output.status.success() {
            return Ok(());
        }

        let stderr = String::from_utf8_lossy(&output.stderr);
        let stderr = stderr.trim();
        let start = stderr
            .char_indices()
            .rev()
            .nth(STDERR_TAIL)
            .map(|(i, _)| i)
            .unwrap_or(0);
        Err(BackendError::ExitStatus {
            program: self.program.clone(),
            status: output.status.to_string(),
            stderr: stderr[start..].to_string(),
        })
    }
}
