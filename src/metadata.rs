//! Sidecar metadata loading.
//!
//! Every artifact has a `<base>.info.json` sidecar written by the downloader.
//! It carries the authoritative title (which may contain characters that are
//! illegal in file names), the description, and the duration.
//!
//! ## Physical layouts
//!
//! Two layouts are seen in practice:
//!
//! - **Line-delimited**: one JSON record per line. The record for an artifact
//!   is the first line whose `id` equals the id parsed from the file name.
//! - **Whole-document**: the entire file is one (often pretty-printed) record.
//!
//! ## Resolution
//!
//! [`load_sidecar`] scans lines first. If no line matches, or a line is not
//! valid JSON on its own (the file is a multi-line record), the whole file is
//! parsed as one record and used unconditionally, without re-checking its id.
//! The result is a [`MetadataOutcome`]; a parse failure in either phase is a
//! value, never a panic, so the caller can skip the artifact and move on.

use serde::{Deserialize, Deserializer};
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum MetadataError {
    #[error("cannot read sidecar: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid sidecar JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Structured fields of a sidecar record.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SidecarMetadata {
    /// Record id. Empty if missing or null; numbers are rendered as text.
    #[serde(default, deserialize_with = "lenient_id")]
    pub id: String,
    pub title: String,
    /// Free text; missing or `null` reads as empty.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub description: String,
    /// Whole seconds.
    #[serde(deserialize_with = "whole_seconds")]
    pub duration: u64,
    /// The full record as parsed.
    #[serde(skip)]
    pub raw: serde_json::Value,
}

impl SidecarMetadata {
    /// Build from an already-parsed JSON value, keeping the value as `raw`.
    pub fn from_value(value: serde_json::Value) -> Result<Self, serde_json::Error> {
        let mut meta = SidecarMetadata::deserialize(&value)?;
        meta.raw = value;
        Ok(meta)
    }
}

/// How the metadata for an id was resolved.
#[derive(Debug)]
pub enum MetadataOutcome {
    /// A line-delimited record whose `id` matched.
    MatchedById(SidecarMetadata),
    /// No line matched; the whole file was used as the record.
    FallbackWholeDocument(SidecarMetadata),
    /// Neither phase produced a usable record.
    ParseFailed(MetadataError),
}

impl MetadataOutcome {
    pub fn into_result(self) -> Result<SidecarMetadata, MetadataError> {
        match self {
            MetadataOutcome::MatchedById(m) | MetadataOutcome::FallbackWholeDocument(m) => Ok(m),
            MetadataOutcome::ParseFailed(e) => Err(e),
        }
    }
}

/// Resolve the sidecar record for `id`.
pub fn load_sidecar(path: &Path, id: &str) -> MetadataOutcome {
    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) => return MetadataOutcome::ParseFailed(e.into()),
    };

    if let Some(found) = find_line_record(&content, id) {
        return match found {
            Ok(meta) => MetadataOutcome::MatchedById(meta),
            Err(e) => MetadataOutcome::ParseFailed(e.into()),
        };
    }

    match serde_json::from_str(&content).and_then(SidecarMetadata::from_value) {
        Ok(meta) => MetadataOutcome::FallbackWholeDocument(meta),
        Err(e) => MetadataOutcome::ParseFailed(e.into()),
    }
}

/// Line-delimited phase. `None` means no line matched or a line was not a
/// self-contained JSON value.
fn find_line_record(
    content: &str,
    id: &str,
) -> Option<Result<SidecarMetadata, serde_json::Error>> {
    for line in content.lines() {
        if line.trim().is_empty() {
            continue;
        }
        let value: serde_json::Value = serde_json::from_str(line).ok()?;
        if value.get("id").and_then(|v| v.as_str()) == Some(id) {
            return Some(SidecarMetadata::from_value(value));
        }
    }
    None
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

fn lenient_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => s,
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    })
}

/// Accept integer or fractional seconds; fractions are rounded.
fn whole_seconds<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    let secs = f64::deserialize(deserializer)?;
    if !secs.is_finite() || secs < 0.0 {
        return Err(serde::de::Error::custom(format!(
            "duration must be a non-negative number, got {secs}"
        )));
    }
    Ok(secs.round() as u64)
}
