//! Filename parsing for the `<date> <title> [<id>]` artifact convention.
//!
//! The acquisition step names every artifact after the episode it came from:
//!
//! ```text
//! 2024-05-01 My Talk [abc123].mp3
//! ^^^^^^^^^^ ^^^^^^^  ^^^^^^
//!    date     title     id
//! ```
//!
//! The grammar is scanned directly rather than matched against a template:
//!
//! - the base name must end in `]`; the id runs from the **last** `[` to that `]`
//! - the `[` opening the id must be preceded by a space
//! - the date is everything before the first space
//! - the title is everything between the first space and the ` [` opening the id,
//!   internal spaces and brackets included
//!
//! ## Display Titles
//!
//! The title fragment here is filesystem-safe and possibly lossy (the downloader
//! replaces `:`, `/`, `?` and friends). It is validated but never displayed;
//! feed titles always come from the sidecar metadata.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NameError {
    #[error("no trailing [id] suffix")]
    MissingId,
    #[error("no leading date token")]
    MissingDate,
    #[error("no title between date and [id]")]
    MissingTitle,
}

/// Result of parsing an artifact base name like `2024-05-01 My Talk [abc123]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedName {
    /// Leading token, expected to be `YYYY-MM-DD` (not checked here).
    pub date: String,
    /// Filesystem-safe title fragment.
    pub title: String,
    /// External id from the trailing bracket pair.
    pub id: String,
}

/// Parse an artifact base name (file name without the audio extension).
///
/// - `"2024-05-01 My Talk [abc123]"` → date="2024-05-01", title="My Talk", id="abc123"
/// - `"2024-05-01 A [b] c [xyz]"` → title="A [b] c", id="xyz"
/// - `"2024-05-01 My Talk"` → `Err(MissingId)`
/// - `"2024-05-01 [abc]"` → `Err(MissingTitle)`
pub fn parse_artifact_name(base_name: &str) -> Result<ParsedName, NameError> {
    let inner = base_name.strip_suffix(']').ok_or(NameError::MissingId)?;
    let open = inner.rfind('[').ok_or(NameError::MissingId)?;
    let id = &inner[open + 1..];
    if id.is_empty() {
        return Err(NameError::MissingId);
    }

    let head = inner[..open]
        .strip_suffix(' ')
        .ok_or(NameError::MissingId)?;
    let (date, title) = head.split_once(' ').ok_or(NameError::MissingTitle)?;
    if date.is_empty() {
        return Err(NameError::MissingDate);
    }
    if title.is_empty() {
        return Err(NameError::MissingTitle);
    }

    Ok(ParsedName {
        date: date.to_string(),
        title: title.to_string(),
        id: id.to_string(),
    })
}
