//! Feed item assembly.
//!
//! Stage 2 of the feed run. Turns one scanned [`Candidate`] into a
//! [`FeedItem`] by joining:
//!
//! - id and date token from the file name ([`naming`](crate::naming))
//! - title, description and duration from the sidecar ([`metadata`](crate::metadata))
//! - byte size from the scanner
//! - the normalized thumbnail, if any ([`imaging`](crate::imaging))
//!
//! Every failure is a [`SkipReason`]: the artifact is left out of this run's
//! feed and the run carries on.

use crate::config::FeedConfig;
use crate::imaging::{ImageTranscoder, NormalizeError, ThumbnailPaths, normalize_thumbnail};
use crate::metadata::{self, MetadataError, MetadataOutcome};
use crate::naming::{NameError, parse_artifact_name};
use crate::types::{Candidate, Enclosure, FeedItem};
use chrono::NaiveDate;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Why an artifact is not in the feed.
#[derive(Error, Debug)]
pub enum SkipReason {
    #[error("missing sidecar {}", .0.display())]
    MissingSidecar(PathBuf),
    #[error("file name is not valid UTF-8")]
    NonUtf8Name,
    #[error("cannot read file: {0}")]
    Unreadable(String),
    #[error("cannot parse name: {0}")]
    UnparsableName(#[from] NameError),
    #[error("date token {0:?} is not YYYY-MM-DD")]
    InvalidDate(String),
    #[error("metadata: {0}")]
    Metadata(#[from] MetadataError),
    #[error("thumbnail: {0}")]
    Thumbnail(#[from] NormalizeError),
}

/// What to do with thumbnails that still need converting.
#[derive(Clone, Copy)]
pub enum ThumbnailMode<'a> {
    /// Convert them with the given transcoder.
    Normalize(&'a dyn ImageTranscoder),
    /// Leave them alone; only already-normalized thumbnails are referenced.
    Inspect,
}

/// Render a `YYYY-MM-DD` token as an RSS `pubDate` at midnight UTC,
/// e.g. `2024-05-01` → `Wed, 1 May 2024 00:00:00 +0000`.
pub fn render_pub_date(date: &str) -> Option<String> {
    let day = NaiveDate::parse_from_str(date, "%Y-%m-%d").ok()?;
    Some(day.format("%a, %-d %b %Y 00:00:00 +0000").to_string())
}

pub fn assemble_item(
    dir: &Path,
    candidate: &Candidate,
    config: &FeedConfig,
    mode: ThumbnailMode<'_>,
) -> Result<FeedItem, SkipReason> {
    let parsed = parse_artifact_name(&candidate.base_name)?;
    let pub_date =
        render_pub_date(&parsed.date).ok_or_else(|| SkipReason::InvalidDate(parsed.date.clone()))?;

    let outcome = metadata::load_sidecar(&candidate.sidecar, &parsed.id);
    if let MetadataOutcome::FallbackWholeDocument(_) = &outcome {
        tracing::debug!(
            file = %candidate.file_name,
            "no line matched id {}, using whole sidecar document",
            parsed.id
        );
    }
    let meta = outcome.into_result()?;

    let thumbnail = resolve_thumbnail(dir, &candidate.base_name, config, mode)?;

    Ok(FeedItem {
        id: parsed.id,
        title: meta.title,
        sort_key: candidate.base_name.clone(),
        date: parsed.date,
        pub_date,
        description: meta.description,
        enclosure: Enclosure {
            file_name: candidate.file_name.clone(),
            length: candidate.size,
            mime_type: config.media.mime_type.clone(),
        },
        thumbnail,
        duration: meta.duration.to_string(),
    })
}

/// Normalize the thumbnail if needed and return the file name the feed should
/// reference.
fn resolve_thumbnail(
    dir: &Path,
    base_name: &str,
    config: &FeedConfig,
    mode: ThumbnailMode<'_>,
) -> Result<Option<String>, NormalizeError> {
    let thumbs = &config.thumbnails;
    let paths = ThumbnailPaths::new(
        dir,
        base_name,
        &thumbs.source_extension,
        &thumbs.standard_extension,
    );

    if let ThumbnailMode::Normalize(transcoder) = mode
        && paths.source.is_file()
        && let Err(e) = normalize_thumbnail(transcoder, &paths.source, &paths.standard)
    {
        if thumbs.drop_item_on_failure {
            return Err(e);
        }
        tracing::warn!(base = base_name, error = %e, "publishing without thumbnail");
        return Ok(None);
    }

    Ok(paths
        .standard
        .is_file()
        .then(|| format!("{base_name}.{}", thumbs.standard_extension)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::imaging::backend::tests::{MockBehavior, MockTranscoder};
    use crate::scan::scan;
    use crate::test_helpers::*;
    use tempfile::TempDir;

    fn only_candidate(dir: &Path) -> Candidate {
        let mut report = scan(dir, &test_config()).unwrap();
        assert_eq!(report.candidates.len(), 1);
        report.candidates.remove(0)
    }

    #[test]
    fn pub_date_is_midnight_utc() {
        assert_eq!(
            render_pub_date("2024-05-01").as_deref(),
            Some("Wed, 1 May 2024 00:00:00 +0000")
        );
        assert_eq!(
            render_pub_date("2023-12-25").as_deref(),
            Some("Mon, 25 Dec 2023 00:00:00 +0000")
        );
    }

    #[test]
    fn pub_date_rejects_non_calendar_tokens() {
        assert_eq!(render_pub_date("NA"), None);
        assert_eq!(render_pub_date("2024-13-01"), None);
        assert_eq!(render_pub_date("2024-02-30"), None);
        assert_eq!(render_pub_date("20240501"), None);
    }

    #[test]
    fn assembles_item_from_name_and_sidecar() {
        let tmp = TempDir::new().unwrap();
        let mut ep = Episode::new("2024-05-01", "Q_A Live", "abc123");
        ep.title = "Q&A: Live?".to_string();
        ep.description = "Line one\nLine two".to_string();
        ep.duration = 3725;
        write_episode(tmp.path(), &ep);

        let candidate = only_candidate(tmp.path());
        let item = assemble_item(tmp.path(), &candidate, &test_config(), ThumbnailMode::Inspect)
            .unwrap();

        assert_eq!(item.id, "abc123");
        assert_eq!(item.title, "Q&A: Live?");
        assert_eq!(item.sort_key, "2024-05-01 Q_A Live [abc123]");
        assert_eq!(item.pub_date, "Wed, 1 May 2024 00:00:00 +0000");
        assert_eq!(item.description, "Line one\nLine two");
        assert_eq!(item.duration, "3725");
        assert_eq!(item.enclosure.file_name, "2024-05-01 Q_A Live [abc123].mp3");
        assert_eq!(item.enclosure.length, ep.audio.len() as u64);
        assert_eq!(item.enclosure.mime_type, "audio/mpeg");
        assert_eq!(item.thumbnail, None);
    }

    #[test]
    fn unparsable_name_is_skipped() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(tmp.path().join("2024-05-01 My Talk.mp3"), b"a").unwrap();
        std::fs::write(
            tmp.path().join("2024-05-01 My Talk.info.json"),
            sidecar_json("abc", "My Talk", "", 1),
        )
        .unwrap();

        let candidate = only_candidate(tmp.path());
        let result = assemble_item(tmp.path(), &candidate, &test_config(), ThumbnailMode::Inspect);
        assert!(matches!(
            result,
            Err(SkipReason::UnparsableName(NameError::MissingId))
        ));
    }

    #[test]
    fn bad_date_is_skipped_before_touching_thumbnail() {
        let tmp = TempDir::new().unwrap();
        let mut ep = Episode::new("NA", "Talk", "abc");
        ep.thumb = Thumb::Source;
        write_episode(tmp.path(), &ep);

        let mock = MockTranscoder::succeeding();
        let candidate = only_candidate(tmp.path());
        let result = assemble_item(
            tmp.path(),
            &candidate,
            &test_config(),
            ThumbnailMode::Normalize(&mock),
        );
        assert!(matches!(result, Err(SkipReason::InvalidDate(d)) if d == "NA"));
        assert!(mock.get_operations().is_empty());
    }

    #[test]
    fn whole_document_sidecar_with_null_id_is_used() {
        let tmp = TempDir::new().unwrap();
        let ep = Episode::new("2024-05-01", "Talk", "abc");
        write_episode(tmp.path(), &ep);
        std::fs::write(
            tmp.path().join(format!("{}.info.json", ep.base_name())),
            "{\n  \"id\": null,\n  \"title\": \"Real Title\",\n  \"duration\": 42\n}\n",
        )
        .unwrap();

        let candidate = only_candidate(tmp.path());
        let item = assemble_item(tmp.path(), &candidate, &test_config(), ThumbnailMode::Inspect)
            .unwrap();
        assert_eq!(item.id, "abc");
        assert_eq!(item.title, "Real Title");
        assert_eq!(item.duration, "42");
    }

    #[test]
    fn broken_sidecar_is_skipped() {
        let tmp = TempDir::new().unwrap();
        let ep = Episode::new("2024-05-01", "Talk", "abc");
        write_episode(tmp.path(), &ep);
        std::fs::write(
            tmp.path().join(format!("{}.info.json", ep.base_name())),
            "{\"id\": \"abc\",",
        )
        .unwrap();

        let candidate = only_candidate(tmp.path());
        let result = assemble_item(tmp.path(), &candidate, &test_config(), ThumbnailMode::Inspect);
        assert!(matches!(result, Err(SkipReason::Metadata(_))));
    }

    #[test]
    fn source_thumbnail_is_normalized_and_referenced() {
        let tmp = TempDir::new().unwrap();
        let mut ep = Episode::new("2024-05-01", "Talk", "abc");
        ep.thumb = Thumb::Source;
        write_episode(tmp.path(), &ep);

        let mock = MockTranscoder::succeeding();
        let candidate = only_candidate(tmp.path());
        let item = assemble_item(
            tmp.path(),
            &candidate,
            &test_config(),
            ThumbnailMode::Normalize(&mock),
        )
        .unwrap();

        assert_eq!(item.thumbnail.as_deref(), Some("2024-05-01 Talk [abc].jpg"));
        assert!(!tmp.path().join("2024-05-01 Talk [abc].webp").exists());
        assert!(tmp.path().join("2024-05-01 Talk [abc].jpg").exists());
    }

    #[test]
    fn existing_standard_thumbnail_is_referenced_without_conversion() {
        let tmp = TempDir::new().unwrap();
        let mut ep = Episode::new("2024-05-01", "Talk", "abc");
        ep.thumb = Thumb::Standard;
        write_episode(tmp.path(), &ep);

        let mock = MockTranscoder::succeeding();
        let candidate = only_candidate(tmp.path());
        let item = assemble_item(
            tmp.path(),
            &candidate,
            &test_config(),
            ThumbnailMode::Normalize(&mock),
        )
        .unwrap();

        assert_eq!(item.thumbnail.as_deref(), Some("2024-05-01 Talk [abc].jpg"));
        assert!(mock.get_operations().is_empty());
    }

    #[test]
    fn thumbnail_failure_drops_item_by_default() {
        let tmp = TempDir::new().unwrap();
        let mut ep = Episode::new("2024-05-01", "Talk", "abc");
        ep.thumb = Thumb::Source;
        write_episode(tmp.path(), &ep);

        let mock = MockTranscoder::new(MockBehavior::Fail);
        let candidate = only_candidate(tmp.path());
        let result = assemble_item(
            tmp.path(),
            &candidate,
            &test_config(),
            ThumbnailMode::Normalize(&mock),
        );
        assert!(matches!(
            result,
            Err(SkipReason::Thumbnail(NormalizeError::Transcoder(_)))
        ));
        assert!(tmp.path().join("2024-05-01 Talk [abc].webp").exists());
    }

    #[test]
    fn thumbnail_failure_keeps_item_when_configured() {
        let tmp = TempDir::new().unwrap();
        let mut ep = Episode::new("2024-05-01", "Talk", "abc");
        ep.thumb = Thumb::Source;
        write_episode(tmp.path(), &ep);

        let mut config = test_config();
        config.thumbnails.drop_item_on_failure = false;
        let mock = MockTranscoder::new(MockBehavior::SucceedWithoutOutput);
        let candidate = only_candidate(tmp.path());
        let item =
            assemble_item(tmp.path(), &candidate, &config, ThumbnailMode::Normalize(&mock))
                .unwrap();
        assert_eq!(item.thumbnail, None);
    }

    #[test]
    fn inspect_mode_leaves_source_thumbnail_alone() {
        let tmp = TempDir::new().unwrap();
        let mut ep = Episode::new("2024-05-01", "Talk", "abc");
        ep.thumb = Thumb::Source;
        write_episode(tmp.path(), &ep);

        let candidate = only_candidate(tmp.path());
        let item = assemble_item(tmp.path(), &candidate, &test_config(), ThumbnailMode::Inspect)
            .unwrap();
        assert_eq!(item.thumbnail, None);
        assert!(tmp.path().join("2024-05-01 Talk [abc].webp").exists());
    }
}
