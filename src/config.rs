//! Feed configuration module.
//!
//! Handles loading, validating, and merging `castfeed.toml`. Stock defaults are
//! overridden by the user file, which lives in the artifact directory unless a
//! path is given with `--config`.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [channel]
//! source = "https://www.youtube.com/CHANNEL/videos"  # Upstream channel address
//! title = "TITLE"                                     # Podcast title
//! language = "en-us"
//! base_url = "https://example.org/poddir"             # Where this directory is served
//! feed_file = "cast.rss"
//! image = "podthumb.jpg"                              # Channel artwork, relative to base_url
//! item_link_prefix = "https://www.youtube.com/watch?v="
//!
//! [media]
//! audio_extension = "mp3"
//! mime_type = "audio/mpeg"
//!
//! [thumbnails]
//! source_extension = "webp"     # Format written by the downloader
//! standard_extension = "jpg"    # Format podcast clients accept
//! transcoder = "ffmpeg"         # "ffmpeg" or "builtin"
//! ffmpeg = "ffmpeg"
//! jpeg_quality = 90             # builtin transcoder only
//! drop_item_on_failure = true
//!
//! [acquisition]
//! program = "yt-dlp"
//! archive_file = "dl-list.txt"
//! window = 15
//! format = "bestaudio/best"
//! audio_format = "mp3"
//! audio_quality = "5"
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// File name of the config looked up in the artifact directory.
pub const CONFIG_FILENAME: &str = "castfeed.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("TOML serialize error: {0}")]
    TomlSer(#[from] toml::ser::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Feed configuration loaded from `castfeed.toml`.
///
/// Built once per run and passed by reference into the scanner, assembler,
/// serializer and gateway. Nothing reads it from global state.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FeedConfig {
    /// Channel-level feed fields.
    pub channel: ChannelConfig,
    /// Media artifact conventions.
    pub media: MediaConfig,
    /// Thumbnail normalization settings.
    pub thumbnails: ThumbnailsConfig,
    /// Acquisition (downloader) settings.
    pub acquisition: AcquisitionConfig,
}

impl FeedConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let url = &self.channel.base_url;
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(ConfigError::Validation(
                "channel.base_url must start with http:// or https://".into(),
            ));
        }
        if self.channel.feed_file.is_empty() || self.channel.feed_file.contains('/') {
            return Err(ConfigError::Validation(
                "channel.feed_file must be a plain file name".into(),
            ));
        }
        for (key, ext) in [
            ("media.audio_extension", &self.media.audio_extension),
            ("thumbnails.source_extension", &self.thumbnails.source_extension),
            ("thumbnails.standard_extension", &self.thumbnails.standard_extension),
        ] {
            if ext.is_empty() || ext.contains('.') || ext.contains('/') {
                return Err(ConfigError::Validation(format!(
                    "{key} must be a bare extension like \"mp3\""
                )));
            }
        }
        if self
            .thumbnails
            .source_extension
            .eq_ignore_ascii_case(&self.thumbnails.standard_extension)
        {
            return Err(ConfigError::Validation(
                "thumbnails.source_extension and standard_extension must differ".into(),
            ));
        }
        if !(1..=100).contains(&self.thumbnails.jpeg_quality) {
            return Err(ConfigError::Validation(
                "thumbnails.jpeg_quality must be 1-100".into(),
            ));
        }
        if self.acquisition.window == 0 {
            return Err(ConfigError::Validation(
                "acquisition.window must be at least 1".into(),
            ));
        }
        Ok(())
    }

    /// Base URL without a trailing slash, ready for `{base}/{file}` joins.
    pub fn base_url(&self) -> &str {
        self.channel.base_url.trim_end_matches('/')
    }
}

/// Channel-level fields rendered into the feed header.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ChannelConfig {
    /// Upstream channel address handed to the downloader and used as `<link>`.
    pub source: String,
    /// Podcast title.
    pub title: String,
    /// RSS `<language>` value.
    pub language: String,
    /// Public URL this directory is served from.
    pub base_url: String,
    /// Output feed file name, written into the artifact directory.
    pub feed_file: String,
    /// Channel artwork file name, relative to `base_url`.
    pub image: String,
    /// Per-item `<link>` is this prefix followed by the item id.
    pub item_link_prefix: String,
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self {
            source: "https://www.youtube.com/CHANNEL/videos".to_string(),
            title: "TITLE".to_string(),
            language: "en-us".to_string(),
            base_url: "https://example.org/poddir".to_string(),
            feed_file: "cast.rss".to_string(),
            image: "podthumb.jpg".to_string(),
            item_link_prefix: "https://www.youtube.com/watch?v=".to_string(),
        }
    }
}

/// Media artifact conventions.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MediaConfig {
    /// Extension (without dot) selecting audio artifacts.
    pub audio_extension: String,
    /// Enclosure MIME type.
    pub mime_type: String,
}

impl Default for MediaConfig {
    fn default() -> Self {
        Self {
            audio_extension: "mp3".to_string(),
            mime_type: "audio/mpeg".to_string(),
        }
    }
}

/// Which image transcoder normalizes thumbnails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TranscoderKind {
    /// Shell out to ffmpeg.
    Ffmpeg,
    /// Decode/encode in-process with the `image` crate.
    Builtin,
}

/// Thumbnail normalization settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ThumbnailsConfig {
    /// Extension of thumbnails as written by the downloader.
    pub source_extension: String,
    /// Extension of the normalized thumbnail referenced by the feed.
    pub standard_extension: String,
    pub transcoder: TranscoderKind,
    /// ffmpeg executable (name on `PATH` or absolute path).
    pub ffmpeg: String,
    /// JPEG quality for the builtin transcoder.
    pub jpeg_quality: u8,
    /// Exclude the whole item when its thumbnail cannot be normalized.
    /// When false, the item is published without a thumbnail.
    pub drop_item_on_failure: bool,
}

impl Default for ThumbnailsConfig {
    fn default() -> Self {
        Self {
            source_extension: "webp".to_string(),
            standard_extension: "jpg".to_string(),
            transcoder: TranscoderKind::Ffmpeg,
            ffmpeg: "ffmpeg".to_string(),
            jpeg_quality: 90,
            drop_item_on_failure: true,
        }
    }
}

/// Downloader settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AcquisitionConfig {
    /// yt-dlp executable.
    pub program: String,
    /// Download archive kept by yt-dlp, relative to the artifact directory.
    pub archive_file: String,
    /// How many recent uploads to re-check once an archive exists.
    pub window: u32,
    /// yt-dlp format selector.
    pub format: String,
    pub audio_format: String,
    pub audio_quality: String,
}

impl Default for AcquisitionConfig {
    fn default() -> Self {
        Self {
            program: "yt-dlp".to_string(),
            archive_file: "dl-list.txt".to_string(),
            window: 15,
            format: "bestaudio/best".to_string(),
            audio_format: "mp3".to_string(),
            audio_quality: "5".to_string(),
        }
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
///
/// This is the base layer user overrides are merged on top of.
pub fn stock_defaults_value() -> Result<toml::Value, ConfigError> {
    Ok(toml::Value::try_from(FeedConfig::default())?)
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load a config file as a raw TOML value.
///
/// Returns `Ok(None)` if the file does not exist.
pub fn load_raw_config(path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto the stock defaults, then deserialize and validate.
pub fn resolve_config(overlay: Option<toml::Value>) -> Result<FeedConfig, ConfigError> {
    let base = stock_defaults_value()?;
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: FeedConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Where the config lives: the explicit path if given, else `castfeed.toml`
/// in the artifact directory.
pub fn config_path(dir: &Path, explicit: Option<&Path>) -> PathBuf {
    explicit
        .map(Path::to_path_buf)
        .unwrap_or_else(|| dir.join(CONFIG_FILENAME))
}

/// Load and validate the config for an artifact directory.
///
/// A missing file at the default location yields the stock defaults; an
/// explicitly requested file must exist.
pub fn load_config(dir: &Path, explicit: Option<&Path>) -> Result<FeedConfig, ConfigError> {
    let path = config_path(dir, explicit);
    let overlay = load_raw_config(&path)?;
    if overlay.is_none() && explicit.is_some() {
        return Err(ConfigError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("config file not found: {}", path.display()),
        )));
    }
    resolve_config(overlay)
}

/// Returns a fully-commented stock `castfeed.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# castfeed configuration
# ======================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults.
#
# Place this file as castfeed.toml in the artifact directory, or pass
# --config <path>. Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Channel
# ---------------------------------------------------------------------------
[channel]
# Upstream channel address. Passed to yt-dlp and used as the feed <link>.
source = "https://www.youtube.com/CHANNEL/videos"

title = "TITLE"
language = "en-us"

# Public URL the artifact directory is served from (no trailing slash needed).
base_url = "https://example.org/poddir"

# Feed file written into the artifact directory.
feed_file = "cast.rss"

# Channel artwork, relative to base_url.
image = "podthumb.jpg"

# Each item links to this prefix followed by its id.
item_link_prefix = "https://www.youtube.com/watch?v="

# ---------------------------------------------------------------------------
# Media
# ---------------------------------------------------------------------------
[media]
audio_extension = "mp3"
mime_type = "audio/mpeg"

# ---------------------------------------------------------------------------
# Thumbnails
# ---------------------------------------------------------------------------
[thumbnails]
# Downloaded thumbnails with this extension are converted to standard_extension.
source_extension = "webp"
standard_extension = "jpg"

# "ffmpeg" shells out to ffmpeg; "builtin" converts in-process.
transcoder = "ffmpeg"
ffmpeg = "ffmpeg"

# JPEG quality used by the builtin transcoder (1-100).
jpeg_quality = 90

# When a thumbnail cannot be converted, leave the whole episode out of the
# feed (true) or publish it without artwork (false).
drop_item_on_failure = true

# ---------------------------------------------------------------------------
# Acquisition (sync command)
# ---------------------------------------------------------------------------
[acquisition]
program = "yt-dlp"

# yt-dlp download archive. Once it exists, only the most recent `window`
# uploads are re-checked.
archive_file = "dl-list.txt"
window = 15

format = "bestaudio/best"
audio_format = "mp3"
audio_quality = "5"
"##
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn default_config_has_channel_placeholders() {
        let config = FeedConfig::default();
        assert_eq!(config.channel.title, "TITLE");
        assert_eq!(config.channel.feed_file, "cast.rss");
        assert_eq!(config.channel.language, "en-us");
        assert_eq!(config.media.mime_type, "audio/mpeg");
    }

    #[test]
    fn default_config_has_thumbnail_settings() {
        let config = FeedConfig::default();
        assert_eq!(config.thumbnails.source_extension, "webp");
        assert_eq!(config.thumbnails.standard_extension, "jpg");
        assert_eq!(config.thumbnails.transcoder, TranscoderKind::Ffmpeg);
        assert!(config.thumbnails.drop_item_on_failure);
    }

    #[test]
    fn validate_default_config_passes() {
        assert!(FeedConfig::default().validate().is_ok());
    }

    #[test]
    fn parse_partial_config() {
        let toml = r#"
[channel]
title = "My Show"
"#;
        let config: FeedConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.channel.title, "My Show");
        assert_eq!(config.channel.language, "en-us");
        assert_eq!(config.acquisition.window, 15);
    }

    #[test]
    fn parse_transcoder_kind() {
        let toml = r#"
[thumbnails]
transcoder = "builtin"
"#;
        let config: FeedConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.thumbnails.transcoder, TranscoderKind::Builtin);
    }

    #[test]
    fn base_url_trailing_slash_trimmed() {
        let mut config = FeedConfig::default();
        config.channel.base_url = "https://example.org/pod/".to_string();
        assert_eq!(config.base_url(), "https://example.org/pod");
    }

    #[test]
    fn load_config_returns_default_when_no_file() {
        let tmp = TempDir::new().unwrap();
        let config = load_config(tmp.path(), None).unwrap();
        assert_eq!(config.channel.title, "TITLE");
    }

    #[test]
    fn load_config_reads_file_in_dir() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join(CONFIG_FILENAME),
            r#"
[channel]
title = "Lectures"
base_url = "https://cdn.example.net/lectures"

[acquisition]
window = 5
"#,
        )
        .unwrap();

        let config = load_config(tmp.path(), None).unwrap();
        assert_eq!(config.channel.title, "Lectures");
        assert_eq!(config.base_url(), "https://cdn.example.net/lectures");
        assert_eq!(config.acquisition.window, 5);
        assert_eq!(config.channel.feed_file, "cast.rss");
    }

    #[test]
    fn load_config_explicit_path() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("elsewhere.toml");
        fs::write(&path, "[media]\nmime_type = \"audio/mp4\"\n").unwrap();

        let config = load_config(tmp.path(), Some(&path)).unwrap();
        assert_eq!(config.media.mime_type, "audio/mp4");
    }

    #[test]
    fn load_config_explicit_missing_is_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("missing.toml");
        let result = load_config(tmp.path(), Some(&path));
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }

    #[test]
    fn load_config_invalid_toml_is_error() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(CONFIG_FILENAME), "this is not valid toml [[[").unwrap();
        let result = load_config(tmp.path(), None);
        assert!(matches!(result, Err(ConfigError::Toml(_))));
    }

    #[test]
    fn unknown_key_rejected() {
        let toml = r#"
[channel]
titel = "typo"
"#;
        let result: Result<FeedConfig, _> = toml::from_str(toml);
        assert!(result.is_err());
    }

    #[test]
    fn unknown_section_rejected() {
        let result: Result<FeedConfig, _> = toml::from_str("[bogus]\nkey = 1\n");
        assert!(result.is_err());
    }

    #[test]
    fn merge_toml_scalar_override() {
        let base: toml::Value = toml::from_str("a = 1\nb = 2").unwrap();
        let overlay: toml::Value = toml::from_str("b = 3").unwrap();
        let merged = merge_toml(base, overlay);
        assert_eq!(merged["a"].as_integer(), Some(1));
        assert_eq!(merged["b"].as_integer(), Some(3));
    }

    #[test]
    fn merge_toml_preserves_nested_keys() {
        let base = stock_defaults_value().unwrap();
        let overlay: toml::Value = toml::from_str("[channel]\ntitle = \"X\"").unwrap();
        let merged = merge_toml(base, overlay);
        assert_eq!(merged["channel"]["title"].as_str(), Some("X"));
        assert_eq!(merged["channel"]["language"].as_str(), Some("en-us"));
    }

    #[test]
    fn validate_rejects_non_http_base_url() {
        let mut config = FeedConfig::default();
        config.channel.base_url = "example.org/pod".to_string();
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn validate_rejects_dotted_extension() {
        let mut config = FeedConfig::default();
        config.media.audio_extension = ".mp3".to_string();
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn validate_rejects_identical_thumbnail_extensions() {
        let mut config = FeedConfig::default();
        config.thumbnails.source_extension = "JPG".to_string();
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn validate_rejects_zero_window() {
        let mut config = FeedConfig::default();
        config.acquisition.window = 0;
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn validate_rejects_zero_jpeg_quality() {
        let mut config = FeedConfig::default();
        config.thumbnails.jpeg_quality = 0;
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn stock_config_toml_parses_to_defaults() {
        let config: FeedConfig = toml::from_str(stock_config_toml()).unwrap();
        let defaults = FeedConfig::default();
        assert_eq!(config.channel.source, defaults.channel.source);
        assert_eq!(config.channel.base_url, defaults.channel.base_url);
        assert_eq!(config.thumbnails.jpeg_quality, defaults.thumbnails.jpeg_quality);
        assert_eq!(config.acquisition.archive_file, defaults.acquisition.archive_file);
        assert!(config.validate().is_ok());
    }
}
