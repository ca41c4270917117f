//! RSS 2.0 feed serialization.
//!
//! Stage 3 of the feed run. Renders the channel header, one `<item>` block per
//! [`FeedItem`] in the order given, and the closing tags. The output is built
//! by hand so the escaping rules stay exactly as podcast clients have always
//! seen them from this tool:
//!
//! - [`xmlsafe`] escapes only `&`, `>` and `<`
//! - [`urlsafe`] percent-encodes every byte outside `[A-Za-z0-9-_.()]`
//!
//! ## Output Shape
//!
//! ```text
//! <?xml version="1.0" encoding="UTF-8"?>
//! <rss ...>
//! <channel>
//! ...channel fields...
//! <item>
//!  <title>My Talk</title>
//!  ...
//! </item>
//! </channel></rss>
//! ```

use crate::config::FeedConfig;
use crate::types::FeedItem;
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use std::fmt::Write;

/// Closing tags of every feed document.
pub const FEED_FOOTER: &str = "</channel></rss>\n";

/// Escape text for XML content: `&` first, then `>`, then `<`.
///
/// Quotes and apostrophes pass through unchanged.
pub fn xmlsafe(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('>', "&gt;")
        .replace('<', "&lt;")
}

/// Bytes left as-is in file names placed in URLs: ASCII alphanumerics and `-_.()`.
const PATH_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'(')
    .remove(b')');

/// Percent-encode a file name for use as a URL path segment.
///
/// Works on UTF-8 bytes; a multi-byte character becomes several `%XX` groups.
pub fn urlsafe(text: &str) -> String {
    utf8_percent_encode(text, PATH_SEGMENT).to_string()
}

/// One indented item field, `" <name>value</name>\n"`.
///
/// `value` is written as given; callers escape it.
fn tag(out: &mut String, name: &str, value: &str) {
    let _ = writeln!(out, " <{name}>{value}</{name}>");
}

/// The channel header, everything up to the first `<item>`.
pub fn feed_header(config: &FeedConfig) -> String {
    let channel = &config.channel;
    let base = config.base_url();
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0" xmlns:itunes="http://www.itunes.com/dtds/podcast-1.0.dtd"
xmlns:podcast="https://podcastindex.org/namespace/1.0"
xmlns:atom="http://www.w3.org/2005/Atom"
xmlns:content="http://purl.org/rss/1.0/modules/content/">
<channel>
<atom:link href="{base}/{feed}" rel="self" type="application/rss+xml" />
<title>{title}</title>
<link>{source}</link>
<language>{language}</language>
<itunes:explicit>false</itunes:explicit>
<itunes:image href="{base}/{image}" />
"#,
        feed = channel.feed_file,
        title = xmlsafe(&channel.title),
        source = xmlsafe(&channel.source),
        language = channel.language,
        image = channel.image,
    )
}

/// Append one `<item>` block.
fn write_item(out: &mut String, config: &FeedConfig, item: &FeedItem) {
    let base = config.base_url();
    let id = xmlsafe(&item.id);

    out.push_str("<item>\n");
    tag(out, "title", &xmlsafe(&item.title));
    tag(out, "pubDate", &item.pub_date);
    let _ = writeln!(out, " <guid isPermaLink=\"false\">{id}</guid>");
    tag(
        out,
        "link",
        &format!("{}{id}", xmlsafe(&config.channel.item_link_prefix)),
    );
    tag(out, "description", &xmlsafe(&item.description));
    let _ = writeln!(
        out,
        " <enclosure length=\"{}\" type=\"{}\" url=\"{base}/{}\" />",
        item.enclosure.length,
        item.enclosure.mime_type,
        urlsafe(&item.enclosure.file_name),
    );
    if let Some(thumb) = &item.thumbnail {
        let _ = writeln!(out, " <itunes:image href=\"{base}/{}\" />", urlsafe(thumb));
    }
    tag(out, "itunes:duration", &item.duration);
    out.push_str("</item>\n");
}

/// Render the complete feed document. Items are written in slice order.
pub fn render_feed(config: &FeedConfig, items: &[FeedItem]) -> String {
    let mut out = feed_header(config);
    for item in items {
        write_item(&mut out, config, item);
    }
    out.push_str(FEED_FOOTER);
    out
}
