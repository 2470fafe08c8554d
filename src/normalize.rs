//! Turning raw index hits into display-ready records.
//!
//! Everything here is pure: the same hits and query always produce the same
//! records.

use crate::vector_store::RawHit;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Opening tag wrapped around highlighted words.
pub const HIGHLIGHT_OPEN: &str = "<span class=\"highlight\">";
/// Closing tag wrapped around highlighted words.
pub const HIGHLIGHT_CLOSE: &str = "</span>";

/// A search hit ready for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayRecord {
    /// Escaped transcript text with highlight spans around query words.
    pub clip_text: String,
    pub video_title: String,
    /// Offset in seconds, as returned by the index.
    pub start: u64,
    /// Embeddable player URL seeking to the clip.
    pub video_url: String,
    /// `""` or `"{h}:"`.
    pub hours: String,
    pub mins: String,
    pub secs: String,
    /// The query this record was produced for.
    pub query: String,
}

impl DisplayRecord {
    /// The clip offset as shown to users, e.g. `1:02:05` or `1:05`.
    pub fn timestamp(&self) -> String {
        format!("{}{}:{}", self.hours, self.mins, self.secs)
    }
}

/// Split a second offset into `(hours, mins, secs)` display parts.
///
/// Hours are omitted when zero; minutes are only zero-padded when hours are
/// shown.
pub fn split_timestamp(start: u64) -> (String, String, String) {
    let hours = start / 3600;
    let mins = (start % 3600) / 60;
    let secs = start % 60;

    if hours == 0 {
        (String::new(), mins.to_string(), format!("{:02}", secs))
    } else {
        (
            format!("{}:", hours),
            format!("{:02}", mins),
            format!("{:02}", secs),
        )
    }
}

/// Rewrite a watch-page URL into its embeddable-player form.
///
/// This is a literal substring rewrite; URLs without the watch markers pass
/// through unchanged.
pub fn embed_url(video_url: &str) -> String {
    video_url
        .replace("watch?v=", "embed/")
        .replace("&t=", "?start=")
}

/// Escape HTML entities.
pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Wrap every whitespace-separated word of `text` that matches a query word,
/// case-insensitively, in a highlight span.
///
/// Words are re-joined with single spaces, so runs of whitespace collapse.
pub fn highlight_matches(text: &str, query: &str) -> String {
    let query_words: HashSet<String> = query.split_whitespace().map(str::to_uppercase).collect();

    text.split_whitespace()
        .map(|word| {
            let escaped = html_escape(word);
            if query_words.contains(&word.to_uppercase()) {
                format!("{}{}{}", HIGHLIGHT_OPEN, escaped, HIGHLIGHT_CLOSE)
            } else {
                escaped
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Normalize a single hit for `query`.
pub fn normalize_hit(hit: &RawHit, query: &str) -> DisplayRecord {
    let (hours, mins, secs) = split_timestamp(hit.start);

    DisplayRecord {
        clip_text: highlight_matches(&hit.clip_text, query),
        video_title: hit.video_title.clone(),
        start: hit.start,
        video_url: embed_url(&hit.video_url),
        hours,
        mins,
        secs,
        query: query.to_string(),
    }
}

/// Normalize hits for `query`, keeping the index's order.
pub fn normalize(hits: &[RawHit], query: &str) -> Vec<DisplayRecord> {
    hits.iter().map(|hit| normalize_hit(hit, query)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(clip_text: &str, start: u64) -> RawHit {
        RawHit {
            clip_text: clip_text.to_string(),
            video_title: "Hivemind Ep. 12".to_string(),
            start,
            video_url: format!("https://www.youtube.com/watch?v=abc123&t={}s", start),
        }
    }

    #[test]
    fn test_split_timestamp() {
        assert_eq!(
            split_timestamp(0),
            (String::new(), "0".to_string(), "00".to_string())
        );
        assert_eq!(
            split_timestamp(65),
            (String::new(), "1".to_string(), "05".to_string())
        );
        assert_eq!(
            split_timestamp(725),
            (String::new(), "12".to_string(), "05".to_string())
        );
        assert_eq!(
            split_timestamp(3725),
            ("1:".to_string(), "02".to_string(), "05".to_string())
        );
        assert_eq!(
            split_timestamp(36000 + 59 * 60 + 59),
            ("10:".to_string(), "59".to_string(), "59".to_string())
        );
    }

    #[test]
    fn test_embed_url() {
        assert_eq!(
            embed_url("https://x/watch?v=abc&t=90s"),
            "https://x/embed/abc?start=90s"
        );
        assert_eq!(
            embed_url("https://x/watch?v=abc"),
            "https://x/embed/abc"
        );
        assert_eq!(
            embed_url("https://youtu.be/abc"),
            "https://youtu.be/abc"
        );
    }

    #[test]
    fn test_highlight_preserves_case() {
        assert_eq!(
            highlight_matches("the Quick Brown fox", "quick fox"),
            "the <span class=\"highlight\">Quick</span> Brown <span class=\"highlight\">fox</span>"
        );
    }

    #[test]
    fn test_highlight_collapses_whitespace_and_keeps_punctuation() {
        // "fox," keeps its comma, so it no longer matches "fox".
        assert_eq!(
            highlight_matches("  the   fox,\tthe FOX\n", "fox"),
            "the fox, the <span class=\"highlight\">FOX</span>"
        );
    }

    #[test]
    fn test_highlight_escapes_html() {
        assert_eq!(
            highlight_matches("<b>bold</b> & bold", "bold"),
            "&lt;b&gt;bold&lt;/b&gt; &amp; <span class=\"highlight\">bold</span>"
        );
    }

    #[test]
    fn test_highlight_empty_query_leaves_text() {
        assert_eq!(highlight_matches("just words", ""), "just words");
        assert_eq!(highlight_matches("", "words"), "");
    }

    #[test]
    fn test_normalize_hit() {
        let record = normalize_hit(&raw("the Quick Brown fox", 3725), "quick fox");

        assert_eq!(record.hours, "1:");
        assert_eq!(record.mins, "02");
        assert_eq!(record.secs, "05");
        assert_eq!(record.timestamp(), "1:02:05");
        assert_eq!(record.query, "quick fox");
        assert_eq!(
            record.video_url,
            "https://www.youtube.com/embed/abc123?start=3725s"
        );
        assert!(record.clip_text.contains("<span class=\"highlight\">Quick</span>"));
    }

    #[test]
    fn test_normalize_is_deterministic_and_ordered() {
        let hits = vec![raw("alpha beta", 65), raw("beta gamma", 5), raw("gamma", 7300)];

        let first = normalize(&hits, "beta");
        let second = normalize(&hits, "beta");
        assert_eq!(first, second);

        let starts: Vec<u64> = first.iter().map(|r| r.start).collect();
        assert_eq!(starts, vec![65, 5, 7300]);
        assert_eq!(first[0].timestamp(), "1:05");
        assert_eq!(first[1].timestamp(), "0:05");
    }
}
