//! Turns raw feed entries into field-complete posts.
//!
//! Every field has exactly one extractor and one named default:
//!
//! | field | source | default |
//! |---|---|---|
//! | `title` | `title.$t` | [`NO_TITLE`] |
//! | `author` | `author[0].name.$t` | [`UNKNOWN_AUTHOR`] |
//! | `published_date` | `published.$t` | [`UNKNOWN_DATE`] |
//! | `permalink` | first `link` with `rel="alternate"` | [`FALLBACK_PERMALINK`] |
//! | `comment_count` | `thr$total.$t` | `0` |
//! | `summary` | non-empty `content.$t`, else `summary.$t`, tags stripped | empty |
//! | `thumbnail_url` | [`extract_thumbnail`] | [`NO_IMAGE_THUMBNAIL`] |
//! | `primary_tag_html` | `category[0].term` | empty |

use std::sync::LazyLock;

use chrono::{DateTime, NaiveDate};
use regex::Regex;

use crate::encode::{encode_component, escape_html};
use crate::feed::types::{Category, FeedEntry, TextValue};

pub const NO_TITLE: &str = "No title";
pub const UNKNOWN_AUTHOR: &str = "Unknown author";
pub const UNKNOWN_DATE: &str = "Unknown date";
pub const FALLBACK_PERMALINK: &str = "#";

pub const SUMMARY_MAX_CHARS: usize = 160;
pub const SUMMARY_KEEP_CHARS: usize = 157;
pub const ELLIPSIS: &str = "...";

pub const NO_IMAGE_THUMBNAIL: &str = "https://via.placeholder.com/640x360?text=No+Image";
const LARGE_IMAGE_SEGMENT: &str = "/s1600/";
const DATE_FORMAT: &str = "%-m/%-d/%Y";

static MARKUP_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]+>").expect("markup pattern is valid"));
static IMG_SRC: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<img[^>]+src="([^">]+)""#).expect("img pattern is valid")
});
static SIZE_SEGMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/s\d+(-c)?/").expect("size segment pattern is valid"));
static YOUTUBE_EMBED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)youtube\.com/embed/([A-Za-z0-9_-]+)").expect("youtube pattern is valid")
});
static VIMEO_PLAYER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)player\.vimeo\.com/video/(\d+)").expect("vimeo pattern is valid")
});

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedPost {
    pub index: usize,
    pub title: String,
    pub author: String,
    pub published_date: String,
    pub permalink: String,
    pub comment_count: u64,
    /// Plain text, at most [`SUMMARY_MAX_CHARS`] characters.
    pub summary: String,
    pub thumbnail_url: String,
    /// Pre-rendered label link, or empty when the entry has no categories.
    pub primary_tag_html: String,
}

pub fn normalize_entry(entry: &FeedEntry, index: usize, origin: &str) -> NormalizedPost {
    let content = non_empty(entry.content.as_ref())
        .or_else(|| non_empty(entry.summary.as_ref()))
        .unwrap_or_default();

    NormalizedPost {
        index,
        title: non_empty(entry.title.as_ref()).unwrap_or(NO_TITLE).to_string(),
        author: non_empty(entry.author.first().and_then(|a| a.name.as_ref()))
            .unwrap_or(UNKNOWN_AUTHOR)
            .to_string(),
        published_date: format_published(entry.published.as_ref().map(|p| p.text.as_str())),
        permalink: entry
            .link
            .iter()
            .find(|link| link.rel == "alternate")
            .map(|link| link.href.clone())
            .unwrap_or_else(|| FALLBACK_PERMALINK.to_string()),
        comment_count: entry
            .total_comments
            .as_ref()
            .and_then(|total| total.count())
            .unwrap_or(0),
        summary: summarize(content),
        thumbnail_url: extract_thumbnail(content),
        primary_tag_html: primary_tag_html(&entry.category, origin),
    }
}

fn non_empty(value: Option<&TextValue>) -> Option<&str> {
    value
        .map(|value| value.text.as_str())
        .filter(|text| !text.is_empty())
}

/// Formats `published.$t` as `M/D/YYYY` in the timestamp's own offset.
pub fn format_published(raw: Option<&str>) -> String {
    let Some(raw) = raw.map(str::trim).filter(|raw| !raw.is_empty()) else {
        return UNKNOWN_DATE.to_string();
    };

    if let Ok(published) = DateTime::parse_from_rfc3339(raw) {
        return published.format(DATE_FORMAT).to_string();
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map(|date| date.format(DATE_FORMAT).to_string())
        .unwrap_or_else(|_| UNKNOWN_DATE.to_string())
}

pub fn strip_markup(html: &str) -> String {
    MARKUP_TAG.replace_all(html, "").into_owned()
}

pub fn summarize(html: &str) -> String {
    let text = strip_markup(html);
    if text.chars().count() <= SUMMARY_MAX_CHARS {
        return text;
    }

    let mut summary: String = text.chars().take(SUMMARY_KEEP_CHARS).collect();
    summary.push_str(ELLIPSIS);
    summary
}

/// Picks a thumbnail for raw post markup. Rules are tried in order and the
/// first hit wins: inline image (upscaled to the 1600px variant), YouTube
/// embed, Vimeo player, then a generic placeholder.
pub fn extract_thumbnail(html: &str) -> String {
    if let Some(captures) = IMG_SRC.captures(html) {
        return SIZE_SEGMENT
            .replace(&captures[1], LARGE_IMAGE_SEGMENT)
            .into_owned();
    }

    if let Some(captures) = YOUTUBE_EMBED.captures(html) {
        return format!("https://i.ytimg.com/vi/{}/maxresdefault.jpg", &captures[1]);
    }

    if let Some(captures) = VIMEO_PLAYER.captures(html) {
        return format!(
            "https://via.placeholder.com/640x360?text=Vimeo+{}",
            &captures[1]
        );
    }

    NO_IMAGE_THUMBNAIL.to_string()
}

pub fn primary_tag_html(categories: &[Category], origin: &str) -> String {
    let Some(first) = categories.first() else {
        return String::new();
    };

    format!(
        r#"<a href="{}/search/label/{}" class="sc-tag">{}</a>"#,
        origin.trim_end_matches('/'),
        encode_component(&first.term),
        escape_html(&first.term)
    )
}
