//! The two fixed post-list layouts.
//!
//! Rendering is a pure function of the style and the posts. Titles, authors
//! and URLs are escaped; summaries are already plain text extracted from post
//! markup and pass through as-is.

use tracing::warn;

use crate::encode::escape_html;
use crate::feed::NormalizedPost;

/// Shown in place of a layout when the feed returned no posts.
pub const EMPTY_STATE_HTML: &str = r#"<p class="sc-empty">No posts found.</p>"#;

/// How many posts the featured layout lists next to the featured one.
const FEATURED_SIDE_ITEMS: usize = 4;

const COMPACT_IMAGE_STYLE: &str = "width: 300px; height: 200px; object-fit: cover;";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    /// `Style-1`: every post as a full row.
    List,
    /// `Style-2`: first post featured, the next few as compact items.
    Featured,
}

impl Layout {
    pub fn from_style(style: &str) -> Option<Self> {
        match style {
            "1" => Some(Layout::List),
            "2" => Some(Layout::Featured),
            _ => None,
        }
    }

    pub fn render(self, posts: &[NormalizedPost]) -> String {
        if posts.is_empty() {
            return EMPTY_STATE_HTML.to_string();
        }

        match self {
            Layout::List => posts.iter().map(list_row).collect(),
            Layout::Featured => featured(&posts[0], &posts[1..]),
        }
    }
}

/// Renders `posts` with the layout named by `style`. Unknown styles render
/// to an empty fragment.
pub fn render(style: &str, posts: &[NormalizedPost]) -> String {
    match Layout::from_style(style) {
        Some(layout) => layout.render(posts),
        None => {
            warn!("no layout for shortcode style '{}'", style);
            String::new()
        }
    }
}

fn thumbnail(post: &NormalizedPost, class: &str, style: Option<&str>) -> String {
    let style = style
        .map(|style| format!(r#" style="{style}""#))
        .unwrap_or_default();
    format!(
        r#"<img src="{}" class="{}" loading="lazy" alt="thumb"{}>"#,
        escape_html(&post.thumbnail_url),
        class,
        style
    )
}

fn title_link(post: &NormalizedPost, heading: &str) -> String {
    format!(
        r#"<{heading}><a href="{}">{}</a></{heading}>"#,
        escape_html(&post.permalink),
        escape_html(&post.title)
    )
}

fn full_byline(post: &NormalizedPost) -> String {
    format!(
        "<small>{} – {} • {} comments</small>",
        escape_html(&post.author),
        post.published_date,
        post.comment_count
    )
}

fn list_row(post: &NormalizedPost) -> String {
    let class = if post.index == 0 {
        "sc-thumb sc-thumb-large"
    } else {
        "sc-thumb"
    };

    format!(
        r#"<div class="sc-post" style="display:flex;gap:12px;margin-bottom:20px;">{}<div class="sc-content"><div class="sc-tags">{}</div>{}{}<p>{}</p></div></div>"#,
        thumbnail(post, class, None),
        post.primary_tag_html,
        title_link(post, "h3"),
        full_byline(post),
        post.summary
    )
}

fn featured(first: &NormalizedPost, rest: &[NormalizedPost]) -> String {
    let left = format!(
        r#"<div class="sc2-left">{}<div class="sc-content"><div class="sc-tags">{}</div>{}{}<p>{}</p></div></div>"#,
        thumbnail(first, "sc-thumb sc-thumb-large", Some(COMPACT_IMAGE_STYLE)),
        first.primary_tag_html,
        title_link(first, "h3"),
        full_byline(first),
        first.summary
    );

    let items: String = rest
        .iter()
        .take(FEATURED_SIDE_ITEMS)
        .map(|post| {
            format!(
                r#"<div class="sc2-item">{}<div class="sc-content">{}<small>{} • {} comments</small><p>{}</p></div></div>"#,
                thumbnail(post, "sc-thumb", Some(COMPACT_IMAGE_STYLE)),
                title_link(post, "h4"),
                post.published_date,
                post.comment_count,
                post.summary
            )
        })
        .collect();

    format!(r#"<div class="sc2-wrapper">{left}<div class="sc2-right">{items}</div></div>"#)
}
