use std::sync::LazyLock;

use derive_more::{Constructor, Display};
use regex::Regex;

use crate::encode::encode_component;

/// `[Style-<digits>/<anything but ]>/<digits>]`, matched against trimmed text.
/// Only ASCII digits and ASCII case folding of `Style` are accepted.
static SHORTCODE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\[(?i-u:style)-([0-9]+)/([^\]]+)/([0-9]+)\]$")
        .expect("shortcode pattern is valid")
});

/// One parsed shortcode: which layout, which label, how many posts.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Constructor, Display)]
#[display("[Style-{style}/{tag}/{limit}]")]
pub struct ShortcodeToken {
    pub style: String,
    pub tag: String,
    pub limit: u32,
}

impl ShortcodeToken {
    /// Parses a text node value. Surrounding whitespace is ignored; anything
    /// else that is not exactly one shortcode yields `None`.
    pub fn parse(text: &str) -> Option<Self> {
        let captures = SHORTCODE.captures(text.trim())?;
        let limit = captures[3].parse().ok()?;

        Some(Self {
            style: captures[1].to_string(),
            tag: captures[2].to_string(),
            limit,
        })
    }

    pub fn encoded_tag(&self) -> String {
        encode_component(&self.tag)
    }

    pub fn cache_key(&self) -> String {
        format!("sc-{}-{}-{}", self.style, self.encoded_tag(), self.limit)
    }

    pub fn container_class(&self) -> String {
        format!("shortcode-style-{}", self.style)
    }
}
