//! Wire shape of the blog feed's JSON envelope.
//!
//! Every field an entry may carry is optional; defaults are applied during
//! normalization, not here.

use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Clone, Deserialize)]
pub struct FeedEnvelope {
    pub feed: Feed,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Feed {
    #[serde(default)]
    pub entry: Vec<FeedEntry>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct FeedEntry {
    pub title: Option<TextValue>,
    #[serde(default)]
    pub author: Vec<Author>,
    pub published: Option<TextValue>,
    #[serde(default)]
    pub link: Vec<Link>,
    #[serde(rename = "thr$total")]
    pub total_comments: Option<CountValue>,
    pub content: Option<TextValue>,
    pub summary: Option<TextValue>,
    #[serde(default)]
    pub category: Vec<Category>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TextValue {
    #[serde(rename = "$t", default)]
    pub text: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Author {
    pub name: Option<TextValue>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Link {
    #[serde(default)]
    pub rel: String,
    #[serde(default)]
    pub href: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Category {
    #[serde(default)]
    pub term: String,
}

/// `thr$total.$t` arrives as a string on some feeds and a number on others.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CountValue {
    #[serde(rename = "$t", default)]
    pub value: Value,
}

impl CountValue {
    pub fn count(&self) -> Option<u64> {
        match &self.value {
            Value::Number(n) => n.as_u64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_entry_list_is_empty() {
        let envelope: FeedEnvelope =
            serde_json::from_str(r#"{"feed":{"title":{"$t":"Blog"}}}"#).unwrap();
        assert!(envelope.feed.entry.is_empty());
    }

    #[test]
    fn test_missing_feed_is_an_error() {
        assert!(serde_json::from_str::<FeedEnvelope>(r#"{"version":"1.0"}"#).is_err());
    }

    #[test]
    fn test_comment_count_forms() {
        let entry: FeedEntry = serde_json::from_str(r#"{"thr$total":{"$t":"7"}}"#).unwrap();
        assert_eq!(entry.total_comments.unwrap().count(), Some(7));

        let entry: FeedEntry = serde_json::from_str(r#"{"thr$total":{"$t":12}}"#).unwrap();
        assert_eq!(entry.total_comments.unwrap().count(), Some(12));

        let entry: FeedEntry = serde_json::from_str(r#"{"thr$total":{"$t":"many"}}"#).unwrap();
        assert_eq!(entry.total_comments.unwrap().count(), None);
    }
}
