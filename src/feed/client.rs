use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, info};

use crate::encode::encode_component;
use crate::feed::{
    error::FeedError,
    normalize::{normalize_entry, NormalizedPost},
    types::{Feed, FeedEnvelope},
};

/// Anything that can produce the posts for one label.
#[async_trait]
pub trait FeedSource: Send + Sync {
    async fn fetch_posts(&self, tag: &str, limit: u32) -> Result<Vec<NormalizedPost>, FeedError>;
}

/// Client for a blog's `/feeds/posts/default` JSON endpoint.
#[derive(Debug, Clone)]
pub struct HttpFeedClient {
    client: Client,
    origin: String,
}

impl HttpFeedClient {
    pub fn new(origin: &str, timeout: Duration) -> Result<Self, FeedError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(FeedError::Client)?;

        Ok(Self {
            client,
            origin: origin.trim_end_matches('/').to_string(),
        })
    }

    pub fn origin(&self) -> &str {
        &self.origin
    }

    pub fn feed_url(&self, tag: &str, limit: u32) -> String {
        format!(
            "{}/feeds/posts/default/-/{}?alt=json&max-results={}",
            self.origin,
            encode_component(tag),
            limit
        )
    }

    pub async fn fetch_feed(&self, tag: &str, limit: u32) -> Result<Feed, FeedError> {
        let url = self.feed_url(tag, limit);
        debug!("fetching feed: {}", url);

        let response = self.client.get(&url).send().await.map_err(classify)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FeedError::Status(status));
        }

        let body = response.text().await.map_err(classify)?;
        let envelope: FeedEnvelope = serde_json::from_str(&body)?;

        Ok(envelope.feed)
    }
}

fn classify(e: reqwest::Error) -> FeedError {
    if e.is_timeout() {
        FeedError::Timeout
    } else {
        FeedError::Request(e)
    }
}

#[async_trait]
impl FeedSource for HttpFeedClient {
    async fn fetch_posts(&self, tag: &str, limit: u32) -> Result<Vec<NormalizedPost>, FeedError> {
        let feed = self.fetch_feed(tag, limit).await?;

        let posts: Vec<NormalizedPost> = feed
            .entry
            .iter()
            .take(limit as usize)
            .enumerate()
            .map(|(index, entry)| normalize_entry(entry, index, &self.origin))
            .collect();

        info!("fetched {} posts for label '{}'", posts.len(), tag);
        Ok(posts)
    }
}
