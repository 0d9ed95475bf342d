//! Per-shortcode orchestration.
//!
//! A run scans the document, swaps every matched text node for an empty
//! `shortcode-style-{S}` container, then drives one independent pipeline per
//! container: cache lookup, feed fetch, render, cache write. Pipelines share
//! nothing but the cache and complete in any order; each fills only its own
//! container, and a failing one shows [`LOAD_ERROR_HTML`] without affecting
//! the rest.

use std::sync::Arc;

use futures::stream::{FuturesUnordered, StreamExt};
use tracing::{debug, error, info};

use crate::cache::{Cache, CacheEntry, MokaStore, SystemClock};
use crate::config::Config;
use crate::document::{DocumentError, DocumentTree, NodeId};
use crate::feed::{FeedError, FeedSource, HttpFeedClient};
use crate::render::render;
use crate::shortcode::{scan, ShortcodeToken};

pub const LOAD_ERROR_HTML: &str = "<p>Unable to load posts.</p>";

#[derive(Debug)]
pub enum Resolution {
    Cached(String),
    Rendered(String),
    Failed(FeedError),
}

impl Resolution {
    /// What the shortcode's container should hold.
    pub fn html(&self) -> &str {
        match self {
            Resolution::Cached(html) | Resolution::Rendered(html) => html,
            Resolution::Failed(_) => LOAD_ERROR_HTML,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub matched: usize,
    pub cached: usize,
    pub rendered: usize,
    pub failed: usize,
}

impl RunSummary {
    fn record(&mut self, resolution: &Resolution) {
        match resolution {
            Resolution::Cached(_) => self.cached += 1,
            Resolution::Rendered(_) => self.rendered += 1,
            Resolution::Failed(_) => self.failed += 1,
        }
    }
}

#[derive(Clone)]
pub struct Pipeline {
    feed: Arc<dyn FeedSource>,
    cache: Cache,
}

impl Pipeline {
    pub fn new(feed: Arc<dyn FeedSource>, cache: Cache) -> Self {
        Self { feed, cache }
    }

    /// Production wiring: HTTP feed client, process-wide moka store, wall clock.
    pub fn from_config(config: &Config) -> Result<Self, FeedError> {
        let feed = HttpFeedClient::new(&config.origin, config.fetch_timeout)?;
        let cache = Cache::new(
            Arc::new(MokaStore::new(config.cache_capacity)),
            Arc::new(SystemClock),
            config.cache_ttl,
        );

        Ok(Self::new(Arc::new(feed), cache))
    }

    pub fn cache(&self) -> &Cache {
        &self.cache
    }

    /// Produces the HTML for one shortcode, from cache when fresh.
    pub async fn resolve(&self, token: &ShortcodeToken) -> Resolution {
        let key = token.cache_key();
        let started = self.cache.now_millis();

        if let Some(entry) = self.cache.get(&key).await {
            return Resolution::Cached(entry.html);
        }

        match self.feed.fetch_posts(&token.tag, token.limit).await {
            Ok(posts) => {
                let html = render(&token.style, &posts);
                self.cache
                    .set(&key, CacheEntry::new(html.clone(), started))
                    .await;
                Resolution::Rendered(html)
            }
            Err(e) => {
                error!("failed to load posts for {}: {:?}", token, e);
                Resolution::Failed(e)
            }
        }
    }

    pub async fn invalidate(&self, token: &ShortcodeToken) {
        self.cache.remove(&token.cache_key()).await;
    }

    /// Replaces every shortcode in `document` and waits for all of them.
    pub async fn run<D>(&self, document: &mut D) -> Result<RunSummary, DocumentError>
    where
        D: DocumentTree + ?Sized,
    {
        let matches = scan(document);

        let mut containers: Vec<(NodeId, ShortcodeToken)> = Vec::with_capacity(matches.len());
        for found in matches {
            let class = found.token.container_class();
            let container = document.replace_with_element(found.node, &class)?;
            containers.push((container, found.token));
        }

        let mut summary = RunSummary {
            matched: containers.len(),
            ..Default::default()
        };

        let mut pending: FuturesUnordered<_> = containers
            .into_iter()
            .map(|(container, token)| async move {
                let resolution = self.resolve(&token).await;
                (container, token, resolution)
            })
            .collect();

        while let Some((container, token, resolution)) = pending.next().await {
            debug!("filling container {} for {}", container, token);
            if let Err(e) = document.set_content(container, resolution.html()) {
                error!("could not fill container for {}: {}", token, e);
            }
            summary.record(&resolution);
        }

        info!(
            "processed {} shortcodes (cached: {}, rendered: {}, failed: {})",
            summary.matched, summary.cached, summary.rendered, summary.failed
        );

        Ok(summary)
    }
}
