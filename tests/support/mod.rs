#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use serde_json::{json, Value};
use shortcode_feeds::{
    cache::{Cache, ManualClock, MemoryStore, DEFAULT_TTL},
    feed::HttpFeedClient,
    Pipeline,
};

pub struct Harness {
    pub pipeline: Pipeline,
    pub store: Arc<MemoryStore>,
    pub clock: Arc<ManualClock>,
}

pub fn harness(origin: &str) -> Harness {
    harness_with_timeout(origin, Duration::from_secs(5))
}

pub fn harness_with_timeout(origin: &str, timeout: Duration) -> Harness {
    let store = Arc::new(MemoryStore::new());
    let clock = Arc::new(ManualClock::new(1_700_000_000_000));
    let feed = HttpFeedClient::new(origin, timeout).unwrap();
    let cache = Cache::new(store.clone(), clock.clone(), DEFAULT_TTL);

    Harness {
        pipeline: Pipeline::new(Arc::new(feed), cache),
        store,
        clock,
    }
}

/// An origin that accepts connections and never answers.
pub async fn silent_origin() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((socket, _)) = listener.accept().await {
            held.push(socket);
        }
    });
    format!("http://{addr}")
}

pub fn entry(n: usize) -> Value {
    json!({
        "title": {"$t": format!("Trip {n}")},
        "author": [{"name": {"$t": "Linh"}}],
        "published": {"$t": format!("2024-05-0{n}T08:00:00.000+07:00")},
        "link": [
            {"rel": "replies", "href": format!("https://blog.example/feeds/{n}/comments")},
            {"rel": "alternate", "href": format!("https://blog.example/2024/05/trip-{n}.html")}
        ],
        "thr$total": {"$t": format!("{n}")},
        "content": {"$t": format!(
            "<p>Day {n} on the road.</p><img src=\"https://blogger.example/img/s220/trip{n}.jpg\">"
        )},
        "category": [{"term": "Travel"}]
    })
}

pub fn feed_body(count: usize) -> String {
    let entries: Vec<Value> = (1..=count).map(entry).collect();
    json!({"feed": {"entry": entries}}).to_string()
}
