pub mod client;
pub mod error;
pub mod normalize;
pub mod types;

pub use client::{FeedSource, HttpFeedClient};
pub use error::FeedError;
pub use normalize::{normalize_entry, NormalizedPost};
