pub mod cache;
pub mod config;
pub mod document;
pub mod encode;
pub mod error;
pub mod feed;
pub mod pipeline;
pub mod render;
pub mod server;
pub mod shortcode;

pub use config::Config;
pub use error::RestError;
pub use pipeline::{Pipeline, Resolution, RunSummary};
