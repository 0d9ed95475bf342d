use reqwest::StatusCode;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FeedError {
    #[error("Error building HTTP client")]
    Client(#[source] reqwest::Error),

    #[error("Request to feed endpoint failed")]
    Request(#[from] reqwest::Error),

    #[error("Feed request timed out")]
    Timeout,

    #[error("Feed endpoint responded with {0}")]
    Status(StatusCode),

    #[error("Error decoding feed body")]
    Decode(#[from] serde_json::Error),
}
