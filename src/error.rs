use std::error::Error;

use axum::{
    response::{IntoResponse, Response},
    Json,
};
use http::StatusCode;
use serde_json::json;
use thiserror::Error;
use tracing::error;

use crate::{document::DocumentError, feed::FeedError};

#[derive(Debug, Error)]
pub enum RestError {
    #[error("'{0}' is not a valid shortcode")]
    InvalidShortcode(String),

    #[error("Error updating page document")]
    Document(#[from] DocumentError),

    #[error("Error loading posts from feed")]
    Feed(#[from] FeedError),
}

impl IntoResponse for RestError {
    fn into_response(self) -> Response {
        error!("{}: {:?}", self, self.source());

        let status = match self {
            RestError::InvalidShortcode(_) => StatusCode::BAD_REQUEST,
            RestError::Document(_) => StatusCode::INTERNAL_SERVER_ERROR,
            RestError::Feed(FeedError::Timeout) => StatusCode::GATEWAY_TIMEOUT,
            RestError::Feed(_) => StatusCode::BAD_GATEWAY,
        };

        let payload = Json(json!({"message": self.to_string()}));

        (status, payload).into_response()
    }
}
