pub mod routes;

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use derive_more::Constructor;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::pipeline::Pipeline;

#[derive(Clone, Constructor)]
pub struct AppState {
    pub pipeline: Arc<Pipeline>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(routes::health))
        .route("/render", post(routes::render_page))
        .route("/preview/{style}/{tag}/{limit}", get(routes::preview))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}
