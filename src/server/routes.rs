use axum::{
    extract::{Path, State},
    response::{Html, IntoResponse, Json},
};
use serde_json::json;
use tracing::debug;

use crate::{
    document::HtmlDocument,
    error::RestError,
    pipeline::Resolution,
    server::AppState,
    shortcode::ShortcodeToken,
};

pub async fn health() -> impl IntoResponse {
    Json(json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// Rewrites every shortcode in the posted page.
pub async fn render_page(
    State(state): State<AppState>,
    body: String,
) -> Result<Html<String>, RestError> {
    let mut document = HtmlDocument::parse(&body);
    let summary = state.pipeline.run(&mut document).await?;
    debug!("rendered page with {:?}", summary);

    Ok(Html(document.to_string()))
}

/// Renders a single shortcode inside its container.
pub async fn preview(
    Path((style, tag, limit)): Path<(String, String, String)>,
    State(state): State<AppState>,
) -> Result<Html<String>, RestError> {
    let shortcode = format!("[Style-{style}/{tag}/{limit}]");
    let token = ShortcodeToken::parse(&shortcode)
        .ok_or_else(|| RestError::InvalidShortcode(shortcode.clone()))?;

    match state.pipeline.resolve(&token).await {
        Resolution::Failed(e) => Err(RestError::Feed(e)),
        resolution => Ok(Html(format!(
            r#"<div class="{}">{}</div>"#,
            token.container_class(),
            resolution.html()
        ))),
    }
}
