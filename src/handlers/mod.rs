pub mod meta_tags;
pub mod scrape;

use axum::{
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};

use crate::state::AppState;

/// Every API route, without middleware or state attached.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health_check))
        .route(
            "/scrape",
            post(scrape::scrape_url).fallback(scrape::method_not_allowed),
        )
        .route(
            "/meta-tags",
            post(meta_tags::build_meta_tags).fallback(scrape::method_not_allowed),
        )
}

pub async fn health_check() -> (StatusCode, Json<Value>) {
    (
        StatusCode::OK,
        Json(json!({
            "status": "ok",
            "service": "ogmeta-server",
            "version": env!("CARGO_PKG_VERSION"),
        })),
    )
}
