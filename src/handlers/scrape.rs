use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::Method;
use axum::Json;
use serde::Deserialize;
use serde_json::Value;

use crate::error::AppError;
use crate::models::ScrapeOutcome;
use crate::scrape::{FailureKind, ScrapeError, ScrapeResult};
use crate::state::AppState;

/// `url` is kept loose so a non-string value is reported as a bad URL rather
/// than an unreadable body.
#[derive(Debug, Deserialize)]
pub struct ScrapeRequest {
    #[serde(default)]
    pub url: Option<Value>,
}

/// POST /scrape
///
/// Fetches the page at `url` and returns its reconciled meta record, the raw
/// tag map and fetch diagnostics. A body that is not JSON or has no `url` is
/// treated the same as an empty URL; a `url` that is not a string is an
/// invalid URL.
pub async fn scrape_url(
    State(state): State<AppState>,
    payload: Result<Json<ScrapeRequest>, JsonRejection>,
) -> ScrapeResult<Json<ScrapeOutcome>> {
    let url = match payload {
        Ok(Json(req)) => match req.url {
            None | Some(Value::Null) => String::new(),
            Some(Value::String(url)) => url,
            Some(other) => {
                tracing::debug!(url = %other, "Non-string url in scrape request");
                let err = ScrapeError::invalid_format();
                log_failure(&err);
                return Err(err);
            }
        },
        Err(rejection) => {
            tracing::debug!(error = %rejection, "Unreadable scrape request body");
            String::new()
        }
    };

    state.scraper.scrape(&url).await.map(Json).map_err(|e| {
        log_failure(&e);
        e
    })
}

fn log_failure(err: &ScrapeError) {
    let url = err.url.as_deref().unwrap_or_default();
    match err.kind {
        FailureKind::MissingInput | FailureKind::InvalidInput => {
            tracing::debug!(kind = err.kind.as_str(), details = %err.details, "Rejected scrape input");
        }
        FailureKind::ServiceUnavailable | FailureKind::InvalidContent | FailureKind::Unknown => {
            tracing::error!(kind = err.kind.as_str(), details = %err.details, url, "Scrape failed");
        }
        _ => {
            tracing::warn!(kind = err.kind.as_str(), details = %err.details, url, "Scrape failed");
        }
    }
}

/// Any method other than POST on a POST-only route.
pub async fn method_not_allowed(method: Method) -> AppError {
    AppError::MethodNotAllowed(method.to_string())
}
