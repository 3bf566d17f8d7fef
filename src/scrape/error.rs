use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use strum::IntoStaticStr;
use thiserror::Error;

/// Stable classification of a failed scrape, reported to callers as `kind`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, IntoStaticStr)]
pub enum FailureKind {
    MissingInput,
    InvalidInput,
    ServiceUnavailable,
    InvalidContent,
    HostNotFound,
    ConnectionRefused,
    Timeout,
    Forbidden,
    NotFound,
    RateLimited,
    UpstreamError,
    Unknown,
}

impl FailureKind {
    pub fn as_str(self) -> &'static str {
        self.into()
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{label}: {details}")]
pub struct ScrapeError {
    pub kind: FailureKind,
    /// Short label sent as `error`.
    pub label: &'static str,
    /// Human-readable explanation sent as `details`.
    pub details: String,
    /// Status returned by the target site, for upstream HTTP failures.
    pub upstream_status: Option<u16>,
    /// URL the failure relates to, once it has been accepted as input.
    pub url: Option<String>,
}

const SCRAPE_FAILED: &str = "Failed to scrape";

impl ScrapeError {
    fn new(kind: FailureKind, label: &'static str, details: impl Into<String>) -> Self {
        ScrapeError {
            kind,
            label,
            details: details.into(),
            upstream_status: None,
            url: None,
        }
    }

    pub fn missing_input() -> Self {
        Self::new(
            FailureKind::MissingInput,
            "Missing URL",
            "Please provide a url in the request body",
        )
    }

    pub fn invalid_format() -> Self {
        Self::new(
            FailureKind::InvalidInput,
            "Invalid URL format",
            "Please provide a valid URL",
        )
    }

    pub fn invalid_protocol() -> Self {
        Self::new(
            FailureKind::InvalidInput,
            "Invalid URL protocol",
            "URL must start with http:// or https://",
        )
    }

    pub fn parser_unavailable() -> Self {
        Self::new(
            FailureKind::ServiceUnavailable,
            "Server configuration error",
            "HTML parser not available",
        )
    }

    pub fn invalid_content() -> Self {
        Self::new(
            FailureKind::InvalidContent,
            "Invalid content type",
            "The URL did not return HTML content",
        )
    }

    pub fn host_not_found() -> Self {
        Self::new(
            FailureKind::HostNotFound,
            SCRAPE_FAILED,
            "Domain not found. Please check the URL.",
        )
    }

    pub fn connection_refused() -> Self {
        Self::new(
            FailureKind::ConnectionRefused,
            SCRAPE_FAILED,
            "Connection refused by the server.",
        )
    }

    pub fn timeout() -> Self {
        Self::new(
            FailureKind::Timeout,
            SCRAPE_FAILED,
            "Request timed out. The website took too long to respond.",
        )
    }

    /// Target site answered with a status outside `[200, 400)`.
    pub fn upstream(status: u16) -> Self {
        let (kind, details) = match status {
            403 => (
                FailureKind::Forbidden,
                "Access forbidden. The website blocked the request.".to_string(),
            ),
            404 => (FailureKind::NotFound, "Page not found.".to_string()),
            429 => (
                FailureKind::RateLimited,
                "Rate limited. Too many requests to this website.".to_string(),
            ),
            other => (
                FailureKind::UpstreamError,
                format!("Server responded with status {other}"),
            ),
        };
        ScrapeError {
            upstream_status: Some(status),
            ..Self::new(kind, SCRAPE_FAILED, details)
        }
    }

    pub fn unknown(details: impl Into<String>) -> Self {
        Self::new(FailureKind::Unknown, SCRAPE_FAILED, details)
    }

    pub fn with_url(mut self, url: &str) -> Self {
        self.url = Some(url.to_string());
        self
    }

    /// Status code relayed to our own caller.
    pub fn status(&self) -> StatusCode {
        match self.kind {
            FailureKind::MissingInput
            | FailureKind::InvalidInput
            | FailureKind::HostNotFound
            | FailureKind::ConnectionRefused => StatusCode::BAD_REQUEST,
            FailureKind::Timeout => StatusCode::REQUEST_TIMEOUT,
            FailureKind::Forbidden
            | FailureKind::NotFound
            | FailureKind::RateLimited
            | FailureKind::UpstreamError => self
                .upstream_status
                .and_then(|s| StatusCode::from_u16(s).ok())
                .unwrap_or(StatusCode::BAD_GATEWAY),
            FailureKind::ServiceUnavailable
            | FailureKind::InvalidContent
            | FailureKind::Unknown => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ScrapeError {
    fn into_response(self) -> Response {
        let status = self.status();
        let mut body = json!({
            "error": self.label,
            "details": self.details,
            "kind": self.kind.as_str(),
        });
        if let Some(url) = &self.url {
            body["url"] = json!(url);
        }
        if let Some(upstream) = self.upstream_status {
            body["upstreamStatus"] = json!(upstream);
        }

        (status, Json(body)).into_response()
    }
}

pub type ScrapeResult<T> = Result<T, ScrapeError>;
