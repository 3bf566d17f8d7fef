//! Fetch-and-extract: one URL in, one canonical [`MetaRecord`] out.
//!
//! Input is validated before any I/O. Each call performs exactly one GET;
//! there is no retry, cache or shared mutable state.

pub mod error;
pub mod fetch;
pub mod parser;
pub mod reconcile;

use std::sync::Arc;

use reqwest::Client as ReqwestClient;
use url::Url;

use crate::config::ScrapeConfig;
use crate::models::{MetaRecord, ScrapeDebug, ScrapeOutcome};

pub use error::{FailureKind, ScrapeError, ScrapeResult};
pub use parser::{HtmlParser, ParsedPage, ScraperParser};

/// Check a candidate URL and return it parsed. Nothing touches the network.
pub fn validate_url(candidate: &str) -> ScrapeResult<Url> {
    if candidate.trim().is_empty() {
        return Err(ScrapeError::missing_input());
    }

    let parsed = Url::parse(candidate).map_err(|_| ScrapeError::invalid_format())?;
    match parsed.scheme() {
        "http" | "https" => Ok(parsed),
        _ => Err(ScrapeError::invalid_protocol()),
    }
}

pub struct MetaScraper {
    client: ReqwestClient,
    parser: Arc<dyn HtmlParser>,
}

impl MetaScraper {
    /// Build the scraper, verifying the parser up front.
    pub fn new(config: &ScrapeConfig, parser: Arc<dyn HtmlParser>) -> ScrapeResult<Self> {
        parser
            .ensure_ready()
            .map_err(|reason| {
                tracing::error!(%reason, "HTML parser failed its readiness check");
                ScrapeError::parser_unavailable()
            })?;

        let client = fetch::build_client(config).map_err(|e| {
            tracing::error!(error = ?e, "Failed to build HTTP client");
            ScrapeError::unknown("HTTP client could not be initialised")
        })?;

        Ok(MetaScraper { client, parser })
    }

    /// Scraper with the default `scraper`-backed parser.
    pub fn with_default_parser(config: &ScrapeConfig) -> ScrapeResult<Self> {
        Self::new(config, Arc::new(ScraperParser::new()))
    }

    /// Turn an already-fetched HTML document into a record. Pure; used by
    /// [`scrape`](Self::scrape) after the fetch.
    pub fn extract(&self, html: &str, requested_url: &str) -> (ParsedPage, MetaRecord) {
        let page = self.parser.parse(html);
        let record = reconcile::reconcile(&page, requested_url);
        (page, record)
    }

    pub async fn scrape(&self, url: &str) -> ScrapeResult<ScrapeOutcome> {
        validate_url(url)?;

        tracing::info!(url, "Starting scrape");

        let fetched = fetch::fetch_page(&self.client, url)
            .await
            .map_err(|e| e.with_url(url))?;

        let (page, scraped) = self.extract(&fetched.html, url);
        let diag = ScrapeDebug {
            response_status: fetched.status,
            content_type: fetched.content_type,
            meta_tag_count: page.meta.len(),
            html_length: fetched.html.chars().count(),
        };

        tracing::info!(
            url,
            status = diag.response_status,
            meta_tags = diag.meta_tag_count,
            html_length = diag.html_length,
            "Scrape succeeded"
        );

        Ok(ScrapeOutcome {
            scraped,
            raw: page.meta,
            debug: diag,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct BrokenParser;

    impl HtmlParser for BrokenParser {
        fn ensure_ready(&self) -> Result<(), String> {
            Err("not linked".into())
        }

        fn parse(&self, _html: &str) -> ParsedPage {
            ParsedPage::default()
        }
    }

    fn scraper() -> MetaScraper {
        MetaScraper::with_default_parser(&ScrapeConfig::default()).unwrap()
    }

    #[test]
    fn empty_url_is_missing_input() {
        assert_eq!(validate_url("").unwrap_err().kind, FailureKind::MissingInput);
        assert_eq!(validate_url("   ").unwrap_err().kind, FailureKind::MissingInput);
    }

    #[test]
    fn garbage_url_is_invalid_input() {
        let err = validate_url("not a url").unwrap_err();
        assert_eq!(err.kind, FailureKind::InvalidInput);
        assert_eq!(err.label, "Invalid URL format");
    }

    #[test]
    fn non_http_scheme_is_invalid_input() {
        let err = validate_url("ftp://example.com/file").unwrap_err();
        assert_eq!(err.kind, FailureKind::InvalidInput);
        assert_eq!(err.label, "Invalid URL protocol");
        assert_eq!(err.status(), axum::http::StatusCode::BAD_REQUEST);

        assert!(validate_url("javascript:alert(1)").is_err());
    }

    #[test]
    fn http_and_https_are_accepted() {
        assert!(validate_url("http://example.com").is_ok());
        assert!(validate_url("https://example.com/a?b=c").is_ok());
    }

    #[test]
    fn broken_parser_fails_construction() {
        let err = match MetaScraper::new(&ScrapeConfig::default(), Arc::new(BrokenParser)) {
            Ok(_) => panic!("expected construction to fail"),
            Err(e) => e,
        };
        assert_eq!(err.kind, FailureKind::ServiceUnavailable);
        assert_eq!(err.details, "HTML parser not available");
    }

    #[test]
    fn extract_is_deterministic() {
        let html = r#"<html><head>
            <title>Fixture</title>
            <meta property="og:description" content="D">
            <meta name="twitter:card" content="summary">
            <meta property="og:image" content="/cover.jpg">
        </head></html>"#;
        let s = scraper();
        let (first_page, first) = s.extract(html, "https://example.com/post");
        let (second_page, second) = s.extract(html, "https://example.com/post");

        assert_eq!(first, second);
        assert_eq!(first_page.meta, second_page.meta);
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
        assert_eq!(first.image, "https://example.com/cover.jpg");
        assert_eq!(first.title, "Fixture");
    }

    async fn serve_once(html: &'static str) -> String {
        use axum::{http::header, routing::get, Router};

        let app = Router::new().route(
            "/post",
            get(move || async move { ([(header::CONTENT_TYPE, "text/html; charset=utf-8")], html) }),
        );
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}/post")
    }

    #[tokio::test]
    async fn scrape_fills_record_raw_map_and_diagnostics() {
        let html = r#"<html><head>
            <title>Local</title>
            <meta property="og:image" content="/a.png">
            <meta name="description" content="Plain">
        </head><body></body></html>"#;
        let url = serve_once(html).await;
        let origin = url.trim_end_matches("/post").to_string();

        let outcome = scraper().scrape(&url).await.unwrap();

        assert_eq!(outcome.scraped.title, "Local");
        assert_eq!(outcome.scraped.description, "Plain");
        assert_eq!(outcome.scraped.image, format!("{origin}/a.png"));
        assert_eq!(outcome.scraped.url, url);
        assert_eq!(outcome.raw.len(), 2);
        assert_eq!(outcome.debug.response_status, 200);
        assert_eq!(outcome.debug.meta_tag_count, 2);
        assert_eq!(outcome.debug.html_length, html.chars().count());
        assert!(outcome
            .debug
            .content_type
            .as_deref()
            .unwrap_or_default()
            .starts_with("text/html"));
    }

    #[tokio::test]
    async fn scrape_rejects_bad_input_without_fetching() {
        let err = scraper().scrape("ftp://example.com").await.unwrap_err();
        assert_eq!(err.kind, FailureKind::InvalidInput);
        assert!(err.url.is_none());
    }
}
