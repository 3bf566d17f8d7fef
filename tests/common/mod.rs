// Each integration test file is a separate binary; helpers not used in every
// binary would otherwise trigger dead_code warnings from clippy.
#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    extract::{Path, State},
    http::{header, HeaderMap, Method, Request, StatusCode},
    middleware::{self, Next},
    response::{Html, IntoResponse, Redirect, Response},
    routing::get,
    Router,
};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use ogmeta_server::{
    config::{ScrapeConfig, DEFAULT_USER_AGENT},
    handlers,
    scrape::MetaScraper,
    state::AppState,
};

/// Scrape settings for tests: short timeout, never routed through a proxy.
pub fn test_scrape_config() -> ScrapeConfig {
    ScrapeConfig {
        timeout: Duration::from_secs(5),
        max_redirects: 5,
        user_agent: DEFAULT_USER_AGENT.to_string(),
        use_system_proxy: false,
    }
}

pub fn test_scraper(config: &ScrapeConfig) -> MetaScraper {
    MetaScraper::with_default_parser(config).expect("scraper should build")
}

/// Build the full application router.
pub fn create_test_app() -> Router {
    create_test_app_with(&test_scrape_config())
}

pub fn create_test_app_with(config: &ScrapeConfig) -> Router {
    let state = AppState {
        scraper: Arc::new(test_scraper(config)),
    };
    handlers::api_routes().with_state(state)
}

// ── Request helpers ──────────────────────────────────────────────────────────

pub async fn post_json(app: Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let req = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, req).await
}

pub async fn post_raw(app: Router, uri: &str, body: &'static str) -> (StatusCode, Value) {
    let req = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body))
        .unwrap();
    send(app, req).await
}

pub async fn request(app: Router, method: Method, uri: &str) -> (StatusCode, Value) {
    let req = Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    send(app, req).await
}

async fn send(app: Router, req: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(req).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: Value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

// ── Fixture site ─────────────────────────────────────────────────────────────

pub const FIXTURE_PAGE: &str = r#"<!doctype html>
<html><head>
<title>Fixture Page</title>
<meta name="title" content="B">
<meta property="og:title" content="A">
<meta name="description" content="Plain description">
<meta Property="OG:Description" content="OG description">
<meta property="og:image" content="/img/x.png">
<meta name="twitter:card" content="summary">
</head><body><p>hello</p></body></html>"#;

pub const PROTOCOL_RELATIVE_PAGE: &str = r#"<html><head>
<meta property="og:image" content="//cdn.example.com/x.png">
</head></html>"#;

pub const TITLE_ONLY_PAGE: &str = "<html><head><title>Hello</title></head></html>";

/// A local site standing in for scrape targets. Counts every request it sees.
pub struct Fixture {
    pub base: String,
    pub hits: Arc<AtomicUsize>,
}

impl Fixture {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }
}

async fn count_hits(
    State(hits): State<Arc<AtomicUsize>>,
    req: Request<Body>,
    next: Next,
) -> Response {
    hits.fetch_add(1, Ordering::SeqCst);
    next.run(req).await
}

/// Echo the request headers we care about back as meta tags.
async fn echo_headers(headers: HeaderMap) -> Html<String> {
    let get = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string()
    };
    Html(format!(
        r#"<html><head>
<meta name="ua" content="{}">
<meta name="dnt" content="{}">
<meta name="accept-language" content="{}">
</head></html>"#,
        get("user-agent"),
        get("dnt"),
        get("accept-language"),
    ))
}

/// Endless chain of distinct redirects: /hop/0 → /hop/1 → …
async fn hop(Path(n): Path<u32>) -> Redirect {
    Redirect::temporary(&format!("/hop/{}", n + 1))
}

pub async fn spawn_fixture() -> Fixture {
    let hits = Arc::new(AtomicUsize::new(0));

    let app = Router::new()
        .route("/page", get(|| async { Html(FIXTURE_PAGE) }))
        .route("/cdn", get(|| async { Html(PROTOCOL_RELATIVE_PAGE) }))
        .route("/title-only", get(|| async { Html(TITLE_ONLY_PAGE) }))
        .route("/headers", get(echo_headers))
        .route("/redirect", get(|| async { Redirect::permanent("/page") }))
        .route("/hop/:n", get(hop))
        .route("/forbidden", get(|| async { StatusCode::FORBIDDEN }))
        .route("/missing", get(|| async { StatusCode::NOT_FOUND }))
        .route("/limited", get(|| async { StatusCode::TOO_MANY_REQUESTS }))
        .route("/broken", get(|| async { StatusCode::SERVICE_UNAVAILABLE }))
        .route(
            "/json",
            get(|| async { axum::Json(serde_json::json!({ "title": "not html" })) }),
        )
        .route(
            "/png",
            get(|| async {
                (
                    [(header::CONTENT_TYPE, "image/png")],
                    vec![0x89u8, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a],
                )
                    .into_response()
            }),
        )
        .layer(middleware::from_fn_with_state(hits.clone(), count_hits));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    Fixture {
        base: format!("http://{addr}"),
        hits,
    }
}

/// A server that accepts connections and never answers.
pub async fn spawn_silent_server() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((stream, _)) = listener.accept().await {
            held.push(stream);
        }
    });
    format!("http://{addr}/")
}

/// An address nothing is listening on.
pub fn closed_port_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}/")
}
