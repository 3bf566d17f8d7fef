use std::error::Error as StdError;
use std::io;

use reqwest::header::{self, HeaderMap, HeaderValue};
use reqwest::redirect::Policy;
use reqwest::Client as ReqwestClient;

use super::error::{ScrapeError, ScrapeResult};
use crate::config::ScrapeConfig;

/// A fetched page body plus what we learned from the response.
#[derive(Debug)]
pub struct FetchedPage {
    pub status: u16,
    pub content_type: Option<String>,
    pub html: String,
}

fn browser_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(
        header::ACCEPT,
        HeaderValue::from_static(
            "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8",
        ),
    );
    headers.insert(
        header::ACCEPT_LANGUAGE,
        HeaderValue::from_static("en-US,en;q=0.5"),
    );
    headers.insert(
        header::ACCEPT_ENCODING,
        HeaderValue::from_static("gzip, deflate"),
    );
    headers.insert(header::DNT, HeaderValue::from_static("1"));
    headers.insert(header::CONNECTION, HeaderValue::from_static("keep-alive"));
    headers
}

/// Build the shared outbound client.
///
/// Once `max_redirects` hops have been followed the last 3xx is handed back
/// as-is instead of failing; [`fetch_page`] then judges it like any other
/// response.
pub fn build_client(config: &ScrapeConfig) -> reqwest::Result<ReqwestClient> {
    let max_redirects = config.max_redirects;
    let redirect = Policy::custom(move |attempt| {
        if attempt.previous().len() > max_redirects {
            attempt.stop()
        } else {
            attempt.follow()
        }
    });

    let mut builder = ReqwestClient::builder()
        .timeout(config.timeout)
        .user_agent(config.user_agent.as_str())
        .default_headers(browser_headers())
        .redirect(redirect);
    if !config.use_system_proxy {
        builder = builder.no_proxy();
    }
    builder.build()
}

/// Content types we are willing to hand to the HTML parser.
pub fn is_textual(content_type: &str) -> bool {
    let mime = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    mime.starts_with("text/") || mime.contains("html") || mime.contains("xml")
}

/// Issue the single GET for a scrape.
pub async fn fetch_page(client: &ReqwestClient, url: &str) -> ScrapeResult<FetchedPage> {
    let response = client.get(url).send().await.map_err(classify)?;

    let status = response.status().as_u16();
    tracing::debug!(status, url, "Scrape response received");
    if !(200..400).contains(&status) {
        return Err(ScrapeError::upstream(status));
    }

    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    if let Some(ct) = content_type.as_deref() {
        if !is_textual(ct) {
            tracing::debug!(content_type = ct, url, "Rejecting non-text response");
            return Err(ScrapeError::invalid_content());
        }
    }

    let html = response.text().await.map_err(|e| {
        if e.is_decode() {
            ScrapeError::invalid_content()
        } else {
            classify(e)
        }
    })?;

    Ok(FetchedPage {
        status,
        content_type,
        html,
    })
}

/// Iterate over `err` and everything it wraps.
fn chain(err: &reqwest::Error) -> impl Iterator<Item = &(dyn StdError + 'static)> {
    let mut next: Option<&(dyn StdError + 'static)> = Some(err);
    std::iter::from_fn(move || {
        let current = next?;
        next = current.source();
        Some(current)
    })
}

fn is_dns_failure(err: &reqwest::Error) -> bool {
    chain(err).any(|e| {
        let msg = e.to_string().to_ascii_lowercase();
        msg.contains("dns error")
            || msg.contains("failed to lookup address")
            || msg.contains("name or service not known")
            || msg.contains("no such host")
            || msg.contains("nodename nor servname")
    })
}

fn is_connection_refused(err: &reqwest::Error) -> bool {
    chain(err).any(|e| {
        e.downcast_ref::<io::Error>()
            .is_some_and(|io| io.kind() == io::ErrorKind::ConnectionRefused)
    })
}

/// Map a transport-level failure onto a [`ScrapeError`].
pub fn classify(err: reqwest::Error) -> ScrapeError {
    if err.is_timeout() {
        return ScrapeError::timeout();
    }
    if is_dns_failure(&err) {
        return ScrapeError::host_not_found();
    }
    if is_connection_refused(&err) {
        return ScrapeError::connection_refused();
    }
    if let Some(status) = err.status() {
        return ScrapeError::upstream(status.as_u16());
    }

    let details = chain(&err)
        .last()
        .map(|e| e.to_string())
        .unwrap_or_else(|| err.to_string());
    ScrapeError::unknown(details)
}
