use std::sync::Arc;

use crate::scrape::MetaScraper;

/// Shared application state passed to all handlers.
/// The scraper (and the HTTP client inside it) is built once at startup.
#[derive(Clone)]
pub struct AppState {
    pub scraper: Arc<MetaScraper>,
}
