use scraper::{Html, Selector};

use crate::models::RawMetaMap;

/// What the reconciler needs out of a page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedPage {
    /// Trimmed text of the first `<title>` in `<head>`, if non-empty.
    pub title: Option<String>,
    pub meta: RawMetaMap,
}

/// HTML parsing capability injected into [`MetaScraper`](super::MetaScraper).
///
/// `ensure_ready` runs once when the scraper is built; a parser that fails it
/// never serves a request.
pub trait HtmlParser: Send + Sync {
    fn ensure_ready(&self) -> Result<(), String>;

    fn parse(&self, html: &str) -> ParsedPage;
}

/// [`HtmlParser`] backed by the `scraper` crate (html5ever).
pub struct ScraperParser {
    title: Option<Selector>,
    meta: Option<Selector>,
}

impl ScraperParser {
    pub fn new() -> Self {
        ScraperParser {
            title: Selector::parse("head title").ok(),
            meta: Selector::parse("meta").ok(),
        }
    }
}

impl Default for ScraperParser {
    fn default() -> Self {
        Self::new()
    }
}

impl HtmlParser for ScraperParser {
    fn ensure_ready(&self) -> Result<(), String> {
        if self.title.is_none() || self.meta.is_none() {
            return Err("failed to compile meta/title selectors".into());
        }
        Ok(())
    }

    fn parse(&self, html: &str) -> ParsedPage {
        let document = Html::parse_document(html);

        let title = self.title.as_ref().and_then(|sel| {
            document
                .select(sel)
                .next()
                .map(|el| el.text().collect::<String>().trim().to_string())
                .filter(|s| !s.is_empty())
        });

        let mut meta = RawMetaMap::new();
        if let Some(sel) = &self.meta {
            for el in document.select(sel) {
                let attrs = el.value();
                let key = ["name", "property", "itemprop"]
                    .iter()
                    .filter_map(|attr| attrs.attr(attr))
                    .map(str::trim)
                    .find(|k| !k.is_empty());
                let value = attrs.attr("content").map(str::trim).unwrap_or_default();

                if let Some(key) = key {
                    if !value.is_empty() {
                        meta.insert(key.to_lowercase(), value.to_string());
                    }
                }
            }
        }

        ParsedPage { title, meta }
    }
}
