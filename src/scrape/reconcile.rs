use url::Url;

use super::parser::ParsedPage;
use crate::models::{MetaRecord, RawMetaMap, DEFAULT_TWITTER_CARD, DEFAULT_TYPE};

/// First non-empty value among `keys`.
fn first_of<'a>(raw: &'a RawMetaMap, keys: &[&str]) -> Option<&'a str> {
    keys.iter()
        .filter_map(|k| raw.get(*k))
        .map(String::as_str)
        .find(|v| !v.is_empty())
}

/// Collapse the page's overlapping namespaces into one record.
///
/// Open Graph wins over Twitter Card, which wins over plain HTML. `requested_url`
/// is the URL as the caller sent it; it backs `url` and anchors relative images.
pub fn reconcile(page: &ParsedPage, requested_url: &str) -> MetaRecord {
    let raw = &page.meta;

    let title = first_of(raw, &["og:title", "twitter:title"])
        .or(page.title.as_deref())
        .or_else(|| first_of(raw, &["title"]))
        .unwrap_or_default();
    let description =
        first_of(raw, &["og:description", "twitter:description", "description"]).unwrap_or_default();
    let image =
        first_of(raw, &["og:image", "twitter:image", "twitter:image:src"]).unwrap_or_default();

    MetaRecord {
        title: title.to_string(),
        description: description.to_string(),
        image: resolve_image(image, requested_url),
        url: first_of(raw, &["og:url"])
            .unwrap_or(requested_url)
            .to_string(),
        kind: first_of(raw, &["og:type"])
            .unwrap_or(DEFAULT_TYPE)
            .to_string(),
        twitter_card: first_of(raw, &["twitter:card"])
            .unwrap_or(DEFAULT_TWITTER_CARD)
            .to_string(),
    }
}

/// Make a scraped image URL absolute against the page it came from.
///
/// Deliberately simple prefixing, not a full RFC 3986 join:
/// `//host/x` takes the page scheme, `/x` takes the page origin and anything
/// else is treated as origin-relative. `../` and the page's own path are
/// ignored. Values already starting with `http` and `data:` URLs are kept.
pub fn resolve_image(image: &str, page_url: &str) -> String {
    if image.is_empty() || image.starts_with("http") || image.starts_with("data:") {
        return image.to_string();
    }

    let page = match Url::parse(page_url) {
        Ok(u) => u,
        Err(e) => {
            tracing::warn!(error = %e, page_url, "Failed to resolve relative image URL");
            return image.to_string();
        }
    };
    let origin = page.origin().ascii_serialization();

    if image.starts_with("//") {
        format!("{}:{}", page.scheme(), image)
    } else if image.starts_with('/') {
        format!("{origin}{image}")
    } else {
        format!("{origin}/{image}")
    }
}
