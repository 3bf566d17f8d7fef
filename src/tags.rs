//! HTML meta-tag block generation and the small helpers the editor and
//! preview panes lean on.

use serde::Serialize;
use url::Url;

use crate::models::{MetaRecord, DEFAULT_TWITTER_CARD, DEFAULT_TYPE};

pub const TITLE_RECOMMENDED: usize = 60;
pub const DESCRIPTION_RECOMMENDED: usize = 160;

fn escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

fn name_tag(name: &str, content: &str) -> String {
    format!(r#"<meta name="{name}" content="{}" />"#, escape(content))
}

fn property_tag(property: &str, content: &str) -> String {
    format!(r#"<meta property="{property}" content="{}" />"#, escape(content))
}

fn or_default<'a>(value: &'a str, default: &'a str) -> &'a str {
    if value.trim().is_empty() {
        default
    } else {
        value
    }
}

/// Tags for `meta` in paste order: basic HTML, then Open Graph, then Twitter.
///
/// Fields that are empty are skipped, except `og:type` and `twitter:card`
/// which are always present.
pub fn generate_meta_tags(meta: &MetaRecord) -> Vec<String> {
    let mut tags = Vec::with_capacity(13);

    if !meta.title.is_empty() {
        tags.push(format!("<title>{}</title>", escape(&meta.title)));
        tags.push(name_tag("title", &meta.title));
    }
    if !meta.description.is_empty() {
        tags.push(name_tag("description", &meta.description));
    }

    if !meta.title.is_empty() {
        tags.push(property_tag("og:title", &meta.title));
    }
    if !meta.description.is_empty() {
        tags.push(property_tag("og:description", &meta.description));
    }
    if !meta.image.is_empty() {
        tags.push(property_tag("og:image", &meta.image));
    }
    if !meta.url.is_empty() {
        tags.push(property_tag("og:url", &meta.url));
    }
    tags.push(property_tag("og:type", or_default(&meta.kind, DEFAULT_TYPE)));

    tags.push(name_tag(
        "twitter:card",
        or_default(&meta.twitter_card, DEFAULT_TWITTER_CARD),
    ));
    if !meta.title.is_empty() {
        tags.push(name_tag("twitter:title", &meta.title));
    }
    if !meta.description.is_empty() {
        tags.push(name_tag("twitter:description", &meta.description));
    }
    if !meta.image.is_empty() {
        tags.push(name_tag("twitter:image", &meta.image));
    }

    tags
}

/// The copyable block: one tag per line.
pub fn render_meta_tags(meta: &MetaRecord) -> String {
    generate_meta_tags(meta).join("\n")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LengthStatus {
    Neutral,
    Low,
    Good,
    High,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LengthHint {
    pub count: usize,
    pub status: LengthStatus,
}

/// How `text` compares with a recommended length: under half is `low`,
/// over is `high`.
pub fn length_hint(text: &str, recommended: usize) -> LengthHint {
    let count = text.chars().count();
    let status = if count == 0 {
        LengthStatus::Neutral
    } else if count * 2 < recommended {
        LengthStatus::Low
    } else if count > recommended {
        LengthStatus::High
    } else {
        LengthStatus::Good
    };
    LengthHint { count, status }
}

/// Hostname shown on preview cards; empty when `url` does not parse.
pub fn display_host(url: &str) -> String {
    Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(str::to_string))
        .unwrap_or_default()
}
