use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use validator::Validate;

pub const DEFAULT_TYPE: &str = "website";
pub const DEFAULT_TWITTER_CARD: &str = "summary_large_image";

/// Upper bound on any single editable field, in characters.
pub const MAX_FIELD_LEN: usize = 4096;

/// Lower-cased `<meta>` key → trimmed `content`. Sorted so repeated scrapes of
/// the same page serialize identically.
pub type RawMetaMap = BTreeMap<String, String>;

/// Canonical page metadata: what the scraper produces and what the editor,
/// preview and tag generator consume.
///
/// Absent text fields are empty strings, matching what the UI binds to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct MetaRecord {
    #[serde(default)]
    #[validate(length(max = 4096, message = "title is too long"))]
    pub title: String,
    #[serde(default)]
    #[validate(length(max = 4096, message = "description is too long"))]
    pub description: String,
    #[serde(default)]
    #[validate(length(max = 4096, message = "image is too long"))]
    pub image: String,
    #[serde(default)]
    #[validate(length(max = 4096, message = "url is too long"))]
    pub url: String,
    #[serde(rename = "type", default = "default_type")]
    #[validate(length(max = 4096, message = "type is too long"))]
    pub kind: String,
    #[serde(default = "default_twitter_card")]
    #[validate(length(max = 4096, message = "twitter_card is too long"))]
    pub twitter_card: String,
}

fn default_type() -> String {
    DEFAULT_TYPE.to_string()
}

fn default_twitter_card() -> String {
    DEFAULT_TWITTER_CARD.to_string()
}

impl Default for MetaRecord {
    fn default() -> Self {
        MetaRecord {
            title: String::new(),
            description: String::new(),
            image: String::new(),
            url: String::new(),
            kind: default_type(),
            twitter_card: default_twitter_card(),
        }
    }
}

impl MetaRecord {
    /// Merge user edits; fields present in `patch` overwrite ours.
    pub fn apply(&mut self, patch: MetaPatch) {
        let MetaPatch {
            title,
            description,
            image,
            url,
            kind,
            twitter_card,
        } = patch;

        if let Some(v) = title {
            self.title = v;
        }
        if let Some(v) = description {
            self.description = v;
        }
        if let Some(v) = image {
            self.image = v;
        }
        if let Some(v) = url {
            self.url = v;
        }
        if let Some(v) = kind {
            self.kind = v;
        }
        if let Some(v) = twitter_card {
            self.twitter_card = v;
        }
        self.fill_defaults();
    }

    /// Restore the `type` / `twitter_card` defaults if they were blanked.
    pub fn fill_defaults(&mut self) {
        if self.kind.trim().is_empty() {
            self.kind = default_type();
        }
        if self.twitter_card.trim().is_empty() {
            self.twitter_card = default_twitter_card();
        }
    }
}

/// Partial update coming from the editor.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct MetaPatch {
    #[validate(length(max = 4096, message = "title is too long"))]
    pub title: Option<String>,
    #[validate(length(max = 4096, message = "description is too long"))]
    pub description: Option<String>,
    #[validate(length(max = 4096, message = "image is too long"))]
    pub image: Option<String>,
    #[validate(length(max = 4096, message = "url is too long"))]
    pub url: Option<String>,
    #[serde(rename = "type")]
    #[validate(length(max = 4096, message = "type is too long"))]
    pub kind: Option<String>,
    #[validate(length(max = 4096, message = "twitter_card is too long"))]
    pub twitter_card: Option<String>,
}

/// Fetch diagnostics returned alongside a successful scrape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrapeDebug {
    pub response_status: u16,
    pub content_type: Option<String>,
    pub meta_tag_count: usize,
    pub html_length: usize,
}

/// Body of a successful `POST /scrape`.
#[derive(Debug, Clone, Serialize)]
pub struct ScrapeOutcome {
    pub scraped: MetaRecord,
    pub raw: RawMetaMap,
    pub debug: ScrapeDebug,
}
