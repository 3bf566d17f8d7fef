use axum::extract::rejection::JsonRejection;
use axum::Json;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::models::{MetaPatch, MetaRecord};
use crate::tags::{self, LengthHint, DESCRIPTION_RECOMMENDED, TITLE_RECOMMENDED};

#[derive(Debug, Deserialize)]
pub struct MetaTagsRequest {
    #[serde(default)]
    pub meta: MetaRecord,
    /// Editor changes applied on top of `meta` before rendering.
    #[serde(default)]
    pub edits: Option<MetaPatch>,
}

#[derive(Debug, Serialize)]
pub struct MetaTagsResponse {
    pub meta: MetaRecord,
    pub tags: Vec<String>,
    pub html: String,
    pub host: String,
    pub title_length: LengthHint,
    pub description_length: LengthHint,
}

/// POST /meta-tags
///
/// Merges optional edits into a record and returns the copyable tag block
/// plus the hints the editor and preview panes display.
pub async fn build_meta_tags(
    payload: Result<Json<MetaTagsRequest>, JsonRejection>,
) -> AppResult<Json<MetaTagsResponse>> {
    let Json(req) = payload.map_err(|e| AppError::Validation(e.body_text()))?;

    req.meta.validate()?;
    if let Some(edits) = &req.edits {
        edits.validate()?;
    }

    let mut meta = req.meta;
    match req.edits {
        Some(edits) => meta.apply(edits),
        None => meta.fill_defaults(),
    }

    let tags = tags::generate_meta_tags(&meta);
    let html = tags::render_meta_tags(&meta);

    Ok(Json(MetaTagsResponse {
        host: tags::display_host(&meta.url),
        title_length: tags::length_hint(&meta.title, TITLE_RECOMMENDED),
        description_length: tags::length_hint(&meta.description, DESCRIPTION_RECOMMENDED),
        tags,
        html,
        meta,
    }))
}
