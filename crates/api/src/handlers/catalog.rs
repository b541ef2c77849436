//! Handlers for the built-in style and preset catalogs.
//!
//! The wizard front end uses these to populate its pickers; they are pure
//! reads of compile-time catalogs.

use axum::Json;
use serde::Serialize;

use brandforge_core::preset::{preset_catalog, PromptPreset};
use brandforge_core::style::style_catalog;

use crate::response::DataResponse;

/// One built-in style.
#[derive(Debug, Serialize)]
pub struct StyleEntry {
    pub name: &'static str,
    pub description: &'static str,
}

/// GET /api/v1/styles
pub async fn list_styles() -> Json<DataResponse<Vec<StyleEntry>>> {
    let styles = style_catalog()
        .iter()
        .map(|&(name, description)| StyleEntry { name, description })
        .collect();
    Json(DataResponse { data: styles })
}

/// GET /api/v1/presets
pub async fn list_presets() -> Json<DataResponse<Vec<PromptPreset>>> {
    Json(DataResponse {
        data: preset_catalog(),
    })
}
