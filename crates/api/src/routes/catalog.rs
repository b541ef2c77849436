//! Route definitions for the style/preset catalogs.

use axum::routing::get;
use axum::Router;

use crate::handlers::catalog;
use crate::state::AppState;

/// Catalog routes: built-in styles and prompt presets.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/styles", get(catalog::list_styles))
        .route("/presets", get(catalog::list_presets))
}
