//! Route definitions for the `/jobs` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::jobs;
use crate::state::AppState;

/// Routes mounted at `/jobs`.
///
/// ```text
/// POST   /                     -> create_job (multipart: logo + config)
/// GET    /{id}                 -> get_job (polling snapshot)
/// DELETE /{id}                 -> delete_job (cancel + cleanup)
/// GET    /{id}/result          -> get_result (manifest + file URLs)
/// GET    /{id}/files/{*path}   -> serve_file
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", axum::routing::post(jobs::create_job))
        .route("/{id}", get(jobs::get_job).delete(jobs::delete_job))
        .route("/{id}/result", get(jobs::get_result))
        .route("/{id}/files/{*path}", get(jobs::serve_file))
}
