//! Handlers for the `/jobs` resource.
//!
//! Submission takes a multipart form (logo file + `config` JSON field),
//! creates the job, and returns its id immediately; progress is observed
//! by polling `GET /jobs/{id}` or over the WebSocket stream.

use std::path::{Component, Path as FsPath, PathBuf};

use axum::extract::{Multipart, Path, State};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;

use brandforge_core::config::{normalize_config, ConfigInput};
use brandforge_core::types::JobId;

use crate::error::{AppError, AppResult};
use crate::jobs::JobStatus;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Submit
// ---------------------------------------------------------------------------

/// Response payload for job creation.
#[derive(Debug, Serialize)]
pub struct JobCreated {
    pub job_id: JobId,
}

/// POST /api/v1/jobs
///
/// Multipart form: one file field carrying the logo bytes plus a `config`
/// text field with the JSON-encoded [`ConfigInput`]. Returns 201 with the
/// new job id; configuration and upload errors are 400s and no job is
/// created.
pub async fn create_job(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> AppResult<impl IntoResponse> {
    let mut logo_bytes: Option<Vec<u8>> = None;
    let mut config_text: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        let name = field.name().unwrap_or_default().to_string();
        if name == "config" {
            config_text = Some(
                field
                    .text()
                    .await
                    .map_err(|e| AppError::BadRequest(e.to_string()))?,
            );
        } else if field.file_name().is_some() || name == "logo" {
            logo_bytes = Some(
                field
                    .bytes()
                    .await
                    .map_err(|e| AppError::BadRequest(e.to_string()))?
                    .to_vec(),
            );
        }
    }

    let logo_bytes =
        logo_bytes.ok_or_else(|| AppError::BadRequest("No logo file uploaded".to_string()))?;
    let config_text =
        config_text.ok_or_else(|| AppError::BadRequest("No config provided".to_string()))?;

    let input: ConfigInput = serde_json::from_str(&config_text)
        .map_err(|e| AppError::BadRequest(format!("Invalid config: {e}")))?;

    let job_id = state.jobs.submit(logo_bytes, normalize_config(input)).await?;

    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: JobCreated { job_id },
        }),
    ))
}

// ---------------------------------------------------------------------------
// Poll
// ---------------------------------------------------------------------------

/// GET /api/v1/jobs/{id}
///
/// Snapshot of the job's current state: status, progress log, cost, and --
/// once completed -- output locations.
pub async fn get_job(
    State(state): State<AppState>,
    Path(id): Path<JobId>,
) -> AppResult<impl IntoResponse> {
    let job = state.jobs.get(&id).ok_or(AppError::NotFound("Job"))?;
    Ok(Json(DataResponse { data: job }))
}

// ---------------------------------------------------------------------------
// Result
// ---------------------------------------------------------------------------

/// One downloadable file of a completed job.
#[derive(Debug, Serialize)]
pub struct FileLink {
    pub path: String,
    pub url: String,
}

/// Response payload for the result endpoint.
#[derive(Debug, Serialize)]
pub struct JobResult {
    pub manifest: serde_json::Value,
    pub files: Vec<FileLink>,
    pub output_dir: PathBuf,
}

/// GET /api/v1/jobs/{id}/result
///
/// Manifest plus per-file download URLs. 400 until the job completes.
pub async fn get_result(
    State(state): State<AppState>,
    Path(id): Path<JobId>,
) -> AppResult<impl IntoResponse> {
    let job = state.jobs.get(&id).ok_or(AppError::NotFound("Job"))?;

    if job.status != JobStatus::Completed {
        return Err(AppError::BadRequest(format!(
            "Job not completed yet (status: {})",
            job.status.as_str()
        )));
    }

    let output_dir = job
        .output_dir
        .ok_or_else(|| AppError::InternalError("Completed job has no output dir".to_string()))?;

    let manifest = match &job.manifest_path {
        Some(path) => {
            let data = tokio::fs::read(path)
                .await
                .map_err(|e| AppError::InternalError(format!("Failed to read manifest: {e}")))?;
            serde_json::from_slice(&data)
                .map_err(|e| AppError::InternalError(format!("Invalid manifest: {e}")))?
        }
        None => serde_json::Value::Null,
    };

    let files = job
        .files
        .unwrap_or_default()
        .iter()
        .filter_map(|file| {
            let rel = file.strip_prefix(&output_dir).ok()?;
            let rel = rel.to_string_lossy().replace('\\', "/");
            Some(FileLink {
                url: format!("/api/v1/jobs/{id}/files/{rel}"),
                path: rel,
            })
        })
        .collect();

    Ok(Json(DataResponse {
        data: JobResult {
            manifest,
            files,
            output_dir,
        },
    }))
}

// ---------------------------------------------------------------------------
// File serving
// ---------------------------------------------------------------------------

/// Content type by file extension for generated assets.
fn content_type(path: &FsPath) -> &'static str {
    match path.extension().and_then(|e| e.to_str()) {
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("webp") => "image/webp",
        Some("html") => "text/html; charset=utf-8",
        Some("json") => "application/json",
        _ => "application/octet-stream",
    }
}

/// GET /api/v1/jobs/{id}/files/{*path}
///
/// Serve one generated file from the job's output directory. Rejects any
/// path that tries to escape it.
pub async fn serve_file(
    State(state): State<AppState>,
    Path((id, file_path)): Path<(JobId, String)>,
) -> AppResult<impl IntoResponse> {
    let job = state.jobs.get(&id).ok_or(AppError::NotFound("Job"))?;
    let output_dir = job.output_dir.ok_or(AppError::NotFound("File"))?;

    let rel = PathBuf::from(&file_path);
    if rel
        .components()
        .any(|c| !matches!(c, Component::Normal(_)))
    {
        return Err(AppError::BadRequest("Invalid file path".to_string()));
    }

    let full_path = output_dir.join(rel);
    let bytes = tokio::fs::read(&full_path)
        .await
        .map_err(|_| AppError::NotFound("File"))?;

    Ok(([(header::CONTENT_TYPE, content_type(&full_path))], bytes))
}

// ---------------------------------------------------------------------------
// Delete / cancel
// ---------------------------------------------------------------------------

/// Response payload for job deletion.
#[derive(Debug, Serialize)]
pub struct JobDeleted {
    pub deleted: bool,
}

/// DELETE /api/v1/jobs/{id}
///
/// Cancel the job if it is still running, drop it from the registry, and
/// delete its working directory.
pub async fn delete_job(
    State(state): State<AppState>,
    Path(id): Path<JobId>,
) -> AppResult<impl IntoResponse> {
    if !state.jobs.remove(&id).await {
        return Err(AppError::NotFound("Job"));
    }
    Ok(Json(DataResponse {
        data: JobDeleted { deleted: true },
    }))
}
