use brandforge_core::error::CoreError;
use brandforge_core::service::ImageServiceError;

/// Errors that can abort a pipeline run.
///
/// Every variant is job-fatal: the run wrapper converts the first one it
/// sees into the job's terminal `error` state. No variant is retried.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// Invalid configuration, detected before any external call.
    #[error(transparent)]
    Config(#[from] CoreError),

    /// The logo file is missing or unreadable.
    #[error("Logo file not found: {0}")]
    Logo(String),

    /// The remote image capability failed.
    #[error(transparent)]
    Remote(#[from] ImageServiceError),

    /// Local file or directory I/O failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A raster operation (decode, resize, encode) failed.
    #[error("Image processing error: {0}")]
    Raster(String),

    /// The run was cancelled before completion.
    #[error("Job cancelled")]
    Cancelled,

    /// A scheduled task panicked or was aborted.
    #[error("Task failure: {0}")]
    Task(String),
}
