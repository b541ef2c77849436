use std::path::PathBuf;

/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development.
/// In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3001`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Directory for per-job working directories.
    pub jobs_dir: PathBuf,
    /// Path of the process-wide generation cache file.
    pub cache_file: PathBuf,
    /// Default API key for the image service; jobs may override per-request.
    pub api_key: Option<String>,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                 | Default                   |
    /// |-------------------------|---------------------------|
    /// | `HOST`                  | `0.0.0.0`                 |
    /// | `PORT`                  | `3001`                    |
    /// | `CORS_ORIGINS`          | `http://localhost:5173`   |
    /// | `REQUEST_TIMEOUT_SECS`  | `30`                      |
    /// | `BRANDFORGE_JOBS_DIR`   | `.brandforge/jobs`        |
    /// | `BRANDFORGE_CACHE_FILE` | `.brandforge-cache.json`  |
    /// | `OPENAI_API_KEY`        | unset                     |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3001".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let jobs_dir = std::env::var("BRANDFORGE_JOBS_DIR")
            .unwrap_or_else(|_| ".brandforge/jobs".into())
            .into();

        let cache_file = std::env::var("BRANDFORGE_CACHE_FILE")
            .unwrap_or_else(|_| brandforge_pipeline::cache::DEFAULT_CACHE_FILE.into())
            .into();

        let api_key = std::env::var("OPENAI_API_KEY")
            .ok()
            .filter(|k| !k.trim().is_empty());

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            jobs_dir,
            cache_file,
            api_key,
        }
    }
}
