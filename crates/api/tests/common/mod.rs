use std::sync::Arc;

use axum::Router;

use brandforge_api::config::ServerConfig;
use brandforge_api::jobs::JobManager;
use brandforge_api::router::build_app_router;
use brandforge_api::state::AppState;
use brandforge_api::ws::WsManager;
use brandforge_events::JobEventBus;
use brandforge_pipeline::cache::CacheStore;

/// Build a test `ServerConfig` rooted in a temp directory.
///
/// Uses `http://localhost:5173` as CORS origin (matching the dev default)
/// and a 30-second request timeout.
pub fn test_config(dir: &std::path::Path) -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        jobs_dir: dir.join("jobs"),
        cache_file: dir.join("cache.json"),
        api_key: None,
    }
}

/// Build the full application router with all middleware layers.
///
/// This mirrors the router construction in `main.rs` so integration tests
/// exercise the same middleware stack (CORS, request ID, timeout, tracing,
/// panic recovery) that production uses.
pub fn build_test_app(dir: &std::path::Path) -> Router {
    let config = test_config(dir);
    let cache = Arc::new(CacheStore::new(&config.cache_file));
    let event_bus = Arc::new(JobEventBus::default());
    let ws_manager = Arc::new(WsManager::new());

    let jobs = Arc::new(JobManager::new(
        config.jobs_dir.clone(),
        cache,
        Arc::clone(&event_bus),
        config.api_key.clone(),
    ));

    let state = AppState {
        config: Arc::new(config.clone()),
        jobs,
        ws_manager,
        event_bus,
    };

    build_app_router(state, &config)
}

/// A tiny but valid PNG for upload fixtures.
pub fn png_bytes() -> Vec<u8> {
    let img = image::DynamicImage::ImageRgba8(image::RgbaImage::from_pixel(
        4,
        4,
        image::Rgba([30, 60, 90, 255]),
    ));
    let mut buf = Vec::new();
    img.write_with_encoder(image::codecs::png::PngEncoder::new(&mut buf))
        .unwrap();
    buf
}

/// Hand-rolled multipart body: a `logo` file part plus a `config` JSON part.
pub fn multipart_body(boundary: &str, config_json: &str) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(
        format!(
            "--{boundary}\r\nContent-Disposition: form-data; name=\"logo\"; filename=\"logo.png\"\r\nContent-Type: image/png\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(&png_bytes());
    body.extend_from_slice(
        format!(
            "\r\n--{boundary}\r\nContent-Disposition: form-data; name=\"config\"\r\n\r\n{config_json}\r\n--{boundary}--\r\n"
        )
        .as_bytes(),
    );
    body
}
