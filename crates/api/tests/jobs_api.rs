//! HTTP-level tests for the `/api/v1/jobs` resource.
//!
//! Drives the full router with `tower::ServiceExt::oneshot`, including a
//! demo-mode job submitted as a real multipart upload and polled to
//! completion.

mod common;

use std::time::Duration;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use http_body_util::BodyExt;
use tower::ServiceExt;

use common::{build_test_app, multipart_body};

const BOUNDARY: &str = "brandforge-test-boundary";

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

// ---------------------------------------------------------------------------
// Test: unknown job id returns 404
// ---------------------------------------------------------------------------

#[tokio::test]
async fn get_unknown_job_returns_404() {
    let dir = tempfile::tempdir().unwrap();
    let app = build_test_app(dir.path());

    let response = app
        .oneshot(
            Request::builder()
                .uri(format!("/api/v1/jobs/{}", uuid::Uuid::new_v4()))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = body_json(response).await;
    assert_eq!(json["code"], "NOT_FOUND");
}

// ---------------------------------------------------------------------------
// Test: submission without a config field is a 400
// ---------------------------------------------------------------------------

#[tokio::test]
async fn submit_without_config_returns_400() {
    let dir = tempfile::tempdir().unwrap();
    let app = build_test_app(dir.path());

    // Multipart body with only the logo part.
    let mut body = Vec::new();
    body.extend_from_slice(
        format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"logo\"; filename=\"logo.png\"\r\nContent-Type: image/png\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(&common::png_bytes());
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/v1/jobs")
                .header(
                    header::CONTENT_TYPE,
                    format!("multipart/form-data; boundary={BOUNDARY}"),
                )
                .body(Body::from(body))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert!(json["error"].as_str().unwrap().contains("No config"));
}

// ---------------------------------------------------------------------------
// Test: demo job end-to-end over HTTP (submit, poll, result, file serving)
// ---------------------------------------------------------------------------

#[tokio::test]
async fn demo_job_end_to_end_over_http() {
    let dir = tempfile::tempdir().unwrap();
    let app = build_test_app(dir.path());

    // -- Submit --
    let config_json = serde_json::json!({
        "name": "Acme",
        "styles": ["minimal"],
        "n": 1,
        "background_size": "square",
        "demo_mode": true,
        "cache": false,
    })
    .to_string();

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/v1/jobs")
                .header(
                    header::CONTENT_TYPE,
                    format!("multipart/form-data; boundary={BOUNDARY}"),
                )
                .body(Body::from(multipart_body(BOUNDARY, &config_json)))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    let job_id = json["data"]["job_id"].as_str().unwrap().to_string();

    // -- Poll until terminal --
    let mut status = String::new();
    for _ in 0..600 {
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .uri(format!("/api/v1/jobs/{job_id}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        status = json["data"]["status"].as_str().unwrap().to_string();
        if status == "completed" || status == "error" {
            // The snapshot must never leak the API key.
            assert!(json["data"]["config"].get("api_key").is_none());
            break;
        }
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
    assert_eq!(status, "completed");

    // -- Result --
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri(format!("/api/v1/jobs/{job_id}/result"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["manifest"]["input"]["name"], "Acme");
    let files = json["data"]["files"].as_array().unwrap();
    assert!(!files.is_empty());

    // -- Serve one generated file --
    let url = files[0]["url"].as_str().unwrap();
    let response = app
        .clone()
        .oneshot(Request::builder().uri(url).body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // -- Path traversal is rejected --
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri(format!("/api/v1/jobs/{job_id}/files/../../../etc/passwd"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert!(response.status().is_client_error());

    // -- Delete --
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri(format!("/api/v1/jobs/{job_id}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .oneshot(
            Request::builder()
                .uri(format!("/api/v1/jobs/{job_id}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Test: result endpoint is a 400 while the job is still running
// ---------------------------------------------------------------------------

#[tokio::test]
async fn result_before_completion_returns_400() {
    let dir = tempfile::tempdir().unwrap();
    let app = build_test_app(dir.path());

    // Dry-run with several styles: quick, but long enough to observe.
    let config_json = serde_json::json!({
        "name": "Acme",
        "dry_run": true,
    })
    .to_string();

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/v1/jobs")
                .header(
                    header::CONTENT_TYPE,
                    format!("multipart/form-data; boundary={BOUNDARY}"),
                )
                .body(Body::from(multipart_body(BOUNDARY, &config_json)))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    let job_id = json["data"]["job_id"].as_str().unwrap().to_string();

    let response = app
        .oneshot(
            Request::builder()
                .uri(format!("/api/v1/jobs/{job_id}/result"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    // Either still running (400) or already done (200) on a fast machine;
    // never a 5xx.
    assert!(
        response.status() == StatusCode::BAD_REQUEST || response.status() == StatusCode::OK,
        "unexpected status: {}",
        response.status()
    );
}
