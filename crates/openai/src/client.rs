//! HTTP client for the OpenAI images API.
//!
//! [`OpenAiClient`] holds the connection configuration for the remote
//! service and implements [`ImageService`]. Generation uses the JSON
//! `images/generations` endpoint; edits use the multipart `images/edits`
//! endpoint with the composite base image attached as a PNG file.

use async_trait::async_trait;
use base64::Engine;
use serde::Deserialize;

use brandforge_core::config::QualityTier;
use brandforge_core::service::{ApiCallCost, GeneratedImage, ImageService, ImageServiceError};
use brandforge_core::size::ImageSize;

use crate::pricing::{image_cost, MODEL};

/// Default API base URL.
const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Client for the OpenAI images API.
pub struct OpenAiClient {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
}

/// Response envelope of both image endpoints.
#[derive(Debug, Deserialize)]
struct ImagesResponse {
    #[serde(default)]
    data: Vec<ImageDatum>,
}

#[derive(Debug, Deserialize)]
struct ImageDatum {
    b64_json: Option<String>,
}

/// Error envelope returned on non-success statuses.
#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: Option<ErrorBody>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

impl OpenAiClient {
    /// Create a client with the given API key.
    ///
    /// Returns [`ImageServiceError::MissingApiKey`] when the key is empty,
    /// so misconfiguration surfaces before the first remote call.
    pub fn new(api_key: impl Into<String>) -> Result<Self, ImageServiceError> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(ImageServiceError::MissingApiKey);
        }
        Ok(Self {
            http: reqwest::Client::new(),
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
        })
    }

    /// Override the API base URL (used by tests against a local stub).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Decode the first image of a successful response, or classify the
    /// failure.
    async fn extract_image(
        response: reqwest::Response,
    ) -> Result<Vec<u8>, ImageServiceError> {
        let status = response.status();
        if !status.is_success() {
            let message = response
                .json::<ErrorResponse>()
                .await
                .ok()
                .and_then(|e| e.error)
                .map(|e| e.message)
                .unwrap_or_else(|| "Unknown API error".to_string());
            return Err(ImageServiceError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body: ImagesResponse = response
            .json()
            .await
            .map_err(|e| ImageServiceError::InvalidPayload(e.to_string()))?;

        let b64 = body
            .data
            .into_iter()
            .next()
            .and_then(|d| d.b64_json)
            .ok_or(ImageServiceError::EmptyPayload)?;

        base64::engine::general_purpose::STANDARD
            .decode(b64)
            .map_err(|e| ImageServiceError::InvalidPayload(e.to_string()))
    }

    fn call_cost(operation: &'static str, size: ImageSize, quality: QualityTier) -> ApiCallCost {
        let quality = quality.effective();
        ApiCallCost {
            model: MODEL.to_string(),
            operation,
            size: size.api_value().to_string(),
            quality: quality.as_str().to_string(),
            cost: image_cost(size.api_value(), quality.as_str()),
        }
    }
}

#[async_trait]
impl ImageService for OpenAiClient {
    async fn generate(
        &self,
        prompt: &str,
        size: ImageSize,
        quality: QualityTier,
    ) -> Result<GeneratedImage, ImageServiceError> {
        let url = format!("{}/images/generations", self.base_url);
        tracing::debug!(size = size.api_value(), "Requesting image generation");

        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&serde_json::json!({
                "model": MODEL,
                "prompt": prompt,
                "size": size.api_value(),
                "n": 1,
                "quality": quality.effective().as_str(),
                "response_format": "b64_json",
            }))
            .send()
            .await
            .map_err(|e| ImageServiceError::Request(e.to_string()))?;

        let bytes = Self::extract_image(response).await?;
        Ok(GeneratedImage {
            bytes,
            cost: Self::call_cost("generate", size, quality),
        })
    }

    async fn edit(
        &self,
        base_image: &[u8],
        prompt: &str,
        size: ImageSize,
        quality: QualityTier,
    ) -> Result<GeneratedImage, ImageServiceError> {
        let url = format!("{}/images/edits", self.base_url);
        tracing::debug!(size = size.api_value(), "Requesting image edit");

        let image_part = reqwest::multipart::Part::bytes(base_image.to_vec())
            .file_name("composite.png")
            .mime_str("image/png")
            .map_err(|e| ImageServiceError::Request(e.to_string()))?;

        let form = reqwest::multipart::Form::new()
            .part("image", image_part)
            .text("model", MODEL)
            .text("prompt", prompt.to_string())
            .text("size", size.api_value())
            .text("n", "1")
            .text("quality", quality.effective().as_str())
            .text("response_format", "b64_json");

        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.api_key)
            .multipart(form)
            .send()
            .await
            .map_err(|e| ImageServiceError::Request(e.to_string()))?;

        let bytes = Self::extract_image(response).await?;
        Ok(GeneratedImage {
            bytes,
            cost: Self::call_cost("edit", size, quality),
        })
    }
}

/// Stand-in used when no API key is configured.
///
/// Dry-run and demo jobs never touch the image service; anything else
/// fails on first use with [`ImageServiceError::MissingApiKey`], which is
/// where the missing key becomes the job's error.
pub struct UnconfiguredService;

#[async_trait]
impl ImageService for UnconfiguredService {
    async fn generate(
        &self,
        _prompt: &str,
        _size: ImageSize,
        _quality: QualityTier,
    ) -> Result<GeneratedImage, ImageServiceError> {
        Err(ImageServiceError::MissingApiKey)
    }

    async fn edit(
        &self,
        _base_image: &[u8],
        _prompt: &str,
        _size: ImageSize,
        _quality: QualityTier,
    ) -> Result<GeneratedImage, ImageServiceError> {
        Err(ImageServiceError::MissingApiKey)
    }
}
