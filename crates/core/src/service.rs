//! The external image capability.
//!
//! [`ImageService`] is the seam between the pipeline and the remote
//! generation API: the pipeline only ever sees "prompt in, bytes + cost
//! out". The production implementation lives in `brandforge-openai`; tests
//! substitute recording stubs.

use async_trait::async_trait;
use serde::Serialize;

use crate::config::QualityTier;
use crate::size::ImageSize;

/// Cost record for one successful remote call.
#[derive(Debug, Clone, Serialize)]
pub struct ApiCallCost {
    pub model: String,
    /// `"generate"` or `"edit"`.
    pub operation: &'static str,
    pub size: String,
    pub quality: String,
    /// Price of this call in USD.
    pub cost: f64,
}

/// A successfully generated image: raw bytes plus the billed cost.
#[derive(Debug, Clone)]
pub struct GeneratedImage {
    pub bytes: Vec<u8>,
    pub cost: ApiCallCost,
}

/// Errors from the remote image capability.
#[derive(Debug, thiserror::Error)]
pub enum ImageServiceError {
    /// The HTTP request itself failed (network, TLS, timeout).
    #[error("Request failed: {0}")]
    Request(String),

    /// The API answered with a non-success status.
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// The API answered 2xx but the response carried no image data.
    #[error("No image data received in the API response")]
    EmptyPayload,

    /// The image payload could not be decoded.
    #[error("Invalid image payload: {0}")]
    InvalidPayload(String),

    /// No API key was configured.
    #[error("Missing API key: provide one in the request or set OPENAI_API_KEY")]
    MissingApiKey,
}

/// Remote image generation and editing.
///
/// Each successful call carries the monetary cost determined by the
/// provider's pricing table for (size, quality).
#[async_trait]
pub trait ImageService: Send + Sync {
    /// Generate an image from a text prompt.
    async fn generate(
        &self,
        prompt: &str,
        size: ImageSize,
        quality: QualityTier,
    ) -> Result<GeneratedImage, ImageServiceError>;

    /// Edit a base image (PNG bytes) according to a text prompt.
    async fn edit(
        &self,
        base_image: &[u8],
        prompt: &str,
        size: ImageSize,
        quality: QualityTier,
    ) -> Result<GeneratedImage, ImageServiceError>;
}
