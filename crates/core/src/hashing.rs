//! Cache-key derivation.
//!
//! A cache key is the SHA-256 digest of a stable serialization of the
//! config fields that determine a generated artifact, concatenated with a
//! caller-supplied key text (style, variant, size variant, and the fully
//! rendered prompt), truncated to 16 hex characters. Fields that do not
//! affect the output (paths, cache/dry-run switches, API key) are excluded
//! so toggling them cannot invalidate the cache.

use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::config::{BackgroundAspect, BrandConfig, OutputFormat, QualityTier};

/// Number of hex characters kept from the SHA-256 digest.
///
/// 16 hex chars = 64 bits, plenty of collision resistance for the cache
/// sizes this system sees while staying readable in file listings.
pub const CACHE_KEY_LEN: usize = 16;

/// Compute a SHA-256 hex digest of the given bytes.
pub fn sha256_hex(data: &[u8]) -> String {
    let hash = Sha256::digest(data);
    format!("{hash:x}")
}

/// The subset of [`BrandConfig`] that participates in cache keys.
///
/// Field order is part of the serialized form; extend only by appending.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CacheFingerprint {
    pub name: String,
    pub tagline: Option<String>,
    pub colors: Vec<String>,
    pub preset: String,
    pub format: OutputFormat,
    pub quality: QualityTier,
    pub background_size: BackgroundAspect,
    pub transparency: bool,
    pub compression: u8,
}

impl CacheFingerprint {
    pub fn of(config: &BrandConfig) -> Self {
        Self {
            name: config.name.clone(),
            tagline: config.tagline.clone(),
            colors: config.colors.clone(),
            preset: config.preset.clone(),
            format: config.format,
            quality: config.quality,
            background_size: config.background_size,
            transparency: config.transparency,
            compression: config.compression,
        }
    }
}

/// Derive the cache key for one artifact.
///
/// `key_text` must uniquely identify the artifact within the fingerprint:
/// callers embed the style, variant index, size variant, and the rendered
/// prompt text.
pub fn cache_key(fingerprint: &CacheFingerprint, key_text: &str) -> String {
    let config_json =
        serde_json::to_string(fingerprint).expect("fingerprint serialization cannot fail");
    let mut digest = sha256_hex(format!("{config_json}\n{key_text}").as_bytes());
    digest.truncate(CACHE_KEY_LEN);
    digest
}
