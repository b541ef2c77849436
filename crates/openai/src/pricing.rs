//! Fixed per-image pricing table.
//!
//! Prices in USD for the `gpt-image-1.5` model, December 2025. The pipeline
//! never computes prices itself; it records whatever cost the service
//! attaches to a call.

/// Model used for both generation and edits.
pub const MODEL: &str = "gpt-image-1.5";

/// Fallback price when a (size, quality) pair is missing from the table.
const DEFAULT_PRICE: f64 = 0.044;

/// (size, quality) -> price in USD.
const PRICES: &[(&str, &str, f64)] = &[
    ("1024x1024", "low", 0.01),
    ("1024x1024", "medium", 0.04),
    ("1024x1024", "high", 0.17),
    ("1536x1024", "low", 0.015),
    ("1536x1024", "medium", 0.06),
    ("1536x1024", "high", 0.25),
    ("1024x1536", "low", 0.015),
    ("1024x1536", "medium", 0.06),
    ("1024x1536", "high", 0.25),
];

/// Price of one image at the given size and quality.
pub fn image_cost(size: &str, quality: &str) -> f64 {
    PRICES
        .iter()
        .find(|(s, q, _)| *s == size && *q == quality)
        .map(|(_, _, price)| *price)
        .unwrap_or(DEFAULT_PRICE)
}
