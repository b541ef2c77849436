//! BrandForge domain core.
//!
//! Pure domain logic shared by the pipeline, API server, and CLI: the brand
//! configuration model, style/preset catalogs, prompt construction, image
//! size mapping, cache-key hashing, the error taxonomy, and the
//! [`service::ImageService`] capability trait. No I/O lives here.

pub mod config;
pub mod error;
pub mod hashing;
pub mod preset;
pub mod prompt;
pub mod service;
pub mod size;
pub mod style;
pub mod types;
