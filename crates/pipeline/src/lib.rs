//! BrandForge pipeline: the job orchestration and caching engine.
//!
//! One call to [`forge::forge_brand_kit`] turns a [`BrandConfig`] into a
//! directory of brand assets by running three dependency-ordered stages
//! (backgrounds, heroes, exports) under bounded concurrency, consulting a
//! content-addressable [`cache::CacheStore`] before every remote call, and
//! relaying progress and cost through an [`events::EventSink`].
//!
//! [`BrandConfig`]: brandforge_core::config::BrandConfig

pub mod backgrounds;
pub mod cache;
pub mod cost;
pub mod demo;
pub mod error;
pub mod events;
pub mod exports;
pub mod forge;
pub mod gallery;
pub mod heroes;
pub mod manifest;
pub mod raster;
pub mod scheduler;

pub use error::PipelineError;
pub use forge::{forge_brand_kit, ForgeResult, PipelineContext};
