//! Client for the OpenAI image generation/edit API.
//!
//! Implements the [`brandforge_core::service::ImageService`] capability:
//! text-to-image generation and image editing, with the fixed pricing table
//! that determines the cost attached to each successful call.

pub mod client;
pub mod pricing;

pub use client::{OpenAiClient, UnconfiguredService};
