//! Export stage: icon ladder and social-media crops.
//!
//! Purely local raster work (no caching, no cost) scheduled under the
//! cheap export ceiling. Icons derive from the logo; exactly one social
//! crop set derives from the first hero in manifest order (the caller
//! skips social export when no hero exists).

use std::path::Path;
use std::sync::Arc;

use crate::error::PipelineError;
use crate::events::progress;
use crate::forge::PipelineContext;
use crate::manifest::Manifest;
use crate::raster;
use crate::scheduler::{run_bounded, EXPORT_CONCURRENCY};

/// Icon ladder: file stem -> square pixel size.
pub const ICON_SIZES: &[(&str, u32)] = &[
    ("app-icon-1024", 1024),
    ("app-icon-512", 512),
    ("app-icon-256", 256),
    ("app-icon-192", 192),
    ("app-icon-180", 180),
    ("app-icon-152", 152),
    ("app-icon-128", 128),
    ("favicon-32", 32),
    ("favicon-16", 16),
];

/// Social crops: name -> (width, height).
pub const SOCIAL_SIZES: &[(&str, u32, u32)] = &[("og", 1200, 630), ("x", 1600, 900)];

/// Export the icon ladder from the logo.
pub async fn export_icons(ctx: &PipelineContext, manifest: &mut Manifest) -> Result<(), PipelineError> {
    let config = &ctx.config;
    let icons_dir = ctx.out_dir.join("icons");

    let logo_bytes = tokio::fs::read(&config.logo_path)
        .await
        .map_err(|e| PipelineError::Logo(format!("{}: {e}", config.logo_path.display())))?;
    let logo = Arc::new(raster::decode(&logo_bytes)?);

    let mut tasks = Vec::new();
    for &(name, size) in ICON_SIZES {
        let logo = Arc::clone(&logo);
        let stem = icons_dir.join(name);
        let config = ctx.config.clone();
        let sink = ctx.sink.clone();

        tasks.push(async move {
            let icon = raster::contain_square(&logo, size, config.format);
            let path = raster::write_image(&icon, &stem, config.format, config.compression).await?;
            progress(&*sink, format!("Exported icon {name} ({size}x{size})"));
            Ok(path)
        });
    }

    let paths = run_bounded(EXPORT_CONCURRENCY, &ctx.cancel, tasks).await?;
    manifest.generated.icons.extend(paths);
    Ok(())
}

/// Export the social crop set from one hero image.
pub async fn export_social(
    ctx: &PipelineContext,
    hero_path: &Path,
    manifest: &mut Manifest,
) -> Result<(), PipelineError> {
    let social_dir = ctx.out_dir.join("social");

    let hero_bytes = tokio::fs::read(hero_path).await?;
    let hero = Arc::new(raster::decode(&hero_bytes)?);

    let mut tasks = Vec::new();
    for &(name, width, height) in SOCIAL_SIZES {
        let hero = Arc::clone(&hero);
        let stem = social_dir.join(format!("{name}-{width}x{height}"));
        let config = ctx.config.clone();
        let sink = ctx.sink.clone();

        tasks.push(async move {
            let crop = raster::cover(&hero, width, height);
            let path = raster::write_image(&crop, &stem, config.format, config.compression).await?;
            progress(&*sink, format!("Exported social crop {name}-{width}x{height}"));
            Ok(path)
        });
    }

    let paths = run_bounded(EXPORT_CONCURRENCY, &ctx.cancel, tasks).await?;
    manifest.generated.social.extend(paths);
    Ok(())
}
