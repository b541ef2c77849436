//! Hero composition stage.
//!
//! For each (style, variant, size-variant) triple the resolved background is
//! cover-cropped to the target size, the logo is composited over its center,
//! and the composite goes to the remote edit capability with the shared
//! edit prompt. Must only run after the background stage has fully drained:
//! every task here reads a background path resolved by that stage.

use std::sync::Arc;

use brandforge_core::hashing::{cache_key, CacheFingerprint};
use brandforge_core::prompt::build_edit_prompt;
use brandforge_core::size::hero_sizes;

use crate::backgrounds::BackgroundMap;
use crate::cost::CostCategory;
use crate::error::PipelineError;
use crate::events::progress;
use crate::forge::PipelineContext;
use crate::manifest::Manifest;
use crate::raster;
use crate::scheduler::{run_bounded, HERO_CONCURRENCY};

/// Run the hero stage to completion.
pub async fn compose_heroes(
    ctx: &PipelineContext,
    backgrounds: &BackgroundMap,
    manifest: &mut Manifest,
) -> Result<(), PipelineError> {
    let config = &ctx.config;
    let fingerprint = CacheFingerprint::of(config);
    let edit_prompt = build_edit_prompt(config);
    let sizes = hero_sizes(config.background_size);

    // Decode the logo once; every composition task shares it.
    let logo = if config.dry_run {
        None
    } else {
        let bytes = tokio::fs::read(&config.logo_path)
            .await
            .map_err(|e| PipelineError::Logo(format!("{}: {e}", config.logo_path.display())))?;
        Some(Arc::new(raster::decode(&bytes)?))
    };

    let mut tasks = Vec::new();

    // Iterate styles in config order so scheduling and manifest order are
    // deterministic (the map itself has no useful order).
    for style in &config.styles {
        let Some(bg_paths) = backgrounds.get(style) else {
            continue;
        };
        for (variant, bg_path) in bg_paths.iter().enumerate() {
            for hero in &sizes {
                manifest.prompts.edits.insert(
                    format!("{style}-{variant}-{}", hero.label),
                    edit_prompt.clone(),
                );

                if config.dry_run {
                    progress(
                        &*ctx.sink,
                        format!("[dry-run] Would compose hero {style}-{variant}-{}", hero.label),
                    );
                    continue;
                }

                let hash = cache_key(
                    &fingerprint,
                    &format!("{style}-{variant}-{}-{edit_prompt}", hero.label),
                );

                if let Some(cached) = ctx.cache.lookup(&hash, config).await {
                    progress(
                        &*ctx.sink,
                        format!("Cache hit for hero {style}-{variant}-{}", hero.label),
                    );
                    manifest.generated.heroes.push(cached);
                    continue;
                }

                let stem = ctx
                    .out_dir
                    .join("variants")
                    .join(style)
                    .join(variant.to_string())
                    .join(hero.file_stem);
                let style = style.clone();
                let label = hero.label;
                let size = hero.size;
                let bg_path = bg_path.clone();
                let prompt = edit_prompt.clone();
                let logo = logo.clone().expect("logo decoded for non-dry-run");
                let config = ctx.config.clone();
                let service = ctx.service.clone();
                let cache = ctx.cache.clone();
                let ledger = ctx.ledger.clone();
                let sink = ctx.sink.clone();

                tasks.push(async move {
                    progress(&*sink, format!("Composing hero {style}-{variant}-{label}"));

                    let bg_bytes = tokio::fs::read(&bg_path).await?;
                    let background = raster::decode(&bg_bytes)?;
                    let composite =
                        raster::compose_logo_over(&background, &logo, size.dimensions());
                    let composite_png = raster::encode_png(&composite)?;

                    let image = service
                        .edit(&composite_png, &prompt, size, config.quality)
                        .await?;
                    let path = raster::write_bytes_as(
                        &image.bytes,
                        &stem,
                        config.format,
                        config.compression,
                    )
                    .await?;
                    cache.store(&hash, &path, &config).await?;
                    ledger.add(image.cost.cost, CostCategory::Heroes);
                    tracing::info!(
                        style = %style,
                        variant,
                        size = label,
                        path = %path.display(),
                        "Hero composed",
                    );
                    Ok(path)
                });
            }
        }
    }

    let composed = run_bounded(HERO_CONCURRENCY, &ctx.cancel, tasks).await?;
    manifest.generated.heroes.extend(composed);
    Ok(())
}
