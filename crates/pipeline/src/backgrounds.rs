//! Background generation stage.
//!
//! For each (style, variant) pair: build the prompt, consult the cache,
//! and either record a placeholder (dry-run), reuse the cached asset, or
//! schedule a remote generation under the background concurrency ceiling.
//! The returned map of resolved paths is the dependency input to the hero
//! stage, so this stage runs to full completion before heroes start.

use std::collections::HashMap;
use std::path::PathBuf;

use brandforge_core::hashing::{cache_key, CacheFingerprint};
use brandforge_core::prompt::build_background_prompt;
use brandforge_core::size::background_size;

use crate::cost::CostCategory;
use crate::error::PipelineError;
use crate::events::progress;
use crate::forge::PipelineContext;
use crate::manifest::Manifest;
use crate::raster;
use crate::scheduler::{run_bounded, BACKGROUND_CONCURRENCY};

/// Resolved background paths per style, ordered by variant index.
pub type BackgroundMap = HashMap<String, Vec<PathBuf>>;

/// Run the background stage to completion.
pub async fn generate_backgrounds(
    ctx: &PipelineContext,
    manifest: &mut Manifest,
) -> Result<BackgroundMap, PipelineError> {
    let config = &ctx.config;
    let fingerprint = CacheFingerprint::of(config);
    let size = background_size(config.background_size);

    let mut slots: HashMap<String, Vec<Option<PathBuf>>> = config
        .styles
        .iter()
        .map(|style| (style.clone(), vec![None; config.n as usize]))
        .collect();
    let mut tasks = Vec::new();

    for style in &config.styles {
        for variant in 0..config.n {
            let prompt = build_background_prompt(style, &config.colors, config);
            manifest
                .prompts
                .backgrounds
                .insert(format!("{style}-{variant}"), prompt.clone());

            let hash = cache_key(
                &fingerprint,
                &format!("{style}-background-{variant}-{prompt}"),
            );

            let variant_dir = ctx
                .out_dir
                .join("variants")
                .join(style)
                .join(variant.to_string());

            if config.dry_run {
                progress(
                    &*ctx.sink,
                    format!("[dry-run] Would generate background {style}-{variant}"),
                );
                let placeholder =
                    variant_dir.join(format!("background-dry-run.{}", config.format.extension()));
                slots.get_mut(style).expect("style planned")[variant as usize] = Some(placeholder);
                continue;
            }

            if let Some(cached) = ctx.cache.lookup(&hash, config).await {
                progress(
                    &*ctx.sink,
                    format!("Cache hit for background {style}-{variant}"),
                );
                manifest.generated.backgrounds.push(cached.clone());
                slots.get_mut(style).expect("style planned")[variant as usize] = Some(cached);
                continue;
            }

            let stem = variant_dir.join("background");
            let style = style.clone();
            let config = ctx.config.clone();
            let service = ctx.service.clone();
            let cache = ctx.cache.clone();
            let ledger = ctx.ledger.clone();
            let sink = ctx.sink.clone();

            tasks.push(async move {
                progress(&*sink, format!("Generating background {style}-{variant}"));
                let image = service.generate(&prompt, size, config.quality).await?;
                let path =
                    raster::write_bytes_as(&image.bytes, &stem, config.format, config.compression)
                        .await?;
                cache.store(&hash, &path, &config).await?;
                ledger.add(image.cost.cost, CostCategory::Backgrounds);
                tracing::info!(
                    style = %style,
                    variant,
                    path = %path.display(),
                    "Background generated",
                );
                Ok((style, variant, path))
            });
        }
    }

    let generated = run_bounded(BACKGROUND_CONCURRENCY, &ctx.cancel, tasks).await?;

    for (style, variant, path) in generated {
        manifest.generated.backgrounds.push(path.clone());
        slots.get_mut(&style).expect("style planned")[variant as usize] = Some(path);
    }

    Ok(slots
        .into_iter()
        .map(|(style, paths)| {
            let paths = paths
                .into_iter()
                .map(|p| p.expect("every variant resolved before the stage returns"))
                .collect();
            (style, paths)
        })
        .collect())
}
