//! Top-level pipeline orchestration.
//!
//! [`forge_brand_kit`] is the single entry point the job manager and CLI
//! invoke: it validates inputs, creates the timestamped output directory,
//! then runs the stages in dependency order (backgrounds, heroes, exports,
//! gallery, manifest), each stage fully drained before the next starts.

use std::path::PathBuf;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use brandforge_core::config::BrandConfig;
use brandforge_core::service::ImageService;

use crate::backgrounds::generate_backgrounds;
use crate::cache::CacheStore;
use crate::cost::{CostInfo, CostLedger};
use crate::demo::generate_demo_kit;
use crate::error::PipelineError;
use crate::events::{progress, EventSink};
use crate::exports::{export_icons, export_social};
use crate::gallery::write_gallery;
use crate::heroes::compose_heroes;
use crate::manifest::Manifest;

/// Everything a stage needs, cheap to clone into scheduled tasks.
pub struct PipelineContext {
    pub config: Arc<BrandConfig>,
    pub service: Arc<dyn ImageService>,
    pub cache: Arc<CacheStore>,
    pub ledger: Arc<CostLedger>,
    pub sink: Arc<dyn EventSink>,
    pub cancel: CancellationToken,
    /// Timestamped run directory under the configured output dir.
    pub out_dir: PathBuf,
}

/// Result of one successful run.
#[derive(Debug, Clone)]
pub struct ForgeResult {
    pub out_dir: PathBuf,
    pub manifest_path: PathBuf,
    pub files: Vec<PathBuf>,
    pub cost: CostInfo,
}

/// Run the full pipeline for one configuration.
///
/// The cache store is shared across runs; ledger and manifest are created
/// fresh here. Any stage error aborts the run after in-flight tasks settle;
/// partially written files are left behind (a retry re-uses them through
/// the cache).
pub async fn forge_brand_kit(
    config: BrandConfig,
    service: Arc<dyn ImageService>,
    cache: Arc<CacheStore>,
    sink: Arc<dyn EventSink>,
    cancel: CancellationToken,
) -> Result<ForgeResult, PipelineError> {
    config.validate()?;

    if !tokio::fs::try_exists(&config.logo_path).await.unwrap_or(false) {
        return Err(PipelineError::Logo(
            config.logo_path.display().to_string(),
        ));
    }

    let stamp = chrono::Utc::now()
        .format("%Y-%m-%dT%H-%M-%S-%3fZ")
        .to_string();
    let out_dir = config.output_dir.join(stamp);
    tokio::fs::create_dir_all(&out_dir).await?;

    let ctx = PipelineContext {
        config: Arc::new(config),
        service,
        cache,
        ledger: Arc::new(CostLedger::new(Arc::clone(&sink))),
        sink,
        cancel,
        out_dir: out_dir.clone(),
    };
    let config = &ctx.config;

    progress(&*ctx.sink, "Brandkit Forge started");
    progress(&*ctx.sink, format!("Brand: {}", config.name));
    if let Some(tagline) = &config.tagline {
        progress(&*ctx.sink, format!("Tagline: {tagline}"));
    }
    progress(&*ctx.sink, format!("Styles: {}", config.styles.join(", ")));
    progress(&*ctx.sink, format!("Preset: {}", config.preset));
    progress(&*ctx.sink, format!("Variants per style: {}", config.n));
    progress(&*ctx.sink, format!("Output: {}", out_dir.display()));

    let mut manifest = Manifest::new(config, &out_dir);

    if config.demo_mode {
        generate_demo_kit(&ctx, &mut manifest).await?;
        return finish(&ctx, manifest).await;
    }

    progress(&*ctx.sink, "Step 1: Generate backgrounds...");
    let backgrounds = generate_backgrounds(&ctx, &mut manifest).await?;

    progress(&*ctx.sink, "Step 2: Compose heroes...");
    compose_heroes(&ctx, &backgrounds, &mut manifest).await?;

    progress(&*ctx.sink, "Step 3: Export icons and social media assets...");
    if let Some(first_hero) = manifest.generated.heroes.first().cloned() {
        export_social(&ctx, &first_hero, &mut manifest).await?;
    }
    export_icons(&ctx, &mut manifest).await?;

    finish(&ctx, manifest).await
}

/// Shared tail of a run: gallery, manifest write, files list, cost summary.
async fn finish(
    ctx: &PipelineContext,
    manifest: Manifest,
) -> Result<ForgeResult, PipelineError> {
    progress(&*ctx.sink, "Step 4: Generate gallery...");
    let gallery_path = write_gallery(&ctx.out_dir, &manifest).await?;

    progress(&*ctx.sink, "Step 5: Write manifest...");
    let manifest_path = manifest.write(&ctx.out_dir).await?;
    progress(
        &*ctx.sink,
        format!("Manifest saved: {}", manifest_path.display()),
    );

    let mut files = manifest.generated_files();
    files.push(manifest_path.clone());
    files.push(gallery_path);

    let cost = ctx.ledger.snapshot();
    progress(&*ctx.sink, "Done!");
    progress(
        &*ctx.sink,
        format!("Total API cost: ${:.4}", cost.total_cost),
    );

    Ok(ForgeResult {
        out_dir: ctx.out_dir.clone(),
        manifest_path,
        files,
        cost,
    })
}
