//! BrandForge command line: one logo in, a launch asset pack out.
//!
//! Runs a single pipeline invocation on the current task, printing every
//! progress line to stdout. Ctrl-C triggers the run's cancellation token,
//! so a long generation sequence aborts cleanly between remote calls.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tokio_util::sync::CancellationToken;

use brandforge_core::config::{
    normalize_config, BackgroundAspect, ConfigInput, OutputFormat, QualityTier, StringList,
};
use brandforge_core::service::ImageService;
use brandforge_openai::{OpenAiClient, UnconfiguredService};
use brandforge_pipeline::cache::CacheStore;
use brandforge_pipeline::events::{EventSink, PipelineEvent};
use brandforge_pipeline::forge_brand_kit;

/// One logo in -> complete launch asset pack out.
#[derive(Debug, Parser)]
#[command(name = "brandforge", version, about)]
struct Cli {
    /// Path to the logo image (png/webp/jpg).
    #[arg(long)]
    logo: PathBuf,

    /// Brand name.
    #[arg(long)]
    name: String,

    /// Tagline (optional).
    #[arg(long)]
    tagline: Option<String>,

    /// Comma-separated colors (#RRGGBB).
    #[arg(long)]
    colors: Option<String>,

    /// Comma-separated styles (default: minimal,neon,clay,blueprint).
    #[arg(long)]
    styles: Option<String>,

    /// Prompt preset: core|soft|bold|noir.
    #[arg(long)]
    preset: Option<String>,

    /// Variants per style.
    #[arg(short, default_value_t = 2)]
    n: u32,

    /// Output directory.
    #[arg(long, default_value = "./out")]
    out: PathBuf,

    /// Output format: png|webp|jpeg.
    #[arg(long, value_enum, default_value_t = FormatArg::Png)]
    format: FormatArg,

    /// Quality: low|medium|high|auto.
    #[arg(long, value_enum, default_value_t = QualityArg::High)]
    quality: QualityArg,

    /// Background aspect: landscape|square|portrait.
    #[arg(long = "size", value_enum, default_value_t = AspectArg::Landscape)]
    background_size: AspectArg,

    /// Show prompts and plan without API calls.
    #[arg(long)]
    dry_run: bool,

    /// Disable the generation cache.
    #[arg(long)]
    no_cache: bool,

    /// Synthesize placeholder assets locally (no API calls, zero cost).
    #[arg(long)]
    demo: bool,

    /// Cache file location.
    #[arg(long, default_value = brandforge_pipeline::cache::DEFAULT_CACHE_FILE)]
    cache_file: PathBuf,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum FormatArg {
    Png,
    Webp,
    Jpeg,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum QualityArg {
    Low,
    Medium,
    High,
    Auto,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum AspectArg {
    Landscape,
    Square,
    Portrait,
}

/// Prints progress lines; cost snapshots stay silent (the final total is a
/// progress line of its own).
struct StdoutSink;

impl EventSink for StdoutSink {
    fn emit(&self, event: PipelineEvent) {
        if let PipelineEvent::Progress(message) = event {
            println!("{message}");
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "brandforge=warn".into()),
        )
        .init();

    let cli = Cli::parse();

    let input = ConfigInput {
        name: cli.name,
        tagline: cli.tagline,
        colors: cli.colors.map(StringList::Csv),
        styles: cli.styles.map(StringList::Csv),
        preset: cli.preset,
        n: Some(cli.n),
        format: Some(match cli.format {
            FormatArg::Png => OutputFormat::Png,
            FormatArg::Webp => OutputFormat::Webp,
            FormatArg::Jpeg => OutputFormat::Jpeg,
        }),
        quality: Some(match cli.quality {
            QualityArg::Low => QualityTier::Low,
            QualityArg::Medium => QualityTier::Medium,
            QualityArg::High => QualityTier::High,
            QualityArg::Auto => QualityTier::Auto,
        }),
        background_size: Some(match cli.background_size {
            AspectArg::Landscape => BackgroundAspect::Landscape,
            AspectArg::Square => BackgroundAspect::Square,
            AspectArg::Portrait => BackgroundAspect::Portrait,
        }),
        dry_run: Some(cli.dry_run),
        cache: Some(!cli.no_cache),
        demo_mode: Some(cli.demo),
        ..ConfigInput::default()
    };

    let config = normalize_config(input).into_config(cli.logo, cli.out);
    config
        .validate()
        .context("Invalid configuration")?;

    let service: Arc<dyn ImageService> = match std::env::var("OPENAI_API_KEY")
        .ok()
        .filter(|k| !k.trim().is_empty())
    {
        Some(key) => Arc::new(OpenAiClient::new(key)?),
        None => Arc::new(UnconfiguredService),
    };

    // Ctrl-C aborts the run between remote calls.
    let cancel = CancellationToken::new();
    let ctrl_c_cancel = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            eprintln!("Interrupt received, cancelling...");
            ctrl_c_cancel.cancel();
        }
    });

    println!("\nBrandkit Forge");
    println!("==================\n");

    let result = forge_brand_kit(
        config,
        service,
        Arc::new(CacheStore::new(cli.cache_file)),
        Arc::new(StdoutSink),
        cancel,
    )
    .await?;

    println!("\nOutput directory: {}", result.out_dir.display());
    println!(
        "Gallery: {}",
        result.out_dir.join("gallery").join("index.html").display()
    );
    println!("Manifest: {}\n", result.manifest_path.display());

    Ok(())
}
