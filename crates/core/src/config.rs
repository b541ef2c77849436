//! Brand configuration model, normalization, and validation.
//!
//! [`BrandConfig`] is the immutable input to one pipeline run. Loose client
//! input arrives as [`ConfigInput`] (CLI flags or the JSON field of a
//! multipart upload) and is turned into a fully-defaulted
//! [`NormalizedConfig`] by [`normalize_config`]. Closed-set fields
//! (format, quality, aspect) are enums, so an invalid value is rejected at
//! deserialization or falls back to the default during normalization.

use std::collections::HashMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::preset::default_preset_id;
use crate::style::default_styles;

// ---------------------------------------------------------------------------
// Defaults
// ---------------------------------------------------------------------------

/// Default number of variants generated per style.
pub const DEFAULT_VARIANTS: u32 = 2;

/// Default JPEG/WebP compression quality.
pub const DEFAULT_COMPRESSION: u8 = 85;

/// Lowest accepted compression quality; lower values are clamped up.
pub const MIN_COMPRESSION: u8 = 50;

/// Highest accepted compression quality; higher values are clamped down.
pub const MAX_COMPRESSION: u8 = 100;

// ---------------------------------------------------------------------------
// Closed-set fields
// ---------------------------------------------------------------------------

/// Output raster format for every generated asset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Png,
    Webp,
    Jpeg,
}

impl OutputFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Webp => "webp",
            Self::Jpeg => "jpeg",
        }
    }

    /// File extension for this format (`jpeg` files use `.jpg`).
    pub fn extension(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Webp => "webp",
            Self::Jpeg => "jpg",
        }
    }
}

/// Generation quality tier passed to the remote image API.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QualityTier {
    Low,
    Medium,
    #[default]
    High,
    Auto,
}

impl QualityTier {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Auto => "auto",
        }
    }

    /// The tier actually billed: `auto` resolves to `high`.
    pub fn effective(self) -> Self {
        match self {
            Self::Auto => Self::High,
            other => other,
        }
    }
}

/// Aspect class for generated backgrounds (and the matching hero variant).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackgroundAspect {
    #[default]
    Landscape,
    Square,
    Portrait,
}

impl BackgroundAspect {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Landscape => "landscape",
            Self::Square => "square",
            Self::Portrait => "portrait",
        }
    }
}

// ---------------------------------------------------------------------------
// BrandConfig
// ---------------------------------------------------------------------------

/// A user-defined prompt preset: description plus the mood text spliced into
/// the background and hero/edit prompts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomPreset {
    pub description: String,
    pub background: String,
    pub edit: String,
}

/// Immutable input to one pipeline run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrandConfig {
    pub logo_path: PathBuf,
    pub name: String,
    pub tagline: Option<String>,
    pub colors: Vec<String>,
    pub styles: Vec<String>,
    pub preset: String,
    /// Custom style name -> style description spliced into the prompt.
    pub custom_styles: Option<HashMap<String, String>>,
    /// Custom preset name -> preset definition.
    pub custom_presets: Option<HashMap<String, CustomPreset>>,
    /// Variants generated per style.
    pub n: u32,
    pub output_dir: PathBuf,
    pub format: OutputFormat,
    pub quality: QualityTier,
    pub background_size: BackgroundAspect,
    /// Plan only: record prompts and placeholder paths, no external calls.
    pub dry_run: bool,
    pub cache: bool,
    /// Never serialized: job snapshots echo the config to clients.
    #[serde(skip_serializing, default)]
    pub api_key: Option<String>,
    /// Synthesize placeholder assets locally, zero cost.
    pub demo_mode: bool,
    pub transparency: bool,
    /// JPEG/WebP quality, clamped to `50..=100`.
    pub compression: u8,
}

impl BrandConfig {
    /// Validate the invariants that normalization cannot enforce on its own.
    ///
    /// Checked before any job is created or any external call is made.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.name.trim().is_empty() {
            return Err(CoreError::Validation(
                "Brand name must not be empty".to_string(),
            ));
        }
        if self.styles.is_empty() {
            return Err(CoreError::Validation(
                "At least one style is required".to_string(),
            ));
        }
        if self.n < 1 {
            return Err(CoreError::Validation(
                "Variant count must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Loose input + normalization
// ---------------------------------------------------------------------------

/// A list that clients may send either as a JSON array or as a
/// comma-separated string.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum StringList {
    List(Vec<String>),
    Csv(String),
}

impl StringList {
    fn into_vec(self) -> Vec<String> {
        let items = match self {
            Self::List(list) => list,
            Self::Csv(csv) => csv.split(',').map(str::to_string).collect(),
        };
        items
            .into_iter()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect()
    }
}

/// Loosely-typed configuration as received from a client.
///
/// Every field is optional except `name`; [`normalize_config`] fills
/// defaults and trims/clamps values.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ConfigInput {
    pub name: String,
    pub tagline: Option<String>,
    pub colors: Option<StringList>,
    pub styles: Option<StringList>,
    pub preset: Option<String>,
    pub custom_styles: Option<HashMap<String, String>>,
    pub custom_presets: Option<HashMap<String, CustomPreset>>,
    pub n: Option<u32>,
    pub format: Option<OutputFormat>,
    pub quality: Option<QualityTier>,
    pub background_size: Option<BackgroundAspect>,
    pub dry_run: Option<bool>,
    pub cache: Option<bool>,
    pub api_key: Option<String>,
    pub demo_mode: Option<bool>,
    pub transparency: Option<bool>,
    pub compression: Option<u8>,
}

/// A fully-defaulted configuration, still missing the per-job paths
/// (`logo_path`, `output_dir`) which the job manager or CLI supplies.
#[derive(Debug, Clone)]
pub struct NormalizedConfig {
    pub name: String,
    pub tagline: Option<String>,
    pub colors: Vec<String>,
    pub styles: Vec<String>,
    pub preset: String,
    pub custom_styles: Option<HashMap<String, String>>,
    pub custom_presets: Option<HashMap<String, CustomPreset>>,
    pub n: u32,
    pub format: OutputFormat,
    pub quality: QualityTier,
    pub background_size: BackgroundAspect,
    pub dry_run: bool,
    pub cache: bool,
    pub api_key: Option<String>,
    pub demo_mode: bool,
    pub transparency: bool,
    pub compression: u8,
}

impl NormalizedConfig {
    /// Attach the per-job paths, producing a complete [`BrandConfig`].
    pub fn into_config(self, logo_path: PathBuf, output_dir: PathBuf) -> BrandConfig {
        BrandConfig {
            logo_path,
            name: self.name,
            tagline: self.tagline,
            colors: self.colors,
            styles: self.styles,
            preset: self.preset,
            custom_styles: self.custom_styles,
            custom_presets: self.custom_presets,
            n: self.n,
            output_dir,
            format: self.format,
            quality: self.quality,
            background_size: self.background_size,
            dry_run: self.dry_run,
            cache: self.cache,
            api_key: self.api_key,
            demo_mode: self.demo_mode,
            transparency: self.transparency,
            compression: self.compression,
        }
    }
}

/// Turn loose client input into a fully-defaulted configuration.
///
/// - empty style list falls back to the built-in default styles
/// - empty/whitespace tagline becomes `None`
/// - missing preset falls back to the default preset id
/// - compression is clamped to `50..=100`
pub fn normalize_config(input: ConfigInput) -> NormalizedConfig {
    let styles = match input.styles.map(StringList::into_vec) {
        Some(styles) if !styles.is_empty() => styles,
        _ => default_styles(),
    };

    let tagline = input
        .tagline
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty());

    let preset = input
        .preset
        .map(|p| p.trim().to_string())
        .filter(|p| !p.is_empty())
        .unwrap_or_else(|| default_preset_id().to_string());

    let custom_styles = input.custom_styles.filter(|m| !m.is_empty());
    let custom_presets = input.custom_presets.filter(|m| !m.is_empty());

    NormalizedConfig {
        name: input.name.trim().to_string(),
        tagline,
        colors: input.colors.map(StringList::into_vec).unwrap_or_default(),
        styles,
        preset,
        custom_styles,
        custom_presets,
        n: input.n.unwrap_or(DEFAULT_VARIANTS),
        format: input.format.unwrap_or_default(),
        quality: input.quality.unwrap_or_default(),
        background_size: input.background_size.unwrap_or_default(),
        dry_run: input.dry_run.unwrap_or(false),
        cache: input.cache.unwrap_or(true),
        api_key: input
            .api_key
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty()),
        demo_mode: input.demo_mode.unwrap_or(false),
        transparency: input.transparency.unwrap_or(false),
        compression: input
            .compression
            .unwrap_or(DEFAULT_COMPRESSION)
            .clamp(MIN_COMPRESSION, MAX_COMPRESSION),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
