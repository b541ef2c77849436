//! The persisted record of one pipeline run.
//!
//! Stages fill the manifest incrementally (prompt maps first, generated
//! paths as tasks resolve); [`Manifest::write`] serializes it once at the
//! end of a successful run. Prompt maps are `BTreeMap`s so the serialized
//! form is deterministic for identical inputs.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use brandforge_core::config::BrandConfig;
use brandforge_core::types::Timestamp;

use crate::error::PipelineError;

/// File name of the manifest within the output directory.
pub const MANIFEST_FILE: &str = "brandkit.json";

/// Echo of the user-supplied identity inputs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManifestInput {
    pub logo: PathBuf,
    pub name: String,
    pub tagline: Option<String>,
    pub colors: Vec<String>,
}

/// Echo of the generation configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManifestConfig {
    pub styles: Vec<String>,
    pub preset: String,
    pub n: u32,
    pub format: String,
    pub quality: String,
}

/// Prompt text per artifact key.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ManifestPrompts {
    /// `"{style}-{variant}"` -> background prompt.
    pub backgrounds: BTreeMap<String, String>,
    /// `"{style}-{variant}-{size}"` -> hero edit prompt.
    pub edits: BTreeMap<String, String>,
}

/// Generated file paths, in stage submission order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ManifestGenerated {
    pub backgrounds: Vec<PathBuf>,
    pub heroes: Vec<PathBuf>,
    pub icons: Vec<PathBuf>,
    pub social: Vec<PathBuf>,
}

/// The full run record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Manifest {
    pub timestamp: Timestamp,
    pub input: ManifestInput,
    pub config: ManifestConfig,
    pub prompts: ManifestPrompts,
    pub generated: ManifestGenerated,
    pub output_dir: PathBuf,
}

impl Manifest {
    /// Start an empty manifest for a run.
    pub fn new(config: &BrandConfig, output_dir: &Path) -> Self {
        Self {
            timestamp: chrono::Utc::now(),
            input: ManifestInput {
                logo: config.logo_path.clone(),
                name: config.name.clone(),
                tagline: config.tagline.clone(),
                colors: config.colors.clone(),
            },
            config: ManifestConfig {
                styles: config.styles.clone(),
                preset: config.preset.clone(),
                n: config.n,
                format: config.format.as_str().to_string(),
                quality: config.quality.as_str().to_string(),
            },
            prompts: ManifestPrompts::default(),
            generated: ManifestGenerated::default(),
            output_dir: output_dir.to_path_buf(),
        }
    }

    /// All generated files in manifest order.
    pub fn generated_files(&self) -> Vec<PathBuf> {
        self.generated
            .backgrounds
            .iter()
            .chain(&self.generated.heroes)
            .chain(&self.generated.icons)
            .chain(&self.generated.social)
            .cloned()
            .collect()
    }

    /// Serialize to `brandkit.json` inside `dir`. Returns the written path.
    pub async fn write(&self, dir: &Path) -> Result<PathBuf, PipelineError> {
        let path = dir.join(MANIFEST_FILE);
        let json = serde_json::to_vec_pretty(self)
            .map_err(|e| PipelineError::Task(format!("Manifest serialization failed: {e}")))?;
        tokio::fs::write(&path, json).await?;
        Ok(path)
    }
}
