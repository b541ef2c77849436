//! Built-in prompt preset catalog and lookup.
//!
//! A preset supplies the mood text spliced into both prompt kinds: one line
//! for backgrounds, one for the hero edit. User-defined presets from the
//! config shadow built-ins of the same name; an unknown id falls back to the
//! default preset rather than failing.

use serde::Serialize;

use crate::config::BrandConfig;

/// Id of the preset used when none is specified.
pub const DEFAULT_PRESET_ID: &str = "core";

/// A prompt preset: human-facing metadata plus the mood fragments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PromptPreset {
    pub id: String,
    pub name: String,
    pub description: String,
    /// Mood line for the background prompt.
    pub background: String,
    /// Mood line for the hero edit prompt.
    pub edit: String,
}

const BUILTIN_PRESETS: &[(&str, &str, &str, &str, &str)] = &[
    (
        "core",
        "Core",
        "Ultra-premium, cinematic, hero-grade brand look.",
        "cinematic lighting, dramatic depth, ultra premium gradients, modern and sharp",
        "refined but powerful halo, razor separation, hero-level polish",
    ),
    (
        "soft",
        "Soft Airy",
        "Luminous luxury with dreamy softness and glassy gradients.",
        "luminous and airy, luxury pastels, glassy gradients, serene elegance",
        "clean glow with silky separation, ultra smooth and refined",
    ),
    (
        "bold",
        "Bold Contrast",
        "Maximum contrast, bold energy, and striking visual punch.",
        "maximum contrast, deep shadows, bold gradients, intense high-energy mood",
        "strong separation, crisp edges, powerful hero silhouette",
    ),
    (
        "noir",
        "Noir",
        "Dark, sleek, cinematic intensity with sharp premium highlights.",
        "dark neutral palette, intense highlights, cinematic minimal mood",
        "vivid logo, razor separation against the dark base",
    ),
];

fn builtin(id: &str, name: &str, description: &str, background: &str, edit: &str) -> PromptPreset {
    PromptPreset {
        id: id.to_string(),
        name: name.to_string(),
        description: description.to_string(),
        background: background.to_string(),
        edit: edit.to_string(),
    }
}

/// All built-in presets, in catalog order.
pub fn preset_catalog() -> Vec<PromptPreset> {
    BUILTIN_PRESETS
        .iter()
        .map(|(id, name, desc, bg, edit)| builtin(id, name, desc, bg, edit))
        .collect()
}

/// Ids of the built-in presets.
pub fn preset_ids() -> Vec<&'static str> {
    BUILTIN_PRESETS.iter().map(|(id, ..)| *id).collect()
}

pub fn default_preset_id() -> &'static str {
    DEFAULT_PRESET_ID
}

/// Resolve the preset for a run.
///
/// Lookup order: custom presets from the config (exact name), then built-ins
/// (case-insensitive id), then the default preset.
pub fn resolve_preset(config: &BrandConfig) -> PromptPreset {
    let id = config.preset.as_str();

    if let Some(custom) = config.custom_presets.as_ref().and_then(|m| m.get(id)) {
        return PromptPreset {
            id: id.to_string(),
            name: id.to_string(),
            description: custom.description.clone(),
            background: custom.background.clone(),
            edit: custom.edit.clone(),
        };
    }

    BUILTIN_PRESETS
        .iter()
        .find(|(builtin_id, ..)| builtin_id.eq_ignore_ascii_case(id))
        .or_else(|| {
            BUILTIN_PRESETS
                .iter()
                .find(|(builtin_id, ..)| *builtin_id == DEFAULT_PRESET_ID)
        })
        .map(|(id, name, desc, bg, edit)| builtin(id, name, desc, bg, edit))
        .expect("default preset exists in the catalog")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{normalize_config, ConfigInput, CustomPreset};

    fn config_with_preset(preset: &str) -> BrandConfig {
        let input = ConfigInput {
            name: "Acme".to_string(),
            preset: Some(preset.to_string()),
            ..ConfigInput::default()
        };
        normalize_config(input).into_config("logo.png".into(), "out".into())
    }

    #[test]
    fn builtin_preset_resolves_case_insensitively() {
        let preset = resolve_preset(&config_with_preset("NOIR"));
        assert_eq!(preset.id, "noir");
        assert!(preset.background.contains("dark neutral palette"));
    }

    #[test]
    fn unknown_preset_falls_back_to_default() {
        let preset = resolve_preset(&config_with_preset("vaporwave"));
        assert_eq!(preset.id, DEFAULT_PRESET_ID);
    }

    #[test]
    fn custom_preset_shadows_builtins() {
        let mut cfg = config_with_preset("noir");
        cfg.custom_presets = Some(
            [(
                "noir".to_string(),
                CustomPreset {
                    description: "mine".to_string(),
                    background: "pitch black".to_string(),
                    edit: "harsh rim light".to_string(),
                },
            )]
            .into_iter()
            .collect(),
        );

        let preset = resolve_preset(&cfg);
        assert_eq!(preset.background, "pitch black");
        assert_eq!(preset.edit, "harsh rim light");
    }

    #[test]
    fn catalog_contains_default() {
        assert!(preset_ids().contains(&DEFAULT_PRESET_ID));
        assert_eq!(preset_catalog().len(), BUILTIN_PRESETS.len());
    }
}
