//! Prompt construction for background generation and hero composition.
//!
//! Both builders are pure functions of the config. The edit prompt is shared
//! across every style/variant of a run (it encodes tagline and preset, not
//! style), which is what makes one hash input per (style, variant, size)
//! sufficient for caching.

use crate::config::BrandConfig;
use crate::preset::resolve_preset;
use crate::style::resolve_style_description;

/// Build the text-to-image prompt for one background style.
pub fn build_background_prompt(style: &str, colors: &[String], config: &BrandConfig) -> String {
    let preset = resolve_preset(config);
    let style_desc = resolve_style_description(style, config);

    let mut lines = vec![
        "Create an abstract background for a premium brand hero.".to_string(),
        "Intended use: logo placement background for a launch asset.".to_string(),
        format!("Style: {style_desc}."),
        format!("Mood: {}.", preset.background),
    ];
    if !colors.is_empty() {
        lines.push(format!("Primary colors: {}.", colors.join(", ")));
    }
    lines.extend([
        "Scene: background only, no objects.".to_string(),
        "Medium: high-end digital gradient design.".to_string(),
        "Composition: asymmetrical, heavy negative space, safe zone center-left (~40% width)."
            .to_string(),
        "Details: smooth gradients, clean surfaces, refined lighting, premium finish.".to_string(),
        "Constraints: no text, letters, logos, icons, watermarks, UI, or people.".to_string(),
        "Output: high resolution, print-ready, no banding or artifacts.".to_string(),
    ]);
    lines.join("\n")
}

/// Build the image-edit prompt used for every hero composition of a run.
pub fn build_edit_prompt(config: &BrandConfig) -> String {
    let preset = resolve_preset(config);

    let tagline_part = match &config.tagline {
        Some(tagline) => format!(
            "Text: add the tagline exactly as provided below the logo. Tagline: \"{tagline}\". \
             Use a clean sans-serif font, high legibility, subtle weight, no effects, \
             single line if possible."
        ),
        None => "Text: do not add any text.".to_string(),
    };

    [
        "Edit the image to create a premium brand hero.".to_string(),
        "Change only: logo placement, separation, and optional tagline. Keep everything else the same."
            .to_string(),
        "Subject: the provided logo only.".to_string(),
        "Logo: keep EXACTLY unchanged (shape, colors, proportions, edges).".to_string(),
        "Placement: centered with generous margins; do not crop.".to_string(),
        "Background: preserve the provided background; do not alter its color, texture, or layout."
            .to_string(),
        "Separation: add a refined glow or soft shadow behind the logo.".to_string(),
        format!("Look: {}.", preset.edit),
        tagline_part,
        "Constraints: no extra symbols, no extra text besides the tagline, no new elements."
            .to_string(),
        "Finish: ultra clean, premium, professional brand hero image.".to_string(),
    ]
    .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{normalize_config, ConfigInput, StringList};

    fn config(tagline: Option<&str>, colors: &[&str]) -> BrandConfig {
        let input = ConfigInput {
            name: "Acme".to_string(),
            tagline: tagline.map(str::to_string),
            colors: Some(StringList::List(
                colors.iter().map(|c| c.to_string()).collect(),
            )),
            ..ConfigInput::default()
        };
        normalize_config(input).into_config("logo.png".into(), "out".into())
    }

    #[test]
    fn background_prompt_includes_style_and_colors() {
        let cfg = config(None, &["#ff0000", "#00ff00"]);
        let prompt = build_background_prompt("neon", &cfg.colors, &cfg);

        assert!(prompt.contains("neon glow"));
        assert!(prompt.contains("Primary colors: #ff0000, #00ff00."));
        assert!(prompt.contains("no text, letters, logos"));
    }

    #[test]
    fn background_prompt_omits_color_line_when_empty() {
        let cfg = config(None, &[]);
        let prompt = build_background_prompt("minimal", &cfg.colors, &cfg);
        assert!(!prompt.contains("Primary colors"));
    }

    #[test]
    fn edit_prompt_with_tagline() {
        let cfg = config(Some("Ship faster"), &[]);
        let prompt = build_edit_prompt(&cfg);
        assert!(prompt.contains("Tagline: \"Ship faster\""));
    }

    #[test]
    fn edit_prompt_without_tagline_forbids_text() {
        let cfg = config(None, &[]);
        let prompt = build_edit_prompt(&cfg);
        assert!(prompt.contains("Text: do not add any text."));
    }

    #[test]
    fn prompts_are_deterministic() {
        let cfg = config(Some("Ship faster"), &["#123456"]);
        assert_eq!(
            build_background_prompt("clay", &cfg.colors, &cfg),
            build_background_prompt("clay", &cfg.colors, &cfg)
        );
        assert_eq!(build_edit_prompt(&cfg), build_edit_prompt(&cfg));
    }
}
