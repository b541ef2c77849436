//! Built-in background style catalog.

use crate::config::BrandConfig;

/// Built-in style name -> prompt description.
const STYLE_TEMPLATES: &[(&str, &str)] = &[
    (
        "minimal",
        "ultra minimal, large clean planes, razor-smooth gradients, architectural lighting, museum-grade, abstract",
    ),
    (
        "neon",
        "intense neon glow, saturated spectrum accents, cyberpunk energy, electric haze, deep contrast, abstract",
    ),
    (
        "clay",
        "hyper polished claymorphism, bold pill forms, studio key light, deep soft shadows, premium 3D, tactile depth",
    ),
    (
        "blueprint",
        "high contrast blueprint style, razor grid lines, technical overlays, precision geometry, monochrome",
    ),
];

/// Names of the built-in styles, in catalog order.
pub fn default_styles() -> Vec<String> {
    STYLE_TEMPLATES.iter().map(|(name, _)| name.to_string()).collect()
}

/// The full built-in catalog as (name, description) pairs.
pub fn style_catalog() -> &'static [(&'static str, &'static str)] {
    STYLE_TEMPLATES
}

/// Resolve the style description for `style`.
///
/// Custom styles from the config take precedence over built-ins; an unknown
/// style falls back to the first built-in (`minimal`) rather than failing,
/// matching how an unrecognized preset degrades.
pub fn resolve_style_description<'a>(style: &str, config: &'a BrandConfig) -> &'a str {
    if let Some(custom) = config.custom_styles.as_ref().and_then(|m| m.get(style)) {
        return custom;
    }
    STYLE_TEMPLATES
        .iter()
        .find(|(name, _)| *name == style)
        .or_else(|| STYLE_TEMPLATES.first())
        .map(|(_, desc)| *desc)
        .expect("style catalog is non-empty")
}
