//! Demo mode: a complete kit from synthetic placeholder assets.
//!
//! No external calls and zero cost. Backgrounds are deterministic gradients
//! (brand colors when provided, otherwise colors derived from the style
//! name digest), heroes composite the real logo over those gradients, and
//! icons/social reuse the regular export stage. Prompt maps are populated
//! exactly as a live run would populate them, so a demo manifest doubles
//! as a prompt sheet.

use brandforge_core::hashing::sha256_hex;
use brandforge_core::prompt::{build_background_prompt, build_edit_prompt};
use brandforge_core::size::{background_size, hero_sizes};

use crate::error::PipelineError;
use crate::events::progress;
use crate::exports::{export_icons, export_social};
use crate::forge::PipelineContext;
use crate::manifest::Manifest;
use crate::raster;

/// Placeholder gradient colors for a style: the first two brand colors, or
/// two slices of the style-name digest when fewer are configured.
fn placeholder_colors(style: &str, brand_colors: &[String]) -> ([u8; 3], [u8; 3]) {
    let parsed: Vec<[u8; 3]> = brand_colors
        .iter()
        .filter_map(|c| raster::parse_hex_color(c))
        .take(2)
        .collect();
    if parsed.len() == 2 {
        return (parsed[0], parsed[1]);
    }

    let digest = sha256_hex(style.as_bytes());
    let byte = |i: usize| u8::from_str_radix(&digest[i * 2..i * 2 + 2], 16).unwrap_or(0);
    let derived_top = [byte(0), byte(1), byte(2)];
    let derived_bottom = [byte(3), byte(4), byte(5)];
    match parsed.first() {
        Some(&top) => (top, derived_bottom),
        None => (derived_top, derived_bottom),
    }
}

/// Synthesize the full placeholder kit into the manifest.
pub async fn generate_demo_kit(
    ctx: &PipelineContext,
    manifest: &mut Manifest,
) -> Result<(), PipelineError> {
    let config = &ctx.config;
    progress(
        &*ctx.sink,
        "Demo mode: synthesizing placeholder assets (no API calls)",
    );

    let logo_bytes = tokio::fs::read(&config.logo_path)
        .await
        .map_err(|e| PipelineError::Logo(format!("{}: {e}", config.logo_path.display())))?;
    let logo = raster::decode(&logo_bytes)?;

    let bg_dims = background_size(config.background_size).dimensions();
    let sizes = hero_sizes(config.background_size);
    let edit_prompt = build_edit_prompt(config);

    for style in &config.styles {
        let (top, bottom) = placeholder_colors(style, &config.colors);

        for variant in 0..config.n {
            let prompt = build_background_prompt(style, &config.colors, config);
            manifest
                .prompts
                .backgrounds
                .insert(format!("{style}-{variant}"), prompt);

            let variant_dir = ctx
                .out_dir
                .join("variants")
                .join(style)
                .join(variant.to_string());

            let background = raster::gradient(bg_dims.0, bg_dims.1, top, bottom);
            let bg_path = raster::write_image(
                &background,
                &variant_dir.join("background"),
                config.format,
                config.compression,
            )
            .await?;
            manifest.generated.backgrounds.push(bg_path);
            progress(
                &*ctx.sink,
                format!("Placeholder background {style}-{variant}"),
            );

            for hero in &sizes {
                manifest.prompts.edits.insert(
                    format!("{style}-{variant}-{}", hero.label),
                    edit_prompt.clone(),
                );

                let composite =
                    raster::compose_logo_over(&background, &logo, hero.size.dimensions());
                let hero_path = raster::write_image(
                    &composite,
                    &variant_dir.join(hero.file_stem),
                    config.format,
                    config.compression,
                )
                .await?;
                manifest.generated.heroes.push(hero_path);
                progress(
                    &*ctx.sink,
                    format!("Placeholder hero {style}-{variant}-{}", hero.label),
                );
            }
        }
    }

    if let Some(first_hero) = manifest.generated.heroes.first().cloned() {
        export_social(ctx, &first_hero, manifest).await?;
    }
    export_icons(ctx, manifest).await?;

    progress(&*ctx.sink, "Demo kit complete");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn brand_colors_win_when_two_are_given() {
        let colors = vec!["#ff0000".to_string(), "#0000ff".to_string()];
        let (top, bottom) = placeholder_colors("minimal", &colors);
        assert_eq!(top, [255, 0, 0]);
        assert_eq!(bottom, [0, 0, 255]);
    }

    #[test]
    fn derived_colors_are_deterministic_per_style() {
        let (a_top, a_bottom) = placeholder_colors("minimal", &[]);
        let (b_top, b_bottom) = placeholder_colors("minimal", &[]);
        assert_eq!((a_top, a_bottom), (b_top, b_bottom));

        let (c_top, _) = placeholder_colors("neon", &[]);
        assert_ne!(a_top, c_top);
    }

    #[test]
    fn single_brand_color_is_used_for_the_top() {
        let colors = vec!["#102030".to_string()];
        let (top, _) = placeholder_colors("minimal", &colors);
        assert_eq!(top, [16, 32, 48]);
    }
}
