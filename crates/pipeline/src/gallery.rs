//! Static HTML gallery for a completed run.
//!
//! One self-contained `gallery/index.html` grouping hero images by style
//! and variant, with icon and social sections when present. Pure string
//! templating; the only await is the final write.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use regex::Regex;

use crate::error::PipelineError;
use crate::manifest::Manifest;

/// Write the gallery page. Returns the path of the written file.
pub async fn write_gallery(out_dir: &Path, manifest: &Manifest) -> Result<PathBuf, PipelineError> {
    let gallery_dir = out_dir.join("gallery");
    tokio::fs::create_dir_all(&gallery_dir).await?;
    let gallery_path = gallery_dir.join("index.html");

    let html = render(out_dir, manifest);
    tokio::fs::write(&gallery_path, html).await?;
    tracing::info!(path = %gallery_path.display(), "Gallery written");
    Ok(gallery_path)
}

/// Path shown in the page, relative to the output directory (the gallery
/// lives one level below it).
fn relative(out_dir: &Path, path: &Path) -> String {
    let rel = path.strip_prefix(out_dir).unwrap_or(path);
    format!("../{}", rel.display())
}

fn render(out_dir: &Path, manifest: &Manifest) -> String {
    // Group heroes by "style-variant" from their directory layout.
    let variant_re =
        Regex::new(r"variants[/\\]([^/\\]+)[/\\](\d+)[/\\]").expect("valid hero path pattern");
    let mut groups: BTreeMap<(String, String), Vec<&PathBuf>> = BTreeMap::new();
    for hero in &manifest.generated.heroes {
        let text = hero.to_string_lossy();
        if let Some(caps) = variant_re.captures(&text) {
            groups
                .entry((caps[1].to_string(), caps[2].to_string()))
                .or_default()
                .push(hero);
        }
    }

    let mut style_sections = String::new();
    for style in &manifest.config.styles {
        let heroes: Vec<&&PathBuf> = groups
            .iter()
            .filter(|((s, _), _)| s == style)
            .flat_map(|(_, paths)| paths)
            .collect();
        if heroes.is_empty() {
            continue;
        }

        let variants: String = heroes
            .iter()
            .map(|hero| {
                let src = relative(out_dir, hero);
                let file = hero
                    .file_name()
                    .map(|f| f.to_string_lossy().to_string())
                    .unwrap_or_default();
                format!(
                    "        <figure class=\"variant\">\n          <img src=\"{src}\" alt=\"{style} {file}\">\n          <figcaption>{file} <a href=\"{src}\" download>Download</a></figcaption>\n        </figure>\n"
                )
            })
            .collect();

        style_sections.push_str(&format!(
            "      <section class=\"style-group\">\n        <h2>{style}</h2>\n{variants}      </section>\n"
        ));
    }

    let icon_section = image_grid(out_dir, "Icons", &manifest.generated.icons);
    let social_section = image_grid(out_dir, "Social Media Assets", &manifest.generated.social);

    let tagline_line = manifest
        .input
        .tagline
        .as_deref()
        .map(|t| format!("      <p class=\"meta\">{t}</p>\n"))
        .unwrap_or_default();

    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n  <meta charset=\"UTF-8\">\n  <meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n  <title>Brandkit Gallery - {name}</title>\n  <style>\n    * {{ margin: 0; padding: 0; box-sizing: border-box; }}\n    body {{ font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif; background: #f5f5f5; padding: 2rem; color: #333; }}\n    header {{ background: white; padding: 2rem; border-radius: 8px; margin-bottom: 2rem; box-shadow: 0 2px 4px rgba(0,0,0,0.1); }}\n    .meta {{ color: #666; font-size: 0.9rem; }}\n    section {{ background: white; border-radius: 8px; padding: 1.5rem; margin-bottom: 2rem; box-shadow: 0 2px 4px rgba(0,0,0,0.1); }}\n    h2 {{ margin-bottom: 1rem; text-transform: capitalize; }}\n    figure {{ margin-bottom: 1rem; }}\n    figure img {{ max-width: 100%; border: 1px solid #e0e0e0; border-radius: 4px; display: block; }}\n    figcaption {{ padding: 0.5rem 0; font-size: 0.85rem; color: #666; }}\n    .grid {{ display: grid; grid-template-columns: repeat(auto-fill, minmax(120px, 1fr)); gap: 1rem; }}\n    .grid img {{ width: 100%; }}\n    a {{ color: #0066cc; text-decoration: none; }}\n    a:hover {{ text-decoration: underline; }}\n  </style>\n</head>\n<body>\n  <header>\n    <h1>Brandkit Gallery</h1>\n    <p class=\"meta\">{name}</p>\n{tagline_line}  </header>\n  <main>\n{style_sections}{icon_section}{social_section}  </main>\n</body>\n</html>\n",
        name = manifest.input.name,
    )
}

fn image_grid(out_dir: &Path, title: &str, paths: &[PathBuf]) -> String {
    if paths.is_empty() {
        return String::new();
    }
    let items: String = paths
        .iter()
        .map(|p| {
            let src = relative(out_dir, p);
            let file = p
                .file_name()
                .map(|f| f.to_string_lossy().to_string())
                .unwrap_or_default();
            format!("        <figure><img src=\"{src}\" alt=\"{file}\"><figcaption>{file}</figcaption></figure>\n")
        })
        .collect();
    format!("      <section>\n        <h2>{title}</h2>\n        <div class=\"grid\">\n{items}        </div>\n      </section>\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use brandforge_core::config::{normalize_config, ConfigInput};

    fn manifest_with_assets(out_dir: &Path) -> Manifest {
        let cfg = normalize_config(ConfigInput {
            name: "Acme".to_string(),
            tagline: Some("Ship faster".to_string()),
            ..ConfigInput::default()
        })
        .into_config(out_dir.join("logo.png"), out_dir.to_path_buf());

        let mut m = Manifest::new(&cfg, out_dir);
        m.generated
            .heroes
            .push(out_dir.join("variants/minimal/0/hero-square.png"));
        m.generated
            .heroes
            .push(out_dir.join("variants/neon/1/hero-landscape.png"));
        m.generated.icons.push(out_dir.join("icons/favicon-32.png"));
        m
    }

    #[test]
    fn render_groups_heroes_by_style() {
        let out_dir = Path::new("/tmp/run");
        let html = render(out_dir, &manifest_with_assets(out_dir));

        assert!(html.contains("<h2>minimal</h2>"));
        assert!(html.contains("<h2>neon</h2>"));
        assert!(html.contains("../variants/minimal/0/hero-square.png"));
        assert!(html.contains("Ship faster"));
        assert!(html.contains("favicon-32.png"));
    }

    #[test]
    fn render_skips_styles_without_heroes() {
        let out_dir = Path::new("/tmp/run");
        let mut m = manifest_with_assets(out_dir);
        m.generated.heroes.clear();
        let html = render(out_dir, &m);

        assert!(!html.contains("<h2>minimal</h2>"));
    }

    #[tokio::test]
    async fn write_gallery_creates_index_html() {
        let dir = tempfile::tempdir().unwrap();
        let m = manifest_with_assets(dir.path());

        let path = write_gallery(dir.path(), &m).await.unwrap();
        assert!(path.ends_with("gallery/index.html"));
        let html = tokio::fs::read_to_string(&path).await.unwrap();
        assert!(html.contains("Brandkit Gallery"));
    }
}
