//! Local raster operations: decode, resize, composite, encode, write.
//!
//! Everything here is synchronous CPU work on in-memory buffers; only the
//! final file write awaits. Encoding honors the run's output format and
//! compression quality (`jpeg` and `webp` are lossy/lossless respectively;
//! `png` ignores the quality knob).

use std::path::{Path, PathBuf};

use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::codecs::webp::WebPEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, Rgba, RgbaImage};

use brandforge_core::config::OutputFormat;

use crate::error::PipelineError;

/// Decode image bytes in any supported container format.
pub fn decode(bytes: &[u8]) -> Result<DynamicImage, PipelineError> {
    image::load_from_memory(bytes).map_err(|e| PipelineError::Raster(e.to_string()))
}

/// Encode an image in the run's output format.
pub fn encode(
    img: &DynamicImage,
    format: OutputFormat,
    compression: u8,
) -> Result<Vec<u8>, PipelineError> {
    let mut buf = Vec::new();
    let result = match format {
        OutputFormat::Png => img.write_with_encoder(PngEncoder::new(&mut buf)),
        OutputFormat::Jpeg => {
            // JPEG carries no alpha channel.
            let rgb = DynamicImage::ImageRgb8(img.to_rgb8());
            rgb.write_with_encoder(JpegEncoder::new_with_quality(&mut buf, compression))
        }
        OutputFormat::Webp => img.write_with_encoder(WebPEncoder::new_lossless(&mut buf)),
    };
    result.map_err(|e| PipelineError::Raster(e.to_string()))?;
    Ok(buf)
}

/// Encode as PNG regardless of the run format (the edit API expects PNG).
pub fn encode_png(img: &DynamicImage) -> Result<Vec<u8>, PipelineError> {
    let mut buf = Vec::new();
    img.write_with_encoder(PngEncoder::new(&mut buf))
        .map_err(|e| PipelineError::Raster(e.to_string()))?;
    Ok(buf)
}

/// Write an image to `stem` with the extension appended for `format`,
/// creating parent directories as needed. Returns the final path.
pub async fn write_image(
    img: &DynamicImage,
    stem: &Path,
    format: OutputFormat,
    compression: u8,
) -> Result<PathBuf, PipelineError> {
    let path = stem.with_extension(format.extension());
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }
    let bytes = encode(img, format, compression)?;
    tokio::fs::write(&path, bytes).await?;
    Ok(path)
}

/// Decode raw bytes (e.g. a remote API payload) and write them out in the
/// run's format. Returns the final path.
pub async fn write_bytes_as(
    bytes: &[u8],
    stem: &Path,
    format: OutputFormat,
    compression: u8,
) -> Result<PathBuf, PipelineError> {
    let img = decode(bytes)?;
    write_image(&img, stem, format, compression).await
}

/// Fit an image into a `size`x`size` square, padding with transparency
/// (or white when the output format has no alpha channel).
pub fn contain_square(img: &DynamicImage, size: u32, format: OutputFormat) -> DynamicImage {
    let resized = img.resize(size, size, FilterType::Lanczos3);
    let pad = match format {
        OutputFormat::Jpeg => Rgba([255, 255, 255, 255]),
        _ => Rgba([0, 0, 0, 0]),
    };
    let mut canvas = RgbaImage::from_pixel(size, size, pad);
    let x = i64::from((size - resized.width()) / 2);
    let y = i64::from((size - resized.height()) / 2);
    image::imageops::overlay(&mut canvas, &resized.to_rgba8(), x, y);
    DynamicImage::ImageRgba8(canvas)
}

/// Resize to exactly (w, h), cropping overflow from the center.
pub fn cover(img: &DynamicImage, width: u32, height: u32) -> DynamicImage {
    img.resize_to_fill(width, height, FilterType::Lanczos3)
}

/// Largest fraction of the canvas the composited logo may occupy.
const LOGO_MAX_FRACTION: f64 = 0.4;

/// Composite the logo centered over the background at the target size.
///
/// The background is cover-cropped to the target; the logo is scaled down
/// (never up) so it fits within 40% of the canvas in both dimensions.
pub fn compose_logo_over(
    background: &DynamicImage,
    logo: &DynamicImage,
    (width, height): (u32, u32),
) -> DynamicImage {
    let mut canvas = cover(background, width, height).to_rgba8();

    let box_w = (f64::from(width) * LOGO_MAX_FRACTION).round();
    let box_h = (f64::from(height) * LOGO_MAX_FRACTION).round();
    let scale = (box_w / f64::from(logo.width()))
        .min(box_h / f64::from(logo.height()))
        .min(1.0);
    let logo_w = ((f64::from(logo.width()) * scale).round() as u32).max(1);
    let logo_h = ((f64::from(logo.height()) * scale).round() as u32).max(1);
    let scaled = logo.resize_exact(logo_w, logo_h, FilterType::Lanczos3);

    let x = i64::from((width - logo_w) / 2);
    let y = i64::from((height - logo_h) / 2);
    image::imageops::overlay(&mut canvas, &scaled.to_rgba8(), x, y);
    DynamicImage::ImageRgba8(canvas)
}

/// Parse a `#RRGGBB` (or `RRGGBB`) hex color.
pub fn parse_hex_color(s: &str) -> Option<[u8; 3]> {
    let hex = s.trim().trim_start_matches('#');
    if hex.len() != 6 {
        return None;
    }
    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
    Some([r, g, b])
}

/// Vertical two-color gradient, used for demo placeholder backgrounds.
pub fn gradient(width: u32, height: u32, top: [u8; 3], bottom: [u8; 3]) -> DynamicImage {
    let mut img = RgbaImage::new(width, height);
    for y in 0..height {
        let t = if height > 1 {
            f64::from(y) / f64::from(height - 1)
        } else {
            0.0
        };
        let mix = |a: u8, b: u8| (f64::from(a) + (f64::from(b) - f64::from(a)) * t) as u8;
        let pixel = Rgba([mix(top[0], bottom[0]), mix(top[1], bottom[1]), mix(top[2], bottom[2]), 255]);
        for x in 0..width {
            img.put_pixel(x, y, pixel);
        }
    }
    DynamicImage::ImageRgba8(img)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn checkerboard(w: u32, h: u32) -> DynamicImage {
        let img = RgbaImage::from_fn(w, h, |x, y| {
            if (x + y) % 2 == 0 {
                Rgba([255, 255, 255, 255])
            } else {
                Rgba([0, 0, 0, 255])
            }
        });
        DynamicImage::ImageRgba8(img)
    }

    #[test]
    fn encode_decode_round_trip_png() {
        let img = checkerboard(8, 8);
        let bytes = encode(&img, OutputFormat::Png, 85).unwrap();
        let back = decode(&bytes).unwrap();
        assert_eq!((back.width(), back.height()), (8, 8));
    }

    #[test]
    fn jpeg_encoding_drops_alpha_without_error() {
        let img = checkerboard(8, 8);
        let bytes = encode(&img, OutputFormat::Jpeg, 70).unwrap();
        assert!(!bytes.is_empty());
    }

    #[test]
    fn contain_square_produces_exact_dimensions() {
        let img = checkerboard(64, 32);
        let out = contain_square(&img, 16, OutputFormat::Png);
        assert_eq!((out.width(), out.height()), (16, 16));
    }

    #[test]
    fn cover_produces_exact_dimensions() {
        let img = checkerboard(64, 64);
        let out = cover(&img, 30, 10);
        assert_eq!((out.width(), out.height()), (30, 10));
    }

    #[test]
    fn compose_keeps_canvas_size() {
        let bg = checkerboard(64, 64);
        let logo = checkerboard(16, 16);
        let out = compose_logo_over(&bg, &logo, (48, 32));
        assert_eq!((out.width(), out.height()), (48, 32));
    }

    #[test]
    fn hex_color_parsing() {
        assert_eq!(parse_hex_color("#ff8000"), Some([255, 128, 0]));
        assert_eq!(parse_hex_color("00ff00"), Some([0, 255, 0]));
        assert_eq!(parse_hex_color("#fff"), None);
        assert_eq!(parse_hex_color("zzzzzz"), None);
    }

    #[test]
    fn gradient_interpolates_top_to_bottom() {
        let img = gradient(2, 3, [0, 0, 0], [200, 100, 50]).to_rgba8();
        assert_eq!(img.get_pixel(0, 0).0[0], 0);
        assert_eq!(img.get_pixel(0, 2).0[0], 200);
    }
}
