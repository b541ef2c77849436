//! Image size constants and aspect mapping for the remote image API.

use serde::{Deserialize, Serialize};

use crate::config::BackgroundAspect;

/// The sizes the remote image API accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ImageSize {
    /// 1536x1024 landscape.
    Landscape,
    /// 1024x1024 square.
    Square,
    /// 1024x1536 portrait.
    Portrait,
}

impl ImageSize {
    /// The `size` parameter value sent to the API.
    pub fn api_value(self) -> &'static str {
        match self {
            Self::Landscape => "1536x1024",
            Self::Square => "1024x1024",
            Self::Portrait => "1024x1536",
        }
    }

    /// Pixel dimensions as (width, height).
    pub fn dimensions(self) -> (u32, u32) {
        match self {
            Self::Landscape => (1536, 1024),
            Self::Square => (1024, 1024),
            Self::Portrait => (1024, 1536),
        }
    }
}

/// One hero size variant: the API size plus the output file stem.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeroSize {
    /// Size-variant label used in prompt-map keys and cache hashes.
    pub label: &'static str,
    pub size: ImageSize,
    /// Output file name without extension.
    pub file_stem: &'static str,
}

const HERO_SQUARE: HeroSize = HeroSize {
    label: "square",
    size: ImageSize::Square,
    file_stem: "hero-square",
};

const HERO_LANDSCAPE: HeroSize = HeroSize {
    label: "landscape",
    size: ImageSize::Landscape,
    file_stem: "hero-landscape",
};

const HERO_PORTRAIT: HeroSize = HeroSize {
    label: "portrait",
    size: ImageSize::Portrait,
    file_stem: "hero-portrait",
};

/// The API size used for background generation under the given aspect.
pub fn background_size(aspect: BackgroundAspect) -> ImageSize {
    match aspect {
        BackgroundAspect::Landscape => ImageSize::Landscape,
        BackgroundAspect::Square => ImageSize::Square,
        BackgroundAspect::Portrait => ImageSize::Portrait,
    }
}

/// Hero size variants for the given aspect: square always, plus the
/// configured aspect when it is not itself square.
pub fn hero_sizes(aspect: BackgroundAspect) -> Vec<HeroSize> {
    match aspect {
        BackgroundAspect::Square => vec![HERO_SQUARE],
        BackgroundAspect::Landscape => vec![HERO_SQUARE, HERO_LANDSCAPE],
        BackgroundAspect::Portrait => vec![HERO_SQUARE, HERO_PORTRAIT],
    }
}
