//! Gallery images and the gallery video thumbnail.

use scraper::Html;
use url::Url;

use super::selectors::{GALLERY_IMAGES, GALLERY_VIDEO};
use crate::config::{HIGH_RES_IMAGE_TOKEN, LOW_RES_IMAGE_TOKEN};

/// Gallery image links, rewritten to the high-resolution variant.
///
/// Images without a usable `src` are dropped. Relative sources are resolved
/// against `base` when it parses.
pub fn extract_image_links(document: &Html, base: Option<&Url>) -> Vec<String> {
    document
        .select(&GALLERY_IMAGES)
        .filter_map(|img| img.value().attr("src"))
        .filter_map(|src| resolve_src(src, base))
        .map(|src| upgrade_image_link(&src))
        .collect()
}

/// Source of the gallery's video thumbnail.
pub fn extract_video_url(document: &Html, base: Option<&Url>) -> Option<String> {
    document
        .select(&GALLERY_VIDEO)
        .filter_map(|img| img.value().attr("src"))
        .find_map(|src| resolve_src(src, base))
}

/// Swaps the thumbnail size token for the high-resolution one.
pub fn upgrade_image_link(src: &str) -> String {
    src.replace(LOW_RES_IMAGE_TOKEN, HIGH_RES_IMAGE_TOKEN)
}

fn resolve_src(src: &str, base: Option<&Url>) -> Option<String> {
    let src = src.trim();
    if src.is_empty() {
        return None;
    }
    match base.and_then(|b| b.join(src).ok()) {
        Some(resolved) => Some(resolved.to_string()),
        None => Some(src.to_string()),
    }
}
