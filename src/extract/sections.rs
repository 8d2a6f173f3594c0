//! Presence flags for optional page sections.

use scraper::Html;

use super::selectors::{CONFIRMED_FIT, MORE_OPTIONS_HEADING, RICH_MEDIA_VIDEO, SECTION_HEADING};
use super::text::element_text;

const BRAND_HEADING: &str = "From the brand";
const MORE_OPTIONS_TEXT: &str = "More Options to Consider";

/// Vehicle fit confirmation banner.
pub fn has_confirmed_fit(document: &Html) -> bool {
    document.select(&CONFIRMED_FIT).next().is_some()
}

/// Any `h2` reading exactly "From the brand" once trimmed.
pub fn has_brand_section(document: &Html) -> bool {
    document
        .select(&SECTION_HEADING)
        .any(|h2| element_text(h2).trim() == BRAND_HEADING)
}

/// A+ content video player (`aplus-*-container-element_html5_api`).
pub fn has_rich_media_video(document: &Html) -> bool {
    document.select(&RICH_MEDIA_VIDEO).next().is_some()
}

/// Any `h3` reading exactly "More Options to Consider" once trimmed.
pub fn has_more_options_section(document: &Html) -> bool {
    document
        .select(&MORE_OPTIONS_HEADING)
        .any(|h3| element_text(h3).trim() == MORE_OPTIONS_TEXT)
}
