//! Listing header fields: title, rating, review count, featured badge.

use scraper::Html;

use super::selectors::{FEATURED_BADGE, RATING, REVIEW_COUNT, TITLE};
use super::text::{element_text, first_grouped_integer, non_empty_text, parse_leading_decimal};

/// Trimmed product title; blank or missing titles are absent.
pub fn extract_title(document: &Html) -> Option<String> {
    document.select(&TITLE).next().and_then(non_empty_text)
}

/// Star rating, read from the leading number of the rating label.
pub fn extract_rating(document: &Html) -> Option<f64> {
    let element = document.select(&RATING).next()?;
    let rating = parse_leading_decimal(&element_text(element));
    if rating.is_none() {
        log::debug!("Rating label present but not numeric");
    }
    rating
}

/// Number of customer reviews, e.g. `"12,345 ratings"` gives `12345`.
pub fn extract_review_count(document: &Html) -> Option<u64> {
    let element = document.select(&REVIEW_COUNT).next()?;
    first_grouped_integer(element_text(element).trim())
}

/// Whether the featured-choice badge is shown.
pub fn is_featured_choice(document: &Html) -> bool {
    document.select(&FEATURED_BADGE).next().is_some()
}
