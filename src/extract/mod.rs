//! Extraction rules: rendered page snapshot in, `ProductRecord` out.
//!
//! Every rule is a pure function over the parsed document. Rules never fail:
//! missing or malformed markup yields the absent value for that field only,
//! so one broken block never affects another field.
//!
//! The parsed `Html` is not `Send`, so it lives only inside the synchronous
//! [`extract_record`] call and is never held across an await point.

mod banned;
mod listing;
mod media;
mod pricing;
mod sections;
mod selectors;
mod text;

use chrono::{DateTime, Utc};
use scraper::Html;
use url::Url;

use crate::models::ProductRecord;
use crate::utils::parse_selector_with_fallback;

pub use banned::BannedWords;
pub use listing::{extract_rating, extract_review_count, extract_title, is_featured_choice};
pub use media::{extract_image_links, extract_video_url, upgrade_image_link};
pub use pricing::{extract_coupon, extract_pricing, Coupon, Pricing};
pub use sections::{
    has_brand_section, has_confirmed_fit, has_more_options_section, has_rich_media_video,
};
pub use text::{
    first_grouped_integer, first_percent, parse_leading_decimal, parse_stripped_decimal,
    visible_text,
};

/// What a page session hands to the extraction rules.
#[derive(Debug, Clone, Default)]
pub struct PageSnapshot {
    /// Serialized live DOM
    pub html: String,
    /// Text as rendered by the browser, when the engine provides it
    pub visible_text: Option<String>,
}

impl PageSnapshot {
    /// A snapshot without browser-rendered text; extraction falls back to the DOM text.
    pub fn from_html(html: impl Into<String>) -> Self {
        Self {
            html: html.into(),
            visible_text: None,
        }
    }
}

/// Runs every extraction rule over the snapshot.
pub fn extract_record(
    snapshot: &PageSnapshot,
    banned_words: &BannedWords,
    source_url: &str,
    captured_at: DateTime<Utc>,
) -> ProductRecord {
    let document = Html::parse_document(&snapshot.html);
    let base = Url::parse(source_url).ok();

    let pricing = extract_pricing(&document);
    let coupon = extract_coupon(&document);

    let banned_words_found = if banned_words.is_empty() {
        Default::default()
    } else {
        match &snapshot.visible_text {
            Some(text) => banned_words.find_in(text),
            None => banned_words.find_in(&visible_text(&document)),
        }
    };

    let record = ProductRecord {
        title: extract_title(&document),
        image_links: extract_image_links(&document, base.as_ref()),
        video_url: extract_video_url(&document, base.as_ref()),
        rating: extract_rating(&document),
        review_count: extract_review_count(&document),
        is_featured_choice: is_featured_choice(&document),
        original_price: pricing.original_price,
        discount_percent: pricing.discount_percent,
        final_price: pricing.final_price,
        has_coupon: coupon.present,
        coupon_percent: coupon.percent,
        has_confirmed_fit: has_confirmed_fit(&document),
        has_brand_section: has_brand_section(&document),
        has_rich_media_video: has_rich_media_video(&document),
        has_more_options_section: has_more_options_section(&document),
        banned_words_found,
        captured_at,
        source_url: source_url.to_string(),
    };

    log::debug!(
        "Extracted {}: title={}, images={}, final_price={:?}",
        source_url,
        record.title.is_some(),
        record.image_links.len(),
        record.final_price
    );
    record
}

/// Readiness anchors the HTML does not contain yet, in the order given.
pub fn missing_anchors(html: &str, anchors: &[&str]) -> Vec<String> {
    let document = Html::parse_document(html);
    anchors
        .iter()
        .filter(|anchor| {
            let selector = parse_selector_with_fallback(anchor, "readiness anchors");
            document.select(&selector).next().is_none()
        })
        .map(|anchor| anchor.to_string())
        .collect()
}
