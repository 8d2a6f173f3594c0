use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Structured data extracted from one product page.
///
/// Every flag and optional field is derived independently: one missing block
/// of markup never affects another field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductRecord {
    /// Product title, trimmed
    pub title: Option<String>,
    /// Gallery images, upgraded to the high-resolution variant
    pub image_links: Vec<String>,
    /// Main video in the image gallery
    pub video_url: Option<String>,
    /// Average star rating
    pub rating: Option<f64>,
    /// Number of customer ratings
    pub review_count: Option<u64>,
    /// Featured-choice badge shown
    pub is_featured_choice: bool,
    /// List price; equals `final_price` when there is no discount
    pub original_price: Option<f64>,
    /// Zero when the page shows no discount but has a final price
    pub discount_percent: Option<f64>,
    /// Price to pay
    pub final_price: Option<f64>,
    /// A coupon label is shown next to the price
    pub has_coupon: bool,
    /// Percentage off stated by the coupon
    pub coupon_percent: Option<u32>,
    /// Vehicle fit confirmation banner shown
    pub has_confirmed_fit: bool,
    /// "From the brand" section present
    pub has_brand_section: bool,
    /// A+ content video present
    pub has_rich_media_video: bool,
    /// "More Options to Consider" section present
    pub has_more_options_section: bool,
    /// Banned words found in the visible text, sorted
    pub banned_words_found: BTreeSet<String>,
    /// When the snapshot was taken
    pub captured_at: DateTime<Utc>,
    /// Completed URL that was loaded
    pub source_url: String,
}

impl ProductRecord {
    /// A record with every field absent.
    pub fn empty(source_url: impl Into<String>, captured_at: DateTime<Utc>) -> Self {
        Self {
            title: None,
            image_links: Vec::new(),
            video_url: None,
            rating: None,
            review_count: None,
            is_featured_choice: false,
            original_price: None,
            discount_percent: None,
            final_price: None,
            has_coupon: false,
            coupon_percent: None,
            has_confirmed_fit: false,
            has_brand_section: false,
            has_rich_media_video: false,
            has_more_options_section: false,
            banned_words_found: BTreeSet::new(),
            captured_at,
            source_url: source_url.into(),
        }
    }
}

/// One input identifier, completed against the base prefix.
///
/// A raw string that already starts with the base is kept as is; anything
/// else gets the base prepended, including URLs on other hosts. An empty base
/// disables completion.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Target(String);

impl Target {
    /// Trims `raw` and completes it against `base`.
    pub fn new(raw: &str, base: &str) -> Self {
        let raw = raw.trim();
        if base.is_empty() || raw.starts_with(base) {
            return Target(raw.to_string());
        }
        Target(format!("{base}{raw}"))
    }

    /// The completed URL.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the target, yielding the completed URL.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl std::fmt::Display for Target {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
