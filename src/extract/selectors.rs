//! CSS selectors for the product page layout.

use scraper::Selector;
use std::sync::LazyLock;

use crate::utils::parse_selector_unsafe;

macro_rules! selector {
    ($name:ident, $css:expr) => {
        pub(super) static $name: LazyLock<Selector> =
            LazyLock::new(|| parse_selector_unsafe($css, stringify!($name)));
    };
}

selector!(BODY, "body");

// Listing header
selector!(TITLE, "#productTitle");
selector!(RATING, "#acrPopover .a-size-base.a-color-base");
selector!(REVIEW_COUNT, "#acrCustomerReviewText");
selector!(FEATURED_BADGE, "#acBadge_feature_div .ac-badge-wrapper");

// Gallery
selector!(GALLERY_IMAGES, "#altImages .imageThumbnail img");
selector!(GALLERY_VIDEO, "#altImages .videoThumbnail img");

// Price block
selector!(PRICE_BLOCK, "#corePriceDisplay_desktop_feature_div");
selector!(LIST_PRICE, r#".a-text-price[data-a-strike="true"] .a-offscreen"#);
selector!(DISCOUNT, ".savingPriceOverride");
selector!(PRICE_TO_PAY, ".priceToPay");
selector!(PRICE_WHOLE, ".a-price-whole");
selector!(PRICE_FRACTION, ".a-price-fraction");

// Coupon
selector!(COUPON_LABEL, "#promoPriceBlockMessage_feature_div .couponLabelText");

// Page sections
selector!(CONFIRMED_FIT, "#automotive-pf-primary-view-confirmed-fit-icon");
selector!(SECTION_HEADING, "h2");
selector!(
    RICH_MEDIA_VIDEO,
    r#"[id^="aplus-"][id$="-container-element_html5_api"]"#
);
selector!(MORE_OPTIONS_HEADING, "h3.a-text-center.aplus-h1.a-text-bold");
