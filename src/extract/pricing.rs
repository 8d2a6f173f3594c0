//! Price decomposition and coupon detection.

use scraper::{ElementRef, Html};

use super::selectors::{
    COUPON_LABEL, DISCOUNT, LIST_PRICE, PRICE_BLOCK, PRICE_FRACTION, PRICE_TO_PAY, PRICE_WHOLE,
};
use super::text::{element_text, first_percent, non_empty_text, parse_stripped_decimal};

/// Prices read from the core price block.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Pricing {
    /// List price before discount
    pub original_price: Option<f64>,
    /// Discount as shown, without the sign
    pub discount_percent: Option<f64>,
    /// Price to pay
    pub final_price: Option<f64>,
}

/// Coupon label next to the price.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Coupon {
    /// Whether a coupon label is shown
    pub present: bool,
    /// Percentage off, when the label states one
    pub percent: Option<u32>,
}

/// Reads list price, discount and final price from the core price block.
///
/// When the page shows no discount (missing or zero) but does show a final
/// price, the discount becomes `0` and the list price is the final price.
pub fn extract_pricing(document: &Html) -> Pricing {
    let Some(block) = document.select(&PRICE_BLOCK).next() else {
        return Pricing::default();
    };

    let mut pricing = Pricing {
        original_price: first_in(block, &LIST_PRICE).and_then(|t| parse_stripped_decimal(&t)),
        discount_percent: first_in(block, &DISCOUNT).and_then(|t| parse_stripped_decimal(&t)),
        final_price: extract_final_price(block),
    };

    let no_discount = pricing.discount_percent.map_or(true, |d| d == 0.0);
    if let Some(final_price) = pricing.final_price.filter(|p| no_discount && *p > 0.0) {
        pricing.discount_percent = Some(0.0);
        pricing.original_price = Some(final_price);
    }
    pricing
}

/// Whole and fraction parts of the price to pay, e.g. `"1,299."` + `"99"`.
fn extract_final_price(block: ElementRef<'_>) -> Option<f64> {
    let to_pay = block.select(&PRICE_TO_PAY).next()?;
    let whole = digits(&first_in(to_pay, &PRICE_WHOLE).unwrap_or_default());
    if whole.is_empty() {
        return None;
    }
    let fraction = digits(&first_in(to_pay, &PRICE_FRACTION).unwrap_or_default());
    let joined = if fraction.is_empty() {
        whole
    } else {
        format!("{whole}.{fraction}")
    };
    joined.parse().ok()
}

/// Coupon presence and its percentage, independent of the price block.
pub fn extract_coupon(document: &Html) -> Coupon {
    match document.select(&COUPON_LABEL).find_map(non_empty_text) {
        Some(label) => Coupon {
            present: true,
            percent: first_percent(&label),
        },
        None => Coupon::default(),
    }
}

fn first_in(scope: ElementRef<'_>, selector: &scraper::Selector) -> Option<String> {
    scope.select(selector).next().map(element_text)
}

fn digits(text: &str) -> String {
    text.chars().filter(char::is_ascii_digit).collect()
}
