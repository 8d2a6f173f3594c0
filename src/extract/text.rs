//! Text helpers shared by the extraction rules.

use regex::Regex;
use scraper::{ElementRef, Html, Node};
use std::sync::LazyLock;

use super::selectors::BODY;
use crate::utils::compile_regex_unsafe;

static LEADING_DECIMAL_RE: LazyLock<Regex> = LazyLock::new(|| {
    compile_regex_unsafe(r"^[+-]?(?:\d+(?:\.\d*)?|\.\d+)", "LEADING_DECIMAL_RE")
});
static GROUPED_INTEGER_RE: LazyLock<Regex> =
    LazyLock::new(|| compile_regex_unsafe(r"\d+(?:,\d{3})*", "GROUPED_INTEGER_RE"));
static PERCENT_RE: LazyLock<Regex> =
    LazyLock::new(|| compile_regex_unsafe(r"(\d+)%", "PERCENT_RE"));

/// Elements whose text never reaches the rendered page.
const HIDDEN_ELEMENTS: &[&str] = &["script", "style", "noscript", "template", "head"];

/// Elements that start a new line in rendered text.
const BLOCK_ELEMENTS: &[&str] = &[
    "address", "article", "aside", "blockquote", "br", "dd", "div", "dl", "dt", "fieldset",
    "figcaption", "figure", "footer", "form", "h1", "h2", "h3", "h4", "h5", "h6", "header", "hr",
    "li", "main", "nav", "ol", "p", "pre", "section", "table", "td", "th", "tr", "ul",
];

/// Concatenated text of an element and its descendants.
pub(super) fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect()
}

/// Trimmed text of an element, `None` when blank.
pub(super) fn non_empty_text(element: ElementRef<'_>) -> Option<String> {
    let text = element_text(element);
    let trimmed = text.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Parses the longest decimal prefix, ignoring leading whitespace.
///
/// `"4.5 out of 5 stars"` gives `4.5`; text with no leading number gives `None`.
pub fn parse_leading_decimal(text: &str) -> Option<f64> {
    LEADING_DECIMAL_RE
        .find(text.trim_start())
        .and_then(|m| m.as_str().parse::<f64>().ok())
}

/// Reads a price or percentage by dropping everything but digits and dots.
///
/// `"$1,299.99"` gives `1299.99`, `"-25%"` gives `25.0`.
pub fn parse_stripped_decimal(text: &str) -> Option<f64> {
    let stripped: String = text
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    parse_leading_decimal(&stripped)
}

/// First integer in the text; comma thousands separators are accepted.
///
/// `"12,345 ratings"` gives `12345`.
pub fn first_grouped_integer(text: &str) -> Option<u64> {
    let found = GROUPED_INTEGER_RE.find(text)?;
    found.as_str().replace(',', "").parse().ok()
}

/// The integer in front of the first `%` sign.
pub fn first_percent(text: &str) -> Option<u32> {
    PERCENT_RE
        .captures(text)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

/// Approximates the rendered text of the document body.
///
/// Text inside script, style, noscript and template elements is skipped, and
/// block elements start a new line so words from adjacent blocks do not run
/// together.
pub fn visible_text(document: &Html) -> String {
    let Some(body) = document.select(&BODY).next() else {
        return String::new();
    };

    let mut out = String::new();
    for node in body.descendants() {
        match node.value() {
            Node::Element(element) if BLOCK_ELEMENTS.contains(&element.name()) => {
                if !out.is_empty() && !out.ends_with('\n') {
                    out.push('\n');
                }
            }
            Node::Text(text) => {
                let hidden = node.ancestors().any(|ancestor| {
                    ancestor
                        .value()
                        .as_element()
                        .is_some_and(|e| HIDDEN_ELEMENTS.contains(&e.name()))
                });
                if !hidden {
                    out.push_str(text);
                }
            }
            _ => {}
        }
    }
    out
}
