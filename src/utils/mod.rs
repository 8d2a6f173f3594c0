//! Shared helpers.
//!
//! This module provides:
//! - Failure message sanitization and truncation
//! - CSS selector and regex compilation for static patterns

pub mod sanitize;
mod selector;

pub use sanitize::sanitize_and_truncate_error_message;
pub use selector::{compile_regex_unsafe, parse_selector_unsafe, parse_selector_with_fallback};
