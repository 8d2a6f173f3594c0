//! Configuration constants.
//!
//! This module defines the fixed operational parameters: timeouts, the
//! browser launch profile, the session header profile, readiness anchors and
//! the export delimiters.

use std::time::Duration;

// Per-target timeouts
/// Hard ceiling for a page load (load + DOMContentLoaded + network idle).
pub const NAVIGATION_TIMEOUT_MS: u64 = 60_000;
/// Hard ceiling for the readiness anchors to appear after navigation.
pub const READINESS_TIMEOUT_MS: u64 = 20_000;
/// Interval between readiness anchor checks.
pub const READINESS_POLL_INTERVAL: Duration = Duration::from_millis(250);

// Settle delay between readiness and extraction
/// Shortest pause before extraction.
pub const SETTLE_DELAY_MIN_MS: u64 = 500;
/// Longest pause before extraction.
pub const SETTLE_DELAY_MAX_MS: u64 = 1500;

/// Prefix prepended to bare product identifiers.
pub const DEFAULT_BASE_URL: &str = "https://www.amazon.com/dp/";

/// DOM anchors whose presence means the product layout has rendered.
pub const READINESS_SELECTORS: &[&str] = &["#productTitle", "#altImages"];

/// Maximum URL length (2048 characters), matching common browser and server limits.
pub const MAX_URL_LENGTH: usize = 2048;

/// Maximum failure message length in characters.
/// Longer messages are truncated with a note about the original length.
pub const MAX_ERROR_MESSAGE_LENGTH: usize = 2000;

// Browser launch profile
/// Window width in CSS pixels.
pub const VIEWPORT_WIDTH: u32 = 1920;
/// Window height in CSS pixels.
pub const VIEWPORT_HEIGHT: u32 = 1080;

/// Chromium flags applied to every launch. Headless mode and `--no-sandbox`
/// are set through the launcher itself.
pub const BROWSER_LAUNCH_ARGS: &[&str] = &[
    "--disable-setuid-sandbox",
    "--disable-infobars",
    "--window-position=0,0",
    "--ignore-certificate-errors",
    "--ignore-certificate-errors-spki-list",
    "--disable-blink-features=AutomationControlled",
    "--disable-web-security",
    "--disable-features=IsolateOrigins,site-per-process",
    "--disable-site-isolation-trials",
    "--disable-extensions",
    "--disable-gpu",
    "--disable-dev-shm-usage",
    "--no-first-run",
    "--no-zygote",
    "--disable-accelerated-2d-canvas",
    "--disable-canvas-aa",
    "--disable-2d-canvas-clip-aa",
    "--disable-gl-drawing-for-tests",
];

/// User-Agent presented by every session, both as a header and as
/// `navigator.userAgent`.
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Extra request headers sent with every navigation.
pub const SESSION_HEADERS: &[(&str, &str)] = &[
    ("Accept-Language", "en-US,en;q=0.9"),
    (
        "Accept",
        "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8",
    ),
    ("User-Agent", DEFAULT_USER_AGENT),
    ("Cache-Control", "no-cache"),
    ("Pragma", "no-cache"),
];

/// Property overrides injected before any page script runs.
pub const SESSION_OVERRIDES_SCRIPT: &str = r#"
Object.defineProperty(navigator, 'webdriver', { get: () => undefined });
Object.defineProperty(navigator, 'languages', { get: () => ['en-US', 'en'] });
Object.defineProperty(navigator, 'plugins', { get: () => [1, 2, 3, 4, 5] });
"#;

// Image upgrade tokens
/// Size token found in gallery thumbnail URLs.
pub const LOW_RES_IMAGE_TOKEN: &str = "_US40_";
/// Size token that replaces it in exported image links.
pub const HIGH_RES_IMAGE_TOKEN: &str = "_US1500_";

// Export flattening
/// Joins image links in a single table cell.
pub const IMAGE_LINK_DELIMITER: &str = ",";
/// Joins banned words in a single table cell. Distinct from the comma used by
/// the banned-word input so the exported cell cannot be mistaken for it.
pub const BANNED_WORD_DELIMITER: &str = " · ";
