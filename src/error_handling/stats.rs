//! Processing statistics tracking.
//!
//! This module provides thread-safe statistics tracking for errors, warnings,
//! and informational metrics during a batch.

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::atomic::{AtomicUsize, Ordering};
use strum::IntoEnumIterator;

use super::types::{ErrorType, InfoType, WarningType};
use crate::models::ProductRecord;

/// Thread-safe processing statistics tracker.
///
/// Tracks errors, warnings, and informational metrics using atomic counters.
/// All types are initialized to zero on creation.
///
/// # Categories
///
/// - **Errors**: Per-target failures
/// - **Warnings**: Key fields absent from a successful record
/// - **Info**: Notable flags on a successful record
pub struct ProcessingStats {
    errors: HashMap<ErrorType, AtomicUsize>,
    warnings: HashMap<WarningType, AtomicUsize>,
    info: HashMap<InfoType, AtomicUsize>,
}

fn zeroed<K: IntoEnumIterator + Eq + Hash>() -> HashMap<K, AtomicUsize> {
    K::iter().map(|k| (k, AtomicUsize::new(0))).collect()
}

fn bump<K: Eq + Hash + std::fmt::Debug>(map: &HashMap<K, AtomicUsize>, key: K) {
    match map.get(&key) {
        Some(counter) => {
            counter.fetch_add(1, Ordering::Relaxed);
        }
        None => log::error!(
            "Counter for {:?} is missing. This indicates a bug in ProcessingStats initialization.",
            key
        ),
    }
}

fn read<K: Eq + Hash>(map: &HashMap<K, AtomicUsize>, key: K) -> usize {
    map.get(&key).map(|c| c.load(Ordering::SeqCst)).unwrap_or(0)
}

impl Default for ProcessingStats {
    fn default() -> Self {
        Self::new()
    }
}

impl ProcessingStats {
    /// Creates counters for every error, warning and info type, all at zero.
    pub fn new() -> Self {
        ProcessingStats {
            errors: zeroed(),
            warnings: zeroed(),
            info: zeroed(),
        }
    }

    /// Counts one failed target.
    pub fn increment_error(&self, error: ErrorType) {
        bump(&self.errors, error);
    }

    /// Counts one missing key field.
    pub fn increment_warning(&self, warning: WarningType) {
        bump(&self.warnings, warning);
    }

    /// Counts one informational event.
    pub fn increment_info(&self, info_type: InfoType) {
        bump(&self.info, info_type);
    }

    /// Current count for `error`.
    pub fn get_error_count(&self, error: ErrorType) -> usize {
        read(&self.errors, error)
    }

    /// Current count for `warning`.
    pub fn get_warning_count(&self, warning: WarningType) -> usize {
        read(&self.warnings, warning)
    }

    /// Current count for `info_type`.
    pub fn get_info_count(&self, info_type: InfoType) -> usize {
        read(&self.info, info_type)
    }

    /// Get total error count across all error types.
    pub fn total_errors(&self) -> usize {
        ErrorType::iter().map(|e| self.get_error_count(e)).sum()
    }

    /// Get total warning count across all warning types.
    pub fn total_warnings(&self) -> usize {
        WarningType::iter().map(|w| self.get_warning_count(w)).sum()
    }

    /// Get total info count across all info types.
    pub fn total_info(&self) -> usize {
        InfoType::iter().map(|i| self.get_info_count(i)).sum()
    }

    /// Records the warnings and info metrics a successful record carries.
    pub fn record_product(&self, record: &ProductRecord) {
        if record.title.is_none() {
            self.increment_warning(WarningType::MissingTitle);
        }
        if record.image_links.is_empty() {
            self.increment_warning(WarningType::MissingImages);
        }
        if record.final_price.is_none() {
            self.increment_warning(WarningType::MissingFinalPrice);
        }
        if record.rating.is_none() {
            self.increment_warning(WarningType::MissingRating);
        }

        if !record.banned_words_found.is_empty() {
            self.increment_info(InfoType::BannedWordsFound);
        }
        if record.has_coupon {
            self.increment_info(InfoType::CouponPresent);
        }
        if record.is_featured_choice {
            self.increment_info(InfoType::FeaturedChoice);
        }
        if record.final_price.is_some() && record.discount_percent == Some(0.0) {
            self.increment_info(InfoType::NoDiscountFallback);
        }
    }
}
