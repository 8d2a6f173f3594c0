//! Banned word screening.

use std::collections::BTreeSet;

/// Lower-cased banned words parsed from a comma-separated list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BannedWords {
    words: Vec<String>,
}

impl BannedWords {
    /// Splits on commas, trims, lower-cases and drops empty entries.
    pub fn parse(csv: &str) -> Self {
        let mut words: Vec<String> = Vec::new();
        for word in csv.split(',').map(|w| w.trim().to_lowercase()) {
            if !word.is_empty() && !words.contains(&word) {
                words.push(word);
            }
        }
        Self { words }
    }

    /// Whether no words were given.
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// The parsed words, in input order.
    pub fn words(&self) -> &[String] {
        &self.words
    }

    /// Words that occur in the text as case-insensitive substrings.
    pub fn find_in(&self, text: &str) -> BTreeSet<String> {
        if self.words.is_empty() {
            return BTreeSet::new();
        }
        let haystack = text.to_lowercase();
        self.words
            .iter()
            .filter(|word| haystack.contains(word.as_str()))
            .cloned()
            .collect()
    }
}
