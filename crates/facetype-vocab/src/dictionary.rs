//! Ranked word list loading.
//!
//! A dictionary file is either a JSON array of strings (`.json`) or one word
//! per line. A word's rank is its index among the non-empty entries, so the
//! most common words should come first. When the file is missing or corrupt
//! a small built-in list is used instead and `is_loaded()` stays false.

use std::path::Path;
use std::sync::Arc;

use tracing::{info, warn};

use facetype_core::error::{FacetypeError, Result};

use crate::trie::Trie;

/// Common words used when no dictionary file can be read, most frequent first.
pub const FALLBACK_WORDS: &[&str] = &[
    "the", "i", "you", "to", "and", "a", "it", "is", "my", "me", "no", "yes", "please",
    "thank", "thanks", "hello", "help", "need", "want", "water", "pain", "hurts", "here",
    "have", "what", "where", "when", "how", "can", "cold", "hot", "tired", "sleep", "eat",
    "drink", "bathroom", "nurse", "doctor", "family", "love", "good", "bad", "more", "stop",
    "now", "later", "today", "tomorrow", "okay", "sorry",
];

#[derive(Debug, Clone)]
pub struct Dictionary {
    trie: Arc<Trie>,
    loaded: bool,
}

impl Dictionary {
    /// Dictionary built from the built-in fallback list.
    pub fn fallback() -> Self {
        Self {
            trie: Arc::new(Trie::from_ranked(FALLBACK_WORDS)),
            loaded: false,
        }
    }

    /// Dictionary built from an in-memory ranked list.
    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            trie: Arc::new(Trie::from_ranked(words)),
            loaded: true,
        }
    }

    /// Load a ranked word list from `path`.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        let words = if is_json {
            parse_json(&content)?
        } else {
            parse_lines(&content)
        };

        if words.is_empty() {
            return Err(FacetypeError::Dictionary(format!(
                "{} contains no words",
                path.display()
            )));
        }

        let dictionary = Self::from_words(&words);
        info!(
            path = %path.display(),
            words = dictionary.trie.len(),
            "Dictionary loaded"
        );
        Ok(dictionary)
    }

    /// Load from `path` if given, otherwise (or on any failure) use the
    /// built-in list.
    pub fn load_or_fallback(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            info!("No dictionary configured, using built-in word list");
            return Self::fallback();
        };
        match Self::load(path) {
            Ok(dictionary) => dictionary,
            Err(e) => {
                warn!(
                    "Failed to load dictionary from {}: {}. Using built-in word list.",
                    path.display(),
                    e
                );
                Self::fallback()
            }
        }
    }

    /// Whether real dictionary data (not the fallback) is in use.
    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn trie(&self) -> Arc<Trie> {
        Arc::clone(&self.trie)
    }

    pub fn len(&self) -> usize {
        self.trie.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trie.is_empty()
    }
}

fn parse_lines(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect()
}

fn parse_json(content: &str) -> Result<Vec<String>> {
    let words: Vec<String> = serde_json::from_str(content)?;
    Ok(words
        .into_iter()
        .map(|w| w.trim().to_string())
        .filter(|w| !w.is_empty())
        .collect())
}

// =============================================================================
// Tests
// =============================================================================
