//! The message being composed and its completion suggestions.
//!
//! Suggestions are recomputed after every message edit from the trailing
//! partial word. Inserted text follows one case rule: capitalized at the start
//! of the message or after a ". " sentence boundary, lowercase elsewhere.

use std::sync::Arc;

use tracing::debug;

use crate::trie::Trie;

#[derive(Debug, Clone)]
pub struct Composer {
    message: String,
    suggestions: Vec<String>,
    trie: Arc<Trie>,
    max_suggestions: usize,
}

impl Composer {
    pub fn new(trie: Arc<Trie>, max_suggestions: usize) -> Self {
        Self {
            message: String::new(),
            suggestions: Vec::new(),
            trie,
            max_suggestions,
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn suggestions(&self) -> &[String] {
        &self.suggestions
    }

    /// Replace the message outright, e.g. when restoring a draft.
    pub fn set_message(&mut self, message: impl Into<String>) {
        self.message = message.into();
        self.refresh_suggestions();
    }

    /// The partial word at the end of the message; empty after whitespace.
    pub fn trailing_word(&self) -> &str {
        if self.message.ends_with(char::is_whitespace) {
            return "";
        }
        self.message.split_whitespace().last().unwrap_or("")
    }

    /// Whether the next inserted unit starts a sentence.
    pub fn at_sentence_start(&self) -> bool {
        self.message.is_empty() || self.message.ends_with(". ")
    }

    fn apply_case(&self, unit: &str) -> String {
        if self.at_sentence_start() {
            capitalize(unit)
        } else {
            unit.to_lowercase()
        }
    }

    pub fn refresh_suggestions(&mut self) {
        let partial = self.trailing_word();
        self.suggestions = if partial.is_empty() {
            Vec::new()
        } else {
            self.trie.top_completions(partial, self.max_suggestions)
        };
        debug!(partial = %self.trailing_word(), suggestions = ?self.suggestions, "Suggestions refreshed");
    }

    pub fn clear_suggestions(&mut self) {
        self.suggestions.clear();
    }

    /// Append a typed character and refresh suggestions.
    pub fn append_character(&mut self, item: &str) {
        let cased = self.apply_case(item);
        self.message.push_str(&cased);
        self.refresh_suggestions();
    }

    /// Replace the trailing partial word with `word` followed by a space.
    ///
    /// A completion at a sentence start is capitalized only when nothing was
    /// typed yet or the partial word itself began uppercase, so "He" becomes
    /// "Hello " while a deliberately lowercase "he" becomes "hello ".
    pub fn complete_word(&mut self, word: &str) {
        let partial = self.trailing_word();
        let partial_len = partial.len();
        let typed_capital = partial.is_empty() || partial.starts_with(char::is_uppercase);

        self.message.truncate(self.message.len() - partial_len);
        let cased = if self.at_sentence_start() && typed_capital {
            capitalize(word)
        } else {
            word.to_lowercase()
        };
        self.message.push_str(&cased);
        self.message.push(' ');
        self.suggestions.clear();
    }

    pub fn append_space(&mut self) {
        self.message.push(' ');
        self.refresh_suggestions();
    }

    /// Remove the final character. Returns false if the message was empty.
    pub fn delete_last(&mut self) -> bool {
        let removed = self.message.pop().is_some();
        self.refresh_suggestions();
        removed
    }

    pub fn clear(&mut self) {
        self.message.clear();
        self.suggestions.clear();
    }
}

fn capitalize(unit: &str) -> String {
    let mut chars = unit.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn composer() -> Composer {
        Composer::new(
            Arc::new(Trie::from_ranked(["hello", "help", "he", "world", "water"])),
            2,
        )
    }

    #[test]
    fn test_trailing_word() {
        let mut c = composer();
        assert_eq!(c.trailing_word(), "");
        c.set_message("I need wat");
        assert_eq!(c.trailing_word(), "wat");
        c.set_message("I need ");
        assert_eq!(c.trailing_word(), "");
        c.set_message("Done.");
        assert_eq!(c.trailing_word(), "Done.");
    }

    #[test]
    fn test_suggestions_ranked_top_two() {
        let mut c = composer();
        c.set_message("he");
        assert_eq!(c.suggestions(), &["hello".to_string(), "help".to_string()]);
        c.set_message("xyz");
        assert!(c.suggestions().is_empty());
        c.set_message("he ");
        assert!(c.suggestions().is_empty());
    }

    #[test]
    fn test_append_character_case_rule() {
        let mut c = composer();
        c.append_character("H");
        assert_eq!(c.message(), "H");
        c.append_character("E");
        assert_eq!(c.message(), "He");
        assert_eq!(c.suggestions(), &["hello".to_string(), "help".to_string()]);

        c.set_message("Hi. ");
        c.append_character("w");
        assert_eq!(c.message(), "Hi. W");
        assert_eq!(c.suggestions(), &["world".to_string(), "water".to_string()]);
    }

    #[test]
    fn test_complete_word_replaces_partial() {
        let mut c = composer();
        c.set_message("he");
        c.complete_word("hello");
        assert_eq!(c.message(), "hello ");
        assert!(c.suggestions().is_empty());

        c.set_message("say wo");
        c.complete_word("world");
        assert_eq!(c.message(), "say world ");
    }

    #[test]
    fn test_complete_word_on_empty_message_capitalizes() {
        let mut c = composer();
        c.complete_word("water");
        assert_eq!(c.message(), "Water ");

        c.set_message("Yes. ");
        c.complete_word("hello");
        assert_eq!(c.message(), "Yes. Hello ");
    }

    #[test]
    fn test_complete_word_keeps_typed_sentence_capital() {
        let mut c = composer();
        c.set_message("He");
        c.complete_word("hello");
        assert_eq!(c.message(), "Hello ");

        c.set_message("Hi. Wa");
        c.complete_word("water");
        assert_eq!(c.message(), "Hi. Water ");

        // Mid-sentence a capital partial still completes lowercase
        c.set_message("say Wo");
        c.complete_word("world");
        assert_eq!(c.message(), "say world ");
    }

    #[test]
    fn test_space_delete_clear() {
        let mut c = composer();
        c.set_message("hi");
        c.append_space();
        assert_eq!(c.message(), "hi ");
        assert!(c.suggestions().is_empty());

        assert!(c.delete_last());
        assert_eq!(c.message(), "hi");

        c.set_message("he");
        assert!(!c.suggestions().is_empty());
        c.clear();
        assert_eq!(c.message(), "");
        assert!(c.suggestions().is_empty());
        assert!(!c.delete_last());
    }

    #[test]
    fn test_delete_refreshes_suggestions() {
        let mut c = composer();
        c.set_message("hel ");
        assert!(c.suggestions().is_empty());
        c.delete_last();
        assert_eq!(c.suggestions(), &["hello".to_string(), "help".to_string()]);
    }

    #[test]
    fn test_capitalize() {
        assert_eq!(capitalize("hELLO"), "Hello");
        assert_eq!(capitalize("a"), "A");
        assert_eq!(capitalize(""), "");
    }
}
