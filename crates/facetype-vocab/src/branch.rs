//! Selectable item sets and their display labels.

use std::fmt;

use serde::Serialize;

/// How a resolved leaf item is applied to the message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryMode {
    /// Items are single letters appended to the message.
    Character,
    /// Items are completions replacing the trailing partial word.
    Word,
    /// Items are quick phrases or edit commands.
    Phrase,
}

impl fmt::Display for EntryMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntryMode::Character => write!(f, "character"),
            EntryMode::Word => write!(f, "word"),
            EntryMode::Phrase => write!(f, "phrase"),
        }
    }
}

/// Ordered set of selectable items, split in two halves for selection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Branch {
    items: Vec<String>,
}

impl Branch {
    pub fn new<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            items: items.into_iter().map(Into::into).collect(),
        }
    }

    /// The uppercase letters A through Z.
    pub fn alphabet() -> Self {
        Self::new(('A'..='Z').map(String::from))
    }

    pub fn items(&self) -> &[String] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// The only item, if the branch has exactly one.
    pub fn single(&self) -> Option<&str> {
        match self.items.as_slice() {
            [only] => Some(only.as_str()),
            _ => None,
        }
    }

    /// Split into `(left, right)`; the left half takes the first `ceil(n/2)` items.
    pub fn split(&self) -> (Branch, Branch) {
        let mid = self.items.len().div_ceil(2);
        let (left, right) = self.items.split_at(mid);
        (Branch::new(left.to_vec()), Branch::new(right.to_vec()))
    }

    pub fn is_full_alphabet(&self) -> bool {
        self.items.len() == 26
            && self
                .items
                .iter()
                .zip('A'..='Z')
                .all(|(item, letter)| item.len() == 1 && item.starts_with(letter))
    }

    /// Text shown for this branch on one side of the screen.
    pub fn label(&self, mode: EntryMode) -> String {
        let (Some(first), Some(last)) = (self.items.first(), self.items.last()) else {
            return String::new();
        };
        if self.items.len() == 1 {
            first.clone()
        } else if self.is_full_alphabet() {
            "A - Z".to_string()
        } else if self.items.len() <= 3 {
            self.items.join("\n")
        } else if mode == EntryMode::Word {
            format!("{} ... {}", first, last)
        } else {
            format!("{} - {}", first, last)
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
