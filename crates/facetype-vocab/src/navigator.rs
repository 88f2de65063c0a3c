//! Binary-split menu navigation.
//!
//! States:
//! - Root: no active branch. Left opens the alphabet, right opens a context menu.
//! - InBranch: an active branch plus the stack of branches above it.
//!
//! Each left/right selection halves the active branch. When the chosen half
//! holds a single item it is resolved (command, quick phrase, completion, or
//! letter) and navigation returns to Root. Back pops one level; at Root it
//! deletes the last character of the message.

use std::fmt;

use serde::Serialize;
use tracing::{debug, info};

use facetype_core::types::ActionKind;

use crate::branch::{Branch, EntryMode};
use crate::composer::Composer;

pub const LABEL_ALPHABET: &str = "A - Z";
pub const LABEL_QUICK_WORDS: &str = "Quick Words";
pub const LABEL_PREDICT_EDIT: &str = "Predict & Edit";
pub const LABEL_EDIT_SPEAK: &str = "Edit & Speak";

/// Reserved menu items that edit the message instead of inserting text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    Space,
    Clear,
    Speak,
}

impl Command {
    /// Order in which commands follow the suggestions in the context menu.
    pub const MENU_ORDER: [Command; 3] = [Command::Space, Command::Clear, Command::Speak];

    pub fn as_str(&self) -> &'static str {
        match self {
            Command::Space => "Space",
            Command::Clear => "Clear",
            Command::Speak => "Speak",
        }
    }

    pub fn from_item(item: &str) -> Option<Command> {
        Self::MENU_ORDER.into_iter().find(|c| c.as_str() == item)
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NavState {
    Root,
    InBranch,
}

/// Side effect requested by a leaf resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NavEffect {
    Speak(String),
}

/// What a confirmed action did to the navigator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "transition")]
pub enum Transition {
    /// Root -> InBranch.
    EnteredBranch { mode: EntryMode, items: usize },
    /// Narrowed to the chosen half.
    Descended { items: usize },
    /// A single item was selected and applied; back at Root.
    Resolved {
        item: String,
        effect: Option<NavEffect>,
    },
    /// Back restored the previous branch.
    Ascended { items: usize },
    /// Back left the top-level branch.
    ReturnedToRoot,
    /// Back at Root removed the last character.
    DeletedCharacter,
    /// Nothing to do (empty half, empty menu, or nothing to delete).
    Ignored,
}

#[derive(Debug, Clone)]
pub struct Navigator {
    composer: Composer,
    quick_phrases: Vec<String>,
    branch: Option<Branch>,
    /// Branches above the active one; `None` marks Root.
    history: Vec<Option<Branch>>,
    mode: EntryMode,
}

impl Navigator {
    pub fn new(composer: Composer, quick_phrases: Vec<String>) -> Self {
        Self {
            composer,
            quick_phrases,
            branch: None,
            history: Vec::new(),
            mode: EntryMode::Character,
        }
    }

    pub fn state(&self) -> NavState {
        if self.branch.is_some() {
            NavState::InBranch
        } else {
            NavState::Root
        }
    }

    pub fn branch(&self) -> Option<&Branch> {
        self.branch.as_ref()
    }

    pub fn depth(&self) -> usize {
        self.history.len()
    }

    pub fn mode(&self) -> EntryMode {
        self.mode
    }

    pub fn composer(&self) -> &Composer {
        &self.composer
    }

    pub fn composer_mut(&mut self) -> &mut Composer {
        &mut self.composer
    }

    pub fn message(&self) -> &str {
        self.composer.message()
    }

    pub fn suggestions(&self) -> &[String] {
        self.composer.suggestions()
    }

    pub fn quick_phrases(&self) -> &[String] {
        &self.quick_phrases
    }

    pub fn left_label(&self) -> String {
        match &self.branch {
            Some(branch) => branch.split().0.label(self.mode),
            None => LABEL_ALPHABET.to_string(),
        }
    }

    pub fn right_label(&self) -> String {
        match &self.branch {
            Some(branch) => branch.split().1.label(self.mode),
            None if self.composer.message().is_empty() => LABEL_QUICK_WORDS.to_string(),
            None if !self.composer.suggestions().is_empty() => LABEL_PREDICT_EDIT.to_string(),
            None => LABEL_EDIT_SPEAK.to_string(),
        }
    }

    /// Menu opened by a right selection at Root.
    pub fn context_menu(&self) -> (Branch, EntryMode) {
        if self.composer.message().is_empty() {
            return (Branch::new(self.quick_phrases.clone()), EntryMode::Phrase);
        }
        let suggestions = self.composer.suggestions();
        let mode = if suggestions.is_empty() {
            EntryMode::Phrase
        } else {
            EntryMode::Word
        };
        let items = suggestions
            .iter()
            .cloned()
            .chain(Command::MENU_ORDER.iter().map(|c| c.as_str().to_string()));
        (Branch::new(items), mode)
    }

    pub fn apply(&mut self, action: ActionKind) -> Transition {
        let transition = match action {
            ActionKind::SelectLeft => self.select(true),
            ActionKind::SelectRight => self.select(false),
            ActionKind::BackOrDelete => self.back(),
        };
        debug!(action = %action, transition = ?transition, depth = self.depth(), "Navigation");
        transition
    }

    pub fn select_left(&mut self) -> Transition {
        self.apply(ActionKind::SelectLeft)
    }

    pub fn select_right(&mut self) -> Transition {
        self.apply(ActionKind::SelectRight)
    }

    pub fn back_or_delete(&mut self) -> Transition {
        self.apply(ActionKind::BackOrDelete)
    }

    fn select(&mut self, left: bool) -> Transition {
        let Some(current) = self.branch.take() else {
            return self.enter(left);
        };

        let (left_half, right_half) = current.split();
        let chosen = if left { left_half } else { right_half };
        match chosen.len() {
            0 => {
                self.branch = Some(current);
                Transition::Ignored
            }
            1 => {
                let item = chosen.single().unwrap_or_default().to_string();
                let effect = self.resolve(&item);
                self.go_root();
                Transition::Resolved { item, effect }
            }
            items => {
                self.history.push(Some(current));
                self.branch = Some(chosen);
                Transition::Descended { items }
            }
        }
    }

    fn enter(&mut self, left: bool) -> Transition {
        let (branch, mode) = if left {
            (Branch::alphabet(), EntryMode::Character)
        } else {
            self.context_menu()
        };
        if branch.is_empty() {
            return Transition::Ignored;
        }
        let items = branch.len();
        self.history.push(None);
        self.branch = Some(branch);
        self.mode = mode;
        Transition::EnteredBranch { mode, items }
    }

    fn back(&mut self) -> Transition {
        match self.history.pop() {
            Some(Some(previous)) => {
                let items = previous.len();
                self.branch = Some(previous);
                Transition::Ascended { items }
            }
            Some(None) => {
                self.go_root();
                Transition::ReturnedToRoot
            }
            None => {
                if self.composer.delete_last() {
                    Transition::DeletedCharacter
                } else {
                    Transition::Ignored
                }
            }
        }
    }

    fn go_root(&mut self) {
        self.branch = None;
        self.history.clear();
    }

    /// Apply a single selected item to the message.
    fn resolve(&mut self, item: &str) -> Option<NavEffect> {
        if let Some(command) = Command::from_item(item) {
            info!(command = %command, "Command selected");
            return match command {
                Command::Space => {
                    self.composer.append_space();
                    None
                }
                Command::Clear => {
                    self.composer.clear();
                    None
                }
                Command::Speak => {
                    let text = self.composer.message().to_string();
                    self.composer.clear_suggestions();
                    Some(NavEffect::Speak(text))
                }
            };
        }

        if self.quick_phrases.iter().any(|phrase| phrase == item) {
            info!(phrase = %item, "Quick phrase selected");
            self.composer.clear();
            return Some(NavEffect::Speak(item.to_string()));
        }

        match self.mode {
            EntryMode::Word => {
                info!(word = %item, "Completion selected");
                self.composer.complete_word(item);
            }
            EntryMode::Character | EntryMode::Phrase => {
                debug!(character = %item, "Character selected");
                self.composer.append_character(item);
            }
        }
        None
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::trie::Trie;

    fn navigator() -> Navigator {
        let trie = Arc::new(Trie::from_ranked(["hello", "help", "hi", "water"]));
        Navigator::new(
            Composer::new(trie, 2),
            vec!["Yes".into(), "No".into(), "Pain".into(), "Water".into()],
        )
    }

    #[test]
    fn test_root_labels() {
        let mut nav = navigator();
        assert_eq!(nav.state(), NavState::Root);
        assert_eq!(nav.left_label(), "A - Z");
        assert_eq!(nav.right_label(), "Quick Words");

        nav.composer_mut().set_message("he");
        assert_eq!(nav.right_label(), "Predict & Edit");

        nav.composer_mut().set_message("zz");
        assert_eq!(nav.right_label(), "Edit & Speak");
    }

    #[test]
    fn test_left_at_root_opens_alphabet() {
        let mut nav = navigator();
        let t = nav.select_left();
        assert_eq!(
            t,
            Transition::EnteredBranch {
                mode: EntryMode::Character,
                items: 26
            }
        );
        assert_eq!(nav.state(), NavState::InBranch);
        assert_eq!(nav.depth(), 1);
        assert_eq!(nav.left_label(), "A - M");
        assert_eq!(nav.right_label(), "N - Z");
    }

    #[test]
    fn test_type_letter_h() {
        let mut nav = navigator();
        nav.select_left();
        // A-M, H-M, H-J, H-I, H
        assert_eq!(nav.select_left(), Transition::Descended { items: 13 });
        assert_eq!(nav.select_right(), Transition::Descended { items: 6 });
        assert_eq!(nav.select_left(), Transition::Descended { items: 3 });
        assert_eq!(nav.left_label(), "H\nI");
        assert_eq!(nav.right_label(), "J");
        assert_eq!(nav.select_left(), Transition::Descended { items: 2 });
        assert_eq!(
            nav.select_left(),
            Transition::Resolved {
                item: "H".into(),
                effect: None
            }
        );
        assert_eq!(nav.message(), "H");
        assert_eq!(nav.state(), NavState::Root);
        assert_eq!(nav.depth(), 0);
        assert_eq!(nav.suggestions(), &["hello".to_string(), "help".to_string()]);
    }

    #[test]
    fn test_context_menu_with_suggestions() {
        let mut nav = navigator();
        nav.composer_mut().set_message("he");
        let (menu, mode) = nav.context_menu();
        assert_eq!(menu.items(), &["hello", "help", "Space", "Clear", "Speak"]);
        assert_eq!(mode, EntryMode::Word);

        nav.select_right();
        assert_eq!(nav.mode(), EntryMode::Word);
        assert_eq!(nav.left_label(), "hello\nhelp\nSpace");
        assert_eq!(nav.right_label(), "Clear\nSpeak");
    }

    #[test]
    fn test_context_menu_without_suggestions() {
        let mut nav = navigator();
        nav.composer_mut().set_message("zz");
        let (menu, mode) = nav.context_menu();
        assert_eq!(menu.items(), &["Space", "Clear", "Speak"]);
        assert_eq!(mode, EntryMode::Phrase);
    }

    #[test]
    fn test_select_completion() {
        let mut nav = navigator();
        nav.composer_mut().set_message("he");
        nav.select_right();
        nav.select_left(); // hello, help, Space
        nav.select_left(); // hello, help
        let t = nav.select_left();
        assert_eq!(
            t,
            Transition::Resolved {
                item: "hello".into(),
                effect: None
            }
        );
        assert_eq!(nav.message(), "hello ");
        assert!(nav.suggestions().is_empty());
        assert_eq!(nav.state(), NavState::Root);
    }

    #[test]
    fn test_space_command() {
        let mut nav = navigator();
        nav.composer_mut().set_message("he");
        nav.select_right();
        nav.select_left(); // hello, help, Space
        nav.select_right(); // Space
        assert_eq!(nav.message(), "he ");
        assert_eq!(nav.state(), NavState::Root);
    }

    #[test]
    fn test_speak_command_keeps_message() {
        let mut nav = navigator();
        nav.composer_mut().set_message("he");
        nav.select_right();
        nav.select_right(); // Clear, Speak
        let t = nav.select_right(); // Speak
        assert_eq!(
            t,
            Transition::Resolved {
                item: "Speak".into(),
                effect: Some(NavEffect::Speak("he".into()))
            }
        );
        assert_eq!(nav.message(), "he");
        assert!(nav.suggestions().is_empty());
        assert_eq!(nav.state(), NavState::Root);
    }

    #[test]
    fn test_clear_command() {
        let mut nav = navigator();
        nav.composer_mut().set_message("he");
        nav.select_right();
        nav.select_right(); // Clear, Speak
        nav.select_left(); // Clear
        assert_eq!(nav.message(), "");
        assert!(nav.suggestions().is_empty());
    }

    #[test]
    fn test_quick_phrase_speaks_and_clears() {
        let mut nav = navigator();
        let t = nav.select_right();
        assert_eq!(
            t,
            Transition::EnteredBranch {
                mode: EntryMode::Phrase,
                items: 4
            }
        );
        assert_eq!(nav.left_label(), "Yes\nNo");
        nav.select_right(); // Pain, Water
        let t = nav.select_right();
        assert_eq!(
            t,
            Transition::Resolved {
                item: "Water".into(),
                effect: Some(NavEffect::Speak("Water".into()))
            }
        );
        assert_eq!(nav.message(), "");
    }

    #[test]
    fn test_back_ascends_then_returns_to_root() {
        let mut nav = navigator();
        nav.select_left(); // A-Z
        nav.select_right(); // N-Z
        assert_eq!(nav.left_label(), "N - T");

        assert_eq!(nav.back_or_delete(), Transition::Ascended { items: 26 });
        assert_eq!(nav.left_label(), "A - M");
        assert_eq!(nav.back_or_delete(), Transition::ReturnedToRoot);
        assert_eq!(nav.state(), NavState::Root);
        assert_eq!(nav.left_label(), "A - Z");
    }

    #[test]
    fn test_back_at_root_deletes() {
        let mut nav = navigator();
        nav.composer_mut().set_message("hi ");
        assert_eq!(nav.back_or_delete(), Transition::DeletedCharacter);
        assert_eq!(nav.message(), "hi");
        assert_eq!(nav.suggestions(), &["hi".to_string()]);
        assert_eq!(nav.state(), NavState::Root);
    }

    #[test]
    fn test_back_at_root_with_empty_message() {
        let mut nav = navigator();
        assert_eq!(nav.back_or_delete(), Transition::Ignored);
    }

    #[test]
    fn test_empty_half_is_ignored() {
        let trie = Arc::new(Trie::new());
        let mut nav = Navigator::new(Composer::new(trie, 2), vec!["Yes".into()]);
        nav.select_right(); // single-item branch
        assert_eq!(nav.right_label(), "");
        assert_eq!(nav.select_right(), Transition::Ignored);
        assert_eq!(nav.state(), NavState::InBranch);
        assert_eq!(
            nav.select_left(),
            Transition::Resolved {
                item: "Yes".into(),
                effect: Some(NavEffect::Speak("Yes".into()))
            }
        );
    }

    #[test]
    fn test_no_quick_phrases_ignored() {
        let trie = Arc::new(Trie::new());
        let mut nav = Navigator::new(Composer::new(trie, 2), Vec::new());
        assert_eq!(nav.select_right(), Transition::Ignored);
        assert_eq!(nav.state(), NavState::Root);
        assert_eq!(nav.depth(), 0);
    }

    #[test]
    fn test_command_from_item() {
        assert_eq!(Command::from_item("Space"), Some(Command::Space));
        assert_eq!(Command::from_item("space"), None);
        assert_eq!(Command::Speak.to_string(), "Speak");
    }
}
