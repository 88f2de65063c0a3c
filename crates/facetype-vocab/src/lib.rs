//! Facetype Vocabulary crate - word completion and the binary-split menu.
//!
//! The `Trie` stores ranked words loaded by `Dictionary`. The `Composer` owns
//! the message being typed and derives suggestions from its trailing word.
//! The `Navigator` drives a menu that halves the current branch on every
//! left/right selection until one item remains, then resolves that item into
//! a message edit, a spoken phrase, or a command.

pub mod branch;
pub mod composer;
pub mod dictionary;
pub mod navigator;
pub mod trie;

pub use branch::{Branch, EntryMode};
pub use composer::Composer;
pub use dictionary::Dictionary;
pub use navigator::{Command, NavEffect, NavState, Navigator};
pub use trie::Trie;
