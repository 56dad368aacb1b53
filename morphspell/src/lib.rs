#![warn(missing_debug_implementations)]

mod affix_trie;
mod error;
mod hunspell;

pub use crate::error::SpellError;
pub use crate::hunspell::*;

pub trait Speller {
    /// Returns true if the word is in the dictionary, otherwise false.
    fn spellcheck(&self, word: &str) -> bool;

    /// Returns a list of possible corrections to a misspelled word,
    /// best first. The list may be empty.
    fn suggestions(&self, word: &str, max: usize) -> Vec<String>;

    /// Returns the dictionary stems the word can be derived from.
    fn stem(&self, word: &str) -> Vec<String>;

    /// Returns a description of each way the word can be derived,
    /// as a list of `tag:value` fields.
    fn analyze(&self, word: &str) -> Vec<String>;

    /// Accept `word` into the dictionary.
    /// Returns false if the word could not be accepted (for example
    /// if it was empty), otherwise returns true.
    fn add_word(&mut self, word: &str) -> bool;

    /// Stop accepting `word` as a dictionary word. Forms derived from
    /// it by affixes or compounding are no longer accepted either.
    /// Returns true if anything was removed.
    fn remove_word(&mut self, word: &str) -> bool;
}
