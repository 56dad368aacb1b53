use fnv::FnvHashMap;
use smallvec::SmallVec;

use crate::hunspell::affixdata::SpecialFlags;
use crate::hunspell::flags::{Flag, FlagSet};
use crate::hunspell::morph::MorphField;
use crate::hunspell::wordflags::WordFlags;

/// One dictionary entry. Several entries may share a stem (homonyms),
/// each with its own flags and morphological fields.
#[derive(Clone, Debug, PartialEq)]
pub struct WordEntry {
    pub stem: String,
    pub flags: FlagSet,
    pub morph: Vec<MorphField>,
    word_flags: WordFlags,
}

impl WordEntry {
    pub fn new(stem: &str, flags: FlagSet, morph: Vec<MorphField>) -> Self {
        WordEntry {
            stem: stem.to_string(),
            flags,
            morph,
            word_flags: WordFlags::empty(),
        }
    }

    pub(crate) fn with_word_flags(mut self, word_flags: WordFlags) -> Self {
        self.word_flags = word_flags;
        self
    }

    pub fn has_flag(&self, flag: Flag) -> bool {
        self.flags.contains(flag)
    }

    pub(crate) fn word_flags(&self) -> WordFlags {
        self.word_flags
    }
}

/// Maps stems to their homonyms, in insertion order.
#[derive(Clone, Debug, Default)]
pub struct WordIndex {
    words: FnvHashMap<String, SmallVec<[WordEntry; 1]>>,
    /// How many stems start with each character. Used by the compound
    /// search to skip split points where no dictionary word can start.
    first_chars: FnvHashMap<char, u32>,
}

impl WordIndex {
    pub fn new() -> Self {
        WordIndex::default()
    }

    /// The number of distinct stems.
    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Case-sensitive exact lookup. Returns an empty slice for unknown words.
    pub fn lookup(&self, word: &str) -> &[WordEntry] {
        match self.words.get(word) {
            Some(homonyms) => homonyms.as_slice(),
            None => &[],
        }
    }

    pub fn contains(&self, word: &str) -> bool {
        self.words.contains_key(word)
    }

    /// Append `entry` as a new homonym of its stem.
    pub fn add(&mut self, entry: WordEntry) {
        let homonyms = self.words.entry(entry.stem.clone()).or_default();
        if homonyms.is_empty() {
            if let Some(c) = entry.stem.chars().next() {
                *self.first_chars.entry(c).or_default() += 1;
            }
        }
        homonyms.push(entry);
    }

    /// Remove all homonyms of `stem`. Returns how many entries were removed.
    pub fn remove(&mut self, stem: &str) -> usize {
        self.remove_matching(stem, |_| true)
    }

    /// Remove the homonyms of `stem` for which `pred` returns true.
    /// The stem disappears from the index once its last entry is gone.
    pub fn remove_matching(
        &mut self,
        stem: &str,
        mut pred: impl FnMut(&WordEntry) -> bool,
    ) -> usize {
        let Some(homonyms) = self.words.get_mut(stem) else {
            return 0;
        };
        let before = homonyms.len();
        homonyms.retain(|entry| !pred(entry));
        let removed = before - homonyms.len();
        if homonyms.is_empty() {
            self.words.remove(stem);
            if let Some(c) = stem.chars().next() {
                if let Some(count) = self.first_chars.get_mut(&c) {
                    *count -= 1;
                    if *count == 0 {
                        self.first_chars.remove(&c);
                    }
                }
            }
        }
        removed
    }

    /// Policy for permissive flags: the word qualifies if any of its
    /// homonyms has the flag.
    pub fn any_homonym_has_flag(&self, stem: &str, flag: Flag) -> bool {
        self.lookup(stem).iter().any(|entry| entry.has_flag(flag))
    }

    /// Policy for restrictive flags: the word is disqualified only if every
    /// homonym has the flag. Unknown words have no homonyms and are never
    /// disqualified.
    pub fn all_homonyms_have_flag(&self, stem: &str, flag: Flag) -> bool {
        let homonyms = self.lookup(stem);
        !homonyms.is_empty() && homonyms.iter().all(|entry| entry.has_flag(flag))
    }

    /// Recompute the special flags of every entry from its flags.
    pub(crate) fn derive_word_flags(&mut self, special: &SpecialFlags) {
        for entry in self.words.values_mut().flatten() {
            entry.word_flags = special.word_flags(&entry.flags);
        }
    }

    /// Could a stem in this index start with `c`?
    pub fn may_begin_word(&self, c: char) -> bool {
        self.first_chars.contains_key(&c)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[WordEntry])> {
        self.words
            .iter()
            .map(|(stem, homonyms)| (stem.as_str(), homonyms.as_slice()))
    }
}
