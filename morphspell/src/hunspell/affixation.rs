use smallvec::SmallVec;

use crate::hunspell::affixdata::{AffixData, AffixEntry, EntryRef};
use crate::hunspell::wordflags::WordFlags;
use crate::hunspell::wordindex::{WordEntry, WordIndex};

/// Where a word appears: on its own, or as a part of a compound.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Position {
    Standalone,
    CompoundBegin,
    CompoundMiddle,
    CompoundEnd,
}

impl Position {
    fn compound_flag(self) -> WordFlags {
        match self {
            Position::Standalone => WordFlags::empty(),
            Position::CompoundBegin => WordFlags::CompoundBegin,
            Position::CompoundMiddle => WordFlags::CompoundMiddle,
            Position::CompoundEnd => WordFlags::CompoundEnd,
        }
    }

    fn in_compound(self) -> bool {
        self != Position::Standalone
    }
}

/// One way to build a surface word: a dictionary root with at most one
/// prefix and up to two suffixes.
#[derive(Clone, Copy, Debug)]
pub struct AffixMatch<'a> {
    pub root: &'a WordEntry,
    pub prefix: Option<&'a AffixEntry>,
    /// The suffix attached directly to the root.
    pub suffix: Option<&'a AffixEntry>,
    /// A second suffix attached after `suffix`.
    pub outer_suffix: Option<&'a AffixEntry>,
}

impl<'a> AffixMatch<'a> {
    pub fn bare(root: &'a WordEntry) -> Self {
        AffixMatch {
            root,
            prefix: None,
            suffix: None,
            outer_suffix: None,
        }
    }

    /// The affixes in analysis order: prefix, inner suffix, outer suffix.
    pub fn affixes(&self) -> impl Iterator<Item = &'a AffixEntry> {
        self.prefix
            .into_iter()
            .chain(self.suffix)
            .chain(self.outer_suffix)
    }

    pub fn is_affixed(&self) -> bool {
        self.prefix.is_some() || self.suffix.is_some()
    }

    fn has_suffix(&self) -> bool {
        self.suffix.is_some()
    }
}

/// Extra conditions on which matches count, depending on why we're asking.
#[derive(Clone, Copy, Debug, Default)]
pub struct MatchFilter {
    /// The word was case-folded to find it, so KEEPCASE roots don't count.
    pub folded: bool,
    /// Looking for suggestions, so NOSUGGEST roots and affixes don't count.
    pub suggesting: bool,
}

/// Reduces surface words to dictionary roots by undoing prefixes and
/// suffixes.
#[derive(Clone, Copy, Debug)]
pub struct AffixationEngine<'a> {
    words: &'a WordIndex,
    affix_data: &'a AffixData,
    filter: MatchFilter,
}

impl<'a> AffixationEngine<'a> {
    pub fn new(words: &'a WordIndex, affix_data: &'a AffixData, filter: MatchFilter) -> Self {
        AffixationEngine {
            words,
            affix_data,
            filter,
        }
    }

    /// Return the root of the first valid standalone decomposition of `word`.
    pub fn try_reduce(&self, word: &str) -> Option<&'a WordEntry> {
        let mut root = None;
        self.for_each_decomposition(word, Position::Standalone, |m| {
            root = Some(m.root);
            true
        });
        root
    }

    /// Is `word` valid at position `pos`, directly or with affixes?
    pub fn accepts(&self, word: &str, pos: Position) -> bool {
        self.for_each_decomposition(word, pos, |_| true)
    }

    /// Call `found` with every decomposition of `word` that is valid at
    /// position `pos`. Bare roots come first, then suffixed words, then
    /// prefixed words. Stops and returns true when `found` returns true.
    pub fn for_each_decomposition(
        &self,
        word: &str,
        pos: Position,
        mut found: impl FnMut(AffixMatch<'a>) -> bool,
    ) -> bool {
        for root in self.words.lookup(word) {
            let m = AffixMatch::bare(root);
            if self.is_allowed(&m, pos) && found(m) {
                return true;
            }
        }
        if self.affix_data.affixes.is_empty() {
            return false;
        }
        self.check_suffixes(word, None, pos, &mut found) || self.check_prefixes(word, pos, &mut found)
    }

    /// Does the part of the word outside an affix's `add` leave enough behind?
    fn leaves_stem(&self, word: &str, add: &str) -> bool {
        word.len() > add.len() || self.affix_data.fullstrip
    }

    fn check_prefixes<F>(&self, word: &str, pos: Position, found: &mut F) -> bool
    where
        F: FnMut(AffixMatch<'a>) -> bool,
    {
        let mut committed: SmallVec<[(EntryRef, &AffixEntry); 4]> = SmallVec::new();
        self.affix_data.affixes.for_each_prefix(word, |eref, prefix| {
            if !self.leaves_stem(word, &prefix.add) {
                return false;
            }
            let stem = format!("{}{}", prefix.strip, &word[prefix.add.len()..]);
            if is_committed(&committed, eref, prefix) {
                return false;
            }
            // With a suffix still attached, the condition is checked
            // later on the root.
            if prefix.condition.prefix_match(&stem) {
                committed.push((eref, prefix));
                for root in self.words.lookup(&stem) {
                    if !root.has_flag(prefix.flag) {
                        continue;
                    }
                    let m = AffixMatch {
                        prefix: Some(prefix),
                        ..AffixMatch::bare(root)
                    };
                    if self.is_allowed(&m, pos) && found(m) {
                        return true;
                    }
                }
            }
            prefix.cross_product && self.check_suffixes(&stem, Some(prefix), pos, found)
        })
    }

    fn check_suffixes<F>(
        &self,
        word: &str,
        prefix: Option<&'a AffixEntry>,
        pos: Position,
        found: &mut F,
    ) -> bool
    where
        F: FnMut(AffixMatch<'a>) -> bool,
    {
        let mut committed: SmallVec<[(EntryRef, &AffixEntry); 4]> = SmallVec::new();
        self.affix_data.affixes.for_each_suffix(word, |eref, suffix| {
            if prefix.is_some() && !suffix.cross_product {
                return false;
            }
            if !self.leaves_stem(word, &suffix.add) {
                return false;
            }
            let stem = format!("{}{}", &word[..word.len() - suffix.add.len()], suffix.strip);
            if !suffix.condition.suffix_match(&stem)
                || prefix.is_some_and(|p| !p.condition.prefix_match(&stem))
                || is_committed(&committed, eref, suffix)
            {
                return false;
            }
            committed.push((eref, suffix));

            for root in self.words.lookup(&stem) {
                if !carries_flags(root, prefix, suffix) {
                    continue;
                }
                let m = AffixMatch {
                    prefix,
                    suffix: Some(suffix),
                    ..AffixMatch::bare(root)
                };
                if self.is_allowed(&m, pos) && found(m) {
                    return true;
                }
            }
            prefix.is_none() && self.check_inner_suffixes(&stem, suffix, pos, found)
        })
    }

    /// The second level of suffixing: `word` is what remains after removing
    /// `outer`, and it must itself be a root with a suffix whose
    /// continuation flags allow `outer`.
    fn check_inner_suffixes<F>(
        &self,
        word: &str,
        outer: &'a AffixEntry,
        pos: Position,
        found: &mut F,
    ) -> bool
    where
        F: FnMut(AffixMatch<'a>) -> bool,
    {
        self.affix_data.affixes.for_each_suffix(word, |_, inner| {
            if !inner.has_cont_flag(outer.flag) || !self.leaves_stem(word, &inner.add) {
                return false;
            }
            let stem = format!("{}{}", &word[..word.len() - inner.add.len()], inner.strip);
            if !inner.condition.suffix_match(&stem) {
                return false;
            }
            for root in self.words.lookup(&stem) {
                if !root.has_flag(inner.flag) {
                    continue;
                }
                let m = AffixMatch {
                    suffix: Some(inner),
                    outer_suffix: Some(outer),
                    ..AffixMatch::bare(root)
                };
                if self.is_allowed(&m, pos) && found(m) {
                    return true;
                }
            }
            false
        })
    }

    /// Apply the flag rules that decide whether a decomposition counts.
    fn is_allowed(&self, m: &AffixMatch, pos: Position) -> bool {
        let root_flags = m.root.word_flags();
        if root_flags.contains(WordFlags::Forbidden) {
            return false;
        }
        if self.filter.folded && root_flags.contains(WordFlags::KeepCase) {
            return false;
        }
        if self.filter.suggesting
            && (root_flags.contains(WordFlags::NoSuggest)
                || m.affixes().any(|a| a.word_flags().contains(WordFlags::NoSuggest)))
        {
            return false;
        }

        if m.is_affixed() {
            if m.affixes().all(|a| a.word_flags().contains(WordFlags::NeedAffix)) {
                return false;
            }
        } else if root_flags.contains(WordFlags::NeedAffix) {
            return false;
        }

        let prefix_circumfix = m
            .prefix
            .map_or(false, |a| a.word_flags().contains(WordFlags::Circumfix));
        let suffix_circumfix = m
            .suffix
            .into_iter()
            .chain(m.outer_suffix)
            .any(|a| a.word_flags().contains(WordFlags::Circumfix));
        if prefix_circumfix != suffix_circumfix {
            return false;
        }

        if !pos.in_compound() {
            return !root_flags.contains(WordFlags::OnlyInCompound)
                && !m
                    .affixes()
                    .any(|a| a.word_flags().contains(WordFlags::OnlyInCompound));
        }

        for affix in m.affixes() {
            let wf = affix.word_flags();
            if wf.contains(WordFlags::CompoundForbid) {
                return false;
            }
        }
        if let Some(prefix) = m.prefix {
            if pos != Position::CompoundBegin
                && !prefix.word_flags().contains(WordFlags::CompoundPermit)
            {
                return false;
            }
        }
        if m.has_suffix()
            && pos != Position::CompoundEnd
            && !m
                .suffix
                .into_iter()
                .chain(m.outer_suffix)
                .all(|a| a.word_flags().contains(WordFlags::CompoundPermit))
        {
            return false;
        }

        let wanted = WordFlags::CompoundFlag | pos.compound_flag();
        root_flags.intersects(wanted) || m.affixes().any(|a| a.word_flags().intersects(wanted))
    }
}

/// The root must carry the suffix's flag and, for a cross product, the
/// prefix's flag. Either flag may instead come from the other affix's
/// continuation flags.
fn carries_flags(root: &WordEntry, prefix: Option<&AffixEntry>, suffix: &AffixEntry) -> bool {
    let suffix_ok = root.has_flag(suffix.flag)
        || prefix.map_or(false, |p| p.has_cont_flag(suffix.flag));
    let prefix_ok = match prefix {
        Some(p) => root.has_flag(p.flag) || suffix.has_cont_flag(p.flag),
        None => true,
    };
    suffix_ok && prefix_ok
}

/// Within one rule, the first entry whose condition matches commits a
/// given strip/add pair; later entries with the same effect are skipped.
fn is_committed(committed: &[(EntryRef, &AffixEntry)], eref: EntryRef, entry: &AffixEntry) -> bool {
    committed.iter().any(|(r, e)| {
        r.rule == eref.rule
            && e.strip == entry.strip
            && e.add == entry.add
            && e.cont_flags == entry.cont_flags
    })
}
