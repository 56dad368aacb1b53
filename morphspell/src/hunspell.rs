use anyhow::{Context, Result};
use rayon::prelude::*;

mod affixation;
mod affixdata;
mod casing;
mod checkpattern;
mod compound;
mod compoundrule;
mod condition;
mod flags;
mod morph;
mod parse_aff;
mod parse_dic;
mod replacements;
mod suggcollector;
mod suggestions;
mod wordflags;
mod wordindex;

pub use crate::hunspell::affixation::{AffixMatch, AffixationEngine, MatchFilter, Position};
pub use crate::hunspell::affixdata::{
    AffixData, AffixEntry, AffixKind, AffixRule, AffixTable, SpecialFlags,
};
pub use crate::hunspell::casing::{CapStyle, CaseHandling};
pub use crate::hunspell::checkpattern::CompoundPattern;
pub use crate::hunspell::compound::{CompoundEngine, CompoundSegment};
pub use crate::hunspell::compoundrule::CompoundRule;
pub use crate::hunspell::condition::AffixCondition;
pub use crate::hunspell::flags::{Flag, FlagMode, FlagSet};
pub use crate::hunspell::morph::MorphField;
pub use crate::hunspell::parse_aff::parse_affix_data;
pub use crate::hunspell::parse_dic::parse_dic_line;
pub use crate::hunspell::replacements::Replacements;
pub use crate::hunspell::wordflags::WordFlags;
pub use crate::hunspell::wordindex::{WordEntry, WordIndex};

use crate::error::SpellError;
use crate::hunspell::morph::{format_analysis, format_compound_analysis};
use crate::hunspell::parse_dic::new_entry;
use crate::hunspell::suggcollector::SuggCollector;
use crate::hunspell::suggestions::{
    add_char_suggestions, delete_char_suggestions, keyboard_suggestions,
    related_char_suggestions, split_word_suggestions, swap_char_suggestions,
    try_char_suggestions,
};
use crate::Speller;

/// A limit on the recursive attempts to break a word at breakpoints such as -
const MAX_WORD_BREAK_ATTEMPTS: u16 = 1000;
/// A limit on the number of stems or analyses reported for one word
const MAX_ANALYSES: usize = 100;

const BYTE_ORDER_MARK: char = '\u{FEFF}';

/// A speller that uses Hunspell dictionaries
#[derive(Clone, Debug)]
pub struct SpellerHunspellDict {
    affix_data: AffixData,
    words: WordIndex,
}

impl SpellerHunspellDict {
    /// Returns a Speller that uses the text of a Hunspell-format
    /// dictionary and affix file.
    ///
    /// Lines that can't be parsed are skipped. They can be inspected
    /// afterward with `get_errors`.
    pub fn new(dictionary: &str, affixes: &str) -> Result<Self> {
        let affix_data =
            parse_affix_data(affixes).context("Could not load affix data")?;
        let mut dict = Self::from_parts(affix_data, WordIndex::new());
        dict.load_words(dictionary);
        tracing::debug!(
            words = dict.words.len(),
            prefixes = dict.affix_data.affixes.prefixes().len(),
            suffixes = dict.affix_data.affixes.suffixes().len(),
            errors = dict.affix_data.errors.len(),
            "loaded dictionary"
        );
        Ok(dict)
    }

    /// Returns a Speller built from already prepared tables.
    /// The entries' special flags are taken from `affix_data.special_flags`.
    pub fn from_parts(mut affix_data: AffixData, mut words: WordIndex) -> Self {
        affix_data.affixes.derive_word_flags(&affix_data.special_flags);
        words.derive_word_flags(&affix_data.special_flags);
        SpellerHunspellDict { affix_data, words }
    }

    fn load_words(&mut self, text: &str) {
        let text = text.strip_prefix(BYTE_ORDER_MARK).unwrap_or(text);
        // Skip the first line because it's just the number of words
        for (n, line) in text.lines().enumerate().skip(1) {
            if line.starts_with('\t') || line.trim().is_empty() {
                // comment
                continue;
            }
            match parse_dic_line(line, &self.affix_data) {
                Ok(entry) => self.words.add(entry),
                Err(e) => self.affix_data.report(n + 1, e),
            }
        }
    }

    /// Problems found while loading that did not stop the load.
    pub fn get_errors(&self) -> &[SpellError] {
        &self.affix_data.errors
    }

    pub fn words(&self) -> &WordIndex {
        &self.words
    }

    pub fn affix_data(&self) -> &AffixData {
        &self.affix_data
    }

    /// Apply input conversion and remove ignored characters.
    fn prepare(&self, word: &str) -> String {
        let word = self.affix_data.iconv.conv(word.trim());
        self.affix_data.strip_ignored(&word)
    }

    fn is_numeric(word: &str) -> bool {
        // allow numbers with dots or commas
        // allow -- at the end and - at the front
        let word = word.strip_suffix("--").unwrap_or(word);
        let word = word.strip_prefix('-').unwrap_or(word);
        if word.is_empty() {
            return false;
        }
        let mut seen_digit = false;
        for c in word.chars() {
            if c == '.' || c == ',' {
                if !seen_digit {
                    return false;
                }
                seen_digit = false;
            } else if c.is_ascii_digit() {
                seen_digit = true;
            } else {
                return false;
            }
        }
        true
    }

    /// A word is forbidden if all of its homonyms are.
    fn is_forbidden(&self, word: &str) -> bool {
        match self.affix_data.special_flags.forbidden {
            Some(flag) => self.words.all_homonyms_have_flag(word, flag),
            None => false,
        }
    }

    /// The forms of `word` to look up, in order, and whether each
    /// one is case-folded.
    fn case_variants(&self, word: &str) -> Vec<(String, bool)> {
        let case = self.affix_data.case_handling;
        let mut v = vec![(word.to_string(), false)];
        match CapStyle::from_str(word) {
            CapStyle::Capitalized => v.push((case.lowercase(word), true)),
            CapStyle::AllCaps => {
                v.push((case.lowercase(word), true));
                v.push((case.titlecase(word), true));
            }
            _ => (),
        }
        v
    }

    /// Check a word against the dictionary, with affixes or as a compound
    fn check_exact(&self, word: &str, filter: MatchFilter) -> bool {
        AffixationEngine::new(&self.words, &self.affix_data, filter)
            .accepts(word, Position::Standalone)
            || CompoundEngine::new(&self.words, &self.affix_data, filter)
                .is_valid_compound(word)
    }

    /// Check a word in its own case and in the case-folded forms
    fn _spellcheck_cased(&self, word: &str, suggesting: bool) -> bool {
        self.case_variants(word).into_iter().any(|(variant, folded)| {
            if folded && self.is_forbidden(&variant) {
                return false;
            }
            self.check_exact(&variant, MatchFilter { folded, suggesting })
        })
    }

    // Check a word against the dictionary and try word breaks and affixes
    fn _spellcheck(&self, word: &str, suggesting: bool, count: &mut u16) -> bool {
        if *count > MAX_WORD_BREAK_ATTEMPTS {
            return false;
        }
        *count += 1;

        if self._spellcheck_cased(word, suggesting) {
            return true;
        }

        // break patterns may be anchored with ^ or $
        // Try those first.
        for brk in self.affix_data.word_breaks.iter() {
            if let Some(brk) = brk.strip_prefix('^') {
                if let Some(bword) = word.strip_prefix(brk) {
                    if !bword.is_empty() && self._spellcheck(bword, suggesting, count) {
                        return true;
                    }
                }
            } else if let Some(brk) = brk.strip_suffix('$') {
                if let Some(bword) = word.strip_suffix(brk) {
                    if !bword.is_empty() && self._spellcheck(bword, suggesting, count) {
                        return true;
                    }
                }
            }
        }

        // Try breaking words into pieces.
        for brk in self.affix_data.word_breaks.iter() {
            if brk.starts_with('^') || brk.ends_with('$') {
                continue;
            }
            if let Some((worda, wordb)) = word.split_once(brk.as_str()) {
                if !worda.is_empty()
                    && !wordb.is_empty()
                    && self._spellcheck(worda, suggesting, count)
                    && self._spellcheck(wordb, suggesting, count)
                {
                    return true;
                }
            }
        }
        false
    }

    /// Is `sugg` good enough to offer as a suggestion? Forbidden and
    /// NOSUGGEST words are not.
    pub(crate) fn check_suggestion(&self, sugg: &str) -> bool {
        if self.is_forbidden(sugg) {
            return false;
        }
        let mut count = 0u16;
        if self._spellcheck(sugg, true, &mut count) {
            return true;
        }

        // If the suggestion is two words, check both
        if let Some((worda, wordb)) = sugg.split_once(' ') {
            !worda.is_empty()
                && !wordb.is_empty()
                && self.check_suggestion(worda)
                && self.check_suggestion(wordb)
        } else {
            false
        }
    }

    /// Collect one string per way of building `word`: `simple` formats
    /// affix decompositions and `compound` formats compound divisions.
    /// Compounds are only considered for forms with no decompositions.
    fn collect_analyses(
        &self,
        word: &str,
        simple: impl Fn(&AffixMatch) -> String,
        compound: impl Fn(&[CompoundSegment]) -> String,
    ) -> Vec<String> {
        let word = self.prepare(word);
        let mut results: Vec<String> = Vec::new();
        if word.is_empty() || self.is_forbidden(&word) {
            return results;
        }
        let mut add = |s: String| {
            if !results.contains(&s) {
                results.push(s);
            }
            results.len() >= MAX_ANALYSES
        };
        for (variant, folded) in self.case_variants(&word) {
            if folded && self.is_forbidden(&variant) {
                continue;
            }
            let filter = MatchFilter {
                folded,
                suggesting: false,
            };
            let mut found_any = false;
            let engine = AffixationEngine::new(&self.words, &self.affix_data, filter);
            if engine.for_each_decomposition(&variant, Position::Standalone, |m| {
                found_any = true;
                add(simple(&m))
            }) {
                break;
            }
            if !found_any {
                let engine = CompoundEngine::new(&self.words, &self.affix_data, filter);
                if engine.compound_parts(&variant, |parts| add(compound(parts))) {
                    break;
                }
            }
        }
        results
    }

    /// Accept `word` into the dictionary as a new homonym with the given
    /// flags and morphological fields. An identical entry is not added
    /// twice. Returns false if the word is empty.
    pub fn add_entry(&mut self, word: &str, flags: FlagSet, morph: Vec<MorphField>) -> bool {
        let word = self.prepare(word);
        if word.is_empty() {
            return false;
        }
        let entry = new_entry(&self.affix_data, &word, flags, morph);
        if !self.words.lookup(&entry.stem).contains(&entry) {
            self.words.add(entry);
        }
        true
    }

    /// Accept `word` into the dictionary with the given flags, written in
    /// the dictionary's flag format.
    pub fn add_word_with_flags(&mut self, word: &str, flags: &str) -> Result<bool, SpellError> {
        let flags = self.affix_data.parse_flags(flags)?;
        Ok(self.add_entry(word, flags, Vec::new()))
    }

    /// Accept `word` into the dictionary with the same flags and
    /// morphological fields as `example`, so that it takes the same
    /// affixes. Returns false if `example` is not in the dictionary.
    pub fn add_word_with_affix(&mut self, word: &str, example: &str) -> bool {
        let example = self.prepare(example);
        let Some(model) = self.words.lookup(&example).first() else {
            return false;
        };
        let (flags, morph) = (model.flags.clone(), model.morph.clone());
        self.add_entry(word, flags, morph)
    }

    /// Remove the homonyms of `word` for which `pred` returns true.
    /// Returns the number of entries removed.
    pub fn remove_word_matching(
        &mut self,
        word: &str,
        pred: impl FnMut(&WordEntry) -> bool,
    ) -> usize {
        let word = self.prepare(word);
        self.words.remove_matching(&word, pred)
    }

    /// Check many words at once, in parallel.
    pub fn check_words(&self, words: &[&str]) -> Vec<bool> {
        words.par_iter().map(|word| self.spellcheck(word)).collect()
    }
}

impl Speller for SpellerHunspellDict {
    fn spellcheck(&self, word: &str) -> bool {
        let word = self.prepare(word);
        if word.is_empty() || Self::is_numeric(&word) {
            return true;
        }
        if self.is_forbidden(&word) {
            return false;
        }
        let mut count = 0u16;
        self._spellcheck(&word, false, &mut count)
    }

    fn suggestions(&self, word: &str, max: usize) -> Vec<String> {
        let word = self.prepare(word);
        if word.is_empty() || max == 0 {
            return Vec::new();
        }
        let case = self.affix_data.case_handling;
        let mut collector = SuggCollector::new(self, &word, max);

        // Try capitalized, lowercased, or all caps
        collector.new_source("case");
        collector.suggest_exact(&case.titlecase(&word));
        collector.suggest_exact(&case.lowercase(&word));
        collector.suggest_exact(&case.uppercase(&word));

        if let Some(keyboard) = &self.affix_data.keyboard_string {
            collector.new_source("keyboard");
            keyboard_suggestions(keyboard, &word, |sugg| {
                collector.suggest(&sugg);
                !collector.limit()
            });
        }

        collector.new_source("map");
        related_char_suggestions(&self.affix_data.related_chars, &word, |sugg| {
            collector.suggest(&sugg);
            !collector.limit()
        });

        if let Some(try_chars) = &self.affix_data.try_string {
            collector.new_source("try");
            try_char_suggestions(&word, try_chars, |sugg| {
                collector.suggest(&sugg);
                !collector.limit()
            });
        }

        collector.new_source("swap");
        swap_char_suggestions(&word, |sugg| {
            collector.suggest(&sugg);
            !collector.limit()
        });

        collector.new_source("delete");
        delete_char_suggestions(&word, |sugg| {
            collector.suggest(&sugg);
            !collector.limit()
        });

        if let Some(try_chars) = &self.affix_data.try_string {
            collector.new_source("insert");
            add_char_suggestions(&word, try_chars, |sugg| {
                collector.suggest(&sugg);
                !collector.limit()
            });
        }

        collector.new_source("split");
        split_word_suggestions(&word, |sugg| {
            collector.suggest(&sugg);
            !collector.limit()
        });

        collector.new_source("rep");
        self.affix_data.replacements.suggest(&word, |sugg| {
            collector.suggest(&sugg);
            !collector.limit()
        });

        collector
            .into_iter()
            .map(|sugg| self.affix_data.oconv.conv(&sugg))
            .collect()
    }

    fn stem(&self, word: &str) -> Vec<String> {
        self.collect_analyses(
            word,
            |m| m.root.stem.clone(),
            |parts| {
                let mut stem = String::new();
                if let Some((last, init)) = parts.split_last() {
                    for part in init {
                        stem.push_str(&part.text);
                    }
                    stem.push_str(&last.matched.root.stem);
                }
                stem
            },
        )
    }

    fn analyze(&self, word: &str) -> Vec<String> {
        self.collect_analyses(word, format_analysis, format_compound_analysis)
    }

    fn add_word(&mut self, word: &str) -> bool {
        self.add_entry(word, FlagSet::new(), Vec::new())
    }

    fn remove_word(&mut self, word: &str) -> bool {
        let word = self.prepare(word);
        self.words.remove(&word) > 0
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_is_numeric() {
        assert_eq!(true, SpellerHunspellDict::is_numeric("54"));
        assert_eq!(true, SpellerHunspellDict::is_numeric("-1,000.00"));
        assert_eq!(true, SpellerHunspellDict::is_numeric("-1,000.--"));
        assert_eq!(false, SpellerHunspellDict::is_numeric("1,ooo"));
        assert_eq!(false, SpellerHunspellDict::is_numeric("100,,000"));
        assert_eq!(false, SpellerHunspellDict::is_numeric(".."));
        assert_eq!(false, SpellerHunspellDict::is_numeric(".50"));
        assert_eq!(false, SpellerHunspellDict::is_numeric("-"));
    }

    #[test]
    fn test_case_variants() {
        let dict = SpellerHunspellDict::new("0\n", "").unwrap();
        let variants = |w: &str| {
            dict.case_variants(w)
                .into_iter()
                .map(|(v, _)| v)
                .collect::<Vec<_>>()
        };
        assert_eq!(vec!["hello"], variants("hello"));
        assert_eq!(vec!["Hello", "hello"], variants("Hello"));
        assert_eq!(vec!["HELLO", "hello", "Hello"], variants("HELLO"));
        assert_eq!(vec!["McDonald"], variants("McDonald"));
    }

    #[test]
    fn test_word_breaks() {
        let dict = SpellerHunspellDict::new(
            "2\nfoo\nbar\n",
            "BREAK 2\nBREAK -\nBREAK ^-\n",
        )
        .unwrap();
        assert!(dict.spellcheck("foo-bar"));
        assert!(dict.spellcheck("-foo"));
        assert!(!dict.spellcheck("foo-baz"));
        assert!(!dict.spellcheck("foo-"));
    }
}
