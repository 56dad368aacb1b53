use fnv::FnvHashSet;

use crate::affix_trie::{PrefixTrie, SuffixTrie};
use crate::error::SpellError;
use crate::hunspell::casing::CaseHandling;
use crate::hunspell::checkpattern::CompoundPattern;
use crate::hunspell::compoundrule::CompoundRule;
use crate::hunspell::condition::AffixCondition;
use crate::hunspell::flags::{Flag, FlagMode, FlagSet};
use crate::hunspell::morph::MorphField;
use crate::hunspell::replacements::Replacements;
use crate::hunspell::wordflags::WordFlags;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AffixKind {
    Prefix,
    Suffix,
}

/// One (strip, add, condition) transformation of an affix rule.
#[derive(Clone, Debug)]
pub struct AffixEntry {
    /// The flag of the rule this entry belongs to.
    pub flag: Flag,
    pub kind: AffixKind,
    /// Copied from the rule header.
    pub cross_product: bool,
    /// Removed from the stem before `add` is attached.
    pub strip: String,
    /// Attached to the stem to make the surface word.
    pub add: String,
    pub condition: AffixCondition,
    /// Flags carried by the affixed word, such as a second-level suffix
    /// that may follow this one.
    pub cont_flags: FlagSet,
    pub morph: Vec<MorphField>,
    word_flags: WordFlags,
}

impl AffixEntry {
    pub fn new(
        rule: &AffixRule,
        strip: &str,
        add: &str,
        condition: AffixCondition,
        cont_flags: FlagSet,
        morph: Vec<MorphField>,
    ) -> Self {
        AffixEntry {
            flag: rule.flag,
            kind: rule.kind,
            cross_product: rule.cross_product,
            strip: strip.to_string(),
            add: add.to_string(),
            condition,
            cont_flags,
            morph,
            word_flags: WordFlags::empty(),
        }
    }

    pub(crate) fn word_flags(&self) -> WordFlags {
        self.word_flags
    }

    pub fn has_cont_flag(&self, flag: Flag) -> bool {
        self.cont_flags.contains(flag)
    }
}

/// All the entries declared under one PFX or SFX flag.
#[derive(Clone, Debug)]
pub struct AffixRule {
    pub flag: Flag,
    pub kind: AffixKind,
    pub cross_product: bool,
    pub entries: Vec<AffixEntry>,
}

impl AffixRule {
    pub fn new(kind: AffixKind, flag: Flag, cross_product: bool) -> Self {
        AffixRule {
            flag,
            kind,
            cross_product,
            entries: Vec::new(),
        }
    }
}

/// Identifies an entry as (rule, entry) indexes into one of the rule lists.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct EntryRef {
    pub rule: u32,
    pub entry: u32,
}

/// The prefix and suffix rules in declaration order, indexed by their
/// `add` strings so that only the entries that can match a word are tried.
#[derive(Clone, Debug, Default)]
pub struct AffixTable {
    prefixes: Vec<AffixRule>,
    suffixes: Vec<AffixRule>,
    prefix_index: PrefixTrie<EntryRef>,
    suffix_index: SuffixTrie<EntryRef>,
    /// First characters of the prefixes' `add` strings
    prefix_starts: FnvHashSet<char>,
    /// Some prefix adds nothing, so a prefixed word may start with anything
    prefix_adds_nothing: bool,
}

impl AffixTable {
    pub fn new(prefixes: Vec<AffixRule>, suffixes: Vec<AffixRule>) -> Self {
        let mut table = AffixTable {
            prefixes,
            suffixes,
            ..Default::default()
        };
        for (r, rule) in table.prefixes.iter().enumerate() {
            for (e, entry) in rule.entries.iter().enumerate() {
                let eref = EntryRef {
                    rule: r as u32,
                    entry: e as u32,
                };
                table.prefix_index.insert(&entry.add, eref);
                match entry.add.chars().next() {
                    Some(c) => {
                        table.prefix_starts.insert(c);
                    }
                    None => table.prefix_adds_nothing = true,
                }
            }
        }
        for (r, rule) in table.suffixes.iter().enumerate() {
            for (e, entry) in rule.entries.iter().enumerate() {
                let eref = EntryRef {
                    rule: r as u32,
                    entry: e as u32,
                };
                table.suffix_index.insert(&entry.add, eref);
            }
        }
        table
    }

    pub fn prefixes(&self) -> &[AffixRule] {
        &self.prefixes
    }

    pub fn suffixes(&self) -> &[AffixRule] {
        &self.suffixes
    }

    /// Recompute the special flags of every entry from its continuation
    /// flags.
    pub(crate) fn derive_word_flags(&mut self, special: &SpecialFlags) {
        for rule in self.prefixes.iter_mut().chain(self.suffixes.iter_mut()) {
            for entry in rule.entries.iter_mut() {
                entry.word_flags = special.word_flags(&entry.cont_flags);
            }
        }
    }

    fn entry(&self, kind: AffixKind, eref: EntryRef) -> &AffixEntry {
        let rules = match kind {
            AffixKind::Prefix => &self.prefixes,
            AffixKind::Suffix => &self.suffixes,
        };
        &rules[eref.rule as usize].entries[eref.entry as usize]
    }

    /// Calls `found` for each prefix entry whose `add` starts `word`,
    /// shortest first and in declaration order for equal adds.
    pub(crate) fn for_each_prefix<'a>(
        &'a self,
        word: &str,
        mut found: impl FnMut(EntryRef, &'a AffixEntry) -> bool,
    ) -> bool {
        self.prefix_index.lookup(word, |eref| {
            found(eref, self.entry(AffixKind::Prefix, eref))
        })
    }

    /// Calls `found` for each suffix entry whose `add` ends `word`,
    /// shortest first and in declaration order for equal adds.
    pub(crate) fn for_each_suffix<'a>(
        &'a self,
        word: &str,
        mut found: impl FnMut(EntryRef, &'a AffixEntry) -> bool,
    ) -> bool {
        self.suffix_index.lookup(word, |eref| {
            found(eref, self.entry(AffixKind::Suffix, eref))
        })
    }

    /// Could a prefixed word start with `c`?
    pub fn may_begin_word(&self, c: char) -> bool {
        self.prefix_adds_nothing || self.prefix_starts.contains(&c)
    }

    pub fn is_empty(&self) -> bool {
        self.prefixes.is_empty() && self.suffixes.is_empty()
    }
}

/// The flags with a special meaning, as declared in the affix file.
#[derive(Clone, Debug, Default)]
pub struct SpecialFlags {
    pub forbidden: Option<Flag>,
    pub compound_flag: Option<Flag>,
    pub compound_begin: Option<Flag>,
    pub compound_middle: Option<Flag>,
    pub compound_end: Option<Flag>,
    pub compound_permit: Option<Flag>,
    pub compound_forbid: Option<Flag>,
    pub only_in_compound: Option<Flag>,
    pub no_suggest: Option<Flag>,
    pub circumfix: Option<Flag>,
    pub need_affix: Option<Flag>,
    pub keep_case: Option<Flag>,
}

impl SpecialFlags {
    pub fn word_flags(&self, flags: &FlagSet) -> WordFlags {
        let table = [
            (self.forbidden, WordFlags::Forbidden),
            (self.compound_flag, WordFlags::CompoundFlag),
            (self.compound_begin, WordFlags::CompoundBegin),
            (self.compound_middle, WordFlags::CompoundMiddle),
            (self.compound_end, WordFlags::CompoundEnd),
            (self.compound_permit, WordFlags::CompoundPermit),
            (self.compound_forbid, WordFlags::CompoundForbid),
            (self.only_in_compound, WordFlags::OnlyInCompound),
            (self.no_suggest, WordFlags::NoSuggest),
            (self.circumfix, WordFlags::Circumfix),
            (self.need_affix, WordFlags::NeedAffix),
            (self.keep_case, WordFlags::KeepCase),
        ];
        let mut wf = WordFlags::empty();
        for (flag, bit) in table {
            if flags.contains_opt(flag) {
                wf |= bit;
            }
        }
        wf
    }

    /// Is any of the flag-based compounding flags declared?
    pub fn compounding(&self) -> bool {
        self.compound_flag.is_some()
            || self.compound_begin.is_some()
            || self.compound_middle.is_some()
            || self.compound_end.is_some()
    }
}

/// Everything an affix file configures: the affix rules themselves and
/// the options that steer checking, compounding and suggestions.
#[derive(Clone, Debug)]
pub struct AffixData {
    /// The prefix and suffix rules
    pub affixes: AffixTable,
    /// Replacements to try when suggesting words
    pub replacements: Replacements,
    /// The valid formats for flags used in this affix file
    pub flag_mode: FlagMode,
    /// The flags with special meanings
    pub special_flags: SpecialFlags,
    /// How to change the case of words, depends on the language
    pub case_handling: CaseHandling,
    /// keyboard layout, used to suggest spelling fixes.
    pub keyboard_string: Option<String>,
    /// letters to try when suggesting fixes, from common to rare.
    pub try_string: Option<String>,
    /// characters removed from words and stems before matching.
    pub ignore_chars: Vec<char>,
    /// The minimum length of words in compound words.
    pub compound_min: u8,
    /// The maximum number of words in a compound word.
    pub compound_word_max: Option<u16>,
    /// Forbid the same word twice in a row in a compound.
    pub check_compound_dup: bool,
    /// Forbid uppercase letters at compound boundaries, unless the whole
    /// word is written in one case.
    pub check_compound_case: bool,
    /// Forbid three equal letters across a compound boundary.
    pub check_compound_triple: bool,
    /// Patterns that forbid or rewrite compound boundaries.
    pub compound_patterns: Vec<CompoundPattern>,
    /// Compound grammars over word flags, like `n*1t`.
    pub compound_rules: Vec<CompoundRule>,
    /// Conversions applied to input words before matching.
    pub iconv: Replacements,
    /// Conversions applied to suggestions before returning them.
    pub oconv: Replacements,
    /// Groups of related characters, used when suggesting.
    pub related_chars: Vec<String>,
    /// Strings at which words may be broken into separately checked parts.
    pub word_breaks: Vec<String>,
    /// Flag sets that can be referred to by number (AF).
    pub flag_aliases: Vec<FlagSet>,
    /// Morphological fields that can be referred to by number (AM).
    pub morph_aliases: Vec<Vec<MorphField>>,
    /// Allow affixes to completely remove a root
    pub fullstrip: bool,
    /// Problems found while loading, which did not stop the load.
    pub errors: Vec<SpellError>,
}

impl Default for AffixData {
    fn default() -> Self {
        AffixData {
            affixes: AffixTable::default(),
            replacements: Replacements::default(),
            flag_mode: FlagMode::CharFlags,
            special_flags: SpecialFlags::default(),
            case_handling: CaseHandling::default(),
            keyboard_string: None,
            try_string: None,
            ignore_chars: Vec::new(),
            compound_min: 3,
            compound_word_max: None,
            check_compound_dup: false,
            check_compound_case: false,
            check_compound_triple: false,
            compound_patterns: Vec::new(),
            compound_rules: Vec::new(),
            iconv: Replacements::default(),
            oconv: Replacements::default(),
            related_chars: Vec::new(),
            word_breaks: Vec::new(),
            flag_aliases: Vec::new(),
            morph_aliases: Vec::new(),
            fullstrip: false,
            errors: Vec::new(),
        }
    }
}

impl AffixData {
    pub fn new() -> Self {
        AffixData::default()
    }

    /// COMPOUNDMIN 0 behaves as 1
    pub fn effective_compound_min(&self) -> usize {
        usize::from(self.compound_min.max(1))
    }

    /// Parse a word's or affix's flags, resolving AF aliases.
    pub fn parse_flags(&self, flags: &str) -> Result<FlagSet, SpellError> {
        if !self.flag_aliases.is_empty() && !flags.is_empty() {
            if let Ok(n) = flags.parse::<usize>() {
                return match n.checked_sub(1).and_then(|i| self.flag_aliases.get(i)) {
                    Some(set) => Ok(set.clone()),
                    None => Err(SpellError::malformed_flags(flags, "unknown flag alias")),
                };
            }
        }
        FlagSet::parse(flags, self.flag_mode)
    }

    /// Parse morphological fields, resolving AM aliases.
    pub fn parse_morph(&self, morph: &str) -> Vec<MorphField> {
        let morph = morph.trim();
        if !self.morph_aliases.is_empty() {
            if let Ok(n) = morph.parse::<usize>() {
                return n
                    .checked_sub(1)
                    .and_then(|i| self.morph_aliases.get(i))
                    .cloned()
                    .unwrap_or_default();
            }
        }
        MorphField::parse_list(morph)
    }

    /// Remove the IGNORE characters from `word`.
    pub fn strip_ignored(&self, word: &str) -> String {
        if self.ignore_chars.is_empty() {
            word.to_string()
        } else {
            word.chars()
                .filter(|c| !self.ignore_chars.contains(c))
                .collect()
        }
    }

    /// Record a problem that does not stop loading.
    pub(crate) fn report(&mut self, line: usize, error: SpellError) {
        tracing::warn!(line, "{}", error);
        self.errors.push(error.at_line(line));
    }
}
