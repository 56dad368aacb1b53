use std::str::CharIndices;

use crate::hunspell::affixation::{AffixMatch, AffixationEngine, MatchFilter, Position};
use crate::hunspell::affixdata::AffixData;
use crate::hunspell::checkpattern::CompoundPattern;
use crate::hunspell::flags::Flag;
use crate::hunspell::wordflags::WordFlags;
use crate::hunspell::wordindex::WordIndex;

/// One piece of a compound word, as found by the compound search.
#[derive(Clone, Debug)]
pub struct CompoundSegment<'a> {
    /// The word this piece stands for. This can differ from the surface
    /// text when the piece was joined through a replacement pattern.
    pub text: String,
    /// Byte range of the piece in the surface word.
    pub start: usize,
    pub end: usize,
    pub matched: AffixMatch<'a>,
    /// Set if this piece was joined to the previous one through a
    /// CHECKCOMPOUNDPATTERN replacement.
    pub via_pattern: Option<&'a CompoundPattern>,
}

impl<'a> CompoundSegment<'a> {
    pub fn is_affixed(&self) -> bool {
        self.matched.is_affixed()
    }
}

/// What to do after a segment has been matched.
#[derive(Clone, Copy, Debug)]
enum Next<'a> {
    Done,
    Continue {
        pos: usize,
        joined_by: Option<&'a CompoundPattern>,
    },
}

/// Splits words into two or more dictionary words, following the
/// compounding flags and checks of the affix file.
#[derive(Clone, Copy, Debug)]
pub struct CompoundEngine<'a> {
    words: &'a WordIndex,
    affix_data: &'a AffixData,
    filter: MatchFilter,
}

impl<'a> CompoundEngine<'a> {
    pub fn new(words: &'a WordIndex, affix_data: &'a AffixData, filter: MatchFilter) -> Self {
        CompoundEngine {
            words,
            affix_data,
            filter,
        }
    }

    /// Is `word` a valid compound, either by the compounding flags or by
    /// one of the COMPOUNDRULEs?
    pub fn is_valid_compound(&self, word: &str) -> bool {
        self.compound_parts(word, |_| true) || self.matches_compound_rule(word)
    }

    /// Call `found` with each valid division of `word` into compound
    /// parts, depth first. Stops and returns true when `found` returns true.
    pub fn compound_parts(
        &self,
        word: &str,
        mut found: impl FnMut(&[CompoundSegment<'a>]) -> bool,
    ) -> bool {
        if !self.affix_data.special_flags.compounding() || word.is_empty() {
            return false;
        }
        let mut parts = Vec::new();
        self.search(word, 0, None, &mut parts, &mut found)
    }

    fn search<F>(
        &self,
        word: &str,
        pos: usize,
        joined_by: Option<&'a CompoundPattern>,
        parts: &mut Vec<CompoundSegment<'a>>,
        found: &mut F,
    ) -> bool
    where
        F: FnMut(&[CompoundSegment<'a>]) -> bool,
    {
        let depth = parts.len();
        if let Some(max) = self.affix_data.compound_word_max {
            if depth >= usize::from(max) {
                return false;
            }
        }
        let carry = joined_by.map_or("", |p| p.begin_chars.as_str());
        let rest = &word[pos..];
        let Some(first) = carry.chars().chain(rest.chars()).next() else {
            return false;
        };
        if !self.words.may_begin_word(first) && !self.affix_data.affixes.may_begin_word(first) {
            return false;
        }
        let min = self.affix_data.effective_compound_min();
        let carry_len = carry.chars().count();
        let position = if depth == 0 {
            Position::CompoundBegin
        } else {
            Position::CompoundMiddle
        };

        for (n, (j, _)) in rest.char_indices().enumerate().skip(1) {
            let split = pos + j;
            if carry_len + n >= min {
                let text = format!("{}{}", carry, &rest[..j]);
                let next = Next::Continue {
                    pos: split,
                    joined_by: None,
                };
                if self.try_segment(word, text, pos, split, position, joined_by, next, parts, found)
                {
                    return true;
                }
            }
            for pattern in self.affix_data.compound_patterns.iter() {
                let Some(repl) = pattern.replacement.as_deref() else {
                    continue;
                };
                if repl.is_empty() || !rest[j..].starts_with(repl) {
                    continue;
                }
                let text = format!("{}{}{}", carry, &rest[..j], pattern.end_chars);
                if text.chars().count() < min {
                    continue;
                }
                let next = Next::Continue {
                    pos: split + repl.len(),
                    joined_by: Some(pattern),
                };
                if self.try_segment(word, text, pos, split, position, joined_by, next, parts, found)
                {
                    return true;
                }
            }
        }

        if depth > 0 && carry_len + rest.chars().count() >= min {
            let text = format!("{}{}", carry, rest);
            let end = word.len();
            return self.try_segment(
                word,
                text,
                pos,
                end,
                Position::CompoundEnd,
                joined_by,
                Next::Done,
                parts,
                found,
            );
        }
        false
    }

    #[allow(clippy::too_many_arguments)]
    fn try_segment<F>(
        &self,
        word: &str,
        text: String,
        start: usize,
        end: usize,
        position: Position,
        joined_by: Option<&'a CompoundPattern>,
        next: Next<'a>,
        parts: &mut Vec<CompoundSegment<'a>>,
        found: &mut F,
    ) -> bool
    where
        F: FnMut(&[CompoundSegment<'a>]) -> bool,
    {
        let engine = AffixationEngine::new(self.words, self.affix_data, self.filter);
        engine.for_each_decomposition(&text, position, |m| {
            if let Some(prev) = parts.last() {
                if !self.joins(word, prev, &text, &m, joined_by) {
                    return false;
                }
            }
            parts.push(CompoundSegment {
                text: text.clone(),
                start,
                end,
                matched: m,
                via_pattern: joined_by,
            });
            let done = match next {
                Next::Done => found(parts.as_slice()),
                Next::Continue { pos, joined_by } => {
                    self.search(word, pos, joined_by, parts, found)
                }
            };
            parts.pop();
            done
        })
    }

    /// Check the boundary between the previous part and a new one.
    fn joins(
        &self,
        word: &str,
        prev: &CompoundSegment<'a>,
        text: &str,
        m: &AffixMatch<'a>,
        joined_by: Option<&CompoundPattern>,
    ) -> bool {
        // A replacement join only has to satisfy its own flag conditions.
        if let Some(pattern) = joined_by {
            return pattern.flags_match(prev.matched.root, m.root);
        }

        let ad = self.affix_data;
        if ad
            .compound_patterns
            .iter()
            .any(|p| p.forbids(&prev.text, prev.matched.root, text, m.root))
        {
            return false;
        }
        if ad.check_compound_dup && prev.text == text {
            return false;
        }

        let mut left = prev.text.chars().rev();
        let mut right = text.chars();
        let (l1, l2) = (left.next(), left.next());
        let (r1, r2) = (right.next(), right.next());
        // A word written entirely in one case has no case mismatch to check.
        if ad.check_compound_case && !is_one_case(word) {
            if let (Some(a), Some(b)) = (l1, r1) {
                if (a.is_uppercase() || b.is_uppercase()) && a != '-' && b != '-' {
                    return false;
                }
            }
        }
        if ad.check_compound_triple && l1.is_some() && l1 == r1 && (l2 == l1 || r2 == r1) {
            return false;
        }
        true
    }

    /// Does a piece carry this COMPOUNDRULE flag? Any homonym will do.
    fn piece_has_flag(&self, piece: &str, flag: Flag) -> bool {
        self.words.lookup(piece).iter().any(|entry| {
            entry.has_flag(flag) && !entry.word_flags().contains(WordFlags::Forbidden)
        })
    }

    /// Is `word` made of dictionary words that match one of the
    /// COMPOUNDRULEs? The pieces are taken directly from the dictionary,
    /// without affixes.
    pub fn matches_compound_rule(&self, word: &str) -> bool {
        !self.affix_data.compound_rules.is_empty()
            && self._matches_compound_rule(word, &mut Vec::new(), word.char_indices())
    }

    fn _matches_compound_rule<'w>(
        &self,
        word: &'w str,
        v: &mut Vec<&'w str>,
        mut iter: CharIndices<'w>,
    ) -> bool {
        if let Some(max) = self.affix_data.compound_word_max {
            if v.len() > usize::from(max) {
                return false;
            }
        }
        let min = self.affix_data.effective_compound_min();
        let mut wlen = 0;
        let mut wstart = None;
        while let Some((i, c)) = iter.next() {
            let start = *wstart.get_or_insert(i);
            wlen += 1;
            if wlen < min {
                continue;
            }
            let piece = &word[start..i + c.len_utf8()];
            if !self.words.contains(piece) {
                continue;
            }
            // Found a possible word piece.
            // Only recurse if at least one rule would match these pieces.
            // This avoids a lot of backtracking for words that would never
            // work anyway.
            v.push(piece);
            let check = |piece: &str, flag| self.piece_has_flag(piece, flag);
            if self
                .affix_data
                .compound_rules
                .iter()
                .any(|rule| rule.partial_match(v, check))
                && self._matches_compound_rule(word, v, iter.clone())
            {
                return true;
            }
            // Then loop to try not using the piece.
            v.pop();
        }
        if wlen > 0 {
            // too-small or unknown leftover piece at the end
            return false;
        }
        v.len() >= 2
            && self
                .affix_data
                .compound_rules
                .iter()
                .any(|rule| rule.matches(v, |piece, flag| self.piece_has_flag(piece, flag)))
    }
}

fn is_one_case(word: &str) -> bool {
    !(word.chars().any(char::is_lowercase) && word.chars().any(char::is_uppercase))
}
