use crate::error::SpellError;
use crate::hunspell::flags::{Flag, FlagMode};

/// A COMPOUNDRULE: a sequence of flags, each optionally followed by
/// `*` (any number of words) or `?` (zero or one word). A compound
/// matches if its pieces, in order, carry the flags of the sequence.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CompoundRule {
    v: Vec<CompoundElement>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CompoundElement {
    Multi(Flag),
    Optional(Flag),
    Once(Flag),
}
use CompoundElement::*;

impl CompoundRule {
    /// Parse a rule. Flags that take more than one character to write
    /// have to be put in parentheses, as in `(aa)(bb)*`.
    pub fn from_str(s: &str, mode: FlagMode) -> Result<Self, SpellError> {
        let mut rule = CompoundRule { v: Vec::default() };
        let mut paren_start = None;
        for (i, c) in s.char_indices() {
            if let Some(ppos) = paren_start {
                if c == ')' {
                    rule.v.push(Once(mode.parse_single(&s[ppos..i])?));
                    paren_start = None;
                }
            } else if c == '(' {
                paren_start = Some(i + 1);
            } else if c == '*' || c == '?' {
                let node = match rule.v.pop() {
                    Some(Once(f)) if c == '*' => Multi(f),
                    Some(Once(f)) => Optional(f),
                    _ => {
                        return Err(SpellError::malformed_flags(
                            s,
                            "* and ? must follow a flag",
                        ));
                    }
                };
                rule.v.push(node);
            } else {
                rule.v.push(Once(mode.parse_single(&s[i..i + c.len_utf8()])?));
            }
        }
        if paren_start.is_some() {
            return Err(SpellError::malformed_flags(s, "unclosed parenthesis"));
        }
        Ok(rule)
    }

    /// Match `words` against the rule starting at element `pos`.
    /// With `partial`, it's enough that `words` can be the start of a
    /// sequence that matches.
    fn _matches(
        &self,
        words: &[&str],
        pos: usize,
        partial: bool,
        check: &impl Fn(&str, Flag) -> bool,
    ) -> bool {
        if let Some(word) = words.first() {
            match self.v.get(pos) {
                None => false,
                Some(Once(f)) => {
                    check(word, *f) && self._matches(&words[1..], pos + 1, partial, check)
                }
                Some(Optional(f)) => {
                    (check(word, *f) && self._matches(&words[1..], pos + 1, partial, check))
                        || self._matches(words, pos + 1, partial, check)
                }
                Some(Multi(f)) => {
                    (check(word, *f) && self._matches(&words[1..], pos, partial, check))
                        || self._matches(words, pos + 1, partial, check)
                }
            }
        } else if partial {
            true
        } else {
            match self.v.get(pos) {
                None => true,
                Some(Once(_)) => false,
                Some(Optional(_)) | Some(Multi(_)) => {
                    self._matches(words, pos + 1, partial, check)
                }
            }
        }
    }

    pub fn matches(&self, words: &[&str], check: impl Fn(&str, Flag) -> bool) -> bool {
        self._matches(words, 0, false, &check)
    }

    /// Could more words be appended to `words` to make a match?
    pub fn partial_match(&self, words: &[&str], check: impl Fn(&str, Flag) -> bool) -> bool {
        self._matches(words, 0, true, &check)
    }
}
