/// Affix conditions are rudimentary regexps (supporting [] groups and
/// [^] negated groups and '.' as wildcard). They are matched against
/// the start or end of a candidate stem to determine eligibility for
/// prefix and suffix rules.
use crate::error::SpellError;

#[derive(Clone, Debug, PartialEq, Eq)]
enum AffixCondChar {
    Any,
    Match(char),
    Group(Vec<char>),
    NegatedGroup(Vec<char>),
}

impl AffixCondChar {
    fn matches(&self, wc: char) -> bool {
        match self {
            AffixCondChar::Match(c) => *c == wc,
            AffixCondChar::Group(v) => v.contains(&wc),
            AffixCondChar::NegatedGroup(v) => !v.contains(&wc),
            AffixCondChar::Any => true,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AffixCondition {
    /// A processed version of the condition string, suitable for fast matching.
    /// Empty means the condition accepts everything.
    cond: Vec<AffixCondChar>,
}

impl AffixCondition {
    pub fn new(condition: &str) -> Result<Self, SpellError> {
        #[derive(PartialEq)]
        enum CondState {
            Matching,
            GroupStart,
            InGroup,
            InNegatedGroup,
        }
        let mut state = CondState::Matching;
        let mut v = Vec::new();
        let mut group = Vec::new();
        for c in condition.chars() {
            match state {
                CondState::Matching => {
                    if c == '[' {
                        state = CondState::GroupStart;
                    } else if c == ']' {
                        return Err(SpellError::InvalidConditionPattern(
                            condition.to_string(),
                        ));
                    } else if c == '.' {
                        v.push(AffixCondChar::Any);
                    } else {
                        v.push(AffixCondChar::Match(c));
                    }
                }
                CondState::GroupStart => {
                    if c == '^' {
                        state = CondState::InNegatedGroup;
                    } else if c == ']' {
                        return Err(SpellError::InvalidConditionPattern(
                            condition.to_string(),
                        ));
                    } else {
                        state = CondState::InGroup;
                        group.push(c);
                    }
                }
                CondState::InGroup | CondState::InNegatedGroup => {
                    if c == ']' {
                        let chars = std::mem::take(&mut group);
                        if state == CondState::InGroup {
                            v.push(AffixCondChar::Group(chars));
                        } else {
                            v.push(AffixCondChar::NegatedGroup(chars));
                        }
                        state = CondState::Matching;
                    } else {
                        group.push(c);
                    }
                }
            }
        }
        if state != CondState::Matching {
            return Err(SpellError::InvalidConditionPattern(
                condition.to_string(),
            ));
        }
        if v.iter().all(|cc| *cc == AffixCondChar::Any) && v.len() <= 1 {
            v.clear();
        }
        Ok(AffixCondition { cond: v })
    }

    /// Does the condition accept every stem?
    pub fn is_any(&self) -> bool {
        self.cond.is_empty()
    }

    pub fn prefix_match(&self, word: &str) -> bool {
        if self.cond.is_empty() {
            return true;
        }

        let mut pos = 0;
        for c in word.chars() {
            if !self.cond[pos].matches(c) {
                return false;
            }
            pos += 1;
            if pos >= self.cond.len() {
                return true;
            }
        }
        false
    }

    pub fn suffix_match(&self, word: &str) -> bool {
        if self.cond.is_empty() {
            return true;
        }

        let mut pos = self.cond.len() - 1;
        for c in word.chars().rev() {
            if !self.cond[pos].matches(c) {
                return false;
            }
            if pos == 0 {
                return true;
            }
            pos -= 1;
        }
        false
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn help_prefix_condition(cond: &str, word: &str) -> bool {
        AffixCondition::new(cond).unwrap().prefix_match(word)
    }

    fn help_suffix_condition(cond: &str, word: &str) -> bool {
        AffixCondition::new(cond).unwrap().suffix_match(word)
    }

    #[test]
    fn test_prefix_condition() {
        assert!(help_prefix_condition("", "anything"));
        assert!(help_prefix_condition(".", "anything"));
        assert!(help_prefix_condition("[aeoui]", "a vowel"));
        assert!(help_prefix_condition("[^hx]", "a negation"));
        assert!(help_prefix_condition("re", "reset"));
        assert!(help_prefix_condition("c[om]pli[^ca]ted", "cmplixted"));
        // a caret not at the start of a group is a normal member
        assert!(help_prefix_condition("[ae^oui]", "^ vowel"));
        // a dot is a wildcard, but not in a group
        assert!(help_prefix_condition("any.letter", "anylletter"));
        assert!(!help_prefix_condition("any[.]letter", "anylletter"));
        assert!(help_prefix_condition("any[.]letter", "any.letter"));

        assert!(!help_prefix_condition("[^hx]", "h fails"));
        assert!(!help_prefix_condition("literal", "litteral"));
        // the stem is shorter than the condition
        assert!(!help_prefix_condition("abc", "ab"));
    }

    #[test]
    fn test_suffix_condition() {
        assert!(help_suffix_condition("", "anything"));
        assert!(help_suffix_condition("[^aeiou]y", "apply"));
        assert!(help_suffix_condition("[aeiou]y", "play"));
        assert!(help_suffix_condition("[sxzh]", "church"));
        assert!(help_suffix_condition("[aeioué]", "éra"));
        assert!(!help_suffix_condition("[^aeiou]y", "play"));
        assert!(!help_suffix_condition("[^ey]", "apply"));
        assert!(!help_suffix_condition("ly", "y"));
    }

    #[test]
    fn test_invalid_conditions() {
        assert!(matches!(
            AffixCondition::new("[abc"),
            Err(SpellError::InvalidConditionPattern(_))
        ));
        assert!(AffixCondition::new("[^").is_err());
        assert!(AffixCondition::new("a]").is_err());
        assert!(AffixCondition::new("[]").is_err());
        assert!(AffixCondition::new(".").unwrap().is_any());
        assert!(!AffixCondition::new("..").unwrap().is_any());
    }
}
