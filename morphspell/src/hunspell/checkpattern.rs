use crate::error::SpellError;
use crate::hunspell::flags::{Flag, FlagMode};
use crate::hunspell::wordindex::WordEntry;

/// A CHECKCOMPOUNDPATTERN rule. Without a replacement it forbids joining
/// two compound parts where the first ends with `end_chars` and the second
/// begins with `begin_chars`. With a replacement it instead allows the
/// join to be written as `replacement` in the surface word, standing for
/// `end_chars` followed by `begin_chars`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CompoundPattern {
    pub end_chars: String,
    pub end_flag: Option<Flag>,
    pub begin_chars: String,
    pub begin_flag: Option<Flag>,
    pub replacement: Option<String>,
}

impl CompoundPattern {
    /// Parse the fields of a pattern line: `endchars[/flag] beginchars[/flag] [replacement]`
    pub fn from_fields(fields: &[&str], mode: FlagMode) -> Result<Self, SpellError> {
        fn side(s: &str, mode: FlagMode) -> Result<(String, Option<Flag>), SpellError> {
            let (chars, flag) = match s.split_once('/') {
                Some((chars, flag)) => (chars, Some(mode.parse_single(flag)?)),
                None => (s, None),
            };
            // a lone 0 means "no characters", for patterns that only test flags
            let chars = if chars == "0" { "" } else { chars };
            Ok((chars.to_string(), flag))
        }

        let (end, begin, replacement) = match fields {
            [end, begin] => (end, begin, None),
            [end, begin, repl, ..] => (end, begin, Some(repl.to_string())),
            _ => {
                return Err(SpellError::MalformedLine {
                    line: 0,
                    message: "CHECKCOMPOUNDPATTERN needs two or three fields".to_string(),
                })
            }
        };
        let (end_chars, end_flag) = side(end, mode)?;
        let (begin_chars, begin_flag) = side(begin, mode)?;
        Ok(CompoundPattern {
            end_chars,
            end_flag,
            begin_chars,
            begin_flag,
            replacement,
        })
    }

    /// Do the flag conditions of this pattern hold for the two roots?
    pub fn flags_match(&self, left: &WordEntry, right: &WordEntry) -> bool {
        self.end_flag.map_or(true, |f| left.has_flag(f))
            && self.begin_flag.map_or(true, |f| right.has_flag(f))
    }

    /// Does this pattern forbid the join between `left` and `right`?
    pub fn forbids(
        &self,
        left: &str,
        left_root: &WordEntry,
        right: &str,
        right_root: &WordEntry,
    ) -> bool {
        self.replacement.is_none()
            && left.ends_with(&self.end_chars)
            && right.starts_with(&self.begin_chars)
            && self.flags_match(left_root, right_root)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::hunspell::flags::FlagSet;

    fn root(stem: &str, flags: &str) -> WordEntry {
        WordEntry::new(
            stem,
            FlagSet::parse(flags, FlagMode::CharFlags).unwrap(),
            Vec::new(),
        )
    }

    #[test]
    fn test_forbid_pattern() {
        let p = CompoundPattern::from_fields(&["nny", "ny"], FlagMode::CharFlags).unwrap();
        let konny = root("könny", "A");
        let nyelv = root("nyelv", "A");
        assert!(p.forbids("könny", &konny, "nyelv", &nyelv));
        assert!(!p.forbids("nyelv", &nyelv, "könny", &konny));
    }

    #[test]
    fn test_flagged_pattern() {
        let p = CompoundPattern::from_fields(&["0/x", "/y"], FlagMode::CharFlags).unwrap();
        assert_eq!("", p.end_chars);
        assert_eq!(Some('x' as Flag), p.end_flag);
        assert_eq!(Some('y' as Flag), p.begin_flag);
        assert!(p.forbids("foo", &root("foo", "x"), "bar", &root("bar", "y")));
        assert!(!p.forbids("foo", &root("foo", "x"), "bar", &root("bar", "")));
    }

    #[test]
    fn test_replacement_pattern() {
        let p = CompoundPattern::from_fields(&["o", "b", "z"], FlagMode::CharFlags).unwrap();
        assert_eq!(Some("z".to_string()), p.replacement);
        // replacement patterns never forbid
        assert!(!p.forbids("foo", &root("foo", ""), "bar", &root("bar", "")));
        assert!(CompoundPattern::from_fields(&["o"], FlagMode::CharFlags).is_err());
    }
}
