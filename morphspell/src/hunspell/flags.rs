use itertools::Itertools;
use smallvec::SmallVec;
use std::fmt;

use crate::error::SpellError;

/// A flag in its canonical form. All flag encodings map into this space:
/// single characters and UTF-8 flags are their codepoint, long flags are
/// `first * 256 + second`, and numeric flags are their value.
pub type Flag = u32;

/// Represents the format of the flags after words in the dictionary file.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FlagMode {
    /// Single-character flags
    #[default]
    CharFlags,
    /// Two-character flags
    DoubleCharFlags,
    /// Flags are comma-separated ASCII integers
    NumericFlags,
    /// Flags are Unicode codepoints in UTF-8 format
    Utf8Flags,
}

impl FlagMode {
    /// Parse a flag string into its flags, in the order they were written.
    pub fn parse(self, flags: &str) -> Result<Vec<Flag>, SpellError> {
        match self {
            FlagMode::CharFlags | FlagMode::Utf8Flags => {
                Ok(flags.chars().map(|c| c as Flag).collect())
            }
            FlagMode::DoubleCharFlags => {
                if flags.chars().count() % 2 != 0 {
                    return Err(SpellError::malformed_flags(
                        flags,
                        "odd number of characters in long flags",
                    ));
                }
                flags
                    .chars()
                    .chunks(2)
                    .into_iter()
                    .map(|pair| {
                        let (c1, c2) = pair
                            .map(|c| c as Flag)
                            .collect_tuple::<(Flag, Flag)>()
                            .ok_or_else(|| {
                                SpellError::malformed_flags(
                                    flags,
                                    "incomplete long flag",
                                )
                            })?;
                        if c1 > 255 || c2 > 255 {
                            return Err(SpellError::malformed_flags(
                                flags,
                                "invalid characters in long flag",
                            ));
                        }
                        Ok(c1 * 256 + c2)
                    })
                    .collect()
            }
            FlagMode::NumericFlags => {
                if flags.is_empty() {
                    return Ok(Vec::new());
                }
                flags
                    .split(',')
                    .map(|d| {
                        let d = d.trim();
                        if d.is_empty() || !d.bytes().all(|b| b.is_ascii_digit())
                        {
                            return Err(SpellError::malformed_flags(
                                flags,
                                "numeric flag is not a number",
                            ));
                        }
                        d.parse::<u16>().map(Flag::from).map_err(|_| {
                            SpellError::malformed_flags(
                                flags,
                                "numeric flag out of range",
                            )
                        })
                    })
                    .collect()
            }
        }
    }

    /// Parse a string that must contain exactly one flag.
    pub fn parse_single(self, flag: &str) -> Result<Flag, SpellError> {
        match self.parse(flag)?.as_slice() {
            [f] => Ok(*f),
            _ => Err(SpellError::malformed_flags(flag, "expected a single flag")),
        }
    }
}

/// An immutable set of flags, kept sorted so that membership tests
/// are a binary search and equality does not depend on the order
/// or encoding the flags were written in.
#[derive(Clone, Default, PartialEq, Eq, Hash)]
pub struct FlagSet {
    flags: SmallVec<[Flag; 4]>,
}

impl FlagSet {
    pub fn new() -> Self {
        FlagSet::default()
    }

    /// Parse `raw` according to the dictionary's flag encoding.
    pub fn parse(raw: &str, mode: FlagMode) -> Result<Self, SpellError> {
        Ok(mode.parse(raw)?.into_iter().collect())
    }

    pub fn contains(&self, flag: Flag) -> bool {
        self.flags.binary_search(&flag).is_ok()
    }

    /// Like `contains`, for the optional special flags of an affix file.
    /// An unset special flag is never contained.
    pub fn contains_opt(&self, flag: Option<Flag>) -> bool {
        flag.map_or(false, |f| self.contains(f))
    }

    pub fn is_subset_of(&self, other: &FlagSet) -> bool {
        self.flags.iter().all(|f| other.contains(*f))
    }

    pub fn union(&self, other: &FlagSet) -> FlagSet {
        self.flags.iter().chain(other.flags.iter()).copied().collect()
    }

    pub fn is_empty(&self) -> bool {
        self.flags.is_empty()
    }

    pub fn len(&self) -> usize {
        self.flags.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = Flag> + '_ {
        self.flags.iter().copied()
    }
}

impl FromIterator<Flag> for FlagSet {
    fn from_iter<I: IntoIterator<Item = Flag>>(iter: I) -> Self {
        let mut flags: SmallVec<[Flag; 4]> = iter.into_iter().collect();
        flags.sort_unstable();
        flags.dedup();
        FlagSet { flags }
    }
}

impl fmt::Debug for FlagSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.flags.iter()).finish()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_char_flags() {
        let flags = FlagSet::parse("ABA", FlagMode::CharFlags).unwrap();
        assert_eq!(2, flags.len());
        assert!(flags.contains('A' as Flag));
        assert!(flags.contains('B' as Flag));
        assert!(!flags.contains('C' as Flag));
    }

    #[test]
    fn test_utf8_flags() {
        let flags = FlagSet::parse("äß", FlagMode::Utf8Flags).unwrap();
        assert!(flags.contains('ä' as Flag));
        assert!(flags.contains('ß' as Flag));
    }

    #[test]
    fn test_long_flags() {
        let flags = FlagSet::parse("abcd", FlagMode::DoubleCharFlags).unwrap();
        assert_eq!(2, flags.len());
        assert!(flags.contains(97 * 256 + 98));
        assert!(flags.contains(99 * 256 + 100));

        assert!(matches!(
            FlagSet::parse("abc", FlagMode::DoubleCharFlags),
            Err(SpellError::MalformedFlagData { .. })
        ));
        assert!(FlagSet::parse("a€", FlagMode::DoubleCharFlags).is_err());
    }

    #[test]
    fn test_numeric_flags() {
        let flags = FlagSet::parse("1,200,3", FlagMode::NumericFlags).unwrap();
        assert!(flags.contains(1));
        assert!(flags.contains(200));
        assert!(flags.contains(3));
        assert!(FlagSet::parse("", FlagMode::NumericFlags).unwrap().is_empty());

        assert!(FlagSet::parse("1,x", FlagMode::NumericFlags).is_err());
        assert!(FlagSet::parse("1,,2", FlagMode::NumericFlags).is_err());
        assert!(FlagSet::parse("99999", FlagMode::NumericFlags).is_err());
    }

    #[test]
    fn test_encoding_independence() {
        let long = FlagSet::parse("ab", FlagMode::DoubleCharFlags).unwrap();
        let num = FlagSet::parse("24930", FlagMode::NumericFlags).unwrap();
        assert_eq!(long, num);
        assert!(long.is_subset_of(&num));
        assert!(num.contains(long.iter().next().unwrap()));

        let chars = FlagSet::parse("BA", FlagMode::CharFlags).unwrap();
        let nums = FlagSet::parse("65,66", FlagMode::NumericFlags).unwrap();
        assert_eq!(chars, nums);
    }

    #[test]
    fn test_set_operations() {
        let ab = FlagSet::parse("AB", FlagMode::CharFlags).unwrap();
        let bc = FlagSet::parse("BC", FlagMode::CharFlags).unwrap();
        let abc = ab.union(&bc);
        assert_eq!(3, abc.len());
        assert!(ab.is_subset_of(&abc));
        assert!(bc.is_subset_of(&abc));
        assert!(!abc.is_subset_of(&ab));
        assert!(FlagSet::new().is_subset_of(&ab));
        // union leaves the operands alone
        assert_eq!(2, ab.len());
        assert!(ab.contains_opt(Some('A' as Flag)));
        assert!(!ab.contains_opt(None));
    }

    #[test]
    fn test_single_flag() {
        assert_eq!(Ok('X' as Flag), FlagMode::CharFlags.parse_single("X"));
        assert!(FlagMode::CharFlags.parse_single("XY").is_err());
        assert_eq!(Ok(7), FlagMode::NumericFlags.parse_single("7"));
    }
}
