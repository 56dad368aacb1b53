/// Parser for the lines of hunspell-format .dic files
use crate::error::SpellError;
use crate::hunspell::affixdata::AffixData;
use crate::hunspell::flags::FlagSet;
use crate::hunspell::morph::MorphField;
use crate::hunspell::wordindex::WordEntry;

fn split_morphological_fields(s: &str) -> (&str, Option<&str>) {
    // Parsing these is tricky because they are separated from the
    // word by a space, but the word may itself contain a space.
    // Parse them by recognizing the pattern xx:yyy with a two-char tag.
    let mut last_space = None;
    for (i, c) in s.char_indices() {
        if let Some(spos) = last_space {
            let dist = i - spos;
            if dist == 3 && c == ':' {
                return (&s[..spos], Some(s[spos + 1..].trim()));
            }
            if dist >= 3 || !c.is_alphanumeric() {
                last_space = None;
            }
        }
        if last_space.is_none() && (c == ' ' || c == '\t') {
            last_space = Some(i);
        }
    }
    (s, None)
}

/// Find the `/` that separates the word from its flags.
/// A slash in the word itself is written as `\/`.
fn find_flag_separator(s: &str) -> Option<usize> {
    let mut escaped = false;
    for (i, c) in s.char_indices() {
        if c == '/' && !escaped && i > 0 {
            return Some(i);
        }
        escaped = c == '\\' && !escaped;
    }
    None
}

/// Make a dictionary entry, computing its special flags.
pub(crate) fn new_entry(
    affix_data: &AffixData,
    stem: &str,
    flags: FlagSet,
    morph: Vec<MorphField>,
) -> WordEntry {
    let word_flags = affix_data.special_flags.word_flags(&flags);
    let stem = affix_data.strip_ignored(stem);
    WordEntry::new(&stem, flags, morph).with_word_flags(word_flags)
}

/// Parse one line of a .dic file: `word[/flags] [morphological fields]`.
pub fn parse_dic_line(line: &str, affix_data: &AffixData) -> Result<WordEntry, SpellError> {
    let line = line.trim_end();
    let (word, flags, morph) = match find_flag_separator(line) {
        Some(pos) => {
            let rest = &line[pos + 1..];
            let (flags, morph) = match rest.split_once(|c: char| c.is_whitespace()) {
                Some((flags, morph)) => (flags, Some(morph.trim())),
                None => (rest, None),
            };
            (&line[..pos], flags, morph)
        }
        None => {
            let (word, morph) = split_morphological_fields(line);
            (word, "", morph)
        }
    };
    let word = word.trim().replace("\\/", "/");
    if word.is_empty() {
        return Err(SpellError::MalformedLine {
            line: 0,
            message: "dictionary line without a word".to_string(),
        });
    }
    let flags = affix_data.parse_flags(flags)?;
    let morph = morph.map(|m| affix_data.parse_morph(m)).unwrap_or_default();
    Ok(new_entry(affix_data, &word, flags, morph))
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::hunspell::flags::Flag;
    use crate::hunspell::parse_aff::parse_affix_data;
    use crate::hunspell::wordflags::WordFlags;

    #[test]
    fn test_split_morphological_fields() {
        assert_eq!(
            ("New York", Some("po:noun")),
            split_morphological_fields("New York po:noun")
        );
        assert_eq!(("New York", None), split_morphological_fields("New York"));
        assert_eq!(("a b:c", None), split_morphological_fields("a b:c"));
    }

    #[test]
    fn test_dic_lines() {
        let d = parse_affix_data("FORBIDDENWORD !\n").unwrap();

        let e = parse_dic_line("walk/SD po:verb is:base", &d).unwrap();
        assert_eq!("walk", e.stem);
        assert!(e.has_flag('S' as Flag));
        assert_eq!(2, e.morph.len());

        let e = parse_dic_line("1\\/2/N", &d).unwrap();
        assert_eq!("1/2", e.stem);
        assert!(e.has_flag('N' as Flag));

        let e = parse_dic_line("bars/!", &d).unwrap();
        assert!(e.word_flags().contains(WordFlags::Forbidden));

        let e = parse_dic_line("New York po:noun", &d).unwrap();
        assert_eq!("New York", e.stem);
        assert!(e.flags.is_empty());

        assert!(parse_dic_line("   ", &d).is_err());
    }

    #[test]
    fn test_bad_flags() {
        let d = parse_affix_data("FLAG long\n").unwrap();
        assert!(matches!(
            parse_dic_line("word/abc", &d),
            Err(SpellError::MalformedFlagData { .. })
        ));
    }
}
