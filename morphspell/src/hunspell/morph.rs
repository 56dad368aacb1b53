/// Morphological fields are `tag:value` pairs that follow a word in the
/// dictionary or an affix entry in the affix file, for example
/// `po:noun` or `is:plural`.
use std::fmt;

use crate::hunspell::affixation::AffixMatch;
use crate::hunspell::compound::CompoundSegment;

/// The tags that appear in analyses. Other tags are kept in the tables
/// but left out of `analyze` output.
const ANALYSIS_TAGS: [&str; 8] = ["st", "po", "al", "ts", "is", "ds", "dp", "sp"];

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MorphField {
    pub tag: String,
    pub value: String,
}

impl MorphField {
    pub fn new(tag: &str, value: &str) -> Self {
        MorphField {
            tag: tag.to_string(),
            value: value.to_string(),
        }
    }

    /// Parse one `tag:value` token. The tag is always two characters.
    pub fn parse(token: &str) -> Option<Self> {
        let (tag, value) = token.split_once(':')?;
        if tag.chars().count() != 2 || value.is_empty() {
            return None;
        }
        Some(MorphField::new(tag, value))
    }

    /// Parse all the `tag:value` tokens in a whitespace separated list,
    /// skipping anything that doesn't look like a field.
    pub fn parse_list(s: &str) -> Vec<Self> {
        s.split_whitespace().filter_map(MorphField::parse).collect()
    }

    fn is_analysis_tag(&self) -> bool {
        ANALYSIS_TAGS.contains(&self.tag.as_str())
    }
}

impl fmt::Display for MorphField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.tag, self.value)
    }
}

fn push_fields<'a>(out: &mut Vec<String>, fields: impl Iterator<Item = &'a MorphField>) {
    for field in fields {
        // the stem is always taken from the entry itself
        if field.is_analysis_tag() && field.tag != "st" {
            out.push(field.to_string());
        }
    }
}

/// Format one affix decomposition as `st:stem` followed by the fields of
/// the root, the prefix, and the suffixes from the inside out.
pub fn format_analysis(m: &AffixMatch) -> String {
    let mut out = vec![format!("st:{}", m.root.stem)];
    push_fields(&mut out, m.root.morph.iter());
    for affix in m.affixes() {
        push_fields(&mut out, affix.morph.iter());
    }
    out.join(" ")
}

/// A compound is analyzed as its parts' analyses in order.
pub fn format_compound_analysis(parts: &[CompoundSegment]) -> String {
    parts
        .iter()
        .map(|part| format_analysis(&part.matched))
        .collect::<Vec<_>>()
        .join(" ")
}
