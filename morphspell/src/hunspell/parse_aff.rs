/// Parser for hunspell-format .aff files
use anyhow::{bail, Result};
use nom::branch::alt;
use nom::bytes::complete::{tag, take_till1};
use nom::character::complete::{char, not_line_ending, space0, space1, u16, u32, u8};
use nom::combinator::{cut, eof, map, opt, value, verify};
use nom::error::{ErrorKind, ParseError};
use nom::multi::{many0, separated_list1};
use nom::sequence::{pair, preceded, separated_pair, terminated};
use nom::{Compare, Err, IResult, InputLength, Parser};
use std::fmt;

use crate::error::SpellError;
use crate::hunspell::affixdata::{AffixData, AffixEntry, AffixKind, AffixRule, AffixTable};
use crate::hunspell::casing::CaseHandling;
use crate::hunspell::checkpattern::CompoundPattern;
use crate::hunspell::compoundrule::CompoundRule;
use crate::hunspell::condition::AffixCondition;
use crate::hunspell::flags::{FlagMode, FlagSet};
use crate::hunspell::morph::MorphField;

type Input<'a> = &'a str;

const BYTE_ORDER_MARK: char = '\u{FEFF}';

#[derive(Debug)]
struct AffError {
    message: String,
}

impl<'a> ParseError<Input<'a>> for AffError {
    fn from_error_kind(input: Input, kind: ErrorKind) -> Self {
        let message = format!("{:?} at {:?}", kind, input);
        AffError { message }
    }

    fn append(_input: Input, _kind: ErrorKind, other: Self) -> Self {
        other
    }
}

impl fmt::Display for AffError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

#[derive(Clone, Debug)]
enum AffixLine<'a> {
    Empty,
    SetEncoding(&'a str),
    SetFlagMode(&'a str),
    SetLang(&'a str),
    SetKeyboardString(&'a str),
    SetTryString(&'a str),
    SetIgnore(&'a str),
    SetFlag(&'a str, &'a str),
    SetCompoundMin(u8),
    SetCompoundWordMax(u16),
    SetOption(&'a str),
    AddIconv((&'a str, &'a str)),
    AddOconv((&'a str, &'a str)),
    AddRep((&'a str, &'a str)),
    AddCompoundPattern(Vec<&'a str>),
    AddCompoundRule(&'a str),
    AddRelatedChars(&'a str),
    AddWordBreaks(&'a str),
    AddFlagAlias(&'a str),
    AddMorphAlias(&'a str),
    Affix(AffixKind, &'a str, Vec<&'a str>),
}

/// Parse a line starting with a keyword and then a value.
/// Takes the tag for the keyword, and a parser for the value.
/// Returns the result of the value parser.
fn keyword<'a, T, O, E: ParseError<Input<'a>>, F>(
    key: T,
    mut value: F,
) -> impl FnMut(Input<'a>) -> IResult<Input<'a>, O, E>
where
    F: Parser<Input<'a>, O, E>,
    Input<'a>: Compare<T>,
    T: InputLength + Copy,
{
    move |s: Input<'a>| {
        let (s, _) = tag(key).parse(s)?;
        let (s, _) = space1.parse(s)?;
        // re-implement cut() because I don't know how to pass cut(value)
        // without errors about copying value.
        match value.parse(s) {
            Err(Err::Error(e)) => Err(Err::Failure(e)),
            rest => rest,
        }
    }
}

/// Parse a line that is a table entry. Each line of a table
/// starts with the same keyword. The first line contains the
/// number of entries that follow, which we ignore.
///
/// Takes the tag for the keyword, a parser for the value, and the
/// `AffixLine` type to convert the value to.
/// Returns `AffixLine::Empty` for the first line, and the given
/// `AffixLine` type for the following lines.
fn table_line<'a, T, O, E: ParseError<Input<'a>>>(
    key: T,
    mut value: impl Parser<Input<'a>, O, E>,
    conv: impl Fn(O) -> AffixLine<'a>,
) -> impl FnMut(Input<'a>) -> IResult<Input<'a>, AffixLine<'a>, E>
where
    Input<'a>: Compare<T>,
    T: InputLength + Copy,
{
    move |s: Input<'a>| {
        let (s, _) = tag(key).parse(s)?;
        let (s, _) = space1.parse(s)?;
        if let Ok((rest, _)) = terminated(u32::<Input<'a>, E>, ending_ahead).parse(s) {
            return Ok((rest, AffixLine::Empty));
        }
        // re-implement cut() because I don't know how to pass cut(value)
        // without errors about copying value.
        match value.parse(s) {
            Err(Err::Error(e)) => Err(Err::Failure(e)),
            Ok((s, v)) => Ok((s, conv(v))),
            Err(other) => Err(other),
        }
    }
}

/// Succeeds without consuming anything if only whitespace or a comment
/// remains on the line.
fn ending_ahead<'a, E: ParseError<Input<'a>>>(s: Input<'a>) -> IResult<Input<'a>, (), E> {
    let rest = s.trim_start();
    if rest.is_empty() || rest.starts_with('#') {
        Ok((s, ()))
    } else {
        Err(Err::Error(E::from_error_kind(s, ErrorKind::Eof)))
    }
}

fn comment(s: &str) -> IResult<&str, (), AffError> {
    value((), preceded(char('#'), not_line_ending))(s)
}

fn value_string(s: &str) -> IResult<&str, &str, AffError> {
    take_till1(|c: char| c.is_whitespace())(s)
}

/// A field of an affix entry. A field starting with # begins a comment.
fn affix_field(s: &str) -> IResult<&str, &str, AffError> {
    verify(value_string, |v: &str| !v.starts_with('#'))(s)
}

fn rest_of_line(s: &str) -> IResult<&str, &str, AffError> {
    map(verify(not_line_ending, |v: &str| !v.trim().is_empty()), str::trim)(s)
}

const FLAG_NAMES: [&str; 14] = [
    "FORBIDDENWORD",
    "COMPOUNDFLAG",
    "COMPOUNDBEGIN",
    "COMPOUNDMIDDLE",
    "COMPOUNDEND",
    "COMPOUNDLAST",
    "COMPOUNDPERMITFLAG",
    "COMPOUNDFORBIDFLAG",
    "ONLYINCOMPOUND",
    "NOSUGGEST",
    "CIRCUMFIX",
    "NEEDAFFIX",
    "PSEUDOROOT",
    "KEEPCASE",
];

fn assign_flag(s: &str) -> IResult<&str, AffixLine, AffError> {
    let (s, key) = value_string(s)?;
    if !FLAG_NAMES.contains(&key) {
        return Err(Err::Error(AffError::from_error_kind(s, ErrorKind::Tag)));
    }
    let (s, _) = space1(s)?;
    let (s, v) = cut(value_string)(s)?;
    Ok((s, AffixLine::SetFlag(key, v)))
}

fn set_encoding(s: &str) -> IResult<&str, AffixLine, AffError> {
    map(keyword("SET", value_string), AffixLine::SetEncoding)(s)
}

fn set_flag_mode(s: &str) -> IResult<&str, AffixLine, AffError> {
    map(keyword("FLAG", value_string), AffixLine::SetFlagMode)(s)
}

fn set_lang(s: &str) -> IResult<&str, AffixLine, AffError> {
    map(keyword("LANG", value_string), AffixLine::SetLang)(s)
}

fn set_keyboard_string(s: &str) -> IResult<&str, AffixLine, AffError> {
    map(keyword("KEY", value_string), AffixLine::SetKeyboardString)(s)
}

fn set_try_string(s: &str) -> IResult<&str, AffixLine, AffError> {
    map(keyword("TRY", value_string), AffixLine::SetTryString)(s)
}

fn set_ignore(s: &str) -> IResult<&str, AffixLine, AffError> {
    map(keyword("IGNORE", value_string), AffixLine::SetIgnore)(s)
}

fn set_compound_min(s: &str) -> IResult<&str, AffixLine, AffError> {
    map(keyword("COMPOUNDMIN", u8), AffixLine::SetCompoundMin)(s)
}

fn set_compound_word_max(s: &str) -> IResult<&str, AffixLine, AffError> {
    map(keyword("COMPOUNDWORDMAX", u16), AffixLine::SetCompoundWordMax)(s)
}

fn set_option(s: &str) -> IResult<&str, AffixLine, AffError> {
    map(
        alt((
            tag("CHECKCOMPOUNDDUP"),
            tag("CHECKCOMPOUNDCASE"),
            tag("CHECKCOMPOUNDTRIPLE"),
            tag("FULLSTRIP"),
        )),
        AffixLine::SetOption,
    )(s)
}

fn conv(s: &str) -> IResult<&str, (&str, &str), AffError> {
    separated_pair(value_string, space1, value_string)(s)
}

fn add_iconv(s: &str) -> IResult<&str, AffixLine, AffError> {
    table_line("ICONV", conv, AffixLine::AddIconv)(s)
}

fn add_oconv(s: &str) -> IResult<&str, AffixLine, AffError> {
    table_line("OCONV", conv, AffixLine::AddOconv)(s)
}

fn add_rep(s: &str) -> IResult<&str, AffixLine, AffError> {
    table_line("REP", conv, AffixLine::AddRep)(s)
}

fn add_compound_pattern(s: &str) -> IResult<&str, AffixLine, AffError> {
    table_line(
        "CHECKCOMPOUNDPATTERN",
        separated_list1(space1, affix_field),
        AffixLine::AddCompoundPattern,
    )(s)
}

fn add_compound_rule(s: &str) -> IResult<&str, AffixLine, AffError> {
    table_line("COMPOUNDRULE", value_string, AffixLine::AddCompoundRule)(s)
}

fn add_related_chars(s: &str) -> IResult<&str, AffixLine, AffError> {
    table_line("MAP", value_string, AffixLine::AddRelatedChars)(s)
}

fn add_word_breaks(s: &str) -> IResult<&str, AffixLine, AffError> {
    table_line("BREAK", value_string, AffixLine::AddWordBreaks)(s)
}

fn add_flag_alias(s: &str) -> IResult<&str, AffixLine, AffError> {
    map(keyword("AF", value_string), AffixLine::AddFlagAlias)(s)
}

fn add_morph_alias(s: &str) -> IResult<&str, AffixLine, AffError> {
    map(keyword("AM", rest_of_line), AffixLine::AddMorphAlias)(s)
}

fn add_affix(s: &str) -> IResult<&str, AffixLine, AffError> {
    let (s, kind) = alt((
        value(AffixKind::Prefix, tag("PFX")),
        value(AffixKind::Suffix, tag("SFX")),
    ))(s)?;
    let (s, _) = space1(s)?;
    let (s, flag) = cut(value_string)(s)?;
    let (s, fields) = many0(preceded(space1, affix_field))(s)?;
    Ok((s, AffixLine::Affix(kind, flag, fields)))
}

fn line(s: &str) -> IResult<&str, AffixLine, AffError> {
    alt((
        alt((
            set_encoding,
            set_flag_mode,
            set_lang,
            set_keyboard_string,
            set_try_string,
            set_ignore,
            assign_flag,
            set_compound_min,
            set_compound_word_max,
            set_option,
        )),
        alt((
            add_iconv,
            add_oconv,
            add_rep,
            add_compound_pattern,
            add_compound_rule,
            add_related_chars,
            add_word_breaks,
            add_flag_alias,
            add_morph_alias,
            add_affix,
        )),
        // Unknown directives and comments
        value(AffixLine::Empty, not_line_ending),
    ))(s)
}

fn full_line(s: &str) -> IResult<&str, AffixLine, AffError> {
    terminated(line, pair(space0, opt(comment)))(s)
}

/// State that lasts across lines while loading.
#[derive(Default)]
struct Loader {
    prefixes: Vec<AffixRule>,
    suffixes: Vec<AffixRule>,
    seen_flag_alias_count: bool,
    seen_morph_alias_count: bool,
}

impl Loader {
    fn rules_mut(&mut self, kind: AffixKind) -> &mut Vec<AffixRule> {
        match kind {
            AffixKind::Prefix => &mut self.prefixes,
            AffixKind::Suffix => &mut self.suffixes,
        }
    }

    fn apply(&mut self, d: &mut AffixData, line: AffixLine) -> Result<(), SpellError> {
        match line {
            AffixLine::Empty | AffixLine::SetEncoding(_) | AffixLine::SetFlagMode(_) => (),
            AffixLine::SetLang(lang) => d.case_handling = CaseHandling::from_lang(lang),
            AffixLine::SetKeyboardString(k) => d.keyboard_string = Some(k.to_string()),
            AffixLine::SetTryString(t) => d.try_string = Some(t.to_string()),
            AffixLine::SetIgnore(chars) => d.ignore_chars = chars.chars().collect(),
            AffixLine::SetFlag(key, v) => {
                let flag = Some(d.flag_mode.parse_single(v)?);
                let sf = &mut d.special_flags;
                match key {
                    "FORBIDDENWORD" => sf.forbidden = flag,
                    "COMPOUNDFLAG" => sf.compound_flag = flag,
                    "COMPOUNDBEGIN" => sf.compound_begin = flag,
                    "COMPOUNDMIDDLE" => sf.compound_middle = flag,
                    "COMPOUNDEND" | "COMPOUNDLAST" => sf.compound_end = flag,
                    "COMPOUNDPERMITFLAG" => sf.compound_permit = flag,
                    "COMPOUNDFORBIDFLAG" => sf.compound_forbid = flag,
                    "ONLYINCOMPOUND" => sf.only_in_compound = flag,
                    "NOSUGGEST" => sf.no_suggest = flag,
                    "CIRCUMFIX" => sf.circumfix = flag,
                    "NEEDAFFIX" | "PSEUDOROOT" => sf.need_affix = flag,
                    "KEEPCASE" => sf.keep_case = flag,
                    _ => (),
                }
            }
            AffixLine::SetCompoundMin(v) => d.compound_min = v,
            AffixLine::SetCompoundWordMax(v) => d.compound_word_max = Some(v),
            AffixLine::SetOption(option) => match option {
                "CHECKCOMPOUNDDUP" => d.check_compound_dup = true,
                "CHECKCOMPOUNDCASE" => d.check_compound_case = true,
                "CHECKCOMPOUNDTRIPLE" => d.check_compound_triple = true,
                "FULLSTRIP" => d.fullstrip = true,
                _ => (),
            },
            AffixLine::AddIconv((from, to)) => d.iconv.push(from, to),
            AffixLine::AddOconv((from, to)) => d.oconv.push(from, to),
            AffixLine::AddRep((from, to)) => d.replacements.push_rep(from, to),
            AffixLine::AddCompoundPattern(fields) => {
                let pattern = CompoundPattern::from_fields(&fields, d.flag_mode)?;
                d.compound_patterns.push(pattern);
            }
            AffixLine::AddCompoundRule(v) => {
                d.compound_rules.push(CompoundRule::from_str(v, d.flag_mode)?);
            }
            AffixLine::AddRelatedChars(v) => d.related_chars.push(v.to_string()),
            AffixLine::AddWordBreaks(v) => d.word_breaks.push(v.to_string()),
            AffixLine::AddFlagAlias(v) => {
                if !self.seen_flag_alias_count {
                    self.seen_flag_alias_count = true;
                } else {
                    let set = FlagSet::parse(v, d.flag_mode)?;
                    d.flag_aliases.push(set);
                }
            }
            AffixLine::AddMorphAlias(v) => {
                if !self.seen_morph_alias_count {
                    self.seen_morph_alias_count = true;
                } else {
                    d.morph_aliases.push(MorphField::parse_list(v));
                }
            }
            AffixLine::Affix(kind, flag, fields) => self.apply_affix(d, kind, flag, &fields)?,
        }
        Ok(())
    }

    fn apply_affix(
        &mut self,
        d: &AffixData,
        kind: AffixKind,
        flag: &str,
        fields: &[&str],
    ) -> Result<(), SpellError> {
        let flag = d.flag_mode.parse_single(flag)?;
        match fields {
            [yn, count] if (*yn == "Y" || *yn == "N") && count.parse::<u32>().is_ok() => {
                let other = match kind {
                    AffixKind::Prefix => AffixKind::Suffix,
                    AffixKind::Suffix => AffixKind::Prefix,
                };
                let conflicting = self.rules_mut(other).iter().any(|r| r.flag == flag);
                let rules = self.rules_mut(kind);
                if rules.iter().any(|r| r.flag == flag) {
                    return Err(SpellError::DuplicateRule(format!("{:?} {}", kind, flag)));
                }
                rules.push(AffixRule::new(kind, flag, *yn == "Y"));
                if conflicting {
                    return Err(SpellError::ConflictingRule(flag.to_string()));
                }
                Ok(())
            }
            [strip, add, rest @ ..] => {
                let Some(rule) = self.rules_mut(kind).iter_mut().rev().find(|r| r.flag == flag)
                else {
                    return Err(SpellError::MalformedLine {
                        line: 0,
                        message: format!("{:?} entry for {} without a header", kind, flag),
                    });
                };
                let strip = if *strip == "0" { "" } else { *strip };
                let (add, cont_flags) = match add.split_once('/') {
                    Some((add, cont)) => (add, d.parse_flags(cont)?),
                    None => (*add, FlagSet::new()),
                };
                let add = if add == "0" { "" } else { add };
                let add = d.strip_ignored(add);
                let condition = AffixCondition::new(rest.first().copied().unwrap_or("."))?;
                let morph = match rest.get(1..) {
                    Some(morph) if !morph.is_empty() => d.parse_morph(&morph.join(" ")),
                    _ => Vec::new(),
                };
                let entry = AffixEntry::new(rule, strip, &add, condition, cont_flags, morph);
                rule.entries.push(entry);
                Ok(())
            }
            _ => Err(SpellError::MalformedLine {
                line: 0,
                message: format!("{:?} line for {} has too few fields", kind, flag),
            }),
        }
    }

    /// Compute the affix entries' special flags, now that all the flag
    /// declarations have been seen, and build the affix table.
    fn finish(self, d: &mut AffixData) {
        d.affixes = AffixTable::new(self.prefixes, self.suffixes);
        d.affixes.derive_word_flags(&d.special_flags);
    }
}

fn flag_mode(mode: &str) -> Result<FlagMode> {
    Ok(match mode {
        "long" => FlagMode::DoubleCharFlags,
        "num" => FlagMode::NumericFlags,
        "UTF-8" => FlagMode::Utf8Flags,
        _ => bail!("Unknown flag mode {}", mode),
    })
}

/// Parse the text of an affix file. Lines that can't be understood are
/// skipped and recorded in the returned data's `errors`. Only problems
/// that make the whole file unusable, such as an unknown flag format,
/// are returned as errors.
pub fn parse_affix_data(text: &str) -> Result<AffixData> {
    let text = text.strip_prefix(BYTE_ORDER_MARK).unwrap_or(text);
    let mut d = AffixData::new();
    let mut loader = Loader::default();
    for (n, raw) in text.lines().enumerate() {
        let lineno = n + 1;
        let parsed = match terminated(full_line, eof)(raw) {
            Ok((_, parsed)) => parsed,
            Err(e) => {
                let message = match e {
                    Err::Error(e) | Err::Failure(e) => e.to_string(),
                    Err::Incomplete(_) => "incomplete line".to_string(),
                };
                d.report(lineno, SpellError::MalformedLine { line: 0, message });
                continue;
            }
        };
        match parsed {
            AffixLine::SetEncoding(enc) => {
                if !enc.eq_ignore_ascii_case("UTF-8") {
                    bail!("Unsupported encoding {}", enc);
                }
            }
            AffixLine::SetFlagMode(mode) => d.flag_mode = flag_mode(mode)?,
            other => {
                if let Err(e) = loader.apply(&mut d, other) {
                    d.report(lineno, e);
                }
            }
        }
    }
    loader.finish(&mut d);
    Ok(d)
}
