use thiserror::Error;

/// Problems found while building or extending the word and affix tables.
///
/// None of these stop a speller from working. They are collected during
/// loading and can be inspected with `SpellerHunspellDict::get_errors`.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum SpellError {
    #[error("malformed flag data {data:?}: {reason}")]
    MalformedFlagData { data: String, reason: &'static str },
    #[error("invalid affix condition {0:?}")]
    InvalidConditionPattern(String),
    #[error("affix rule {0} is declared more than once")]
    DuplicateRule(String),
    #[error("affix flag {0} is used for both prefixes and suffixes")]
    ConflictingRule(String),
    #[error("line {line}: {message}")]
    MalformedLine { line: usize, message: String },
}

impl SpellError {
    pub(crate) fn malformed_flags(data: &str, reason: &'static str) -> Self {
        SpellError::MalformedFlagData {
            data: data.to_string(),
            reason,
        }
    }

    /// Fill in the line number of a `MalformedLine` that was raised
    /// without knowing where it was.
    pub(crate) fn at_line(self, line: usize) -> Self {
        match self {
            SpellError::MalformedLine { line: 0, message } => {
                SpellError::MalformedLine { line, message }
            }
            other => other,
        }
    }
}
