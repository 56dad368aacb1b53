use crate::hunspell::casing::CapStyle;
use crate::hunspell::SpellerHunspellDict;

/// No more than this many suggestion attempts from any one source.
const MAX_SUGGESTS_PER_SOURCE: usize = 1000;

/// Gathers checked, de-duplicated suggestions in the order they were
/// offered, up to `max`.
#[derive(Clone, Debug)]
pub struct SuggCollector<'a> {
    dict: &'a SpellerHunspellDict,
    word: &'a str,
    caps: CapStyle,
    max: usize,
    suggs: Vec<String>,

    current_source: &'static str,
    counter: usize,
}

impl<'a> SuggCollector<'a> {
    pub fn new(dict: &'a SpellerHunspellDict, word: &'a str, max: usize) -> Self {
        SuggCollector {
            dict,
            word,
            caps: CapStyle::from_str(word),
            max,
            suggs: Vec::new(),
            current_source: "unknown",
            counter: MAX_SUGGESTS_PER_SOURCE,
        }
    }

    /// Start counting attempts for a new source of suggestions.
    pub fn new_source(&mut self, name: &'static str) {
        self.current_source = name;
        self.counter = MAX_SUGGESTS_PER_SOURCE;
    }

    /// Is the list full?
    pub fn is_full(&self) -> bool {
        self.suggs.len() >= self.max
    }

    /// Return true iff no more suggestions should be submitted
    pub fn limit(&self) -> bool {
        self.is_full() || self.counter == 0
    }

    fn is_new(&self, sugg: &str) -> bool {
        sugg != self.word && !self.suggs.iter().any(|s| s == sugg)
    }

    fn push(&mut self, sugg: String) {
        tracing::trace!(source = self.current_source, "suggesting {}", sugg);
        self.suggs.push(sugg);
    }

    /// Offer a suggestion exactly as given, without adjusting its case.
    pub fn suggest_exact(&mut self, sugg: &str) {
        if self.limit() || !self.is_new(sugg) {
            return;
        }
        self.counter -= 1;
        if self.dict.check_suggestion(sugg) {
            self.push(sugg.to_string());
        }
    }

    pub fn suggest(&mut self, sugg: &str) {
        if self.limit() || !self.is_new(sugg) {
            return;
        }
        self.counter -= 1;

        // If the original word was capitalized or uppercase, then prefer
        // capitalized or uppercased suggestions. Do fall back on the
        // unmodified suggestion in case the capitalized forms are rejected.
        let case = self.dict.affix_data().case_handling;
        let recased = match self.caps {
            CapStyle::Capitalized => Some(case.titlecase(sugg)),
            CapStyle::AllCaps => Some(case.uppercase(sugg)),
            _ => None,
        };
        if let Some(cap) = recased {
            if cap != sugg {
                if !self.is_new(&cap) {
                    return;
                }
                if self.dict.check_suggestion(&cap) {
                    self.push(cap);
                    return;
                }
            }
        }

        if self.dict.check_suggestion(sugg) {
            self.push(sugg.to_string());
        }
    }
}

impl<'a> IntoIterator for SuggCollector<'a> {
    type Item = String;
    type IntoIter = std::vec::IntoIter<Self::Item>;

    fn into_iter(self) -> Self::IntoIter {
        self.suggs.into_iter()
    }
}
