#[derive(Clone, Debug, Default)]
struct Rep {
    anchor_begin: bool,
    anchor_end: bool,
    from: String,
    to: String,
}

impl Rep {
    fn matches(&self, word: &str, at_start: bool) -> bool {
        if self.anchor_begin && !at_start {
            false
        } else if self.anchor_end {
            word == self.from
        } else {
            word.starts_with(&self.from)
        }
    }
}

/// A table of string replacements. Used both for REP suggestions, where
/// each replacement is tried separately, and for ICONV and OCONV, where
/// the longest match at each position is applied throughout the word.
#[derive(Clone, Debug, Default)]
pub struct Replacements {
    reps: Vec<Rep>,
}

impl Replacements {
    /// Add a replacement. `^` at the start of `from` anchors it to the
    /// start of the word and `$` at the end anchors it to the end.
    pub fn push(&mut self, from: &str, to: &str) {
        let mut rep = Rep::default();
        let mut from = from;
        if let Some(f) = from.strip_prefix('^') {
            from = f;
            rep.anchor_begin = true;
        }
        if let Some(f) = from.strip_suffix('$') {
            from = f;
            rep.anchor_end = true;
        }
        if from.is_empty() {
            return;
        }
        rep.from = from.to_string();
        rep.to = to.to_string();
        self.reps.push(rep);
    }

    /// Add a REP line's replacement, where `_` stands for a space.
    pub fn push_rep(&mut self, from: &str, to: &str) {
        self.push(&from.replace('_', " "), &to.replace('_', " "));
    }

    pub fn is_empty(&self) -> bool {
        self.reps.is_empty()
    }

    // TODO make this logarithmic instead of linear
    fn longest_match(&self, word: &str, at_start: bool) -> Option<&Rep> {
        let mut longest_len = 0;
        let mut longest_rep: Option<&Rep> = None;
        for rep in self.reps.iter() {
            if rep.from.len() > longest_len && rep.matches(word, at_start) {
                longest_len = rep.from.len();
                longest_rep = Some(rep);
            }
        }
        longest_rep
    }

    /// Apply the conversions to `word`, scanning left to right and
    /// replacing the longest match at each position.
    pub fn conv(&self, word: &str) -> String {
        if self.reps.is_empty() {
            return word.to_string();
        }
        let mut output = String::new();
        let mut skip_to = 0;
        for (i, c) in word.char_indices() {
            if i < skip_to {
                continue;
            }
            if let Some(rep) = self.longest_match(&word[i..], i == 0) {
                output += &rep.to;
                skip_to = i + rep.from.len();
            } else {
                output.push(c);
            }
        }
        output
    }

    /// Offer each single replacement that applies to `word`, from left to
    /// right and in table order at each position. Stops when `suggest`
    /// returns false.
    pub fn suggest(&self, word: &str, mut suggest: impl FnMut(String) -> bool) {
        for (i, _) in word.char_indices() {
            for rep in self.reps.iter() {
                if rep.matches(&word[i..], i == 0) {
                    let mut sugg = word[..i].to_string();
                    sugg += &rep.to;
                    sugg += &word[i + rep.from.len()..];
                    if !suggest(sugg) {
                        return;
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn collect(reps: &Replacements, word: &str) -> Vec<String> {
        let mut v = Vec::new();
        reps.suggest(word, |sugg| {
            v.push(sugg);
            true
        });
        v
    }

    #[test]
    fn test_rep_suggestions() {
        let mut reps = Replacements::default();
        reps.push_rep("f", "ph");
        reps.push_rep("^alot$", "a_lot");
        reps.push_rep("^un", "in");
        assert_eq!(vec!["phone"], collect(&reps, "fone"));
        assert_eq!(vec!["a lot"], collect(&reps, "alot"));
        assert!(collect(&reps, "alots").is_empty());
        assert_eq!(vec!["ineasy"], collect(&reps, "uneasy"));
        assert!(collect(&reps, "bun").is_empty());
    }

    #[test]
    fn test_conv() {
        let mut conv = Replacements::default();
        conv.push("’", "'");
        conv.push("a", "b");
        conv.push("aa", "c");
        assert_eq!("don't", conv.conv("don’t"));
        assert_eq!("cb", conv.conv("aaa"));
        assert_eq!("xyz", Replacements::default().conv("xyz"));
    }
}
