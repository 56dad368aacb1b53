use unicode_casing::CharExt;
use unicode_titlecase::StrTitleCase;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CapStyle {
    Lowercase,
    Capitalized,
    AllCaps,
    Mixed,
    Neutral,
}

impl CapStyle {
    pub fn from_str(word: &str) -> Self {
        let mut iter = word.chars();
        let c1 = match iter.next() {
            Some(c1) => c1,
            None => {
                return CapStyle::Neutral;
            }
        };
        if c1.is_lowercase() {
            for c in iter {
                if c.is_uppercase() || c.is_titlecase() {
                    return CapStyle::Mixed;
                }
            }
            CapStyle::Lowercase
        } else if c1.is_uppercase() {
            let mut seen_ucase = false;
            let mut seen_lcase = false;
            for c in iter {
                if c.is_lowercase() {
                    seen_lcase = true;
                } else if c.is_uppercase() {
                    seen_ucase = true;
                } else if c.is_titlecase() {
                    return CapStyle::Mixed;
                }
            }
            if seen_ucase && seen_lcase {
                CapStyle::Mixed
            } else if seen_lcase {
                CapStyle::Capitalized
            } else {
                CapStyle::AllCaps
            }
        } else if c1.is_titlecase() {
            for c in iter {
                if c.is_uppercase() || c.is_titlecase() {
                    return CapStyle::Mixed;
                }
            }
            CapStyle::Capitalized
        } else {
            CapStyle::from_str(&word[c1.len_utf8()..])
        }
    }
}

/// Language-specific case mapping, selected by the affix file's LANG.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CaseHandling {
    #[default]
    Standard,
    /// Turkish, Azeri and Crimean Tatar map dotted and dotless i separately.
    Turkic,
}

impl CaseHandling {
    pub fn from_lang(lang: &str) -> Self {
        let code = lang.split(['_', '-']).next().unwrap_or(lang);
        match code {
            "tr" | "az" | "crh" => CaseHandling::Turkic,
            _ => CaseHandling::Standard,
        }
    }

    pub fn lowercase(self, word: &str) -> String {
        match self {
            CaseHandling::Standard => word.to_lowercase(),
            CaseHandling::Turkic => word
                .chars()
                .map(|c| match c {
                    'I' => 'ı',
                    'İ' => 'i',
                    c => c,
                })
                .collect::<String>()
                .to_lowercase(),
        }
    }

    pub fn uppercase(self, word: &str) -> String {
        match self {
            CaseHandling::Standard => word.to_uppercase(),
            CaseHandling::Turkic => word
                .chars()
                .map(|c| if c == 'i' { 'İ' } else { c })
                .collect::<String>()
                .to_uppercase(),
        }
    }

    /// First letter in titlecase, the rest lowercased.
    pub fn titlecase(self, word: &str) -> String {
        match self {
            CaseHandling::Standard => word.to_titlecase_lower_rest(),
            CaseHandling::Turkic => {
                let mut iter = word.chars();
                match iter.next() {
                    Some(c1) => {
                        let mut s = self.uppercase(&c1.to_string());
                        s.push_str(&self.lowercase(iter.as_str()));
                        s
                    }
                    None => String::new(),
                }
            }
        }
    }
}
