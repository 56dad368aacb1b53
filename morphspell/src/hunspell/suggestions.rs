/// Generators of candidate corrections. Each one calls `suggest` with
/// its candidates in order of likelihood and stops as soon as `suggest`
/// returns false. The candidates are not checked here.

fn replace_at(word: &str, i: usize, len: usize, with: &str) -> String {
    let mut sugg = String::with_capacity(word.len() + with.len());
    sugg.push_str(&word[..i]);
    sugg.push_str(with);
    sugg.push_str(&word[i + len..]);
    sugg
}

/// Replace each char with its neighbours on the keyboard. The keyboard
/// is given as rows separated by `|`, like `qwertyuiop|asdfghjkl|zxcvbnm`.
pub fn keyboard_suggestions(
    keyboard: &str,
    word: &str,
    mut suggest: impl FnMut(String) -> bool,
) {
    let rows: Vec<Vec<char>> = keyboard.split('|').map(|row| row.chars().collect()).collect();
    for (i, c) in word.char_indices() {
        for row in rows.iter() {
            for (k, _) in row.iter().enumerate().filter(|(_, kc)| **kc == c) {
                let neighbours = [k.checked_sub(1), Some(k + 1)];
                for nc in neighbours.into_iter().flatten().filter_map(|n| row.get(n)) {
                    if !suggest(replace_at(word, i, c.len_utf8(), &nc.to_string())) {
                        return;
                    }
                }
            }
        }
    }
}

/// Split a MAP group into its members. Members are single chars, or
/// longer strings in parentheses.
fn map_members(group: &str) -> Vec<&str> {
    let mut members = Vec::new();
    let mut paren_start = None;
    for (i, c) in group.char_indices() {
        if let Some(start) = paren_start {
            if c == ')' {
                members.push(&group[start..i]);
                paren_start = None;
            }
        } else if c == '(' {
            paren_start = Some(i + 1);
        } else {
            members.push(&group[i..i + c.len_utf8()]);
        }
    }
    members
}

/// Replace one occurrence of a MAP group member with another member
/// of the same group.
pub fn related_char_suggestions(
    related: &[String],
    word: &str,
    mut suggest: impl FnMut(String) -> bool,
) {
    // Process the related classes in order, because the affix file ordered
    // them starting with the most likely.
    for group in related.iter() {
        let members = map_members(group);
        for (i, _) in word.char_indices() {
            for from in members.iter().filter(|m| !m.is_empty() && word[i..].starts_with(**m)) {
                for to in members.iter().filter(|m| *m != from) {
                    if !suggest(replace_at(word, i, from.len(), to)) {
                        return;
                    }
                }
            }
        }
    }
}

/// Replace each char with each of the TRY chars.
pub fn try_char_suggestions(
    word: &str,
    try_chars: &str,
    mut suggest: impl FnMut(String) -> bool,
) {
    for tc in try_chars.chars() {
        for (i, c) in word.char_indices() {
            if c == tc {
                continue;
            }
            if !suggest(replace_at(word, i, c.len_utf8(), &tc.to_string())) {
                return;
            }
        }
    }
}

pub fn swap_char_suggestions(
    word: &str,
    mut suggest: impl FnMut(String) -> bool,
) {
    let mut prev = None;
    for (i, c) in word.char_indices() {
        if let Some((prev_i, prev_c)) = prev {
            if prev_c != c {
                let mut sugg = String::with_capacity(word.len());
                sugg.push_str(&word[..prev_i]);
                sugg.push(c);
                sugg.push(prev_c);
                sugg.push_str(&word[i + c.len_utf8()..]);
                if !suggest(sugg) {
                    return;
                }
            }
        }
        prev = Some((i, c));
    }
}

pub fn delete_char_suggestions(
    word: &str,
    mut suggest: impl FnMut(String) -> bool,
) {
    for (i, c) in word.char_indices() {
        if !suggest(replace_at(word, i, c.len_utf8(), "")) {
            return;
        }
    }
}

pub fn add_char_suggestions(
    word: &str,
    try_chars: &str,
    mut suggest: impl FnMut(String) -> bool,
) {
    // Try them in order; the affix file put them in order of likelihood
    for tc in try_chars.chars() {
        // Try the char in front of each char
        let sugg_len = word.len() + tc.len_utf8();
        for (i, _) in word.char_indices() {
            let mut sugg = String::with_capacity(sugg_len);
            sugg.push_str(&word[..i]);
            sugg.push(tc);
            sugg.push_str(&word[i..]);
            if !suggest(sugg) {
                return;
            }
        }
        // Also try it at the end
        let mut sugg = String::with_capacity(sugg_len);
        sugg.push_str(word);
        sugg.push(tc);
        if !suggest(sugg) {
            return;
        }
    }
}

/// Split the word in two at each position.
pub fn split_word_suggestions(
    word: &str,
    mut suggest: impl FnMut(String) -> bool,
) {
    for (i, _) in word.char_indices().skip(1) {
        if !suggest(format!("{} {}", &word[..i], &word[i..])) {
            return;
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn collect(generator: impl FnOnce(&mut dyn FnMut(String) -> bool)) -> Vec<String> {
        let mut v = Vec::new();
        generator(&mut |sugg| {
            v.push(sugg);
            true
        });
        v
    }

    #[test]
    fn test_keyboard() {
        let v = collect(|f| keyboard_suggestions("qwerty|asdfgh", "ws", f));
        assert_eq!(vec!["qs", "es", "wa", "wd"], v);
    }

    #[test]
    fn test_related_chars() {
        let related = vec!["aáà".to_string(), "s(ss)ß".to_string()];
        let v = collect(|f| related_char_suggestions(&related, "as", f));
        assert_eq!(vec!["ás", "às", "ass", "aß"], v);
        let v = collect(|f| related_char_suggestions(&related, "ß", f));
        assert_eq!(vec!["s", "ss"], v);
    }

    #[test]
    fn test_edits() {
        assert_eq!(vec!["bac", "acb"], collect(|f| swap_char_suggestions("abc", f)));
        // swapping equal chars changes nothing
        assert_eq!(vec!["aba"], collect(|f| swap_char_suggestions("aab", f)));
        assert_eq!(vec!["bc", "ac", "ab"], collect(|f| delete_char_suggestions("abc", f)));
        assert_eq!(vec!["xab", "axb", "abx"], collect(|f| add_char_suggestions("ab", "x", f)));
        assert_eq!(vec!["xb", "ax"], collect(|f| try_char_suggestions("ab", "x", f)));
        assert_eq!(vec!["a bc", "ab c"], collect(|f| split_word_suggestions("abc", f)));
    }

    #[test]
    fn test_stop_early() {
        let mut v = Vec::new();
        delete_char_suggestions("abc", |sugg| {
            v.push(sugg);
            false
        });
        assert_eq!(vec!["bc"], v);
    }
}
