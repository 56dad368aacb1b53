/// Tries keyed by the bytes of affix strings, for finding every affix
/// that could have been attached to a word. Prefixes are walked from the
/// front of the word and suffixes from the back, so both share one node
/// type that only differs in the direction the key bytes are fed in.

#[derive(Clone, Debug)]
struct TrieNode<T> {
    end_here: Vec<T>,
    /// Children sorted by their byte, for binary search.
    more: Vec<(u8, TrieNode<T>)>,
}

impl<T> Default for TrieNode<T> {
    fn default() -> Self {
        TrieNode {
            end_here: Vec::new(),
            more: Vec::new(),
        }
    }
}

impl<T: Copy> TrieNode<T> {
    fn insert(&mut self, key: impl Iterator<Item = u8>, t: T) {
        let mut ptr = self;
        for b in key {
            let idx = match ptr.more.binary_search_by_key(&b, |(k, _)| *k) {
                Ok(idx) => idx,
                Err(idx) => {
                    ptr.more.insert(idx, (b, TrieNode::default()));
                    idx
                }
            };
            ptr = &mut ptr.more[idx].1;
        }
        ptr.end_here.push(t);
    }

    /// Report every value whose key is a prefix of `key`, shortest key
    /// first. Stops and returns true as soon as `found` returns true.
    fn walk(
        &self,
        key: impl Iterator<Item = u8>,
        mut found: impl FnMut(T) -> bool,
    ) -> bool {
        let mut ptr = self;
        let mut key = key;
        loop {
            for t in ptr.end_here.iter() {
                if found(*t) {
                    return true;
                }
            }
            let Some(b) = key.next() else {
                return false;
            };
            match ptr.more.binary_search_by_key(&b, |(k, _)| *k) {
                Ok(idx) => ptr = &ptr.more[idx].1,
                Err(_) => return false,
            }
        }
    }

    fn is_empty(&self) -> bool {
        self.end_here.is_empty() && self.more.is_empty()
    }
}

#[derive(Clone, Debug)]
pub struct PrefixTrie<T> {
    root: TrieNode<T>,
}

impl<T> Default for PrefixTrie<T> {
    fn default() -> Self {
        PrefixTrie {
            root: TrieNode::default(),
        }
    }
}

impl<T: Copy> PrefixTrie<T> {
    pub fn insert(&mut self, prefix: &str, t: T) {
        self.root.insert(prefix.bytes(), t);
    }

    /// Calls `found` for every inserted prefix that `word` starts with.
    pub fn lookup(&self, word: &str, found: impl FnMut(T) -> bool) -> bool {
        self.root.walk(word.bytes(), found)
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_empty()
    }
}

#[derive(Clone, Debug)]
pub struct SuffixTrie<T> {
    root: TrieNode<T>,
}

impl<T> Default for SuffixTrie<T> {
    fn default() -> Self {
        SuffixTrie {
            root: TrieNode::default(),
        }
    }
}

impl<T: Copy> SuffixTrie<T> {
    pub fn insert(&mut self, suffix: &str, t: T) {
        self.root.insert(suffix.bytes().rev(), t);
    }

    /// Calls `found` for every inserted suffix that `word` ends with.
    pub fn lookup(&self, word: &str, found: impl FnMut(T) -> bool) -> bool {
        self.root.walk(word.bytes().rev(), found)
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_empty()
    }
}
