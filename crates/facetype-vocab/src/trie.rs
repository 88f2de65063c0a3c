//! Prefix trie with ranked completions.
//!
//! Words are stored lowercase. A lower rank means a higher priority; when a
//! word is inserted more than once its node keeps the minimum rank seen.

use std::collections::BTreeMap;

#[derive(Debug, Default, Clone)]
struct TrieNode {
    children: BTreeMap<char, TrieNode>,
    rank: Option<usize>,
}

impl TrieNode {
    fn is_terminal(&self) -> bool {
        self.rank.is_some()
    }
}

#[derive(Debug, Default, Clone)]
pub struct Trie {
    root: TrieNode,
    words: usize,
}

impl Trie {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a trie where each word's rank is its position in `words`.
    pub fn from_ranked<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut trie = Self::new();
        for (rank, word) in words.into_iter().enumerate() {
            trie.insert(word.as_ref(), rank);
        }
        trie
    }

    /// Number of distinct words stored.
    pub fn len(&self) -> usize {
        self.words
    }

    pub fn is_empty(&self) -> bool {
        self.words == 0
    }

    /// Insert `word` with `rank`. Empty words are ignored.
    pub fn insert(&mut self, word: &str, rank: usize) {
        let word = word.to_lowercase();
        if word.is_empty() {
            return;
        }

        let mut node = &mut self.root;
        for c in word.chars() {
            node = node.children.entry(c).or_default();
        }
        match node.rank {
            Some(existing) => node.rank = Some(existing.min(rank)),
            None => {
                node.rank = Some(rank);
                self.words += 1;
            }
        }
    }

    /// Rank of an exact word, if present.
    pub fn rank_of(&self, word: &str) -> Option<usize> {
        self.find(&word.to_lowercase()).and_then(|node| node.rank)
    }

    fn find(&self, prefix: &str) -> Option<&TrieNode> {
        let mut node = &self.root;
        for c in prefix.chars() {
            node = node.children.get(&c)?;
        }
        Some(node)
    }

    /// Every stored word starting with `prefix`, paired with its rank.
    ///
    /// Unknown prefixes yield an empty list. Results come back in traversal
    /// order; callers sort by rank.
    pub fn lookup(&self, prefix: &str) -> Vec<(String, usize)> {
        let prefix = prefix.to_lowercase();
        let Some(start) = self.find(&prefix) else {
            return Vec::new();
        };

        // Explicit work stack keeps stack depth independent of word length.
        let mut results = Vec::new();
        let mut stack: Vec<(&TrieNode, String)> = vec![(start, prefix)];
        while let Some((node, word)) = stack.pop() {
            if let Some(rank) = node.rank {
                results.push((word.clone(), rank));
            }
            for (c, child) in node.children.iter().rev() {
                let mut next = word.clone();
                next.push(*c);
                stack.push((child, next));
            }
        }
        results
    }

    /// The `limit` best-ranked completions of `prefix`.
    pub fn top_completions(&self, prefix: &str, limit: usize) -> Vec<String> {
        let mut matches = self.lookup(prefix);
        matches.sort_by_key(|(_, rank)| *rank);
        matches.into_iter().take(limit).map(|(word, _)| word).collect()
    }

    pub fn contains(&self, word: &str) -> bool {
        self.find(&word.to_lowercase())
            .is_some_and(TrieNode::is_terminal)
    }
}

// =============================================================================
// Tests
// =============================================================================
