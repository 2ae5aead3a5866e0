// Per-chat word counting.

use std::collections::HashMap;

use super::exclusion::ExclusionSet;
use super::tokenizer::tokenize;
use crate::export::models::{Chat, Message};

/// Which messages contribute text to a chat's word count.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MessageFilter {
    /// Every record with plain string text.
    #[default]
    All,
    /// Only records typed "message"; service events are skipped entirely.
    MessagesOnly,
}

impl MessageFilter {
    pub fn accepts(self, message: &Message) -> bool {
        match self {
            Self::All => true,
            Self::MessagesOnly => message.is_message(),
        }
    }
}

/// Occurrence count per token for one chat (or an aggregate of chats).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WordCount {
    counts: HashMap<String, u64>,
}

impl WordCount {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count for `word`, zero when unseen.
    pub fn get(&self, word: &str) -> u64 {
        self.counts.get(word).copied().unwrap_or(0)
    }

    /// Add `n` occurrences of `word`.
    pub fn add(&mut self, word: &str, n: u64) {
        if let Some(count) = self.counts.get_mut(word) {
            *count += n;
        } else {
            self.counts.insert(word.to_string(), n);
        }
    }

    /// Fold another count table into this one.
    pub fn merge(&mut self, other: &WordCount) {
        for (word, &n) in &other.counts {
            self.add(word, n);
        }
    }

    /// Sum of all counts.
    pub fn total(&self) -> u64 {
        self.counts.values().sum()
    }

    /// Number of distinct tokens.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn contains(&self, word: &str) -> bool {
        self.counts.contains_key(word)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.counts.iter().map(|(w, &n)| (w.as_str(), n))
    }

    /// Copy of this table with every excluded token removed.
    pub fn without(&self, excluded: &ExclusionSet) -> WordCount {
        let counts = self
            .counts
            .iter()
            .filter(|(word, _)| !excluded.contains(word))
            .map(|(word, &n)| (word.clone(), n))
            .collect();
        WordCount { counts }
    }
}

impl<'a> FromIterator<&'a str> for WordCount {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        let mut count = WordCount::new();
        for word in iter {
            count.add(word, 1);
        }
        count
    }
}

/// Tokenize every eligible message of `chat` and tally the tokens.
///
/// Messages whose text is absent or not a plain string contribute nothing.
pub fn count_words(chat: &Chat, filter: MessageFilter) -> WordCount {
    let mut count = WordCount::new();
    for message in chat.messages.iter().filter(|m| filter.accepts(m)) {
        let Some(text) = message.plain_text() else {
            continue;
        };
        for token in &tokenize(text) {
            count.add(token, 1);
        }
    }
    count
}
