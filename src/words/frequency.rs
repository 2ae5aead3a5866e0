// Relative frequency comparison: the word cloud weights.
//
// For each word, compare how often the target chat uses it against how often
// the rest of the archive does:
//
//   score = (selected_count / selected_total) / (global_count / total_words)
//
// A word the baseline never saw is divided by UNSEEN_PROBABILITY instead,
// which pushes chat-unique words to the top of the cloud. Words only the
// baseline uses score exactly 0. With no other chats at all there is nothing
// to contrast against and the score is the plain relative frequency.

use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

use indicatif::{ProgressBar, ProgressStyle};
use serde::{Serialize, Serializer};
use tracing::debug;

use super::counter::{count_words, MessageFilter, WordCount};
use super::exclusion::ExclusionSet;
use super::traits::WordScorer;
use crate::export::models::Chat;

/// Baseline probability assumed for words the comparison corpus never used.
pub const UNSEEN_PROBABILITY: f64 = 1e-10;

/// Word -> distinctiveness weight for one target chat.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrequencyScores {
    scores: HashMap<String, f64>,
}

impl FrequencyScores {
    pub fn get(&self, word: &str) -> Option<f64> {
        self.scores.get(word).copied()
    }

    pub fn contains(&self, word: &str) -> bool {
        self.scores.contains_key(word)
    }

    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.scores.iter().map(|(w, &s)| (w.as_str(), s))
    }

    /// Sum of all scores.
    pub fn total(&self) -> f64 {
        self.scores.values().sum()
    }

    /// Highest scores first, ties broken alphabetically. `limit` of `None`
    /// returns every word.
    pub fn ranked(&self, limit: Option<usize>) -> Vec<(&str, f64)> {
        let mut ranked: Vec<(&str, f64)> = self.iter().collect();
        ranked.sort_by(|a, b| {
            b.1.partial_cmp(&a.1)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.0.cmp(b.0))
        });
        if let Some(limit) = limit {
            ranked.truncate(limit);
        }
        ranked
    }
}

/// Serializes as a flat `{word: score}` object in ranked order.
impl Serialize for FrequencyScores {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.ranked(None))
    }
}

/// Aggregate word counts of every chat except the target.
#[derive(Debug, Clone, Default)]
pub struct Baseline {
    counts: WordCount,
    total_words: u64,
    chats: usize,
}

impl Baseline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one comparison chat, dropping excluded tokens first.
    pub fn add_chat(&mut self, chat: &Chat, excluded: &ExclusionSet, filter: MessageFilter) {
        let filtered = count_words(chat, filter).without(excluded);
        self.total_words += filtered.total();
        self.counts.merge(&filtered);
        self.chats += 1;
    }

    /// Number of chats folded in so far (including ones with no words).
    pub fn chat_count(&self) -> usize {
        self.chats
    }

    pub fn total_words(&self) -> u64 {
        self.total_words
    }

    pub fn counts(&self) -> &WordCount {
        &self.counts
    }

    /// Relative frequency of every baseline word. Empty when the baseline
    /// holds no words at all.
    pub fn probabilities(&self) -> HashMap<String, f64> {
        if self.total_words == 0 {
            return HashMap::new();
        }
        let total = self.total_words as f64;
        self.counts
            .iter()
            .map(|(word, n)| (word.to_string(), n as f64 / total))
            .collect()
    }
}

/// Score the target's (already filtered) counts against a baseline.
pub fn score_against(selected: &WordCount, baseline: &Baseline) -> FrequencyScores {
    // Guard the divisor; with nothing left the scores degrade to raw counts.
    let selected_total = match selected.total() {
        0 => 1.0,
        n => n as f64,
    };

    if baseline.chat_count() == 0 {
        let scores = selected
            .iter()
            .map(|(word, n)| (word.to_string(), n as f64 / selected_total))
            .collect();
        return FrequencyScores { scores };
    }

    let global_probs = baseline.probabilities();
    let all_words: HashSet<&str> = selected
        .iter()
        .map(|(word, _)| word)
        .chain(global_probs.keys().map(String::as_str))
        .collect();

    let scores = all_words
        .into_iter()
        .map(|word| {
            let relative = selected.get(word) as f64 / selected_total;
            let baseline_prob = global_probs
                .get(word)
                .copied()
                .unwrap_or(UNSEEN_PROBABILITY);
            (word.to_string(), relative / baseline_prob)
        })
        .collect();

    FrequencyScores { scores }
}

/// Score `target` against `others` with the default message filter.
pub fn calculate_frequencies(
    target: &Chat,
    others: &[&Chat],
    excluded: &ExclusionSet,
) -> FrequencyScores {
    RelativeFrequencyScorer::new(excluded.clone()).score(target, others)
}

/// Relative frequency scorer, the default `WordScorer`.
#[derive(Debug, Clone, Default)]
pub struct RelativeFrequencyScorer {
    /// Tokens dropped from both sides before any arithmetic
    pub excluded: ExclusionSet,
    /// Which messages contribute text
    pub filter: MessageFilter,
    /// Draw a progress bar while counting the comparison corpus
    pub show_progress: bool,
}

impl RelativeFrequencyScorer {
    pub fn new(excluded: ExclusionSet) -> Self {
        Self {
            excluded,
            ..Self::default()
        }
    }

    pub fn with_filter(mut self, filter: MessageFilter) -> Self {
        self.filter = filter;
        self
    }

    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    fn build_baseline(&self, others: &[&Chat]) -> Baseline {
        let pb = if self.show_progress {
            ProgressBar::new(others.len() as u64)
        } else {
            ProgressBar::hidden()
        };
        pb.set_style(
            ProgressStyle::default_bar()
                .template("  Corpus [{bar:30}] {pos}/{len} ({eta})")
                .unwrap(),
        );

        let mut baseline = Baseline::new();
        for chat in others {
            baseline.add_chat(chat, &self.excluded, self.filter);
            pb.inc(1);
        }
        pb.finish_and_clear();
        baseline
    }
}

impl WordScorer for RelativeFrequencyScorer {
    fn score(&self, target: &Chat, others: &[&Chat]) -> FrequencyScores {
        let baseline = self.build_baseline(others);
        let selected = count_words(target, self.filter).without(&self.excluded);

        debug!(
            target = %target.name,
            selected_words = selected.total(),
            selected_distinct = selected.len(),
            baseline_chats = baseline.chat_count(),
            baseline_words = baseline.total_words(),
            baseline_distinct = baseline.counts().len(),
            "Computing relative frequencies"
        );

        score_against(&selected, &baseline)
    }
}
