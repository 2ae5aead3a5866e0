// Word scorer trait, swap-ready abstraction.
//
// The renderer only needs word -> weight. The default implementation scores
// words by relative frequency against the rest of the archive; a TF-IDF or
// log-odds scorer could slot in here without touching the CLI.

use super::frequency::FrequencyScores;
use crate::export::models::Chat;

/// Trait for turning a target chat plus its comparison corpus into weights.
pub trait WordScorer {
    /// Score every word of `target` (and of `others`) for the word cloud.
    fn score(&self, target: &Chat, others: &[&Chat]) -> FrequencyScores;
}
