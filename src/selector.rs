use rand::{Rng, RngCore};

use crate::session::Mode;
use crate::stats::SessionStats;
use crate::vocabulary::VocabularyWord;

/// Appearances every word needs before a practice session can be won
pub const MASTERY_MIN_APPEARANCES: u32 = 3;
/// Overall accuracy needed before a practice session can be won
pub const MASTERY_MIN_ACCURACY: f64 = 0.6;

/// Result of asking a selector for the next card
#[derive(Debug, Clone, PartialEq)]
pub enum Selection {
    Word(VocabularyWord),
    /// Practice goal reached; no further word is drawn
    Mastered,
}

/// Trait for the per-mode word selection strategies
pub trait WordSelector {
    fn select(
        &self,
        vocabulary: &[VocabularyWord],
        stats: &SessionStats,
        rng: &mut dyn RngCore,
    ) -> Selection;
}

/// Uniform draw with replacement (endless, timer and hardcore modes)
pub struct UniformSelector;

impl WordSelector for UniformSelector {
    fn select(
        &self,
        vocabulary: &[VocabularyWord],
        _stats: &SessionStats,
        rng: &mut dyn RngCore,
    ) -> Selection {
        let idx = rng.gen_range(0..vocabulary.len());
        Selection::Word(vocabulary[idx].clone())
    }
}

/// Adaptive practice selection favouring rarely seen and often missed words
pub struct PracticeSelector;

impl WordSelector for PracticeSelector {
    fn select(
        &self,
        vocabulary: &[VocabularyWord],
        stats: &SessionStats,
        rng: &mut dyn RngCore,
    ) -> Selection {
        if is_mastered(vocabulary, stats) {
            return Selection::Mastered;
        }

        let weights: Vec<f64> = vocabulary
            .iter()
            .map(|w| practice_weight(stats, &w.word))
            .collect();
        let total: f64 = weights.iter().sum();
        let target = rng.gen_range(0.0..total);

        let idx = roulette_index(&weights, target);
        log::trace!(
            "practice pick {:?} (weight {:.2} of {:.2})",
            vocabulary[idx].word,
            weights[idx],
            total
        );
        Selection::Word(vocabulary[idx].clone())
    }
}

/// Selector for a mode, or `None` when the mode walks a fixed pool instead
pub fn selector_for(mode: Mode) -> Option<Box<dyn WordSelector>> {
    match mode {
        Mode::Practice => Some(Box::new(PracticeSelector)),
        Mode::Endless | Mode::Timer | Mode::Hardcore => Some(Box::new(UniformSelector)),
        Mode::Test => None,
    }
}

/// Every word seen at least three times and at least 60% answered correctly
pub fn is_mastered(vocabulary: &[VocabularyWord], stats: &SessionStats) -> bool {
    let all_seen = vocabulary
        .iter()
        .all(|w| stats.appearances(&w.word) >= MASTERY_MIN_APPEARANCES);

    all_seen && stats.aggregate_accuracy() >= MASTERY_MIN_ACCURACY
}

/// `10 / (appearances + 1) + (1 - accuracy) * 5`
pub fn practice_weight(stats: &SessionStats, word: &str) -> f64 {
    let appearances = stats.appearances(word);
    let accuracy = stats.accuracy(word);
    10.0 / (appearances as f64 + 1.0) + (1.0 - accuracy) * 5.0
}

/// Index of the first weight whose running sum exceeds `target`.
/// Falls back to the last index if rounding leaves the walk short.
pub fn roulette_index(weights: &[f64], target: f64) -> usize {
    let mut running = 0.0;
    for (idx, weight) in weights.iter().enumerate() {
        running += weight;
        if running > target {
            return idx;
        }
    }
    weights.len().saturating_sub(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashMap;

    fn vocab(words: &[&str]) -> Vec<VocabularyWord> {
        words.iter().map(|w| VocabularyWord::new(*w, true)).collect()
    }

    #[test]
    fn test_weight_for_unseen_word() {
        let stats = SessionStats::new();
        // 10/1 + (1 - 0.5) * 5
        assert_eq!(practice_weight(&stats, "new"), 12.5);
    }

    #[test]
    fn test_weight_decays_with_exposure() {
        let mut stats = SessionStats::new();
        stats.record("a", true);
        // 10/2 + 0
        assert_eq!(practice_weight(&stats, "a"), 5.0);

        stats.record("a", true);
        stats.record("a", true);
        // 10/4 + 0
        assert_eq!(practice_weight(&stats, "a"), 2.5);
    }

    #[test]
    fn test_weight_grows_with_mistakes() {
        let mut stats = SessionStats::new();
        stats.record("a", false);
        // 10/2 + 1 * 5
        assert_eq!(practice_weight(&stats, "a"), 10.0);
    }

    #[test]
    fn test_roulette_walk() {
        let weights = [1.0, 2.0, 3.0];
        assert_eq!(roulette_index(&weights, 0.0), 0);
        assert_eq!(roulette_index(&weights, 0.99), 0);
        assert_eq!(roulette_index(&weights, 1.0), 1);
        assert_eq!(roulette_index(&weights, 2.5), 1);
        assert_eq!(roulette_index(&weights, 5.99), 2);
    }

    #[test]
    fn test_roulette_falls_back_to_last_candidate() {
        let weights = [1.0, 2.0, 3.0];
        // residual left over after the walk
        assert_eq!(roulette_index(&weights, 6.0), 2);
        assert_eq!(roulette_index(&weights, 6.0 + 1e-9), 2);
    }

    #[test]
    fn test_mastery_requires_three_appearances_each() {
        let words = vocab(&["a", "b"]);
        let mut stats = SessionStats::new();
        for _ in 0..3 {
            stats.record("a", true);
        }
        stats.record("b", true);
        stats.record("b", true);
        assert!(!is_mastered(&words, &stats));

        stats.record("b", true);
        assert!(is_mastered(&words, &stats));
    }

    #[test]
    fn test_mastery_requires_sixty_percent() {
        let words = vocab(&["a"]);
        let mut stats = SessionStats::new();
        stats.record("a", true);
        stats.record("a", false);
        stats.record("a", false);
        assert!(!is_mastered(&words, &stats));

        stats.record("a", true);
        stats.record("a", true);
        // 3 of 5
        assert!(is_mastered(&words, &stats));
    }

    #[test]
    fn test_practice_selector_reports_mastery() {
        let words = vocab(&["a"]);
        let mut stats = SessionStats::new();
        for _ in 0..3 {
            stats.record("a", true);
        }
        let mut rng = StdRng::seed_from_u64(7);
        assert_eq!(
            PracticeSelector.select(&words, &stats, &mut rng),
            Selection::Mastered
        );
    }

    #[test]
    fn test_practice_selector_favours_weak_words() {
        let words = vocab(&["known", "missed"]);
        let mut stats = SessionStats::new();
        for _ in 0..5 {
            stats.record("known", true);
        }
        stats.record("missed", false);
        stats.record("missed", false);

        let mut rng = StdRng::seed_from_u64(42);
        let mut counts: HashMap<String, usize> = HashMap::new();
        for _ in 0..1000 {
            if let Selection::Word(w) = PracticeSelector.select(&words, &stats, &mut rng) {
                *counts.entry(w.word).or_default() += 1;
            }
        }

        // weights are 10/6 and 10/3 + 5, so "missed" should dominate
        assert!(counts["missed"] > counts["known"] * 3);
    }

    #[test]
    fn test_uniform_selector_is_reproducible() {
        let words = vocab(&["a", "b", "c", "d", "e"]);
        let stats = SessionStats::new();

        let draw = |seed| {
            let mut rng = StdRng::seed_from_u64(seed);
            (0..20)
                .map(|_| match UniformSelector.select(&words, &stats, &mut rng) {
                    Selection::Word(w) => w.word,
                    Selection::Mastered => unreachable!(),
                })
                .collect::<Vec<_>>()
        };

        assert_eq!(draw(3), draw(3));
    }

    #[test]
    fn test_uniform_selector_allows_repeats() {
        let words = vocab(&["only"]);
        let stats = SessionStats::new();
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..3 {
            assert_eq!(
                UniformSelector.select(&words, &stats, &mut rng),
                Selection::Word(VocabularyWord::new("only", true))
            );
        }
    }

    #[test]
    fn test_selector_for_modes() {
        assert!(selector_for(Mode::Practice).is_some());
        assert!(selector_for(Mode::Endless).is_some());
        assert!(selector_for(Mode::Timer).is_some());
        assert!(selector_for(Mode::Hardcore).is_some());
        assert!(selector_for(Mode::Test).is_none());
    }
}
