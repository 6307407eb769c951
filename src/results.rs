use itertools::Itertools;

use crate::session::{EndReason, Mode, SessionConfig};
use crate::stats::SessionStats;
use crate::util::percent;
use crate::vocabulary::Language;

/// Length of the "frequently missed" list
pub const MISSED_WORDS_SHOWN: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissedWord {
    pub word: String,
    pub wrong: u32,
    pub appearances: u32,
}

/// Read-only summary computed when a session reaches the result screen
#[derive(Debug, Clone, PartialEq)]
pub struct ResultSummary {
    pub language: Language,
    pub mode: Mode,
    pub time_limit_secs: Option<u64>,
    pub score: u32,
    pub accuracy_percent: u32,
    pub total_answers: u32,
    pub total_correct: u32,
    pub words_seen: usize,
    pub frequently_missed: Vec<MissedWord>,
    pub end_reason: EndReason,
}

impl ResultSummary {
    pub fn analyze(
        config: &SessionConfig,
        stats: &SessionStats,
        score: u32,
        end_reason: EndReason,
    ) -> Self {
        let (total_correct, total_answers) = stats.totals();
        Self {
            language: config.language,
            mode: config.mode,
            time_limit_secs: config.time_limit_secs,
            score,
            accuracy_percent: accuracy_percent(stats),
            total_answers,
            total_correct,
            words_seen: stats.len(),
            frequently_missed: frequently_missed(stats),
            end_reason,
        }
    }
}

pub fn accuracy_percent(stats: &SessionStats) -> u32 {
    let (correct, appearances) = stats.totals();
    percent(correct, appearances)
}

/// Words answered wrongly at least once, most misses first. Ties keep the
/// order in which the words were first shown.
pub fn frequently_missed(stats: &SessionStats) -> Vec<MissedWord> {
    stats
        .iter()
        .filter(|(_, s)| s.wrong > 0)
        .map(|(word, s)| MissedWord {
            word: word.to_string(),
            wrong: s.wrong,
            appearances: s.appearances,
        })
        .sorted_by(|a, b| b.wrong.cmp(&a.wrong))
        .take(MISSED_WORDS_SHOWN)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::WordStat;

    fn stat(correct: u32, wrong: u32) -> WordStat {
        WordStat {
            appearances: correct + wrong,
            correct,
            wrong,
        }
    }

    #[test]
    fn test_missed_words_sorted_by_mistakes() {
        let stats: SessionStats = [
            ("a".to_string(), stat(0, 3)),
            ("b".to_string(), stat(1, 5)),
            ("c".to_string(), stat(4, 0)),
        ]
        .into_iter()
        .collect();

        let words: Vec<String> = frequently_missed(&stats)
            .into_iter()
            .map(|m| m.word)
            .collect();
        assert_eq!(words, vec!["b", "a"]);
    }

    #[test]
    fn test_missed_words_ties_keep_encounter_order() {
        let mut stats = SessionStats::new();
        for w in ["x", "y", "z"] {
            stats.record(w, false);
        }
        stats.record("w", false);
        stats.record("w", false);

        let words: Vec<String> = frequently_missed(&stats)
            .into_iter()
            .map(|m| m.word)
            .collect();
        assert_eq!(words, vec!["w", "x", "y", "z"]);
    }

    #[test]
    fn test_missed_words_truncated_to_five() {
        let mut stats = SessionStats::new();
        for (i, w) in ["a", "b", "c", "d", "e", "f", "g"].iter().enumerate() {
            for _ in 0..=i {
                stats.record(w, false);
            }
        }

        let missed = frequently_missed(&stats);
        assert_eq!(missed.len(), MISSED_WORDS_SHOWN);
        assert_eq!(missed[0].word, "g");
        assert_eq!(missed[0].wrong, 7);
        assert_eq!(missed[4].word, "c");
    }

    #[test]
    fn test_accuracy_percent() {
        let mut stats = SessionStats::new();
        assert_eq!(accuracy_percent(&stats), 0);

        stats.record("a", true);
        stats.record("a", true);
        stats.record("b", false);
        assert_eq!(accuracy_percent(&stats), 67);
    }

    #[test]
    fn test_analyze() {
        let config = SessionConfig::new(Language::English, Mode::Hardcore, None).unwrap();
        let mut stats = SessionStats::new();
        stats.record("cat", true);
        stats.record("dgo", false);

        let summary = ResultSummary::analyze(&config, &stats, 1, EndReason::OutOfLives);

        assert_eq!(summary.score, 1);
        assert_eq!(summary.accuracy_percent, 50);
        assert_eq!(summary.total_answers, 2);
        assert_eq!(summary.total_correct, 1);
        assert_eq!(summary.words_seen, 2);
        assert_eq!(summary.frequently_missed.len(), 1);
        assert_eq!(summary.end_reason, EndReason::OutOfLives);
    }
}
