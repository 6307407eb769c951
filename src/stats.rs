use indexmap::IndexMap;

use crate::util::ratio;

/// Accuracy reported for a word that has not been shown yet
pub const NEUTRAL_ACCURACY: f64 = 0.5;

/// Per-word tally for one session
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WordStat {
    pub appearances: u32,
    pub correct: u32,
    pub wrong: u32,
}

impl WordStat {
    fn record(&mut self, was_correct: bool) {
        self.appearances += 1;
        if was_correct {
            self.correct += 1;
        } else {
            self.wrong += 1;
        }
    }

    pub fn accuracy(&self) -> f64 {
        ratio(self.correct, self.appearances).unwrap_or(NEUTRAL_ACCURACY)
    }
}

/// Word statistics for the running session, kept in first-encounter order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionStats {
    words: IndexMap<String, WordStat>,
}

impl SessionStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, word: &str, was_correct: bool) {
        if let Some(stat) = self.words.get_mut(word) {
            stat.record(was_correct);
        } else {
            let mut stat = WordStat::default();
            stat.record(was_correct);
            self.words.insert(word.to_string(), stat);
        }
    }

    pub fn get(&self, word: &str) -> Option<&WordStat> {
        self.words.get(word)
    }

    pub fn appearances(&self, word: &str) -> u32 {
        self.get(word).map_or(0, |s| s.appearances)
    }

    pub fn accuracy(&self, word: &str) -> f64 {
        self.get(word).map_or(NEUTRAL_ACCURACY, WordStat::accuracy)
    }

    /// (correct, appearances) summed over every word
    pub fn totals(&self) -> (u32, u32) {
        self.words.values().fold((0, 0), |(correct, apps), s| {
            (correct + s.correct, apps + s.appearances)
        })
    }

    pub fn aggregate_accuracy(&self) -> f64 {
        let (correct, appearances) = self.totals();
        ratio(correct, appearances).unwrap_or(0.0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &WordStat)> {
        self.words.iter().map(|(w, s)| (w.as_str(), s))
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

impl FromIterator<(String, WordStat)> for SessionStats {
    fn from_iter<I: IntoIterator<Item = (String, WordStat)>>(iter: I) -> Self {
        Self {
            words: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_creates_stat_lazily() {
        let mut stats = SessionStats::new();
        assert!(stats.get("cat").is_none());

        stats.record("cat", true);

        assert_eq!(
            stats.get("cat"),
            Some(&WordStat {
                appearances: 1,
                correct: 1,
                wrong: 0
            })
        );
    }

    #[test]
    fn test_counts_always_add_up() {
        let mut stats = SessionStats::new();
        let answers = [true, false, false, true, true, false, true];
        for (i, correct) in answers.iter().enumerate() {
            stats.record(if i % 2 == 0 { "a" } else { "b" }, *correct);
            for (_, s) in stats.iter() {
                assert_eq!(s.correct + s.wrong, s.appearances);
            }
        }
    }

    #[test]
    fn test_accuracy_defaults_to_neutral() {
        let stats = SessionStats::new();
        assert_eq!(stats.accuracy("unseen"), NEUTRAL_ACCURACY);
    }

    #[test]
    fn test_word_accuracy() {
        let mut stats = SessionStats::new();
        stats.record("a", true);
        stats.record("a", false);
        stats.record("a", false);
        stats.record("a", true);
        assert_eq!(stats.accuracy("a"), 0.5);
        assert_eq!(stats.appearances("a"), 4);
    }

    #[test]
    fn test_aggregate_accuracy() {
        let mut stats = SessionStats::new();
        assert_eq!(stats.aggregate_accuracy(), 0.0);

        stats.record("a", true);
        stats.record("b", true);
        stats.record("b", false);
        stats.record("c", true);

        assert_eq!(stats.totals(), (3, 4));
        assert_eq!(stats.aggregate_accuracy(), 0.75);
    }

    #[test]
    fn test_iteration_keeps_encounter_order() {
        let mut stats = SessionStats::new();
        stats.record("zebra", true);
        stats.record("apple", false);
        stats.record("zebra", false);
        stats.record("mango", true);

        let order: Vec<&str> = stats.iter().map(|(w, _)| w).collect();
        assert_eq!(order, vec!["zebra", "apple", "mango"]);
    }
}
