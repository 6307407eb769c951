use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::GameError;
use crate::stats::SessionStats;
use crate::vocabulary::{Language, VocabularyWord};

pub const STARTING_LIVES: u32 = 3;
pub const TIME_LIMIT_CHOICES: [u64; 6] = [30, 60, 90, 120, 150, 180];
pub const DEFAULT_TIME_LIMIT_SECS: u64 = 60;
/// Input is refused for this long after every answer
pub const ANSWER_LOCK: Duration = Duration::from_millis(300);
pub const FEEDBACK_DURATION: Duration = Duration::from_millis(800);

#[derive(
    Debug,
    Copy,
    Clone,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    ValueEnum,
    strum_macros::Display,
)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Practice,
    Endless,
    Test,
    Timer,
    Hardcore,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameState {
    Menu,
    Playing,
    Result,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum EndReason {
    Quit,
    TimeUp,
    OutOfLives,
    PoolExhausted,
    Mastered,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SessionConfig {
    pub language: Language,
    pub mode: Mode,
    pub time_limit_secs: Option<u64>,
}

impl SessionConfig {
    /// Timer sessions default to 60 seconds; other modes carry no limit
    pub fn new(
        language: Language,
        mode: Mode,
        time_limit_secs: Option<u64>,
    ) -> Result<Self, GameError> {
        let time_limit_secs = match mode {
            Mode::Timer => {
                let secs = time_limit_secs.unwrap_or(DEFAULT_TIME_LIMIT_SECS);
                if !TIME_LIMIT_CHOICES.contains(&secs) {
                    return Err(GameError::InvalidTimeLimit(secs));
                }
                Some(secs)
            }
            _ => None,
        };

        Ok(Self {
            language,
            mode,
            time_limit_secs,
        })
    }
}

/// Transient marker shown after an answer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Feedback {
    Correct,
    Wrong,
}

/// Repeating one-second countdown owned by a timer session
#[derive(Debug, Clone, PartialEq)]
pub struct Countdown {
    pub seconds_remaining: u64,
    carry: Duration,
}

impl Countdown {
    pub fn new(seconds: u64) -> Self {
        Self {
            seconds_remaining: seconds,
            carry: Duration::ZERO,
        }
    }

    /// Consume elapsed time one whole second at a time. Returns true once expired.
    pub fn advance(&mut self, elapsed: Duration) -> bool {
        self.carry += elapsed;
        while self.carry >= Duration::from_secs(1) && self.seconds_remaining > 0 {
            self.carry -= Duration::from_secs(1);
            self.seconds_remaining -= 1;
        }
        self.is_expired()
    }

    pub fn is_expired(&self) -> bool {
        self.seconds_remaining == 0
    }
}

/// Everything owned by the session currently being played
#[derive(Debug, Clone)]
pub struct SessionRuntime {
    pub active_vocabulary: Vec<VocabularyWord>,
    pub current_word: Option<VocabularyWord>,
    pub score: u32,
    pub lives_remaining: u32,
    pub countdown: Option<Countdown>,
    pub test_pool: Vec<VocabularyWord>,
    pub test_index: usize,
    pub stats: SessionStats,
    pub lock_remaining: Option<Duration>,
    pub feedback: Option<(Feedback, Duration)>,
}

impl SessionRuntime {
    pub fn new(active_vocabulary: Vec<VocabularyWord>, config: &SessionConfig) -> Self {
        Self {
            active_vocabulary,
            current_word: None,
            score: 0,
            lives_remaining: STARTING_LIVES,
            countdown: config.time_limit_secs.map(Countdown::new),
            test_pool: Vec::new(),
            test_index: 0,
            stats: SessionStats::new(),
            lock_remaining: None,
            feedback: None,
        }
    }

    pub fn time_remaining_secs(&self) -> Option<u64> {
        self.countdown.as_ref().map(|c| c.seconds_remaining)
    }

    pub fn is_locked(&self) -> bool {
        self.lock_remaining.is_some()
    }

    pub fn feedback(&self) -> Option<Feedback> {
        self.feedback.map(|(f, _)| f)
    }

    /// Release the answer lock and expire feedback as time passes
    pub fn advance_timers(&mut self, elapsed: Duration) {
        self.lock_remaining = self
            .lock_remaining
            .and_then(|left| left.checked_sub(elapsed))
            .filter(|left| !left.is_zero());
        self.feedback = self
            .feedback
            .and_then(|(f, left)| left.checked_sub(elapsed).map(|l| (f, l)))
            .filter(|(_, left)| !left.is_zero());
    }
}
