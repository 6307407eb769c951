use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{RngCore, SeedableRng};
use std::time::Duration;

use crate::error::GameError;
use crate::input::{GestureController, InputEvent};
use crate::results::ResultSummary;
use crate::selector::{selector_for, Selection};
use crate::session::{
    EndReason, Feedback, GameState, Mode, SessionConfig, SessionRuntime, ANSWER_LOCK,
    FEEDBACK_DURATION,
};
use crate::vocabulary::{Language, Vocabulary, VocabularyWord};

/// What happened when an answer was accepted
#[derive(Debug, Clone, PartialEq)]
pub struct AnswerOutcome {
    pub word: VocabularyWord,
    pub claim: bool,
    pub was_correct: bool,
    pub ended: Option<EndReason>,
}

/// The flashcard game: menu, the session being played, and its result.
///
/// Every input event is applied by one synchronous method call. Time only
/// moves through [`Game::advance`], so timers are fully deterministic under test.
#[derive(Debug)]
pub struct Game<R: RngCore = StdRng> {
    vocabulary: Vocabulary,
    rng: R,
    state: GameState,
    language: Option<Language>,
    config: Option<SessionConfig>,
    runtime: Option<SessionRuntime>,
    summary: Option<ResultSummary>,
    gestures: GestureController,
}

impl Game<StdRng> {
    /// Seeded for reproducible sessions, or from entropy when `seed` is `None`
    pub fn with_seed(vocabulary: Vocabulary, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self::new(vocabulary, rng)
    }
}

impl<R: RngCore> Game<R> {
    pub fn new(vocabulary: Vocabulary, rng: R) -> Self {
        Self {
            vocabulary,
            rng,
            state: GameState::Menu,
            language: None,
            config: None,
            runtime: None,
            summary: None,
            gestures: GestureController::default(),
        }
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn language(&self) -> Option<Language> {
        self.language
    }

    pub fn config(&self) -> Option<&SessionConfig> {
        self.config.as_ref()
    }

    pub fn runtime(&self) -> Option<&SessionRuntime> {
        self.runtime.as_ref()
    }

    pub fn summary(&self) -> Option<&ResultSummary> {
        self.summary.as_ref()
    }

    pub fn gestures(&self) -> &GestureController {
        &self.gestures
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    pub fn current_word(&self) -> Option<&VocabularyWord> {
        self.runtime.as_ref()?.current_word.as_ref()
    }

    pub fn feedback(&self) -> Option<Feedback> {
        self.runtime.as_ref()?.feedback()
    }

    pub fn is_input_locked(&self) -> bool {
        self.runtime.as_ref().is_some_and(SessionRuntime::is_locked)
    }

    pub fn select_language(&mut self, language: Language) -> Result<(), GameError> {
        self.expect_state(GameState::Menu, "select a language")?;
        self.language = Some(language);
        Ok(())
    }

    pub fn clear_language(&mut self) -> Result<(), GameError> {
        self.expect_state(GameState::Menu, "change language")?;
        self.language = None;
        Ok(())
    }

    /// Menu -> Playing. On an empty word list the game stays in the menu.
    pub fn start(&mut self, mode: Mode, time_limit_secs: Option<u64>) -> Result<(), GameError> {
        self.expect_state(GameState::Menu, "start a session")?;
        let language = self.language.ok_or(GameError::NoLanguageSelected)?;
        let config = SessionConfig::new(language, mode, time_limit_secs)?;
        self.begin(config)
    }

    /// Result -> Playing with the same language, mode and time limit
    pub fn play_again(&mut self) -> Result<(), GameError> {
        self.expect_state(GameState::Result, "play again")?;
        let config = self
            .config
            .clone()
            .ok_or(GameError::NoLanguageSelected)?;
        self.begin(config)
    }

    /// Playing -> Result at the player's request
    pub fn quit(&mut self) -> Result<(), GameError> {
        self.expect_state(GameState::Playing, "quit")?;
        self.finish(EndReason::Quit);
        Ok(())
    }

    /// Result -> Menu, forgetting the language and mode
    pub fn back_to_menu(&mut self) -> Result<(), GameError> {
        self.expect_state(GameState::Result, "return to the menu")?;
        self.state = GameState::Menu;
        self.language = None;
        self.config = None;
        self.runtime = None;
        self.summary = None;
        self.gestures.reset();
        Ok(())
    }

    /// Route raw input through the gesture controller; commits an answer when
    /// a key or a long enough swipe says so
    pub fn handle_input(&mut self, event: InputEvent) -> Option<AnswerOutcome> {
        if self.state != GameState::Playing {
            return None;
        }
        let locked = self.is_input_locked();
        let claim = self.gestures.handle(event, locked)?;
        self.answer(claim)
    }

    /// Judge the player's claim that the shown spelling is correct.
    /// Returns `None` when the answer was not accepted.
    pub fn answer(&mut self, claim: bool) -> Option<AnswerOutcome> {
        if self.state != GameState::Playing {
            return None;
        }
        let mode = self.config.as_ref()?.mode;
        let runtime = self.runtime.as_mut()?;
        if runtime.is_locked() {
            log::trace!("answer ignored while the card is changing");
            return None;
        }
        let word = runtime.current_word.clone()?;
        let was_correct = word.is_correct == claim;

        runtime.stats.record(&word.word, was_correct);

        let mut ended = None;
        if was_correct {
            runtime.score += 1;
        }
        match mode {
            Mode::Hardcore if !was_correct => {
                runtime.lives_remaining = runtime.lives_remaining.saturating_sub(1);
                if runtime.lives_remaining == 0 {
                    ended = Some(EndReason::OutOfLives);
                }
            }
            Mode::Test => runtime.test_index += 1,
            _ => {}
        }

        if ended.is_none() {
            ended = draw_next(runtime, mode, &mut self.rng);
        }

        runtime.lock_remaining = Some(ANSWER_LOCK);
        // a drag begun on the answered card must not carry over to the next one
        self.gestures.reset();
        if mode != Mode::Test {
            let feedback = if was_correct {
                Feedback::Correct
            } else {
                Feedback::Wrong
            };
            runtime.feedback = Some((feedback, FEEDBACK_DURATION));
        }

        log::debug!(
            "{:?} claimed {} -> {}",
            word.word,
            claim,
            if was_correct { "correct" } else { "wrong" }
        );

        if let Some(reason) = ended {
            self.finish(reason);
        }

        Some(AnswerOutcome {
            word,
            claim,
            was_correct,
            ended,
        })
    }

    /// Let time pass: releases the answer lock, expires feedback and runs
    /// the timer-mode countdown
    pub fn advance(&mut self, elapsed: Duration) {
        if self.state != GameState::Playing {
            return;
        }
        let Some(runtime) = self.runtime.as_mut() else {
            return;
        };

        runtime.advance_timers(elapsed);
        let expired = runtime
            .countdown
            .as_mut()
            .is_some_and(|countdown| countdown.advance(elapsed));

        if expired {
            self.finish(EndReason::TimeUp);
        }
    }

    fn begin(&mut self, config: SessionConfig) -> Result<(), GameError> {
        let words = self.vocabulary.words(config.language).to_vec();
        if words.is_empty() {
            log::warn!("no vocabulary words available for {}", config.language);
            return Err(GameError::EmptyVocabulary(config.language));
        }

        let mut runtime = SessionRuntime::new(words, &config);
        if config.mode == Mode::Test {
            runtime.test_pool = runtime.active_vocabulary.clone();
            runtime.test_pool.shuffle(&mut self.rng);
        }
        let ended = draw_next(&mut runtime, config.mode, &mut self.rng);

        log::info!(
            "starting {} session in {} with {} words",
            config.mode,
            config.language,
            runtime.active_vocabulary.len()
        );

        self.gestures.reset();
        self.summary = None;
        self.language = Some(config.language);
        self.config = Some(config);
        self.runtime = Some(runtime);
        self.state = GameState::Playing;

        if let Some(reason) = ended {
            self.finish(reason);
        }
        Ok(())
    }

    fn finish(&mut self, reason: EndReason) {
        let (Some(config), Some(runtime)) = (self.config.as_ref(), self.runtime.as_mut()) else {
            return;
        };

        runtime.countdown = None;
        runtime.lock_remaining = None;
        runtime.feedback = None;

        let summary = ResultSummary::analyze(config, &runtime.stats, runtime.score, reason);
        log::info!(
            "{} session ended ({}): score {}, accuracy {}%",
            config.mode,
            reason,
            summary.score,
            summary.accuracy_percent
        );

        self.summary = Some(summary);
        self.gestures.reset();
        self.state = GameState::Result;
    }

    fn expect_state(&self, expected: GameState, action: &'static str) -> Result<(), GameError> {
        if self.state == expected {
            Ok(())
        } else {
            Err(GameError::InvalidTransition {
                action,
                state: self.state,
            })
        }
    }
}

/// Put the next card in front of the player. Modes without a selector walk
/// the shuffled test pool instead.
fn draw_next(
    runtime: &mut SessionRuntime,
    mode: Mode,
    rng: &mut dyn RngCore,
) -> Option<EndReason> {
    match selector_for(mode) {
        Some(selector) => {
            match selector.select(&runtime.active_vocabulary, &runtime.stats, rng) {
                Selection::Word(word) => {
                    runtime.current_word = Some(word);
                    None
                }
                Selection::Mastered => Some(EndReason::Mastered),
            }
        }
        None => {
            runtime.current_word = runtime.test_pool.get(runtime.test_index).cloned();
            runtime
                .current_word
                .is_none()
                .then_some(EndReason::PoolExhausted)
        }
    }
}
