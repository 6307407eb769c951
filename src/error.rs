use thiserror::Error;

use crate::session::GameState;
use crate::vocabulary::Language;

/// Errors raised by explicit game commands.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GameError {
    #[error("select a language before choosing a mode")]
    NoLanguageSelected,

    #[error("no vocabulary words available for {0}")]
    EmptyVocabulary(Language),

    #[error("unsupported time limit: {0}s")]
    InvalidTimeLimit(u64),

    #[error("cannot {action} while in {state:?}")]
    InvalidTransition {
        action: &'static str,
        state: GameState,
    },
}

/// Errors raised while loading a word list from disk.
#[derive(Error, Debug)]
pub enum VocabularyError {
    #[error("failed to read vocabulary file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse vocabulary: {0}")]
    Csv(#[from] csv::Error),
}
