use thiserror::Error;

use crate::rules::Action;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GameError {
    #[error("Action {action} is not available")]
    ActionNotAvailable { action: Action },
    #[error("Invalid raise amount: {amount}, minimum: {minimum}")]
    InvalidAmount { amount: i64, minimum: i64 },
    #[error("There is no winner before the hand ends")]
    NoWinnerYet,
    #[error("Hand already finished, there is no current player")]
    GameFinished,
    #[error("Player {0} is already seated")]
    DuplicateName(String),
    #[error("Cards do not form a valid five-card hand")]
    InvalidHand,
    #[error("At least two players are required to deal, {seated} seated")]
    NotEnoughPlayers { seated: usize },
    #[error("No hand in progress")]
    NoHandInProgress,
    #[error("Moving {amount} chips would overflow a bankroll or the pot")]
    ChipOverflow { amount: i64 },
    #[error("Deck exhausted: requested {requested}, remaining {remaining}")]
    DeckExhausted { requested: usize, remaining: usize },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}
