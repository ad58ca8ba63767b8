use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::GameError;

/// A betting street, or the terminal state of a hand.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Round {
    Preflop,
    Flop,
    Turn,
    River,
    Finished,
}

impl Round {
    /// Street that follows this one. `River` advances to `Finished`, which is
    /// terminal.
    pub fn next(self) -> Round {
        match self {
            Round::Preflop => Round::Flop,
            Round::Flop => Round::Turn,
            Round::Turn => Round::River,
            Round::River | Round::Finished => Round::Finished,
        }
    }

    /// Community cards revealed when this street completes (after one burn).
    pub fn cards_to_reveal(self) -> usize {
        match self {
            Round::Preflop => 3,
            _ => 1,
        }
    }
}

impl fmt::Display for Round {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Round::Preflop => "preflop",
            Round::Flop => "flop",
            Round::Turn => "turn",
            Round::River => "river",
            Round::Finished => "finished",
        };
        f.write_str(s)
    }
}

/// Kinds of action a player may take, as offered by `available_actions`.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    Fold,
    Check,
    Call,
    Raise,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Action::Fold => "fold",
            Action::Check => "check",
            Action::Call => "call",
            Action::Raise => "raise",
        };
        f.write_str(s)
    }
}

/// An action as it was actually played, with the raise level when relevant.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
pub enum PlayerAction {
    Fold,
    Check,
    Call,
    Raise(i64),
}

impl PlayerAction {
    pub fn kind(self) -> Action {
        match self {
            PlayerAction::Fold => Action::Fold,
            PlayerAction::Check => Action::Check,
            PlayerAction::Call => Action::Call,
            PlayerAction::Raise(_) => Action::Raise,
        }
    }
}

/// Legal actions for a player whose street contribution is `own`, facing
/// `previous`, the contribution of the nearest non-folded player before them.
///
/// Fold and raise are always offered while the hand is live; exactly one of
/// check or call completes the list.
///
/// # Examples
///
/// ```
/// use holdem_engine::rules::{available_actions, Action, Round};
///
/// let facing_blind = available_actions(Round::Preflop, 0, 50);
/// assert_eq!(facing_blind, vec![Action::Fold, Action::Raise, Action::Call]);
///
/// let matched = available_actions(Round::Flop, 50, 50);
/// assert!(matched.contains(&Action::Check));
///
/// assert!(available_actions(Round::Finished, 0, 0).is_empty());
/// ```
pub fn available_actions(round: Round, own: i64, previous: i64) -> Vec<Action> {
    if round == Round::Finished {
        return Vec::new();
    }
    let mut actions = vec![Action::Fold, Action::Raise];
    if own == previous {
        actions.push(Action::Check);
    } else {
        actions.push(Action::Call);
    }
    actions
}

/// A raise names the new bet level for the street and must not undercut the
/// last one.
///
/// ```
/// use holdem_engine::errors::GameError;
/// use holdem_engine::rules::validate_raise;
///
/// assert!(validate_raise(50, 50).is_ok());
/// assert_eq!(
///     validate_raise(25, 50),
///     Err(GameError::InvalidAmount { amount: 25, minimum: 50 })
/// );
/// ```
pub fn validate_raise(amount: i64, last_bet: i64) -> Result<(), GameError> {
    if amount < last_bet {
        return Err(GameError::InvalidAmount {
            amount,
            minimum: last_bet,
        });
    }
    Ok(())
}

/// Chips a raise to `amount` costs: catch up to `previous`, then add the
/// raise on top. `None` if the cost is not representable.
///
/// ```
/// use holdem_engine::rules::raise_cost;
///
/// assert_eq!(raise_cost(50, 100, 50), Some(100));
/// assert_eq!(raise_cost(0, 50, i64::MAX), None);
/// ```
pub fn raise_cost(own: i64, previous: i64, amount: i64) -> Option<i64> {
    previous.checked_sub(own)?.checked_add(amount)
}
