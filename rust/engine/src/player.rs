use serde::{Deserialize, Serialize};

use crate::cards::Card;
use crate::hand::HandStrength;

/// A seated player: identity and bankroll that persist across hands, plus the
/// transient state of the hand currently being played.
///
/// The bankroll is signed and never checked for sufficiency; betting can drive
/// it below zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    name: String,
    money: i64,
    /// Hole cards, empty between hands and after folding
    hand: Vec<Card>,
    /// Chips committed to the pot during this hand
    current_pot: i64,
    has_folded: bool,
    /// Acted at least once since the current street began
    has_played: bool,
    best_hand: Option<HandStrength>,
    best_combination: Option<[Card; 5]>,
}

impl Player {
    pub fn new(name: impl Into<String>, money: i64) -> Self {
        Self {
            name: name.into(),
            money,
            hand: Vec::with_capacity(2),
            current_pot: 0,
            has_folded: false,
            has_played: false,
            best_hand: None,
            best_combination: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
    pub fn money(&self) -> i64 {
        self.money
    }
    pub fn hole_cards(&self) -> &[Card] {
        &self.hand
    }
    pub fn current_pot(&self) -> i64 {
        self.current_pot
    }
    pub fn has_folded(&self) -> bool {
        self.has_folded
    }
    pub fn has_played(&self) -> bool {
        self.has_played
    }
    pub fn best_hand(&self) -> Option<&HandStrength> {
        self.best_hand.as_ref()
    }
    pub fn best_combination(&self) -> Option<&[Card; 5]> {
        self.best_combination.as_ref()
    }

    /// Case-insensitive identity check used for seating.
    pub fn same_name(&self, other: &str) -> bool {
        self.name.to_uppercase() == other.to_uppercase()
    }

    /// Clears everything tied to the previous hand.
    pub fn reset(&mut self) {
        self.hand.clear();
        self.current_pot = 0;
        self.has_folded = false;
        self.has_played = false;
        self.best_hand = None;
        self.best_combination = None;
    }

    pub(crate) fn give_cards(&mut self, cards: Vec<Card>) {
        self.hand = cards;
    }

    /// Moves `amount` from the bankroll into this hand's contribution.
    pub(crate) fn commit(&mut self, amount: i64) {
        self.money -= amount;
        self.current_pot += amount;
    }

    pub(crate) fn add_chips(&mut self, amount: i64) {
        self.money += amount;
    }

    pub(crate) fn fold(&mut self) {
        self.has_folded = true;
        self.hand.clear();
    }

    pub(crate) fn set_played(&mut self, played: bool) {
        self.has_played = played;
    }

    pub(crate) fn set_best(&mut self, strength: HandStrength, cards: Option<[Card; 5]>) {
        self.best_hand = Some(strength);
        self.best_combination = cards;
    }
}
