//! The hand-ranking oracle: turns exactly five cards into a comparable
//! [`HandStrength`] and orders two strengths.
//!
//! The game engine only talks to the [`HandRanker`] trait, so alternative
//! evaluators can be plugged into a [`Table`](crate::table::Table).
//! [`StandardRanker`] is the classic category-plus-kickers evaluator.

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::cards::Card;
use crate::errors::GameError;

#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
pub enum Category {
    HighCard = 0,
    OnePair = 1,
    TwoPair = 2,
    ThreeOfAKind = 3,
    Straight = 4,
    Flush = 5,
    FullHouse = 6,
    FourOfAKind = 7,
    StraightFlush = 8,
}

#[derive(Debug, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct HandStrength {
    pub category: Category,
    // ordered high -> low for tiebreaks
    pub kickers: [u8; 5],
}

impl HandStrength {
    /// Sentinel that loses to every ranked hand: a high card with no cards.
    pub fn lowest() -> Self {
        Self {
            category: Category::HighCard,
            kickers: [0; 5],
        }
    }
}

impl fmt::Display for HandStrength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} {:?}", self.category, self.kickers)
    }
}

/// Outcome of comparing a first hand against a second.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Verdict {
    FirstWins,
    SecondWins,
    Tie,
}

impl From<Ordering> for Verdict {
    fn from(ord: Ordering) -> Self {
        match ord {
            Ordering::Greater => Verdict::FirstWins,
            Ordering::Less => Verdict::SecondWins,
            Ordering::Equal => Verdict::Tie,
        }
    }
}

pub trait HandRanker: fmt::Debug {
    /// Ranks exactly five cards. Anything else is [`GameError::InvalidHand`].
    fn rank(&self, cards: &[Card]) -> Result<HandStrength, GameError>;

    fn compare(&self, a: &HandStrength, b: &HandStrength) -> Verdict;

    fn lowest(&self) -> HandStrength {
        HandStrength::lowest()
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct StandardRanker;

impl HandRanker for StandardRanker {
    fn rank(&self, cards: &[Card]) -> Result<HandStrength, GameError> {
        evaluate_five(cards)
    }

    fn compare(&self, a: &HandStrength, b: &HandStrength) -> Verdict {
        compare_hands(a, b).into()
    }
}

pub fn compare_hands(a: &HandStrength, b: &HandStrength) -> Ordering {
    match a.category.cmp(&b.category) {
        Ordering::Equal => a.kickers.cmp(&b.kickers),
        ord => ord,
    }
}

/// Classic five-card evaluation. Rejects anything but five distinct cards.
pub fn evaluate_five(cards: &[Card]) -> Result<HandStrength, GameError> {
    if cards.len() != 5 {
        return Err(GameError::InvalidHand);
    }
    for (i, c) in cards.iter().enumerate() {
        if cards[i + 1..].contains(c) {
            return Err(GameError::InvalidHand);
        }
    }

    let mut rank_counts = [0u8; 15]; // 2..14 used
    for c in cards {
        rank_counts[c.rank.value() as usize] += 1;
    }
    let is_flush = cards.iter().all(|c| c.suit == cards[0].suit);
    let mut uniq: Vec<u8> = (2..=14u8).filter(|&r| rank_counts[r as usize] > 0).collect();
    uniq.sort_unstable();
    let straight_high = detect_straight_high(&uniq);

    if let Some(high) = straight_high {
        let category = if is_flush {
            Category::StraightFlush
        } else {
            Category::Straight
        };
        return Ok(HandStrength {
            category,
            kickers: [high, 0, 0, 0, 0],
        });
    }

    // ranks grouped by multiplicity, biggest group first, then by rank
    let mut groups: Vec<(u8, u8)> = (2..=14u8)
        .filter(|&r| rank_counts[r as usize] > 0)
        .map(|r| (rank_counts[r as usize], r))
        .collect();
    groups.sort_unstable_by(|a, b| b.cmp(a));

    let mut kickers = [0u8; 5];
    for (slot, &(_, r)) in kickers.iter_mut().zip(groups.iter()) {
        *slot = r;
    }

    let category = match (groups[0].0, groups.get(1).map(|g| g.0)) {
        (4, _) => Category::FourOfAKind,
        (3, Some(2)) => Category::FullHouse,
        _ if is_flush => Category::Flush,
        (3, _) => Category::ThreeOfAKind,
        (2, Some(2)) => Category::TwoPair,
        (2, _) => Category::OnePair,
        _ => Category::HighCard,
    };
    Ok(HandStrength { category, kickers })
}

fn detect_straight_high(sorted_unique_ranks: &[u8]) -> Option<u8> {
    // Ace-low straight support: treat Ace as 1 additionally
    let mut w = sorted_unique_ranks.to_vec();
    if w.last() == Some(&14) {
        w.insert(0, 1);
    }

    let mut run = 1;
    let mut best_high = None;
    for i in 1..w.len() {
        if w[i] == w[i - 1] + 1 {
            run += 1;
            if run >= 5 {
                best_high = Some(w[i]);
            }
        } else {
            run = 1;
        }
    }
    best_high
}
