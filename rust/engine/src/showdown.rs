//! Best-hand search over a player's seven available cards, and winner
//! selection among the hands that reach showdown.
//!
//! Both searches keep a running best and replace it with each candidate
//! unless the running best strictly wins, so on an exact tie the candidate
//! scanned last is the one kept.

use crate::cards::Card;
use crate::hand::{HandRanker, HandStrength, Verdict};

/// Result of [`best_hand`]: the strongest ranking and the five cards that
/// produced it. `cards` is `None` only if no subset could be ranked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BestHand {
    pub strength: HandStrength,
    pub cards: Option<[Card; 5]>,
}

/// Lexicographic `k`-of-`n` index combinations: `[0,1,2,3,4]`, `[0,1,2,3,5]`,
/// ... , `[2,3,4,5,6]` for 5 of 7.
#[derive(Debug, Clone)]
pub struct Combinations {
    n: usize,
    current: Option<Vec<usize>>,
}

impl Combinations {
    pub fn new(n: usize, k: usize) -> Self {
        let current = (k <= n).then(|| (0..k).collect());
        Self { n, current }
    }
}

impl Iterator for Combinations {
    type Item = Vec<usize>;

    fn next(&mut self) -> Option<Self::Item> {
        let out = self.current.clone()?;
        let k = out.len();
        let mut next = out.clone();
        // rightmost slot that can still move up
        match (0..k).rev().find(|&i| next[i] < self.n - k + i) {
            Some(i) => {
                next[i] += 1;
                for j in i + 1..k {
                    next[j] = next[j - 1] + 1;
                }
                self.current = Some(next);
            }
            None => self.current = None,
        }
        Some(out)
    }
}

/// Evaluates all 21 five-card subsets of `cards` in a fixed order. Subsets
/// the oracle refuses to rank are skipped.
pub fn best_hand<R: HandRanker + ?Sized>(ranker: &R, cards: &[Card; 7]) -> BestHand {
    let mut best = BestHand {
        strength: ranker.lowest(),
        cards: None,
    };
    for combination in Combinations::new(cards.len(), 5) {
        let mut checked = [cards[0]; 5];
        for (slot, &idx) in checked.iter_mut().zip(combination.iter()) {
            *slot = cards[idx];
        }
        let Ok(strength) = ranker.rank(&checked) else {
            continue;
        };
        if ranker.compare(&best.strength, &strength) != Verdict::FirstWins {
            best = BestHand {
                strength,
                cards: Some(checked),
            };
        }
    }
    best
}

/// Picks the winner among `(id, strength)` candidates given in acting order.
/// Ties go to the candidate appearing last.
pub fn pick_winner<'a, R, I, T>(ranker: &R, candidates: I) -> Option<T>
where
    R: HandRanker + ?Sized,
    I: IntoIterator<Item = (T, &'a HandStrength)>,
{
    let mut running = ranker.lowest();
    let mut winner = None;
    for (id, strength) in candidates {
        if ranker.compare(&running, strength) != Verdict::FirstWins {
            running = strength.clone();
            winner = Some(id);
        }
    }
    winner
}
