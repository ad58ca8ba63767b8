//! Read-only projections of a table and its live hand.
//!
//! [`TableState`] is the full dump consumed by persistence layers;
//! [`VisibleGameState`] is what observers of a hand are allowed to see.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::cards::Card;
use crate::hand::HandStrength;
use crate::player::Player;
use crate::rules::Round;

/// What everyone at the table may see about a player. Hole cards and the
/// best hand are only revealed for players who reached showdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerPublicInfo {
    pub name: String,
    pub money: i64,
    pub has_folded: bool,
    pub current_pot: i64,
    #[serde(default)]
    pub cards: Vec<Card>,
    #[serde(default)]
    pub hand: Option<HandStrength>,
    #[serde(default)]
    pub best_cards: Option<[Card; 5]>,
}

impl From<&Player> for PlayerPublicInfo {
    fn from(player: &Player) -> Self {
        let mut info = Self {
            name: player.name().to_string(),
            money: player.money(),
            has_folded: player.has_folded(),
            current_pot: player.current_pot(),
            cards: Vec::new(),
            hand: None,
            best_cards: None,
        };
        if let (false, Some(best)) = (player.has_folded(), player.best_hand()) {
            info.cards = player.hole_cards().to_vec();
            info.hand = Some(best.clone());
            info.best_cards = player.best_combination().copied();
        }
        info
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisibleGameState {
    /// In acting order
    pub players: Vec<PlayerPublicInfo>,
    pub round: Round,
    pub active_player: Option<PlayerPublicInfo>,
    pub winner: Option<String>,
    /// Last seat of the acting order
    pub dealer: PlayerPublicInfo,
    pub community: Vec<Card>,
}

/// Complete dump of a table, its seated players and the live hand if any.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableState {
    pub table: TableDto,
    pub players: BTreeMap<String, PlayerDto>,
    #[serde(default)]
    pub game: Option<GameState>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableDto {
    pub small_blind: i64,
    pub big_blind: i64,
    /// `None` until the first hand is dealt
    pub dealer_index: Option<usize>,
    /// Names in seating order
    pub players: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerDto {
    pub name: String,
    pub money: i64,
}

impl From<&Player> for PlayerDto {
    fn from(player: &Player) -> Self {
        Self {
            name: player.name().to_string(),
            money: player.money(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    /// Names in acting order
    pub player_names: Vec<String>,
    pub players: Vec<TexasPlayerDto>,
    pub winner_name: Option<String>,
    pub last_bet: i64,
    pub active_player_index: Option<usize>,
    pub community: Vec<Card>,
    pub round: Round,
    pub deck_remaining: usize,
}

/// Full per-hand state of one player, hole cards included.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TexasPlayerDto {
    pub name: String,
    pub has_folded: bool,
    pub has_played: bool,
    pub current_pot: i64,
    pub best_hand: Option<HandStrength>,
    pub best_combination: Option<[Card; 5]>,
    pub hand: Vec<Card>,
}

impl From<&Player> for TexasPlayerDto {
    fn from(player: &Player) -> Self {
        Self {
            name: player.name().to_string(),
            has_folded: player.has_folded(),
            has_played: player.has_played(),
            current_pot: player.current_pot(),
            best_hand: player.best_hand().cloned(),
            best_combination: player.best_combination().copied(),
            hand: player.hole_cards().to_vec(),
        }
    }
}
