//! One hand of play: turn order, betting, street advancement and showdown.
//!
//! A [`Game`] only holds the state of the hand itself. The seated players are
//! owned by the [`Table`](crate::table::Table); the game refers to them by
//! seat index in a fixed acting order, so every operation that reads or
//! moves chips goes through a handle borrowing both:
//!
//! - [`GameMut`] for the action methods (`call`, `check`, `fold`, `raise`)
//! - [`GameView`] for read-only queries
//!
//! Actions are validated against [`GameView::available_actions`] first and
//! leave the hand untouched when rejected.

use tracing::{debug, info, warn};

use crate::cards::Card;
use crate::deck::Deck;
use crate::errors::GameError;
use crate::hand::HandRanker;
use crate::logger::{ActionRecord, HandRecord, ShowdownInfo};
use crate::player::Player;
use crate::rules::{self, Action, PlayerAction, Round};
use crate::showdown::{best_hand, pick_winner};
use crate::state::{GameState, PlayerPublicInfo, TexasPlayerDto, VisibleGameState};

/// Fold-out ends a hand as soon as one player is left, so turn order never
/// runs out of players to look at.
const LIVE_HAND: &str = "a live hand always keeps two non-folded players";

/// State of a single hand, from posted blinds to the awarded pot.
#[derive(Debug, Clone)]
pub struct Game {
    /// Seat indices in acting order; the dealer is last
    order: Vec<usize>,
    /// Position in `order` of the player to act, `None` once decided
    active: Option<usize>,
    deck: Deck,
    community: Vec<Card>,
    last_bet: i64,
    round: Round,
    /// Position in `order` of the winner
    winner: Option<usize>,
    small_blind: i64,
    big_blind: i64,
    seed: Option<u64>,
    history: Vec<ActionRecord>,
}

impl Game {
    /// Builds a hand whose hole cards are dealt and blinds already posted.
    /// First to act is the seat after the big blind (wrapping heads-up).
    pub(crate) fn new(
        order: Vec<usize>,
        deck: Deck,
        small_blind: i64,
        big_blind: i64,
        seed: Option<u64>,
    ) -> Self {
        let active = Some(2 % order.len());
        Self {
            order,
            active,
            deck,
            community: Vec::with_capacity(5),
            last_bet: big_blind,
            round: Round::Preflop,
            winner: None,
            small_blind,
            big_blind,
            seed,
            history: Vec::new(),
        }
    }

    pub fn round(&self) -> Round {
        self.round
    }
    pub fn community_cards(&self) -> &[Card] {
        &self.community
    }
    pub fn last_bet(&self) -> i64 {
        self.last_bet
    }
    /// Index into the acting order of the player to act.
    pub fn active_index(&self) -> Option<usize> {
        self.active
    }
    /// Seat indices (into the table's player list) in acting order.
    pub fn acting_order(&self) -> &[usize] {
        &self.order
    }
    pub fn history(&self) -> &[ActionRecord] {
        &self.history
    }
    pub fn deck_remaining(&self) -> usize {
        self.deck.remaining()
    }
    pub fn blinds(&self) -> (i64, i64) {
        (self.small_blind, self.big_blind)
    }
    pub fn is_finished(&self) -> bool {
        self.round == Round::Finished
    }
}

/// Read-only view of a hand together with the players it refers to.
#[derive(Debug, Clone, Copy)]
pub struct GameView<'a> {
    game: &'a Game,
    players: &'a [Player],
}

impl<'a> GameView<'a> {
    pub(crate) fn new(game: &'a Game, players: &'a [Player]) -> Self {
        Self { game, players }
    }

    pub fn game(&self) -> &'a Game {
        self.game
    }

    /// Players in acting order.
    pub fn players(&self) -> impl Iterator<Item = &'a Player> + 'a {
        let players = self.players;
        self.game.order.iter().map(move |&seat| &players[seat])
    }

    fn player_at(&self, position: usize) -> &'a Player {
        &self.players[self.game.order[position]]
    }

    /// Contribution of the nearest non-folded player before the active one.
    fn previous_pot(&self, active: usize) -> i64 {
        let len = self.game.order.len();
        (1..len)
            .map(|i| (active + len - i) % len)
            .map(|pos| self.player_at(pos))
            .find(|p| !p.has_folded())
            .map(Player::current_pot)
            .expect(LIVE_HAND)
    }

    /// Whether `position` can put `cost` more chips in without overflowing
    /// its bankroll, its contribution, the pot, or any bankroll the pot could
    /// be paid into.
    fn can_commit(&self, position: usize, cost: i64) -> bool {
        let player = self.player_at(position);
        let pot = self
            .players()
            .try_fold(0i64, |sum, p| sum.checked_add(p.current_pot()))
            .and_then(|sum| sum.checked_add(cost));
        let money = player.money().checked_sub(cost);
        let (Some(pot), Some(money), Some(_)) = (pot, money, player.current_pot().checked_add(cost))
        else {
            return false;
        };
        (0..self.game.order.len()).all(|pos| {
            let bankroll = if pos == position {
                money
            } else {
                self.player_at(pos).money()
            };
            bankroll.checked_add(pot).is_some()
        })
    }

    pub fn available_actions(&self) -> Vec<Action> {
        match self.game.active {
            Some(active) if self.game.round != Round::Finished => rules::available_actions(
                self.game.round,
                self.player_at(active).current_pot(),
                self.previous_pot(active),
            ),
            _ => Vec::new(),
        }
    }

    pub fn current_player(&self) -> Result<&'a Player, GameError> {
        match self.game.active {
            Some(active) if self.game.round != Round::Finished => Ok(self.player_at(active)),
            _ => Err(GameError::GameFinished),
        }
    }

    pub fn winner(&self) -> Result<&'a Player, GameError> {
        match self.game.winner {
            Some(pos) if self.game.round == Round::Finished => Ok(self.player_at(pos)),
            _ => Err(GameError::NoWinnerYet),
        }
    }

    /// Sum of every contribution made this hand, folded players included.
    pub fn pot(&self) -> i64 {
        self.players().map(Player::current_pot).sum()
    }

    pub fn visible_state(&self) -> VisibleGameState {
        let players: Vec<PlayerPublicInfo> = self.players().map(PlayerPublicInfo::from).collect();
        let dealer = players
            .last()
            .cloned()
            .unwrap_or_else(|| PlayerPublicInfo::from(&self.players[0]));
        VisibleGameState {
            players,
            round: self.game.round,
            active_player: self.current_player().ok().map(PlayerPublicInfo::from),
            winner: self.winner().ok().map(|p| p.name().to_string()),
            dealer,
            community: self.game.community.clone(),
        }
    }

    /// Full state of the hand for persistence, hole cards included.
    pub fn dump(&self) -> GameState {
        GameState {
            player_names: self.players().map(|p| p.name().to_string()).collect(),
            players: self.players().map(TexasPlayerDto::from).collect(),
            winner_name: self.winner().ok().map(|p| p.name().to_string()),
            last_bet: self.game.last_bet,
            active_player_index: self.game.active,
            community: self.game.community.clone(),
            round: self.game.round,
            deck_remaining: self.game.deck.remaining(),
        }
    }

    /// Serializable history of this hand, suitable for [`HandLogger`](crate::logger::HandLogger).
    pub fn hand_record(&self, hand_id: impl Into<String>) -> HandRecord {
        let winner = self.winner().ok().map(|p| p.name().to_string());
        let reached_showdown = self.players().any(|p| p.best_hand().is_some());
        let showdown = reached_showdown.then(|| ShowdownInfo {
            winners: winner.iter().cloned().collect(),
            notes: None,
        });
        HandRecord {
            hand_id: hand_id.into(),
            seed: self.game.seed,
            blinds: [self.game.small_blind, self.game.big_blind],
            players: self.players().map(|p| p.name().to_string()).collect(),
            actions: self.game.history.clone(),
            board: self.game.community.clone(),
            result: winner,
            ts: None,
            meta: None,
            showdown,
        }
    }
}

/// Mutable handle on a live hand. Obtained from
/// [`Table::start_game`](crate::table::Table::start_game) or
/// [`Table::game_mut`](crate::table::Table::game_mut).
#[derive(Debug)]
pub struct GameMut<'a> {
    game: &'a mut Game,
    players: &'a mut [Player],
    ranker: &'a dyn HandRanker,
}

impl<'a> GameMut<'a> {
    pub(crate) fn new(
        game: &'a mut Game,
        players: &'a mut [Player],
        ranker: &'a dyn HandRanker,
    ) -> Self {
        Self {
            game,
            players,
            ranker,
        }
    }

    pub fn view(&self) -> GameView<'_> {
        GameView::new(&*self.game, &*self.players)
    }

    pub fn game(&self) -> &Game {
        &*self.game
    }

    pub fn available_actions(&self) -> Vec<Action> {
        self.view().available_actions()
    }

    pub fn current_player(&self) -> Result<&Player, GameError> {
        self.view().current_player()
    }

    pub fn winner(&self) -> Result<&Player, GameError> {
        self.view().winner()
    }

    pub fn visible_state(&self) -> VisibleGameState {
        self.view().visible_state()
    }

    pub fn call(&mut self) -> Result<(), GameError> {
        let active = self.require(Action::Call)?;
        let view = self.view();
        let difference = view
            .previous_pot(active)
            .checked_sub(view.player_at(active).current_pot())
            .filter(|&d| view.can_commit(active, d));
        let Some(difference) = difference else {
            warn!(round = %self.game.round, "call would overflow");
            return Err(GameError::ChipOverflow {
                amount: view.previous_pot(active),
            });
        };
        self.player_mut(active).commit(difference);
        self.record(active, PlayerAction::Call);
        self.advance_turn()
    }

    pub fn check(&mut self) -> Result<(), GameError> {
        let active = self.require(Action::Check)?;
        self.record(active, PlayerAction::Check);
        self.advance_turn()
    }

    pub fn fold(&mut self) -> Result<(), GameError> {
        let active = self.require(Action::Fold)?;
        self.player_mut(active).fold();
        self.record(active, PlayerAction::Fold);

        let view = self.view();
        let remaining: Vec<usize> = (0..self.game.order.len())
            .filter(|&pos| !view.player_at(pos).has_folded())
            .collect();
        match remaining[..] {
            [last_standing] => {
                self.game.winner = Some(last_standing);
                self.game.active = None;
                self.game.round = Round::Finished;
                self.transfer_pot_to_winner();
                Ok(())
            }
            _ => self.advance_turn(),
        }
    }

    /// Raises the street's bet level to `amount`. The player first matches the
    /// nearest active predecessor, then puts `amount` on top.
    pub fn raise(&mut self, amount: i64) -> Result<(), GameError> {
        let active = self.require(Action::Raise)?;
        if let Err(e) = rules::validate_raise(amount, self.game.last_bet) {
            warn!(amount, last_bet = self.game.last_bet, "raise rejected");
            return Err(e);
        }
        let view = self.view();
        let cost = rules::raise_cost(
            view.player_at(active).current_pot(),
            view.previous_pot(active),
            amount,
        )
        .filter(|&cost| view.can_commit(active, cost));
        let Some(cost) = cost else {
            warn!(amount, "raise would overflow");
            return Err(GameError::InvalidAmount {
                amount,
                minimum: self.game.last_bet,
            });
        };
        self.player_mut(active).commit(cost);
        self.game.last_bet = amount;
        self.record(active, PlayerAction::Raise(amount));
        self.advance_turn()
    }

    /// Returns the active position if `action` is currently legal.
    fn require(&self, action: Action) -> Result<usize, GameError> {
        match self.game.active {
            Some(active) if self.available_actions().contains(&action) => Ok(active),
            _ => {
                warn!(%action, round = %self.game.round, "action not available");
                Err(GameError::ActionNotAvailable { action })
            }
        }
    }

    fn player_mut(&mut self, position: usize) -> &mut Player {
        &mut self.players[self.game.order[position]]
    }

    fn record(&mut self, position: usize, action: PlayerAction) {
        let player = self.view().player_at(position);
        debug!(
            player = player.name(),
            action = ?action,
            round = %self.game.round,
            money = player.money(),
            current_pot = player.current_pot(),
            "action accepted"
        );
        let record = ActionRecord {
            player: player.name().to_string(),
            round: self.game.round,
            action,
        };
        self.game.history.push(record);
    }

    fn advance_turn(&mut self) -> Result<(), GameError> {
        if let Some(active) = self.game.active {
            self.player_mut(active).set_played(true);
            self.move_to_next_in_hand(active);
        }
        if self.is_street_complete() {
            self.finish_street()?;
        }
        Ok(())
    }

    fn move_to_next_in_hand(&mut self, from: usize) {
        let len = self.game.order.len();
        let view = self.view();
        let next = (1..=len)
            .map(|i| (from + i) % len)
            .find(|&pos| !view.player_at(pos).has_folded())
            .expect(LIVE_HAND);
        self.game.active = Some(next);
    }

    /// Everyone still in has acted this street and all contributions agree.
    fn is_street_complete(&self) -> bool {
        let mut pots = self
            .view()
            .players()
            .filter(|p| !p.has_folded())
            .map(|p| p.has_played().then_some(p.current_pot()));
        let Some(Some(first)) = pots.next() else {
            return false;
        };
        pots.all(|pot| pot == Some(first))
    }

    fn finish_street(&mut self) -> Result<(), GameError> {
        if self.game.round == Round::River {
            self.showdown();
            return Ok(());
        }
        let completed = self.game.round;
        self.game.deck.burn_card();
        let revealed = self.game.deck.deal(completed.cards_to_reveal())?;

        let last = self.game.order.len() - 1;
        self.move_to_next_in_hand(last);
        for seat in self.game.order.clone() {
            self.players[seat].set_played(false);
        }
        self.game.community.extend(revealed);
        self.game.round = completed.next();
        info!(
            round = %self.game.round,
            community = ?self.game.community,
            pot = self.view().pot(),
            "street advanced"
        );
        Ok(())
    }

    fn showdown(&mut self) {
        let ranker = self.ranker;
        for seat in self.game.order.clone() {
            let player = &self.players[seat];
            if player.has_folded() {
                continue;
            }
            let seven: Result<[Card; 7], _> = self
                .game
                .community
                .iter()
                .chain(player.hole_cards())
                .copied()
                .collect::<Vec<_>>()
                .try_into();
            let Ok(seven) = seven else {
                warn!(player = player.name(), "incomplete cards at showdown");
                continue;
            };
            let best = best_hand(ranker, &seven);
            self.players[seat].set_best(best.strength, best.cards);
        }

        let view = self.view();
        let candidates = (0..self.game.order.len()).filter_map(|pos| {
            let p = view.player_at(pos);
            match p.best_hand() {
                Some(strength) if !p.has_folded() => Some((pos, strength)),
                _ => None,
            }
        });
        let winner = pick_winner(ranker, candidates);

        self.game.winner = winner;
        self.game.active = None;
        self.game.round = Round::Finished;
        self.transfer_pot_to_winner();
    }

    fn transfer_pot_to_winner(&mut self) {
        let Some(pos) = self.game.winner else {
            return;
        };
        let pot = self.view().pot();
        let winner = self.player_mut(pos);
        winner.add_chips(pot);
        info!(winner = winner.name(), pot, "pot awarded");
    }
}
