use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha20Rng;
use tracing::info;

use crate::config::TableConfig;
use crate::deck::Deck;
use crate::errors::{ConfigError, GameError};
use crate::game::{Game, GameMut, GameView};
use crate::hand::{HandRanker, StandardRanker};
use crate::player::Player;
use crate::state::{PlayerDto, TableDto, TableState};

/// Seed used when a table is created without one.
pub const DEFAULT_SEED: u64 = 0xA1A2_A3A4;

/// Cards a hand can consume beyond hole cards: three burns, five community.
const BOARD_CARDS: usize = 8;

/// Seating, blinds and the dealer button, plus at most one live hand.
///
/// Players are owned here for as long as they are seated. Each call to
/// [`start_game`](Table::start_game) moves the button one seat, deals a new
/// hand and replaces the previous one; snapshot it first (with
/// [`dump_state`](Table::dump_state) or [`GameView::hand_record`]) if it is
/// still needed.
///
/// # Examples
///
/// ```
/// use holdem_engine::player::Player;
/// use holdem_engine::rules::Round;
/// use holdem_engine::table::Table;
///
/// let mut table = Table::new(20, 50);
/// table.add_player(Player::new("alice", 1500)).unwrap();
/// table.add_player(Player::new("bob", 1500)).unwrap();
/// table.add_player(Player::new("carol", 1500)).unwrap();
///
/// let mut game = table.start_game().unwrap();
/// game.call().unwrap();
/// game.call().unwrap();
/// game.check().unwrap();
/// assert_eq!(game.game().round(), Round::Flop);
/// assert_eq!(game.game().community_cards().len(), 3);
/// ```
#[derive(Debug)]
pub struct Table {
    players: Vec<Player>,
    small_blind: i64,
    big_blind: i64,
    dealer_index: Option<usize>,
    game: Option<Game>,
    rng: ChaCha20Rng,
    ranker: Box<dyn HandRanker>,
}

impl Table {
    /// Table with the given blinds and [`DEFAULT_SEED`].
    ///
    /// The blinds are taken as given: both are expected to be positive, and
    /// nothing here checks it. Use [`with_config`](Table::with_config) for
    /// blinds that come from outside the program, since it validates them.
    pub fn new(small_blind: i64, big_blind: i64) -> Self {
        Self::build(small_blind, big_blind, DEFAULT_SEED)
    }

    pub fn with_config(config: &TableConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::build(
            config.small_blind,
            config.big_blind,
            config.seed.unwrap_or(DEFAULT_SEED),
        ))
    }

    fn build(small_blind: i64, big_blind: i64, seed: u64) -> Self {
        Self {
            players: Vec::new(),
            small_blind,
            big_blind,
            dealer_index: None,
            game: None,
            rng: ChaCha20Rng::seed_from_u64(seed),
            ranker: Box::new(StandardRanker),
        }
    }

    /// Replaces the hand-ranking oracle used at showdown.
    pub fn with_ranker(mut self, ranker: impl HandRanker + 'static) -> Self {
        self.ranker = Box::new(ranker);
        self
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn player(&self, name: &str) -> Option<&Player> {
        self.players.iter().find(|p| p.same_name(name))
    }

    pub fn small_blind(&self) -> i64 {
        self.small_blind
    }
    pub fn big_blind(&self) -> i64 {
        self.big_blind
    }
    /// Seat of the dealer button, `None` before the first hand.
    pub fn dealer_index(&self) -> Option<usize> {
        self.dealer_index
    }

    /// Seats a player at the end of the seating order. Names are unique
    /// regardless of case. A live hand is unaffected.
    pub fn add_player(&mut self, player: Player) -> Result<(), GameError> {
        if self.players.iter().any(|p| p.same_name(player.name())) {
            return Err(GameError::DuplicateName(player.name().to_string()));
        }
        info!(player = player.name(), money = player.money(), "player seated");
        self.players.push(player);
        Ok(())
    }

    /// Deals a new hand from a freshly shuffled deck.
    pub fn start_game(&mut self) -> Result<GameMut<'_>, GameError> {
        let seed = self.rng.next_u64();
        let mut deck = Deck::new_with_seed(seed);
        deck.shuffle();
        self.deal(deck, Some(seed))
    }

    /// Deals a new hand from `deck` as given, without shuffling.
    pub fn start_game_with_deck(&mut self, deck: Deck) -> Result<GameMut<'_>, GameError> {
        self.deal(deck, None)
    }

    fn deal(&mut self, mut deck: Deck, seed: Option<u64>) -> Result<GameMut<'_>, GameError> {
        let seated = self.players.len();
        if seated < 2 {
            return Err(GameError::NotEnoughPlayers { seated });
        }
        let needed = 2 * seated + BOARD_CARDS;
        if deck.remaining() < needed {
            return Err(GameError::DeckExhausted {
                requested: needed,
                remaining: deck.remaining(),
            });
        }

        let dealer = self.dealer_index.map_or(0, |d| (d + 1) % seated);
        let order: Vec<usize> = (1..=seated).map(|i| (dealer + i) % seated).collect();
        self.check_blinds_fit(&order)?;
        self.dealer_index = Some(dealer);

        for player in &mut self.players {
            player.reset();
        }
        for &seat in &order {
            let hole = deck.deal(2)?;
            self.players[seat].give_cards(hole);
        }
        self.players[order[0]].commit(self.small_blind);
        self.players[order[1]].commit(self.big_blind);

        info!(
            dealer = self.players[dealer].name(),
            small_blind = self.small_blind,
            big_blind = self.big_blind,
            players = seated,
            "hand started"
        );
        let game = self.game.insert(Game::new(
            order,
            deck,
            self.small_blind,
            self.big_blind,
            seed,
        ));
        Ok(GameMut::new(game, &mut self.players, self.ranker.as_ref()))
    }

    /// Posting the blinds must leave every bankroll able to take the pot.
    fn check_blinds_fit(&self, order: &[usize]) -> Result<(), GameError> {
        let overflow = || GameError::ChipOverflow {
            amount: self.big_blind,
        };
        let pot = self
            .small_blind
            .checked_add(self.big_blind)
            .ok_or_else(overflow)?;
        let posted = [(order[0], self.small_blind), (order[1], self.big_blind)];
        for (seat, player) in self.players.iter().enumerate() {
            let blind = posted
                .iter()
                .find(|(s, _)| *s == seat)
                .map_or(0, |&(_, b)| b);
            player
                .money()
                .checked_sub(blind)
                .and_then(|m| m.checked_add(pot))
                .ok_or_else(overflow)?;
        }
        Ok(())
    }

    /// The live (or last finished) hand, if one was dealt.
    pub fn game(&self) -> Option<GameView<'_>> {
        self.game
            .as_ref()
            .map(|game| GameView::new(game, &self.players))
    }

    pub fn game_mut(&mut self) -> Result<GameMut<'_>, GameError> {
        let game = self.game.as_mut().ok_or(GameError::NoHandInProgress)?;
        Ok(GameMut::new(game, &mut self.players, self.ranker.as_ref()))
    }

    pub fn dump_state(&self) -> TableState {
        TableState {
            table: TableDto {
                small_blind: self.small_blind,
                big_blind: self.big_blind,
                dealer_index: self.dealer_index,
                players: self.players.iter().map(|p| p.name().to_string()).collect(),
            },
            players: self
                .players
                .iter()
                .map(|p| (p.name().to_string(), PlayerDto::from(p)))
                .collect(),
            game: self.game().map(|view| view.dump()),
        }
    }
}
