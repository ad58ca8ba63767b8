//! # holdem-engine: Texas Hold'em Rules Engine
//!
//! Tracks one hand of multi-way Texas Hold'em at a time, from blind posting to
//! showdown: validates actions, advances betting streets, deals community
//! cards and awards the pot to the best five-card hand out of seven.
//!
//! ## Core Modules
//!
//! - [`table`] - Seating, blinds, dealer rotation and hand setup
//! - [`game`] - The per-hand state machine and its action methods
//! - [`rules`] - Streets, action kinds and betting legality
//! - [`showdown`] - Best-hand search and winner selection
//! - [`hand`] - Hand-ranking oracle ([`hand::HandRanker`]) and the standard evaluator
//! - [`player`] - Bankroll and per-hand player state
//! - [`cards`] / [`deck`] - Cards and the owned, seeded deck
//! - [`state`] - Serializable projections of a table and its hand
//! - [`logger`] - Hand history records written as JSON Lines
//! - [`config`] - Table configuration from TOML and environment
//! - [`logging`] - Tracing subscriber setup and log capture
//! - [`errors`] - Error types
//!
//! ## Quick Start
//!
//! ```rust
//! use holdem_engine::player::Player;
//! use holdem_engine::rules::{Action, Round};
//! use holdem_engine::table::Table;
//!
//! let mut table = Table::new(20, 50);
//! for name in ["alice", "bob", "carol"] {
//!     table.add_player(Player::new(name, 1500)).unwrap();
//! }
//!
//! let mut game = table.start_game().unwrap();
//! assert!(game.available_actions().contains(&Action::Call));
//!
//! game.call().unwrap();
//! game.fold().unwrap();
//! game.fold().unwrap();
//!
//! assert_eq!(game.game().round(), Round::Finished);
//! assert_eq!(game.winner().unwrap().money(), 1570);
//! ```
//!
//! ## Concurrency
//!
//! Everything is synchronous and single-threaded: each action runs to
//! completion, including any street change or showdown it triggers. Callers
//! sharing a table across threads must serialize access to it.

pub mod cards;
pub mod config;
pub mod deck;
pub mod errors;
pub mod game;
pub mod hand;
pub mod logger;
pub mod logging;
pub mod player;
pub mod rules;
pub mod showdown;
pub mod state;
pub mod table;
