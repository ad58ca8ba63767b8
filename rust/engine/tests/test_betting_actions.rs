use holdem_engine::config::TableConfig;
use holdem_engine::errors::GameError;
use holdem_engine::game::GameMut;
use holdem_engine::player::Player;
use holdem_engine::rules::{Action, PlayerAction, Round};
use holdem_engine::table::Table;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;

// Acting order for the first hand is BadMannTM (SB), hank.prostokat (BB),
// MasterOfDisaster (dealer, first to act).
fn three_player_table() -> Table {
    let mut table = Table::new(20, 50);
    for name in ["MasterOfDisaster", "BadMannTM", "hank.prostokat"] {
        table.add_player(Player::new(name, 1500)).unwrap();
    }
    table
}

fn chips_on_table(game: &GameMut<'_>) -> i64 {
    game.view()
        .players()
        .map(|p| p.money() + p.current_pot())
        .sum()
}

fn money(game: &GameMut<'_>) -> Vec<i64> {
    game.view().players().map(Player::money).collect()
}

#[test]
fn preflop_completes_when_everyone_matched_and_acted() {
    let mut table = three_player_table();
    let mut game = table.start_game().unwrap();

    game.call().unwrap();
    assert_eq!(money(&game), vec![1480, 1450, 1450]);
    game.call().unwrap();
    assert_eq!(money(&game), vec![1450, 1450, 1450]);
    assert_eq!(game.game().round(), Round::Preflop);

    // big blind already matched: check, not call
    let actions = game.available_actions();
    assert!(actions.contains(&Action::Check));
    assert!(!actions.contains(&Action::Call));
    game.check().unwrap();

    assert_eq!(game.game().round(), Round::Flop);
    assert_eq!(game.game().community_cards().len(), 3);
    // 6 hole cards, 1 burn, 3 flop
    assert_eq!(game.game().deck_remaining(), 52 - 10);
    for p in game.view().players() {
        assert_eq!(p.current_pot(), 50);
        assert!(!p.has_played());
    }
    // first non-folded seat of the acting order opens the flop
    assert_eq!(game.game().active_index(), Some(0));
    assert_eq!(game.current_player().unwrap().name(), "BadMannTM");
}

#[test]
fn check_and_call_are_never_offered_together() {
    let mut table = three_player_table();
    let mut game = table.start_game().unwrap();
    for _ in 0..12 {
        if game.game().is_finished() {
            break;
        }
        let actions = game.available_actions();
        assert!(actions.contains(&Action::Fold));
        assert!(actions.contains(&Action::Raise));
        assert_ne!(
            actions.contains(&Action::Check),
            actions.contains(&Action::Call)
        );
        if actions.contains(&Action::Check) {
            game.check().unwrap();
        } else {
            game.call().unwrap();
        }
    }
}

#[test]
fn cannot_call_when_there_was_no_raise() {
    let mut table = three_player_table();
    let mut game = table.start_game().unwrap();
    game.call().unwrap();
    game.call().unwrap();

    let before = game.view().dump();
    let err = game.call().unwrap_err();
    assert_eq!(
        err,
        GameError::ActionNotAvailable {
            action: Action::Call
        }
    );
    assert_eq!(game.view().dump(), before);
}

#[test]
fn cannot_check_after_a_raise() {
    let mut table = three_player_table();
    let mut game = table.start_game().unwrap();
    game.call().unwrap();
    game.call().unwrap();
    game.check().unwrap();

    game.raise(50).unwrap();
    assert!(!game.available_actions().contains(&Action::Check));
    let before = game.view().dump();
    assert_eq!(
        game.check().unwrap_err(),
        GameError::ActionNotAvailable {
            action: Action::Check
        }
    );
    assert_eq!(game.view().dump(), before);
}

#[test]
fn street_stays_open_after_a_raise() {
    let mut table = three_player_table();
    let mut game = table.start_game().unwrap();
    game.call().unwrap();
    game.call().unwrap();
    game.raise(50).unwrap();

    assert_eq!(game.game().round(), Round::Preflop);
    let bb = game.view().players().nth(1).unwrap();
    assert_eq!(bb.current_pot(), 100);
    assert_eq!(bb.money(), 1400);
    assert_eq!(game.game().last_bet(), 50);
}

#[test]
fn second_raise_of_the_same_size_is_a_re_raise() {
    let mut table = three_player_table();
    let mut game = table.start_game().unwrap();
    game.call().unwrap();
    game.call().unwrap();
    game.check().unwrap();
    assert_eq!(game.game().round(), Round::Flop);

    let opener_before = game.current_player().unwrap().money();
    game.raise(50).unwrap();
    let opener = game.view().players().next().unwrap();
    assert_eq!(opener_before - opener.money(), 50);
    assert_eq!(opener.current_pot(), 100);

    let before = game.current_player().unwrap().money();
    game.raise(50).unwrap();
    let reraiser = game.view().players().nth(1).unwrap();
    // match the 50 raise, then raise 50 on top
    assert_eq!(before - reraiser.money(), 100);
    assert_eq!(reraiser.current_pot(), 150);
}

#[test]
fn raise_below_the_big_blind_is_rejected() {
    let mut table = three_player_table();
    let mut game = table.start_game().unwrap();
    game.call().unwrap();
    game.call().unwrap();
    game.check().unwrap();

    let before = game.view().dump();
    let money_before = money(&game);
    assert_eq!(
        game.raise(25).unwrap_err(),
        GameError::InvalidAmount {
            amount: 25,
            minimum: 50
        }
    );
    assert_eq!(game.view().dump(), before);
    assert_eq!(money(&game), money_before);
}

#[test]
fn raise_below_the_last_raise_is_rejected() {
    let mut table = three_player_table();
    let mut game = table.start_game().unwrap();
    game.call().unwrap();
    game.call().unwrap();
    game.check().unwrap();

    game.raise(100).unwrap();
    let before = game.view().dump();
    assert_eq!(
        game.raise(50).unwrap_err(),
        GameError::InvalidAmount {
            amount: 50,
            minimum: 100
        }
    );
    assert_eq!(game.view().dump(), before);
    assert!(game.raise(100).is_ok());
}

#[test]
fn last_bet_carries_over_to_later_streets() {
    let mut table = three_player_table();
    let mut game = table.start_game().unwrap();
    game.raise(200).unwrap();
    game.call().unwrap();
    game.call().unwrap();
    assert_eq!(game.game().round(), Round::Flop);
    assert_eq!(game.game().last_bet(), 200);
    assert!(matches!(
        game.raise(150),
        Err(GameError::InvalidAmount { minimum: 200, .. })
    ));
}

#[test]
fn everybody_folding_hands_the_pot_to_the_last_player() {
    let mut table = three_player_table();
    let mut game = table.start_game().unwrap();

    assert_eq!(game.current_player().unwrap().name(), "MasterOfDisaster");
    game.call().unwrap();
    assert_eq!(game.current_player().unwrap().name(), "BadMannTM");
    game.fold().unwrap();
    assert_eq!(game.current_player().unwrap().name(), "hank.prostokat");
    let pot_before = game.view().pot();
    assert_eq!(pot_before, 120);
    game.fold().unwrap();

    assert_eq!(game.game().round(), Round::Finished);
    assert_eq!(game.game().active_index(), None);
    let winner = game.winner().unwrap();
    assert_eq!(winner.name(), "MasterOfDisaster");
    // 1500 - 50 + 20 + 50 + 50
    assert_eq!(winner.money(), 1570);
    assert_eq!(money(&game), vec![1480, 1450, 1570]);
    assert_eq!(money(&game).iter().sum::<i64>(), 4500);
}

#[test]
fn folded_players_lose_their_cards_and_are_skipped() {
    let mut table = three_player_table();
    let mut game = table.start_game().unwrap();
    game.call().unwrap();
    game.fold().unwrap();

    let folded = game.view().players().next().unwrap();
    assert!(folded.has_folded());
    assert!(folded.hole_cards().is_empty());

    // big blind faces the dealer's call, skipping the folded small blind
    game.check().unwrap();
    assert_eq!(game.game().round(), Round::Flop);
    assert_eq!(game.current_player().unwrap().name(), "hank.prostokat");
    game.check().unwrap();
    assert_eq!(game.current_player().unwrap().name(), "MasterOfDisaster");
}

#[test]
fn finished_hand_rejects_every_action() {
    let mut table = three_player_table();
    let mut game = table.start_game().unwrap();
    game.call().unwrap();
    game.fold().unwrap();
    game.fold().unwrap();

    assert!(game.available_actions().is_empty());
    assert_eq!(game.current_player().unwrap_err(), GameError::GameFinished);
    for result in [game.call(), game.check(), game.fold(), game.raise(500)] {
        assert!(matches!(
            result,
            Err(GameError::ActionNotAvailable { .. })
        ));
    }
    assert_eq!(game.winner().unwrap().money(), 1570);
}

#[test]
fn winner_is_unknown_while_the_hand_is_live() {
    let mut table = three_player_table();
    let game = table.start_game().unwrap();
    assert_eq!(game.winner().unwrap_err(), GameError::NoWinnerYet);
}

#[test]
fn chips_are_conserved_through_a_raised_multiway_hand() {
    let mut table = Table::new(10, 25);
    for name in ["ann", "ben", "cid", "dee"] {
        table.add_player(Player::new(name, 1000)).unwrap();
    }
    let mut game = table.start_game().unwrap();
    let total = chips_on_table(&game);
    assert_eq!(total, 4000);

    let mut step = 0;
    while !game.game().is_finished() {
        let last_bet = game.game().last_bet();
        match step {
            1 | 4 => game.raise(last_bet + 25).unwrap(),
            3 => game.fold().unwrap(),
            _ if game.available_actions().contains(&Action::Check) => game.check().unwrap(),
            _ => game.call().unwrap(),
        }
        if !game.game().is_finished() {
            assert_eq!(chips_on_table(&game), total);
        }
        step += 1;
        assert!(step < 100, "hand did not terminate");
    }

    let winner_money = game.winner().unwrap().money();
    assert!(winner_money > 1000);
    assert_eq!(money(&game).iter().sum::<i64>(), total);
    assert_eq!(game.game().community_cards().len(), 5);
}

#[test]
fn bankroll_may_go_negative() {
    let mut table = Table::new(20, 50);
    table.add_player(Player::new("short", 30)).unwrap();
    table.add_player(Player::new("deep", 5000)).unwrap();
    table.add_player(Player::new("mid", 500)).unwrap();
    let mut game = table.start_game().unwrap();

    // acting order: deep (SB), mid (BB), short
    game.raise(400).unwrap();
    let short = game.view().players().nth(2).unwrap();
    assert_eq!(short.name(), "short");
    assert_eq!(short.money(), 30 - 450);
}

#[test]
fn every_accepted_action_is_recorded() {
    let mut table = three_player_table();
    let mut game = table.start_game().unwrap();
    game.call().unwrap();
    game.call().unwrap();
    let _ = game.call();
    game.raise(75).unwrap();

    let history = game.game().history();
    let actions: Vec<(&str, Round, PlayerAction)> = history
        .iter()
        .map(|r| (r.player.as_str(), r.round, r.action))
        .collect();
    assert_eq!(
        actions,
        vec![
            ("MasterOfDisaster", Round::Preflop, PlayerAction::Call),
            ("BadMannTM", Round::Preflop, PlayerAction::Call),
            ("hank.prostokat", Round::Preflop, PlayerAction::Raise(75)),
        ]
    );
}

#[test]
fn random_legal_play_conserves_chips() {
    for seed in 0..120u64 {
        let mut rng = ChaCha20Rng::seed_from_u64(seed);
        let seats = 2 + (seed % 5) as usize;
        let config = TableConfig {
            seed: Some(seed),
            ..TableConfig::default()
        };
        let mut table = Table::with_config(&config).unwrap();
        for i in 0..seats {
            table.add_player(Player::new(format!("p{i}"), 1000)).unwrap();
        }

        for _ in 0..3 {
            let start: i64 = table.players().iter().map(Player::money).sum();
            let mut game = table.start_game().unwrap();
            let total = chips_on_table(&game);
            assert_eq!(total, start);

            let mut steps = 0;
            while !game.game().is_finished() {
                let actions = game.available_actions();
                assert!(
                    !(actions.contains(&Action::Check) && actions.contains(&Action::Call)),
                    "seed {seed}: check and call offered together"
                );
                let result = match actions[rng.random_range(0..actions.len())] {
                    Action::Fold => game.fold(),
                    Action::Check => game.check(),
                    Action::Call => game.call(),
                    Action::Raise => {
                        let level = game.game().last_bet() + rng.random_range(0..=100);
                        game.raise(level)
                    }
                };
                result.unwrap_or_else(|e| panic!("seed {seed}: legal action rejected: {e}"));
                if !game.game().is_finished() {
                    assert_eq!(chips_on_table(&game), total, "seed {seed}");
                }
                steps += 1;
                assert!(steps < 1000, "seed {seed}: hand did not terminate");
            }

            assert!(game.winner().is_ok());
            assert_eq!(money(&game).iter().sum::<i64>(), start, "seed {seed}");
        }
    }
}

#[test]
fn unrepresentable_raise_is_rejected_without_side_effects() {
    let mut table = three_player_table();
    let mut game = table.start_game().unwrap();
    let before = game.view().dump();
    let money_before = money(&game);

    assert_eq!(
        game.raise(i64::MAX).unwrap_err(),
        GameError::InvalidAmount {
            amount: i64::MAX,
            minimum: 50
        }
    );
    assert_eq!(game.view().dump(), before);
    assert_eq!(money(&game), money_before);
    assert!(game.game().history().is_empty());

    // the hand carries on normally
    game.raise(100).unwrap();
    assert_eq!(game.game().last_bet(), 100);
}

#[test]
fn raise_that_would_overflow_a_winning_bankroll_is_rejected() {
    let mut table = Table::new(20, 50);
    table.add_player(Player::new("dealer", 1000)).unwrap();
    table.add_player(Player::new("small", 1000)).unwrap();
    table.add_player(Player::new("rich", i64::MAX - 100)).unwrap();
    let mut game = table.start_game().unwrap();

    // dealer opens; the pot would no longer fit in rich's bankroll
    let before = game.view().dump();
    assert!(matches!(
        game.raise(1000),
        Err(GameError::InvalidAmount { amount: 1000, .. })
    ));
    assert_eq!(game.view().dump(), before);
    assert!(game.call().is_ok());
}

#[test]
fn call_that_would_overflow_is_refused() {
    let mut table = Table::new(20, 50);
    table.add_player(Player::new("dealer", 1000)).unwrap();
    table.add_player(Player::new("small", 1000)).unwrap();
    table.add_player(Player::new("rich", i64::MAX - 60)).unwrap();
    let mut game = table.start_game().unwrap();

    let before = game.view().dump();
    assert_eq!(
        game.call().unwrap_err(),
        GameError::ChipOverflow { amount: 50 }
    );
    assert_eq!(game.view().dump(), before);
    assert!(game.fold().is_ok());
}

#[test]
fn blinds_that_would_overflow_are_refused_before_dealing() {
    let mut table = Table::new(20, 50);
    table.add_player(Player::new("button", 1000)).unwrap();
    table.add_player(Player::new("broke", i64::MIN + 10)).unwrap();
    table.add_player(Player::new("big", 1000)).unwrap();

    assert_eq!(
        table.start_game().unwrap_err(),
        GameError::ChipOverflow { amount: 50 }
    );
    assert_eq!(table.dealer_index(), None);
    assert!(table.game().is_none());
    assert_eq!(table.player("broke").unwrap().money(), i64::MIN + 10);
}
