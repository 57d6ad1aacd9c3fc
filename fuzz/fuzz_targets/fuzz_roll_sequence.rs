//! Fuzz target for arbitrary roll sequences.
//!
//! Drives a single game with raw roll values (legal or not) and occasional
//! resets, checking the engine after every operation.
//!
//! # Safety Properties Tested
//! - No panics on any roll value, including extreme integers
//! - Rejected rolls leave frames and state untouched
//! - Invariants hold after every operation
//! - The score never exceeds a perfect game

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use tenpin::telemetry::InvariantChecker;
use tenpin::{BowlingGame, PERFECT_GAME_SCORE};

/// Operations that can be performed on a game
#[derive(Debug, Arbitrary)]
enum GameOp {
    /// Roll a small value, mostly legal
    Roll(i8),
    /// Roll any value
    RollRaw(i32),
    /// Start over
    Reset,
}

fuzz_target!(|ops: Vec<GameOp>| {
    // Limit operations to prevent timeouts
    let ops = if ops.len() > 200 { &ops[..200] } else { &ops[..] };

    let mut game = BowlingGame::new();
    for op in ops {
        match op {
            GameOp::Roll(pins) => roll_checked(&mut game, i32::from(*pins)),
            GameOp::RollRaw(pins) => roll_checked(&mut game, *pins),
            GameOp::Reset => {
                game.reset();
                assert_eq!(game.frame_count(), 0);
            },
        }

        if let Err(violation) = game.check_invariants() {
            panic!("invariant violated: {}", violation);
        }
        assert!(game.score() <= PERFECT_GAME_SCORE);
        assert!(game.score() <= game.max_possible_score());
        assert_eq!(game.scoreboard().len(), game.frame_count());
    }
});

fn roll_checked(game: &mut BowlingGame, pins: i32) {
    let frames = game.frames().to_vec();
    let state = game.game_state();
    if let Err(err) = game.roll(pins) {
        assert!(err.is_rejected_roll(), "unexpected error: {}", err);
        assert_eq!(game.frames(), frames.as_slice());
        assert_eq!(game.game_state(), state);
    }
}
