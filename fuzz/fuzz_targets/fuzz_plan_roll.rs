//! Direct fuzz target for transition planning via __internal module.
//!
//! Builds a game from fuzzed rolls, then asks `plan_roll` about one more roll
//! and compares its answer with what the engine actually does.
//!
//! # Safety Properties Tested
//! - `plan_roll` never mutates and never panics
//! - A planned roll is accepted by the engine and reaches the planned state
//! - A refused roll is refused by the engine with the same error

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use tenpin::__internal::plan_roll;
use tenpin::{BowlingGame, Pins};

/// Fuzz input structure
#[derive(Debug, Arbitrary)]
struct FuzzInput {
    /// Rolls played first (values are reduced to 0-10)
    setup: Vec<u8>,
    /// The roll that is planned and then played (reduced to 0-10)
    next: u8,
}

fuzz_target!(|input: FuzzInput| {
    let mut game = BowlingGame::new();
    for pins in input.setup.iter().take(30) {
        let _ = game.roll(i32::from(pins % 11));
    }

    let Ok(pins) = Pins::try_new(i32::from(input.next % 11)) else {
        return;
    };
    let frames = game.frames().to_vec();
    let plan = plan_roll(game.game_state(), game.frames(), pins);
    assert_eq!(game.frames(), frames.as_slice());

    let outcome = game.roll(i32::from(pins.get()));
    match plan {
        Ok(transition) => {
            assert!(outcome.is_ok(), "planned roll refused: {:?}", outcome);
            assert_eq!(game.game_state(), transition.next);
        },
        Err(err) => assert_eq!(outcome, Err(err)),
    }
});
