//! Common test infrastructure shared across integration tests.
//!
//! - game helpers that roll whole sequences
//! - an oracle scorer working on the flat roll list
//! - proptest strategies producing legal games
//!
//! # Usage
//!
//! From any integration test file:
//! ```ignore
//! #[path = "common/mod.rs"]
//! mod common;
//! use common::{game_from, oracle_frame_totals};
//! ```

// Each integration test binary uses a different subset of these helpers.
#![allow(dead_code)]

use proptest::prelude::*;
use tenpin::BowlingGame;

/// The reference game: accumulated totals 8, 15, 23, 42, 62, 80, 88, 94, 113, 122.
pub const REFERENCE_ROLLS: [i32; 19] = [8, 0, 7, 0, 5, 3, 9, 1, 9, 1, 10, 8, 0, 5, 1, 3, 7, 9, 0];

/// Accumulated totals of [`REFERENCE_ROLLS`].
pub const REFERENCE_TOTALS: [u32; 10] = [8, 15, 23, 42, 62, 80, 88, 94, 113, 122];

/// Number of proptest cases, reduced under Miri.
#[must_use]
pub const fn case_count() -> u32 {
    if cfg!(miri) {
        5
    } else {
        256
    }
}

/// Rolls every value in `rolls`, panicking on the first rejected roll.
pub fn roll_all(game: &mut BowlingGame, rolls: &[i32]) {
    for (i, &pins) in rolls.iter().enumerate() {
        if let Err(err) = game.roll(pins) {
            panic!("roll #{} ({} pins) rejected: {}", i + 1, pins, err);
        }
    }
}

/// A fresh game with `rolls` already rolled.
#[must_use]
pub fn game_from(rolls: &[i32]) -> BowlingGame {
    let mut game = BowlingGame::new();
    roll_all(&mut game, rolls);
    game
}

/// Running totals of a complete game computed straight from the roll list.
///
/// # Panics
///
/// Panics if `rolls` is not a complete, legal game.
#[must_use]
pub fn oracle_frame_totals(rolls: &[i32]) -> Vec<u32> {
    let mut totals = Vec::with_capacity(10);
    let mut total = 0;
    let mut i = 0;
    for frame in 0..10 {
        if frame == 9 {
            // every roll left belongs to the tenth frame
            total += rolls[i..].iter().sum::<i32>();
        } else if rolls[i] == 10 {
            total += 10 + rolls[i + 1] + rolls[i + 2];
            i += 1;
        } else if rolls[i] + rolls[i + 1] == 10 {
            total += 10 + rolls[i + 2];
            i += 2;
        } else {
            total += rolls[i] + rolls[i + 1];
            i += 2;
        }
        totals.push(total as u32);
    }
    totals
}

/// Turns three raw values per frame into the roll list of a legal, complete
/// game. Each value picks a pin count among those still standing; in the
/// tenth frame the second roll may be anything up to ten.
#[must_use]
pub fn legal_game(seeds: &[(u8, u8, u8)]) -> Vec<i32> {
    let mut rolls = Vec::with_capacity(21);
    for (index, &(a, b, c)) in seeds.iter().enumerate().take(10) {
        let first = a % 11;
        rolls.push(i32::from(first));
        if index < 9 {
            if first < 10 {
                rolls.push(i32::from(b % (11 - first)));
            }
            continue;
        }
        let second = b % 11;
        rolls.push(i32::from(second));
        if first == 10 {
            let fill = if second == 10 { c % 11 } else { c % (11 - second) };
            rolls.push(i32::from(fill));
        } else if first + second >= 10 {
            rolls.push(i32::from(c % 11));
        }
    }
    rolls
}

/// Strategy for complete, legal games as flat roll lists.
pub fn legal_game_strategy() -> impl Strategy<Value = Vec<i32>> {
    prop::collection::vec((any::<u8>(), any::<u8>(), any::<u8>()), 10)
        .prop_map(|seeds| legal_game(&seeds))
}

/// Strategy for arbitrary roll values, legal or not.
pub fn any_roll_strategy() -> impl Strategy<Value = i32> {
    prop_oneof![
        8 => 0i32..=10,
        1 => -5i32..0,
        1 => 11i32..20,
    ]
}
