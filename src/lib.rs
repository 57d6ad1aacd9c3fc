//! # Tenpin
//!
//! Tenpin is a ten-pin bowling scoring engine written in 100% safe Rust.
//! It consumes a game one roll at a time, keeps per-frame results, applies
//! strike and spare bonuses to earlier frames as soon as the qualifying rolls
//! happen, enforces pin-count legality (including the tenth frame's fill
//! balls) and renders a scoreboard after every roll.
//!
//! The engine is a single-game, in-memory state machine. Presentation layers
//! (a web controller, a CLI, a TUI) own input parsing and user-facing text,
//! call [`BowlingGame::roll`] with a pin count and read back
//! [`BowlingGame::scoreboard`].
//!
//! ```
//! use tenpin::BowlingGame;
//!
//! let mut game = BowlingGame::new();
//! for _ in 0..12 {
//!     game.roll(10)?;
//! }
//! assert!(game.is_game_over());
//! assert_eq!(game.score(), 300);
//! # Ok::<(), tenpin::BowlingError>(())
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub use builder::GameBuilder;
pub use config::ScoreboardFormat;
pub use error::{BowlingError, BowlingResult, PinCountKind};
pub use frame::Frame;
pub use game::BowlingGame;
pub use game_state::GameState;
pub use scoreboard::{Scoreboard, ScoreboardRow};

pub mod builder;
pub mod config;
pub mod error;
pub mod frame;
pub mod game;
pub mod game_state;
pub mod prelude;
pub mod scoreboard;
pub mod telemetry;
pub mod transition;

/// Internal module exposing implementation details for property tests and fuzzing.
///
/// **This module is NOT part of the public API.** Nothing here is covered by
/// semver guarantees.
#[doc(hidden)]
pub mod __internal {
    pub use crate::transition::{plan_roll, RollAction, Transition};
}

// #############
// # CONSTANTS #
// #############

/// Number of pins standing on a lane at the start of every frame.
pub const TOTAL_NUMBER_OF_PINS: u8 = 10;

/// Number of frames in a game.
pub const TOTAL_NUMBER_OF_FRAMES: usize = 10;

/// Score of a perfect game (twelve strikes in a row).
pub const PERFECT_GAME_SCORE: u32 = 300;

/// A validated number of knocked-down pins for a single roll.
///
/// `Pins` is the only way a roll enters the engine, so everything past
/// construction can rely on `0 <= pins <= 10`.
///
/// # Examples
///
/// ```
/// use tenpin::{BowlingError, Pins};
///
/// let pins = Pins::try_from(7)?;
/// assert_eq!(pins.get(), 7);
/// assert!(Pins::ALL.is_all());
///
/// assert!(matches!(Pins::try_from(-1), Err(BowlingError::InvalidRoll { pins: -1 })));
/// assert!(matches!(Pins::try_from(11), Err(BowlingError::PinCountExceeding { .. })));
/// # Ok::<(), BowlingError>(())
/// ```
#[derive(
    Debug,
    Copy,
    Clone,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Default,
    serde::Serialize,
)]
#[serde(transparent)]
pub struct Pins(u8);

impl Pins {
    /// No pins knocked down (a gutter ball).
    pub const ZERO: Pins = Pins(0);

    /// Every pin knocked down.
    pub const ALL: Pins = Pins(TOTAL_NUMBER_OF_PINS);

    /// Validates a raw roll value.
    ///
    /// Negative values fail with [`BowlingError::InvalidRoll`]; values above
    /// [`TOTAL_NUMBER_OF_PINS`] fail with [`BowlingError::PinCountExceeding`].
    pub fn try_new(pins: i32) -> BowlingResult<Self> {
        if pins < 0 {
            return Err(BowlingError::InvalidRoll { pins });
        }
        if pins > i32::from(TOTAL_NUMBER_OF_PINS) {
            return Err(BowlingError::PinCountExceeding {
                pins,
                kind: PinCountKind::Lane,
            });
        }
        Ok(Pins(pins as u8))
    }

    /// Returns the underlying pin count.
    #[inline]
    #[must_use]
    pub const fn get(self) -> u8 {
        self.0
    }

    /// Returns the pin count widened for score arithmetic.
    #[inline]
    #[must_use]
    pub const fn as_u32(self) -> u32 {
        self.0 as u32
    }

    /// Returns `true` if every pin was knocked down.
    #[inline]
    #[must_use]
    pub const fn is_all(self) -> bool {
        self.0 == TOTAL_NUMBER_OF_PINS
    }
}

impl TryFrom<i32> for Pins {
    type Error = BowlingError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        Self::try_new(value)
    }
}

impl From<Pins> for u32 {
    #[inline]
    fn from(pins: Pins) -> Self {
        pins.as_u32()
    }
}

impl std::fmt::Display for Pins {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A 1-based frame number, `1..=10`.
///
/// The engine stores frames in a sequence where `index = number - 1`;
/// `FrameNumber` keeps the two from being mixed up in errors, telemetry and
/// scoreboard rows.
///
/// # Examples
///
/// ```
/// use tenpin::FrameNumber;
///
/// let tenth = FrameNumber::from_index(9).unwrap();
/// assert_eq!(tenth, FrameNumber::TENTH);
/// assert!(tenth.is_tenth());
/// assert_eq!(tenth.index(), 9);
/// assert!(FrameNumber::from_index(10).is_none());
/// ```
#[derive(
    Debug,
    Copy,
    Clone,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    serde::Serialize,
)]
#[serde(transparent)]
pub struct FrameNumber(u8);

impl FrameNumber {
    /// The opening frame.
    pub const FIRST: FrameNumber = FrameNumber(1);

    /// The final frame, the only one with fill balls.
    pub const TENTH: FrameNumber = FrameNumber(TOTAL_NUMBER_OF_FRAMES as u8);

    /// Converts a 0-based index into the frame sequence into a frame number.
    ///
    /// Returns `None` for indices past the tenth frame.
    #[inline]
    #[must_use]
    pub const fn from_index(index: usize) -> Option<Self> {
        if index < TOTAL_NUMBER_OF_FRAMES {
            Some(FrameNumber(index as u8 + 1))
        } else {
            None
        }
    }

    /// Returns the 0-based index of this frame in the frame sequence.
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        (self.0 - 1) as usize
    }

    /// Returns the 1-based frame number.
    #[inline]
    #[must_use]
    pub const fn get(self) -> u8 {
        self.0
    }

    /// Returns `true` for the tenth frame.
    #[inline]
    #[must_use]
    pub const fn is_tenth(self) -> bool {
        self.0 as usize == TOTAL_NUMBER_OF_FRAMES
    }
}

impl std::fmt::Display for FrameNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// #########
// # TESTS #
// #########
