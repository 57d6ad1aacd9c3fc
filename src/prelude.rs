//! Convenient re-exports for common usage.
//!
//! ```rust
//! use tenpin::prelude::*;
//!
//! let mut game = GameBuilder::new()
//!     .with_scoreboard_format(ScoreboardFormat::classic())
//!     .build()?;
//! game.roll(10)?;
//! assert_eq!(game.game_state(), GameState::FirstRoll);
//! # Ok::<(), BowlingError>(())
//! ```

pub use crate::{
    BowlingError, BowlingGame, BowlingResult, Frame, FrameNumber, GameBuilder, GameState,
    PinCountKind, Pins, Scoreboard, ScoreboardFormat, ScoreboardRow, PERFECT_GAME_SCORE,
    TOTAL_NUMBER_OF_FRAMES, TOTAL_NUMBER_OF_PINS,
};

pub use crate::telemetry::{
    CollectingObserver, TracingObserver, ViolationKind, ViolationObserver, ViolationSeverity,
};
