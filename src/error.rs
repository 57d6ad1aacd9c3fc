//! Errors returned by the engine when a roll or configuration is rejected.

use std::error::Error;
use std::fmt;
use std::fmt::Display;

use crate::FrameNumber;

/// Convenience alias for results returned by the engine.
pub type BowlingResult<T> = Result<T, BowlingError>;

/// Which pin limit a rejected roll would have broken.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum PinCountKind {
    /// A single roll knocked down more pins than a lane holds.
    Lane,
    /// The second roll in frames one to nine knocked down more pins than were
    /// left standing.
    Frame {
        /// The frame the roll belonged to.
        frame: FrameNumber,
        /// Pins still standing after the first roll.
        standing: u8,
    },
    /// The tenth frame's fill ball knocked down more pins than were left standing
    /// after a strike followed by a partial second roll.
    FillBall {
        /// Pins still standing after the tenth frame's second roll.
        standing: u8,
    },
}

/// This enum contains all errors the engine can return. Every fallible engine
/// call returns a [`BowlingResult`].
///
/// A rejected roll never changes the game: frames, state and back-references
/// are exactly as they were before the call, and the game can continue.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum BowlingError {
    /// The roll was negative.
    InvalidRoll {
        /// The rejected value.
        pins: i32,
    },
    /// The roll knocked down more pins than were available.
    PinCountExceeding {
        /// The rejected value.
        pins: i32,
        /// Which limit was exceeded.
        kind: PinCountKind,
    },
    /// A roll was attempted after the game concluded.
    GameOver,
    /// A [`GameBuilder`] was given an unusable configuration.
    ///
    /// [`GameBuilder`]: crate::GameBuilder
    InvalidConfiguration {
        /// Further specifies why the configuration was invalid.
        info: String,
    },
    /// The engine's frame bookkeeping is inconsistent. This should not happen
    /// under normal operation; please report it as a bug.
    InternalError {
        /// A description of the internal error.
        context: String,
    },
}

impl BowlingError {
    /// Returns a stable label for logs and metrics.
    #[must_use]
    pub const fn kind_str(&self) -> &'static str {
        match self {
            Self::InvalidRoll { .. } => "invalid_roll",
            Self::PinCountExceeding { .. } => "pin_count_exceeding",
            Self::GameOver => "game_over",
            Self::InvalidConfiguration { .. } => "invalid_configuration",
            Self::InternalError { .. } => "internal_error",
        }
    }

    /// Returns `true` for errors caused by the submitted roll rather than by
    /// configuration or engine bookkeeping.
    #[must_use]
    pub const fn is_rejected_roll(&self) -> bool {
        matches!(
            self,
            Self::InvalidRoll { .. } | Self::PinCountExceeding { .. } | Self::GameOver
        )
    }
}

impl Display for BowlingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BowlingError::InvalidRoll { pins } => {
                write!(f, "Invalid Roll: {} is not a valid pin count", pins)
            }
            BowlingError::PinCountExceeding { pins, kind } => match kind {
                PinCountKind::Lane => {
                    write!(f, "Pin count exceeds pins on the lane: {} > 10", pins)
                }
                PinCountKind::Frame { frame, standing } => {
                    write!(
                        f,
                        "Pin count exceeds pins on the lane: {} rolled in frame {} with {} standing",
                        pins, frame, standing
                    )
                }
                PinCountKind::FillBall { standing } => {
                    write!(
                        f,
                        "Pin count exceeds pins on the lane: fill ball of {} with {} standing",
                        pins, standing
                    )
                }
            },
            BowlingError::GameOver => {
                write!(f, "Cannot roll after game is over")
            }
            BowlingError::InvalidConfiguration { info } => {
                write!(f, "Invalid configuration: {}", info)
            }
            BowlingError::InternalError { context } => {
                write!(f, "Internal error (please report as bug): {}", context)
            }
        }
    }
}

impl Error for BowlingError {}
