//! Pure roll transitions.
//!
//! [`plan_roll`] looks at the current [`GameState`] and the recorded frames
//! and decides what a roll does and which state follows, without touching
//! anything. Every legality check lives here, so a rejected roll never needs
//! to be undone: the engine only mutates after a plan was accepted.

use crate::{
    BowlingError, BowlingResult, Frame, FrameNumber, GameState, PinCountKind, Pins,
    TOTAL_NUMBER_OF_FRAMES, TOTAL_NUMBER_OF_PINS,
};

/// The mutation a planned roll performs.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum RollAction {
    /// Append a new frame whose first roll is `pins`.
    OpenFrame {
        /// The frame being opened.
        frame: FrameNumber,
        /// Pins knocked down.
        pins: Pins,
    },
    /// Record the second roll of the last frame.
    RecordSecondRoll {
        /// The frame receiving the roll.
        frame: FrameNumber,
        /// Pins knocked down.
        pins: Pins,
    },
    /// Record the tenth frame's fill ball.
    RecordFillBall {
        /// Pins knocked down.
        pins: Pins,
    },
}

impl RollAction {
    /// The frame this action touches.
    #[must_use]
    pub const fn frame(&self) -> FrameNumber {
        match self {
            Self::OpenFrame { frame, .. } | Self::RecordSecondRoll { frame, .. } => *frame,
            Self::RecordFillBall { .. } => FrameNumber::TENTH,
        }
    }

    /// The pins rolled.
    #[must_use]
    pub const fn pins(&self) -> Pins {
        match self {
            Self::OpenFrame { pins, .. }
            | Self::RecordSecondRoll { pins, .. }
            | Self::RecordFillBall { pins } => *pins,
        }
    }
}

/// An accepted roll: what to do and where the state machine goes next.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Transition {
    /// The mutation to apply.
    pub action: RollAction,
    /// The state after the mutation.
    pub next: GameState,
}

/// Decides what rolling `pins` in `state` does, given the frames recorded so far.
///
/// # Errors
///
/// - [`BowlingError::GameOver`] in the terminal state.
/// - [`BowlingError::PinCountExceeding`] when the roll knocks down more pins
///   than are standing: the second roll of frames one to nine, or the fill
///   ball after a strike and a partial roll. The tenth frame's second roll is
///   never capped, and any pair reaching ten pins earns the fill ball.
/// - [`BowlingError::InternalError`] when `frames` does not fit `state`.
pub fn plan_roll(state: GameState, frames: &[Frame], pins: Pins) -> BowlingResult<Transition> {
    match state {
        GameState::FirstRoll => {
            let frame = FrameNumber::from_index(frames.len())
                .filter(|frame| !frame.is_tenth())
                .ok_or_else(|| mismatch(state, frames))?;
            let next = if !pins.is_all() {
                GameState::SecondRoll
            } else if frame.index() == TOTAL_NUMBER_OF_FRAMES - 2 {
                GameState::FirstRollTenthFrame
            } else {
                GameState::FirstRoll
            };
            Ok(Transition {
                action: RollAction::OpenFrame { frame, pins },
                next,
            })
        }
        GameState::SecondRoll => {
            let (frame, current) = last_frame(frames).ok_or_else(|| mismatch(state, frames))?;
            if frame.is_tenth() || current.is_strike() || current.roll_count() != 1 {
                return Err(mismatch(state, frames));
            }
            let standing = TOTAL_NUMBER_OF_PINS - current.first_roll().get();
            if pins.get() > standing {
                return Err(BowlingError::PinCountExceeding {
                    pins: i32::from(pins.get()),
                    kind: PinCountKind::Frame { frame, standing },
                });
            }
            let next = if frame.index() == TOTAL_NUMBER_OF_FRAMES - 2 {
                GameState::FirstRollTenthFrame
            } else {
                GameState::FirstRoll
            };
            Ok(Transition {
                action: RollAction::RecordSecondRoll { frame, pins },
                next,
            })
        }
        GameState::FirstRollTenthFrame => {
            if frames.len() != TOTAL_NUMBER_OF_FRAMES - 1 {
                return Err(mismatch(state, frames));
            }
            Ok(Transition {
                action: RollAction::OpenFrame {
                    frame: FrameNumber::TENTH,
                    pins,
                },
                next: GameState::SecondRollTenthFrame,
            })
        }
        GameState::SecondRollTenthFrame => {
            // the two-roll cap only binds frames one to nine
            let tenth = tenth_frame(frames).ok_or_else(|| mismatch(state, frames))?;
            let next = if tenth.first_roll().get() + pins.get() < TOTAL_NUMBER_OF_PINS {
                GameState::GameOver
            } else {
                GameState::BonusRollTenthFrame
            };
            Ok(Transition {
                action: RollAction::RecordSecondRoll {
                    frame: FrameNumber::TENTH,
                    pins,
                },
                next,
            })
        }
        GameState::BonusRollTenthFrame => {
            let tenth = tenth_frame(frames).ok_or_else(|| mismatch(state, frames))?;
            if tenth.is_strike() && !tenth.second_roll().is_all() {
                let standing = TOTAL_NUMBER_OF_PINS - tenth.second_roll().get();
                if pins.get() > standing {
                    return Err(BowlingError::PinCountExceeding {
                        pins: i32::from(pins.get()),
                        kind: PinCountKind::FillBall { standing },
                    });
                }
            }
            Ok(Transition {
                action: RollAction::RecordFillBall { pins },
                next: GameState::GameOver,
            })
        }
        GameState::GameOver => Err(BowlingError::GameOver),
    }
}

fn last_frame(frames: &[Frame]) -> Option<(FrameNumber, &Frame)> {
    let index = frames.len().checked_sub(1)?;
    Some((FrameNumber::from_index(index)?, frames.get(index)?))
}

fn tenth_frame(frames: &[Frame]) -> Option<&Frame> {
    if frames.len() == TOTAL_NUMBER_OF_FRAMES {
        frames.get(FrameNumber::TENTH.index())
    } else {
        None
    }
}

fn mismatch(state: GameState, frames: &[Frame]) -> BowlingError {
    BowlingError::InternalError {
        context: format!(
            "state {} does not fit {} recorded frame(s)",
            state,
            frames.len()
        ),
    }
}
