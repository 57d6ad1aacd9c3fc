//! Roll-handling state machine.
//!
//! # State Machine Diagram
//!
//! ```text
//!        strike, frames 1-8
//!          ┌──────┐
//!          ▼      │     fewer than ten pins    ┌────────────┐
//!     ┌───────────┴─┐ ───────────────────────► │ SecondRoll │
//!     │  FirstRoll  │                          └─────┬──────┘
//!     └──────┬──────┘ ◄────── frames 1-8 ────────────┤
//!            │ strike, frame 9                       │ frame 9
//!            ▼                                       │
//!     ┌──────────────────────┐ ◄─────────────────────┘
//!     │ FirstRollTenthFrame  │
//!     └──────────┬───────────┘
//!                ▼
//!     ┌──────────────────────┐   open frame    ┌──────────┐
//!     │ SecondRollTenthFrame │ ──────────────► │ GameOver │
//!     └──────────┬───────────┘                 └──────────┘
//!                │ strike or spare                  ▲
//!                ▼                                  │
//!     ┌──────────────────────┐     fill ball        │
//!     │ BonusRollTenthFrame  │ ─────────────────────┘
//!     └──────────────────────┘
//! ```
//!
//! ## State Transitions
//!
//! | From                 | To                   | Trigger                                 |
//! |----------------------|----------------------|-----------------------------------------|
//! | FirstRoll            | FirstRoll            | Strike in frames 1-8                    |
//! | FirstRoll            | FirstRollTenthFrame  | Strike in frame 9                       |
//! | FirstRoll            | SecondRoll           | Fewer than ten pins                     |
//! | SecondRoll           | FirstRoll            | Frames 1-8 closed                       |
//! | SecondRoll           | FirstRollTenthFrame  | Frame 9 closed                          |
//! | FirstRollTenthFrame  | SecondRollTenthFrame | Any roll                                |
//! | SecondRollTenthFrame | GameOver             | Tenth frame open (fewer than ten pins)  |
//! | SecondRollTenthFrame | BonusRollTenthFrame  | Tenth frame strike or spare             |
//! | BonusRollTenthFrame  | GameOver             | Fill ball                               |
//!
//! The pure transition logic lives in [`crate::transition`].

/// Which roll-handling rule applies to the next roll.
///
/// The engine starts in [`GameState::FirstRoll`] and ends in the terminal
/// [`GameState::GameOver`], where every roll is rejected.
#[derive(
    Debug,
    Copy,
    Clone,
    PartialEq,
    Eq,
    Hash,
    Default,
    serde::Serialize,
    serde::Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GameState {
    /// The next roll opens one of frames 1-9.
    ///
    /// **Transition**: strike → `FirstRoll` (or `FirstRollTenthFrame` after
    /// frame 9); otherwise → `SecondRoll`
    #[default]
    FirstRoll,

    /// The next roll is the second roll of one of frames 1-9.
    ///
    /// **Transition**: → `FirstRoll` (or `FirstRollTenthFrame` after frame 9)
    SecondRoll,

    /// The next roll opens the tenth frame.
    ///
    /// **Transition**: → `SecondRollTenthFrame`
    FirstRollTenthFrame,

    /// The next roll is the tenth frame's second roll.
    ///
    /// **Transition**: open frame → `GameOver`; strike or spare →
    /// `BonusRollTenthFrame`
    SecondRollTenthFrame,

    /// The next roll is the tenth frame's fill ball.
    ///
    /// **Transition**: → `GameOver`
    BonusRollTenthFrame,

    /// The game is over.
    ///
    /// **Transition**: None (terminal state)
    GameOver,
}

impl GameState {
    /// Returns `true` for the terminal state.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::GameOver)
    }

    /// Returns `true` while the next roll belongs to the tenth frame.
    #[must_use]
    pub const fn is_tenth_frame(self) -> bool {
        matches!(
            self,
            Self::FirstRollTenthFrame | Self::SecondRollTenthFrame | Self::BonusRollTenthFrame
        )
    }

    /// Returns `true` if the next roll opens a new frame.
    #[must_use]
    pub const fn opens_frame(self) -> bool {
        matches!(self, Self::FirstRoll | Self::FirstRollTenthFrame)
    }

    /// Returns a string representation suitable for logging/metrics labels.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::FirstRoll => "first_roll",
            Self::SecondRoll => "second_roll",
            Self::FirstRollTenthFrame => "first_roll_tenth_frame",
            Self::SecondRollTenthFrame => "second_roll_tenth_frame",
            Self::BonusRollTenthFrame => "bonus_roll_tenth_frame",
            Self::GameOver => "game_over",
        }
    }
}

impl std::fmt::Display for GameState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
