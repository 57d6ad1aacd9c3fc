//! Configuration types for the scoring engine.
//!
//! The engine's scoring rules are fixed; what is configurable is how the
//! scoreboard renders rolls.
//!
//! | Config Type | Purpose | Key Presets |
//! |-------------|---------|-------------|
//! | `ScoreboardFormat` | Roll marks and separators on the scoreboard | `classic()`, `compact()` |
//!
//! # Example
//!
//! ```
//! use tenpin::{GameBuilder, ScoreboardFormat};
//!
//! let game = GameBuilder::new()
//!     .with_scoreboard_format(ScoreboardFormat::compact())
//!     .build()?;
//! assert_eq!(game.scoreboard_format(), &ScoreboardFormat::compact());
//! # Ok::<(), tenpin::BowlingError>(())
//! ```

use crate::BowlingError;

/// How the scoreboard renders the rolls of a frame.
///
/// The default is the classic board: `"X | 0"` for a strike, `"7 | /"` for a
/// spare, `"X | X | X"` for a perfect tenth frame.
///
/// # Forward Compatibility
///
/// New fields may be added in future versions. Construct instances with
/// `..ScoreboardFormat::default()`.
///
/// # Example
///
/// ```
/// use tenpin::ScoreboardFormat;
///
/// let format = ScoreboardFormat {
///     roll_separator: " ",
///     ..ScoreboardFormat::default()
/// };
/// assert!(format.validate().is_ok());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[must_use = "ScoreboardFormat has no effect unless passed to GameBuilder::with_scoreboard_format()"]
pub struct ScoreboardFormat {
    /// Text placed between the rolls of one frame.
    ///
    /// Default: `" | "`
    pub roll_separator: &'static str,

    /// Mark shown for a roll that knocked down all ten pins.
    ///
    /// Default: `'X'`
    pub strike_mark: char,

    /// Mark shown for a second roll that cleared the remaining pins.
    ///
    /// Default: `'/'`
    pub spare_mark: char,
}

impl Default for ScoreboardFormat {
    fn default() -> Self {
        Self {
            roll_separator: " | ",
            strike_mark: 'X',
            spare_mark: '/',
        }
    }
}

impl ScoreboardFormat {
    /// Creates a new `ScoreboardFormat` with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// The classic board, identical to [`Default`].
    pub fn classic() -> Self {
        Self::default()
    }

    /// A narrower board separating rolls with a single space.
    pub fn compact() -> Self {
        Self {
            roll_separator: " ",
            ..Self::default()
        }
    }

    /// Checks that the marks can be told apart from each other and from pin
    /// counts.
    pub fn validate(&self) -> Result<(), BowlingError> {
        if self.roll_separator.is_empty() {
            return Err(BowlingError::InvalidConfiguration {
                info: "roll_separator must not be empty".to_owned(),
            });
        }
        if self.strike_mark == self.spare_mark {
            return Err(BowlingError::InvalidConfiguration {
                info: format!(
                    "strike_mark and spare_mark must differ (both are '{}')",
                    self.strike_mark
                ),
            });
        }
        for (name, mark) in [
            ("strike_mark", self.strike_mark),
            ("spare_mark", self.spare_mark),
        ] {
            if mark.is_ascii_digit() || mark.is_whitespace() {
                return Err(BowlingError::InvalidConfiguration {
                    info: format!("{} must not be a digit or whitespace, got '{}'", name, mark),
                });
            }
        }
        Ok(())
    }
}
