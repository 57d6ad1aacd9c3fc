//! The rendered board returned after every roll.

use smallvec::SmallVec;

use crate::{Frame, FrameNumber, ScoreboardFormat, TOTAL_NUMBER_OF_FRAMES};

/// One frame on the board.
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize)]
pub struct ScoreboardRow {
    /// Which frame this row shows.
    pub frame: FrameNumber,
    /// The frame's roll marks, e.g. `"X | 0"`, `"7 | /"` or `"X | X | X"`.
    pub rolls: String,
    /// Running game total through this frame, inclusive.
    pub accumulated_score: u32,
}

/// The scoreboard for the frames recorded so far.
///
/// Running totals are recomputed from the frames' individual scores when the
/// board is built, so a bonus earned after a frame was shown is reflected the
/// next time the board is rendered.
///
/// # Example
///
/// ```
/// use tenpin::BowlingGame;
///
/// let mut game = BowlingGame::new();
/// for pins in [10, 7, 3, 4] {
///     game.roll(pins)?;
/// }
///
/// let pairs: Vec<(String, String)> = game.scoreboard().pairs().collect();
/// assert_eq!(
///     pairs,
///     vec![
///         ("X | 0".to_owned(), "20".to_owned()),
///         ("7 | /".to_owned(), "34".to_owned()),
///         ("4 | 0".to_owned(), "38".to_owned()),
///     ]
/// );
/// # Ok::<(), tenpin::BowlingError>(())
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(transparent)]
pub struct Scoreboard {
    rows: SmallVec<[ScoreboardRow; TOTAL_NUMBER_OF_FRAMES]>,
}

impl Scoreboard {
    /// Builds the board for `frames`, which are numbered from one in order.
    #[must_use]
    pub fn from_frames(frames: &[Frame], format: &ScoreboardFormat) -> Self {
        let mut running = 0;
        let rows = frames
            .iter()
            .enumerate()
            .filter_map(|(index, frame)| {
                let number = FrameNumber::from_index(index)?;
                running += frame.individual_frame_score();
                Some(ScoreboardRow {
                    frame: number,
                    rolls: frame.rolls_display(format, number.is_tenth()),
                    accumulated_score: running,
                })
            })
            .collect();
        Self { rows }
    }

    /// The rows, first frame first.
    #[must_use]
    pub fn rows(&self) -> &[ScoreboardRow] {
        &self.rows
    }

    /// Number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// `true` before the first roll.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Iterates over the rows.
    pub fn iter(&self) -> std::slice::Iter<'_, ScoreboardRow> {
        self.rows.iter()
    }

    /// `(rolls, accumulated score)` text pairs, one per row.
    pub fn pairs(&self) -> impl Iterator<Item = (String, String)> + '_ {
        self.rows
            .iter()
            .map(|row| (row.rolls.clone(), row.accumulated_score.to_string()))
    }

    /// The running total of the last row, `0` for an empty board.
    #[must_use]
    pub fn total(&self) -> u32 {
        self.rows.last().map_or(0, |row| row.accumulated_score)
    }
}

impl<'a> IntoIterator for &'a Scoreboard {
    type Item = &'a ScoreboardRow;
    type IntoIter = std::slice::Iter<'a, ScoreboardRow>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl std::fmt::Display for Scoreboard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for row in &self.rows {
            writeln!(
                f,
                "Frame {:>2}: {:<9} {:>3}",
                row.frame.get(),
                row.rolls,
                row.accumulated_score
            )?;
        }
        Ok(())
    }
}
