//! A single frame: its rolls, strike/spare flags, bonus and running total.

use smallvec::SmallVec;

use crate::telemetry::{InvariantChecker, InvariantViolation};
use crate::{Pins, ScoreboardFormat, TOTAL_NUMBER_OF_PINS};

/// One of the ten frames of a game.
///
/// A frame is created by its first roll and then only changes through the
/// named update operations: [`record_second_roll`](Frame::record_second_roll),
/// [`record_fill_ball`](Frame::record_fill_ball) and
/// [`add_bonus`](Frame::add_bonus). The strike flag is fixed at creation,
/// the spare flag can only ever become `true`, and the strike/spare bonus only
/// grows.
///
/// # Example
///
/// ```
/// use tenpin::{Frame, Pins};
///
/// let mut frame = Frame::open(Pins::try_from(7)?);
/// frame.record_second_roll(Pins::try_from(3)?);
/// assert!(frame.is_spare());
///
/// frame.add_bonus(5);
/// assert_eq!(frame.individual_frame_score(), 15);
/// # Ok::<(), tenpin::BowlingError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize)]
pub struct Frame {
    first_roll: Pins,
    second_roll: Pins,
    fill_ball: Pins,
    strike_spare_bonus: u32,
    is_strike: bool,
    is_spare: bool,
    previous_frame_score_sum: u32,
    #[serde(skip)]
    roll_count: u8,
}

impl Frame {
    /// Opens a frame with its first roll.
    #[must_use]
    pub fn open(first_roll: Pins) -> Self {
        Self {
            first_roll,
            second_roll: Pins::ZERO,
            fill_ball: Pins::ZERO,
            strike_spare_bonus: 0,
            is_strike: first_roll.is_all(),
            is_spare: false,
            previous_frame_score_sum: 0,
            roll_count: 1,
        }
    }

    /// Records the second roll and marks the frame as a spare when the two
    /// rolls clear the lane without a strike.
    ///
    /// Legality (pins left standing) is checked by the engine before this is
    /// called.
    pub fn record_second_roll(&mut self, pins: Pins) {
        self.second_roll = pins;
        self.roll_count = self.roll_count.max(2);
        if !self.is_strike && self.first_roll.get() + pins.get() == TOTAL_NUMBER_OF_PINS {
            self.is_spare = true;
        }
    }

    /// Records the tenth frame's fill ball.
    pub fn record_fill_ball(&mut self, pins: Pins) {
        self.fill_ball = pins;
        self.roll_count = 3;
    }

    /// Adds bonus points earned from a later roll. Bonuses accumulate and are
    /// never overwritten.
    pub fn add_bonus(&mut self, points: u32) {
        self.strike_spare_bonus += points;
    }

    pub(crate) fn set_previous_frame_score_sum(&mut self, sum: u32) {
        self.previous_frame_score_sum = sum;
    }

    /// Pins knocked down by the first roll.
    #[must_use]
    pub const fn first_roll(&self) -> Pins {
        self.first_roll
    }

    /// Pins knocked down by the second roll, [`Pins::ZERO`] until it happens.
    #[must_use]
    pub const fn second_roll(&self) -> Pins {
        self.second_roll
    }

    /// Pins knocked down by the tenth frame's fill ball, [`Pins::ZERO`] otherwise.
    #[must_use]
    pub const fn fill_ball(&self) -> Pins {
        self.fill_ball
    }

    /// Bonus accumulated from rolls in later frames.
    #[must_use]
    pub const fn strike_spare_bonus(&self) -> u32 {
        self.strike_spare_bonus
    }

    /// `true` if the first roll knocked down all ten pins.
    #[must_use]
    pub const fn is_strike(&self) -> bool {
        self.is_strike
    }

    /// `true` if the second roll cleared the pins left by the first.
    #[must_use]
    pub const fn is_spare(&self) -> bool {
        self.is_spare
    }

    /// Sum of the individual scores of every earlier frame.
    #[must_use]
    pub const fn previous_frame_score_sum(&self) -> u32 {
        self.previous_frame_score_sum
    }

    /// Pins of this frame's own rolls plus any bonus earned so far.
    #[must_use]
    pub const fn individual_frame_score(&self) -> u32 {
        self.first_roll.as_u32()
            + self.second_roll.as_u32()
            + self.fill_ball.as_u32()
            + self.strike_spare_bonus
    }

    /// Running game total through this frame, inclusive.
    #[must_use]
    pub const fn accumulated_frame_score(&self) -> u32 {
        self.individual_frame_score() + self.previous_frame_score_sum
    }

    /// `true` if the first two rolls reach ten pins, which earns a fill ball
    /// in the tenth frame.
    #[must_use]
    pub const fn earns_fill_ball(&self) -> bool {
        self.is_strike || self.first_roll.get() + self.second_roll.get() >= TOTAL_NUMBER_OF_PINS
    }

    /// Pins knocked down by this frame's own rolls, without bonus.
    #[must_use]
    pub const fn pinfall(&self) -> u32 {
        self.first_roll.as_u32() + self.second_roll.as_u32() + self.fill_ball.as_u32()
    }

    /// The rolls recorded for this frame, in order.
    #[must_use]
    pub fn rolls(&self) -> SmallVec<[Pins; 3]> {
        [self.first_roll, self.second_roll, self.fill_ball]
            .into_iter()
            .take(self.roll_count as usize)
            .collect()
    }

    /// Number of rolls recorded for this frame.
    #[must_use]
    pub const fn roll_count(&self) -> usize {
        self.roll_count as usize
    }

    /// Scoreboard mark for the first roll.
    #[must_use]
    pub fn first_roll_mark(&self, format: &ScoreboardFormat) -> char {
        if self.first_roll.is_all() {
            format.strike_mark
        } else {
            digit(self.first_roll)
        }
    }

    /// Scoreboard mark for the second roll.
    #[must_use]
    pub fn second_roll_mark(&self, format: &ScoreboardFormat) -> char {
        if self.second_roll.is_all() {
            format.strike_mark
        } else if !self.first_roll.is_all()
            && self.first_roll.get() + self.second_roll.get() == TOTAL_NUMBER_OF_PINS
        {
            format.spare_mark
        } else {
            digit(self.second_roll)
        }
    }

    /// Scoreboard mark for the fill ball, `None` unless the frame is a strike
    /// or spare. A tenth frame whose pair merely tops ten keeps its fill ball
    /// in the score but not on the board.
    #[must_use]
    pub fn fill_ball_mark(&self, format: &ScoreboardFormat) -> Option<char> {
        if !(self.is_strike || self.is_spare) {
            return None;
        }
        Some(if self.fill_ball.is_all() {
            format.strike_mark
        } else {
            digit(self.fill_ball)
        })
    }

    /// Renders the frame's rolls for the scoreboard. The fill ball segment is
    /// only appended for the tenth frame.
    #[must_use]
    pub fn rolls_display(&self, format: &ScoreboardFormat, is_tenth: bool) -> String {
        let mut out = String::with_capacity(9);
        out.push(self.first_roll_mark(format));
        out.push_str(format.roll_separator);
        out.push(self.second_roll_mark(format));
        if is_tenth {
            if let Some(mark) = self.fill_ball_mark(format) {
                out.push_str(format.roll_separator);
                out.push(mark);
            }
        }
        out
    }
}

fn digit(pins: Pins) -> char {
    char::from(b'0' + pins.get())
}

impl std::fmt::Display for Frame {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({},{}", self.first_roll, self.second_roll)?;
        if self.fill_ball != Pins::ZERO {
            write!(f, ", {}", self.fill_ball)?;
        }
        write!(f, ")")
    }
}

impl InvariantChecker for Frame {
    /// # Invariants
    ///
    /// 1. `is_strike` iff the first roll is ten
    /// 2. `is_spare` implies not a strike and the two rolls sum to ten
    /// 3. a fill ball is only recorded once the first two rolls reach ten pins
    ///
    /// Whether two rolls may exceed ten pins depends on the frame's position,
    /// so that rule is checked by the game.
    fn check_invariants(&self) -> Result<(), InvariantViolation> {
        if self.is_strike != self.first_roll.is_all() {
            return Err(
                InvariantViolation::new("Frame", "strike flag disagrees with first roll")
                    .with_details(format!(
                        "is_strike={}, first_roll={}",
                        self.is_strike, self.first_roll
                    )),
            );
        }

        if self.is_spare
            && (self.is_strike
                || self.first_roll.get() + self.second_roll.get() != TOTAL_NUMBER_OF_PINS)
        {
            return Err(
                InvariantViolation::new("Frame", "spare flag set without a spare")
                    .with_details(self.to_string()),
            );
        }

        if self.roll_count == 3 && !self.earns_fill_ball() {
            return Err(
                InvariantViolation::new("Frame", "fill ball recorded on an open frame")
                    .with_details(self.to_string()),
            );
        }

        Ok(())
    }
}

// #########
// # TESTS #
// #########

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn pins(n: i32) -> Pins {
        Pins::try_new(n).unwrap()
    }

    fn frame(first: i32, second: i32) -> Frame {
        let mut frame = Frame::open(pins(first));
        frame.record_second_roll(pins(second));
        frame
    }

    #[test]
    fn regular_first_roll() {
        for n in [1, 3, 5, 8] {
            let frame = Frame::open(pins(n));
            assert_eq!(frame.first_roll(), pins(n));
            assert_eq!(frame.second_roll(), Pins::ZERO);
            assert!(!frame.is_strike());
            assert!(!frame.is_spare());
            assert_eq!(frame.strike_spare_bonus(), 0);
            assert_eq!(frame.fill_ball(), Pins::ZERO);
            assert_eq!(frame.roll_count(), 1);
        }
    }

    #[test]
    fn open_frame_scores_its_pins() {
        for (a, b, expected) in [(1, 2, 3), (3, 4, 7), (5, 3, 8), (8, 1, 9)] {
            let frame = frame(a, b);
            assert!(!frame.is_spare());
            assert_eq!(frame.individual_frame_score(), expected);
        }
    }

    #[test]
    fn spare_is_detected_on_second_roll() {
        for (a, b) in [(1, 9), (3, 7), (5, 5), (8, 2), (0, 10)] {
            let frame = frame(a, b);
            assert!(!frame.is_strike());
            assert!(frame.is_spare());
            assert_eq!(frame.individual_frame_score(), 10);
        }
    }

    #[test]
    fn strike_is_fixed_at_open() {
        let mut frame = Frame::open(Pins::ALL);
        assert!(frame.is_strike());
        frame.record_second_roll(Pins::ALL);
        assert!(frame.is_strike());
        assert!(!frame.is_spare());
    }

    #[test]
    fn bonus_accumulates() {
        let mut frame = Frame::open(Pins::ALL);
        frame.add_bonus(10);
        frame.add_bonus(4);
        assert_eq!(frame.strike_spare_bonus(), 14);
        assert_eq!(frame.individual_frame_score(), 24);
        assert_eq!(frame.pinfall(), 10);
    }

    #[test]
    fn accumulated_score_includes_previous_sum() {
        let mut frame = frame(3, 4);
        frame.set_previous_frame_score_sum(20);
        assert_eq!(frame.accumulated_frame_score(), 27);
    }

    #[test]
    fn rolls_lists_recorded_rolls_only() {
        let frame_one = Frame::open(pins(4));
        assert_eq!(frame_one.rolls().as_slice(), &[pins(4)]);

        let mut tenth = frame(10, 10);
        tenth.record_fill_ball(pins(7));
        assert_eq!(tenth.rolls().as_slice(), &[Pins::ALL, Pins::ALL, pins(7)]);
    }

    #[test]
    fn marks_follow_classic_board() {
        let format = ScoreboardFormat::default();
        assert_eq!(Frame::open(Pins::ALL).first_roll_mark(&format), 'X');
        assert_eq!(frame(7, 3).second_roll_mark(&format), '/');
        assert_eq!(frame(0, 10).second_roll_mark(&format), 'X');
        assert_eq!(frame(10, 10).second_roll_mark(&format), 'X');
        assert_eq!(frame(10, 0).second_roll_mark(&format), '0');
        assert_eq!(frame(4, 5).first_roll_mark(&format), '4');
        assert_eq!(frame(4, 5).second_roll_mark(&format), '5');
    }

    #[test]
    fn fill_ball_mark_only_for_strike_or_spare() {
        let format = ScoreboardFormat::default();
        assert_eq!(frame(4, 5).fill_ball_mark(&format), None);

        let mut spare = frame(6, 4);
        spare.record_fill_ball(Pins::ALL);
        assert_eq!(spare.fill_ball_mark(&format), Some('X'));

        let mut strike = frame(10, 3);
        strike.record_fill_ball(pins(5));
        assert_eq!(strike.fill_ball_mark(&format), Some('5'));
    }

    #[test]
    fn rolls_display_appends_fill_ball_on_tenth_only() {
        let format = ScoreboardFormat::default();
        let mut tenth = frame(10, 10);
        tenth.record_fill_ball(Pins::ALL);
        assert_eq!(tenth.rolls_display(&format, true), "X | X | X");
        assert_eq!(tenth.rolls_display(&format, false), "X | X");
        assert_eq!(frame(3, 4).rolls_display(&format, true), "3 | 4");
        assert_eq!(frame(9, 1).rolls_display(&format, true), "9 | / | 0");
        assert_eq!(
            frame(9, 1).rolls_display(&ScoreboardFormat::compact(), false),
            "9 /"
        );
    }

    #[test]
    fn display_matches_tuple_form() {
        assert_eq!(frame(3, 4).to_string(), "(3,4)");
        let mut tenth = frame(10, 10);
        tenth.record_fill_ball(pins(8));
        assert_eq!(tenth.to_string(), "(10,10, 8)");
    }

    #[test]
    fn invariants_hold_for_legal_frames() {
        assert!(frame(3, 4).check_invariants().is_ok());
        assert!(frame(3, 7).check_invariants().is_ok());
        assert!(Frame::open(Pins::ALL).check_invariants().is_ok());
        let mut tenth = frame(10, 10);
        tenth.record_fill_ball(Pins::ALL);
        assert!(tenth.check_invariants().is_ok());
    }

    #[test]
    fn overfull_pair_earns_fill_ball_without_spare() {
        let format = ScoreboardFormat::default();
        let mut tenth = frame(5, 7);
        assert!(!tenth.is_spare());
        assert!(tenth.earns_fill_ball());
        assert!(tenth.check_invariants().is_ok());

        tenth.record_fill_ball(pins(6));
        assert!(tenth.check_invariants().is_ok());
        assert_eq!(tenth.individual_frame_score(), 18);
        assert_eq!(tenth.rolls().as_slice(), &[pins(5), pins(7), pins(6)]);
        assert_eq!(tenth.fill_ball_mark(&format), None);
        assert_eq!(tenth.rolls_display(&format, true), "5 | 7");
        assert!(!frame(5, 4).earns_fill_ball());
    }

    #[test]
    fn invariants_catch_fill_ball_on_open_frame() {
        let mut frame = frame(3, 4);
        frame.record_fill_ball(pins(2));
        let violation = frame.check_invariants().unwrap_err();
        assert_eq!(violation.type_name, "Frame");
    }

    #[test]
    fn serializes_scoring_fields() {
        let json = serde_json::to_value(frame(7, 3)).unwrap();
        assert_eq!(json["first_roll"], 7);
        assert_eq!(json["second_roll"], 3);
        assert_eq!(json["is_spare"], true);
        assert!(json.get("roll_count").is_none());
    }
}
