//! The scoring engine: one game, fed one roll at a time.

use std::sync::Arc;

use smallvec::SmallVec;
use tracing::{debug, trace};

use crate::telemetry::{
    InvariantChecker, InvariantViolation, ViolationKind, ViolationObserver, ViolationSeverity,
};
use crate::transition::{plan_roll, RollAction, Transition};
use crate::{debug_check_invariants, report_violation_to};
use crate::{
    BowlingError, BowlingResult, Frame, FrameNumber, GameState, PinCountKind, Pins, Scoreboard,
    ScoreboardFormat, TOTAL_NUMBER_OF_FRAMES, TOTAL_NUMBER_OF_PINS,
};

/// The scoring engine for a single game.
///
/// `BowlingGame` owns the frames recorded so far and the [`GameState`] that
/// decides how the next roll is handled. Back-references to the current frame
/// and the two frames before it are kept as indices into the frame sequence
/// and recomputed whenever a frame is opened.
///
/// Strike and spare bonuses are applied incrementally: the moment a
/// qualifying roll happens, its pins are added to the earlier frame's bonus.
/// After every accepted roll each frame's running total is refreshed, so
/// [`Frame::accumulated_frame_score`] always agrees with the
/// [`Scoreboard`].
///
/// # Example
///
/// ```
/// use tenpin::BowlingGame;
///
/// let mut game = BowlingGame::new();
/// game.roll(9)?;
/// game.roll(1)?; // spare
/// game.roll(5)?;
///
/// let board = game.scoreboard();
/// assert_eq!(board.rows()[0].rolls, "9 | /");
/// assert_eq!(board.rows()[0].accumulated_score, 15);
/// assert_eq!(game.score(), 20);
/// # Ok::<(), tenpin::BowlingError>(())
/// ```
#[derive(Clone)]
pub struct BowlingGame {
    frames: SmallVec<[Frame; TOTAL_NUMBER_OF_FRAMES]>,
    state: GameState,
    current: Option<usize>,
    previous: Option<usize>,
    previous_previous: Option<usize>,
    format: ScoreboardFormat,
    violation_observer: Option<Arc<dyn ViolationObserver>>,
}

impl std::fmt::Debug for BowlingGame {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let Self {
            frames,
            state,
            current,
            previous,
            previous_previous,
            format,
            violation_observer,
        } = self;

        f.debug_struct("BowlingGame")
            .field("frames", frames)
            .field("state", state)
            .field("current", current)
            .field("previous", previous)
            .field("previous_previous", previous_previous)
            .field("format", format)
            .field("has_violation_observer", &violation_observer.is_some())
            .finish()
    }
}

impl Default for BowlingGame {
    fn default() -> Self {
        Self::new()
    }
}

impl BowlingGame {
    /// Creates a game with the default scoreboard format and the tracing
    /// observer for rule violations. Use [`GameBuilder`](crate::GameBuilder)
    /// to configure either.
    #[must_use]
    pub fn new() -> Self {
        Self::with_parts(ScoreboardFormat::default(), None)
    }

    pub(crate) fn with_parts(
        format: ScoreboardFormat,
        violation_observer: Option<Arc<dyn ViolationObserver>>,
    ) -> Self {
        Self {
            frames: SmallVec::new(),
            state: GameState::FirstRoll,
            current: None,
            previous: None,
            previous_previous: None,
            format,
            violation_observer,
        }
    }

    /// Records one roll.
    ///
    /// # Errors
    ///
    /// - [`BowlingError::InvalidRoll`] if `pins` is negative.
    /// - [`BowlingError::PinCountExceeding`] if `pins` is above ten, or more
    ///   than the pins still standing in one of frames 1-9 (or for the fill
    ///   ball after a strike and a partial roll).
    /// - [`BowlingError::GameOver`] if the game has already ended.
    ///
    /// A failed roll leaves the game exactly as it was.
    pub fn roll(&mut self, pins: i32) -> BowlingResult<()> {
        let transition = match Pins::try_new(pins).and_then(|pins| self.advance(pins)) {
            Ok(transition) => transition,
            Err(err) => {
                debug!(pins, kind = err.kind_str(), state = %self.state, "Rejected roll");
                if let BowlingError::InternalError { context } = &err {
                    report_violation_to!(
                        self.violation_observer,
                        ViolationSeverity::Critical,
                        ViolationKind::StateMachine,
                        "{} (state={}, frames={})",
                        context,
                        self.state,
                        self.frames.len()
                    );
                }
                return Err(err);
            },
        };

        debug!(
            frame = %transition.action.frame(),
            pins,
            next_state = %transition.next,
            "Accepted roll"
        );
        if transition.next.is_terminal() {
            debug!(score = self.score(), "Game over");
        }

        debug_check_invariants!(self.violation_observer, self);
        Ok(())
    }

    /// Plans, applies and propagates one roll. Nothing is mutated unless the
    /// plan is accepted.
    fn advance(&mut self, pins: Pins) -> BowlingResult<Transition> {
        let transition = plan_roll(self.state, &self.frames, pins)?;
        match transition.action {
            RollAction::OpenFrame { frame, pins } => {
                self.frames.push(Frame::open(pins));
                self.point_back_references_at(frame.index());
                self.propagate_first_roll(pins);
            },
            RollAction::RecordSecondRoll { frame, pins } => {
                self.frame_mut(frame)?.record_second_roll(pins);
                self.propagate_second_roll(pins);
            },
            RollAction::RecordFillBall { pins } => {
                self.frame_mut(FrameNumber::TENTH)?.record_fill_ball(pins);
            },
        }
        self.state = transition.next;
        self.refresh_running_totals();
        Ok(transition)
    }

    fn frame_mut(&mut self, frame: FrameNumber) -> BowlingResult<&mut Frame> {
        self.frames
            .get_mut(frame.index())
            .ok_or_else(|| BowlingError::InternalError {
                context: format!("frame {} has not been opened", frame),
            })
    }

    fn point_back_references_at(&mut self, index: usize) {
        self.current = Some(index);
        self.previous = index.checked_sub(1);
        self.previous_previous = index.checked_sub(2);
    }

    /// A new frame's first roll pays the spare or strike in the frame before
    /// it, and the strike two frames back when both earlier frames are strikes.
    fn propagate_first_roll(&mut self, pins: Pins) {
        let previous = self.previous.and_then(|i| self.frames.get(i));
        let previous_previous = self.previous_previous.and_then(|i| self.frames.get(i));

        let pay_previous = previous.is_some_and(|f| f.is_strike() || f.is_spare());
        let pay_previous_previous = previous.is_some_and(Frame::is_strike)
            && previous_previous.is_some_and(Frame::is_strike);

        if pay_previous {
            self.award_bonus(self.previous, pins);
        }
        if pay_previous_previous {
            self.award_bonus(self.previous_previous, pins);
        }
    }

    /// A second roll only completes the bonus of a strike in the frame before.
    fn propagate_second_roll(&mut self, pins: Pins) {
        let pay_previous = self
            .previous
            .and_then(|i| self.frames.get(i))
            .is_some_and(Frame::is_strike);
        if pay_previous {
            self.award_bonus(self.previous, pins);
        }
    }

    fn award_bonus(&mut self, index: Option<usize>, pins: Pins) {
        if let Some(frame) = index.and_then(|i| self.frames.get_mut(i)) {
            frame.add_bonus(pins.as_u32());
            trace!(
                frame = index.map_or(0, |i| i + 1),
                pins = pins.get(),
                bonus = frame.strike_spare_bonus(),
                "Propagated bonus"
            );
        }
    }

    fn refresh_running_totals(&mut self) {
        let mut running = 0;
        for frame in &mut self.frames {
            frame.set_previous_frame_score_sum(running);
            running += frame.individual_frame_score();
        }
    }

    /// Clears every frame and returns to [`GameState::FirstRoll`]. The
    /// scoreboard format and violation observer are kept.
    pub fn reset(&mut self) {
        self.frames.clear();
        self.state = GameState::FirstRoll;
        self.current = None;
        self.previous = None;
        self.previous_previous = None;
        debug!("Game reset");
    }

    /// `true` once the last roll of the tenth frame has been recorded.
    #[must_use]
    pub fn is_game_over(&self) -> bool {
        self.state.is_terminal()
    }

    /// Sum of every recorded frame's individual score. Bonuses still owed to
    /// recent strikes and spares are missing until their rolls happen.
    #[must_use]
    pub fn score(&self) -> u32 {
        self.frames.iter().map(Frame::individual_frame_score).sum()
    }

    /// The best final score still reachable if every remaining roll knocks
    /// down all the pins left standing.
    #[must_use]
    pub fn max_possible_score(&self) -> u32 {
        let mut best = self.clone();
        while !best.is_game_over() {
            let pins = match plan_roll(best.state, &best.frames, Pins::ALL) {
                Ok(_) => Pins::ALL,
                Err(BowlingError::PinCountExceeding {
                    kind:
                        PinCountKind::Frame { standing, .. } | PinCountKind::FillBall { standing },
                    ..
                }) => match Pins::try_new(i32::from(standing)) {
                    Ok(pins) => pins,
                    Err(_) => break,
                },
                Err(_) => break,
            };
            if best.advance(pins).is_err() {
                break;
            }
        }
        best.score()
    }

    /// Renders the board: one row per recorded frame with its roll marks and
    /// running total.
    #[must_use]
    pub fn scoreboard(&self) -> Scoreboard {
        Scoreboard::from_frames(&self.frames, &self.format)
    }

    /// The frames recorded so far, in order.
    #[must_use]
    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    /// The frame with the given number, if it has been opened.
    #[must_use]
    pub fn frame(&self, number: FrameNumber) -> Option<&Frame> {
        self.frames.get(number.index())
    }

    /// Number of frames opened so far.
    #[must_use]
    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    /// The state deciding how the next roll is handled.
    #[must_use]
    pub fn game_state(&self) -> GameState {
        self.state
    }

    /// The most recently opened frame.
    #[must_use]
    pub fn current_frame(&self) -> Option<&Frame> {
        self.current.and_then(|i| self.frames.get(i))
    }

    /// The frame before [`current_frame`](Self::current_frame).
    #[must_use]
    pub fn previous_frame(&self) -> Option<&Frame> {
        self.previous.and_then(|i| self.frames.get(i))
    }

    /// The frame two before [`current_frame`](Self::current_frame).
    #[must_use]
    pub fn previous_previous_frame(&self) -> Option<&Frame> {
        self.previous_previous.and_then(|i| self.frames.get(i))
    }

    /// Every accepted roll, in the order it was rolled.
    #[must_use]
    pub fn rolls(&self) -> Vec<Pins> {
        self.frames.iter().flat_map(Frame::rolls).collect()
    }

    /// The format used by [`scoreboard`](Self::scoreboard).
    #[must_use]
    pub fn scoreboard_format(&self) -> &ScoreboardFormat {
        &self.format
    }

    /// Finds the first broken rule, filed under the category it belongs to.
    fn find_violation(&self) -> Option<InvariantViolation> {
        let len = self.frames.len();
        if len > TOTAL_NUMBER_OF_FRAMES {
            return Some(
                InvariantViolation::new("BowlingGame", "more than ten frames recorded")
                    .with_kind(ViolationKind::FrameSequence)
                    .with_details(format!("frames={}", len)),
            );
        }

        let current = len.checked_sub(1);
        let expected = (
            current,
            current.and_then(|i| i.checked_sub(1)),
            current.and_then(|i| i.checked_sub(2)),
        );
        if (self.current, self.previous, self.previous_previous) != expected {
            return Some(
                InvariantViolation::new("BowlingGame", "back-references out of step")
                    .with_kind(ViolationKind::FrameSequence)
                    .with_details(format!(
                        "current={:?}, previous={:?}, previous_previous={:?}, frames={}",
                        self.current, self.previous, self.previous_previous, len
                    )),
            );
        }

        for (index, frame) in self.frames.iter().enumerate() {
            let Some(number) = FrameNumber::from_index(index) else {
                continue;
            };
            if let Err(violation) = frame.check_invariants() {
                return Some(violation.with_frame(number));
            }
            if number.is_tenth() {
                continue;
            }
            if frame.is_strike() && frame.roll_count() != 1 {
                return Some(
                    InvariantViolation::new("BowlingGame", "strike frame recorded a second roll")
                        .with_kind(ViolationKind::FrameSequence)
                        .with_frame(number),
                );
            }
            if !frame.is_strike()
                && frame.first_roll().get() + frame.second_roll().get() > TOTAL_NUMBER_OF_PINS
            {
                return Some(
                    InvariantViolation::new("BowlingGame", "two rolls exceed the pins on the lane")
                        .with_frame(number)
                        .with_details(frame.to_string()),
                );
            }
        }

        if !self.state_fits_frames() {
            return Some(
                InvariantViolation::new("BowlingGame", "game state does not fit recorded frames")
                    .with_kind(ViolationKind::StateMachine)
                    .with_details(format!("state={}, frames={}", self.state, len)),
            );
        }

        let rolls: Vec<(usize, Pins)> = self
            .frames
            .iter()
            .enumerate()
            .flat_map(|(index, frame)| frame.rolls().into_iter().map(move |pins| (index, pins)))
            .collect();
        let mut running = 0;
        for (index, frame) in self.frames.iter().enumerate() {
            let Some(number) = FrameNumber::from_index(index) else {
                continue;
            };

            let owed = if number.is_tenth() {
                0
            } else if frame.is_strike() {
                2
            } else if frame.is_spare() {
                1
            } else {
                0
            };
            let expected_bonus: u32 = rolls
                .iter()
                .filter(|(owner, _)| *owner > index)
                .take(owed)
                .map(|(_, pins)| pins.as_u32())
                .sum();
            if frame.strike_spare_bonus() != expected_bonus {
                return Some(
                    InvariantViolation::new("BowlingGame", "bonus disagrees with later rolls")
                        .with_kind(ViolationKind::BonusPropagation)
                        .with_frame(number)
                        .with_details(format!(
                            "expected={}, actual={}",
                            expected_bonus,
                            frame.strike_spare_bonus()
                        )),
                );
            }

            if frame.previous_frame_score_sum() != running {
                return Some(
                    InvariantViolation::new("BowlingGame", "stale running total")
                        .with_kind(ViolationKind::RunningTotal)
                        .with_frame(number)
                        .with_details(format!(
                            "expected={}, actual={}",
                            running,
                            frame.previous_frame_score_sum()
                        )),
                );
            }
            running += frame.individual_frame_score();
        }

        None
    }

    fn state_fits_frames(&self) -> bool {
        let len = self.frames.len();
        let last = self.frames.last();
        let closed = |frame: &Frame| frame.is_strike() || frame.roll_count() == 2;
        match self.state {
            GameState::FirstRoll => len < TOTAL_NUMBER_OF_FRAMES - 1 && last.map_or(true, closed),
            GameState::SecondRoll => {
                len < TOTAL_NUMBER_OF_FRAMES && last.is_some_and(|f| !closed(f))
            },
            GameState::FirstRollTenthFrame => {
                len == TOTAL_NUMBER_OF_FRAMES - 1 && last.is_some_and(closed)
            },
            GameState::SecondRollTenthFrame => {
                len == TOTAL_NUMBER_OF_FRAMES && last.is_some_and(|f| f.roll_count() == 1)
            },
            GameState::BonusRollTenthFrame => {
                len == TOTAL_NUMBER_OF_FRAMES
                    && last.is_some_and(|f| f.roll_count() == 2 && f.earns_fill_ball())
            },
            GameState::GameOver => {
                len == TOTAL_NUMBER_OF_FRAMES
                    && last.is_some_and(|f| {
                        f.roll_count() == 3 || (f.roll_count() == 2 && !f.earns_fill_ball())
                    })
            },
        }
    }
}

impl InvariantChecker for BowlingGame {
    /// # Invariants
    ///
    /// 1. at most ten frames are recorded
    /// 2. back-references point at the last three frames
    /// 3. every frame satisfies its own invariants
    /// 4. strikes in frames 1-9 carry a single roll
    /// 5. other frames before the tenth never knock down more than ten pins
    /// 6. the game state fits the recorded frames
    /// 7. every bonus equals the later rolls it is owed
    /// 8. every stored running total equals the recomputed one
    fn check_invariants(&self) -> Result<(), InvariantViolation> {
        self.find_violation().map_or(Ok(()), Err)
    }
}

// #########
// # TESTS #
// #########
