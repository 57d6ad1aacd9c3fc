//! Builder for configured games: scoreboard format and violation observer.

use std::sync::Arc;

use crate::report_violation_to;
use crate::telemetry::{ViolationKind, ViolationObserver, ViolationSeverity};
use crate::{BowlingGame, BowlingResult, ScoreboardFormat};

/// The [`GameBuilder`] builds configured [`BowlingGame`]s.
///
/// After setting all appropriate values, call [`GameBuilder::build`] to
/// consume the builder and create the game.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use tenpin::telemetry::CollectingObserver;
/// use tenpin::{GameBuilder, ScoreboardFormat};
///
/// let observer = Arc::new(CollectingObserver::new());
/// let mut game = GameBuilder::new()
///     .with_scoreboard_format(ScoreboardFormat::compact())
///     .with_violation_observer(observer.clone())
///     .build()?;
///
/// game.roll(6)?;
/// game.roll(4)?;
/// assert_eq!(game.scoreboard().rows()[0].rolls, "6 /");
/// assert!(observer.is_empty());
/// # Ok::<(), tenpin::BowlingError>(())
/// ```
#[must_use = "GameBuilder must be consumed by calling build()"]
#[derive(Clone, Default)]
pub struct GameBuilder {
    scoreboard_format: ScoreboardFormat,
    violation_observer: Option<Arc<dyn ViolationObserver>>,
}

impl std::fmt::Debug for GameBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let Self {
            scoreboard_format,
            violation_observer,
        } = self;

        f.debug_struct("GameBuilder")
            .field("scoreboard_format", scoreboard_format)
            .field("has_violation_observer", &violation_observer.is_some())
            .finish()
    }
}

impl GameBuilder {
    /// Construct a new builder with all values set to their defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets how [`BowlingGame::scoreboard`] renders rolls.
    pub fn with_scoreboard_format(mut self, format: ScoreboardFormat) -> Self {
        self.scoreboard_format = format;
        self
    }

    /// Sets a custom observer for rule violations.
    ///
    /// Without one, violations are logged through
    /// [`TracingObserver`](crate::telemetry::TracingObserver).
    pub fn with_violation_observer(mut self, observer: Arc<dyn ViolationObserver>) -> Self {
        self.violation_observer = Some(observer);
        self
    }

    /// Consumes the builder to construct a [`BowlingGame`].
    ///
    /// # Errors
    /// - Returns [`InvalidConfiguration`] if the scoreboard format fails
    ///   [`ScoreboardFormat::validate`].
    ///
    /// [`InvalidConfiguration`]: crate::BowlingError::InvalidConfiguration
    pub fn build(self) -> BowlingResult<BowlingGame> {
        if let Err(err) = self.scoreboard_format.validate() {
            report_violation_to!(
                self.violation_observer,
                ViolationSeverity::Warning,
                ViolationKind::Configuration,
                "rejected scoreboard format: {}",
                err
            );
            return Err(err);
        }
        Ok(BowlingGame::with_parts(
            self.scoreboard_format,
            self.violation_observer,
        ))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::telemetry::CollectingObserver;
    use crate::BowlingError;

    #[test]
    fn default_builder_matches_new_game() {
        let game = GameBuilder::new().build().unwrap();
        assert_eq!(game.scoreboard_format(), BowlingGame::new().scoreboard_format());
        assert_eq!(game.frame_count(), 0);
    }

    #[test]
    fn invalid_format_is_rejected_and_reported() {
        let observer = Arc::new(CollectingObserver::new());
        let result = GameBuilder::new()
            .with_scoreboard_format(ScoreboardFormat {
                spare_mark: 'X',
                ..ScoreboardFormat::default()
            })
            .with_violation_observer(observer.clone())
            .build();

        assert!(matches!(
            result,
            Err(BowlingError::InvalidConfiguration { .. })
        ));
        let violations = observer.violations_of_kind(ViolationKind::Configuration);
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].severity, ViolationSeverity::Warning);
        assert!(violations[0].message.starts_with("rejected scoreboard format"));
        assert!(violations[0].location.contains("builder.rs"));
    }

    #[test]
    fn debug_hides_observer() {
        let builder = GameBuilder::new().with_violation_observer(Arc::new(CollectingObserver::new()));
        assert!(format!("{:?}", builder).contains("has_violation_observer: true"));
    }
}
