//! Structured telemetry for broken scoring rules and internal invariants.
//!
//! The engine never silently repairs its own bookkeeping. When a frame or the
//! game finds itself in a state the scoring rules forbid, the problem is
//! turned into structured data that can be:
//!
//! - Logged via tracing (default behavior)
//! - Collected programmatically for testing
//! - Sent to custom observers (metrics, alerting, etc.)
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use tenpin::telemetry::CollectingObserver;
//! use tenpin::GameBuilder;
//!
//! let observer = Arc::new(CollectingObserver::new());
//! let mut game = GameBuilder::new()
//!     .with_violation_observer(observer.clone())
//!     .build()?;
//! game.roll(7)?;
//! game.roll(3)?;
//!
//! assert!(observer.violations().is_empty(), "unexpected violations");
//! # Ok::<(), tenpin::BowlingError>(())
//! ```

use crate::FrameNumber;
use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Severity of a rule violation.
///
/// Severities are ordered from least to most severe, allowing filtering
/// and comparison operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationSeverity {
    /// Unexpected but recoverable.
    Warning,
    /// Serious issue: a score shown to the player may be wrong.
    Error,
    /// Critical invariant broken: the game state is corrupted.
    Critical,
}

impl ViolationSeverity {
    /// Returns a string representation suitable for logging/metrics labels.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Warning => "warning",
            Self::Error => "error",
            Self::Critical => "critical",
        }
    }
}

impl std::fmt::Display for ViolationSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Categories of rule violations.
///
/// # Forward Compatibility
///
/// This enum is marked `#[non_exhaustive]`. Always include a wildcard arm
/// when matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize)]
#[serde(rename_all = "snake_case")]
#[non_exhaustive]
pub enum ViolationKind {
    /// The frame sequence or its back-references are inconsistent.
    FrameSequence,
    /// A strike or spare bonus landed in the wrong frame.
    BonusPropagation,
    /// A frame's stored running total disagrees with the recomputed one.
    RunningTotal,
    /// The game state does not fit the recorded frames.
    StateMachine,
    /// Configuration constraint violated.
    Configuration,
    /// Internal logic error (should never happen).
    InternalError,
    /// Runtime invariant check failed.
    ///
    /// Only checked in debug builds or when the `paranoid` feature is enabled.
    Invariant,
}

impl ViolationKind {
    /// Returns a string representation suitable for logging/metrics labels.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::FrameSequence => "frame_sequence",
            Self::BonusPropagation => "bonus_propagation",
            Self::RunningTotal => "running_total",
            Self::StateMachine => "state_machine",
            Self::Configuration => "configuration",
            Self::InternalError => "internal_error",
            Self::Invariant => "invariant",
        }
    }
}

impl std::fmt::Display for ViolationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A recorded rule violation.
///
/// # Serialization
///
/// This type implements `serde::Serialize` for structured output. With the
/// `json` feature, [`to_json`](Self::to_json) renders it directly.
///
/// # Example
///
/// ```
/// use tenpin::telemetry::{RuleViolation, ViolationSeverity, ViolationKind};
/// use tenpin::FrameNumber;
///
/// let violation = RuleViolation::new(
///     ViolationSeverity::Error,
///     ViolationKind::RunningTotal,
///     "running total out of date",
///     "game.rs:42",
/// ).with_frame(FrameNumber::TENTH)
///  .with_context("expected", "122")
///  .with_context("actual", "113");
///
/// assert_eq!(violation.frame, Some(FrameNumber::TENTH));
/// assert_eq!(violation.context.len(), 2);
/// ```
#[derive(Debug, Clone, serde::Serialize)]
pub struct RuleViolation {
    /// The severity level of this violation.
    pub severity: ViolationSeverity,
    /// The category where the violation occurred.
    pub kind: ViolationKind,
    /// Human-readable description of what went wrong.
    pub message: String,
    /// Source location where the violation was detected (file:line).
    pub location: &'static str,
    /// The frame involved, if any.
    pub frame: Option<FrameNumber>,
    /// Additional structured context as key-value pairs.
    pub context: BTreeMap<String, String>,
}

impl RuleViolation {
    /// Creates a new rule violation.
    #[must_use]
    pub fn new(
        severity: ViolationSeverity,
        kind: ViolationKind,
        message: impl Into<String>,
        location: &'static str,
    ) -> Self {
        Self {
            severity,
            kind,
            message: message.into(),
            location,
            frame: None,
            context: BTreeMap::new(),
        }
    }

    /// Sets the frame involved in this violation.
    #[must_use]
    pub fn with_frame(mut self, frame: FrameNumber) -> Self {
        self.frame = Some(frame);
        self
    }

    /// Adds a context key-value pair.
    #[must_use]
    pub fn with_context(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.context.insert(key.into(), value.into());
        self
    }

    /// Serializes this violation to a JSON string.
    ///
    /// Returns `None` if serialization fails (which should not happen for
    /// well-formed violations).
    #[cfg(feature = "json")]
    #[must_use]
    pub fn to_json(&self) -> Option<String> {
        serde_json::to_string(self).ok()
    }

    /// Serializes this violation to a pretty-printed JSON string.
    #[cfg(feature = "json")]
    #[must_use]
    pub fn to_json_pretty(&self) -> Option<String> {
        serde_json::to_string_pretty(self).ok()
    }
}

impl std::fmt::Display for RuleViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[{}/{}] {} (at {}",
            self.severity, self.kind, self.message, self.location
        )?;
        if let Some(frame) = self.frame {
            write!(f, ", frame={frame}")?;
        }
        if !self.context.is_empty() {
            write!(f, ", context={:?}", self.context)?;
        }
        write!(f, ")")
    }
}

/// Trait for observing rule violations.
///
/// When the `sync-send` feature is enabled, observers must be `Send + Sync`.
///
/// # Example
///
/// ```
/// use tenpin::telemetry::{ViolationObserver, RuleViolation};
///
/// struct MetricsObserver;
///
/// impl ViolationObserver for MetricsObserver {
///     fn on_violation(&self, violation: &RuleViolation) {
///         // Increment a counter, send to monitoring system, etc.
///         let _ = violation.kind.as_str();
///     }
/// }
/// ```
#[cfg(feature = "sync-send")]
pub trait ViolationObserver: Send + Sync {
    /// Called when a rule violation is detected.
    fn on_violation(&self, violation: &RuleViolation);
}

#[cfg(not(feature = "sync-send"))]
/// Trait for observing rule violations.
///
/// Implement this trait to route violations to logging, metrics or tests.
pub trait ViolationObserver {
    /// Called when a rule violation is detected.
    fn on_violation(&self, violation: &RuleViolation);
}

/// Built-in observer that logs violations via the `tracing` crate.
///
/// - `Warning` severity → `tracing::warn!`
/// - `Error` and `Critical` severity → `tracing::error!`
///
/// All fields are emitted as structured tracing fields (`severity`, `kind`,
/// `location`, `frame`, `context`).
#[derive(Debug, Default, Clone)]
pub struct TracingObserver;

impl TracingObserver {
    /// Creates a new tracing observer.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    fn format_frame(frame: Option<FrameNumber>) -> String {
        frame.map_or_else(|| "null".to_owned(), |f| f.to_string())
    }
}

impl ViolationObserver for TracingObserver {
    fn on_violation(&self, violation: &RuleViolation) {
        let severity = violation.severity.as_str();
        let kind = violation.kind.as_str();
        let location = violation.location;
        let frame_str = Self::format_frame(violation.frame);

        let context_str = if violation.context.is_empty() {
            "{}".to_owned()
        } else {
            let pairs: Vec<String> = violation
                .context
                .iter()
                .map(|(k, v)| format!("{}={}", k, v))
                .collect();
            format!("{{{}}}", pairs.join(", "))
        };

        match violation.severity {
            ViolationSeverity::Warning => {
                tracing::warn!(
                    severity,
                    kind,
                    location,
                    frame = %frame_str,
                    context = %context_str,
                    "{}",
                    violation.message
                );
            },
            ViolationSeverity::Error | ViolationSeverity::Critical => {
                tracing::error!(
                    severity,
                    kind,
                    location,
                    frame = %frame_str,
                    context = %context_str,
                    "{}",
                    violation.message
                );
            },
        }
    }
}

/// Built-in observer that collects violations for testing.
///
/// # Example
///
/// ```
/// use tenpin::telemetry::{CollectingObserver, ViolationKind, ViolationObserver, RuleViolation, ViolationSeverity};
///
/// let observer = CollectingObserver::new();
/// observer.on_violation(&RuleViolation::new(
///     ViolationSeverity::Warning,
///     ViolationKind::BonusPropagation,
///     "test violation",
///     "test.rs:1",
/// ));
///
/// assert_eq!(observer.violations().len(), 1);
/// assert!(observer.has_violation(ViolationKind::BonusPropagation));
/// ```
#[derive(Debug, Default)]
pub struct CollectingObserver {
    violations: Mutex<Vec<RuleViolation>>,
}

impl CollectingObserver {
    /// Creates a new collecting observer with an empty violation list.
    #[must_use]
    pub fn new() -> Self {
        Self {
            violations: Mutex::new(Vec::new()),
        }
    }

    /// Returns a copy of all collected violations.
    #[must_use]
    pub fn violations(&self) -> Vec<RuleViolation> {
        self.violations.lock().clone()
    }

    /// Returns the number of collected violations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.violations.lock().len()
    }

    /// Returns true if no violations have been collected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.violations.lock().is_empty()
    }

    /// Checks if any violation of the specified kind has been collected.
    #[must_use]
    pub fn has_violation(&self, kind: ViolationKind) -> bool {
        self.violations.lock().iter().any(|v| v.kind == kind)
    }

    /// Returns all violations matching the specified kind.
    #[must_use]
    pub fn violations_of_kind(&self, kind: ViolationKind) -> Vec<RuleViolation> {
        self.violations
            .lock()
            .iter()
            .filter(|v| v.kind == kind)
            .cloned()
            .collect()
    }

    /// Clears all collected violations.
    pub fn clear(&self) {
        self.violations.lock().clear();
    }
}

impl ViolationObserver for CollectingObserver {
    fn on_violation(&self, violation: &RuleViolation) {
        self.violations.lock().push(violation.clone());
    }
}

/// A composite observer that forwards violations to multiple observers.
#[derive(Default)]
pub struct CompositeObserver {
    observers: Vec<Arc<dyn ViolationObserver>>,
}

impl CompositeObserver {
    /// Creates a new composite observer with no child observers.
    #[must_use]
    pub fn new() -> Self {
        Self {
            observers: Vec::new(),
        }
    }

    /// Adds an observer to the composite.
    pub fn add(&mut self, observer: Arc<dyn ViolationObserver>) {
        self.observers.push(observer);
    }

    /// Creates a composite observer from a list of observers.
    #[must_use]
    pub fn from_observers(observers: Vec<Arc<dyn ViolationObserver>>) -> Self {
        Self { observers }
    }
}

impl ViolationObserver for CompositeObserver {
    fn on_violation(&self, violation: &RuleViolation) {
        for observer in &self.observers {
            observer.on_violation(violation);
        }
    }
}

impl std::fmt::Debug for CompositeObserver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompositeObserver")
            .field("num_observers", &self.observers.len())
            .finish()
    }
}

/// Asserts that no violations have been collected.
///
/// # Panics
///
/// Panics if the observer contains any violations, printing them for debugging.
#[macro_export]
macro_rules! assert_no_violations {
    ($observer:expr) => {{
        let violations = $observer.violations();
        assert!(
            violations.is_empty(),
            "Expected no violations, but found {}:\n{:#?}",
            violations.len(),
            violations
        );
    }};

    ($observer:expr, $msg:expr) => {{
        let violations = $observer.violations();
        assert!(
            violations.is_empty(),
            "{}\nExpected no violations, but found {}:\n{:#?}",
            $msg,
            violations.len(),
            violations
        );
    }};
}

/// Asserts that a violation of the specified kind was collected.
///
/// # Panics
///
/// Panics if no violation of the specified kind was found.
#[macro_export]
macro_rules! assert_violation {
    ($observer:expr, $kind:expr) => {{
        assert!(
            $observer.has_violation($kind),
            "Expected violation of kind {:?}, but found: {:#?}",
            $kind,
            $observer.violations()
        );
    }};
}

/// Reports a violation to an optional observer, falling back to
/// [`TracingObserver`] if `None`.
///
/// ```
/// use tenpin::telemetry::{
///     report_to_observer, CollectingObserver, RuleViolation, ViolationKind, ViolationSeverity
/// };
/// use std::sync::Arc;
///
/// let observer = Arc::new(CollectingObserver::new());
/// let violation = RuleViolation::new(
///     ViolationSeverity::Warning,
///     ViolationKind::FrameSequence,
///     "test message",
///     "test.rs:1",
/// );
///
/// report_to_observer(Some(&observer), &violation);
/// assert_eq!(observer.len(), 1);
///
/// report_to_observer(None::<&Arc<CollectingObserver>>, &violation);
/// ```
pub fn report_to_observer<O: ViolationObserver + ?Sized>(
    observer: Option<&Arc<O>>,
    violation: &RuleViolation,
) {
    match observer {
        Some(obs) => obs.on_violation(violation),
        None => TracingObserver.on_violation(violation),
    }
}

/// Reports a violation through an optional observer, falling back to
/// [`TracingObserver`].
///
/// ```
/// use tenpin::{report_violation_to, telemetry::{ViolationSeverity, ViolationKind, CollectingObserver, ViolationObserver}};
/// use std::sync::Arc;
///
/// let observer: Option<Arc<dyn ViolationObserver>> = Some(Arc::new(CollectingObserver::new()));
///
/// report_violation_to!(&observer, ViolationSeverity::Warning, ViolationKind::StateMachine,
///     "unexpected state: {}", "game_over");
/// ```
#[macro_export]
macro_rules! report_violation_to {
    ($observer:expr, $severity:expr, $kind:expr, $msg:literal) => {{
        let violation = $crate::telemetry::RuleViolation::new(
            $severity,
            $kind,
            $msg,
            concat!(file!(), ":", line!()),
        );
        $crate::telemetry::report_to_observer($observer.as_ref(), &violation);
    }};

    ($observer:expr, $severity:expr, $kind:expr, $fmt:literal, $($arg:tt)+) => {{
        let violation = $crate::telemetry::RuleViolation::new(
            $severity,
            $kind,
            format!($fmt, $($arg)+),
            concat!(file!(), ":", line!()),
        );
        $crate::telemetry::report_to_observer($observer.as_ref(), &violation);
    }};
}

// ==========================================
// Runtime Invariant Checking
// ==========================================

/// Result of an invariant check.
#[derive(Debug, Clone, serde::Serialize)]
pub struct InvariantViolation {
    /// Name of the type whose invariant was violated.
    pub type_name: &'static str,
    /// Description of the violated invariant.
    pub invariant: String,
    /// Additional diagnostic context.
    pub details: Option<String>,
    /// The frame where the invariant broke, if it is tied to one.
    pub frame: Option<FrameNumber>,
    /// The category reported to observers, [`ViolationKind::Invariant`] unless
    /// set with [`with_kind`](Self::with_kind).
    pub kind: ViolationKind,
}

impl InvariantViolation {
    /// Creates a new invariant violation.
    #[must_use]
    pub fn new(type_name: &'static str, invariant: impl Into<String>) -> Self {
        Self {
            type_name,
            invariant: invariant.into(),
            details: None,
            frame: None,
            kind: ViolationKind::Invariant,
        }
    }

    /// Adds additional details to the violation.
    #[must_use]
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Ties the violation to a frame.
    #[must_use]
    pub fn with_frame(mut self, frame: FrameNumber) -> Self {
        self.frame = Some(frame);
        self
    }

    /// Files the violation under a more specific category.
    #[must_use]
    pub fn with_kind(mut self, kind: ViolationKind) -> Self {
        self.kind = kind;
        self
    }

    /// Turns the violation into a critical [`RuleViolation`] detected at
    /// `location`.
    #[must_use]
    pub fn to_rule_violation(&self, location: &'static str) -> RuleViolation {
        let report = RuleViolation::new(
            ViolationSeverity::Critical,
            self.kind,
            self.to_string(),
            location,
        )
        .with_context("type", self.type_name);
        match self.frame {
            Some(frame) => report.with_frame(frame),
            None => report,
        }
    }

    /// Serializes this violation to a JSON string.
    #[cfg(feature = "json")]
    #[must_use]
    pub fn to_json(&self) -> Option<String> {
        serde_json::to_string(self).ok()
    }

    /// Serializes this violation to a pretty-printed JSON string.
    #[cfg(feature = "json")]
    #[must_use]
    pub fn to_json_pretty(&self) -> Option<String> {
        serde_json::to_string_pretty(self).ok()
    }
}

impl std::fmt::Display for InvariantViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.type_name, self.invariant)?;
        if let Some(frame) = self.frame {
            write!(f, " [frame {}]", frame)?;
        }
        if let Some(details) = &self.details {
            write!(f, " ({})", details)?;
        }
        Ok(())
    }
}

/// Trait for types that maintain internal invariants.
///
/// # Example
///
/// ```
/// use tenpin::telemetry::{InvariantChecker, InvariantViolation};
///
/// struct Lane {
///     standing: u8,
/// }
///
/// impl InvariantChecker for Lane {
///     fn check_invariants(&self) -> Result<(), InvariantViolation> {
///         if self.standing > 10 {
///             return Err(InvariantViolation::new("Lane", "more than ten pins standing")
///                 .with_details(format!("standing={}", self.standing)));
///         }
///         Ok(())
///     }
/// }
/// ```
pub trait InvariantChecker {
    /// Checks that all invariants of this type are satisfied.
    ///
    /// Returns `Ok(())` if all invariants hold, or an `InvariantViolation`
    /// describing the first broken invariant.
    fn check_invariants(&self) -> Result<(), InvariantViolation>;
}

/// Checks invariants in debug builds (or with the `paranoid` feature) and
/// reports the first broken one to an optional observer, falling back to
/// [`TracingObserver`]. The report is [`ViolationSeverity::Critical`] and
/// keeps the [`InvariantViolation`]'s kind and frame.
///
/// ```
/// use std::sync::Arc;
/// use tenpin::debug_check_invariants;
/// use tenpin::telemetry::{CollectingObserver, InvariantChecker, InvariantViolation, ViolationObserver};
///
/// struct Lane;
///
/// impl InvariantChecker for Lane {
///     fn check_invariants(&self) -> Result<(), InvariantViolation> {
///         Err(InvariantViolation::new("Lane", "eleven pins standing"))
///     }
/// }
///
/// let collector = Arc::new(CollectingObserver::new());
/// let observer: Option<Arc<dyn ViolationObserver>> = Some(collector.clone());
/// debug_check_invariants!(observer, Lane);
/// # #[cfg(debug_assertions)]
/// assert_eq!(collector.len(), 1);
/// ```
#[macro_export]
#[cfg(any(debug_assertions, feature = "paranoid"))]
macro_rules! debug_check_invariants {
    ($observer:expr, $subject:expr) => {{
        use $crate::telemetry::InvariantChecker as _;
        if let Err(violation) = $subject.check_invariants() {
            $crate::telemetry::report_to_observer(
                $observer.as_ref(),
                &violation.to_rule_violation(concat!(file!(), ":", line!())),
            );
        }
    }};
}

/// No-op version for release builds without `paranoid` feature.
#[macro_export]
#[cfg(not(any(debug_assertions, feature = "paranoid")))]
macro_rules! debug_check_invariants {
    ($observer:expr, $subject:expr) => {{}};
}

#[cfg(test)]
#[allow(clippy::panic, clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn violation(kind: ViolationKind, severity: ViolationSeverity) -> RuleViolation {
        RuleViolation::new(severity, kind, "test message", "test.rs:1")
    }

    #[test]
    fn test_violation_severity_ordering() {
        assert!(ViolationSeverity::Warning < ViolationSeverity::Error);
        assert!(ViolationSeverity::Error < ViolationSeverity::Critical);
    }

    #[test]
    fn test_violation_kind_as_str() {
        assert_eq!(ViolationKind::FrameSequence.as_str(), "frame_sequence");
        assert_eq!(
            ViolationKind::BonusPropagation.as_str(),
            "bonus_propagation"
        );
        assert_eq!(ViolationKind::RunningTotal.as_str(), "running_total");
        assert_eq!(ViolationKind::StateMachine.as_str(), "state_machine");
        assert_eq!(ViolationKind::Configuration.as_str(), "configuration");
        assert_eq!(ViolationKind::InternalError.as_str(), "internal_error");
        assert_eq!(ViolationKind::Invariant.as_str(), "invariant");
    }

    #[test]
    fn test_rule_violation_builder() {
        let violation = violation(ViolationKind::RunningTotal, ViolationSeverity::Error)
            .with_frame(FrameNumber::FIRST)
            .with_context("expected", "10")
            .with_context("actual", "15");

        assert_eq!(violation.frame, Some(FrameNumber::FIRST));
        assert_eq!(violation.context.get("expected").unwrap(), "10");
        assert_eq!(violation.context.get("actual").unwrap(), "15");
    }

    #[test]
    fn test_rule_violation_display() {
        let text = violation(ViolationKind::StateMachine, ViolationSeverity::Critical)
            .with_frame(FrameNumber::TENTH)
            .to_string();
        assert!(text.starts_with("[critical/state_machine] test message (at test.rs:1"));
        assert!(text.contains("frame=10"));
    }

    #[test]
    fn test_collecting_observer_filters() {
        let observer = CollectingObserver::new();
        observer.on_violation(&violation(
            ViolationKind::FrameSequence,
            ViolationSeverity::Warning,
        ));
        observer.on_violation(&violation(
            ViolationKind::Invariant,
            ViolationSeverity::Critical,
        ));

        assert_eq!(observer.len(), 2);
        assert!(observer.has_violation(ViolationKind::Invariant));
        assert!(!observer.has_violation(ViolationKind::RunningTotal));
        assert_eq!(
            observer
                .violations_of_kind(ViolationKind::FrameSequence)
                .len(),
            1
        );

        observer.clear();
        assert!(observer.is_empty());
    }

    /// parking_lot::Mutex keeps the observer usable across threads.
    #[test]
    fn test_collecting_observer_concurrent_writes() {
        use std::thread;

        let observer = Arc::new(CollectingObserver::new());
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let observer = observer.clone();
                thread::spawn(move || {
                    for _ in 0..25 {
                        observer.on_violation(&violation(
                            ViolationKind::BonusPropagation,
                            ViolationSeverity::Warning,
                        ));
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().expect("Thread should not panic");
        }
        assert_eq!(observer.len(), 100);
    }

    #[test]
    fn test_composite_observer() {
        let first = Arc::new(CollectingObserver::new());
        let second = Arc::new(CollectingObserver::new());

        let mut composite = CompositeObserver::new();
        composite.add(first.clone());
        composite.add(second.clone());
        composite.on_violation(&violation(
            ViolationKind::Configuration,
            ViolationSeverity::Warning,
        ));

        assert_eq!(first.len(), 1);
        assert_eq!(second.len(), 1);
        assert!(format!("{:?}", composite).contains("num_observers: 2"));
    }

    #[test]
    fn test_report_violation_to_macro() {
        let collector = Arc::new(CollectingObserver::new());
        let observer: Option<Arc<dyn ViolationObserver>> = Some(collector.clone());

        report_violation_to!(
            &observer,
            ViolationSeverity::Error,
            ViolationKind::RunningTotal,
            "frame {} off by {}",
            3,
            2
        );

        let violations = collector.violations();
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].message, "frame 3 off by 2");
        assert!(violations[0].location.contains("telemetry.rs"));
    }

    #[test]
    fn test_report_violation_to_macro_with_none() {
        let observer: Option<Arc<dyn ViolationObserver>> = None;
        report_violation_to!(
            &observer,
            ViolationSeverity::Warning,
            ViolationKind::StateMachine,
            "falls back to tracing"
        );
    }

    #[test]
    fn test_assert_macros() {
        let observer = CollectingObserver::new();
        assert_no_violations!(observer);
        observer.on_violation(&violation(
            ViolationKind::Invariant,
            ViolationSeverity::Critical,
        ));
        assert_violation!(observer, ViolationKind::Invariant);
    }

    #[test]
    fn test_invariant_violation_display() {
        let plain = InvariantViolation::new("BowlingGame", "too many frames");
        assert_eq!(plain.to_string(), "BowlingGame: too many frames");

        let detailed = InvariantViolation::new("Frame", "strike flag disagrees")
            .with_frame(FrameNumber::FIRST)
            .with_details("first_roll=9");
        assert_eq!(
            detailed.to_string(),
            "Frame: strike flag disagrees [frame 1] (first_roll=9)"
        );
    }

    #[test]
    fn test_invariant_violation_to_rule_violation() {
        let report = InvariantViolation::new("BowlingGame", "stale running total")
            .with_kind(ViolationKind::RunningTotal)
            .with_frame(FrameNumber::TENTH)
            .to_rule_violation("game.rs:1");
        assert_eq!(report.severity, ViolationSeverity::Critical);
        assert_eq!(report.kind, ViolationKind::RunningTotal);
        assert_eq!(report.frame, Some(FrameNumber::TENTH));
        assert_eq!(report.context.get("type").unwrap(), "BowlingGame");
        assert_eq!(report.message, "BowlingGame: stale running total [frame 10]");

        let plain = InvariantViolation::new("Frame", "spare flag set without a spare");
        assert_eq!(plain.kind, ViolationKind::Invariant);
        assert_eq!(plain.to_rule_violation("frame.rs:1").frame, None);
    }

    struct Broken;

    impl InvariantChecker for Broken {
        fn check_invariants(&self) -> Result<(), InvariantViolation> {
            Err(InvariantViolation::new("Broken", "always broken")
                .with_kind(ViolationKind::BonusPropagation)
                .with_frame(FrameNumber::FIRST))
        }
    }

    struct Sound;

    impl InvariantChecker for Sound {
        fn check_invariants(&self) -> Result<(), InvariantViolation> {
            Ok(())
        }
    }

    #[test]
    #[cfg(any(debug_assertions, feature = "paranoid"))]
    fn test_debug_check_invariants_reports_to_observer() {
        let collector = Arc::new(CollectingObserver::new());
        let observer: Option<Arc<dyn ViolationObserver>> = Some(collector.clone());

        debug_check_invariants!(observer, Sound);
        assert!(collector.is_empty());

        debug_check_invariants!(observer, Broken);
        let violations = collector.violations();
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].kind, ViolationKind::BonusPropagation);
        assert_eq!(violations[0].severity, ViolationSeverity::Critical);
        assert_eq!(violations[0].frame, Some(FrameNumber::FIRST));
        assert!(violations[0].location.contains("telemetry.rs"));
    }

    #[test]
    fn test_debug_check_invariants_without_observer_does_not_panic() {
        let observer: Option<Arc<dyn ViolationObserver>> = None;
        debug_check_invariants!(observer, Broken);
    }

    #[test]
    fn test_violation_serializes_labels() {
        let value = serde_json::to_value(
            violation(ViolationKind::BonusPropagation, ViolationSeverity::Warning)
                .with_frame(FrameNumber::TENTH),
        )
        .unwrap();
        assert_eq!(value["severity"], "warning");
        assert_eq!(value["kind"], "bonus_propagation");
        assert_eq!(value["frame"], 10);
    }

    #[cfg(feature = "json")]
    #[test]
    fn test_to_json() {
        let json = violation(ViolationKind::Invariant, ViolationSeverity::Critical)
            .to_json()
            .unwrap();
        assert!(json.contains(r#""kind":"invariant""#));
        assert!(json.contains(r#""frame":null"#));
    }
}
