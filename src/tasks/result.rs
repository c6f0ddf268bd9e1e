//! # Verdicts and results.

use std::fmt;
use std::time::Duration;

use crate::value::Value;

/// Outcome classification of a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Verdict {
    /// Resolved and deep-equal to the expected value.
    Pass,
    /// Resolved but not equal to the expected value.
    Fail,
    /// Threw, rejected, timed out, or carried a definition-time error.
    Error,
    /// Declared but intentionally not executed.
    Skip,
    /// Informational message; never fails.
    Info,
}

impl Verdict {
    /// True for `Fail` and `Error`.
    #[inline]
    pub fn is_failure(&self) -> bool {
        matches!(self, Verdict::Fail | Verdict::Error)
    }

    /// Returns a short stable label for use in logs.
    pub fn as_label(&self) -> &'static str {
        match self {
            Verdict::Pass => "pass",
            Verdict::Fail => "fail",
            Verdict::Error => "error",
            Verdict::Skip => "skip",
            Verdict::Info => "info",
        }
    }

    /// Folds `other` into an aggregate: once failed, always failed.
    #[inline]
    pub fn merge(self, other: Verdict) -> Verdict {
        if self.is_failure() || other.is_failure() {
            Verdict::Fail
        } else {
            Verdict::Pass
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_label())
    }
}

/// What a test actually produced.
#[derive(Debug, Clone)]
pub enum Actual {
    /// The resolved value.
    Value(Value),
    /// The thrown or rejected value (timeouts and panics included).
    Thrown(Value),
    /// Sentinel for skipped tests.
    NotExecuted,
    /// Nothing to report (info messages).
    Absent,
}

impl Actual {
    /// The resolved or thrown value, if any.
    pub fn value(&self) -> Option<&Value> {
        match self {
            Actual::Value(v) | Actual::Thrown(v) => Some(v),
            Actual::NotExecuted | Actual::Absent => None,
        }
    }
}

impl fmt::Display for Actual {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Actual::Value(v) => write!(f, "{v:?}"),
            Actual::Thrown(v) => write!(f, "thrown {v}"),
            Actual::NotExecuted => f.write_str("<not executed>"),
            Actual::Absent => f.write_str("<none>"),
        }
    }
}

/// Source position of a declaration, captured with `#[track_caller]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Location {
    pub file: &'static str,
    pub line: u32,
    pub column: u32,
}

impl Location {
    #[track_caller]
    pub fn caller() -> Self {
        std::panic::Location::caller().into()
    }
}

impl From<&'static std::panic::Location<'static>> for Location {
    fn from(loc: &'static std::panic::Location<'static>) -> Self {
        Self {
            file: loc.file(),
            line: loc.line(),
            column: loc.column(),
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.file, self.line, self.column)
    }
}

/// Result of one Test, Skip or Info task.
///
/// Owned by the scheduler until handed to the reporters; nothing keeps it afterwards.
#[derive(Debug, Clone)]
pub struct TestResult {
    pub description: String,
    pub verdict: Verdict,
    pub actual: Actual,
    /// `None` for info messages.
    pub expected: Option<Value>,
    pub location: Option<Location>,
    /// Wall time from invocation to settlement (zero when nothing ran).
    pub elapsed: Duration,
}

impl TestResult {
    pub(crate) fn info(message: String, location: Option<Location>) -> Self {
        Self {
            description: message,
            verdict: Verdict::Info,
            actual: Actual::Absent,
            expected: None,
            location,
            elapsed: Duration::ZERO,
        }
    }
}
