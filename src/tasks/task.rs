//! # Queued units of declared work.

use std::time::Duration;

use crate::tasks::operand::Operand;
use crate::tasks::result::{Location, Verdict};
use crate::value::Value;

/// Per-test overrides.
///
/// ## Example
/// ```rust
/// use std::time::Duration;
/// use testvisor::TestOptions;
///
/// let opts = TestOptions::default().with_timeout(Duration::from_millis(50));
/// assert_eq!(opts.timeout, Some(Duration::from_millis(50)));
/// ```
#[derive(Debug, Clone, Default)]
pub struct TestOptions {
    /// Overrides [`Config::timeout`](crate::Config::timeout) for this test.
    pub timeout: Option<Duration>,
    /// Overrides the captured declaration site.
    pub location: Option<Location>,
}

impl TestOptions {
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_location(mut self, location: Location) -> Self {
        self.location = Some(location);
        self
    }
}

/// A verdict fixed at declaration time; no user code runs for such a task.
#[derive(Debug, Clone)]
pub enum Predetermined {
    /// Report `skip` with a "not executed" actual.
    Skip,
    /// Report `error` carrying the thrown value.
    Error(Value),
}

/// Payload of a Test or Skip task.
#[derive(Debug)]
pub struct TestSpec {
    pub(crate) description: String,
    pub(crate) operand: Operand,
    pub(crate) expected: Value,
    pub(crate) location: Option<Location>,
    pub(crate) timeout: Option<Duration>,
    pub(crate) predetermined: Option<Predetermined>,
}

impl TestSpec {
    pub(crate) fn new(
        description: String,
        operand: Operand,
        expected: Value,
        options: TestOptions,
    ) -> Self {
        Self {
            description,
            operand,
            expected,
            location: options.location,
            timeout: options.timeout,
            predetermined: None,
        }
    }

    pub(crate) fn predetermined(mut self, verdict: Predetermined) -> Self {
        self.predetermined = Some(verdict);
        self
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn location(&self) -> Option<Location> {
        self.location
    }

    /// The verdict that will be reported without running anything, if any.
    pub fn predetermined_verdict(&self) -> Option<Verdict> {
        self.predetermined.as_ref().map(|p| match p {
            Predetermined::Skip => Verdict::Skip,
            Predetermined::Error(_) => Verdict::Error,
        })
    }
}

/// A queued unit of declared work.
///
/// Created by a declaration call, consumed exactly once while draining.
#[derive(Debug)]
pub enum Task {
    /// A test to execute (or a skip / injected error carrying a predetermined verdict).
    Test(TestSpec),
    /// Informational message.
    Info {
        message: String,
        location: Option<Location>,
    },
    /// Opens a group region.
    GroupStart { description: String },
    /// Closes the open group region.
    GroupEnd,
}

impl Task {
    pub(crate) fn test(
        description: String,
        operand: Operand,
        expected: Value,
        options: TestOptions,
    ) -> Self {
        Task::Test(TestSpec::new(description, operand, expected, options))
    }

    pub(crate) fn skip(
        description: String,
        operand: Operand,
        expected: Value,
        location: Location,
    ) -> Self {
        let options = TestOptions::default().with_location(location);
        let spec = TestSpec::new(description, operand, expected, options);
        Task::Test(spec.predetermined(Predetermined::Skip))
    }

    /// A definition-time fault routed in as an `error` verdict.
    pub(crate) fn error(description: String, thrown: Value, location: Location) -> Self {
        let options = TestOptions::default().with_location(location);
        let operand = Operand::Immediate(Value::Undefined);
        let spec = TestSpec::new(description, operand, Value::Undefined, options);
        Task::Test(spec.predetermined(Predetermined::Error(thrown)))
    }

    pub(crate) fn info(message: String, location: Location) -> Self {
        Task::Info {
            message,
            location: Some(location),
        }
    }

    /// Short label for logs.
    pub fn as_label(&self) -> &'static str {
        match self {
            Task::Test(spec) => match spec.predetermined_verdict() {
                Some(Verdict::Skip) => "skip",
                Some(_) => "error",
                None => "test",
            },
            Task::Info { .. } => "info",
            Task::GroupStart { .. } => "group_start",
            Task::GroupEnd => "group_end",
        }
    }
}
