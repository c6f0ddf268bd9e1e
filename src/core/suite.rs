//! # Suite: declares tests, drains them, and fans results out to reporters.
//!
//! The [`Suite`] owns the declaration queue, a [`ReporterSet`], and the suite
//! [`Config`]. Declarations are synchronous; nothing runs until
//! [`Suite::drain_and_run`] is awaited.
//!
//! ## High-level architecture
//! ```text
//! Declarations:
//!   suite.test / info / skip / error ──► TaskQueue.push(Task)
//!   suite.group(desc, body)          ──► TaskQueue.reserve_group(desc)   (position fixed now)
//!                                    └─► TaskQueue.chain(body(GroupScope)) (runs later, in call order)
//!
//! drain_and_run():
//!   settle() ─► take_tasks() ─► [T0, GroupStart, M0, M1, GroupEnd, T1, ..]
//!
//!   outside a group:  Executor.execute(T) ──await──► report(result)
//!   GroupStart:       on_group_start(desc), open GroupBuffer
//!   inside a group:   Executor.start(M) ──► GroupBuffer (pending part spawned)
//!   GroupEnd:         GroupBuffer.close() ──► report(r0), report(r1), .. ──► on_group_end(aggregate)
//!
//!   after every task: on_progress(completed, total)
//!   at the end:       on_complete(verdict), cancel the per-drain root token
//! ```
//!
//! ## Rules
//! - Results are reported in declaration order, whatever order they settle in.
//! - Every Test/Skip produces exactly one verdict; draining never fails.
//! - The suite verdict only moves `pass → fail`.
//! - With [`Config::only_failed`], passing and skipped results are dropped
//!   before they reach the reporters; `info`, group brackets, progress and
//!   completion are always delivered.
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use testvisor::{reporters::Recorder, Config, Operand, Suite, Value, Verdict};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() {
//!     let recorder = Arc::new(Recorder::new());
//!     let suite = Suite::builder(Config::default())
//!         .with_reporter(recorder.clone())
//!         .build();
//!
//!     suite.test("adds", 1 + 1, 2);
//!     suite.test("throws", Operand::from_fn(|| Err(Value::error("Error", "x"))), "y");
//!     suite.group("flags", |g| {
//!         g.test("a", true, true);
//!         g.test("b", false, true);
//!     });
//!
//!     assert_eq!(suite.drain_and_run().await, Verdict::Fail);
//!     assert_eq!(recorder.descriptions(), ["adds", "throws", "a", "b"]);
//! }
//! ```

use std::future::Future;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use futures::FutureExt;
use tokio_util::sync::CancellationToken;

use crate::{
    core::{
        builder::SuiteBuilder,
        config::Config,
        executor::Executor,
        group::GroupBuffer,
        queue::{Members, TaskQueue},
    },
    error::Fault,
    reporters::{Reporter, ReporterSet},
    tasks::{Location, Operand, Task, TestOptions, TestResult, Verdict},
    value::Value,
};

/// Declares tests and runs them against a set of reporters.
pub struct Suite {
    cfg: Config,
    reporters: ReporterSet,
    queue: TaskQueue,
    failed: AtomicBool,
}

impl Suite {
    /// Creates a suite reporting to `reporters`.
    pub fn new(cfg: Config, reporters: Vec<Arc<dyn Reporter>>) -> Self {
        Self {
            cfg,
            reporters: ReporterSet::new(reporters),
            queue: TaskQueue::default(),
            failed: AtomicBool::new(false),
        }
    }

    /// Starts a [`SuiteBuilder`].
    pub fn builder(cfg: Config) -> SuiteBuilder {
        SuiteBuilder::new(cfg)
    }

    /// Suite configuration.
    pub fn config(&self) -> &Config {
        &self.cfg
    }

    /// Declares a test comparing `operand` with `expected`.
    #[track_caller]
    pub fn test(
        &self,
        description: impl Into<String>,
        operand: impl Into<Operand>,
        expected: impl Into<Value>,
    ) {
        let options = TestOptions::default().with_location(Location::caller());
        self.queue.push(Task::test(
            description.into(),
            operand.into(),
            expected.into(),
            options,
        ));
    }

    /// Declares a test with per-test options.
    ///
    /// The declaration site is used unless `options.location` is already set.
    #[track_caller]
    pub fn test_with(
        &self,
        description: impl Into<String>,
        operand: impl Into<Operand>,
        expected: impl Into<Value>,
        mut options: TestOptions,
    ) {
        let here = Location::caller();
        options.location.get_or_insert(here);
        self.queue.push(Task::test(
            description.into(),
            operand.into(),
            expected.into(),
            options,
        ));
    }

    /// Declares an informational message.
    #[track_caller]
    pub fn info(&self, message: impl Into<String>) {
        self.queue.push(Task::info(message.into(), Location::caller()));
    }

    /// Declares a test that is reported as `skip` without running.
    #[track_caller]
    pub fn skip(
        &self,
        description: impl Into<String>,
        operand: impl Into<Operand>,
        expected: impl Into<Value>,
    ) {
        self.queue.push(Task::skip(
            description.into(),
            operand.into(),
            expected.into(),
            Location::caller(),
        ));
    }

    /// Routes a definition-time fault in as an `error` result.
    #[track_caller]
    pub fn error(&self, description: impl Into<String>, thrown: impl Into<Value>) {
        self.queue.push(Task::error(
            description.into(),
            thrown.into(),
            Location::caller(),
        ));
    }

    /// Declares a group with a synchronous body.
    ///
    /// The group's position is fixed now; the body runs while draining, after
    /// every body chained before it. A panicking body becomes an `error`
    /// result inside the group.
    #[track_caller]
    pub fn group<F>(&self, description: impl Into<String>, body: F)
    where
        F: FnOnce(&GroupScope) + Send + 'static,
    {
        let description = description.into();
        let at = Location::caller();
        let members = self.queue.reserve_group(description.clone());
        let scope = GroupScope::new(&description, members);

        self.queue.chain(
            async move {
                if let Err(payload) = catch_unwind(AssertUnwindSafe(|| body(&scope))) {
                    scope.body_panicked(&description, payload, at);
                }
            }
            .boxed(),
        );
    }

    /// Declares a group with an asynchronous body.
    ///
    /// Same ordering as [`group`](Self::group): bodies run one after another in
    /// call order, so a slow body never lets a later group overtake it.
    #[track_caller]
    pub fn group_async<F, Fut>(&self, description: impl Into<String>, body: F)
    where
        F: FnOnce(GroupScope) -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let description = description.into();
        let at = Location::caller();
        let members = self.queue.reserve_group(description.clone());
        let scope = GroupScope::new(&description, members);

        self.queue.chain(
            async move {
                let handle = scope.clone();
                let outcome = match catch_unwind(AssertUnwindSafe(|| body(handle))) {
                    Ok(fut) => AssertUnwindSafe(fut).catch_unwind().await,
                    Err(payload) => Err(payload),
                };
                if let Err(payload) = outcome {
                    scope.body_panicked(&description, payload, at);
                }
            }
            .boxed(),
        );
    }

    /// Number of declared entries not yet drained (a group counts once).
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Runs every declared task and reports the results.
    ///
    /// Returns the suite verdict after this drain.
    pub async fn drain_and_run(&self) -> Verdict {
        self.queue.settle().await;
        let tasks = self.queue.take_tasks();
        let total = tasks.len();

        let root = CancellationToken::new();
        let executor = Executor::new(self.cfg.clone(), root.clone());
        let mut open: Option<GroupBuffer> = None;

        if total == 0 {
            self.reporters.on_progress(0, 0).await;
        }

        for (index, task) in tasks.into_iter().enumerate() {
            tracing::debug!(index, total, kind = task.as_label(), "draining task");
            match task {
                Task::GroupStart { description } => {
                    self.reporters.on_group_start(&description).await;
                    open = Some(GroupBuffer::default());
                }
                Task::GroupEnd => {
                    if let Some(group) = open.take() {
                        tracing::debug!(members = group.len(), "closing group");
                        let closed = group.close().await;
                        for result in &closed.results {
                            self.report(result).await;
                        }
                        self.reporters.on_group_end(closed.verdict).await;
                    }
                }
                Task::Test(spec) => match open.as_mut() {
                    Some(group) => group.start(&executor, spec),
                    None => {
                        let result = executor.execute(spec).await;
                        self.report(&result).await;
                    }
                },
                Task::Info { message, location } => {
                    let result = TestResult::info(message, location);
                    match open.as_mut() {
                        Some(group) => group.push_ready(result),
                        None => self.report(&result).await,
                    }
                }
            }
            self.reporters.on_progress(index + 1, total).await;
        }

        let verdict = self.verdict();
        self.reporters.on_complete(verdict).await;
        root.cancel();
        verdict
    }

    /// Current suite verdict: `fail` once any result failed or errored.
    pub fn verdict(&self) -> Verdict {
        if self.failed.load(Ordering::Acquire) {
            Verdict::Fail
        } else {
            Verdict::Pass
        }
    }

    async fn report(&self, result: &TestResult) {
        tracing::debug!(
            test = %result.description,
            verdict = result.verdict.as_label(),
            elapsed = ?result.elapsed,
            "result"
        );
        if result.verdict.is_failure() {
            self.failed.store(true, Ordering::Release);
        }
        if self.cfg.should_report(result.verdict) {
            self.reporters.on_result(result).await;
        }
    }
}

/// Declaration handle passed to a group body.
///
/// Offers the same declarations as [`Suite`] except `group`: groups do not
/// nest. Once the group has been drained the scope is closed, and
/// declarations made through it (for example from a task the body spawned)
/// are dropped with a warning.
#[derive(Clone)]
pub struct GroupScope {
    group: Arc<str>,
    members: Members,
}

impl GroupScope {
    fn new(group: &str, members: Members) -> Self {
        Self {
            group: Arc::from(group),
            members,
        }
    }

    /// True once the group has been drained; further declarations are ignored.
    pub fn is_closed(&self) -> bool {
        self.members.lock().is_closed()
    }

    fn push(&self, task: Task) {
        let mut members = self.members.lock();
        if members.is_closed() {
            tracing::warn!(
                group = %self.group,
                task = task.as_label(),
                "declaration after the group was drained is ignored"
            );
            return;
        }
        members.push(task);
    }

    fn body_panicked(&self, group: &str, payload: Box<dyn std::any::Any + Send>, at: Location) {
        let fault = Fault::from_panic(payload);
        tracing::debug!(group, error = %fault, "group body panicked");
        self.push(Task::error(
            format!("{group}: body panicked"),
            fault.to_value(),
            at,
        ));
    }

    /// See [`Suite::test`].
    #[track_caller]
    pub fn test(
        &self,
        description: impl Into<String>,
        operand: impl Into<Operand>,
        expected: impl Into<Value>,
    ) {
        let options = TestOptions::default().with_location(Location::caller());
        self.push(Task::test(
            description.into(),
            operand.into(),
            expected.into(),
            options,
        ));
    }

    /// See [`Suite::test_with`].
    #[track_caller]
    pub fn test_with(
        &self,
        description: impl Into<String>,
        operand: impl Into<Operand>,
        expected: impl Into<Value>,
        mut options: TestOptions,
    ) {
        let here = Location::caller();
        options.location.get_or_insert(here);
        self.push(Task::test(
            description.into(),
            operand.into(),
            expected.into(),
            options,
        ));
    }

    /// See [`Suite::info`].
    #[track_caller]
    pub fn info(&self, message: impl Into<String>) {
        self.push(Task::info(message.into(), Location::caller()));
    }

    /// See [`Suite::skip`].
    #[track_caller]
    pub fn skip(
        &self,
        description: impl Into<String>,
        operand: impl Into<Operand>,
        expected: impl Into<Value>,
    ) {
        self.push(Task::skip(
            description.into(),
            operand.into(),
            expected.into(),
            Location::caller(),
        ));
    }

    /// See [`Suite::error`].
    #[track_caller]
    pub fn error(&self, description: impl Into<String>, thrown: impl Into<Value>) {
        self.push(Task::error(
            description.into(),
            thrown.into(),
            Location::caller(),
        ));
    }
}

/// Resolves after `duration`; a delay primitive for asynchronous test bodies.
///
/// # Example
/// ```rust
/// use std::time::Duration;
/// use testvisor::{wait, Operand, Value};
///
/// let op = Operand::from_async(|_ctx| async {
///     wait(Duration::from_millis(5)).await;
///     Ok(Value::from(2))
/// });
/// # let _ = op;
/// ```
pub async fn wait(duration: Duration) {
    tokio::time::sleep(duration).await;
}
