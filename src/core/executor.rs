//! # Run a single test to a verdict.
//!
//! Execution is split in two phases so the scheduler can start grouped tests
//! without awaiting them:
//!
//! - [`Executor::start`] is **synchronous**: it short-circuits predetermined
//!   verdicts and invokes the producer up to the point where it returns a value
//!   or a pending future.
//! - [`Execution::finish`] is **asynchronous**: it races the pending future
//!   against the timeout and compares the settled value with `expected`.
//!
//! ## Flow
//! ```text
//! start(spec):
//!   predetermined Skip        ──► Done(skip,  NotExecuted)
//!   predetermined Error(v)    ──► Done(error, Thrown(v))
//!   Immediate(v)              ──► Done(judge(Ok(v)))
//!   Deferred(p) ─ p(child) ─┬─ Ready(settled) ──► Done(judge(settled))
//!                           ├─ Pending(fut)   ──► Racing(fut)
//!                           └─ panic          ──► Done(error, Thrown(Panic))
//!   Pending(fut)              ──► Racing(fut)
//!
//! finish():
//!   Racing(fut) ── timeout(dur, catch_unwind(fut)) ─┬─ Ok(v)   ──► deep_equal ? pass : fail
//!                                                   ├─ Err(e)  ──► error, Thrown(e)
//!                                                   ├─ panic   ──► error, Thrown(Panic)
//!                                                   └─ elapsed ──► cancel child, error, Thrown(TimeoutError)
//! ```
//!
//! ## Rules
//! - Produces **exactly one** of pass/fail/error (or the predetermined verdict).
//! - A timed-out future is dropped and its child token cancelled; work it
//!   spawned elsewhere keeps running unless it observes the token.
//! - Never hangs: every pending future is bounded by a timeout.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::time::{Duration, Instant};

use futures::future::BoxFuture;
use futures::FutureExt;
use tokio::time;
use tokio_util::sync::CancellationToken;

use crate::{
    core::config::Config,
    equality::deep_equal,
    error::Fault,
    tasks::{Actual, Location, Operand, Predetermined, TestResult, TestSpec, Verdict},
    value::{Outcome, Settled, Value},
};

/// Turns [`TestSpec`]s into [`TestResult`]s.
#[derive(Clone)]
pub(crate) struct Executor {
    cfg: Config,
    root: CancellationToken,
}

/// What a result needs besides the settled value.
pub(crate) struct Header {
    description: String,
    expected: Value,
    location: Option<Location>,
}

/// A test between its synchronous and asynchronous phases.
pub(crate) enum Execution {
    /// Settled without awaiting anything.
    Done(TestResult),
    /// Waiting on a pending future.
    Racing {
        header: Header,
        fut: BoxFuture<'static, Settled>,
        timeout: Duration,
        child: CancellationToken,
        started: Instant,
    },
}

impl Executor {
    pub(crate) fn new(cfg: Config, root: CancellationToken) -> Self {
        Self { cfg, root }
    }

    /// Runs `spec` to completion.
    pub(crate) async fn execute(&self, spec: TestSpec) -> TestResult {
        self.start(spec).finish().await
    }

    /// Synchronous phase: resolves the operand into a settled value or a pending future.
    pub(crate) fn start(&self, spec: TestSpec) -> Execution {
        let timeout = self.cfg.timeout_for(spec.timeout);
        let header = Header {
            description: spec.description,
            expected: spec.expected,
            location: spec.location,
        };

        match spec.predetermined {
            Some(Predetermined::Skip) => {
                return Execution::Done(header.into_result(
                    Verdict::Skip,
                    Actual::NotExecuted,
                    Duration::ZERO,
                ));
            }
            Some(Predetermined::Error(thrown)) => {
                return Execution::Done(header.into_result(
                    Verdict::Error,
                    Actual::Thrown(thrown),
                    Duration::ZERO,
                ));
            }
            None => {}
        }

        let started = Instant::now();
        let child = self.root.child_token();
        let fut = match spec.operand {
            Operand::Immediate(v) => return Execution::Done(header.judge(Ok(v), started)),
            Operand::Pending(fut) => fut,
            Operand::Deferred(producer) => {
                let token = child.clone();
                match catch_unwind(AssertUnwindSafe(move || producer(token))) {
                    Ok(Outcome::Ready(settled)) => {
                        return Execution::Done(header.judge(settled, started));
                    }
                    Ok(Outcome::Pending(fut)) => fut,
                    Err(payload) => {
                        let thrown = Fault::from_panic(payload).to_value();
                        return Execution::Done(header.judge(Err(thrown), started));
                    }
                }
            }
        };

        Execution::Racing {
            header,
            fut,
            timeout,
            child,
            started,
        }
    }
}

impl Execution {
    /// Asynchronous phase: races the pending future against its timeout.
    pub(crate) async fn finish(self) -> TestResult {
        let (header, fut, timeout, child, started) = match self {
            Execution::Done(result) => return result,
            Execution::Racing {
                header,
                fut,
                timeout,
                child,
                started,
            } => (header, fut, timeout, child, started),
        };

        let guarded = AssertUnwindSafe(fut).catch_unwind();
        let settled = match time::timeout(timeout, guarded).await {
            Ok(Ok(settled)) => settled,
            Ok(Err(payload)) => Err(Fault::from_panic(payload).to_value()),
            Err(_elapsed) => {
                child.cancel();
                tracing::debug!(test = %header.description, ?timeout, "test timed out");
                Err(Fault::Timeout { timeout }.to_value())
            }
        };
        header.judge(settled, started)
    }
}

impl Header {
    fn judge(self, settled: Settled, started: Instant) -> TestResult {
        let elapsed = started.elapsed();
        let (verdict, actual) = match settled {
            Ok(v) if deep_equal(&v, &self.expected) => (Verdict::Pass, Actual::Value(v)),
            Ok(v) => (Verdict::Fail, Actual::Value(v)),
            Err(thrown) => (Verdict::Error, Actual::Thrown(thrown)),
        };
        self.into_result(verdict, actual, elapsed)
    }

    fn into_result(self, verdict: Verdict, actual: Actual, elapsed: Duration) -> TestResult {
        TestResult {
            description: self.description,
            verdict,
            actual,
            expected: Some(self.expected),
            location: self.location,
            elapsed,
        }
    }
}
