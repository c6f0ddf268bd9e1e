//! # testvisor
//!
//! **Testvisor** is an in-process test orchestration engine for Rust.
//!
//! It queues declared tests, runs them sequentially or as concurrent groups,
//! races every asynchronous result against a timeout, judges values with a
//! cycle-safe deep equality, and hands ordered results to pluggable reporters.
//! Method spies let tests observe and replace calls on shared objects.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!   suite.test(..)   suite.info(..)   suite.skip(..)   suite.group(.., body)
//!          │                │                │                  │
//!          ▼                ▼                ▼                  ▼
//! ┌───────────────────────────────────────────────────────────────────┐
//! │  TaskQueue (declaration order)                                    │
//! │  - slots: Task | Group { members }   (group position fixed at call)│
//! │  - tail:  chained group bodies       (run one after another)      │
//! └─────────────────────────────────┬─────────────────────────────────┘
//!                                   ▼  drain_and_run()
//! ┌───────────────────────────────────────────────────────────────────┐
//! │  Suite scheduler                                                  │
//! │  - outside groups: execute + await, one at a time                 │
//! │  - inside groups:  start now, spawn pending part, buffer          │
//! │  - GroupEnd:       join buffer, report in declaration order       │
//! └──────┬──────────────────────────────────────────────────┬─────────┘
//!        ▼                                                  ▼
//! ┌──────────────────────────────┐             ┌──────────────────────────┐
//! │  Executor                    │             │  ReporterSet             │
//! │  - predetermined skip/error  │  results ─► │  (registration order,    │
//! │  - timeout race              │             │   panics isolated)       │
//! │  - deep_equal(actual, exp)   │             └──┬──────────┬─────────┬──┘
//! └──────────────────────────────┘                ▼          ▼         ▼
//!                                              Recorder  LogReporter  Custom
//! ```
//!
//! ### Lifecycle of one test
//! ```text
//! declare ──► Task::Test(TestSpec) ──► Executor::start (sync)
//!                                          ├─ predetermined ─► skip / error
//!                                          ├─ Ready(settled) ─► judge
//!                                          └─ Pending(fut)   ─► Execution::finish (async)
//!                                                                 ├─ Ok(v)   ─► deep_equal ? pass : fail
//!                                                                 ├─ Err(e)  ─► error
//!                                                                 ├─ panic   ─► error (Panic)
//!                                                                 └─ elapsed ─► error (TimeoutError), cancel token
//! ```
//!
//! ## Features
//! | Area              | Description                                                          | Key types / traits                      |
//! |-------------------|----------------------------------------------------------------------|-----------------------------------------|
//! | **Suite**         | Declare tests, groups and messages; drain them in order.             | [`Suite`], [`GroupScope`], [`Operand`]  |
//! | **Reporters**     | Receive ordered results, group brackets, progress and completion.    | [`Reporter`], [`ReporterSet`]           |
//! | **Equality**      | Deep structural comparison that terminates on cyclic graphs.         | [`deep_equal`], [`Value`]               |
//! | **Spies**         | Record and override calls to an object's method, then restore it.   | [`intercept`], [`Spy`]                  |
//! | **Errors**        | Setup errors for callers, faults absorbed into `error` results.      | [`SetupError`], [`Fault`]               |
//! | **Configuration** | Default timeout and result filtering.                                | [`Config`], [`TestOptions`]             |
//!
//! ## Optional features
//! - `logging`: exports a simple built-in [`LogReporter`] _(demo/reference only)_.
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use std::time::Duration;
//! use testvisor::{reporters::Recorder, wait, Config, Operand, Suite, TestOptions, Value, Verdict};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() {
//!     let recorder = Arc::new(Recorder::new());
//!     let suite = Suite::builder(Config::default())
//!         .with_reporter(recorder.clone())
//!         .build();
//!
//!     suite.test("eq", 1 + 1, 2);
//!     suite.test_with(
//!         "slow",
//!         Operand::from_async(|_ctx| async {
//!             wait(Duration::from_millis(10)).await;
//!             Ok(Value::from("done"))
//!         }),
//!         "done",
//!         TestOptions::default().with_timeout(Duration::from_secs(1)),
//!     );
//!     suite.info("sequential part finished");
//!
//!     assert_eq!(suite.drain_and_run().await, Verdict::Pass);
//!     assert_eq!(recorder.progress().last(), Some(&(3, 3)));
//! }
//! ```
mod core;
mod equality;
mod error;
pub mod reporters;
mod spy;
mod tasks;
mod value;

// ---- Public re-exports ----

pub use core::{wait, Config, GroupScope, Suite, SuiteBuilder};
pub use equality::deep_equal;
pub use error::{Fault, SetupError};
pub use reporters::{Reporter, ReporterSet};
pub use spy::{intercept, Spy};
pub use tasks::{Actual, Location, Operand, TestOptions, TestResult, Verdict};
pub use value::{Composite, Function, Kind, Object, Outcome, Settled, Value};

// Optional: expose a simple built-in logging reporter (demo/reference).
// Enable with: `--features logging`
#[cfg(feature = "logging")]
pub use reporters::LogReporter;
