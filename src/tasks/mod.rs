//! # Task model.
//!
//! This module provides the declaration-side data types:
//! - [`Task`] - one queued unit (test, info, group bracket)
//! - [`Operand`] - what a test evaluates (value, future or producer)
//! - [`TestOptions`] - per-test timeout and location overrides
//! - [`TestResult`], [`Verdict`], [`Actual`] - what the executor produces

mod operand;
mod result;
mod task;

pub use operand::Operand;
pub use result::{Actual, Location, TestResult, Verdict};
pub use task::{Predetermined, Task, TestOptions, TestSpec};
