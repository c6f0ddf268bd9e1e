//! # Built-in reporters
//!
//! These are small, self-contained implementations useful for tests and demos.
//!
//! - [`Recorder`]: stores every call in memory.
//! - [`NullReporter`]: discards everything.
//! - [`LogReporter`]: prints calls in a human-readable form (demo/debug, `logging` feature).

#[cfg(feature = "logging")]
mod log;
mod recorder;

#[cfg(feature = "logging")]
pub use log::LogReporter;
pub use recorder::{Record, Recorder};

use async_trait::async_trait;

use crate::reporters::Reporter;
use crate::tasks::TestResult;

/// Reporter that ignores every call.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullReporter;

#[async_trait]
impl Reporter for NullReporter {
    async fn on_result(&self, _result: &TestResult) {}

    fn name(&self) -> &'static str {
        "null"
    }
}
