//! # LogReporter: simple result printer
//!
//! A minimal reporter that prints every call to stdout.
//! Use it for test or demo.
//!
//! ## Example output
//! ```text
//! [pass] "adds" elapsed=0ns
//! [group] "io"
//! [fail] "reads config" actual={ port: 80 } expected={ port: 8080 } at tests/io.rs:12:5
//! [error] "connects" thrown TimeoutError: timed out after 50ms
//! [group-end] verdict=fail
//! [skip] "later"
//! [info] "flaky tests disabled"
//! [progress] 6/6
//! [complete] verdict=fail
//! ```

use async_trait::async_trait;

use crate::reporters::Reporter;
use crate::tasks::{TestResult, Verdict};

/// Result printer reporter.
#[derive(Default)]
pub struct LogReporter {
    quiet_progress: bool,
}

impl LogReporter {
    /// Construct a new [`LogReporter`].
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Do not print `[progress]` lines.
    #[must_use]
    pub fn without_progress(mut self) -> Self {
        self.quiet_progress = true;
        self
    }
}

#[async_trait]
impl Reporter for LogReporter {
    async fn on_result(&self, r: &TestResult) {
        let at = r
            .location
            .map(|loc| format!(" at {loc}"))
            .unwrap_or_default();
        match r.verdict {
            Verdict::Pass => {
                println!("[pass] {:?} elapsed={:?}", r.description, r.elapsed);
            }
            Verdict::Fail => {
                let expected = r.expected.clone().unwrap_or_default();
                println!(
                    "[fail] {:?} actual={} expected={:?}{at}",
                    r.description, r.actual, expected
                );
            }
            Verdict::Error => {
                println!("[error] {:?} {}{at}", r.description, r.actual);
            }
            Verdict::Skip => {
                println!("[skip] {:?}", r.description);
            }
            Verdict::Info => {
                println!("[info] {:?}", r.description);
            }
        }
    }

    async fn on_group_start(&self, description: &str) {
        println!("[group] {description:?}");
    }

    async fn on_group_end(&self, verdict: Verdict) {
        println!("[group-end] verdict={verdict}");
    }

    async fn on_progress(&self, completed: usize, total: usize) {
        if !self.quiet_progress {
            println!("[progress] {completed}/{total}");
        }
    }

    async fn on_complete(&self, verdict: Verdict) {
        println!("[complete] verdict={verdict}");
    }

    fn name(&self) -> &'static str {
        "log"
    }
}
