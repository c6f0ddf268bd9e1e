//! # Example: custom_reporter
//!
//! Demonstrates how to build and attach a custom reporter.
//!
//! Shows how to:
//! - Implement the [`Reporter`] trait.
//! - Track group brackets and progress alongside results.
//! - Filter results with [`Config::only_failed`].
//!
//! ## Flow
//! ```text
//! Suite::drain_and_run()
//!     ├─► ReporterSet.on_group_start ──► Tally.on_group_start()
//!     ├─► ReporterSet.on_result      ──► Tally.on_result()     (failures only)
//!     ├─► ReporterSet.on_group_end   ──► Tally.on_group_end()
//!     ├─► ReporterSet.on_progress    ──► Tally.on_progress()
//!     └─► ReporterSet.on_complete    ──► Tally.on_complete()
//! ```
//!
//! ## Run
//! ```bash
//! cargo run --example custom_reporter
//! ```

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use testvisor::{Config, Operand, Reporter, Suite, TestResult, Value, Verdict};

/// Counts failures and prints them with their declaration site.
#[derive(Default)]
struct Tally {
    failures: AtomicUsize,
}

#[async_trait::async_trait]
impl Reporter for Tally {
    async fn on_result(&self, r: &TestResult) {
        if r.verdict.is_failure() {
            self.failures.fetch_add(1, Ordering::Relaxed);
        }
        let at = r.location.map(|l| l.to_string()).unwrap_or_default();
        println!("[tally] {:<5} {:<24} actual={} {at}", r.verdict, r.description, r.actual);
    }

    async fn on_group_start(&self, description: &str) {
        println!("[tally] >> {description}");
    }

    async fn on_group_end(&self, verdict: Verdict) {
        println!("[tally] << {verdict}");
    }

    async fn on_progress(&self, completed: usize, total: usize) {
        if completed == total {
            println!("[tally] drained {total} tasks");
        }
    }

    async fn on_complete(&self, verdict: Verdict) {
        let failures = self.failures.load(Ordering::Relaxed);
        println!("[tally] done: {verdict} ({failures} failing)");
    }

    fn name(&self) -> &'static str {
        "tally"
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cfg = Config {
        only_failed: true,
        ..Config::default()
    };
    let tally = Arc::new(Tally::default());
    let suite = Suite::builder(cfg).with_reporter(tally.clone()).build();

    suite.info("only failures and messages reach the reporter");
    suite.test("passes quietly", 2 * 21, 42);
    suite.group("collections", |g| {
        g.test(
            "arrays",
            Value::array([1.into(), 2.into()]),
            Value::array([1.into(), 2.into()]),
        );
        g.test(
            "sets ignore order",
            Value::set_of([1.into(), 2.into()]),
            Value::set_of([2.into(), 1.into()]),
        );
        g.test(
            "maps compare values",
            Value::map([("a".into(), 1.into())]),
            Value::map([("a".into(), 2.into())]),
        );
    });
    suite.test(
        "throws",
        Operand::from_fn(|| Err(Value::error("RangeError", "out of bounds"))),
        0,
    );

    suite.drain_and_run().await;
    assert_eq!(tally.failures.load(Ordering::Relaxed), 2);
}
