//! # Ordered fan-out over multiple reporters.
//!
//! [`ReporterSet`] forwards every lifecycle call to each reporter in
//! registration order, awaiting one before the next.
//!
//! ## Diagram
//! ```text
//!   on_result(&r)
//!        ├──► reporter 1 ─► await ─► panic? → warn, continue
//!        ├──► reporter 2 ─► await
//!        └──► reporter N ─► await
//! ```
//!
//! ## Rules
//! - **Global ordering**: every reporter sees every call in the same order.
//! - **Isolation**: a panicking reporter is logged (`tracing::warn!`) and skipped
//!   for that call only.
//!
//! **Warning**: `AssertUnwindSafe` is used, which can leave shared state inconsistent
//! if a reporter uses `Arc<Mutex<T>>` and panics while holding the lock.

use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::future::BoxFuture;
use futures::FutureExt;

use crate::error::Fault;
use crate::reporters::Reporter;
use crate::tasks::{TestResult, Verdict};

/// Composite of reporters, driven sequentially.
#[derive(Clone, Default)]
pub struct ReporterSet {
    reporters: Vec<Arc<dyn Reporter>>,
}

impl ReporterSet {
    #[must_use]
    pub fn new(reporters: Vec<Arc<dyn Reporter>>) -> Self {
        Self { reporters }
    }

    pub fn push(&mut self, reporter: Arc<dyn Reporter>) {
        self.reporters.push(reporter);
    }

    /// True if there are no reporters.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.reporters.is_empty()
    }

    /// Number of reporters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.reporters.len()
    }

    pub async fn on_result(&self, result: &TestResult) {
        self.each(|r| r.on_result(result)).await;
    }

    pub async fn on_group_start(&self, description: &str) {
        self.each(|r| r.on_group_start(description)).await;
    }

    pub async fn on_group_end(&self, verdict: Verdict) {
        self.each(|r| r.on_group_end(verdict)).await;
    }

    pub async fn on_progress(&self, completed: usize, total: usize) {
        self.each(|r| r.on_progress(completed, total)).await;
    }

    pub async fn on_complete(&self, verdict: Verdict) {
        self.each(|r| r.on_complete(verdict)).await;
    }

    async fn each<'a, F>(&'a self, call: F)
    where
        F: Fn(&'a dyn Reporter) -> BoxFuture<'a, ()>,
    {
        for reporter in &self.reporters {
            let fut = call(reporter.as_ref());
            if let Err(panic_err) = AssertUnwindSafe(fut).catch_unwind().await {
                let fault = Fault::from_panic(panic_err);
                tracing::warn!(reporter = reporter.name(), error = %fault, "reporter panicked");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reporters::{Record, Recorder};
    use crate::tasks::Actual;
    use async_trait::async_trait;
    use std::time::Duration;

    struct Exploding;

    #[async_trait]
    impl Reporter for Exploding {
        async fn on_result(&self, _result: &TestResult) {
            panic!("reporter bug");
        }

        fn name(&self) -> &'static str {
            "exploding"
        }
    }

    fn result(description: &str) -> TestResult {
        TestResult {
            description: description.to_string(),
            verdict: Verdict::Pass,
            actual: Actual::Absent,
            expected: None,
            location: None,
            elapsed: Duration::ZERO,
        }
    }

    #[tokio::test]
    async fn test_panicking_reporter_is_isolated() {
        let recorder = Arc::new(Recorder::new());
        let set = ReporterSet::new(vec![Arc::new(Exploding), recorder.clone()]);

        set.on_result(&result("a")).await;
        set.on_result(&result("b")).await;
        set.on_complete(Verdict::Pass).await;

        assert_eq!(recorder.descriptions(), vec!["a", "b"]);
        assert!(matches!(recorder.records().last(), Some(Record::Complete(Verdict::Pass))));
    }

    #[test]
    fn test_len_and_empty() {
        let mut set = ReporterSet::default();
        assert!(set.is_empty());
        set.push(Arc::new(Recorder::new()));
        assert_eq!(set.len(), 1);
    }
}
