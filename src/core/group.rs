//! # Open group buffer.
//!
//! While a group is open, each member is started immediately and its pending
//! result is buffered. Closing the group awaits all of them concurrently and
//! hands results back **in buffering order**, never completion order.
//!
//! ```text
//! start(spec) ─ executor.start ─┬─ Done(result)  ──► buffer Ready(result)
//!                               └─ Racing        ──► tokio::spawn(finish) ──► buffer Spawned(handle)
//!
//! close() ──► join_all(buffer) ──► [r0, r1, ..] + aggregate verdict
//! ```

use futures::future::join_all;
use tokio::task::JoinHandle;

use crate::core::executor::{Execution, Executor};
use crate::error::Fault;
use crate::tasks::{Actual, Location, TestResult, TestSpec, Verdict};

enum Member {
    Ready(TestResult),
    Spawned {
        handle: JoinHandle<TestResult>,
        description: String,
        location: Option<Location>,
    },
}

/// Results of a closed group.
pub(crate) struct ClosedGroup {
    pub(crate) results: Vec<TestResult>,
    /// `Fail` iff any member failed or errored.
    pub(crate) verdict: Verdict,
}

/// Buffer of in-flight members of the currently open group.
#[derive(Default)]
pub(crate) struct GroupBuffer {
    members: Vec<Member>,
}

impl GroupBuffer {
    /// Starts `spec` without awaiting it.
    pub(crate) fn start(&mut self, executor: &Executor, spec: TestSpec) {
        let description = spec.description().to_string();
        let location = spec.location();
        match executor.start(spec) {
            Execution::Done(result) => self.members.push(Member::Ready(result)),
            racing => self.members.push(Member::Spawned {
                handle: tokio::spawn(racing.finish()),
                description,
                location,
            }),
        }
    }

    /// Buffers a result that needs no execution (info messages).
    pub(crate) fn push_ready(&mut self, result: TestResult) {
        self.members.push(Member::Ready(result));
    }

    pub(crate) fn len(&self) -> usize {
        self.members.len()
    }

    /// Awaits every buffered member and returns results in buffering order.
    pub(crate) async fn close(self) -> ClosedGroup {
        let results = join_all(self.members.into_iter().map(|member| async move {
            match member {
                Member::Ready(result) => result,
                Member::Spawned {
                    handle,
                    description,
                    location,
                } => match handle.await {
                    Ok(result) => result,
                    Err(join_err) => lost(description, location, join_err.to_string()),
                },
            }
        }))
        .await;

        let verdict = results
            .iter()
            .fold(Verdict::Pass, |acc, r| acc.merge(r.verdict));
        ClosedGroup { results, verdict }
    }
}

/// Result for a member whose spawned execution never reported back.
fn lost(description: String, location: Option<Location>, reason: String) -> TestResult {
    TestResult {
        description,
        verdict: Verdict::Error,
        actual: Actual::Thrown(Fault::Lost { reason }.to_value()),
        expected: None,
        location,
        elapsed: std::time::Duration::ZERO,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::Config;
    use crate::tasks::{Operand, TestOptions};
    use crate::value::Value;
    use std::time::Duration;
    use tokio_util::sync::CancellationToken;

    fn delayed(description: &str, delay_ms: u64, value: i32, expected: i32) -> TestSpec {
        let op = Operand::from_async(move |_ctx| async move {
            tokio::time::sleep(Duration::from_millis(delay_ms)).await;
            Ok(Value::from(value))
        });
        TestSpec::new(
            description.to_string(),
            op,
            Value::from(expected),
            TestOptions::default(),
        )
    }

    #[tokio::test]
    async fn test_results_keep_buffer_order() {
        let executor = Executor::new(Config::default(), CancellationToken::new());
        let mut group = GroupBuffer::default();
        group.start(&executor, delayed("slow", 60, 1, 1));
        group.start(&executor, delayed("fast", 0, 2, 2));
        assert_eq!(group.len(), 2);

        let closed = group.close().await;
        let names: Vec<_> = closed.results.iter().map(|r| r.description.as_str()).collect();
        assert_eq!(names, vec!["slow", "fast"]);
        assert_eq!(closed.verdict, Verdict::Pass);
    }

    #[tokio::test]
    async fn test_members_run_concurrently() {
        let executor = Executor::new(Config::default(), CancellationToken::new());
        let mut group = GroupBuffer::default();
        for i in 0..4 {
            group.start(&executor, delayed(&format!("t{i}"), 100, i, i));
        }
        let started = std::time::Instant::now();
        let closed = group.close().await;
        assert_eq!(closed.results.len(), 4);
        assert!(started.elapsed() < Duration::from_millis(350));
    }

    #[tokio::test]
    async fn test_aggregate_fails_on_any_failure() {
        let executor = Executor::new(Config::default(), CancellationToken::new());
        let mut group = GroupBuffer::default();
        group.start(&executor, delayed("ok", 0, 1, 1));
        group.start(&executor, delayed("bad", 0, 1, 2));
        let closed = group.close().await;
        assert_eq!(closed.results[0].verdict, Verdict::Pass);
        assert_eq!(closed.results[1].verdict, Verdict::Fail);
        assert_eq!(closed.verdict, Verdict::Fail);
    }

    fn thrown_name(result: &TestResult) -> Option<String> {
        match &result.actual {
            Actual::Thrown(v) => v.as_object().and_then(|o| o.error_name()).map(|n| n.to_string()),
            _ => None,
        }
    }

    #[tokio::test]
    async fn test_member_timeout_is_error_in_place() {
        let executor = Executor::new(Config::default(), CancellationToken::new());
        let mut group = GroupBuffer::default();
        let hangs = TestSpec::new(
            "hangs".to_string(),
            Operand::future(futures::future::pending()),
            Value::Undefined,
            TestOptions::default().with_timeout(Duration::from_millis(50)),
        );
        group.start(&executor, hangs);
        group.start(&executor, delayed("quick", 0, 1, 1));

        let started = std::time::Instant::now();
        let closed = group.close().await;
        assert!(started.elapsed() >= Duration::from_millis(50));
        assert!(started.elapsed() < Duration::from_secs(2));

        let names: Vec<_> = closed.results.iter().map(|r| r.description.as_str()).collect();
        assert_eq!(names, vec!["hangs", "quick"]);
        assert_eq!(closed.results[0].verdict, Verdict::Error);
        assert_eq!(thrown_name(&closed.results[0]).as_deref(), Some("TimeoutError"));
        assert_eq!(closed.results[1].verdict, Verdict::Pass);
        assert_eq!(closed.verdict, Verdict::Fail);
    }

    #[tokio::test]
    async fn test_aborted_member_is_reported_lost() {
        let handle = tokio::spawn(futures::future::pending::<TestResult>());
        handle.abort();

        let mut group = GroupBuffer::default();
        group.members.push(Member::Spawned {
            handle,
            description: "gone".to_string(),
            location: None,
        });
        let closed = group.close().await;

        assert_eq!(closed.results[0].description, "gone");
        assert_eq!(closed.results[0].verdict, Verdict::Error);
        assert_eq!(thrown_name(&closed.results[0]).as_deref(), Some("LostError"));
        assert_eq!(closed.verdict, Verdict::Fail);
    }
}
