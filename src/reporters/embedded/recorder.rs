//! # Recorder: in-memory reporter.
//!
//! Keeps every call it receives, in order. Useful for asserting on a run from
//! tests, or for post-processing results after `drain_and_run` returns.

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::reporters::Reporter;
use crate::tasks::{TestResult, Verdict};

/// One recorded reporter call.
#[derive(Debug, Clone)]
pub enum Record {
    GroupStart(String),
    Result(TestResult),
    GroupEnd(Verdict),
    Progress { completed: usize, total: usize },
    Complete(Verdict),
}

/// Reporter that stores every call.
#[derive(Default)]
pub struct Recorder {
    records: Mutex<Vec<Record>>,
}

impl Recorder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// All calls, in arrival order.
    pub fn records(&self) -> Vec<Record> {
        self.records.lock().clone()
    }

    /// Only the results, in report order.
    pub fn results(&self) -> Vec<TestResult> {
        self.records
            .lock()
            .iter()
            .filter_map(|r| match r {
                Record::Result(res) => Some(res.clone()),
                _ => None,
            })
            .collect()
    }

    /// Descriptions of the reported results, in report order.
    pub fn descriptions(&self) -> Vec<String> {
        self.results().into_iter().map(|r| r.description).collect()
    }

    /// All `(completed, total)` progress pairs.
    pub fn progress(&self) -> Vec<(usize, usize)> {
        self.records
            .lock()
            .iter()
            .filter_map(|r| match r {
                Record::Progress { completed, total } => Some((*completed, *total)),
                _ => None,
            })
            .collect()
    }

    /// Final verdict, once `on_complete` has been received.
    pub fn completed(&self) -> Option<Verdict> {
        self.records.lock().iter().rev().find_map(|r| match r {
            Record::Complete(v) => Some(*v),
            _ => None,
        })
    }

    /// Forget everything recorded so far.
    pub fn clear(&self) {
        self.records.lock().clear();
    }

    fn push(&self, record: Record) {
        self.records.lock().push(record);
    }
}

#[async_trait]
impl Reporter for Recorder {
    async fn on_result(&self, result: &TestResult) {
        self.push(Record::Result(result.clone()));
    }

    async fn on_group_start(&self, description: &str) {
        self.push(Record::GroupStart(description.to_string()));
    }

    async fn on_group_end(&self, verdict: Verdict) {
        self.push(Record::GroupEnd(verdict));
    }

    async fn on_progress(&self, completed: usize, total: usize) {
        self.push(Record::Progress { completed, total });
    }

    async fn on_complete(&self, verdict: Verdict) {
        self.push(Record::Complete(verdict));
    }

    fn name(&self) -> &'static str {
        "recorder"
    }
}
