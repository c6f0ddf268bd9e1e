//! # Reporter trait.
//!
//! Provides [`Reporter`], the boundary between the engine and any presentation
//! layer (console, file, UI, CI annotations).
//!
//! ## Call order
//! ```text
//! per drained task:   [on_group_start] ... on_result* ... [on_group_end]   on_progress
//! once at the end:    on_complete
//! ```
//!
//! ## Rules
//! - Calls arrive **sequentially** and in declaration order; the scheduler
//!   awaits each call before making the next one.
//! - A slow reporter slows the run down (there is no queue in between).
//! - Panics are caught by the [`ReporterSet`](crate::ReporterSet), logged, and
//!   do not affect other reporters or the run.
//!
//! ## Example
//! ```rust
//! use async_trait::async_trait;
//! use testvisor::{Reporter, TestResult, Verdict};
//!
//! struct FailureCounter(std::sync::atomic::AtomicUsize);
//!
//! #[async_trait]
//! impl Reporter for FailureCounter {
//!     async fn on_result(&self, result: &TestResult) {
//!         if result.verdict.is_failure() {
//!             self.0.fetch_add(1, std::sync::atomic::Ordering::Relaxed);
//!         }
//!     }
//!
//!     fn name(&self) -> &'static str { "failure-counter" }
//! }
//! ```

use async_trait::async_trait;

use crate::tasks::{TestResult, Verdict};

/// Sink for suite lifecycle calls.
///
/// Only [`on_result`](Reporter::on_result) is required; the bracket, progress
/// and completion hooks default to no-ops.
#[async_trait]
pub trait Reporter: Send + Sync + 'static {
    /// One call per Test, Skip or Info result, in final report order.
    async fn on_result(&self, result: &TestResult);

    /// A group opens; its results follow.
    async fn on_group_start(&self, _description: &str) {}

    /// The open group closes with its aggregate verdict (`fail` iff any member failed or errored).
    async fn on_group_end(&self, _verdict: Verdict) {}

    /// Called after every drained task; the last call is `(total, total)`.
    async fn on_progress(&self, _completed: usize, _total: usize) {}

    /// Called once after the queue is fully drained.
    async fn on_complete(&self, _verdict: Verdict) {}

    /// Returns the reporter name used in logs.
    ///
    /// The default uses `type_name::<Self>()`, which can be verbose - override it when possible.
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}
