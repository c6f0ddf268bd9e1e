use std::fmt;
use std::future::Future;

use futures::future::BoxFuture;
use futures::FutureExt;

use super::Value;

/// Final state of an operation: `Ok(value)` when resolved, `Err(thrown)` when
/// it threw or rejected.
pub type Settled = Result<Value, Value>;

/// What a call produces: a settled value, or a future that will settle later.
pub enum Outcome {
    /// Completed synchronously (returned or threw).
    Ready(Settled),
    /// Still pending; settles when polled to completion.
    Pending(BoxFuture<'static, Settled>),
}

impl Outcome {
    pub fn resolved(value: impl Into<Value>) -> Self {
        Outcome::Ready(Ok(value.into()))
    }

    pub fn rejected(error: impl Into<Value>) -> Self {
        Outcome::Ready(Err(error.into()))
    }

    /// Adopts an arbitrary future.
    pub fn pending<F>(fut: F) -> Self
    where
        F: Future<Output = Settled> + Send + 'static,
    {
        Outcome::Pending(fut.boxed())
    }

    /// A pending value that is already settled: resolves on first poll.
    pub fn settled_later(settled: Settled) -> Self {
        Outcome::Pending(futures::future::ready(settled).boxed())
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, Outcome::Pending(_))
    }

    /// Drives the outcome to its settled state.
    pub async fn settle(self) -> Settled {
        match self {
            Outcome::Ready(settled) => settled,
            Outcome::Pending(fut) => fut.await,
        }
    }
}

impl From<Value> for Outcome {
    fn from(v: Value) -> Self {
        Outcome::Ready(Ok(v))
    }
}

impl From<Settled> for Outcome {
    fn from(settled: Settled) -> Self {
        Outcome::Ready(settled)
    }
}

impl fmt::Debug for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Ready(Ok(v)) => f.debug_tuple("Resolved").field(v).finish(),
            Outcome::Ready(Err(e)) => f.debug_tuple("Rejected").field(e).finish(),
            Outcome::Pending(_) => f.write_str("Pending"),
        }
    }
}
