//! # Test operands.
//!
//! An [`Operand`] is what a test evaluates. The variant is fixed at
//! declaration time, so the executor never has to guess whether it received a
//! value or something to call.
//!
//! ```text
//! Immediate(value)   ──► already resolved
//! Pending(future)    ──► adopted as is, raced against the timeout
//! Deferred(producer) ──► invoked once by the executor with a child CancellationToken,
//!                        yields Outcome::Ready(..) or Outcome::Pending(..)
//! ```
//!
//! ## Example
//! ```rust
//! use std::time::Duration;
//! use testvisor::{Operand, Value};
//!
//! let now = Operand::from(2);
//! let sync = Operand::from_fn(|| Ok(Value::from(1 + 1)));
//! let later = Operand::from_async(|ctx| async move {
//!     tokio::select! {
//!         _ = ctx.cancelled() => Err(Value::error("Error", "gave up")),
//!         _ = tokio::time::sleep(Duration::from_millis(5)) => Ok(Value::from(2)),
//!     }
//! });
//! # let _ = (now, sync, later);
//! ```

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use futures::future::BoxFuture;
use futures::FutureExt;
use tokio_util::sync::CancellationToken;

use crate::value::{Object, Outcome, Settled, Value};

type Producer = Box<dyn FnOnce(CancellationToken) -> Outcome + Send>;

/// Tagged test operand.
pub enum Operand {
    /// A plain value, already resolved.
    Immediate(Value),
    /// A pending asynchronous value.
    Pending(BoxFuture<'static, Settled>),
    /// A zero-argument producer, invoked by the executor.
    ///
    /// The token is cancelled if the test times out; honoring it is optional.
    Deferred(Producer),
}

impl Operand {
    /// Adopts an already-created future.
    pub fn future<F>(fut: F) -> Self
    where
        F: Future<Output = Settled> + Send + 'static,
    {
        Operand::Pending(fut.boxed())
    }

    /// Synchronous producer. `Err` plays the role of a thrown value.
    pub fn from_fn<F>(f: F) -> Self
    where
        F: FnOnce() -> Settled + Send + 'static,
    {
        Operand::Deferred(Box::new(move |_ctx| Outcome::Ready(f())))
    }

    /// Asynchronous producer: called once, its future is raced against the timeout.
    pub fn from_async<F, Fut>(f: F) -> Self
    where
        F: FnOnce(CancellationToken) -> Fut + Send + 'static,
        Fut: Future<Output = Settled> + Send + 'static,
    {
        Operand::Deferred(Box::new(move |ctx| Outcome::Pending(f(ctx).boxed())))
    }

    /// Producer returning an [`Outcome`] directly (e.g. a method call on a spied object).
    pub fn call<F>(f: F) -> Self
    where
        F: FnOnce(CancellationToken) -> Outcome + Send + 'static,
    {
        Operand::Deferred(Box::new(f))
    }
}

impl fmt::Debug for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operand::Immediate(v) => f.debug_tuple("Immediate").field(v).finish(),
            Operand::Pending(_) => f.write_str("Pending"),
            Operand::Deferred(_) => f.write_str("Deferred"),
        }
    }
}

impl From<Value> for Operand {
    fn from(v: Value) -> Self {
        Operand::Immediate(v)
    }
}

impl From<Outcome> for Operand {
    fn from(outcome: Outcome) -> Self {
        match outcome {
            Outcome::Ready(Ok(v)) => Operand::Immediate(v),
            Outcome::Ready(Err(e)) => Operand::Pending(futures::future::ready(Err(e)).boxed()),
            Outcome::Pending(fut) => Operand::Pending(fut),
        }
    }
}

macro_rules! operand_from {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Operand {
                fn from(v: $t) -> Self {
                    Operand::Immediate(Value::from(v))
                }
            }
        )*
    };
}

operand_from!(
    bool, i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, f32, f64, &str, String, Arc<str>,
    (), Object
);
