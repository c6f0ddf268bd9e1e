//! # Call interception (spies).
//!
//! [`intercept`] swaps a record's method slot for a trampoline that logs every
//! call and forwards it to the spy's active implementation.
//!
//! ## Architecture
//! ```text
//! target.m ──► trampoline ──► calls.push(args)
//!                    │
//!                    └──► active(args)   (original until runs/returns/resolves/rejects)
//!
//! restore(): target.m = original        (plain write back, no registry)
//! ```
//!
//! ## Rules
//! - Exactly one active implementation at a time; overriding never touches the call log.
//! - `restore()` is idempotent.
//! - The target is mutated in place. Tests sharing a target (for example inside
//!   one concurrent group) observe each other's spies.
//! - A spy that is never restored keeps intercepting calls.
//!
//! ## Example
//! ```
//! use testvisor::{intercept, Outcome, Value};
//!
//! let greet = Value::function("greet", |args| {
//!     Value::from(format!("hi {}", args[0])).into()
//! });
//! let obj = Value::record([("greet", greet.clone())]);
//!
//! let spy = intercept(&obj, "greet").unwrap();
//! spy.returns("stubbed");
//!
//! let out = obj.call_method("greet", vec![Value::from("bob")]);
//! assert!(matches!(out, Outcome::Ready(Ok(v)) if v.as_str() == Some("stubbed")));
//! assert_eq!(spy.call_count(), 1);
//!
//! spy.restore();
//! assert!(obj.get("greet").ptr_eq(&greet));
//! ```

use std::sync::Arc;

use parking_lot::Mutex;

use crate::error::SetupError;
use crate::value::{Function, Object, Outcome, Settled, Value};

/// Shared state captured by the trampoline.
struct SpyState {
    original: Function,
    active: Mutex<Function>,
    calls: Mutex<Vec<Vec<Value>>>,
}

/// Handle to an installed interception.
///
/// Cloning the handle shares the same state.
#[derive(Clone)]
pub struct Spy {
    target: Object,
    method: Arc<str>,
    state: Arc<SpyState>,
}

/// Installs a spy on `target[method]`.
///
/// Fails with [`SetupError::InvalidTarget`] if `target` is not a record or the
/// slot does not hold a function.
pub fn intercept(target: &Value, method: &str) -> Result<Spy, SetupError> {
    let invalid = |reason: String| SetupError::InvalidTarget {
        method: method.to_string(),
        reason,
    };

    let obj = match target {
        Value::Object(obj) if obj.kind() == crate::value::Kind::Record => obj.clone(),
        other => return Err(invalid(format!("target is {}, not an object", other.type_name()))),
    };
    let original = match obj.get(method) {
        Some(Value::Function(f)) => f,
        Some(other) => return Err(invalid(format!("slot holds {}", other.type_name()))),
        None => return Err(invalid("no such method".to_string())),
    };

    let state = Arc::new(SpyState {
        active: Mutex::new(original.clone()),
        original,
        calls: Mutex::new(Vec::new()),
    });

    let trampoline = {
        let state = Arc::clone(&state);
        Function::new(method.to_string(), move |args: Vec<Value>| {
            state.calls.lock().push(args.clone());
            // Release the lock before calling: the implementation may re-enter the spy.
            let active = state.active.lock().clone();
            active.call(args)
        })
    };
    obj.set(method, Value::Function(trampoline));
    tracing::debug!(method, "spy installed");

    Ok(Spy {
        target: obj,
        method: Arc::from(method),
        state,
    })
}

impl Spy {
    /// Number of calls recorded so far.
    pub fn call_count(&self) -> usize {
        self.state.calls.lock().len()
    }

    /// Argument tuples of every call, in call order.
    pub fn calls(&self) -> Vec<Vec<Value>> {
        self.state.calls.lock().clone()
    }

    /// Arguments of the most recent call.
    pub fn last_call(&self) -> Option<Vec<Value>> {
        self.state.calls.lock().last().cloned()
    }

    /// The method as it was before interception.
    pub fn original(&self) -> &Function {
        &self.state.original
    }

    pub fn method(&self) -> &str {
        &self.method
    }

    /// Replaces the active implementation with `f`.
    pub fn runs<F>(&self, f: F) -> &Self
    where
        F: Fn(Vec<Value>) -> Outcome + Send + Sync + 'static,
    {
        *self.state.active.lock() = Function::new(self.method.clone(), f);
        self
    }

    /// Every call returns `value` synchronously.
    pub fn returns(&self, value: impl Into<Value>) -> &Self {
        let value = value.into();
        self.runs(move |_| Outcome::resolved(value.clone()))
    }

    /// Every call returns a pending value that resolves to `value`.
    pub fn resolves(&self, value: impl Into<Value>) -> &Self {
        let value = value.into();
        self.runs(move |_| Outcome::settled_later(Ok(value.clone())))
    }

    /// Every call returns a pending value that rejects with `error`.
    pub fn rejects(&self, error: impl Into<Value>) -> &Self {
        let error = error.into();
        self.runs(move |_| Outcome::settled_later(Settled::Err(error.clone())))
    }

    /// Puts the original method back on the target.
    pub fn restore(&self) {
        self.target
            .set(self.method.clone(), Value::Function(self.state.original.clone()));
        tracing::debug!(method = %self.method, "spy restored");
    }
}

impl std::fmt::Debug for Spy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Spy")
            .field("method", &self.method)
            .field("call_count", &self.call_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deep_equal;

    fn adder() -> Value {
        Value::function("add", |args| {
            let sum: f64 = args.iter().filter_map(Value::as_number).sum();
            Outcome::resolved(sum)
        })
    }

    fn ready(outcome: Outcome) -> Settled {
        match outcome {
            Outcome::Ready(settled) => settled,
            Outcome::Pending(_) => panic!("expected a synchronous outcome"),
        }
    }

    #[test]
    fn test_records_calls_in_order() {
        let obj = Value::record([("add", adder())]);
        let spy = intercept(&obj, "add").unwrap();
        assert_eq!(spy.call_count(), 0);

        let r1 = ready(obj.call_method("add", vec![Value::from(1), Value::from(2)]));
        let r2 = ready(obj.call_method("add", vec![Value::from("x")]));

        assert_eq!(r1.unwrap().as_number(), Some(3.0));
        assert_eq!(r2.unwrap().as_number(), Some(0.0));
        assert_eq!(spy.call_count(), 2);

        let calls = spy.calls();
        assert!(deep_equal(&Value::from(calls[0].clone()), &Value::from(vec![1, 2])));
        assert!(deep_equal(&Value::from(calls[1].clone()), &Value::from(vec!["x"])));
    }

    #[test]
    fn test_overrides_replace_behavior_not_log() {
        let obj = Value::record([("add", adder())]);
        let spy = intercept(&obj, "add").unwrap();

        spy.returns(42);
        let out = ready(obj.call_method("add", vec![Value::from(1)]));
        assert_eq!(out.unwrap().as_number(), Some(42.0));

        spy.runs(|args| Outcome::rejected(Value::error("Error", format!("{} args", args.len()))));
        let out = ready(obj.call_method("add", vec![]));
        assert_eq!(out.unwrap_err().to_string(), "Error: 0 args");

        assert_eq!(spy.call_count(), 2);
    }

    #[tokio::test]
    async fn test_resolves_and_rejects_are_pending() {
        let obj = Value::record([("fetch", adder())]);
        let spy = intercept(&obj, "fetch").unwrap();

        spy.resolves("data");
        let out = obj.call_method("fetch", vec![]);
        assert!(out.is_pending());
        assert_eq!(out.settle().await.unwrap().as_str(), Some("data"));

        spy.rejects(Value::error("Error", "offline"));
        let err = obj.call_method("fetch", vec![]).settle().await.unwrap_err();
        assert_eq!(err.to_string(), "Error: offline");
    }

    #[test]
    fn test_restore_reinstates_original_reference() {
        let original = adder();
        let obj = Value::record([("add", original.clone())]);
        let spy = intercept(&obj, "add").unwrap();
        assert!(!obj.get("add").ptr_eq(&original));

        spy.restore();
        assert!(obj.get("add").ptr_eq(&original));
        spy.restore();
        assert!(obj.get("add").ptr_eq(&original));

        // Calls after restore bypass the spy.
        let _ = obj.call_method("add", vec![]);
        assert_eq!(spy.call_count(), 0);
    }

    #[test]
    fn test_invalid_targets() {
        let obj = Value::record([("n", Value::from(1))]);
        assert!(matches!(
            intercept(&obj, "n"),
            Err(SetupError::InvalidTarget { .. })
        ));
        assert!(matches!(
            intercept(&obj, "missing"),
            Err(SetupError::InvalidTarget { .. })
        ));
        assert!(matches!(
            intercept(&Value::from(vec![1]), "push"),
            Err(SetupError::InvalidTarget { .. })
        ));
        assert!(matches!(
            intercept(&Value::Null, "m"),
            Err(SetupError::InvalidTarget { .. })
        ));
    }

    #[test]
    fn test_stacked_spies_restore_in_reverse() {
        let original = adder();
        let obj = Value::record([("add", original.clone())]);
        let outer = intercept(&obj, "add").unwrap();
        let inner = intercept(&obj, "add").unwrap();

        let _ = obj.call_method("add", vec![]);
        assert_eq!(inner.call_count(), 1);
        assert_eq!(outer.call_count(), 1);

        inner.restore();
        outer.restore();
        assert!(obj.get("add").ptr_eq(&original));
    }
}
