//! # Dynamic values produced by test operands.
//!
//! Test bodies produce [`Value`]s and declare expected [`Value`]s; the
//! [equality engine](crate::deep_equal) compares them structurally.
//!
//! ## Model
//! ```text
//! Value ─┬─ primitives:  Undefined | Null | Bool | Number | Str
//!        ├─ Object   ──► Arc<Mutex<Composite>>   (shared reference, interior mutability)
//!        │                 ├─ Record { class, fields }
//!        │                 ├─ Array / Map / Set
//!        │                 └─ Date / Regex / Bytes / Error
//!        └─ Function ──► Arc<dyn Fn(Vec<Value>) -> Outcome>
//! ```
//!
//! ## Rules
//! - Primitives compare by value; `Object` and `Function` have **reference identity**.
//! - Cloning a `Value` clones the reference, never the composite behind it.
//! - Composites can be mutated after creation, so cyclic graphs are expressible:
//!   ```rust
//!   use testvisor::Value;
//!
//!   let node = Value::record([("name", Value::from("root"))]);
//!   node.set("self", node.clone());
//!   assert!(node.get("self").ptr_eq(&node));
//!   ```
//!   Cycles are never collected (reference counting); that is acceptable for
//!   short-lived test fixtures.

mod fmt;
mod function;
mod object;
mod outcome;

use std::sync::Arc;

pub use function::Function;
pub use object::{Composite, Kind, Object};
pub use outcome::{Outcome, Settled};

/// A dynamically typed value.
#[derive(Clone, Default)]
pub enum Value {
    /// The "missing" sentinel.
    #[default]
    Undefined,
    /// Explicit null.
    Null,
    /// Boolean.
    Bool(bool),
    /// IEEE-754 double.
    Number(f64),
    /// Immutable string.
    Str(Arc<str>),
    /// Shared composite (record, array, map, set, date, regex, bytes, error).
    Object(Object),
    /// Shared callable.
    Function(Function),
}

impl Value {
    /// Plain record with class `Object`.
    pub fn record<K, I>(fields: I) -> Self
    where
        K: Into<Arc<str>>,
        I: IntoIterator<Item = (K, Value)>,
    {
        Self::instance("Object", fields)
    }

    /// Record tagged with a class name; records of different classes never compare equal.
    pub fn instance<K, I>(class: impl Into<Arc<str>>, fields: I) -> Self
    where
        K: Into<Arc<str>>,
        I: IntoIterator<Item = (K, Value)>,
    {
        let mut out: Vec<(Arc<str>, Value)> = Vec::new();
        for (k, v) in fields {
            let k = k.into();
            match out.iter_mut().find(|(existing, _)| *existing == k) {
                Some(slot) => slot.1 = v,
                None => out.push((k, v)),
            }
        }
        Value::Object(Object::new(Composite::Record {
            class: class.into(),
            fields: out,
        }))
    }

    pub fn array<I: IntoIterator<Item = Value>>(items: I) -> Self {
        Value::Object(Object::new(Composite::Array(items.into_iter().collect())))
    }

    /// Map with insertion order preserved; duplicate keys (same-value-zero) overwrite.
    pub fn map<I: IntoIterator<Item = (Value, Value)>>(entries: I) -> Self {
        let obj = Object::new(Composite::Map(Vec::new()));
        for (k, v) in entries {
            obj.map_insert(k, v);
        }
        Value::Object(obj)
    }

    /// Set with insertion order preserved; duplicates (same-value-zero) are ignored.
    pub fn set_of<I: IntoIterator<Item = Value>>(items: I) -> Self {
        let obj = Object::new(Composite::Set(Vec::new()));
        for item in items {
            obj.set_add(item);
        }
        Value::Object(obj)
    }

    /// Date at `millis` since the Unix epoch.
    pub fn date(millis: i64) -> Self {
        Value::Object(Object::new(Composite::Date(millis)))
    }

    pub fn regex(source: impl Into<Arc<str>>, flags: &str) -> Self {
        Value::Object(Object::new(Composite::Regex {
            source: source.into(),
            flags: object::normalize_flags(flags),
        }))
    }

    pub fn bytes(bytes: impl Into<Vec<u8>>) -> Self {
        Value::Object(Object::new(Composite::Bytes(bytes.into())))
    }

    /// Error object, the usual payload of a thrown or rejected operation.
    pub fn error(name: impl Into<Arc<str>>, message: impl Into<Arc<str>>) -> Self {
        Value::Object(Object::new(Composite::Error {
            name: name.into(),
            message: message.into(),
        }))
    }

    /// Wraps a closure as a callable value.
    pub fn function<F>(name: impl Into<Arc<str>>, f: F) -> Self
    where
        F: Fn(Vec<Value>) -> Outcome + Send + Sync + 'static,
    {
        Value::Function(Function::new(name, f))
    }

    pub fn is_undefined(&self) -> bool {
        matches!(self, Value::Undefined)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(&**s),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&Object> {
        match self {
            Value::Object(o) => Some(o),
            _ => None,
        }
    }

    pub fn as_function(&self) -> Option<&Function> {
        match self {
            Value::Function(f) => Some(f),
            _ => None,
        }
    }

    /// Reads a record field; `Undefined` when absent or when `self` is not a record.
    pub fn get(&self, key: &str) -> Value {
        self.as_object()
            .and_then(|o| o.get(key))
            .unwrap_or(Value::Undefined)
    }

    /// Writes a record field, returning the previous value.
    ///
    /// No-op (returns `None`) when `self` is not a record.
    pub fn set(&self, key: impl Into<Arc<str>>, value: Value) -> Option<Value> {
        self.as_object().and_then(|o| o.set(key, value))
    }

    /// Invokes the function stored under `method`.
    ///
    /// A missing or non-callable slot yields a rejected `TypeError`, the way a
    /// dynamic call on a plain object would fail at runtime.
    pub fn call_method(&self, method: &str, args: Vec<Value>) -> Outcome {
        match self.get(method) {
            Value::Function(f) => f.call(args),
            other => Outcome::rejected(Value::error(
                "TypeError",
                format!("{method} is not a function (found {})", other.type_name()),
            )),
        }
    }

    /// Reference identity for objects and functions, `===` for primitives.
    pub fn ptr_eq(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Object(a), Value::Object(b)) => a.ptr_eq(b),
            (Value::Function(a), Value::Function(b)) => a.ptr_eq(b),
            (Value::Undefined, Value::Undefined) | (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            _ => false,
        }
    }

    /// Key equality used by maps and sets: like [`ptr_eq`](Self::ptr_eq) but `NaN` matches `NaN`.
    pub fn same_value_zero(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Number(a), Value::Number(b)) if a.is_nan() && b.is_nan() => true,
            _ => self.ptr_eq(other),
        }
    }

    /// Short type label for diagnostics.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Undefined => "undefined",
            Value::Null => "null",
            Value::Bool(_) => "boolean",
            Value::Number(_) => "number",
            Value::Str(_) => "string",
            Value::Object(o) => o.kind().as_str(),
            Value::Function(_) => "function",
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

macro_rules! number_from {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Value {
                fn from(n: $t) -> Self {
                    Value::Number(n as f64)
                }
            }
        )*
    };
}

number_from!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, f32, f64);

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(Arc::from(s))
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(Arc::from(s))
    }
}

impl From<Arc<str>> for Value {
    fn from(s: Arc<str>) -> Self {
        Value::Str(s)
    }
}

impl From<()> for Value {
    fn from(_: ()) -> Self {
        Value::Undefined
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::array(items.into_iter().map(Into::into))
    }
}

impl From<Object> for Value {
    fn from(o: Object) -> Self {
        Value::Object(o)
    }
}

impl From<Function> for Value {
    fn from(f: Function) -> Self {
        Value::Function(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_set_and_get() {
        let v = Value::record([("a", Value::from(1))]);
        assert_eq!(v.get("a").as_number(), Some(1.0));
        assert!(v.get("missing").is_undefined());

        let prev = v.set("a", Value::from("x"));
        assert_eq!(prev.and_then(|p| p.as_number()), Some(1.0));
        assert_eq!(v.get("a").as_str(), Some("x"));
    }

    #[test]
    fn test_clone_shares_identity() {
        let a = Value::array([Value::from(1)]);
        let b = a.clone();
        assert!(a.ptr_eq(&b));
        assert!(!a.ptr_eq(&Value::array([Value::from(1)])));
    }

    #[test]
    fn test_map_and_set_dedupe_with_same_value_zero() {
        let m = Value::map([
            (Value::from(f64::NAN), Value::from(1)),
            (Value::from(f64::NAN), Value::from(2)),
        ]);
        let len = m.as_object().map(|o| o.len()).unwrap_or_default();
        assert_eq!(len, 1);

        let s = Value::set_of([Value::from(1), Value::from(1), Value::from(2)]);
        assert_eq!(s.as_object().map(|o| o.len()), Some(2));
    }

    #[test]
    fn test_call_method_on_non_function_rejects() {
        let obj = Value::record([("m", Value::from(3))]);
        match obj.call_method("m", vec![]) {
            Outcome::Ready(Err(e)) => {
                let name = e.as_object().and_then(Object::error_name);
                assert_eq!(name.as_deref(), Some("TypeError"));
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[test]
    fn test_debug_marks_cycles() {
        let node = Value::record([("id", Value::from(1))]);
        node.set("me", node.clone());
        assert_eq!(format!("{node:?}"), "{ id: 1, me: [Circular] }");
    }
}
