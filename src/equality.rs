//! # Deep structural equality.
//!
//! [`deep_equal`] decides `pass` vs `fail` for every test. It is pure and
//! terminates on cyclic graphs.
//!
//! ## Rules
//! ```text
//! identical reference / identical primitive ──► equal
//! either side not a composite              ──► not equal
//! (a, b) already in progress               ──► equal (cycle broken)
//! different kind or class                  ──► not equal
//! Date   ── same instant
//! Regex  ── same source and normalized flags
//! Bytes  ── same length, same bytes
//! Error  ── same name and message
//! Array  ── same length, pairwise equal (order-sensitive)
//! Map    ── same size, every key of `a` present in `b` with an equal value
//! Set    ── same size, greedy one-to-one matching (order-insensitive)
//! Record ── same key count, every key of `a` present in `b` with an equal value
//! ```
//!
//! Record fields and map entries holding [`Value::Undefined`] count as absent:
//! `{ a: undefined }` equals `{}`.
//!
//! Primitives follow `===`: `NaN` is never equal to itself and `0.0` equals `-0.0`.

use std::collections::HashSet;

use crate::value::{Composite, Value};

/// Compares two values for deep structural equality.
///
/// # Example
/// ```
/// use testvisor::{deep_equal, Value};
///
/// let a = Value::record([("xs", Value::from(vec![1, 2]))]);
/// let b = Value::record([("xs", Value::from(vec![1, 2]))]);
/// assert!(deep_equal(&a, &b));
///
/// // Cycles terminate.
/// a.set("me", a.clone());
/// b.set("me", b.clone());
/// assert!(deep_equal(&a, &b));
/// ```
pub fn deep_equal(a: &Value, b: &Value) -> bool {
    Comparator::default().equal(a, b)
}

/// Traversal state: reference pairs whose comparison is currently open.
///
/// Nesting is walked with an explicit stack of [`Frame`]s, so depth is bounded
/// by heap, not by the thread stack.
#[derive(Default)]
struct Comparator {
    in_progress: HashSet<(usize, usize)>,
}

/// What opening a pair produced.
enum Step {
    Done(bool),
    Descend(Frame),
}

/// An open pair of composites waiting on the results of its children.
struct Frame {
    pair: (usize, usize),
    children: Children,
}

enum Children {
    /// Every pair must be equal, checked in order.
    All {
        pairs: Vec<(Value, Value)>,
        next: usize,
    },
    /// Greedy one-to-one matching of `left` members onto `right` members.
    Matching {
        left: Vec<Value>,
        right: Vec<Value>,
        matched: Vec<bool>,
        i: usize,
        candidate: usize,
    },
}

/// What an open frame needs next.
enum Next {
    Compare(Value, Value),
    Finished(bool),
}

impl Comparator {
    fn equal(&mut self, a: &Value, b: &Value) -> bool {
        let mut stack = match self.open(a, b) {
            Step::Done(res) => return res,
            Step::Descend(frame) => vec![frame],
        };
        let mut last = None;
        while let Some(frame) = stack.last_mut() {
            match frame.children.advance(last.take()) {
                Next::Compare(x, y) => match self.open(&x, &y) {
                    Step::Done(res) => last = Some(res),
                    Step::Descend(child) => stack.push(child),
                },
                Next::Finished(res) => {
                    if let Some(done) = stack.pop() {
                        self.in_progress.remove(&done.pair);
                    }
                    if stack.is_empty() {
                        return res;
                    }
                    last = Some(res);
                }
            }
        }
        true
    }

    /// Decides a pair outright, or opens a frame for its children.
    fn open(&mut self, a: &Value, b: &Value) -> Step {
        if a.ptr_eq(b) {
            return Step::Done(true);
        }
        let (oa, ob) = match (a, b) {
            (Value::Object(oa), Value::Object(ob)) => (oa, ob),
            _ => return Step::Done(false),
        };

        let pair = (oa.addr(), ob.addr());
        if !self.in_progress.insert(pair) {
            return Step::Done(true);
        }
        match composites(oa.snapshot(), ob.snapshot()) {
            Some(children) => Step::Descend(Frame { pair, children }),
            None => {
                self.in_progress.remove(&pair);
                Step::Done(false)
            }
        }
    }
}

impl Children {
    /// `last` is the result of the comparison this frame asked for previously.
    fn advance(&mut self, last: Option<bool>) -> Next {
        match self {
            Children::All { pairs, next } => {
                if last == Some(false) {
                    return Next::Finished(false);
                }
                match pairs.get_mut(*next) {
                    Some((x, y)) => {
                        *next += 1;
                        Next::Compare(std::mem::take(x), std::mem::take(y))
                    }
                    None => Next::Finished(true),
                }
            }
            Children::Matching {
                left,
                right,
                matched,
                i,
                candidate,
            } => {
                match last {
                    Some(true) => {
                        matched[*candidate] = true;
                        *i += 1;
                        *candidate = 0;
                    }
                    Some(false) => *candidate += 1,
                    None => {}
                }
                let Some(x) = left.get(*i) else {
                    return Next::Finished(true);
                };
                match (*candidate..right.len()).find(|&j| !matched[j]) {
                    Some(j) => {
                        *candidate = j;
                        Next::Compare(x.clone(), right[j].clone())
                    }
                    None => Next::Finished(false),
                }
            }
        }
    }
}

/// Compares the scalar parts of two composites and lists the nested pairs
/// still to compare. `None` means the composites already differ.
fn composites(a: Composite, b: Composite) -> Option<Children> {
    let scalar = |equal: bool| equal.then(|| Children::All { pairs: Vec::new(), next: 0 });
    match (a, b) {
        (
            Composite::Record { class: ca, fields: fa },
            Composite::Record { class: cb, fields: fb },
        ) => {
            if ca != cb {
                return None;
            }
            present_pairs(fa, fb, |ka, kb| ka == kb)
        }
        (Composite::Array(xa), Composite::Array(xb)) => (xa.len() == xb.len()).then(|| {
            Children::All {
                pairs: xa.into_iter().zip(xb).collect(),
                next: 0,
            }
        }),
        (Composite::Map(ea), Composite::Map(eb)) => {
            present_pairs(ea, eb, |ka: &Value, kb: &Value| ka.same_value_zero(kb))
        }
        (Composite::Set(sa), Composite::Set(sb)) => (sa.len() == sb.len()).then(|| {
            let matched = vec![false; sb.len()];
            Children::Matching {
                left: sa,
                right: sb,
                matched,
                i: 0,
                candidate: 0,
            }
        }),
        (Composite::Date(ta), Composite::Date(tb)) => scalar(ta == tb),
        (
            Composite::Regex { source: sa, flags: fa },
            Composite::Regex { source: sb, flags: fb },
        ) => scalar(sa == sb && fa == fb),
        (Composite::Bytes(ba), Composite::Bytes(bb)) => scalar(ba == bb),
        (
            Composite::Error { name: na, message: ma },
            Composite::Error { name: nb, message: mb },
        ) => scalar(na == nb && ma == mb),
        _ => None,
    }
}

/// Pairs up the present (non-`Undefined`) entries of two keyed collections.
///
/// `None` when the present counts differ or a key of `a` is missing from `b`.
fn present_pairs<K>(
    ea: Vec<(K, Value)>,
    eb: Vec<(K, Value)>,
    same_key: impl Fn(&K, &K) -> bool,
) -> Option<Children> {
    let ea: Vec<_> = ea.into_iter().filter(|(_, v)| !v.is_undefined()).collect();
    let eb: Vec<_> = eb.into_iter().filter(|(_, v)| !v.is_undefined()).collect();
    if ea.len() != eb.len() {
        return None;
    }
    let mut pairs = Vec::with_capacity(ea.len());
    for (key, va) in ea {
        let (_, vb) = eb.iter().find(|(k, _)| same_key(&key, k))?;
        pairs.push((va, vb.clone()));
    }
    Some(Children::All { pairs, next: 0 })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn primitives() -> Vec<Value> {
        vec![
            Value::Undefined,
            Value::Null,
            Value::from(true),
            Value::from(false),
            Value::from(0),
            Value::from(-0.0),
            Value::from(1),
            Value::from(f64::NAN),
            Value::from(""),
            Value::from("1"),
        ]
    }

    fn primitive_strict_eq(a: &Value, b: &Value) -> bool {
        match (a, b) {
            (Value::Undefined, Value::Undefined) | (Value::Null, Value::Null) => true,
            (Value::Bool(x), Value::Bool(y)) => x == y,
            (Value::Number(x), Value::Number(y)) => x == y,
            (Value::Str(x), Value::Str(y)) => x == y,
            _ => false,
        }
    }

    #[test]
    fn test_primitives_follow_strict_equality() {
        let all = primitives();
        for a in &all {
            for b in &all {
                assert_eq!(
                    deep_equal(a, b),
                    primitive_strict_eq(a, b),
                    "mismatch for {a:?} vs {b:?}"
                );
            }
        }
    }

    #[test]
    fn test_nan_and_signed_zero() {
        assert!(!deep_equal(&Value::from(f64::NAN), &Value::from(f64::NAN)));
        assert!(deep_equal(&Value::from(0.0), &Value::from(-0.0)));
    }

    #[test]
    fn test_self_reference_terminates() {
        let x = Value::record(Vec::<(&str, Value)>::new());
        x.set("self", x.clone());
        let a = Value::record([("self", x.clone())]);
        let b = Value::record([("self", x)]);
        assert!(deep_equal(&a, &b));
        assert!(deep_equal(&b, &a));
    }

    #[test]
    fn test_isomorphic_cycles_are_equal() {
        let make = |leaf: i32| {
            let a = Value::record([("leaf", Value::from(leaf))]);
            let b = Value::record([("back", a.clone())]);
            a.set("next", b);
            a
        };
        assert!(deep_equal(&make(1), &make(1)));
        assert!(!deep_equal(&make(1), &make(2)));
        assert!(!deep_equal(&make(2), &make(1)));
    }

    #[test]
    fn test_arrays_are_order_sensitive() {
        let a = Value::from(vec![1, 2, 3]);
        assert!(deep_equal(&a, &Value::from(vec![1, 2, 3])));
        assert!(!deep_equal(&a, &Value::from(vec![3, 2, 1])));
        assert!(!deep_equal(&a, &Value::from(vec![1, 2])));
    }

    #[test]
    fn test_records_compare_keys_and_class() {
        let a = Value::record([("x", Value::from(1)), ("y", Value::from(2))]);
        let reordered = Value::record([("y", Value::from(2)), ("x", Value::from(1))]);
        let extra = Value::record([
            ("x", Value::from(1)),
            ("y", Value::from(2)),
            ("z", Value::from(3)),
        ]);
        let other_class = Value::instance("Point", [("x", Value::from(1)), ("y", Value::from(2))]);

        assert!(deep_equal(&a, &reordered));
        assert!(!deep_equal(&a, &extra));
        assert!(!deep_equal(&extra, &a));
        assert!(!deep_equal(&a, &other_class));
    }

    #[test]
    fn test_undefined_field_counts_as_absent() {
        let explicit = Value::record([("a", Value::from(1)), ("b", Value::Undefined)]);
        let absent = Value::record([("a", Value::from(1))]);
        assert!(deep_equal(&explicit, &absent));
        assert!(deep_equal(&absent, &explicit));

        let m1 = Value::map([(Value::from("k"), Value::Undefined)]);
        let m2 = Value::map(Vec::<(Value, Value)>::new());
        assert!(deep_equal(&m1, &m2));
    }

    #[test]
    fn test_null_is_not_undefined() {
        let a = Value::record([("a", Value::Null)]);
        let b = Value::record(Vec::<(&str, Value)>::new());
        assert!(!deep_equal(&a, &b));
    }

    #[test]
    fn test_kinds_do_not_mix() {
        let arr = Value::array(Vec::new());
        let rec = Value::record(Vec::<(&str, Value)>::new());
        let set = Value::set_of(Vec::new());
        assert!(!deep_equal(&arr, &rec));
        assert!(!deep_equal(&set, &arr));
    }

    #[test]
    fn test_dates_regexes_bytes_errors() {
        assert!(deep_equal(&Value::date(1_000), &Value::date(1_000)));
        assert!(!deep_equal(&Value::date(1_000), &Value::date(1_001)));

        assert!(deep_equal(&Value::regex("a+b", "gi"), &Value::regex("a+b", "ig")));
        assert!(!deep_equal(&Value::regex("a+b", "g"), &Value::regex("a+b", "")));

        assert!(deep_equal(&Value::bytes(vec![1u8, 2]), &Value::bytes(vec![1u8, 2])));
        assert!(!deep_equal(&Value::bytes(vec![1u8, 2]), &Value::bytes(vec![1u8, 3])));
        assert!(!deep_equal(&Value::bytes(vec![1u8]), &Value::bytes(vec![1u8, 0])));

        assert!(deep_equal(&Value::error("Error", "x"), &Value::error("Error", "x")));
        assert!(!deep_equal(&Value::error("Error", "x"), &Value::error("TypeError", "x")));
    }

    #[test]
    fn test_maps_are_order_insensitive() {
        let a = Value::map([
            (Value::from("a"), Value::from(1)),
            (Value::from("b"), Value::from(vec![2])),
        ]);
        let b = Value::map([
            (Value::from("b"), Value::from(vec![2])),
            (Value::from("a"), Value::from(1)),
        ]);
        let c = Value::map([
            (Value::from("a"), Value::from(1)),
            (Value::from("c"), Value::from(vec![2])),
        ]);
        assert!(deep_equal(&a, &b));
        assert!(!deep_equal(&a, &c));
    }

    #[test]
    fn test_map_object_keys_use_identity() {
        let key = Value::array([Value::from(1)]);
        let a = Value::map([(key.clone(), Value::from("v"))]);
        let same_key = Value::map([(key, Value::from("v"))]);
        let lookalike_key = Value::map([(Value::array([Value::from(1)]), Value::from("v"))]);
        assert!(deep_equal(&a, &same_key));
        assert!(!deep_equal(&a, &lookalike_key));
    }

    #[test]
    fn test_sets_match_one_to_one() {
        let a = Value::set_of([Value::from(vec![1]), Value::from(vec![2])]);
        let b = Value::set_of([Value::from(vec![2]), Value::from(vec![1])]);
        let dup = Value::set_of([Value::from(vec![1]), Value::from(vec![1])]);
        assert!(deep_equal(&a, &b));
        // Distinct references with equal contents may both live in a set;
        // each member of `a` needs its own partner.
        assert!(!deep_equal(&a, &dup));
        assert!(!deep_equal(&dup, &a));
    }

    #[test]
    fn test_functions_compare_by_identity() {
        let f = Value::function("f", |_| Value::Undefined.into());
        let g = Value::function("f", |_| Value::Undefined.into());
        assert!(deep_equal(&f, &f.clone()));
        assert!(!deep_equal(&f, &g));
    }

    #[test]
    fn test_deeply_shared_subgraph() {
        let shared = Value::from(vec![1, 2]);
        let a = Value::array([shared.clone(), shared.clone()]);
        let b = Value::array([Value::from(vec![1, 2]), shared]);
        assert!(deep_equal(&a, &b));
    }

    fn nested(depth: usize, leaf: i32) -> Value {
        let mut v = Value::from(leaf);
        for _ in 0..depth {
            v = Value::array([v]);
        }
        v
    }

    #[test]
    fn test_deep_nesting_does_not_exhaust_the_stack() {
        let a = nested(100_000, 1);
        assert!(deep_equal(&a, &nested(100_000, 1)));
        assert!(!deep_equal(&a, &nested(100_000, 2)));
        assert!(!deep_equal(&a, &nested(99_999, 1)));
    }

    #[test]
    fn test_deep_records_inside_sets() {
        let wrap = |v: Value| Value::record([("next", v)]);
        let mut a = Value::from("end");
        let mut b = Value::from("end");
        for _ in 0..50_000 {
            a = wrap(a);
            b = wrap(b);
        }
        let sa = Value::set_of([Value::from(1), a]);
        let sb = Value::set_of([b, Value::from(1)]);
        assert!(deep_equal(&sa, &sb));
    }
}
