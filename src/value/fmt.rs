//! Human-readable rendering of values, cycle-aware.

use std::collections::HashSet;
use std::fmt::{self, Write};

use super::{Composite, Object, Value};

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        render(self, f)
    }
}

/// Same as `Debug`, except top-level strings are written without quotes.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Str(s) => f.write_str(s),
            other => render(other, f),
        }
    }
}

/// A unit of pending output.
enum Piece {
    Text(&'static str),
    Key(String),
    Value(Value),
    /// Leaves the object at this address; it is no longer an ancestor.
    Leave(usize),
}

/// Writes `root` using an explicit work stack instead of recursion.
///
/// `open` holds the addresses of the objects currently being written; meeting
/// one of them again prints `[Circular]`.
fn render(root: &Value, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let mut work = vec![Piece::Value(root.clone())];
    let mut open = HashSet::new();
    while let Some(piece) = work.pop() {
        match piece {
            Piece::Text(s) => f.write_str(s)?,
            Piece::Key(s) => f.write_str(&s)?,
            Piece::Leave(addr) => {
                open.remove(&addr);
            }
            Piece::Value(v) => match v {
                Value::Undefined => f.write_str("undefined")?,
                Value::Null => f.write_str("null")?,
                Value::Bool(b) => write!(f, "{b}")?,
                Value::Number(n) => render_number(n, f)?,
                Value::Str(s) => write!(f, "{:?}", &*s)?,
                Value::Function(func) => write!(f, "[Function {}]", func.name())?,
                Value::Object(obj) => {
                    let addr = obj.addr();
                    if !open.insert(addr) {
                        f.write_str("[Circular]")?;
                        continue;
                    }
                    let mut pieces = vec![];
                    render_object(&obj, f, &mut pieces)?;
                    pieces.push(Piece::Leave(addr));
                    work.extend(pieces.into_iter().rev());
                }
            },
        }
    }
    Ok(())
}

fn render_number(n: f64, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    if n.is_nan() {
        f.write_str("NaN")
    } else if n.is_infinite() {
        f.write_str(if n > 0.0 { "Infinity" } else { "-Infinity" })
    } else if n.fract() == 0.0 && n.abs() < 1e15 {
        write!(f, "{}", n as i64)
    } else {
        write!(f, "{n}")
    }
}

/// Writes scalar composites directly; containers are laid out as `pieces`
/// in output order.
fn render_object(
    obj: &Object,
    f: &mut fmt::Formatter<'_>,
    pieces: &mut Vec<Piece>,
) -> fmt::Result {
    let items = |pieces: &mut Vec<Piece>, values: Vec<Value>| {
        for (i, v) in values.into_iter().enumerate() {
            if i > 0 {
                pieces.push(Piece::Text(", "));
            }
            pieces.push(Piece::Value(v));
        }
    };
    match obj.snapshot() {
        Composite::Record { class, fields } => {
            if &*class != "Object" {
                write!(f, "{class} ")?;
            }
            if fields.is_empty() {
                return f.write_str("{}");
            }
            pieces.push(Piece::Text("{ "));
            for (i, (k, v)) in fields.into_iter().enumerate() {
                let sep = if i > 0 { ", " } else { "" };
                pieces.push(Piece::Key(format!("{sep}{k}: ")));
                pieces.push(Piece::Value(v));
            }
            pieces.push(Piece::Text(" }"));
        }
        Composite::Array(values) => {
            pieces.push(Piece::Text("["));
            items(pieces, values);
            pieces.push(Piece::Text("]"));
        }
        Composite::Map(entries) => {
            if entries.is_empty() {
                return f.write_str("Map {}");
            }
            pieces.push(Piece::Text("Map { "));
            for (i, (k, v)) in entries.into_iter().enumerate() {
                if i > 0 {
                    pieces.push(Piece::Text(", "));
                }
                pieces.push(Piece::Value(k));
                pieces.push(Piece::Text(" => "));
                pieces.push(Piece::Value(v));
            }
            pieces.push(Piece::Text(" }"));
        }
        Composite::Set(values) => {
            if values.is_empty() {
                return f.write_str("Set {}");
            }
            pieces.push(Piece::Text("Set { "));
            items(pieces, values);
            pieces.push(Piece::Text(" }"));
        }
        Composite::Date(ms) => write!(f, "Date({ms})")?,
        Composite::Regex { source, flags } => write!(f, "/{source}/{flags}")?,
        Composite::Bytes(bytes) => {
            f.write_str("Bytes <")?;
            for (i, b) in bytes.iter().enumerate() {
                if i > 0 {
                    f.write_char(' ')?;
                }
                write!(f, "{b:02x}")?;
            }
            f.write_char('>')?;
        }
        Composite::Error { name, message } => write!(f, "{name}: {message}")?,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_primitives() {
        assert_eq!(format!("{:?}", Value::from(2)), "2");
        assert_eq!(format!("{:?}", Value::from(2.5)), "2.5");
        assert_eq!(format!("{:?}", Value::from(f64::NAN)), "NaN");
        assert_eq!(format!("{:?}", Value::from("hi")), "\"hi\"");
        assert_eq!(format!("{}", Value::from("hi")), "hi");
        assert_eq!(format!("{:?}", Value::Undefined), "undefined");
    }

    #[test]
    fn test_render_composites() {
        let v = Value::instance(
            "Point",
            [("x", Value::from(1)), ("tags", Value::array([Value::from("a")]))],
        );
        assert_eq!(format!("{v:?}"), "Point { x: 1, tags: [\"a\"] }");
        assert_eq!(format!("{:?}", Value::regex("a+", "ig")), "/a+/gi");
        assert_eq!(format!("{:?}", Value::bytes(vec![1u8, 255])), "Bytes <01 ff>");
        assert_eq!(format!("{}", Value::error("Error", "x")), "Error: x");
        assert_eq!(format!("{:?}", Value::map(Vec::<(Value, Value)>::new())), "Map {}");
    }

    #[test]
    fn test_shared_but_acyclic_is_not_circular() {
        let leaf = Value::array([Value::from(1)]);
        let v = Value::array([leaf.clone(), leaf]);
        assert_eq!(format!("{v:?}"), "[[1], [1]]");
    }

    #[test]
    fn test_render_cycle_through_map() {
        let m = Value::map(Vec::<(Value, Value)>::new());
        if let Some(obj) = m.as_object() {
            obj.map_insert(Value::from("self"), m.clone());
        }
        assert_eq!(format!("{m:?}"), "Map { \"self\" => [Circular] }");
    }

    #[test]
    fn test_render_deep_nesting() {
        let mut v = Value::from(7);
        for _ in 0..100_000 {
            v = Value::array([v]);
        }
        let out = format!("{v:?}");
        assert_eq!(out.len(), 200_001);
        assert!(out.starts_with("[[[["));
        assert!(out.contains("[7]"));
    }
}
