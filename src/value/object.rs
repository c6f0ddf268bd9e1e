use std::sync::Arc;

use parking_lot::Mutex;

use super::Value;

/// Concrete composite kinds.
///
/// Two objects of different kinds are never deep-equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    Record,
    Array,
    Map,
    Set,
    Date,
    Regex,
    Bytes,
    Error,
}

impl Kind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Kind::Record => "object",
            Kind::Array => "array",
            Kind::Map => "map",
            Kind::Set => "set",
            Kind::Date => "date",
            Kind::Regex => "regex",
            Kind::Bytes => "bytes",
            Kind::Error => "error",
        }
    }
}

/// Payload behind an [`Object`] reference.
///
/// Cloning a composite is shallow: nested values are reference clones.
#[derive(Clone)]
pub enum Composite {
    /// Ordered own fields; `class` plays the role of a prototype.
    Record {
        class: Arc<str>,
        fields: Vec<(Arc<str>, Value)>,
    },
    Array(Vec<Value>),
    /// Insertion-ordered entries, keys unique under same-value-zero.
    Map(Vec<(Value, Value)>),
    /// Insertion-ordered members, unique under same-value-zero.
    Set(Vec<Value>),
    /// Milliseconds since the Unix epoch.
    Date(i64),
    /// `flags` are kept sorted and deduplicated.
    Regex { source: Arc<str>, flags: Arc<str> },
    Bytes(Vec<u8>),
    Error { name: Arc<str>, message: Arc<str> },
}

impl Composite {
    pub fn kind(&self) -> Kind {
        match self {
            Composite::Record { .. } => Kind::Record,
            Composite::Array(_) => Kind::Array,
            Composite::Map(_) => Kind::Map,
            Composite::Set(_) => Kind::Set,
            Composite::Date(_) => Kind::Date,
            Composite::Regex { .. } => Kind::Regex,
            Composite::Bytes(_) => Kind::Bytes,
            Composite::Error { .. } => Kind::Error,
        }
    }

    /// Moves out every nested value, leaving the containers empty.
    fn take_children(&mut self) -> Vec<Value> {
        match self {
            Composite::Record { fields, .. } => {
                std::mem::take(fields).into_iter().map(|(_, v)| v).collect()
            }
            Composite::Array(items) | Composite::Set(items) => std::mem::take(items),
            Composite::Map(entries) => std::mem::take(entries)
                .into_iter()
                .flat_map(|(k, v)| [k, v])
                .collect(),
            Composite::Date(_)
            | Composite::Regex { .. }
            | Composite::Bytes(_)
            | Composite::Error { .. } => Vec::new(),
        }
    }
}

/// Shared, mutable composite with reference identity.
#[derive(Clone)]
pub struct Object(Arc<Mutex<Composite>>);

impl Object {
    pub fn new(composite: Composite) -> Self {
        Self(Arc::new(Mutex::new(composite)))
    }

    /// True if both handles point at the same composite.
    #[inline]
    pub fn ptr_eq(&self, other: &Object) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    /// Stable address used as an identity key while traversing graphs.
    #[inline]
    pub(crate) fn addr(&self) -> usize {
        Arc::as_ptr(&self.0) as *const () as usize
    }

    pub fn kind(&self) -> Kind {
        self.0.lock().kind()
    }

    /// Shallow copy of the payload.
    ///
    /// The lock is released before returning, so callers may recurse into
    /// nested values (including back into `self`) without deadlocking.
    pub fn snapshot(&self) -> Composite {
        self.0.lock().clone()
    }

    /// Runs `f` with exclusive access to the payload.
    ///
    /// `f` must not touch this same object again (the lock is not reentrant).
    pub fn update<R>(&self, f: impl FnOnce(&mut Composite) -> R) -> R {
        f(&mut self.0.lock())
    }

    /// Number of fields, elements, entries or bytes; `0` for scalar composites.
    pub fn len(&self) -> usize {
        match &*self.0.lock() {
            Composite::Record { fields, .. } => fields.len(),
            Composite::Array(items) | Composite::Set(items) => items.len(),
            Composite::Map(entries) => entries.len(),
            Composite::Bytes(b) => b.len(),
            Composite::Date(_) | Composite::Regex { .. } | Composite::Error { .. } => 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Record field lookup.
    pub fn get(&self, key: &str) -> Option<Value> {
        match &*self.0.lock() {
            Composite::Record { fields, .. } => fields
                .iter()
                .find(|(k, _)| &**k == key)
                .map(|(_, v)| v.clone()),
            _ => None,
        }
    }

    /// Record field write; returns the replaced value, `None` if the field was
    /// new or `self` is not a record.
    pub fn set(&self, key: impl Into<Arc<str>>, value: Value) -> Option<Value> {
        let key = key.into();
        match &mut *self.0.lock() {
            Composite::Record { fields, .. } => {
                match fields.iter_mut().find(|(k, _)| *k == key) {
                    Some(slot) => Some(std::mem::replace(&mut slot.1, value)),
                    None => {
                        fields.push((key, value));
                        None
                    }
                }
            }
            _ => None,
        }
    }

    /// Removes a record field.
    pub fn remove(&self, key: &str) -> Option<Value> {
        match &mut *self.0.lock() {
            Composite::Record { fields, .. } => {
                let idx = fields.iter().position(|(k, _)| &**k == key)?;
                Some(fields.remove(idx).1)
            }
            _ => None,
        }
    }

    /// Appends to an array; ignored for other kinds.
    pub fn push(&self, value: Value) {
        if let Composite::Array(items) = &mut *self.0.lock() {
            items.push(value);
        }
    }

    /// Inserts or overwrites a map entry; ignored for other kinds.
    pub fn map_insert(&self, key: Value, value: Value) {
        if let Composite::Map(entries) = &mut *self.0.lock() {
            match entries.iter_mut().find(|(k, _)| k.same_value_zero(&key)) {
                Some(slot) => slot.1 = value,
                None => entries.push((key, value)),
            }
        }
    }

    /// Adds a set member unless already present; ignored for other kinds.
    pub fn set_add(&self, value: Value) {
        if let Composite::Set(items) = &mut *self.0.lock() {
            if !items.iter().any(|v| v.same_value_zero(&value)) {
                items.push(value);
            }
        }
    }

    /// `name` of an error object.
    pub fn error_name(&self) -> Option<Arc<str>> {
        match &*self.0.lock() {
            Composite::Error { name, .. } => Some(name.clone()),
            _ => None,
        }
    }

    /// `message` of an error object.
    pub fn error_message(&self) -> Option<Arc<str>> {
        match &*self.0.lock() {
            Composite::Error { message, .. } => Some(message.clone()),
            _ => None,
        }
    }
}

/// Unlinks uniquely owned descendants one level at a time, so releasing a
/// deeply nested value does not recurse once per level.
impl Drop for Object {
    fn drop(&mut self) {
        let Some(cell) = Arc::get_mut(&mut self.0) else {
            return;
        };
        let mut orphans = cell.get_mut().take_children();
        while let Some(value) = orphans.pop() {
            if let Value::Object(mut obj) = value {
                if let Some(cell) = Arc::get_mut(&mut obj.0) {
                    orphans.append(&mut cell.get_mut().take_children());
                }
            }
        }
    }
}

/// Sorted, deduplicated regex flags (`"gi"` and `"ig"` are the same pattern).
pub(crate) fn normalize_flags(flags: &str) -> Arc<str> {
    let mut chars: Vec<char> = flags.chars().collect();
    chars.sort_unstable();
    chars.dedup();
    Arc::from(chars.into_iter().collect::<String>())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_flags() {
        assert_eq!(&*normalize_flags("mgi"), "gim");
        assert_eq!(&*normalize_flags("gg"), "g");
        assert_eq!(&*normalize_flags(""), "");
    }

    #[test]
    fn test_remove_field() {
        let obj = Object::new(Composite::Record {
            class: Arc::from("Object"),
            fields: vec![(Arc::from("a"), Value::from(1))],
        });
        assert!(obj.remove("a").is_some());
        assert!(obj.remove("a").is_none());
        assert!(obj.is_empty());
    }

    #[test]
    fn test_dropping_a_deep_chain() {
        let mut v = Value::from(0);
        for _ in 0..200_000 {
            v = Value::record([("next", v)]);
        }
        let kept = v.clone();
        drop(v);
        assert_eq!(kept.as_object().map(Object::len), Some(1));
        drop(kept);
    }

    #[test]
    fn test_snapshot_releases_lock() {
        let obj = Object::new(Composite::Array(Vec::new()));
        obj.push(Value::Object(obj.clone()));
        if let Composite::Array(items) = obj.snapshot() {
            // Re-entering the same object while holding a snapshot must not deadlock.
            assert_eq!(items[0].as_object().map(Object::len), Some(1));
        }
    }
}
