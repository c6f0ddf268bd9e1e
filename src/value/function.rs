use std::sync::Arc;

use super::{Outcome, Value};

type NativeFn = dyn Fn(Vec<Value>) -> Outcome + Send + Sync;

/// Shared callable with reference identity.
///
/// Clones point at the same closure, so `ptr_eq` survives cloning; this is
/// what lets a restored spy put back the *exact* original method.
#[derive(Clone)]
pub struct Function {
    name: Arc<str>,
    call: Arc<NativeFn>,
}

impl Function {
    pub fn new<F>(name: impl Into<Arc<str>>, f: F) -> Self
    where
        F: Fn(Vec<Value>) -> Outcome + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            call: Arc::new(f),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn call(&self, args: Vec<Value>) -> Outcome {
        (self.call)(args)
    }

    #[inline]
    pub fn ptr_eq(&self, other: &Function) -> bool {
        // Compare data pointers only; vtable pointers may differ across codegen units.
        std::ptr::eq(
            Arc::as_ptr(&self.call) as *const (),
            Arc::as_ptr(&other.call) as *const (),
        )
    }
}
