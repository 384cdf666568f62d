use alloc::{boxed::Box, format, sync::Arc};
use parking_lot::Mutex;
use tracing::debug;

use crate::{any::Value, args::Args, callable::Callable, errors::InstantiateErrorKind, signature::Signature};

/// Protects a callable from being auto-invoked on retrieval: binding the
/// returned value stores the callable as data, and `get` hands it back
/// unchanged.
#[inline]
#[must_use]
pub fn protect(callable: Callable) -> Value {
    Value::new(callable)
}

/// A wrapper that calls `make(concrete, args)` fresh on every invocation,
/// against the container doing the retrieval.
#[must_use]
pub fn factory(concrete: impl Into<Box<str>>, args: Args) -> Callable {
    let concrete = concrete.into();
    let signature = Signature::new(format!("factory({concrete})"), []);
    Callable::with_container(signature, move |container, _| {
        container.make(&concrete, args.clone()).map_err(InstantiateErrorKind::from)
    })
}

/// A wrapper that invokes `callable` on first call only and returns the
/// memoized result afterwards.
///
/// The memo slot distinguishes "not yet computed" by presence, not by the
/// computed value, so zero-like results are memoized like any other and the
/// wrapped callable runs exactly once. The slot's lock is held across
/// compute-then-cache; a wrapper that retrieves itself recursively is a
/// caller error.
#[must_use]
pub fn once(callable: Callable, args: Args) -> Callable {
    let memo: Arc<Mutex<Option<Value>>> = Arc::new(Mutex::new(None));
    let signature = Signature::new(format!("once({})", callable.signature().name()), []);
    Callable::with_container(signature, move |container, _| {
        let mut guard = memo.lock();
        if let Some(value) = &*guard {
            debug!("memoized result reused");
            return Ok(value.clone());
        }
        let value = container
            .invoke_callable(&callable, args.clone(), 0)
            .map_err(InstantiateErrorKind::from)?;
        *guard = Some(value.clone());
        Ok(value)
    })
}

/// A lazily-built singleton: `once(factory(concrete, args))`.
#[must_use]
pub fn one(concrete: impl Into<Box<str>>, args: Args) -> Callable {
    once(factory(concrete, args), Args::new())
}
