use alloc::{boxed::Box, sync::Arc};
use core::fmt::{self, Debug, Formatter};
use parking_lot::Mutex;
use tracing::{debug, error, info_span};

use crate::{
    any::Value,
    args::Args,
    binding::{BindingTable, Entry},
    callable::{Callable, InvokeTarget, ResolvedArgs},
    contracts::Lookup,
    errors::ResolveErrorKind,
    registry::Registry,
    resolver::resolve_params,
};

/// Bound on recursive auto-build (step 5 of the resolution policy), so
/// mutually dependent concretes fail with a diagnosable error instead of
/// overflowing the stack.
pub const MAX_BUILD_DEPTH: usize = 32;

/// The dependency-injection container.
///
/// A `Container` is a cheap handle over shared state: clones observe the
/// same binding table, internal table and delegate slot. It resolves string
/// identifiers to bound values, auto-invokes bound callables through the
/// resolver, builds registered concretes with autowired constructor
/// parameters, and optionally delegates lookups to another [`Lookup`].
#[derive(Clone)]
pub struct Container {
    inner: Arc<ContainerInner>,
}

struct ContainerInner {
    bindings: Mutex<BindingTable>,
    internals: Mutex<BindingTable>,
    registry: Arc<Registry>,
    delegate: Mutex<Option<Arc<dyn Lookup>>>,
}

impl Container {
    /// Identifier under which every container registers itself at
    /// construction, so constructors can declare a container-typed parameter
    /// and have it autowired.
    pub const ID: &'static str = "container";

    #[must_use]
    pub fn new(registry: Registry) -> Self {
        let container = Self {
            inner: Arc::new(ContainerInner {
                bindings: Mutex::new(BindingTable::default()),
                internals: Mutex::new(BindingTable::default()),
                registry: Arc::new(registry),
                delegate: Mutex::new(None),
            }),
        };
        container.inner.bindings.lock().set(Self::ID, Entry::SelfRef);
        container
    }

    #[inline]
    #[must_use]
    pub fn registry(&self) -> &Registry {
        &self.inner.registry
    }

    /// Binds the abstract to a raw value; unconditional overwrite.
    pub fn set(&self, id: impl Into<Box<str>>, value: Value) {
        self.inner.bindings.lock().set(id, Entry::Value(value));
    }

    /// Binds the abstract to a callable that is invoked through the resolver
    /// on every retrieval. Wrap with [`crate::protect`] to store a callable
    /// as data instead.
    pub fn set_callable(&self, id: impl Into<Box<str>>, callable: Callable) {
        self.inner.bindings.lock().set(id, Entry::Callable(callable));
    }

    /// True only for a present binding under a non-empty identifier. Never
    /// consults the delegate.
    #[must_use]
    pub fn has(&self, id: &str) -> bool {
        self.inner.bindings.lock().has(id)
    }

    pub fn unset(&self, id: &str) {
        self.inner.bindings.lock().unset(id);
    }

    pub fn get(&self, id: &str) -> Result<Value, ResolveErrorKind> {
        self.get_with(id, Args::new())
    }

    /// Retrieves the entry bound to `id`. Raw values are returned unchanged;
    /// callable entries are invoked with `args` and the result returned —
    /// repeated calls re-invoke every time unless the callable is a
    /// [`crate::once`] wrapper.
    pub fn get_with(&self, id: &str, args: Args) -> Result<Value, ResolveErrorKind> {
        let span = info_span!("get", id);
        let _guard = span.enter();

        let Some(entry) = self.inner.bindings.lock().get(id).cloned() else {
            let err = ResolveErrorKind::NotFound { id: id.into() };
            error!("{}", err);
            return Err(err);
        };
        debug!("found in bindings");

        self.retrieve(entry, args)
    }

    /// Finds the abstract via the active delegate, falling back to
    /// [`Self::build`]. Bound abstracts take priority over ad-hoc
    /// construction.
    pub fn make(&self, abstract_id: &str, args: Args) -> Result<Value, ResolveErrorKind> {
        let span = info_span!("make", abstract_id);
        let _guard = span.enter();

        if abstract_id.is_empty() {
            let err = ResolveErrorKind::InvalidArgument { id: abstract_id.into() };
            error!("{}", err);
            return Err(err);
        }

        if self.delegate_has(abstract_id) {
            debug!("found via delegate lookup");
            return self.delegate_get(abstract_id, args);
        }

        self.build(abstract_id, args)
    }

    /// Constructs a new instance of a registered concrete, bypassing the
    /// binding table. Constructor parameters are resolved through the same
    /// policy as callables; constructor errors propagate to the caller.
    pub fn build(&self, concrete: &str, args: Args) -> Result<Value, ResolveErrorKind> {
        self.build_at_depth(concrete, args, 0)
    }

    pub(crate) fn build_at_depth(&self, concrete: &str, mut args: Args, depth: usize) -> Result<Value, ResolveErrorKind> {
        let span = info_span!("build", concrete, depth);
        let _guard = span.enter();

        if concrete.is_empty() {
            let err = ResolveErrorKind::InvalidArgument { id: concrete.into() };
            error!("{}", err);
            return Err(err);
        }
        if depth >= MAX_BUILD_DEPTH {
            let err = ResolveErrorKind::BuildDepthExceeded {
                id: concrete.into(),
                limit: MAX_BUILD_DEPTH,
            };
            error!("{}", err);
            return Err(err);
        }

        let Some(constructor) = self.inner.registry.constructor(concrete).cloned() else {
            let err = ResolveErrorKind::UnknownConcrete { id: concrete.into() };
            error!("{}", err);
            return Err(err);
        };

        let values = resolve_params(self, &constructor.signature, &mut args, depth)?;
        match (constructor.body)(self, ResolvedArgs::new(values)) {
            Ok(value) => {
                debug!(provides = constructor.provides.name, "constructed");
                Ok(value)
            }
            Err(err) => {
                error!("{}", err);
                Err(err.into())
            }
        }
    }

    /// Invokes a callable target with autowired arguments.
    ///
    /// Accepts a [`Callable`] value, a `"Type::method"` or `"function"`
    /// string reference, or a `(Value, method)` pair. For a `Type::method`
    /// reference the receiver is produced via [`Self::make`].
    pub fn invoke(&self, target: impl Into<InvokeTarget>, args: Args) -> Result<Value, ResolveErrorKind> {
        match target.into() {
            InvokeTarget::Callable(callable) => {
                let span = info_span!("invoke", callable = callable.signature().name());
                let _guard = span.enter();
                self.invoke_callable(&callable, args, 0)
            }
            InvokeTarget::Reference(reference) => self.invoke_reference(&reference, args),
            InvokeTarget::Bound(receiver, method) => self.invoke_bound(receiver, &method, args),
        }
    }

    pub(crate) fn invoke_callable(&self, callable: &Callable, mut args: Args, depth: usize) -> Result<Value, ResolveErrorKind> {
        let values = resolve_params(self, callable.signature(), &mut args, depth)?;
        match callable.call(self, values) {
            Ok(value) => Ok(value),
            Err(err) => {
                error!(callable = callable.signature().name(), "{}", err);
                Err(err.into())
            }
        }
    }

    fn invoke_reference(&self, reference: &str, args: Args) -> Result<Value, ResolveErrorKind> {
        let span = info_span!("invoke", reference);
        let _guard = span.enter();

        match reference.split_once("::") {
            Some((type_id, method)) => {
                if type_id.is_empty() || method.is_empty() {
                    let err = ResolveErrorKind::MalformedCallable {
                        reference: reference.into(),
                    };
                    error!("{}", err);
                    return Err(err);
                }
                let receiver = self.make(type_id, Args::new())?;
                self.call_method(type_id, method, receiver, args)
            }
            None => {
                let Some(function) = self.inner.registry.function(reference).cloned() else {
                    let err = ResolveErrorKind::UnknownFunction { name: reference.into() };
                    error!("{}", err);
                    return Err(err);
                };
                self.invoke_callable(&function, args, 0)
            }
        }
    }

    fn invoke_bound(&self, receiver: Value, method: &str, args: Args) -> Result<Value, ResolveErrorKind> {
        let span = info_span!("invoke", method, receiver = receiver.type_info().name);
        let _guard = span.enter();

        let Some(type_id) = self.inner.registry.id_of(receiver.type_info().id).map(Box::<str>::from) else {
            let err = ResolveErrorKind::UnknownReceiver {
                actual: receiver.type_info(),
            };
            error!("{}", err);
            return Err(err);
        };
        self.call_method(&type_id, method, receiver, args)
    }

    fn call_method(&self, type_id: &str, method: &str, receiver: Value, mut args: Args) -> Result<Value, ResolveErrorKind> {
        let Some(method_entry) = self.inner.registry.method(type_id, method).cloned() else {
            let err = ResolveErrorKind::UnknownMethod {
                id: type_id.into(),
                method: method.into(),
            };
            error!("{}", err);
            return Err(err);
        };

        let values = resolve_params(self, &method_entry.signature, &mut args, 0)?;
        match (method_entry.body)(self, receiver, ResolvedArgs::new(values)) {
            Ok(value) => Ok(value),
            Err(err) => {
                error!(method = method_entry.signature.name(), "{}", err);
                Err(err.into())
            }
        }
    }

    /// Replaces the active delegate. A container not explicitly delegated
    /// delegates to itself.
    pub fn delegate(&self, lookup: impl Lookup + 'static) {
        *self.inner.delegate.lock() = Some(Arc::new(lookup));
    }

    pub(crate) fn delegate_has(&self, id: &str) -> bool {
        let delegate = self.inner.delegate.lock().clone();
        match delegate {
            Some(delegate) => delegate.has(id),
            None => self.has(id),
        }
    }

    pub(crate) fn delegate_get(&self, id: &str, args: Args) -> Result<Value, ResolveErrorKind> {
        let delegate = self.inner.delegate.lock().clone();
        match delegate {
            Some(delegate) => delegate.get_with(id, args),
            None => self.get_with(id, args),
        }
    }

    #[inline]
    pub(crate) fn is_constructible(&self, id: &str) -> bool {
        self.inner.registry.is_constructible(id)
    }

    /// Stores an instance-scoped value in the internal table, a namespace
    /// independent of the bindings.
    pub fn set_internal(&self, id: impl Into<Box<str>>, value: Value) {
        self.inner.internals.lock().set(id, Entry::Value(value));
    }

    /// Internal entries may be callables too; they are auto-invoked on
    /// retrieval just like bindings.
    pub fn set_internal_callable(&self, id: impl Into<Box<str>>, callable: Callable) {
        self.inner.internals.lock().set(id, Entry::Callable(callable));
    }

    #[must_use]
    pub fn has_internal(&self, id: &str) -> bool {
        self.inner.internals.lock().has(id)
    }

    pub fn get_internal(&self, id: &str) -> Result<Value, ResolveErrorKind> {
        let span = info_span!("get_internal", id);
        let _guard = span.enter();

        let Some(entry) = self.inner.internals.lock().get(id).cloned() else {
            let err = ResolveErrorKind::InternalNotFound { id: id.into() };
            error!("{}", err);
            return Err(err);
        };
        self.retrieve(entry, Args::new())
    }

    pub fn remove_internal(&self, id: &str) {
        self.inner.internals.lock().unset(id);
    }

    fn retrieve(&self, entry: Entry, args: Args) -> Result<Value, ResolveErrorKind> {
        match entry {
            Entry::Value(value) => Ok(value),
            Entry::Callable(callable) => self.invoke_callable(&callable, args, 0),
            Entry::SelfRef => Ok(Value::new(self.clone())),
        }
    }

    /// True when both handles share the same underlying container state.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Default for Container {
    fn default() -> Self {
        Self::new(Registry::default())
    }
}

impl Lookup for Container {
    fn has(&self, id: &str) -> bool {
        Container::has(self, id)
    }

    fn get_with(&self, id: &str, args: Args) -> Result<Value, ResolveErrorKind> {
        Container::get_with(self, id, args)
    }
}

impl Debug for Container {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Container")
            .field("constructibles", &self.inner.registry.constructible_ids())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::{Container, MAX_BUILD_DEPTH};
    use crate::{
        any::Value,
        args::Args,
        callable::Callable,
        errors::{InstantiateErrorKind, ResolveErrorKind},
        lifecycle::{factory, once, one, protect},
        registry::RegistryBuilder,
        signature::{Param, Signature},
    };

    use alloc::{
        format,
        string::{String, ToString as _},
        sync::Arc,
    };
    use core::sync::atomic::{AtomicU8, Ordering};
    use tracing_test::traced_test;

    struct Engine;
    struct Car {
        engine: Arc<Engine>,
    }

    fn car_registry() -> RegistryBuilder {
        RegistryBuilder::new()
            .register::<Engine, _>("Engine", [], |_| Ok(Engine))
            .register::<Car, _>("Car", [Param::typed("engine", "Engine")], |mut args| {
                Ok(Car {
                    engine: args.take::<Engine>()?,
                })
            })
    }

    #[test]
    #[traced_test]
    fn test_retrieve_scalar() {
        let container = Container::default();
        container.set("scalar", Value::new("test string"));

        assert!(container.has("scalar"));
        let value = container.get("scalar").unwrap();
        assert_eq!(*value.downcast::<&str>().unwrap(), "test string");
    }

    #[test]
    #[traced_test]
    fn test_not_found() {
        let container = Container::default();

        let err = container.get("whatever").unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    #[traced_test]
    fn test_unset() {
        let container = Container::default();
        container.set("frog", Value::new(1i32));
        assert!(container.has("frog"));

        container.unset("frog");
        assert!(!container.has("frog"));
        assert!(container.get("frog").unwrap_err().is_not_found());
    }

    #[test]
    #[traced_test]
    fn test_callable_binding_reinvoked_every_time() {
        let call_count = Arc::new(AtomicU8::new(0));
        let container = Container::default();

        container.set_callable("counter", {
            let call_count = call_count.clone();
            Callable::new(Signature::new("counter", []), move |_| {
                call_count.fetch_add(1, Ordering::SeqCst);
                Ok(Value::new(()))
            })
        });

        for _ in 0..3 {
            container.get("counter").unwrap();
        }
        assert_eq!(call_count.load(Ordering::SeqCst), 3);
    }

    #[test]
    #[traced_test]
    fn test_protect() {
        let call_count = Arc::new(AtomicU8::new(0));
        let callable = {
            let call_count = call_count.clone();
            Callable::new(Signature::new("guarded", []), move |_| {
                call_count.fetch_add(1, Ordering::SeqCst);
                Ok(Value::new(()))
            })
        };

        let container = Container::default();
        container.set("guarded", protect(callable));

        let value = container.get("guarded").unwrap();
        let restored = value.downcast::<Callable>().unwrap();
        assert_eq!(restored.signature().name(), "guarded");
        assert_eq!(call_count.load(Ordering::SeqCst), 0);
    }

    #[test]
    #[traced_test]
    fn test_factory_returns_distinct_instances() {
        let container = Container::new(car_registry().build());
        container.set_callable("engine.factory", factory("Engine", Args::new()));

        let mut last = container.get("engine.factory").unwrap().downcast::<Engine>().unwrap();
        for _ in 0..5 {
            let current = container.get("engine.factory").unwrap().downcast::<Engine>().unwrap();
            assert!(!Arc::ptr_eq(&last, &current));
            last = current;
        }
    }

    #[test]
    #[traced_test]
    fn test_once_invokes_exactly_once() {
        let call_count = Arc::new(AtomicU8::new(0));
        let callable = {
            let call_count = call_count.clone();
            Callable::new(Signature::new("expensive", []), move |_| {
                call_count.fetch_add(1, Ordering::SeqCst);
                Ok(Value::new(Engine))
            })
        };

        let container = Container::default();
        container.set_callable("once", once(callable, Args::new()));

        let first = container.get("once").unwrap().downcast::<Engine>().unwrap();
        for _ in 0..5 {
            let current = container.get("once").unwrap().downcast::<Engine>().unwrap();
            assert!(Arc::ptr_eq(&first, &current));
        }
        assert_eq!(call_count.load(Ordering::SeqCst), 1);
    }

    #[test]
    #[traced_test]
    fn test_once_memoizes_zero_like_results() {
        let call_count = Arc::new(AtomicU8::new(0));
        let callable = {
            let call_count = call_count.clone();
            Callable::new(Signature::new("zero", []), move |_| {
                call_count.fetch_add(1, Ordering::SeqCst);
                Ok(Value::new(0i32))
            })
        };

        let container = Container::default();
        container.set_callable("zero", once(callable, Args::new()));

        for _ in 0..3 {
            assert_eq!(*container.get("zero").unwrap().downcast::<i32>().unwrap(), 0);
        }
        assert_eq!(call_count.load(Ordering::SeqCst), 1);
    }

    #[test]
    #[traced_test]
    fn test_one_is_a_lazy_singleton() {
        let container = Container::new(car_registry().build());
        container.set_callable("engine", one("Engine", Args::new()));

        let first = container.get("engine").unwrap().downcast::<Engine>().unwrap();
        for _ in 0..5 {
            let current = container.get("engine").unwrap().downcast::<Engine>().unwrap();
            assert!(Arc::ptr_eq(&first, &current));
        }
    }

    #[test]
    #[traced_test]
    fn test_auto_build_fresh_instance_each_call() {
        let container = Container::new(car_registry().build());

        let first = container.make("Engine", Args::new()).unwrap().downcast::<Engine>().unwrap();
        let second = container.make("Engine", Args::new()).unwrap().downcast::<Engine>().unwrap();
        assert!(!Arc::ptr_eq(&first, &second));
    }

    #[test]
    #[traced_test]
    fn test_make_prefers_binding_over_build() {
        let container = Container::new(car_registry().build());
        let shared = Arc::new(Engine);
        container.set("Engine", Value::from_shared(shared.clone()));

        let resolved = container.make("Engine", Args::new()).unwrap().downcast::<Engine>().unwrap();
        assert!(Arc::ptr_eq(&shared, &resolved));

        let car = container.build("Car", Args::new()).unwrap().downcast::<Car>().unwrap();
        assert!(Arc::ptr_eq(&shared, &car.engine));
    }

    #[test]
    #[traced_test]
    fn test_build_unknown_concrete() {
        let container = Container::default();

        assert!(matches!(
            container.build("Ghost", Args::new()),
            Err(ResolveErrorKind::UnknownConcrete { .. })
        ));
        assert!(matches!(
            container.build("", Args::new()),
            Err(ResolveErrorKind::InvalidArgument { .. })
        ));
    }

    #[test]
    #[traced_test]
    fn test_constructor_failure_propagates() {
        let registry = RegistryBuilder::new()
            .register::<Engine, _>("Engine", [], |_| Err(anyhow::anyhow!("ignition jammed").into()))
            .build();
        let container = Container::new(registry);

        let err = container.build("Engine", Args::new()).unwrap_err();
        let ResolveErrorKind::Instantiate(InstantiateErrorKind::Custom(err)) = err else {
            panic!("expected the constructor failure to surface unmodified");
        };
        assert_eq!(err.to_string(), "ignition jammed");
    }

    #[test]
    #[traced_test]
    fn test_bound_callable_failure_propagates() {
        let container = Container::default();
        container.set_callable(
            "faulty",
            Callable::new(Signature::new("faulty", []), |_| Err(anyhow::anyhow!("croaked").into())),
        );

        let err = container.get("faulty").unwrap_err();
        let ResolveErrorKind::Instantiate(InstantiateErrorKind::Custom(err)) = err else {
            panic!("expected the callable failure to surface unmodified");
        };
        assert_eq!(err.to_string(), "croaked");
    }

    #[test]
    #[traced_test]
    fn test_build_depth_guard() {
        struct Yin;
        struct Yang;

        let registry = RegistryBuilder::new()
            .register::<Yin, _>("Yin", [Param::typed("yang", "Yang")], |_| Ok(Yin))
            .register::<Yang, _>("Yang", [Param::typed("yin", "Yin")], |_| Ok(Yang))
            .build();
        let container = Container::new(registry);

        assert!(matches!(
            container.build("Yin", Args::new()),
            Err(ResolveErrorKind::BuildDepthExceeded { limit: MAX_BUILD_DEPTH, .. })
        ));
    }

    #[test]
    #[traced_test]
    fn test_delegation() {
        let target = Container::default();
        let shared = Arc::new(Engine);
        target.set("Engine", Value::from_shared(shared.clone()));

        let container = Container::default();
        container.set_callable(
            "something",
            Callable::new(Signature::new("something", [Param::typed("engine", "Engine")]), |mut args| {
                Ok(Value::from_shared(args.take::<Engine>()?))
            }),
        );

        // before delegation the untyped container cannot satisfy `Engine`
        assert!(container.get("something").is_err());

        container.delegate(target);
        let resolved = container.get("something").unwrap().downcast::<Engine>().unwrap();
        assert!(Arc::ptr_eq(&shared, &resolved));
    }

    #[test]
    #[traced_test]
    fn test_invoke_with_default_value() {
        let container = Container::default();
        let callable = Callable::new(
            Signature::new("ribbit", [Param::new("frog").with_default("toad")]),
            |mut args| Ok(Value::from_shared(args.take::<&str>()?)),
        );

        let value = container.invoke(callable, Args::new()).unwrap();
        assert_eq!(*value.downcast::<&str>().unwrap(), "toad");
    }

    #[test]
    #[traced_test]
    fn test_invoke_with_named_argument() {
        let container = Container::default();
        let callable = Callable::new(Signature::new("ribbit", [Param::new("frog")]), |mut args| {
            Ok(Value::from_shared(args.take::<&str>()?))
        });

        let value = container.invoke(callable, Args::new().with("frog", "Greenfrog")).unwrap();
        assert_eq!(*value.downcast::<&str>().unwrap(), "Greenfrog");
    }

    #[test]
    #[traced_test]
    fn test_invoke_missing_dependency() {
        let container = Container::default();
        let callable = Callable::new(Signature::new("ribbit", [Param::new("frog")]), |mut args| {
            Ok(Value::from_shared(args.take::<&str>()?))
        });

        let err = container.invoke(callable, Args::new()).unwrap_err();
        let ResolveErrorKind::ParameterResolution(err) = err else {
            panic!("expected a parameter resolution failure");
        };
        assert_eq!(&*err.parameter, "frog");
        assert_eq!(&*err.function, "ribbit");
    }

    #[test]
    #[traced_test]
    fn test_invoke_prefers_explicit_argument_over_binding() {
        let container = Container::new(car_registry().build());
        let bound = Arc::new(Engine);
        container.set("Engine", Value::from_shared(bound.clone()));

        let explicit = Arc::new(Engine);
        let callable = Callable::new(
            Signature::new("inspect", [Param::typed("engine", "Engine")]),
            |mut args| Ok(Value::from_shared(args.take::<Engine>()?)),
        );

        let resolved = container
            .invoke(callable, Args::new().with_value("Engine", Value::from_shared(explicit.clone())))
            .unwrap()
            .downcast::<Engine>()
            .unwrap();
        assert!(Arc::ptr_eq(&explicit, &resolved));
        assert!(!Arc::ptr_eq(&bound, &resolved));
    }

    #[test]
    #[traced_test]
    fn test_invoke_method_reference() {
        let registry = car_registry()
            .method::<Engine, _, _>("Engine", "start", [Param::new("throttle").with_default(1i32)], |_, mut args| {
                args.take_cloned::<i32>()
            })
            .build();
        let container = Container::new(registry);

        let value = container.invoke("Engine::start", Args::new()).unwrap();
        assert_eq!(*value.downcast::<i32>().unwrap(), 1);

        let value = container.invoke("Engine::start", Args::new().with("throttle", 3i32)).unwrap();
        assert_eq!(*value.downcast::<i32>().unwrap(), 3);
    }

    #[test]
    #[traced_test]
    fn test_invoke_bound_method() {
        let registry = car_registry()
            .method::<Engine, _, _>("Engine", "start", [], |_, _| Ok("started"))
            .build();
        let container = Container::new(registry);

        let engine = container.make("Engine", Args::new()).unwrap();
        let value = container.invoke((engine, "start"), Args::new()).unwrap();
        assert_eq!(*value.downcast::<&str>().unwrap(), "started");
    }

    #[test]
    #[traced_test]
    fn test_invoke_function_reference() {
        let registry = RegistryBuilder::new().function::<_, _>("croak", [], |_| Ok("croak")).build();
        let container = Container::new(registry);

        let value = container.invoke("croak", Args::new()).unwrap();
        assert_eq!(*value.downcast::<&str>().unwrap(), "croak");

        assert!(matches!(
            container.invoke("ribbit", Args::new()),
            Err(ResolveErrorKind::UnknownFunction { .. })
        ));
    }

    #[test]
    #[traced_test]
    fn test_invoke_malformed_reference() {
        let container = Container::default();

        assert!(matches!(
            container.invoke("Engine::", Args::new()),
            Err(ResolveErrorKind::MalformedCallable { .. })
        ));
        assert!(matches!(
            container.invoke("::start", Args::new()),
            Err(ResolveErrorKind::MalformedCallable { .. })
        ));
    }

    #[test]
    #[traced_test]
    fn test_self_registration() {
        let container = Container::default();

        assert!(container.has(Container::ID));
        let handle = container.get(Container::ID).unwrap().downcast::<Container>().unwrap();
        assert!(handle.ptr_eq(&container));

        // the handle shares state with the original
        handle.set("frog", Value::new(1i32));
        assert!(container.has("frog"));
    }

    #[test]
    #[traced_test]
    fn test_container_injected_into_constructor() {
        struct Holder {
            container: Container,
        }

        let registry = RegistryBuilder::new()
            .register::<Holder, _>("Holder", [Param::typed("app", Container::ID)], |mut args| {
                Ok(Holder {
                    container: (*args.take::<Container>()?).clone(),
                })
            })
            .build();
        let container = Container::new(registry);

        let holder = container.build("Holder", Args::new()).unwrap().downcast::<Holder>().unwrap();
        assert!(holder.container.ptr_eq(&container));
    }

    #[test]
    #[traced_test]
    fn test_internals() {
        let container = Container::default();
        assert!(!container.has_internal("internal"));

        container.set_internal("internal", Value::new(1i32));
        assert!(container.has_internal("internal"));
        assert_eq!(*container.get_internal("internal").unwrap().downcast::<i32>().unwrap(), 1);

        // bindings and internals are independent namespaces
        assert!(!container.has("internal"));

        container.remove_internal("internal");
        assert!(!container.has_internal("internal"));
        assert!(matches!(
            container.get_internal("internal"),
            Err(ResolveErrorKind::InternalNotFound { .. })
        ));
    }

    #[test]
    #[traced_test]
    fn test_internal_callable_auto_invoked() {
        let container = Container::default();
        container.set_internal_callable(
            "lazy",
            Callable::new(Signature::new("lazy", []), |_| Ok(Value::new(42i32))),
        );

        assert_eq!(*container.get_internal("lazy").unwrap().downcast::<i32>().unwrap(), 42);
    }

    #[test]
    fn test_thread_safe() {
        fn impl_bounds<T: Send + Sync + 'static>() {}

        impl_bounds::<Container>();

        let container = Container::default();
        container.set("frog", Value::new(1i32));
        std::thread::spawn(move || {
            assert!(container.has("frog"));
        })
        .join()
        .unwrap();
    }
}
