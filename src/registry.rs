use alloc::{boxed::Box, collections::BTreeMap, format, sync::Arc, vec::Vec};
use core::any::TypeId;

use crate::{
    any::{TypeInfo, Value},
    callable::{Callable, ResolvedArgs},
    container::Container,
    errors::InstantiateErrorKind,
    signature::{Param, Signature},
};

pub(crate) type ConstructorBody = Arc<dyn Fn(&Container, ResolvedArgs) -> Result<Value, InstantiateErrorKind> + Send + Sync>;
pub(crate) type MethodBody = Arc<dyn Fn(&Container, Value, ResolvedArgs) -> Result<Value, InstantiateErrorKind> + Send + Sync>;

/// A registered constructor: the descriptor table for one concrete type.
#[derive(Clone)]
pub(crate) struct Constructor {
    pub(crate) signature: Signature,
    pub(crate) provides: TypeInfo,
    pub(crate) body: ConstructorBody,
}

#[derive(Clone)]
pub(crate) struct Method {
    pub(crate) signature: Signature,
    pub(crate) body: MethodBody,
}

/// Builder for the type registry.
///
/// Constructible concretes, instance methods and free functions are declared
/// up front, each with an explicit parameter descriptor list; an identifier
/// is auto-buildable iff a constructor is registered for it.
#[derive(Default)]
pub struct RegistryBuilder {
    constructors: BTreeMap<Box<str>, Constructor>,
    methods: BTreeMap<Box<str>, BTreeMap<Box<str>, Method>>,
    functions: BTreeMap<Box<str>, Callable>,
    ids_by_type: BTreeMap<TypeId, Box<str>>,
}

impl RegistryBuilder {
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a constructor for the concrete identifier `id`.
    ///
    /// A type without a meaningful constructor is registered with an empty
    /// parameter list. Re-registering an identifier overwrites; when two
    /// identifiers construct the same Rust type, bound-method dispatch uses
    /// the most recent one.
    #[must_use]
    pub fn register<T, F>(self, id: &str, params: impl IntoIterator<Item = Param>, constructor: F) -> Self
    where
        T: Send + Sync + 'static,
        F: Fn(ResolvedArgs) -> Result<T, InstantiateErrorKind> + Send + Sync + 'static,
    {
        self.register_with_container(id, params, move |_: &Container, args| constructor(args))
    }

    /// Like [`Self::register`], for constructors that need the resolving
    /// container as well.
    #[must_use]
    pub fn register_with_container<T, F>(mut self, id: &str, params: impl IntoIterator<Item = Param>, constructor: F) -> Self
    where
        T: Send + Sync + 'static,
        F: Fn(&Container, ResolvedArgs) -> Result<T, InstantiateErrorKind> + Send + Sync + 'static,
    {
        let signature = Signature::new(format!("{id}::new"), params);
        self.ids_by_type.insert(TypeId::of::<T>(), id.into());
        self.constructors.insert(
            id.into(),
            Constructor {
                signature,
                provides: TypeInfo::of::<T>(),
                body: Arc::new(move |container, args| constructor(container, args).map(Value::new)),
            },
        );
        self
    }

    /// Registers an instance method under `Type::name`. The receiver is
    /// downcast to `T` before the body runs.
    #[must_use]
    pub fn method<T, R, F>(mut self, id: &str, name: &str, params: impl IntoIterator<Item = Param>, f: F) -> Self
    where
        T: Send + Sync + 'static,
        R: Send + Sync + 'static,
        F: Fn(Arc<T>, ResolvedArgs) -> Result<R, InstantiateErrorKind> + Send + Sync + 'static,
    {
        let signature = Signature::new(format!("{id}::{name}"), params);
        let method = Method {
            signature,
            body: Arc::new(move |_, receiver, args| {
                let receiver = receiver.downcast::<T>().map_err(|receiver| InstantiateErrorKind::IncorrectReceiver {
                    expected: TypeInfo::of::<T>(),
                    actual: receiver.type_info(),
                })?;
                f(receiver, args).map(Value::new)
            }),
        };
        self.methods.entry(id.into()).or_default().insert(name.into(), method);
        self
    }

    /// Registers a free function invocable by bare name.
    #[must_use]
    pub fn function<R, F>(mut self, name: &str, params: impl IntoIterator<Item = Param>, f: F) -> Self
    where
        R: Send + Sync + 'static,
        F: Fn(ResolvedArgs) -> Result<R, InstantiateErrorKind> + Send + Sync + 'static,
    {
        let callable = Callable::new(Signature::new(name, params), move |args| f(args).map(Value::new));
        self.functions.insert(name.into(), callable);
        self
    }

    #[must_use]
    pub fn build(self) -> Registry {
        let Self {
            constructors,
            methods,
            functions,
            ids_by_type,
        } = self;
        Registry {
            constructors,
            methods,
            functions,
            ids_by_type,
        }
    }
}

/// Immutable descriptor tables shared by every container handle created from
/// them.
#[derive(Default)]
pub struct Registry {
    constructors: BTreeMap<Box<str>, Constructor>,
    methods: BTreeMap<Box<str>, BTreeMap<Box<str>, Method>>,
    functions: BTreeMap<Box<str>, Callable>,
    ids_by_type: BTreeMap<TypeId, Box<str>>,
}

impl Registry {
    #[inline]
    #[must_use]
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::new()
    }

    #[inline]
    pub(crate) fn constructor(&self, id: &str) -> Option<&Constructor> {
        self.constructors.get(id)
    }

    #[inline]
    pub(crate) fn is_constructible(&self, id: &str) -> bool {
        self.constructors.contains_key(id)
    }

    #[inline]
    pub(crate) fn method(&self, id: &str, name: &str) -> Option<&Method> {
        self.methods.get(id)?.get(name)
    }

    #[inline]
    pub(crate) fn function(&self, name: &str) -> Option<&Callable> {
        self.functions.get(name)
    }

    #[inline]
    pub(crate) fn id_of(&self, type_id: TypeId) -> Option<&str> {
        self.ids_by_type.get(&type_id).map(AsRef::as_ref)
    }

    pub(crate) fn constructible_ids(&self) -> Vec<&str> {
        self.constructors.keys().map(AsRef::as_ref).collect()
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::RegistryBuilder;
    use crate::signature::Param;
    use core::any::TypeId;

    struct Engine;

    #[test]
    fn test_register_constructor() {
        let registry = RegistryBuilder::new().register::<Engine, _>("Engine", [], |_| Ok(Engine)).build();

        assert!(registry.is_constructible("Engine"));
        assert!(!registry.is_constructible("Car"));

        let constructor = registry.constructor("Engine").unwrap();
        assert_eq!(constructor.signature.name(), "Engine::new");
        assert!(constructor.signature.params().is_empty());
        assert_eq!(registry.id_of(TypeId::of::<Engine>()), Some("Engine"));
    }

    #[test]
    fn test_register_method_and_function() {
        let registry = RegistryBuilder::new()
            .register::<Engine, _>("Engine", [], |_| Ok(Engine))
            .method::<Engine, _, _>("Engine", "start", [Param::new("throttle")], |_, _| Ok(true))
            .function::<_, _>("croak", [], |_| Ok("croak"))
            .build();

        let method = registry.method("Engine", "start").unwrap();
        assert_eq!(method.signature.name(), "Engine::start");
        assert!(registry.method("Engine", "stop").is_none());
        assert!(registry.function("croak").is_some());
        assert_eq!(registry.constructible_ids(), ["Engine"]);
    }
}
