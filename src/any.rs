use alloc::sync::Arc;
use core::{
    any::{type_name, Any, TypeId},
    fmt::{self, Debug, Formatter},
};

#[derive(Debug, Clone, Copy)]
pub struct TypeInfo {
    pub name: &'static str,
    pub id: TypeId,
}

impl PartialEq for TypeInfo {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TypeInfo {}

impl TypeInfo {
    #[inline]
    #[must_use]
    pub(crate) fn of<T>() -> Self
    where
        T: ?Sized + 'static,
    {
        Self {
            name: type_name::<T>(),
            id: TypeId::of::<T>(),
        }
    }

    #[inline]
    #[must_use]
    pub(crate) fn short_name(&self) -> &'static str {
        self.name.rsplit_once("::").map_or(self.name, |(_, name)| name)
    }
}

pub(crate) type AnyRc = Arc<dyn Any + Send + Sync>;

/// A shared dynamically typed value, the unit of exchange between bindings,
/// argument bags and resolved parameter lists.
///
/// Cloning is cheap (reference counted). The wrapped type is remembered as
/// [`TypeInfo`] so failed downcasts can name both sides.
#[derive(Clone)]
pub struct Value {
    type_info: TypeInfo,
    inner: AnyRc,
}

impl Value {
    #[inline]
    #[must_use]
    pub fn new<T: Send + Sync + 'static>(value: T) -> Self {
        Self {
            type_info: TypeInfo::of::<T>(),
            inner: Arc::new(value),
        }
    }

    /// Wraps an already shared value without another allocation.
    #[inline]
    #[must_use]
    pub fn from_shared<T: Send + Sync + 'static>(value: Arc<T>) -> Self {
        Self {
            type_info: TypeInfo::of::<T>(),
            inner: value,
        }
    }

    #[inline]
    #[must_use]
    pub fn type_info(&self) -> TypeInfo {
        self.type_info
    }

    #[inline]
    #[must_use]
    pub fn is<T: 'static>(&self) -> bool {
        self.type_info.id == TypeId::of::<T>()
    }

    /// Recovers the wrapped value, handing `self` back on a type mismatch.
    pub fn downcast<T: Send + Sync + 'static>(self) -> Result<Arc<T>, Value> {
        let Self { type_info, inner } = self;
        inner.downcast::<T>().map_err(|inner| Self { type_info, inner })
    }

    #[inline]
    #[must_use]
    pub fn downcast_ref<T: 'static>(&self) -> Option<&T> {
        self.inner.downcast_ref::<T>()
    }
}

impl Debug for Value {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "Value({})", self.type_info.short_name())
    }
}
