use alloc::{boxed::Box, collections::vec_deque::VecDeque, sync::Arc, vec::Vec};
use core::fmt::{self, Debug, Formatter};

use crate::{
    any::{TypeInfo, Value},
    container::Container,
    errors::InstantiateErrorKind,
    signature::Signature,
};

/// The argument list produced by the resolver, handed to a callable body in
/// declaration order.
pub struct ResolvedArgs {
    values: VecDeque<Value>,
}

impl ResolvedArgs {
    #[inline]
    #[must_use]
    pub(crate) fn new(values: Vec<Value>) -> Self {
        Self {
            values: values.into(),
        }
    }

    /// Takes the next argument, downcast to its declared Rust type.
    pub fn take<T: Send + Sync + 'static>(&mut self) -> Result<Arc<T>, InstantiateErrorKind> {
        let value = self.values.pop_front().ok_or(InstantiateErrorKind::MissingArgument {
            expected: TypeInfo::of::<T>().name,
        })?;
        value.downcast::<T>().map_err(|value| InstantiateErrorKind::IncorrectArgument {
            expected: TypeInfo::of::<T>(),
            actual: value.type_info(),
        })
    }

    /// Takes the next argument by value, cloning out of the shared handle.
    pub fn take_cloned<T: Clone + Send + Sync + 'static>(&mut self) -> Result<T, InstantiateErrorKind> {
        self.take::<T>().map(|value| (*value).clone())
    }

    /// Takes the next argument without a type check.
    #[inline]
    pub fn take_value(&mut self) -> Option<Value> {
        self.values.pop_front()
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

pub(crate) type CallableBody = Arc<dyn Fn(&Container, ResolvedArgs) -> Result<Value, InstantiateErrorKind> + Send + Sync>;

/// A first-class invocable: a parameter signature plus a body closure.
///
/// Bodies are plain Rust closures and are called directly, so captured state
/// is never rebound or lost on the way through the resolver.
#[derive(Clone)]
pub struct Callable {
    signature: Signature,
    body: CallableBody,
}

impl Callable {
    #[must_use]
    pub fn new<F>(signature: Signature, f: F) -> Self
    where
        F: Fn(ResolvedArgs) -> Result<Value, InstantiateErrorKind> + Send + Sync + 'static,
    {
        Self {
            signature,
            body: Arc::new(move |_, args| f(args)),
        }
    }

    /// A callable whose body also receives the invoking container, used by
    /// the lifecycle wrappers to re-enter resolution.
    #[must_use]
    pub fn with_container<F>(signature: Signature, f: F) -> Self
    where
        F: Fn(&Container, ResolvedArgs) -> Result<Value, InstantiateErrorKind> + Send + Sync + 'static,
    {
        Self {
            signature,
            body: Arc::new(f),
        }
    }

    #[inline]
    #[must_use]
    pub fn signature(&self) -> &Signature {
        &self.signature
    }

    #[inline]
    pub(crate) fn call(&self, container: &Container, values: Vec<Value>) -> Result<Value, InstantiateErrorKind> {
        (self.body)(container, ResolvedArgs::new(values))
    }
}

impl Debug for Callable {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "Callable({})", self.signature.name())
    }
}

/// The three accepted shapes of an `invoke` target: a callable value, a
/// `"Type::method"` / `"function"` string reference, or an instance paired
/// with a method name.
pub enum InvokeTarget {
    Callable(Callable),
    Reference(Box<str>),
    Bound(Value, Box<str>),
}

impl From<Callable> for InvokeTarget {
    fn from(callable: Callable) -> Self {
        Self::Callable(callable)
    }
}

impl From<&str> for InvokeTarget {
    fn from(reference: &str) -> Self {
        Self::Reference(reference.into())
    }
}

impl From<(Value, &str)> for InvokeTarget {
    fn from((receiver, method): (Value, &str)) -> Self {
        Self::Bound(receiver, method.into())
    }
}
