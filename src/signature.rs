use alloc::{boxed::Box, vec::Vec};

use crate::any::Value;

/// Descriptor of one formal parameter: its name, an optional declared type
/// identifier, and an optional default value.
///
/// Rust has no runtime parameter introspection, so every invocable target
/// carries its descriptor table explicitly, supplied once at registration
/// time.
#[derive(Clone)]
pub struct Param {
    name: &'static str,
    declared_type: Option<&'static str>,
    default: Option<Value>,
}

impl Param {
    /// An untyped parameter, resolvable only from the argument bag or a
    /// default value.
    #[inline]
    #[must_use]
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            declared_type: None,
            default: None,
        }
    }

    /// A parameter with a declared type identifier, eligible for delegated
    /// lookup and auto-build.
    #[inline]
    #[must_use]
    pub fn typed(name: &'static str, declared_type: &'static str) -> Self {
        Self {
            name,
            declared_type: Some(declared_type),
            default: None,
        }
    }

    #[must_use]
    pub fn with_default<T: Send + Sync + 'static>(mut self, value: T) -> Self {
        self.default = Some(Value::new(value));
        self
    }

    #[inline]
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    #[inline]
    #[must_use]
    pub fn declared_type(&self) -> Option<&'static str> {
        self.declared_type
    }

    #[inline]
    #[must_use]
    pub fn default(&self) -> Option<&Value> {
        self.default.as_ref()
    }
}

/// The qualified name and ordered parameter list of a callable target.
#[derive(Clone)]
pub struct Signature {
    name: Box<str>,
    params: Vec<Param>,
}

impl Signature {
    #[must_use]
    pub fn new(name: impl Into<Box<str>>, params: impl IntoIterator<Item = Param>) -> Self {
        Self {
            name: name.into(),
            params: params.into_iter().collect(),
        }
    }

    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    #[must_use]
    pub fn params(&self) -> &[Param] {
        &self.params
    }
}
