use alloc::{
    boxed::Box,
    format,
    string::{String, ToString as _},
};

use crate::{any::TypeInfo, signature::{Param, Signature}};

/// Failure of a `get`, `make`, `build` or `invoke` call.
#[derive(thiserror::Error, Debug)]
pub enum ResolveErrorKind {
    #[error("abstract `{id}` not found")]
    NotFound { id: Box<str> },
    #[error("internal `{id}` not found")]
    InternalNotFound { id: Box<str> },
    #[error("`{id}` is not a usable concrete identifier")]
    InvalidArgument { id: Box<str> },
    #[error("no constructor registered for concrete `{id}`")]
    UnknownConcrete { id: Box<str> },
    #[error("malformed callable reference `{reference}`")]
    MalformedCallable { reference: Box<str> },
    #[error("no function `{name}` registered")]
    UnknownFunction { name: Box<str> },
    #[error("no method `{method}` registered for type `{id}`")]
    UnknownMethod { id: Box<str>, method: Box<str> },
    #[error("no registered type matches receiver `{}`", actual.name)]
    UnknownReceiver { actual: TypeInfo },
    #[error("resolved entry has incorrect type: expected `{}`, actual `{}`", expected.name, actual.name)]
    IncorrectType { expected: TypeInfo, actual: TypeInfo },
    #[error("build recursion limit ({limit}) exceeded while constructing `{id}`")]
    BuildDepthExceeded { id: Box<str>, limit: usize },
    #[error(transparent)]
    ParameterResolution(#[from] ParameterResolutionError),
    #[error(transparent)]
    Instantiate(#[from] InstantiateErrorKind),
}

impl ResolveErrorKind {
    /// True only for a missing binding, the recoverable signal `make` uses to
    /// fall back to `build`.
    #[inline]
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

/// The resolver exhausted every strategy for one parameter.
///
/// Carries the parameter name, its declared type if any, and the qualified
/// name of the enclosing callable.
#[derive(thiserror::Error, Debug)]
#[error("unable to resolve parameter `{}` for `{function}`", self.qualified_parameter())]
pub struct ParameterResolutionError {
    pub parameter: Box<str>,
    pub declared_type: Option<Box<str>>,
    pub function: Box<str>,
}

impl ParameterResolutionError {
    pub(crate) fn new(param: &Param, signature: &Signature) -> Self {
        Self {
            parameter: param.name().into(),
            declared_type: param.declared_type().map(Into::into),
            function: signature.name().into(),
        }
    }

    fn qualified_parameter(&self) -> String {
        match &self.declared_type {
            Some(declared_type) => format!("{}: {declared_type}", self.parameter),
            None => self.parameter.to_string(),
        }
    }
}

/// Failure inside a callable, constructor or method body, or while a
/// lifecycle wrapper re-entered the container.
#[derive(thiserror::Error, Debug)]
pub enum InstantiateErrorKind {
    #[error("argument type mismatch: expected `{}`, actual `{}`", expected.name, actual.name)]
    IncorrectArgument { expected: TypeInfo, actual: TypeInfo },
    #[error("argument list exhausted: no value left for `{expected}`")]
    MissingArgument { expected: &'static str },
    #[error("receiver type mismatch: expected `{}`, actual `{}`", expected.name, actual.name)]
    IncorrectReceiver { expected: TypeInfo, actual: TypeInfo },
    #[error(transparent)]
    Resolve(Box<ResolveErrorKind>),
    #[error(transparent)]
    Custom(#[from] anyhow::Error),
}

impl From<ResolveErrorKind> for InstantiateErrorKind {
    fn from(err: ResolveErrorKind) -> Self {
        Self::Resolve(Box::new(err))
    }
}
