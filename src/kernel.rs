use alloc::{boxed::Box, vec::Vec};

use crate::{application::Application, errors::ResolveErrorKind};

/// The boot manifest of an application: which service providers to register
/// and which pluggables to connect, in order.
///
/// Identifiers refer to concretes registered in the application's
/// [`crate::Registry`]; the application materializes each one through
/// [`crate::Container::make`] at load time.
pub trait Kernel: Send + Sync {
    fn service_providers(&self) -> &[Box<str>];

    fn pluggables(&self) -> &[Box<str>];

    /// Loads this kernel into `app`: providers first, pluggables second.
    fn boot(&self, app: &Application) -> Result<(), ResolveErrorKind>
    where
        Self: Sized,
    {
        app.load(self)
    }
}

/// A kernel backed by plain identifier lists, assembled with the builder
/// calls below. Load order follows insertion order.
#[derive(Debug, Default)]
pub struct StaticKernel {
    providers: Vec<Box<str>>,
    pluggables: Vec<Box<str>>,
}

impl StaticKernel {
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_provider(mut self, id: impl Into<Box<str>>) -> Self {
        self.providers.push(id.into());
        self
    }

    #[must_use]
    pub fn with_pluggable(mut self, id: impl Into<Box<str>>) -> Self {
        self.pluggables.push(id.into());
        self
    }
}

impl Kernel for StaticKernel {
    #[inline]
    fn service_providers(&self) -> &[Box<str>] {
        &self.providers
    }

    #[inline]
    fn pluggables(&self) -> &[Box<str>] {
        &self.pluggables
    }
}
