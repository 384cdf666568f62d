use alloc::{sync::Arc, vec::Vec};
use core::ops::Deref;
use parking_lot::Mutex;
use tracing::{debug, error, info_span};

use crate::{
    any::TypeInfo,
    args::Args,
    container::Container,
    contracts::{BoxedPluggable, BoxedServiceProvider},
    errors::ResolveErrorKind,
    kernel::Kernel,
    registry::Registry,
};

/// An application shell around a [`Container`].
///
/// Derefs to the container, so every container operation is available
/// directly. On top it tracks the service providers registered and the
/// pluggables connected into it, and drives runnable pluggables via
/// [`Self::run`].
///
/// Providers and pluggables are materialized by identifier through `make`,
/// so their constructors participate in autowiring like any other concrete.
/// They must be registered as [`BoxedServiceProvider`] / [`BoxedPluggable`]
/// for the capability downcast to succeed.
pub struct Application {
    container: Container,
    providers: Mutex<Vec<Arc<BoxedServiceProvider>>>,
    pluggables: Mutex<Vec<Arc<BoxedPluggable>>>,
}

impl Application {
    #[must_use]
    pub fn new(registry: Registry) -> Self {
        Self::from_container(Container::new(registry))
    }

    #[must_use]
    pub fn from_container(container: Container) -> Self {
        Self {
            container,
            providers: Mutex::new(Vec::new()),
            pluggables: Mutex::new(Vec::new()),
        }
    }

    #[inline]
    #[must_use]
    pub fn container(&self) -> &Container {
        &self.container
    }

    /// Loads a kernel: registers its service providers, then connects its
    /// pluggables, each in manifest order. Fails fast on the first
    /// identifier that cannot be materialized or lacks the expected
    /// capability.
    pub fn load(&self, kernel: &dyn Kernel) -> Result<(), ResolveErrorKind> {
        let span = info_span!("load");
        let _guard = span.enter();

        for id in kernel.service_providers() {
            self.register(id)?;
        }
        for id in kernel.pluggables() {
            self.connect(id)?;
        }
        Ok(())
    }

    /// Materializes and registers a single service provider.
    pub fn register(&self, id: &str) -> Result<(), ResolveErrorKind> {
        let span = info_span!("register", id);
        let _guard = span.enter();

        let provider = self.capability::<BoxedServiceProvider>(id)?;
        provider.register();
        debug!("provider registered");
        self.providers.lock().push(provider);
        Ok(())
    }

    /// Materializes and connects a single pluggable.
    pub fn connect(&self, id: &str) -> Result<(), ResolveErrorKind> {
        let span = info_span!("connect", id);
        let _guard = span.enter();

        let pluggable = self.capability::<BoxedPluggable>(id)?;
        pluggable.plugin();
        debug!("pluggable connected");
        self.pluggables.lock().push(pluggable);
        Ok(())
    }

    /// Registers an already constructed provider, bypassing the registry.
    pub fn register_provider(&self, provider: BoxedServiceProvider) {
        provider.register();
        debug!("provider registered");
        self.providers.lock().push(Arc::new(provider));
    }

    /// Connects an already constructed pluggable, bypassing the registry.
    pub fn connect_pluggable(&self, pluggable: BoxedPluggable) {
        pluggable.plugin();
        debug!("pluggable connected");
        self.pluggables.lock().push(Arc::new(pluggable));
    }

    /// Runs every connected pluggable that exposes a main loop, in
    /// connection order. Pluggables without one are skipped.
    pub fn run(&self) {
        let span = info_span!("run");
        let _guard = span.enter();

        let pluggables = self.pluggables.lock().clone();
        for pluggable in pluggables {
            if let Some(runnable) = pluggable.as_runnable() {
                runnable.run();
            }
        }
    }

    fn capability<T: Send + Sync + 'static>(&self, id: &str) -> Result<Arc<T>, ResolveErrorKind> {
        let value = self.container.make(id, Args::new())?;
        let actual = value.type_info();
        value.downcast::<T>().map_err(|_| {
            let err = ResolveErrorKind::IncorrectType {
                expected: TypeInfo::of::<T>(),
                actual,
            };
            error!("{}", err);
            err
        })
    }
}

impl Deref for Application {
    type Target = Container;

    fn deref(&self) -> &Self::Target {
        &self.container
    }
}
