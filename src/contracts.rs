use alloc::boxed::Box;

use crate::{any::Value, args::Args, errors::ResolveErrorKind};

/// The lookup capability a container delegates to: `has` plus `get`.
///
/// Anything implementing this can stand on the receiving end of
/// [`crate::Container::delegate`], containers included.
pub trait Lookup: Send + Sync {
    fn has(&self, id: &str) -> bool;

    fn get_with(&self, id: &str, args: Args) -> Result<Value, ResolveErrorKind>;

    fn get(&self, id: &str) -> Result<Value, ResolveErrorKind> {
        self.get_with(id, Args::new())
    }
}

/// A component whose sole contract is a one-time `register` call at
/// application load. Providers receive the owning container through their
/// constructor parameters and bind services into it here.
pub trait ServiceProvider: Send + Sync {
    fn register(&self);
}

/// Main-loop capability probed on pluggables by [`crate::Application::run`].
pub trait Runnable: Send + Sync {
    fn run(&self);
}

/// A component with connect/disconnect lifecycle hooks.
///
/// `unplug` is never invoked by the core itself; it is left to the
/// orchestration layer or explicit caller use. Pluggables that are also
/// runnable surface that capability through `as_runnable`.
pub trait Pluggable: Send + Sync {
    fn plugin(&self);

    fn unplug(&self);

    fn as_runnable(&self) -> Option<&dyn Runnable> {
        None
    }
}

pub type BoxedServiceProvider = Box<dyn ServiceProvider>;
pub type BoxedPluggable = Box<dyn Pluggable>;
