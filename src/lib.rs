#![no_std]

extern crate alloc;

pub(crate) mod any;
pub(crate) mod application;
pub(crate) mod args;
pub(crate) mod binding;
pub(crate) mod callable;
pub(crate) mod container;
pub(crate) mod contracts;
pub(crate) mod errors;
pub(crate) mod kernel;
pub(crate) mod lifecycle;
pub(crate) mod registry;
pub(crate) mod resolver;
pub(crate) mod signature;

pub use any::{TypeInfo, Value};
pub use application::Application;
pub use args::Args;
pub use callable::{Callable, InvokeTarget, ResolvedArgs};
pub use container::{Container, MAX_BUILD_DEPTH};
pub use contracts::{BoxedPluggable, BoxedServiceProvider, Lookup, Pluggable, Runnable, ServiceProvider};
pub use errors::{InstantiateErrorKind, ParameterResolutionError, ResolveErrorKind};
pub use kernel::{Kernel, StaticKernel};
pub use lifecycle::{factory, once, one, protect};
pub use registry::{Registry, RegistryBuilder};
pub use signature::{Param, Signature};
