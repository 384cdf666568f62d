use alloc::vec::Vec;
use tracing::debug;

use crate::{
    any::Value,
    args::Args,
    container::Container,
    errors::{ParameterResolutionError, ResolveErrorKind},
    signature::Signature,
};

/// Produces a concrete argument list for `signature` from the supplied bag,
/// applying the precedence policy in declaration order:
///
/// 1. bag entry keyed by the declared type identifier,
/// 2. bag entry keyed by the parameter name,
/// 3. first remaining positional bag entry,
/// 4. delegated lookup by declared type,
/// 5. recursive auto-build of the declared type,
/// 6. declared default value.
///
/// Explicit caller intent beats container wiring, and named-type wiring
/// beats blind construction. Each consumed bag entry is removed so it is
/// never applied twice. Fails at the first unresolvable parameter.
pub(crate) fn resolve_params(
    container: &Container,
    signature: &Signature,
    args: &mut Args,
    depth: usize,
) -> Result<Vec<Value>, ResolveErrorKind> {
    let mut resolved = Vec::with_capacity(signature.params().len());

    for param in signature.params() {
        if let Some(declared_type) = param.declared_type() {
            if let Some(value) = args.take(declared_type) {
                debug!(param = param.name(), "resolved from type-keyed argument");
                resolved.push(value);
                continue;
            }
        }

        if let Some(value) = args.take(param.name()) {
            debug!(param = param.name(), "resolved from name-keyed argument");
            resolved.push(value);
            continue;
        }

        if let Some(value) = args.shift_positional() {
            debug!(param = param.name(), "resolved from positional argument");
            resolved.push(value);
            continue;
        }

        if let Some(declared_type) = param.declared_type() {
            if container.delegate_has(declared_type) {
                debug!(param = param.name(), declared_type, "resolved via delegated lookup");
                resolved.push(container.delegate_get(declared_type, Args::new())?);
                continue;
            }

            if container.is_constructible(declared_type) {
                debug!(param = param.name(), declared_type, "resolved via auto-build");
                resolved.push(container.build_at_depth(declared_type, Args::new(), depth + 1)?);
                continue;
            }
        }

        if let Some(default) = param.default() {
            debug!(param = param.name(), "resolved from default value");
            resolved.push(default.clone());
            continue;
        }

        return Err(ParameterResolutionError::new(param, signature).into());
    }

    Ok(resolved)
}
