//! Capability resolver trait for lazy resolution of super-global names.
//!
//! Hosts implement `CapabilityResolver` to provide the names a form script may
//! reach outside its own declarations (`toast`, `call`, `router`, ...). Names
//! are resolved lazily, only when script code actually references them.

use crate::runner::ds::error::ScriptErrorType;
use crate::runner::ds::value::ScriptValue;

/// A resolver that can provide named capabilities to the super-global scope.
///
/// Resolvers are queried in registration order when a name lookup reaches the
/// super-global scope. The first resolver that claims a name wins.
pub trait CapabilityResolver {
    /// Does this resolver provide a binding with the given name?
    ///
    /// This should be a cheap check. It must NOT materialize the value.
    fn has_binding(&self, name: &str) -> bool;

    /// Materialize the value for the given name.
    ///
    /// Called only after `has_binding` returns `true`. The returned value is
    /// cached by the super-global environment, so this runs at most once per
    /// name per environment.
    fn resolve(&self, name: &str) -> Result<ScriptValue, ScriptErrorType>;

    /// Names this resolver provides, for logging.
    fn binding_names(&self) -> Vec<String>;

    /// Human-readable name for this resolver (for debugging/logging).
    fn name(&self) -> &str;
}
