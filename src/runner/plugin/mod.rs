//! Capability plumbing and the super-global scope.
//!
//! A form script can only reach names it declares itself or names the host
//! hands in. The host's names live in the **super-global scope**, which sits
//! outside the lexical environment chain and resolves on demand:
//!
//! ```text
//! Name lookup order:
//! 1. Block and function scopes
//! 2. The script scope (classes, functions, top-level bindings)
//! 3. Super-global scope ← host capabilities live here
//! ```
//!
//! - **[`CapabilityResolver`]**: trait for providing names lazily
//! - **[`CapabilitySet`]**: the host's allow-listed table of functions, objects and values
//! - **[`SuperGlobalEnvironment`]**: resolvers plus a per-name cache
//! - **[`EvalContext`]**: execution context with super-global integration
//!
//! ## Example
//!
//! ```
//! use std::rc::Rc;
//! use formscript::runner::plugin::{CapabilitySet, SuperGlobalEnvironment};
//! use formscript::runner::ds::value::ScriptValue;
//!
//! let toast = CapabilitySet::new()
//!     .with_function("toast", |_ctx, _this, _args| Ok(ScriptValue::Undefined));
//!
//! let mut sg = SuperGlobalEnvironment::new();
//! sg.add_resolver(Box::new(toast));
//! assert!(sg.has_name("toast"));
//! assert!(!sg.has_name("window"));
//! ```

pub mod registry;
pub mod resolver;
pub mod super_global;
pub mod types;

pub use registry::{Capability, CapabilitySet};
pub use resolver::CapabilityResolver;
pub use super_global::SuperGlobalEnvironment;
pub use types::{native_fn, EvalContext, HostObject, NativeFn};
