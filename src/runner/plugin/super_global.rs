//! Super-global environment: the bottom of the scope chain.
//!
//! This environment sits below a script's own scope and lazily resolves
//! host capabilities on first access. Values are cached after first
//! resolution so each name is materialized at most once.
//!
//! ```text
//! script: toast("saved")
//!      ↓
//! 1. Check block and function scopes → not found
//! 2. Check the script scope → not found
//! 3. Check super-global → "toast" claimed by the host's CapabilitySet
//! 4. Cache the materialized function
//! ```
//!
//! Scripts cannot create or assign super-global bindings.

use std::cell::RefCell;
use std::collections::HashMap;

use crate::runner::ds::error::ScriptErrorType;
use crate::runner::ds::value::ScriptValue;
use crate::runner::plugin::resolver::CapabilityResolver;

pub struct SuperGlobalEnvironment {
    /// Registered resolvers, queried in order.
    resolvers: Vec<Box<dyn CapabilityResolver>>,
    /// Already-resolved bindings (name → value).
    cache: RefCell<HashMap<String, ScriptValue>>,
}

impl SuperGlobalEnvironment {
    pub fn new() -> Self {
        SuperGlobalEnvironment {
            resolvers: Vec::new(),
            cache: RefCell::new(HashMap::new()),
        }
    }

    /// Register a resolver. Resolvers are queried in registration order.
    pub fn add_resolver(&mut self, resolver: Box<dyn CapabilityResolver>) {
        self.resolvers.push(resolver);
    }

    fn find_resolver(&self, name: &str) -> Option<&dyn CapabilityResolver> {
        self.resolvers
            .iter()
            .find(|r| r.has_binding(name))
            .map(|r| r.as_ref())
    }

    pub fn has_name(&self, name: &str) -> bool {
        self.cache.borrow().contains_key(name) || self.find_resolver(name).is_some()
    }

    /// Resolve a name, caching the result. `Ok(None)` when no resolver
    /// provides it.
    pub fn resolve_binding(&self, name: &str) -> Result<Option<ScriptValue>, ScriptErrorType> {
        if let Some(v) = self.cache.borrow().get(name) {
            return Ok(Some(v.clone()));
        }
        match self.find_resolver(name) {
            Some(resolver) => {
                let value = resolver.resolve(name)?;
                self.cache
                    .borrow_mut()
                    .insert(name.to_string(), value.clone());
                Ok(Some(value))
            }
            None => Ok(None),
        }
    }

    /// Every name the registered resolvers provide, in registration order.
    pub fn binding_names(&self) -> Vec<String> {
        self.resolvers
            .iter()
            .flat_map(|r| r.binding_names())
            .collect()
    }

    pub fn resolvers(&self) -> &[Box<dyn CapabilityResolver>] {
        &self.resolvers
    }
}

impl Default for SuperGlobalEnvironment {
    fn default() -> Self {
        Self::new()
    }
}
