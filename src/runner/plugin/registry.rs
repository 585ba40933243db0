//! Capability registry: the host's allow-listed table of names a script may use.

use indexmap::IndexMap;
use tracing::debug;

use super::resolver::CapabilityResolver;
use super::types::{native_fn, EvalContext, HostObject, NativeFn};
use crate::runner::ds::error::ScriptErrorType;
use crate::runner::ds::object::ScriptObject;
use crate::runner::ds::operations::json::from_json;
use crate::runner::ds::value::ScriptValue;

/// Well-known host capability names.
pub const CAPABILITY_CREATE_DIALOG: &str = "createDialog";
pub const CAPABILITY_TOAST: &str = "toast";
pub const CAPABILITY_CALL: &str = "call";
pub const CAPABILITY_ROUTER: &str = "router";
pub const CAPABILITY_SOCKET: &str = "socket";
pub const CAPABILITY_MAKE_CALL: &str = "makeCall";

#[derive(Clone)]
pub enum Capability {
    Function(NativeFn),
    Object(HostObject),
    Value(serde_json::Value),
}

/// Named host capabilities handed to the controller compiler.
///
/// Nothing outside this table is visible to scripts: there is no implicit
/// global object.
#[derive(Clone)]
pub struct CapabilitySet {
    name: String,
    entries: IndexMap<String, Capability>,
}

impl CapabilitySet {
    pub fn new() -> Self {
        CapabilitySet {
            name: "host".to_string(),
            entries: IndexMap::new(),
        }
    }

    /// Name reported by the resolver in logs.
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_function<F>(mut self, name: impl Into<String>, func: F) -> Self
    where
        F: Fn(&mut EvalContext, ScriptValue, Vec<ScriptValue>) -> Result<ScriptValue, ScriptErrorType>
            + 'static,
    {
        self.register_function(name, native_fn(func));
        self
    }

    pub fn with_object(mut self, object: HostObject) -> Self {
        self.register_object(object);
        self
    }

    /// A constant, e.g. the session user, exposed as a plain script value.
    pub fn with_value(mut self, name: impl Into<String>, value: serde_json::Value) -> Self {
        self.entries.insert(name.into(), Capability::Value(value));
        self
    }

    pub fn register_function(&mut self, name: impl Into<String>, func: NativeFn) {
        self.entries.insert(name.into(), Capability::Function(func));
    }

    pub fn register_object(&mut self, object: HostObject) {
        self.entries
            .insert(object.name.clone(), Capability::Object(object));
    }

    /// Keeps only the allow-listed names.
    pub fn restrict(mut self, allow: &[String]) -> Self {
        let name = self.name.clone();
        self.entries.retain(|k, _| {
            let keep = allow.iter().any(|a| a == k);
            if !keep {
                debug!(resolver = %name, capability = %k, "capability not in allow-list");
            }
            keep
        });
        self
    }

    pub fn names(&self) -> Vec<&str> {
        self.entries.keys().map(|k| k.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for CapabilitySet {
    fn default() -> Self {
        Self::new()
    }
}

impl CapabilityResolver for CapabilitySet {
    fn has_binding(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    fn resolve(&self, name: &str) -> Result<ScriptValue, ScriptErrorType> {
        match self.entries.get(name) {
            Some(Capability::Function(f)) => {
                Ok(ScriptValue::Object(ScriptObject::new_native(name, f.clone())))
            }
            Some(Capability::Object(o)) => Ok(o.materialize()),
            Some(Capability::Value(v)) => Ok(from_json(v)),
            None => Err(ScriptErrorType::ReferenceError(format!(
                "{} is not defined",
                name
            ))),
        }
    }

    fn binding_names(&self) -> Vec<String> {
        self.entries.keys().cloned().collect()
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runner::ds::operations::object::get_property;

    #[test]
    fn test_restrict_drops_names_outside_allow_list() {
        let set = CapabilitySet::new()
            .with_function(CAPABILITY_TOAST, |_, _, _| Ok(ScriptValue::Undefined))
            .with_function(CAPABILITY_CALL, |_, _, _| Ok(ScriptValue::Undefined))
            .restrict(&[CAPABILITY_TOAST.to_string()]);
        assert!(set.has_binding(CAPABILITY_TOAST));
        assert!(!set.has_binding(CAPABILITY_CALL));
        assert_eq!(set.names(), vec![CAPABILITY_TOAST]);
    }

    #[test]
    fn test_host_object_materializes_with_methods() {
        let set = CapabilitySet::new().with_object(
            HostObject::new(CAPABILITY_ROUTER)
                .add_method("push", |_, _, _| Ok(ScriptValue::Boolean(true)))
                .add_property("current", ScriptValue::String("/leads".to_string())),
        );
        let router = set.resolve(CAPABILITY_ROUTER).unwrap();
        assert!(get_property(&router, "push").unwrap().is_callable());
        assert_eq!(
            get_property(&router, "current").ok(),
            Some(ScriptValue::String("/leads".to_string()))
        );
    }

    #[test]
    fn test_value_capability_converts_json() {
        let set = CapabilitySet::new().with_value("session", serde_json::json!({"user": "ann"}));
        let session = set.resolve("session").unwrap();
        assert_eq!(
            get_property(&session, "user").ok(),
            Some(ScriptValue::String("ann".to_string()))
        );
    }
}
