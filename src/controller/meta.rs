//! Doctype metadata for `getMeta`.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use tracing::debug;

use super::error::MetaError;
use crate::runner::ds::operations::json::from_json;
use crate::runner::ds::value::ScriptValue;

/// Resolves field definitions for a doctype.
pub trait MetaResolver {
    fn resolve(&self, doctype: &str) -> Result<serde_json::Value, MetaError>;
}

/// Fixed metadata table.
#[derive(Default)]
pub struct StaticMetaResolver {
    entries: HashMap<String, serde_json::Value>,
}

impl StaticMetaResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, doctype: impl Into<String>, meta: serde_json::Value) -> Self {
        self.entries.insert(doctype.into(), meta);
        self
    }
}

impl MetaResolver for StaticMetaResolver {
    fn resolve(&self, doctype: &str) -> Result<serde_json::Value, MetaError> {
        self.entries
            .get(doctype)
            .cloned()
            .ok_or_else(|| MetaError::NotFound(doctype.to_string()))
    }
}

/// Per-runtime cache in front of a resolver. A doctype is resolved at most
/// once; every `getMeta` call for it returns the same object.
pub struct MetaCache {
    resolver: Rc<dyn MetaResolver>,
    entries: RefCell<HashMap<String, ScriptValue>>,
}

impl MetaCache {
    pub fn new(resolver: Rc<dyn MetaResolver>) -> Self {
        MetaCache {
            resolver,
            entries: RefCell::new(HashMap::new()),
        }
    }

    pub fn get(&self, doctype: &str) -> Result<ScriptValue, MetaError> {
        if let Some(v) = self.entries.borrow().get(doctype) {
            debug!(doctype, "meta cache hit");
            return Ok(v.clone());
        }
        let value = from_json(&self.resolver.resolve(doctype)?);
        self.entries
            .borrow_mut()
            .insert(doctype.to_string(), value.clone());
        Ok(value)
    }

    pub fn clear(&self) {
        self.entries.borrow_mut().clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::cell::Cell;

    struct CountingResolver {
        calls: Cell<usize>,
    }

    impl MetaResolver for CountingResolver {
        fn resolve(&self, doctype: &str) -> Result<serde_json::Value, MetaError> {
            self.calls.set(self.calls.get() + 1);
            Ok(json!({ "name": doctype, "fields": [] }))
        }
    }

    #[test]
    fn test_resolves_once_per_doctype() {
        let resolver = Rc::new(CountingResolver { calls: Cell::new(0) });
        let cache = MetaCache::new(resolver.clone());
        let first = cache.get("Lead").unwrap();
        let second = cache.get("Lead").unwrap();
        assert_eq!(first, second);
        assert_eq!(resolver.calls.get(), 1);
        cache.get("Deal").unwrap();
        assert_eq!(resolver.calls.get(), 2);
    }

    #[test]
    fn test_static_resolver_missing_doctype() {
        let resolver = StaticMetaResolver::new().with("Lead", json!({ "fields": [] }));
        assert!(resolver.resolve("Lead").is_ok());
        assert!(matches!(resolver.resolve("Deal"), Err(MetaError::NotFound(_))));
    }
}
