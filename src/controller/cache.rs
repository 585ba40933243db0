//! Memoization of compiled scripts per doctype and of composed controllers
//! per (doctype, docname).
//!
//! Each key maps to a shared `OnceCell`. Concurrent first accesses await the
//! same initialization instead of compiling twice.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;
use std::rc::Rc;

use tokio::sync::OnceCell;
use tracing::debug;

use super::compiler::CompiledScript;
use super::dispatcher::DocumentScripts;

pub type DocumentKey = (String, String);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuntimeState {
    Uninitialized,
    Compiling,
    Composed,
    DispatchReady,
}

impl fmt::Display for RuntimeState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RuntimeState::Uninitialized => "uninitialized",
            RuntimeState::Compiling => "compiling",
            RuntimeState::Composed => "composed",
            RuntimeState::DispatchReady => "dispatch-ready",
        };
        write!(f, "{}", name)
    }
}

pub type Slot<V> = Rc<OnceCell<V>>;

fn slot<K: Hash + Eq + Clone, V>(map: &RefCell<HashMap<K, Slot<V>>>, key: &K) -> Slot<V> {
    map.borrow_mut()
        .entry(key.clone())
        .or_insert_with(|| Rc::new(OnceCell::new()))
        .clone()
}

#[derive(Default)]
pub struct RuntimeCache {
    scripts: RefCell<HashMap<String, Slot<Rc<Vec<CompiledScript>>>>>,
    documents: RefCell<HashMap<DocumentKey, Slot<Rc<DocumentScripts>>>>,
    states: RefCell<HashMap<DocumentKey, RuntimeState>>,
}

impl RuntimeCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn scripts_slot(&self, doctype: &str) -> Slot<Rc<Vec<CompiledScript>>> {
        slot(&self.scripts, &doctype.to_string())
    }

    pub fn document_slot(&self, key: &DocumentKey) -> Slot<Rc<DocumentScripts>> {
        slot(&self.documents, key)
    }

    pub fn document(&self, key: &DocumentKey) -> Option<Rc<DocumentScripts>> {
        self.documents
            .borrow()
            .get(key)
            .and_then(|cell| cell.get().cloned())
    }

    pub fn state(&self, key: &DocumentKey) -> RuntimeState {
        self.states
            .borrow()
            .get(key)
            .copied()
            .unwrap_or(RuntimeState::Uninitialized)
    }

    pub fn set_state(&self, key: &DocumentKey, state: RuntimeState) {
        debug!(doctype = %key.0, docname = %key.1, %state, "runtime state");
        self.states.borrow_mut().insert(key.clone(), state);
    }

    pub fn clear(&self) {
        self.scripts.borrow_mut().clear();
        self.documents.borrow_mut().clear();
        self.states.borrow_mut().clear();
    }

    /// Drops the scripts of `doctype` and every document of that doctype.
    pub fn remove_doctype(&self, doctype: &str) {
        self.scripts.borrow_mut().remove(doctype);
        self.documents.borrow_mut().retain(|(dt, _), _| dt != doctype);
        self.states.borrow_mut().retain(|(dt, _), _| dt != doctype);
    }

    pub fn evict(&self, key: &DocumentKey) {
        self.documents.borrow_mut().remove(key);
        self.states.borrow_mut().remove(key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(dt: &str, dn: &str) -> DocumentKey {
        (dt.to_string(), dn.to_string())
    }

    #[test]
    fn test_slot_is_shared_per_key() {
        let cache = RuntimeCache::new();
        let a = cache.scripts_slot("Lead");
        let b = cache.scripts_slot("Lead");
        let c = cache.scripts_slot("Deal");
        assert!(Rc::ptr_eq(&a, &b));
        assert!(!Rc::ptr_eq(&a, &c));
    }

    #[test]
    fn test_states() {
        let cache = RuntimeCache::new();
        let lead = key("Lead", "L-1");
        assert_eq!(cache.state(&lead), RuntimeState::Uninitialized);
        cache.set_state(&lead, RuntimeState::Compiling);
        cache.set_state(&key("Deal", "D-1"), RuntimeState::DispatchReady);
        assert_eq!(cache.state(&lead), RuntimeState::Compiling);

        cache.remove_doctype("Lead");
        assert_eq!(cache.state(&lead), RuntimeState::Uninitialized);
        assert_eq!(cache.state(&key("Deal", "D-1")), RuntimeState::DispatchReady);

        cache.clear();
        assert_eq!(cache.state(&key("Deal", "D-1")), RuntimeState::Uninitialized);
    }

    #[test]
    fn test_evicted_slot_is_fresh() {
        let cache = RuntimeCache::new();
        let lead = key("Lead", "L-1");
        let before = cache.document_slot(&lead);
        cache.evict(&lead);
        let after = cache.document_slot(&lead);
        assert!(!Rc::ptr_eq(&before, &after));
        assert!(cache.document(&lead).is_none());
    }
}
