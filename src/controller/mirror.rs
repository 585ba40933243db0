//! Field mirrors: copies of a document's fields kept on every controller
//! bound to it, so handlers can read `this.<field>`.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use indexmap::IndexSet;

use super::proxy::is_reserved;
use crate::runner::ds::object::{ObjectRef, ScriptObject};
use crate::runner::ds::value::ScriptValue;

/// One controller's copy of the bound document's fields.
pub struct FieldMirror {
    object: Weak<RefCell<ScriptObject>>,
    /// Keys this mirror wrote. Only these are removed when the document
    /// loses them; properties a script set itself are left alone.
    keys: RefCell<IndexSet<String>>,
}

impl FieldMirror {
    pub fn new(object: &ObjectRef) -> Self {
        FieldMirror {
            object: Rc::downgrade(object),
            keys: RefCell::new(IndexSet::new()),
        }
    }

    /// Copies `document`'s enumerable fields onto the controller and drops
    /// mirrored fields the document no longer has.
    pub fn sync(&self, document: &ObjectRef) {
        let object = match self.object.upgrade() {
            Some(o) => o,
            None => return,
        };
        let fields: Vec<(String, ScriptValue)> = document
            .borrow()
            .enumerable_entries()
            .into_iter()
            .filter(|(key, _)| !is_reserved(key))
            .collect();
        let current: IndexSet<String> = fields.iter().map(|(key, _)| key.clone()).collect();

        let mut keys = self.keys.borrow_mut();
        let mut o = object.borrow_mut();
        for stale in keys.iter().filter(|key| !current.contains(*key)) {
            o.remove_own(stale);
        }
        for (key, value) in fields {
            o.set_own(&key, value);
        }
        *keys = current;
    }

    /// Mirrors a single write made through a document proxy.
    pub fn write(&self, key: &str, value: ScriptValue) {
        if is_reserved(key) {
            return;
        }
        if let Some(object) = self.object.upgrade() {
            object.borrow_mut().set_own(key, value);
            self.keys.borrow_mut().insert(key.to_string());
        }
    }
}

/// The mirrors of every controller bound to one document.
#[derive(Clone, Default)]
pub struct MirrorGroup {
    mirrors: Rc<RefCell<Vec<Rc<FieldMirror>>>>,
}

impl MirrorGroup {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `object` to the group and returns its mirror.
    pub fn join(&self, object: &ObjectRef) -> Rc<FieldMirror> {
        let mirror = Rc::new(FieldMirror::new(object));
        self.mirrors.borrow_mut().push(mirror.clone());
        mirror
    }

    pub fn write(&self, key: &str, value: ScriptValue) {
        for mirror in self.mirrors.borrow().iter() {
            mirror.write(key, value.clone());
        }
    }

    pub fn sync_all(&self, document: &ObjectRef) {
        for mirror in self.mirrors.borrow().iter() {
            mirror.sync(document);
        }
    }

    pub fn len(&self) -> usize {
        self.mirrors.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.mirrors.borrow().is_empty()
    }
}
