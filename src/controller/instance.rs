//! Controller instances and the per-document registry.

use std::rc::Rc;

use indexmap::IndexMap;
use tracing::trace;
use uuid::Uuid;

use super::compiler::ScriptScope;
use super::mirror::FieldMirror;
use crate::runner::ds::error::ScriptErrorType;
use crate::runner::ds::object::ObjectRef;
use crate::runner::ds::operations::object::{get_callable_property, get_object_property};
use crate::runner::ds::value::ScriptValue;
use crate::runner::eval::call_function;

/// One controller bound to a document.
pub struct ControllerInstance {
    pub id: Uuid,
    pub class_name: String,
    /// Script the class was compiled from.
    pub script: String,
    pub(crate) object: ObjectRef,
    /// Document whose fields are mirrored onto the instance.
    pub(crate) bound: ObjectRef,
    /// The proxied `doc` handle.
    pub(crate) doc: ObjectRef,
    pub(crate) mirror: Rc<FieldMirror>,
    pub(crate) parent: Option<Rc<ControllerInstance>>,
    pub(crate) scope: Rc<ScriptScope>,
}

impl ControllerInstance {
    /// The script-visible instance object.
    pub fn value(&self) -> ScriptValue {
        ScriptValue::Object(self.object.clone())
    }

    pub fn doc(&self) -> ScriptValue {
        ScriptValue::Object(self.doc.clone())
    }

    pub fn parent(&self) -> Option<&Rc<ControllerInstance>> {
        self.parent.as_ref()
    }

    pub fn is_child(&self) -> bool {
        self.parent.is_some()
    }

    /// A property of the instance, resolving class methods.
    pub fn get(&self, key: &str) -> Result<ScriptValue, ScriptErrorType> {
        get_object_property(&self.object, key)
    }

    /// Sets a property such as `value` or `currentRowIdx` on the instance.
    pub fn set(&self, key: &str, value: ScriptValue) {
        self.object.borrow_mut().set_own(key, value);
    }

    /// Brings the instance's copy of the bound document's fields up to date.
    pub fn sync_mirror(&self) {
        self.mirror.sync(&self.bound);
    }

    /// The first of `names` the controller can call.
    pub fn find_handler<'a>(&self, names: &[&'a str]) -> Option<&'a str> {
        names.iter().copied().find(|name| self.has_method(name))
    }

    pub fn has_method(&self, name: &str) -> bool {
        get_callable_property(&self.value(), name)
            .map(|v| v.is_callable())
            .unwrap_or(false)
    }

    /// Calls a method with the instance as `this`.
    pub fn call(&self, name: &str, args: Vec<ScriptValue>) -> Result<ScriptValue, ScriptErrorType> {
        let this = self.value();
        let func = get_callable_property(&this, name)?;
        if !func.is_callable() {
            return Err(ScriptErrorType::TypeError(format!(
                "{}.{} is not a function",
                self.class_name, name
            )));
        }
        trace!(class = %self.class_name, controller = %self.id, handler = name, "calling handler");
        let mut ctx = self.scope.context();
        call_function(&mut ctx, &func, this, args)
    }
}

/// Controllers of one document, grouped by class name in composition order.
#[derive(Default)]
pub struct ControllerRegistry {
    by_class: IndexMap<String, Vec<Rc<ControllerInstance>>>,
    root_index: Option<usize>,
}

impl ControllerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, instance: Rc<ControllerInstance>) {
        self.by_class
            .entry(instance.class_name.clone())
            .or_insert_with(Vec::new)
            .push(instance);
    }

    /// Marks `index`, a position in the composed list, as the current root.
    pub fn set_root_index(&mut self, index: usize) {
        self.root_index = Some(index);
    }

    pub fn root_index(&self) -> Option<usize> {
        self.root_index
    }

    pub fn get(&self, class_name: &str) -> &[Rc<ControllerInstance>] {
        self.by_class
            .get(class_name)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    pub fn class_names(&self) -> Vec<&str> {
        self.by_class.keys().map(|k| k.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.by_class.values().map(|v| v.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
