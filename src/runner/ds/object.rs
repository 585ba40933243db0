use std::cell::RefCell;
use std::fmt;
use std::fmt::{Display, Formatter};
use std::rc::{Rc, Weak};

use indexmap::IndexMap;

use crate::parser::ast::{ClassData, FunctionData};
use crate::runner::ds::error::ScriptErrorType;
use crate::runner::ds::lex_env::EnvRef;
use crate::runner::ds::value::ScriptValue;
use crate::runner::plugin::types::NativeFn;

pub type ObjectRef = Rc<RefCell<ScriptObject>>;

pub struct Property {
    pub value: ScriptValue,
    pub enumerable: bool,
}

/// A script-defined function or method, closed over the environment it was
/// declared in.
pub struct FunctionObject {
    pub name: String,
    pub data: Rc<FunctionData>,
    pub env: EnvRef,
    /// Class the method was declared in. `super` resolves against its parent.
    pub home_class: Option<Weak<ClassObject>>,
}

pub struct NativeFunction {
    pub name: String,
    pub func: NativeFn,
}

pub struct ClassObject {
    pub name: String,
    pub parent: Option<Rc<ClassObject>>,
    pub data: Rc<ClassData>,
    pub env: EnvRef,
    methods: IndexMap<String, ObjectRef>,
}

impl ClassObject {
    pub fn new(data: Rc<ClassData>, parent: Option<Rc<ClassObject>>, env: EnvRef) -> Rc<Self> {
        Rc::new_cyclic(|home: &Weak<ClassObject>| {
            let mut methods = IndexMap::new();
            for method in &data.methods {
                let function = FunctionObject {
                    name: method.name.clone(),
                    data: method.clone(),
                    env: env.clone(),
                    home_class: Some(home.clone()),
                };
                methods.insert(method.name.clone(), ScriptObject::new_function(function));
            }
            ClassObject {
                name: data.name.clone(),
                parent,
                data,
                env,
                methods,
            }
        })
    }

    /// Method lookup along the `extends` chain.
    pub fn find_method(&self, name: &str) -> Option<ObjectRef> {
        match self.methods.get(name) {
            Some(m) => Some(m.clone()),
            None => match &self.parent {
                Some(p) => p.find_method(name),
                None => None,
            },
        }
    }

    pub fn has_method(&self, name: &str) -> bool {
        self.methods.contains_key(name) || self.parent.as_ref().map_or(false, |p| p.has_method(name))
    }
}

/// Intercepts property access on a proxy object. The runner knows nothing about
/// documents; the controller layer supplies the handler.
pub trait ProxyHandler {
    fn get(&self, target: &ObjectRef, key: &str) -> Result<ScriptValue, ScriptErrorType>;

    fn set(&self, target: &ObjectRef, key: &str, value: ScriptValue) -> Result<(), ScriptErrorType>;
}

pub struct ProxyData {
    pub target: ObjectRef,
    pub handler: Rc<dyn ProxyHandler>,
}

pub enum ObjectKind {
    Ordinary,
    Array(Vec<ScriptValue>),
    Function(Rc<FunctionObject>),
    Native(Rc<NativeFunction>),
    Class(Rc<ClassObject>),
    Instance(Rc<ClassObject>),
    Proxy(ProxyData),
}

pub struct ScriptObject {
    pub kind: ObjectKind,
    properties: IndexMap<String, Property>,
}

impl ScriptObject {
    fn wrap(kind: ObjectKind) -> ObjectRef {
        Rc::new(RefCell::new(ScriptObject {
            kind,
            properties: IndexMap::new(),
        }))
    }

    pub fn new_ordinary() -> ObjectRef {
        Self::wrap(ObjectKind::Ordinary)
    }

    pub fn new_array(items: Vec<ScriptValue>) -> ObjectRef {
        Self::wrap(ObjectKind::Array(items))
    }

    pub fn new_function(function: FunctionObject) -> ObjectRef {
        Self::wrap(ObjectKind::Function(Rc::new(function)))
    }

    pub fn new_native(name: impl Into<String>, func: NativeFn) -> ObjectRef {
        Self::wrap(ObjectKind::Native(Rc::new(NativeFunction {
            name: name.into(),
            func,
        })))
    }

    pub fn new_class(class: Rc<ClassObject>) -> ObjectRef {
        Self::wrap(ObjectKind::Class(class))
    }

    pub fn new_instance(class: Rc<ClassObject>) -> ObjectRef {
        Self::wrap(ObjectKind::Instance(class))
    }

    pub fn new_proxy(target: ObjectRef, handler: Rc<dyn ProxyHandler>) -> ObjectRef {
        Self::wrap(ObjectKind::Proxy(ProxyData { target, handler }))
    }

    pub fn get_own(&self, key: &str) -> Option<&ScriptValue> {
        self.properties.get(key).map(|p| &p.value)
    }

    pub fn has_own(&self, key: &str) -> bool {
        self.properties.contains_key(key)
    }

    /// Writes an own property, keeping the enumerability of an existing one.
    pub fn set_own(&mut self, key: &str, value: ScriptValue) {
        match self.properties.get_mut(key) {
            Some(p) => p.value = value,
            None => {
                self.properties.insert(
                    key.to_string(),
                    Property {
                        value,
                        enumerable: true,
                    },
                );
            }
        }
    }

    pub fn define_hidden(&mut self, key: &str, value: ScriptValue) {
        self.properties.insert(
            key.to_string(),
            Property {
                value,
                enumerable: false,
            },
        );
    }

    pub fn remove_own(&mut self, key: &str) -> Option<ScriptValue> {
        self.properties.shift_remove(key).map(|p| p.value)
    }

    pub fn enumerable_entries(&self) -> Vec<(String, ScriptValue)> {
        self.properties
            .iter()
            .filter(|(_, p)| p.enumerable)
            .map(|(k, p)| (k.clone(), p.value.clone()))
            .collect()
    }

    pub fn is_callable(&self) -> bool {
        matches!(self.kind, ObjectKind::Function(_) | ObjectKind::Native(_))
    }

    pub fn is_array(&self) -> bool {
        matches!(self.kind, ObjectKind::Array(_))
    }

    pub fn as_array(&self) -> Option<&Vec<ScriptValue>> {
        match &self.kind {
            ObjectKind::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_array_mut(&mut self) -> Option<&mut Vec<ScriptValue>> {
        match &mut self.kind {
            ObjectKind::Array(items) => Some(items),
            _ => None,
        }
    }

    /// Class of an instance.
    pub fn class(&self) -> Option<&Rc<ClassObject>> {
        match &self.kind {
            ObjectKind::Instance(c) => Some(c),
            _ => None,
        }
    }

    pub fn proxy_target(&self) -> Option<&ObjectRef> {
        match &self.kind {
            ObjectKind::Proxy(p) => Some(&p.target),
            _ => None,
        }
    }
}

impl Display for ScriptObject {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ObjectKind::Ordinary => write!(f, "[object Object]"),
            ObjectKind::Array(items) => write!(f, "[Array({})]", items.len()),
            ObjectKind::Function(func) => write!(f, "[Function: {}]", func.name),
            ObjectKind::Native(func) => write!(f, "[Function: {}]", func.name),
            ObjectKind::Class(class) => write!(f, "[class {}]", class.name),
            ObjectKind::Instance(class) => write!(f, "[{} instance]", class.name),
            ObjectKind::Proxy(_) => write!(f, "[object Proxy]"),
        }
    }
}
