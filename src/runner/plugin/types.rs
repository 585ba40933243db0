//! Core types shared by the evaluator and host capabilities.

use std::rc::Rc;

use indexmap::IndexMap;

use crate::runner::ds::env_record::BindingKind;
use crate::runner::ds::error::ScriptErrorType;
use crate::runner::ds::lex_env::{get_identifier_value, set_identifier_value, EnvRef, LexEnvironment};
use crate::runner::ds::object::{ClassObject, ScriptObject};
use crate::runner::ds::value::ScriptValue;
use crate::runner::plugin::super_global::SuperGlobalEnvironment;

pub const DEFAULT_MAX_CALL_DEPTH: usize = 64;

/// Function signature for host-provided and built-in methods.
/// Native functions receive the evaluation context, `this` value, and arguments.
pub type NativeFn =
    Rc<dyn Fn(&mut EvalContext, ScriptValue, Vec<ScriptValue>) -> Result<ScriptValue, ScriptErrorType>>;

/// Boxes a closure or fn item as a [`NativeFn`].
pub fn native_fn<F>(f: F) -> NativeFn
where
    F: Fn(&mut EvalContext, ScriptValue, Vec<ScriptValue>) -> Result<ScriptValue, ScriptErrorType>
        + 'static,
{
    Rc::new(f)
}

/// The environment, `this` and class a function body runs with.
pub struct Frame {
    pub env: EnvRef,
    pub this_value: ScriptValue,
    pub home_class: Option<Rc<ClassObject>>,
}

/// Execution context threaded through evaluation and into native functions.
pub struct EvalContext {
    pub env: EnvRef,
    pub this_value: ScriptValue,
    /// Class whose method is executing; `super` resolves against its parent.
    pub home_class: Option<Rc<ClassObject>>,
    super_global: Rc<SuperGlobalEnvironment>,
    call_depth: usize,
    max_call_depth: usize,
}

impl EvalContext {
    pub fn new(super_global: Rc<SuperGlobalEnvironment>) -> Self {
        EvalContext {
            env: LexEnvironment::new_global(),
            this_value: ScriptValue::Undefined,
            home_class: None,
            super_global,
            call_depth: 0,
            max_call_depth: DEFAULT_MAX_CALL_DEPTH,
        }
    }

    pub fn with_max_call_depth(mut self, max_call_depth: usize) -> Self {
        self.max_call_depth = max_call_depth;
        self
    }

    /// A context that runs in an existing environment, e.g. a compiled
    /// script's scope when a controller is instantiated later.
    pub fn with_env(mut self, env: EnvRef) -> Self {
        self.env = env;
        self
    }

    pub fn super_global(&self) -> &Rc<SuperGlobalEnvironment> {
        &self.super_global
    }

    /// Lexical scopes first, then the capability scope.
    pub fn get_binding_value(&mut self, name: &str) -> Result<ScriptValue, ScriptErrorType> {
        if let Some(v) = get_identifier_value(&self.env, name) {
            return Ok(v);
        }
        match self.super_global.resolve_binding(name)? {
            Some(v) => Ok(v),
            None => Err(ScriptErrorType::ReferenceError(format!("{} is not defined", name))),
        }
    }

    pub fn set_binding_value(&mut self, name: &str, value: ScriptValue) -> Result<(), ScriptErrorType> {
        if set_identifier_value(&self.env, name, value)? {
            return Ok(());
        }
        if self.super_global.has_name(name) {
            Err(ScriptErrorType::TypeError(format!(
                "Cannot assign to capability '{}'",
                name
            )))
        } else {
            Err(ScriptErrorType::ReferenceError(format!("{} is not defined", name)))
        }
    }

    pub fn declare(
        &mut self,
        name: &str,
        kind: BindingKind,
        value: ScriptValue,
    ) -> Result<(), ScriptErrorType> {
        self.env.borrow_mut().declare(name, kind, value)
    }

    pub fn push_block_scope(&mut self) {
        self.env = LexEnvironment::new_child(&self.env);
    }

    pub fn pop_block_scope(&mut self) {
        let outer = self.env.borrow().outer.clone();
        if let Some(outer) = outer {
            self.env = outer;
        }
    }

    /// Swaps in the frame of a function call, returning the caller's.
    pub fn enter_frame(&mut self, frame: Frame) -> Result<Frame, ScriptErrorType> {
        if self.call_depth >= self.max_call_depth {
            return Err(ScriptErrorType::RangeError(
                "Maximum call stack size exceeded".to_string(),
            ));
        }
        self.call_depth += 1;
        let previous = Frame {
            env: std::mem::replace(&mut self.env, frame.env),
            this_value: std::mem::replace(&mut self.this_value, frame.this_value),
            home_class: std::mem::replace(&mut self.home_class, frame.home_class),
        };
        Ok(previous)
    }

    pub fn exit_frame(&mut self, previous: Frame) {
        self.call_depth = self.call_depth.saturating_sub(1);
        self.env = previous.env;
        self.this_value = previous.this_value;
        self.home_class = previous.home_class;
    }
}

/// A host object exposed to scripts, e.g. `router` with `push` and `replace`.
#[derive(Clone)]
pub struct HostObject {
    /// Name the object is bound to in the capability scope.
    pub name: String,
    pub methods: IndexMap<String, NativeFn>,
    pub properties: IndexMap<String, ScriptValue>,
}

impl HostObject {
    pub fn new(name: impl Into<String>) -> Self {
        HostObject {
            name: name.into(),
            methods: IndexMap::new(),
            properties: IndexMap::new(),
        }
    }

    pub fn add_method<F>(mut self, name: impl Into<String>, func: F) -> Self
    where
        F: Fn(&mut EvalContext, ScriptValue, Vec<ScriptValue>) -> Result<ScriptValue, ScriptErrorType>
            + 'static,
    {
        self.methods.insert(name.into(), native_fn(func));
        self
    }

    pub fn add_property(mut self, name: impl Into<String>, value: ScriptValue) -> Self {
        self.properties.insert(name.into(), value);
        self
    }

    /// Builds the script-visible object. Methods are non-enumerable.
    pub fn materialize(&self) -> ScriptValue {
        let obj = ScriptObject::new_ordinary();
        {
            let mut o = obj.borrow_mut();
            for (name, value) in &self.properties {
                o.set_own(name, value.clone());
            }
            for (name, func) in &self.methods {
                let method = ScriptObject::new_native(format!("{}.{}", self.name, name), func.clone());
                o.define_hidden(name, ScriptValue::Object(method));
            }
        }
        ScriptValue::Object(obj)
    }
}
