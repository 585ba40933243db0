use std::cell::RefCell;
use std::rc::Rc;

use crate::runner::ds::env_record::{BindingKind, DeclarativeEnvironmentRecord};
use crate::runner::ds::error::ScriptErrorType;
use crate::runner::ds::value::ScriptValue;

pub type EnvRef = Rc<RefCell<LexEnvironment>>;

pub struct LexEnvironment {
    pub inner: DeclarativeEnvironmentRecord,
    pub outer: Option<EnvRef>,
}

impl LexEnvironment {
    pub fn new_global() -> EnvRef {
        Rc::new(RefCell::new(LexEnvironment {
            inner: DeclarativeEnvironmentRecord::new(),
            outer: None,
        }))
    }

    pub fn new_child(outer: &EnvRef) -> EnvRef {
        Rc::new(RefCell::new(LexEnvironment {
            inner: DeclarativeEnvironmentRecord::new(),
            outer: Some(outer.clone()),
        }))
    }

    pub fn declare(
        &mut self,
        name: &str,
        kind: BindingKind,
        value: ScriptValue,
    ) -> Result<(), ScriptErrorType> {
        self.inner.create_binding(name, kind, value)
    }
}

/// Walks the chain outwards. `None` means the name is not lexically bound.
pub fn get_identifier_value(env: &EnvRef, name: &str) -> Option<ScriptValue> {
    let mut current = Some(env.clone());
    while let Some(e) = current {
        let e = e.borrow();
        if let Some(v) = e.inner.get_binding_value(name) {
            return Some(v);
        }
        current = e.outer.clone();
    }
    None
}

/// Assigns to the nearest binding of `name`. Returns `false` when no scope
/// binds it.
pub fn set_identifier_value(
    env: &EnvRef,
    name: &str,
    value: ScriptValue,
) -> Result<bool, ScriptErrorType> {
    let mut current = Some(env.clone());
    while let Some(e) = current {
        let mut e = e.borrow_mut();
        if e.inner.has_binding(name) {
            return e.inner.set_mutable_binding(name, value);
        }
        current = e.outer.clone();
    }
    Ok(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inner_scope_shadows_and_assigns_outward() {
        let global = LexEnvironment::new_global();
        global
            .borrow_mut()
            .declare("x", BindingKind::Let, ScriptValue::from_i64(1))
            .unwrap();
        let child = LexEnvironment::new_child(&global);
        assert_eq!(get_identifier_value(&child, "x"), Some(ScriptValue::from_i64(1)));

        assert_eq!(set_identifier_value(&child, "x", ScriptValue::from_i64(5)).ok(), Some(true));
        assert_eq!(get_identifier_value(&global, "x"), Some(ScriptValue::from_i64(5)));

        child
            .borrow_mut()
            .declare("x", BindingKind::Let, ScriptValue::from_i64(9))
            .unwrap();
        assert_eq!(get_identifier_value(&child, "x"), Some(ScriptValue::from_i64(9)));
        assert_eq!(get_identifier_value(&global, "x"), Some(ScriptValue::from_i64(5)));
        assert_eq!(get_identifier_value(&child, "y"), None);
    }
}
