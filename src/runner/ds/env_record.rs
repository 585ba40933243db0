use std::collections::HashMap;

use crate::runner::ds::error::ScriptErrorType;
use crate::runner::ds::value::ScriptValue;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BindingKind {
    Var,
    Let,
    Const,
    Function,
    Class,
}

impl BindingKind {
    fn is_mutable(&self) -> bool {
        !matches!(self, BindingKind::Const | BindingKind::Class)
    }

    fn allows_redeclaration(&self) -> bool {
        matches!(self, BindingKind::Var | BindingKind::Function)
    }
}

struct Binding {
    value: ScriptValue,
    kind: BindingKind,
}

/// Bindings of one scope: the script scope, a function body or a block.
pub struct DeclarativeEnvironmentRecord {
    bindings: HashMap<String, Binding>,
}

impl DeclarativeEnvironmentRecord {
    pub fn new() -> Self {
        DeclarativeEnvironmentRecord {
            bindings: HashMap::new(),
        }
    }

    pub fn has_binding(&self, name: &str) -> bool {
        self.bindings.contains_key(name)
    }

    pub fn create_binding(
        &mut self,
        name: &str,
        kind: BindingKind,
        value: ScriptValue,
    ) -> Result<(), ScriptErrorType> {
        if let Some(existing) = self.bindings.get(name) {
            if !(existing.kind.allows_redeclaration() && kind.allows_redeclaration()) {
                return Err(ScriptErrorType::SyntaxError(format!(
                    "Identifier '{}' has already been declared",
                    name
                )));
            }
        }
        self.bindings
            .insert(name.to_string(), Binding { value, kind });
        Ok(())
    }

    pub fn set_mutable_binding(
        &mut self,
        name: &str,
        value: ScriptValue,
    ) -> Result<bool, ScriptErrorType> {
        match self.bindings.get_mut(name) {
            None => Ok(false),
            Some(binding) => {
                if !binding.kind.is_mutable() {
                    return Err(ScriptErrorType::TypeError(
                        "Assignment to constant variable".to_string(),
                    ));
                }
                binding.value = value;
                Ok(true)
            }
        }
    }

    pub fn get_binding_value(&self, name: &str) -> Option<ScriptValue> {
        self.bindings.get(name).map(|b| b.value.clone())
    }
}

impl Default for DeclarativeEnvironmentRecord {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_let_cannot_be_redeclared() {
        let mut record = DeclarativeEnvironmentRecord::new();
        record
            .create_binding("a", BindingKind::Let, ScriptValue::from_i64(1))
            .unwrap();
        assert!(record
            .create_binding("a", BindingKind::Let, ScriptValue::from_i64(2))
            .is_err());
    }

    #[test]
    fn test_var_redeclaration_overwrites() {
        let mut record = DeclarativeEnvironmentRecord::new();
        record
            .create_binding("a", BindingKind::Var, ScriptValue::from_i64(1))
            .unwrap();
        record
            .create_binding("a", BindingKind::Var, ScriptValue::from_i64(2))
            .unwrap();
        assert_eq!(record.get_binding_value("a"), Some(ScriptValue::from_i64(2)));
    }

    #[test]
    fn test_const_rejects_assignment() {
        let mut record = DeclarativeEnvironmentRecord::new();
        record
            .create_binding("a", BindingKind::Const, ScriptValue::Null)
            .unwrap();
        assert!(matches!(
            record.set_mutable_binding("a", ScriptValue::Undefined),
            Err(ScriptErrorType::TypeError(_))
        ));
        assert_eq!(record.set_mutable_binding("b", ScriptValue::Null).ok(), Some(false));
    }
}
