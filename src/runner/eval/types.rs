//! Core types for the evaluation engine.

use crate::runner::ds::error::ScriptErrorType;
use crate::runner::ds::operations::object::{get_property, set_property};
use crate::runner::ds::value::ScriptValue;
use crate::runner::plugin::types::EvalContext;

/// How a statement finished. Throws travel as `Err(ScriptErrorType::Thrown)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CompletionType {
    /// Normal completion - execution continues.
    Normal,
    /// Return completion - function returns.
    Return,
    /// Break completion - break from loop.
    Break,
    /// Continue completion - continue loop iteration.
    Continue,
}

/// Completion record. Every statement evaluation returns one.
#[derive(Debug)]
pub struct Completion {
    pub completion_type: CompletionType,
    pub value: Option<ScriptValue>,
}

impl Completion {
    pub fn normal() -> Self {
        Completion {
            completion_type: CompletionType::Normal,
            value: None,
        }
    }

    pub fn normal_with_value(value: ScriptValue) -> Self {
        Completion {
            completion_type: CompletionType::Normal,
            value: Some(value),
        }
    }

    pub fn return_value(value: ScriptValue) -> Self {
        Completion {
            completion_type: CompletionType::Return,
            value: Some(value),
        }
    }

    pub fn break_completion() -> Self {
        Completion {
            completion_type: CompletionType::Break,
            value: None,
        }
    }

    pub fn continue_completion() -> Self {
        Completion {
            completion_type: CompletionType::Continue,
            value: None,
        }
    }

    pub fn is_normal(&self) -> bool {
        self.completion_type == CompletionType::Normal
    }

    pub fn is_abrupt(&self) -> bool {
        !self.is_normal()
    }

    /// Get the value, or undefined if none.
    pub fn get_value(&self) -> ScriptValue {
        self.value.clone().unwrap_or(ScriptValue::Undefined)
    }
}

/// Where an assignment lands.
pub enum Reference {
    /// A binding in the lexical chain.
    Binding(String),
    /// A property on a base value.
    Property { base: ScriptValue, name: String },
}

impl Reference {
    pub fn get_value(&self, ctx: &mut EvalContext) -> ValueResult {
        match self {
            Reference::Binding(name) => ctx.get_binding_value(name),
            Reference::Property { base, name } => get_property(base, name),
        }
    }

    pub fn put_value(&self, ctx: &mut EvalContext, value: ScriptValue) -> Result<(), ScriptErrorType> {
        match self {
            Reference::Binding(name) => ctx.set_binding_value(name, value),
            Reference::Property { base, name } => set_property(base, name, value),
        }
    }
}

/// Result type for statement execution.
pub type EvalResult = Result<Completion, ScriptErrorType>;

/// Result type for value-returning operations.
pub type ValueResult = Result<ScriptValue, ScriptErrorType>;
