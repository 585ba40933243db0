use thiserror::Error;

use crate::runner::ds::object::ScriptObject;
use crate::runner::ds::operations::type_conversion::to_display_string;
use crate::runner::ds::value::ScriptValue;

pub const ERROR_NAME_REFERENCE: &str = "ReferenceError";
pub const ERROR_NAME_TYPE: &str = "TypeError";
pub const ERROR_NAME_RANGE: &str = "RangeError";
pub const ERROR_NAME_SYNTAX: &str = "SyntaxError";

#[derive(Debug, Clone, Error)]
pub enum ScriptErrorType {
    #[error("Uncaught reference error: {0}.")]
    ReferenceError(String),
    #[error("Uncaught type error: {0}.")]
    TypeError(String),
    #[error("Uncaught range error: {0}.")]
    RangeError(String),
    #[error("Uncaught syntax error: {0}.")]
    SyntaxError(String),
    /// A value raised by a script `throw`.
    #[error("Uncaught {}", describe_thrown(.0))]
    Thrown(ScriptValue),
}

impl ScriptErrorType {
    pub fn name(&self) -> &'static str {
        match self {
            ScriptErrorType::ReferenceError(_) => ERROR_NAME_REFERENCE,
            ScriptErrorType::TypeError(_) => ERROR_NAME_TYPE,
            ScriptErrorType::RangeError(_) => ERROR_NAME_RANGE,
            ScriptErrorType::SyntaxError(_) => ERROR_NAME_SYNTAX,
            ScriptErrorType::Thrown(_) => "Error",
        }
    }

    pub fn message(&self) -> String {
        match self {
            ScriptErrorType::ReferenceError(m)
            | ScriptErrorType::TypeError(m)
            | ScriptErrorType::RangeError(m)
            | ScriptErrorType::SyntaxError(m) => m.to_string(),
            ScriptErrorType::Thrown(v) => describe_thrown(v),
        }
    }

    /// The value a `catch (e)` clause binds. Thrown values pass through as-is,
    /// engine errors become `{ name, message }` objects.
    pub fn to_script_value(&self) -> ScriptValue {
        match self {
            ScriptErrorType::Thrown(v) => v.clone(),
            _ => {
                let obj = ScriptObject::new_ordinary();
                {
                    let mut o = obj.borrow_mut();
                    o.set_own("name", ScriptValue::String(self.name().to_string()));
                    o.set_own("message", ScriptValue::String(self.message()));
                }
                ScriptValue::Object(obj)
            }
        }
    }
}

/// Thrown `{ message }` objects render as their message, everything else as
/// its string conversion.
fn describe_thrown(value: &ScriptValue) -> String {
    if let ScriptValue::Object(o) = value {
        let o = o.borrow();
        if let Some(ScriptValue::String(m)) = o.get_own("message") {
            return match o.get_own("name") {
                Some(ScriptValue::String(n)) => format!("{}: {}", n, m),
                _ => m.to_string(),
            };
        }
    }
    to_display_string(value)
}
