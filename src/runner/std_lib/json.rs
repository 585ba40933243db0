//! `JSON` host object backed by `serde_json`.

use crate::runner::ds::error::ScriptErrorType;
use crate::runner::ds::operations::json::{from_json, to_json};
use crate::runner::ds::value::ScriptValue;
use crate::runner::plugin::types::{EvalContext, HostObject};

pub fn json_object() -> HostObject {
    HostObject::new("JSON")
        .add_method("parse", json_parse)
        .add_method("stringify", json_stringify)
}

/// JSON.parse - Parse a JSON string into a script value.
fn json_parse(
    _ctx: &mut EvalContext,
    _this: ScriptValue,
    args: Vec<ScriptValue>,
) -> Result<ScriptValue, ScriptErrorType> {
    let text = match args.first() {
        Some(ScriptValue::String(s)) => s,
        _ => {
            return Err(ScriptErrorType::SyntaxError(
                "JSON.parse requires a string argument".to_string(),
            ))
        }
    };
    let value: serde_json::Value = serde_json::from_str(text)
        .map_err(|e| ScriptErrorType::SyntaxError(format!("Unexpected token in JSON: {}", e)))?;
    Ok(from_json(&value))
}

/// JSON.stringify - undefined and functions at the top level yield undefined.
fn json_stringify(
    _ctx: &mut EvalContext,
    _this: ScriptValue,
    args: Vec<ScriptValue>,
) -> Result<ScriptValue, ScriptErrorType> {
    let value = args.into_iter().next().unwrap_or(ScriptValue::Undefined);
    if matches!(value, ScriptValue::Undefined) || value.is_callable() {
        return Ok(ScriptValue::Undefined);
    }
    Ok(ScriptValue::String(to_json(&value).to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runner::ds::operations::object::get_property;
    use crate::runner::plugin::SuperGlobalEnvironment;
    use std::rc::Rc;

    fn ctx() -> EvalContext {
        EvalContext::new(Rc::new(SuperGlobalEnvironment::new()))
    }

    #[test]
    fn test_parse_object() {
        let parsed = json_parse(
            &mut ctx(),
            ScriptValue::Undefined,
            vec![ScriptValue::String(r#"{"qty": 2, "tags": ["a"]}"#.to_string())],
        )
        .unwrap();
        assert_eq!(get_property(&parsed, "qty").unwrap(), ScriptValue::from_i64(2));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        let err = json_parse(
            &mut ctx(),
            ScriptValue::Undefined,
            vec![ScriptValue::String("{oops".to_string())],
        )
        .unwrap_err();
        assert!(matches!(err, ScriptErrorType::SyntaxError(_)));
    }

    #[test]
    fn test_stringify() {
        let text = json_stringify(
            &mut ctx(),
            ScriptValue::Undefined,
            vec![ScriptValue::String("a\"b".to_string())],
        )
        .unwrap();
        assert_eq!(text, ScriptValue::String(r#""a\"b""#.to_string()));
        let undefined = json_stringify(&mut ctx(), ScriptValue::Undefined, vec![]).unwrap();
        assert_eq!(undefined, ScriptValue::Undefined);
    }
}
