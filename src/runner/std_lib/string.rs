//! String methods.
//!
//! Looked up through [`get_method`] when a property is read off a string
//! primitive.

use crate::runner::ds::error::ScriptErrorType;
use crate::runner::ds::object::{ObjectRef, ScriptObject};
use crate::runner::ds::operations::type_conversion::to_display_string;
use crate::runner::ds::value::ScriptValue;
use crate::runner::plugin::types::{native_fn, EvalContext, NativeFn};

/// Looks up a string method by name.
pub fn get_method(name: &str) -> Option<ObjectRef> {
    let func: NativeFn = match name {
        "includes" => native_fn(|_, this, args| {
            let (s, needle) = receiver_and_needle(&this, &args, "includes")?;
            Ok(ScriptValue::Boolean(s.contains(needle.as_str())))
        }),
        "startsWith" => native_fn(|_, this, args| {
            let (s, needle) = receiver_and_needle(&this, &args, "startsWith")?;
            Ok(ScriptValue::Boolean(s.starts_with(needle.as_str())))
        }),
        "endsWith" => native_fn(|_, this, args| {
            let (s, needle) = receiver_and_needle(&this, &args, "endsWith")?;
            Ok(ScriptValue::Boolean(s.ends_with(needle.as_str())))
        }),
        "indexOf" => native_fn(string_index_of),
        "trim" => native_fn(|_, this, _| Ok(ScriptValue::String(receiver(&this, "trim")?.trim().to_string()))),
        "toLowerCase" => native_fn(|_, this, _| {
            Ok(ScriptValue::String(receiver(&this, "toLowerCase")?.to_lowercase()))
        }),
        "toUpperCase" => native_fn(|_, this, _| {
            Ok(ScriptValue::String(receiver(&this, "toUpperCase")?.to_uppercase()))
        }),
        "split" => native_fn(string_split),
        _ => return None,
    };
    Some(ScriptObject::new_native(format!("String.{}", name), func))
}

fn receiver<'a>(this: &'a ScriptValue, method: &str) -> Result<&'a str, ScriptErrorType> {
    match this {
        ScriptValue::String(s) => Ok(s),
        _ => Err(ScriptErrorType::TypeError(format!(
            "String.{} called on a non-string",
            method
        ))),
    }
}

fn receiver_and_needle<'a>(
    this: &'a ScriptValue,
    args: &[ScriptValue],
    method: &str,
) -> Result<(&'a str, String), ScriptErrorType> {
    let s = receiver(this, method)?;
    let needle = args
        .first()
        .map(to_display_string)
        .unwrap_or_else(|| "undefined".to_string());
    Ok((s, needle))
}

/// Index in characters, not bytes.
fn string_index_of(
    _ctx: &mut EvalContext,
    this: ScriptValue,
    args: Vec<ScriptValue>,
) -> Result<ScriptValue, ScriptErrorType> {
    let (s, needle) = receiver_and_needle(&this, &args, "indexOf")?;
    let index = s
        .find(needle.as_str())
        .map(|byte| s[..byte].chars().count() as i64)
        .unwrap_or(-1);
    Ok(ScriptValue::from_i64(index))
}

fn string_split(
    _ctx: &mut EvalContext,
    this: ScriptValue,
    args: Vec<ScriptValue>,
) -> Result<ScriptValue, ScriptErrorType> {
    let s = receiver(&this, "split")?;
    let parts: Vec<ScriptValue> = match args.first() {
        None | Some(ScriptValue::Undefined) => vec![ScriptValue::String(s.to_string())],
        Some(sep) => {
            let sep = to_display_string(sep);
            if sep.is_empty() {
                s.chars().map(|c| ScriptValue::String(c.to_string())).collect()
            } else {
                s.split(sep.as_str())
                    .map(|p| ScriptValue::String(p.to_string()))
                    .collect()
            }
        }
    };
    Ok(ScriptValue::Object(ScriptObject::new_array(parts)))
}
