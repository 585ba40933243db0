//! Array methods.
//!
//! Arrays carry no prototype object; property lookup on an array falls back
//! to [`get_method`] for these names.

use crate::runner::ds::error::ScriptErrorType;
use crate::runner::ds::object::{ObjectRef, ScriptObject};
use crate::runner::ds::operations::object::unwrap_proxy;
use crate::runner::ds::operations::test_and_comparison::is_strictly_equal;
use crate::runner::ds::operations::type_conversion::to_display_string;
use crate::runner::ds::value::{NumberType, ScriptValue};
use crate::runner::plugin::types::{native_fn, EvalContext};

/// Looks up an array method by name.
pub fn get_method(name: &str) -> Option<ObjectRef> {
    let func = match name {
        "push" => native_fn(array_push),
        "pop" => native_fn(array_pop),
        "includes" => native_fn(array_includes),
        "indexOf" => native_fn(array_index_of),
        "join" => native_fn(array_join),
        _ => return None,
    };
    Some(ScriptObject::new_native(format!("Array.{}", name), func))
}

/// Resolves `this` to the backing array object.
fn this_array(this: &ScriptValue, method: &str) -> Result<ObjectRef, ScriptErrorType> {
    match this {
        ScriptValue::Object(o) => {
            let target = unwrap_proxy(o);
            if target.borrow().is_array() {
                return Ok(target);
            }
            Err(not_an_array(method))
        }
        _ => Err(not_an_array(method)),
    }
}

fn not_an_array(method: &str) -> ScriptErrorType {
    ScriptErrorType::TypeError(format!("Array.{} called on a non-array", method))
}

/// SameValueZero: strict equality except that NaN equals NaN.
fn same_value_zero(a: &ScriptValue, b: &ScriptValue) -> bool {
    match (a, b) {
        (ScriptValue::Number(x), ScriptValue::Number(y)) if x.is_nan() && y.is_nan() => true,
        _ => is_strictly_equal(a, b),
    }
}

fn length_value(len: usize) -> ScriptValue {
    ScriptValue::Number(NumberType::Integer(len as i64))
}

fn array_push(
    _ctx: &mut EvalContext,
    this: ScriptValue,
    args: Vec<ScriptValue>,
) -> Result<ScriptValue, ScriptErrorType> {
    let array = this_array(&this, "push")?;
    let mut a = array.borrow_mut();
    let items = a.as_array_mut().ok_or_else(|| not_an_array("push"))?;
    items.extend(args);
    Ok(length_value(items.len()))
}

fn array_pop(
    _ctx: &mut EvalContext,
    this: ScriptValue,
    _args: Vec<ScriptValue>,
) -> Result<ScriptValue, ScriptErrorType> {
    let array = this_array(&this, "pop")?;
    let mut a = array.borrow_mut();
    let items = a.as_array_mut().ok_or_else(|| not_an_array("pop"))?;
    Ok(items.pop().unwrap_or(ScriptValue::Undefined))
}

fn array_includes(
    _ctx: &mut EvalContext,
    this: ScriptValue,
    args: Vec<ScriptValue>,
) -> Result<ScriptValue, ScriptErrorType> {
    let array = this_array(&this, "includes")?;
    let needle = args.into_iter().next().unwrap_or(ScriptValue::Undefined);
    let a = array.borrow();
    let found = a
        .as_array()
        .map(|items| items.iter().any(|v| same_value_zero(v, &needle)))
        .unwrap_or(false);
    Ok(ScriptValue::Boolean(found))
}

fn array_index_of(
    _ctx: &mut EvalContext,
    this: ScriptValue,
    args: Vec<ScriptValue>,
) -> Result<ScriptValue, ScriptErrorType> {
    let array = this_array(&this, "indexOf")?;
    let needle = args.into_iter().next().unwrap_or(ScriptValue::Undefined);
    let a = array.borrow();
    let index = a
        .as_array()
        .and_then(|items| items.iter().position(|v| is_strictly_equal(v, &needle)))
        .map(|i| i as i64)
        .unwrap_or(-1);
    Ok(ScriptValue::Number(NumberType::Integer(index)))
}

fn array_join(
    _ctx: &mut EvalContext,
    this: ScriptValue,
    args: Vec<ScriptValue>,
) -> Result<ScriptValue, ScriptErrorType> {
    let array = this_array(&this, "join")?;
    let separator = match args.first() {
        None | Some(ScriptValue::Undefined) => ",".to_string(),
        Some(v) => to_display_string(v),
    };
    let a = array.borrow();
    let joined = a
        .as_array()
        .map(|items| {
            items
                .iter()
                .map(|v| {
                    if v.is_nullish() {
                        String::new()
                    } else {
                        to_display_string(v)
                    }
                })
                .collect::<Vec<_>>()
                .join(&separator)
        })
        .unwrap_or_default();
    Ok(ScriptValue::String(joined))
}
