use crate::runner::ds::error::ScriptErrorType;
use crate::runner::ds::object::{ObjectKind, ObjectRef};
use crate::runner::ds::operations::type_conversion::{to_array_index, to_display_string, to_number};
use crate::runner::ds::value::{NumberType, ScriptValue};
use crate::runner::std_lib::{array, string};

pub fn get_property(base: &ScriptValue, key: &str) -> Result<ScriptValue, ScriptErrorType> {
    match base {
        ScriptValue::Undefined | ScriptValue::Null => Err(ScriptErrorType::TypeError(format!(
            "Cannot read properties of {} (reading '{}')",
            to_display_string(base),
            key
        ))),
        ScriptValue::String(s) => {
            if key == "length" {
                return Ok(ScriptValue::from_i64(s.chars().count() as i64));
            }
            if let Some(i) = to_array_index(key) {
                return Ok(s
                    .chars()
                    .nth(i)
                    .map(|c| ScriptValue::String(c.to_string()))
                    .unwrap_or(ScriptValue::Undefined));
            }
            Ok(string::get_method(key)
                .map(ScriptValue::Object)
                .unwrap_or(ScriptValue::Undefined))
        }
        ScriptValue::Boolean(_) | ScriptValue::Number(_) => Ok(ScriptValue::Undefined),
        ScriptValue::Object(o) => get_object_property(o, key),
    }
}

pub fn get_object_property(o: &ObjectRef, key: &str) -> Result<ScriptValue, ScriptErrorType> {
    let obj = o.borrow();
    if let ObjectKind::Proxy(p) = &obj.kind {
        let target = p.target.clone();
        let handler = p.handler.clone();
        drop(obj);
        return handler.get(&target, key);
    }
    if let Some(v) = obj.get_own(key) {
        return Ok(v.clone());
    }
    Ok(match &obj.kind {
        ObjectKind::Array(items) => {
            if key == "length" {
                ScriptValue::from_i64(items.len() as i64)
            } else if let Some(i) = to_array_index(key) {
                items.get(i).cloned().unwrap_or(ScriptValue::Undefined)
            } else {
                array::get_method(key)
                    .map(ScriptValue::Object)
                    .unwrap_or(ScriptValue::Undefined)
            }
        }
        ObjectKind::Instance(class) => class
            .find_method(key)
            .map(ScriptValue::Object)
            .unwrap_or(ScriptValue::Undefined),
        ObjectKind::Class(class) if key == "name" => ScriptValue::String(class.name.clone()),
        ObjectKind::Function(f) if key == "name" => ScriptValue::String(f.name.clone()),
        ObjectKind::Native(f) if key == "name" => ScriptValue::String(f.name.clone()),
        _ => ScriptValue::Undefined,
    })
}

/// Property lookup for a call. An instance's own property that is not
/// callable does not hide the class method of the same name.
pub fn get_callable_property(base: &ScriptValue, key: &str) -> Result<ScriptValue, ScriptErrorType> {
    let value = get_property(base, key)?;
    if value.is_callable() {
        return Ok(value);
    }
    if let ScriptValue::Object(o) = base {
        if let Some(class) = o.borrow().class() {
            if let Some(method) = class.find_method(key) {
                return Ok(ScriptValue::Object(method));
            }
        }
    }
    Ok(value)
}

pub fn set_property(
    base: &ScriptValue,
    key: &str,
    value: ScriptValue,
) -> Result<(), ScriptErrorType> {
    match base {
        ScriptValue::Undefined | ScriptValue::Null => Err(ScriptErrorType::TypeError(format!(
            "Cannot set properties of {} (setting '{}')",
            to_display_string(base),
            key
        ))),
        ScriptValue::Object(o) => set_object_property(o, key, value),
        // Writes to primitives are dropped.
        _ => Ok(()),
    }
}

pub fn set_object_property(
    o: &ObjectRef,
    key: &str,
    value: ScriptValue,
) -> Result<(), ScriptErrorType> {
    let mut obj = o.borrow_mut();
    if let ObjectKind::Proxy(p) = &obj.kind {
        let target = p.target.clone();
        let handler = p.handler.clone();
        drop(obj);
        return handler.set(&target, key, value);
    }
    if let Some(items) = obj.as_array_mut() {
        if key == "length" {
            let len = match to_number(&value) {
                NumberType::Integer(i) if i >= 0 => i as usize,
                _ => {
                    return Err(ScriptErrorType::RangeError(
                        "Invalid array length".to_string(),
                    ))
                }
            };
            items.resize(len, ScriptValue::Undefined);
            return Ok(());
        }
        if let Some(i) = to_array_index(key) {
            if i >= items.len() {
                items.resize(i + 1, ScriptValue::Undefined);
            }
            items[i] = value;
            return Ok(());
        }
    }
    obj.set_own(key, value);
    Ok(())
}

/// Enumerable own keys in insertion order. Proxies report their target's keys,
/// arrays their indices.
pub fn own_enumerable_keys(o: &ObjectRef) -> Vec<String> {
    let obj = o.borrow();
    match &obj.kind {
        ObjectKind::Proxy(p) => {
            let target = p.target.clone();
            drop(obj);
            own_enumerable_keys(&target)
        }
        ObjectKind::Array(items) => (0..items.len()).map(|i| i.to_string()).collect(),
        _ => obj.enumerable_entries().into_iter().map(|(k, _)| k).collect(),
    }
}

/// Strips any proxy layers.
pub fn unwrap_proxy(o: &ObjectRef) -> ObjectRef {
    let mut current = o.clone();
    loop {
        let next = match current.borrow().proxy_target() {
            Some(t) => t.clone(),
            None => break,
        };
        current = next;
    }
    current
}
