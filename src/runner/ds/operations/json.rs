use std::cell::RefCell;

use serde_json::{Map, Number, Value};

use crate::runner::ds::object::{ObjectKind, ObjectRef, ScriptObject};
use crate::runner::ds::value::{NumberType, ScriptValue};

pub fn from_json(value: &Value) -> ScriptValue {
    match value {
        Value::Null => ScriptValue::Null,
        Value::Bool(b) => ScriptValue::Boolean(*b),
        Value::Number(n) => match n.as_i64() {
            Some(i) => ScriptValue::from_i64(i),
            None => ScriptValue::from_f64(n.as_f64().unwrap_or(f64::NAN)),
        },
        Value::String(s) => ScriptValue::String(s.clone()),
        Value::Array(items) => {
            ScriptValue::Object(ScriptObject::new_array(items.iter().map(from_json).collect()))
        }
        Value::Object(map) => {
            let obj = ScriptObject::new_ordinary();
            {
                let mut o = obj.borrow_mut();
                for (k, v) in map {
                    o.set_own(k, from_json(v));
                }
            }
            ScriptValue::Object(obj)
        }
    }
}

/// JSON view of a value. Undefined and functions are dropped from objects and
/// become null in arrays; proxies serialize their target; cycles become null.
pub fn to_json(value: &ScriptValue) -> Value {
    let mut visiting = vec![];
    to_json_inner(value, &mut visiting).unwrap_or(Value::Null)
}

fn to_json_inner(value: &ScriptValue, visiting: &mut Vec<*const RefCell<ScriptObject>>) -> Option<Value> {
    match value {
        ScriptValue::Undefined => None,
        ScriptValue::Null => Some(Value::Null),
        ScriptValue::Boolean(b) => Some(Value::Bool(*b)),
        ScriptValue::String(s) => Some(Value::String(s.clone())),
        ScriptValue::Number(n) => Some(match n {
            NumberType::Integer(i) => Value::Number(Number::from(*i)),
            NumberType::Float(f) => Number::from_f64(*f).map(Value::Number).unwrap_or(Value::Null),
            _ => Value::Null,
        }),
        ScriptValue::Object(o) => object_to_json(o, visiting),
    }
}

fn object_to_json(o: &ObjectRef, visiting: &mut Vec<*const RefCell<ScriptObject>>) -> Option<Value> {
    let ptr = o.as_ref() as *const RefCell<ScriptObject>;
    if visiting.contains(&ptr) {
        return Some(Value::Null);
    }
    let obj = o.try_borrow().ok()?;
    visiting.push(ptr);
    let result = match &obj.kind {
        ObjectKind::Proxy(p) => {
            let target = p.target.clone();
            object_to_json(&target, visiting)
        }
        ObjectKind::Array(items) => Some(Value::Array(
            items
                .iter()
                .map(|item| to_json_inner(item, visiting).unwrap_or(Value::Null))
                .collect(),
        )),
        ObjectKind::Function(_) | ObjectKind::Native(_) | ObjectKind::Class(_) => None,
        ObjectKind::Ordinary | ObjectKind::Instance(_) => {
            let mut map = Map::new();
            for (k, v) in obj.enumerable_entries() {
                if let Some(json) = to_json_inner(&v, visiting) {
                    map.insert(k, json);
                }
            }
            Some(Value::Object(map))
        }
    };
    visiting.pop();
    result
}
