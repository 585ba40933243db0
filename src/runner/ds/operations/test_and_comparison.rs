use std::cmp::Ordering;
use std::rc::Rc;

use crate::runner::ds::operations::type_conversion::{to_display_string, to_number};
use crate::runner::ds::value::{NumberType, ScriptValue};

/// `===`
pub fn is_strictly_equal(a: &ScriptValue, b: &ScriptValue) -> bool {
    match (a, b) {
        (ScriptValue::Object(x), ScriptValue::Object(y)) => Rc::ptr_eq(x, y),
        _ => a == b,
    }
}

/// `==`. Nullish values equal each other only; mixed primitives compare as
/// numbers unless both are strings.
pub fn is_loosely_equal(a: &ScriptValue, b: &ScriptValue) -> bool {
    match (a, b) {
        (ScriptValue::Undefined, _) | (ScriptValue::Null, _) => b.is_nullish(),
        (_, ScriptValue::Undefined) | (_, ScriptValue::Null) => false,
        (ScriptValue::Object(x), ScriptValue::Object(y)) => Rc::ptr_eq(x, y),
        (ScriptValue::String(x), ScriptValue::String(y)) => x == y,
        (ScriptValue::Object(_), ScriptValue::String(_))
        | (ScriptValue::String(_), ScriptValue::Object(_)) => {
            to_display_string(a) == to_display_string(b)
        }
        _ => to_number(a) == to_number(b),
    }
}

/// Relational comparison for `<`, `<=`, `>`, `>=`. `None` when either side is NaN.
pub fn compare_values(a: &ScriptValue, b: &ScriptValue) -> Option<Ordering> {
    if let (ScriptValue::String(x), ScriptValue::String(y)) = (a, b) {
        return Some(x.cmp(y));
    }
    compare_numbers(&to_number(a), &to_number(b))
}

pub fn compare_numbers(a: &NumberType, b: &NumberType) -> Option<Ordering> {
    match (a, b) {
        (NumberType::Integer(x), NumberType::Integer(y)) => Some(x.cmp(y)),
        (NumberType::NaN, _) | (_, NumberType::NaN) => None,
        _ => a.as_f64().partial_cmp(&b.as_f64()),
    }
}
