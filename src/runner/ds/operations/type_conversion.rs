use crate::runner::ds::object::ObjectKind;
use crate::runner::ds::value::{NumberType, ScriptValue};

pub const TYPE_STR_UNDEFINED: &str = "undefined";
pub const TYPE_STR_NULL: &str = "null";
pub const TYPE_STR_BOOLEAN: &str = "boolean";
pub const TYPE_STR_STRING: &str = "string";
pub const TYPE_STR_NUMBER: &str = "number";
pub const TYPE_STR_OBJECT: &str = "object";
pub const TYPE_STR_FUNCTION: &str = "function";

/// The `typeof` result.
pub fn get_type(a: &ScriptValue) -> &'static str {
    match a {
        ScriptValue::Undefined => TYPE_STR_UNDEFINED,
        ScriptValue::Null => TYPE_STR_OBJECT,
        ScriptValue::Boolean(_) => TYPE_STR_BOOLEAN,
        ScriptValue::String(_) => TYPE_STR_STRING,
        ScriptValue::Number(_) => TYPE_STR_NUMBER,
        ScriptValue::Object(o) => match &o.borrow().kind {
            ObjectKind::Function(_) | ObjectKind::Native(_) | ObjectKind::Class(_) => {
                TYPE_STR_FUNCTION
            }
            _ => TYPE_STR_OBJECT,
        },
    }
}

pub fn to_boolean(v: &ScriptValue) -> bool {
    match v {
        ScriptValue::Undefined | ScriptValue::Null => false,
        ScriptValue::Boolean(b) => *b,
        ScriptValue::String(s) => !s.is_empty(),
        ScriptValue::Number(n) => match n {
            NumberType::Integer(i) => *i != 0,
            NumberType::Float(f) => *f != 0.0,
            NumberType::NaN => false,
            NumberType::PositiveInfinity | NumberType::NegativeInfinity => true,
        },
        ScriptValue::Object(_) => true,
    }
}

pub fn to_number(v: &ScriptValue) -> NumberType {
    match v {
        ScriptValue::Undefined => NumberType::NaN,
        ScriptValue::Null => NumberType::Integer(0),
        ScriptValue::Boolean(b) => NumberType::Integer(if *b { 1 } else { 0 }),
        ScriptValue::Number(n) => *n,
        ScriptValue::String(s) => string_to_number(s),
        ScriptValue::Object(o) => {
            let o = o.borrow();
            match o.as_array() {
                // [] -> 0, [x] -> x, otherwise NaN
                Some(items) if items.is_empty() => NumberType::Integer(0),
                Some(items) if items.len() == 1 => to_number(&items[0]),
                _ => NumberType::NaN,
            }
        }
    }
}

fn string_to_number(s: &str) -> NumberType {
    let s = s.trim();
    if s.is_empty() {
        return NumberType::Integer(0);
    }
    match s {
        "Infinity" | "+Infinity" => return NumberType::PositiveInfinity,
        "-Infinity" => return NumberType::NegativeInfinity,
        _ => {}
    }
    if let Ok(i) = s.parse::<i64>() {
        return NumberType::from_i64(i);
    }
    // Rust accepts "inf"/"nan" spellings that scripts must not.
    if s.chars().any(|c| c.is_ascii_alphabetic() && c != 'e' && c != 'E') {
        return NumberType::NaN;
    }
    match s.parse::<f64>() {
        Ok(f) => NumberType::from_f64(f),
        Err(_) => NumberType::NaN,
    }
}

pub fn number_to_string(n: &NumberType) -> String {
    match n {
        NumberType::Integer(i) => i.to_string(),
        NumberType::Float(f) => {
            if *f == 0.0 {
                "0".to_string()
            } else if f.fract() == 0.0 && f.abs() < 1e21 {
                format!("{:.0}", f)
            } else {
                f.to_string()
            }
        }
        NumberType::NaN => "NaN".to_string(),
        NumberType::PositiveInfinity => "Infinity".to_string(),
        NumberType::NegativeInfinity => "-Infinity".to_string(),
    }
}

/// String conversion as used by `+`, property keys and console output.
pub fn to_display_string(v: &ScriptValue) -> String {
    match v {
        ScriptValue::Undefined => TYPE_STR_UNDEFINED.to_string(),
        ScriptValue::Null => TYPE_STR_NULL.to_string(),
        ScriptValue::Boolean(b) => b.to_string(),
        ScriptValue::String(s) => s.clone(),
        ScriptValue::Number(n) => number_to_string(n),
        ScriptValue::Object(o) => {
            let o = match o.try_borrow() {
                Ok(o) => o,
                Err(_) => return "[object Object]".to_string(),
            };
            match &o.kind {
                ObjectKind::Array(items) => items
                    .iter()
                    .map(|item| {
                        if item.is_nullish() {
                            String::new()
                        } else {
                            to_display_string(item)
                        }
                    })
                    .collect::<Vec<_>>()
                    .join(","),
                ObjectKind::Function(f) => format!("function {}() {{ [code] }}", f.name),
                ObjectKind::Native(f) => format!("function {}() {{ [native code] }}", f.name),
                ObjectKind::Class(c) => format!("class {}", c.name),
                ObjectKind::Proxy(p) => to_display_string(&ScriptValue::Object(p.target.clone())),
                ObjectKind::Ordinary | ObjectKind::Instance(_) => "[object Object]".to_string(),
            }
        }
    }
}

/// Integer view of a property key, for array indexing.
pub fn to_array_index(key: &str) -> Option<usize> {
    if key.is_empty() || (key.len() > 1 && key.starts_with('0')) {
        return None;
    }
    key.parse::<usize>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runner::ds::object::ScriptObject;

    #[test]
    fn test_to_number_of_strings() {
        assert_eq!(to_number(&ScriptValue::String(" 42 ".to_string())), NumberType::Integer(42));
        assert_eq!(to_number(&ScriptValue::String("2.5".to_string())), NumberType::Float(2.5));
        assert!(to_number(&ScriptValue::String("abc".to_string())).is_nan());
        assert!(to_number(&ScriptValue::String("inf".to_string())).is_nan());
        assert_eq!(to_number(&ScriptValue::String("".to_string())), NumberType::Integer(0));
    }

    #[test]
    fn test_display_string_of_array_joins_items() {
        let arr = ScriptObject::new_array(vec![
            ScriptValue::from_i64(1),
            ScriptValue::Null,
            ScriptValue::String("x".to_string()),
        ]);
        assert_eq!(to_display_string(&ScriptValue::Object(arr)), "1,,x");
    }

    #[test]
    fn test_typeof_null_is_object() {
        assert_eq!(get_type(&ScriptValue::Null), TYPE_STR_OBJECT);
        assert_eq!(get_type(&ScriptValue::Undefined), TYPE_STR_UNDEFINED);
    }

    #[test]
    fn test_array_index_rejects_leading_zero() {
        assert_eq!(to_array_index("0"), Some(0));
        assert_eq!(to_array_index("12"), Some(12));
        assert_eq!(to_array_index("01"), None);
        assert_eq!(to_array_index("length"), None);
    }
}
