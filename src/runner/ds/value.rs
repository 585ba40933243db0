use std::fmt;
use std::fmt::{Display, Formatter};
use std::rc::Rc;

use crate::runner::ds::object::ObjectRef;
use crate::runner::ds::operations::type_conversion::{TYPE_STR_NULL, TYPE_STR_UNDEFINED};

/// Largest integer an f64 holds exactly.
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

#[derive(Clone)]
pub enum ScriptValue {
    Undefined,
    Null,
    Boolean(bool),
    String(String),
    Number(NumberType),
    Object(ObjectRef),
}

impl ScriptValue {
    pub fn from_i64(i: i64) -> Self {
        ScriptValue::Number(NumberType::from_i64(i))
    }

    pub fn from_f64(f: f64) -> Self {
        ScriptValue::Number(NumberType::from_f64(f))
    }

    pub fn is_nullish(&self) -> bool {
        matches!(self, ScriptValue::Undefined | ScriptValue::Null)
    }

    pub fn as_object(&self) -> Option<&ObjectRef> {
        match self {
            ScriptValue::Object(o) => Some(o),
            _ => None,
        }
    }

    pub fn is_callable(&self) -> bool {
        match self {
            ScriptValue::Object(o) => o.try_borrow().map(|o| o.is_callable()).unwrap_or(false),
            _ => false,
        }
    }
}

impl Display for ScriptValue {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            ScriptValue::Undefined => write!(f, "{}", TYPE_STR_UNDEFINED),
            ScriptValue::Null => write!(f, "{}", TYPE_STR_NULL),
            ScriptValue::Boolean(b) => write!(f, "bool({})", b),
            ScriptValue::String(s) => write!(f, "\"{}\"", s),
            ScriptValue::Number(n) => write!(f, "{}", n),
            ScriptValue::Object(o) => match o.try_borrow() {
                Ok(obj) => write!(f, "{}", obj),
                Err(_) => write!(f, "[object]"),
            },
        }
    }
}

impl fmt::Debug for ScriptValue {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            ScriptValue::Undefined => write!(f, "ScriptValue::Undefined"),
            ScriptValue::Null => write!(f, "ScriptValue::Null"),
            ScriptValue::Boolean(b) => write!(f, "ScriptValue::Boolean({})", b),
            ScriptValue::String(s) => write!(f, "ScriptValue::String({:?})", s),
            ScriptValue::Number(n) => write!(f, "ScriptValue::Number({:?})", n),
            ScriptValue::Object(o) => match o.try_borrow() {
                Ok(obj) => write!(f, "ScriptValue::Object({})", obj),
                Err(_) => write!(f, "ScriptValue::Object(...)"),
            },
        }
    }
}

/// Structural equality for primitives; objects compare by identity.
impl PartialEq for ScriptValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (ScriptValue::Undefined, ScriptValue::Undefined) => true,
            (ScriptValue::Null, ScriptValue::Null) => true,
            (ScriptValue::Boolean(a), ScriptValue::Boolean(b)) => a == b,
            (ScriptValue::String(a), ScriptValue::String(b)) => a == b,
            (ScriptValue::Number(a), ScriptValue::Number(b)) => a == b,
            (ScriptValue::Object(a), ScriptValue::Object(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub enum NumberType {
    Integer(i64),
    Float(f64),
    NaN,
    PositiveInfinity,
    NegativeInfinity,
}

impl NumberType {
    /// Integers past the exact range become `Float`, rounding as f64 does.
    pub fn from_i64(i: i64) -> Self {
        if (i as f64).abs() <= MAX_SAFE_INTEGER {
            NumberType::Integer(i)
        } else {
            NumberType::Float(i as f64)
        }
    }

    /// Normalizes NaN and infinities into their own variants, and integral
    /// values within the exact range into `Integer`.
    pub fn from_f64(f: f64) -> Self {
        if f.is_nan() {
            NumberType::NaN
        } else if f == f64::INFINITY {
            NumberType::PositiveInfinity
        } else if f == f64::NEG_INFINITY {
            NumberType::NegativeInfinity
        } else if f.fract() == 0.0 && f.abs() <= MAX_SAFE_INTEGER && !(f == 0.0 && f.is_sign_negative()) {
            NumberType::Integer(f as i64)
        } else {
            NumberType::Float(f)
        }
    }

    pub fn as_f64(&self) -> f64 {
        match self {
            NumberType::Integer(i) => *i as f64,
            NumberType::Float(f) => *f,
            NumberType::NaN => f64::NAN,
            NumberType::PositiveInfinity => f64::INFINITY,
            NumberType::NegativeInfinity => f64::NEG_INFINITY,
        }
    }

    pub fn is_nan(&self) -> bool {
        matches!(self, NumberType::NaN)
    }
}

impl PartialEq for NumberType {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (NumberType::Integer(a), NumberType::Integer(b)) => a == b,
            (NumberType::NaN, _) | (_, NumberType::NaN) => false,
            _ => self.as_f64() == other.as_f64(),
        }
    }
}

impl Display for NumberType {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            NumberType::Integer(i) => write!(f, "{}", i),
            NumberType::Float(nf) => write!(f, "{}", nf),
            NumberType::NaN => write!(f, "NaN"),
            NumberType::PositiveInfinity => write!(f, "Infinity"),
            NumberType::NegativeInfinity => write!(f, "-Infinity"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integral_floats_collapse_to_integers() {
        assert!(matches!(NumberType::from_f64(10.0), NumberType::Integer(10)));
        assert!(matches!(NumberType::from_f64(2.5), NumberType::Float(_)));
        assert!(matches!(NumberType::from_f64(f64::NAN), NumberType::NaN));
        assert!(matches!(
            NumberType::from_f64(1.0 / 0.0),
            NumberType::PositiveInfinity
        ));
    }

    #[test]
    fn test_integers_past_the_exact_range_round() {
        assert!(matches!(NumberType::from_i64(9_007_199_254_740_991), NumberType::Integer(_)));
        assert!(matches!(NumberType::from_i64(i64::MIN), NumberType::Float(_)));
        assert_eq!(
            NumberType::from_i64(9_007_199_254_740_993),
            NumberType::from_i64(9_007_199_254_740_992)
        );
    }

    #[test]
    fn test_number_equality_crosses_representations() {
        assert_eq!(NumberType::Integer(2), NumberType::Float(2.0));
        assert_ne!(NumberType::NaN, NumberType::NaN);
    }
}
