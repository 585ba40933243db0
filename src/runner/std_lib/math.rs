//! `Math` host object: rounding, absolute value and min/max.

use crate::runner::ds::error::ScriptErrorType;
use crate::runner::ds::operations::type_conversion::to_number;
use crate::runner::ds::value::{NumberType, ScriptValue};
use crate::runner::plugin::types::{EvalContext, HostObject};

pub fn math_object() -> HostObject {
    HostObject::new("Math")
        .add_property("PI", ScriptValue::from_f64(std::f64::consts::PI))
        .add_method("abs", |_, _, args| Ok(unary(&args, f64::abs)))
        .add_method("floor", |_, _, args| Ok(unary(&args, f64::floor)))
        .add_method("ceil", |_, _, args| Ok(unary(&args, f64::ceil)))
        // Halves round toward positive infinity.
        .add_method("round", |_, _, args| Ok(unary(&args, |f| (f + 0.5).floor())))
        .add_method("min", math_min)
        .add_method("max", math_max)
}

fn unary(args: &[ScriptValue], op: impl Fn(f64) -> f64) -> ScriptValue {
    match args.first().map(to_number) {
        Some(NumberType::Integer(i)) => match op(i as f64) {
            r if r == i as f64 => ScriptValue::from_i64(i),
            r => ScriptValue::from_f64(r),
        },
        Some(n) => ScriptValue::from_f64(op(n.as_f64())),
        None => ScriptValue::Number(NumberType::NaN),
    }
}

fn fold(args: &[ScriptValue], initial: f64, pick: impl Fn(f64, f64) -> f64) -> ScriptValue {
    let mut acc = initial;
    for arg in args {
        let n = to_number(arg).as_f64();
        if n.is_nan() {
            return ScriptValue::Number(NumberType::NaN);
        }
        acc = pick(acc, n);
    }
    ScriptValue::from_f64(acc)
}

/// Math.min
fn math_min(
    _ctx: &mut EvalContext,
    _this: ScriptValue,
    args: Vec<ScriptValue>,
) -> Result<ScriptValue, ScriptErrorType> {
    Ok(fold(&args, f64::INFINITY, f64::min))
}

/// Math.max
fn math_max(
    _ctx: &mut EvalContext,
    _this: ScriptValue,
    args: Vec<ScriptValue>,
) -> Result<ScriptValue, ScriptErrorType> {
    Ok(fold(&args, f64::NEG_INFINITY, f64::max))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn n(f: f64) -> ScriptValue {
        ScriptValue::from_f64(f)
    }

    #[test]
    fn test_round_halves_up() {
        let round = |f| unary(&[n(f)], |x| (x + 0.5).floor());
        assert_eq!(round(2.5), ScriptValue::from_i64(3));
        assert_eq!(round(-2.5), ScriptValue::from_i64(-2));
        assert_eq!(round(1.2), ScriptValue::from_i64(1));
    }

    #[test]
    fn test_unary_keeps_integers() {
        assert_eq!(unary(&[ScriptValue::from_i64(-4)], f64::abs), ScriptValue::from_i64(4));
        assert!(matches!(unary(&[], f64::abs), ScriptValue::Number(NumberType::NaN)));
    }

    #[test]
    fn test_min_max() {
        let args = vec![ScriptValue::from_i64(3), n(1.5), ScriptValue::from_i64(7)];
        assert_eq!(fold(&args, f64::INFINITY, f64::min), n(1.5));
        assert_eq!(fold(&args, f64::NEG_INFINITY, f64::max), ScriptValue::from_i64(7));
        assert_eq!(
            fold(&[], f64::INFINITY, f64::min),
            ScriptValue::Number(NumberType::PositiveInfinity)
        );
    }

    #[test]
    fn test_nan_argument_poisons_result() {
        let args = vec![ScriptValue::from_i64(1), ScriptValue::String("x".to_string())];
        assert!(matches!(
            fold(&args, f64::NEG_INFINITY, f64::max),
            ScriptValue::Number(NumberType::NaN)
        ));
    }
}
