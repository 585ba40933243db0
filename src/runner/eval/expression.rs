//! Expression evaluation.
//!
//! Handles every expression kind of the form-script AST.

use std::cmp::Ordering;

use crate::parser::ast::{
    AssignmentOperator, BinaryOperator, ExpressionType, LiteralData, LiteralType, LogicalOperator,
    MemberProperty, NumberLiteralType, PropertyData, UnaryOperator,
};
use crate::runner::ds::error::ScriptErrorType;
use crate::runner::ds::object::ScriptObject;
use crate::runner::ds::operations::object::{get_callable_property, get_property, set_object_property};
use crate::runner::ds::operations::test_and_comparison::{
    compare_values, is_loosely_equal, is_strictly_equal,
};
use crate::runner::ds::operations::type_conversion::{
    get_type, to_boolean, to_display_string, to_number,
};
use crate::runner::ds::value::{NumberType, ScriptValue};
use crate::runner::plugin::types::EvalContext;

use super::function::{call_function, construct};
use super::types::{Reference, ValueResult};

const SUPER: &str = "super";

/// Evaluate an expression and return its value.
pub fn evaluate_expression(expr: &ExpressionType, ctx: &mut EvalContext) -> ValueResult {
    match expr {
        ExpressionType::Literal(lit) => Ok(evaluate_literal(lit)),

        ExpressionType::Identifier(id) => {
            if id.name == SUPER {
                return Err(ScriptErrorType::SyntaxError(
                    "'super' keyword unexpected here".to_string(),
                ));
            }
            ctx.get_binding_value(&id.name)
        }

        ExpressionType::ThisExpression { .. } => Ok(ctx.this_value.clone()),

        ExpressionType::ArrayExpression { elements, .. } => {
            let mut items = Vec::with_capacity(elements.len());
            for element in elements {
                items.push(evaluate_expression(element, ctx)?);
            }
            Ok(ScriptValue::Object(ScriptObject::new_array(items)))
        }

        ExpressionType::ObjectExpression { properties, .. } => {
            evaluate_object_expression(properties, ctx)
        }

        ExpressionType::UnaryExpression {
            operator, argument, ..
        } => evaluate_unary_expression(operator, argument, ctx),

        ExpressionType::BinaryExpression {
            operator,
            left,
            right,
            ..
        } => {
            let left = evaluate_expression(left, ctx)?;
            let right = evaluate_expression(right, ctx)?;
            apply_binary_operator(operator, &left, &right)
        }

        ExpressionType::LogicalExpression {
            operator,
            left,
            right,
            ..
        } => evaluate_logical_expression(operator, left, right, ctx),

        ExpressionType::AssignmentExpression {
            operator,
            target,
            value,
            ..
        } => evaluate_assignment_expression(operator, target, value, ctx),

        ExpressionType::ConditionalExpression {
            test,
            consequent,
            alternate,
            ..
        } => {
            if to_boolean(&evaluate_expression(test, ctx)?) {
                evaluate_expression(consequent, ctx)
            } else {
                evaluate_expression(alternate, ctx)
            }
        }

        ExpressionType::MemberExpression {
            object, property, ..
        } => {
            let key = evaluate_member_key(property, ctx)?;
            if is_super(object) {
                return Ok(super_method(ctx, &key)?.unwrap_or(ScriptValue::Undefined));
            }
            let base = evaluate_expression(object, ctx)?;
            get_property(&base, &key)
        }

        ExpressionType::CallExpression {
            callee, arguments, ..
        } => evaluate_call_expression(callee, arguments, ctx),

        ExpressionType::NewExpression {
            callee, arguments, ..
        } => {
            let class = ctx.get_binding_value(&callee.name)?;
            let args = evaluate_arguments(arguments, ctx)?;
            construct(ctx, &class, args)
        }
    }
}

fn evaluate_literal(lit: &LiteralData) -> ScriptValue {
    match &lit.value {
        LiteralType::NullLiteral => ScriptValue::Null,
        LiteralType::UndefinedLiteral => ScriptValue::Undefined,
        LiteralType::BooleanLiteral(b) => ScriptValue::Boolean(*b),
        LiteralType::StringLiteral(s) => ScriptValue::String(s.clone()),
        LiteralType::NumberLiteral(NumberLiteralType::IntegerLiteral(i)) => ScriptValue::from_i64(*i),
        LiteralType::NumberLiteral(NumberLiteralType::FloatLiteral(f)) => ScriptValue::from_f64(*f),
    }
}

fn evaluate_object_expression(properties: &[PropertyData], ctx: &mut EvalContext) -> ValueResult {
    let obj = ScriptObject::new_ordinary();
    for property in properties {
        let value = evaluate_expression(&property.value, ctx)?;
        set_object_property(&obj, &property.key, value)?;
    }
    Ok(ScriptValue::Object(obj))
}

fn is_super(expr: &ExpressionType) -> bool {
    matches!(expr, ExpressionType::Identifier(id) if id.name == SUPER)
}

/// `super.name` from inside a method: the parent class's method.
fn super_method(ctx: &EvalContext, name: &str) -> Result<Option<ScriptValue>, ScriptErrorType> {
    let parent = match ctx.home_class.as_ref().and_then(|c| c.parent.clone()) {
        Some(p) => p,
        None => {
            return Err(ScriptErrorType::SyntaxError(
                "'super' keyword unexpected here".to_string(),
            ))
        }
    };
    Ok(parent.find_method(name).map(ScriptValue::Object))
}

fn evaluate_member_key(property: &MemberProperty, ctx: &mut EvalContext) -> Result<String, ScriptErrorType> {
    match property {
        MemberProperty::Static(name) => Ok(name.clone()),
        MemberProperty::Computed(expr) => Ok(to_display_string(&evaluate_expression(expr, ctx)?)),
    }
}

fn evaluate_arguments(arguments: &[ExpressionType], ctx: &mut EvalContext) -> Result<Vec<ScriptValue>, ScriptErrorType> {
    let mut args = Vec::with_capacity(arguments.len());
    for arg in arguments {
        args.push(evaluate_expression(arg, ctx)?);
    }
    Ok(args)
}

fn evaluate_call_expression(
    callee: &ExpressionType,
    arguments: &[ExpressionType],
    ctx: &mut EvalContext,
) -> ValueResult {
    if is_super(callee) {
        // super(...) runs the parent constructor on the current instance.
        let args = evaluate_arguments(arguments, ctx)?;
        let this = ctx.this_value.clone();
        return match super_method(ctx, "constructor")? {
            Some(ctor) => call_function(ctx, &ctor, this, args),
            None => Ok(ScriptValue::Undefined),
        };
    }

    let (func, this) = match callee {
        ExpressionType::MemberExpression {
            object, property, ..
        } => {
            let key = evaluate_member_key(property, ctx)?;
            if is_super(object) {
                let func = super_method(ctx, &key)?.unwrap_or(ScriptValue::Undefined);
                (func, ctx.this_value.clone())
            } else {
                let base = evaluate_expression(object, ctx)?;
                let func = get_callable_property(&base, &key)?;
                (func, base)
            }
        }
        _ => (evaluate_expression(callee, ctx)?, ScriptValue::Undefined),
    };

    if !func.is_callable() {
        return Err(ScriptErrorType::TypeError(format!(
            "{} is not a function",
            callee.describe()
        )));
    }
    let args = evaluate_arguments(arguments, ctx)?;
    call_function(ctx, &func, this, args)
}

fn evaluate_unary_expression(
    operator: &UnaryOperator,
    argument: &ExpressionType,
    ctx: &mut EvalContext,
) -> ValueResult {
    if *operator == UnaryOperator::TypeOf {
        // typeof of an undeclared name is "undefined", not a ReferenceError.
        let value = match evaluate_expression(argument, ctx) {
            Ok(v) => v,
            Err(ScriptErrorType::ReferenceError(_)) if matches!(argument, ExpressionType::Identifier(_)) => {
                ScriptValue::Undefined
            }
            Err(e) => return Err(e),
        };
        return Ok(ScriptValue::String(get_type(&value).to_string()));
    }

    let value = evaluate_expression(argument, ctx)?;
    Ok(match operator {
        UnaryOperator::LogicalNot => ScriptValue::Boolean(!to_boolean(&value)),
        UnaryOperator::Plus => ScriptValue::Number(to_number(&value)),
        UnaryOperator::Minus => ScriptValue::Number(negate(to_number(&value))),
        // Host capabilities return settled values.
        UnaryOperator::Await => value,
        UnaryOperator::TypeOf => ScriptValue::Undefined,
    })
}

fn negate(n: NumberType) -> NumberType {
    match n {
        NumberType::Integer(0) => NumberType::Float(-0.0),
        NumberType::Integer(i) => match i.checked_neg() {
            Some(v) => NumberType::from_i64(v),
            None => NumberType::from_f64(-(i as f64)),
        },
        NumberType::Float(f) => NumberType::from_f64(-f),
        NumberType::NaN => NumberType::NaN,
        NumberType::PositiveInfinity => NumberType::NegativeInfinity,
        NumberType::NegativeInfinity => NumberType::PositiveInfinity,
    }
}

fn evaluate_logical_expression(
    operator: &LogicalOperator,
    left: &ExpressionType,
    right: &ExpressionType,
    ctx: &mut EvalContext,
) -> ValueResult {
    let left = evaluate_expression(left, ctx)?;
    let short_circuit = match operator {
        LogicalOperator::Or => to_boolean(&left),
        LogicalOperator::And => !to_boolean(&left),
        LogicalOperator::NullishCoalescing => !left.is_nullish(),
    };
    if short_circuit {
        Ok(left)
    } else {
        evaluate_expression(right, ctx)
    }
}

fn get_reference(target: &ExpressionType, ctx: &mut EvalContext) -> Result<Reference, ScriptErrorType> {
    match target {
        ExpressionType::Identifier(id) => Ok(Reference::Binding(id.name.clone())),
        ExpressionType::MemberExpression {
            object, property, ..
        } => {
            let base = evaluate_expression(object, ctx)?;
            let name = evaluate_member_key(property, ctx)?;
            Ok(Reference::Property { base, name })
        }
        _ => Err(ScriptErrorType::SyntaxError(
            "Invalid left-hand side in assignment".to_string(),
        )),
    }
}

fn evaluate_assignment_expression(
    operator: &AssignmentOperator,
    target: &ExpressionType,
    value: &ExpressionType,
    ctx: &mut EvalContext,
) -> ValueResult {
    let reference = get_reference(target, ctx)?;
    let new_value = match operator.binary_operator() {
        None => evaluate_expression(value, ctx)?,
        Some(binary) => {
            let current = reference.get_value(ctx)?;
            let rhs = evaluate_expression(value, ctx)?;
            apply_binary_operator(&binary, &current, &rhs)?
        }
    };
    reference.put_value(ctx, new_value.clone())?;
    Ok(new_value)
}

pub fn apply_binary_operator(
    operator: &BinaryOperator,
    left: &ScriptValue,
    right: &ScriptValue,
) -> ValueResult {
    Ok(match operator {
        BinaryOperator::StrictlyEqual => ScriptValue::Boolean(is_strictly_equal(left, right)),
        BinaryOperator::StrictlyUnequal => ScriptValue::Boolean(!is_strictly_equal(left, right)),
        BinaryOperator::LooselyEqual => ScriptValue::Boolean(is_loosely_equal(left, right)),
        BinaryOperator::LooselyUnequal => ScriptValue::Boolean(!is_loosely_equal(left, right)),
        BinaryOperator::LessThan => {
            ScriptValue::Boolean(compare_values(left, right) == Some(Ordering::Less))
        }
        BinaryOperator::LessThanEqual => ScriptValue::Boolean(matches!(
            compare_values(left, right),
            Some(Ordering::Less) | Some(Ordering::Equal)
        )),
        BinaryOperator::GreaterThan => {
            ScriptValue::Boolean(compare_values(left, right) == Some(Ordering::Greater))
        }
        BinaryOperator::GreaterThanEqual => ScriptValue::Boolean(matches!(
            compare_values(left, right),
            Some(Ordering::Greater) | Some(Ordering::Equal)
        )),
        BinaryOperator::Add => {
            let concatenates = |v: &ScriptValue| matches!(v, ScriptValue::String(_) | ScriptValue::Object(_));
            if concatenates(left) || concatenates(right) {
                ScriptValue::String(format!(
                    "{}{}",
                    to_display_string(left),
                    to_display_string(right)
                ))
            } else {
                ScriptValue::Number(arithmetic(operator, to_number(left), to_number(right)))
            }
        }
        BinaryOperator::Subtract
        | BinaryOperator::Multiply
        | BinaryOperator::Divide
        | BinaryOperator::Modulo => {
            ScriptValue::Number(arithmetic(operator, to_number(left), to_number(right)))
        }
    })
}

/// Integer arithmetic while it stays exact, f64 otherwise.
fn arithmetic(operator: &BinaryOperator, a: NumberType, b: NumberType) -> NumberType {
    if let (NumberType::Integer(x), NumberType::Integer(y)) = (a, b) {
        let exact = match operator {
            BinaryOperator::Add => x.checked_add(y),
            BinaryOperator::Subtract => x.checked_sub(y),
            BinaryOperator::Multiply => x.checked_mul(y),
            BinaryOperator::Divide if x.checked_rem(y) == Some(0) => x.checked_div(y),
            BinaryOperator::Modulo if !(x < 0 && x.checked_rem(y) == Some(0)) => x.checked_rem(y),
            _ => None,
        };
        if let Some(v) = exact {
            return NumberType::from_i64(v);
        }
    }
    let (x, y) = (a.as_f64(), b.as_f64());
    NumberType::from_f64(match operator {
        BinaryOperator::Add => x + y,
        BinaryOperator::Subtract => x - y,
        BinaryOperator::Multiply => x * y,
        BinaryOperator::Divide => x / y,
        BinaryOperator::Modulo => x % y,
        _ => f64::NAN,
    })
}
