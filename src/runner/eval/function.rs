//! Function calls, class declaration and instantiation.

use std::rc::Rc;

use crate::parser::ast::{ClassData, FunctionData};
use crate::runner::ds::env_record::BindingKind;
use crate::runner::ds::error::ScriptErrorType;
use crate::runner::ds::lex_env::LexEnvironment;
use crate::runner::ds::object::{ClassObject, FunctionObject, ObjectKind, ScriptObject};
use crate::runner::ds::operations::object::set_property;
use crate::runner::ds::value::ScriptValue;
use crate::runner::plugin::types::{EvalContext, Frame, NativeFn};

use super::expression::evaluate_expression;
use super::statement::execute_statements;
use super::types::{CompletionType, ValueResult};

/// Call a script function, method or native function.
pub fn call_function(
    ctx: &mut EvalContext,
    callee: &ScriptValue,
    this_value: ScriptValue,
    args: Vec<ScriptValue>,
) -> ValueResult {
    let obj = match callee {
        ScriptValue::Object(o) => o.clone(),
        _ => {
            return Err(ScriptErrorType::TypeError(format!(
                "{} is not a function",
                callee
            )))
        }
    };
    let kind = {
        let o = obj.borrow();
        match &o.kind {
            ObjectKind::Function(f) => Callable::Script(f.clone()),
            ObjectKind::Native(n) => Callable::Native(n.func.clone()),
            ObjectKind::Class(c) => {
                return Err(ScriptErrorType::TypeError(format!(
                    "Class constructor {} cannot be invoked without 'new'",
                    c.name
                )))
            }
            _ => {
                return Err(ScriptErrorType::TypeError(format!(
                    "{} is not a function",
                    callee
                )))
            }
        }
    };
    match kind {
        Callable::Script(f) => call_script_function(ctx, &f, this_value, args),
        Callable::Native(f) => f(ctx, this_value, args),
    }
}

enum Callable {
    Script(Rc<FunctionObject>),
    Native(NativeFn),
}

fn call_script_function(
    ctx: &mut EvalContext,
    function: &FunctionObject,
    this_value: ScriptValue,
    args: Vec<ScriptValue>,
) -> ValueResult {
    let env = LexEnvironment::new_child(&function.env);
    {
        let mut e = env.borrow_mut();
        let mut args = args.into_iter();
        for param in &function.data.params {
            e.declare(param, BindingKind::Var, args.next().unwrap_or(ScriptValue::Undefined))?;
        }
    }
    let home_class = function.home_class.as_ref().and_then(|w| w.upgrade());
    let previous = ctx.enter_frame(Frame {
        env,
        this_value,
        home_class,
    })?;
    let result = execute_statements(&function.data.body, ctx);
    ctx.exit_frame(previous);
    let completion = result?;
    Ok(match completion.completion_type {
        CompletionType::Return => completion.get_value(),
        _ => ScriptValue::Undefined,
    })
}

/// `new Callee(args)`. Only classes are constructible.
pub fn construct(ctx: &mut EvalContext, callee: &ScriptValue, args: Vec<ScriptValue>) -> ValueResult {
    let class = match callee {
        ScriptValue::Object(o) => match &o.borrow().kind {
            ObjectKind::Class(c) => Some(c.clone()),
            _ => None,
        },
        _ => None,
    };
    match class {
        Some(class) => instantiate_class(ctx, &class, args),
        None => Err(ScriptErrorType::TypeError(format!(
            "{} is not a constructor",
            callee
        ))),
    }
}

/// Creates an instance: field initializers run base-first, then the nearest
/// `constructor` along the chain.
pub fn instantiate_class(
    ctx: &mut EvalContext,
    class: &Rc<ClassObject>,
    args: Vec<ScriptValue>,
) -> ValueResult {
    let this = ScriptValue::Object(ScriptObject::new_instance(class.clone()));
    initialize_fields(ctx, class, &this)?;
    if let Some(ctor) = class.find_method("constructor") {
        call_function(ctx, &ScriptValue::Object(ctor), this.clone(), args)?;
    }
    Ok(this)
}

fn initialize_fields(
    ctx: &mut EvalContext,
    class: &Rc<ClassObject>,
    this: &ScriptValue,
) -> Result<(), ScriptErrorType> {
    if let Some(parent) = &class.parent {
        initialize_fields(ctx, parent, this)?;
    }
    if class.data.fields.is_empty() {
        return Ok(());
    }
    let previous = ctx.enter_frame(Frame {
        env: LexEnvironment::new_child(&class.env),
        this_value: this.clone(),
        home_class: Some(class.clone()),
    })?;
    let result = evaluate_fields(ctx, &class.data, this);
    ctx.exit_frame(previous);
    result
}

fn evaluate_fields(ctx: &mut EvalContext, data: &ClassData, this: &ScriptValue) -> Result<(), ScriptErrorType> {
    for field in &data.fields {
        let value = match &field.value {
            Some(expr) => evaluate_expression(expr, ctx)?,
            None => ScriptValue::Undefined,
        };
        set_property(this, &field.name, value)?;
    }
    Ok(())
}

/// Evaluates a class declaration into the current scope.
pub fn declare_class(ctx: &mut EvalContext, data: &Rc<ClassData>) -> ValueResult {
    let parent = match &data.super_class {
        None => None,
        Some(id) => {
            let value = ctx.get_binding_value(&id.name)?;
            let parent = match &value {
                ScriptValue::Object(o) => match &o.borrow().kind {
                    ObjectKind::Class(c) => Some(c.clone()),
                    _ => None,
                },
                _ => None,
            };
            match parent {
                Some(p) => Some(p),
                None => {
                    return Err(ScriptErrorType::TypeError(format!(
                        "Class extends value {} is not a constructor",
                        id.name
                    )))
                }
            }
        }
    };
    let class = ClassObject::new(data.clone(), parent, ctx.env.clone());
    let value = ScriptValue::Object(ScriptObject::new_class(class));
    ctx.declare(&data.name, BindingKind::Class, value.clone())?;
    Ok(value)
}

pub fn create_function(ctx: &EvalContext, data: &Rc<FunctionData>) -> ScriptValue {
    ScriptValue::Object(ScriptObject::new_function(FunctionObject {
        name: data.name.clone(),
        data: data.clone(),
        env: ctx.env.clone(),
        home_class: None,
    }))
}
