//! Statement execution.

use crate::parser::ast::{
    BlockStatementData, CatchClauseData, ExpressionType, IdentifierData, Program, StatementType,
    VariableDeclarationData, VariableDeclarationKind,
};
use crate::runner::ds::env_record::BindingKind;
use crate::runner::ds::error::ScriptErrorType;
use crate::runner::ds::object::ObjectKind;
use crate::runner::ds::operations::object::unwrap_proxy;
use crate::runner::ds::operations::type_conversion::to_boolean;
use crate::runner::ds::value::ScriptValue;
use crate::runner::plugin::types::EvalContext;

use super::expression::evaluate_expression;
use super::function::{create_function, declare_class};
use super::types::{Completion, CompletionType, EvalResult, ValueResult};

/// Runs a parsed program's top-level items in `ctx`'s current scope and
/// returns the value of the last expression statement.
pub fn execute_program(program: &Program, ctx: &mut EvalContext) -> ValueResult {
    let completion = execute_statements(&program.body, ctx)?;
    Ok(completion.get_value())
}

/// Executes a statement list in the current scope. Function declarations are
/// hoisted to the top of the list.
pub fn execute_statements(statements: &[StatementType], ctx: &mut EvalContext) -> EvalResult {
    for stmt in statements {
        if let StatementType::FunctionDeclaration(data) = stmt {
            let function = create_function(ctx, data);
            ctx.declare(&data.name, BindingKind::Function, function)?;
        }
    }
    let mut completion = Completion::normal();
    for stmt in statements {
        completion = execute_statement(stmt, ctx)?;
        if completion.is_abrupt() {
            return Ok(completion);
        }
    }
    Ok(completion)
}

/// Execute a statement and return its completion.
pub fn execute_statement(stmt: &StatementType, ctx: &mut EvalContext) -> EvalResult {
    match stmt {
        StatementType::EmptyStatement { .. } | StatementType::FunctionDeclaration(_) => {
            Ok(Completion::normal())
        }

        StatementType::ClassDeclaration(data) => {
            declare_class(ctx, data)?;
            Ok(Completion::normal())
        }

        StatementType::ExpressionStatement { expression, .. } => {
            let value = evaluate_expression(expression, ctx)?;
            Ok(Completion::normal_with_value(value))
        }

        StatementType::VariableDeclaration(decl) => execute_variable_declaration(decl, ctx),

        StatementType::BlockStatement(block) => execute_block_statement(block, ctx),

        StatementType::IfStatement {
            test,
            consequent,
            alternate,
            ..
        } => {
            if to_boolean(&evaluate_expression(test, ctx)?) {
                execute_statement(consequent, ctx)
            } else if let Some(alternate) = alternate {
                execute_statement(alternate, ctx)
            } else {
                Ok(Completion::normal())
            }
        }

        StatementType::WhileStatement { test, body, .. } => {
            while to_boolean(&evaluate_expression(test, ctx)?) {
                let completion = execute_statement(body, ctx)?;
                match completion.completion_type {
                    CompletionType::Break => break,
                    CompletionType::Return => return Ok(completion),
                    CompletionType::Continue | CompletionType::Normal => {}
                }
            }
            Ok(Completion::normal())
        }

        StatementType::ForOfStatement {
            kind,
            binding,
            iterable,
            body,
            ..
        } => execute_for_of_statement(*kind, binding, iterable, body, ctx),

        StatementType::ReturnStatement { argument, .. } => {
            let value = match argument {
                Some(arg) => evaluate_expression(arg, ctx)?,
                None => ScriptValue::Undefined,
            };
            Ok(Completion::return_value(value))
        }

        StatementType::ThrowStatement { argument, .. } => {
            let value = evaluate_expression(argument, ctx)?;
            Err(ScriptErrorType::Thrown(value))
        }

        StatementType::BreakStatement { .. } => Ok(Completion::break_completion()),

        StatementType::ContinueStatement { .. } => Ok(Completion::continue_completion()),

        StatementType::TryStatement {
            block,
            handler,
            finalizer,
            ..
        } => execute_try_statement(block, handler.as_ref(), finalizer.as_ref(), ctx),
    }
}

fn binding_kind(kind: VariableDeclarationKind) -> BindingKind {
    match kind {
        VariableDeclarationKind::Var => BindingKind::Var,
        VariableDeclarationKind::Let => BindingKind::Let,
        VariableDeclarationKind::Const => BindingKind::Const,
    }
}

fn execute_variable_declaration(decl: &VariableDeclarationData, ctx: &mut EvalContext) -> EvalResult {
    for declarator in &decl.declarations {
        let value = match &declarator.init {
            Some(init) => evaluate_expression(init, ctx)?,
            None => ScriptValue::Undefined,
        };
        ctx.declare(&declarator.id.name, binding_kind(decl.kind), value)?;
    }
    Ok(Completion::normal())
}

/// Runs `body` in a fresh block scope, popping it on every exit path.
fn in_block_scope<F>(ctx: &mut EvalContext, body: F) -> EvalResult
where
    F: FnOnce(&mut EvalContext) -> EvalResult,
{
    ctx.push_block_scope();
    let result = body(ctx);
    ctx.pop_block_scope();
    result
}

fn execute_block_statement(block: &BlockStatementData, ctx: &mut EvalContext) -> EvalResult {
    in_block_scope(ctx, |ctx| execute_statements(&block.body, ctx))
}

/// Items a `for...of` walks: array elements or string characters, snapshotted
/// before the first iteration.
fn iteration_items(value: &ScriptValue) -> Result<Vec<ScriptValue>, ScriptErrorType> {
    match value {
        ScriptValue::String(s) => Ok(s.chars().map(|c| ScriptValue::String(c.to_string())).collect()),
        ScriptValue::Object(o) => {
            let target = unwrap_proxy(o);
            let t = target.borrow();
            match &t.kind {
                ObjectKind::Array(items) => Ok(items.clone()),
                _ => Err(ScriptErrorType::TypeError(format!("{} is not iterable", value))),
            }
        }
        _ => Err(ScriptErrorType::TypeError(format!("{} is not iterable", value))),
    }
}

fn execute_for_of_statement(
    kind: VariableDeclarationKind,
    binding: &IdentifierData,
    iterable: &ExpressionType,
    body: &StatementType,
    ctx: &mut EvalContext,
) -> EvalResult {
    let items = iteration_items(&evaluate_expression(iterable, ctx)?)?;
    for item in items {
        let completion = in_block_scope(ctx, |ctx| {
            ctx.declare(&binding.name, binding_kind(kind), item)?;
            execute_statement(body, ctx)
        })?;
        match completion.completion_type {
            CompletionType::Break => break,
            CompletionType::Return => return Ok(completion),
            CompletionType::Continue | CompletionType::Normal => {}
        }
    }
    Ok(Completion::normal())
}

fn execute_try_statement(
    block: &BlockStatementData,
    handler: Option<&CatchClauseData>,
    finalizer: Option<&BlockStatementData>,
    ctx: &mut EvalContext,
) -> EvalResult {
    let mut result = execute_block_statement(block, ctx);

    let caught = match (&result, handler) {
        (Err(error), Some(handler)) => Some((error.to_script_value(), handler)),
        _ => None,
    };
    if let Some((caught, handler)) = caught {
        result = in_block_scope(ctx, |ctx| {
            if let Some(param) = &handler.param {
                ctx.declare(&param.name, BindingKind::Let, caught)?;
            }
            execute_statements(&handler.body.body, ctx)
        });
    }

    if let Some(finalizer) = finalizer {
        let final_completion = execute_block_statement(finalizer, ctx)?;
        if final_completion.is_abrupt() {
            return Ok(final_completion);
        }
    }
    result
}
