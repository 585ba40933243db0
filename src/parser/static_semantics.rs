//! Early errors that the grammar alone cannot reject.

use std::collections::HashSet;

use crate::parser::ast::{ClassData, FunctionData, Meta, Program, StatementType};

pub struct SemanticError {
    pub message: String,
    pub meta: Meta,
}

#[derive(Clone, Copy, Default)]
struct Scope {
    in_function: bool,
    in_loop: bool,
}

pub(crate) fn validate_program(program: &Program) -> Result<(), SemanticError> {
    let mut declared = HashSet::new();
    for stmt in &program.body {
        if let StatementType::ClassDeclaration(class) = stmt {
            if !declared.insert(class.name.as_str()) {
                return Err(SemanticError {
                    message: format!("Identifier '{}' has already been declared", class.name),
                    meta: class.meta.clone(),
                });
            }
        }
    }
    validate_statements(&program.body, Scope::default())
}

fn validate_class(class: &ClassData) -> Result<(), SemanticError> {
    let mut seen = HashSet::new();
    for method in &class.methods {
        if !seen.insert(method.name.as_str()) {
            return Err(SemanticError {
                message: format!(
                    "Duplicate method '{}' in class '{}'",
                    method.name, class.name
                ),
                meta: method.meta.clone(),
            });
        }
        validate_function(method)?;
    }
    Ok(())
}

fn validate_function(function: &FunctionData) -> Result<(), SemanticError> {
    validate_statements(
        &function.body,
        Scope {
            in_function: true,
            in_loop: false,
        },
    )
}

fn validate_statements(statements: &[StatementType], scope: Scope) -> Result<(), SemanticError> {
    for stmt in statements {
        validate_statement(stmt, scope)?;
    }
    Ok(())
}

fn validate_statement(stmt: &StatementType, scope: Scope) -> Result<(), SemanticError> {
    let loop_scope = Scope {
        in_loop: true,
        ..scope
    };
    match stmt {
        StatementType::ClassDeclaration(class) => validate_class(class),
        StatementType::FunctionDeclaration(function) => validate_function(function),
        StatementType::BlockStatement(block) => validate_statements(&block.body, scope),
        StatementType::IfStatement {
            consequent,
            alternate,
            ..
        } => {
            validate_statement(consequent, scope)?;
            match alternate {
                Some(alternate) => validate_statement(alternate, scope),
                None => Ok(()),
            }
        }
        StatementType::WhileStatement { body, .. } | StatementType::ForOfStatement { body, .. } => {
            validate_statement(body, loop_scope)
        }
        StatementType::ReturnStatement { meta, .. } => {
            if scope.in_function {
                Ok(())
            } else {
                Err(SemanticError {
                    message: "Illegal return statement".to_string(),
                    meta: meta.clone(),
                })
            }
        }
        StatementType::BreakStatement { meta } | StatementType::ContinueStatement { meta } => {
            if scope.in_loop {
                Ok(())
            } else {
                Err(SemanticError {
                    message: "Illegal break or continue outside a loop".to_string(),
                    meta: meta.clone(),
                })
            }
        }
        StatementType::TryStatement {
            block,
            handler,
            finalizer,
            ..
        } => {
            validate_statements(&block.body, scope)?;
            if let Some(handler) = handler {
                validate_statements(&handler.body.body, scope)?;
            }
            if let Some(finalizer) = finalizer {
                validate_statements(&finalizer.body, scope)?;
            }
            Ok(())
        }
        StatementType::VariableDeclaration(_)
        | StatementType::ExpressionStatement { .. }
        | StatementType::ThrowStatement { .. }
        | StatementType::EmptyStatement { .. } => Ok(()),
    }
}
