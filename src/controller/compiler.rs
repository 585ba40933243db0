//! Compiles form scripts into controller classes.
//!
//! A script is evaluated once in a fresh script scope whose only free names
//! are the host capabilities left after the allow-list. The classes it
//! declares at the top level become [`ControllerClass`]es.

use std::rc::Rc;

use pest::error::{Error, ErrorVariant, LineColLocation};
use tracing::{debug, error};

use super::config::RuntimeConfig;
use super::error::RuntimeError;
use super::extractor::extract_class_names;
use super::source::ScriptRecord;
use crate::parser::{FormParser, Rule};
use crate::runner::ds::error::ScriptErrorType;
use crate::runner::ds::lex_env::{get_identifier_value, EnvRef};
use crate::runner::ds::object::{ClassObject, ObjectKind};
use crate::runner::ds::value::ScriptValue;
use crate::runner::eval::execute_program;
use crate::runner::plugin::types::EvalContext;
use crate::runner::plugin::{CapabilitySet, SuperGlobalEnvironment};

/// Scope a compiled script's code runs in.
pub struct ScriptScope {
    pub env: EnvRef,
    super_global: Rc<SuperGlobalEnvironment>,
    max_call_depth: usize,
}

impl ScriptScope {
    /// A fresh evaluation context over this scope.
    pub fn context(&self) -> EvalContext {
        EvalContext::new(self.super_global.clone())
            .with_env(self.env.clone())
            .with_max_call_depth(self.max_call_depth)
    }
}

/// A constructible controller type and the script it came from.
pub struct ControllerClass {
    pub name: String,
    pub script: String,
    pub class: Rc<ClassObject>,
}

pub struct CompiledScript {
    pub name: String,
    pub classes: Vec<ControllerClass>,
    pub scope: Rc<ScriptScope>,
}

pub struct ControllerCompiler {
    super_global: Rc<SuperGlobalEnvironment>,
    max_call_depth: usize,
}

impl ControllerCompiler {
    pub fn new(capabilities: CapabilitySet, config: &RuntimeConfig) -> Self {
        let capabilities = match &config.capabilities.allow {
            Some(allow) => capabilities.restrict(allow),
            None => capabilities,
        };
        debug!(capabilities = ?capabilities.names(), "controller compiler ready");
        let mut super_global = SuperGlobalEnvironment::new();
        super_global.add_resolver(Box::new(capabilities));
        ControllerCompiler {
            super_global: Rc::new(super_global),
            max_call_depth: config.interpreter.max_call_depth,
        }
    }

    /// Names visible to scripts besides their own declarations.
    pub fn capability_names(&self) -> Vec<String> {
        self.super_global.binding_names()
    }

    /// Evaluates `record`'s source and picks out `class_names`. A name the
    /// script does not declare at the top level is logged and skipped.
    pub fn compile_script(
        &self,
        record: &ScriptRecord,
        class_names: &[String],
    ) -> Result<CompiledScript, RuntimeError> {
        let program = FormParser::parse_program(&record.script).map_err(|e| RuntimeError::Compilation {
            script: record.name.clone(),
            cause: syntax_error(&e),
        })?;

        let mut ctx = EvalContext::new(self.super_global.clone()).with_max_call_depth(self.max_call_depth);
        execute_program(&program, &mut ctx).map_err(|cause| RuntimeError::Compilation {
            script: record.name.clone(),
            cause,
        })?;

        let mut classes = Vec::with_capacity(class_names.len());
        for name in class_names {
            match get_identifier_value(&ctx.env, name).and_then(|v| as_class(&v)) {
                Some(class) => classes.push(ControllerClass {
                    name: name.clone(),
                    script: record.name.clone(),
                    class,
                }),
                None => error!(script = %record.name, class = %name, "class is not declared at the top level of the script"),
            }
        }
        debug!(script = %record.name, classes = classes.len(), "script compiled");
        Ok(CompiledScript {
            name: record.name.clone(),
            classes,
            scope: Rc::new(ScriptScope {
                env: ctx.env.clone(),
                super_global: self.super_global.clone(),
                max_call_depth: self.max_call_depth,
            }),
        })
    }

    /// Compiles every enabled record that declares at least one class. A
    /// failing script is logged and contributes nothing.
    pub fn compile_records(&self, records: &[ScriptRecord]) -> Vec<CompiledScript> {
        let mut compiled = vec![];
        for record in records {
            if !record.enabled {
                debug!(script = %record.name, "script disabled, skipped");
                continue;
            }
            let class_names = extract_class_names(&record.script);
            if class_names.is_empty() {
                debug!(script = %record.name, "script declares no classes, skipped");
                continue;
            }
            match self.compile_script(record, &class_names) {
                Ok(script) => compiled.push(script),
                Err(e) => error!(script = %record.name, doctype = %record.dt, error = %e, "script compilation failed"),
            }
        }
        compiled
    }
}

fn as_class(value: &ScriptValue) -> Option<Rc<ClassObject>> {
    match value {
        ScriptValue::Object(o) => match &o.borrow().kind {
            ObjectKind::Class(c) => Some(c.clone()),
            _ => None,
        },
        _ => None,
    }
}

fn syntax_error(e: &Error<Rule>) -> ScriptErrorType {
    let (line, column) = match e.line_col {
        LineColLocation::Pos(pos) => pos,
        LineColLocation::Span(start, _) => start,
    };
    let detail = match &e.variant {
        ErrorVariant::CustomError { message } => message.clone(),
        ErrorVariant::ParsingError { positives, .. } if !positives.is_empty() => {
            format!("expected {:?}", positives)
        }
        ErrorVariant::ParsingError { .. } => "unexpected input".to_string(),
    };
    ScriptErrorType::SyntaxError(format!("{} at line {}, column {}", detail, line, column))
}
