//! `console` host object. Output goes through `tracing` under the
//! `formscript::console` target.

use tracing::{debug, error, info, warn};

use crate::runner::ds::operations::type_conversion::to_display_string;
use crate::runner::ds::value::ScriptValue;
use crate::runner::plugin::types::HostObject;

pub const CONSOLE_TARGET: &str = "formscript::console";

/// Format all arguments for console output.
fn format_args(args: &[ScriptValue]) -> String {
    args.iter()
        .map(to_display_string)
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn console_object() -> HostObject {
    HostObject::new("console")
        .add_method("log", |_, _, args| {
            info!(target: CONSOLE_TARGET, "{}", format_args(&args));
            Ok(ScriptValue::Undefined)
        })
        .add_method("info", |_, _, args| {
            info!(target: CONSOLE_TARGET, "{}", format_args(&args));
            Ok(ScriptValue::Undefined)
        })
        .add_method("warn", |_, _, args| {
            warn!(target: CONSOLE_TARGET, "{}", format_args(&args));
            Ok(ScriptValue::Undefined)
        })
        .add_method("error", |_, _, args| {
            error!(target: CONSOLE_TARGET, "{}", format_args(&args));
            Ok(ScriptValue::Undefined)
        })
        .add_method("debug", |_, _, args| {
            debug!(target: CONSOLE_TARGET, "{}", format_args(&args));
            Ok(ScriptValue::Undefined)
        })
}
