//! CLI wrapper for the form-script runtime.
//!
//! Usage:
//!   formscript [--config <file.toml>] <scripts.json> <doctype> <document.json> <trigger> [args]
//!   formscript tokens <script.js>
//!
//! Triggers: load, save, refresh, change <field> <json-value>

use std::env;
use std::fs;
use std::process;
use std::rc::Rc;

use formscript::controller::{
    Document, MemoryScriptSource, RuntimeConfig, ScriptRuntime, StaticMetaResolver,
};
use formscript::parser::parse_to_token_tree;
use formscript::runner::ds::operations::type_conversion::to_display_string;
use formscript::runner::ds::value::ScriptValue;
use formscript::runner::plugin::registry::{
    CAPABILITY_CALL, CAPABILITY_CREATE_DIALOG, CAPABILITY_MAKE_CALL, CAPABILITY_TOAST,
};
use formscript::runner::plugin::{CapabilitySet, HostObject};
use formscript::runner::std_lib::register_standard;
use tracing::info;

enum Trigger {
    Load,
    Save,
    Refresh,
    Change { field: String, value: serde_json::Value },
}

fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .init();

    let mut args: Vec<String> = env::args().skip(1).collect();
    if args.first().map(String::as_str) == Some("-h") || args.first().map(String::as_str) == Some("--help") {
        print_usage();
        process::exit(0);
    }
    if args.len() == 2 && args[0] == "tokens" {
        print_tokens(&args[1]);
        return;
    }

    let mut config = RuntimeConfig::default();
    if args.len() >= 2 && args[0] == "--config" {
        config = RuntimeConfig::load(&args[1]).unwrap_or_else(|e| fail(&e.to_string()));
        args.drain(..2);
    }
    if args.len() < 4 {
        print_usage();
        process::exit(1);
    }
    let trigger = parse_trigger(&args[3..]).unwrap_or_else(|| {
        print_usage();
        process::exit(1);
    });

    let scripts = read(&args[0]);
    let source = MemoryScriptSource::from_json(&scripts).unwrap_or_else(|e| fail(&e.to_string()));
    let doc_json: serde_json::Value =
        serde_json::from_str(&read(&args[2])).unwrap_or_else(|e| fail(&format!("Invalid document: {}", e)));
    let docname = doc_json
        .get("name")
        .and_then(|v| v.as_str())
        .unwrap_or("new")
        .to_string();
    let document = Document::from_json(args[1].clone(), docname, &doc_json);

    let runtime = ScriptRuntime::new(
        Rc::new(source),
        host_capabilities(),
        Rc::new(StaticMetaResolver::new()),
        config,
    );

    let rt = tokio::runtime::Builder::new_current_thread()
        .build()
        .unwrap_or_else(|e| fail(&e.to_string()));
    rt.block_on(async {
        let scripts = runtime
            .setup_script(document.clone())
            .await
            .unwrap_or_else(|e| fail(&e.to_string()));
        match trigger {
            Trigger::Load => {
                scripts.trigger_on_load().await;
            }
            Trigger::Save => {
                scripts.trigger_on_save().await;
            }
            Trigger::Refresh => {
                scripts.trigger_on_refresh().await;
            }
            Trigger::Change { field, value } => {
                if let Err(e) = scripts.trigger_on_change(&field, value, None).await {
                    eprintln!("Change rejected: {}", e);
                }
            }
        }
    });

    match serde_json::to_string_pretty(&document.to_json()) {
        Ok(text) => println!("{}", text),
        Err(e) => fail(&e.to_string()),
    }
}

fn parse_trigger(args: &[String]) -> Option<Trigger> {
    match args {
        [t] if t == "load" => Some(Trigger::Load),
        [t] if t == "save" => Some(Trigger::Save),
        [t] if t == "refresh" => Some(Trigger::Refresh),
        [t, field, value] if t == "change" => Some(Trigger::Change {
            field: field.clone(),
            // A bare word is taken as a string.
            value: serde_json::from_str(value).unwrap_or_else(|_| serde_json::Value::String(value.clone())),
        }),
        _ => None,
    }
}

/// Side-effect capabilities that only log.
fn host_capabilities() -> CapabilitySet {
    let mut capabilities = CapabilitySet::new()
        .named("cli")
        .with_function(CAPABILITY_TOAST, |_, _, args| {
            info!(target: "formscript::host", "toast: {}", join(&args));
            Ok(ScriptValue::Undefined)
        })
        .with_function(CAPABILITY_CALL, |_, _, args| {
            info!(target: "formscript::host", "call: {}", join(&args));
            Ok(ScriptValue::Null)
        })
        .with_function(CAPABILITY_CREATE_DIALOG, |_, _, args| {
            info!(target: "formscript::host", "createDialog: {}", join(&args));
            Ok(ScriptValue::Undefined)
        })
        .with_function(CAPABILITY_MAKE_CALL, |_, _, args| {
            info!(target: "formscript::host", "makeCall: {}", join(&args));
            Ok(ScriptValue::Undefined)
        })
        .with_object(
            HostObject::new("router")
                .add_method("push", |_, _, args| {
                    info!(target: "formscript::host", "router.push: {}", join(&args));
                    Ok(ScriptValue::Undefined)
                })
                .add_method("replace", |_, _, args| {
                    info!(target: "formscript::host", "router.replace: {}", join(&args));
                    Ok(ScriptValue::Undefined)
                }),
        );
    register_standard(&mut capabilities);
    capabilities
}

fn join(args: &[ScriptValue]) -> String {
    args.iter().map(to_display_string).collect::<Vec<_>>().join(" ")
}

fn print_tokens(path: &str) {
    match parse_to_token_tree(&read(path)) {
        Ok(tree) => println!("{}", tree),
        Err(e) => fail(&e),
    }
}

fn read(path: &str) -> String {
    fs::read_to_string(path).unwrap_or_else(|e| fail(&format!("Error reading file '{}': {}", path, e)))
}

fn fail(message: &str) -> ! {
    eprintln!("{}", message);
    process::exit(1);
}

fn print_usage() {
    eprintln!("formscript - form script runtime");
    eprintln!();
    eprintln!("Usage:");
    eprintln!("  formscript [--config <file.toml>] <scripts.json> <doctype> <document.json> <trigger> [args]");
    eprintln!("  formscript tokens <script.js>      Print the parse tree of a script");
    eprintln!();
    eprintln!("Triggers:");
    eprintln!("  load | save | refresh");
    eprintln!("  change <field> <json-value>");
}
