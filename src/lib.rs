//! # formscript - document controller runtime
//!
//! Compiles text-defined form scripts into live controller objects bound to
//! an in-memory document, and dispatches document lifecycle events to them.
//!
//! - **[`parser`]** - PEG parser (pest) for the form-script language and its AST
//! - **[`runner`]** - Tree-walking interpreter
//!   - **[`runner::ds`]** - Values, objects, environments
//!   - **[`runner::eval`]** - Statement and expression evaluation
//!   - **[`runner::plugin`]** - Host capabilities and the super-global scope
//!   - **[`runner::std_lib`]** - Array and string methods, opt-in `console`/`JSON`/`Math`
//! - **[`controller`]** - Class extraction, compilation, composition, document
//!   proxies, lifecycle dispatch and the runtime cache
//!
//! ## Quick Start
//!
//! ```
//! use std::rc::Rc;
//! use formscript::controller::{
//!     Document, MemoryScriptSource, RuntimeConfig, ScriptRecord, ScriptRuntime, StaticMetaResolver,
//! };
//! use formscript::runner::plugin::CapabilitySet;
//! use serde_json::json;
//!
//! let source = MemoryScriptSource::new(vec![ScriptRecord::new(
//!     "widget script",
//!     "Widget",
//!     "class Widget { onload() { this.doc.touched = true } }",
//! )]);
//! let runtime = ScriptRuntime::new(
//!     Rc::new(source),
//!     CapabilitySet::new(),
//!     Rc::new(StaticMetaResolver::new()),
//!     RuntimeConfig::default(),
//! );
//!
//! let rt = tokio::runtime::Builder::new_current_thread().build().unwrap();
//! rt.block_on(async {
//!     let document = Document::from_json("Widget", "W-1", &json!({}));
//!     let scripts = runtime.setup_script(document.clone()).await.unwrap();
//!     scripts.trigger_on_load().await;
//!     assert_eq!(document.get("touched"), json!(true));
//! });
//! ```

#[macro_use]
extern crate lazy_static;

pub mod controller;
pub mod parser;
pub mod runner;
