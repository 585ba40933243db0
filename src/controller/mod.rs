//! Document controller runtime.
//!
//! Form scripts declare controller classes for a doctype. The runtime lists a
//! doctype's scripts, compiles them against the host's capabilities, binds
//! one controller per class to a live document and dispatches lifecycle
//! events to them.
//!
//! ```text
//! ScriptSource → extract_class_names → ControllerCompiler → compose
//!     → DocumentScripts (DocumentProxy ⇄ trigger_*) ⇄ host
//! ```

mod cache;
mod compiler;
mod composer;
mod config;
mod dispatcher;
mod document;
mod error;
mod extractor;
mod instance;
mod meta;
mod mirror;
mod proxy;
mod runtime;
mod source;

pub use cache::{RuntimeCache, RuntimeState};
pub use compiler::{CompiledScript, ControllerClass, ControllerCompiler, ScriptScope};
pub use composer::{compose, Composition};
pub use config::{CapabilityConfig, DispatchConfig, InterpreterConfig, RuntimeConfig};
pub use dispatcher::{DispatchOutcome, DocumentScripts};
pub use document::{sanitize_doctype, Document};
pub use error::{MetaError, RuntimeError, SourceError};
pub use extractor::extract_class_names;
pub use instance::{ControllerInstance, ControllerRegistry};
pub use meta::{MetaCache, MetaResolver, StaticMetaResolver};
pub use mirror::{FieldMirror, MirrorGroup};
pub use proxy::{DocumentProxy, RESERVED_NAMES, TRIGGER};
pub use runtime::ScriptRuntime;
pub use source::{MemoryScriptSource, ScriptRecord, ScriptSource};
