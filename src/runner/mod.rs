//! Script execution: values, environments, the tree-walking evaluator and the
//! capability scope scripts resolve free names against.

pub mod ds;
pub mod eval;
pub mod plugin;
pub mod std_lib;

pub use ds::error::ScriptErrorType;
pub use ds::object::{ObjectRef, ScriptObject};
pub use ds::value::{NumberType, ScriptValue};
