//! Evaluation of the form-script AST.

pub mod expression;
pub mod function;
pub mod statement;
pub mod types;

pub use function::{call_function, construct, instantiate_class};
pub use statement::execute_program;
pub use types::{Completion, CompletionType, EvalResult, ValueResult};
