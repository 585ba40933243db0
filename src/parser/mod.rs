mod api;
pub mod ast;
mod static_semantics;
mod util;

pub use api::{parse_to_token_tree, FormParser, Rule};
