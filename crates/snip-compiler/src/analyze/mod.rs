//! Semantic checks that run on the typed AST before lowering.
//!
//! - `imports`: every `using` names a known namespace
//! - `flow`: reachability (unreachable statements, missing returns)

mod flow;
mod imports;


pub use flow::check_flow;
pub use imports::{Imports, KNOWN_NAMESPACES, resolve_imports};
