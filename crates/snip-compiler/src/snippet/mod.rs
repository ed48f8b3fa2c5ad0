//! Snippet preprocessing: split imports from the body, synthesize a
//! compilable unit around the body, and map positions back.

mod imports;
mod naming;
mod split;
mod synthesize;

#[cfg(test)]
mod snippet_tests;

pub use imports::{BASELINE_IMPORTS, Import, ImportSet};
pub use naming::{UnitCounter, unit_name};
pub use split::{SnippetLine, SplitSnippet, split};
pub use synthesize::{LineMap, Location, Synthesized, synthesize};
