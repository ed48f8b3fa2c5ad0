use indexmap::IndexMap;

/// Imports every synthesized unit starts with.
pub const BASELINE_IMPORTS: [&str; 3] = [
    "using System;",
    "using System.Collections.Generic;",
    "using System.Linq;",
];

/// Ordered, de-duplicated import declarations.
///
/// Keyed by trimmed text; the value is the 1-based snippet line an extracted
/// import came from (`None` for the baseline).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImportSet {
    entries: IndexMap<String, Option<Import>>,
}

/// Where an extracted import sits in the snippet.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Import {
    pub line: u32,
    /// Leading whitespace trimmed off, in chars.
    pub indent: u32,
}

impl ImportSet {
    pub fn new() -> Self {
        let entries = BASELINE_IMPORTS
            .iter()
            .map(|text| (text.to_string(), None))
            .collect();
        Self { entries }
    }

    /// Adds an import line unless an equal (trimmed) one is already present.
    pub fn insert(&mut self, text: &str, line: u32) -> bool {
        let trimmed = text.trim();
        if self.entries.contains_key(trimmed) {
            return false;
        }
        let indent = text.chars().take_while(|c| c.is_whitespace()).count() as u32;
        self.entries
            .insert(trimmed.to_string(), Some(Import { line, indent }));
        true
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<Import>)> {
        self.entries.iter().map(|(text, origin)| (text.as_str(), *origin))
    }
}

impl Default for ImportSet {
    fn default() -> Self {
        Self::new()
    }
}
