use snip_bytecode::Namespace;

use crate::diagnostics::{DiagnosticKind, Diagnostics};
use crate::parser::Root;

/// Namespaces a `using` may name. Only some of them carry builtins.
pub const KNOWN_NAMESPACES: &[&str] = &[
    "System",
    "System.Collections",
    "System.Collections.Generic",
    "System.Linq",
    "System.Text",
];

/// Builtin namespaces in scope for a unit.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Imports {
    namespaces: Vec<Namespace>,
}

impl Imports {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, namespace: Namespace) {
        if !self.namespaces.contains(&namespace) {
            self.namespaces.push(namespace);
        }
    }

    pub fn contains(&self, namespace: Namespace) -> bool {
        self.namespaces.contains(&namespace)
    }
}

/// Collects the imported builtin namespaces, reporting unknown ones.
pub fn resolve_imports(root: &Root, diagnostics: &mut Diagnostics) -> Imports {
    let mut imports = Imports::new();

    for using in root.usings() {
        let Some(name) = using.name() else {
            continue;
        };
        let path = name.text();

        if let Some(unknown) = first_unknown_segment(&path) {
            diagnostics
                .report(DiagnosticKind::UnknownNamespace, name.text_range())
                .message(unknown)
                .emit();
            continue;
        }

        if let Some(namespace) = Namespace::from_path(&path) {
            imports.add(namespace);
        }
    }

    imports
}

/// The first segment at which `path` stops being a prefix of a known namespace.
fn first_unknown_segment(path: &str) -> Option<&str> {
    let mut end = 0;
    for segment in path.split('.') {
        end += segment.len();
        let prefix = &path[..end];
        let known = KNOWN_NAMESPACES.iter().any(|ns| {
            *ns == prefix || ns.strip_prefix(prefix).is_some_and(|rest| rest.starts_with('.'))
        });
        if !known {
            return Some(segment);
        }
        end += 1;
    }
    None
}
