//! Declared types. The language is dynamically typed; declared types only
//! need to name something that exists, and pick a default value.

use std::ops::RangeInclusive;

use snip_bytecode::{Constant, Namespace};

use super::Compiler;
use crate::analyze::KNOWN_NAMESPACES;
use crate::diagnostics::DiagnosticKind;
use crate::parser::ast::TypeRef;

/// Type names usable in declarations, with their generic arity.
const NAMED_TYPES: &[(&str, Namespace, RangeInclusive<usize>)] = &[
    ("List", Namespace::Collections, 1..=1),
    ("Dictionary", Namespace::Collections, 2..=2),
    ("HashSet", Namespace::Collections, 1..=1),
    ("IEnumerable", Namespace::Collections, 1..=1),
    ("IList", Namespace::Collections, 1..=1),
    ("ICollection", Namespace::Collections, 1..=1),
    ("IDictionary", Namespace::Collections, 2..=2),
    ("KeyValuePair", Namespace::Collections, 2..=2),
    ("Func", Namespace::System, 1..=17),
    ("Action", Namespace::System, 0..=16),
    ("Exception", Namespace::System, 0..=0),
    ("InvalidOperationException", Namespace::System, 0..=0),
    ("ArgumentException", Namespace::System, 0..=0),
    ("String", Namespace::System, 0..=0),
    ("Int32", Namespace::System, 0..=0),
    ("Int64", Namespace::System, 0..=0),
    ("Double", Namespace::System, 0..=0),
    ("Boolean", Namespace::System, 0..=0),
    ("Char", Namespace::System, 0..=0),
    ("Object", Namespace::System, 0..=0),
];

/// Splits `System.Collections.Generic.List` into namespace and simple name.
pub(super) fn split_qualified(name: &str) -> (Option<&str>, &str) {
    match name.rsplit_once('.') {
        Some((namespace, simple)) => (Some(namespace), simple),
        None => (None, name),
    }
}

/// Value a local of this type holds before its first assignment.
pub(super) fn default_value(ty: Option<&TypeRef>) -> Constant {
    let Some(ty) = ty else {
        return Constant::Null;
    };
    if ty.is_array() {
        return Constant::Null;
    }
    let Some(keyword) = ty.keyword() else {
        return Constant::Null;
    };
    match keyword.text() {
        "int" | "long" => Constant::Int(0),
        "double" | "float" | "decimal" => Constant::Double(0.0),
        "bool" => Constant::Bool(false),
        "char" => Constant::Char('\0'),
        _ => Constant::Null,
    }
}

impl Compiler<'_> {
    /// Reports declared types that name nothing known.
    pub(super) fn check_type(&mut self, ty: &TypeRef) {
        if ty.keyword().is_some() {
            return;
        }

        let name = ty.name();
        let (namespace, simple) = split_qualified(&name);
        let entry = NAMED_TYPES.iter().find(|(n, ..)| *n == simple);
        let visible = entry.is_some_and(|(_, ns, _)| match namespace {
            Some(path) => KNOWN_NAMESPACES.contains(&path) && path == ns.path(),
            None => self.imports.contains(*ns),
        });

        let Some((_, _, arity)) = entry.filter(|_| visible) else {
            self.diagnostics
                .report(DiagnosticKind::UnknownType, ty.text_range())
                .message(simple)
                .emit();
            return;
        };

        let args = ty.type_args();
        if !arity.contains(&args.len()) {
            self.report_generic_arity(ty, simple, *arity.start());
            return;
        }
        for arg in &args {
            self.check_type(arg);
        }
    }

    pub(super) fn report_generic_arity(&mut self, ty: &TypeRef, simple: &str, expected: usize) {
        let message = if expected == 0 {
            format!("the non-generic type '{simple}' cannot be used with type arguments")
        } else {
            format!("using the generic type '{simple}' requires {expected} type arguments")
        };
        self.diagnostics
            .report(DiagnosticKind::WrongArgumentCount, ty.text_range())
            .message(message)
            .emit();
    }
}
