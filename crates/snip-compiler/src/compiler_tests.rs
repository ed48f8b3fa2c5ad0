use std::sync::Arc;

use snip_bytecode::Module;

use crate::{CompileOptions, SnippetCompiler, UnitCounter};

fn compiler() -> SnippetCompiler {
    SnippetCompiler::new(Arc::new(UnitCounter::new()), CompileOptions::default())
}

#[test]
fn compiles_into_loadable_image() {
    let unit = compiler().compile("return 2 + 2;").unwrap();

    assert!(unit.name.starts_with("Snippet_1_"));
    assert_eq!(unit.entry, "Execute");

    let module = Module::load(&unit.image).unwrap();
    assert_eq!(module.name, unit.name);
    assert_eq!(module.default_entry_point().unwrap(), 0);
}

#[test]
fn unit_names_are_unique() {
    let compiler = compiler();

    let first = compiler.compile("return 1;").unwrap();
    let second = compiler.compile("return 1;").unwrap();

    assert_ne!(first.name, second.name);
    assert!(second.name.starts_with("Snippet_2_"));
    assert_eq!(compiler.counter().current(), 2);
}

#[test]
fn shared_counter_spans_compilers() {
    let counter = Arc::new(UnitCounter::new());
    let a = SnippetCompiler::new(counter.clone(), CompileOptions::default());
    let b = SnippetCompiler::new(counter.clone(), CompileOptions::default());

    a.compile("return 1;").unwrap();
    let unit = b.compile("return 1;").unwrap();

    assert!(unit.name.starts_with("Snippet_2_"));
}

#[test]
fn failed_compilations_still_consume_a_name() {
    let compiler = compiler();

    assert!(compiler.compile("return").is_err());
    assert_eq!(compiler.counter().current(), 1);
}

#[test]
fn syntax_error_reports_only_syntax() {
    let failure = compiler().compile("return y").unwrap_err();

    assert_eq!(failure.diagnostics, ["(1,9): error: expected `;`"]);
}

#[test]
fn positions_follow_the_submitted_text() {
    let failure = compiler().compile("\n\n  return y;").unwrap_err();

    assert_eq!(
        failure.diagnostics,
        ["(3,10): error: the name 'y' does not exist in the current context"]
    );
}

#[test]
fn carriage_returns_separate_lines() {
    let failure = compiler().compile("var a = 1;\r\nvar b = a;\rreturn c;").unwrap_err();

    assert_eq!(
        failure.diagnostics,
        ["(3,8): error: the name 'c' does not exist in the current context"]
    );
}

#[test]
fn extracted_import_positions() {
    let failure = compiler().compile("  using Nope;\nreturn 1;").unwrap_err();

    assert_eq!(
        failure.diagnostics,
        ["(1,9): error: the type or namespace name 'Nope' could not be found"]
    );
}

#[test]
fn unknown_import_segment() {
    let failure = compiler().compile("using System.Foo;\nreturn 1;").unwrap_err();

    assert_eq!(
        failure.diagnostics,
        ["(1,7): error: the type or namespace name 'Foo' could not be found"]
    );
}

#[test]
fn duplicate_baseline_import_is_ignored() {
    let unit = compiler().compile("using System.Linq;\nreturn 1;");

    assert!(unit.is_ok());
}

#[test]
fn warnings_pass_by_default() {
    let unit = compiler().compile("return 1;\nreturn 2;");

    assert!(unit.is_ok());
}

#[test]
fn warnings_as_errors() {
    let strict = SnippetCompiler::new(
        Arc::new(UnitCounter::new()),
        CompileOptions {
            warnings_as_errors: true,
        },
    );

    let failure = strict.compile("return 1;\nreturn 2;").unwrap_err();

    assert_eq!(
        failure.diagnostics,
        ["(2,1): warning: unreachable code detected"]
    );
}

#[test]
fn deep_nesting_aborts_compilation() {
    let snippet = format!("return {}1{};", "(".repeat(300), ")".repeat(300));

    let failure = compiler().compile(&snippet).unwrap_err();

    assert_eq!(failure.diagnostics, ["error: recursion limit exceeded"]);
}

#[test]
fn long_operator_chain_aborts_compilation() {
    let snippet = format!("return {}1;", "1+".repeat(10_000));

    let failure = compiler().compile(&snippet).unwrap_err();

    assert_eq!(failure.diagnostics, ["error: recursion limit exceeded"]);
}

#[test]
fn long_call_chain_aborts_compilation() {
    let snippet = format!("var s = \" x \"; return s{};", ".Trim()".repeat(100_000));

    let failure = compiler().compile(&snippet).unwrap_err();

    assert_eq!(failure.diagnostics, ["error: recursion limit exceeded"]);
}

#[test]
fn moderate_chains_still_compile() {
    let sum = format!("return {}1;", "1+".repeat(100));
    compiler().compile(&sum).unwrap();

    let calls = format!("var s = \" x \"; return s{};", ".Trim()".repeat(50));
    compiler().compile(&calls).unwrap();
}
