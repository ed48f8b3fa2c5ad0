use indoc::indoc;

use crate::compile_unit;

fn disassemble(body: &str) -> String {
    let compilation = compile_unit(body, "Snippet_T").expect("pipeline runs");
    assert!(
        compilation.diagnostics.is_empty(),
        "unexpected diagnostics: {:?}",
        compilation.messages()
    );
    snip_bytecode::dump(compilation.module.as_ref().expect("module emitted"))
}

fn messages(body: &str) -> Vec<String> {
    compile_unit(body, "Snippet_T")
        .expect("pipeline runs")
        .messages()
}

#[test]
fn return_binary_expression() {
    insta::assert_snapshot!(disassemble("return 2 + 2;"), @r#"
    module Snippet_T (locals: 0)

    [constants]
    #0   2
    #1   null

    [F0] Execute()
    0000  Const #0  ; 2
    0001  Const #0  ; 2
    0002  Binary +
    0003  Return
    0004  Const #1  ; null
    0005  Return
    "#);
}

#[test]
fn while_loop_with_postfix_increment() {
    let body = indoc! {"
        var i = 0;
        while (i < 3) { i++; }
        return i;
    "};

    insta::assert_snapshot!(disassemble(body), @r#"
    module Snippet_T (locals: 1)

    [constants]
    #0   0
    #1   3
    #2   1
    #3   null

    [F0] Execute()
    0000  Const #0  ; 0
    0001  StoreLocal L0
    0002  LoadLocal L0
    0003  Const #1  ; 3
    0004  Binary <
    0005  JumpIfFalse @13
    0006  LoadLocal L0
    0007  Dup
    0008  Const #2  ; 1
    0009  Binary +
    0010  StoreLocal L0
    0011  Pop
    0012  Jump @2
    0013  LoadLocal L0
    0014  Return
    0015  Const #3  ; null
    0016  Return
    "#);
}

#[test]
fn lambda_becomes_separate_function() {
    let body = indoc! {"
        Func<int, int> twice = x => x * 2;
        return twice(21);
    "};

    insta::assert_snapshot!(disassemble(body), @r#"
    module Snippet_T (locals: 2)

    [constants]
    #0   2
    #1   21
    #2   null

    [F0] Execute()
    0000  MakeLambda F1
    0001  StoreLocal L1
    0002  LoadLocal L1
    0003  Const #1  ; 21
    0004  CallValue /1
    0005  Return
    0006  Const #2  ; null
    0007  Return

    [F1] <lambda>(L0)
    0000  LoadLocal L0
    0001  Const #0  ; 2
    0002  Binary *
    0003  Return
    "#);
}

#[test]
fn static_call_resolves_builtin() {
    insta::assert_snapshot!(disassemble("return Math.Max(1, 2);"), @r#"
    module Snippet_T (locals: 0)

    [constants]
    #0   1
    #1   2
    #2   null

    [F0] Execute()
    0000  Const #0  ; 1
    0001  Const #1  ; 2
    0002  CallStatic Math.Max/2
    0003  Return
    0004  Const #2  ; null
    0005  Return
    "#);
}

#[test]
fn collection_initializer_calls_add() {
    let body = indoc! {"
        var xs = new List<int> { 1, 2 };
        return xs.Count;
    "};

    insta::assert_snapshot!(disassemble(body), @r#"
    module Snippet_T (locals: 1)

    [constants]
    #0   1
    #1   2
    #2   null

    [names]
    N0   Add
    N1   Count

    [F0] Execute()
    0000  New List/0
    0001  Dup
    0002  Const #0  ; 1
    0003  CallMethod N0/1  ; Add
    0004  Pop
    0005  Dup
    0006  Const #1  ; 2
    0007  CallMethod N0/1  ; Add
    0008  Pop
    0009  StoreLocal L0
    0010  LoadLocal L0
    0011  GetMember N1  ; Count
    0012  Return
    0013  Const #2  ; null
    0014  Return
    "#);
}

#[test]
fn foreach_uses_hidden_iterator_slot() {
    let body = indoc! {"
        var total = 0;
        foreach (var n in new[] { 1, 2 }) { total += n; }
        return total;
    "};

    insta::assert_snapshot!(disassemble(body), @r#"
    module Snippet_T (locals: 3)

    [constants]
    #0   0
    #1   1
    #2   2
    #3   null

    [F0] Execute()
    0000  Const #0  ; 0
    0001  StoreLocal L0
    0002  Const #1  ; 1
    0003  Const #2  ; 2
    0004  MakeList 2
    0005  IterStart L1
    0006  IterNext L1 @15
    0007  StoreLocal L2
    0008  LoadLocal L0
    0009  LoadLocal L2
    0010  Binary +
    0011  Dup
    0012  StoreLocal L0
    0013  Pop
    0014  Jump @6
    0015  LoadLocal L0
    0016  Return
    0017  Const #3  ; null
    0018  Return
    "#);
}

#[test]
fn undefined_name() {
    assert_eq!(
        messages("return y;"),
        ["(1,8): error: the name 'y' does not exist in the current context"]
    );
}

#[test]
fn empty_body_does_not_return() {
    assert_eq!(messages(""), ["error: not all code paths return a value"]);
}

#[test]
fn literal_only_local_is_unused() {
    let body = indoc! {"
        int x = 5;
        return 1;
    "};

    assert_eq!(
        messages(body),
        ["(1,5): warning: the variable 'x' is assigned but its value is never used"]
    );
}

#[test]
fn declared_local_is_unused() {
    let body = indoc! {"
        int x;
        return 1;
    "};

    assert_eq!(
        messages(body),
        ["(1,5): warning: the variable 'x' is declared but never used"]
    );
}

#[test]
fn break_outside_loop() {
    let body = indoc! {"
        var n = 1;
        if (n > 0) { break; }
        return n;
    "};

    assert_eq!(
        messages(body),
        ["(2,14): error: no enclosing loop out of which to break or continue"]
    );
}

#[test]
fn duplicate_local_shadows_earlier_one() {
    let body = indoc! {"
        var a = 1;
        var a = 2;
        return a;
    "};

    assert_eq!(
        messages(body),
        [
            "(1,5): warning: the variable 'a' is assigned but its value is never used",
            "(2,5): error: a local variable named 'a' is already defined in this scope",
        ]
    );
}

#[test]
fn var_without_initializer() {
    let body = indoc! {"
        var x;
        return 1;
    "};

    assert_eq!(
        messages(body),
        [
            "(1,5): error: implicitly-typed variables must be initialized",
            "(1,5): warning: the variable 'x' is declared but never used",
        ]
    );
}

#[test]
fn unknown_static_member() {
    assert_eq!(
        messages("return Math.Foo(1);"),
        ["(1,13): error: 'Math' does not contain a definition for 'Foo'"]
    );
}

#[test]
fn static_call_with_wrong_arity() {
    assert_eq!(
        messages("return Math.Abs(1, 2);"),
        ["(1,13): error: no overload for method 'Abs' takes 2 arguments"]
    );
}

#[test]
fn type_used_as_value() {
    assert_eq!(
        messages("return Math;"),
        ["(1,8): error: 'Math' is a type, which is not valid in the given context"]
    );
}

#[test]
fn non_statement_expression() {
    let body = indoc! {"
        1 + 1;
        return 1;
    "};

    assert_eq!(
        messages(body),
        ["(1,1): error: only assignment, call, increment, decrement and new object expressions can be used as a statement"]
    );
}

#[test]
fn assignment_to_call_result() {
    let body = indoc! {"
        var s = \"a\";
        s.Trim() = \"b\";
        return s;
    "};

    assert_eq!(
        messages(body),
        ["(2,1): error: the left-hand side of an assignment must be a variable or indexer"]
    );
}

#[test]
fn unknown_new_target() {
    assert_eq!(
        messages("return new Widget();"),
        ["(1,12): error: the type name 'Widget' could not be found"]
    );
}

#[test]
fn generic_arity_mismatch() {
    assert_eq!(
        messages("return new List<int, int>();"),
        ["(1,12): error: using the generic type 'List' requires 1 type arguments"]
    );
}

#[test]
fn integer_literal_too_large() {
    assert_eq!(
        messages("return 9223372036854775808;"),
        ["(1,8): error: integral constant is too large"]
    );
}

#[test]
fn negated_minimum_integer_is_allowed() {
    let compilation = compile_unit("return -9223372036854775808;", "Snippet_T").unwrap();
    assert!(compilation.diagnostics.is_empty());
}

#[test]
fn unreachable_statement_is_a_warning() {
    let body = indoc! {"
        return 1;
        return 2;
    "};

    let compilation = compile_unit(body, "Snippet_T").unwrap();
    assert_eq!(
        compilation.messages(),
        ["(2,1): warning: unreachable code detected"]
    );
    assert!(compilation.module.is_some());
}

#[test]
fn lambda_parameters_are_scoped_to_the_lambda() {
    let body = indoc! {"
        Func<int, int> f = x => x + 1;
        return x;
    "};

    assert_eq!(
        messages(body),
        ["(2,8): error: the name 'x' does not exist in the current context"]
    );
}
