//! End-to-end execution tests: snippets are compiled, run and reported as
//! JSON (successes) or `error: <message>` (runtime failures).

use std::sync::Arc;

use indoc::indoc;
use snip_compiler::{CompileOptions, SnippetCompiler, UnitCounter};
use snip_core::EvaluationResult;

use crate::{FuelLimits, SnippetExecutor};

pub(super) fn run(body: &str) -> String {
    run_with(body, FuelLimits::default())
}

fn execute(body: &str, limits: FuelLimits) -> EvaluationResult {
    let compiler = SnippetCompiler::new(Arc::new(UnitCounter::new()), CompileOptions::default());
    let unit = match compiler.compile(body) {
        Ok(unit) => unit,
        Err(failure) => panic!("compilation failed: {:?}", failure.diagnostics),
    };
    SnippetExecutor::new(limits).execute(&unit)
}

/// Indented JSON of a successful result.
fn run_pretty(body: &str) -> String {
    match execute(body, FuelLimits::default()) {
        EvaluationResult::Success { value } => {
            serde_json::to_string_pretty(&value).expect("json serialization failed")
        }
        other => panic!("expected a value, got {other:?}"),
    }
}

pub(super) fn run_with(body: &str, limits: FuelLimits) -> String {
    match execute(body, limits) {
        EvaluationResult::Success { value } => {
            serde_json::to_string(&value).expect("json serialization failed")
        }
        EvaluationResult::RuntimeFailure { message } => format!("error: {message}"),
        EvaluationResult::CompileFailure { diagnostics } => {
            panic!("unexpected compile failure: {diagnostics:?}")
        }
    }
}

#[test]
fn arithmetic_precedence() {
    assert_eq!(run("return 2 + 3 * 4;"), "14");
}

#[test]
fn integer_division_truncates() {
    assert_eq!(run("return 7 / 2;"), "3");
    assert_eq!(run("return -7 / 2;"), "-3");
    assert_eq!(run("return 7 / 2.0;"), "3.5");
}

#[test]
fn string_concatenation_is_left_associative() {
    assert_eq!(run(r#"return "a" + 1 + 2;"#), r#""a12""#);
    assert_eq!(run(r#"return 1 + 2 + "a";"#), r#""3a""#);
}

#[test]
fn char_arithmetic_widens_to_int() {
    assert_eq!(run("return 'a' + 1;"), "98");
}

#[test]
fn divide_by_zero() {
    let body = indoc! {"
        var zero = 0;
        return 1 / zero;
    "};

    assert_eq!(run(body), "error: Attempted to divide by zero.");
}

#[test]
fn double_division_by_zero_is_infinite() {
    let body = indoc! {"
        var zero = 0.0;
        return 1 / zero;
    "};

    assert_eq!(run(body), r#""Infinity""#);
}

#[test]
fn for_loop_fills_list() {
    let body = indoc! {"
        var squares = new List<int>();
        for (var i = 0; i < 5; i++) { squares.Add(i * i); }
        return squares;
    "};

    assert_eq!(run(body), "[0,1,4,9,16]");
}

#[test]
fn foreach_over_dictionary_yields_entries() {
    let body = indoc! {r#"
        var ages = new Dictionary<string, int> { { "ann", 31 }, { "bob", 42 } };
        var total = 0;
        foreach (var entry in ages) { total += entry.Value; }
        return total;
    "#};

    assert_eq!(run(body), "73");
}

#[test]
fn foreach_over_string_yields_chars() {
    let body = indoc! {r#"
        var sum = 0;
        foreach (var c in "abc") { sum += c; }
        return sum;
    "#};

    assert_eq!(run(body), "294");
}

#[test]
fn foreach_iterates_a_snapshot() {
    let body = indoc! {"
        var xs = new List<int> { 1, 2 };
        foreach (var x in xs) { xs.Add(x); }
        return xs.Count;
    "};

    assert_eq!(run(body), "4");
}

#[test]
fn break_and_continue() {
    let body = indoc! {"
        var total = 0;
        for (var i = 0; i < 100; i++) {
            if (i % 2 == 0) { continue; }
            if (i > 7) { break; }
            total += i;
        }
        return total;
    "};

    assert_eq!(run(body), "16");
}

#[test]
fn dictionary_result_keeps_insertion_order() {
    let body = indoc! {r#"
        var d = new Dictionary<string, int> { { "b", 2 } };
        d["a"] = 1;
        d["b"] = 3;
        return d;
    "#};

    insta::assert_snapshot!(run_pretty(body), @r#"
    {
      "b": 3,
      "a": 1
    }
    "#);
}

#[test]
fn missing_dictionary_key() {
    let body = indoc! {r#"
        var d = new Dictionary<string, int>();
        return d["x"];
    "#};

    assert_eq!(
        run(body),
        "error: The given key 'x' was not present in the dictionary."
    );
}

#[test]
fn duplicate_dictionary_key() {
    let body = indoc! {r#"
        var d = new Dictionary<string, int> { { "k", 1 }, { "k", 2 } };
        return d;
    "#};

    assert_eq!(
        run(body),
        "error: An item with the same key has already been added. Key: k"
    );
}

#[test]
fn hash_set_ignores_duplicates() {
    assert_eq!(run("return new HashSet<int> { 3, 1, 3 };"), "[3,1]");
}

#[test]
fn lambda_captures_enclosing_local() {
    let body = indoc! {"
        var factor = 3;
        Func<int, int> scale = x => x * factor;
        factor = 4;
        return scale(10);
    "};

    assert_eq!(run(body), "40");
}

#[test]
fn recursive_lambda() {
    let body = indoc! {"
        Func<int, int> fact = null;
        fact = n => n <= 1 ? 1 : n * fact(n - 1);
        return fact(10);
    "};

    assert_eq!(run(body), "3628800");
}

#[test]
fn recursion_limit() {
    let body = indoc! {"
        Func<int, int> depth = null;
        depth = n => n <= 0 ? 0 : 1 + depth(n - 1);
        return depth(100);
    "};

    let limits = FuelLimits::new().recursion_limit(8);
    assert_eq!(run_with(body, limits), "error: runtime recursion limit exceeded");
}

#[test]
fn lambda_arity_mismatch() {
    let body = indoc! {"
        Func<int, int> id = x => x;
        return id(1, 2);
    "};

    assert_eq!(run(body), "error: Delegate 'Func' does not take 2 arguments");
}

#[test]
fn lambda_result_is_opaque() {
    let body = indoc! {"
        Func<int, int> id = x => x;
        return id;
    "};

    assert_eq!(run(body), r#""<lambda>""#);
}

#[test]
fn thrown_exception_message_is_verbatim() {
    assert_eq!(
        run(r#"throw new InvalidOperationException("nope");"#),
        "error: nope"
    );
}

#[test]
fn exception_without_message() {
    assert_eq!(
        run("throw new Exception();"),
        "error: Exception of type 'System.Exception' was thrown."
    );
}

#[test]
fn throwing_a_non_exception() {
    assert_eq!(
        run(r#"throw "oops";"#),
        "error: The type caught or thrown must be derived from System.Exception"
    );
}

#[test]
fn returned_exception_becomes_object() {
    insta::assert_snapshot!(run_pretty(r#"return new ArgumentException("bad");"#), @r#"
    {
      "type": "System.ArgumentException",
      "message": "bad"
    }
    "#);
}

#[test]
fn exception_message_member() {
    let body = indoc! {r#"
        var e = new ArgumentException("bad");
        return e.Message;
    "#};

    assert_eq!(run(body), r#""bad""#);
}

#[test]
fn dictionary_entry_becomes_object() {
    let body = indoc! {r#"
        var d = new Dictionary<string, int> { { "a", 1 } };
        foreach (var e in d) { return e; }
        return null;
    "#};

    insta::assert_snapshot!(run_pretty(body), @r#"
    {
      "key": "a",
      "value": 1
    }
    "#);
}

#[test]
fn infinite_loop_runs_out_of_fuel() {
    let limits = FuelLimits::new().exec_fuel(1000);

    assert_eq!(
        run_with("while (true) { }", limits),
        "error: execution limit exceeded (1000 steps)"
    );
}

#[test]
fn unbounded_list_hits_collection_limit() {
    let body = indoc! {"
        var xs = new List<int>();
        while (true) { xs.Add(1); }
    "};

    let limits = FuelLimits::new().max_collection(10);
    assert_eq!(run_with(body, limits), "error: collection size limit exceeded");
}

#[test]
fn doubling_string_hits_collection_limit() {
    let body = indoc! {r#"
        var s = "ab";
        while (true) { s = s + s; }
    "#};

    let limits = FuelLimits::new().max_collection(100);
    assert_eq!(run_with(body, limits), "error: collection size limit exceeded");
}

#[test]
fn large_array_allocation_is_rejected() {
    let limits = FuelLimits::new().max_collection(100);

    assert_eq!(
        run_with("return new int[1000];", limits),
        "error: collection size limit exceeded"
    );
}

#[test]
fn array_elements_default_by_type() {
    assert_eq!(run("return new int[3];"), "[0,0,0]");
    assert_eq!(run("return new string[2];"), "[null,null]");
}

#[test]
fn unassigned_locals_hold_their_default() {
    assert_eq!(run("int x; return x;"), "0");
    assert_eq!(run("bool b; return b;"), "false");
    assert_eq!(run("string s; return s;"), "null");
}

#[test]
fn self_containing_list_is_cyclic() {
    let body = indoc! {"
        var xs = new List<object>();
        xs.Add(xs);
        return xs;
    "};

    assert_eq!(run(body), "error: the result contains a reference cycle");
}

#[test]
fn self_containing_dictionary_is_cyclic() {
    let body = indoc! {r#"
        var d = new Dictionary<string, object>();
        d["self"] = d;
        return d;
    "#};

    assert_eq!(run(body), "error: the result contains a reference cycle");
}

#[test]
fn shared_list_is_not_a_cycle() {
    let body = indoc! {"
        var inner = new List<int> { 1 };
        var outer = new List<object> { inner, inner };
        return outer;
    "};

    assert_eq!(run(body), "[[1],[1]]");
}

#[test]
fn deeply_nested_result_is_rejected() {
    let body = indoc! {"
        var xs = new List<object>();
        for (var i = 0; i < 300; i++) { xs = new List<object> { xs }; }
        return xs;
    "};

    assert_eq!(run(body), "error: the result is nested too deeply");
}

#[test]
fn member_access_on_null() {
    let body = indoc! {"
        string s = null;
        return s.Length;
    "};

    assert_eq!(
        run(body),
        "error: Object reference not set to an instance of an object."
    );
}

#[test]
fn null_coalescing() {
    let body = indoc! {r#"
        string s = null;
        return s ?? "fallback";
    "#};

    assert_eq!(run(body), r#""fallback""#);
}

#[test]
fn array_index_out_of_range() {
    let body = indoc! {"
        var xs = new[] { 1, 2 };
        return xs[2];
    "};

    assert_eq!(run(body), "error: Index was outside the bounds of the array.");
}

#[test]
fn compound_assignment_through_indexer() {
    let body = indoc! {"
        var xs = new[] { 1, 2 };
        xs[0] += 10;
        xs[1]++;
        return xs;
    "};

    assert_eq!(run(body), "[11,3]");
}

#[test]
fn postfix_increment_on_indexer_yields_old_value() {
    let body = indoc! {"
        var xs = new[] { 5 };
        var old = xs[0]++;
        return old * 100 + xs[0];
    "};

    assert_eq!(run(body), "506");
}

#[test]
fn string_is_read_only() {
    let body = indoc! {r#"
        var s = "abc";
        s[0] = 'x';
        return s;
    "#};

    assert_eq!(
        run(body),
        "error: Property or indexer 'string.this[int]' cannot be assigned to -- it is read only"
    );
}

#[test]
fn string_methods_chain() {
    assert_eq!(
        run(r#"return "Hello, World".ToUpper().Replace("WORLD", "snip");"#),
        r#""HELLO, snip""#
    );
}

#[test]
fn split_and_join() {
    assert_eq!(
        run(r#"return String.Join("-", "a b  c".Split(' '));"#),
        r#""a-b--c""#
    );
}

#[test]
fn substring_and_index_of() {
    let body = indoc! {r#"
        var s = "key=value";
        var eq = s.IndexOf("=");
        return s.Substring(0, eq) + "|" + s.Substring(eq + 1);
    "#};

    assert_eq!(run(body), r#""key|value""#);
}

#[test]
fn substring_past_the_end() {
    assert_eq!(
        run(r#"return "abc".Substring(2, 5);"#),
        "error: Index and length must refer to a location within the string. (Parameter 'length')"
    );
}

#[test]
fn string_format_alignment_and_precision() {
    assert_eq!(
        run(r#"return String.Format("{0,5}|{1:F2}|{0,-4}|", 42, 3.14159);"#),
        r#""   42|3.14|42  |""#
    );
}

#[test]
fn numeric_to_string_with_format() {
    let body = indoc! {r#"
        var d = 1234567.891;
        return d.ToString("N2");
    "#};

    assert_eq!(run(body), r#""1,234,567.89""#);
}

#[test]
fn to_string_of_collections() {
    let body = indoc! {r#"
        var d = new Dictionary<string, List<int>> { { "a", new List<int> { 1, 2 } } };
        return d.ToString() + " " + true.ToString();
    "#};

    assert_eq!(run(body), r#""{[a, [1, 2]]} True""#);
}

#[test]
fn convert_to_int32_overflows() {
    assert_eq!(
        run("return Convert.ToInt32(3000000000.0);"),
        "error: Value was either too large or too small for an Int32."
    );
}

#[test]
fn convert_rounds_half_to_even() {
    assert_eq!(run("return Convert.ToInt32(2.5) + Convert.ToInt32(3.5);"), "6");
}

#[test]
fn int_parse() {
    assert_eq!(run(r#"return int.Parse(" 42 ") + 1;"#), "43");
    assert_eq!(
        run(r#"return int.Parse("12x");"#),
        "error: Input string was not in a correct format."
    );
}

#[test]
fn math_builtins() {
    assert_eq!(run("return Math.Round(2.5);"), "2.0");
    assert_eq!(run("return Math.Max(3, 7) - Math.Abs(-2);"), "5");
    assert_eq!(run("return Math.Sqrt(16);"), "4.0");
    assert_eq!(run("return Math.Round(1.23456, 2);"), "1.23");
}

#[test]
fn int_max_value_wraps_on_overflow() {
    assert_eq!(
        run("return int.MaxValue + 1 == int.MinValue;"),
        "true"
    );
}

#[test]
fn casts() {
    assert_eq!(run("return (int)3.9;"), "3");
    assert_eq!(run("return (char)65;"), r#""A""#);
    assert_eq!(run("return (double)1 / 4;"), "0.25");
}

#[test]
fn invalid_cast() {
    assert_eq!(
        run(r#"object o = "text"; return (int)o;"#),
        "error: Unable to cast object of type 'string' to type 'int'."
    );
}

#[test]
fn list_sort() {
    let body = indoc! {r#"
        var xs = new List<string> { "pear", "apple", "fig" };
        xs.Sort();
        return xs;
    "#};

    assert_eq!(run(body), r#"["apple","fig","pear"]"#);
}

#[test]
fn sorting_mixed_types_fails() {
    let body = indoc! {r#"
        var xs = new List<object> { 1, "a" };
        xs.Sort();
        return xs;
    "#};

    assert_eq!(run(body), "error: Failed to compare two elements in the array.");
}

#[test]
fn list_mutators() {
    let body = indoc! {"
        var xs = new List<int> { 1, 2, 3, 4 };
        xs.Remove(2);
        xs.RemoveAt(0);
        xs.Insert(1, 9);
        return xs;
    "};

    assert_eq!(run(body), "[3,9,4]");
}

#[test]
fn list_remove_at_out_of_range() {
    let body = indoc! {"
        var xs = new List<int>();
        xs.RemoveAt(0);
        return xs;
    "};

    assert_eq!(
        run(body),
        "error: Index was out of range. Must be non-negative and less than the size of the collection. (Parameter 'index')"
    );
}

#[test]
fn unknown_instance_member() {
    let body = indoc! {"
        var x = 5;
        return x.Foo();
    "};

    assert_eq!(run(body), "error: 'int' does not contain a definition for 'Foo'");
}

#[test]
fn operator_type_mismatch() {
    let body = indoc! {"
        var b = true;
        return b + 1;
    "};

    assert_eq!(
        run(body),
        "error: Operator '+' cannot be applied to operands of type 'bool' and 'int'"
    );
}

#[test]
fn condition_must_be_bool() {
    let body = indoc! {"
        var n = 1;
        if (n) { return 1; }
        return 0;
    "};

    assert_eq!(run(body), "error: Cannot implicitly convert type 'int' to 'bool'");
}

#[test]
fn equality_is_numeric_across_types() {
    assert_eq!(run("return 1 == 1.0 && 'A' == 65;"), "true");
}

#[test]
fn collections_compare_by_reference() {
    let body = indoc! {"
        var a = new List<int>();
        var b = new List<int>();
        return (a == b) + \" \" + (a == a);
    "};

    assert_eq!(run(body), r#""False True""#);
}

#[test]
fn console_output_returns_normally() {
    let body = indoc! {r#"
        Console.WriteLine("value: {0}", 42);
        Console.Write("no newline");
        return 1;
    "#};

    assert_eq!(run(body), "1");
}

#[test]
fn returning_null() {
    assert_eq!(run("return null;"), "null");
}

#[test]
fn deep_list_chain_is_released() {
    let body = indoc! {"
        var l = new List<object>();
        var cur = l;
        for (int i = 0; i < 100000; i++) { var n = new List<object>(); cur.Add(n); cur = n; }
        return l.Count;
    "};

    assert_eq!(run(body), "1");
}

#[test]
fn deep_dictionary_chain_is_released() {
    let body = indoc! {r#"
        var d = new Dictionary<string, object>();
        var cur = d;
        for (int i = 0; i < 100000; i++) {
            var n = new Dictionary<string, object>();
            cur["next"] = n;
            cur = n;
        }
        return d.Count;
    "#};

    assert_eq!(run(body), "1");
}

#[test]
fn deep_list_chain_supports_equals_and_to_string() {
    let body = indoc! {"
        var l = new List<object>();
        var cur = l;
        for (int i = 0; i < 100000; i++) { var n = new List<object>(); cur.Add(n); cur = n; }
        return l.Equals(l) && l.ToString().Length > 0;
    "};

    assert_eq!(run(body), "true");
}
