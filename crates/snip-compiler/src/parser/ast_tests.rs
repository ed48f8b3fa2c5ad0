use super::ast::{Expr, InitItem, Stmt};
use super::parse;

fn statements(body: &str) -> Vec<Stmt> {
    let source = format!("public class C {{\npublic object Execute() {{\n{body}\n}}\n}}\n");
    let result = parse(&source).expect("parses");
    assert!(result.diagnostics.is_empty());
    result
        .root
        .class()
        .and_then(|class| class.method())
        .and_then(|method| method.body())
        .expect("method body")
        .statements()
        .collect()
}

fn single(body: &str) -> Stmt {
    let mut stmts = statements(body);
    assert_eq!(stmts.len(), 1);
    stmts.remove(0)
}

#[test]
fn class_and_method_names() {
    let result =
        parse("using System.Text;\npublic class Snippet { public object Execute() { } }").unwrap();
    let root = result.root;

    let usings: Vec<String> = root
        .usings()
        .filter_map(|using| using.name())
        .map(|name| name.text())
        .collect();
    assert_eq!(usings, ["System.Text"]);

    let class = root.class().unwrap();
    assert_eq!(class.name().unwrap().text(), "Snippet");
    assert_eq!(class.method().unwrap().name().unwrap().text(), "Execute");
}

#[test]
fn var_local() {
    let Stmt::Local(local) = single("var total = 0;") else {
        panic!("expected a local declaration");
    };

    assert!(local.is_var());
    assert!(local.ty().is_none());
    assert_eq!(local.name().unwrap().text(), "total");
    assert!(matches!(local.init(), Some(Expr::Literal(_))));
}

#[test]
fn qualified_generic_array_type() {
    let Stmt::Local(local) = single("System.Collections.Generic.List<int>[] xs = null;") else {
        panic!("expected a local declaration");
    };

    let ty = local.ty().unwrap();
    assert!(!local.is_var());
    assert_eq!(ty.name(), "System.Collections.Generic.List");
    assert_eq!(ty.simple_name(), "List");
    assert!(ty.is_array());

    let args = ty.type_args();
    assert_eq!(args.len(), 1);
    assert_eq!(args[0].keyword().unwrap().text(), "int");
    assert_eq!(local.name().unwrap().text(), "xs");
}

#[test]
fn unparenthesized_strips_nested_parens() {
    let Stmt::Return(ret) = single("return ((x));") else {
        panic!("expected a return");
    };

    let Expr::Name(name) = ret.value().unwrap().unparenthesized() else {
        panic!("expected a name");
    };
    assert_eq!(name.text(), "x");
}

#[test]
fn dictionary_initializer_groups() {
    let source = r#"var d = new Dictionary<string, int> { { "a", 1 }, { "b", 2 } };"#;
    let Stmt::Local(local) = single(source) else {
        panic!("expected a local declaration");
    };
    let Some(Expr::New(new)) = local.init() else {
        panic!("expected an object creation");
    };

    let ty = new.ty().unwrap();
    assert_eq!(ty.simple_name(), "Dictionary");
    assert_eq!(ty.type_args().len(), 2);
    assert!(new.args().is_none());

    let sizes: Vec<usize> = new
        .initializer()
        .unwrap()
        .items()
        .map(|item| match item {
            InitItem::Group(group) => group.values().count(),
            InitItem::Single(_) => 1,
        })
        .collect();
    assert_eq!(sizes, [2, 2]);
}

#[test]
fn lambda_parameters() {
    let Stmt::Return(ret) = single("return (a, b) => a;") else {
        panic!("expected a return");
    };
    let Some(Expr::Lambda(lambda)) = ret.value() else {
        panic!("expected a lambda");
    };

    let params: Vec<String> = lambda.params().iter().map(|t| t.text().to_string()).collect();
    assert_eq!(params, ["a", "b"]);
    assert!(matches!(lambda.body(), Some(Expr::Name(_))));
}

#[test]
fn for_without_init_or_condition() {
    let Stmt::For(for_stmt) = single("for (;; i++, j--) ;") else {
        panic!("expected a for loop");
    };

    assert!(for_stmt.init().unwrap().local().is_none());
    assert!(for_stmt.condition().is_none());
    assert_eq!(for_stmt.updates().len(), 2);
    assert!(matches!(for_stmt.body(), Some(Stmt::Empty(_))));
}

#[test]
fn if_else_branches() {
    let Stmt::If(if_stmt) = single("if (ok) return 1; else { return 2; }") else {
        panic!("expected an if");
    };

    assert!(matches!(if_stmt.condition(), Some(Expr::Name(_))));
    assert!(matches!(if_stmt.then_branch(), Some(Stmt::Return(_))));
    assert!(matches!(if_stmt.else_branch(), Some(Stmt::Block(_))));
}

#[test]
fn call_arguments_and_member_target() {
    let Stmt::Expr(stmt) = single(r#"Console.WriteLine("{0}", x);"#) else {
        panic!("expected an expression statement");
    };
    let Some(Expr::Call(call)) = stmt.expr() else {
        panic!("expected a call");
    };

    assert_eq!(call.args().len(), 2);
    let Some(Expr::Member(member)) = call.callee() else {
        panic!("expected a member access");
    };
    assert_eq!(member.member().unwrap().text(), "WriteLine");
    assert!(matches!(member.target(), Some(Expr::Name(_))));
}

#[test]
fn statement_ranges_exclude_leading_trivia() {
    let source = "public class C {\npublic object Execute() {\n    return 1;\n}\n}\n";
    let result = parse(source).unwrap();
    let block = result.root.class().unwrap().method().unwrap().body().unwrap();
    let stmt = block.statements().next().unwrap();

    let start = usize::from(stmt.text_range().start());
    assert_eq!(&source[start..start + 6], "return");
}
