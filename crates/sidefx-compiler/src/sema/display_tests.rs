use super::*;
use crate::diagnostics::{DiagnosticContext, WarningMode};
use crate::ops::{BinaryOp, UnaryOp};
use crate::parser::parse;
use crate::test_utils::ProgramBuilder;

const PRELUDE: &str = "int foo(int a);\nclass Widget;\n";
const LOCALS: &str = "int a; int b; int c; int[string] m; int* p; bool f;";

/// Render every expression statement after the shared locals, one per line.
#[track_caller]
fn render(body: &str) -> String {
    let source = format!("{PRELUDE}void g() {{ {LOCALS} {body} }}");
    let (file, diagnostics) = parse(&source).unwrap();
    assert!(diagnostics.is_empty(), "parse failed for {body:?}");
    let mut ctx = DiagnosticContext::new(WarningMode::Informational);
    let program = lower(&file, &source, &mut ctx);
    assert!(!ctx.diagnostics().has_errors(), "lowering failed for {body:?}");

    program
        .discarded_exprs()
        .into_iter()
        .skip(6)
        .map(|(id, _)| program.expr_text(id))
        .collect::<Vec<_>>()
        .join("\n")
}

#[test]
fn binary_precedence() {
    let res = render("a + b * c; (a + b) * c; a - (b - c); a - b - c; a << b + c;");

    insta::assert_snapshot!(res, @r"
    a + b * c
    (a + b) * c
    a - (b - c)
    a - b - c
    a << b + c
    ");
}

#[test]
fn power_is_right_associative() {
    let res = render("a ^^ b ^^ c; (a ^^ b) ^^ c; -a ^^ b; (-a) ^^ b;");

    insta::assert_snapshot!(res, @r"
    a ^^ b ^^ c
    (a ^^ b) ^^ c
    -a ^^ b
    (-a) ^^ b
    ");
}

#[test]
fn logical_operators() {
    let res = render("a && b || f; a && (b || f); !(a < b);");

    insta::assert_snapshot!(res, @r"
    a && b || f
    a && (b || f)
    !(a < b)
    ");
}

#[test]
fn assignments() {
    let res = render("a = b = c; a += b * 2; *p = 1;");

    insta::assert_snapshot!(res, @r"
    a = b = c
    a += b * 2
    *p = 1
    ");
}

#[test]
fn conditional_and_comma() {
    let res = render("f ? a : b; f ? a : f ? b : c; a, b; foo((a, b));");

    insta::assert_snapshot!(res, @r"
    f ? a : b
    f ? a : f ? b : c
    a, b
    foo((a, b))
    ");
}

#[test]
fn steps_and_prefix_operators() {
    let res = render("a++; ++a; b--; &a; -(a + b);");

    insta::assert_snapshot!(res, @r"
    a++
    ++a
    b--
    &a
    -(a + b)
    ");
}

#[test]
fn casts() {
    let res = render("cast(void) foo(a); cast(double) (a + b); cast(bool) a;");

    insta::assert_snapshot!(res, @r"
    cast(void) foo(a)
    cast(double) (a + b)
    cast(bool) a
    ");
}

#[test]
fn associative_arrays() {
    let res = render(r#"m.remove("k"); "k" in m; m["k"];"#);

    insta::assert_snapshot!(res, @r#"
    m.remove("k")
    "k" in m
    m["k"]
    "#);
}

#[test]
fn asserts() {
    let res = render(r#"assert(0); assert(false); assert(f, "oops");"#);

    insta::assert_snapshot!(res, @r#"
    assert(0)
    assert(0)
    assert(f, "oops")
    "#);
}

#[test]
fn declarations() {
    let res = render("int t = a + 1; double y; auto w = f;");

    insta::assert_snapshot!(res, @r"
    int t = a + 1
    double y
    bool w = f
    ");
}

#[test]
fn allocation() {
    let res = render("new Widget; new class {}; delete p;");

    insta::assert_snapshot!(res, @r"
    new Widget
    new class {}
    delete p
    ");
}

#[test]
fn literals() {
    let res = render(r#"null; true; 42; "text";"#);

    insta::assert_snapshot!(res, @r#"
    null
    true
    42
    "text"
    "#);
}

#[test]
fn deep_chains_render_without_recursion() {
    let mut b = ProgramBuilder::new();
    let a = b.local("a", TYPE_INT);
    let mut sum = b.int(0);
    let mut negated = a;
    for i in 1..50_000 {
        let rhs = b.int(i);
        sum = b.binary(BinaryOp::Sub, sum, rhs);
        negated = b.node(
            ExprKind::Unary {
                op: UnaryOp::Neg,
                operand: negated,
            },
            Some(TYPE_INT),
        );
    }

    let sum = b.program.expr_text(sum);
    let negated = b.program.expr_text(negated);

    assert!(sum.starts_with("0 - 1 - 2 - "));
    assert!(sum.ends_with(" - 49998 - 49999"));
    assert_eq!(negated.len(), 49_999 + 1);
    assert!(negated.ends_with("--a"));
}
