use indoc::indoc;

use crate::diagnostics::WarningMode;
use crate::module::{DEFAULT_RECURSION_LIMIT, ModuleAnalyzed, ModuleBuilder};
use crate::{DiagnosticKind, Error};

impl<'s> ModuleAnalyzed<'s> {
    #[track_caller]
    pub fn expect(src: &'s str) -> Self {
        ModuleBuilder::new(src).parse().unwrap().analyze()
    }

    #[track_caller]
    pub fn expect_with(src: &'s str, warnings: WarningMode) -> Self {
        ModuleBuilder::new(src)
            .with_warnings(warnings)
            .parse()
            .unwrap()
            .analyze()
    }

    #[track_caller]
    pub fn expect_valid(src: &'s str) -> Self {
        let module = Self::expect(src);
        if !module.is_valid() {
            panic!(
                "Expected valid module, got error:\n{}",
                module.dump_diagnostics()
            );
        }
        module
    }

    /// Valid and without any diagnostic, warnings included.
    #[track_caller]
    pub fn expect_clean(src: &'s str) {
        let module = Self::expect(src);
        if !module.diagnostics().is_empty() {
            panic!(
                "Expected no diagnostics, got:\n{}",
                module.dump_diagnostics()
            );
        }
    }

    #[track_caller]
    pub fn expect_invalid(src: &'s str) -> String {
        let module = Self::expect(src);
        if module.is_valid() {
            panic!("Expected invalid module, got valid:\n{}", module.dump());
        }
        module.dump_diagnostics()
    }

    #[track_caller]
    pub fn expect_diagnostics(src: &'s str) -> String {
        Self::expect(src).dump_diagnostics()
    }
}

const SCENARIO_PRELUDE: &str = indoc! {"
    pure nothrow int foo();
    void doEffect();
"};

fn scenario(body: &str) -> String {
    format!("{SCENARIO_PRELUDE}void main() {{ int a; int b; int x; bool cond; bool flagA; {body} }}")
}

#[test]
fn increment_statement_is_silent() {
    ModuleAnalyzed::expect_clean(&scenario("x++;"));
}

#[test]
fn arithmetic_statement_is_error() {
    let res = ModuleAnalyzed::expect_invalid(&scenario("a + b;"));

    insta::assert_snapshot!(res, @"error: `+` has no effect in expression (a + b)");
}

#[test]
fn discarded_pure_call_warns() {
    let src = scenario("foo();");
    let module = ModuleAnalyzed::expect_valid(&src);

    insta::assert_snapshot!(module.dump_diagnostics(), @r"
    warning: calling `foo` without side effects discards return value of type `int`; prepend a `cast(void)` if intentional
      help: prepend `cast(void)`: `cast(void) foo()`
    ");
}

#[test]
fn cast_to_void_silences_pure_call() {
    ModuleAnalyzed::expect_clean(&scenario("cast(void) foo();"));
}

#[test]
fn conditional_checks_each_branch() {
    let res = ModuleAnalyzed::expect_invalid(&scenario("cond ? doEffect() : (a + b);"));

    insta::assert_snapshot!(res, @"error: `+` has no effect in expression (a + b)");
}

#[test]
fn logical_and_checks_right_operand_only() {
    ModuleAnalyzed::expect_clean(&scenario("flagA && doEffect();"));
}

#[test]
fn all_scenarios_in_one_body() {
    let src = scenario(indoc! {"
        x++;
        a + b;
        foo();
        cast(void) foo();
        cond ? doEffect() : (a + b);
        flagA && doEffect();
    "});
    let res = ModuleAnalyzed::expect_invalid(&src);

    insta::assert_snapshot!(res, @r"
    error: `+` has no effect in expression (a + b)
    warning: calling `foo` without side effects discards return value of type `int`; prepend a `cast(void)` if intentional
      help: prepend `cast(void)`: `cast(void) foo()`
    error: `+` has no effect in expression (a + b)
    ");
}

#[test]
fn warnings_off_drops_pure_call_warning() {
    let src = scenario("foo();");
    let module = ModuleAnalyzed::expect_with(&src, WarningMode::Off);

    assert!(module.diagnostics().is_empty());
    assert!(module.is_valid());
}

#[test]
fn warnings_as_errors_fail_module() {
    let src = scenario("foo();");
    let module = ModuleAnalyzed::expect_with(&src, WarningMode::AsErrors);

    assert_eq!(module.diagnostics().warning_count(), 1);
    assert!(!module.is_valid());
    assert!(matches!(module.into_result(), Err(Error::AnalysisFailed(_))));
}

#[test]
fn void_pure_call_is_never_reported() {
    let src = indoc! {"
        pure nothrow void reset();
        void main() { reset(); }
    "};

    ModuleAnalyzed::expect_clean(src);
}

#[test]
fn module_reference_is_error() {
    let src = indoc! {"
        import std;
        void main() { std; }
    "};

    let res = ModuleAnalyzed::expect_invalid(src);

    insta::assert_snapshot!(res, @"error: module `std` has no effect");
}

#[test]
fn for_step_is_checked() {
    let src = indoc! {"
        void main() {
            int i;
            for (i = 0; i < 10; i + 1) {}
        }
    "};

    let res = ModuleAnalyzed::expect_invalid(src);

    insta::assert_snapshot!(res, @"error: `+` has no effect in expression (i + 1)");
}

#[test]
fn temporary_idiom_is_silent() {
    let src = indoc! {"
        pure nothrow int foo();
        void main() { (auto t = foo(), t); }
    "};

    ModuleAnalyzed::expect_clean(src);
}

#[test]
fn comma_reports_only_final_operand() {
    let src = indoc! {"
        void main() { int a; int b; a = 1, b; }
    "};

    let res = ModuleAnalyzed::expect_invalid(src);

    insta::assert_snapshot!(res, @"error: `var` has no effect in expression (b)");
}

#[test]
fn undefined_identifier_is_reported_once() {
    let src = "void main() { missing + 1; }";

    let res = ModuleAnalyzed::expect_invalid(src);

    insta::assert_snapshot!(res, @"error: undefined identifier `missing`");
}

#[test]
fn traits_compiles_gags_errors() {
    let src = indoc! {"
        void main() {
            bool ok;
            ok = __traits(compiles, missing + 1);
        }
    "};

    let module = ModuleAnalyzed::expect_valid(src);

    assert!(module.diagnostics().is_empty());
    assert_eq!(module.context().gagged_errors(), 1);
}

#[test]
fn traits_compiles_is_no_effect_when_discarded() {
    let src = "void main() { __traits(compiles, 1); }";

    let res = ModuleAnalyzed::expect_invalid(src);

    insta::assert_snapshot!(res, @"error: `literal` has no effect in expression (true)");
}

#[test]
fn parse_errors_survive_analysis() {
    let src = "void main() { int a; a = ; }";

    let module = ModuleAnalyzed::expect(src);

    assert!(!module.is_valid());
    assert!(
        module
            .diagnostics()
            .iter()
            .any(|d| d.kind() == DiagnosticKind::ExpectedExpression)
    );
}

#[test]
fn parse_stage_into_result() {
    let parsed = ModuleBuilder::new("void main() {").parse().unwrap();

    assert!(!parsed.is_valid());
    assert!(matches!(parsed.into_result(), Err(Error::ParseFailed(_))));
}

#[test]
fn exec_fuel_exhaustion_is_fatal() {
    let src = "void main() { int a; a = 1; a = 2; a = 3; }";

    let result = ModuleBuilder::new(src).with_parse_fuel(5).parse();

    assert!(matches!(result, Err(Error::ExecFuelExhausted)));
}

#[test]
fn recursion_limit_is_fatal() {
    let src = format!("void main() {{ int a; a = {}1; }}", "!".repeat(64));

    let result = ModuleBuilder::new(&src)
        .with_parse_recursion_limit(16)
        .parse();

    assert!(matches!(result, Err(Error::RecursionLimitExceeded)));
}

/// Operand chain with as many links as the default parse limits allow.
fn chain_at_recursion_limit(op: &str) -> String {
    let links = DEFAULT_RECURSION_LIMIT as usize - 16;
    vec!["a"; links + 1].join(op)
}

#[test]
fn arithmetic_chain_at_recursion_limit_is_analyzed() {
    let chain = chain_at_recursion_limit(" + ");
    let src = format!("void main() {{ int a; cast(void)({chain}); }}");

    ModuleAnalyzed::expect_clean(&src);
}

#[test]
fn discarded_chain_at_recursion_limit_is_reported() {
    let chain = chain_at_recursion_limit(" - ");
    let src = format!("void main() {{ int a; {chain}; }}");

    let module = ModuleAnalyzed::expect(&src);

    let diagnostics = module.diagnostics().as_slice();
    assert_eq!(diagnostics.len(), 1);
    assert!(diagnostics[0].message().starts_with("`-` has no effect in expression (a - a - "));
    assert!(diagnostics[0].message().ends_with(" - a - a)"));
}

#[test]
fn logical_chain_at_recursion_limit_checks_last_operand() {
    let chain = chain_at_recursion_limit(" && ");
    let src = format!("void main() {{ bool a; {chain}; }}");

    let module = ModuleAnalyzed::expect(&src);

    assert_eq!(module.diagnostics().error_count(), 1);
}

#[test]
fn try_from_source() {
    let module = ModuleAnalyzed::try_from("void main() {}").unwrap();

    assert!(module.is_valid());
    assert_eq!(module.source(), "void main() {}");
}
