use rowan::TextRange;

use super::*;

fn range(start: u32, end: u32) -> TextRange {
    TextRange::new(start.into(), end.into())
}

#[test]
fn severity_display() {
    insta::assert_snapshot!(format!("{}", Severity::Error), @"error");
    insta::assert_snapshot!(format!("{}", Severity::Warning), @"warning");
}

#[test]
fn report_with_default_message() {
    let mut diagnostics = Diagnostics::new();
    diagnostics
        .report(DiagnosticKind::ExpectedType, range(0, 5))
        .emit();

    assert_eq!(diagnostics.len(), 1);
    assert!(diagnostics.has_errors());
    assert_eq!(diagnostics.as_slice()[0].message(), "expected a type");
}

#[test]
fn report_with_custom_message() {
    let mut diagnostics = Diagnostics::new();
    diagnostics
        .report(DiagnosticKind::UndefinedIdentifier, range(0, 5))
        .message("hello")
        .emit();

    assert_eq!(
        diagnostics.as_slice()[0].message(),
        "undefined identifier `hello`"
    );
}

#[test]
fn warning_kind_defaults_to_warning() {
    let mut diagnostics = Diagnostics::new();
    diagnostics
        .report(DiagnosticKind::DiscardedPureCall, range(0, 5))
        .emit();

    assert!(!diagnostics.has_errors());
    assert!(diagnostics.has_warnings());
    assert_eq!(diagnostics.warning_count(), 1);
}

#[test]
fn severity_override() {
    let mut diagnostics = Diagnostics::new();
    diagnostics
        .report(DiagnosticKind::NoEffect, range(0, 5))
        .severity(Severity::Warning)
        .emit();

    assert!(diagnostics.as_slice()[0].is_warning());
}

#[test]
fn builder_with_related() {
    let mut diagnostics = Diagnostics::new();
    diagnostics
        .report(DiagnosticKind::UnclosedParen, range(0, 5))
        .message("primary")
        .related_to("related info", range(6, 10))
        .emit();

    let result = diagnostics.render("hello world!");
    insta::assert_snapshot!(result, @r"
    error: missing closing `)`; primary
      |
    1 | hello world!
      | ^^^^^ ---- related info
    ");
}

#[test]
fn builder_with_fix() {
    let mut diagnostics = Diagnostics::new();
    diagnostics
        .report(DiagnosticKind::DiscardedPureCall, range(0, 5))
        .message("discarded")
        .fix("apply this fix", "fixed")
        .emit();

    let result = diagnostics.render("hello world");
    insta::assert_snapshot!(result, @r"
    warning: discarded
      |
    1 | hello world
      | ^^^^^
      |
    help: apply this fix
      |
    1 - hello world
    1 + fixed world
      |
    ");
}

#[test]
fn printer_colored() {
    let mut diagnostics = Diagnostics::new();
    diagnostics
        .report(DiagnosticKind::NoEffect, range(0, 5))
        .message("test")
        .emit();

    let result = diagnostics.render_colored("hello", true);
    assert!(result.contains("test"));
    assert!(result.contains('\x1b'));
}

#[test]
fn printer_empty_diagnostics() {
    let diagnostics = Diagnostics::new();
    let result = diagnostics.render("source");
    assert!(result.is_empty());
}

#[test]
fn printer_with_path() {
    let mut diagnostics = Diagnostics::new();
    diagnostics
        .report(DiagnosticKind::UndefinedIdentifier, range(0, 5))
        .message("hello")
        .emit();

    let result = diagnostics
        .printer()
        .source("hello world")
        .path("main.d")
        .render();
    insta::assert_snapshot!(result, @r"
    error: undefined identifier `hello`
     --> main.d:1:1
      |
    1 | hello world
      | ^^^^^
    ");
}

#[test]
fn printer_zero_width_span() {
    let mut diagnostics = Diagnostics::new();
    diagnostics
        .report(DiagnosticKind::ExpectedSemicolon, TextRange::empty(0.into()))
        .emit();

    let result = diagnostics.render("hello");
    insta::assert_snapshot!(result, @r"
    error: expected `;`
      |
    1 | hello
      | ^
    ");
}

#[test]
fn printer_multiple_diagnostics() {
    let mut diagnostics = Diagnostics::new();
    diagnostics
        .report(DiagnosticKind::UnclosedParen, range(0, 5))
        .message("first error")
        .emit();
    diagnostics
        .report(DiagnosticKind::UndefinedIdentifier, range(6, 10))
        .message("worl")
        .emit();

    let result = diagnostics.render("hello world!");
    insta::assert_snapshot!(result, @r"
    error: missing closing `)`; first error
      |
    1 | hello world!
      | ^^^^^

    error: undefined identifier `worl`
      |
    1 | hello world!
      |       ^^^^
    ");
    assert!(result.contains("^^^^^\n\nerror: undefined identifier"));
    assert!(!result.ends_with('\n'));
}

#[test]
fn plain_printer_without_source() {
    let mut diagnostics = Diagnostics::new();
    diagnostics
        .report(DiagnosticKind::NoEffect, range(3, 8))
        .message("`+` has no effect in expression (a + b)")
        .emit();
    diagnostics
        .report(DiagnosticKind::DiscardedPureCall, range(10, 15))
        .message("discarded")
        .fix("prepend `cast(void)`", "cast(void) f()")
        .emit();

    let result = diagnostics.printer().render();
    insta::assert_snapshot!(result, @r"
    error at 3..8: `+` has no effect in expression (a + b)
    warning at 10..15: discarded (fix: prepend `cast(void)`)
    ");
}

#[test]
fn collection_methods() {
    let mut diagnostics = Diagnostics::new();
    diagnostics
        .report(DiagnosticKind::UnclosedBrace, TextRange::empty(0.into()))
        .emit();
    diagnostics
        .report(DiagnosticKind::DiscardedPureCall, TextRange::empty(1.into()))
        .emit();

    let mut other = Diagnostics::new();
    other
        .report(DiagnosticKind::NoEffect, TextRange::empty(2.into()))
        .emit();
    diagnostics.extend(other);

    assert!(!diagnostics.is_empty());
    assert_eq!(diagnostics.len(), 3);
    assert_eq!(diagnostics.error_count(), 2);
    assert_eq!(diagnostics.warning_count(), 1);
    assert_eq!((&diagnostics).into_iter().count(), 3);
}

#[test]
fn kind_default_severity() {
    assert_eq!(DiagnosticKind::NoEffect.default_severity(), Severity::Error);
    assert_eq!(
        DiagnosticKind::ModuleHasNoEffect.default_severity(),
        Severity::Error
    );
    assert_eq!(
        DiagnosticKind::DiscardedPureCall.default_severity(),
        Severity::Warning
    );
}

#[test]
fn kind_message_rendering() {
    assert_eq!(
        DiagnosticKind::UnclosedParen.message(None),
        "missing closing `)`"
    );
    assert_eq!(
        DiagnosticKind::UnclosedParen.message(Some("opened here")),
        "missing closing `)`; opened here"
    );
    assert_eq!(
        DiagnosticKind::ModuleHasNoEffect.message(Some("std")),
        "module `std` has no effect"
    );
    assert_eq!(
        DiagnosticKind::ExpectedExpression.message(Some("found `;`")),
        "expected an expression: found `;`"
    );
    assert_eq!(
        DiagnosticKind::NoEffect.message(Some("full sentence")),
        "full sentence"
    );
}

#[test]
fn kind_serializes_kebab_case() {
    let json = serde_json::to_string(&DiagnosticKind::DiscardedPureCall).unwrap();
    assert_eq!(json, "\"discarded-pure-call\"");
}

#[test]
fn message_serializes_range_and_fix() {
    let mut diagnostics = Diagnostics::new();
    diagnostics
        .report(DiagnosticKind::DiscardedPureCall, range(2, 7))
        .message("discarded")
        .fix("prepend `cast(void)`", "cast(void) f()")
        .emit();

    let json = serde_json::to_string(&diagnostics.as_slice()[0]).unwrap();
    insta::assert_snapshot!(json, @r#"{"kind":"discarded-pure-call","severity":"warning","range":{"start":2,"end":7},"message":"discarded","fix":{"replacement":"cast(void) f()","description":"prepend `cast(void)`"}}"#);
}

#[test]
fn context_reports_directly_when_not_gagged() {
    let mut ctx = DiagnosticContext::new(WarningMode::Informational);
    ctx.report(DiagnosticKind::NoEffect, range(0, 1)).emit();

    assert_eq!(ctx.diagnostics().len(), 1);
    assert!(ctx.has_failures());
}

#[test]
fn gagging_counts_errors_instead_of_reporting() {
    let mut ctx = DiagnosticContext::new(WarningMode::Informational);

    let outer = ctx.start_gagging();
    ctx.report(DiagnosticKind::UndefinedIdentifier, range(0, 1))
        .message("x")
        .emit();
    let inner = ctx.start_gagging();
    assert_eq!(ctx.gag_depth(), 2);
    let inner_swallowed = ctx.end_gagging(inner);
    let outer_swallowed = ctx.end_gagging(outer);

    assert!(!inner_swallowed);
    assert!(outer_swallowed);
    assert!(!ctx.is_gagged());
    assert!(ctx.diagnostics().is_empty());
    assert_eq!(ctx.gagged_errors(), 1);
    assert!(!ctx.has_failures());
}

#[test]
fn gagged_warnings_are_not_counted() {
    let mut ctx = DiagnosticContext::new(WarningMode::Informational);

    let snapshot = ctx.start_gagging();
    assert!(!ctx.warnings_enabled());
    ctx.report(DiagnosticKind::DiscardedPureCall, range(0, 1)).emit();
    let swallowed = ctx.end_gagging(snapshot);

    assert!(!swallowed);
    assert_eq!(ctx.gagged_errors(), 0);
    assert!(ctx.warnings_enabled());
}

#[test]
fn warning_modes() {
    assert!(!WarningMode::Off.is_enabled());
    assert!(WarningMode::Informational.is_enabled());
    assert!(WarningMode::AsErrors.is_enabled());
    assert_eq!(WarningMode::default(), WarningMode::Informational);

    for (mode, fails) in [
        (WarningMode::Informational, false),
        (WarningMode::AsErrors, true),
    ] {
        let mut ctx = DiagnosticContext::new(mode);
        ctx.report(DiagnosticKind::DiscardedPureCall, range(0, 1)).emit();
        assert_eq!(ctx.has_failures(), fails, "{mode:?}");
        assert_eq!(ctx.warning_mode(), mode);
    }
}

#[test]
fn context_continues_existing_diagnostics() {
    let mut parsed = Diagnostics::new();
    parsed
        .report(DiagnosticKind::ExpectedSemicolon, range(0, 1))
        .emit();

    let ctx = DiagnosticContext::with_diagnostics(parsed, WarningMode::Off);

    assert_eq!(ctx.into_diagnostics().error_count(), 1);
}
