//! Diagnostics for values computed only to be thrown away.
//!
//! [`discard_value`] is called once per expression whose value goes unused.
//! It follows the constructs that only select or sequence a sub-result
//! (`&&`, `||`, `?:`, `,`) down to the expressions that actually produce the
//! discarded value, and reports those that are meaningless.

use super::effect::{has_effect, has_shallow_effect};
use crate::diagnostics::{DiagnosticContext, DiagnosticKind};
use crate::sema::{ExprId, ExprKind, Program};

/// Check an expression whose value is discarded.
///
/// - anything with a shallow effect is accepted
/// - `cast(void)` and error placeholders are accepted
/// - effect-free calls with a non-`void` result are warnings
/// - module references are errors
/// - `&&` and `||` check their right operand only
/// - `?:` checks both branches, the `then` branch first
/// - `,` checks its last operand, except for the `(T tmp = e, ..., tmp)` idiom
/// - tuples are accepted when any element has an effect
/// - everything else is an error naming the operator and the expression
pub fn discard_value(program: &Program, ctx: &mut DiagnosticContext, root: ExprId) {
    let mut pending = vec![root];
    while let Some(id) = pending.pop() {
        if has_shallow_effect(program, id) {
            continue;
        }

        let expr = &program.exprs[id];
        match &expr.kind {
            ExprKind::Cast { to, .. } if program.types.is_void(*to) => {}
            ExprKind::Error => {}
            ExprKind::Call { .. } => warn_discarded_call(program, ctx, id),
            ExprKind::Import(module) => {
                let name = program.interner.resolve(program.symbols.module(*module).name);
                tracing::debug!(module = name, "module reference discarded");
                ctx.report(DiagnosticKind::ModuleHasNoEffect, expr.range)
                    .message(name)
                    .emit();
            }
            ExprKind::AndAnd { rhs, .. } | ExprKind::OrOr { rhs, .. } => pending.push(*rhs),
            ExprKind::Cond {
                then_branch,
                else_branch,
                ..
            } => {
                pending.push(*else_branch);
                pending.push(*then_branch);
            }
            ExprKind::Comma { lhs, rhs } => {
                if !is_temporary_idiom(program, *lhs, *rhs) {
                    pending.push(*rhs);
                }
            }
            ExprKind::Tuple(_) if has_effect(program, id) => {}
            kind => {
                let text = program.expr_text(id);
                tracing::debug!(op = kind.op_name(), expr = %text, "expression has no effect");
                ctx.report(DiagnosticKind::NoEffect, expr.range)
                    .message(format!(
                        "`{}` has no effect in expression ({text})",
                        kind.op_name()
                    ))
                    .emit();
            }
        }
    }
}

/// `(T tmp = e, ..., tmp)`: the first operand of the comma chain declares
/// the variable the chain yields.
fn is_temporary_idiom(program: &Program, lhs: ExprId, rhs: ExprId) -> bool {
    let mut first = lhs;
    while let ExprKind::Comma { lhs, .. } = program.exprs[first].kind {
        first = lhs;
    }
    match (&program.exprs[first].kind, &program.exprs[rhs].kind) {
        (ExprKind::Declaration { var, .. }, ExprKind::Var(yielded)) => var == yielded,
        _ => false,
    }
}

/// Only reached for calls through strongly pure, nothrow functions.
fn warn_discarded_call(program: &Program, ctx: &mut DiagnosticContext, id: ExprId) {
    if !ctx.warnings_enabled() {
        return;
    }
    let expr = &program.exprs[id];
    let ExprKind::Call { callee, func, .. } = &expr.kind else {
        return;
    };
    // Calls without a result are never reported, even when provably pure.
    let Some(ret) = expr.ty.filter(|ty| !program.types.is_void(*ty)) else {
        return;
    };

    let name = match (func, &program.exprs[*callee].kind) {
        (Some(func), _) => program
            .interner
            .resolve(program.symbols.func(*func).name)
            .to_string(),
        (None, ExprKind::Deref(pointer)) => program.expr_text(*pointer),
        (None, _) => program.expr_text(*callee),
    };
    let ty = program.type_text(ret);
    tracing::debug!(callee = %name, ty = %ty, "discarded result of effect-free call");

    ctx.report(DiagnosticKind::DiscardedPureCall, expr.range)
        .message(format!(
            "calling `{name}` without side effects discards return value of type `{ty}`; \
             prepend a `cast(void)` if intentional"
        ))
        .fix(
            "prepend `cast(void)`",
            format!("cast(void) {}", program.expr_text(id)),
        )
        .emit();
}
