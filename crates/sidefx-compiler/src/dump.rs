//! Tree dump of every discarded expression with its effect classification.

use sidefx_core::Colors;

use crate::analyze::{has_effect, has_shallow_effect};
use crate::module::ModuleAnalyzed;
use crate::sema::{DiscardSite, ExprId, ExprKind, Program};

impl ModuleAnalyzed<'_> {
    /// One line per diagnostic: severity, message, and the fix when present.
    pub fn dump_diagnostics(&self) -> String {
        let mut out = String::new();
        for diag in self.diagnostics() {
            out.push_str(&format!("{}: {}\n", diag.severity(), diag.message()));
            if let Some(fix) = diag.fix() {
                out.push_str(&format!(
                    "  help: {}: `{}`\n",
                    fix.description(),
                    fix.replacement()
                ));
            }
        }
        out
    }

    pub fn dump(&self) -> String {
        self.dump_with_colors(Colors::OFF)
    }

    pub fn dump_with_colors(&self, colors: Colors) -> String {
        let program = self.program();
        let mut out = String::new();
        for def in &program.functions {
            if def.body.is_none() {
                continue;
            }
            let name = program.interner.resolve(program.symbols.func(def.func).name);
            if !out.is_empty() {
                out.push('\n');
            }
            out.push_str(&format!("fn {name}\n"));
            for (root, site) in def.discarded_exprs() {
                dump_tree(&mut out, program, root, site, colors);
            }
        }
        out
    }
}

fn dump_tree(out: &mut String, program: &Program, root: ExprId, site: DiscardSite, c: Colors) {
    let mut stack = vec![(root, 1usize)];
    while let Some((id, depth)) = stack.pop() {
        let expr = &program.exprs[id];
        let indent = "  ".repeat(depth);
        let mut line = format!("{indent}{}{}{}", c.kind, expr.kind.kind_name(), c.reset);
        if let Some(detail) = detail(program, &expr.kind) {
            line.push(' ');
            line.push_str(&detail);
        }
        if let Some(ty) = expr.ty {
            line.push_str(&format!(" {}{}{}", c.ty, program.type_text(ty), c.reset));
        }
        if has_shallow_effect(program, id) {
            line.push_str(&format!(" {}!{}", c.effect, c.reset));
        }
        out.push_str(&line);
        out.push('\n');

        let first_child = stack.len();
        stack.extend(expr.kind.children().map(|child| (child, depth + 1)));
        stack[first_child..].reverse();
    }

    let verdict = if has_effect(program, root) { "yes" } else { "no" };
    let site = match site {
        DiscardSite::Statement => "statement",
        DiscardSite::ForStep => "for step",
    };
    out.push_str(&format!("  {}{site} effect: {verdict}{}\n", c.dim, c.reset));
}

fn detail(program: &Program, kind: &ExprKind) -> Option<String> {
    let name = |sym| program.interner.resolve(sym).to_string();
    match kind {
        ExprKind::Var(var) => Some(name(program.symbols.var(*var).name)),
        ExprKind::Func(func) => Some(name(program.symbols.func(*func).name)),
        ExprKind::Import(module) => Some(name(program.symbols.module(*module).name)),
        ExprKind::Declaration { var, .. } => Some(name(program.symbols.var(*var).name)),
        ExprKind::Binary { op, .. } => Some(op.token().to_string()),
        ExprKind::Unary { op, .. } => Some(op.token().to_string()),
        ExprKind::CompoundAssign { op, .. } => Some(op.token().to_string()),
        ExprKind::IntLiteral(value) => Some(value.to_string()),
        ExprKind::BoolLiteral(value) => Some(value.to_string()),
        ExprKind::StringLiteral(text) => Some(format!("\"{text}\"")),
        _ => None,
    }
}
