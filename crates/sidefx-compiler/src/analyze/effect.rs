//! Side-effect classification.
//!
//! [`has_shallow_effect`] judges one node by its kind alone (plus the static
//! types of calls and casts). [`has_effect`] asks the same question of a whole
//! subtree.

use super::walk::{StoppableVisitor, WalkControl, walk_postorder};
use crate::sema::{Expr, ExprId, ExprKind, Program, PurityLevel, TypeId};

/// Whether evaluating this node, ignoring its children, has an effect.
pub fn has_shallow_effect(program: &Program, id: ExprId) -> bool {
    match &program.exprs[id].kind {
        ExprKind::Assign { .. }
        | ExprKind::Construct { .. }
        | ExprKind::Blit { .. }
        | ExprKind::CompoundAssign { .. }
        | ExprKind::Increment { .. }
        | ExprKind::Decrement { .. }
        | ExprKind::Declaration { .. }
        | ExprKind::In { .. }
        | ExprKind::Remove { .. }
        | ExprKind::Assert { .. }
        | ExprKind::Halt
        | ExprKind::Delete(_)
        | ExprKind::New { .. }
        | ExprKind::NewAnonClass => true,

        ExprKind::Call { callee, .. } => call_has_effect(program, program.exprs[*callee].ty),

        ExprKind::Cast { to, operand } => {
            let operand = &program.exprs[*operand];
            matches!(operand.kind, ExprKind::Call { .. })
                && operand.ty.is_some_and(|ty| program.types.is_class(ty))
                && program.types.is_class(*to)
        }

        ExprKind::AndAnd { .. }
        | ExprKind::OrOr { .. }
        | ExprKind::Cond { .. }
        | ExprKind::Comma { .. }
        | ExprKind::Var(_)
        | ExprKind::Func(_)
        | ExprKind::Tuple(_)
        | ExprKind::Error
        | ExprKind::Import(_)
        | ExprKind::Binary { .. }
        | ExprKind::Unary { .. }
        | ExprKind::Deref(_)
        | ExprKind::AddressOf(_)
        | ExprKind::Index { .. }
        | ExprKind::IntLiteral(_)
        | ExprKind::BoolLiteral(_)
        | ExprKind::StringLiteral(_)
        | ExprKind::Null => false,
    }
}

/// A call is effect-free only through a strongly pure, nothrow function type.
/// Unknown callee types count as effectful.
fn call_has_effect(program: &Program, callee_ty: Option<TypeId>) -> bool {
    let Some(function) = callee_ty.and_then(|ty| program.types.callee_function(ty)) else {
        return true;
    };
    !(function.purity_level(&program.types) > PurityLevel::Weak && function.is_nothrow)
}

/// Stops at the first node with a shallow effect.
struct EffectFinder<'p> {
    program: &'p Program,
}

impl StoppableVisitor for EffectFinder<'_> {
    fn visit(&mut self, id: ExprId, _expr: &Expr) -> WalkControl {
        if has_shallow_effect(self.program, id) {
            WalkControl::Stop
        } else {
            WalkControl::Continue
        }
    }
}

/// Whether any node in the subtree rooted at `root`, `root` included, has a shallow effect.
pub fn has_effect(program: &Program, root: ExprId) -> bool {
    walk_postorder(&program.exprs, root, &mut EffectFinder { program })
}
